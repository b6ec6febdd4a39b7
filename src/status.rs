use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    /// A pawn reached the far rank and waits for a promotion choice.
    Promoting,
}
impl Status {
    pub fn is_over(self) -> bool {
        matches!(self, Status::Checkmate | Status::Stalemate)
    }
}
impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ongoing => write!(f, "ongoing")?,
            Status::Check => write!(f, "check")?,
            Status::Checkmate => write!(f, "checkmate")?,
            Status::Stalemate => write!(f, "stalemate")?,
            Status::Promoting => write!(f, "promoting")?,
        }
        Ok(())
    }
}
