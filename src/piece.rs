use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use thiserror::Error;

use crate::team::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    pub const PROMOTION_CHOICES: [Self; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];
    pub fn uppercase(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
    pub fn lowercase(self) -> char {
        self.uppercase().to_ascii_lowercase()
    }
    /// Looks up the single letter code used by the board notation, either case.
    pub fn from_code(c: char) -> Option<Self> {
        let piece = match c.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };
        Some(piece)
    }
    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTION_CHOICES.contains(&self)
    }
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParsePieceKindError {
    #[error("expected one character, found none instead")]
    Empty,
    #[error("`{0}` is neither of `p`, `n`, `b`, `r`, `q`, `k`, or uppercase letter of any of these")]
    UnknownSymbol(char),
    #[error("unexpected `{0}`, only one character is expected")]
    UnexpectedSymbol(char),
}
impl FromStr for PieceKind {
    type Err = ParsePieceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut characters = s.chars();
        let c = characters.next().ok_or(ParsePieceKindError::Empty)?;
        let piece = PieceKind::from_code(c).ok_or(ParsePieceKindError::UnknownSymbol(c))?;
        if let Some(c) = characters.next() {
            return Err(ParsePieceKindError::UnexpectedSymbol(c));
        }
        Ok(piece)
    }
}

/// A piece record stored on the board. `moved` only matters for kings and
/// rooks, where it decides castling eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub team: Team,
    pub kind: PieceKind,
    pub moved: bool,
}
impl Piece {
    pub fn new(team: Team, kind: PieceKind) -> Self {
        Piece {
            team,
            kind,
            moved: false,
        }
    }
    pub fn from_code(c: char) -> Option<Self> {
        let kind = PieceKind::from_code(c)?;
        let team = if c.is_ascii_uppercase() {
            Team::White
        } else {
            Team::Black
        };
        Some(Piece::new(team, kind))
    }
    pub fn code(self) -> char {
        match self.team {
            Team::White => self.kind.uppercase(),
            Team::Black => self.kind.lowercase(),
        }
    }
    pub fn tracks_moved(self) -> bool {
        matches!(self.kind, PieceKind::King | PieceKind::Rook)
    }
    pub fn figurine(self) -> char {
        match (self.team, self.kind) {
            (Team::White, PieceKind::Pawn) => '♙',
            (Team::White, PieceKind::Knight) => '♘',
            (Team::White, PieceKind::Bishop) => '♗',
            (Team::White, PieceKind::Rook) => '♖',
            (Team::White, PieceKind::Queen) => '♕',
            (Team::White, PieceKind::King) => '♔',
            (Team::Black, PieceKind::Pawn) => '♟',
            (Team::Black, PieceKind::Knight) => '♞',
            (Team::Black, PieceKind::Bishop) => '♝',
            (Team::Black, PieceKind::Rook) => '♜',
            (Team::Black, PieceKind::Queen) => '♛',
            (Team::Black, PieceKind::King) => '♚',
        }
    }
}
impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.team, self.kind)?;
        Ok(())
    }
}
