use thiserror::Error;

use crate::{
    board::ParseMoveError, position::ParsePositionError, status::Status, team::Team,
};

/// The starting notation could not be turned into a playable game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum InvalidBoard {
    #[error("found {0} ranks, 8 slash separated ranks were expected")]
    RankCount(usize),
    #[error("rank {rank} describes more than 8 files")]
    RankOverflow { rank: u8 },
    #[error("no {0} king found")]
    MissingKing(Team),
    #[error("found `{0}`, expected `w` or `b` for the team to move")]
    Team(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InvalidMove {
    #[error("a pawn must be promoted first")]
    MustPromoteFirst,
    #[error("no piece of the team to move on that square")]
    InvalidSelection,
    #[error("cannot capture a piece of your own team")]
    CaptureOwn,
    #[error("illegal move")]
    Illegal,
    #[error("no pawn to promote")]
    NothingToPromote,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum InvalidInput {
    #[error("`{0}` is not a promotion choice, expected one of `q`, `r`, `b`, or `n`")]
    PromotionChoice(String),
    #[error(transparent)]
    Position(#[from] ParsePositionError),
    #[error(transparent)]
    Move(#[from] ParseMoveError),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum GameError {
    #[error(transparent)]
    InvalidMove(#[from] InvalidMove),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error("the game already ended in {0}")]
    GameEnded(Status),
}
