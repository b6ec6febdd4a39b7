//! Rules of standard chess: board notation, legal move generation, check,
//! checkmate, stalemate, castling, en passant and promotion, driven through a
//! single [`game::Game`] controller.
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
    reason = "errors are documented on their own types"
)]

pub mod board;
pub mod board_display;
pub mod error;
pub mod fuzz;
pub mod game;
mod misc;
pub mod movegen;
pub mod piece;
pub mod position;
pub mod repl;
pub mod status;
pub mod team;
