//! Random playouts checked ply by ply against the `chess` crate's legal move
//! generator.

use std::str::FromStr;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

use crate::{
    board::Move,
    game::Game,
    piece::{Piece, PieceKind},
    position::{Position, Vector},
    status::Status,
    team::Team,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("found {movement} but it's not a legal move\n{notation}")]
    Extra { movement: Move, notation: String },
    #[error("{movement} not found\n{notation}")]
    Missing { movement: Move, notation: String },
    #[error("reported {status} but the reference disagrees\n{notation}")]
    Status { status: Status, notation: String },
    #[error("the reference rejected the position: {reason}\n{notation}")]
    Rejected { reason: String, notation: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FuzzReport {
    pub plies: u64,
    pub finished_games: u64,
}

impl From<chess::Square> for Position {
    #[allow(clippy::cast_possible_truncation, reason = "indices are below 8")]
    fn from(value: chess::Square) -> Self {
        Position::new(
            value.get_file().to_index() as u8 + 1,
            value.get_rank().to_index() as u8 + 1,
        )
    }
}
impl From<chess::ChessMove> for Move {
    fn from(value: chess::ChessMove) -> Self {
        Move::new(value.get_source().into(), value.get_dest().into())
    }
}

/// Full notation of the position including castling rights and the en
/// passant target, derived from the moved flags and the last move.
pub fn reference_notation(game: &Game) -> String {
    let board = game.board();
    let mut castling = String::new();
    for team in [Team::White, Team::Black] {
        let king = board.get(Position::new(5, team.home_rank()));
        if !king.is_some_and(|king| king == Piece::new(team, PieceKind::King)) {
            continue;
        }
        for (file, code) in [(8, 'k'), (1, 'q')] {
            let rook = board.get(Position::new(file, team.home_rank()));
            if rook.is_some_and(|rook| rook == Piece::new(team, PieceKind::Rook)) {
                castling.push(match team {
                    Team::White => code.to_ascii_uppercase(),
                    Team::Black => code,
                });
            }
        }
    }
    if castling.is_empty() {
        castling.push('-');
    }
    let en_passant = game
        .last_move()
        .filter(|movement| {
            board
                .get(movement.destination)
                .is_some_and(|piece| piece.kind == PieceKind::Pawn)
                && (movement.destination - movement.origin).y.abs() == 2
        })
        .and_then(|movement| {
            let team = board.get(movement.destination)?.team;
            movement.origin.move_by(Vector::pawn_single_move(team))
        })
        .map_or_else(|| "-".to_owned(), |target| target.to_string().to_lowercase());
    format!(
        "{board} {} {castling} {en_passant} 0 1",
        game.current_team().lowercase()
    )
}

fn compare(game: &Game) -> Result<FxHashSet<Move>, Mismatch> {
    let notation = reference_notation(game);
    let reference = chess::Board::from_str(&notation).map_err(|err| Mismatch::Rejected {
        reason: format!("{err:?}"),
        notation: notation.clone(),
    })?;
    let moves: FxHashSet<Move> = game.all_legal_moves().into_iter().collect();
    let reference_moves: FxHashSet<Move> =
        chess::MoveGen::new_legal(&reference).map(Into::into).collect();
    if let Some(movement) = moves.difference(&reference_moves).next() {
        return Err(Mismatch::Extra {
            movement: *movement,
            notation,
        });
    }
    if let Some(movement) = reference_moves.difference(&moves).next() {
        return Err(Mismatch::Missing {
            movement: *movement,
            notation,
        });
    }
    let agrees = match reference.status() {
        chess::BoardStatus::Checkmate => game.status() == Status::Checkmate,
        chess::BoardStatus::Stalemate => game.status() == Status::Stalemate,
        chess::BoardStatus::Ongoing => {
            let in_check = reference.checkers().popcnt() > 0;
            game.status() == if in_check { Status::Check } else { Status::Ongoing }
        }
    };
    if !agrees {
        return Err(Mismatch::Status {
            status: game.status(),
            notation,
        });
    }
    Ok(moves)
}

/// Plays `plies` random plies from the standard position, restarting whenever
/// a game ends, and stops at the first disagreement with the reference.
pub fn fuzz(plies: u64, seed: u64) -> Result<FuzzReport, Mismatch> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut game = Game::standard();
    let mut report = FuzzReport::default();
    while report.plies < plies {
        let moves: Box<[_]> = compare(&game)?.into_iter().collect();
        if moves.is_empty() {
            debug!(status = %game.status(), plies = report.plies, "game finished");
            report.finished_games += 1;
            game = Game::standard();
            continue;
        }
        let movement = moves[rng.random_range(0..moves.len())];
        // the move came out of the legal move list
        if let Err(err) = game.move_piece(movement.origin, movement.destination) {
            return Err(Mismatch::Extra {
                movement,
                notation: format!("{} ({err})", reference_notation(&game)),
            });
        }
        if game.status() == Status::Promoting {
            let choice =
                PieceKind::PROMOTION_CHOICES[rng.random_range(0..PieceKind::PROMOTION_CHOICES.len())];
            if let Err(err) = game.promote(choice) {
                return Err(Mismatch::Status {
                    status: game.status(),
                    notation: format!("{} ({err})", reference_notation(&game)),
                });
            }
        }
        report.plies += 1;
    }
    Ok(report)
}
