//! Pseudo-legal move generation. Nothing here looks at whether the mover's
//! king ends up in check; that filtering lives in [`crate::game`].

use crate::{
    board::Board,
    piece::{Piece, PieceKind},
    position::{Position, Vector},
    team::Team,
};

/// Destinations of `piece` standing on `position`, ignoring check. Castling
/// and en passant are not included.
pub fn moves_for(piece: Piece, position: Position, board: &Board) -> Vec<Position> {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(piece.team, position, board).collect(),
        PieceKind::Knight => step_moves(piece.team, position, board, &Vector::KNIGHT_MOVES).collect(),
        PieceKind::Bishop => {
            all_directional_moves(piece.team, position, board, &Vector::BISHOP_DIRECTIONS, 8)
        }
        PieceKind::Rook => {
            all_directional_moves(piece.team, position, board, &Vector::ROOK_DIRECTIONS, 8)
        }
        PieceKind::Queen => {
            all_directional_moves(piece.team, position, board, &Vector::QUEEN_DIRECTIONS, 8)
        }
        PieceKind::King => {
            all_directional_moves(piece.team, position, board, &Vector::QUEEN_DIRECTIONS, 1)
        }
    }
}
/// Squares `piece` threatens. Pawns threaten both forward diagonals whether or
/// not something stands there, and never threaten straight ahead.
pub fn attacks_for(piece: Piece, position: Position, board: &Board) -> Vec<Position> {
    match piece.kind {
        PieceKind::Pawn => Vector::pawn_attacks(piece.team)
            .into_iter()
            .filter_map(|movement| position.move_by(movement))
            .collect(),
        _ => moves_for(piece, position, board),
    }
}
/// King destinations for castling toward either rook. Only occupancy and the
/// moved flags are checked here; attacked squares are the caller's concern.
pub fn castling_destinations(king: Piece, position: Position, board: &Board) -> Vec<Position> {
    if king.kind != PieceKind::King
        || king.moved
        || position != Position::new(5, king.team.home_rank())
    {
        return Vec::new();
    }
    [Vector::QUEEN_SIDE, Vector::KING_SIDE]
        .into_iter()
        .filter_map(|direction| {
            let mut line = position.line(direction);
            let rook_square = line.find(|square| !board.is_empty_at(*square))?;
            let rook = board.get(rook_square)?;
            let is_corner = rook_square.file() == 1 || rook_square.file() == 8;
            (is_corner && rook.team == king.team && rook.kind == PieceKind::Rook && !rook.moved)
                .then(|| position.move_by(direction * 2))
                .flatten()
        })
        .collect()
}
fn pawn_moves(team: Team, position: Position, board: &Board) -> impl Iterator<Item = Position> {
    let forward_jumps = if position.rank() == team.pawn_home_rank() {
        2
    } else {
        1
    };
    position
        .line(Vector::pawn_single_move(team))
        .take(forward_jumps)
        .take_while(move |destination| board.is_empty_at(*destination))
        .chain(
            Vector::pawn_attacks(team)
                .into_iter()
                .filter_map(move |movement| position.move_by(movement))
                .filter(move |destination| {
                    board
                        .get(*destination)
                        .is_some_and(|piece| piece.team != team)
                }),
        )
}
fn step_moves(
    team: Team,
    position: Position,
    board: &Board,
    moves: &[Vector],
) -> impl Iterator<Item = Position> {
    moves
        .iter()
        .copied()
        .filter_map(move |movement| position.move_by(movement))
        .filter(move |destination| {
            board
                .get(*destination)
                .is_none_or(|piece| piece.team != team)
        })
}
/// Walks one ray, stopping before a friendly piece or on an enemy one.
fn directional_moves(
    team: Team,
    position: Position,
    board: &Board,
    direction: Vector,
    reach: usize,
) -> impl Iterator<Item = Position> {
    let mut resume = true;
    position
        .line(direction)
        .take(reach)
        .map_while(move |destination| {
            if !resume {
                return None;
            }
            match board.get(destination) {
                Some(piece) if piece.team == team => None,
                Some(_) => {
                    resume = false;
                    Some(destination)
                }
                None => Some(destination),
            }
        })
}
fn all_directional_moves(
    team: Team,
    position: Position,
    board: &Board,
    directions: &[Vector],
    reach: usize,
) -> Vec<Position> {
    directions
        .iter()
        .flat_map(|direction| directional_moves(team, position, board, *direction, reach))
        .collect()
}
