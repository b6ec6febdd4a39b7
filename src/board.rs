use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    error::InvalidBoard,
    movegen,
    piece::{Piece, PieceKind},
    position::{ParsePositionError, Position},
    team::Team,
};

pub const STANDARD_NOTATION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseMoveError {
    #[error(transparent)]
    Position(#[from] ParsePositionError),
    #[error("provided string have length of {0} characters, 4 were expected")]
    NotEnoughCharacter(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub origin: Position,
    pub destination: Position,
}
impl Move {
    pub fn new(origin: Position, destination: Position) -> Self {
        Move {
            origin,
            destination,
        }
    }
}
impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        Ok(())
    }
}
impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (Some(origin), Some(destination)) = (s.get(0..2), s.get(2..)) else {
            return Err(ParseMoveError::NotEnoughCharacter(s.chars().count()));
        };
        if destination.chars().count() < 2 {
            return Err(ParseMoveError::NotEnoughCharacter(s.chars().count()));
        }
        Ok(Move {
            origin: origin.parse()?,
            destination: destination.parse()?,
        })
    }
}

/// Everything a committed move changed on the board besides relocating the
/// piece itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveEffects {
    pub piece: Piece,
    pub captured: Option<(Position, Piece)>,
    pub castling_rook: Option<Move>,
}

/// Sparse mapping of squares to the pieces standing on them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    pieces: FxHashMap<Position, Piece>,
}
impl Board {
    pub fn empty() -> Self {
        Board::default()
    }
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for team in [Team::White, Team::Black] {
            for (file, kind) in (1..).zip(BACK_RANK) {
                board.place(Position::new(file, team.home_rank()), Piece::new(team, kind));
                board.place(
                    Position::new(file, team.pawn_home_rank()),
                    Piece::new(team, PieceKind::Pawn),
                );
            }
        }
        board
    }
    pub fn get(&self, position: Position) -> Option<Piece> {
        self.pieces.get(&position).copied()
    }
    pub fn is_empty_at(&self, position: Position) -> bool {
        !self.pieces.contains_key(&position)
    }
    pub fn len(&self) -> usize {
        self.pieces.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces
            .iter()
            .map(|(position, piece)| (*position, *piece))
    }
    pub fn pieces_of(&self, team: Team) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.team == team)
    }
    pub fn king_of(&self, team: Team) -> Option<Position> {
        self.pieces_of(team)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(position, _)| position)
    }
    pub(crate) fn place(&mut self, position: Position, piece: Piece) -> Option<Piece> {
        self.pieces.insert(position, piece)
    }
    pub fn is_attacked_by(&self, position: Position, team: Team) -> bool {
        self.pieces_of(team)
            .any(|(origin, piece)| movegen::attacks_for(piece, origin, self).contains(&position))
    }
    /// A team without a king on the board is never in check.
    pub fn is_in_check(&self, team: Team) -> bool {
        self.king_of(team)
            .is_some_and(|king| self.is_attacked_by(king, !team))
    }
    /// Relocates a piece along with the side effects of castling and en
    /// passant. Validation is the caller's job; returns `None` if `origin` is
    /// empty.
    pub(crate) fn apply(&mut self, movement: Move) -> Option<MoveEffects> {
        let Move {
            origin,
            destination,
        } = movement;
        let mut piece = self.pieces.remove(&origin)?;
        let offset = destination - origin;
        let mut castling_rook = None;
        let mut captured = None;

        if piece.kind == PieceKind::King && offset.x.abs() == 2 {
            let direction = offset.as_unit();
            let rook_file = if direction.x > 0 { 8 } else { 1 };
            let rook_origin = Position::new(rook_file, origin.rank());
            if let (Some(mut rook), Some(rook_destination)) = (
                self.pieces.remove(&rook_origin),
                destination.move_by(-direction),
            ) {
                rook.moved = true;
                self.pieces.insert(rook_destination, rook);
                castling_rook = Some(Move::new(rook_origin, rook_destination));
            }
        }
        if piece.kind == PieceKind::Pawn && offset.x != 0 && self.is_empty_at(destination) {
            let passed = Position::new(destination.file(), origin.rank());
            captured = self.pieces.remove(&passed).map(|pawn| (passed, pawn));
        }
        if piece.tracks_moved() {
            piece.moved = true;
        }
        if let Some(taken) = self.pieces.insert(destination, piece) {
            captured = Some((destination, taken));
        }
        Some(MoveEffects {
            piece,
            captured,
            castling_rook,
        })
    }
    /// Copy of the board with `movement` applied; `self` is left untouched.
    pub fn with_applied(&self, movement: Move) -> Board {
        let mut board = self.clone();
        board.apply(movement);
        board
    }
}
impl FromStr for Board {
    type Err = InvalidBoard;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ranks: Vec<_> = s.split('/').collect();
        if ranks.len() != 8 {
            return Err(InvalidBoard::RankCount(ranks.len()));
        }
        let mut board = Board::empty();
        for (rank, segment) in (1..=8).rev().zip(ranks) {
            let mut file: u8 = 1;
            for c in segment.chars() {
                if let Some(skip @ 1..=8) = c.to_digit(10) {
                    // `skip` is at most 8
                    #[allow(clippy::cast_possible_truncation)]
                    let skip = skip as u8;
                    file = file.saturating_add(skip);
                    continue;
                }
                // unrecognized codes still take up a file
                if let Some(piece) = Piece::from_code(c) {
                    let position = Position::new_checked(file, rank)
                        .ok_or(InvalidBoard::RankOverflow { rank })?;
                    board.place(position, piece);
                }
                file = file.saturating_add(1);
            }
            if file > 9 {
                return Err(InvalidBoard::RankOverflow { rank });
            }
        }
        Ok(board)
    }
}
impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for rank in (1..=8).rev() {
            let mut empty = 0;
            for file in 1..=8 {
                if let Some(piece) = self.get(Position::new(file, rank)) {
                    if empty > 0 {
                        write!(f, "{empty}")?;
                        empty = 0;
                    }
                    write!(f, "{}", piece.code())?;
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 1 {
                write!(f, "/")?;
            }
        }
        Ok(())
    }
}
