use std::{
    fmt::{self, Display, Formatter},
    num::NonZero,
    ops::{Mul, Neg, Sub},
    str::FromStr,
};

use thiserror::Error;

use crate::team::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParsePositionError {
    #[error("found `{0}`, characters from `A` to `H` were expected instead")]
    InvalidFile(char),
    #[error("found `{0}`, characters from `1` to `8` were expected instead")]
    InvalidRank(char),
    #[error("provided string have length of {0} characters, 2 were expected")]
    NotEnoughCharacter(u8),
    #[error("unexpected `{0}`")]
    Unexpected(char),
}

/// Builds a [`Position`] from a literal such as `"e4"` at compile time.
#[macro_export]
macro_rules! pos {
    ($notation:literal) => {
        const { $crate::position::Position::from_literal($notation) }
    };
}

// Bit structure: 10FFFRRR
// file and rank are stored zero based, the leading `10` keeps the byte non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(NonZero<u8>);

impl Position {
    /// `file` and `rank` both range from 1 to 8.
    pub const fn new(file: u8, rank: u8) -> Self {
        debug_assert!(matches!(file, 1..=8));
        debug_assert!(matches!(rank, 1..=8));
        let byte = 0b1000_0000 | ((file - 1) << 3) | (rank - 1);
        match NonZero::new(byte) {
            Some(byte) => Position(byte),
            None => unreachable!(),
        }
    }
    pub fn new_checked(file: u8, rank: u8) -> Option<Self> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self::new(file, rank))
        } else {
            None
        }
    }
    pub const fn from_literal(notation: &str) -> Self {
        let bytes = notation.as_bytes();
        assert!(bytes.len() == 2, "a position has exactly 2 characters");
        let file = match bytes[0] {
            b'a'..=b'h' => bytes[0] - b'a' + 1,
            b'A'..=b'H' => bytes[0] - b'A' + 1,
            _ => panic!("file must be a letter from `a` to `h`"),
        };
        let rank = match bytes[1] {
            b'1'..=b'8' => bytes[1] - b'0',
            _ => panic!("rank must be a digit from `1` to `8`"),
        };
        Position::new(file, rank)
    }
    pub fn from_chars(file: char, rank: char) -> Result<Self, ParsePositionError> {
        let file = match file {
            'a'..='h' => file as u8 - b'a' + 1,
            'A'..='H' => file as u8 - b'A' + 1,
            _ => return Err(ParsePositionError::InvalidFile(file)),
        };
        let rank = match rank {
            '1'..='8' => rank as u8 - b'0',
            _ => return Err(ParsePositionError::InvalidRank(rank)),
        };
        Ok(Position::new(file, rank))
    }
    pub fn file(self) -> u8 {
        ((self.0.get() >> 3) & 0b_111) + 1
    }
    pub fn rank(self) -> u8 {
        (self.0.get() & 0b_111) + 1
    }
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=8).flat_map(|rank| (1..=8).map(move |file| Position::new(file, rank)))
    }
    pub fn move_by(self, movement: Vector) -> Option<Self> {
        Self::new_checked(
            self.file().checked_add_signed(movement.x)?,
            self.rank().checked_add_signed(movement.y)?,
        )
    }
    /// Squares walked from this position, excluding itself, until the board edge.
    pub fn line(self, direction: Vector) -> impl Iterator<Item = Self> {
        debug_assert_ne!(direction, Vector::ZERO);
        (1..).map_while(move |distance| self.move_by(direction * distance))
    }
    pub fn is_light(self) -> bool {
        (self.file() + self.rank()) % 2 == 1
    }
}
impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let file = (self.file() - 1 + b'A') as char;
        write!(f, "{file}{}", self.rank())?;
        Ok(())
    }
}
impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let Some(file) = chars.next() else {
            return Err(ParsePositionError::NotEnoughCharacter(0));
        };
        let Some(rank) = chars.next() else {
            return Err(ParsePositionError::NotEnoughCharacter(1));
        };
        if let Some(c) = chars.next() {
            return Err(ParsePositionError::Unexpected(c));
        }
        Position::from_chars(file, rank)
    }
}
impl Sub<Self> for Position {
    type Output = Vector;

    #[allow(clippy::cast_possible_wrap, reason = "file and rank never exceed 8")]
    fn sub(self, rhs: Self) -> Self::Output {
        Vector {
            x: self.file() as i8 - rhs.file() as i8,
            y: self.rank() as i8 - rhs.rank() as i8,
        }
    }
}

/// Offset between two positions, `x` counts files and `y` counts ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i8,
    pub y: i8,
}
impl Vector {
    pub const ZERO: Self = Vector { x: 0, y: 0 };

    pub const KNIGHT_MOVES: [Self; 8] = [
        Vector { x: -2, y: -1 },
        Vector { x: -2, y: 1 },
        Vector { x: -1, y: -2 },
        Vector { x: -1, y: 2 },
        Vector { x: 1, y: -2 },
        Vector { x: 1, y: 2 },
        Vector { x: 2, y: -1 },
        Vector { x: 2, y: 1 },
    ];
    pub const ROOK_DIRECTIONS: [Self; 4] = [
        Vector { x: -1, y: 0 },
        Vector { x: 0, y: -1 },
        Vector { x: 0, y: 1 },
        Vector { x: 1, y: 0 },
    ];
    pub const BISHOP_DIRECTIONS: [Self; 4] = [
        Vector { x: -1, y: -1 },
        Vector { x: -1, y: 1 },
        Vector { x: 1, y: -1 },
        Vector { x: 1, y: 1 },
    ];
    pub const QUEEN_DIRECTIONS: [Self; 8] = [
        Vector { x: -1, y: 0 },
        Vector { x: 0, y: -1 },
        Vector { x: 0, y: 1 },
        Vector { x: 1, y: 0 },
        Vector { x: -1, y: -1 },
        Vector { x: -1, y: 1 },
        Vector { x: 1, y: -1 },
        Vector { x: 1, y: 1 },
    ];
    pub const KING_SIDE: Self = Vector { x: 1, y: 0 };
    pub const QUEEN_SIDE: Self = Vector { x: -1, y: 0 };

    pub fn pawn_single_move(team: Team) -> Self {
        Vector {
            x: 0,
            y: team.pawn_direction(),
        }
    }
    pub fn pawn_attacks(team: Team) -> [Self; 2] {
        [-1, 1].map(|x| Vector {
            x,
            y: team.pawn_direction(),
        })
    }
    pub fn as_unit(self) -> Self {
        Vector {
            x: self.x.signum(),
            y: self.y.signum(),
        }
    }
}
impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Self::Output {
        Vector {
            x: -self.x,
            y: -self.y,
        }
    }
}
impl Mul<i8> for Vector {
    type Output = Vector;

    fn mul(self, rhs: i8) -> Self::Output {
        Vector {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}
