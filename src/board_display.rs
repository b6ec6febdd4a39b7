use std::fmt::{self, Display, Formatter};

use crate::{board::Board, piece::Piece, position::Position, team::Team};

const LIGHT: &str = "\x1b[30;107m";
const DARK: &str = "\x1b[30;47m";
const HIGHLIGHTED: &str = "\x1b[30;103m";
const RESET: &str = "\x1b[0m";

/// Console rendering of a board from one team's side, with `info` lines
/// written to the right of the ranks.
pub struct BoardDisplay<'a, 'b, 'c> {
    pub board: &'a Board,
    pub view: Team,
    pub highlighted: &'b [Position],
    pub info: &'c str,
}
impl Display for BoardDisplay<'_, '_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut lines = self.info.lines().fuse();
        for row in 0..8 {
            let rank = match self.view {
                Team::White => 8 - row,
                Team::Black => row + 1,
            };
            for column in 0..8 {
                let file = match self.view {
                    Team::White => column + 1,
                    Team::Black => 8 - column,
                };
                let position = Position::new(file, rank);
                let color = if self.highlighted.contains(&position) {
                    HIGHLIGHTED
                } else if position.is_light() {
                    LIGHT
                } else {
                    DARK
                };
                let figurine = self.board.get(position).map_or(' ', Piece::figurine);
                write!(f, "{color}{figurine} {RESET}")?;
            }
            write!(f, "{rank}")?;
            if let Some(line) = lines.next() {
                write!(f, " {line}")?;
            }
            writeln!(f)?;
        }
        match self.view {
            Team::White => write!(f, "a b c d e f g h")?,
            Team::Black => write!(f, "h g f e d c b a")?,
        }
        if let Some(line) = lines.next() {
            write!(f, "   {line}")?;
        }
        writeln!(f)?;
        for line in lines {
            writeln!(f, "                  {line}")?;
        }
        Ok(())
    }
}
