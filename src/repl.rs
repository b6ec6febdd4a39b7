use std::{
    fmt::{self, Display, Formatter},
    io::{self, BufRead, Write, stderr, stdin, stdout},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    board::Move,
    board_display::BoardDisplay,
    error::{GameError, InvalidInput, InvalidMove},
    game::Game,
    misc::strip_prefix_token,
    piece::PieceKind,
    position::Position,
    status::Status,
    team::Team,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Input {
    Help,
    Flip,
    Restart,
    Quit,
    Import(String),
    ExportNotation,
    Position(Position),
    Move(Move, Option<PieceKind>),
    Promote(PieceKind),
}
impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Input::Help => write!(f, "help")?,
            Input::Flip => write!(f, "flip")?,
            Input::Restart => write!(f, "restart")?,
            Input::Quit => write!(f, "quit")?,
            Input::Import(notation) => write!(f, "import {notation}")?,
            Input::ExportNotation => write!(f, "notation")?,
            Input::Position(position) => write!(f, "{position}")?,
            Input::Move(movement, None) => write!(f, "{movement}")?,
            Input::Move(movement, Some(kind)) => write!(f, "{movement}{}", kind.lowercase())?,
            Input::Promote(kind) => write!(f, "{}", kind.lowercase())?,
        }
        Ok(())
    }
}
fn parse_promotion_choice(s: &str) -> Result<PieceKind, InvalidInput> {
    s.parse::<PieceKind>()
        .ok()
        .filter(|kind| kind.is_promotion_choice())
        .ok_or_else(|| InvalidInput::PromotionChoice(s.to_owned()))
}
impl FromStr for Input {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help" => Ok(Input::Help),
            "flip" => Ok(Input::Flip),
            "restart" => Ok(Input::Restart),
            "quit" => Ok(Input::Quit),
            "notation" => Ok(Input::ExportNotation),
            s => {
                if let Some(s) = strip_prefix_token(s, "import") {
                    Ok(Input::Import(s.to_owned()))
                } else if s.chars().count() == 1 {
                    Ok(Input::Promote(parse_promotion_choice(s)?))
                } else if s.chars().count() == 2 {
                    Ok(Input::Position(s.parse()?))
                } else if let (5, Some(movement), Some(choice)) =
                    (s.chars().count(), s.get(..4), s.get(4..))
                {
                    Ok(Input::Move(
                        movement.parse()?,
                        Some(parse_promotion_choice(choice)?),
                    ))
                } else {
                    Ok(Input::Move(s.parse()?, None))
                }
            }
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
enum SelectionError {
    #[error("No piece found on {0}")]
    Empty(Position),
    #[error("It is {0}'s turn")]
    WrongTeam(Team),
    #[error("No legal moves for the piece on {0}")]
    NoMoves(Position),
}
fn select(game: &Game, position: Position) -> Result<Vec<Position>, SelectionError> {
    let piece = game
        .board()
        .get(position)
        .ok_or(SelectionError::Empty(position))?;
    if piece.team != game.current_team() {
        return Err(SelectionError::WrongTeam(game.current_team()));
    }
    let moves = game.legal_moves(position);
    if moves.is_empty() {
        return Err(SelectionError::NoMoves(position));
    }
    Ok(moves)
}
/// Plays a move and answers the promotion right away when a choice was
/// given. A choice on a move that doesn't promote is rejected before moving.
fn play(
    game: &mut Game,
    movement: Move,
    choice: Option<PieceKind>,
) -> Result<Status, GameError> {
    if choice.is_some() {
        let promotes = game.board().get(movement.origin).is_some_and(|piece| {
            piece.kind == PieceKind::Pawn
                && movement.destination.rank() == piece.team.promotion_rank()
        });
        if !promotes {
            return Err(InvalidMove::NothingToPromote.into());
        }
    }
    let status = game.move_piece(movement.origin, movement.destination)?;
    match (status, choice) {
        (Status::Promoting, Some(kind)) => game.promote(kind),
        _ => Ok(status),
    }
}
fn describe(game: &Game) -> String {
    let team = game.current_team();
    match game.status() {
        Status::Ongoing => format!("{team} plays"),
        Status::Check => format!("{team} plays, in check"),
        Status::Checkmate => format!("checkmate, {} wins", !team),
        Status::Stalemate => "stalemate".to_owned(),
        Status::Promoting => format!("{team} promotes, enter `q`, `r`, `b`, or `n`"),
    }
}
/// Interactive console game reading commands from stdin. Returns once `quit`
/// is entered or stdin closes.
#[allow(
    clippy::too_many_lines,
    reason = "one arm per command reads better than splitting them apart"
)]
pub fn repl(start: Game, mut view: Team) -> io::Result<()> {
    let input = stdin().lock();
    let mut output = stdout().lock();
    let mut error = stderr().lock();

    let mut lines = input.lines();

    let mut game = start.clone();
    let mut highlighted = Vec::new();
    let mut first_time = true;
    loop {
        let mut info = describe(&game);
        if first_time {
            info.push_str("\ntype `help` for instructions");
            first_time = false;
        }
        writeln!(
            output,
            "{}",
            BoardDisplay {
                board: game.board(),
                view,
                highlighted: &highlighted,
                info: &info,
            },
        )?;
        loop {
            write!(output, "> ")?;
            output.flush()?;
            let Some(text) = lines.next() else {
                return Ok(());
            };
            let text = text?;
            let input = match text.trim().parse() {
                Ok(input) => input,
                Err(err) => {
                    writeln!(error, "Error: {err}")?;
                    writeln!(error, "for available command, enter `help`")?;
                    continue;
                }
            };
            match input {
                Input::Help => {
                    writeln!(output, "flip              - flip the board")?;
                    writeln!(output, "restart           - reset to the starting position")?;
                    writeln!(output, "quit              - quit the game")?;
                    writeln!(output, "import <notation> - import a position")?;
                    writeln!(output, "notation          - export the position")?;
                    writeln!(output, "e2                - view legal moves")?;
                    writeln!(output, "e2e4              - play the move")?;
                    writeln!(output, "e7e8q             - move and promote")?;
                    writeln!(output, "e1g1              - perform castling")?;
                    writeln!(output, "q, r, b, or n     - choose a promotion")?;
                }
                Input::Flip => {
                    view = !view;
                }
                Input::Restart => {
                    game = start.clone();
                    highlighted.clear();
                }
                Input::Quit => return Ok(()),
                Input::Import(notation) => {
                    game = match Game::new(&notation) {
                        Ok(game) => game,
                        Err(err) => {
                            writeln!(error, "Error: {err}")?;
                            continue;
                        }
                    };
                    highlighted.clear();
                }
                Input::ExportNotation => {
                    writeln!(
                        output,
                        "{} {}",
                        game.board(),
                        game.current_team().lowercase()
                    )?;
                    continue;
                }
                Input::Position(position) => {
                    let moves = match select(&game, position) {
                        Ok(moves) => moves,
                        Err(err) => {
                            writeln!(error, "Error: {err}")?;
                            continue;
                        }
                    };
                    let list: Vec<_> = moves.iter().map(ToString::to_string).collect();
                    writeln!(output, "Legal moves: {}", list.join(", "))?;
                    highlighted.clear();
                    highlighted.extend(moves);
                }
                Input::Move(movement, choice) => {
                    if let Err(err) = play(&mut game, movement, choice) {
                        writeln!(error, "Error: {err}")?;
                        continue;
                    }
                    highlighted.clear();
                    highlighted.push(movement.origin);
                    highlighted.push(movement.destination);
                }
                Input::Promote(kind) => {
                    if let Err(err) = game.promote(kind) {
                        writeln!(error, "Error: {err}")?;
                        continue;
                    }
                }
            }
            break;
        }
    }
}
