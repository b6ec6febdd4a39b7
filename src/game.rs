use tracing::{debug, info};

use crate::{
    board::{Board, Move},
    error::{GameError, InvalidBoard, InvalidInput, InvalidMove},
    movegen,
    piece::{Piece, PieceKind},
    position::{Position, Vector},
    status::Status,
    team::Team,
};

/// A single match. The game is the only writer of its board; callers get
/// read-only views and submit moves through [`Game::move_piece`] and
/// [`Game::promote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    current_team: Team,
    last_move: Option<Move>,
    pending_promotion: Option<(Position, Team)>,
    status: Status,
}
impl Game {
    pub fn standard() -> Self {
        Game::with_board(Board::standard(), Team::White)
    }
    /// Parses the board notation, optionally followed by `w` or `b` for the
    /// team to move. Any later fields are ignored.
    pub fn new(notation: &str) -> Result<Self, InvalidBoard> {
        let mut fields = notation.split_whitespace();
        let board = fields.next().unwrap_or_default().parse()?;
        let current_team = match fields.next() {
            Some(team) => team
                .parse()
                .map_err(|_| InvalidBoard::Team(team.to_owned()))?,
            None => Team::White,
        };
        Game::from_board(board, current_team)
    }
    pub fn from_board(board: Board, current_team: Team) -> Result<Self, InvalidBoard> {
        for team in [Team::White, Team::Black] {
            if board.king_of(team).is_none() {
                return Err(InvalidBoard::MissingKing(team));
            }
        }
        Ok(Game::with_board(board, current_team))
    }
    fn with_board(board: Board, current_team: Team) -> Self {
        let mut game = Game {
            board,
            current_team,
            last_move: None,
            pending_promotion: None,
            status: Status::Ongoing,
        };
        game.status = game.evaluate_status();
        game
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn current_team(&self) -> Team {
        self.current_team
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }
    pub fn pending_promotion(&self) -> Option<(Position, Team)> {
        self.pending_promotion
    }
    /// Legal destinations of the piece on `position`. Empty when the square is
    /// empty or holds a piece of the team not to move.
    pub fn legal_moves(&self, position: Position) -> Vec<Position> {
        match self.board.get(position) {
            Some(piece) if piece.team == self.current_team => self.legal_moves_of(piece, position),
            _ => Vec::new(),
        }
    }
    pub fn all_legal_moves(&self) -> Vec<Move> {
        self.board
            .pieces_of(self.current_team)
            .flat_map(|(origin, piece)| {
                self.legal_moves_of(piece, origin)
                    .into_iter()
                    .map(move |destination| Move::new(origin, destination))
            })
            .collect()
    }
    pub fn legal_move_count(&self) -> usize {
        self.board
            .pieces_of(self.current_team)
            .map(|(origin, piece)| self.legal_moves_of(piece, origin).len())
            .sum()
    }
    /// Each candidate is played out in full on a copy of the board, castling
    /// rook and en passant capture included, before checking the king.
    fn legal_moves_of(&self, piece: Piece, position: Position) -> Vec<Position> {
        let team = piece.team;
        let mut candidates = movegen::moves_for(piece, position, &self.board);
        match piece.kind {
            PieceKind::King if !piece.moved && !self.board.is_in_check(team) => {
                candidates.extend(
                    movegen::castling_destinations(piece, position, &self.board)
                        .into_iter()
                        .filter(|destination| {
                            let direction = (*destination - position).as_unit();
                            position
                                .line(direction)
                                .take(2)
                                .all(|square| !self.board.is_attacked_by(square, !team))
                        }),
                );
            }
            PieceKind::Pawn => candidates.extend(self.en_passant_destination(piece, position)),
            _ => (),
        }
        candidates.retain(|destination| {
            !self
                .board
                .with_applied(Move::new(position, *destination))
                .is_in_check(team)
        });
        candidates
    }
    /// The square behind an enemy pawn that advanced two squares on the last
    /// move and now stands beside `pawn`.
    fn en_passant_destination(&self, pawn: Piece, position: Position) -> Option<Position> {
        let Move {
            origin,
            destination,
        } = self.last_move?;
        let passed = self.board.get(destination)?;
        let double_advance = passed.kind == PieceKind::Pawn
            && passed.team != pawn.team
            && (destination - origin).y.abs() == 2;
        let beside = destination.rank() == position.rank()
            && (destination - position).x.abs() == 1;
        if double_advance && beside {
            destination.move_by(Vector::pawn_single_move(pawn.team))
        } else {
            None
        }
    }
    fn evaluate_status(&self) -> Status {
        let in_check = self.board.is_in_check(self.current_team);
        let total = self.legal_move_count();
        match (in_check, total) {
            (true, 0) => Status::Checkmate,
            (false, 0) => Status::Stalemate,
            (true, _) => Status::Check,
            (false, _) => Status::Ongoing,
        }
    }
    fn update_status(&mut self, status: Status) {
        if status != Status::Ongoing {
            info!(%status, team = %self.current_team, "status changed");
        }
        self.status = status;
    }
    /// Plays a move for the team to move. Nothing changes when an error is
    /// returned.
    pub fn move_piece(
        &mut self,
        origin: Position,
        destination: Position,
    ) -> Result<Status, GameError> {
        if self.status.is_over() {
            return Err(GameError::GameEnded(self.status));
        }
        if self.status == Status::Promoting {
            return Err(InvalidMove::MustPromoteFirst.into());
        }
        let piece = self
            .board
            .get(origin)
            .filter(|piece| piece.team == self.current_team)
            .ok_or(InvalidMove::InvalidSelection)?;
        if self
            .board
            .get(destination)
            .is_some_and(|target| target.team == self.current_team)
        {
            return Err(InvalidMove::CaptureOwn.into());
        }
        let movement = Move::new(origin, destination);
        if !self.legal_moves_of(piece, origin).contains(&destination) {
            debug!(%movement, %piece, "illegal move rejected");
            return Err(InvalidMove::Illegal.into());
        }
        let effects = self
            .board
            .apply(movement)
            .ok_or(InvalidMove::InvalidSelection)?;
        debug!(%movement, piece = %effects.piece, "move applied");
        if let Some(rook) = effects.castling_rook {
            debug!(%rook, "castling rook relocated");
        }
        if let Some((square, captured)) = effects.captured {
            debug!(%square, %captured, "piece captured");
        }
        self.last_move = Some(movement);

        if effects.piece.kind == PieceKind::Pawn
            && destination.rank() == effects.piece.team.promotion_rank()
        {
            self.pending_promotion = Some((destination, effects.piece.team));
            self.update_status(Status::Promoting);
            return Ok(self.status);
        }
        self.current_team = !self.current_team;
        let status = self.evaluate_status();
        self.update_status(status);
        Ok(self.status)
    }
    fn pending(&self) -> Result<(Position, Team), GameError> {
        match self.pending_promotion {
            Some(pending) if self.status == Status::Promoting => Ok(pending),
            _ => Err(InvalidMove::NothingToPromote.into()),
        }
    }
    /// Replaces the pawn waiting on the far rank and hands the turn over.
    pub fn promote(&mut self, kind: PieceKind) -> Result<Status, GameError> {
        let (position, team) = self.pending()?;
        if !kind.is_promotion_choice() {
            return Err(InvalidInput::PromotionChoice(kind.lowercase().to_string()).into());
        }
        self.board.place(position, Piece::new(team, kind));
        self.pending_promotion = None;
        info!(%position, %kind, %team, "pawn promoted");

        self.current_team = !team;
        let status = self.evaluate_status();
        self.update_status(status);
        Ok(self.status)
    }
    /// Same as [`Game::promote`] but takes the piece letter, `q`, `r`, `b`,
    /// or `n` in either case.
    pub fn promote_str(&mut self, choice: &str) -> Result<Status, GameError> {
        self.pending()?;
        let kind = choice
            .trim()
            .parse::<PieceKind>()
            .ok()
            .filter(|kind| kind.is_promotion_choice())
            .ok_or_else(|| InvalidInput::PromotionChoice(choice.to_owned()))?;
        self.promote(kind)
    }
}
impl Default for Game {
    fn default() -> Self {
        Game::standard()
    }
}
#[cfg(test)]
mod test {
    use crate::{
        board::Board,
        error::{GameError, InvalidBoard, InvalidInput, InvalidMove},
        game::Game,
        piece::{Piece, PieceKind},
        pos,
        position::Position,
        status::Status,
        team::Team,
    };

    fn load(notation: &str) -> Game {
        Game::new(notation).unwrap()
    }
    fn play(game: &mut Game, moves: &[(Position, Position)]) {
        for (origin, destination) in moves {
            game.move_piece(*origin, *destination).unwrap();
        }
    }

    #[test]
    fn twenty_opening_moves() {
        let game = Game::standard();
        assert_eq!(game.status(), Status::Ongoing);
        assert_eq!(game.current_team(), Team::White);
        assert_eq!(game.legal_move_count(), 20);
        assert_eq!(game.all_legal_moves().len(), 20);
    }
    #[test]
    fn every_first_move_hands_over_to_black() {
        for movement in Game::standard().all_legal_moves() {
            let mut game = Game::standard();
            let status = game
                .move_piece(movement.origin, movement.destination)
                .unwrap();
            assert_eq!(status, Status::Ongoing);
            assert_eq!(game.current_team(), Team::Black);
            assert_eq!(game.legal_move_count(), 20);
        }
    }
    #[test]
    fn notation_may_name_the_team_to_move() {
        let game = load("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
        assert_eq!(game.current_team(), Team::Black);
        assert_eq!(
            Game::new("4k3/8/8/8/8/8/8/4K3 x"),
            Err(InvalidBoard::Team("x".to_owned()))
        );
    }
    #[test]
    fn construction_errors() {
        assert_eq!(Game::new(""), Err(InvalidBoard::RankCount(1)));
        assert_eq!(
            Game::new("8/8/8/8/8/8/8/RNBQKBNR"),
            Err(InvalidBoard::MissingKing(Team::Black))
        );
    }
    #[test]
    fn selection_errors() {
        let mut game = Game::standard();
        assert_eq!(
            game.move_piece(pos!("e4"), pos!("e5")),
            Err(GameError::InvalidMove(InvalidMove::InvalidSelection))
        );
        assert_eq!(
            game.move_piece(pos!("e7"), pos!("e5")),
            Err(GameError::InvalidMove(InvalidMove::InvalidSelection))
        );
        assert_eq!(
            game.move_piece(pos!("e1"), pos!("e2")),
            Err(GameError::InvalidMove(InvalidMove::CaptureOwn))
        );
        assert_eq!(
            game.move_piece(pos!("e2"), pos!("e5")),
            Err(GameError::InvalidMove(InvalidMove::Illegal))
        );
        assert_eq!(game, Game::standard());
    }
    #[test]
    fn legal_moves_only_for_the_team_to_move() {
        let game = Game::standard();
        assert!(game.legal_moves(pos!("e7")).is_empty());
        assert!(game.legal_moves(pos!("e4")).is_empty());
        assert!(game.legal_moves(pos!("a1")).is_empty());
        assert_eq!(game.legal_moves(pos!("g1")).len(), 2);
    }
    #[test]
    fn pinned_piece_cannot_move() {
        let game = load("4k3/4r3/8/8/8/8/4N3/4K3");
        assert!(game.legal_moves(pos!("e2")).is_empty());
    }
    #[test]
    fn king_cannot_step_into_check() {
        let game = load("4k3/8/8/8/8/8/3r4/4K3");
        let mut moves = game.legal_moves(pos!("e1"));
        moves.sort_by_key(|position| (position.file(), position.rank()));
        assert_eq!(moves, [pos!("d2"), pos!("f1")]);
    }
    #[test]
    fn querying_and_rejecting_leave_the_board_alone() {
        let mut game = load("4k3/4r3/8/8/8/8/4N3/4K3");
        let before = game.board().clone();
        game.legal_moves(pos!("e2"));
        game.legal_move_count();
        assert!(game.move_piece(pos!("e2"), pos!("c3")).is_err());
        assert_eq!(game.board(), &before);
        assert_eq!(game.current_team(), Team::White);
    }
    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut game = load("4k3/8/8/8/3p4/8/4P3/4K3");
        game.move_piece(pos!("e2"), pos!("e4")).unwrap();
        let mut moves = game.legal_moves(pos!("d4"));
        moves.sort_by_key(|position| position.file());
        assert_eq!(moves, [pos!("d3"), pos!("e3")]);

        game.move_piece(pos!("d4"), pos!("e3")).unwrap();
        assert_eq!(game.board().get(pos!("e4")), None);
        assert_eq!(
            game.board().get(pos!("e3")),
            Some(Piece::new(Team::Black, PieceKind::Pawn))
        );
        assert_eq!(game.board().len(), 3);
    }
    #[test]
    fn en_passant_expires_after_one_move() {
        let mut game = load("4k3/8/8/8/3p4/8/4P3/4K3");
        play(
            &mut game,
            &[
                (pos!("e2"), pos!("e4")),
                (pos!("e8"), pos!("d8")),
                (pos!("e1"), pos!("f1")),
            ],
        );
        assert_eq!(game.legal_moves(pos!("d4")), [pos!("d3")]);
    }
    #[test]
    fn en_passant_cannot_expose_the_king() {
        let mut game = load("4k3/3p4/8/K3P2r/8/8/8/8 b");
        game.move_piece(pos!("d7"), pos!("d5")).unwrap();
        assert_eq!(game.legal_moves(pos!("e5")), [pos!("e6")]);
    }
    #[test]
    fn en_passant_can_capture_the_checking_pawn() {
        let mut game = load("4k3/3p4/8/4P3/4K3/8/8/8 b");
        let status = game.move_piece(pos!("d7"), pos!("d5")).unwrap();
        assert_eq!(status, Status::Check);
        assert_eq!(game.legal_moves(pos!("e5")), [pos!("d6")]);
        let status = game.move_piece(pos!("e5"), pos!("d6")).unwrap();
        assert_eq!(status, Status::Ongoing);
        assert_eq!(game.board().get(pos!("d5")), None);
    }
    #[test]
    fn castling_moves_king_and_rook_together() {
        let mut game = load("r3k2r/8/8/8/8/8/8/R3K2R");
        let moves = game.legal_moves(pos!("e1"));
        assert!(moves.contains(&pos!("g1")));
        assert!(moves.contains(&pos!("c1")));

        game.move_piece(pos!("e1"), pos!("g1")).unwrap();
        let king = game.board().get(pos!("g1")).unwrap();
        let rook = game.board().get(pos!("f1")).unwrap();
        assert_eq!((king.kind, king.moved), (PieceKind::King, true));
        assert_eq!((rook.kind, rook.moved), (PieceKind::Rook, true));
        assert_eq!(game.board().get(pos!("e1")), None);
        assert_eq!(game.board().get(pos!("h1")), None);

        game.move_piece(pos!("e8"), pos!("c8")).unwrap();
        assert_eq!(
            game.board().get(pos!("d8")).map(|piece| piece.kind),
            Some(PieceKind::Rook)
        );
        assert_eq!(game.board().get(pos!("a8")), None);
    }
    #[test]
    fn no_castling_after_the_king_moved() {
        let mut game = load("r3k2r/8/8/8/8/8/8/R3K2R");
        play(
            &mut game,
            &[
                (pos!("e1"), pos!("f1")),
                (pos!("e8"), pos!("f8")),
                (pos!("f1"), pos!("e1")),
                (pos!("f8"), pos!("e8")),
            ],
        );
        assert!(!game.legal_moves(pos!("e1")).contains(&pos!("g1")));
        assert!(!game.legal_moves(pos!("e1")).contains(&pos!("c1")));
    }
    #[test]
    fn no_castling_with_a_moved_rook() {
        let mut game = load("r3k2r/8/8/8/8/8/8/R3K2R");
        play(
            &mut game,
            &[
                (pos!("h1"), pos!("h2")),
                (pos!("a8"), pos!("a7")),
                (pos!("h2"), pos!("h1")),
                (pos!("a7"), pos!("a8")),
            ],
        );
        let moves = game.legal_moves(pos!("e1"));
        assert!(!moves.contains(&pos!("g1")));
        assert!(moves.contains(&pos!("c1")));
        assert_eq!(
            game.move_piece(pos!("e1"), pos!("g1")),
            Err(GameError::InvalidMove(InvalidMove::Illegal))
        );

        game.move_piece(pos!("h1"), pos!("h2")).unwrap();
        let moves = game.legal_moves(pos!("e8"));
        assert!(moves.contains(&pos!("g8")));
        assert!(!moves.contains(&pos!("c8")));
    }
    #[test]
    fn no_castling_through_pieces() {
        let game = load("4k3/8/8/8/8/8/8/R3KB1R");
        let moves = game.legal_moves(pos!("e1"));
        assert!(!moves.contains(&pos!("g1")));
        assert!(moves.contains(&pos!("c1")));
    }
    #[test]
    fn no_castling_out_of_through_or_into_check() {
        let game = load("4kr2/8/8/8/8/8/8/R3K2R");
        let moves = game.legal_moves(pos!("e1"));
        assert!(!moves.contains(&pos!("g1")));
        assert!(moves.contains(&pos!("c1")));

        let game = load("4k1r1/8/8/8/8/8/8/R3K2R");
        assert!(!game.legal_moves(pos!("e1")).contains(&pos!("g1")));

        let game = load("r3k1r1/8/8/8/8/8/8/R3K2R");
        assert!(!game.legal_moves(pos!("e1")).contains(&pos!("g1")));

        let game = load("4r1k1/8/8/8/8/8/8/R3K2R");
        assert_eq!(game.status(), Status::Check);
        let moves = game.legal_moves(pos!("e1"));
        assert!(!moves.contains(&pos!("g1")));
        assert!(!moves.contains(&pos!("c1")));
    }
    #[test]
    fn pawns_guard_castling_squares() {
        let game = load("4k3/8/8/8/8/8/6p1/R3K2R");
        assert!(!game.legal_moves(pos!("e1")).contains(&pos!("g1")));

        let game = load("4k3/8/8/8/8/8/p7/R3K2R");
        assert!(game.legal_moves(pos!("e1")).contains(&pos!("c1")));
    }
    #[test]
    fn promotion_suspends_the_turn() {
        let mut game = load("8/4P3/8/8/8/8/k7/4K3");
        let status = game.move_piece(pos!("e7"), pos!("e8")).unwrap();
        assert_eq!(status, Status::Promoting);
        assert_eq!(game.current_team(), Team::White);
        assert_eq!(game.pending_promotion(), Some((pos!("e8"), Team::White)));
        assert_eq!(
            game.move_piece(pos!("e1"), pos!("d1")),
            Err(GameError::InvalidMove(InvalidMove::MustPromoteFirst))
        );
        assert_eq!(
            game.move_piece(pos!("a2"), pos!("a3")),
            Err(GameError::InvalidMove(InvalidMove::MustPromoteFirst))
        );

        let status = game.promote_str("Q").unwrap();
        assert_eq!(status, Status::Ongoing);
        assert_eq!(
            game.board().get(pos!("e8")),
            Some(Piece::new(Team::White, PieceKind::Queen))
        );
        assert_eq!(game.current_team(), Team::Black);
        assert_eq!(game.pending_promotion(), None);
        game.move_piece(pos!("a2"), pos!("a3")).unwrap();
    }
    #[test]
    fn promotion_choice_is_validated() {
        let mut game = load("8/4P3/8/8/8/8/k7/4K3");
        assert_eq!(
            game.promote(PieceKind::Queen),
            Err(GameError::InvalidMove(InvalidMove::NothingToPromote))
        );
        game.move_piece(pos!("e7"), pos!("e8")).unwrap();
        assert_eq!(
            game.promote(PieceKind::King),
            Err(GameError::InvalidInput(InvalidInput::PromotionChoice(
                "k".to_owned()
            )))
        );
        assert_eq!(
            game.promote_str("x"),
            Err(GameError::InvalidInput(InvalidInput::PromotionChoice(
                "x".to_owned()
            )))
        );
        assert_eq!(game.status(), Status::Promoting);
        assert_eq!(game.promote(PieceKind::Knight), Ok(Status::Ongoing));
    }
    #[test]
    fn black_promotes_on_the_first_rank() {
        let mut game = load("4k3/8/8/8/8/8/3p4/K7 b");
        game.move_piece(pos!("d2"), pos!("d1")).unwrap();
        assert_eq!(game.status(), Status::Promoting);
        let status = game.promote(PieceKind::Rook).unwrap();
        assert_eq!(status, Status::Check);
        assert_eq!(game.current_team(), Team::White);
    }
    #[test]
    fn stalemate() {
        let mut game = load("7k/8/5QK1/8/8/8/8/8");
        let status = game.move_piece(pos!("f6"), pos!("f7")).unwrap();
        assert_eq!(status, Status::Stalemate);
        assert_eq!(game.legal_move_count(), 0);
        assert_eq!(
            game.move_piece(pos!("h8"), pos!("g8")),
            Err(GameError::GameEnded(Status::Stalemate))
        );
    }
    #[test]
    fn scholars_mate() {
        let mut game = Game::standard();
        play(
            &mut game,
            &[
                (pos!("e2"), pos!("e4")),
                (pos!("e7"), pos!("e5")),
                (pos!("f1"), pos!("c4")),
                (pos!("b8"), pos!("c6")),
                (pos!("d1"), pos!("h5")),
                (pos!("g8"), pos!("f6")),
            ],
        );
        let status = game.move_piece(pos!("h5"), pos!("f7")).unwrap();
        assert_eq!(status, Status::Checkmate);
        assert_eq!(game.legal_move_count(), 0);
        let before = game.clone();
        assert_eq!(
            game.move_piece(pos!("e8"), pos!("f7")),
            Err(GameError::GameEnded(Status::Checkmate))
        );
        assert_eq!(game, before);
    }
    #[test]
    fn check_that_can_be_blocked_is_not_mate() {
        let mut game = load("6k1/5ppp/2b5/8/8/8/8/R5K1");
        let status = game.move_piece(pos!("a1"), pos!("a8")).unwrap();
        assert_eq!(status, Status::Check);
        assert!(game.legal_moves(pos!("g8")).is_empty());
        assert_eq!(game.legal_move_count(), 2);
    }
    #[test]
    fn starting_status_is_evaluated() {
        assert_eq!(load("7k/5Q2/6K1/8/8/8/8/8 b").status(), Status::Stalemate);
        assert_eq!(load("R5k1/5ppp/8/8/8/8/8/6K1 b").status(), Status::Checkmate);
    }
    #[test]
    fn last_move_is_remembered() {
        let mut game = Game::standard();
        assert_eq!(game.last_move(), None);
        game.move_piece(pos!("g1"), pos!("f3")).unwrap();
        assert_eq!(
            game.last_move().map(|movement| movement.to_string()),
            Some("G1F3".to_owned())
        );
    }
    #[test]
    fn board_view_matches_notation() {
        let game = Game::standard();
        assert_eq!(game.board(), &Board::standard());
    }
}
