//! The single live game: one board plus the searcher that plays on it.

use serde::Serialize;

use crate::board::Board;
use crate::error::{Outcome, Result};
use crate::rules::{Color, PlayedMove, Rules};
use crate::search::{SearchParams, Searcher};

/// Where a game starts: an optional FEN (standard start otherwise) followed by
/// moves in long algebraic notation.
#[derive(Debug, Clone, Default)]
pub struct StartPosition {
    pub fen: Option<String>,
    pub moves: Vec<String>,
}

impl StartPosition {
    pub fn build(&self) -> Result<Board> {
        let mut board = match self.fen.as_deref() {
            Some(fen) => Board::from_fen(fen)?,
            None => Board::startpos(),
        };
        for m in &self.moves {
            board.make_move_uci(m)?;
        }
        Ok(board)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionSnapshot {
    pub fen: String,
    pub side_to_move: Color,
    pub in_check: bool,
    pub game_over: bool,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone)]
pub struct MoveReport {
    pub played: PlayedMove,
    pub uci: String,
    /// Nodes the search visited to choose this move.
    pub nodes: u64,
}

pub struct Game {
    board: Board,
    searcher: Searcher,
    start: StartPosition,
}

impl Game {
    pub fn new(start: StartPosition, params: SearchParams) -> Result<Self> {
        let board = start.build()?;
        Ok(Self { board, searcher: Searcher::new(params), start })
    }

    pub fn board(&self) -> &Board { &self.board }

    /// Searches the current position and commits the chosen move to the board.
    pub fn play_best_move(&mut self) -> Result<MoveReport> {
        let result = self.searcher.best_move(&mut self.board)?;
        let played = self.board.move_squares(result.best)?;
        let uci = result.best.to_string();
        self.board.apply_move(result.best)?;
        log::info!(
            "played {} -> {} ({uci}) score {} nodes {} in {:.3}s, now {}",
            played.from,
            played.to,
            result.score,
            result.nodes,
            result.elapsed.as_secs_f64(),
            self.board.fen()
        );
        Ok(MoveReport { played, uci, nodes: result.nodes })
    }

    pub fn snapshot(&self) -> PositionSnapshot {
        let outcome = self.board.outcome();
        PositionSnapshot {
            fen: self.board.fen(),
            side_to_move: self.board.side_to_move(),
            in_check: self.board.is_in_check(),
            game_over: self.board.is_game_over(),
            outcome,
        }
    }

    /// Plays a move given in long algebraic notation, as chosen by someone other than the searcher.
    pub fn play_uci(&mut self, uci: &str) -> Result<()> {
        self.board.make_move_uci(uci)
    }

    /// Back to the configured starting position.
    pub fn reset(&mut self) -> Result<()> {
        self.board = self.start.build()?;
        Ok(())
    }
}
