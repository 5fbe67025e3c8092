use cozy_chess::{Board as CozyBoard, Color as CozyColor, File, GameStatus, Move, Piece, Square};

use crate::error::{EngineError, Result};
use crate::rules::{Color, PlayedMove, Rules};

/// cozy-chess board with an undo stack of prior boards.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    history: Vec<CozyBoard>,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default(), history: Vec::with_capacity(128) }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        CozyBoard::from_fen(fen, false)
            .map(|b| Self { board: b, history: Vec::with_capacity(128) })
            .map_err(|e| EngineError::InvalidFen(format!("{fen}: {e:?}")))
    }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<()> {
        match self.find_move(mv_uci) {
            Some(m) => self.apply_move(m),
            None => Err(EngineError::IllegalMove(mv_uci.to_string())),
        }
    }

    /// Plies applied since construction that have not been undone.
    pub fn depth(&self) -> usize { self.history.len() }

    /// cozy-chess writes castling as king-takes-rook (`e1h1`); this is the
    /// square the king actually lands on (`g1`).
    fn castle_target(&self, mv: Move) -> Option<Square> {
        let us = self.board.side_to_move();
        if self.board.piece_on(mv.from) != Some(Piece::King) || self.board.color_on(mv.to) != Some(us) {
            return None;
        }
        let file = if mv.to.file() > mv.from.file() { File::G } else { File::C };
        Some(Square::new(file, mv.from.rank()))
    }

    /// Long algebraic notation with castling as a king move.
    fn standard_uci(&self, mv: Move) -> String {
        match self.castle_target(mv) {
            Some(to) => format!("{}{}", mv.from, to),
            None => mv.to_string(),
        }
    }
}

impl Rules for Position {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|ml| { moves.extend(ml); false });
        moves
    }

    fn apply_move(&mut self, mv: Move) -> Result<()> {
        let mut next = self.board.clone();
        next.try_play(mv).map_err(|e| EngineError::contract(format!("cozy rejected {mv}: {e:?}")))?;
        self.history.push(std::mem::replace(&mut self.board, next));
        Ok(())
    }

    fn undo_move(&mut self) -> Result<()> {
        let prev = self.history.pop().ok_or_else(|| EngineError::contract("undo with empty move stack"))?;
        self.board = prev;
        Ok(())
    }

    fn is_in_check(&self) -> bool { !self.board.checkers().is_empty() }

    fn is_game_over(&self) -> bool { self.board.status() != GameStatus::Ongoing }

    fn is_rule_draw(&self) -> bool { self.board.halfmove_clock() >= 100 }

    fn side_to_move(&self) -> Color {
        match self.board.side_to_move() {
            CozyColor::White => Color::White,
            CozyColor::Black => Color::Black,
        }
    }

    fn fen(&self) -> String { format!("{}", self.board) }

    fn move_squares(&self, mv: Move) -> Result<PlayedMove> {
        PlayedMove::from_uci(&self.standard_uci(mv))
    }

    fn find_move(&self, uci: &str) -> Option<Move> {
        self.legal_moves().into_iter().find(|&m| m.to_string() == uci || self.standard_uci(m) == uci)
    }
}
