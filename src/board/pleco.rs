#![cfg(feature = "board-pleco")]
use pleco::{BitMove, Board as PlecoBoard, Player};

use crate::error::{EngineError, Result};
use crate::rules::{Color, Rules};

/// pleco board driven by make/unmake. The stack mirrors pleco's own history so an
/// unbalanced undo is reported instead of corrupting the board.
pub struct RevBoard {
    board: PlecoBoard,
    stack: Vec<BitMove>,
}

impl RevBoard {
    pub fn from_fen(fen: &str) -> Result<Self> {
        PlecoBoard::from_fen(fen)
            .map(|b| Self { board: b, stack: Vec::with_capacity(128) })
            .map_err(|e| EngineError::InvalidFen(format!("{fen}: {e:?}")))
    }

    pub fn startpos() -> Self { Self { board: PlecoBoard::start_pos(), stack: Vec::with_capacity(128) } }

    pub fn inner(&self) -> &PlecoBoard { &self.board }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<()> {
        match self.find_move(mv_uci) {
            Some(m) => self.apply_move(m),
            None => Err(EngineError::IllegalMove(mv_uci.to_string())),
        }
    }

    pub fn depth(&self) -> usize { self.stack.len() }
}

impl Rules for RevBoard {
    type Move = BitMove;

    fn legal_moves(&self) -> Vec<BitMove> { self.board.generate_moves().iter().copied().collect() }

    fn apply_move(&mut self, mv: BitMove) -> Result<()> {
        // pleco's apply_move trusts its caller
        if !(self.board.pseudo_legal_move(mv) && self.board.legal_move(mv)) {
            return Err(EngineError::contract(format!("pleco asked to play illegal move {mv}")));
        }
        self.board.apply_move(mv);
        self.stack.push(mv);
        Ok(())
    }

    fn undo_move(&mut self) -> Result<()> {
        if self.stack.pop().is_none() {
            return Err(EngineError::contract("undo with empty move stack"));
        }
        self.board.undo_move();
        Ok(())
    }

    fn is_in_check(&self) -> bool { self.board.in_check() }

    fn is_game_over(&self) -> bool { self.is_rule_draw() || self.board.generate_moves().is_empty() }

    fn is_rule_draw(&self) -> bool { self.board.rule_50() >= 100 }

    fn side_to_move(&self) -> Color {
        if self.board.turn() == Player::White { Color::White } else { Color::Black }
    }

    fn fen(&self) -> String { self.board.fen() }
}
