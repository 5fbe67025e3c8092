//! The capability set the search consumes from a chess rules engine.
//!
//! Backends live in [`crate::board`]; tests plug in synthetic trees.

use std::fmt;
use std::ops::{Deref, DerefMut, Not};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Outcome, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// The two squares of a committed move, as sent back to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub from: String,
    pub to: String,
}

impl PlayedMove {
    /// Splits a long-algebraic move (`e2e4`, `e7e8q`) into its squares.
    pub fn from_uci(uci: &str) -> Result<Self> {
        match (uci.get(0..2), uci.get(2..4)) {
            (Some(from), Some(to)) => Ok(Self { from: from.to_string(), to: to.to_string() }),
            _ => Err(EngineError::contract(format!("malformed move token {uci:?}"))),
        }
    }
}

pub trait Rules {
    /// Opaque move token. `Display` must render long algebraic notation.
    type Move: Copy + Eq + fmt::Debug + fmt::Display;

    /// Every legal move for the side to move, in a stable order. Empty means terminal.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn apply_move(&mut self, mv: Self::Move) -> Result<()>;

    /// Reverses the most recent `apply_move`.
    fn undo_move(&mut self) -> Result<()>;

    /// Whether the side to move is in check.
    fn is_in_check(&self) -> bool;

    fn is_game_over(&self) -> bool;

    /// Drawn by rule (fifty-move) while moves remain. Must not generate moves.
    fn is_rule_draw(&self) -> bool {
        false
    }

    fn side_to_move(&self) -> Color;

    fn fen(&self) -> String;

    fn move_squares(&self, mv: Self::Move) -> Result<PlayedMove> {
        PlayedMove::from_uci(&mv.to_string())
    }

    fn find_move(&self, uci: &str) -> Option<Self::Move> {
        self.legal_moves().into_iter().find(|m| m.to_string() == uci)
    }

    fn outcome(&self) -> Option<Outcome> {
        if self.legal_moves().is_empty() {
            Some(if self.is_in_check() { Outcome::Checkmate } else { Outcome::Stalemate })
        } else if self.is_rule_draw() || self.is_game_over() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }
}

/// A move applied to a board that is undone when the guard goes away.
///
/// `undo` is the normal exit and reports a failed undo. If the guard is dropped
/// instead (an error propagated with `?`, or a panic unwinding through the search),
/// `Drop` undoes the move and logs a failure, so the board is never left a ply deep.
pub struct MoveGuard<'a, R: Rules + ?Sized> {
    rules: &'a mut R,
    armed: bool,
}

impl<'a, R: Rules + ?Sized> MoveGuard<'a, R> {
    pub fn apply(rules: &'a mut R, mv: R::Move) -> Result<Self> {
        rules.apply_move(mv)?;
        Ok(Self { rules, armed: true })
    }

    pub fn undo(mut self) -> Result<()> {
        self.armed = false;
        self.rules.undo_move()
    }
}

impl<R: Rules + ?Sized> Deref for MoveGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &*self.rules
    }
}

impl<R: Rules + ?Sized> DerefMut for MoveGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut *self.rules
    }
}

impl<R: Rules + ?Sized> Drop for MoveGuard<'_, R> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = self.rules.undo_move() {
                log::error!("failed to restore board while unwinding: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts plies; moves are never rejected.
    #[derive(Default)]
    struct Counter {
        depth: usize,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Tick;

    impl fmt::Display for Tick {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a1a2")
        }
    }

    impl Rules for Counter {
        type Move = Tick;
        fn legal_moves(&self) -> Vec<Tick> { vec![Tick] }
        fn apply_move(&mut self, _: Tick) -> Result<()> { self.depth += 1; Ok(()) }
        fn undo_move(&mut self) -> Result<()> {
            if self.depth == 0 { return Err(EngineError::contract("nothing to undo")); }
            self.depth -= 1;
            Ok(())
        }
        fn is_in_check(&self) -> bool { false }
        fn is_game_over(&self) -> bool { false }
        fn side_to_move(&self) -> Color { if self.depth % 2 == 0 { Color::White } else { Color::Black } }
        fn fen(&self) -> String { format!("ply {}", self.depth) }
    }

    #[test]
    fn guard_undo_restores() {
        let mut c = Counter::default();
        let g = MoveGuard::apply(&mut c, Tick).unwrap();
        assert_eq!(g.depth, 1);
        g.undo().unwrap();
        assert_eq!(c.depth, 0);
    }

    #[test]
    fn guard_drop_restores_on_early_exit() {
        fn fails(c: &mut Counter) -> Result<()> {
            let mut g = MoveGuard::apply(c, Tick)?;
            let _inner = MoveGuard::apply(&mut *g, Tick)?;
            Err(EngineError::contract("boom"))
        }
        let mut c = Counter::default();
        assert!(fails(&mut c).is_err());
        assert_eq!(c.depth, 0);
    }

    #[test]
    fn guard_drop_restores_on_panic() {
        let mut c = Counter::default();
        let r = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g = MoveGuard::apply(&mut c, Tick).unwrap();
            panic!("mid-search");
        }));
        assert!(r.is_err());
        assert_eq!(c.depth, 0);
    }

    #[test]
    fn played_move_from_uci() {
        assert_eq!(PlayedMove::from_uci("e7e8q").unwrap(), PlayedMove { from: "e7".into(), to: "e8".into() });
        assert!(PlayedMove::from_uci("e7").is_err());
    }

    #[test]
    fn color_flips() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!!Color::Black, Color::Black);
    }
}
