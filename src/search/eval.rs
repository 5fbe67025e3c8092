use crate::error::Result;
use crate::rules::{MoveGuard, Rules};

pub type Score = i32;

/// Bound used as +infinity; `-INFINITY` stays clear of overflow on negation.
pub const INFINITY: Score = Score::MAX;

/// Mobility differential for the side to move: every legal move counts +1, except
/// moves that give check, which count -1. With M legal moves of which C give check,
/// the score is `(M - C) - C`.
pub fn evaluate<R: Rules + ?Sized>(rules: &mut R) -> Result<Score> {
    let moves = rules.legal_moves();
    let total = moves.len() as Score;
    let mut checks: Score = 0;
    for mv in moves {
        let guard = MoveGuard::apply(rules, mv)?;
        let gives_check = guard.is_in_check();
        guard.undo()?;
        if gives_check {
            checks += 1;
        }
    }
    Ok((total - checks) - checks)
}
