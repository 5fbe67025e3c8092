use std::time::{Duration, Instant};

use crate::error::{EngineError, Result};
use crate::rules::{Color, MoveGuard, Rules};
use crate::search::eval::{evaluate, Score, INFINITY};

/// Which side a leaf evaluation is scored for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Perspective {
    /// The raw evaluation of whoever is to move at the leaf, unchanged.
    #[default]
    SideToMove,
    /// Scores are from the maximizing side's point of view: a leaf where the
    /// opponent is to move has its evaluation negated.
    RootMover,
}

impl std::str::FromStr for Perspective {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "side" | "side-to-move" => Ok(Perspective::SideToMove),
            "root" | "root-mover" => Ok(Perspective::RootMover),
            _ => Err(format!("unknown perspective {s:?}: use 'side' or 'root'")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// Plies searched below each root move. Every extra ply multiplies the work by
    /// the branching factor (~30-40 in middlegames).
    pub depth: u32,
    pub perspective: Perspective,
    /// Disable to run plain full-width minimax.
    pub alpha_beta: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { depth: 3, perspective: Perspective::SideToMove, alpha_beta: true }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    pub best: M,
    pub score: Score,
    pub nodes: u64,
    pub elapsed: Duration,
}

#[derive(Default)]
pub struct Searcher {
    params: SearchParams,
    nodes: u64,
}

impl Searcher {
    pub fn new(params: SearchParams) -> Self {
        Self { params, nodes: 0 }
    }

    /// Nodes visited since the last `best_move` (or since construction).
    pub fn nodes(&self) -> u64 { self.nodes }

    /// Minimax value of the current position, `depth` plies deep.
    ///
    /// `maximizing` says whether the side to move is the maximizer. The board is
    /// returned to its entry state before this returns, including on error.
    pub fn search<R: Rules + ?Sized>(
        &mut self,
        rules: &mut R,
        depth: u32,
        alpha: Score,
        beta: Score,
        maximizing: bool,
    ) -> Result<Score> {
        let stm = rules.side_to_move();
        let maximizer = if maximizing { stm } else { !stm };
        self.alphabeta(rules, depth, alpha, beta, maximizing, maximizer)
    }

    fn alphabeta<R: Rules + ?Sized>(
        &mut self,
        rules: &mut R,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
        maximizer: Color,
    ) -> Result<Score> {
        self.nodes += 1;
        if depth == 0 {
            return self.leaf_score(rules, maximizer);
        }
        // One generation per node: an empty list is mate or stalemate.
        let moves = rules.legal_moves();
        if moves.is_empty() || rules.is_rule_draw() {
            return self.leaf_score(rules, maximizer);
        }

        let mut best = if maximizing { -INFINITY } else { INFINITY };
        for mv in moves {
            let mut guard = MoveGuard::apply(rules, mv)?;
            let child = self.alphabeta(&mut *guard, depth - 1, alpha, beta, !maximizing, maximizer);
            guard.undo()?;
            let score = child?;

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if self.params.alpha_beta && beta <= alpha {
                break;
            }
        }
        Ok(best)
    }

    fn leaf_score<R: Rules + ?Sized>(&self, rules: &mut R, maximizer: Color) -> Result<Score> {
        let raw = evaluate(rules)?;
        Ok(match self.params.perspective {
            Perspective::SideToMove => raw,
            Perspective::RootMover if rules.side_to_move() == maximizer => raw,
            Perspective::RootMover => -raw,
        })
    }

    /// Picks the move to play: each root move is scored by a full-window search of
    /// the opponent's replies, and the first move with the highest score wins.
    pub fn best_move<R: Rules + ?Sized>(&mut self, rules: &mut R) -> Result<SearchResult<R::Move>> {
        let start = Instant::now();
        self.nodes = 0;
        let moves = rules.legal_moves();
        if moves.is_empty() {
            let outcome = rules.outcome().ok_or_else(|| EngineError::contract("no legal moves but game not over"))?;
            return Err(EngineError::TerminalPosition { outcome });
        }

        let mut best: Option<(R::Move, Score)> = None;
        for mv in moves {
            let mut guard = MoveGuard::apply(rules, mv)?;
            let child = self.search(&mut *guard, self.params.depth, -INFINITY, INFINITY, false);
            guard.undo()?;
            let score = child?;
            log::debug!("root {mv}: {score}");
            // Strict comparison keeps the earliest of equally scored moves.
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
        }

        let (best, score) = best.ok_or_else(|| EngineError::contract("root move list emptied during search"))?;
        let elapsed = start.elapsed();
        log::debug!(
            "bestmove {best} score {score} depth {} nodes {} elapsed {:.3}s",
            self.params.depth,
            self.nodes,
            elapsed.as_secs_f64()
        );
        Ok(SearchResult { best, score, nodes: self.nodes, elapsed })
    }
}
