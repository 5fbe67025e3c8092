#![allow(dead_code)]
//! A synthetic game tree that implements `Rules`, so search properties can be
//! checked against exactly known evaluations.

use std::cell::Cell;
use std::fmt;

use alphabot::rules::{Color, Rules};
use alphabot::{EngineError, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub children: Vec<usize>,
    /// Whether the side to move at this node is in check.
    pub in_check: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeMove(pub usize);

impl fmt::Display for TreeMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + (self.0 % 8) as u8) as char;
        let rank = (self.0 / 8) % 8 + 1;
        write!(f, "a1{file}{rank}")
    }
}

#[derive(Clone, Debug)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub path: Vec<usize>,
    pub applied: u64,
    /// Make the n-th undo (0-based) fail.
    pub fail_undo_at: Option<u64>,
    undos: u64,
    /// Calls to `legal_moves`, including the ones behind `is_game_over`.
    pub generated: Cell<u64>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes, path: vec![0], applied: 0, fail_undo_at: None, undos: 0, generated: Cell::new(0) }
    }

    pub fn current(&self) -> usize {
        *self.path.last().expect("path never empty")
    }

    pub fn add(&mut self, parent: usize, in_check: bool) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node { children: Vec::new(), in_check });
        self.nodes[parent].children.push(id);
        id
    }

    /// Root with `moves` children, the first `checks` of which give check.
    pub fn fan(moves: usize, checks: usize) -> Self {
        let mut t = Tree::new(vec![Node::default()]);
        for i in 0..moves {
            t.add(0, i < checks);
        }
        t
    }

    /// Every node `height` levels deep has `branch` quiet children.
    pub fn uniform(branch: usize, height: usize) -> Self {
        let mut t = Tree::new(vec![Node::default()]);
        let mut frontier = vec![0usize];
        for _ in 0..height {
            let mut next = Vec::new();
            for &n in &frontier {
                for _ in 0..branch {
                    next.push(t.add(n, false));
                }
            }
            frontier = next;
        }
        t
    }

    /// Random tree `height` levels deep. Internal nodes have 0..=max_branch children,
    /// so terminal nodes turn up above the bottom as well.
    pub fn random(seed: u64, height: usize, max_branch: usize) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut t = Tree::new(vec![Node::default()]);
        let mut frontier = vec![0usize];
        for level in 0..height {
            let mut next = Vec::new();
            for &n in &frontier {
                let lo = if level == 0 { 1 } else { 0 };
                let k = rng.gen_range(lo..=max_branch);
                for _ in 0..k {
                    let c = t.add(n, rng.gen_bool(0.25));
                    next.push(c);
                }
            }
            frontier = next;
        }
        t
    }

    /// Raw evaluation `M - 2C` computed straight from the tree.
    pub fn eval_of(&self, node: usize) -> i32 {
        let kids = &self.nodes[node].children;
        let checks = kids.iter().filter(|&&c| self.nodes[c].in_check).count() as i32;
        kids.len() as i32 - 2 * checks
    }

    /// Plain minimax straight over the node graph, leaves scored for the side to move.
    pub fn reference_minimax(&self, node: usize, depth: u32, maximizing: bool) -> i32 {
        let kids = &self.nodes[node].children;
        if depth == 0 || kids.is_empty() {
            return self.eval_of(node);
        }
        let scores = kids.iter().map(|&c| self.reference_minimax(c, depth - 1, !maximizing));
        if maximizing { scores.max().unwrap() } else { scores.min().unwrap() }
    }
}

impl Rules for Tree {
    type Move = TreeMove;

    fn legal_moves(&self) -> Vec<TreeMove> {
        self.generated.set(self.generated.get() + 1);
        self.nodes[self.current()].children.iter().map(|&c| TreeMove(c)).collect()
    }

    fn apply_move(&mut self, mv: TreeMove) -> Result<()> {
        if !self.nodes[self.current()].children.contains(&mv.0) {
            return Err(EngineError::contract(format!("{} is not a child of {}", mv.0, self.current())));
        }
        self.path.push(mv.0);
        self.applied += 1;
        Ok(())
    }

    fn undo_move(&mut self) -> Result<()> {
        let n = self.undos;
        self.undos += 1;
        if self.fail_undo_at == Some(n) {
            return Err(EngineError::contract("injected undo failure"));
        }
        if self.path.len() == 1 {
            return Err(EngineError::contract("undo at root"));
        }
        self.path.pop();
        Ok(())
    }

    fn is_in_check(&self) -> bool {
        self.nodes[self.current()].in_check
    }

    // Generates like a real backend would, so redundant terminal checks show up in `generated`.
    fn is_game_over(&self) -> bool {
        self.legal_moves().is_empty()
    }

    fn side_to_move(&self) -> Color {
        if self.path.len() % 2 == 1 { Color::White } else { Color::Black }
    }

    fn fen(&self) -> String {
        format!("node {}", self.current())
    }
}
