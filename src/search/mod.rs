pub mod alphabeta;
pub mod eval;

pub use alphabeta::{Perspective, SearchParams, SearchResult, Searcher};
pub use eval::{evaluate, Score, INFINITY};
