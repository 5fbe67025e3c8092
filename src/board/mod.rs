//! Rules-engine backends. `pleco` (make/unmake) is the default; `cozy-chess`
//! (copy-make with a board stack) is used when the `board-pleco` feature is off.

pub mod cozy;
pub mod pleco;

#[cfg(feature = "board-pleco")]
pub type Board = self::pleco::RevBoard;
#[cfg(not(feature = "board-pleco"))]
pub type Board = self::cozy::Position;
