pub mod cozy;

pub use cozy::{GameStatus, LegalMove, MoveRequest, Position};
