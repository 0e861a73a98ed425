// Chess play session: rules oracle glue, move gate, synthetic opponent and board views
pub mod arena;
pub mod board;
pub mod config;
pub mod console;
pub mod error;
pub mod gate;
pub mod opponent;
pub mod scheduler;
pub mod session;
pub mod view;

pub use board::{GameStatus, LegalMove, MoveRequest, Position};
pub use config::SessionConfig;
pub use error::{MoveError, PositionError};
pub use gate::attempt_move;
pub use opponent::{choose_move, OpponentPolicy};
pub use scheduler::SessionHandle;
pub use session::Session;
