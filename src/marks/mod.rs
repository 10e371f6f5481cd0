pub mod controller;
pub mod session;
pub mod state;

pub use controller::{MarkController, PressOutcome};
pub use session::serve;
pub use state::MarkState;
