mod state;

pub use state::{AppState, Dashboard};
