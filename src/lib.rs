pub mod core;
pub mod gateway;
pub mod matching;
pub mod research;
pub mod server;

// --- Primary core exports ---
pub use core::types;
pub use core::types::*;
pub use core::AppState;
pub use research::{ResearchError, Researcher};
