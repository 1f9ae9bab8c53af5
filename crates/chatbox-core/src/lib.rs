pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod state;

// Re-export main types for convenience
pub use backend::{ChatBackend, ChatRequest, ChatResponse, HttpChatBackend};
pub use config::{Config, DEFAULT_ENDPOINT};
pub use controller::{ChatController, ControllerState, SubmitOutcome, FALLBACK_MESSAGE};
pub use error::ChatError;
pub use state::{Message, Origin, Transcript};
