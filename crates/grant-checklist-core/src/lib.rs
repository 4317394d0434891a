pub mod api;
pub mod config;
pub mod error;
pub mod location;
pub mod state;
pub mod summary;
pub mod tab;
pub mod transcript;

// Re-export main types for convenience
pub use api::{ChatClient, ChatRequest, SummaryClient};
pub use config::Config;
pub use error::{ApiError, ConfigError};
pub use location::DocumentLocation;
pub use state::{ChatMessage, ChatRole};
pub use summary::{GrantSummary, LoadTicket, SummaryItem, SummaryPayload, SummaryView};
pub use tab::SummaryTab;
pub use transcript::{ChatState, Transcript, FALLBACK_REPLY, QUICK_REPLIES};
