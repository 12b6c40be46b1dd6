//! HTTP handlers for the chat server

pub mod messages;
pub mod participants;
pub mod status;

// Participant handlers
pub use participants::{list_participants, register_participant};

// Message handlers
pub use messages::{get_messages, post_message};

// Keep-alive
pub use status::post_status;
