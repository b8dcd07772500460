//! Conversation state and workflow resolution.

mod conversation;
mod next_step;
mod state;

pub use conversation::{Conversation, ConversationMessage, ConversationStatus, MessageRole};
pub use next_step::{determine_next_step, NextStep};
pub use state::ConversationPhase;
