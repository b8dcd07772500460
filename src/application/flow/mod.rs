//! Message-handling flow: controller, hook orchestration, guards.

mod controller;
mod error;
mod hooks;
mod language_guard;
mod locks;

pub use controller::{FlowController, TurnRequest, TurnResponse};
pub use error::FlowError;
pub use hooks::{HookOutcome, PluginOrchestrator};
pub use language_guard::{check, GuardFlow};
pub use locks::ConversationLocks;
