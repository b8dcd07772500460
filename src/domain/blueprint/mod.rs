//! Service blueprints: declarative descriptions of conversational services.
//!
//! A blueprint lists the typed fields to collect in order, the visibility
//! conditions between them, the plugin instances wired into lifecycle
//! hooks, and the service's language policy.

mod blueprint;
mod condition;
mod field;
mod language;
mod plugin;

pub use blueprint::ServiceBlueprint;
pub use condition::{Condition, Visibility};
pub use field::{FieldDefinition, FieldType, ValidationRule};
pub use language::{LanguageMode, LanguagePolicy, LanguageViolation};
pub use plugin::{HookKind, PluginConfig, ServiceHooks};
