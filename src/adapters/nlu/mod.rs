//! Language-understanding collaborator adapters.
//!
//! `keyword` is the deterministic production fallback; `scripted` is a
//! test double that replays queued results.

pub mod keyword;
pub mod scripted;

pub use keyword::{KeywordDataExtractor, KeywordIntentClassifier};
pub use scripted::{ScriptedClassifier, ScriptedExtractor};
