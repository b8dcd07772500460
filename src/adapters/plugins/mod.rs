//! Built-in lifecycle plugins and the manifest that registers them.

pub mod default_values;
pub mod manifest;
pub mod reference_number;

pub use default_values::DefaultValuesPlugin;
pub use manifest::{ManifestError, PluginManifest};
pub use reference_number::ReferenceNumberPlugin;
