//! Plugin issuing a confirmation reference on completion.
//!
//! Runs at `onConversationComplete` and records a reference like
//! `REF-3F2A9C41` in the conversation metadata. The prefix is
//! configurable per instance via `{ "prefix": "PARK" }`.

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::domain::foundation::PluginTypeId;
use crate::ports::{HookContext, HookOutput, Plugin, PluginError};

pub const TYPE_ID: &str = "reference-number";

const DEFAULT_PREFIX: &str = "REF";

/// Issues a unique reference number for the finished request.
#[derive(Default)]
pub struct ReferenceNumberPlugin;

impl ReferenceNumberPlugin {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Plugin for ReferenceNumberPlugin {
    fn type_id(&self) -> PluginTypeId {
        PluginTypeId::new(TYPE_ID)
    }

    async fn on_conversation_complete(
        &self,
        ctx: &HookContext,
    ) -> Result<HookOutput, PluginError> {
        let prefix = ctx
            .config
            .get("prefix")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_PREFIX);

        let token = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        let reference = format!("{}-{}", prefix, token);

        Ok(HookOutput::none().with_metadata(json!({ "reference": reference })))
    }
}
