//! HTTP request/response shapes.

use serde::{Deserialize, Serialize};

use crate::application::flow::TurnResponse;
use crate::domain::blueprint::ServiceBlueprint;
use crate::domain::foundation::{BlueprintId, ConversationId, SlotMap};

/// `POST /api/conversations/messages` body.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// Absent on the first message of a new conversation.
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
    pub text: String,
}

/// One conversation turn as returned to the client.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub conversation_id: ConversationId,
    pub text: String,
    pub is_complete: bool,
    pub data: SlotMap,
}

impl From<TurnResponse> for MessageResponse {
    fn from(turn: TurnResponse) -> Self {
        Self {
            conversation_id: turn.conversation_id,
            text: turn.text,
            is_complete: turn.is_complete,
            data: turn.data,
        }
    }
}

/// Catalog entry for `GET /api/blueprints`.
#[derive(Debug, Serialize)]
pub struct BlueprintSummary {
    pub id: BlueprintId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub field_count: usize,
}

impl From<&ServiceBlueprint> for BlueprintSummary {
    fn from(blueprint: &ServiceBlueprint) -> Self {
        Self {
            id: blueprint.id.clone(),
            name: blueprint.name.clone(),
            description: blueprint.description.clone(),
            field_count: blueprint.fields.len(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blueprint::{FieldDefinition, FieldType};

    #[test]
    fn message_request_parses_without_conversation_id() {
        let request: MessageRequest = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert!(request.conversation_id.is_none());
        assert_eq!(request.text, "hello");
    }

    #[test]
    fn blueprint_summary_counts_fields() {
        let blueprint = ServiceBlueprint::new(
            "parking-permit",
            "Parking Permit",
            vec![
                FieldDefinition::new("a", "A?", FieldType::Text),
                FieldDefinition::new("b", "B?", FieldType::Text),
            ],
        );
        let summary = BlueprintSummary::from(&blueprint);
        assert_eq!(summary.field_count, 2);
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("description").is_none());
    }
}
