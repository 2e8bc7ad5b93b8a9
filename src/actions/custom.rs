//! Raw message editing and the catch-all for anything unrecognized.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    check_json_object, Action, ActionContext, ActionError, ActionKey, ActionResult, Decoded,
    FieldError,
};
use crate::codec::{CodecError, WireMessage};

/// Custom form data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomData {
    /// One wire message as JSON text
    pub message: String,
}

/// Accepts any single message and edits it as JSON text.
///
/// Must be registered last: it never declines.
#[derive(Clone, Copy, Debug, Default)]
pub struct Custom;

impl Action for Custom {
    type Data = CustomData;

    fn key(&self) -> ActionKey {
        ActionKey::Custom
    }

    fn label(&self) -> &'static str {
        "Custom"
    }

    fn icon(&self) -> &'static str {
        "🤖"
    }

    fn default_data(&self, _ctx: &ActionContext) -> CustomData {
        CustomData {
            message: "{}".to_string(),
        }
    }

    fn validate(&self, _ctx: &ActionContext, data: &CustomData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_json_object(&mut errors, "message", &data.message);
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&data.message) {
            if map.is_empty() {
                errors.push(FieldError::new("message", "message is empty"));
            }
        }
        errors
    }

    fn encode(&self, _ctx: &ActionContext, data: &CustomData) -> ActionResult<Vec<WireMessage>> {
        let value: Value = serde_json::from_str(&data.message)
            .map_err(|e| ActionError::invalid(self.key(), format!("message: {e}")))?;
        Ok(vec![WireMessage::from_json(value)?])
    }

    fn decode(
        &self,
        _ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<CustomData>>> {
        let Some(msg) = msgs.first() else {
            return Ok(None);
        };
        let message = serde_json::to_string_pretty(&msg.to_json()?)
            .map_err(|e| CodecError::Json(e.to_string()))?;
        Ok(Some(Decoded::single(CustomData { message })))
    }

    fn is_catch_all(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::ctx;
    use serde_json::json;

    #[test]
    fn test_preserves_unknown_category() {
        let ctx = ctx();
        let original = WireMessage::from_json(json!({
            "ibc": {"transfer": {"channel_id": "channel-1", "to_address": "osmo1x"}}
        }))
        .unwrap();

        let decoded = Custom.decode(&ctx, &[original.clone()]).unwrap().unwrap();
        assert_eq!(decoded.consumed, 1);
        let msgs = Custom.encode(&ctx, &decoded.data).unwrap();
        assert_eq!(msgs, vec![original]);
    }

    #[test]
    fn test_canonicalizes_whitespace() {
        let ctx = ctx();
        let data = CustomData {
            message: "{\"custom\":{\"noop\":{}}}".to_string(),
        };
        let msgs = Custom.encode(&ctx, &data).unwrap();
        let decoded = Custom.decode(&ctx, &msgs).unwrap().unwrap().data;
        assert_ne!(decoded.message, data.message);
        assert_eq!(Custom.encode(&ctx, &decoded).unwrap(), msgs);
    }

    #[test]
    fn test_declines_only_when_empty() {
        assert!(Custom.decode(&ctx(), &[]).unwrap().is_none());
        assert!(Custom.is_catch_all());
    }

    #[test]
    fn test_bad_json_is_invalid_data() {
        let ctx = ctx();
        let data = CustomData {
            message: "{".to_string(),
        };
        assert_eq!(Custom.validate(&ctx, &data).len(), 1);
        assert!(matches!(
            Custom.encode(&ctx, &data),
            Err(ActionError::InvalidData { .. })
        ));
        assert_eq!(Custom.validate(&ctx, &Custom.default_data(&ctx)).len(), 1);
    }
}
