//! Response envelope
//!
//! Every non-binary response carries this wrapper. Absent fields are
//! omitted from the wire form, so a bare success is exactly `{"ok":true}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl Envelope {
    /// Success with no payload.
    pub const fn ok() -> Self {
        Self {
            ok: true,
            error: None,
            result: None,
        }
    }

    /// Success carrying a result payload.
    pub fn ok_with(result: serde_json::Value) -> Self {
        Self {
            ok: true,
            error: None,
            result: Some(result),
        }
    }

    /// Failure carrying a short error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_success_omits_optionals() {
        let json = serde_json::to_string(&Envelope::ok()).unwrap();
        assert_eq!(json, r#"{"ok":true}"#);
    }

    #[test]
    fn test_result_payload_is_embedded() {
        let json = serde_json::to_string(&Envelope::ok_with(json!(["a.txt", "b/"]))).unwrap();
        assert_eq!(json, r#"{"ok":true,"result":["a.txt","b/"]}"#);
    }

    #[test]
    fn test_error_shape() {
        let json = serde_json::to_string(&Envelope::error("disallowed path")).unwrap();
        assert_eq!(json, r#"{"ok":false,"error":"disallowed path"}"#);
    }

    #[test]
    fn test_roundtrip() {
        let envelope = Envelope::ok_with(json!({"count": 3}));
        let parsed: Envelope =
            serde_json::from_str(&serde_json::to_string(&envelope).unwrap()).unwrap();
        assert_eq!(parsed, envelope);
    }
}
