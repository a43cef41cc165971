//! Request and response envelopes.
//!
//! Outbound, every call carries the robot and competition identity plus an
//! action tag; episode, phase and message fields are only serialized when the
//! [`Request`] variant has them. Inbound, [`decode_envelope`] is the single
//! place where a raw JSON body is accepted or rejected.
//!
//! ```text
//! Request ──► RequestEnvelope ──► Transport
//!         ──► serde_json::Value ──► decode_envelope ──► ResponseEnvelope
//! ```

use serde::Serialize;
use serde_json::Value;

use super::types::{Action, ConnectionInfo, Request};
use crate::constants::EMPTY_TITLE;
use crate::error::{HubError, Result};

/// Response field names.
mod key {
    pub const SUCCESS: &str = "success";
    pub const MESSAGE: &str = "message";
    pub const ITEMS: &str = "items";
    pub const EPISODES: &str = "episodes";
    pub const STATUS: &str = "status";
    pub const TITLE: &str = "title";
}

/// Outbound JSON body.
///
/// Built per call and dropped after sending. Fields are private so the only
/// way to populate the optional ones is through a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestEnvelope<'a> {
    #[serde(rename = "RobotId")]
    robot_id: &'a str,
    #[serde(rename = "Competition")]
    competition: &'a str,
    #[serde(rename = "Action", skip_serializing_if = "Option::is_none")]
    action: Option<Action>,
    #[serde(rename = "Episode", skip_serializing_if = "Option::is_none")]
    episode: Option<u32>,
    #[serde(rename = "Phase", skip_serializing_if = "Option::is_none")]
    phase: Option<u32>,
    #[serde(rename = "Message", skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl<'a> RequestEnvelope<'a> {
    /// Identity-only envelope: `RobotId` and `Competition`.
    pub fn base(conn: &'a ConnectionInfo) -> Self {
        Self {
            robot_id: conn.robot_id(),
            competition: conn.competition_id(),
            action: None,
            episode: None,
            phase: None,
            message: None,
        }
    }

    /// Base envelope plus the `Action` tag.
    pub fn for_action(conn: &'a ConnectionInfo, action: Action) -> Self {
        Self {
            action: Some(action),
            ..Self::base(conn)
        }
    }

    /// Full envelope for a request, with only the fields its action uses.
    pub fn for_request(conn: &'a ConnectionInfo, request: &'a Request) -> Self {
        Self {
            episode: request.episode(),
            phase: request.phase(),
            message: request.message(),
            ..Self::for_action(conn, request.action())
        }
    }

    /// Action tag, if set.
    pub fn action(&self) -> Option<Action> {
        self.action
    }
}

/// Validated inbound envelope.
///
/// Holds the `success` flag and optional `message`; list payloads stay as
/// raw JSON until a caller asks for them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    success: bool,
    message: Option<String>,
    body: Value,
}

impl ResponseEnvelope {
    /// The hub's `success` flag, verbatim.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Optional `message` text.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Consumes the envelope, returning its `message`.
    pub fn into_message(self) -> Option<String> {
        self.message
    }

    /// Takes the raw `items` array.
    pub fn into_items(self) -> Result<Vec<Value>> {
        self.into_list(key::ITEMS)
    }

    /// Takes the raw `episodes` array.
    pub fn into_episodes(self) -> Result<Vec<Value>> {
        self.into_list(key::EPISODES)
    }

    fn into_list(self, field: &'static str) -> Result<Vec<Value>> {
        let Value::Object(mut map) = self.body else {
            return Err(HubError::missing("response", field));
        };
        match map.remove(field) {
            Some(Value::Array(list)) => Ok(list),
            Some(_) => Err(HubError::wrong_type("response", field)),
            None => Err(HubError::missing("response", field)),
        }
    }
}

/// Validates a raw response body.
///
/// - `success` present (and boolean): accepted.
/// - otherwise `status` present: [`HubError::Protocol`] with the optional `title`.
/// - otherwise: [`HubError::UnrecognizedResponse`] carrying the payload.
pub fn decode_envelope(raw: Value) -> Result<ResponseEnvelope> {
    if let Some(success) = raw.get(key::SUCCESS) {
        let Some(success) = success.as_bool() else {
            return Err(HubError::UnrecognizedResponse(raw));
        };
        let message = raw
            .get(key::MESSAGE)
            .filter(|m| !m.is_null())
            .map(render);
        log::trace!("decoded envelope: success={}", success);
        return Ok(ResponseEnvelope {
            success,
            message,
            body: raw,
        });
    }

    if let Some(status) = raw.get(key::STATUS) {
        let status = render(status);
        let title = raw
            .get(key::TITLE)
            .map_or_else(|| EMPTY_TITLE.to_string(), render);
        return Err(HubError::Protocol { status, title });
    }

    Err(HubError::UnrecognizedResponse(raw))
}

/// Strings as-is, anything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conn() -> ConnectionInfo {
        ConnectionInfo::new("http://hub.local/api/Hub", "robot-1", "ERL")
    }

    #[test]
    fn test_base_envelope_has_identity_only() {
        let conn = conn();
        let json = serde_json::to_value(RequestEnvelope::base(&conn)).unwrap();
        assert_eq!(json, json!({ "RobotId": "robot-1", "Competition": "ERL" }));
    }

    #[test]
    fn test_action_envelope_adds_tag() {
        let conn = conn();
        let json = serde_json::to_value(RequestEnvelope::for_action(&conn, Action::Ping)).unwrap();
        assert_eq!(
            json,
            json!({ "RobotId": "robot-1", "Competition": "ERL", "Action": "PING" })
        );
    }

    #[test]
    fn test_request_envelopes_omit_inapplicable_fields() {
        let conn = conn();
        let cases = [
            (Request::Ping, vec![]),
            (Request::Episodes, vec![]),
            (Request::StartEpisode { episode: 4 }, vec!["Episode"]),
            (Request::StopEpisode { episode: 4 }, vec!["Episode"]),
            (Request::Items { episode: 4, phase: 1 }, vec!["Episode", "Phase"]),
            (Request::StartPhase { episode: 4, phase: 1 }, vec!["Episode", "Phase"]),
            (Request::StopPhase { episode: 4, phase: 1 }, vec!["Episode", "Phase"]),
            (
                Request::Info {
                    episode: 4,
                    phase: 1,
                    message: "hi".to_string(),
                },
                vec!["Episode", "Phase", "Message"],
            ),
        ];

        for (request, extra) in cases {
            let json = serde_json::to_value(RequestEnvelope::for_request(&conn, &request)).unwrap();
            let obj = json.as_object().unwrap();
            assert_eq!(obj["RobotId"], "robot-1");
            assert_eq!(obj["Competition"], "ERL");
            assert_eq!(obj["Action"], request.action().as_str());

            let mut keys: Vec<&str> = obj
                .keys()
                .map(String::as_str)
                .filter(|k| !matches!(*k, "RobotId" | "Competition" | "Action"))
                .collect();
            keys.sort_unstable();
            let mut expected = extra.clone();
            expected.sort_unstable();
            assert_eq!(keys, expected, "unexpected fields for {:?}", request);
        }
    }

    #[test]
    fn test_info_envelope_values() {
        let conn = conn();
        let request = Request::Info {
            episode: 4,
            phase: 1,
            message: "Hello world".to_string(),
        };
        let json = serde_json::to_value(RequestEnvelope::for_request(&conn, &request)).unwrap();
        assert_eq!(
            json,
            json!({
                "RobotId": "robot-1",
                "Competition": "ERL",
                "Action": "INFO",
                "Episode": 4,
                "Phase": 1,
                "Message": "Hello world"
            })
        );
    }

    #[test]
    fn test_decode_success_envelope() {
        let env = decode_envelope(json!({ "success": false, "message": "nope" })).unwrap();
        assert!(!env.success());
        assert_eq!(env.message(), Some("nope"));
    }

    #[test]
    fn test_decode_renders_non_string_message() {
        let env = decode_envelope(json!({ "success": false, "message": 123 })).unwrap();
        assert_eq!(env.message(), Some("123"));

        let env = decode_envelope(json!({ "success": false, "message": { "code": 7 } })).unwrap();
        assert_eq!(env.message(), Some(r#"{"code":7}"#));

        let env = decode_envelope(json!({ "success": false, "message": null })).unwrap();
        assert_eq!(env.message(), None);
    }

    #[test]
    fn test_decode_success_wins_over_status() {
        let env = decode_envelope(json!({ "success": true, "status": 500 })).unwrap();
        assert!(env.success());
    }

    #[test]
    fn test_decode_status_shape_is_protocol_error() {
        let err = decode_envelope(json!({ "status": 400, "title": "Bad Request" })).unwrap_err();
        match err {
            HubError::Protocol { status, title } => {
                assert_eq!(status, "400");
                assert_eq!(title, "Bad Request");
            }
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_status_without_title_uses_placeholder() {
        let err = decode_envelope(json!({ "status": "error" })).unwrap_err();
        assert!(matches!(
            err,
            HubError::Protocol { ref status, ref title } if status == "error" && title == "<empty>"
        ));
    }

    #[test]
    fn test_decode_unrecognized_shape() {
        let raw = json!({ "foo": 1 });
        let err = decode_envelope(raw.clone()).unwrap_err();
        assert!(matches!(err, HubError::UnrecognizedResponse(ref v) if *v == raw));

        let err = decode_envelope(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, HubError::UnrecognizedResponse(_)));
    }

    #[test]
    fn test_decode_non_boolean_success_is_unrecognized() {
        let err = decode_envelope(json!({ "success": "yes" })).unwrap_err();
        assert!(matches!(err, HubError::UnrecognizedResponse(_)));
    }

    #[test]
    fn test_into_items_requires_array() {
        let env = decode_envelope(json!({ "success": true, "items": [{ "code": "A1" }] })).unwrap();
        assert_eq!(env.into_items().unwrap().len(), 1);

        let env = decode_envelope(json!({ "success": true })).unwrap();
        assert!(matches!(
            env.into_items(),
            Err(HubError::MalformedData { field: "items", .. })
        ));

        let env = decode_envelope(json!({ "success": true, "episodes": {} })).unwrap();
        assert!(matches!(
            env.into_episodes(),
            Err(HubError::MalformedData { field: "episodes", .. })
        ));
    }
}
