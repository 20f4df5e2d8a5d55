//! Inbound and outbound gateway frame definitions.
//!
//! Every frame is a JSON object `{op, t?, d?}`. Inbound text is parsed into
//! a [`GatewayFrame`] here so the client only ever handles typed values.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::PresenceResult;
use crate::presence::snapshot::PresenceSnapshot;

/// Gateway opcodes.
pub mod opcode {
    /// Server to client: event dispatch.
    pub const EVENT: u64 = 0;
    /// Server to client: heartbeat interval announcement.
    pub const HELLO: u64 = 1;
    /// Client to server: subscribe.
    pub const INITIALIZE: u64 = 2;
    /// Client to server: keepalive.
    pub const HEARTBEAT: u64 = 3;
}

/// Events carrying a presence snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    /// Initial state sent right after subscribing.
    InitState,
    /// Any later change.
    PresenceUpdate,
}

impl DispatchKind {
    fn from_event(event: &str) -> Option<Self> {
        match event {
            "INIT_STATE" => Some(Self::InitState),
            "PRESENCE_UPDATE" => Some(Self::PresenceUpdate),
            _ => None,
        }
    }

    /// Converts to the wire event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitState => "INIT_STATE",
            Self::PresenceUpdate => "PRESENCE_UPDATE",
        }
    }
}

/// Frames received from the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayFrame {
    /// Op 1: start (or restart) heartbeats at this interval.
    Hello { heartbeat_interval: Duration },
    /// Op 0 with a presence event: replace the snapshot.
    Dispatch {
        event: DispatchKind,
        presence: PresenceSnapshot,
    },
    /// Well-formed JSON the client has no use for.
    Unrecognized { op: u64, event: Option<String> },
}

#[derive(Deserialize)]
struct RawFrame {
    op: u64,
    #[serde(default)]
    t: Option<String>,
    #[serde(default)]
    d: Option<Value>,
}

#[derive(Deserialize)]
struct HelloPayload {
    heartbeat_interval: Option<u64>,
}

impl GatewayFrame {
    /// Parse one text frame.
    ///
    /// Fails on invalid JSON and on presence events whose payload does not
    /// have the snapshot shape. A hello without a usable interval, and any
    /// other op or event, parse as [`GatewayFrame::Unrecognized`].
    pub fn parse(text: &str) -> PresenceResult<Self> {
        let raw: RawFrame = serde_json::from_str(text)?;

        match raw.op {
            opcode::HELLO => {
                let interval = match raw.d {
                    Some(d) => serde_json::from_value::<HelloPayload>(d)?.heartbeat_interval,
                    None => None,
                };
                Ok(match interval.filter(|ms| *ms > 0) {
                    Some(ms) => Self::Hello {
                        heartbeat_interval: Duration::from_millis(ms),
                    },
                    None => Self::Unrecognized {
                        op: raw.op,
                        event: raw.t,
                    },
                })
            }
            opcode::EVENT => match raw.t.as_deref().and_then(DispatchKind::from_event) {
                Some(event) => {
                    let presence = serde_json::from_value(raw.d.unwrap_or(Value::Null))?;
                    Ok(Self::Dispatch { event, presence })
                }
                None => Ok(Self::Unrecognized {
                    op: raw.op,
                    event: raw.t,
                }),
            },
            op => Ok(Self::Unrecognized { op, event: raw.t }),
        }
    }
}

/// Frames sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Op 2: subscribe to one user's presence.
    Initialize { subscribe_to_id: String },
    /// Op 3: keepalive.
    Heartbeat,
}

impl OutboundFrame {
    /// Encode as wire JSON.
    pub fn encode(&self) -> String {
        match self {
            Self::Initialize { subscribe_to_id } => json!({
                "op": opcode::INITIALIZE,
                "d": { "subscribe_to_id": subscribe_to_id },
            })
            .to_string(),
            Self::Heartbeat => json!({ "op": opcode::HEARTBEAT }).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PresenceError;
    use crate::presence::status::PresenceStatus;

    #[test]
    fn test_parse_hello() {
        let frame = GatewayFrame::parse(r#"{"op":1,"d":{"heartbeat_interval":30000}}"#).unwrap();
        assert_eq!(
            frame,
            GatewayFrame::Hello {
                heartbeat_interval: Duration::from_secs(30)
            }
        );
    }

    #[test]
    fn test_hello_without_interval_is_unrecognized() {
        let frame = GatewayFrame::parse(r#"{"op":1,"d":{}}"#).unwrap();
        assert!(matches!(frame, GatewayFrame::Unrecognized { op: 1, .. }));
    }

    #[test]
    fn test_parse_presence_update() {
        let text = r#"{"op":0,"seq":4,"t":"PRESENCE_UPDATE","d":{"discord_user":{"id":"1","username":"u"},"discord_status":"online"}}"#;
        match GatewayFrame::parse(text).unwrap() {
            GatewayFrame::Dispatch { event, presence } => {
                assert_eq!(event, DispatchKind::PresenceUpdate);
                assert_eq!(presence.status, PresenceStatus::Online);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_is_unrecognized() {
        let frame = GatewayFrame::parse(r#"{"op":0,"t":"KV_UPDATE","d":{}}"#).unwrap();
        assert_eq!(
            frame,
            GatewayFrame::Unrecognized {
                op: 0,
                event: Some("KV_UPDATE".to_string())
            }
        );
    }

    #[test]
    fn test_large_opcode_is_unrecognized() {
        let frame = GatewayFrame::parse(r#"{"op":300,"d":{}}"#).unwrap();
        assert_eq!(
            frame,
            GatewayFrame::Unrecognized {
                op: 300,
                event: None
            }
        );
    }

    #[test]
    fn test_malformed_frames_fail() {
        assert!(matches!(
            GatewayFrame::parse("not json"),
            Err(PresenceError::Parse(_))
        ));
        assert!(GatewayFrame::parse(r#"{"op":0,"t":"INIT_STATE"}"#).is_err());
        assert!(GatewayFrame::parse(r#"{"t":"INIT_STATE"}"#).is_err());
    }

    #[test]
    fn test_encode_outbound() {
        let init = OutboundFrame::Initialize {
            subscribe_to_id: "825069530376044594".to_string(),
        };
        let value: Value = serde_json::from_str(&init.encode()).unwrap();
        assert_eq!(
            value,
            json!({ "op": 2, "d": { "subscribe_to_id": "825069530376044594" } })
        );
        assert_eq!(OutboundFrame::Heartbeat.encode(), r#"{"op":3}"#);
    }
}
