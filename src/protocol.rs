//! Wire protocol between a surface's script context and the controller
//!
//! Every message is `{ "command": string, "value": {...} }`. Inbound messages
//! are parsed into a closed set of variants; anything that does not match one
//! of them is kept verbatim as [`InboundMessage::Unrecognized`].

use serde::Deserialize;
use serde_json::{json, Value};

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Kinds of data a surface can export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Graphviz dot source
    GraphDescription,
    /// Rendered SVG image
    Image,
}

impl ExportKind {
    /// Map the `type` field of a save request. Unknown types yield `None`.
    pub fn from_type(kind: &str) -> Option<Self> {
        match kind {
            "dot" => Some(ExportKind::GraphDescription),
            "svg" => Some(ExportKind::Image),
            _ => None,
        }
    }

    pub fn filter(self) -> ExportFilter {
        match self {
            ExportKind::GraphDescription => ExportFilter {
                name: "Graphviz Dot Files".to_string(),
                extensions: vec!["dot".to_string()],
            },
            ExportKind::Image => ExportFilter {
                name: "Images".to_string(),
                extensions: vec!["svg".to_string()],
            },
        }
    }
}

/// File-dialog filter offered for an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

/// A message received from a surface
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// The surface finished rendering; `error` is `None` on success
    RenderFinished { error: Option<String> },
    /// The surface script context finished initializing
    PageLoaded,
    /// Show a notification to the user
    Notification { severity: Severity, text: String },
    /// Click inside the surface (forwarded as-is)
    Click(Value),
    /// Double-click inside the surface (forwarded as-is)
    DoubleClick(Value),
    /// Export `data` to a user-chosen file
    SaveAs { export_type: String, data: String },
    /// Anything else, kept verbatim
    Unrecognized(Value),
}

#[derive(Deserialize)]
struct Envelope {
    command: String,
    #[serde(default)]
    value: Value,
}

#[derive(Deserialize)]
struct RenderFinishedPayload {
    #[serde(default)]
    err: Value,
}

#[derive(Deserialize)]
struct NotificationPayload {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    data: String,
}

#[derive(Deserialize)]
struct SaveAsPayload {
    #[serde(rename = "type")]
    export_type: String,
    data: String,
}

impl InboundMessage {
    pub fn parse(raw: Value) -> Self {
        let envelope = match Envelope::deserialize(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!("Message without a command envelope: {}", e);
                return InboundMessage::Unrecognized(raw);
            }
        };

        let parsed = match envelope.command.as_str() {
            "render-finished" => Option::<RenderFinishedPayload>::deserialize(&envelope.value)
                .map(|p| InboundMessage::RenderFinished {
                    error: p.and_then(|p| render_error(p.err)),
                }),
            "page-loaded" => Ok(InboundMessage::PageLoaded),
            "message" => {
                NotificationPayload::deserialize(&envelope.value).map(|p| {
                    InboundMessage::Notification {
                        severity: if p.kind == "error" {
                            Severity::Error
                        } else {
                            Severity::Info
                        },
                        text: p.data,
                    }
                })
            }
            "click" => Ok(InboundMessage::Click(raw.clone())),
            "double-click" => Ok(InboundMessage::DoubleClick(raw.clone())),
            "save-as" => SaveAsPayload::deserialize(&envelope.value).map(|p| {
                InboundMessage::SaveAs {
                    export_type: p.export_type,
                    data: p.data,
                }
            }),
            _ => return InboundMessage::Unrecognized(raw),
        };

        parsed.unwrap_or_else(|e| {
            tracing::warn!(
                "Malformed payload for '{}', forwarding as-is: {}",
                envelope.command,
                e
            );
            InboundMessage::Unrecognized(raw)
        })
    }

    /// Short name for logs
    pub fn command_name(&self) -> &'static str {
        match self {
            InboundMessage::RenderFinished { .. } => "render-finished",
            InboundMessage::PageLoaded => "page-loaded",
            InboundMessage::Notification { .. } => "message",
            InboundMessage::Click(_) => "click",
            InboundMessage::DoubleClick(_) => "double-click",
            InboundMessage::SaveAs { .. } => "save-as",
            InboundMessage::Unrecognized(_) => "unrecognized",
        }
    }
}

/// `null`, `false` and empty strings mean success
fn render_error(err: Value) -> Option<String> {
    match err {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// A message sent from the controller into a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundMessage {
    /// An export was written successfully
    SaveSuccess,
}

impl OutboundMessage {
    pub fn to_value(self) -> Value {
        match self {
            OutboundMessage::SaveSuccess => json!({ "command": "save-success" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_finished_success_variants() {
        for err in [json!(null), json!(false), json!("")] {
            let msg = InboundMessage::parse(json!({"command": "render-finished", "value": {"err": err}}));
            assert_eq!(msg, InboundMessage::RenderFinished { error: None });
        }
        let msg = InboundMessage::parse(json!({"command": "render-finished"}));
        assert_eq!(msg, InboundMessage::RenderFinished { error: None });
    }

    #[test]
    fn test_render_finished_error_object_is_stringified() {
        let msg = InboundMessage::parse(json!({
            "command": "render-finished",
            "value": {"err": {"line": 3}}
        }));
        assert_eq!(
            msg,
            InboundMessage::RenderFinished {
                error: Some(r#"{"line":3}"#.to_string())
            }
        );
    }

    #[test]
    fn test_notification_severity() {
        let error = InboundMessage::parse(json!({
            "command": "message",
            "value": {"type": "error", "data": "bad graph"}
        }));
        assert_eq!(
            error,
            InboundMessage::Notification {
                severity: Severity::Error,
                text: "bad graph".into()
            }
        );

        let info = InboundMessage::parse(json!({
            "command": "message",
            "value": {"type": "warning", "data": "hello"}
        }));
        assert!(matches!(
            info,
            InboundMessage::Notification {
                severity: Severity::Info,
                ..
            }
        ));
    }

    #[test]
    fn test_click_keeps_whole_message() {
        let raw = json!({"command": "click", "value": {"node": "a"}});
        assert_eq!(InboundMessage::parse(raw.clone()), InboundMessage::Click(raw));
    }

    #[test]
    fn test_unknown_command_is_unrecognized() {
        let raw = json!({"command": "zoom", "value": 2});
        assert_eq!(
            InboundMessage::parse(raw.clone()),
            InboundMessage::Unrecognized(raw)
        );
    }

    #[test]
    fn test_missing_command_is_unrecognized() {
        let raw = json!({"value": 1});
        assert_eq!(
            InboundMessage::parse(raw.clone()),
            InboundMessage::Unrecognized(raw)
        );
    }

    #[test]
    fn test_save_as_without_data_is_unrecognized() {
        let raw = json!({"command": "save-as", "value": {"type": "svg"}});
        assert_eq!(
            InboundMessage::parse(raw.clone()),
            InboundMessage::Unrecognized(raw)
        );
    }

    #[test]
    fn test_export_filters() {
        let dot = ExportKind::from_type("dot").unwrap().filter();
        assert_eq!(dot.extensions, vec!["dot"]);
        let svg = ExportKind::from_type("svg").unwrap().filter();
        assert_eq!(svg.name, "Images");
        assert_eq!(svg.extensions, vec!["svg"]);
        assert!(ExportKind::from_type("png").is_none());
    }

    #[test]
    fn test_save_success_shape() {
        assert_eq!(
            OutboundMessage::SaveSuccess.to_value(),
            json!({"command": "save-success"})
        );
    }
}
