use super::surface::{CONFIRM_ACTION, REJECT_ACTION};
use crate::domain::a2a::Part;
use serde_json::{Map, Value};
use skycast_session::ConfirmationRequest;
use tracing::warn;

const CONFIRM_ALERTS_ACTION: &str = "confirmAlerts";
const REJECT_ALERTS_ACTION: &str = "rejectAlerts";
const TOGGLE_ACTION: &str = "toggle_option";

/// What the router does with a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Confirm,
    Reject,
    /// Carries nothing to act on; consumed without a reply.
    Ignored,
    Other(String),
}

/// A `userAction` payload from an inbound data part, with its context
/// flattened into a map.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAction {
    pub name: Option<String>,
    pub context: Map<String, Value>,
}

impl UserAction {
    /// The first data part carrying a `userAction` key, if any.
    pub fn from_parts(parts: &[Part]) -> Option<Self> {
        parts
            .iter()
            .filter_map(Part::as_data)
            .find_map(|data| data.get("userAction"))
            .map(Self::from_value)
    }

    pub fn from_value(value: &Value) -> Self {
        let name = value
            .get("actionName")
            .or_else(|| value.get("name"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let context = match value.get("context") {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(|entry| {
                    let key = entry.get("key")?.as_str()?;
                    let value = entry.get("value").cloned().unwrap_or(Value::Null);
                    Some((key.to_string(), value))
                })
                .collect(),
            _ => Map::new(),
        };

        Self { name, context }
    }

    pub fn kind(&self) -> ActionKind {
        match self.name.as_deref() {
            None | Some(TOGGLE_ACTION) => ActionKind::Ignored,
            Some(CONFIRM_ACTION | CONFIRM_ALERTS_ACTION) => ActionKind::Confirm,
            Some(REJECT_ACTION | REJECT_ALERTS_ACTION) => ActionKind::Reject,
            Some(other) => ActionKind::Other(other.to_string()),
        }
    }

    /// Decodes a boolean context entry. Absent entries and unresolved data
    /// model paths are `false`.
    pub fn flag(&self, key: &str) -> bool {
        let Some(raw) = self.context.get(key) else {
            return false;
        };
        match decode_bool(raw) {
            Decoded::Value(flag) => flag,
            Decoded::UnresolvedPath(path) => {
                warn!(
                    key,
                    path = %path,
                    "Action context holds an unresolved data model path; treating as false"
                );
                false
            }
            Decoded::Unsupported => {
                warn!(key, value = %raw, "Unrecognised boolean in action context; treating as false");
                false
            }
        }
    }

    pub fn text(&self, key: &str) -> Option<String> {
        let raw = self.context.get(key)?;
        let value = raw.get("literalString").unwrap_or(raw);
        match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        let raw = self.context.get(key)?;
        let value = raw
            .get("literalNumber")
            .or_else(|| raw.get("literalString"))
            .unwrap_or(raw);
        match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Merges the action context over the pending request. Context values win;
    /// the pending request fills whatever the client did not echo back.
    pub fn confirmed_request(&self, pending: Option<ConfirmationRequest>) -> ConfirmationRequest {
        let location = self
            .text("location")
            .or_else(|| pending.as_ref().map(|p| p.location.clone()))
            .unwrap_or_else(|| "Unknown".to_string());
        let display_name = self
            .text("display_name")
            .or_else(|| pending.as_ref().map(|p| p.display_name.clone()))
            .unwrap_or_else(|| location.clone());

        ConfirmationRequest {
            latitude: self
                .number("latitude")
                .or_else(|| pending.as_ref().map(|p| p.latitude))
                .unwrap_or_default(),
            longitude: self
                .number("longitude")
                .or_else(|| pending.as_ref().map(|p| p.longitude))
                .unwrap_or_default(),
            state_code: self
                .text("state_code")
                .or_else(|| pending.as_ref().and_then(|p| p.state_code.clone())),
            location,
            display_name,
        }
    }
}

enum Decoded {
    Value(bool),
    UnresolvedPath(String),
    Unsupported,
}

fn decode_bool(raw: &Value) -> Decoded {
    match raw {
        Value::Bool(flag) => Decoded::Value(*flag),
        Value::String(text) => Decoded::Value(matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        )),
        Value::Number(number) => Decoded::Value(number.as_f64().is_some_and(|n| n != 0.0)),
        Value::Null => Decoded::Value(false),
        Value::Object(map) => {
            if let Some(inner) = map.get("literalBoolean").or_else(|| map.get("literalString")) {
                decode_bool(inner)
            } else if let Some(path) = map.get("path").and_then(Value::as_str) {
                Decoded::UnresolvedPath(path.to_string())
            } else {
                Decoded::Unsupported
            }
        }
        Value::Array(_) => Decoded::Unsupported,
    }
}

/// Which retrieval operations the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selections {
    pub forecast: bool,
    pub alerts: bool,
}

impl Selections {
    /// Reads `forecastSelected` / `alertsSelected`. Nothing selected means forecast.
    pub fn from_action(action: &UserAction) -> Self {
        Self {
            forecast: action.flag("forecastSelected"),
            alerts: action.flag("alertsSelected"),
        }
        .or_forecast()
    }

    fn or_forecast(self) -> Self {
        if self.forecast || self.alerts {
            self
        } else {
            Self {
                forecast: true,
                alerts: false,
            }
        }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::with_capacity(2);
        if self.forecast {
            labels.push("forecast");
        }
        if self.alerts {
            labels.push("alerts");
        }
        labels
    }
}
