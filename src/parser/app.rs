use super::registry::Parse;
use crate::domain::Value;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Application identity as emitted in metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppInfo {
    pub app: String,
    pub version: String,
    pub env: String,
}

/// Maps a package descriptor `{ name, version, env }` onto [`AppInfo`].
///
/// Members are stringified the way the runtime does it, so a missing one
/// becomes `"undefined"`. Anything that is not object-shaped yields nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppParser;

impl AppParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, payload: &Value) -> Option<AppInfo> {
        if !payload.is_object_like() {
            return None;
        }
        Some(AppInfo {
            app: payload.field("name").to_display_string(),
            version: payload.field("version").to_display_string(),
            env: payload.field("env").to_display_string(),
        })
    }
}

impl Parse for AppParser {
    fn parse(&self, value: &Value) -> Option<JsonValue> {
        AppParser::parse(self, value).and_then(|info| serde_json::to_value(info).ok())
    }
}
