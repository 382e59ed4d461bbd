use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::types::{ColorType, LightGroup, Theme, MAX_HUE, MAX_INTENSITY, MAX_SATURATION};
use crate::{Error, Result};

pub const METHOD_CONTROLLER_NAME: &str = "ControllerName";
pub const METHOD_GROUP_LIST_GET: &str = "GroupListGet";
pub const METHOD_THEME_LIST_GET: &str = "ThemeListGet";
pub const METHOD_ILLUMINATE_GROUP: &str = "IlluminateGroup";
pub const METHOD_ILLUMINATE_THEME: &str = "IlluminateTheme";
pub const METHOD_SET_HUE_SAT: &str = "SetHueSat";

const FIELD_METHOD: &str = "Method";
const FIELD_GROUP_LIST: &str = "GroupList";
const FIELD_THEME_LIST: &str = "ThemeList";

/// How the method name is conveyed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Single endpoint, `{"Method": "<name>", ...}` body.
    #[default]
    MethodField,
    /// `POST <base>/<name>.json` with only the extra fields in the body.
    MethodPath,
}

pub fn request_url(framing: Framing, base_url: &str, method: &str) -> String {
    match framing {
        Framing::MethodField => base_url.to_string(),
        Framing::MethodPath => format!("{base_url}/{method}.json"),
    }
}

pub fn request_body(framing: Framing, method: &str, extra: Map<String, Value>) -> Value {
    match framing {
        Framing::MethodField => {
            let mut body = Map::with_capacity(extra.len() + 1);
            body.insert(FIELD_METHOD.to_string(), Value::String(method.to_string()));
            body.extend(extra);
            Value::Object(body)
        }
        Framing::MethodPath => Value::Object(extra),
    }
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn illuminate_group_fields(group_number: u16, intensity: u8) -> Map<String, Value> {
    fields(json!({
        "GroupNumber": group_number,
        "Intensity": intensity
    }))
}

pub fn illuminate_theme_fields(theme_index: u16, on_off: bool) -> Map<String, Value> {
    fields(json!({
        "ThemeIndex": theme_index,
        "OnOff": u8::from(on_off)
    }))
}

pub fn set_hue_sat_fields(group_number: u16, hue: u16, saturation: u8) -> Map<String, Value> {
    fields(json!({
        "GroupNumber": group_number,
        "Hue": hue,
        "Sat": saturation
    }))
}

fn default_colr() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
struct WireGroup {
    #[serde(rename = "Grp")]
    grp: u16,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Colr", default = "default_colr")]
    colr: u64,
    // Numeric fields stay untyped until the color type says which apply.
    #[serde(rename = "Inten", default)]
    inten: Value,
    #[serde(rename = "Hue", default)]
    hue: Value,
    #[serde(rename = "Sat", default)]
    sat: Value,
}

/// Whole number in `0..=max`; integral floats such as `50.0` are accepted.
/// Null means the field was not reported.
fn bounded_uint(
    grp: u16,
    field: &str,
    value: &Value,
    max: u64,
) -> std::result::Result<Option<u64>, String> {
    if value.is_null() {
        return Ok(None);
    }
    let n = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= max as f64)
            .map(|f| f as u64)
    });
    match n {
        Some(n) if n <= max => Ok(Some(n)),
        _ => Err(format!("group {grp}: {field} {value} out of range 0..={max}")),
    }
}

impl WireGroup {
    fn into_group(self) -> std::result::Result<LightGroup, String> {
        let grp = self.grp;
        let color_type = ColorType::from_luxor_code(self.colr)
            .ok_or_else(|| format!("group {grp}: unknown Colr {}", self.colr))?;
        let intensity = bounded_uint(grp, "Inten", &self.inten, MAX_INTENSITY as u64)?.unwrap_or(0);
        let (hue, saturation) = match color_type {
            ColorType::Mono => (None, None),
            ColorType::Color => (
                bounded_uint(grp, "Hue", &self.hue, MAX_HUE as u64)?.map(|h| h as u16),
                bounded_uint(grp, "Sat", &self.sat, MAX_SATURATION as u64)?.map(|s| s as u8),
            ),
        };
        Ok(LightGroup {
            group_number: grp,
            name: self.name,
            color_type,
            intensity: intensity as u8,
            hue,
            saturation,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireTheme {
    #[serde(rename = "ThemeIndex")]
    theme_index: u16,
    #[serde(rename = "Name")]
    name: String,
}

/// Pulls the array under `key`; a missing or null field is an empty list.
/// The body itself must be an object.
fn list_field(method: &str, body: &Value, key: &str) -> Result<Vec<Value>> {
    let Value::Object(fields) = body else {
        return Err(Error::decode(
            method,
            format!("expected an object, got {body}"),
        ));
    };
    match fields.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(Error::decode(
            method,
            format!("{key} is not an array: {other}"),
        )),
    }
}

pub fn parse_group_list(body: &Value) -> Result<Vec<LightGroup>> {
    list_field(METHOD_GROUP_LIST_GET, body, FIELD_GROUP_LIST)?
        .into_iter()
        .map(|item| {
            serde_json::from_value::<WireGroup>(item)
                .map_err(|e| e.to_string())
                .and_then(WireGroup::into_group)
                .map_err(|reason| Error::decode(METHOD_GROUP_LIST_GET, reason))
        })
        .collect()
}

pub fn parse_theme_list(body: &Value) -> Result<Vec<Theme>> {
    list_field(METHOD_THEME_LIST_GET, body, FIELD_THEME_LIST)?
        .into_iter()
        .map(|item| {
            serde_json::from_value::<WireTheme>(item)
                .map(|t| Theme {
                    theme_index: t.theme_index,
                    name: t.name,
                })
                .map_err(|e| Error::decode(METHOD_THEME_LIST_GET, e.to_string()))
        })
        .collect()
}
