use serde_json::{Map, Value, json};

use crate::graph::BuildOptions;
use crate::theme::Theme;
use crate::{Error, Result};

/// JSON-backed settings addressed by dotted paths (`viewport.zoomStep`, `graph.excludeModules`).
#[derive(Debug, Clone, PartialEq)]
pub struct VerbvizConfig(Value);

impl Default for VerbvizConfig {
    fn default() -> Self {
        Self(json!({
            "theme": "light",
            "graph": {
                "excludeModules": []
            },
            "viewport": {
                "zoomStep": 0.1,
                "focusScale": 2.0
            },
            "render": {
                "engine": "dot",
                "args": ["-Tsvg"]
            }
        }))
    }
}

impl VerbvizConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parses a JSON document and merges it onto the defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text).map_err(|err| Error::InvalidConfig {
            path: String::new(),
            message: err.to_string(),
        })?;
        if !overrides.is_object() {
            return Err(Error::InvalidConfig {
                path: String::new(),
                message: "config must be a JSON object".to_string(),
            });
        }
        let mut config = Self::default();
        config.deep_merge(&overrides);
        Ok(config)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn get_str_list(&self, dotted_path: &str) -> Result<Vec<String>> {
        let Some(value) = self.get(dotted_path) else {
            return Ok(Vec::new());
        };
        let invalid = || Error::InvalidConfig {
            path: dotted_path.to_string(),
            message: "expected an array of strings".to_string(),
        };
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
                .collect(),
            _ => Err(invalid()),
        }
    }

    /// Writes `value` at `dotted_path`; non-object values met on the way become objects.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let path: Vec<&str> = dotted_path.split('.').collect();
        write_path(&mut self.0, &path, value);
    }

    pub fn deep_merge(&mut self, other: &Value) {
        merge_into(&mut self.0, other);
    }

    pub fn theme(&self) -> Result<Theme> {
        match self.get_str("theme") {
            Some(theme) => theme.parse(),
            None => Ok(Theme::default()),
        }
    }

    pub fn build_options(&self) -> Result<BuildOptions> {
        Ok(BuildOptions {
            exclude_modules: self.get_str_list("graph.excludeModules")?,
        })
    }
}

fn write_path(slot: &mut Value, path: &[&str], value: Value) {
    let Some((key, rest)) = path.split_first() else {
        *slot = value;
        return;
    };
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(map) = slot {
        write_path(map.entry(*key).or_insert(Value::Null), rest, value);
    }
}

/// Objects merge key by key; any other incoming value replaces what is there.
fn merge_into(base: &mut Value, incoming: &Value) {
    let Value::Object(incoming) = incoming else {
        *base = incoming.clone();
        return;
    };
    if !base.is_object() {
        *base = Value::Object(Map::new());
    }
    if let Value::Object(map) = base {
        for (key, value) in incoming {
            merge_into(map.entry(key.as_str()).or_insert(Value::Null), value);
        }
    }
}
