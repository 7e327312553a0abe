//! Read-only schema snapshot: modules, their declarations and verb call metadata.
//!
//! The snapshot is delivered by an external data layer and is assumed to be internally
//! consistent, but deserialization never rejects a document for missing or `null` fields: every
//! field degrades to its empty default instead.

mod accessors;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, deserialize_with = "null_as_default")]
    pub modules: Vec<Module>,
}

impl Schema {
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidSchema {
                message: "top-level schema must be a JSON object".to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawModule")]
pub struct Module {
    pub name: String,
    pub decls: Vec<Decl>,
}

/// Wire shape of a module. Older snapshots list verbs directly under `verbs` without a `kind`.
#[derive(Deserialize)]
struct RawModule {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    decls: Vec<Decl>,
    #[serde(default, deserialize_with = "null_as_default")]
    verbs: Vec<Decl>,
}

impl From<RawModule> for Module {
    fn from(raw: RawModule) -> Self {
        let mut decls = raw.decls;
        decls.extend(raw.verbs.into_iter().map(|mut verb| {
            verb.kind = DeclKind::Verb;
            verb
        }));
        Self {
            name: raw.name,
            decls,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclKind {
    Verb,
    Data,
    Config,
    Database,
    Enum,
    Secret,
    Subscription,
    Topic,
    TypeAlias,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verb => "verb",
            Self::Data => "data",
            Self::Config => "config",
            Self::Database => "database",
            Self::Enum => "enum",
            Self::Secret => "secret",
            Self::Subscription => "subscription",
            Self::Topic => "topic",
            Self::TypeAlias => "type-alias",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: DeclKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Vec<Metadata>,
    /// Kind-specific fields (request/response types, data fields, topic events, ...), kept
    /// verbatim for consumers that need them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calls: Vec<Ref>,
}

impl Metadata {
    pub const CALLS_TAG: &'static str = "calls";

    pub fn calls(refs: Vec<Ref>) -> Self {
        Self {
            tag: Self::CALLS_TAG.to_string(),
            calls: refs,
        }
    }

    pub fn is_calls(&self) -> bool {
        self.tag == Self::CALLS_TAG
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ref {
    #[serde(default, deserialize_with = "null_as_default")]
    pub module: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Ref {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Ref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.module.is_empty() && self.name.is_empty() {
            return Ok(());
        }
        write!(f, "{}.{}", self.module, self.name)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
