// OMF v1.0 wire types: Type / Container / Data message payloads.
// Field names follow the wire format, so serde renames are explicit.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// Value of the `messagetype` header for each OMF message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Type,
    Container,
    Data,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Type => "Type",
            MessageType::Container => "Container",
            MessageType::Data => "Data",
        }
    }
}

/// Type identity of link Data messages.
pub const LINK_TYPE_ID: &str = "__Link";
/// Index of the implicit hierarchy root.
pub const ROOT_INDEX: &str = "_ROOT";

pub const PROVIDER_TYPE_ID: &str = "ProviderType";
pub const TRACK_TYPE_ID: &str = "TrackType";
pub const STAT_TYPE_ID: &str = "StatType";

/// Index of the single provider asset.
pub const PROVIDER_INDEX: &str = "Provider0";

pub fn container_id(track_id: u32) -> String {
    format!("Container{}", track_id)
}

pub fn track_index(track_id: u32) -> String {
    format!("Track{}", track_id)
}

/// Static schema for the provider asset type.
pub fn provider_type_schema() -> Value {
    json!({
        "id": PROVIDER_TYPE_ID,
        "type": "object",
        "classification": "static",
        "properties": {
            "Index": { "type": "string", "isindex": true },
            "Name": { "type": "string", "isname": true }
        }
    })
}

/// Static schema for tracked-keyword assets.
pub fn track_type_schema() -> Value {
    json!({
        "id": TRACK_TYPE_ID,
        "type": "object",
        "classification": "static",
        "properties": {
            "Index": { "type": "string", "isindex": true },
            "Name": { "type": "string", "isname": true }
        }
    })
}

/// Dynamic schema for per-window match counts.
pub fn stat_type_schema() -> Value {
    json!({
        "id": STAT_TYPE_ID,
        "type": "object",
        "classification": "dynamic",
        "properties": {
            "TimeStamp": { "type": "string", "format": "date-time", "isindex": true },
            "ItemCount": { "type": "integer" }
        }
    })
}

/// Container declaration: a named stream typed by a dynamic type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    pub id: String,
    pub typeid: String,
}

/// One static asset instance (provider or track).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticAsset {
    #[serde(rename = "Index")]
    pub index: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Data message body declaring static asset values of one type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetValues<T> {
    pub typeid: String,
    pub values: Vec<T>,
}

/// Link endpoint referencing a static asset by type and index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticElement {
    pub typeid: String,
    pub index: String,
}

/// Link endpoint referencing a container stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicElement {
    pub containerid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link<S, T> {
    pub source: S,
    pub target: T,
}

/// Parent/child relation between two static assets.
pub type StaticLink = Link<StaticElement, StaticElement>;
/// Asset-to-stream relation.
pub type DynamicLink = Link<StaticElement, DynamicElement>;

/// One aggregated point: window start plus the match count for that window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatValue {
    #[serde(rename = "TimeStamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "ItemCount")]
    pub item_count: u64,
}

/// Data message body appending points to one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataValues {
    pub containerid: String,
    pub values: Vec<StatValue>,
}
