// Declarative asset hierarchy, built once at startup.
// Declaration order is a protocol contract: types, then containers and static
// assets, then links that reference them.

use crate::models::Track;
use crate::omf::{
    AssetValues, Container, DynamicElement, DynamicLink, LINK_TYPE_ID, PROVIDER_INDEX,
    PROVIDER_TYPE_ID, ROOT_INDEX, STAT_TYPE_ID, StaticAsset, StaticElement, StaticLink,
    TRACK_TYPE_ID, container_id, provider_type_schema, stat_type_schema, track_index,
    track_type_schema,
};
use serde_json::Value;

/// The full declaration sequence for one provider and its tracks.
/// Building is pure and deterministic: the same track list always yields an
/// identical model, so re-sending against an upserting endpoint is safe.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetModel {
    pub static_type_schemas: Vec<Value>,
    pub dynamic_type_schemas: Vec<Value>,
    pub containers: Vec<Container>,
    pub provider_values: AssetValues<StaticAsset>,
    pub track_values: AssetValues<StaticAsset>,
    pub static_links: AssetValues<StaticLink>,
    pub dynamic_links: AssetValues<DynamicLink>,
}

pub fn build(provider_name: &str, tracks: &[Track]) -> AssetModel {
    let containers = tracks
        .iter()
        .map(|t| Container {
            id: container_id(t.id),
            typeid: STAT_TYPE_ID.into(),
        })
        .collect();

    let provider_values = AssetValues {
        typeid: PROVIDER_TYPE_ID.into(),
        values: vec![StaticAsset {
            index: PROVIDER_INDEX.into(),
            name: provider_name.into(),
        }],
    };

    let track_values = AssetValues {
        typeid: TRACK_TYPE_ID.into(),
        values: tracks
            .iter()
            .map(|t| StaticAsset {
                index: track_index(t.id),
                name: t.label.clone(),
            })
            .collect(),
    };

    // Root -> provider, then provider -> each track.
    let mut static_links = vec![StaticLink {
        source: StaticElement {
            typeid: PROVIDER_TYPE_ID.into(),
            index: ROOT_INDEX.into(),
        },
        target: StaticElement {
            typeid: PROVIDER_TYPE_ID.into(),
            index: PROVIDER_INDEX.into(),
        },
    }];
    for t in tracks {
        static_links.push(StaticLink {
            source: StaticElement {
                typeid: PROVIDER_TYPE_ID.into(),
                index: PROVIDER_INDEX.into(),
            },
            target: StaticElement {
                typeid: TRACK_TYPE_ID.into(),
                index: track_index(t.id),
            },
        });
    }

    let dynamic_links = tracks
        .iter()
        .map(|t| DynamicLink {
            source: StaticElement {
                typeid: TRACK_TYPE_ID.into(),
                index: track_index(t.id),
            },
            target: DynamicElement {
                containerid: container_id(t.id),
            },
        })
        .collect();

    AssetModel {
        static_type_schemas: vec![provider_type_schema(), track_type_schema()],
        dynamic_type_schemas: vec![stat_type_schema()],
        containers,
        provider_values,
        track_values,
        static_links: AssetValues {
            typeid: LINK_TYPE_ID.into(),
            values: static_links,
        },
        dynamic_links: AssetValues {
            typeid: LINK_TYPE_ID.into(),
            values: dynamic_links,
        },
    }
}
