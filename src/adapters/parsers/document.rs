use std::collections::BTreeMap;

use serde::Deserialize;

use crate::core::models::entity::{
    Attributes, Block, BlockMap, DataSource, Local, Module, Output, Resource, Variable,
};
use crate::core::models::environment::EnvironmentConfig;
use crate::core::models::value::Value;

/// On-disk shape of an environment document, shared by every format.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentDocument {
    resources: Vec<TypedEntry>,
    data_sources: Vec<TypedEntry>,
    modules: Vec<NamedEntry>,
    locals: BTreeMap<String, Value>,
    variables: Vec<NamedEntry>,
    outputs: Vec<NamedEntry>,
}

/// A resource or data source: `{ type, name, attrs, blocks }`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypedEntry {
    #[serde(rename = "type")]
    entry_type: String,
    name: String,
    #[serde(default)]
    attrs: Attributes,
    #[serde(default)]
    blocks: BTreeMap<String, Vec<BlockEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NamedEntry {
    name: String,
    #[serde(default)]
    attrs: Attributes,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BlockEntry {
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    attrs: Attributes,
}

fn into_blocks(raw: BTreeMap<String, Vec<BlockEntry>>) -> BlockMap {
    raw.into_iter()
        .map(|(kind, entries)| {
            let blocks = entries
                .into_iter()
                .map(|entry| Block {
                    labels: entry.labels,
                    attrs: entry.attrs,
                    ..Block::new(&kind)
                })
                .collect();
            (kind, blocks)
        })
        .collect()
}

impl From<EnvironmentDocument> for EnvironmentConfig {
    fn from(doc: EnvironmentDocument) -> Self {
        EnvironmentConfig {
            resources: doc
                .resources
                .into_iter()
                .map(|r| Resource {
                    resource_type: r.entry_type,
                    name: r.name,
                    attrs: r.attrs,
                    blocks: into_blocks(r.blocks),
                })
                .collect(),
            data_sources: doc
                .data_sources
                .into_iter()
                .map(|d| DataSource {
                    source_type: d.entry_type,
                    name: d.name,
                    attrs: d.attrs,
                    blocks: into_blocks(d.blocks),
                })
                .collect(),
            modules: doc
                .modules
                .into_iter()
                .map(|m| Module {
                    name: m.name,
                    attrs: m.attrs,
                })
                .collect(),
            locals: doc
                .locals
                .into_iter()
                .map(|(name, value)| Local { name, value })
                .collect(),
            variables: doc
                .variables
                .into_iter()
                .map(|v| Variable {
                    name: v.name,
                    attrs: v.attrs,
                })
                .collect(),
            outputs: doc
                .outputs
                .into_iter()
                .map(|o| Output {
                    name: o.name,
                    attrs: o.attrs,
                })
                .collect(),
        }
    }
}
