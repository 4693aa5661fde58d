use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::value::Value;

/// Attribute name to evaluated value. Sorted for deterministic walks.
pub type Attributes = BTreeMap<String, Value>;

/// Block kind to the ordered sequence of blocks of that kind.
pub type BlockMap = BTreeMap<String, Vec<Block>>;

/// The six kinds of top-level configuration entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Resource,
    Module,
    Local,
    Variable,
    Output,
    Data,
}

impl EntityKind {
    /// Path prefix used to qualify identity keys of this kind.
    ///
    /// Resources are addressed by `type.name` alone.
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            EntityKind::Resource => None,
            EntityKind::Module => Some("module"),
            EntityKind::Local => Some("local"),
            EntityKind::Variable => Some("var"),
            EntityKind::Output => Some("output"),
            EntityKind::Data => Some("data"),
        }
    }

    /// Build the fully qualified key (e.g. `module.vpc`, `data.aws_ami.ubuntu`).
    pub fn qualify(self, identity: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{prefix}.{identity}"),
            None => identity.to_string(),
        }
    }

    /// Number of dot-separated segments in a qualified key of this kind.
    pub fn key_segments(self) -> usize {
        match self {
            EntityKind::Data => 3,
            _ => 2,
        }
    }

    /// Infer the kind from the first segment of a qualified path.
    pub fn from_leading_segment(segment: &str) -> Self {
        match segment {
            "module" => EntityKind::Module,
            "local" => EntityKind::Local,
            "var" => EntityKind::Variable,
            "output" => EntityKind::Output,
            "data" => EntityKind::Data,
            _ => EntityKind::Resource,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Resource => write!(f, "resource"),
            EntityKind::Module => write!(f, "module"),
            EntityKind::Local => write!(f, "local"),
            EntityKind::Variable => write!(f, "variable"),
            EntityKind::Output => write!(f, "output"),
            EntityKind::Data => write!(f, "data"),
        }
    }
}

/// A nested, repeatable element inside a resource or data source
/// (e.g. an `ingress` rule).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub kind: String,
    pub labels: Vec<String>,
    pub attrs: Attributes,
}

impl Block {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Self::default()
        }
    }

    /// Deterministic display form of the block's attributes, sorted by name.
    ///
    /// Only ever shown to users for added/removed blocks; equality always
    /// goes through the attribute values themselves.
    pub fn render(&self) -> Value {
        if self.attrs.is_empty() {
            return Value::String("{}".to_string());
        }
        let parts: Vec<String> = self
            .attrs
            .iter()
            .map(|(name, value)| format!("{name}: {}", value.render_literal()))
            .collect();
        Value::String(format!("{{ {} }}", parts.join(", ")))
    }
}

/// What an entity carries beneath its identity.
#[derive(Debug, Clone, Copy)]
pub enum EntityBody<'a> {
    /// A single value (locals).
    Value(&'a Value),
    /// Named attributes plus, for resources and data sources, nested blocks.
    Attributes {
        attrs: &'a Attributes,
        blocks: Option<&'a BlockMap>,
    },
}

/// A top-level configuration unit addressable by an identity key.
pub trait Entity {
    const KIND: EntityKind;

    /// Identity key, unique per collection within one environment.
    fn identity(&self) -> String;

    fn body(&self) -> EntityBody<'_>;

    /// Describe the first missing identity field, if any.
    fn identity_problem(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resource {
    pub resource_type: String,
    pub name: String,
    pub attrs: Attributes,
    pub blocks: BlockMap,
}

/// Structurally identical to a `Resource`, namespaced under `data.`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSource {
    pub source_type: String,
    pub name: String,
    pub attrs: Attributes,
    pub blocks: BlockMap,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub name: String,
    pub attrs: Attributes,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variable {
    pub name: String,
    pub attrs: Attributes,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Output {
    pub name: String,
    pub attrs: Attributes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    pub name: String,
    pub value: Value,
}

fn typed_identity_problem(kind: &str, type_name: &str, name: &str) -> Option<String> {
    if type_name.trim().is_empty() {
        Some(format!("{kind} '{name}' has an empty type"))
    } else if name.trim().is_empty() {
        Some(format!("{kind} of type '{type_name}' has an empty name"))
    } else {
        None
    }
}

fn named_identity_problem(kind: &str, name: &str) -> Option<String> {
    name.trim()
        .is_empty()
        .then(|| format!("{kind} has an empty name"))
}

impl Entity for Resource {
    const KIND: EntityKind = EntityKind::Resource;

    fn identity(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }

    fn body(&self) -> EntityBody<'_> {
        EntityBody::Attributes {
            attrs: &self.attrs,
            blocks: Some(&self.blocks),
        }
    }

    fn identity_problem(&self) -> Option<String> {
        typed_identity_problem("resource", &self.resource_type, &self.name)
    }
}

impl Entity for DataSource {
    const KIND: EntityKind = EntityKind::Data;

    fn identity(&self) -> String {
        format!("{}.{}", self.source_type, self.name)
    }

    fn body(&self) -> EntityBody<'_> {
        EntityBody::Attributes {
            attrs: &self.attrs,
            blocks: Some(&self.blocks),
        }
    }

    fn identity_problem(&self) -> Option<String> {
        typed_identity_problem("data source", &self.source_type, &self.name)
    }
}

impl Entity for Module {
    const KIND: EntityKind = EntityKind::Module;

    fn identity(&self) -> String {
        self.name.clone()
    }

    fn body(&self) -> EntityBody<'_> {
        EntityBody::Attributes {
            attrs: &self.attrs,
            blocks: None,
        }
    }

    fn identity_problem(&self) -> Option<String> {
        named_identity_problem("module", &self.name)
    }
}

impl Entity for Variable {
    const KIND: EntityKind = EntityKind::Variable;

    fn identity(&self) -> String {
        self.name.clone()
    }

    fn body(&self) -> EntityBody<'_> {
        EntityBody::Attributes {
            attrs: &self.attrs,
            blocks: None,
        }
    }

    fn identity_problem(&self) -> Option<String> {
        named_identity_problem("variable", &self.name)
    }
}

impl Entity for Output {
    const KIND: EntityKind = EntityKind::Output;

    fn identity(&self) -> String {
        self.name.clone()
    }

    fn body(&self) -> EntityBody<'_> {
        EntityBody::Attributes {
            attrs: &self.attrs,
            blocks: None,
        }
    }

    fn identity_problem(&self) -> Option<String> {
        named_identity_problem("output", &self.name)
    }
}

impl Entity for Local {
    const KIND: EntityKind = EntityKind::Local;

    fn identity(&self) -> String {
        self.name.clone()
    }

    fn body(&self) -> EntityBody<'_> {
        EntityBody::Value(&self.value)
    }

    fn identity_problem(&self) -> Option<String> {
        named_identity_problem("local", &self.name)
    }
}
