use std::collections::HashSet;

use super::entity::{
    DataSource, Entity, EntityBody, EntityKind, Local, Module, Output, Resource, Variable,
};
use crate::core::errors::{DriftError, Result};

/// The full configuration of one environment (dev, staging, prod).
///
/// Owned exclusively by its environment; the differ only ever reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentConfig {
    pub resources: Vec<Resource>,
    pub data_sources: Vec<DataSource>,
    pub modules: Vec<Module>,
    pub locals: Vec<Local>,
    pub variables: Vec<Variable>,
    pub outputs: Vec<Output>,
}

impl EnvironmentConfig {
    /// Reject structures the differ cannot compare faithfully.
    ///
    /// Checks identity fields, identity-key uniqueness per collection, and
    /// that every block sits under the map key matching its own kind.
    ///
    /// # Errors
    ///
    /// `MalformedEnvironment` describing the first problem found.
    pub fn validate(&self, environment: &str) -> Result<()> {
        check_collection(&self.resources, environment)?;
        check_collection(&self.data_sources, environment)?;
        check_collection(&self.modules, environment)?;
        check_collection(&self.locals, environment)?;
        check_collection(&self.variables, environment)?;
        check_collection(&self.outputs, environment)?;

        let block_maps = self
            .resources
            .iter()
            .map(|r| (EntityKind::Resource.qualify(&r.identity()), &r.blocks))
            .chain(
                self.data_sources
                    .iter()
                    .map(|d| (EntityKind::Data.qualify(&d.identity()), &d.blocks)),
            );

        for (owner, blocks) in block_maps {
            for (kind, sequence) in blocks {
                if kind.trim().is_empty() {
                    return Err(malformed(
                        environment,
                        format!("{owner} has a block with an empty kind"),
                    ));
                }
                if let Some(block) = sequence.iter().find(|b| &b.kind != kind) {
                    return Err(malformed(
                        environment,
                        format!(
                            "{owner} lists a '{}' block under '{kind}' blocks",
                            block.kind
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Find an entity body by kind and unqualified identity key.
    pub fn lookup(&self, kind: EntityKind, identity: &str) -> Option<EntityBody<'_>> {
        match kind {
            EntityKind::Resource => find_body(&self.resources, identity),
            EntityKind::Data => find_body(&self.data_sources, identity),
            EntityKind::Module => find_body(&self.modules, identity),
            EntityKind::Local => find_body(&self.locals, identity),
            EntityKind::Variable => find_body(&self.variables, identity),
            EntityKind::Output => find_body(&self.outputs, identity),
        }
    }

    /// Total number of top-level entities across all kinds.
    pub fn entity_count(&self) -> usize {
        self.resources.len()
            + self.data_sources.len()
            + self.modules.len()
            + self.locals.len()
            + self.variables.len()
            + self.outputs.len()
    }
}

fn find_body<'a, E: Entity>(items: &'a [E], identity: &str) -> Option<EntityBody<'a>> {
    items
        .iter()
        .find(|item| item.identity() == identity)
        .map(|item| item.body())
}

fn check_collection<E: Entity>(items: &[E], environment: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if let Some(problem) = item.identity_problem() {
            return Err(malformed(environment, problem));
        }
        let key = E::KIND.qualify(&item.identity());
        if !seen.insert(key.clone()) {
            return Err(malformed(environment, format!("duplicate {} '{key}'", E::KIND)));
        }
    }
    Ok(())
}

fn malformed(environment: &str, detail: String) -> DriftError {
    DriftError::MalformedEnvironment {
        environment: environment.to_string(),
        detail,
    }
}
