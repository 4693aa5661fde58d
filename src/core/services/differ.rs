use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::core::errors::Result;
use crate::core::models::difference::{DiffKind, Difference};
use crate::core::models::entity::{Attributes, BlockMap, Entity, EntityBody, EntityKind};
use crate::core::models::environment::EnvironmentConfig;
use crate::core::models::value::Value;
use crate::core::services::ignore_matcher::IgnoreMatcher;

static NULL: Value = Value::Null;

/// Where a difference is being recorded: which entity, in which environment.
struct Site<'s> {
    kind: EntityKind,
    key: &'s str,
    environment: &'s str,
}

/// Walks environment configurations and lists every element-level divergence
/// from the baseline, asking the matcher whether each one is intentional.
pub struct Differ<'a> {
    matcher: &'a IgnoreMatcher,
}

impl<'a> Differ<'a> {
    pub fn new(matcher: &'a IgnoreMatcher) -> Self {
        Self { matcher }
    }

    /// Compare every environment against the lexicographically first one.
    ///
    /// - Fewer than two environments produce no differences.
    /// - Passes run per environment in a fixed order: resources, modules,
    ///   locals, variables, outputs, data sources.
    /// - Within a pass entities are visited in identity-key order.
    ///
    /// # Errors
    ///
    /// `MalformedEnvironment` if any configuration fails validation, even
    /// when there is nothing to compare it against; no partial result is
    /// returned.
    pub fn compare(
        &self,
        environments: &BTreeMap<String, EnvironmentConfig>,
    ) -> Result<Vec<Difference>> {
        for (name, config) in environments {
            config.validate(name)?;
        }
        if environments.len() < 2 {
            return Ok(Vec::new());
        }

        let mut entries = environments.iter();
        let Some((baseline_name, baseline)) = entries.next() else {
            return Ok(Vec::new());
        };
        debug!(baseline = %baseline_name, "selected baseline environment");

        let mut differences = Vec::new();
        for (name, target) in entries {
            let before = differences.len();
            self.compare_collection(&baseline.resources, &target.resources, name, &mut differences);
            self.compare_collection(&baseline.modules, &target.modules, name, &mut differences);
            self.compare_collection(&baseline.locals, &target.locals, name, &mut differences);
            self.compare_collection(&baseline.variables, &target.variables, name, &mut differences);
            self.compare_collection(&baseline.outputs, &target.outputs, name, &mut differences);
            self.compare_collection(
                &baseline.data_sources,
                &target.data_sources,
                name,
                &mut differences,
            );
            debug!(
                environment = %name,
                differences = differences.len() - before,
                "compared against baseline"
            );
        }

        Ok(differences)
    }

    /// One pass over an identity-keyed collection of a single entity kind.
    fn compare_collection<E: Entity>(
        &self,
        baseline: &[E],
        target: &[E],
        environment: &str,
        out: &mut Vec<Difference>,
    ) {
        let base_map: BTreeMap<String, &E> = baseline.iter().map(|e| (e.identity(), e)).collect();
        let target_map: BTreeMap<String, &E> = target.iter().map(|e| (e.identity(), e)).collect();
        let keys: BTreeSet<&String> = base_map.keys().chain(target_map.keys()).collect();

        for key in keys {
            let qualified = E::KIND.qualify(key);
            let site = Site {
                kind: E::KIND,
                key: &qualified,
                environment,
            };

            match (base_map.get(key), target_map.get(key)) {
                (Some(_), None) => out.push(self.record(
                    &site,
                    String::new(),
                    DiffKind::Removed,
                    Value::Bool(true),
                    Value::Bool(false),
                )),
                (None, Some(_)) => out.push(self.record(
                    &site,
                    String::new(),
                    DiffKind::Added,
                    Value::Bool(false),
                    Value::Bool(true),
                )),
                (Some(base), Some(other)) => {
                    self.compare_bodies(&site, base.body(), other.body(), out);
                }
                (None, None) => {}
            }
        }
    }

    fn compare_bodies(
        &self,
        site: &Site<'_>,
        baseline: EntityBody<'_>,
        target: EntityBody<'_>,
        out: &mut Vec<Difference>,
    ) {
        match (baseline, target) {
            (EntityBody::Value(base), EntityBody::Value(other)) => {
                if base != other {
                    out.push(self.record(
                        site,
                        String::new(),
                        DiffKind::Modified,
                        base.clone(),
                        other.clone(),
                    ));
                }
            }
            (
                EntityBody::Attributes {
                    attrs: base_attrs,
                    blocks: base_blocks,
                },
                EntityBody::Attributes {
                    attrs: other_attrs,
                    blocks: other_blocks,
                },
            ) => {
                self.compare_attributes(site, "", base_attrs, other_attrs, out);
                if let (Some(base_blocks), Some(other_blocks)) = (base_blocks, other_blocks) {
                    self.compare_blocks(site, base_blocks, other_blocks, out);
                }
            }
            // Both sides come from the same entity type, so the shapes agree.
            _ => {}
        }
    }

    /// Union of attribute names; a missing attribute is `Null`.
    ///
    /// Objects on both sides are decomposed one level so a single tag edit
    /// reports `tags.<key>` instead of the whole map.
    fn compare_attributes(
        &self,
        site: &Site<'_>,
        prefix: &str,
        baseline: &Attributes,
        target: &Attributes,
        out: &mut Vec<Difference>,
    ) {
        let names: BTreeSet<&String> = baseline.keys().chain(target.keys()).collect();

        for name in names {
            let base = baseline.get(name).unwrap_or(&NULL);
            let other = target.get(name).unwrap_or(&NULL);
            if base == other {
                continue;
            }

            let path = join_path(prefix, name);
            match (base, other) {
                (Value::Object(base_obj), Value::Object(other_obj)) => {
                    self.compare_object_keys(site, &path, base_obj, other_obj, out);
                }
                _ => out.push(self.record(
                    site,
                    path,
                    DiffKind::Modified,
                    base.clone(),
                    other.clone(),
                )),
            }
        }
    }

    fn compare_object_keys(
        &self,
        site: &Site<'_>,
        path: &str,
        baseline: &BTreeMap<String, Value>,
        target: &BTreeMap<String, Value>,
        out: &mut Vec<Difference>,
    ) {
        let keys: BTreeSet<&String> = baseline.keys().chain(target.keys()).collect();

        for key in keys {
            let base = baseline.get(key).unwrap_or(&NULL);
            let other = target.get(key).unwrap_or(&NULL);
            if base != other {
                out.push(self.record(
                    site,
                    format!("{path}.{key}"),
                    DiffKind::Modified,
                    base.clone(),
                    other.clone(),
                ));
            }
        }
    }

    /// Blocks are matched by position within their kind.
    fn compare_blocks(
        &self,
        site: &Site<'_>,
        baseline: &BlockMap,
        target: &BlockMap,
        out: &mut Vec<Difference>,
    ) {
        let kinds: BTreeSet<&String> = baseline.keys().chain(target.keys()).collect();

        for kind in kinds {
            let base_seq = baseline.get(kind).map(Vec::as_slice).unwrap_or_default();
            let other_seq = target.get(kind).map(Vec::as_slice).unwrap_or_default();

            for index in 0..base_seq.len().max(other_seq.len()) {
                let path = format!("{kind}[{index}]");
                match (base_seq.get(index), other_seq.get(index)) {
                    (Some(base), None) => out.push(self.record(
                        site,
                        path,
                        DiffKind::Removed,
                        base.render(),
                        Value::Null,
                    )),
                    (None, Some(other)) => out.push(self.record(
                        site,
                        path,
                        DiffKind::Added,
                        Value::Null,
                        other.render(),
                    )),
                    (Some(base), Some(other)) => {
                        self.compare_attributes(site, &path, &base.attrs, &other.attrs, out);
                    }
                    (None, None) => {}
                }
            }
        }
    }

    fn record(
        &self,
        site: &Site<'_>,
        path: String,
        kind: DiffKind,
        expected: Value,
        actual: Value,
    ) -> Difference {
        let qualified = if path.is_empty() {
            site.key.to_string()
        } else {
            format!("{}.{path}", site.key)
        };

        Difference {
            resource_key: site.key.to_string(),
            entity_kind: site.kind,
            environment: site.environment.to_string(),
            ignored: self.matcher.is_ignored(&qualified),
            path,
            kind,
            expected,
            actual,
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
