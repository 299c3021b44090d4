//! Layer registry and per-record builder.
//!
//! [`ConfigMaker`] consumes records one at a time, in input order. Each record is resolved
//! into a [`Layer`]:
//!
//! 1. top-level keys are checked against the record schema
//! 2. `merge` names are looked up in the registry; their config and vars are folded in
//!    order, later names winning
//! 3. `vars` are rendered against the inherited vars plus `name` and added on top
//! 4. `host` or `match` (never both) is rendered and normalized
//! 5. `config` is rendered against vars, `name`, `host` and `match`, then merged over the
//!    inherited config, with null deleting an inherited option
//! 6. the layer is registered under its name (last definition wins) and, if it has a
//!    selector, appended to the emission sequence
//!
//! # Example
//!
//! ```yaml
//! - name: base
//!   vars: { p: 22 }
//!   config: { Port: "{{ p }}" }
//! - merge: base
//!   host: example.com
//! ```
//!
//! compiles to
//!
//! ```text
//! Host example.com
//!     Port 22
//!
//! ```

pub mod record;

pub use record::{RECORD_KEYS, Record};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::rc::Rc;
use strsim::levenshtein;

use crate::core::LayerError;
use crate::layer::{
    CaseInsensitiveMap, ConfigMap, Layer, MatchSpec, Selector, config_from_mapping, merge_config,
};
use crate::templating::{TeraEngine, TemplateEngine, render_value};
use crate::value::{Value, Vars};
use crate::writer;

/// Maximum edit distance for "did you mean" suggestions, as a percentage of the name length.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Builds layers from records and keeps the registry and emission sequence.
#[derive(Debug)]
pub struct ConfigMaker<E: TemplateEngine = TeraEngine> {
    engine: E,
    registry: HashMap<String, Rc<Layer>>,
    entries: Vec<Rc<Layer>>,
}

impl ConfigMaker<TeraEngine> {
    /// Create a builder using the Tera engine.
    pub fn new() -> Self {
        Self::with_engine(TeraEngine::new())
    }
}

impl Default for ConfigMaker<TeraEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TemplateEngine> ConfigMaker<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            registry: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Layers that will be written, in declaration order.
    pub fn entries(&self) -> &[Rc<Layer>] {
        &self.entries
    }

    /// Registered layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.registry.get(name).map(|layer| &**layer)
    }

    /// Resolve one record into a layer, registering and queueing it as needed.
    pub fn add_record(&mut self, record: &Value) -> Result<(), LayerError> {
        let record = Record::new(record)?;
        let name = record.name()?;
        let merge_names = record.merge_names()?;

        tracing::debug!("Processing record {:?} (merge: {:?})", name.unwrap_or(""), merge_names);

        let (mut config, mut vars) = self.resolve_merge(&merge_names)?;

        if let Some(raw_vars) = record.mapping("vars")? {
            let rendered = render_value(&self.engine, raw_vars, &scope(&vars, name))?;
            if let Value::Map(entries) = rendered {
                vars.extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }

        let selector = match (record.field("host"), record.field("match")) {
            (Some(_), Some(_)) => return Err(LayerError::HostAndMatch),
            (Some(raw_host), None) => {
                Some(Selector::Host(self.resolve_host(raw_host, &vars, name)?))
            }
            (None, Some(raw_match)) => {
                let rendered = render_value(&self.engine, raw_match, &scope(&vars, name))?;
                Some(Selector::Match(MatchSpec::from_value(&rendered)?))
            }
            (None, None) => None,
        };

        if let Some(raw_config) = record.mapping("config")? {
            let mut context = scope(&vars, name);
            context.insert("host".to_string(), host_value(selector.as_ref()));
            context.insert("match".to_string(), match_value(selector.as_ref()));

            if let Value::Map(entries) = render_value(&self.engine, raw_config, &context)? {
                config = merge_config(&config, &config_from_mapping(&entries));
            }
        }

        let emitted = match &selector {
            Some(Selector::Host(patterns)) => !patterns.is_empty(),
            Some(Selector::Match(_)) => true,
            None => false,
        };
        let layer = Rc::new(Layer {
            config,
            vars,
            selector,
        });

        if let Some(name) = name {
            if self.registry.insert(name.to_string(), Rc::clone(&layer)).is_some() {
                tracing::debug!("Layer '{}' redefined", name);
            }
        }

        if emitted {
            tracing::debug!("Queued block with {} option(s)", layer.config.len());
            self.entries.push(layer);
        }

        Ok(())
    }

    /// Serialize every queued layer into ssh_config text.
    pub fn write(&self) -> Result<String, LayerError> {
        writer::write_layers(self.entries.iter().map(|layer| &**layer))
    }

    fn resolve_merge(&self, names: &[String]) -> Result<(ConfigMap, Vars), LayerError> {
        let mut config = CaseInsensitiveMap::new();
        let mut vars = Vars::new();

        for name in names {
            let lower = self.registry.get(name).ok_or_else(|| LayerError::UndefinedLayer {
                name: name.clone(),
                suggestion: self.similar_name(name),
            })?;
            config = merge_config(&config, &lower.config);
            vars.extend(lower.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        Ok((config, vars))
    }

    fn resolve_host(
        &self,
        raw: &Value,
        vars: &Vars,
        name: Option<&str>,
    ) -> Result<Vec<String>, LayerError> {
        let context = scope(vars, name);
        let mut patterns = Vec::new();
        for pattern in raw.flatten_strings("host")? {
            let rendered = render_value(&self.engine, &Value::String(pattern), &context)?;
            patterns.extend(rendered.flatten_strings("host")?);
        }

        if patterns.is_empty() {
            tracing::debug!("Host list of {:?} is empty, layer will not be written", name);
        }
        Ok(patterns)
    }

    fn similar_name(&self, target: &str) -> Option<String> {
        self.registry
            .keys()
            .map(|candidate| (candidate, levenshtein(target, candidate)))
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
            .map(|(candidate, _)| candidate.clone())
    }
}

/// Template context: the given vars plus `name`.
fn scope(vars: &Vars, name: Option<&str>) -> Vars {
    let mut context = vars.clone();
    context.insert("name".to_string(), Value::from(name.map(str::to_string)));
    context
}

fn host_value(selector: Option<&Selector>) -> Value {
    match selector {
        Some(Selector::Host(patterns)) => {
            Value::list(patterns.iter().map(|p| Value::from(p.as_str())))
        }
        _ => Value::Null,
    }
}

fn match_value(selector: Option<&Selector>) -> Value {
    match selector {
        Some(Selector::Match(spec)) => spec.to_value(),
        _ => Value::Null,
    }
}

/// Decode a YAML document into its record sequence. An empty document has no records.
pub fn decode_records(source: &str) -> Result<Vec<Value>, LayerError> {
    let document: Value = if source.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(source)?
    };

    match document {
        Value::Null => Ok(Vec::new()),
        Value::List(records) => records
            .iter()
            .enumerate()
            .map(|(index, record)| match record {
                Value::Map(_) => Ok(record.clone()),
                other => Err(LayerError::RecordNotMapping {
                    index,
                    found: other.kind(),
                }),
            })
            .collect(),
        other => Err(LayerError::NotASequence {
            found: other.kind(),
        }),
    }
}

/// Compile a YAML layer document into ssh_config text.
///
/// Output is produced only if every record succeeds; the first failure is returned with
/// the position and name of the offending record attached.
pub fn compile(source: &str) -> Result<String> {
    let records = decode_records(source)?;
    let mut maker = ConfigMaker::new();

    for (index, record) in records.iter().enumerate() {
        maker.add_record(record).with_context(|| match record.get("name") {
            Some(Value::String(name)) => format!("Failed to process record #{index} ('{name}')"),
            _ => format!("Failed to process record #{index}"),
        })?;
    }

    let out = maker.write().context("Failed to write ssh_config")?;

    tracing::debug!(
        "Compiled {} record(s) into {} block(s)",
        records.len(),
        maker.entries().len()
    );
    Ok(out)
}
