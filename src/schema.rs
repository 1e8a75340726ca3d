//! Record schemas.
//!
//! A [`RecordSchema`] is an ordered, immutable mapping of field name to
//! [`FieldRule`]. It is the source of truth for validation scope: fields not
//! declared here are never checked. Schemas are built once at startup,
//! either programmatically through [`SchemaBuilder`] or from a JSON
//! definition, and all construction invariants (unique names, well-formed
//! rules) are enforced before any data is seen.

use std::{collections::HashMap, path::Path};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    rule::{FieldRule, FieldRuleBuilder, FieldType},
};

/// An ordered mapping of field name to rule. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    rules: Vec<FieldRule>,
    index: HashMap<String, usize>,
}

impl RecordSchema {
    /// Start building a schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Construct from already-built rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateField`] when a field name repeats.
    pub fn new(rules: Vec<FieldRule>) -> Result<Self> {
        let mut index = HashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            if index.insert(rule.name().to_string(), i).is_some() {
                return Err(Error::duplicate_field(rule.name()));
            }
        }
        Ok(Self { rules, index })
    }

    /// Parse a schema from a JSON definition string.
    ///
    /// The expected shape is `{"fields": [{"name": ..., "type": ...,
    /// "required": ..., ...}]}` with one entry per expected column.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed JSON or rules that
    /// violate construction invariants.
    pub fn from_json(data: &str) -> Result<Self> {
        let config: SchemaConfig =
            serde_json::from_str(data).map_err(|e| Error::invalid_config(e.to_string()))?;
        let rules = config
            .fields
            .into_iter()
            .map(|f| f.into_builder().build())
            .collect::<Result<Vec<_>>>()?;
        Self::new(rules)
    }

    /// Parse a schema from a JSON definition file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error for unreadable files, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| Error::io(e, path))?;
        Self::from_json(&data)
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Look up a rule by field name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.index.get(name).map(|&i| &self.rules[i])
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of required fields.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.rules.iter().filter(|r| r.is_required()).count()
    }
}

/// Builder accumulating field rules in declaration order.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldRuleBuilder>,
}

impl SchemaBuilder {
    /// Append a field rule.
    #[must_use]
    pub fn field(mut self, rule: FieldRuleBuilder) -> Self {
        self.fields.push(rule);
        self
    }

    /// Validate every rule and the schema invariants.
    ///
    /// # Errors
    ///
    /// Returns the first rule construction error or duplicate field name.
    pub fn build(self) -> Result<RecordSchema> {
        let rules = self
            .fields
            .into_iter()
            .map(FieldRuleBuilder::build)
            .collect::<Result<Vec<_>>>()?;
        RecordSchema::new(rules)
    }
}

/// JSON shape of a schema definition.
#[derive(Debug, Deserialize)]
struct SchemaConfig {
    fields: Vec<FieldRuleConfig>,
}

/// JSON shape of one field rule.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldRuleConfig {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    required: bool,
    min: Option<f64>,
    max: Option<f64>,
    allowed_values: Option<Vec<String>>,
    pattern: Option<String>,
}

impl FieldRuleConfig {
    fn into_builder(self) -> FieldRuleBuilder {
        let mut builder = match self.field_type {
            FieldType::Integer => FieldRule::integer(self.name),
            FieldType::Float => FieldRule::float(self.name),
            FieldType::Text => FieldRule::text(self.name),
            FieldType::Date => FieldRule::date(self.name),
            FieldType::Categorical => FieldRule::categorical(self.name, Vec::<String>::new()),
        };
        if self.required {
            builder = builder.required();
        }
        if let Some(min) = self.min {
            builder = builder.min(min);
        }
        if let Some(max) = self.max {
            builder = builder.max(max);
        }
        if let Some(values) = self.allowed_values {
            builder = builder.allowed(values);
        }
        if let Some(pattern) = self.pattern {
            builder = builder.pattern(pattern);
        }
        builder
    }
}
