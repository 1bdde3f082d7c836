use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ordered collection of entity definitions, produced by
/// [`DataProvider::introspect`](crate::DataProvider::introspect) and treated
/// as an immutable snapshot by consumers.
///
/// Backends publish a fresh `Schema` through the state store whenever their
/// shape changes; nothing mutates a schema in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub entities: Vec<Entity>,
}

impl Schema {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// Look up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Check the schema's structural invariants:
    /// - entity names unique, field names unique within an entity
    /// - `relation` fields carry a relation block naming an entity in this schema
    /// - `select` fields have non-empty options
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut entity_names = HashSet::new();
        for entity in &self.entities {
            if !entity_names.insert(entity.name.as_str()) {
                return Err(SchemaError::DuplicateEntity(entity.name.clone()));
            }
        }

        for entity in &self.entities {
            let mut field_names = HashSet::new();
            for field in &entity.fields {
                if !field_names.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                    });
                }

                match field.field_type {
                    FieldType::Relation => {
                        let relation = field.relation.as_ref().ok_or_else(|| {
                            SchemaError::MissingRelation {
                                entity: entity.name.clone(),
                                field: field.name.clone(),
                            }
                        })?;
                        if self.entity(&relation.target_entity).is_none() {
                            return Err(SchemaError::UnknownRelationTarget {
                                entity: entity.name.clone(),
                                field: field.name.clone(),
                                target: relation.target_entity.clone(),
                            });
                        }
                    }
                    FieldType::Select => {
                        let has_options = field
                            .constraints
                            .as_ref()
                            .is_some_and(|c| !c.options.is_empty());
                        if !has_options {
                            return Err(SchemaError::EmptySelectOptions {
                                entity: entity.name.clone(),
                                field: field.name.clone(),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

/// A named data collection with an ordered field list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Entity {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A single attribute of an entity.
///
/// Serialized in the camelCase JSON contract the admin UI consumes
/// (`{"name": "authorId", "type": "relation", "relation": {...}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<FieldConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<FieldRelation>,
}

impl Field {
    fn simple(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: None,
            constraints: None,
            relation: None,
        }
    }

    /// Shorthand for a text field.
    pub fn text(name: &str) -> Self {
        Self::simple(name, FieldType::Text)
    }

    /// Shorthand for a numeric field.
    pub fn number(name: &str) -> Self {
        Self::simple(name, FieldType::Number)
    }

    /// Shorthand for a boolean field.
    pub fn boolean(name: &str) -> Self {
        Self::simple(name, FieldType::Boolean)
    }

    /// Shorthand for a date field.
    pub fn date(name: &str) -> Self {
        Self::simple(name, FieldType::Date)
    }

    /// Shorthand for a select field with fixed options.
    pub fn select(name: &str, options: Vec<String>) -> Self {
        Self {
            constraints: Some(FieldConstraints {
                options,
                ..FieldConstraints::default()
            }),
            ..Self::simple(name, FieldType::Select)
        }
    }

    /// Shorthand for a relation field pointing at another entity.
    pub fn relation(name: &str, target_entity: &str, display_field: &str) -> Self {
        Self {
            relation: Some(FieldRelation {
                target_entity: target_entity.into(),
                display_field: display_field.into(),
            }),
            ..Self::simple(name, FieldType::Relation)
        }
    }

    /// Set the human-readable label.
    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Mark the field required.
    pub fn required(mut self) -> Self {
        self.constraints.get_or_insert_default().required = true;
        self
    }

    /// Set the minimum string length constraint.
    pub fn min_length(mut self, len: u32) -> Self {
        self.constraints.get_or_insert_default().min_length = Some(len);
        self
    }

    /// Set the maximum string length constraint.
    pub fn max_length(mut self, len: u32) -> Self {
        self.constraints.get_or_insert_default().max_length = Some(len);
        self
    }

    /// Set the numeric range constraint.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        let constraints = self.constraints.get_or_insert_default();
        constraints.min = Some(min);
        constraints.max = Some(max);
        self
    }

    pub fn is_required(&self) -> bool {
        self.constraints.as_ref().is_some_and(|c| c.required)
    }
}

/// The rendering/validation type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
    Relation,
    Select,
}

/// Validation constraints attached to a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConstraints {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Allowed values. Only meaningful when the field type is Select.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Link from a relation field to its target entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRelation {
    /// Name of an entity in the same schema.
    pub target_entity: String,
    /// Field of the target entity shown in place of the raw id.
    pub display_field: String,
}

/// Structural schema violations caught by [`Schema::validate`].
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("duplicate entity name: {0}")]
    DuplicateEntity(String),

    #[error("duplicate field '{field}' in entity '{entity}'")]
    DuplicateField { entity: String, field: String },

    #[error("relation field '{field}' in entity '{entity}' has no relation block")]
    MissingRelation { entity: String, field: String },

    #[error("relation field '{field}' in entity '{entity}' targets unknown entity '{target}'")]
    UnknownRelationTarget {
        entity: String,
        field: String,
        target: String,
    },

    #[error("select field '{field}' in entity '{entity}' has no options")]
    EmptySelectOptions { entity: String, field: String },
}
