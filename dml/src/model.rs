use crate::attribute::Attribute;
use crate::field::Field;
use crate::value::AttributeValue;

/// The resolved primary key of a model. Composite (from `@@id([...])`) and
/// single-field (from a lone `@id`) forms are mutually exclusive; when a
/// model has both, the composite form wins and the field-level marker is
/// ignored (spec invariant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryKey {
    None,
    Single(String),
    Composite(Vec<String>),
}

impl PrimaryKey {
    pub fn columns(&self) -> Vec<String> {
        match self {
            PrimaryKey::None => Vec::new(),
            PrimaryKey::Single(col) => vec![col.clone()],
            PrimaryKey::Composite(cols) => cols.clone(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, PrimaryKey::Composite(_))
    }
}

/// A named, unique or non-unique column-group constraint declared at the
/// model level via `@@unique([...])` or `@@index([...])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelLevelIndex {
    pub fields: Vec<String>,
    pub map: Option<String>,
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    pub name: String,
    pub fields: Vec<Field>,
    pub attributes: Vec<Attribute>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Model {
            name: name.into(),
            fields: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn model_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Physical table name: the `@@map` argument if present, else the model
    /// name verbatim.
    pub fn table_name(&self) -> String {
        self.model_attribute("map")
            .and_then(|attr| attr.arg("name", 0))
            .and_then(AttributeValue::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| self.name.clone())
    }

    fn column_name_of(&self, field_name: &str) -> String {
        self.field(field_name)
            .map(Field::column_name)
            .unwrap_or_else(|| field_name.to_owned())
    }

    /// Resolves the primary key per the precedence invariant: a model-level
    /// `@@id([...])` always wins over any field-level `@id`.
    pub fn primary_key(&self) -> PrimaryKey {
        if let Some(attr) = self.model_attribute("id") {
            if let Some(fields) = attr.arg("fields", 0).and_then(AttributeValue::as_list) {
                let columns: Vec<String> = fields.iter().map(|f| self.column_name_of(f)).collect();
                if columns.len() == 1 {
                    return PrimaryKey::Single(columns.into_iter().next().unwrap());
                }
                return PrimaryKey::Composite(columns);
            }
        }

        if let Some(field) = self.fields.iter().find(|f| f.is_id()) {
            return PrimaryKey::Single(field.column_name());
        }

        PrimaryKey::None
    }

    fn model_level_indexes(&self, attribute_name: &str, unique: bool) -> Vec<ModelLevelIndex> {
        self.attributes
            .iter()
            .filter(|attr| attr.name == attribute_name)
            .filter_map(|attr| {
                let fields = attr.arg("fields", 0).and_then(AttributeValue::as_list)?;
                let map = attr
                    .named_arg("map")
                    .and_then(AttributeValue::as_str)
                    .map(str::to_owned);
                Some(ModelLevelIndex {
                    fields: fields.iter().map(|f| self.column_name_of(f)).collect(),
                    map,
                    unique,
                })
            })
            .collect()
    }

    /// Model-level `@@unique([...])` declarations.
    pub fn unique_indexes(&self) -> Vec<ModelLevelIndex> {
        self.model_level_indexes("unique", true)
    }

    /// Model-level `@@index([...])` declarations.
    pub fn plain_indexes(&self) -> Vec<ModelLevelIndex> {
        self.model_level_indexes("index", false)
    }

    /// Columns produced by scalar (non-relation) fields, in declaration
    /// order, with `@id` nullability already overridden to `NOT NULL`.
    pub fn scalar_fields<'a>(&'a self, schema: &'a crate::schema::Schema) -> impl Iterator<Item = &'a Field> {
        self.fields.iter().filter(move |f| !f.is_relation_field(schema))
    }

    /// Fields that resolve to a relation (produce no column of their own).
    pub fn relation_fields<'a>(&'a self, schema: &'a crate::schema::Schema) -> impl Iterator<Item = &'a Field> {
        self.fields.iter().filter(move |f| f.is_relation_field(schema))
    }
}
