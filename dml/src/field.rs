use crate::attribute::Attribute;
use crate::value::AttributeValue;

/// The base type of a field together with its nullability and array-ness.
///
/// `base` is either a scalar type name (`String`, `Int`, `DateTime`, ...), an
/// enum name, or a model name (for relation fields).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldType {
    pub base: String,
    pub is_optional: bool,
    pub is_array: bool,
}

impl FieldType {
    pub fn new(base: impl Into<String>) -> Self {
        FieldType {
            base: base.into(),
            is_optional: false,
            is_array: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    SetDefault,
    NoAction,
}

impl ReferentialAction {
    /// Parses the PSL-level enum literal (`Cascade`, `SetNull`, ...) used as
    /// the argument to `onDelete`/`onUpdate`.
    pub fn from_psl_literal(literal: &str) -> Option<Self> {
        match literal {
            "Cascade" => Some(ReferentialAction::Cascade),
            "Restrict" => Some(ReferentialAction::Restrict),
            "SetNull" => Some(ReferentialAction::SetNull),
            "SetDefault" => Some(ReferentialAction::SetDefault),
            "NoAction" => Some(ReferentialAction::NoAction),
            _ => None,
        }
    }

    /// The dialect-neutral SQL keyword for this action.
    pub fn as_sql(self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

impl Default for ReferentialAction {
    fn default() -> Self {
        ReferentialAction::Cascade
    }
}

/// The resolved contents of a `@relation(...)` attribute that carries both
/// `fields` and `references` — i.e. the owning side of a relation, which
/// produces a foreign key. A `@relation` with only one of the two, or
/// neither, is a virtual back-reference and is represented as `None` by
/// [`Field::relation_info`].
#[derive(Debug, Clone, PartialEq)]
pub struct RelationInfo {
    pub name: Option<String>,
    pub fields: Vec<String>,
    pub references: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub attributes: Vec<Attribute>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Field {
            name: name.into(),
            field_type,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn is_id(&self) -> bool {
        self.has_attribute("id")
    }

    pub fn is_unique(&self) -> bool {
        self.has_attribute("unique")
    }

    pub fn is_updated_at(&self) -> bool {
        self.has_attribute("updatedAt")
    }

    /// Physical column name: the `@map` argument if present, else the field
    /// name verbatim.
    pub fn column_name(&self) -> String {
        self.attribute("map")
            .and_then(|attr| attr.arg("name", 0))
            .and_then(AttributeValue::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| self.name.clone())
    }

    /// All `db.*` type-modifier attributes, in declared order. The diff
    /// engine folds over these left-to-right, each one overriding the prior
    /// choice (spec step 1).
    pub fn native_type_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|attr| attr.is_native_type())
    }

    pub fn default_attribute(&self) -> Option<&Attribute> {
        self.attribute("default")
    }

    /// A relation attribute with both `fields` and `references`, i.e. the
    /// owning side that produces a foreign key. Returns `None` for a virtual
    /// back-reference (only one of the two present, or neither).
    pub fn relation_info(&self) -> Option<RelationInfo> {
        let attr = self.attribute("relation")?;

        let fields = attr
            .arg("fields", 0)
            .and_then(AttributeValue::as_list)
            .map(|list| list.to_vec());
        let references = attr
            .arg("references", 1)
            .and_then(AttributeValue::as_list)
            .map(|list| list.to_vec());

        match (fields, references) {
            (Some(fields), Some(references)) if !fields.is_empty() && references.len() == fields.len() => {
                let name = attr
                    .named_arg("name")
                    .or_else(|| attr.positional_arg(0).filter(|v| v.as_str().is_some()))
                    .and_then(AttributeValue::as_str)
                    .map(str::to_owned);

                let on_delete = attr
                    .named_arg("onDelete")
                    .and_then(AttributeValue::as_str)
                    .and_then(ReferentialAction::from_psl_literal);
                let on_update = attr
                    .named_arg("onUpdate")
                    .and_then(AttributeValue::as_str)
                    .and_then(ReferentialAction::from_psl_literal);

                Some(RelationInfo {
                    name,
                    fields,
                    references,
                    on_delete,
                    on_update,
                })
            }
            _ => None,
        }
    }

    /// `true` iff this field produces no column: its base type names a
    /// model, it is array-typed, or it carries a `@relation` without a
    /// complete `fields`/`references` pair (a pure virtual back-reference).
    pub fn is_relation_field(&self, schema: &crate::schema::Schema) -> bool {
        if self.field_type.is_array {
            return true;
        }

        if schema.find_model(&self.field_type.base).is_some() {
            return true;
        }

        self.has_attribute("relation") && self.relation_info().is_none()
    }
}
