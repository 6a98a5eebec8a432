use crate::value::{AttributeArg, AttributeValue};

/// A model-level or field-level attribute, e.g. `@id`, `@unique`,
/// `@default(now())`, `@relation(fields: [authorId], references: [id])`, or a
/// type modifier of the form `db.VarChar(255)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub name: String,
    pub args: Vec<AttributeArg>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(name: impl Into<String>, args: Vec<AttributeArg>) -> Self {
        Attribute {
            name: name.into(),
            args,
        }
    }

    /// `true` for an attribute of the form `db.<TypeName>`, Prisma's native
    /// type-modifier convention.
    pub fn is_native_type(&self) -> bool {
        self.name.starts_with("db.")
    }

    /// The `<TypeName>` part of a `db.<TypeName>` attribute.
    pub fn native_type_name(&self) -> Option<&str> {
        self.name.strip_prefix("db.")
    }

    pub fn named_arg(&self, name: &str) -> Option<&AttributeValue> {
        self.args
            .iter()
            .find(|arg| arg.name.as_deref() == Some(name))
            .map(|arg| &arg.value)
    }

    /// The nth positional (unnamed) argument.
    pub fn positional_arg(&self, index: usize) -> Option<&AttributeValue> {
        self.args
            .iter()
            .filter(|arg| arg.name.is_none())
            .nth(index)
            .map(|arg| &arg.value)
    }

    /// Looks an argument up by name, falling back to the nth positional slot
    /// when the caller didn't name it — the common shape for single-argument
    /// attributes like `@db.VarChar(255)` or `@map("col")`.
    pub fn arg(&self, name: &str, positional_index: usize) -> Option<&AttributeValue> {
        self.named_arg(name).or_else(|| self.positional_arg(positional_index))
    }
}
