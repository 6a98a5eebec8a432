use crate::datasource::{Datasource, Generator};
use crate::enumtype::Enum;
use crate::model::Model;

/// The declarative model: the already-parsed AST this core consumes. A
/// `Schema` aggregates datasources, generators (pass-through only), enums,
/// and models.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    pub datasources: Vec<Datasource>,
    pub generators: Vec<Generator>,
    pub enums: Vec<Enum>,
    pub models: Vec<Model>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datasource(mut self, datasource: Datasource) -> Self {
        self.datasources.push(datasource);
        self
    }

    pub fn with_enum(mut self, r#enum: Enum) -> Self {
        self.enums.push(r#enum);
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.models.push(model);
        self
    }

    pub fn find_model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// The primary datasource, i.e. the first declared one. Prisma schemas
    /// carry exactly one in practice even though the grammar allows several.
    pub fn primary_datasource(&self) -> Option<&Datasource> {
        self.datasources.first()
    }
}
