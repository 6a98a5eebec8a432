//! Declarative-model types consumed as an already-built AST.
//!
//! The declarative-language parser is an external collaborator: this crate
//! never parses `.prisma` text. It holds the shape of a parsed `Schema` and
//! the handful of derivation rules (physical naming, primary-key
//! resolution, relation-field detection) that the rest of the core needs to
//! read off the AST.

mod attribute;
mod datasource;
mod enumtype;
mod field;
mod model;
mod schema;
mod value;

pub use attribute::Attribute;
pub use datasource::{Datasource, Generator};
pub use enumtype::Enum;
pub use field::{Field, FieldType, ReferentialAction, RelationInfo};
pub use model::{Model, ModelLevelIndex, PrimaryKey};
pub use schema::Schema;
pub use value::{AttributeArg, AttributeValue};
