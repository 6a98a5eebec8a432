#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enum {
    pub name: String,
    pub values: Vec<String>,
}

impl Enum {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Enum {
            name: name.into(),
            values,
        }
    }
}
