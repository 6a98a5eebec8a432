/// One `datasource` block. Only the pieces the core cares about are kept:
/// the `provider` key, which selects the dialect, and the connection URL,
/// which the core never parses itself beyond scheme-sniffing (`Provider`
/// lives in `schema-connector`, downstream of this crate).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Datasource {
    pub name: String,
    pub provider: String,
    pub url: String,
}

impl Datasource {
    pub fn new(name: impl Into<String>, provider: impl Into<String>, url: impl Into<String>) -> Self {
        Datasource {
            name: name.into(),
            provider: provider.into(),
            url: url.into(),
        }
    }
}

/// A `generator` block. The core passes these through unexamined; they exist
/// here only so a full `Schema` round-trips without losing information a
/// consumer (e.g. a reformatter) might want.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Generator {
    pub name: String,
    pub provider: String,
    pub output: Option<String>,
    pub preview_features: Vec<String>,
}

impl Generator {
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Generator {
            name: name.into(),
            provider: provider.into(),
            output: None,
            preview_features: Vec::new(),
        }
    }
}
