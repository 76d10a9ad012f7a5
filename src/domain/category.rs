use serde::{Deserialize, Serialize};

/// Immutable reference data; read-only in the expense workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
}

impl Category {
    pub fn new(name: &str, description: &str, color: &str) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            description: description.to_string(),
            color: color.to_string(),
        }
    }
}
