use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One candidate option returned by the option-search endpoint.
///
/// Equality is by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEntry {
    pub id: Value,

    #[serde(default)]
    pub text: String,
}

impl ResultEntry {
    pub fn new(id: i64, text: &str) -> Self {
        Self {
            id: Value::from(id),
            text: text.to_string(),
        }
    }

    /// Integer id, when the endpoint sent a JSON integer.
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.as_i64()
    }

    /// Id as text, for display and for matching against selected values.
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for ResultEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Response body of the option-search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<ResultEntry>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub more: bool,
}

impl SearchResponse {
    pub fn ids(&self) -> Vec<String> {
        self.results.iter().map(|r| r.id_string()).collect()
    }
}
