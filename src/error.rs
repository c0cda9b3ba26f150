use std::fmt;

#[derive(Debug)]
pub enum XtendError {
    /// Reading or writing a file failed
    Io { context: String, source: std::io::Error },

    /// JSON parsing failed (page snapshot, search response)
    JsonParse { context: String, source: serde_json::Error },

    /// YAML parsing failed (scenario or config file)
    YamlParse { context: String, source: serde_yaml::Error },

    /// Option-search endpoint request failed
    Http { endpoint: String, source: reqwest::Error },

    /// No field with this full key on the page
    FieldNotFound(String),

    /// Scenario step could not be applied
    Scenario(String),
}

impl fmt::Display for XtendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XtendError::Io { context, source } => {
                write!(f, "I/O error ({}): {}", context, source)
            }
            XtendError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            XtendError::YamlParse { context, source } => {
                write!(f, "YAML parse error ({}): {}", context, source)
            }
            XtendError::Http { endpoint, source } => {
                write!(f, "Option search against {} failed: {}", endpoint, source)
            }
            XtendError::FieldNotFound(key) => {
                write!(f, "Field '{}' not found on page", key)
            }
            XtendError::Scenario(msg) => {
                write!(f, "Scenario error: {}", msg)
            }
        }
    }
}

impl std::error::Error for XtendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            XtendError::Io { source, .. } => Some(source),
            XtendError::JsonParse { source, .. } => Some(source),
            XtendError::YamlParse { source, .. } => Some(source),
            XtendError::Http { source, .. } => Some(source),
            _ => None,
        }
    }
}
