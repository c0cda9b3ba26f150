use crate::error::XtendError;
use crate::search::search_model::SearchResponse;

/// Blocking client for an option-search endpoint.
///
/// Posts the query as form data the way the field framework's own
/// select widgets do, and decodes the `{ results: [...] }` body.
pub struct SearchClient {
    endpoint: String,
    action: String,
    client: reqwest::blocking::Client,
}

impl SearchClient {
    pub fn new(endpoint: &str, action: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            action: action.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Form fields for one page of candidates for the field `field_key`.
    pub fn query(&self, field_key: &str, term: &str, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("action", self.action.clone()),
            ("field_key", field_key.to_string()),
            ("s", term.to_string()),
            ("paged", page.to_string()),
        ]
    }

    /// Fetch one page of candidates for the field with key `field_key`.
    pub fn search(&self, field_key: &str, term: &str, page: u32) -> Result<SearchResponse, XtendError> {
        let params = self.query(field_key, term, page);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| XtendError::Http {
                endpoint: self.endpoint.clone(),
                source: e,
            })?;

        response.json::<SearchResponse>().map_err(|e| XtendError::Http {
            endpoint: self.endpoint.clone(),
            source: e,
        })
    }
}
