//! Read-only client for the inbox-testing API.
//!
//! Uses synchronous HTTP (ureq); callers run it off the UI thread.

use super::types::{InboxResponse, Message};

/// Page size requested on every fetch
pub const PAGE_LIMIT: u32 = 100;

/// The only error text ever shown to the user
pub const FETCH_FAILED: &str = "Failed to fetch emails. Check your API key and inbox ID.";

pub const DEFAULT_BASE_URL: &str = "https://api.testmail.app/api";

/// Parameters of a single inbox read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxQuery {
    pub base_url: String,
    pub namespace: String,
    pub api_key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] ureq::Error),
    #[error("inbox API rejected the request: {0}")]
    Rejected(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Every failure collapses to one human-readable message
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED
    }
}

/// Anything that can list an inbox
pub trait InboxSource: Send + Sync {
    fn fetch(&self, query: &InboxQuery) -> Result<Vec<Message>, FetchError>;
}

impl InboxQuery {
    fn endpoint(&self) -> String {
        format!("{}/json", self.base_url.trim_end_matches('/'))
    }

    pub fn url(&self) -> String {
        format!(
            "{}?namespace={}&apikey={}&limit={}",
            self.endpoint(),
            urlencoding::encode(&self.namespace),
            urlencoding::encode(&self.api_key),
            PAGE_LIMIT
        )
    }

    /// URL with the API key masked, safe for logs
    pub fn redacted_url(&self) -> String {
        format!(
            "{}?namespace={}&apikey=***&limit={}",
            self.endpoint(),
            urlencoding::encode(&self.namespace),
            PAGE_LIMIT
        )
    }
}

/// HTTP implementation of [`InboxSource`]
pub struct InboxClient {
    agent: ureq::Agent,
}

impl InboxClient {
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }
}

impl Default for InboxClient {
    fn default() -> Self {
        Self::new()
    }
}

impl InboxSource for InboxClient {
    fn fetch(&self, query: &InboxQuery) -> Result<Vec<Message>, FetchError> {
        log::info!("GET {}", query.redacted_url());

        let mut response = self.agent.get(&query.url()).call()?;
        let body: InboxResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        into_messages(body)
    }
}

/// Unwrap a decoded response body, treating `"result": "fail"` as an error
pub fn into_messages(body: InboxResponse) -> Result<Vec<Message>, FetchError> {
    if body.is_failure() {
        let reason = body
            .message
            .unwrap_or_else(|| "no reason given".to_string());
        return Err(FetchError::Rejected(reason));
    }
    Ok(body.into_emails())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> InboxQuery {
        InboxQuery {
            base_url: "https://api.testmail.app/api/".into(),
            namespace: "my ns".into(),
            api_key: "k&ey".into(),
        }
    }

    #[test]
    fn test_url_encodes_params() {
        assert_eq!(
            query().url(),
            "https://api.testmail.app/api/json?namespace=my%20ns&apikey=k%26ey&limit=100"
        );
    }

    #[test]
    fn test_redacted_url_hides_key() {
        let url = query().redacted_url();
        assert!(!url.contains("k%26ey"));
        assert!(url.contains("apikey=***"));
    }

    #[test]
    fn test_into_messages() {
        let ok: InboxResponse =
            serde_json::from_str(r#"{"result":"success","emails":[{"id":"a"}]}"#).unwrap();
        assert_eq!(into_messages(ok).unwrap().len(), 1);

        let fail: InboxResponse =
            serde_json::from_str(r#"{"result":"fail","message":"invalid apikey"}"#).unwrap();
        let err = into_messages(fail).unwrap_err();
        assert!(matches!(err, FetchError::Rejected(ref m) if m == "invalid apikey"));
        assert_eq!(err.user_message(), FETCH_FAILED);
    }
}
