use super::*;
use serde_derive::Deserialize;
use std::time::Duration;

/// Which API endpoint a lookup searches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Name(String),
    Region(String),
}

impl Query {
    /// Build a name query. The term is trimmed and lower-cased.
    pub fn name(term: &str) -> Self {
        Query::Name(normalize(term))
    }

    /// Build a region query. The term is trimmed and lower-cased.
    pub fn region(term: &str) -> Self {
        Query::Region(normalize(term))
    }

    pub fn term(&self) -> &str {
        match self {
            Query::Name(term) | Query::Region(term) => term,
        }
    }

    /// Path below the API base, e.g. `name/germany`.
    pub fn path(&self) -> String {
        match self {
            Query::Name(term) => format!("name/{}", term),
            Query::Region(term) => format!("region/{}", term),
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Country not found ({0})")]
    NotFound(u16),
    #[error("Unreadable response: {0}")]
    Parse(String),
    #[error("Request failed: {0}")]
    Network(String),
    #[error("No country matches \"{0}\"")]
    NoMatch(String),
}

/// Anything that can answer a country `Query`.
///
/// Implementations are called from lookup worker threads.
pub trait CountrySource: Send + Sync + 'static {
    fn fetch(&self, query: &Query) -> Result<Vec<CountryRecord>, FetchError>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_ms: Option<u64>,
    pub fields: Vec<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://restcountries.com/v3.1".to_string(),
            timeout_ms: None,
            fields: vec![],
        }
    }
}

/// The REST Countries HTTP API.
pub struct RestCountries {
    settings: ApiSettings,
}

impl RestCountries {
    pub fn new(settings: ApiSettings) -> Self {
        Self { settings }
    }

    pub fn url(&self, query: &Query) -> String {
        let base = self.settings.base_url.trim_end_matches('/');
        if self.settings.fields.is_empty() {
            format!("{}/{}", base, query.path())
        } else {
            format!(
                "{}/{}?fields={}",
                base,
                query.path(),
                self.settings.fields.join(",")
            )
        }
    }
}

impl CountrySource for RestCountries {
    fn fetch(&self, query: &Query) -> Result<Vec<CountryRecord>, FetchError> {
        let request_url = self.url(query);
        log::debug!("Requesting {}", request_url);

        let mut request = ureq::get(&request_url);
        if let Some(timeout) = self.settings.timeout_ms {
            request.timeout(Duration::from_millis(timeout));
        }
        let response = request.call();

        if let Some(e) = response.synthetic_error() {
            log::warn!("Http request for {} failed. Reason:\r\n{}", query, e);
            return Err(FetchError::Network(e.to_string()));
        }
        if !response.ok() {
            log::warn!(
                "Http request for {} failed. Reason:\r\n{:?}",
                query,
                response.status()
            );
            return Err(FetchError::NotFound(response.status()));
        }

        let body = response.into_string().map_err(|e| {
            log::warn!(
                "Could not read http response for {} to buffer. Reason:\r\n{}",
                query,
                e
            );
            FetchError::Network(e.to_string())
        })?;
        parse_records(&body)
    }
}

/// Parse an API response body into records.
pub fn parse_records(body: &str) -> Result<Vec<CountryRecord>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))
}

#[test]
fn queries_are_normalized() {
    assert_eq!(Query::name("  United States "), Query::Name("united states".into()));
    assert_eq!(Query::region("Europe").path(), "region/europe");
}

#[test]
fn builds_request_urls() {
    let api = RestCountries::new(ApiSettings::default());
    assert_eq!(
        api.url(&Query::name("Peru")),
        "https://restcountries.com/v3.1/name/peru"
    );

    let api = RestCountries::new(ApiSettings {
        base_url: "http://localhost:8080/v3.1/".into(),
        fields: vec!["name".into(), "flags".into()],
        ..ApiSettings::default()
    });
    assert_eq!(
        api.url(&Query::region("asia")),
        "http://localhost:8080/v3.1/region/asia?fields=name,flags"
    );
}

#[test]
fn malformed_body_is_a_parse_error() {
    match parse_records(r#"{"status":404,"message":"Not Found"}"#) {
        Err(FetchError::Parse(_)) => {}
        other => panic!("expected a parse error, got {:?}", other),
    }
    assert_eq!(parse_records("[]"), Ok(vec![]));
}

#[test]
fn error_messages() {
    assert_eq!(FetchError::NotFound(404).to_string(), "Country not found (404)");
}
