use dictionary_api::{get_definition, DICTIONARY_API_URL};
use thiserror::Error;

mod dictionary;
mod dictionary_api;

pub use dictionary::{Word, DEFINITION_FALLBACK, PHONETIC_FALLBACK};
pub use dictionary_api::{normalize, parse_response, Definition, Entry, License, Meaning, Phonetic};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to reach the dictionary service: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("malformed dictionary response: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("dictionary response contained no entries")]
    EmptyResponse,
    #[error("invalid dictionary url {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    NotFound(NotFoundError),
}

impl LookupError {
    /// Short text meant to be shown next to the search input.
    pub fn user_message(&self) -> String {
        match self {
            LookupError::NotFound(_) => "This word does not exist".to_owned(),
            LookupError::Fetch(_) => "Could not reach the dictionary, check your connection".to_owned(),
            LookupError::Parse(_) | LookupError::EmptyResponse | LookupError::InvalidUrl(_) => "Error loading the data".to_owned(),
        }
    }
}

#[derive(Debug, Error)]
#[error("the word \"{term}\" does not exist (status {status})")]
pub struct NotFoundError {
    term: String,
    status: u16,
}

impl NotFoundError {
    pub(crate) fn new(term: &str, status: u16) -> Self {
        Self {
            term: term.to_owned(),
            status,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn status(&self) -> u16 {
        self.status
    }
}

pub struct Dictionary {
    client: reqwest::Client,
    base_url: String,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::with_base_url(DICTIONARY_API_URL)
    }

    /// Points the client at another deployment of the dictionary API.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Looks up a single term.
    ///
    /// Surrounding whitespace is trimmed; a blank term resolves to `Ok(None)`
    /// without touching the network. Every call issues exactly one request,
    /// nothing is cached and nothing is retried.
    pub async fn lookup(&self, term: &str) -> Result<Option<Word>, LookupError> {
        let term = term.trim();
        if term.is_empty() {
            tracing::trace!("ignoring blank search term");
            return Ok(None);
        }
        get_definition(&self.client, &self.base_url, term)
            .await
            .map(Some)
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
