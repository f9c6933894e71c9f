// https://dictionaryapi.dev/ - free, no key, returns an array of entries per word

use serde::Deserialize;

use crate::{LookupError, NotFoundError, Word};

pub(crate) const DICTIONARY_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub word: String,
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    pub origin: Option<String>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    pub license: Option<License>,
    #[serde(default)]
    pub source_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phonetic {
    pub text: Option<String>,
    pub audio: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    pub definition: String,
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct License {
    pub name: String,
    pub url: Option<String>,
}

/// Body sent along with a 404, e.g. `{"title": "No Definitions Found", ...}`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    title: Option<String>,
}

impl Definition {
    /// The definition followed by its example line (empty when there is no example).
    fn render(&self) -> String {
        let example = self
            .example
            .as_deref()
            .map(|example| format!("Example: {example}"))
            .unwrap_or_default();
        format!("{}\n{example}", self.definition)
    }
}

pub(crate) async fn get_definition(
    client: &reqwest::Client,
    base_url: &str,
    term: &str,
) -> Result<Word, LookupError> {
    let mut url = reqwest::Url::parse(base_url)
        .map_err(|error| LookupError::InvalidUrl(format!("{base_url}: {error}")))?;
    // the term is one path segment, so '#', '?' or '/' in it get escaped
    url.path_segments_mut()
        .map_err(|()| LookupError::InvalidUrl(base_url.to_owned()))?
        .pop_if_empty()
        .push(term);
    tracing::debug!(%url, "requesting definition");
    let res = client.get(url).send().await.map_err(|error| {
        tracing::error!(term, %error, "dictionary request failed");
        LookupError::Fetch(error)
    })?;
    let status = res.status();
    if !status.is_success() {
        let title = res
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.title);
        tracing::warn!(term, %status, ?title, "dictionary has no entry");
        return Err(LookupError::NotFound(NotFoundError::new(term, status.as_u16())));
    }
    let body = res.bytes().await.map_err(LookupError::Fetch)?;
    parse_response(&body)
}

/// Parses a raw response body into a normalized [`Word`].
pub fn parse_response(body: &[u8]) -> Result<Word, LookupError> {
    let entries: Vec<Entry> = serde_json::from_slice(body).map_err(LookupError::Parse)?;
    normalize(&entries)
}

/// Collapses the entries returned for one search into a single [`Word`].
///
/// The headword and pronunciation come from the first entry, while
/// definitions, synonyms and the audio link are gathered across every
/// meaning of every entry in source order.
pub fn normalize(entries: &[Entry]) -> Result<Word, LookupError> {
    let first = entries.first().ok_or(LookupError::EmptyResponse)?;
    let phonetic = first
        .phonetic
        .iter()
        .chain(first.phonetics.iter().filter_map(|phonetic| phonetic.text.as_ref()))
        .find(|text| !text.trim().is_empty())
        .cloned();
    let meanings = || entries.iter().flat_map(|entry| &entry.meanings);
    let definition = meanings()
        .flat_map(|meaning| &meaning.definitions)
        .map(Definition::render)
        .collect::<Vec<String>>()
        .join("\n");
    let synonyms = meanings()
        .flat_map(|meaning| meaning.synonyms.iter().cloned())
        .collect();
    let audio_url = entries
        .iter()
        .flat_map(|entry| &entry.phonetics)
        .filter_map(|phonetic| phonetic.audio.as_ref())
        .find(|audio| !audio.is_empty())
        .cloned();
    Ok(Word::new(first.word.clone(), phonetic, definition, synonyms, audio_url))
}
