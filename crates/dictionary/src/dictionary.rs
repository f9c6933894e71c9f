use serde::{Deserialize, Serialize};

pub const PHONETIC_FALLBACK: &str = "Pronunciation not available";
pub const DEFINITION_FALLBACK: &str = "Definition not available";

/// A normalized lookup result.
///
/// `id` and `word` always hold the same headword, and `phonetic` and
/// `definition` are never empty: a fallback text is substituted when the
/// dictionary has nothing to offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredWord")]
pub struct Word {
    id: String,
    word: String,
    phonetic: String,
    definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    synonyms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio_url: Option<String>,
}

/// A record as read back from storage, checked before it becomes a [`Word`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWord {
    id: Option<String>,
    word: String,
    phonetic: Option<String>,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    synonyms: Option<Vec<String>>,
    #[serde(default)]
    audio_url: Option<String>,
}

impl TryFrom<StoredWord> for Word {
    type Error = String;

    fn try_from(stored: StoredWord) -> Result<Self, Self::Error> {
        if let Some(id) = &stored.id {
            if *id != stored.word {
                return Err(format!("id {id:?} does not match word {:?}", stored.word));
            }
        }
        Ok(Word::new(
            stored.word,
            stored.phonetic,
            stored.definition,
            stored.synonyms.unwrap_or_default(),
            stored.audio_url,
        ))
    }
}

impl Word {
    pub fn new(
        word: impl Into<String>,
        phonetic: Option<String>,
        definition: String,
        synonyms: Vec<String>,
        audio_url: Option<String>,
    ) -> Self {
        let word = word.into();
        let phonetic = phonetic
            .filter(|phonetic| !phonetic.trim().is_empty())
            .unwrap_or_else(|| PHONETIC_FALLBACK.to_owned());
        let definition = if definition.is_empty() {
            DEFINITION_FALLBACK.to_owned()
        } else {
            definition
        };
        Self {
            id: word.clone(),
            word,
            phonetic,
            definition,
            synonyms: (!synonyms.is_empty()).then_some(synonyms),
            audio_url: audio_url.filter(|url| !url.is_empty()),
        }
    }

    /// Natural key of the record, used to key favorites.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn phonetic(&self) -> &str {
        &self.phonetic
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn synonyms(&self) -> Option<&[String]> {
        self.synonyms.as_deref()
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.audio_url.as_deref()
    }
}
