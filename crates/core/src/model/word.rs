use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{IdError, WordId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error(transparent)]
    InvalidId(#[from] IdError),

    #[error("word {id} has an empty {field}")]
    EmptyField { id: String, field: &'static str },
}

//
// ─── WORD ──────────────────────────────────────────────────────────────────────
//

/// A vocabulary entry: the glyph, its pinyin and a short gloss.
///
/// Words are built once when the catalog loads and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WordEntry")]
pub struct Word {
    id: WordId,
    character: String,
    pinyin: String,
    meaning: String,
}

/// Unvalidated shape of a word as it appears in a catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct WordEntry {
    pub id: String,
    pub character: String,
    pub pinyin: String,
    pub meaning: String,
}

impl Word {
    /// Builds a word, trimming every field.
    ///
    /// # Errors
    ///
    /// Returns `WordError` if the id or any text field is blank.
    pub fn new(
        id: impl AsRef<str>,
        character: impl AsRef<str>,
        pinyin: impl AsRef<str>,
        meaning: impl AsRef<str>,
    ) -> Result<Self, WordError> {
        let id = WordId::new(id)?;
        let character = required(&id, "character", character.as_ref())?;
        let pinyin = required(&id, "pinyin", pinyin.as_ref())?;
        let meaning = required(&id, "meaning", meaning.as_ref())?;
        Ok(Self {
            id,
            character,
            pinyin,
            meaning,
        })
    }

    #[must_use]
    pub fn id(&self) -> &WordId {
        &self.id
    }

    #[must_use]
    pub fn character(&self) -> &str {
        &self.character
    }

    #[must_use]
    pub fn pinyin(&self) -> &str {
        &self.pinyin
    }

    #[must_use]
    pub fn meaning(&self) -> &str {
        &self.meaning
    }
}

fn required(id: &WordId, field: &'static str, raw: &str) -> Result<String, WordError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WordError::EmptyField {
            id: id.to_string(),
            field,
        });
    }
    Ok(trimmed.to_owned())
}

impl TryFrom<WordEntry> for Word {
    type Error = WordError;

    fn try_from(entry: WordEntry) -> Result<Self, Self::Error> {
        Self::new(entry.id, entry.character, entry.pinyin, entry.meaning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_trimmed_word() {
        let word = Word::new("w1", " 人 ", "rén", "人类").unwrap();
        assert_eq!(word.id().as_str(), "w1");
        assert_eq!(word.character(), "人");
        assert_eq!(word.pinyin(), "rén");
        assert_eq!(word.meaning(), "人类");
    }

    #[test]
    fn rejects_blank_fields() {
        let err = Word::new("w1", "人", " ", "人类").unwrap_err();
        assert_eq!(
            err,
            WordError::EmptyField {
                id: "w1".into(),
                field: "pinyin"
            }
        );
        assert!(matches!(
            Word::new("", "人", "rén", "人类"),
            Err(WordError::InvalidId(_))
        ));
    }

    #[test]
    fn deserializes_through_validation() {
        let word: Word = serde_json::from_str(
            r#"{"id":"w3","character":"小","pinyin":"xiǎo","meaning":"不大"}"#,
        )
        .unwrap();
        assert_eq!(word.character(), "小");

        let bad = serde_json::from_str::<Word>(
            r#"{"id":"w3","character":"","pinyin":"xiǎo","meaning":"不大"}"#,
        );
        assert!(bad.is_err());
    }
}
