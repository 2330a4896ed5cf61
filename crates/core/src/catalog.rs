use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::model::{Word, WordId};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate word id in catalog: {0}")]
    DuplicateId(WordId),

    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("cannot read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bundled starter vocabulary: id, glyph, pinyin, gloss.
const BUILTIN_WORDS: [(&str, &str, &str, &str); 10] = [
    ("w1", "人", "rén", "人类"),
    ("w2", "大", "dà", "不小"),
    ("w3", "小", "xiǎo", "不大"),
    ("w4", "山", "shān", "高山"),
    ("w5", "水", "shuǐ", "河水"),
    ("w6", "日", "rì", "太阳"),
    ("w7", "月", "yuè", "月亮"),
    ("w8", "口", "kǒu", "嘴巴"),
    ("w9", "手", "shǒu", "双手"),
    ("w10", "家", "jiā", "家庭"),
];

/// Read-only, ordered vocabulary set.
///
/// Iteration order is the order the words were defined in.
#[derive(Debug, Clone, Default)]
pub struct WordCatalog {
    words: Vec<Word>,
    index: HashMap<WordId, usize>,
}

impl WordCatalog {
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two words share an id.
    pub fn new(words: Vec<Word>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(words.len());
        for (pos, word) in words.iter().enumerate() {
            if index.insert(word.id().clone(), pos).is_some() {
                return Err(CatalogError::DuplicateId(word.id().clone()));
            }
        }
        Ok(Self { words, index })
    }

    /// The bundled ten-word starter catalog (`w1`..`w10`).
    #[must_use]
    pub fn builtin() -> Self {
        let words = BUILTIN_WORDS
            .iter()
            .filter_map(|(id, character, pinyin, meaning)| {
                Word::new(id, character, pinyin, meaning).ok()
            })
            .collect();
        Self::new(words).unwrap_or_default()
    }

    /// Parse a JSON array of `{id, character, pinyin, meaning}` objects.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for malformed JSON, invalid words or duplicate ids.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let words: Vec<Word> = serde_json::from_str(text)?;
        Self::new(words)
    }

    /// Load a JSON catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise as
    /// [`WordCatalog::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn all(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn get(&self, id: &WordId) -> Option<&Word> {
        self.index.get(id).map(|pos| &self.words[*pos])
    }

    #[must_use]
    pub fn contains(&self, id: &WordId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> WordId {
        WordId::new(raw).unwrap()
    }

    #[test]
    fn builtin_catalog_has_ten_ordered_words() {
        let catalog = WordCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        let ids: Vec<&str> = catalog.iter().map(|w| w.id().as_str()).collect();
        assert_eq!(ids.first(), Some(&"w1"));
        assert_eq!(ids.last(), Some(&"w10"));
        assert_eq!(catalog.get(&id("w4")).map(Word::character), Some("山"));
    }

    #[test]
    fn missing_word_is_absent_not_error() {
        let catalog = WordCatalog::builtin();
        assert!(catalog.get(&id("w999")).is_none());
        assert!(!catalog.contains(&id("w999")));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let words = vec![
            Word::new("a", "人", "rén", "人类").unwrap(),
            Word::new("a", "大", "dà", "不小").unwrap(),
        ];
        assert!(matches!(
            WordCatalog::new(words),
            Err(CatalogError::DuplicateId(dup)) if dup.as_str() == "a"
        ));
    }

    #[test]
    fn loads_json_in_definition_order() {
        let catalog = WordCatalog::from_json(
            r#"[
                {"id": "b", "character": "木", "pinyin": "mù", "meaning": "树木"},
                {"id": "a", "character": "火", "pinyin": "huǒ", "meaning": "火焰"}
            ]"#,
        )
        .unwrap();
        let ids: Vec<&str> = catalog.iter().map(|w| w.id().as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            WordCatalog::from_json("{not json"),
            Err(CatalogError::Malformed(_))
        ));
        assert!(matches!(
            WordCatalog::from_path("/definitely/not/here.json"),
            Err(CatalogError::Io { .. })
        ));
    }
}
