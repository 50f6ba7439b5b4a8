use crate::error::VocabError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Character delimiting emphasized substrings in word text.
pub const EMPHASIS_MARKER: char = '*';

/// A single rendering of a concept, e.g. `"el *perro*"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Raw text including emphasis markers
    pub fn text(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn strip_markers(text: &str) -> String {
    text.chars().filter(|c| *c != EMPHASIS_MARKER).collect()
}

/// Words sharing one category label (usually a language).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordGroup {
    pub category: String,
    pub words: Vec<Word>,
}

impl WordGroup {
    pub fn new(category: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            category: category.into(),
            words,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.category.trim().is_empty() && !self.words.is_empty()
    }

    /// Raw word texts joined with `", "`
    pub fn joined(&self) -> String {
        self.words.iter().map(Word::text).collect::<Vec<_>>().join(", ")
    }
}

/// One concept expressed in every category of the set, in category order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub groups: Vec<WordGroup>,
}

/// Read-only reference data for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularySet {
    categories: Vec<String>,
    entries: Vec<VocabularyEntry>,
}

#[derive(Deserialize)]
struct RawVocabulary {
    categories: Vec<String>,
    vocab: Vec<Vec<RawGroup>>,
}

/// A category's words may be written as a list or as a lone string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawGroup {
    One(String),
    Many(Vec<String>),
}

impl RawGroup {
    fn into_words(self) -> Vec<Word> {
        match self {
            RawGroup::One(text) => vec![Word::new(text)],
            RawGroup::Many(texts) => texts.into_iter().map(Word::new).collect(),
        }
    }
}

impl VocabularySet {
    /// Load a vocabulary source file. Only `.json` sources are recognized.
    pub fn load(path: &Path) -> Result<Self, VocabError> {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(VocabError::UnsupportedFormat(path.display().to_string()));
        }

        let contents = fs::read_to_string(path).map_err(|source| VocabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::from_json_str(&contents)?;
        debug!(
            path = %path.display(),
            categories = set.categories.len(),
            entries = set.entries.len(),
            "vocabulary loaded"
        );
        Ok(set)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, VocabError> {
        let value: Value =
            serde_json::from_str(contents).map_err(|e| VocabError::Format(e.to_string()))?;
        if value.get("categories").is_none() || value.get("vocab").is_none() {
            return Err(VocabError::Format(
                "vocabulary must contain 'categories' and 'vocab' keys".to_string(),
            ));
        }
        let raw: RawVocabulary =
            serde_json::from_value(value).map_err(|e| VocabError::Format(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawVocabulary) -> Result<Self, VocabError> {
        if raw.categories.len() < 2 {
            return Err(VocabError::Format(format!(
                "at least two categories are required, found {}",
                raw.categories.len()
            )));
        }
        if let Some(blank) = raw.categories.iter().position(|c| c.trim().is_empty()) {
            return Err(VocabError::Format(format!("category {blank} has an empty label")));
        }

        let mut entries = Vec::with_capacity(raw.vocab.len());
        for (idx, raw_entry) in raw.vocab.into_iter().enumerate() {
            if raw_entry.len() != raw.categories.len() {
                return Err(VocabError::Format(format!(
                    "entry {idx} has {} groups but {} categories are declared",
                    raw_entry.len(),
                    raw.categories.len()
                )));
            }
            let groups: Vec<WordGroup> = raw_entry
                .into_iter()
                .zip(&raw.categories)
                .map(|(group, category)| WordGroup::new(category.clone(), group.into_words()))
                .collect();
            if let Some(empty) = groups.iter().find(|g| g.words.is_empty()) {
                return Err(VocabError::Format(format!(
                    "entry {idx} has no words for '{}'",
                    empty.category
                )));
            }
            entries.push(VocabularyEntry { groups });
        }

        Ok(Self {
            categories: raw.categories,
            entries,
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup of a category label
    pub fn category_index(&self, name: &str) -> Option<usize> {
        let name = name.trim().to_lowercase();
        self.categories.iter().position(|c| c.to_lowercase() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
    {
        "categories": ["spanish", "english"],
        "vocab": [
            [["el *perro*"], ["the dog"]],
            [["la casa", "el hogar"], "house"]
        ]
    }
    "#;

    #[test]
    fn parses_categories_and_entries_in_order() {
        let set = VocabularySet::from_json_str(SAMPLE).unwrap();

        assert_eq!(set.categories(), ["spanish", "english"]);
        assert_eq!(set.len(), 2);

        let second = &set.entries()[1];
        assert_eq!(second.groups[0].category, "spanish");
        assert_eq!(second.groups[0].words, vec![Word::new("la casa"), Word::new("el hogar")]);
        assert_eq!(second.groups[1].words, vec![Word::new("house")]);
    }

    #[test]
    fn missing_keys_is_format_error() {
        let result = VocabularySet::from_json_str(r#"{"categories": ["a", "b"]}"#);
        assert_matches!(result, Err(VocabError::Format(_)));

        let result = VocabularySet::from_json_str(r#"{"vocab": []}"#);
        assert_matches!(result, Err(VocabError::Format(_)));
    }

    #[test]
    fn mismatched_group_count_is_rejected() {
        let json = r#"{"categories": ["a", "b"], "vocab": [[["x"], ["y"], ["z"]]]}"#;
        assert_matches!(VocabularySet::from_json_str(json), Err(VocabError::Format(msg)) if msg.contains("entry 0"));
    }

    #[test]
    fn empty_word_list_is_rejected() {
        let json = r#"{"categories": ["a", "b"], "vocab": [[[], ["y"]]]}"#;
        assert_matches!(VocabularySet::from_json_str(json), Err(VocabError::Format(_)));
    }

    #[test]
    fn single_category_is_rejected() {
        let json = r#"{"categories": ["a"], "vocab": [[["x"]]]}"#;
        assert_matches!(VocabularySet::from_json_str(json), Err(VocabError::Format(_)));
    }

    #[test]
    fn load_rejects_non_json_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        fs::write(&path, "perro,dog").unwrap();

        assert_matches!(VocabularySet::load(&path), Err(VocabError::UnsupportedFormat(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("animals.json");
        fs::write(&path, SAMPLE).unwrap();

        let set = VocabularySet::load(&path).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn category_lookup_ignores_case() {
        let set = VocabularySet::from_json_str(SAMPLE).unwrap();
        assert_eq!(set.category_index("English"), Some(1));
        assert_eq!(set.category_index(" spanish "), Some(0));
        assert_eq!(set.category_index("german"), None);
    }
}
