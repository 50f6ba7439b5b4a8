use crate::translation::Translation;
use crate::vocab::{VocabularyEntry, VocabularySet};
use rand::Rng;
use std::fmt;
use tracing::warn;

pub const RANDOM_MODE: &str = "random";

/// Direction policy: which category supplies the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Always prompt with the category at this index
    Category(usize),
    /// Pick the prompt category per entry, uniformly
    Random,
}

/// Raised when a mode string names neither a category nor `random`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMode {
    pub input: String,
    pub fallback: String,
}

impl fmt::Display for InvalidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid mode '{}', defaulting to {}",
            self.input, self.fallback
        )
    }
}

impl Mode {
    pub fn parse(input: &str, set: &VocabularySet) -> Option<Self> {
        if input.trim().eq_ignore_ascii_case(RANDOM_MODE) {
            return Some(Mode::Random);
        }
        set.category_index(input).map(Mode::Category)
    }

    /// Parse `input`, falling back to the first declared category. Never fails.
    pub fn parse_or_default(input: &str, set: &VocabularySet) -> (Self, Option<InvalidMode>) {
        match Self::parse(input, set) {
            Some(mode) => (mode, None),
            None => {
                let fallback = set.categories().first().cloned().unwrap_or_default();
                let invalid = InvalidMode {
                    input: input.trim().to_string(),
                    fallback,
                };
                warn!("{invalid}");
                (Mode::Category(0), Some(invalid))
            }
        }
    }

    /// Options offered by the mode prompt, categories first then `random`
    pub fn choices(set: &VocabularySet) -> Vec<String> {
        set.categories()
            .iter()
            .cloned()
            .chain(std::iter::once(RANDOM_MODE.to_string()))
            .collect()
    }
}

/// Picks the prompt category of an entry
pub trait PromptSelector {
    fn prompt_index<R: Rng + ?Sized>(&self, entry: &VocabularyEntry, rng: &mut R) -> usize;
}

/// Fixed category
pub struct ForwardSelector(pub usize);

impl PromptSelector for ForwardSelector {
    fn prompt_index<R: Rng + ?Sized>(&self, entry: &VocabularyEntry, _rng: &mut R) -> usize {
        self.0.min(entry.groups.len().saturating_sub(1))
    }
}

/// Uniformly random category, drawn independently per entry
pub struct RandomSelector;

impl PromptSelector for RandomSelector {
    fn prompt_index<R: Rng + ?Sized>(&self, entry: &VocabularyEntry, rng: &mut R) -> usize {
        rng.gen_range(0..entry.groups.len())
    }
}

fn build_pair(entry: &VocabularyEntry, prompt_idx: usize) -> Translation {
    let prompt = entry.groups[prompt_idx].clone();
    let answers = entry
        .groups
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != prompt_idx)
        .map(|(_, group)| group.clone())
        .collect();
    Translation::new(prompt, answers)
}

fn generate_with<S: PromptSelector, R: Rng + ?Sized>(
    set: &VocabularySet,
    selector: &S,
    rng: &mut R,
) -> Vec<Translation> {
    set.entries()
        .iter()
        .map(|entry| build_pair(entry, selector.prompt_index(entry, rng)))
        .collect()
}

/// One fresh translation per entry, in entry order
pub fn generate<R: Rng + ?Sized>(set: &VocabularySet, mode: Mode, rng: &mut R) -> Vec<Translation> {
    match mode {
        Mode::Category(idx) => generate_with(set, &ForwardSelector(idx), rng),
        Mode::Random => generate_with(set, &RandomSelector, rng),
    }
}
