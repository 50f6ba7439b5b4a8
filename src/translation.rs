use crate::vocab::{strip_markers, Word, WordGroup};
use serde::{Deserialize, Serialize};

/// The mutable unit of a quiz: what is shown, what must be answered, and how it went so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(rename = "prompts")]
    pub prompt: WordGroup,
    pub answers: Vec<WordGroup>,
    pub attempts: u32,
    pub correct: bool,
}

/// Outcome of grading one attempt; holds the indices of unsatisfied answer groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grade {
    pub missed: Vec<usize>,
}

impl Grade {
    pub fn is_correct(&self) -> bool {
        self.missed.is_empty()
    }
}

impl Translation {
    pub fn new(prompt: WordGroup, answers: Vec<WordGroup>) -> Self {
        Self {
            prompt,
            answers,
            attempts: 0,
            correct: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.correct
    }

    /// Keep only the prompt word at `idx`, so later rounds re-ask the same rendering.
    pub fn narrow_prompt(&mut self, idx: usize) -> &Word {
        if self.prompt.words.len() > 1 && idx < self.prompt.words.len() {
            let word = self.prompt.words.swap_remove(idx);
            self.prompt.words = vec![word];
        }
        &self.prompt.words[0]
    }

    /// Grade one line of input per answer group. Missing inputs count as unsatisfied.
    pub fn grade<S: AsRef<str>>(&self, inputs: &[S]) -> Grade {
        let missed = self
            .answers
            .iter()
            .enumerate()
            .filter(|(idx, group)| {
                inputs
                    .get(*idx)
                    .map_or(true, |input| !accepts(group, input.as_ref()))
            })
            .map(|(idx, _)| idx)
            .collect();
        Grade { missed }
    }

    /// Count the attempt and settle correctness
    pub fn record(&mut self, grade: &Grade) {
        self.attempts += 1;
        if grade.is_correct() {
            self.correct = true;
        }
    }
}

/// Case-folded text with emphasis markers and surrounding whitespace removed.
pub fn normalize(text: &str) -> String {
    strip_markers(text.trim()).to_lowercase()
}

/// True when `input` matches any word of `group` after normalization.
pub fn accepts(group: &WordGroup, input: &str) -> bool {
    let input = normalize(input);
    group.words.iter().any(|w| normalize(w.text()) == input)
}
