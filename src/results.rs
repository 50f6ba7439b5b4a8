use crate::console::{Console, Event};
use crate::progress::SourceProgress;
use crate::translation::Translation;
use crate::vocab::WordGroup;
use std::io;
use tracing::warn;

/// Entries with more attempts than this are reported as struggled.
pub const STRUGGLE_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub struggled: usize,
    pub cleared: bool,
}

/// Translations whose cumulative attempts exceed `threshold`, in list order.
pub fn struggled(translations: &[Translation], threshold: u32) -> Vec<&Translation> {
    translations
        .iter()
        .filter(|t| t.attempts > threshold)
        .collect()
}

fn answers_text(answers: &[WordGroup]) -> String {
    answers
        .iter()
        .map(WordGroup::joined)
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Show each struggled entry, then optionally let the user try them once more.
/// Retries are informational; the translations are left untouched.
pub fn review<C: Console + ?Sized>(entries: &[&Translation], console: &mut C) -> io::Result<()> {
    for t in entries {
        console.emit(Event::Review {
            prompt: t.prompt.joined(),
            answers: answers_text(&t.answers),
            attempts: t.attempts,
        });
    }

    if console.confirm("Would you like to retry these manually?")? {
        for t in entries {
            retry(t, console)?;
        }
    }
    Ok(())
}

/// One free-form attempt with immediate feedback
pub fn retry<C: Console + ?Sized>(translation: &Translation, console: &mut C) -> io::Result<bool> {
    console.emit(Event::Prompt {
        category: translation.prompt.category.clone(),
        text: translation.prompt.joined(),
    });
    let mut inputs = Vec::with_capacity(translation.answers.len());
    for group in &translation.answers {
        inputs.push(console.answer(&group.category)?);
    }
    let correct = translation.grade(&inputs).is_correct();
    console.emit(Event::RetryResult {
        correct,
        answers: translation.answers.clone(),
    });
    Ok(correct)
}

fn offer_review<C: Console + ?Sized>(flagged: &[&Translation], console: &mut C) -> io::Result<()> {
    if flagged.is_empty() {
        return Ok(());
    }
    console.emit(Event::Struggled {
        count: flagged.len(),
    });
    if console.confirm("Do you want to review your mistakes?")? {
        review(flagged, console)?;
    }
    Ok(())
}

/// End-of-session report: flag struggled entries, offer review, then clear the
/// saved progress since nothing is left to resume. The record is cleared even
/// when input fails during review; that error is returned afterwards.
pub fn finish<C: Console + ?Sized>(
    translations: &[Translation],
    threshold: u32,
    progress: &SourceProgress<'_>,
    console: &mut C,
) -> io::Result<Summary> {
    let flagged = struggled(translations, threshold);
    let reviewed = offer_review(&flagged, console);

    let cleared = match progress.clear() {
        Ok(()) => {
            console.emit(Event::ProgressCleared);
            true
        }
        Err(e) => {
            warn!("could not clear progress: {e}");
            console.emit(Event::ClearFailed {
                reason: e.to_string(),
            });
            false
        }
    };

    reviewed?;
    Ok(Summary {
        total: translations.len(),
        struggled: flagged.len(),
        cleared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::progress::ProgressStore;
    use crate::vocab::Word;
    use tempfile::tempdir;

    fn solved(prompt: &str, answer: &str, attempts: u32) -> Translation {
        let mut t = Translation::new(
            WordGroup::new("english", vec![Word::new(prompt)]),
            vec![WordGroup::new("spanish", vec![Word::new(answer)])],
        );
        t.attempts = attempts;
        t.correct = true;
        t
    }

    #[test]
    fn struggled_means_more_than_threshold() {
        let list = vec![solved("dog", "perro", 3), solved("cat", "gato", 2), solved("cow", "vaca", 1)];
        let flagged = struggled(&list, STRUGGLE_THRESHOLD);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].prompt.joined(), "dog");
    }

    #[test]
    fn retry_does_not_touch_attempts() {
        let t = solved("dog", "*perro*", 4);
        let mut console = ScriptedConsole::with_lines(["Perro"]);

        assert!(retry(&t, &mut console).unwrap());
        assert_eq!((t.attempts, t.correct), (4, true));
        assert!(console.events.contains(&Event::RetryResult {
            correct: true,
            answers: t.answers.clone()
        }));
    }

    #[test]
    fn finish_reviews_and_clears_progress() {
        let dir = tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("vocab"), dir.path().join("data"));
        let source = dir.path().join("vocab/es/animals.json");
        let list = vec![solved("dog", "perro", 3), solved("cat", "gato", 1)];
        store.save(&list, &source).unwrap();

        // review: yes, retry: yes, then a wrong answer
        let mut console = ScriptedConsole::with_lines(["y", "y", "gato"]);
        let summary = finish(&list, STRUGGLE_THRESHOLD, &store.for_source(&source), &mut console).unwrap();

        assert_eq!(
            summary,
            Summary {
                total: 2,
                struggled: 1,
                cleared: true
            }
        );
        assert!(!store.exists(&source));
        assert!(console.events.contains(&Event::Review {
            prompt: "dog".into(),
            answers: "perro".into(),
            attempts: 3
        }));
        assert!(console
            .events
            .iter()
            .any(|e| matches!(e, Event::RetryResult { correct: false, .. })));
        assert_eq!(console.events.last(), Some(&Event::ProgressCleared));
    }

    #[test]
    fn finish_without_struggles_asks_nothing() {
        let dir = tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("vocab"), dir.path().join("data"));
        let source = dir.path().join("vocab/animals.json");
        let list = vec![solved("cat", "gato", 1)];
        let mut console = ScriptedConsole::with_lines(Vec::<String>::new());

        let summary = finish(&list, STRUGGLE_THRESHOLD, &store.for_source(&source), &mut console).unwrap();

        assert_eq!(summary.struggled, 0);
        assert!(console.questions.is_empty());
        assert_eq!(console.events, vec![Event::ProgressCleared]);
    }

    #[test]
    fn declined_review_still_clears() {
        let dir = tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("vocab"), dir.path().join("data"));
        let source = dir.path().join("vocab/animals.json");
        let list = vec![solved("dog", "perro", 5)];
        store.save(&list, &source).unwrap();
        let mut console = ScriptedConsole::with_lines(["n"]);

        finish(&list, STRUGGLE_THRESHOLD, &store.for_source(&source), &mut console).unwrap();

        assert!(!store.exists(&source));
        assert!(!console.events.iter().any(|e| matches!(e, Event::Review { .. })));
    }

    #[test]
    fn closed_input_during_review_still_clears() {
        let dir = tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("vocab"), dir.path().join("data"));
        let source = dir.path().join("vocab/animals.json");
        let list = vec![solved("dog", "perro", 3)];
        store.save(&list, &source).unwrap();
        let mut console = ScriptedConsole::with_lines(Vec::<String>::new());

        let err = finish(&list, STRUGGLE_THRESHOLD, &store.for_source(&source), &mut console).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(!store.exists(&source));
        assert!(store.in_progress().is_empty());
        assert_eq!(console.events.last(), Some(&Event::ProgressCleared));
    }
}
