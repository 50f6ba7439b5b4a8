use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rand::{rngs::StdRng, SeedableRng};
use tempfile::tempdir;
use vocab_drill::{
    console::{Event, ScriptedConsole},
    pairs::{self, Mode},
    progress::ProgressStore,
    quiz::Quiz,
    results::{self, STRUGGLE_THRESHOLD},
    session::{self, SessionOptions},
    VocabularySet,
};

// Headless sessions driven through the library with a scripted console:
// no terminal, deterministic shuffles, real progress files in a temp dir.

const ANIMALS: &str = r#"{
    "categories": ["english", "spanish"],
    "vocab": [
        [["dog"], ["el *perro*"]],
        [["cat"], ["el gato"]]
    ]
}"#;

fn write_source(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join("vocab").join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn struggling_entry_is_retried_until_solved() {
    let dir = tempdir().unwrap();
    let source = write_source(dir.path(), "spanish/animals.json", ANIMALS);
    let store = ProgressStore::new(dir.path().join("vocab"), dir.path().join("data"));

    // dog: wrong, wrong, right. cat: right at once.
    let dog_asked = Rc::new(Cell::new(0));
    let counter = Rc::clone(&dog_asked);
    let mut console = ScriptedConsole::new(move |events, question| {
        if question.starts_with("Do you want to review") {
            return Some("n".into());
        }
        match ScriptedConsole::last_prompt(events)? {
            "dog" => {
                counter.set(counter.get() + 1);
                let answer = if counter.get() < 3 { "perro?" } else { "EL PERRO" };
                Some(answer.to_string())
            }
            _ => Some("el gato".into()),
        }
    });
    let options = SessionOptions {
        mode: Some("english".into()),
        fresh: false,
        struggle_threshold: STRUGGLE_THRESHOLD,
    };

    let summary = session::run(&store, &source, &options, &mut console, StdRng::seed_from_u64(11)).unwrap();

    assert_eq!(dog_asked.get(), 3);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.struggled, 1);
    assert!(summary.cleared);
    assert!(!store.exists(&source));
    assert!(!dir.path().join("data/spanish").exists());

    let rounds: Vec<(usize, usize)> = console
        .events
        .iter()
        .filter_map(|e| match e {
            Event::RoundStarted { round, pending } => Some((*round, *pending)),
            _ => None,
        })
        .collect();
    assert_eq!(rounds, vec![(1, 2), (2, 1), (3, 1)]);
    assert!(console.events.contains(&Event::Struggled { count: 1 }));
}

#[test]
fn attempts_accumulate_per_entry() {
    let set = VocabularySet::from_json_str(ANIMALS).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let translations = pairs::generate(&set, Mode::Category(0), &mut rng);
    let dir = tempdir().unwrap();
    let store = ProgressStore::new(dir.path().join("vocab"), dir.path().join("data"));
    let source = dir.path().join("vocab/animals.json");

    let mut dog_tries = 0;
    let mut console = ScriptedConsole::new(move |events, _| {
        match ScriptedConsole::last_prompt(events)? {
            "dog" => {
                dog_tries += 1;
                let answer = if dog_tries < 3 { "nope" } else { "el perro" };
                Some(answer.to_string())
            }
            _ => Some("el gato".into()),
        }
    });

    let finished = Quiz::new(translations, rng)
        .run(&mut console, &mut store.for_source(&source))
        .unwrap();

    let attempts_of = |prompt: &str| {
        finished
            .iter()
            .find(|t| t.prompt.words[0].text() == prompt)
            .map(|t| (t.attempts, t.correct))
            .unwrap()
    };
    assert_eq!(attempts_of("dog"), (3, true));
    assert_eq!(attempts_of("cat"), (1, true));

    // the last round's snapshot is still on disk until results clear it
    assert_eq!(store.load(&source).unwrap().len(), 2);
    let flagged = results::struggled(&finished, STRUGGLE_THRESHOLD);
    assert_eq!(flagged.len(), 1);
}

#[test]
fn resume_asks_only_pending_entries() {
    let dir = tempdir().unwrap();
    let source = write_source(dir.path(), "animals.json", ANIMALS);
    let store = ProgressStore::new(dir.path().join("vocab"), dir.path().join("data"));

    let set = VocabularySet::from_json_str(ANIMALS).unwrap();
    let mut saved = pairs::generate(&set, Mode::Category(0), &mut StdRng::seed_from_u64(1));
    saved[0].attempts = 1;
    saved[1].attempts = 1;
    saved[1].correct = true;
    store.save(&saved, &source).unwrap();

    let mut console = ScriptedConsole::with_lines(["y", "el perro"]);
    let options = SessionOptions {
        struggle_threshold: STRUGGLE_THRESHOLD,
        ..SessionOptions::default()
    };

    let summary = session::run(&store, &source, &options, &mut console, StdRng::seed_from_u64(2)).unwrap();

    assert_eq!(console.prompts(), vec!["dog"]);
    assert!(console.events.contains(&Event::Resumed { pending: 1 }));
    assert_eq!(summary.struggled, 0);
    assert!(!store.exists(&source));
}

#[test]
fn interrupted_session_keeps_last_round() {
    let dir = tempdir().unwrap();
    let source = write_source(dir.path(), "animals.json", ANIMALS);
    let store = ProgressStore::new(dir.path().join("vocab"), dir.path().join("data"));
    let options = SessionOptions {
        mode: Some("english".into()),
        struggle_threshold: STRUGGLE_THRESHOLD,
        ..SessionOptions::default()
    };

    // round 1: both wrong; round 2: input closes after one answer
    let mut console = ScriptedConsole::with_lines(["x", "y", "el gato"]);
    let result = session::run(&store, &source, &options, &mut console, StdRng::seed_from_u64(3));
    assert!(result.is_err());

    let saved = store.load(&source).unwrap();
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|t| t.attempts == 1 && !t.correct));
    assert_eq!(store.pending_count(&source), Some(2));
}

#[test]
fn narrowed_prompt_survives_resume() {
    let dir = tempdir().unwrap();
    let source = write_source(
        dir.path(),
        "home.json",
        r#"{"categories": ["english", "spanish"], "vocab": [[["house", "home"], ["casa"]]]}"#,
    );
    let store = ProgressStore::new(dir.path().join("vocab"), dir.path().join("data"));
    let options = SessionOptions {
        mode: Some("english".into()),
        struggle_threshold: STRUGGLE_THRESHOLD,
        ..SessionOptions::default()
    };

    let mut first = ScriptedConsole::with_lines(["wrong"]);
    assert!(session::run(&store, &source, &options, &mut first, StdRng::seed_from_u64(4)).is_err());
    let shown = first.prompts()[0].to_string();

    let mut second = ScriptedConsole::with_lines(["y", "casa"]);
    session::run(&store, &source, &options, &mut second, StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(second.prompts(), vec![shown.as_str()]);
}
