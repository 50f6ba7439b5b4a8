use crate::console::{Console, Event};
use crate::error::SessionError;
use crate::pairs::{self, Mode};
use crate::progress::ProgressStore;
use crate::quiz::Quiz;
use crate::results::{self, Summary};
use crate::translation::Translation;
use crate::vocab::VocabularySet;
use rand::Rng;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Skip the mode prompt
    pub mode: Option<String>,
    /// Start over without offering to resume
    pub fresh: bool,
    pub struggle_threshold: u32,
}

/// Build the translation list for `source`: saved progress if the user resumes,
/// otherwise fresh pairs under the chosen mode. Source format errors surface
/// before any input is read.
pub fn prepare<C, R>(
    store: &ProgressStore,
    source: &Path,
    options: &SessionOptions,
    console: &mut C,
    rng: &mut R,
) -> Result<Vec<Translation>, SessionError>
where
    C: Console + ?Sized,
    R: Rng,
{
    let set = VocabularySet::load(source)?;

    let progress = store.for_source(source);
    if !options.fresh && progress.exists() && console.confirm("Resume previous session?")? {
        match progress.load() {
            Ok(translations) => {
                let pending = translations.iter().filter(|t| t.is_pending()).count();
                info!(source = %source.display(), pending, "resuming session");
                console.emit(Event::Resumed { pending });
                return Ok(translations);
            }
            Err(e) => {
                warn!("ignoring saved progress: {e}");
                console.emit(Event::ProgressDiscarded {
                    reason: e.to_string(),
                });
            }
        }
    }

    let input = match &options.mode {
        Some(mode) => mode.clone(),
        None => console.read_line(&format!("Mode? ({}): ", Mode::choices(&set).join(" / ")))?,
    };
    let (mode, invalid) = Mode::parse_or_default(&input, &set);
    if let Some(invalid) = invalid {
        console.emit(Event::ModeFallback {
            input: invalid.input,
            fallback: invalid.fallback,
        });
    }

    info!(source = %source.display(), ?mode, entries = set.len(), "starting fresh session");
    Ok(pairs::generate(&set, mode, rng))
}

/// Prepare, quiz until complete, then report and clear saved progress.
pub fn run<C, R>(
    store: &ProgressStore,
    source: &Path,
    options: &SessionOptions,
    console: &mut C,
    mut rng: R,
) -> Result<Summary, SessionError>
where
    C: Console + ?Sized,
    R: Rng,
{
    let translations = prepare(store, source, options, console, &mut rng)?;
    let mut progress = store.for_source(source);
    let finished = Quiz::new(translations, rng).run(console, &mut progress)?;
    Ok(results::finish(
        &finished,
        options.struggle_threshold,
        &progress,
        console,
    )?)
}
