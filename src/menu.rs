use crate::catalog::{self, VocabFile};
use crate::console::{Console, Event};
use crate::progress::ProgressStore;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Greet, list sets with saved progress and offer to wipe them all.
/// Returns once the user goes on to pick a set.
pub fn main_menu<C: Console + ?Sized>(store: &ProgressStore, console: &mut C) -> io::Result<()> {
    let in_progress = store.in_progress();
    let has_progress = !in_progress.is_empty();
    console.emit(Event::Welcome { in_progress });
    if !has_progress {
        return Ok(());
    }

    if console.read_line("Choose an option (1/2): ")? != "2" {
        return Ok(());
    }
    let confirm =
        console.read_line("⚠️ Are you sure you want to delete ALL saved progress? (yes/no): ")?;
    if !confirm.eq_ignore_ascii_case("yes") {
        console.emit(Event::ClearAllCancelled);
        return Ok(());
    }
    match store.clear_all() {
        Ok(removed) => console.emit(Event::AllProgressCleared { removed }),
        Err(e) => {
            warn!("could not clear progress: {e}");
            console.emit(Event::ClearAllFailed {
                reason: e.to_string(),
            });
        }
    }
    Ok(())
}

/// Pick a folder, then a file in it. `None` when the vocabulary root holds no sets.
pub fn select_vocab_file<C: Console + ?Sized>(
    vocab_root: &Path,
    store: &ProgressStore,
    console: &mut C,
) -> io::Result<Option<PathBuf>> {
    let mut grouped = catalog::group_by_folder(vocab_root, catalog::find_vocab_files(vocab_root));
    if grouped.is_empty() {
        console.emit(Event::NoVocabFiles {
            dir: vocab_root.display().to_string(),
        });
        return Ok(None);
    }

    let folders: Vec<String> = grouped.keys().cloned().collect();
    console.emit(Event::Folders {
        names: folders.clone(),
    });
    let folder = choose(console, folders.len(), "\nChoose a folder by number: ")?;

    let files: Vec<VocabFile> = grouped
        .remove(&folders[folder])
        .unwrap_or_default()
        .iter()
        .map(|path| catalog::describe(store, path))
        .collect();
    let count = files.len();
    console.emit(Event::VocabFiles { files: files.clone() });
    let choice = choose(console, count, "\nChoose a vocab set by number: ")?;

    let path = files[choice].path.clone();
    let shown = path.strip_prefix(vocab_root).unwrap_or(&path);
    console.emit(Event::Selected {
        name: shown.to_string_lossy().replace('\\', "/"),
    });
    Ok(Some(path))
}

/// Ask until the reply is a number in `0..len`
pub fn choose<C: Console + ?Sized>(console: &mut C, len: usize, prompt: &str) -> io::Result<usize> {
    loop {
        if let Some(idx) = catalog::parse_choice(&console.read_line(prompt)?, len) {
            return Ok(idx);
        }
        console.emit(Event::InvalidChoice);
    }
}
