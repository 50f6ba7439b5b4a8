use crate::progress::ProgressStore;
use itertools::Itertools;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Folder label for files sitting directly in the vocabulary root
pub const ROOT_FOLDER: &str = ".";

/// A selectable vocabulary file with its summary counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabFile {
    pub path: PathBuf,
    pub words: usize,
    /// Pending entries of a saved session, if one is readable
    pub pending: Option<usize>,
}

impl VocabFile {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Every `.json` file below `root`, sorted by path
pub fn find_vocab_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk(root, &mut files);
    files.sort();
    files
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
}

/// Files keyed by their folder relative to `root`
pub fn group_by_folder(root: &Path, files: Vec<PathBuf>) -> BTreeMap<String, Vec<PathBuf>> {
    files
        .into_iter()
        .map(|file| {
            let folder = file
                .strip_prefix(root)
                .ok()
                .and_then(Path::parent)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| ROOT_FOLDER.to_string());
            (folder, file)
        })
        .into_group_map()
        .into_iter()
        .collect()
}

/// Length of the `vocab` list, 0 when the file is unreadable
pub fn word_count(path: &Path) -> usize {
    fs::read(path)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
        .and_then(|v| v.get("vocab").and_then(Value::as_array).map(Vec::len))
        .unwrap_or(0)
}

pub fn describe(store: &ProgressStore, path: &Path) -> VocabFile {
    VocabFile {
        path: path.to_path_buf(),
        words: word_count(path),
        pending: store.pending_count(path),
    }
}

/// Parse a numbered menu choice in `0..len`
pub fn parse_choice(input: &str, len: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|idx| *idx < len)
}
