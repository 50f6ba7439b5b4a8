use crate::error::ProgressError;
use crate::translation::Translation;
use crate::vocab::WordGroup;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Appended to a source file's stem to name its progress record.
pub const PROGRESS_SUFFIX: &str = "_progress";

/// Folder under the progress root for sources outside the vocabulary root
pub const EXTERNAL_DIR: &str = "_external";

/// Persists per-source quiz progress as JSON under a dedicated root,
/// mirroring the layout of the vocabulary root.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    vocab_root: PathBuf,
    progress_root: PathBuf,
}

impl ProgressStore {
    pub fn new<V: AsRef<Path>, P: AsRef<Path>>(vocab_root: V, progress_root: P) -> Self {
        Self {
            vocab_root: vocab_root.as_ref().to_path_buf(),
            progress_root: progress_root.as_ref().to_path_buf(),
        }
    }

    /// `progress_root/<relative dirs>/<stem>_progress.<ext>`. Both paths are made
    /// absolute and lexically normalized first, so every spelling of a source maps
    /// to one record. Sources outside the vocabulary root keep their full directory
    /// chain under [`EXTERNAL_DIR`].
    pub fn progress_path(&self, source: &Path) -> PathBuf {
        let root = normalize(&self.vocab_root);
        let source = normalize(source);
        let relative = match source.strip_prefix(&root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => Path::new(EXTERNAL_DIR).join(
                source
                    .components()
                    .filter(|c| matches!(c, Component::Normal(_)))
                    .collect::<PathBuf>(),
            ),
        };
        let stem = relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = match relative.extension() {
            Some(ext) => format!("{stem}{PROGRESS_SUFFIX}.{}", ext.to_string_lossy()),
            None => format!("{stem}{PROGRESS_SUFFIX}"),
        };
        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        self.progress_root.join(parent).join(file_name)
    }

    pub fn exists(&self, source: &Path) -> bool {
        self.progress_path(source).is_file()
    }

    pub fn load(&self, source: &Path) -> Result<Vec<Translation>, ProgressError> {
        let path = self.progress_path(source);
        let bytes = fs::read(&path).map_err(|source| ProgressError::Io {
            path: path.clone(),
            source,
        })?;
        let translations: Vec<Translation> =
            serde_json::from_slice(&bytes).map_err(|e| ProgressError::Corrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let malformed = |t: &Translation| {
            !t.prompt.is_valid() || t.answers.is_empty() || !t.answers.iter().all(WordGroup::is_valid)
        };
        if let Some(idx) = translations.iter().position(malformed) {
            return Err(ProgressError::Corrupt {
                path,
                reason: format!("record {idx} has an empty prompt or answer group"),
            });
        }
        debug!(path = %path.display(), records = translations.len(), "progress loaded");
        Ok(translations)
    }

    /// Overwrite the record for `source` with the full current list.
    pub fn save(&self, translations: &[Translation], source: &Path) -> Result<(), ProgressError> {
        let path = self.progress_path(source);
        let io_err = |source: io::Error| ProgressError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(translations).map_err(|e| ProgressError::Io {
            path: path.clone(),
            source: e.into(),
        })?;
        fs::write(&path, data).map_err(io_err)?;
        debug!(path = %path.display(), records = translations.len(), "progress saved");
        Ok(())
    }

    /// Delete the record if present and prune directories left empty, stopping
    /// at the progress root.
    pub fn clear(&self, source: &Path) -> Result<(), ProgressError> {
        let path = self.progress_path(source);
        match fs::remove_file(&path) {
            Ok(()) => info!(path = %path.display(), "progress cleared"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(ProgressError::Io { path, source }),
        }
        self.prune_empty_parents(&path);
        Ok(())
    }

    fn prune_empty_parents(&self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == self.progress_root || !dir.starts_with(&self.progress_root) {
                break;
            }
            let is_empty = fs::read_dir(dir)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if !is_empty || fs::remove_dir(dir).is_err() {
                break;
            }
            current = dir.parent();
        }
    }

    /// Pending (not yet correct) entries recorded for `source`, or `None` when
    /// there is no readable record.
    pub fn pending_count(&self, source: &Path) -> Option<usize> {
        if !self.exists(source) {
            return None;
        }
        self.load(source)
            .ok()
            .map(|translations| translations.iter().filter(|t| t.is_pending()).count())
    }

    /// Names of vocabulary sets with a record, relative to the progress root and
    /// without the progress suffix, sorted.
    pub fn in_progress(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_records(&self.progress_root, &self.progress_root, &mut names);
        names.sort();
        names
    }

    /// Remove every record. Returns whether anything was there to remove.
    pub fn clear_all(&self) -> Result<bool, ProgressError> {
        if !self.progress_root.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&self.progress_root).map_err(|source| ProgressError::Io {
            path: self.progress_root.clone(),
            source,
        })?;
        info!(root = %self.progress_root.display(), "all progress cleared");
        Ok(true)
    }

    pub fn for_source<'a>(&'a self, source: &'a Path) -> SourceProgress<'a> {
        SourceProgress {
            store: self,
            source,
        }
    }
}

/// Absolute form of `path` with `.` and `..` resolved without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

fn collect_records(root: &Path, dir: &Path, names: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_records(root, &path, names);
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(name) = stem.strip_suffix(PROGRESS_SUFFIX) else {
            continue;
        };
        let relative = path
            .strip_prefix(root)
            .ok()
            .and_then(Path::parent)
            .map(|p| p.join(name))
            .unwrap_or_else(|| PathBuf::from(name));
        names.push(relative.to_string_lossy().replace('\\', "/"));
    }
}

/// Progress operations bound to one source file.
#[derive(Debug, Clone, Copy)]
pub struct SourceProgress<'a> {
    store: &'a ProgressStore,
    source: &'a Path,
}

impl SourceProgress<'_> {
    pub fn exists(&self) -> bool {
        self.store.exists(self.source)
    }

    pub fn load(&self) -> Result<Vec<Translation>, ProgressError> {
        self.store.load(self.source)
    }

    pub fn save(&self, translations: &[Translation]) -> Result<(), ProgressError> {
        self.store.save(translations, self.source)
    }

    pub fn clear(&self) -> Result<(), ProgressError> {
        self.store.clear(self.source)
    }
}
