// Library surface for the binary and the headless integration tests.
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod console;
pub mod error;
pub mod menu;
pub mod pairs;
pub mod progress;
pub mod quiz;
pub mod results;
pub mod session;
pub mod style;
pub mod translation;
pub mod vocab;

pub use error::{ProgressError, SessionError, VocabError};
pub use translation::Translation;
pub use vocab::{VocabularySet, Word, WordGroup};
