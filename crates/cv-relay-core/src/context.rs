//! Context document loading.
//!
//! The document is read once at startup and shared read-only for the rest of
//! the process lifetime.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::utils::count_tokens;

/// Errors that can occur while loading the context document
#[derive(Debug, Error)]
pub enum ContextError {
    /// The file is missing, unreadable, or not valid UTF-8
    #[error("failed to read context document '{}': {source}", path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// The file exists but holds no text
    #[error("context document '{}' is empty", path.display())]
    Empty {
        /// Path that was read
        path: PathBuf,
    },
}

/// Immutable reference text embedded into every prompt.
#[derive(Clone, PartialEq, Eq)]
pub struct ContextDocument {
    text: String,
}

#[allow(clippy::len_without_is_empty)]
impl ContextDocument {
    /// Read the whole file at `path` as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::Read` if the file can't be read and
    /// `ContextError::Empty` if it contains only whitespace.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContextError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ContextError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = Self::from_text(text).map_err(|_| ContextError::Empty {
            path: path.to_path_buf(),
        })?;

        info!(
            path = %path.display(),
            bytes = doc.len(),
            tokens = count_tokens(doc.as_str()),
            "Context document loaded"
        );
        Ok(doc)
    }

    /// Wrap already loaded text.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::Empty` if the text is blank.
    pub fn from_text(text: impl Into<String>) -> Result<Self, ContextError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ContextError::Empty {
                path: PathBuf::new(),
            });
        }
        Ok(Self { text })
    }

    /// The document text, verbatim.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }
}

// The document is usually a full CV; keep it out of debug output.
impl fmt::Debug for ContextDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextDocument")
            .field("bytes", &self.text.len())
            .finish()
    }
}
