//! High-level orchestration layer over the codec and the validator.
//! Intentionally thin: exposes stable functions used by the CLI.

use std::path::PathBuf;

pub use koloc_core::{Entry, KolocError, Result};

pub mod apply;
pub mod export;
pub mod extract;
pub mod import;
pub mod status;
pub mod validate;

pub const DEFAULT_LOCALE_DIR: &str = "locale";
pub const DEFAULT_DOMAIN: &str = "koassistant";
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Where catalogs live: `<locale_dir>/<lang>/LC_MESSAGES/<domain>.po`.
#[derive(Debug, Clone)]
pub struct Layout {
    pub locale_dir: PathBuf,
    pub domain: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            locale_dir: PathBuf::from(DEFAULT_LOCALE_DIR),
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }
}

impl Layout {
    pub fn new(locale_dir: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
        Self {
            locale_dir: locale_dir.into(),
            domain: domain.into(),
        }
    }

    pub fn po_path(&self, lang: &str) -> PathBuf {
        self.locale_dir
            .join(lang)
            .join("LC_MESSAGES")
            .join(format!("{}.po", self.domain))
    }

    /// Decode the catalog of `lang`; a missing file is an environment error.
    pub fn load(&self, lang: &str) -> Result<(PathBuf, Vec<Entry>)> {
        let path = self.po_path(lang);
        if !path.exists() {
            return Err(KolocError::PoFileNotFound(path).into());
        }
        let entries = koloc_po::read_po_file(&path)?;
        tracing::info!(event = "catalog_loaded", lang = lang, path = %path.display(), entries = entries.len());
        Ok((path, entries))
    }
}

/// `ceil(count / batch_size)`, 0 for an empty set.
pub fn batch_count(count: usize, batch_size: usize) -> usize {
    if count == 0 || batch_size == 0 {
        0
    } else {
        count.div_ceil(batch_size)
    }
}

/// First `n` characters of `s`, used for log and console previews.
pub fn preview(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}
