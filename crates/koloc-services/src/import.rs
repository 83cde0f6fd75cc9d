use indexmap::IndexMap;
use koloc_core::{Entry, KolocError, Result};
use koloc_domain::ImportDocument;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::preview;

/// msgid -> msgstr, in first-seen order. Re-inserting an id replaces its text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSet(IndexMap<String, String>);

impl TranslationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, msgid: impl Into<String>, msgstr: impl Into<String>) {
        self.0.insert(msgid.into(), msgstr.into());
    }

    pub fn get(&self, msgid: &str) -> Option<&str> {
        self.0.get(msgid).map(String::as_str)
    }

    pub fn contains(&self, msgid: &str) -> bool {
        self.0.contains_key(msgid)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Later sets win on conflicting ids.
    pub fn extend(&mut self, other: TranslationSet) {
        self.0.extend(other.0);
    }
}

/// What one import document contributes.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub translations: TranslationSet,
    /// Non-fatal lookup problems (missing or unknown msgid).
    pub errors: Vec<String>,
    /// Ids that target verified entries and were left out.
    pub skipped_verified: BTreeSet<String>,
}

impl ImportOutcome {
    /// Fold another outcome in; its translations override ours.
    pub fn merge(&mut self, other: ImportOutcome) {
        self.translations.extend(other.translations);
        self.errors.extend(other.errors);
        self.skipped_verified.extend(other.skipped_verified);
    }
}

/// Match import items against the catalog.
///
/// Verified targets are filtered out here already, independently of the
/// check done again at apply time.
pub fn parse_import(doc: &ImportDocument, entries: &[Entry]) -> ImportOutcome {
    let by_id: HashMap<&str, &Entry> = entries
        .iter()
        .filter(|e| e.has_id())
        .map(|e| (e.msgid.as_str(), e))
        .collect();

    let mut out = ImportOutcome::default();
    for item in doc.items() {
        let Some(msgid) = item.msgid.as_deref().filter(|m| !m.is_empty()) else {
            out.errors.push(format!("Entry missing msgid: {item:?}"));
            continue;
        };
        let Some(entry) = by_id.get(msgid) else {
            out.errors.push(format!("Unknown msgid: {}...", preview(msgid, 50)));
            continue;
        };
        if entry.is_verified() {
            out.skipped_verified.insert(msgid.to_string());
            continue;
        }
        if let Some(msgstr) = &item.msgstr {
            out.translations.insert(msgid, msgstr.clone());
        }
    }
    tracing::debug!(
        event = "import_parsed",
        translations = out.translations.len(),
        errors = out.errors.len(),
        skipped_verified = out.skipped_verified.len()
    );
    out
}

/// Read one JSON import document from disk.
pub fn read_import_file(path: &Path) -> Result<ImportDocument> {
    let text = std::fs::read_to_string(path).map_err(|e| KolocError::ImportDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let doc = serde_json::from_str(&text).map_err(|e| KolocError::ImportDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(doc)
}

/// Read and merge several import files in order. Missing files are skipped
/// and returned separately; an unparseable file aborts the whole import.
pub fn import_files<P: AsRef<Path>>(
    paths: &[P],
    entries: &[Entry],
) -> Result<(ImportOutcome, Vec<std::path::PathBuf>)> {
    let mut merged = ImportOutcome::default();
    let mut missing = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::warn!(event = "import_file_missing", path = %path.display());
            missing.push(path.to_path_buf());
            continue;
        }
        tracing::info!(event = "import_file_read", path = %path.display());
        let doc = read_import_file(path)?;
        merged.merge(parse_import(&doc, entries));
    }
    Ok((merged, missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use koloc_domain::ImportItem;

    fn item(msgid: Option<&str>, msgstr: Option<&str>) -> ImportItem {
        ImportItem {
            msgid: msgid.map(str::to_string),
            msgstr: msgstr.map(str::to_string),
        }
    }

    fn catalog() -> Vec<Entry> {
        let mut fuzzy = Entry::new("Save", "Enregistrer?");
        fuzzy.set_fuzzy(true);
        vec![Entry::new("Cancel", "Annuler"), fuzzy, Entry::new("Load", "")]
    }

    #[test]
    fn collects_errors_and_protects_verified() {
        let doc = ImportDocument {
            translations: Some(vec![
                item(None, Some("x")),
                item(Some(""), Some("x")),
                item(Some("Nope"), Some("x")),
                item(Some("Cancel"), Some("Abandonner")),
                item(Some("Save"), Some("Enregistrer")),
                item(Some("Load"), None),
            ]),
            entries: None,
        };
        let out = parse_import(&doc, &catalog());
        assert_eq!(out.errors.len(), 3);
        assert!(out.errors[2].starts_with("Unknown msgid: Nope"));
        assert!(out.skipped_verified.contains("Cancel"));
        assert!(!out.translations.contains("Cancel"));
        assert_eq!(out.translations.get("Save"), Some("Enregistrer"));
        assert!(!out.translations.contains("Load"));
        assert_eq!(out.translations.len(), 1);
    }

    #[test]
    fn later_file_wins_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        std::fs::write(&a, r#"{"translations":[{"msgid":"Load","msgstr":"Charger"},{"msgid":"Save","msgstr":"Sauver"}]}"#).unwrap();
        std::fs::write(&b, r#"{"entries":[{"id":1,"msgid":"Load","msgstr":"Ouvrir"}]}"#).unwrap();
        let absent = dir.path().join("absent.json");

        let (out, missing) = import_files(&[&a, &absent, &b], &catalog()).unwrap();
        assert!(out.errors.is_empty());
        assert_eq!(missing, vec![absent]);
        assert_eq!(out.translations.get("Load"), Some("Ouvrir"));
        let order: Vec<&str> = out.translations.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["Load", "Save"]);
    }

    #[test]
    fn unparseable_document_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let err = import_files(&[&bad], &catalog()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<KolocError>(),
            Some(KolocError::ImportDocument { .. })
        ));
    }
}
