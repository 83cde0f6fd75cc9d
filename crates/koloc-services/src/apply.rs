use koloc_core::{Entry, KolocError, Result};
use koloc_po::EncodeOptions;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::import::{import_files, ImportOutcome, TranslationSet};
use crate::Layout;

/// Review state given to freshly applied translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuzzyPolicy {
    /// Human-reviewed: clear fuzzy, the entry becomes verified.
    Verified,
    /// Machine output: mark fuzzy so it gets reviewed later.
    Unreviewed,
}

impl FuzzyPolicy {
    pub fn from_verified_flag(verified: bool) -> Self {
        if verified {
            FuzzyPolicy::Verified
        } else {
            FuzzyPolicy::Unreviewed
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    /// msgids whose msgstr was replaced, in catalog order.
    pub applied: Vec<String>,
    /// msgids that hit a verified entry and were left alone.
    pub protected: Vec<String>,
}

impl ApplyReport {
    /// Flag mutations to replay at write time for the applied ids.
    pub fn encode_options(&self, policy: FuzzyPolicy) -> EncodeOptions {
        let ids: HashSet<String> = self.applied.iter().cloned().collect();
        match policy {
            FuzzyPolicy::Verified => EncodeOptions {
                remove_fuzzy_for: ids,
                ..Default::default()
            },
            FuzzyPolicy::Unreviewed => EncodeOptions {
                add_fuzzy_for: ids,
                ..Default::default()
            },
        }
    }
}

/// Write `translations` into `entries`.
///
/// An entry that is verified at this point is never modified, whatever the
/// translation set says. Applied entries get their fuzzy flag set or cleared
/// according to `policy`.
pub fn apply_translations(
    entries: &mut [Entry],
    translations: &TranslationSet,
    policy: FuzzyPolicy,
) -> ApplyReport {
    let mut report = ApplyReport::default();
    for entry in entries.iter_mut().filter(|e| !e.is_header && e.has_id()) {
        let Some(msgstr) = translations.get(&entry.msgid) else {
            continue;
        };
        if entry.is_verified() {
            tracing::debug!(event = "apply_protected", msgid = %crate::preview(&entry.msgid, 50));
            report.protected.push(entry.msgid.clone());
            continue;
        }
        entry.msgstr = msgstr.to_string();
        entry.set_fuzzy(policy == FuzzyPolicy::Unreviewed);
        report.applied.push(entry.msgid.clone());
    }
    report
}

/// What one `apply` run did to a catalog.
#[derive(Debug, Clone)]
pub struct ApplyRun {
    pub po_path: PathBuf,
    pub import: ImportOutcome,
    pub report: ApplyReport,
    /// Inputs that did not exist and were skipped.
    pub missing_inputs: Vec<PathBuf>,
    pub written: bool,
}

/// Load the catalog for `lang`, merge every input file into it and write it
/// back unless `dry_run` is set.
///
/// Fails when no inputs are given, or when the inputs yield no usable
/// translation at all.
pub fn apply_files<P: AsRef<Path>>(
    layout: &Layout,
    lang: &str,
    inputs: &[P],
    policy: FuzzyPolicy,
    dry_run: bool,
) -> Result<ApplyRun> {
    if inputs.is_empty() {
        return Err(KolocError::NoInputFiles.into());
    }
    let (po_path, mut entries) = layout.load(lang)?;
    let (import, missing_inputs) = import_files(inputs, &entries)?;
    for err in &import.errors {
        tracing::warn!(event = "import_item_rejected", lang = lang, reason = %err);
    }
    if import.translations.is_empty() {
        return Err(KolocError::NoTranslations.into());
    }

    let report = apply_translations(&mut entries, &import.translations, policy);
    let written = !dry_run;
    if written {
        koloc_po::write_po_file(&po_path, &entries, &report.encode_options(policy))?;
    }
    tracing::info!(
        event = "apply_done",
        lang = lang,
        applied = report.applied.len(),
        skipped_verified = import.skipped_verified.len(),
        dry_run = dry_run
    );
    Ok(ApplyRun {
        po_path,
        import,
        report,
        missing_inputs,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuzzy(msgid: &str, msgstr: &str) -> Entry {
        let mut e = Entry::new(msgid, msgstr);
        e.set_fuzzy(true);
        e
    }

    fn set(pairs: &[(&str, &str)]) -> TranslationSet {
        let mut t = TranslationSet::new();
        for (k, v) in pairs {
            t.insert(*k, *v);
        }
        t
    }

    #[test]
    fn verified_entries_are_never_touched() {
        let mut entries = vec![Entry::new("Cancel", "Annuler"), Entry::new("Save", "")];
        let translations = set(&[("Cancel", "Abandonner"), ("Save", "Enregistrer")]);
        let report = apply_translations(&mut entries, &translations, FuzzyPolicy::Verified);

        assert_eq!(entries[0].msgstr, "Annuler");
        assert!(entries[0].flags.is_empty());
        assert_eq!(report.protected, vec!["Cancel"]);
        assert_eq!(report.applied, vec!["Save"]);
        assert!(entries[1].is_verified());
    }

    #[test]
    fn unreviewed_output_is_marked_fuzzy() {
        let mut entries = vec![Entry::new("Save", ""), fuzzy("Load", "Charger?")];
        let translations = set(&[("Save", "Enregistrer"), ("Load", "Charger")]);
        apply_translations(&mut entries, &translations, FuzzyPolicy::Unreviewed);
        assert!(entries.iter().all(|e| e.is_fuzzy() && e.is_translated()));
        assert_eq!(entries[1].msgstr, "Charger");
    }

    #[test]
    fn reviewed_fuzzy_entry_becomes_verified() {
        let mut entries = vec![fuzzy("Load", "Charger?")];
        apply_translations(&mut entries, &set(&[("Load", "Charger")]), FuzzyPolicy::Verified);
        assert!(entries[0].is_verified());
    }

    #[test]
    fn encode_options_follow_policy() {
        let report = ApplyReport {
            applied: vec!["Save".into()],
            protected: vec![],
        };
        let opts = report.encode_options(FuzzyPolicy::Verified);
        assert!(opts.remove_fuzzy_for.contains("Save"));
        assert!(opts.add_fuzzy_for.is_empty());
        let opts = report.encode_options(FuzzyPolicy::Unreviewed);
        assert!(opts.add_fuzzy_for.contains("Save"));
    }

    const CATALOG: &str = r#"msgid ""
msgstr ""
"Language: fr\n"

#: main.lua:10
msgid "Cancel"
msgstr "Annuler"

#: main.lua:12
#, fuzzy
msgid "Save"
msgstr "Sauve"

#: main.lua:14
msgid "Load"
msgstr ""
"#;

    fn layout_with_catalog(dir: &Path) -> Layout {
        let layout = Layout::new(dir.join("locale"), "koassistant");
        let po = layout.po_path("fr");
        std::fs::create_dir_all(po.parent().unwrap()).unwrap();
        std::fs::write(&po, CATALOG).unwrap();
        layout
    }

    #[test]
    fn apply_files_writes_catalog_and_keeps_verified() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_with_catalog(dir.path());
        let input = dir.path().join("fr_batch1.json");
        std::fs::write(
            &input,
            r#"{"translations":[{"msgid":"Cancel","msgstr":"Abandonner"},{"msgid":"Save","msgstr":"Enregistrer"},{"msgid":"Load","msgstr":"Charger"}]}"#,
        )
        .unwrap();

        let run = apply_files(&layout, "fr", &[&input], FuzzyPolicy::Unreviewed, false).unwrap();
        assert!(run.written);
        assert!(run.import.skipped_verified.contains("Cancel"));
        assert_eq!(run.report.applied, vec!["Save", "Load"]);

        let entries = koloc_po::read_po_file(&run.po_path).unwrap();
        let by_id = |id: &str| entries.iter().find(|e| e.msgid == id).unwrap().clone();
        assert_eq!(by_id("Cancel").msgstr, "Annuler");
        assert!(by_id("Cancel").is_verified());
        assert_eq!(by_id("Save").msgstr, "Enregistrer");
        assert!(by_id("Save").is_fuzzy());
        assert_eq!(by_id("Load").msgstr, "Charger");
        assert!(by_id("Load").is_fuzzy());
        assert!(entries[0].is_header);
    }

    #[test]
    fn dry_run_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_with_catalog(dir.path());
        let input = dir.path().join("in.json");
        std::fs::write(&input, r#"{"translations":[{"msgid":"Load","msgstr":"Charger"}]}"#).unwrap();

        let run = apply_files(&layout, "fr", &[&input], FuzzyPolicy::Verified, true).unwrap();
        assert!(!run.written);
        assert_eq!(std::fs::read_to_string(layout.po_path("fr")).unwrap(), CATALOG);
    }

    #[test]
    fn no_usable_translation_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_with_catalog(dir.path());
        let input = dir.path().join("in.json");
        std::fs::write(&input, r#"{"translations":[{"msgid":"Cancel","msgstr":"X"}]}"#).unwrap();

        let err = apply_files(&layout, "fr", &[&input], FuzzyPolicy::Verified, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<KolocError>(),
            Some(KolocError::NoTranslations)
        ));

        let none: [&Path; 0] = [];
        let err = apply_files(&layout, "fr", &none, FuzzyPolicy::Verified, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<KolocError>(),
            Some(KolocError::NoInputFiles)
        ));
    }
}
