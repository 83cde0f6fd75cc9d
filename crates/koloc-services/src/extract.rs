use indexmap::IndexMap;
use koloc_core::Entry;
use koloc_domain::BatchRecord;
use std::collections::HashMap;

use crate::batch_count;

const MAX_REFERENCES: usize = 3;
const MAX_SIMILAR: usize = 5;

/// Which entries an extraction hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// No translation yet.
    Empty,
    /// Marked fuzzy.
    Fuzzy,
    /// Everything that is not verified.
    All,
}

impl ExtractMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractMode::Empty => "empty",
            ExtractMode::Fuzzy => "fuzzy",
            ExtractMode::All => "all",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExtractMode::Empty => "untranslated strings",
            ExtractMode::Fuzzy => "fuzzy strings (need quality improvement)",
            ExtractMode::All => "all non-verified strings",
        }
    }
}

/// Entries eligible for translation work, in file order.
///
/// Verified entries never make it out, whatever the mode.
pub fn filter_entries(entries: &[Entry], mode: ExtractMode) -> Vec<&Entry> {
    entries
        .iter()
        .filter(|e| !e.is_header && e.has_id())
        .filter(|e| !e.is_verified())
        .filter(|e| match mode {
            ExtractMode::Empty => e.is_empty(),
            ExtractMode::Fuzzy => e.is_fuzzy(),
            ExtractMode::All => true,
        })
        .collect()
}

enum Matcher {
    Prefix(&'static str),
    Suffix(&'static [&'static str]),
    ContainsAny(&'static [&'static str]),
    /// Contains the first string and any of the rest.
    WithAny(&'static str, &'static [&'static str]),
}

impl Matcher {
    fn matches(&self, s: &str) -> bool {
        match self {
            Matcher::Prefix(p) => s.starts_with(p),
            Matcher::Suffix(list) => list.iter().any(|x| s.ends_with(x)),
            Matcher::ContainsAny(list) => list.iter().any(|x| s.contains(x)),
            Matcher::WithAny(needle, list) => {
                s.contains(needle) && list.iter().any(|x| s.contains(x))
            }
        }
    }
}

/// Families of strings that translators tend to collapse into one rendering.
/// Evaluated top to bottom, first match wins.
const SIMILARITY_RULES: &[(&str, Matcher)] = &[
    ("KOAssistant: gestures", Matcher::Prefix("KOAssistant:")),
    ("Menu actions", Matcher::WithAny("Menu", &["Remove", "Add"])),
    ("Popup actions", Matcher::WithAny("Popup", &["Remove", "Add"])),
    ("Settings items", Matcher::Suffix(&["Settings", "Settings..."])),
    ("Reset/Restore actions", Matcher::ContainsAny(&["Reset", "Restore"])),
];

/// Group msgids by family label; labels and members keep file order.
pub fn similarity_groups(entries: &[Entry]) -> IndexMap<&'static str, Vec<String>> {
    let mut groups: IndexMap<&'static str, Vec<String>> = IndexMap::new();
    for e in entries.iter().filter(|e| !e.is_header && e.has_id()) {
        if let Some((label, _)) = SIMILARITY_RULES.iter().find(|(_, m)| m.matches(&e.msgid)) {
            groups.entry(*label).or_default().push(e.msgid.clone());
        }
    }
    groups
}

/// Context labels keyed on the file part of the first reference.
/// `true` means a case-insensitive match.
const CONTEXT_RULES: &[(&str, bool, &str)] = &[
    ("gesture", true, "Gesture setting"),
    ("dialog", true, "Dialog UI"),
    ("settings", true, "Settings menu"),
    ("main.lua", false, "Main menu"),
];

/// One-line, human readable hint of where a string shows up.
pub fn context_summary(entry: &Entry) -> String {
    let Some(reference) = entry.references.first() else {
        return "Unknown context".to_string();
    };
    let file = reference.split(':').next().unwrap_or(reference);
    let lower = file.to_lowercase();
    let label = CONTEXT_RULES
        .iter()
        .find(|(needle, ci, _)| {
            if *ci {
                lower.contains(needle)
            } else {
                file.contains(needle)
            }
        })
        .map(|(_, _, label)| *label)
        .unwrap_or("UI element");
    format!("{label} ({file})")
}

/// Records of batch `batch` (1-based) and the total number of batches.
///
/// An out-of-range batch yields no records; the caller decides whether that is an error.
pub fn extract_batch(
    entries: &[Entry],
    batch: usize,
    batch_size: usize,
    groups: &IndexMap<&'static str, Vec<String>>,
    mode: ExtractMode,
) -> (Vec<BatchRecord>, usize) {
    let selected = filter_entries(entries, mode);
    let total = batch_count(selected.len(), batch_size);
    if batch < 1 || batch > total {
        return (Vec::new(), total);
    }

    let start = (batch - 1) * batch_size;
    let end = (start + batch_size).min(selected.len());

    let mut group_of: HashMap<&str, &'static str> = HashMap::new();
    for (label, members) in groups {
        for msgid in members {
            group_of.insert(msgid.as_str(), *label);
        }
    }

    let records = selected[start..end]
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let similar_strings = group_of
                .get(e.msgid.as_str())
                .and_then(|label| groups.get(*label))
                .map(|members| {
                    members
                        .iter()
                        .filter(|m| **m != e.msgid)
                        .take(MAX_SIMILAR)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            BatchRecord {
                id: start + i + 1,
                msgid: e.msgid.clone(),
                context: context_summary(e),
                references: e.references.iter().take(MAX_REFERENCES).cloned().collect(),
                current_msgstr: e.msgstr.clone(),
                is_fuzzy: e.is_fuzzy(),
                similar_strings,
            }
        })
        .collect();
    (records, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(msgid: &str, msgstr: &str, fuzzy: bool) -> Entry {
        let mut e = Entry::new(msgid, msgstr);
        e.set_fuzzy(fuzzy);
        e
    }

    fn catalog() -> Vec<Entry> {
        vec![
            Entry {
                is_header: true,
                msgstr: "Language: fr\n".into(),
                ..Default::default()
            },
            entry("Cancel", "Annuler", false),
            entry("Save", "", false),
            entry("Cache size: %1 MB", "Taille du cache : %1 Mo", true),
            entry("Add to Menu", "", false),
            entry("Remove from Menu", "Retirer", true),
            entry("Fuzzy but empty", "", true),
        ]
    }

    fn ids(list: &[&Entry]) -> Vec<String> {
        list.iter().map(|e| e.msgid.clone()).collect()
    }

    #[test]
    fn modes_never_include_verified_or_header() {
        let entries = catalog();
        assert_eq!(
            ids(&filter_entries(&entries, ExtractMode::Empty)),
            vec!["Save", "Add to Menu", "Fuzzy but empty"]
        );
        assert_eq!(
            ids(&filter_entries(&entries, ExtractMode::Fuzzy)),
            vec!["Cache size: %1 MB", "Remove from Menu", "Fuzzy but empty"]
        );
        let all = filter_entries(&entries, ExtractMode::All);
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|e| !e.is_verified() && !e.is_header));
    }

    #[test]
    fn similarity_rules_first_match_wins() {
        let entries = vec![
            Entry::new("KOAssistant: Add to Menu", ""),
            Entry::new("Add to Menu", ""),
            Entry::new("Remove from Popup", ""),
            Entry::new("Chat Settings", ""),
            Entry::new("Reset Settings", ""),
            Entry::new("Restore defaults", ""),
            Entry::new("Plain", ""),
        ];
        let groups = similarity_groups(&entries);
        assert_eq!(groups["KOAssistant: gestures"], vec!["KOAssistant: Add to Menu"]);
        assert_eq!(groups["Menu actions"], vec!["Add to Menu"]);
        assert_eq!(groups["Popup actions"], vec!["Remove from Popup"]);
        // "Reset Settings" ends with Settings, so the settings rule claims it first
        assert_eq!(groups["Settings items"], vec!["Chat Settings", "Reset Settings"]);
        assert_eq!(groups["Reset/Restore actions"], vec!["Restore defaults"]);
        assert_eq!(groups.len(), 5);
    }

    #[test]
    fn context_from_first_reference() {
        let mut e = Entry::new("x", "");
        assert_eq!(context_summary(&e), "Unknown context");
        e.references = vec!["koassistant_gestures.lua:12".into(), "main.lua:3".into()];
        assert_eq!(context_summary(&e), "Gesture setting (koassistant_gestures.lua)");
        e.references = vec!["ui/ChatDialog.lua:7".into()];
        assert_eq!(context_summary(&e), "Dialog UI (ui/ChatDialog.lua)");
        e.references = vec!["Settings_schema.lua:1".into()];
        assert_eq!(context_summary(&e), "Settings menu (Settings_schema.lua)");
        e.references = vec!["main.lua:40".into()];
        assert_eq!(context_summary(&e), "Main menu (main.lua)");
        e.references = vec!["Main.lua:40".into()];
        assert_eq!(context_summary(&e), "UI element (Main.lua)");
    }

    #[test]
    fn single_empty_entry_scenario() {
        let entries = vec![Entry::new("Delete %1 item(s)?", "")];
        let groups = similarity_groups(&entries);
        let (records, total) = extract_batch(&entries, 1, 1, &groups, ExtractMode::Empty);
        assert_eq!(total, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].current_msgstr, "");
        assert!(!records[0].is_fuzzy);
        assert!(records[0].similar_strings.is_empty());
    }

    #[test]
    fn batches_cover_filtered_set_exactly_once() {
        let entries: Vec<Entry> = (0..23)
            .map(|i| {
                if i % 4 == 0 {
                    Entry::new(format!("Verified {i}"), "ok")
                } else {
                    Entry::new(format!("String {i}"), "")
                }
            })
            .collect();
        let groups = similarity_groups(&entries);
        let expected: Vec<String> = filter_entries(&entries, ExtractMode::All)
            .iter()
            .map(|e| e.msgid.clone())
            .collect();

        let (_, total) = extract_batch(&entries, 1, 5, &groups, ExtractMode::All);
        assert_eq!(total, expected.len().div_ceil(5));

        let mut seen = Vec::new();
        let mut display_ids = Vec::new();
        for n in 1..=total {
            let (records, t) = extract_batch(&entries, n, 5, &groups, ExtractMode::All);
            assert_eq!(t, total);
            for r in records {
                display_ids.push(r.id);
                seen.push(r.msgid);
            }
        }
        assert_eq!(seen, expected);
        assert_eq!(display_ids, (1..=expected.len()).collect::<Vec<_>>());
    }

    #[test]
    fn out_of_range_batch_is_empty_not_error() {
        let entries = catalog();
        let groups = similarity_groups(&entries);
        let (records, total) = extract_batch(&entries, 0, 2, &groups, ExtractMode::All);
        assert!(records.is_empty());
        assert_eq!(total, 3);
        let (records, _) = extract_batch(&entries, 4, 2, &groups, ExtractMode::All);
        assert!(records.is_empty());

        let nothing = vec![Entry::new("Cancel", "Annuler")];
        let (records, total) = extract_batch(&nothing, 1, 10, &groups, ExtractMode::Empty);
        assert!(records.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn records_carry_siblings_and_trimmed_references() {
        let mut entries = vec![
            Entry::new("Add to Menu", ""),
            Entry::new("Remove from Menu", ""),
            Entry::new("Add Menu separator", "ok"),
        ];
        entries[0].references = ["a.lua:1", "b.lua:2", "c.lua:3", "d.lua:4"]
            .map(String::from)
            .to_vec();
        let groups = similarity_groups(&entries);
        let (records, _) = extract_batch(&entries, 1, 10, &groups, ExtractMode::Empty);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].references.len(), 3);
        // verified siblings are still useful hints
        assert_eq!(
            records[0].similar_strings,
            vec!["Remove from Menu", "Add Menu separator"]
        );
    }

    #[test]
    fn siblings_exclude_self_and_stop_at_five() {
        let names: Vec<String> = ('a'..='g').map(|c| format!("Reset {c}")).collect();
        let entries: Vec<Entry> = names.iter().map(|n| Entry::new(n.as_str(), "")).collect();
        let groups = similarity_groups(&entries);
        assert_eq!(groups["Reset/Restore actions"].len(), 7);

        let (records, _) = extract_batch(&entries, 1, 10, &groups, ExtractMode::Empty);
        assert_eq!(records.len(), 7);
        for r in &records {
            assert_eq!(r.similar_strings.len(), 5);
            assert!(!r.similar_strings.contains(&r.msgid));
        }
        assert_eq!(
            records[3].similar_strings,
            vec!["Reset a", "Reset b", "Reset c", "Reset e", "Reset f"]
        );
        assert_eq!(
            records[6].similar_strings,
            vec!["Reset a", "Reset b", "Reset c", "Reset d", "Reset e"]
        );
    }
}
