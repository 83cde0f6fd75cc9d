use serde::{Deserialize, Serialize};

use crate::flags::{FlagSet, FUZZY};

/// One translatable unit of a `.po` catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: String,
    /// Indexed by plural form; gaps are filled with empty strings.
    pub msgstr_plural: Vec<String>,
    /// Raw comment lines in file order, including `#:` and `#,` lines.
    pub comments: Vec<String>,
    /// `file:line` items collected from `#:` comments.
    pub references: Vec<String>,
    pub flags: FlagSet,
    /// 1-based line of the first line of the entry.
    pub line_number: usize,
    /// Set by the decoder on the leading entry with an empty msgid.
    pub is_header: bool,
}

impl Entry {
    /// Convenience constructor for a plain singular entry.
    pub fn new(msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        Self {
            msgid: msgid.into(),
            msgstr: msgstr.into(),
            ..Default::default()
        }
    }

    pub fn has_id(&self) -> bool {
        !self.msgid.is_empty()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.contains(FUZZY)
    }

    pub fn is_translated(&self) -> bool {
        !self.msgstr.is_empty() && !self.is_header
    }

    /// Translated and not fuzzy: approved by a human, never touched again.
    pub fn is_verified(&self) -> bool {
        self.is_translated() && !self.is_fuzzy()
    }

    /// Untranslated unit. Id-less records are never counted as empty.
    pub fn is_empty(&self) -> bool {
        self.has_id() && self.msgstr.is_empty() && !self.is_header
    }

    pub fn set_fuzzy(&mut self, fuzzy: bool) {
        if fuzzy {
            self.flags.insert(FUZZY);
        } else {
            self.flags.remove(FUZZY);
        }
    }
}
