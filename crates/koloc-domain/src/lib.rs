//! Documents that leave the process: batch exports handed to translators,
//! the import documents they send back, and machine-readable validation reports.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const EXPORT_FORMAT_VERSION: &str = "1.1";
pub const SCHEMA_VERSION: u32 = 1;

/// One string handed to a translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchRecord {
    /// 1-based position within the whole filtered set, not within the batch.
    pub id: usize,
    pub msgid: String,
    pub context: String,
    pub references: Vec<String>,
    pub current_msgstr: String,
    pub is_fuzzy: bool,
    /// Strings from the same family that need a distinct translation.
    pub similar_strings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExportMetadata {
    pub language_code: String,
    pub language_name: String,
    pub batch: usize,
    pub total_batches: usize,
    pub entry_count: usize,
    pub mode: String,
    pub mode_description: String,
    pub export_format_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub guidelines: String,
    pub entries: Vec<BatchRecord>,
}

/// Only `msgid` and `msgstr` are read back; every other field is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImportItem {
    #[serde(default)]
    pub msgid: Option<String>,
    #[serde(default)]
    pub msgstr: Option<String>,
}

/// Either a flat `translations` list or the `entries` of an export with `msgstr` filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImportDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<ImportItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<ImportItem>>,
}

impl ImportDocument {
    /// `translations` wins when both lists are present.
    pub fn items(&self) -> &[ImportItem] {
        self.translations
            .as_deref()
            .or(self.entries.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidationMsg {
    pub check: String,
    pub line: Option<usize>,
    pub message: String,
}

/// Per-language validation outcome as emitted by `koloc validate --format json`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub schema_version: u32,
    pub language: String,
    pub path: String,
    pub passed: bool,
    pub errors: Vec<ValidationMsg>,
    pub warnings: Vec<ValidationMsg>,
    pub info: Vec<ValidationMsg>,
}
