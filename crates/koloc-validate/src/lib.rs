use koloc_core::vocab::{brand_mistranslations, BRAND_NAMES, TECHNICAL_TERMS};
use koloc_core::Entry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

/// Translations this short may legitimately repeat ("OK", "Cancel", ...).
const DUPLICATE_MIN_CHARS: usize = 10;

/// Machine-readable identity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    PlaceholderMismatch,
    WrongPlaceholderFormat,
    BrandNameTranslated,
    BrandNameMissing,
    TechnicalTermTranslated,
    NewlineMismatch,
    DuplicateTranslation,
    EmptyTranslation,
    Parse,
    ParseError,
    Stats,
}

impl Check {
    pub fn code(self) -> &'static str {
        match self {
            Check::PlaceholderMismatch => "PLACEHOLDER_MISMATCH",
            Check::WrongPlaceholderFormat => "WRONG_PLACEHOLDER_FORMAT",
            Check::BrandNameTranslated => "BRAND_NAME_TRANSLATED",
            Check::BrandNameMissing => "BRAND_NAME_MISSING",
            Check::TechnicalTermTranslated => "TECHNICAL_TERM_TRANSLATED",
            Check::NewlineMismatch => "NEWLINE_MISMATCH",
            Check::DuplicateTranslation => "DUPLICATE_TRANSLATION",
            Check::EmptyTranslation => "EMPTY_TRANSLATION",
            Check::Parse => "PARSE",
            Check::ParseError => "PARSE_ERROR",
            Check::Stats => "STATS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub check: Check,
    /// Line of the offending entry, when the finding belongs to one.
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[{}] Line {}: {}", self.check.code(), line, self.message),
            None => write!(f, "[{}] {}", self.check.code(), self.message),
        }
    }
}

/// Findings grouped by severity. A catalog passes when it has no errors.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub info: Vec<Finding>,
}

impl ValidationResult {
    fn push(&mut self, severity: Severity, check: Check, line: Option<usize>, message: String) {
        let finding = Finding {
            check,
            line,
            message,
        };
        match severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
            Severity::Info => self.info.push(finding),
        }
    }

    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// All findings for a given check, errors first.
    pub fn by_check(&self, check: Check) -> impl Iterator<Item = &Finding> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .chain(&self.info)
            .filter(move |f| f.check == check)
    }
}

/// First `n` characters of `s`, for messages.
fn preview(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

static NUMBERED_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"%[1-9]").unwrap());
static PRINTF_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"%[sdf]").unwrap());
static TERM_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    TECHNICAL_TERMS
        .iter()
        .map(|term| {
            let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term))).unwrap();
            (*term, re)
        })
        .collect()
});

fn check_placeholders(msgid: &str, msgstr: &str, line: usize, result: &mut ValidationResult) {
    for i in 1..=9 {
        let token = format!("%{i}");
        let in_source = msgid.matches(token.as_str()).count();
        let in_translation = msgstr.matches(token.as_str()).count();
        if in_source != in_translation {
            result.push(
                Severity::Error,
                Check::PlaceholderMismatch,
                Some(line),
                format!(
                    "{token} count mismatch: msgid has {in_source}, msgstr has {in_translation}"
                ),
            );
        }
    }

    if NUMBERED_PLACEHOLDER.is_match(msgid) {
        let wrong: Vec<&str> = PRINTF_PLACEHOLDER
            .find_iter(msgstr)
            .map(|m| m.as_str())
            .collect();
        if !wrong.is_empty() {
            result.push(
                Severity::Error,
                Check::WrongPlaceholderFormat,
                Some(line),
                format!("msgstr uses {wrong:?} but msgid uses %1 format"),
            );
        }
    }
}

fn check_brands(msgid: &str, msgstr: &str, line: usize, result: &mut ValidationResult) {
    for brand in BRAND_NAMES {
        if !msgid.contains(brand) || msgstr.contains(brand) {
            continue;
        }
        match brand_mistranslations(brand)
            .iter()
            .find(|alt| msgstr.contains(*alt))
        {
            Some(alt) => result.push(
                Severity::Error,
                Check::BrandNameTranslated,
                Some(line),
                format!("'{brand}' translated as '{alt}' - should be preserved"),
            ),
            None => result.push(
                Severity::Warning,
                Check::BrandNameMissing,
                Some(line),
                format!(
                    "'{brand}' not found in translation (msgid: {}...)",
                    preview(msgid, 40)
                ),
            ),
        }
    }
}

fn check_terms(msgid: &str, msgstr: &str, line: usize, result: &mut ValidationResult) {
    for (term, re) in TERM_PATTERNS.iter() {
        if re.is_match(msgid) && !re.is_match(msgstr) {
            result.push(
                Severity::Warning,
                Check::TechnicalTermTranslated,
                Some(line),
                format!(
                    "'{term}' appears translated (original: {}...)",
                    preview(msgid, 40)
                ),
            );
        }
    }
}

fn check_newlines(msgid: &str, msgstr: &str, line: usize, result: &mut ValidationResult) {
    let in_source = msgid.matches('\n').count();
    let in_translation = msgstr.matches('\n').count();
    if in_source != in_translation {
        result.push(
            Severity::Warning,
            Check::NewlineMismatch,
            Some(line),
            format!(
                "Newline count mismatch: msgid has {in_source}, msgstr has {in_translation}"
            ),
        );
    }
}

/// Run the per-entry battery. Header and id-less entries are skipped.
pub fn validate_entry(entry: &Entry, result: &mut ValidationResult) {
    if entry.is_header || !entry.has_id() {
        return;
    }
    let (msgid, msgstr, line) = (&entry.msgid, &entry.msgstr, entry.line_number);

    if msgstr.is_empty() {
        result.push(
            Severity::Warning,
            Check::EmptyTranslation,
            Some(line),
            format!("Untranslated: {}...", preview(msgid, 50)),
        );
        return;
    }

    check_placeholders(msgid, msgstr, line, result);
    check_brands(msgid, msgstr, line, result);
    check_terms(msgid, msgstr, line, result);
    check_newlines(msgid, msgstr, line, result);
}

/// Same translation used for different source strings.
pub fn check_duplicates(entries: &[Entry], result: &mut ValidationResult) {
    // translation -> (msgid, line) in file order; groups kept in first-seen order
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<(&str, usize)>> = HashMap::new();
    for e in entries {
        if e.is_header || !e.has_id() || e.msgstr.chars().count() <= DUPLICATE_MIN_CHARS {
            continue;
        }
        let slot = groups.entry(e.msgstr.as_str()).or_insert_with(|| {
            order.push(e.msgstr.as_str());
            Vec::new()
        });
        slot.push((e.msgid.as_str(), e.line_number));
    }

    for msgstr in order {
        let members = &groups[msgstr];
        let distinct: BTreeSet<&str> = members.iter().map(|(id, _)| *id).collect();
        if distinct.len() < 2 {
            continue;
        }
        let lines: Vec<String> = members.iter().take(5).map(|(_, l)| l.to_string()).collect();
        let previews: Vec<String> = members.iter().take(3).map(|(id, _)| preview(id, 30)).collect();
        result.push(
            Severity::Warning,
            Check::DuplicateTranslation,
            None,
            format!(
                "Same translation for different strings (lines {}): {:?}... -> '{}...'",
                lines.join(", "),
                previews,
                preview(msgstr, 40)
            ),
        );
    }
}

/// Validate a decoded catalog. Read-only.
pub fn validate_entries(entries: &[Entry]) -> ValidationResult {
    let mut result = ValidationResult::default();
    let units: Vec<&Entry> = entries.iter().filter(|e| e.has_id() && !e.is_header).collect();
    result.push(
        Severity::Info,
        Check::Parse,
        None,
        format!("Parsed {} entries", units.len()),
    );
    let translated = units.iter().filter(|e| !e.msgstr.is_empty()).count();
    let fuzzy = units.iter().filter(|e| e.is_fuzzy()).count();
    let empty = units.len() - translated;
    result.push(
        Severity::Info,
        Check::Stats,
        None,
        format!("Translated: {translated}, Fuzzy: {fuzzy}, Empty: {empty}"),
    );

    for e in entries {
        validate_entry(e, &mut result);
    }
    check_duplicates(entries, &mut result);

    tracing::debug!(
        event = "validate_done",
        errors = result.errors.len(),
        warnings = result.warnings.len()
    );
    result
}

/// Validate a catalog on disk. An unreadable file is reported as an error, not raised.
pub fn validate_file(path: &Path) -> ValidationResult {
    match koloc_po::read_po_file(path) {
        Ok(entries) => validate_entries(&entries),
        Err(err) => {
            let mut result = ValidationResult::default();
            result.push(
                Severity::Error,
                Check::ParseError,
                None,
                format!("Failed to parse file: {err}"),
            );
            result
        }
    }
}
