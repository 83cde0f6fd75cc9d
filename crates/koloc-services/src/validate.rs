use koloc_core::Result;
use koloc_validate::{validate_file, ValidationResult};
use std::path::PathBuf;
use std::process::Command;

use crate::Layout;

/// Pass/fail verdict for one language plus whatever text the validator produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReport {
    pub language: String,
    pub passed: bool,
    pub output: String,
}

/// Something that can check a language's catalog after it was written.
pub trait LanguageValidator {
    fn validate(&self, lang: &str) -> Result<LanguageReport>;
}

/// `"<lang>: PASS (N errors, M warnings)"`, or FAIL.
pub fn summary_line(lang: &str, result: &ValidationResult) -> String {
    let verdict = if result.passed() { "PASS" } else { "FAIL" };
    format!(
        "{lang}: {verdict} ({} errors, {} warnings)",
        result.errors.len(),
        result.warnings.len()
    )
}

/// Runs the validation battery in this process.
#[derive(Debug, Clone)]
pub struct InProcessValidator {
    pub layout: Layout,
}

impl InProcessValidator {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn validate_full(&self, lang: &str) -> ValidationResult {
        validate_file(&self.layout.po_path(lang))
    }
}

impl LanguageValidator for InProcessValidator {
    fn validate(&self, lang: &str) -> Result<LanguageReport> {
        let result = self.validate_full(lang);
        Ok(LanguageReport {
            language: lang.to_string(),
            passed: result.passed(),
            output: summary_line(lang, &result),
        })
    }
}

/// Runs `<program> --locale-dir <dir> validate --lang <lang> --summary --no-color`
/// and looks for the `<lang>: PASS` line in its output.
#[derive(Debug, Clone)]
pub struct ProcessValidator {
    pub program: PathBuf,
    pub layout: Layout,
}

impl ProcessValidator {
    pub fn new(program: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            program: program.into(),
            layout,
        }
    }

    /// Re-invoke the running binary.
    pub fn current_exe(layout: Layout) -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?, layout))
    }
}

impl LanguageValidator for ProcessValidator {
    fn validate(&self, lang: &str) -> Result<LanguageReport> {
        tracing::debug!(event = "validator_spawn", program = %self.program.display(), lang = lang);
        let out = Command::new(&self.program)
            .arg("--locale-dir")
            .arg(&self.layout.locale_dir)
            .arg("--domain")
            .arg(&self.layout.domain)
            .args(["validate", "--lang", lang, "--summary", "--no-color"])
            .output()?;
        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));
        let marker = format!("{lang}: PASS");
        let passed = output.lines().any(|l| l.trim_start().starts_with(&marker));
        Ok(LanguageReport {
            language: lang.to_string(),
            passed,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_catalog(layout: &Layout, lang: &str, body: &str) {
        let po = layout.po_path(lang);
        std::fs::create_dir_all(po.parent().unwrap()).unwrap();
        std::fs::write(po, body).unwrap();
    }

    #[test]
    fn summary_line_formats_counts() {
        let result = ValidationResult::default();
        assert_eq!(summary_line("fr", &result), "fr: PASS (0 errors, 0 warnings)");
    }

    #[test]
    fn in_process_reports_placeholder_errors() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path(), "koassistant");
        write_catalog(&layout, "fr", "msgid \"Delete %1 items\"\nmsgstr \"Supprimer les éléments\"\n");
        write_catalog(&layout, "de", "msgid \"Delete %1 items\"\nmsgstr \"%1 Elemente löschen\"\n");

        let v = InProcessValidator::new(layout);
        let fr = v.validate("fr").unwrap();
        assert!(!fr.passed);
        assert!(fr.output.starts_with("fr: FAIL (1 errors"));
        let de = v.validate("de").unwrap();
        assert!(de.passed);
        assert_eq!(de.output, "de: PASS (0 errors, 0 warnings)");
    }

    #[test]
    fn missing_catalog_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let v = InProcessValidator::new(Layout::new(dir.path(), "koassistant"));
        assert!(!v.validate("es").unwrap().passed);
    }

    #[test]
    fn unspawnable_program_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let v = ProcessValidator::new(
            dir.path().join("no-such-binary"),
            Layout::new(dir.path(), "koassistant"),
        );
        assert!(v.validate("fr").is_err());
    }
}
