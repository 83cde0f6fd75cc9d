use koloc_core::vocab::language_codes;
use koloc_core::KolocError;
use koloc_domain::{ValidationMsg, ValidationReport};
use koloc_services::validate::summary_line;
use koloc_validate::{validate_file, Finding, ValidationResult};

use crate::{Ctx, OutputFormat};

const DEFAULT_WARNING_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct Verbosity {
    pub verbose: bool,
    pub errors_only: bool,
    pub summary: bool,
}

fn to_msg(f: &Finding) -> ValidationMsg {
    ValidationMsg {
        check: f.check.code().to_string(),
        line: f.line,
        message: f.message.clone(),
    }
}

fn to_report(lang: &str, path: &std::path::Path, result: &ValidationResult) -> ValidationReport {
    ValidationReport {
        schema_version: crate::OUTPUT_SCHEMA_VERSION,
        language: lang.to_string(),
        path: path.display().to_string(),
        passed: result.passed(),
        errors: result.errors.iter().map(to_msg).collect(),
        warnings: result.warnings.iter().map(to_msg).collect(),
        info: result.info.iter().map(to_msg).collect(),
    }
}

fn print_detail(ctx: &Ctx, lang: &str, result: &ValidationResult, v: Verbosity, warning_limit: usize) {
    let rule = "=".repeat(60);
    crate::ui_out!("{rule}");
    if ctx.use_color {
        use owo_colors::OwoColorize;
        if result.passed() {
            crate::ui_out!("{lang}: {}", "PASS".green());
        } else {
            crate::ui_out!("{lang}: {}", "FAIL".red());
        }
    } else {
        crate::ui_out!("{lang}: {}", if result.passed() { "PASS" } else { "FAIL" });
    }
    crate::ui_out!("{rule}");

    if v.verbose {
        for f in &result.info {
            crate::ui_out!("  INFO: {f}");
        }
    }
    for f in &result.errors {
        if ctx.use_color {
            use owo_colors::OwoColorize;
            crate::ui_out!("  {} {f}", "ERROR:".red());
        } else {
            crate::ui_out!("  ERROR: {f}");
        }
    }
    if !v.errors_only {
        for f in result.warnings.iter().take(warning_limit) {
            if ctx.use_color {
                use owo_colors::OwoColorize;
                crate::ui_out!("  {} {f}", "WARN:".yellow());
            } else {
                crate::ui_out!("  WARN: {f}");
            }
        }
        if result.warnings.len() > warning_limit {
            crate::ui_out!(
                "  ... and {} more warnings",
                result.warnings.len() - warning_limit
            );
        }
    }
    crate::ui_out!("");
}

pub fn run_validate(
    ctx: &Ctx,
    langs: Vec<String>,
    v: Verbosity,
    format: OutputFormat,
) -> color_eyre::Result<()> {
    let languages: Vec<String> = if !langs.is_empty() {
        langs
    } else if let Some(list) = ctx.cfg.languages.clone() {
        list
    } else {
        language_codes().map(str::to_string).collect()
    };
    let warning_limit = ctx
        .cfg
        .validate
        .as_ref()
        .and_then(|c| c.warning_limit)
        .unwrap_or(DEFAULT_WARNING_LIMIT);
    let text = format == OutputFormat::Text;

    if text {
        crate::ui_out!("Validating {} language(s)...", languages.len());
        crate::ui_out!("");
    }

    let mut failed = Vec::new();
    let mut reports = Vec::new();
    let (mut total_errors, mut total_warnings) = (0usize, 0usize);

    for lang in &languages {
        let path = ctx.layout.po_path(lang);
        if !path.exists() {
            tracing::warn!(event = "validate_missing_catalog", lang = %lang, path = %path.display());
            if text {
                crate::ui_out!("  {lang}: File not found: {}", path.display());
            }
            failed.push(lang.clone());
            continue;
        }

        let result = validate_file(&path);
        tracing::info!(
            event = "validate_language",
            lang = %lang,
            errors = result.errors.len(),
            warnings = result.warnings.len()
        );
        total_errors += result.errors.len();
        total_warnings += result.warnings.len();
        if !result.passed() {
            failed.push(lang.clone());
        }

        match format {
            OutputFormat::Json => reports.push(to_report(lang, &path, &result)),
            OutputFormat::Text if v.summary => crate::ui_out!("  {}", summary_line(lang, &result)),
            OutputFormat::Text => print_detail(ctx, lang, &result, v, warning_limit),
        }
    }

    if !text {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &reports)?;
        crate::ui_out!("");
    } else {
        let rule = "=".repeat(60);
        crate::ui_out!("");
        crate::ui_out!("{rule}");
        crate::ui_out!("SUMMARY");
        crate::ui_out!("{rule}");
        crate::ui_out!("Languages validated: {}", languages.len());
        crate::ui_out!("Total errors: {total_errors}");
        crate::ui_out!("Total warnings: {total_warnings}");
        if failed.is_empty() {
            crate::ui_ok!("All languages passed validation!");
        } else {
            crate::ui_out!("Failed languages: {}", failed.join(", "));
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(KolocError::ValidationFailed(failed).into())
    }
}
