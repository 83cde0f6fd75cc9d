use koloc_core::KolocError;
use koloc_services::apply::{apply_files, FuzzyPolicy};
use koloc_services::validate::{InProcessValidator, LanguageValidator, ProcessValidator};
use koloc_services::preview;
use std::path::PathBuf;

use crate::{Ctx, ValidatorKind};

fn resolve_validator(ctx: &Ctx, flag: Option<ValidatorKind>) -> ValidatorKind {
    flag.or_else(|| {
        match ctx.cfg.apply.as_ref()?.validator.as_deref()? {
            "subprocess" => Some(ValidatorKind::Subprocess),
            "in-process" => Some(ValidatorKind::InProcess),
            other => {
                tracing::warn!(event = "config_unknown_validator", value = other);
                None
            }
        }
    })
    .unwrap_or(ValidatorKind::InProcess)
}

fn make_validator(ctx: &Ctx, kind: ValidatorKind) -> color_eyre::Result<Box<dyn LanguageValidator>> {
    Ok(match kind {
        ValidatorKind::InProcess => Box::new(InProcessValidator::new(ctx.layout.clone())),
        ValidatorKind::Subprocess => Box::new(ProcessValidator::current_exe(ctx.layout.clone())?),
    })
}

pub fn run_apply(
    ctx: &Ctx,
    lang: &str,
    files: &[PathBuf],
    verified: bool,
    dry_run: bool,
    no_validate: bool,
    validator: Option<ValidatorKind>,
) -> color_eyre::Result<()> {
    super::warn_unknown_language(lang);
    let policy = FuzzyPolicy::from_verified_flag(verified);
    let run = apply_files(&ctx.layout, lang, files, policy, dry_run)?;

    for path in &run.missing_inputs {
        crate::ui_warn!("File not found, skipping: {}", path.display());
    }
    let import = &run.import;
    if !import.skipped_verified.is_empty() {
        crate::ui_info!("Protected {} verified translations", import.skipped_verified.len());
    }
    if !import.errors.is_empty() && !dry_run {
        crate::ui_warn!(
            "Warnings: {} (use --dry-run to see details)",
            import.errors.len()
        );
    }
    crate::ui_out!("Found {} translations to apply", import.translations.len());

    if dry_run {
        crate::ui_out!("");
        crate::ui_out!("[DRY-RUN] Would apply {} translations", run.report.applied.len());
        match policy {
            FuzzyPolicy::Verified => crate::ui_out!("  Mode: human-verified (removes fuzzy)"),
            FuzzyPolicy::Unreviewed => crate::ui_out!("  Mode: AI-translated (adds fuzzy)"),
        }
        crate::ui_out!("");
        crate::ui_out!("First 3:");
        for (msgid, _) in import.translations.iter().take(3) {
            crate::ui_out!("  {}...", preview(msgid, 40));
        }
        if !import.errors.is_empty() {
            crate::ui_out!("");
            crate::ui_out!("Warnings:");
            for err in import.errors.iter().take(5) {
                crate::ui_out!("  - {err}");
            }
        }
        return Ok(());
    }

    crate::ui_ok!("Applied {} translations", run.report.applied.len());
    match policy {
        FuzzyPolicy::Verified => crate::ui_out!("Marked as verified (fuzzy removed)"),
        FuzzyPolicy::Unreviewed => crate::ui_out!("Marked as fuzzy (needs verification)"),
    }
    crate::ui_ok!("Updated {}", run.po_path.display());

    let validate = !no_validate
        && ctx
            .cfg
            .apply
            .as_ref()
            .and_then(|a| a.validate)
            .unwrap_or(true);
    if !validate {
        return Ok(());
    }

    crate::ui_out!("");
    crate::ui_out!("Validating...");
    let validator = make_validator(ctx, resolve_validator(ctx, validator))?;
    let report = validator.validate(lang)?;
    if report.passed {
        if ctx.use_color {
            use owo_colors::OwoColorize;
            crate::ui_out!("Validation: {}", "PASSED".green());
        } else {
            crate::ui_out!("Validation: PASSED");
        }
        Ok(())
    } else {
        if ctx.use_color {
            use owo_colors::OwoColorize;
            crate::ui_out!("Validation: {}", "FAILED".red());
        } else {
            crate::ui_out!("Validation: FAILED");
        }
        crate::ui_out!("{}", report.output.trim_end());
        Err(KolocError::ValidationFailed(vec![lang.to_string()]).into())
    }
}
