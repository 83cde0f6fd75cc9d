use koloc_core::KolocError;
use koloc_services::export::{batch_file_path, build_export, write_export};
use koloc_services::extract::{extract_batch, filter_entries, similarity_groups, ExtractMode};
use koloc_services::batch_count;
use std::path::{Path, PathBuf};

use crate::Ctx;

pub fn mode_from_flags(all: bool, fuzzy: bool) -> ExtractMode {
    if all {
        ExtractMode::All
    } else if fuzzy {
        ExtractMode::Fuzzy
    } else {
        ExtractMode::Empty
    }
}

pub fn run_extract(
    ctx: &Ctx,
    lang: &str,
    mode: ExtractMode,
    batch: Option<usize>,
    batch_size: Option<usize>,
    output: Option<PathBuf>,
    dry_run: bool,
) -> color_eyre::Result<()> {
    super::warn_unknown_language(lang);
    let batch_size = super::resolve_batch_size(ctx, batch_size)?;
    let (_, entries) = ctx.layout.load(lang)?;

    let selected = filter_entries(&entries, mode).len();
    let total = batch_count(selected, batch_size);
    crate::ui_out!("Extracting {}: {selected} entries", mode.description());
    if selected == 0 {
        crate::ui_ok!("Nothing to extract.");
        return Ok(());
    }

    let groups = similarity_groups(&entries);

    if let Some(n) = batch {
        let (records, _) = extract_batch(&entries, n, batch_size, &groups, mode);
        if records.is_empty() {
            return Err(KolocError::InvalidBatch { batch: n, total }.into());
        }
        let path = output.unwrap_or_else(|| batch_file_path(Path::new(""), lang, n));
        if dry_run {
            crate::ui_out!(
                "[DRY-RUN] Would export batch {n}/{total} ({} entries)",
                records.len()
            );
            return Ok(());
        }
        let count = records.len();
        write_export(&path, &build_export(lang, n, records, total, mode))?;
        crate::ui_ok!("Exported: {} ({count} entries)", path.display());
        crate::ui_out!("");
        crate::ui_out!("Next: koloc apply {lang} {}", path.display());
        return Ok(());
    }

    let dir = output
        .or_else(|| {
            ctx.cfg
                .extract
                .as_ref()
                .and_then(|e| e.output_dir.as_ref())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from("."));
    if dry_run {
        crate::ui_out!(
            "[DRY-RUN] Would export {total} batches to {}/",
            dir.display()
        );
        return Ok(());
    }

    for n in 1..=total {
        let (records, _) = extract_batch(&entries, n, batch_size, &groups, mode);
        let path = batch_file_path(&dir, lang, n);
        let count = records.len();
        write_export(&path, &build_export(lang, n, records, total, mode))?;
        crate::ui_out!("  {} ({count} entries)", path.display());
    }
    crate::ui_out!("");
    crate::ui_out!(
        "Next: koloc apply {lang} {}",
        dir.join(format!("{lang}_batch*.json")).display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_flag_takes_precedence() {
        assert_eq!(mode_from_flags(false, false), ExtractMode::Empty);
        assert_eq!(mode_from_flags(false, true), ExtractMode::Fuzzy);
        assert_eq!(mode_from_flags(true, false), ExtractMode::All);
    }
}
