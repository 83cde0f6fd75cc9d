pub mod apply;
pub mod extract;
pub mod schema;
pub mod status;
pub mod validate;

use koloc_core::vocab::is_known_language;

/// Unknown codes are allowed; the catalog path decides whether they work.
pub(crate) fn warn_unknown_language(lang: &str) {
    if !is_known_language(lang) {
        tracing::warn!(event = "unknown_language", lang = lang);
        crate::ui_warn!("Unknown language code '{lang}'");
    }
}

/// CLI flag, then config, then the built-in default. Zero is rejected.
pub(crate) fn resolve_batch_size(ctx: &crate::Ctx, flag: Option<usize>) -> koloc_core::Result<usize> {
    let size = flag
        .or(ctx.cfg.batch_size)
        .unwrap_or(koloc_services::DEFAULT_BATCH_SIZE);
    if size == 0 {
        return Err(koloc_core::KolocError::ZeroBatchSize.into());
    }
    Ok(size)
}
