use koloc_core::vocab::language_name;
use koloc_services::batch_count;
use koloc_services::status::status;

use crate::Ctx;

pub fn run_status(ctx: &Ctx, lang: &str, batch_size: Option<usize>) -> color_eyre::Result<()> {
    super::warn_unknown_language(lang);
    let batch_size = super::resolve_batch_size(ctx, batch_size)?;
    let (_, entries) = ctx.layout.load(lang)?;
    let s = status(&entries);

    let title = format!("=== {} ({lang}) ===", language_name(lang));
    if ctx.use_color {
        use owo_colors::OwoColorize;
        crate::ui_out!("{}", title.bold());
    } else {
        crate::ui_out!("{title}");
    }
    crate::ui_out!("Total: {} strings", s.total);
    crate::ui_out!("  Verified: {} ({:.1}%)", s.verified, s.verified_percent());
    crate::ui_out!("  Fuzzy: {}", s.fuzzy);
    crate::ui_out!("  Empty: {}", s.empty);

    let pending = s.total - s.verified;
    if pending == 0 {
        crate::ui_ok!("Everything is verified");
        return Ok(());
    }

    crate::ui_out!("");
    crate::ui_out!("Next steps:");
    if s.empty > 0 {
        crate::ui_out!(
            "  koloc extract {lang}          # {} empty -> {} batch(es)",
            s.empty,
            batch_count(s.empty, batch_size)
        );
    }
    if s.fuzzy > 0 {
        crate::ui_out!(
            "  koloc extract {lang} --fuzzy  # {} fuzzy -> {} batch(es)",
            s.fuzzy,
            batch_count(s.fuzzy, batch_size)
        );
    }
    // only worth listing when it covers more than the empty pass
    if pending != s.empty {
        crate::ui_out!(
            "  koloc extract {lang} --all    # {pending} total -> {} batch(es)",
            s.pending_batches(batch_size)
        );
    }
    Ok(())
}
