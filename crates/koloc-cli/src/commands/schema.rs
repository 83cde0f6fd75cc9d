use std::fs;
use std::path::PathBuf;

use crate::Ctx;

const DEFAULT_SCHEMA_DIR: &str = "./docs/assets/schemas";

pub fn run_schema(ctx: &Ctx, out_dir: Option<PathBuf>) -> color_eyre::Result<()> {
    let out_dir = out_dir.unwrap_or_else(|| {
        PathBuf::from(
            ctx.cfg
                .schema
                .as_ref()
                .and_then(|s| s.out_dir.clone())
                .unwrap_or_else(|| DEFAULT_SCHEMA_DIR.to_string()),
        )
    });
    fs::create_dir_all(&out_dir)?;
    macro_rules! dump {
        ($ty:ty, $name:literal) => {{
            let schema = schemars::schema_for!($ty);
            let path = out_dir.join($name);
            let f = std::fs::File::create(&path)?;
            serde_json::to_writer_pretty(f, &schema)?;
            tracing::debug!(event = "schema_written", path = %path.display());
        }};
    }
    dump!(koloc_domain::ExportDocument, "export_document.schema.json");
    dump!(koloc_domain::BatchRecord, "batch_record.schema.json");
    dump!(koloc_domain::ImportDocument, "import_document.schema.json");
    dump!(koloc_domain::ValidationReport, "validation_report.schema.json");
    crate::ui_ok!("Schemas written to {}", out_dir.display());
    Ok(())
}
