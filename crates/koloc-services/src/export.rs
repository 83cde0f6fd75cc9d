use koloc_core::vocab::language_name;
use koloc_core::Result;
use koloc_domain::{BatchRecord, ExportDocument, ExportMetadata, EXPORT_FORMAT_VERSION};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::extract::ExtractMode;

/// Instructions shipped with every batch.
pub const TRANSLATION_GUIDELINES: &str = r#"## Translation Guidelines (CRITICAL)

### Terms to NEVER Translate (keep in English):
- Plugin/App names: KOAssistant, KOReader
- Provider names: Claude, GPT, Gemini, OpenAI, Anthropic, DeepSeek, Ollama, Groq, Mistral, xAI, OpenRouter, Qwen, Kimi, Together, Fireworks, SambaNova, Cohere, Doubao
- Model names: claude-opus-4-5, gpt-4, gemini-3-pro, etc.
- Technical terms: API, token, tokens, cache, caching, streaming, prompt

### Placeholder Format (CRITICAL - wrong format causes crashes):
- ALWAYS use: %1, %2, %3 (KOReader T() template style)
- NEVER use: %s, %d, %f (Lua string.format style)
- Placeholder count in translation MUST match the source exactly

### Preserve Exactly:
- Escape sequences: \n (newline), \t (tab), \" (quote)
- Markdown formatting: **bold**, - lists, ## headers
- Leading/trailing whitespace

### Context Awareness:
- Strings in "similar_strings" should have DIFFERENT translations
- Source file references show where the string appears in UI
- "gesture" context = KOReader gesture settings
- "menu" context = plugin menu items
"#;

pub fn build_export(
    lang: &str,
    batch: usize,
    records: Vec<BatchRecord>,
    total_batches: usize,
    mode: ExtractMode,
) -> ExportDocument {
    ExportDocument {
        metadata: ExportMetadata {
            language_code: lang.to_string(),
            language_name: language_name(lang).to_string(),
            batch,
            total_batches,
            entry_count: records.len(),
            mode: mode.as_str().to_string(),
            mode_description: mode.description().to_string(),
            export_format_version: EXPORT_FORMAT_VERSION.to_string(),
        },
        guidelines: TRANSLATION_GUIDELINES.to_string(),
        entries: records,
    }
}

/// `<dir>/<lang>_batch<n>.json`
pub fn batch_file_path(dir: &Path, lang: &str, batch: usize) -> PathBuf {
    dir.join(format!("{lang}_batch{batch}.json"))
}

/// Pretty-printed JSON, non-ASCII text kept as-is.
pub fn write_export(path: &Path, doc: &ExportDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, doc)?;
    w.flush()?;
    tracing::info!(event = "export_written", path = %path.display(), entries = doc.entries.len());
    Ok(())
}
