//! Reader/writer for gettext `.po` catalogs.
//!
//! Decoding is best effort: lines it does not understand are skipped. Encoding
//! keeps every comment line verbatim except the `#,` flags line, which is
//! rebuilt from the entry's flag set.

use koloc_core::{Entry, FlagSet, Result, FUZZY};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

mod escape;

pub use escape::{escape_po, unescape_po};

/// msgid longer than this is written in the multi-line layout.
const MSGID_WRAP_CHARS: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrPlural(usize),
}

/// Strip the surrounding quotes of `"..."`, `None` for anything else.
fn quoted(raw: &str) -> Option<&str> {
    let v = raw.trim();
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        Some(&v[1..v.len() - 1])
    } else {
        None
    }
}

struct Decoder {
    out: Vec<Entry>,
    cur: Option<Entry>,
    saw_msgid: bool,
    field: Field,
}

impl Decoder {
    fn flush(&mut self) {
        self.field = Field::None;
        let saw_msgid = std::mem::take(&mut self.saw_msgid);
        let Some(mut entry) = self.cur.take() else {
            return;
        };
        let header = self.out.is_empty() && saw_msgid && entry.msgid.is_empty();
        if entry.has_id() || header {
            entry.is_header = header;
            self.out.push(entry);
        }
    }

    fn line(&mut self, line_number: usize, line: &str) {
        static RE_PLURAL_STR: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"^msgstr\[(\d+)\]\s*"(.*)"\s*$"#).unwrap());

        if line.trim().is_empty() {
            self.flush();
            return;
        }

        let entry = self.cur.get_or_insert_with(|| Entry {
            line_number,
            ..Default::default()
        });

        if line.starts_with('#') {
            entry.comments.push(line.to_string());
            if let Some(rest) = line.strip_prefix("#:") {
                entry
                    .references
                    .extend(rest.split_whitespace().map(str::to_string));
            } else if let Some(rest) = line.strip_prefix("#,") {
                entry.flags.extend_from_line(rest);
            }
            return;
        }

        if let Some(rest) = line.strip_prefix("msgid_plural ") {
            self.field = Field::MsgidPlural;
            if let Some(v) = quoted(rest) {
                entry.msgid_plural = Some(unescape_po(v));
            }
            return;
        }
        if let Some(rest) = line.strip_prefix("msgid ") {
            self.field = Field::Msgid;
            self.saw_msgid = true;
            if let Some(v) = quoted(rest) {
                entry.msgid = unescape_po(v);
            }
            return;
        }
        if let Some(rest) = line.strip_prefix("msgstr ") {
            self.field = Field::Msgstr;
            if let Some(v) = quoted(rest) {
                entry.msgstr = unescape_po(v);
            }
            return;
        }
        if let Some(caps) = RE_PLURAL_STR.captures(line) {
            let Ok(idx) = caps[1].parse::<usize>() else {
                tracing::debug!(event = "po_plural_index_ignored", line = line_number);
                self.field = Field::None;
                return;
            };
            if entry.msgstr_plural.len() <= idx {
                entry.msgstr_plural.resize(idx + 1, String::new());
            }
            entry.msgstr_plural[idx] = unescape_po(&caps[2]);
            self.field = Field::MsgstrPlural(idx);
            return;
        }

        if let Some(v) = quoted(line).filter(|_| line.starts_with('"')) {
            let chunk = unescape_po(v);
            match self.field {
                Field::Msgid => entry.msgid.push_str(&chunk),
                Field::MsgidPlural => {
                    entry.msgid_plural.get_or_insert_with(String::new).push_str(&chunk)
                }
                Field::Msgstr => entry.msgstr.push_str(&chunk),
                Field::MsgstrPlural(idx) => entry.msgstr_plural[idx].push_str(&chunk),
                Field::None => {}
            }
        }
        // anything else (msgctxt, stray text) is skipped
    }
}

/// Parse catalog text into entries, preserving file order.
pub fn decode(text: &str) -> Vec<Entry> {
    let mut d = Decoder {
        out: Vec::new(),
        cur: None,
        saw_msgid: false,
        field: Field::None,
    };
    for (idx, line) in text.lines().enumerate() {
        d.line(idx + 1, line);
    }
    d.flush();
    d.out
}

/// Selective fuzzy-flag mutation applied while writing.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// msgids whose fuzzy flag is dropped.
    pub remove_fuzzy_for: HashSet<String>,
    /// msgids that gain a fuzzy flag, unless the entry is verified.
    pub add_fuzzy_for: HashSet<String>,
}

impl EncodeOptions {
    fn effective_flags(&self, entry: &Entry) -> FlagSet {
        let mut flags = entry.flags.clone();
        if self.remove_fuzzy_for.contains(&entry.msgid) {
            flags.remove(FUZZY);
        }
        if self.add_fuzzy_for.contains(&entry.msgid) && !entry.is_verified() {
            flags.insert(FUZZY);
        }
        flags
    }
}

fn push_field(out: &mut String, keyword: &str, value: &str, multiline: bool) {
    if !multiline {
        out.push_str(&format!("{keyword} \"{}\"\n", escape_po(value)));
        return;
    }
    out.push_str(&format!("{keyword} \"\"\n"));
    let parts: Vec<&str> = value.split('\n').collect();
    let last = parts.len() - 1;
    for (i, part) in parts.iter().enumerate() {
        if i < last {
            out.push_str(&format!("\"{}\\n\"\n", escape_po(part)));
        } else if !part.is_empty() {
            out.push_str(&format!("\"{}\"\n", escape_po(part)));
        }
    }
}

fn push_entry(out: &mut String, entry: &Entry, opts: &EncodeOptions) {
    let flags = opts.effective_flags(entry);
    let has_flag_line = entry.comments.iter().any(|c| c.starts_with("#,"));
    // where to synthesize a flags line when the entry has none
    let synth_at = if has_flag_line || flags.is_empty() {
        None
    } else {
        Some(
            entry
                .comments
                .iter()
                .rposition(|c| c.starts_with("#:"))
                .map_or(0, |i| i + 1),
        )
    };
    let flag_line = format!("#, {}\n", flags.render());

    let mut wrote_flags = false;
    for (idx, comment) in entry.comments.iter().enumerate() {
        if synth_at == Some(idx) {
            out.push_str(&flag_line);
        }
        if comment.starts_with("#,") {
            if !wrote_flags && !flags.is_empty() {
                out.push_str(&flag_line);
            }
            wrote_flags = true;
            continue;
        }
        out.push_str(comment);
        out.push('\n');
    }
    if synth_at == Some(entry.comments.len()) {
        out.push_str(&flag_line);
    }

    let msgid_multiline =
        entry.msgid.contains('\n') || entry.msgid.chars().count() > MSGID_WRAP_CHARS;
    push_field(out, "msgid", &entry.msgid, msgid_multiline);
    if let Some(plural) = &entry.msgid_plural {
        push_field(out, "msgid_plural", plural, false);
    }
    // plural entries carry their translations in msgstr[N] only
    if entry.msgstr_plural.is_empty() || !entry.msgstr.is_empty() {
        push_field(out, "msgstr", &entry.msgstr, entry.msgstr.contains('\n'));
    }
    for (idx, form) in entry.msgstr_plural.iter().enumerate() {
        push_field(out, &format!("msgstr[{idx}]"), form, false);
    }
}

/// Serialize entries back to catalog text.
///
/// Entries are separated by one blank line; there is no blank line after the last one.
pub fn encode(entries: &[Entry], opts: &EncodeOptions) -> String {
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        push_entry(&mut out, entry, opts);
    }
    out
}

/// Read and decode a catalog from disk.
pub fn read_po_file(path: &Path) -> Result<Vec<Entry>> {
    let text = fs::read_to_string(path)?;
    let entries = decode(&text);
    tracing::debug!(event = "po_read", path = %path.display(), entries = entries.len());
    Ok(entries)
}

/// Encode all entries and replace the file in one write.
pub fn write_po_file(path: &Path, entries: &[Entry], opts: &EncodeOptions) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, encode(entries, opts))?;
    tracing::debug!(event = "po_written", path = %path.display(), entries = entries.len());
    Ok(())
}
