use std::path::{Path, PathBuf};

pub const FR_CATALOG: &str = r#"msgid ""
msgstr ""
"Language: fr\n"
"Content-Type: text/plain; charset=UTF-8\n"

#: main.lua:10
msgid "Cancel"
msgstr "Annuler"

#: koassistant_dialogs.lua:42
#, fuzzy
msgid "Cache size: %1 MB"
msgstr "Taille du cache : %1 Mo"

#: main.lua:12
msgid "Delete %1 item(s)?"
msgstr ""

#: koassistant_settings.lua:5
msgid "Chat Settings"
msgstr ""
"#;

/// Write `body` as `<root>/locale/<lang>/LC_MESSAGES/koassistant.po`.
pub fn write_catalog(root: &Path, lang: &str, body: &str) -> PathBuf {
    let path = root
        .join("locale")
        .join(lang)
        .join("LC_MESSAGES")
        .join("koassistant.po");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, body).unwrap();
    path
}

pub fn write_json(root: &Path, name: &str, body: &str) -> PathBuf {
    let path = root.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn has_ansi(s: &str) -> bool {
    s.bytes().any(|b| b == 0x1B)
}

/// Fail with a readable sample when `s` carries ANSI escapes.
pub fn assert_no_ansi(s: &str, context_msg: &str) {
    if has_ansi(s) {
        let sample = s.lines().take(8).collect::<Vec<_>>().join("\n");
        panic!("{context_msg}\nANSI escapes detected\n--- sample (first 8 lines) ---\n{sample}");
    }
}

pub fn assert_contains_with_context(haystack: &str, needle: &str, context_msg: &str) {
    if haystack.contains(needle) {
        return;
    }
    let head = haystack.lines().take(10).collect::<Vec<_>>().join("\n");
    panic!("{context_msg}\n--- needle ---\n{needle}\n--- head(10) ---\n{head}");
}
