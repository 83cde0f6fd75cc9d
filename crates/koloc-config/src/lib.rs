use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "koloc.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KolocConfig {
    /// Root holding `<lang>/LC_MESSAGES/<domain>.po`.
    pub locale_dir: Option<String>,
    /// Catalog file stem.
    pub domain: Option<String>,
    pub batch_size: Option<usize>,
    /// Languages checked by `validate` when none are given.
    pub languages: Option<Vec<String>>,
    pub extract: Option<ExtractCfg>,
    pub apply: Option<ApplyCfg>,
    pub validate: Option<ValidateCfg>,
    pub schema: Option<SchemaCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractCfg {
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyCfg {
    /// Run validation after writing (default true).
    pub validate: Option<bool>,
    /// "in-process" or "subprocess".
    pub validator: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateCfg {
    pub warning_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaCfg {
    pub out_dir: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Default search order: CWD/koloc.toml, then $CONFIG/koloc/koloc.toml.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE));
    }
    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("koloc").join(CONFIG_FILE));
    }
    paths
}

pub fn load_config() -> Result<KolocConfig, ConfigError> {
    load_config_from(&config_paths())
}

/// Load and merge the given files; earlier files win field by field.
/// Missing files are skipped, unreadable or malformed ones are errors.
pub fn load_config_from(paths: &[PathBuf]) -> Result<KolocConfig, ConfigError> {
    let mut merged = KolocConfig::default();
    for path in paths {
        if let Some(cfg) = read_config(path)? {
            merged = merge(merged, cfg);
        }
    }
    Ok(merged)
}

fn read_config(path: &Path) -> Result<Option<KolocConfig>, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str::<KolocConfig>(&text)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn merge(mut a: KolocConfig, b: KolocConfig) -> KolocConfig {
    if a.locale_dir.is_none() {
        a.locale_dir = b.locale_dir;
    }
    if a.domain.is_none() {
        a.domain = b.domain;
    }
    if a.batch_size.is_none() {
        a.batch_size = b.batch_size;
    }
    if a.languages.is_none() {
        a.languages = b.languages;
    }
    a.extract = merge_opt(a.extract, b.extract, merge_extract);
    a.apply = merge_opt(a.apply, b.apply, merge_apply);
    a.validate = merge_opt(a.validate, b.validate, merge_validate);
    a.schema = merge_opt(a.schema, b.schema, merge_schema);
    a
}

fn merge_opt<T>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_extract(mut a: ExtractCfg, b: ExtractCfg) -> ExtractCfg {
    if a.output_dir.is_none() {
        a.output_dir = b.output_dir;
    }
    a
}
fn merge_apply(mut a: ApplyCfg, b: ApplyCfg) -> ApplyCfg {
    if a.validate.is_none() {
        a.validate = b.validate;
    }
    if a.validator.is_none() {
        a.validator = b.validator;
    }
    a
}
fn merge_validate(mut a: ValidateCfg, b: ValidateCfg) -> ValidateCfg {
    if a.warning_limit.is_none() {
        a.warning_limit = b.warning_limit;
    }
    a
}
fn merge_schema(mut a: SchemaCfg, b: SchemaCfg) -> SchemaCfg {
    if a.out_dir.is_none() {
        a.out_dir = b.out_dir;
    }
    a
}
