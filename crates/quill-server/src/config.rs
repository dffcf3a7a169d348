use std::path::{Path, PathBuf};
use std::time::Duration;

use quill_core::models::preview::RenderMode;
use quill_export::styles::PageSize;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    pub config_version: u32,
    pub region: Option<String>,
    /// Artifact bucket. Without one, finished PDFs are only returned to the
    /// caller and audio input is disabled.
    pub bucket: Option<String>,
    pub upload_prefix: String,
    pub model_id: String,
    pub generation_timeout_secs: u64,
    pub pdf_command: String,
    pub pdf_timeout_secs: u64,
    /// Added in v1.
    pub render_mode: RenderMode,
    /// Overrides the per-type page size when set.
    pub page_size: Option<PageSize>,
    /// Transcribe language code. `None` lets the service identify it.
    pub transcribe_language: Option<String>,
    pub max_audio_bytes: usize,
    pub bind_addr: String,
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            region: None,
            bucket: None,
            upload_prefix: "documents".to_string(),
            model_id: "anthropic.claude-3-5-haiku-20241022-v1:0".to_string(),
            generation_timeout_secs: 60,
            pdf_command: "weasyprint - -".to_string(),
            pdf_timeout_secs: 30,
            render_mode: RenderMode::Lenient,
            page_size: None,
            transcribe_language: None,
            max_audio_bytes: quill_transcribe::DEFAULT_MAX_AUDIO_BYTES,
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl QuillConfig {
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }

    /// Apply `QUILL_*` overrides (and `AWS_REGION`) from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> eyre::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(region) = lookup("QUILL_REGION").or_else(|| lookup("AWS_REGION")) {
            self.region = Some(region);
        }
        if let Some(bucket) = lookup("QUILL_BUCKET") {
            self.bucket = Some(bucket).filter(|b| !b.is_empty());
        }
        if let Some(prefix) = lookup("QUILL_UPLOAD_PREFIX") {
            self.upload_prefix = prefix;
        }
        if let Some(model_id) = lookup("QUILL_MODEL_ID") {
            self.model_id = model_id;
        }
        if let Some(command) = lookup("QUILL_PDF_COMMAND") {
            self.pdf_command = command;
        }
        if let Some(mode) = lookup("QUILL_RENDER_MODE") {
            self.render_mode = serde_json::from_value(serde_json::Value::String(mode.clone()))
                .map_err(|_| {
                    eyre::eyre!("QUILL_RENDER_MODE must be lenient or strict, got {mode:?}")
                })?;
        }
        if let Some(size) = lookup("QUILL_PAGE_SIZE") {
            self.page_size = serde_json::from_value(serde_json::Value::String(size.clone()))
                .map_err(|_| eyre::eyre!("QUILL_PAGE_SIZE must be a4 or letter, got {size:?}"))?;
        }
        if let Some(language) = lookup("QUILL_TRANSCRIBE_LANGUAGE") {
            self.transcribe_language = Some(language).filter(|l| !l.is_empty());
        }
        if let Some(addr) = lookup("QUILL_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(secs) = lookup("QUILL_GENERATION_TIMEOUT_SECS") {
            self.generation_timeout_secs = parse_number("QUILL_GENERATION_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("QUILL_PDF_TIMEOUT_SECS") {
            self.pdf_timeout_secs = parse_number("QUILL_PDF_TIMEOUT_SECS", &secs)?;
        }
        if let Some(bytes) = lookup("QUILL_MAX_AUDIO_BYTES") {
            self.max_audio_bytes = parse_number("QUILL_MAX_AUDIO_BYTES", &bytes)?;
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> eyre::Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| eyre::eyre!("{name} must be a number, got {value:?}"))
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("quill").join("config.json"))
}

/// Load the config from `QUILL_CONFIG` or the platform config dir, then
/// apply environment overrides. A missing file means defaults.
pub fn load() -> eyre::Result<QuillConfig> {
    let path = match std::env::var_os("QUILL_CONFIG") {
        Some(path) => PathBuf::from(path),
        None => default_config_path()?,
    };

    let mut config = if path.exists() {
        load_file(&path)?
    } else {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        QuillConfig::default()
    };
    config.apply_env(|name| std::env::var(name).ok())?;
    Ok(config)
}

pub fn load_file(path: &Path) -> eyre::Result<QuillConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    let config = parse(&contents)?;
    tracing::info!(path = %path.display(), version = config.config_version, "config loaded");
    Ok(config)
}

/// Parse config JSON, migrating older shapes first.
pub fn parse(contents: &str) -> eyre::Result<QuillConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = match json.get("config_version").and_then(|v| v.as_u64()) {
        Some(version) => u32::try_from(version)
            .map_err(|_| eyre::eyre!("config_version {version} is out of range"))?,
        None => 0,
    };

    let migrated = migrate(json, on_disk_version)?;
    Ok(serde_json::from_value(migrated)?)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // v0 → v1: add render_mode. v0 previews never blocked on missing slots.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("render_mode")
            .or_insert(serde_json::Value::String("lenient".to_string()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added render_mode)");
    }

    Ok(json)
}
