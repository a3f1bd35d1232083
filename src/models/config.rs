use serde::Deserialize;
use std::path::Path;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Ghostscript executable name or path
    #[serde(default = "default_ghostscript")]
    pub ghostscript: String,

    /// DPI used when a request does not specify one
    #[serde(default = "default_dpi")]
    pub default_dpi: u32,

    /// Rendering threads handed to Ghostscript
    #[serde(default = "default_rendering_threads")]
    pub rendering_threads: u32,

    /// Ghostscript memory ceiling in megabytes
    #[serde(default = "default_memory_mb")]
    pub memory_mb: u32,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_ghostscript() -> String {
    "gs".to_string()
}

fn default_dpi() -> u32 {
    300
}

fn default_rendering_threads() -> u32 {
    8
}

fn default_memory_mb() -> u32 {
    2000
}

fn default_max_upload_bytes() -> usize {
    // Scanned source PDFs routinely run into the hundreds of megabytes.
    512 * 1024 * 1024
}

impl AppConfig {
    /// Load configuration from the path in `CONFIG_FILE`, falling back
    /// to defaults when unset, missing, or unparsable.
    pub fn load() -> Self {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_file(Path::new(&path)),
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a YAML file, falling back to defaults.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        ghostscript = %config.ghostscript,
                        default_dpi = config.default_dpi,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ghostscript: default_ghostscript(),
            default_dpi: default_dpi(),
            rendering_threads: default_rendering_threads(),
            memory_mb: default_memory_mb(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.ghostscript, "gs");
        assert_eq!(config.default_dpi, 300);
        assert_eq!(config.rendering_threads, 8);
        assert_eq!(config.memory_mb, 2000);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
ghostscript: /usr/local/bin/gs
default_dpi: 600
rendering_threads: 4
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.ghostscript, "/usr/local/bin/gs");
        assert_eq!(config.default_dpi, 600);
        assert_eq!(config.rendering_threads, 4);
        // Unspecified fields fall back to defaults
        assert_eq!(config.memory_mb, 2000);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.default_dpi, 300);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = AppConfig::load_from_file(Path::new("/nonexistent/config.yaml"));
        assert_eq!(config.ghostscript, "gs");
    }
}
