use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_TEMP_DIR_NAME: &str = "tauri-plugin-social-share";

/// Plugin configuration, read from `plugins.social-share` in `tauri.conf.json`.
///
/// ```json
/// {
///   "plugins": {
///     "social-share": { "appId": "1234567890", "tempDir": "/var/tmp/share" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Facebook app id, passed to Instagram Stories as `source_application`.
    pub app_id: Option<String>,
    /// Directory for staged files. Defaults to a folder under the app cache dir.
    pub temp_dir: Option<PathBuf>,
}

impl Config {
    /// The configured `tempDir`, or a plugin folder under `default_root`.
    pub fn staging_dir(&self, default_root: &Path) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(|| default_root.join(DEFAULT_TEMP_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_stages_under_the_default_root() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.app_id.is_none());
        assert_eq!(
            config.staging_dir(Path::new("/data/user/0/com.example/cache")),
            PathBuf::from("/data/user/0/com.example/cache").join(DEFAULT_TEMP_DIR_NAME)
        );
    }

    #[test]
    fn reads_camel_case_keys() {
        let config: Config =
            serde_json::from_str(r#"{ "appId": "42", "tempDir": "/tmp/share" }"#).unwrap();
        assert_eq!(config.app_id.as_deref(), Some("42"));
        assert_eq!(
            config.staging_dir(Path::new("/data/user/0/com.example/cache")),
            PathBuf::from("/tmp/share")
        );
    }
}
