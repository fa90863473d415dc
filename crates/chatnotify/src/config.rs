use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::{NotifyError, Result};

const DEFAULT_CONFIG_NAME: &str = "chatnotify.toml";

pub const GITHUB_MARK_URL: &str =
    "https://github.githubassets.com/images/modules/logos_page/GitHub-Mark.png";
pub const SUCCESS_ICON_URL: &str =
    "https://fonts.gstatic.com/s/i/googlematerialicons/check_circle/v6/24px.svg";
pub const FAILURE_ICON_URL: &str =
    "https://fonts.gstatic.com/s/i/googlematerialicons/error/v6/24px.svg";
pub const CANCELLED_ICON_URL: &str =
    "https://fonts.gstatic.com/s/i/googlematerialicons/cancel/v6/24px.svg";
pub const PULL_REQUEST_ICON_URL: &str =
    "https://fonts.gstatic.com/s/i/googlematerialicons/merge_type/v6/24px.svg";
pub const PUSH_ICON_URL: &str =
    "https://fonts.gstatic.com/s/i/googlematerialicons/commit/v6/24px.svg";
pub const WORKFLOW_DISPATCH_ICON_URL: &str =
    "https://fonts.gstatic.com/s/i/googlematerialicons/play_circle/v6/24px.svg";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub assets: Assets,
}

/// Image and icon URLs referenced by the card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Assets {
    pub github_mark: String,
    pub success_icon: String,
    pub failure_icon: String,
    pub cancelled_icon: String,
    pub pull_request_icon: String,
    pub push_icon: String,
    pub workflow_dispatch_icon: String,
}

impl Default for Assets {
    fn default() -> Self {
        Assets {
            github_mark: GITHUB_MARK_URL.to_string(),
            success_icon: SUCCESS_ICON_URL.to_string(),
            failure_icon: FAILURE_ICON_URL.to_string(),
            cancelled_icon: CANCELLED_ICON_URL.to_string(),
            pull_request_icon: PULL_REQUEST_ICON_URL.to_string(),
            push_icon: PUSH_ICON_URL.to_string(),
            workflow_dispatch_icon: WORKFLOW_DISPATCH_ICON_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or search upward from the
    /// current dir, then the user config dir. No file at all means defaults.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let path = match path_override {
            Some(p) => p,
            None => match find_upwards(DEFAULT_CONFIG_NAME).or_else(user_config) {
                Some(p) => p,
                None => {
                    debug!("no config file found, using built-in assets");
                    return Ok(Config::default());
                }
            },
        };

        debug!(path = %path.display(), "loading config");
        let contents = fs::read_to_string(&path).map_err(|source| NotifyError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| NotifyError::ConfigParse { path, source })
    }
}

fn find_upwards(file_name: &str) -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(file_name);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

fn user_config() -> Option<PathBuf> {
    let candidate = dirs::config_dir()?.join("chatnotify").join("config.toml");
    candidate.exists().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_assets_keep_defaults() {
        let toml = r#"[assets]
success_icon = "https://cdn.example/ok.png"
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let cfg = Config::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.assets.success_icon, "https://cdn.example/ok.png");
        assert_eq!(cfg.assets.failure_icon, FAILURE_ICON_URL);
        assert_eq!(cfg.assets.github_mark, GITHUB_MARK_URL);
    }

    #[test]
    fn empty_file_is_default() {
        let file = NamedTempFile::new().unwrap();
        let cfg = Config::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.assets, Assets::default());
    }

    #[test]
    fn unknown_key_errors() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[assets]\nlogo = \"x\"\n").unwrap();
        let result = Config::load(Some(file.path().to_path_buf()));
        assert_matches!(result, Err(NotifyError::ConfigParse { .. }));
    }

    #[test]
    fn explicit_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(dir.path().join("nope.toml")));
        assert_matches!(result, Err(NotifyError::ConfigRead { .. }));
    }
}
