//! Configuration loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::medium::{FileMedium, KeyValueMedium};
use crate::service::QuizService;

/// Top-level quiztally configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuiztallyConfig {
    /// Directory holding the persisted response collection.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    /// Largest collection, in bytes, the store may write (None = no limit).
    #[serde(default)]
    pub max_store_bytes: Option<u64>,
    /// Directory searched for questionnaire TOML files.
    #[serde(default = "default_questionnaire_dir")]
    pub questionnaire_dir: PathBuf,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("./quiztally-data")
}

fn default_questionnaire_dir() -> PathBuf {
    PathBuf::from("./questionnaires")
}

impl Default for QuiztallyConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            max_store_bytes: None,
            questionnaire_dir: default_questionnaire_dir(),
        }
    }
}

impl QuiztallyConfig {
    /// The medium described by this configuration.
    pub fn medium(&self) -> Arc<dyn KeyValueMedium> {
        let medium = FileMedium::new(self.store_dir.clone());
        match self.max_store_bytes {
            Some(limit) => Arc::new(medium.with_quota(limit)),
            None => Arc::new(medium),
        }
    }

    /// A service over the configured store.
    pub fn open_service(&self) -> QuizService {
        QuizService::new(self.medium())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `quiztally.toml` in the current directory
/// 2. `~/.config/quiztally/config.toml`
///
/// Environment variable override: `QUIZTALLY_STORE_DIR`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuiztallyConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quiztally.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuiztallyConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuiztallyConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZTALLY_STORE_DIR") {
        config.store_dir = PathBuf::from(dir);
    }

    config.store_dir = resolve_path(&config.store_dir);
    config.questionnaire_dir = resolve_path(&config.questionnaire_dir);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quiztally"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZTALLY_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZTALLY_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZTALLY_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_QUIZTALLY_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_QUIZTALLY_SELF_REF", "${_QUIZTALLY_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_QUIZTALLY_SELF_REF}/data/${_QUIZTALLY_SELF_REF}"),
            "${_QUIZTALLY_SELF_REF}/data/${_QUIZTALLY_SELF_REF}"
        );
        std::env::remove_var("_QUIZTALLY_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = QuiztallyConfig::default();
        assert_eq!(config.store_dir, PathBuf::from("./quiztally-data"));
        assert_eq!(config.questionnaire_dir, PathBuf::from("./questionnaires"));
        assert!(config.max_store_bytes.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let config: QuiztallyConfig = toml::from_str(
            r#"
store_dir = "/var/lib/quiztally"
max_store_bytes = 5242880
"#,
        )
        .unwrap();
        assert_eq!(config.store_dir, PathBuf::from("/var/lib/quiztally"));
        assert_eq!(config.max_store_bytes, Some(5_242_880));
        assert_eq!(config.questionnaire_dir, PathBuf::from("./questionnaires"));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiztally.toml");
        std::fs::write(&path, "questionnaire_dir = \"${_QUIZTALLY_QDIR}/sets\"\n").unwrap();

        std::env::set_var("_QUIZTALLY_QDIR", "/srv");
        let config = load_config_from(Some(&path)).unwrap();
        std::env::remove_var("_QUIZTALLY_QDIR");

        assert_eq!(config.questionnaire_dir, PathBuf::from("/srv/sets"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/quiztally.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[tokio::test]
    async fn configured_service_uses_store_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuiztallyConfig {
            store_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let service = config.open_service();
        service
            .submit_response("geo", Default::default(), chrono::Utc::now())
            .await
            .unwrap();
        assert!(dir.path().join("questionnaire_responses.json").exists());
    }
}
