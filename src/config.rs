//! Configuration for ageless.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (AGELESS_HOME, AGELESS_DATABASE, AGELESS_BACKEND_URL,
//!    AGELESS_BACKEND_KEY, OPENAI_API_KEY, AGELESS_MODEL, AGELESS_USER)
//! 2. Config file (.ageless/config.yaml)
//! 3. Defaults (~/.ageless, local SQLite database, canned assistant)
//!
//! Config file discovery:
//! - Searches current directory and parents for .ageless/config.yaml
//! - Relative paths in the config file resolve against its .ageless/ directory

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::adapters::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::adapters::{
    Assistant, CannedAssistant, DataStore, OpenAiAssistant, RestStore, SqliteStore,
};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_USER: &str = "demo";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub backend: Option<BackendConfig>,
    #[serde(default)]
    pub assistant: Option<AssistantConfig>,
    #[serde(default)]
    pub user: Option<UserConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .ageless/)
    pub home: Option<String>,
    /// SQLite database file (relative to .ageless/)
    pub database: Option<String>,
    /// Resource catalog JSON file (relative to .ageless/)
    pub catalog: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub id: Option<String>,
    pub age: Option<u32>,
}

/// Hosted backend credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantSettings {
    /// Model API key; the canned assistant is used without one
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// Local database used when no hosted backend is configured
    pub database: PathBuf,
    /// Resource catalog file
    pub catalog: PathBuf,
    /// Hosted backend, if configured
    pub backend: Option<BackendSettings>,
    pub assistant: AssistantSettings,
    /// Per-request timeout for remote calls
    pub timeout: Duration,
    /// Default user for commands that take one
    pub user_id: String,
    /// Player age used for suggestions
    pub user_age: Option<u32>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Build the data store this configuration selects
    pub fn data_store(&self) -> Result<Arc<dyn DataStore>> {
        match &self.backend {
            Some(backend) => {
                info!(url = %backend.url, "Using hosted backend");
                let store = RestStore::with_timeout(&backend.url, &backend.api_key, self.timeout)
                    .context("Failed to build backend client")?;
                Ok(Arc::new(store))
            }
            None => {
                let store = SqliteStore::open(&self.database).with_context(|| {
                    format!("Failed to open database: {}", self.database.display())
                })?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Build the coaching assistant this configuration selects
    pub fn assistant(&self) -> Result<Arc<dyn Assistant>> {
        match &self.assistant.api_key {
            Some(key) => {
                info!(model = %self.assistant.model, "Using model API");
                let assistant = OpenAiAssistant::new(key)
                    .with_model(&self.assistant.model)
                    .with_base_url(&self.assistant.base_url)
                    .with_timeout(self.timeout)
                    .context("Failed to build assistant client")?;
                Ok(Arc::new(assistant))
            }
            None => Ok(Arc::new(CannedAssistant::default())),
        }
    }
}

/// Values read from the environment
#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    home: Option<String>,
    database: Option<String>,
    backend_url: Option<String>,
    backend_key: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    user: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            home: var("AGELESS_HOME"),
            database: var("AGELESS_DATABASE"),
            backend_url: var("AGELESS_BACKEND_URL"),
            backend_key: var("AGELESS_BACKEND_KEY"),
            api_key: var("OPENAI_API_KEY"),
            model: var("AGELESS_MODEL"),
            user: var("AGELESS_USER"),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".ageless").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge defaults, config file and environment
fn resolve(
    default_home: PathBuf,
    file: Option<(PathBuf, ConfigFile)>,
    env: EnvOverrides,
) -> ResolvedConfig {
    let (config_file, config) = match file {
        Some((path, config)) => (Some(path), Some(config)),
        None => (None, None),
    };

    // Relative paths resolve against .ageless/
    let config_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf);
    let from_file = |pick: fn(&PathsConfig) -> Option<&String>| -> Option<PathBuf> {
        let config = config.as_ref()?;
        let dir = config_dir.as_deref()?;
        pick(&config.paths).map(|p| resolve_path(dir, p))
    };

    let home = env
        .home
        .map(PathBuf::from)
        .or_else(|| from_file(|p| p.home.as_ref()))
        .unwrap_or(default_home);

    let database = env
        .database
        .map(PathBuf::from)
        .or_else(|| from_file(|p| p.database.as_ref()))
        .unwrap_or_else(|| home.join("ageless.db"));

    let catalog = from_file(|p| p.catalog.as_ref()).unwrap_or_else(|| home.join("catalog.json"));

    let file_backend = config.as_ref().and_then(|c| c.backend.clone());
    let backend_url = env
        .backend_url
        .or_else(|| file_backend.as_ref().and_then(|b| b.url.clone()));
    let backend_key = env
        .backend_key
        .or_else(|| file_backend.as_ref().and_then(|b| b.api_key.clone()));
    let backend = match (backend_url, backend_key) {
        (Some(url), Some(api_key)) => Some(BackendSettings { url, api_key }),
        _ => None,
    };

    let file_assistant = config.as_ref().and_then(|c| c.assistant.clone());
    let assistant = AssistantSettings {
        api_key: env.api_key,
        model: env
            .model
            .or_else(|| file_assistant.as_ref().and_then(|a| a.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        base_url: file_assistant
            .as_ref()
            .and_then(|a| a.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
    };
    let timeout = Duration::from_secs(
        file_assistant
            .as_ref()
            .and_then(|a| a.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
    );

    let file_user = config.as_ref().and_then(|c| c.user.clone());
    let user_id = env
        .user
        .or_else(|| file_user.as_ref().and_then(|u| u.id.clone()))
        .unwrap_or_else(|| DEFAULT_USER.to_string());
    let user_age = file_user.and_then(|u| u.age);

    ResolvedConfig {
        home,
        database,
        catalog,
        backend,
        assistant,
        timeout,
        user_id,
        user_age,
        config_file,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".ageless");

    let file = match find_config_file() {
        Some(path) => {
            let config = load_config_file(&path)?;
            Some((path, config))
        }
        None => None,
    };

    Ok(resolve(default_home, file, EnvOverrides::from_env()))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, body: &str) -> PathBuf {
        let dir = temp.path().join(".ageless");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let home = PathBuf::from("/home/player/.ageless");
        let config = resolve(home.clone(), None, EnvOverrides::default());

        assert_eq!(config.home, home);
        assert_eq!(config.database, home.join("ageless.db"));
        assert_eq!(config.catalog, home.join("catalog.json"));
        assert!(config.backend.is_none());
        assert!(config.assistant.api_key.is_none());
        assert_eq!(config.assistant.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.user_id, "demo");
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
version: "1.0"
paths:
  home: ./
  database: data/app.db
backend:
  url: https://project.example.co
  api_key: anon-key
assistant:
  model: gpt-4o-mini
  timeout_seconds: 3
user:
  id: player-7
  age: 44
"#,
        );

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.database, Some("data/app.db".to_string()));
        assert_eq!(config.user.as_ref().and_then(|u| u.age), Some(44));

        let resolved = resolve(
            PathBuf::from("/unused"),
            Some((path.clone(), config)),
            EnvOverrides::default(),
        );
        let ageless_dir = path.parent().unwrap();
        assert_eq!(resolved.database, ageless_dir.join("data/app.db"));
        assert_eq!(
            resolved.backend,
            Some(BackendSettings {
                url: "https://project.example.co".to_string(),
                api_key: "anon-key".to_string(),
            })
        );
        assert_eq!(resolved.assistant.model, "gpt-4o-mini");
        assert_eq!(resolved.timeout, Duration::from_secs(3));
        assert_eq!(resolved.user_id, "player-7");
        assert_eq!(resolved.user_age, Some(44));
    }

    #[test]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
version: "1.0"
backend:
  url: https://from-file.example.co
user:
  id: from-file
"#,
        );
        let config = load_config_file(&path).unwrap();

        let env = EnvOverrides {
            home: Some("/env/home".to_string()),
            backend_key: Some("env-key".to_string()),
            api_key: Some("sk-test".to_string()),
            user: Some("from-env".to_string()),
            ..Default::default()
        };
        let resolved = resolve(PathBuf::from("/unused"), Some((path, config)), env);

        assert_eq!(resolved.home, PathBuf::from("/env/home"));
        assert_eq!(resolved.database, PathBuf::from("/env/home/ageless.db"));
        // URL from the file, key from the environment
        assert_eq!(
            resolved.backend.map(|b| (b.url, b.api_key)),
            Some(("https://from-file.example.co".to_string(), "env-key".to_string()))
        );
        assert_eq!(resolved.assistant.api_key.as_deref(), Some("sk-test"));
        assert_eq!(resolved.user_id, "from-env");
    }

    #[test]
    fn test_backend_needs_url_and_key() {
        let env = EnvOverrides {
            backend_url: Some("https://project.example.co".to_string()),
            ..Default::default()
        };
        let resolved = resolve(PathBuf::from("/h"), None, env);
        assert!(resolved.backend.is_none());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }

    #[tokio::test]
    async fn test_local_store_selected_without_backend() {
        let temp = TempDir::new().unwrap();
        let env = EnvOverrides {
            database: Some(temp.path().join("test.db").display().to_string()),
            ..Default::default()
        };
        let resolved = resolve(temp.path().to_path_buf(), None, env);

        assert_eq!(resolved.data_store().unwrap().name(), "sqlite");
        assert_eq!(resolved.assistant().unwrap().name(), "canned");
    }
}
