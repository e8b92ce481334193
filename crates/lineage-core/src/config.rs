use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;
use crate::graph::{DEFAULT_GENERATIONS, GenerationLimits, HARD_MAX_GENERATIONS, InvalidLimits};

/// Environment variable that overrides the projection database path.
pub const DB_PATH_ENV: &str = "LINEAGE_DB";

/// Projection location used when nothing else names one.
pub const DEFAULT_DB_PATH: &str = ".lineage/lineage.sqlite3";

/// Failure to load or validate configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("invalid [traversal] section: {0}")]
    Limits(InvalidLimits),
}

impl ConfigError {
    /// Map to the stable [`ErrorCode`] catalog.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } | Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::Limits(_) => ErrorCode::InvalidConfig,
        }
    }
}

type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    #[serde(default = "default_generations")]
    pub default_generations: u32,
    #[serde(default = "max_generations")]
    pub max_generations: u32,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_generations: default_generations(),
            max_generations: max_generations(),
        }
    }
}

impl TraversalConfig {
    /// Validated clamping rule for every builder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Limits`] unless `1 <= default_generations <=
    /// max_generations <= 10`.
    pub fn limits(&self) -> Result<GenerationLimits> {
        GenerationLimits::new(self.default_generations, self.max_generations)
            .map_err(ConfigError::Limits)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Projection database, relative paths resolved against the project root.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Per-user settings shared by every project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub limits: GenerationLimits,
    pub db_path: PathBuf,
}

/// Load `<root>/.lineage/config.toml`, or defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".lineage/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    read_toml(&path)
}

/// Load `<config dir>/lineage/config.toml`, or defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    load_user_config_from(&config_dir.join("lineage/config.toml"))
}

fn load_user_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    read_toml(path)
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str::<T>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Merge project, user and environment settings.
///
/// Database path precedence: `LINEAGE_DB`, then the project `[store]`
/// section, then the user `[store]` section, then
/// `.lineage/lineage.sqlite3`.
///
/// # Errors
///
/// Returns an error if either config file is malformed or the traversal
/// limits are out of range.
pub fn resolve_config(project_root: &Path) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    let env_db = env::var_os(DB_PATH_ENV).map(PathBuf::from);
    resolve(project_root, project, user, env_db)
}

fn resolve(
    project_root: &Path,
    project: ProjectConfig,
    user: UserConfig,
    env_db: Option<PathBuf>,
) -> Result<EffectiveConfig> {
    let limits = project.traversal.limits()?;

    let configured = env_db
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| project.store.path.clone())
        .or_else(|| user.store.path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
    let db_path = if configured.is_absolute() {
        configured
    } else {
        project_root.join(configured)
    };

    Ok(EffectiveConfig {
        project,
        user,
        limits,
        db_path,
    })
}

const fn default_generations() -> u32 {
    DEFAULT_GENERATIONS
}

const fn max_generations() -> u32 {
    HARD_MAX_GENERATIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn make_temp_dir(label: &str) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "lineage-config-test-{label}-{}-{id}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("temp dir must be created");
        dir
    }

    fn write_project_config(root: &Path, content: &str) {
        let dir = root.join(".lineage");
        std::fs::create_dir_all(&dir).expect("create .lineage");
        std::fs::write(dir.join("config.toml"), content).expect("write config");
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = make_temp_dir("project-default");
        let cfg = load_project_config(&root).expect("load should succeed");
        assert_eq!(cfg.traversal.default_generations, 4);
        assert_eq!(cfg.traversal.max_generations, 10);
        assert_eq!(cfg.store.path, None);
        assert_eq!(
            cfg.traversal.limits().expect("valid"),
            GenerationLimits::default()
        );
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let root = make_temp_dir("partial");
        write_project_config(&root, "[traversal]\nmax_generations = 6\n");

        let cfg = load_project_config(&root).expect("load should succeed");
        assert_eq!(cfg.traversal.default_generations, 4);
        assert_eq!(cfg.traversal.max_generations, 6);

        let limits = cfg.traversal.limits().expect("valid");
        assert_eq!(limits.clamp(0), 4);
        assert_eq!(limits.clamp(8), 6);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn malformed_file_names_path() {
        let root = make_temp_dir("malformed");
        write_project_config(&root, "[traversal\nmax_generations = ");

        let err = load_project_config(&root).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "unexpected: {err:?}");
        assert_eq!(err.code(), ErrorCode::ConfigParseError);
        assert!(
            format!("{err}").contains("config.toml"),
            "unexpected error: {err}"
        );
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn unreadable_file_is_a_parse_class_error() {
        let root = make_temp_dir("unreadable");
        // A directory where the file should be: exists, but cannot be read.
        std::fs::create_dir_all(root.join(".lineage/config.toml")).expect("create dir");

        let err = load_project_config(&root).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }), "unexpected: {err:?}");
        assert_eq!(err.code(), ErrorCode::ConfigParseError);
        assert!(std::error::Error::source(&err).is_some());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn ceiling_above_hard_limit_is_rejected() {
        let traversal = TraversalConfig {
            default_generations: 4,
            max_generations: 12,
        };
        let err = traversal.limits().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidConfig);
        assert!(err.to_string().contains("max=12"), "unexpected: {err}");

        let inverted = TraversalConfig {
            default_generations: 8,
            max_generations: 5,
        };
        assert!(inverted.limits().is_err());
    }

    #[test]
    fn db_path_precedence() {
        let root = Path::new("/srv/tree");
        let project = ProjectConfig {
            store: StoreConfig {
                path: Some("data/project.sqlite3".into()),
            },
            ..ProjectConfig::default()
        };
        let user = UserConfig {
            store: StoreConfig {
                path: Some("/home/ann/lineage.sqlite3".into()),
            },
        };

        let env_wins = resolve(
            root,
            project.clone(),
            user.clone(),
            Some("/tmp/env.sqlite3".into()),
        )
        .expect("resolve");
        assert_eq!(env_wins.db_path, PathBuf::from("/tmp/env.sqlite3"));

        let project_wins =
            resolve(root, project, user.clone(), Some(PathBuf::new())).expect("resolve");
        assert_eq!(
            project_wins.db_path,
            PathBuf::from("/srv/tree/data/project.sqlite3")
        );

        let user_wins =
            resolve(root, ProjectConfig::default(), user, None).expect("resolve");
        assert_eq!(user_wins.db_path, PathBuf::from("/home/ann/lineage.sqlite3"));

        let fallback = resolve(root, ProjectConfig::default(), UserConfig::default(), None)
            .expect("resolve");
        assert_eq!(
            fallback.db_path,
            PathBuf::from("/srv/tree/.lineage/lineage.sqlite3")
        );
        assert_eq!(fallback.limits, GenerationLimits::default());
    }

    #[test]
    fn resolve_rejects_invalid_limits() {
        let project = ProjectConfig {
            traversal: TraversalConfig {
                default_generations: 0,
                max_generations: 10,
            },
            ..ProjectConfig::default()
        };
        let err = resolve(Path::new("/srv"), project, UserConfig::default(), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Limits(InvalidLimits {
                default: 0,
                ceiling: 10
            })
        ));
        assert_eq!(err.code(), ErrorCode::InvalidConfig);
    }

    #[test]
    fn user_config_parses_store_path() {
        let dir = make_temp_dir("user-config");
        let path = dir.join("config.toml");
        std::fs::write(&path, "[store]\npath = \"/data/family.sqlite3\"\n").expect("write");

        let cfg = load_user_config_from(&path).expect("parse");
        assert_eq!(cfg.store.path, Some(PathBuf::from("/data/family.sqlite3")));

        std::fs::write(&path, "[store]\npath = 7\n").expect("write");
        let err = load_user_config_from(&path).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigParseError);

        let missing = load_user_config_from(&dir.join("absent.toml")).expect("defaults");
        assert_eq!(missing, UserConfig::default());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
