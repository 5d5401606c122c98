//! Application-level configuration loading: the team set, the admin table and where
//! files are kept.

use std::{
    collections::HashSet,
    env, fmt, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::state::board::Team;

/// Default location on disk where the binary looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/scoreboard.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_CONFIG_PATH";
/// Environment variable that overrides the store directory.
const STORE_DIR_ENV: &str = "SCOREBOARD_STORE_DIR";
/// Environment variable that overrides the export directory.
const EXPORT_DIR_ENV: &str = "SCOREBOARD_EXPORT_DIR";
const DEFAULT_STORE_DIR: &str = "data";
const DEFAULT_EXPORT_DIR: &str = ".";

/// One entry of the static admin lookup table.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential {
    pub identity: String,
    pub secret: String,
}

impl AdminCredential {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    teams: Vec<Team>,
    admins: Vec<AdminCredential>,
    store_dir: PathBuf,
    export_dir: PathBuf,
}

impl AppConfig {
    /// Build a configuration from explicit parts, using the default directories.
    pub fn new(teams: Vec<Team>, admins: Vec<AdminCredential>) -> Self {
        Self {
            teams,
            admins,
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Load the configuration from disk, then apply the directory overrides from the
    /// environment.
    pub fn load() -> Self {
        let mut config = Self::load_from_path(&resolve_config_path());
        if let Some(dir) = env_path(STORE_DIR_ENV) {
            config.store_dir = dir;
        }
        if let Some(dir) = env_path(EXPORT_DIR_ENV) {
            config.export_dir = dir;
        }
        config
    }

    /// Load the configuration file at `path`, falling back to the built-in defaults when
    /// it is missing, unreadable or invalid.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => match raw.validate() {
                    Ok(()) => {
                        let app_config: Self = raw.into();
                        info!(
                            path = %path.display(),
                            teams = app_config.teams.len(),
                            admins = app_config.admins.len(),
                            "loaded scoreboard config"
                        );
                        app_config
                    }
                    Err(err) => {
                        warn!(
                            path = %path.display(),
                            error = %err,
                            "invalid config; falling back to defaults"
                        );
                        Self::default()
                    }
                },
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Configured teams, in display order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|team| team.name == name)
    }

    pub fn admins(&self) -> &[AdminCredential] {
        &self.admins
    }

    /// Directory holding the persisted key-value documents.
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Directory receiving history exports.
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(default_teams(), default_admins())
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    teams: Vec<RawTeam>,
    admins: Vec<RawAdmin>,
    #[serde(default)]
    store_dir: Option<PathBuf>,
    #[serde(default)]
    export_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    name: String,
    color: String,
}

#[derive(Deserialize)]
struct RawAdmin {
    identity: String,
    secret: String,
}

impl fmt::Debug for RawAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawAdmin")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl Validate for RawConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.teams.is_empty() {
            errors.add(
                "teams",
                message_error("teams_empty", "at least one team is required"),
            );
        }

        let mut seen = HashSet::new();
        for team in &self.teams {
            if team.name.trim().is_empty() {
                errors.add(
                    "teams",
                    message_error("team_name_empty", "team names must not be empty"),
                );
            } else if !seen.insert(team.name.as_str()) {
                errors.add(
                    "teams",
                    message_error(
                        "team_name_duplicate",
                        format!("duplicate team `{}`", team.name),
                    ),
                );
            }
        }

        let mut seen = HashSet::new();
        for admin in &self.admins {
            if admin.identity.trim().is_empty() {
                errors.add(
                    "admins",
                    message_error("admin_identity_empty", "admin identities must not be empty"),
                );
            } else if !seen.insert(admin.identity.as_str()) {
                errors.add(
                    "admins",
                    message_error(
                        "admin_identity_duplicate",
                        format!("duplicate admin `{}`", admin.identity),
                    ),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn message_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let message: String = message.into();
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let teams = value
            .teams
            .into_iter()
            .map(|team| Team::new(team.name, team.color))
            .collect();
        let admins = value
            .admins
            .into_iter()
            .map(|admin| AdminCredential::new(admin.identity, admin.secret))
            .collect();

        let mut config = Self::new(teams, admins);
        if let Some(dir) = value.store_dir {
            config.store_dir = dir;
        }
        if let Some(dir) = value.export_dir {
            config.export_dir = dir;
        }
        config
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env_path(CONFIG_PATH_ENV).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
}

/// Built-in team set shipped with the binary.
fn default_teams() -> Vec<Team> {
    vec![
        Team::new("RED", "#e53935"),
        Team::new("BLUE", "#1e88e5"),
        Team::new("GREEN", "#43a047"),
        Team::new("YELLOW", "#fdd835"),
    ]
}

/// Built-in admin table. Plain-text on purpose: this is a coarse gate, replace it in
/// any real deployment.
fn default_admins() -> Vec<AdminCredential> {
    vec![
        AdminCredential::new("Pailin", "pailin-2024"),
        AdminCredential::new("Somchai", "somchai-2024"),
    ]
}
