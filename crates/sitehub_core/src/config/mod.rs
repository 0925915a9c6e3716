use crate::error::AppError;
use crate::model::{Member, Role};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "SITEHUB_CONFIG_PATH";

/// Roster entry as written in the config file. Roles are free-form strings
/// here and only become a `Role` through `normalize_role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSpec {
    pub id: String,
    pub name: String,
    pub role: String,
    pub pin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_site")]
    pub site: String,
    #[serde(default = "default_members")]
    pub members: Vec<MemberSpec>,
    #[serde(default = "default_opening_tasks")]
    pub opening_tasks: Vec<String>,
    #[serde(default = "default_closing_tasks")]
    pub closing_tasks: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: default_site(),
            members: default_members(),
            opening_tasks: default_opening_tasks(),
            closing_tasks: default_closing_tasks(),
        }
    }
}

fn default_site() -> String {
    "AG WS".to_string()
}

fn default_members() -> Vec<MemberSpec> {
    [
        ("oliver", "Oliver", "bpo", "1111"),
        ("emil", "Emil", "bpo", "2222"),
        ("william", "William", "bpo", "3333"),
        ("martin", "Martin", "koordinator", "4444"),
        ("catharina", "Catharina", "koordinator", "5555"),
        ("jon", "Jon", "logistics", "9999"),
    ]
    .into_iter()
    .map(|(id, name, role, pin)| MemberSpec {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        pin: pin.to_string(),
    })
    .collect()
}

fn default_opening_tasks() -> Vec<String> {
    [
        "Open the work permit and bring the safety card",
        "Check the SiteHub fences for damage",
        "Register deliveries in Sitebooking",
        "Clean the photo recognition screen",
        "Photograph the delivery note",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_closing_tasks() -> Vec<String> {
    [
        "Check for cigarette butts",
        "Clean the mats",
        "Tidy up the yard",
        "Close gates and fences",
        "Site closed correctly",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("sitehub")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("sitehub")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config() -> Result<Config, AppError> {
    let path = config_path()?;
    load_config_from_path(&path)
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content)
        .map_err(|err| AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err)))
}

/// Resolve the free-form role strings found across config variants into the
/// closed role set. This is the only place role strings are interpreted.
pub fn normalize_role(raw: &str) -> Result<Role, AppError> {
    let canonical = canonicalize_role_name(raw)
        .ok_or_else(|| AppError::invalid_data(format!("empty role for '{raw}'")))?;

    match canonical.as_str() {
        "bpo" | "worker" | "field_worker" => Ok(Role::Worker),
        "koordinator" | "coordinator" => Ok(Role::Coordinator),
        "logistics" | "logistikchef" | "logistics_lead" | "lead" => Ok(Role::Lead),
        other => Err(AppError::invalid_data(format!("unknown role '{other}'"))),
    }
}

fn canonicalize_role_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn members(config: &Config) -> Result<Vec<Member>, AppError> {
    let mut members = Vec::with_capacity(config.members.len());
    for spec in &config.members {
        let id = spec.id.trim();
        if id.is_empty() {
            return Err(AppError::invalid_data("member id cannot be empty"));
        }
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_data(format!("member '{id}' has no name")));
        }
        if spec.pin.trim().is_empty() {
            return Err(AppError::invalid_data(format!("member '{id}' has no pin")));
        }

        members.push(Member {
            id: id.to_string(),
            name: name.to_string(),
            role: normalize_role(&spec.role)?,
            pin: spec.pin.trim().to_string(),
        });
    }

    Ok(members)
}
