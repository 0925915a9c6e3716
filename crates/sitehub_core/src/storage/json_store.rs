use crate::error::AppError;
use crate::model::Day;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "days.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredDays {
    schema_version: u32,
    #[serde(default)]
    days: BTreeMap<String, Day>,
}

/// In-memory view of the store: one Day per calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayState {
    pub days: BTreeMap<String, Day>,
}

#[derive(Debug)]
pub struct StoreLoad {
    pub state: DayState,
    pub error: Option<AppError>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("SITEHUB_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("sitehub").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("sitehub")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_state(path: &Path) -> Result<DayState, AppError> {
    if !path.exists() {
        return Ok(DayState::default());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let stored: StoredDays =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    for (date, day) in &stored.days {
        if day.date != *date {
            return Err(AppError::invalid_data(format!(
                "day stored under '{date}' claims date '{}'",
                day.date
            )));
        }
    }

    Ok(DayState { days: stored.days })
}

/// A corrupt store must not take the app down; the caller gets an empty
/// state plus the error so it can log the recovery.
pub fn load_state_with_fallback(path: &Path) -> StoreLoad {
    match load_state(path) {
        Ok(state) => StoreLoad { state, error: None },
        Err(err) => StoreLoad {
            state: DayState::default(),
            error: Some(err),
        },
    }
}

pub fn save_state(path: &Path, state: &DayState) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredDays {
        schema_version: SCHEMA_VERSION,
        days: state.days.clone(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}
