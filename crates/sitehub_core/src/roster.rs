use crate::config::{self, Config};
use crate::error::AppError;
use crate::model::Member;

/// One login error for every failure mode so the prompt never reveals
/// whether the identifier or the pin was wrong.
const LOGIN_FAILED: &str = "unknown user or wrong pin";

#[derive(Debug, Clone)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    pub fn new(members: Vec<Member>) -> Result<Self, AppError> {
        for (index, member) in members.iter().enumerate() {
            let duplicate = members[..index].iter().any(|other| {
                other.id.eq_ignore_ascii_case(&member.id)
                    || other.name.eq_ignore_ascii_case(&member.name)
            });
            if duplicate {
                return Err(AppError::invalid_data(format!(
                    "duplicate roster entry '{}'",
                    member.id
                )));
            }
        }

        Ok(Self { members })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(config::members(config)?)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn authenticate(&self, identifier: &str, pin: &str) -> Result<Member, AppError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::invalid_credentials(LOGIN_FAILED));
        }

        let member = self
            .members
            .iter()
            .find(|member| {
                member.id.eq_ignore_ascii_case(identifier)
                    || member.name.eq_ignore_ascii_case(identifier)
            })
            .ok_or_else(|| AppError::invalid_credentials(LOGIN_FAILED))?;

        if !member.pin.eq_ignore_ascii_case(pin.trim()) {
            return Err(AppError::invalid_credentials(LOGIN_FAILED));
        }

        Ok(member.clone())
    }
}
