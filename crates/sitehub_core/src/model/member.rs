use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Worker,
    Coordinator,
    Lead,
}

impl Role {
    /// Tasks are edited by the field staff; the lead only approves.
    pub fn can_edit_tasks(self) -> bool {
        matches!(self, Self::Worker | Self::Coordinator)
    }

    pub fn can_approve(self) -> bool {
        matches!(self, Self::Lead)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::Coordinator => "coordinator",
            Self::Lead => "lead",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub pin: String,
}
