use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::id::new_id;

/// Medlem i kåren. `group_id` pekar på en patrull, eller saknas för
/// medlemmar som inte delats in. Referensen behöver inte vara giltig —
/// raderade patruller lämnar hängande id:n som läsare tolererar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub join_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl Member {
    pub fn new(name: impl Into<String>, group_id: Option<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            join_date: Utc::now(),
            group_id,
        }
    }

    pub fn validate(&self) -> Result<(), RosterValidationError> {
        if self.name.trim().is_empty() {
            return Err(RosterValidationError::EmptyMemberName);
        }
        Ok(())
    }
}

/// Patrull (grupp av medlemmar)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), RosterValidationError> {
        if self.name.trim().is_empty() {
            return Err(RosterValidationError::EmptyGroupName);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RosterValidationError {
    #[error("Medlemsnamn får inte vara tomt")]
    EmptyMemberName,
    #[error("Patrullnamn får inte vara tomt")]
    EmptyGroupName,
}
