//! Roster persistence.
//!
//! The roster travels as a batch payload, `{ "characters": [...] }`, the
//! shape the save endpoint accepts. This module converts between that
//! payload and a [`Roster`], as JSON text or a JSON file on disk.

use crate::roster::{Roster, RosterError};
use crate::rules::RulesEngine;
use crate::world::Character;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid roster payload: {0}")]
    InvalidFormat(#[from] RosterError),
}

/// Batch payload holding every character in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterPayload {
    pub characters: Vec<Character>,
}

impl RosterPayload {
    pub fn from_roster(roster: &Roster) -> Self {
        Self {
            characters: roster.characters().to_vec(),
        }
    }

    /// Rebuild a roster; duplicate ids are rejected.
    pub fn into_roster(self) -> Result<Roster, PersistError> {
        self.into_roster_with(RulesEngine::default())
    }

    pub fn into_roster_with(self, engine: RulesEngine) -> Result<Roster, PersistError> {
        let mut roster = Roster::with_engine(engine);
        for character in self.characters {
            roster.insert(character)?;
        }
        Ok(roster)
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        tracing::debug!(path = %path.display(), characters = self.characters.len(), "Saved roster");
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let payload = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), characters = payload.characters.len(), "Loaded roster");
        Ok(payload)
    }
}

/// Save a roster to a JSON file.
pub async fn save_roster(roster: &Roster, path: impl AsRef<Path>) -> Result<(), PersistError> {
    RosterPayload::from_roster(roster).save_json(path).await
}

/// Load a roster from a JSON file.
pub async fn load_roster(path: impl AsRef<Path>) -> Result<Roster, PersistError> {
    RosterPayload::load_json(path).await?.into_roster()
}
