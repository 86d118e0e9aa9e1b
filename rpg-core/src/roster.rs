//! The party roster.
//!
//! An ordered list of characters, addressed by id. Insertion order is
//! display order. The roster owns the current value of each character and
//! swaps in the engine's result whenever a change is accepted.

use crate::rules::{ChangeRequest, Intent, Resolution, RulesEngine, RulesError};
use crate::world::{Ability, Character, CharacterId, Skill};
use thiserror::Error;

/// Errors from roster operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("No character with id {0}")]
    NotFound(CharacterId),

    #[error("A character with id {0} is already in the roster")]
    DuplicateId(CharacterId),

    #[error(transparent)]
    UnknownKey(#[from] RulesError),
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    characters: Vec<Character>,
    engine: RulesEngine,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty roster that resolves changes with `engine`.
    pub fn with_engine(engine: RulesEngine) -> Self {
        Self {
            characters: Vec::new(),
            engine,
        }
    }

    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    /// Add a fresh character and return its id.
    ///
    /// Ids come from the clock; if one is already taken (two creations in
    /// the same millisecond) the id is bumped past the largest in use.
    pub fn create_character(&mut self) -> CharacterId {
        let id = self.fresh_id(CharacterId::new());
        self.characters.push(self.engine.create_character_with_id(id));
        tracing::info!(character_id = %id, count = self.characters.len(), "Created character");
        id
    }

    /// `candidate` if unused, else one past the largest id. When that bump
    /// saturates at `u64::MAX`, the lowest unused id.
    fn fresh_id(&self, candidate: CharacterId) -> CharacterId {
        if !self.contains(candidate) {
            return candidate;
        }
        let bumped = self
            .characters
            .iter()
            .map(Character::id)
            .max()
            .unwrap_or(candidate)
            .next();
        if !self.contains(bumped) {
            return bumped;
        }
        // A roster never holds u64::MAX characters, so some id is free.
        (0..=u64::MAX)
            .map(CharacterId)
            .find(|id| !self.contains(*id))
            .unwrap_or(bumped)
    }

    pub fn insert(&mut self, character: Character) -> Result<(), RosterError> {
        if self.contains(character.id()) {
            return Err(RosterError::DuplicateId(character.id()));
        }
        self.characters.push(character);
        Ok(())
    }

    /// Remove a character, returning its last state.
    pub fn remove(&mut self, id: CharacterId) -> Result<Character, RosterError> {
        let index = self.index_of(id)?;
        let removed = self.characters.remove(index);
        tracing::info!(character_id = %id, count = self.characters.len(), "Removed character");
        Ok(removed)
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Display label by position: "Character 1", "Character 2", ...
    pub fn position_label(&self, id: CharacterId) -> Option<String> {
        self.index_of(id)
            .ok()
            .map(|index| format!("Character {}", index + 1))
    }

    /// Resolve `intent` against one character and commit the result.
    ///
    /// A rejected skill change is not an error: the character stays as it
    /// was and the resolution says why.
    pub fn apply(&mut self, id: CharacterId, intent: Intent) -> Result<Resolution, RosterError> {
        let index = self.index_of(id)?;
        let (next, resolution) = self.engine.apply(&self.characters[index], intent);
        self.characters[index] = next;
        Ok(resolution)
    }

    /// Like [`Roster::apply`], for requests that name keys by string.
    pub fn apply_named(
        &mut self,
        id: CharacterId,
        request: &ChangeRequest,
    ) -> Result<Resolution, RosterError> {
        let index = self.index_of(id)?;
        let intent = request.to_intent().map_err(|err| {
            tracing::warn!(character_id = %id, error = %err, "Rejected change request");
            err
        })?;
        let (next, resolution) = self.engine.apply(&self.characters[index], intent);
        self.characters[index] = next;
        Ok(resolution)
    }

    pub fn change_attribute(
        &mut self,
        id: CharacterId,
        ability: Ability,
        delta: i32,
    ) -> Result<&Character, RosterError> {
        self.apply(id, Intent::ChangeAttribute { ability, delta })?;
        self.get(id).ok_or(RosterError::NotFound(id))
    }

    pub fn change_skill(
        &mut self,
        id: CharacterId,
        skill: Skill,
        delta: i32,
    ) -> Result<&Character, RosterError> {
        self.apply(id, Intent::ChangeSkill { skill, delta })?;
        self.get(id).ok_or(RosterError::NotFound(id))
    }

    /// Pool size under this roster's rules.
    pub fn total_points_available(&self, id: CharacterId) -> Result<i64, RosterError> {
        self.get(id)
            .map(|character| self.engine.total_points_available(character.attributes()))
            .ok_or(RosterError::NotFound(id))
    }

    pub fn points_remaining(&self, id: CharacterId) -> Result<i64, RosterError> {
        self.get(id)
            .map(|character| self.engine.points_remaining(character))
            .ok_or(RosterError::NotFound(id))
    }

    fn index_of(&self, id: CharacterId) -> Result<usize, RosterError> {
        self.characters
            .iter()
            .position(|c| c.id() == id)
            .ok_or(RosterError::NotFound(id))
    }
}

impl IntoIterator for Roster {
    type Item = Character;
    type IntoIter = std::vec::IntoIter<Character>;

    fn into_iter(self) -> Self::IntoIter {
        self.characters.into_iter()
    }
}
