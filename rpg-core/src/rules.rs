//! Character rules engine with an Intent/Effect system.
//!
//! Every change to a character follows the same pipeline:
//! 1. The caller describes the change as an [`Intent`]
//! 2. [`RulesEngine::resolve`] validates it against the current character
//! 3. The resulting [`Effect`]s describe the state change (or its rejection)
//! 4. [`apply_effects`] folds them into a new `Character`
//!
//! Resolution never touches the input; callers replace their copy with
//! the returned value.

use crate::world::{
    modifier, Ability, AttributeSet, Character, CharacterId, Skill, DEFAULT_SCORE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for requests that name keys outside the fixed sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Missing entry for {0}")]
    MissingKey(String),

    #[error("Duplicate entry for {0}")]
    DuplicateKey(String),

    #[error("Invalid point value {points} for skill {skill}")]
    InvalidPoints { skill: String, points: i64 },
}

/// Tunable numbers behind the skill budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Score every ability starts at.
    pub default_score: i32,
    /// Points available when the budget ability's modifier is zero.
    pub base_skill_points: i64,
    /// Points gained (or lost) per point of budget-ability modifier.
    pub points_per_modifier: i64,
    /// The ability whose modifier scales the pool.
    pub budget_ability: Ability,
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_score(mut self, score: i32) -> Self {
        self.default_score = score;
        self
    }

    pub fn with_base_skill_points(mut self, points: i64) -> Self {
        self.base_skill_points = points;
        self
    }

    pub fn with_points_per_modifier(mut self, points: i64) -> Self {
        self.points_per_modifier = points;
        self
    }

    pub fn with_budget_ability(mut self, ability: Ability) -> Self {
        self.budget_ability = ability;
        self
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            default_score: DEFAULT_SCORE,
            base_skill_points: 10,
            points_per_modifier: 4,
            budget_ability: Ability::Intelligence,
        }
    }
}

/// A requested change to one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Move an ability score by `delta`
    ChangeAttribute { ability: Ability, delta: i32 },

    /// Put `delta` more points into a skill (negative to refund)
    ChangeSkill { skill: Skill, delta: i32 },
}

/// A change request that names its target by string, as it arrives from
/// a UI or over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeRequest {
    Attribute { name: String, delta: i32 },
    Skill { name: String, delta: i32 },
}

impl ChangeRequest {
    pub fn attribute(name: impl Into<String>, delta: i32) -> Self {
        ChangeRequest::Attribute {
            name: name.into(),
            delta,
        }
    }

    pub fn skill(name: impl Into<String>, delta: i32) -> Self {
        ChangeRequest::Skill {
            name: name.into(),
            delta,
        }
    }

    /// Resolve the named key, failing before any state is touched.
    pub fn to_intent(&self) -> Result<Intent, RulesError> {
        match self {
            ChangeRequest::Attribute { name, delta } => Ok(Intent::ChangeAttribute {
                ability: name.parse()?,
                delta: *delta,
            }),
            ChangeRequest::Skill { name, delta } => Ok(Intent::ChangeSkill {
                skill: name.parse()?,
                delta: *delta,
            }),
        }
    }
}

/// Why a skill change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The skill would drop below zero points.
    WouldGoNegative { current: u32 },
    /// Total spending would exceed the pool.
    ExceedsBudget { spent: i64, available: i64 },
}

/// Effects are the result of resolving an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    AttributeChanged {
        ability: Ability,
        old_score: i32,
        new_score: i32,
    },

    SkillChanged {
        skill: Skill,
        old_points: u32,
        new_points: u32,
    },

    /// The request was refused; nothing changes.
    SkillChangeRejected {
        skill: Skill,
        delta: i32,
        reason: RejectionReason,
    },
}

impl Effect {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Effect::SkillChangeRejected { .. })
    }
}

/// The result of resolving an intent.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub effects: Vec<Effect>,
    pub narrative: String,
}

impl Resolution {
    pub fn new(narrative: impl Into<String>) -> Self {
        Self {
            effects: Vec::new(),
            narrative: narrative.into(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// True if any effect was a rejection.
    pub fn was_rejected(&self) -> bool {
        self.effects.iter().any(Effect::is_rejection)
    }
}

/// Resolves character change intents and derives the skill budget.
#[derive(Debug, Clone, Default)]
pub struct RulesEngine {
    config: RulesConfig,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RulesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// A new character using this engine's starting score.
    pub fn create_character(&self) -> Character {
        self.create_character_with_id(CharacterId::new())
    }

    pub fn create_character_with_id(&self, id: CharacterId) -> Character {
        Character::with_id(id).replace_attributes(AttributeSet::uniform(self.config.default_score))
    }

    /// Skill pool earned from the budget ability's current modifier.
    ///
    /// Recomputed from live attributes, so lowering the budget ability
    /// after spending shrinks the pool retroactively.
    pub fn total_points_available(&self, attributes: &AttributeSet) -> i64 {
        let budget_modifier = i64::from(modifier(attributes.get(self.config.budget_ability)));
        self.config.base_skill_points + self.config.points_per_modifier * budget_modifier
    }

    pub fn points_remaining(&self, character: &Character) -> i64 {
        self.total_points_available(character.attributes()) - character.skills().total_spent()
    }

    /// Resolve an intent and produce effects.
    pub fn resolve(&self, character: &Character, intent: Intent) -> Resolution {
        match intent {
            Intent::ChangeAttribute { ability, delta } => {
                self.resolve_attribute_change(character, ability, delta)
            }
            Intent::ChangeSkill { skill, delta } => {
                self.resolve_skill_change(character, skill, delta)
            }
        }
    }

    fn resolve_attribute_change(
        &self,
        character: &Character,
        ability: Ability,
        delta: i32,
    ) -> Resolution {
        let old_score = character.attributes().get(ability);
        let new_score = old_score.saturating_add(delta);

        Resolution::new(format!(
            "{} changes from {old_score} to {new_score}",
            ability.name()
        ))
        .with_effect(Effect::AttributeChanged {
            ability,
            old_score,
            new_score,
        })
    }

    fn resolve_skill_change(&self, character: &Character, skill: Skill, delta: i32) -> Resolution {
        let current = character.skills().get(skill);
        let spent = character.skills().total_spent();
        let available = self.total_points_available(character.attributes());
        let next = i64::from(current) + i64::from(delta);

        let reason = if next < 0 {
            Some(RejectionReason::WouldGoNegative { current })
        } else if spent + i64::from(delta) > available {
            // Applies to refunds too: while over budget only a refund that
            // brings spending back within the pool goes through.
            Some(RejectionReason::ExceedsBudget { spent, available })
        } else {
            None
        };

        let new_points = match (reason, u32::try_from(next)) {
            (None, Ok(points)) => points,
            (Some(reason), _) => return self.reject(character, skill, delta, reason),
            (None, Err(_)) => {
                let reason = RejectionReason::ExceedsBudget { spent, available };
                return self.reject(character, skill, delta, reason);
            }
        };

        Resolution::new(format!(
            "{} changes from {current} to {new_points} points",
            skill.name()
        ))
        .with_effect(Effect::SkillChanged {
            skill,
            old_points: current,
            new_points,
        })
    }

    fn reject(
        &self,
        character: &Character,
        skill: Skill,
        delta: i32,
        reason: RejectionReason,
    ) -> Resolution {
        tracing::debug!(
            character_id = %character.id(),
            skill = skill.name(),
            delta,
            ?reason,
            "Rejected skill change"
        );

        let narrative = match reason {
            RejectionReason::WouldGoNegative { current } => format!(
                "{} has only {current} points; cannot change by {delta}",
                skill.name()
            ),
            RejectionReason::ExceedsBudget { spent, available } => format!(
                "Spending {delta} more on {} would exceed the pool ({spent}/{available} used)",
                skill.name()
            ),
        };

        Resolution::new(narrative).with_effect(Effect::SkillChangeRejected {
            skill,
            delta,
            reason,
        })
    }

    /// Resolve and apply in one step.
    pub fn apply(&self, character: &Character, intent: Intent) -> (Character, Resolution) {
        let resolution = self.resolve(character, intent);
        let next = apply_effects(character.clone(), &resolution.effects);
        (next, resolution)
    }

    pub fn change_attribute(&self, character: &Character, ability: Ability, delta: i32) -> Character {
        self.apply(character, Intent::ChangeAttribute { ability, delta }).0
    }

    /// Returns an equal character when the change is rejected.
    pub fn change_skill(&self, character: &Character, skill: Skill, delta: i32) -> Character {
        self.apply(character, Intent::ChangeSkill { skill, delta }).0
    }
}

/// Apply effects to a character, returning the new value.
pub fn apply_effects(character: Character, effects: &[Effect]) -> Character {
    effects.iter().fold(character, apply_effect)
}

/// Apply a single effect to a character.
pub fn apply_effect(character: Character, effect: &Effect) -> Character {
    match *effect {
        Effect::AttributeChanged {
            ability, new_score, ..
        } => {
            let attributes = character.attributes().with_score(ability, new_score);
            character.replace_attributes(attributes)
        }
        Effect::SkillChanged {
            skill, new_points, ..
        } => {
            let skills = character.skills().with_points(skill, new_points);
            character.replace_skills(skills)
        }
        Effect::SkillChangeRejected { .. } => character,
    }
}
