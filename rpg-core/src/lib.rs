//! Character rules engine for an RPG party builder.
//!
//! This crate provides:
//! - Ability scores and their modifiers
//! - Class eligibility from minimum ability scores
//! - A skill-point budget scaled by Intelligence, enforced on every change
//! - An ordered party roster with JSON persistence
//!
//! Characters are immutable values. Every change goes through the
//! [`RulesEngine`] and hands back a new character; the caller (usually a
//! [`Roster`]) replaces its copy.
//!
//! # Quick Start
//!
//! ```
//! use rpg_core::{Ability, Character, Skill};
//!
//! let character = Character::new()
//!     .change_attribute(Ability::Intelligence, 4)
//!     .change_skill(Skill::Arcana, 3);
//!
//! assert_eq!(character.modifier(Ability::Intelligence), 2);
//! assert_eq!(character.points_remaining(), 15);
//! assert_eq!(character.skill_total(Skill::Arcana), 5);
//! ```

pub mod class_data;
pub mod persist;
pub mod roster;
pub mod rules;
pub mod testing;
pub mod world;

// Primary public API
pub use class_data::{eligible_classes, CharacterClass};
pub use persist::{load_roster, save_roster, PersistError, RosterPayload};
pub use roster::{Roster, RosterError};
pub use rules::{
    apply_effects, ChangeRequest, Effect, Intent, RejectionReason, Resolution, RulesConfig,
    RulesEngine, RulesError,
};
pub use testing::TestHarness;
pub use world::{modifier, Ability, AttributeSet, Character, CharacterId, Skill, SkillSet};
