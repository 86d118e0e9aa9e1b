//! Character state types.
//!
//! Contains the closed sets of abilities and skills, the per-character
//! attribute and skill stores, and the `Character` aggregate that the
//! surrounding application passes into and out of the rules engine.

use crate::class_data::{self, CharacterClass};
use crate::rules::{RulesEngine, RulesError};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Score every ability starts at.
pub const DEFAULT_SCORE: i32 = 10;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
///
/// Serialized as a bare number so the record matches what the roster
/// endpoint stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u64);

impl CharacterId {
    /// Allocate an id from the wall clock, in milliseconds since the epoch.
    pub fn new() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self(millis)
    }

    /// The id immediately after this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

/// Compute the modifier for an ability score.
///
/// Uses floor division, so 9 and 8 both give -1 and 7 gives -2. Defined for
/// every `i32`, including negative scores.
pub fn modifier(score: i32) -> i32 {
    let floored = (i64::from(score) - 10).div_euclid(2);
    // (i32::MIN - 10) / 2 still fits
    floored as i32
}

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for Ability {
    type Err = RulesError;

    /// Accepts the full name or the three-letter abbreviation, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Ability::all()
            .into_iter()
            .find(|ability| {
                ability.name().eq_ignore_ascii_case(wanted)
                    || ability.abbreviation().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| RulesError::UnknownAbility(s.to_string()))
    }
}

/// Per-character ability scores.
///
/// Always holds exactly one score per [`Ability`]. Serialized as a map from
/// ability name to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "BTreeMap<String, i32>")]
pub struct AttributeSet {
    scores: [i32; 6],
}

impl AttributeSet {
    /// Every ability at the same score.
    pub fn uniform(score: i32) -> Self {
        Self { scores: [score; 6] }
    }

    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            scores: [str, dex, con, int, wis, cha],
        }
    }

    pub fn get(&self, ability: Ability) -> i32 {
        self.scores[ability.index()]
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        modifier(self.get(ability))
    }

    /// A copy with one ability moved by `delta`.
    ///
    /// No floor or ceiling is applied; only the `i32` range saturates.
    pub fn with_delta(&self, ability: Ability, delta: i32) -> Self {
        let mut next = *self;
        next.scores[ability.index()] = self.get(ability).saturating_add(delta);
        next
    }

    pub(crate) fn with_score(&self, ability: Ability, score: i32) -> Self {
        let mut next = *self;
        next.scores[ability.index()] = score;
        next
    }

    /// Scores in canonical ability order.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::all().into_iter().map(|ability| (ability, self.get(ability)))
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::uniform(DEFAULT_SCORE)
    }
}

impl Serialize for AttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        for (ability, score) in self.iter() {
            map.serialize_entry(ability.name(), &score)?;
        }
        map.end()
    }
}

impl TryFrom<BTreeMap<String, i32>> for AttributeSet {
    type Error = RulesError;

    fn try_from(raw: BTreeMap<String, i32>) -> Result<Self, Self::Error> {
        let mut scores = [None; 6];
        for (name, score) in raw {
            let ability: Ability = name.parse()?;
            if scores[ability.index()].replace(score).is_some() {
                return Err(RulesError::DuplicateKey(name));
            }
        }
        let mut set = AttributeSet::default();
        for ability in Ability::all() {
            let score = scores[ability.index()]
                .ok_or_else(|| RulesError::MissingKey(ability.name().to_string()))?;
            set = set.with_score(ability, score);
        }
        Ok(set)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// The skills a character can spend points on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    /// The ability whose modifier augments this skill.
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Acrobatics => "Acrobatics",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Arcana => "Arcana",
            Skill::Athletics => "Athletics",
            Skill::Deception => "Deception",
            Skill::History => "History",
            Skill::Insight => "Insight",
            Skill::Intimidation => "Intimidation",
            Skill::Investigation => "Investigation",
            Skill::Medicine => "Medicine",
            Skill::Nature => "Nature",
            Skill::Perception => "Perception",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
            Skill::Religion => "Religion",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Survival => "Survival",
        }
    }

    pub fn all() -> [Skill; 18] {
        [
            Skill::Acrobatics,
            Skill::AnimalHandling,
            Skill::Arcana,
            Skill::Athletics,
            Skill::Deception,
            Skill::History,
            Skill::Insight,
            Skill::Intimidation,
            Skill::Investigation,
            Skill::Medicine,
            Skill::Nature,
            Skill::Perception,
            Skill::Performance,
            Skill::Persuasion,
            Skill::Religion,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Survival,
        ]
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Skill {
    type Err = RulesError;

    /// Accepts "Sleight of Hand", "SleightOfHand" or "sleight_of_hand".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squash = |text: &str| -> String {
            text.chars()
                .filter(|c| !matches!(c, ' ' | '_' | '-'))
                .map(|c| c.to_ascii_lowercase())
                .collect()
        };
        let wanted = squash(s);
        Skill::all()
            .into_iter()
            .find(|skill| squash(skill.name()) == wanted)
            .ok_or_else(|| RulesError::UnknownSkill(s.to_string()))
    }
}

/// Points a character has put into each skill.
///
/// Always holds one non-negative allocation per [`Skill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>")]
pub struct SkillSet {
    points: [u32; 18],
}

impl SkillSet {
    pub fn get(&self, skill: Skill) -> u32 {
        self.points[skill.index()]
    }

    /// Sum of points across every skill.
    pub fn total_spent(&self) -> i64 {
        self.points.iter().map(|&p| i64::from(p)).sum()
    }

    pub(crate) fn with_points(&self, skill: Skill, points: u32) -> Self {
        let mut next = *self;
        next.points[skill.index()] = points;
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (Skill, u32)> + '_ {
        Skill::all().into_iter().map(|skill| (skill, self.get(skill)))
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.points.len()))?;
        for (skill, points) in self.iter() {
            map.serialize_entry(skill.name(), &points)?;
        }
        map.end()
    }
}

impl TryFrom<BTreeMap<String, i64>> for SkillSet {
    type Error = RulesError;

    fn try_from(raw: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        let mut points = [None; 18];
        for (name, value) in raw {
            let skill: Skill = name.parse()?;
            let value = u32::try_from(value).map_err(|_| RulesError::InvalidPoints {
                skill: skill.name().to_string(),
                points: value,
            })?;
            if points[skill.index()].replace(value).is_some() {
                return Err(RulesError::DuplicateKey(name));
            }
        }
        let mut set = SkillSet::default();
        for skill in Skill::all() {
            let value = points[skill.index()]
                .ok_or_else(|| RulesError::MissingKey(skill.name().to_string()))?;
            set = set.with_points(skill, value);
        }
        Ok(set)
    }
}

// ============================================================================
// Character
// ============================================================================

/// A player character: identity plus the attributes and skills it owns.
///
/// Values are immutable from the outside. Every change goes through the
/// rules engine and hands back a new `Character`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    id: CharacterId,
    attributes: AttributeSet,
    skills: SkillSet,
}

impl Character {
    /// A fresh character: every score 10, no skill points spent.
    pub fn new() -> Self {
        Self::with_id(CharacterId::new())
    }

    pub fn with_id(id: CharacterId) -> Self {
        Self {
            id,
            attributes: AttributeSet::default(),
            skills: SkillSet::default(),
        }
    }

    /// Rebuild a character from stored parts.
    pub fn from_parts(id: CharacterId, attributes: AttributeSet, skills: SkillSet) -> Self {
        Self {
            id,
            attributes,
            skills,
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.attributes.modifier(ability)
    }

    /// Spent points plus the governing ability's modifier.
    ///
    /// Informational only; never consulted by the budget check.
    pub fn skill_total(&self, skill: Skill) -> i64 {
        i64::from(self.skills.get(skill)) + i64::from(self.modifier(skill.ability()))
    }

    pub fn eligible_classes(&self) -> BTreeSet<CharacterClass> {
        class_data::eligible_classes(&self.attributes)
    }

    /// Pool size under the default [`RulesConfig`](crate::rules::RulesConfig).
    ///
    /// A roster or engine built with another config must be asked directly,
    /// e.g. [`Roster::total_points_available`](crate::roster::Roster::total_points_available).
    pub fn total_points_available(&self) -> i64 {
        RulesEngine::default().total_points_available(&self.attributes)
    }

    pub fn total_points_spent(&self) -> i64 {
        self.skills.total_spent()
    }

    /// May be negative when the budget ability dropped after spending.
    /// Uses the default rules; see [`Character::total_points_available`].
    pub fn points_remaining(&self) -> i64 {
        RulesEngine::default().points_remaining(self)
    }

    pub fn change_attribute(&self, ability: Ability, delta: i32) -> Character {
        RulesEngine::default().change_attribute(self, ability, delta)
    }

    /// Returns `self` unchanged when the allocation is invalid under the
    /// default rules.
    pub fn change_skill(&self, skill: Skill, delta: i32) -> Character {
        RulesEngine::default().change_skill(self, skill, delta)
    }

    pub(crate) fn replace_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    pub(crate) fn replace_skills(mut self, skills: SkillSet) -> Self {
        self.skills = skills;
        self
    }
}

impl Default for Character {
    fn default() -> Self {
        Self::new()
    }
}
