//! Class data for eligibility checks.
//!
//! Each class lists minimum ability scores. A character qualifies for a
//! class when every listed minimum is met. This is reference data, not
//! character state.

use crate::rules::RulesError;
use crate::world::{Ability, AttributeSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Barbarian,
    Wizard,
    Bard,
}

/// Class-specific data for eligibility.
pub struct ClassData {
    /// Ability minimums; all must be met.
    pub minimum_scores: &'static [(Ability, i32)],
    /// The ability the class leans on most.
    pub primary_ability: Ability,
    pub description: &'static str,
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Wizard => "Wizard",
            CharacterClass::Bard => "Bard",
        }
    }

    pub fn all() -> [CharacterClass; 3] {
        [
            CharacterClass::Barbarian,
            CharacterClass::Wizard,
            CharacterClass::Bard,
        ]
    }

    /// Get class data for eligibility checks.
    pub fn data(&self) -> ClassData {
        match self {
            CharacterClass::Barbarian => ClassData {
                minimum_scores: &[
                    (Ability::Strength, 14),
                    (Ability::Dexterity, 9),
                    (Ability::Constitution, 9),
                    (Ability::Intelligence, 9),
                    (Ability::Wisdom, 9),
                    (Ability::Charisma, 9),
                ],
                primary_ability: Ability::Strength,
                description: "A fierce warrior who draws on primal fury.",
            },
            CharacterClass::Wizard => ClassData {
                minimum_scores: &[
                    (Ability::Strength, 9),
                    (Ability::Dexterity, 9),
                    (Ability::Constitution, 9),
                    (Ability::Intelligence, 14),
                    (Ability::Wisdom, 9),
                    (Ability::Charisma, 9),
                ],
                primary_ability: Ability::Intelligence,
                description: "A scholarly magic-user who studies arcane formulae.",
            },
            CharacterClass::Bard => ClassData {
                minimum_scores: &[
                    (Ability::Strength, 9),
                    (Ability::Dexterity, 9),
                    (Ability::Constitution, 9),
                    (Ability::Intelligence, 9),
                    (Ability::Wisdom, 9),
                    (Ability::Charisma, 14),
                ],
                primary_ability: Ability::Charisma,
                description: "A performer whose music and words weave magic.",
            },
        }
    }

    /// Minimum scores for this class. Read-only; performs no checks.
    pub fn requirements(&self) -> &'static [(Ability, i32)] {
        self.data().minimum_scores
    }

    pub fn is_eligible(&self, attributes: &AttributeSet) -> bool {
        requirements_met(self.requirements(), attributes)
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterClass::all()
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RulesError::UnknownClass(s.to_string()))
    }
}

/// True when every `(ability, minimum)` pair is met. An empty list is
/// always met.
pub fn requirements_met(requirements: &[(Ability, i32)], attributes: &AttributeSet) -> bool {
    requirements
        .iter()
        .all(|&(ability, minimum)| attributes.get(ability) >= minimum)
}

/// Every class the attributes currently qualify for.
pub fn eligible_classes(attributes: &AttributeSet) -> BTreeSet<CharacterClass> {
    CharacterClass::all()
        .into_iter()
        .filter(|class| class.is_eligible(attributes))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scores_qualify_for_nothing() {
        assert!(eligible_classes(&AttributeSet::default()).is_empty());
    }

    #[test]
    fn test_single_class_unlocked() {
        let attributes = AttributeSet::default().with_delta(Ability::Strength, 4);
        let eligible = eligible_classes(&attributes);
        assert_eq!(eligible.len(), 1);
        assert!(eligible.contains(&CharacterClass::Barbarian));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let attributes = AttributeSet::default().with_delta(Ability::Intelligence, 3);
        assert!(!CharacterClass::Wizard.is_eligible(&attributes));

        let attributes = attributes.with_delta(Ability::Intelligence, 1);
        assert!(CharacterClass::Wizard.is_eligible(&attributes));
    }

    #[test]
    fn test_low_secondary_score_blocks_class() {
        let attributes = AttributeSet::new(14, 8, 10, 10, 10, 10);
        assert!(!CharacterClass::Barbarian.is_eligible(&attributes));
    }

    #[test]
    fn test_multiple_classes() {
        let attributes = AttributeSet::new(14, 10, 10, 14, 10, 14);
        let eligible = eligible_classes(&attributes);
        assert_eq!(
            eligible,
            CharacterClass::all().into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_empty_requirements_always_met() {
        assert!(requirements_met(&[], &AttributeSet::uniform(-50)));
    }

    #[test]
    fn test_eligibility_matches_requirements_exhaustively() {
        for str in [8, 9, 14, 15] {
            for int in [8, 9, 14] {
                for cha in [9, 13, 14] {
                    let attributes = AttributeSet::new(str, 9, 9, int, 9, cha);
                    let eligible = eligible_classes(&attributes);
                    for class in CharacterClass::all() {
                        let expected = class
                            .requirements()
                            .iter()
                            .all(|&(ability, min)| attributes.get(ability) >= min);
                        assert_eq!(eligible.contains(&class), expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_class_from_str() {
        assert_eq!(
            "wizard".parse::<CharacterClass>().unwrap(),
            CharacterClass::Wizard
        );
        assert!(matches!(
            "Paladin".parse::<CharacterClass>(),
            Err(RulesError::UnknownClass(_))
        ));
    }
}
