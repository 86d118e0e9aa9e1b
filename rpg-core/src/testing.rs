//! Testing utilities for character scenarios.
//!
//! `TestHarness` drives one character through the rules engine so
//! scenario tests read as a script of edits followed by assertions.

use crate::class_data::CharacterClass;
use crate::rules::{Intent, Resolution, RulesEngine};
use crate::world::{Ability, Character, Skill};

/// Scripted scenario runner for a single character.
pub struct TestHarness {
    engine: RulesEngine,
    character: Character,
    /// Every resolution produced so far, in order.
    pub history: Vec<Resolution>,
}

impl TestHarness {
    /// A harness holding one fresh character under the default rules.
    pub fn new() -> Self {
        Self::with_engine(RulesEngine::default())
    }

    pub fn with_engine(engine: RulesEngine) -> Self {
        let character = engine.create_character();
        Self {
            engine,
            character,
            history: Vec::new(),
        }
    }

    /// Current state of the character.
    pub fn character(&self) -> &Character {
        &self.character
    }

    fn run(&mut self, intent: Intent) -> &Resolution {
        let (next, resolution) = self.engine.apply(&self.character, intent);
        self.character = next;
        self.history.push(resolution);
        &self.history[self.history.len() - 1]
    }

    /// Step an ability up (or down) one point at a time.
    pub fn bump(&mut self, ability: Ability, steps: i32) -> &mut Self {
        let delta = steps.signum();
        for _ in 0..steps.unsigned_abs() {
            self.run(Intent::ChangeAttribute { ability, delta });
        }
        self
    }

    /// Request a skill change; returns whether it was accepted.
    pub fn spend(&mut self, skill: Skill, delta: i32) -> bool {
        !self.run(Intent::ChangeSkill { skill, delta }).was_rejected()
    }

    /// Pool size under the harness's engine.
    pub fn total_points_available(&self) -> i64 {
        self.engine.total_points_available(self.character.attributes())
    }

    pub fn points_remaining(&self) -> i64 {
        self.engine.points_remaining(&self.character)
    }

    pub fn rejections(&self) -> usize {
        self.history.iter().filter(|r| r.was_rejected()).count()
    }

    #[track_caller]
    pub fn assert_score(&self, ability: Ability, expected: i32) {
        let actual = self.character().attributes().get(ability);
        assert_eq!(
            actual, expected,
            "expected {} to be {expected}, was {actual}",
            ability.name()
        );
    }

    #[track_caller]
    pub fn assert_remaining(&self, expected: i64) {
        let actual = self.points_remaining();
        assert_eq!(
            actual, expected,
            "expected {expected} points remaining, had {actual}"
        );
    }

    #[track_caller]
    pub fn assert_eligible(&self, class: CharacterClass) {
        assert!(
            self.character().eligible_classes().contains(&class),
            "expected character to qualify for {class}"
        );
    }

    #[track_caller]
    pub fn assert_not_eligible(&self, class: CharacterClass) {
        assert!(
            !self.character().eligible_classes().contains(&class),
            "expected character not to qualify for {class}"
        );
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RulesConfig;

    #[test]
    fn test_harness_bump_and_spend() {
        let mut harness = TestHarness::new();
        harness.bump(Ability::Intelligence, 2).bump(Ability::Charisma, -1);
        harness.assert_score(Ability::Intelligence, 12);
        harness.assert_score(Ability::Charisma, 9);

        assert!(harness.spend(Skill::Arcana, 3));
        assert!(!harness.spend(Skill::Arcana, -4));
        assert_eq!(harness.rejections(), 1);
        harness.assert_remaining(11);
    }

    #[test]
    fn test_harness_follows_its_engine() {
        let engine = RulesEngine::with_config(RulesConfig::new().with_base_skill_points(3));
        let mut harness = TestHarness::with_engine(engine);
        assert_eq!(harness.total_points_available(), 3);

        assert!(harness.spend(Skill::Stealth, 3));
        assert!(!harness.spend(Skill::Stealth, 1));
        harness.assert_remaining(0);
    }

    #[test]
    #[should_panic(expected = "expected 5 points remaining, had 10")]
    fn test_assert_remaining_reports_mismatch() {
        TestHarness::new().assert_remaining(5);
    }
}
