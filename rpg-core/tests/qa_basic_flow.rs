//! QA tests for the character-building flow.
//!
//! These tests walk characters through the same steps a player takes:
//! - Creating characters in a roster
//! - Raising and lowering ability scores
//! - Spending the skill-point pool until it runs out
//! - Checking class eligibility along the way
//!
//! Run with: `cargo test -p rpg-core --test qa_basic_flow`

use rpg_core::testing::TestHarness;
use rpg_core::{
    Ability, ChangeRequest, Character, CharacterClass, Effect, Intent, RejectionReason, Roster,
    RosterError, RulesError, Skill,
};

// =============================================================================
// END-TO-END SCENARIO
// =============================================================================

#[test]
fn test_spend_entire_pool_then_reject() {
    let mut harness = TestHarness::new();

    // Fresh character: all 10s, nothing spent
    for (_, score) in harness.character().attributes().iter() {
        assert_eq!(score, 10);
    }
    harness.assert_remaining(10);

    // Intelligence 13 -> modifier +1 -> 14 points
    harness.bump(Ability::Intelligence, 3);
    harness.assert_score(Ability::Intelligence, 13);
    assert_eq!(harness.character().modifier(Ability::Intelligence), 1);
    assert_eq!(harness.total_points_available(), 14);

    // Spend 14 points across several skills, none rejected
    let plan = [
        (Skill::Arcana, 4),
        (Skill::Stealth, 3),
        (Skill::Perception, 2),
        (Skill::Persuasion, 1),
        (Skill::Athletics, 4),
    ];
    for (skill, points) in plan {
        for _ in 0..points {
            assert!(harness.spend(skill, 1), "spend on {skill} was rejected");
        }
    }
    harness.assert_remaining(0);
    assert_eq!(harness.rejections(), 0);

    // One more point is refused and nothing changes
    let before = harness.character().clone();
    assert!(!harness.spend(Skill::History, 1));
    assert_eq!(harness.character(), &before);
    harness.assert_remaining(0);
}

#[test]
fn test_over_budget_rejection_repeats_identically() {
    let mut harness = TestHarness::new();
    assert!(harness.spend(Skill::Investigation, 10));
    let full = harness.character().clone();

    assert!(!harness.spend(Skill::Investigation, 1));
    let first = harness.character().clone();
    assert!(!harness.spend(Skill::Investigation, 1));
    let second = harness.character().clone();

    assert_eq!(first, full);
    assert_eq!(second, full);
    assert_eq!(harness.history[1].effects, harness.history[2].effects);
}

#[test]
fn test_negative_skill_rejected_from_zero() {
    let mut harness = TestHarness::new();
    assert!(!harness.spend(Skill::Medicine, -1));
    assert_eq!(harness.character().skills().get(Skill::Medicine), 0);

    match harness.history[0].effects[0] {
        Effect::SkillChangeRejected { reason, .. } => {
            assert_eq!(reason, RejectionReason::WouldGoNegative { current: 0 });
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

// =============================================================================
// CLASS ELIGIBILITY
// =============================================================================

#[test]
fn test_classes_unlock_and_relock() {
    let mut harness = TestHarness::new();
    harness.assert_not_eligible(CharacterClass::Bard);

    harness.bump(Ability::Charisma, 4);
    harness.assert_eligible(CharacterClass::Bard);
    harness.assert_not_eligible(CharacterClass::Wizard);

    harness.bump(Ability::Dexterity, -2);
    harness.assert_not_eligible(CharacterClass::Bard);
}

#[test]
fn test_class_requirements_are_readable() {
    let requirements = CharacterClass::Wizard.requirements();
    assert!(requirements.contains(&(Ability::Intelligence, 14)));
    assert_eq!(requirements.len(), 6);
}

// =============================================================================
// RETROACTIVE BUDGET
// =============================================================================

#[test]
fn test_lowering_intelligence_leaves_negative_remaining() {
    let mut harness = TestHarness::new();
    harness.bump(Ability::Intelligence, 4);
    assert!(harness.spend(Skill::Arcana, 18));
    harness.assert_remaining(0);

    harness.bump(Ability::Intelligence, -4);
    harness.assert_remaining(-8);
    assert_eq!(harness.character().skills().get(Skill::Arcana), 18);
    assert!(!harness.spend(Skill::Nature, 1));

    // Refunds still short of the pool are refused; one that reaches it is not
    assert!(!harness.spend(Skill::Arcana, -1));
    assert!(harness.spend(Skill::Arcana, -8));
    harness.assert_remaining(0);
}

#[test]
fn test_scores_are_not_clamped() {
    let mut harness = TestHarness::new();
    harness.bump(Ability::Strength, -12);
    harness.assert_score(Ability::Strength, -2);
    assert_eq!(harness.character().modifier(Ability::Strength), -6);
}

// =============================================================================
// ROSTER
// =============================================================================

#[test]
fn test_roster_add_edit_remove() {
    let mut roster = Roster::new();
    let first = roster.create_character();
    let second = roster.create_character();

    roster
        .apply(first, Intent::ChangeAttribute { ability: Ability::Wisdom, delta: 1 })
        .expect("first exists");
    roster
        .apply_named(second, &ChangeRequest::skill("Animal Handling", 2))
        .expect("second exists");

    assert_eq!(roster.get(first).unwrap().attributes().get(Ability::Wisdom), 11);
    assert_eq!(roster.get(second).unwrap().skills().get(Skill::AnimalHandling), 2);

    let removed = roster.remove(first).expect("first exists");
    assert_eq!(removed.id(), first);
    assert_eq!(roster.len(), 1);
    assert_eq!(roster.position_label(second).as_deref(), Some("Character 1"));
    assert!(matches!(
        roster.apply(first, Intent::ChangeSkill { skill: Skill::Arcana, delta: 1 }),
        Err(RosterError::NotFound(id)) if id == first
    ));
}

#[test]
fn test_unknown_skill_name_is_surfaced() {
    let mut roster = Roster::new();
    let id = roster.create_character();

    let result = roster.apply_named(id, &ChangeRequest::skill("Juggling", 1));
    assert_eq!(
        result.unwrap_err(),
        RosterError::UnknownKey(RulesError::UnknownSkill("Juggling".to_string()))
    );
    assert_eq!(roster.get(id).unwrap(), &Character::with_id(id));
}
