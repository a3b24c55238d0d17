//! Dice rolling primitives: advantage-aware d20 rolls, damage-die rolls,
//! and the attack-outcome classification rules that turn a raw roll into a
//! hit/miss/crit verdict with a recorded reason.

use rand::Rng;

use crate::ids::RollId;
use crate::modifier::{AdvantageState, AutoHitState, CriticalState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollKind {
    Attack,
    Save,
    Check,
    Damage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Miss,
    Hit,
    Crit,
}

/// Why an attack resolved the way it did, in priority order from the top
/// of the match down: AutoMiss beats everything, then AutoHit, then a
/// natural 1, then a natural 20, then a plain comparison against AC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitReason {
    AutoMiss,
    AutoHit,
    NaturalOne,
    NaturalTwenty,
    Normal,
}

/// A single die roll's individual faces and their sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    pub results: Vec<i32>,
    pub total: i32,
}

impl DiceRoll {
    pub fn single(face: i32) -> Self {
        Self {
            results: vec![face],
            total: face,
        }
    }
}

/// The outcome of rolling one d20 with an advantage-aware bonus applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct D20Roll {
    pub dice: DiceRoll,
    /// The face actually used after advantage/disadvantage selection.
    pub natural: i32,
    pub bonus: i32,
    pub total: i32,
}

/// Roll one d20, applying keep-highest/keep-lowest selection for advantage
/// or disadvantage.
pub fn roll_d20(advantage: AdvantageState, bonus: i32, rng: &mut impl Rng) -> D20Roll {
    let natural = match advantage {
        AdvantageState::None => rng.random_range(1..=20),
        AdvantageState::Advantage => {
            let a = rng.random_range(1..=20);
            let b = rng.random_range(1..=20);
            a.max(b)
        }
        AdvantageState::Disadvantage => {
            let a = rng.random_range(1..=20);
            let b = rng.random_range(1..=20);
            a.min(b)
        }
    };
    D20Roll {
        dice: DiceRoll::single(natural),
        natural,
        bonus,
        total: natural + bonus,
    }
}

/// Classify an attack roll against a target AC, applying the auto-hit,
/// natural-20 and natural-1 precedence rules.
pub fn classify_attack(roll: &D20Roll, target_ac: i32, auto_hit: AutoHitState, critical: CriticalState) -> (AttackOutcome, HitReason) {
    if auto_hit == AutoHitState::AutoMiss {
        return (AttackOutcome::Miss, HitReason::AutoMiss);
    }
    if auto_hit == AutoHitState::AutoHit {
        let crit = roll.natural == 20 || critical == CriticalState::AutoCrit;
        let outcome = if crit && critical != CriticalState::NoCrit {
            AttackOutcome::Crit
        } else {
            AttackOutcome::Hit
        };
        return (outcome, HitReason::AutoHit);
    }
    if roll.natural == 1 {
        return (AttackOutcome::Miss, HitReason::NaturalOne);
    }
    if roll.natural == 20 {
        let outcome = if critical == CriticalState::NoCrit {
            AttackOutcome::Hit
        } else {
            AttackOutcome::Crit
        };
        return (outcome, HitReason::NaturalTwenty);
    }
    if roll.total >= target_ac {
        (AttackOutcome::Hit, HitReason::Normal)
    } else {
        (AttackOutcome::Miss, HitReason::Normal)
    }
}

/// Roll a damage pool: `count` dice of `face_value`, multiplied by
/// `critical_damage_multiplier` on a crit, each sampled uniformly in
/// `[1, face_value]`, plus a flat bonus.
pub fn roll_damage(
    count: u32,
    face_value: u32,
    bonus: i32,
    outcome: AttackOutcome,
    critical_damage_multiplier: u32,
    rng: &mut impl Rng,
) -> DiceRoll {
    let effective_count = if outcome == AttackOutcome::Crit {
        count * critical_damage_multiplier
    } else {
        count
    };
    let results: Vec<i32> = (0..effective_count)
        .map(|_| rng.random_range(1..=face_value as i32))
        .collect();
    let total = results.iter().sum::<i32>() + bonus;
    DiceRoll { results, total }
}

/// An immutable record of a completed roll, retrievable by id.
#[derive(Debug, Clone)]
pub struct RollRecord {
    pub id: RollId,
    pub kind: RollKind,
    pub natural: i32,
    pub total: i32,
    pub outcome: Option<AttackOutcome>,
    pub reason: Option<HitReason>,
    pub success: Option<bool>,
    pub damage: Option<i32>,
}

impl RollRecord {
    pub fn new_d20(kind: RollKind, roll: &D20Roll, outcome: Option<AttackOutcome>, reason: Option<HitReason>, success: Option<bool>) -> Self {
        Self {
            id: RollId::new(),
            kind,
            natural: roll.natural,
            total: roll.total,
            outcome,
            reason,
            success,
            damage: None,
        }
    }

    pub fn new_damage(total: i32) -> Self {
        Self {
            id: RollId::new(),
            kind: RollKind::Damage,
            natural: 0,
            total,
            outcome: None,
            reason: None,
            success: None,
            damage: Some(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn natural_twenty_always_crits_without_nocrit() {
        let roll = D20Roll {
            dice: DiceRoll::single(20),
            natural: 20,
            bonus: 0,
            total: 20,
        };
        let (outcome, reason) = classify_attack(&roll, 30, AutoHitState::None, CriticalState::None);
        assert_eq!(outcome, AttackOutcome::Crit);
        assert_eq!(reason, HitReason::NaturalTwenty);
    }

    #[test]
    fn natural_one_never_hits_without_autohit() {
        let roll = D20Roll {
            dice: DiceRoll::single(1),
            natural: 1,
            bonus: 50,
            total: 51,
        };
        let (outcome, reason) = classify_attack(&roll, 5, AutoHitState::None, CriticalState::None);
        assert_eq!(outcome, AttackOutcome::Miss);
        assert_eq!(reason, HitReason::NaturalOne);
    }

    #[test]
    fn automiss_dominates_autohit() {
        let roll = D20Roll {
            dice: DiceRoll::single(15),
            natural: 15,
            bonus: 0,
            total: 15,
        };
        let (outcome, _) = classify_attack(&roll, 5, AutoHitState::AutoMiss, CriticalState::None);
        assert_eq!(outcome, AttackOutcome::Miss);
    }

    #[test]
    fn nocrit_suppresses_natural_twenty_crit() {
        let roll = D20Roll {
            dice: DiceRoll::single(20),
            natural: 20,
            bonus: 0,
            total: 20,
        };
        let (outcome, _) = classify_attack(&roll, 10, AutoHitState::None, CriticalState::NoCrit);
        assert_eq!(outcome, AttackOutcome::Hit);
    }

    #[test]
    fn damage_count_doubles_on_crit() {
        let mut rng = StdRng::seed_from_u64(7);
        let roll = roll_damage(2, 6, 3, AttackOutcome::Crit, 2, &mut rng);
        assert_eq!(roll.results.len(), 4);
        for face in &roll.results {
            assert!((1..=6).contains(face));
        }
    }

    #[test]
    fn crit_multiplier_is_not_hardcoded_to_two() {
        let mut rng = StdRng::seed_from_u64(7);
        let roll = roll_damage(2, 6, 0, AttackOutcome::Crit, 3, &mut rng);
        assert_eq!(roll.results.len(), 6);

        let mut rng = StdRng::seed_from_u64(7);
        let normal_hit = roll_damage(2, 6, 0, AttackOutcome::Hit, 3, &mut rng);
        assert_eq!(normal_hit.results.len(), 2);
    }

    #[rstest::fixture]
    fn ordinary_roll() -> D20Roll {
        D20Roll {
            dice: DiceRoll::single(12),
            natural: 12,
            bonus: 3,
            total: 15,
        }
    }

    #[rstest::rstest]
    fn ordinary_roll_hits_at_or_below_its_total(ordinary_roll: D20Roll) {
        let (outcome, reason) = classify_attack(&ordinary_roll, 15, AutoHitState::None, CriticalState::None);
        assert_eq!(outcome, AttackOutcome::Hit);
        assert_eq!(reason, HitReason::Normal);
    }

    #[rstest::rstest]
    fn ordinary_roll_misses_above_its_total(ordinary_roll: D20Roll) {
        let (outcome, reason) = classify_attack(&ordinary_roll, 16, AutoHitState::None, CriticalState::None);
        assert_eq!(outcome, AttackOutcome::Miss);
        assert_eq!(reason, HitReason::Normal);
    }
}
