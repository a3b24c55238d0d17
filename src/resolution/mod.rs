//! The resolution pipelines: attack, saving throw, skill check, and damage
//! intake. Each orchestrates the cross-entity channel, a dice roll, and a
//! `RollRecord`, matching the data flow described for an attack: gather
//! source values, snapshot the target's outgoing channel, roll, classify,
//! and (on a hit) roll and apply damage.

use rand::Rng;
use tracing::trace;

use crate::dice::{classify_attack, roll_d20, roll_damage, AttackOutcome, DiceRoll, RollKind, RollRecord};
use crate::enums::{Ability, DamageType, Skill};
use crate::equipment::EquipmentSlot;
use crate::error::{EngineError, EngineResult};
use crate::health::DamageApplication;
use crate::modifier::RollContext;
use crate::entity::Entity;

fn melee_ability_modifier(attacker: &Entity) -> i32 {
    attacker.ability_scores.modifier(Ability::Strength)
}

/// The damage side of an attack: how many dice, of what face, and what
/// type they deal, bundled so `attack` doesn't take three loose scalars.
#[derive(Debug, Clone, Copy)]
pub struct WeaponDamage {
    pub dice_count: u32,
    pub dice_face: u32,
    pub damage_type: DamageType,
}

impl WeaponDamage {
    pub fn new(dice_count: u32, dice_face: u32, damage_type: DamageType) -> Self {
        Self {
            dice_count,
            dice_face,
            damage_type,
        }
    }
}

/// `attack(attacker, defender, slot)`: resolve one weapon attack and, on a
/// hit, roll and apply its damage.
#[derive(Debug)]
pub struct AttackResult {
    pub roll: RollRecord,
    pub damage: Option<DiceRoll>,
    pub damage_application: Option<DamageApplication>,
}

pub fn attack(
    attacker: &mut Entity,
    defender: &mut Entity,
    slot: EquipmentSlot,
    damage: WeaponDamage,
    critical_damage_multiplier: u32,
    rng: &mut impl Rng,
) -> EngineResult<AttackResult> {
    validate_damage_dice(damage.dice_count, damage.dice_face)?;

    let context = RollContext::new();
    attacker.set_target(Some(defender.id()), context.clone());
    attacker
        .attack_roll_modifier
        .set_from_target(defender.equipment.armor_class())?;

    let ability_modifier = melee_ability_modifier(attacker);
    let weapon_attack_bonus = attacker.equipment.attack_bonus(slot).map(|v| v.score()).unwrap_or(0);
    let total_bonus =
        ability_modifier + attacker.proficiency_bonus + weapon_attack_bonus + attacker.attack_roll_modifier.score();

    let advantage = attacker.attack_roll_modifier.advantage();
    let critical = attacker.attack_roll_modifier.critical();
    let auto_hit = attacker.attack_roll_modifier.auto_hit();

    let d20 = roll_d20(advantage, total_bonus, rng);
    let target_ac = defender.equipment.armor_class().score();
    let (outcome, reason) = classify_attack(&d20, target_ac, auto_hit, critical);
    trace!(natural = d20.natural, total = d20.total, ?outcome, ?reason, "attack roll");

    let roll_record = RollRecord::new_d20(RollKind::Attack, &d20, Some(outcome), Some(reason), None);

    if outcome == AttackOutcome::Miss {
        return Ok(AttackResult {
            roll: roll_record,
            damage: None,
            damage_application: None,
        });
    }

    let weapon_damage_bonus = attacker.equipment.damage_bonus(slot).map(|v| v.score()).unwrap_or(0);
    let damage_bonus = ability_modifier + weapon_damage_bonus;
    let damage_roll = roll_damage(
        damage.dice_count,
        damage.dice_face,
        damage_bonus,
        outcome,
        critical_damage_multiplier,
        rng,
    );
    let application = defender.health.apply_damage(damage.damage_type, damage_roll.total.max(0));

    Ok(AttackResult {
        roll: roll_record,
        damage: Some(damage_roll),
        damage_application: Some(application),
    })
}

/// `saving_throw(entity, ability, dc)`.
pub fn saving_throw(entity: &mut Entity, ability: Ability, dc: i32, rng: &mut impl Rng) -> RollRecord {
    let ability_modifier = entity.ability_scores.modifier(ability);
    let total_bonus = entity.saving_throws.total_bonus(ability, ability_modifier, entity.proficiency_bonus);
    let bonus_value = entity.saving_throws.bonus(ability);
    let d20 = roll_d20(bonus_value.advantage(), total_bonus, rng);
    let success = Some(d20.total >= dc);
    RollRecord::new_d20(RollKind::Save, &d20, None, None, success)
}

/// `skill_check(entity, skill, dc)`.
pub fn skill_check(entity: &mut Entity, skill: Skill, dc: i32, rng: &mut impl Rng) -> RollRecord {
    let ability = crate::enums::skill_ability(skill);
    let ability_modifier = entity.ability_scores.modifier(ability);
    let total_bonus = entity.skills.total_bonus(skill, ability_modifier, entity.proficiency_bonus);
    let bonus_value = entity.skills.bonus(skill);
    let d20 = roll_d20(bonus_value.advantage(), total_bonus, rng);
    let success = Some(d20.total >= dc);
    RollRecord::new_d20(RollKind::Check, &d20, None, None, success)
}

/// `take_damage(entity, rolls)`: apply a batch of pre-rolled damage amounts.
pub fn take_damage(entity: &mut Entity, rolls: &[(DamageType, i32)]) -> Vec<DamageApplication> {
    rolls
        .iter()
        .map(|(damage_type, amount)| entity.health.apply_damage(*damage_type, *amount))
        .collect()
}

/// Validates a zero-sided or zero-count damage configuration never reaches
/// the rolling step; callers that hit this have a programmer error, not a
/// recoverable one.
pub fn validate_damage_dice(count: u32, face: u32) -> EngineResult<()> {
    if count == 0 || face == 0 {
        return Err(EngineError::rule_violation("damage roll requires nonzero dice count and face value"));
    }
    Ok(())
}
