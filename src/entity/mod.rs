//! `Entity`: the aggregate root for one creature — every block it owns,
//! its condition manager, and the bookkeeping the cross-entity channel and
//! resolution engine need (target, position, proficiency bonus).

use std::collections::HashSet;

use crate::block::{AbilityBlock, ActionEconomyBlock, SavingThrowBlock, SkillBlock};
use crate::condition::{ApplyOutcome, ConditionInstance, ConditionManager, ConditionTarget};
use crate::error::EngineResult;
use crate::enums::Ability;
use crate::equipment::EquipmentBlock;
use crate::health::Health;
use crate::ids::EntityId;
use crate::modifier::RollContext;
use crate::value::{ModifiableValue, StaticValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

pub struct Entity {
    id: EntityId,
    pub name: String,
    pub ability_scores: AbilityBlock,
    pub skills: SkillBlock,
    pub saving_throws: SavingThrowBlock,
    pub equipment: EquipmentBlock,
    pub health: Health,
    pub action_economy: ActionEconomyBlock,
    pub proficiency_bonus: i32,
    /// Advantage/disadvantage/critical/auto-hit bucket shared by every
    /// attack this entity makes, independent of which weapon slot is used.
    pub attack_roll_modifier: ModifiableValue,
    pub position: GridPosition,
    pub target_entity_id: Option<EntityId>,
    pub condition_immunities: HashSet<String>,
    conditions: ConditionManager,
}

impl Entity {
    pub fn new(name: impl Into<String>, base_ability_score: i32, base_walking_speed: i32) -> Self {
        let id = EntityId::new();
        Self {
            id,
            name: name.into(),
            ability_scores: AbilityBlock::new(id, base_ability_score),
            skills: SkillBlock::new(id),
            saving_throws: SavingThrowBlock::new(id),
            equipment: EquipmentBlock::new(id),
            health: Health::new(id, Vec::new()),
            action_economy: ActionEconomyBlock::new(id, base_walking_speed),
            proficiency_bonus: 2,
            attack_roll_modifier: ModifiableValue::new(id, "Attack Roll"),
            position: GridPosition::default(),
            target_entity_id: None,
            condition_immunities: HashSet::new(),
            conditions: ConditionManager::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn conditions(&self) -> &ConditionManager {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut ConditionManager {
        &mut self.conditions
    }

    pub fn constitution_modifier(&self) -> i32 {
        self.ability_scores.modifier(Ability::Constitution)
    }

    /// Point the attack-roll bucket's current target/context at `target`,
    /// the step a resolver takes before it asks that bucket to snapshot the
    /// target's outgoing channel.
    pub fn set_target(&mut self, target: Option<EntityId>, context: RollContext) {
        self.target_entity_id = target;
        self.attack_roll_modifier.set_target(target, context.clone());
    }

    /// Apply a condition to this entity. Immunity is decided from this
    /// entity's own `condition_immunities` rather than taken on faith from
    /// the caller; `saved` still comes from the caller, since rolling the
    /// application saving throw (if any) needs dice this module doesn't have.
    /// Temporarily takes ownership of the condition manager so it can be
    /// driven against `self` as the install target without two simultaneous
    /// mutable borrows of `self`.
    pub fn apply_condition(&mut self, instance: ConditionInstance, saved: bool) -> ApplyOutcome {
        let immune = self.condition_immunities.contains(&instance.name);
        let mut conditions = std::mem::take(&mut self.conditions);
        let outcome = conditions.apply(instance, self, immune, saved);
        self.conditions = conditions;
        outcome
    }

    pub fn remove_condition(&mut self, name: &str) -> EngineResult<()> {
        let mut conditions = std::mem::take(&mut self.conditions);
        let result = conditions.remove(name, self);
        self.conditions = conditions;
        result
    }

    pub fn progress_conditions(&mut self, removal_saved: impl Fn(&str) -> bool) {
        let mut conditions = std::mem::take(&mut self.conditions);
        conditions.progress(self, removal_saved);
        self.conditions = conditions;
    }
}

impl ConditionTarget for Entity {
    fn attack_roll_value_mut(&mut self) -> &mut ModifiableValue {
        &mut self.attack_roll_modifier
    }

    fn armor_class_to_target_mut(&mut self) -> &mut StaticValue {
        self.equipment.armor_class_mut().to_target_static_mut()
    }

    fn saving_throw_value_mut(&mut self, ability: Ability) -> &mut ModifiableValue {
        self.saving_throws.bonus_mut(ability)
    }

    fn actions_value_mut(&mut self) -> &mut ModifiableValue {
        self.action_economy.actions.value_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entity_has_baseline_action_economy() {
        let entity = Entity::new("Test Dummy", 10, 30);
        assert_eq!(entity.action_economy.actions.remaining(), 1);
        assert_eq!(entity.action_economy.movement.remaining(), 30);
    }
}
