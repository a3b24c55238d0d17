//! `World`: the top-level orchestrator. Owns the entity registry and the
//! roll history, and exposes the public operations a caller drives a combat
//! through — attack, saving throw, skill check, damage intake, conditions,
//! equipment, movement, and round refresh.

use std::collections::HashMap;

use rand::Rng;
use tracing::info;

use crate::condition::{ApplyOutcome, ConditionInstance};
use crate::config::EngineConfig;
use crate::dice::RollRecord;
use crate::entity::{Entity, GridPosition};
use crate::enums::{Ability, DamageType, Skill};
use crate::equipment::{EquipmentSlot, Item};
use crate::error::{EngineError, EngineResult};
use crate::health::DamageApplication;
use crate::ids::{EntityId, RollId};
use crate::registry::{Handle, Registry};
use crate::resolution;

pub struct World {
    pub config: EngineConfig,
    entities: Registry<EntityId, Entity>,
    rolls: Registry<RollId, RollRecord>,
    rolls_by_entity: HashMap<EntityId, Vec<RollId>>,
}

impl World {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            entities: Registry::new("entity"),
            rolls: Registry::new("roll"),
            rolls_by_entity: HashMap::new(),
        }
    }

    pub fn spawn_entity(&mut self, name: impl Into<String>) -> EntityId {
        let mut entity = Entity::new(name, 10, self.config.base_walking_speed);
        entity
            .ability_scores
            .apply_score_bounds(self.config.default_score_min, self.config.default_score_max);
        let id = entity.id();
        self.entities.register(id, entity);
        id
    }

    pub fn list_entities(&self) -> Vec<EntityId> {
        self.entities.iter().map(|(id, _)| *id).collect()
    }

    pub fn get_entity(&self, id: EntityId) -> EngineResult<Handle<Entity>> {
        self.entities.get(id)
    }

    fn record_roll(&mut self, entity: EntityId, roll: RollRecord) -> RollId {
        let id = roll.id;
        self.rolls.register(id, roll);
        self.rolls_by_entity.entry(entity).or_default().push(id);
        id
    }

    pub fn rolls_for_entity(&self, entity: EntityId) -> Vec<Handle<RollRecord>> {
        self.rolls_by_entity
            .get(&entity)
            .into_iter()
            .flatten()
            .filter_map(|id| self.rolls.try_get(*id))
            .collect()
    }

    /// Resolve one weapon attack from `attacker_id` against `defender_id`.
    pub fn attack(
        &mut self,
        attacker_id: EntityId,
        defender_id: EntityId,
        slot: EquipmentSlot,
        damage: resolution::WeaponDamage,
        rng: &mut impl Rng,
    ) -> EngineResult<resolution::AttackResult> {
        if attacker_id == defender_id {
            return Err(EngineError::validation("an entity cannot attack itself"));
        }
        let attacker_handle = self.entities.get(attacker_id)?;
        let defender_handle = self.entities.get(defender_id)?;
        let mut attacker = attacker_handle.borrow_mut();
        let mut defender = defender_handle.borrow_mut();

        let result = resolution::attack(
            &mut attacker,
            &mut defender,
            slot,
            damage,
            self.config.critical_damage_multiplier,
            rng,
        )?;
        info!(attacker = %attacker_id, defender = %defender_id, outcome = ?result.roll.outcome, "attack resolved");
        drop(attacker);
        drop(defender);
        self.record_roll(attacker_id, result.roll.clone());
        Ok(result)
    }

    pub fn saving_throw(&mut self, entity_id: EntityId, ability: Ability, dc: i32, rng: &mut impl Rng) -> EngineResult<RollRecord> {
        let handle = self.entities.get(entity_id)?;
        let record = resolution::saving_throw(&mut handle.borrow_mut(), ability, dc, rng);
        self.record_roll(entity_id, record.clone());
        Ok(record)
    }

    pub fn skill_check(&mut self, entity_id: EntityId, skill: Skill, dc: i32, rng: &mut impl Rng) -> EngineResult<RollRecord> {
        let handle = self.entities.get(entity_id)?;
        let record = resolution::skill_check(&mut handle.borrow_mut(), skill, dc, rng);
        self.record_roll(entity_id, record.clone());
        Ok(record)
    }

    pub fn take_damage(&mut self, entity_id: EntityId, rolls: &[(DamageType, i32)]) -> EngineResult<Vec<DamageApplication>> {
        let handle = self.entities.get(entity_id)?;
        let mut entity = handle.borrow_mut();
        Ok(resolution::take_damage(&mut entity, rolls))
    }

    /// Apply a condition to `entity_id`. Immunity is checked against the
    /// entity's own `condition_immunities`; `saved` is supplied by the
    /// caller, having already rolled any application saving throw.
    pub fn add_condition(
        &mut self,
        entity_id: EntityId,
        instance: ConditionInstance,
        saved: bool,
    ) -> EngineResult<ApplyOutcome> {
        let handle = self.entities.get(entity_id)?;
        let mut entity = handle.borrow_mut();
        Ok(entity.apply_condition(instance, saved))
    }

    pub fn remove_condition(&mut self, entity_id: EntityId, name: &str) -> EngineResult<()> {
        let handle = self.entities.get(entity_id)?;
        let mut entity = handle.borrow_mut();
        entity.remove_condition(name)
    }

    pub fn equip(&mut self, entity_id: EntityId, slot: EquipmentSlot, item: Item, force: bool) -> EngineResult<()> {
        let handle = self.entities.get(entity_id)?;
        let mut entity = handle.borrow_mut();
        entity.equipment.equip(slot, item, force)
    }

    pub fn unequip(&mut self, entity_id: EntityId, slot: EquipmentSlot) -> EngineResult<Item> {
        let handle = self.entities.get(entity_id)?;
        let mut entity = handle.borrow_mut();
        entity.equipment.unequip(slot)
    }

    pub fn move_entity(&mut self, entity_id: EntityId, to: GridPosition) -> EngineResult<()> {
        let handle = self.entities.get(entity_id)?;
        let mut entity = handle.borrow_mut();
        let distance = (to.x - entity.position.x).abs() + (to.y - entity.position.y).abs();
        entity.action_economy.movement.spend(distance, "move")?;
        entity.position = to;
        Ok(())
    }

    pub fn refresh_action_economy(&mut self, entity_id: EntityId) -> EngineResult<()> {
        let handle = self.entities.get(entity_id)?;
        handle.borrow_mut().action_economy.refresh();
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
