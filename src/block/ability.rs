//! `AbilityBlock`: the six ability scores. Each ability pairs a raw `score`
//! value (normalized to the ability modifier via floor division) with a
//! `modifier_bonus` value added after normalization, so a feat or item that
//! bumps "your Strength modifier" directly doesn't have to fake a score
//! bump to do it.

use std::collections::HashMap;

use crate::enums::Ability;
use crate::ids::EntityId;
use crate::modifier::{Modifier, RollContext};
use crate::value::ModifiableValue;

fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

#[derive(Debug, Clone)]
pub struct AbilityScore {
    pub score: ModifiableValue,
    pub modifier_bonus: ModifiableValue,
}

impl AbilityScore {
    fn new(entity_id: EntityId, ability: Ability, base_score: i32) -> Self {
        let mut score = ModifiableValue::new(entity_id, format!("{ability} Score"))
            .with_normalizer(ability_modifier);
        score
            .add_self_modifier(Modifier::numerical(entity_id, entity_id, "base", base_score))
            .expect("self modifier targeting the owning entity always validates");
        let modifier_bonus = ModifiableValue::new(entity_id, format!("{ability} Modifier Bonus"));
        Self { score, modifier_bonus }
    }

    /// The full modifier: the normalized score plus any flat modifier bonus.
    pub fn modifier(&self) -> i32 {
        self.score.score() + self.modifier_bonus.score()
    }

    /// Install a floor/ceiling on the raw (pre-normalization) score, e.g.
    /// the 1-30 range ability scores are bound to.
    fn set_bounds(&mut self, entity_id: EntityId, min: i32, max: i32) {
        let static_value = self.score.self_static_mut();
        static_value
            .insert_min_constraint(Modifier::numerical(entity_id, entity_id, "score floor", min))
            .expect("self modifier targeting the owning entity always validates");
        static_value
            .insert_max_constraint(Modifier::numerical(entity_id, entity_id, "score ceiling", max))
            .expect("self modifier targeting the owning entity always validates");
    }
}

#[derive(Debug, Clone)]
pub struct AbilityBlock {
    entity_id: EntityId,
    abilities: HashMap<Ability, AbilityScore>,
}

impl AbilityBlock {
    /// Build a block with every ability seeded at `base_score` (typically 10).
    pub fn new(entity_id: EntityId, base_score: i32) -> Self {
        let mut abilities = HashMap::new();
        for ability in [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ] {
            abilities.insert(ability, AbilityScore::new(entity_id, ability, base_score));
        }
        Self { entity_id, abilities }
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn get(&self, ability: Ability) -> &AbilityScore {
        self.abilities
            .get(&ability)
            .expect("every ability is seeded at construction")
    }

    pub fn get_mut(&mut self, ability: Ability) -> &mut AbilityScore {
        self.abilities
            .get_mut(&ability)
            .expect("every ability is seeded at construction")
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.get(ability).modifier()
    }

    pub fn set_target_all(&mut self, target: Option<EntityId>, context: RollContext) {
        let values = self
            .abilities
            .values_mut()
            .flat_map(|a| [&mut a.score, &mut a.modifier_bonus]);
        super::propagate_target(values, target, &context);
    }

    /// Clamp every ability's raw score into `[min, max]`, e.g. the 1-30
    /// range an `EngineConfig` specifies.
    pub fn apply_score_bounds(&mut self, min: i32, max: i32) {
        let entity_id = self.entity_id;
        for ability in self.abilities.values_mut() {
            ability.set_bounds(entity_id, min, max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_modifier_floors_negative_scores() {
        let entity = EntityId::new();
        let block = AbilityBlock::new(entity, 7);
        assert_eq!(block.modifier(Ability::Strength), -2);
    }

    #[test]
    fn score_bounds_clamp_above_the_ceiling() {
        let entity = EntityId::new();
        let mut block = AbilityBlock::new(entity, 35);
        block.apply_score_bounds(1, 30);
        // raw score clamped to 30 before normalization: (30-10)/2 = 10.
        assert_eq!(block.modifier(Ability::Strength), 10);
    }

    #[test]
    fn score_bounds_clamp_below_the_floor() {
        let entity = EntityId::new();
        let mut block = AbilityBlock::new(entity, -5);
        block.apply_score_bounds(1, 30);
        // raw score clamped to 1 before normalization: (1-10).div_euclid(2) = -5.
        assert_eq!(block.modifier(Ability::Strength), -5);
    }

    #[test]
    fn ability_modifier_adds_modifier_bonus_after_normalization() {
        let entity = EntityId::new();
        let mut block = AbilityBlock::new(entity, 15);
        assert_eq!(block.modifier(Ability::Strength), 2);
        block
            .get_mut(Ability::Strength)
            .modifier_bonus
            .add_self_modifier(Modifier::numerical(entity, entity, "feat", 2))
            .unwrap();
        assert_eq!(block.modifier(Ability::Strength), 4);
    }
}
