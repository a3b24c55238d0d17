//! `SavingThrowBlock`: one proficiency tier and bonus value per ability,
//! mirroring `SkillBlock`'s shape since saves use the same composition rule.

use std::collections::HashMap;

use crate::enums::{Ability, Proficiency};
use crate::ids::EntityId;
use crate::modifier::RollContext;
use crate::value::ModifiableValue;
use strum::IntoEnumIterator;

#[derive(Debug, Clone)]
pub struct SavingThrowBlock {
    entity_id: EntityId,
    proficiencies: HashMap<Ability, Proficiency>,
    bonuses: HashMap<Ability, ModifiableValue>,
}

impl SavingThrowBlock {
    pub fn new(entity_id: EntityId) -> Self {
        let mut proficiencies = HashMap::new();
        let mut bonuses = HashMap::new();
        for ability in Ability::iter() {
            proficiencies.insert(ability, Proficiency::None);
            bonuses.insert(ability, ModifiableValue::new(entity_id, format!("{ability} Save Bonus")));
        }
        Self {
            entity_id,
            proficiencies,
            bonuses,
        }
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn proficiency(&self, ability: Ability) -> Proficiency {
        self.proficiencies[&ability]
    }

    pub fn set_proficiency(&mut self, ability: Ability, level: Proficiency) {
        self.proficiencies.insert(ability, level);
    }

    pub fn bonus(&self, ability: Ability) -> &ModifiableValue {
        &self.bonuses[&ability]
    }

    pub fn bonus_mut(&mut self, ability: Ability) -> &mut ModifiableValue {
        self.bonuses
            .get_mut(&ability)
            .expect("every ability is seeded at construction")
    }

    pub fn total_bonus(&self, ability: Ability, ability_modifier: i32, proficiency_bonus: i32) -> i32 {
        self.proficiency(ability).bonus(proficiency_bonus) + ability_modifier + self.bonus(ability).score()
    }

    pub fn set_target_all(&mut self, target: Option<EntityId>, context: RollContext) {
        super::propagate_target(self.bonuses.values_mut(), target, &context);
    }
}
