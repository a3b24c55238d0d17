//! `SkillBlock`: the eighteen skills, each a proficiency tier plus a flat
//! `ModifiableValue` bonus layered on top of proficiency and ability
//! modifier contributions computed by the caller.

use std::collections::HashMap;

use crate::enums::{Proficiency, Skill};
use crate::ids::EntityId;
use crate::modifier::RollContext;
use crate::value::ModifiableValue;
use strum::IntoEnumIterator;

#[derive(Debug, Clone)]
pub struct SkillBlock {
    entity_id: EntityId,
    proficiencies: HashMap<Skill, Proficiency>,
    bonuses: HashMap<Skill, ModifiableValue>,
}

impl SkillBlock {
    pub fn new(entity_id: EntityId) -> Self {
        let mut proficiencies = HashMap::new();
        let mut bonuses = HashMap::new();
        for skill in Skill::iter() {
            proficiencies.insert(skill, Proficiency::None);
            bonuses.insert(skill, ModifiableValue::new(entity_id, format!("{skill} Bonus")));
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

    pub fn proficiency(&self, skill: Skill) -> Proficiency {
        self.proficiencies[&skill]
    }

    pub fn set_proficiency(&mut self, skill: Skill, level: Proficiency) {
        self.proficiencies.insert(skill, level);
    }

    pub fn bonus(&self, skill: Skill) -> &ModifiableValue {
        &self.bonuses[&skill]
    }

    pub fn bonus_mut(&mut self, skill: Skill) -> &mut ModifiableValue {
        self.bonuses.get_mut(&skill).expect("every skill is seeded at construction")
    }

    /// `P·multiplier + A + B`, the composition rule shared by skill checks
    /// and saving throws.
    pub fn total_bonus(&self, skill: Skill, ability_modifier: i32, proficiency_bonus: i32) -> i32 {
        self.proficiency(skill).bonus(proficiency_bonus) + ability_modifier + self.bonus(skill).score()
    }

    pub fn set_target_all(&mut self, target: Option<EntityId>, context: RollContext) {
        super::propagate_target(self.bonuses.values_mut(), target, &context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expertise_doubles_proficiency_bonus() {
        let entity = EntityId::new();
        let mut skills = SkillBlock::new(entity);
        skills.set_proficiency(Skill::Athletics, Proficiency::Expertise);
        assert_eq!(skills.total_bonus(Skill::Athletics, 0, 3), 6);
    }

    #[test]
    fn untrained_skill_gets_no_proficiency_bonus() {
        let entity = EntityId::new();
        let skills = SkillBlock::new(entity);
        assert_eq!(skills.total_bonus(Skill::Stealth, 2, 3), 2);
    }
}
