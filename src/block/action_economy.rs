//! `ActionEconomyBlock`: the per-round actions/bonus actions/reactions/
//! movement budgets. Each budget is a base modifier installed once plus a
//! set of per-round cost modifiers; refreshing the round removes the costs
//! and leaves the base untouched.

use crate::error::EngineResult;
use crate::ids::{EntityId, ModifierId};
use crate::modifier::{Modifier, RollContext};
use crate::value::ModifiableValue;

#[derive(Debug, Clone)]
pub struct Budget {
    value: ModifiableValue,
    cost_modifier_ids: Vec<ModifierId>,
}

impl Budget {
    fn new(entity_id: EntityId, name: &str, base: i32) -> Self {
        let mut value = ModifiableValue::new(entity_id, name);
        value
            .add_self_modifier(Modifier::numerical(entity_id, entity_id, "base", base))
            .expect("self modifier targeting the owning entity always validates");
        Self {
            value,
            cost_modifier_ids: Vec::new(),
        }
    }

    pub fn remaining(&self) -> i32 {
        self.value.score()
    }

    pub fn value(&self) -> &ModifiableValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut ModifiableValue {
        &mut self.value
    }

    /// Install a negative cost modifier for the remainder of the round.
    pub fn spend(&mut self, amount: i32, label: impl Into<String>) -> EngineResult<()> {
        let owner = self.value.owner_entity_id();
        let id = self
            .value
            .add_self_modifier(Modifier::numerical(owner, owner, label, -amount))?;
        self.cost_modifier_ids.push(id);
        Ok(())
    }

    /// Remove every cost modifier installed since the last refresh.
    pub fn refresh(&mut self) {
        for id in self.cost_modifier_ids.drain(..) {
            self.value.remove_modifier(id);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionEconomyBlock {
    entity_id: EntityId,
    pub actions: Budget,
    pub bonus_actions: Budget,
    pub reactions: Budget,
    pub movement: Budget,
}

impl ActionEconomyBlock {
    pub fn new(entity_id: EntityId, base_walking_speed: i32) -> Self {
        Self {
            entity_id,
            actions: Budget::new(entity_id, "Actions", 1),
            bonus_actions: Budget::new(entity_id, "Bonus Actions", 1),
            reactions: Budget::new(entity_id, "Reactions", 1),
            movement: Budget::new(entity_id, "Movement", base_walking_speed),
        }
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Reset to the top of a new round: every cost modifier removed, bases
    /// untouched, so `actions = bonus_actions = reactions = 1` and
    /// `movement = base walking speed` again.
    pub fn refresh(&mut self) {
        self.actions.refresh();
        self.bonus_actions.refresh();
        self.reactions.refresh();
        self.movement.refresh();
    }

    pub fn set_target_all(&mut self, target: Option<EntityId>, context: RollContext) {
        super::propagate_target(
            [
                &mut self.actions.value,
                &mut self.bonus_actions.value,
                &mut self.reactions.value,
                &mut self.movement.value,
            ]
            .into_iter(),
            target,
            &context,
        );
    }
}
