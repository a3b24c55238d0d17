//! `ContextualValue`: the same six-collection shape as `StaticValue`, but
//! holding `ContextualModifier`s that are evaluated against a `RollContext`
//! at read time instead of carrying a fixed payload.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::ids::{EntityId, ModifierId};
use crate::modifier::{
    AdvantageState, AutoHitState, ContextualModifier, CriticalState, ModifierKind, RollContext,
};

use super::static_value::clamp_with_min_floor;

#[derive(Debug, Clone, Default)]
pub struct ContextualValue {
    owner_entity_id: EntityId,
    is_outgoing: bool,
    value_modifiers: HashMap<ModifierId, ContextualModifier>,
    min_constraints: HashMap<ModifierId, ContextualModifier>,
    max_constraints: HashMap<ModifierId, ContextualModifier>,
    advantage_modifiers: HashMap<ModifierId, ContextualModifier>,
    critical_modifiers: HashMap<ModifierId, ContextualModifier>,
    auto_hit_modifiers: HashMap<ModifierId, ContextualModifier>,
}

impl ContextualValue {
    pub fn new(owner_entity_id: EntityId, is_outgoing: bool) -> Self {
        Self {
            owner_entity_id,
            is_outgoing,
            value_modifiers: HashMap::new(),
            min_constraints: HashMap::new(),
            max_constraints: HashMap::new(),
            advantage_modifiers: HashMap::new(),
            critical_modifiers: HashMap::new(),
            auto_hit_modifiers: HashMap::new(),
        }
    }

    fn validate_target(&self, modifier: &ContextualModifier) -> EngineResult<()> {
        if self.is_outgoing && modifier.target_entity_id == self.owner_entity_id {
            return Err(EngineError::validation(format!(
                "outgoing contextual modifier {} must target a different entity than its owner {}",
                modifier.id, self.owner_entity_id
            )));
        }
        if !self.is_outgoing && modifier.target_entity_id != self.owner_entity_id {
            return Err(EngineError::validation(format!(
                "contextual modifier {} targets {} but this value belongs to {}",
                modifier.id, modifier.target_entity_id, self.owner_entity_id
            )));
        }
        Ok(())
    }

    fn insert_into(
        &mut self,
        modifier: ContextualModifier,
        select: impl Fn(&mut Self) -> &mut HashMap<ModifierId, ContextualModifier>,
    ) -> EngineResult<ModifierId> {
        self.validate_target(&modifier)?;
        let id = modifier.id;
        select(self).insert(id, modifier);
        Ok(id)
    }

    pub fn insert_value_modifier(&mut self, modifier: ContextualModifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.value_modifiers)
    }

    pub fn insert_min_constraint(&mut self, modifier: ContextualModifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.min_constraints)
    }

    pub fn insert_max_constraint(&mut self, modifier: ContextualModifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.max_constraints)
    }

    pub fn insert_advantage_modifier(&mut self, modifier: ContextualModifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.advantage_modifiers)
    }

    pub fn insert_critical_modifier(&mut self, modifier: ContextualModifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.critical_modifiers)
    }

    pub fn insert_auto_hit_modifier(&mut self, modifier: ContextualModifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.auto_hit_modifiers)
    }

    pub fn remove_modifier(&mut self, id: ModifierId) -> bool {
        self.value_modifiers.remove(&id).is_some()
            || self.min_constraints.remove(&id).is_some()
            || self.max_constraints.remove(&id).is_some()
            || self.advantage_modifiers.remove(&id).is_some()
            || self.critical_modifiers.remove(&id).is_some()
            || self.auto_hit_modifiers.remove(&id).is_some()
    }

    /// Clone this value's six collections into a fresh incoming value owned
    /// by `new_owner`, rewriting every contained modifier's target. Used to
    /// snapshot a `to_target_*` layer into a peer's `from_target_*` slot.
    pub fn snapshot_for(&self, new_owner: EntityId) -> ContextualValue {
        let rewrite = |map: &HashMap<ModifierId, ContextualModifier>| -> HashMap<ModifierId, ContextualModifier> {
            map.iter()
                .map(|(id, m)| {
                    (
                        *id,
                        ContextualModifier {
                            target_entity_id: new_owner,
                            ..m.clone()
                        },
                    )
                })
                .collect()
        };
        ContextualValue {
            owner_entity_id: new_owner,
            is_outgoing: false,
            value_modifiers: rewrite(&self.value_modifiers),
            min_constraints: rewrite(&self.min_constraints),
            max_constraints: rewrite(&self.max_constraints),
            advantage_modifiers: rewrite(&self.advantage_modifiers),
            critical_modifiers: rewrite(&self.critical_modifiers),
            auto_hit_modifiers: rewrite(&self.auto_hit_modifiers),
        }
    }

    fn numerical_sum(map: &HashMap<ModifierId, ContextualModifier>, context: &RollContext) -> i32 {
        map.values()
            .filter_map(|m| match m.evaluate(context) {
                ModifierKind::Numerical { value } => Some(value),
                _ => None,
            })
            .sum()
    }

    fn numerical_min(map: &HashMap<ModifierId, ContextualModifier>, context: &RollContext) -> Option<i32> {
        map.values()
            .filter_map(|m| match m.evaluate(context) {
                ModifierKind::Numerical { value } => Some(value),
                _ => None,
            })
            .min()
    }

    fn numerical_max(map: &HashMap<ModifierId, ContextualModifier>, context: &RollContext) -> Option<i32> {
        map.values()
            .filter_map(|m| match m.evaluate(context) {
                ModifierKind::Numerical { value } => Some(value),
                _ => None,
            })
            .max()
    }

    pub fn bounds(&self, context: &RollContext) -> (Option<i32>, Option<i32>) {
        (
            Self::numerical_min(&self.min_constraints, context),
            Self::numerical_max(&self.max_constraints, context),
        )
    }

    pub fn score(&self, context: &RollContext) -> i32 {
        let sum = Self::numerical_sum(&self.value_modifiers, context);
        clamp_with_min_floor(sum, self.bounds(context))
    }

    pub fn advantage(&self, context: &RollContext) -> AdvantageState {
        let sum: i32 = self
            .advantage_modifiers
            .values()
            .filter_map(|m| match m.evaluate(context) {
                ModifierKind::Advantage { state } => Some(state.numeric()),
                _ => None,
            })
            .sum();
        AdvantageState::from_sum(sum)
    }

    pub fn critical(&self, context: &RollContext) -> CriticalState {
        CriticalState::combine(self.critical_modifiers.values().filter_map(|m| {
            match m.evaluate(context) {
                ModifierKind::Critical { state } => Some(state),
                _ => None,
            }
        }))
    }

    pub fn auto_hit(&self, context: &RollContext) -> AutoHitState {
        AutoHitState::combine(self.auto_hit_modifiers.values().filter_map(|m| {
            match m.evaluate(context) {
                ModifierKind::AutoHit { state } => Some(state),
                _ => None,
            }
        }))
    }

    pub fn is_empty(&self) -> bool {
        self.value_modifiers.is_empty()
            && self.min_constraints.is_empty()
            && self.max_constraints.is_empty()
            && self.advantage_modifiers.is_empty()
            && self.critical_modifiers.is_empty()
            && self.auto_hit_modifiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn score_reevaluates_against_a_new_context() {
        let owner = EntityId::new();
        let mut v = ContextualValue::new(owner, false);
        v.insert_value_modifier(ContextualModifier::new(
            owner,
            owner,
            "Bless if blessed",
            Arc::new(|_s, _t, ctx| {
                let value = if ctx.has_tag("blessed") { 4 } else { 0 };
                ModifierKind::Numerical { value }
            }),
        ))
        .unwrap();

        assert_eq!(v.score(&RollContext::new()), 0);
        assert_eq!(v.score(&RollContext::new().with_tag("blessed")), 4);
    }

    #[test]
    fn outgoing_contextual_value_rejects_self_targeted_modifier() {
        let owner = EntityId::new();
        let mut v = ContextualValue::new(owner, true);
        let err = v
            .insert_value_modifier(ContextualModifier::new(
                owner,
                owner,
                "bad",
                Arc::new(|_s, _t, _ctx| ModifierKind::Numerical { value: 1 }),
            ))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
    }
}
