//! `StaticValue`: a container of modifiers with fixed payloads.
//!
//! Six id-keyed collections so advantage, critical and auto-hit state can
//! live alongside plain numeric bonuses and bounds, each with its own
//! aggregation rule, instead of a single flat map of numbers.

use std::collections::HashMap;

use tracing::debug;

use crate::enums::DamageType;
use crate::error::{EngineError, EngineResult};
use crate::ids::{EntityId, ModifierId};
use crate::modifier::{AdvantageState, AutoHitState, CriticalState, Modifier, ModifierKind, ResistanceState};

#[derive(Debug, Clone)]
pub struct StaticValue {
    owner_entity_id: EntityId,
    /// Outgoing values (the `to_target_*` layers) require every contained
    /// modifier's target to differ from the owner; incoming values require
    /// it to equal the owner.
    is_outgoing: bool,
    score_normalizer: fn(i32) -> i32,
    value_modifiers: HashMap<ModifierId, Modifier>,
    min_constraints: HashMap<ModifierId, Modifier>,
    max_constraints: HashMap<ModifierId, Modifier>,
    advantage_modifiers: HashMap<ModifierId, Modifier>,
    critical_modifiers: HashMap<ModifierId, Modifier>,
    auto_hit_modifiers: HashMap<ModifierId, Modifier>,
}

fn identity(score: i32) -> i32 {
    score
}

impl StaticValue {
    pub fn new(owner_entity_id: EntityId, is_outgoing: bool) -> Self {
        Self {
            owner_entity_id,
            is_outgoing,
            score_normalizer: identity,
            value_modifiers: HashMap::new(),
            min_constraints: HashMap::new(),
            max_constraints: HashMap::new(),
            advantage_modifiers: HashMap::new(),
            critical_modifiers: HashMap::new(),
            auto_hit_modifiers: HashMap::new(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: fn(i32) -> i32) -> Self {
        self.score_normalizer = normalizer;
        self
    }

    pub fn is_outgoing(&self) -> bool {
        self.is_outgoing
    }

    pub fn owner_entity_id(&self) -> EntityId {
        self.owner_entity_id
    }

    fn validate_target(&self, modifier: &Modifier) -> EngineResult<()> {
        if self.is_outgoing && modifier.target_entity_id == self.owner_entity_id {
            return Err(EngineError::validation(format!(
                "outgoing modifier {} must target a different entity than its owner {}",
                modifier.id, self.owner_entity_id
            )));
        }
        if !self.is_outgoing && modifier.target_entity_id != self.owner_entity_id {
            return Err(EngineError::validation(format!(
                "modifier {} targets {} but this value belongs to {}",
                modifier.id, modifier.target_entity_id, self.owner_entity_id
            )));
        }
        Ok(())
    }

    fn insert_into(
        &mut self,
        modifier: Modifier,
        select: impl Fn(&mut Self) -> &mut HashMap<ModifierId, Modifier>,
    ) -> EngineResult<ModifierId> {
        self.validate_target(&modifier)?;
        let id = modifier.id;
        debug!(owner = %self.owner_entity_id, modifier = %id, "modifier installed");
        select(self).insert(id, modifier);
        Ok(id)
    }

    pub fn insert_value_modifier(&mut self, modifier: Modifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.value_modifiers)
    }

    pub fn insert_min_constraint(&mut self, modifier: Modifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.min_constraints)
    }

    pub fn insert_max_constraint(&mut self, modifier: Modifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.max_constraints)
    }

    pub fn insert_advantage_modifier(&mut self, modifier: Modifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.advantage_modifiers)
    }

    pub fn insert_critical_modifier(&mut self, modifier: Modifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.critical_modifiers)
    }

    pub fn insert_auto_hit_modifier(&mut self, modifier: Modifier) -> EngineResult<ModifierId> {
        self.insert_into(modifier, |s| &mut s.auto_hit_modifiers)
    }

    /// Remove a modifier by id from whichever of the six collections holds
    /// it. Returns `true` if something was removed.
    pub fn remove_modifier(&mut self, id: ModifierId) -> bool {
        let removed = self.value_modifiers.remove(&id).is_some()
            || self.min_constraints.remove(&id).is_some()
            || self.max_constraints.remove(&id).is_some()
            || self.advantage_modifiers.remove(&id).is_some()
            || self.critical_modifiers.remove(&id).is_some()
            || self.auto_hit_modifiers.remove(&id).is_some();
        if removed {
            debug!(owner = %self.owner_entity_id, modifier = %id, "modifier removed");
        }
        removed
    }

    /// Clone this value's six collections into a fresh incoming
    /// (`is_outgoing = false`) value owned by `new_owner`, rewriting every
    /// contained modifier's target to `new_owner` along the way. Used to
    /// snapshot a `to_target_*` layer into a peer's `from_target_*` slot.
    pub fn snapshot_for(&self, new_owner: EntityId) -> StaticValue {
        let rewrite = |map: &HashMap<ModifierId, Modifier>| -> HashMap<ModifierId, Modifier> {
            map.iter()
                .map(|(id, m)| {
                    (
                        *id,
                        Modifier {
                            target_entity_id: new_owner,
                            ..m.clone()
                        },
                    )
                })
                .collect()
        };
        StaticValue {
            owner_entity_id: new_owner,
            is_outgoing: false,
            score_normalizer: self.score_normalizer,
            value_modifiers: rewrite(&self.value_modifiers),
            min_constraints: rewrite(&self.min_constraints),
            max_constraints: rewrite(&self.max_constraints),
            advantage_modifiers: rewrite(&self.advantage_modifiers),
            critical_modifiers: rewrite(&self.critical_modifiers),
            auto_hit_modifiers: rewrite(&self.auto_hit_modifiers),
        }
    }

    fn numerical_sum(map: &HashMap<ModifierId, Modifier>) -> i32 {
        map.values()
            .filter_map(|m| match m.kind {
                ModifierKind::Numerical { value } => Some(value),
                _ => None,
            })
            .sum()
    }

    fn numerical_min(map: &HashMap<ModifierId, Modifier>) -> Option<i32> {
        map.values()
            .filter_map(|m| match m.kind {
                ModifierKind::Numerical { value } => Some(value),
                _ => None,
            })
            .min()
    }

    fn numerical_max(map: &HashMap<ModifierId, Modifier>) -> Option<i32> {
        map.values()
            .filter_map(|m| match m.kind {
                ModifierKind::Numerical { value } => Some(value),
                _ => None,
            })
            .max()
    }

    /// Raw (pre-normalization) `(lower, upper)` bounds, `None` meaning
    /// unbounded in that direction.
    pub fn bounds(&self) -> (Option<i32>, Option<i32>) {
        (
            Self::numerical_min(&self.min_constraints),
            Self::numerical_max(&self.max_constraints),
        )
    }

    /// `clamp(S, Lo, Hi)` with the min floor winning when `Lo > Hi`.
    pub fn raw_score(&self) -> i32 {
        let sum = Self::numerical_sum(&self.value_modifiers);
        clamp_with_min_floor(sum, self.bounds())
    }

    pub fn score(&self) -> i32 {
        (self.score_normalizer)(self.raw_score())
    }

    pub fn advantage(&self) -> AdvantageState {
        let sum: i32 = self
            .advantage_modifiers
            .values()
            .filter_map(|m| match m.kind {
                ModifierKind::Advantage { state } => Some(state.numeric()),
                _ => None,
            })
            .sum();
        AdvantageState::from_sum(sum)
    }

    pub fn critical(&self) -> CriticalState {
        CriticalState::combine(self.critical_modifiers.values().filter_map(|m| {
            match m.kind {
                ModifierKind::Critical { state } => Some(state),
                _ => None,
            }
        }))
    }

    pub fn auto_hit(&self) -> AutoHitState {
        AutoHitState::combine(self.auto_hit_modifiers.values().filter_map(|m| {
            match m.kind {
                ModifierKind::AutoHit { state } => Some(state),
                _ => None,
            }
        }))
    }

    /// Sum of every `Resistance` modifier's weight for a given damage type
    /// (resistance modifiers live alongside plain numeric ones in the same
    /// value_modifiers collection).
    pub fn resistance_weight(&self, damage_type: DamageType) -> i32 {
        self.value_modifiers
            .values()
            .filter_map(|m| match m.kind {
                ModifierKind::Resistance {
                    damage_type: dt,
                    state,
                } if dt == damage_type => Some(state.weight()),
                _ => None,
            })
            .sum()
    }

    pub fn resistance_state(&self, damage_type: DamageType) -> ResistanceState {
        ResistanceState::from_weight(self.resistance_weight(damage_type))
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

/// Shared clamp rule: the min floor wins on inversion, even if that leaves
/// the result above `Hi`. A deliberate floor-over-ceiling rule, not a bug
/// to be fixed away — a forced minimum (e.g. a death-ward floor) should
/// never be silently defeated by an unrelated maximum.
pub fn clamp_with_min_floor(value: i32, bounds: (Option<i32>, Option<i32>)) -> i32 {
    let (lo, hi) = bounds;
    match (lo, hi) {
        (Some(lo), Some(hi)) if lo > hi => value.max(lo),
        (Some(lo), Some(hi)) => value.clamp(lo, hi),
        (Some(lo), None) => value.max(lo),
        (None, Some(hi)) => value.min(hi),
        (None, None) => value,
    }
}
