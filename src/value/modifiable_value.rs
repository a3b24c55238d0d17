//! `ModifiableValue`: the full composite a block exposes to callers —
//! self static/contextual layers, an outgoing `to_target_*` pair other
//! values can snapshot from, and an incoming `from_target_*` pair snapshotted
//! from whichever peer this value is currently aimed at.

use tracing::debug;

use crate::enums::DamageType;
use crate::error::{EngineError, EngineResult};
use crate::ids::{EntityId, ModifierId, ValueId};
use crate::modifier::{AdvantageState, AutoHitState, CriticalState, Modifier, ResistanceState, RollContext};

use super::contextual_value::ContextualValue;
use super::static_value::StaticValue;

#[derive(Debug, Clone)]
pub struct ModifiableValue {
    pub id: ValueId,
    pub name: String,
    owner_entity_id: EntityId,
    target_entity_id: Option<EntityId>,
    context: RollContext,
    self_static: StaticValue,
    self_contextual: ContextualValue,
    to_target_static: StaticValue,
    to_target_contextual: ContextualValue,
    from_target_static: Option<StaticValue>,
    from_target_contextual: Option<ContextualValue>,
}

impl ModifiableValue {
    pub fn new(owner_entity_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: ValueId::new(),
            name: name.into(),
            owner_entity_id,
            target_entity_id: None,
            context: RollContext::new(),
            self_static: StaticValue::new(owner_entity_id, false),
            self_contextual: ContextualValue::new(owner_entity_id, false),
            to_target_static: StaticValue::new(owner_entity_id, true),
            to_target_contextual: ContextualValue::new(owner_entity_id, true),
            from_target_static: None,
            from_target_contextual: None,
        }
    }

    pub fn with_normalizer(mut self, normalizer: fn(i32) -> i32) -> Self {
        self.self_static = self.self_static.with_normalizer(normalizer);
        self
    }

    pub fn owner_entity_id(&self) -> EntityId {
        self.owner_entity_id
    }

    pub fn target_entity_id(&self) -> Option<EntityId> {
        self.target_entity_id
    }

    pub fn self_static_mut(&mut self) -> &mut StaticValue {
        &mut self.self_static
    }

    pub fn self_contextual_mut(&mut self) -> &mut ContextualValue {
        &mut self.self_contextual
    }

    pub fn to_target_static_mut(&mut self) -> &mut StaticValue {
        &mut self.to_target_static
    }

    pub fn to_target_contextual_mut(&mut self) -> &mut ContextualValue {
        &mut self.to_target_contextual
    }

    /// Add a fixed modifier to the self-static layer — the common case for
    /// a feat, item bonus or ability-score contribution.
    pub fn add_self_modifier(&mut self, modifier: Modifier) -> EngineResult<ModifierId> {
        let id = self.self_static.insert_value_modifier(modifier)?;
        debug!(value = %self.id, name = %self.name, modifier = %id, "self modifier added");
        Ok(id)
    }

    pub fn remove_modifier(&mut self, id: ModifierId) -> bool {
        let removed = self.self_static.remove_modifier(id)
            || self.to_target_static.remove_modifier(id)
            || self.self_contextual.remove_modifier(id)
            || self.to_target_contextual.remove_modifier(id)
            || self
                .from_target_static
                .as_mut()
                .map(|v| v.remove_modifier(id))
                .unwrap_or(false)
            || self
                .from_target_contextual
                .as_mut()
                .map(|v| v.remove_modifier(id))
                .unwrap_or(false);
        if removed {
            debug!(value = %self.id, name = %self.name, modifier = %id, "value modifier removed");
        }
        removed
    }

    /// Set which entity this value is presently aimed at, and the roll
    /// context to evaluate contextual layers against. Mutates the four
    /// owned layers' notion of "current target" in lockstep; clearing the
    /// target also drops whatever was snapshotted into `from_target_*`,
    /// since a stale peer snapshot aimed at nobody is meaningless.
    pub fn set_target(&mut self, target_entity_id: Option<EntityId>, context: RollContext) {
        self.target_entity_id = target_entity_id;
        self.context = context;
        if target_entity_id.is_none() {
            self.from_target_static = None;
            self.from_target_contextual = None;
        }
    }

    pub fn clear_target(&mut self) {
        self.set_target(None, RollContext::new());
    }

    /// Copy a peer's outgoing layers into this value's incoming layers,
    /// rewriting each copied modifier's target to this value's owner so the
    /// copies validate the same way locally authored ones would.
    ///
    /// `peer` must belong to the entity this value is currently targeting.
    pub fn set_from_target(&mut self, peer: &ModifiableValue) -> EngineResult<()> {
        let target = self.target_entity_id.ok_or_else(|| {
            EngineError::precondition("cannot snapshot from a target before one is set")
        })?;
        if peer.owner_entity_id != target {
            return Err(EngineError::validation(format!(
                "value {} is targeting {} but snapshot source {} belongs to {}",
                self.id, target, peer.id, peer.owner_entity_id
            )));
        }

        self.from_target_static = Some(peer.to_target_static.snapshot_for(self.owner_entity_id));
        self.from_target_contextual =
            Some(peer.to_target_contextual.snapshot_for(self.owner_entity_id));

        Ok(())
    }

    /// Sum of each layer's own already-clamped-and-normalized score. Each
    /// layer enforces its own min/max internally (see `StaticValue::raw_score`
    /// / `ContextualValue::score`), so no further clamp is applied here — a
    /// second clamp at this level would reapply a pre-normalization bound to
    /// an already-normalized sum wherever a layer carries a normalizer (as
    /// an ability score's `self_static` does).
    pub fn score(&self) -> i32 {
        let mut sum = self.self_static.score() + self.self_contextual.score(&self.context);
        if let Some(v) = &self.from_target_static {
            sum += v.score();
        }
        if let Some(v) = &self.from_target_contextual {
            sum += v.score(&self.context);
        }
        sum
    }

    pub fn advantage(&self) -> AdvantageState {
        let mut sum = self.self_static.advantage().numeric() + self.self_contextual.advantage(&self.context).numeric();
        if let Some(v) = &self.from_target_static {
            sum += v.advantage().numeric();
        }
        if let Some(v) = &self.from_target_contextual {
            sum += v.advantage(&self.context).numeric();
        }
        AdvantageState::from_sum(sum)
    }

    pub fn critical(&self) -> CriticalState {
        let mut states = vec![self.self_static.critical(), self.self_contextual.critical(&self.context)];
        if let Some(v) = &self.from_target_static {
            states.push(v.critical());
        }
        if let Some(v) = &self.from_target_contextual {
            states.push(v.critical(&self.context));
        }
        CriticalState::combine(states.into_iter())
    }

    pub fn auto_hit(&self) -> AutoHitState {
        let mut states = vec![self.self_static.auto_hit(), self.self_contextual.auto_hit(&self.context)];
        if let Some(v) = &self.from_target_static {
            states.push(v.auto_hit());
        }
        if let Some(v) = &self.from_target_contextual {
            states.push(v.auto_hit(&self.context));
        }
        AutoHitState::combine(states.into_iter())
    }

    /// Aggregate resistance state for a damage type, summing weights from
    /// the static self and from-target layers (resistance modifiers are not
    /// expected on the contextual layers, which carry hook-style effects).
    pub fn resistance_state(&self, damage_type: DamageType) -> ResistanceState {
        let mut sum = self.self_static.resistance_weight(damage_type);
        if let Some(v) = &self.from_target_static {
            sum += v.resistance_weight(damage_type);
        }
        ResistanceState::from_weight(sum)
    }
}
