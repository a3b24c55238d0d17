//! Conditions: time/trigger-bounded effects that install a set of modifiers
//! into a target's values on application and roll every one of them back on
//! removal or expiry.
//!
//! The mechanical content of concrete conditions (what `Blinded` actually
//! does) is an external collaborator; this module ships the framework that
//! hosts that content — `ConditionBlueprint`, `ConditionInstance` and
//! `ConditionManager` — plus the install-target seam a blueprint needs.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::enums::Ability;
use crate::error::EngineResult;
use crate::ids::{ConditionId, ModifierId, ValueId};
use crate::value::{ModifiableValue, StaticValue};

#[derive(Clone)]
pub enum Duration {
    Rounds(u32),
    Permanent,
    UntilLongRest,
    /// Evaluated once per `progress()` call; true removes the condition.
    OnCondition(Rc<dyn Fn() -> bool>),
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Duration::Rounds(n) => f.debug_tuple("Rounds").field(n).finish(),
            Duration::Permanent => write!(f, "Permanent"),
            Duration::UntilLongRest => write!(f, "UntilLongRest"),
            Duration::OnCondition(_) => write!(f, "OnCondition(..)"),
        }
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Duration::Rounds(a), Duration::Rounds(b)) => a == b,
            (Duration::Permanent, Duration::Permanent) => true,
            (Duration::UntilLongRest, Duration::UntilLongRest) => true,
            (Duration::OnCondition(_), Duration::OnCondition(_)) => false,
            _ => false,
        }
    }
}

/// The seam a blueprint installs into: named accessors rather than direct
/// struct field access, so the framework doesn't need to know an entity's
/// full shape.
pub trait ConditionTarget {
    fn attack_roll_value_mut(&mut self) -> &mut ModifiableValue;
    fn armor_class_to_target_mut(&mut self) -> &mut StaticValue;
    fn saving_throw_value_mut(&mut self, ability: Ability) -> &mut ModifiableValue;
    fn actions_value_mut(&mut self) -> &mut ModifiableValue;
}

/// A condition's mechanical content: how it installs and removes its
/// modifiers. Two framework-level demonstrations live in `test_utils`.
pub trait ConditionBlueprint: fmt::Debug {
    fn name(&self) -> &str;

    /// Install this condition's modifiers, returning every `(value_id,
    /// modifier_id)` pair added so they can be rolled back symmetrically.
    fn install(&self, target: &mut dyn ConditionTarget) -> Vec<(ValueId, ModifierId)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotAppliedReason {
    Immune,
    SavedThrow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    NotApplied(NotAppliedReason),
    AlreadyApplied,
}

#[derive(Debug, Clone)]
pub struct ConditionInstance {
    pub id: ConditionId,
    pub name: String,
    pub duration: Duration,
    pub applied: bool,
    pub installed_modifiers: HashMap<ValueId, Vec<ModifierId>>,
    blueprint: Rc<dyn ConditionBlueprint>,
}

impl ConditionInstance {
    pub fn new(blueprint: Rc<dyn ConditionBlueprint>, duration: Duration) -> Self {
        Self {
            id: ConditionId::new(),
            name: blueprint.name().to_string(),
            duration,
            applied: false,
            installed_modifiers: HashMap::new(),
            blueprint,
        }
    }
}

/// Owns every active condition on one entity, in application order, so
/// progression is deterministic.
#[derive(Debug, Default)]
pub struct ConditionManager {
    order: Vec<String>,
    active: HashMap<String, ConditionInstance>,
}

impl ConditionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ConditionInstance> {
        self.active.get(name)
    }

    pub fn active_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Apply a condition. `immune` and `saved` are decided by the caller
    /// (the target's condition immunities and an already-rolled saving
    /// throw), since this module has no dice of its own. Idempotent:
    /// applying an already-applied condition is a no-op returning
    /// `AlreadyApplied`.
    pub fn apply(
        &mut self,
        mut instance: ConditionInstance,
        target: &mut dyn ConditionTarget,
        immune: bool,
        saved: bool,
    ) -> ApplyOutcome {
        if self.active.contains_key(&instance.name) {
            return ApplyOutcome::AlreadyApplied;
        }
        if immune {
            warn!(condition = %instance.name, "condition not applied: target is immune");
            return ApplyOutcome::NotApplied(NotAppliedReason::Immune);
        }
        if saved {
            warn!(condition = %instance.name, "condition not applied: target saved");
            return ApplyOutcome::NotApplied(NotAppliedReason::SavedThrow);
        }

        for (value_id, modifier_id) in instance.blueprint.install(target) {
            instance.installed_modifiers.entry(value_id).or_default().push(modifier_id);
        }
        instance.applied = true;
        debug!(condition = %instance.name, "condition applied");
        self.order.push(instance.name.clone());
        self.active.insert(instance.name.clone(), instance);
        ApplyOutcome::Applied
    }

    /// Remove an active condition, rolling back every modifier it installed.
    /// Removing an already-removed (or never-applied) condition is a no-op.
    pub fn remove(&mut self, name: &str, target: &mut dyn ConditionTarget) -> EngineResult<()> {
        let Some(instance) = self.active.remove(name) else {
            return Ok(());
        };
        self.order.retain(|n| n != name);
        rollback(&instance, target);
        debug!(condition = %name, "condition removed");
        Ok(())
    }

    /// Advance one round: decrement `Rounds` durations, evaluate
    /// `OnCondition` predicates, and remove anything that expired. A
    /// removal saving throw (if the caller rolled one for this condition)
    /// is supplied via `removal_saved`.
    pub fn progress(&mut self, target: &mut dyn ConditionTarget, removal_saved: impl Fn(&str) -> bool) {
        let mut expired = Vec::new();
        for name in self.order.clone() {
            let Some(instance) = self.active.get_mut(&name) else {
                continue;
            };
            let should_expire = match &mut instance.duration {
                Duration::Rounds(remaining) => {
                    if *remaining == 0 {
                        true
                    } else {
                        *remaining -= 1;
                        *remaining == 0
                    }
                }
                Duration::Permanent | Duration::UntilLongRest => false,
                Duration::OnCondition(predicate) => predicate(),
            };
            if should_expire || removal_saved(&name) {
                expired.push(name);
            }
        }
        for name in expired {
            let _ = self.remove(&name, target);
        }
    }

    /// Signal a long rest: every `UntilLongRest` condition is removed.
    pub fn long_rest(&mut self, target: &mut dyn ConditionTarget) {
        let expiring: Vec<String> = self
            .active
            .iter()
            .filter(|(_, c)| matches!(c.duration, Duration::UntilLongRest))
            .map(|(n, _)| n.clone())
            .collect();
        for name in expiring {
            let _ = self.remove(&name, target);
        }
    }
}

fn rollback(instance: &ConditionInstance, target: &mut dyn ConditionTarget) {
    for modifier_id in instance.installed_modifiers.values().flatten() {
        target.attack_roll_value_mut().remove_modifier(*modifier_id);
        target.armor_class_to_target_mut().remove_modifier(*modifier_id);
        for ability in [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ] {
            target.saving_throw_value_mut(ability).remove_modifier(*modifier_id);
        }
        target.actions_value_mut().remove_modifier(*modifier_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntityId;
    use crate::modifier::{Modifier, ModifierKind, AdvantageState};

    #[derive(Debug)]
    struct DisadvantageOnAttacks;

    impl ConditionBlueprint for DisadvantageOnAttacks {
        fn name(&self) -> &str {
            "Shaken"
        }

        fn install(&self, target: &mut dyn ConditionTarget) -> Vec<(ValueId, ModifierId)> {
            let value = target.attack_roll_value_mut();
            let owner = value.owner_entity_id();
            let value_id = value.id;
            let id = value
                .self_static_mut()
                .insert_advantage_modifier(Modifier::new(
                    owner,
                    owner,
                    "Shaken",
                    ModifierKind::Advantage {
                        state: AdvantageState::Disadvantage,
                    },
                ))
                .unwrap();
            vec![(value_id, id)]
        }
    }

    struct Harness {
        attack_roll: ModifiableValue,
        armor_class_to_target: StaticValue,
        saving_throws: HashMap<Ability, ModifiableValue>,
        actions: ModifiableValue,
    }

    impl Harness {
        fn new() -> Self {
            let entity = EntityId::new();
            let mut saving_throws = HashMap::new();
            for ability in [
                Ability::Strength,
                Ability::Dexterity,
                Ability::Constitution,
                Ability::Intelligence,
                Ability::Wisdom,
                Ability::Charisma,
            ] {
                saving_throws.insert(ability, ModifiableValue::new(entity, "save"));
            }
            Self {
                attack_roll: ModifiableValue::new(entity, "Attack Roll"),
                armor_class_to_target: StaticValue::new(entity, true),
                saving_throws,
                actions: ModifiableValue::new(entity, "Actions"),
            }
        }
    }

    impl ConditionTarget for Harness {
        fn attack_roll_value_mut(&mut self) -> &mut ModifiableValue {
            &mut self.attack_roll
        }
        fn armor_class_to_target_mut(&mut self) -> &mut StaticValue {
            &mut self.armor_class_to_target
        }
        fn saving_throw_value_mut(&mut self, ability: Ability) -> &mut ModifiableValue {
            self.saving_throws.get_mut(&ability).unwrap()
        }
        fn actions_value_mut(&mut self) -> &mut ModifiableValue {
            &mut self.actions
        }
    }

    #[test]
    fn apply_then_remove_restores_prior_state() {
        let mut harness = Harness::new();
        let before = harness.attack_roll.advantage();
        let mut manager = ConditionManager::new();

        let instance = ConditionInstance::new(Rc::new(DisadvantageOnAttacks), Duration::Rounds(3));
        let outcome = manager.apply(instance, &mut harness, false, false);
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(harness.attack_roll.advantage(), AdvantageState::Disadvantage);

        manager.remove("Shaken", &mut harness).unwrap();
        assert_eq!(harness.attack_roll.advantage(), before);
    }

    #[test]
    fn idempotent_apply_and_remove() {
        let mut harness = Harness::new();
        let mut manager = ConditionManager::new();
        let instance = ConditionInstance::new(Rc::new(DisadvantageOnAttacks), Duration::Permanent);
        manager.apply(instance, &mut harness, false, false);

        let second = ConditionInstance::new(Rc::new(DisadvantageOnAttacks), Duration::Permanent);
        assert_eq!(manager.apply(second, &mut harness, false, false), ApplyOutcome::AlreadyApplied);

        manager.remove("Shaken", &mut harness).unwrap();
        assert!(manager.remove("Shaken", &mut harness).is_ok());
    }

    #[test]
    fn immunity_blocks_application() {
        let mut harness = Harness::new();
        let mut manager = ConditionManager::new();
        let instance = ConditionInstance::new(Rc::new(DisadvantageOnAttacks), Duration::Permanent);
        let outcome = manager.apply(instance, &mut harness, true, false);
        assert_eq!(outcome, ApplyOutcome::NotApplied(NotAppliedReason::Immune));
        assert_eq!(harness.attack_roll.advantage(), AdvantageState::None);
    }

    #[test]
    fn rounds_duration_expires_after_n_progress_calls() {
        let mut harness = Harness::new();
        let mut manager = ConditionManager::new();
        let instance = ConditionInstance::new(Rc::new(DisadvantageOnAttacks), Duration::Rounds(2));
        manager.apply(instance, &mut harness, false, false);

        manager.progress(&mut harness, |_| false);
        assert!(manager.is_active("Shaken"));
        manager.progress(&mut harness, |_| false);
        assert!(!manager.is_active("Shaken"));
    }
}
