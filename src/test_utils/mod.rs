//! Shared test scaffolding: a tracing subscriber initializer for test
//! binaries, and two framework-level condition blueprints that exercise the
//! `ConditionTarget` seam without pulling in a specific creature's rules.

use std::sync::Once;

use crate::condition::{ConditionBlueprint, ConditionTarget};
use crate::ids::{EntityId, ModifierId, ValueId};
use crate::modifier::{AdvantageState, Modifier, ModifierKind};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing_subscriber::fmt` subscriber once per process, so tests
/// across the suite can log without each one racing to set the global
/// default. Safe to call from every test that wants output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Grants advantage or disadvantage on every attack roll the bearer makes,
/// for as long as it's active. `Shaken`/`Blessed`-shaped conditions are both
/// this blueprint with a different `name` and `state`.
#[derive(Debug, Clone)]
pub struct AttackRollAdvantagePair {
    pub name: String,
    pub state: AdvantageState,
}

impl AttackRollAdvantagePair {
    pub fn new(name: impl Into<String>, state: AdvantageState) -> Self {
        Self { name: name.into(), state }
    }
}

impl ConditionBlueprint for AttackRollAdvantagePair {
    fn name(&self) -> &str {
        &self.name
    }

    fn install(&self, target: &mut dyn ConditionTarget) -> Vec<(ValueId, ModifierId)> {
        let value = target.attack_roll_value_mut();
        let owner = value.owner_entity_id();
        let id = value
            .self_static_mut()
            .insert_advantage_modifier(Modifier::new(
                owner,
                owner,
                self.name.clone(),
                ModifierKind::Advantage { state: self.state },
            ))
            .expect("self modifier targeting the owning entity always validates");
        vec![(value.id, id)]
    }
}

/// A generic "can't act" condition: zeroes out the action budget and gives
/// anyone attacking the bearer advantage, the two mechanical hallmarks 5e's
/// `Incapacitated` and `Paralyzed` share.
#[derive(Debug, Clone)]
pub struct Incapacitating {
    pub name: String,
}

impl Incapacitating {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ConditionBlueprint for Incapacitating {
    fn name(&self) -> &str {
        &self.name
    }

    fn install(&self, target: &mut dyn ConditionTarget) -> Vec<(ValueId, ModifierId)> {
        let mut installed = Vec::new();

        let actions = target.actions_value_mut();
        let owner = actions.owner_entity_id();
        let actions_value_id = actions.id;
        let cap_id = actions
            .self_static_mut()
            .insert_max_constraint(Modifier::numerical(owner, owner, self.name.clone(), 0))
            .expect("self modifier targeting the owning entity always validates");
        installed.push((actions_value_id, cap_id));

        let armor_class = target.armor_class_to_target_mut();
        let owner = armor_class.owner_entity_id();
        // The specific attacker isn't known at install time; any non-owner
        // placeholder works since `snapshot_for` rewrites the target when an
        // attacker actually snapshots this channel.
        let placeholder = EntityId::new();
        let advantage_id = armor_class
            .insert_advantage_modifier(Modifier::new(
                owner,
                placeholder,
                self.name.clone(),
                ModifierKind::Advantage {
                    state: AdvantageState::Advantage,
                },
            ))
            .expect("outgoing modifier targeting a non-owner entity always validates");
        // There's no single ValueId to report this against since it lives on
        // the armor-class composite rather than a standalone ModifiableValue;
        // the actions budget's id is enough for rollback bookkeeping.
        installed.push((actions_value_id, advantage_id));

        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ApplyOutcome, ConditionInstance, ConditionManager, Duration};
    use crate::entity::Entity;
    use std::rc::Rc;

    #[test]
    fn attack_roll_advantage_pair_installs_and_rolls_back() {
        let mut entity = Entity::new("Blessed Target", 10, 30);
        let mut manager = ConditionManager::new();
        let instance = ConditionInstance::new(
            Rc::new(AttackRollAdvantagePair::new("Blessed", AdvantageState::Advantage)),
            Duration::Permanent,
        );
        let outcome = manager.apply(instance, &mut entity, false, false);
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(entity.attack_roll_modifier.advantage(), AdvantageState::Advantage);

        manager.remove("Blessed", &mut entity).unwrap();
        assert_eq!(entity.attack_roll_modifier.advantage(), AdvantageState::None);
    }

    #[test]
    fn incapacitating_zeroes_the_action_budget() {
        let mut entity = Entity::new("Paralyzed Target", 10, 30);
        let mut manager = ConditionManager::new();
        let instance = ConditionInstance::new(Rc::new(Incapacitating::new("Paralyzed")), Duration::Rounds(1));
        manager.apply(instance, &mut entity, false, false);
        assert_eq!(entity.action_economy.actions.remaining(), 0);

        manager.remove("Paralyzed", &mut entity).unwrap();
        assert_eq!(entity.action_economy.actions.remaining(), 1);
    }
}
