extern crate dndcore;

mod tests {
    use std::rc::Rc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use dndcore::condition::{ApplyOutcome, ConditionInstance, Duration};
    use dndcore::dice::AttackOutcome;
    use dndcore::enums::{Ability, DamageType, Proficiency, Skill};
    use dndcore::equipment::{EquipmentSlot, Item};
    use dndcore::health::{HitDice, HitDiceMode};
    use dndcore::modifier::AdvantageState;
    use dndcore::resolution::WeaponDamage;
    use dndcore::test_utils::{init_tracing, AttackRollAdvantagePair, Incapacitating};
    use dndcore::world::World;

    #[test]
    fn a_hit_reduces_the_defenders_current_hp() {
        init_tracing();
        let mut world = World::default();
        let attacker = world.spawn_entity("Attacker");
        let defender = world.spawn_entity("Defender");
        {
            let handle = world.get_entity(defender).unwrap();
            handle
                .borrow_mut()
                .health
                .set_hit_dice(vec![HitDice::new(10, 4, HitDiceMode::Maximums)]);
        }
        let starting_hp = world.get_entity(defender).unwrap().borrow().health.current_hp(0);

        let mut rng = StdRng::seed_from_u64(7);
        let result = world
            .attack(
                attacker,
                defender,
                EquipmentSlot::MainHand,
                WeaponDamage::new(1, 8, DamageType::Slashing),
                &mut rng,
            )
            .unwrap();

        if result.roll.outcome == Some(AttackOutcome::Hit) || result.roll.outcome == Some(AttackOutcome::Crit) {
            let remaining = world.get_entity(defender).unwrap().borrow().health.current_hp(0);
            assert!(remaining < starting_hp);
        }
        assert_eq!(world.rolls_for_entity(attacker).len(), 1);
    }

    #[test]
    fn armor_raises_the_defenders_effective_ac() {
        let mut world = World::default();
        let attacker = world.spawn_entity("Attacker");
        let defender = world.spawn_entity("Defender");
        world.equip(defender, EquipmentSlot::Body, Item::armor("Plate", 18), false).unwrap();

        let handle = world.get_entity(defender).unwrap();
        assert_eq!(handle.borrow().equipment.armor_class().score(), 18);
        drop(handle);

        let mut misses = 0;
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let result = world
                .attack(attacker, defender, EquipmentSlot::MainHand, WeaponDamage::new(1, 4, DamageType::Bludgeoning), &mut rng)
                .unwrap();
            if result.roll.outcome == Some(AttackOutcome::Miss) {
                misses += 1;
            }
        }
        assert!(misses > 0, "plate armor should cause at least some misses across 20 swings");
    }

    #[test]
    fn a_condition_installs_and_rolls_back_through_the_world() {
        let mut world = World::default();
        let id = world.spawn_entity("Fighter");

        let blueprint = Rc::new(AttackRollAdvantagePair::new("Blessed", AdvantageState::Advantage));
        let instance = ConditionInstance::new(blueprint, Duration::Rounds(3));
        let outcome = world.add_condition(id, instance, false).unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied);

        let handle = world.get_entity(id).unwrap();
        assert_eq!(handle.borrow().attack_roll_modifier.advantage(), AdvantageState::Advantage);
        drop(handle);

        world.remove_condition(id, "Blessed").unwrap();
        let handle = world.get_entity(id).unwrap();
        assert_eq!(handle.borrow().attack_roll_modifier.advantage(), AdvantageState::None);
    }

    #[test]
    fn an_entitys_own_immunity_blocks_the_condition() {
        let mut world = World::default();
        let id = world.spawn_entity("Construct");
        {
            let handle = world.get_entity(id).unwrap();
            handle.borrow_mut().condition_immunities.insert("Blessed".to_string());
        }

        let blueprint = Rc::new(AttackRollAdvantagePair::new("Blessed", AdvantageState::Advantage));
        let instance = ConditionInstance::new(blueprint, Duration::Rounds(3));
        let outcome = world.add_condition(id, instance, false).unwrap();
        assert!(matches!(outcome, ApplyOutcome::NotApplied(_)));

        let handle = world.get_entity(id).unwrap();
        assert_eq!(handle.borrow().attack_roll_modifier.advantage(), AdvantageState::None);
    }

    #[test]
    fn incapacitation_zeroes_the_action_budget_through_the_world() {
        let mut world = World::default();
        let id = world.spawn_entity("Stunned Victim");

        let blueprint = Rc::new(Incapacitating::new("Stunned"));
        let instance = ConditionInstance::new(blueprint, Duration::Rounds(1));
        world.add_condition(id, instance, false).unwrap();

        let handle = world.get_entity(id).unwrap();
        assert_eq!(handle.borrow().action_economy.actions.remaining(), 0);
    }

    #[test]
    fn a_proficient_skill_check_beats_an_easy_dc() {
        let mut world = World::default();
        let id = world.spawn_entity("Scout");
        {
            let handle = world.get_entity(id).unwrap();
            let mut entity = handle.borrow_mut();
            entity
                .skills
                .set_proficiency(Skill::Stealth, Proficiency::Proficient);
        }
        let mut rng = StdRng::seed_from_u64(11);
        let record = world.skill_check(id, Skill::Stealth, 1, &mut rng).unwrap();
        assert_eq!(record.success, Some(true));
    }

    #[test]
    fn saving_throw_dc_zero_always_succeeds() {
        let mut world = World::default();
        let id = world.spawn_entity("Hero");
        let mut rng = StdRng::seed_from_u64(5);
        let record = world.saving_throw(id, Ability::Wisdom, 0, &mut rng).unwrap();
        assert_eq!(record.success, Some(true));
    }
}
