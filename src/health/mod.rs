//! `Health`: hit dice, max/current HP derivation, temporary hit points, and
//! the ordered damage-application pipeline (resistance → flat reduction →
//! temp HP absorption → HP).

use crate::enums::DamageType;
use crate::ids::{EntityId, ModifierId};
use crate::modifier::{Modifier, ResistanceState};
use crate::value::ModifiableValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitDiceMode {
    Average,
    Maximums,
    /// A previously-rolled total, taken as given rather than re-rolled.
    Roll(i32),
}

#[derive(Debug, Clone, Copy)]
pub struct HitDice {
    pub face: i32,
    pub count: i32,
    pub mode: HitDiceMode,
}

impl HitDice {
    pub fn new(face: i32, count: i32, mode: HitDiceMode) -> Self {
        Self { face, count, mode }
    }

    /// Expected total HP this hit-dice group contributes, per its mode.
    pub fn expected(&self) -> i32 {
        match self.mode {
            HitDiceMode::Average => self.count * (self.face / 2 + 1),
            HitDiceMode::Maximums => self.count * self.face,
            HitDiceMode::Roll(total) => total,
        }
    }
}

/// The result of one `apply_damage` call, useful for assertions and for the
/// resolution pipeline's returned health-delta record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageApplication {
    pub post_resistance: i32,
    pub post_reduction: i32,
    pub absorbed_by_temp_hp: i32,
    pub applied_to_hp: i32,
}

#[derive(Debug, Clone)]
pub struct Health {
    entity_id: EntityId,
    hit_dice: Vec<HitDice>,
    max_hit_points_bonus: ModifiableValue,
    temporary_hit_points: ModifiableValue,
    temp_hp_modifier_id: Option<ModifierId>,
    damage_reduction: ModifiableValue,
    damage_taken: i32,
}

impl Health {
    pub fn new(entity_id: EntityId, hit_dice: Vec<HitDice>) -> Self {
        Self {
            entity_id,
            hit_dice,
            max_hit_points_bonus: ModifiableValue::new(entity_id, "Max HP Bonus"),
            temporary_hit_points: ModifiableValue::new(entity_id, "Temporary HP"),
            temp_hp_modifier_id: None,
            damage_reduction: ModifiableValue::new(entity_id, "Damage Reduction"),
            damage_taken: 0,
        }
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn max_hit_points_bonus_mut(&mut self) -> &mut ModifiableValue {
        &mut self.max_hit_points_bonus
    }

    pub fn damage_reduction_mut(&mut self) -> &mut ModifiableValue {
        &mut self.damage_reduction
    }

    /// Replace the hit dice backing `max_hp`, e.g. once a creature's class
    /// and level are known after it's spawned bare.
    pub fn set_hit_dice(&mut self, hit_dice: Vec<HitDice>) {
        self.hit_dice = hit_dice;
    }

    pub fn max_hp(&self, constitution_modifier: i32) -> i32 {
        let total_dice: i32 = self.hit_dice.iter().map(|hd| hd.count).sum();
        let from_dice: i32 = self.hit_dice.iter().map(HitDice::expected).sum();
        from_dice + constitution_modifier * total_dice + self.max_hit_points_bonus.score()
    }

    pub fn damage_taken(&self) -> i32 {
        self.damage_taken
    }

    pub fn current_hp(&self, constitution_modifier: i32) -> i32 {
        (self.max_hp(constitution_modifier) - self.damage_taken).max(0)
    }

    pub fn temp_hp(&self) -> i32 {
        self.temporary_hit_points.score()
    }

    /// 5e temp HP does not stack: the new amount replaces the pool only if
    /// it is larger than what's already there.
    pub fn add_temp_hp(&mut self, amount: i32) {
        if amount > self.temp_hp() {
            self.set_temp_hp(amount);
        }
    }

    fn set_temp_hp(&mut self, new_total: i32) {
        if let Some(id) = self.temp_hp_modifier_id.take() {
            self.temporary_hit_points.remove_modifier(id);
        }
        if new_total > 0 {
            let owner = self.entity_id;
            let id = self
                .temporary_hit_points
                .add_self_modifier(Modifier::numerical(owner, owner, "pool", new_total))
                .expect("self modifier targeting the owning entity always validates");
            self.temp_hp_modifier_id = Some(id);
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.damage_taken = (self.damage_taken - amount).max(0);
    }

    /// Apply one incoming damage roll through the ordered pipeline:
    /// resistance/immunity/vulnerability, flat reduction, temp HP
    /// absorption, then HP.
    pub fn apply_damage(&mut self, damage_type: DamageType, amount: i32) -> DamageApplication {
        let resistance = self.damage_reduction.resistance_state(damage_type);
        let post_resistance = scale_by_resistance(amount, resistance);

        let flat_reduction = self.damage_reduction.score().max(0);
        let post_reduction = (post_resistance - flat_reduction).max(0);

        let temp_hp = self.temp_hp();
        let absorbed = temp_hp.min(post_reduction);
        self.set_temp_hp(temp_hp - absorbed);

        let applied_to_hp = post_reduction - absorbed;
        self.damage_taken += applied_to_hp;

        DamageApplication {
            post_resistance,
            post_reduction,
            absorbed_by_temp_hp: absorbed,
            applied_to_hp,
        }
    }
}

fn scale_by_resistance(amount: i32, state: ResistanceState) -> i32 {
    match state {
        ResistanceState::Immunity => 0,
        ResistanceState::Resistance => amount.div_euclid(2),
        ResistanceState::Vulnerability => amount * 2,
        ResistanceState::None => amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_hp_sums_hit_dice_and_constitution() {
        let entity = EntityId::new();
        let health = Health::new(
            entity,
            vec![HitDice::new(8, 3, HitDiceMode::Average)],
        );
        // 3d8 average = 3*5 = 15, plus CON mod 2 per die = 6.
        assert_eq!(health.max_hp(2), 21);
    }

    #[test]
    fn set_hit_dice_replaces_an_empty_starting_pool() {
        let entity = EntityId::new();
        let mut health = Health::new(entity, Vec::new());
        assert_eq!(health.max_hp(0), 0);
        health.set_hit_dice(vec![HitDice::new(6, 2, HitDiceMode::Maximums)]);
        assert_eq!(health.max_hp(0), 12);
    }

    #[test]
    fn immunity_blocks_all_damage() {
        let entity = EntityId::new();
        let mut health = Health::new(entity, vec![HitDice::new(10, 2, HitDiceMode::Maximums)]);
        health
            .damage_reduction_mut()
            .add_self_modifier(Modifier::new(
                entity,
                entity,
                "fire immunity",
                crate::modifier::ModifierKind::Resistance {
                    damage_type: DamageType::Fire,
                    state: ResistanceState::Immunity,
                },
            ))
            .unwrap();
        health.apply_damage(DamageType::Fire, 999);
        assert_eq!(health.damage_taken(), 0);
    }

    #[test]
    fn resistance_and_temp_hp_combine() {
        let entity = EntityId::new();
        let mut health = Health::new(entity, vec![HitDice::new(10, 4, HitDiceMode::Maximums)]);
        health
            .damage_reduction_mut()
            .add_self_modifier(Modifier::new(
                entity,
                entity,
                "fire resistance",
                crate::modifier::ModifierKind::Resistance {
                    damage_type: DamageType::Fire,
                    state: ResistanceState::Resistance,
                },
            ))
            .unwrap();
        health.add_temp_hp(5);

        let result = health.apply_damage(DamageType::Fire, 12);
        assert_eq!(result.post_resistance, 6);
        assert_eq!(result.absorbed_by_temp_hp, 5);
        assert_eq!(result.applied_to_hp, 1);
        assert_eq!(health.temp_hp(), 0);
        assert_eq!(health.damage_taken(), 1);
    }

    #[test]
    fn temp_hp_does_not_stack_below_existing_pool() {
        let entity = EntityId::new();
        let mut health = Health::new(entity, vec![HitDice::new(6, 1, HitDiceMode::Average)]);
        health.add_temp_hp(10);
        health.add_temp_hp(4);
        assert_eq!(health.temp_hp(), 10);
        health.add_temp_hp(15);
        assert_eq!(health.temp_hp(), 15);
    }

    #[test]
    fn healing_never_goes_below_zero_damage_taken() {
        let entity = EntityId::new();
        let mut health = Health::new(entity, vec![HitDice::new(6, 1, HitDiceMode::Average)]);
        health.heal(100);
        assert_eq!(health.damage_taken(), 0);
    }
}
