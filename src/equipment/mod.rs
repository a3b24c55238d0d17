//! `EquipmentBlock`: fixed equipment slots, equip/unequip with slot
//! compatibility validation, and rewiring of an item's bonuses into the
//! wearer's AC/attack/damage `ModifiableValue`s.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::ids::{EntityId, ModifierId};
use crate::modifier::Modifier;
use crate::value::ModifiableValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Head,
    Body,
    Hands,
    Legs,
    Feet,
    Amulet,
    RingLeft,
    RingRight,
    Cloak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Weapon { two_handed: bool },
    Shield,
    Armor,
    Accessory,
}

#[derive(Debug, Clone)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    pub ac_bonus: Option<i32>,
    pub attack_bonus: Option<i32>,
    pub damage_bonus: Option<i32>,
}

impl Item {
    pub fn weapon(name: impl Into<String>, two_handed: bool) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Weapon { two_handed },
            ac_bonus: None,
            attack_bonus: None,
            damage_bonus: None,
        }
    }

    pub fn shield(name: impl Into<String>, ac_bonus: i32) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Shield,
            ac_bonus: Some(ac_bonus),
            attack_bonus: None,
            damage_bonus: None,
        }
    }

    pub fn armor(name: impl Into<String>, ac_bonus: i32) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Armor,
            ac_bonus: Some(ac_bonus),
            attack_bonus: None,
            damage_bonus: None,
        }
    }
}

fn slot_compatible(slot: EquipmentSlot, kind: ItemKind) -> bool {
    use EquipmentSlot::*;
    use ItemKind::*;
    matches!(
        (slot, kind),
        (MainHand, Weapon { .. })
            | (OffHand, Weapon { two_handed: false })
            | (OffHand, Shield)
            | (Head | Body | Hands | Legs | Feet, Armor)
            | (Amulet | RingLeft | RingRight | Cloak, Accessory)
    )
}

#[derive(Debug, Clone)]
pub struct EquipmentBlock {
    entity_id: EntityId,
    slots: HashMap<EquipmentSlot, Item>,
    installed_modifiers: HashMap<EquipmentSlot, Vec<ModifierId>>,
    armor_class: ModifiableValue,
    main_hand_attack_bonus: ModifiableValue,
    main_hand_damage_bonus: ModifiableValue,
    off_hand_attack_bonus: ModifiableValue,
    off_hand_damage_bonus: ModifiableValue,
}

impl EquipmentBlock {
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            slots: HashMap::new(),
            installed_modifiers: HashMap::new(),
            armor_class: ModifiableValue::new(entity_id, "Armor Class"),
            main_hand_attack_bonus: ModifiableValue::new(entity_id, "Main Hand Attack Bonus"),
            main_hand_damage_bonus: ModifiableValue::new(entity_id, "Main Hand Damage Bonus"),
            off_hand_attack_bonus: ModifiableValue::new(entity_id, "Off Hand Attack Bonus"),
            off_hand_damage_bonus: ModifiableValue::new(entity_id, "Off Hand Damage Bonus"),
        }
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn armor_class(&self) -> &ModifiableValue {
        &self.armor_class
    }

    pub fn armor_class_mut(&mut self) -> &mut ModifiableValue {
        &mut self.armor_class
    }

    pub fn attack_bonus(&self, slot: EquipmentSlot) -> Option<&ModifiableValue> {
        match slot {
            EquipmentSlot::MainHand => Some(&self.main_hand_attack_bonus),
            EquipmentSlot::OffHand => Some(&self.off_hand_attack_bonus),
            _ => None,
        }
    }

    pub fn damage_bonus(&self, slot: EquipmentSlot) -> Option<&ModifiableValue> {
        match slot {
            EquipmentSlot::MainHand => Some(&self.main_hand_damage_bonus),
            EquipmentSlot::OffHand => Some(&self.off_hand_damage_bonus),
            _ => None,
        }
    }

    pub fn is_occupied(&self, slot: EquipmentSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    fn attack_value_mut(&mut self, slot: EquipmentSlot) -> Option<&mut ModifiableValue> {
        match slot {
            EquipmentSlot::MainHand => Some(&mut self.main_hand_attack_bonus),
            EquipmentSlot::OffHand => Some(&mut self.off_hand_attack_bonus),
            _ => None,
        }
    }

    fn damage_value_mut(&mut self, slot: EquipmentSlot) -> Option<&mut ModifiableValue> {
        match slot {
            EquipmentSlot::MainHand => Some(&mut self.main_hand_damage_bonus),
            EquipmentSlot::OffHand => Some(&mut self.off_hand_damage_bonus),
            _ => None,
        }
    }

    /// Equip `item` into `slot`. If the slot is occupied, `force` controls
    /// whether the current occupant is displaced (otherwise a precondition
    /// error is returned). Equipping a two-handed weapon to the main hand
    /// also vacates the off hand.
    pub fn equip(&mut self, slot: EquipmentSlot, item: Item, force: bool) -> EngineResult<()> {
        if !slot_compatible(slot, item.kind) {
            return Err(EngineError::validation(format!(
                "{:?} cannot be equipped in {slot:?}",
                item.kind
            )));
        }
        if self.is_occupied(slot) {
            if !force {
                return Err(EngineError::precondition(format!("{slot:?} is already occupied")));
            }
            self.unequip(slot)?;
        }
        if slot == EquipmentSlot::MainHand
            && matches!(item.kind, ItemKind::Weapon { two_handed: true })
            && self.is_occupied(EquipmentSlot::OffHand)
        {
            self.unequip(EquipmentSlot::OffHand)?;
        }

        let owner = self.entity_id;
        let mut installed = Vec::new();
        if let Some(ac) = item.ac_bonus {
            let id = self
                .armor_class
                .add_self_modifier(Modifier::numerical(owner, owner, item.name.clone(), ac))?;
            installed.push(id);
        }
        if let Some(bonus) = item.attack_bonus {
            if let Some(value) = self.attack_value_mut(slot) {
                installed.push(value.add_self_modifier(Modifier::numerical(owner, owner, item.name.clone(), bonus))?);
            }
        }
        if let Some(bonus) = item.damage_bonus {
            if let Some(value) = self.damage_value_mut(slot) {
                installed.push(value.add_self_modifier(Modifier::numerical(owner, owner, item.name.clone(), bonus))?);
            }
        }

        self.installed_modifiers.insert(slot, installed);
        self.slots.insert(slot, item);
        Ok(())
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> EngineResult<Item> {
        let item = self
            .slots
            .remove(&slot)
            .ok_or_else(|| EngineError::precondition(format!("{slot:?} is empty")))?;

        if let Some(ids) = self.installed_modifiers.remove(&slot) {
            for id in ids {
                self.armor_class.remove_modifier(id);
                if let Some(value) = self.attack_value_mut(slot) {
                    value.remove_modifier(id);
                }
                if let Some(value) = self.damage_value_mut(slot) {
                    value.remove_modifier(id);
                }
            }
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equipping_armor_and_shield_sums_ac() {
        let entity = EntityId::new();
        let mut equipment = EquipmentBlock::new(entity);
        equipment
            .equip(EquipmentSlot::Body, Item::armor("Chain Mail", 16), false)
            .unwrap();
        equipment
            .equip(EquipmentSlot::OffHand, Item::shield("Shield", 2), false)
            .unwrap();
        assert_eq!(equipment.armor_class().score(), 18);
    }

    #[test]
    fn shield_rejected_in_main_hand() {
        let entity = EntityId::new();
        let mut equipment = EquipmentBlock::new(entity);
        let err = equipment
            .equip(EquipmentSlot::MainHand, Item::shield("Shield", 2), false)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
    }

    #[test]
    fn occupied_slot_without_force_is_a_precondition_error() {
        let entity = EntityId::new();
        let mut equipment = EquipmentBlock::new(entity);
        equipment
            .equip(EquipmentSlot::MainHand, Item::weapon("Longsword", false), false)
            .unwrap();
        let err = equipment
            .equip(EquipmentSlot::MainHand, Item::weapon("Dagger", false), false)
            .unwrap_err();
        assert!(matches!(err, EngineError::Precondition { .. }));
    }

    #[test]
    fn two_handed_weapon_vacates_off_hand() {
        let entity = EntityId::new();
        let mut equipment = EquipmentBlock::new(entity);
        equipment
            .equip(EquipmentSlot::OffHand, Item::shield("Shield", 2), false)
            .unwrap();
        equipment
            .equip(EquipmentSlot::MainHand, Item::weapon("Greatsword", true), false)
            .unwrap();
        assert!(!equipment.is_occupied(EquipmentSlot::OffHand));
        assert_eq!(equipment.armor_class().score(), 0);
    }

    #[test]
    fn unequipping_empty_slot_is_a_precondition_error() {
        let entity = EntityId::new();
        let mut equipment = EquipmentBlock::new(entity);
        let err = equipment.unequip(EquipmentSlot::Feet).unwrap_err();
        assert!(matches!(err, EngineError::Precondition { .. }));
    }

    #[test]
    fn unequip_removes_its_ac_contribution() {
        let entity = EntityId::new();
        let mut equipment = EquipmentBlock::new(entity);
        equipment
            .equip(EquipmentSlot::Body, Item::armor("Chain Mail", 16), false)
            .unwrap();
        equipment.unequip(EquipmentSlot::Body).unwrap();
        assert_eq!(equipment.armor_class().score(), 0);
    }
}
