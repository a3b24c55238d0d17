//! Tagged modifier variants: the atomic, immutable effect record that every
//! value and roll is built from.
//!
//! A modifier needs to carry more than a number (advantage state, critical
//! state, auto-hit state, resistance state, ...) and needs to carry who
//! produced it and who it acts on, so `Modifier` is a small tagged union
//! (`ModifierKind`) wrapped in an envelope of identity fields, dispatched
//! by `match` rather than by subclassing.

mod contextual;

pub use contextual::{ContextualModifier, ModifierFn, RollContext};

use std::fmt;

use crate::enums::{DamageType, Size};
use crate::ids::{EntityId, ModifierId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvantageState {
    None,
    Advantage,
    Disadvantage,
}

impl AdvantageState {
    pub fn numeric(self) -> i32 {
        match self {
            AdvantageState::None => 0,
            AdvantageState::Advantage => 1,
            AdvantageState::Disadvantage => -1,
        }
    }

    /// Collapse a sum of advantage/disadvantage contributions: positive
    /// nets to Advantage, negative to Disadvantage, zero cancels out.
    pub fn from_sum(sum: i32) -> Self {
        if sum > 0 {
            AdvantageState::Advantage
        } else if sum < 0 {
            AdvantageState::Disadvantage
        } else {
            AdvantageState::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalState {
    None,
    AutoCrit,
    NoCrit,
}

impl CriticalState {
    /// NoCrit dominates AutoCrit dominates None.
    pub fn combine(states: impl Iterator<Item = CriticalState>) -> Self {
        let mut best = CriticalState::None;
        for state in states {
            match state {
                CriticalState::NoCrit => return CriticalState::NoCrit,
                CriticalState::AutoCrit => best = CriticalState::AutoCrit,
                CriticalState::None => {}
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoHitState {
    None,
    AutoHit,
    AutoMiss,
}

impl AutoHitState {
    /// AutoMiss dominates AutoHit dominates None.
    pub fn combine(states: impl Iterator<Item = AutoHitState>) -> Self {
        let mut best = AutoHitState::None;
        for state in states {
            match state {
                AutoHitState::AutoMiss => return AutoHitState::AutoMiss,
                AutoHitState::AutoHit => best = AutoHitState::AutoHit,
                AutoHitState::None => {}
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResistanceState {
    None,
    Resistance,
    Immunity,
    Vulnerability,
}

impl ResistanceState {
    /// Resistance = +1, Immunity = +2, Vulnerability = -1, None = 0.
    pub fn weight(self) -> i32 {
        match self {
            ResistanceState::None => 0,
            ResistanceState::Resistance => 1,
            ResistanceState::Immunity => 2,
            ResistanceState::Vulnerability => -1,
        }
    }

    /// Classify a summed weight. Immunity beats resistance beats vulnerability;
    /// a resistance and a vulnerability on the same type cancel to None, the
    /// standard 5e interaction.
    pub fn from_weight(sum: i32) -> Self {
        if sum >= 2 {
            ResistanceState::Immunity
        } else if sum == 1 {
            ResistanceState::Resistance
        } else if sum == 0 {
            ResistanceState::None
        } else {
            ResistanceState::Vulnerability
        }
    }

    pub fn damage_multiplier(self) -> f32 {
        match self {
            ResistanceState::None => 1.0,
            ResistanceState::Resistance => 0.5,
            ResistanceState::Immunity => 0.0,
            ResistanceState::Vulnerability => 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModifierKind {
    Numerical { value: i32 },
    Advantage { state: AdvantageState },
    Critical { state: CriticalState },
    AutoHit { state: AutoHitState },
    Size { value: Size },
    DamageType { value: DamageType },
    Resistance {
        damage_type: DamageType,
        state: ResistanceState,
    },
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierKind::Numerical { value } => {
                let sign = if *value >= 0 { "+" } else { "" };
                write!(f, "{sign}{value}")
            }
            ModifierKind::Advantage { state } => write!(f, "{state:?}"),
            ModifierKind::Critical { state } => write!(f, "{state:?}"),
            ModifierKind::AutoHit { state } => write!(f, "{state:?}"),
            ModifierKind::Size { value } => write!(f, "{value:?}"),
            ModifierKind::DamageType { value } => write!(f, "{value}"),
            ModifierKind::Resistance { damage_type, state } => {
                write!(f, "{state:?} ({damage_type})")
            }
        }
    }
}

/// An immutable atomic effect record. Carries who produced it and who it
/// acts on; the payload is one of `ModifierKind`'s variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub id: ModifierId,
    pub source_entity_id: EntityId,
    pub target_entity_id: EntityId,
    pub label: String,
    pub kind: ModifierKind,
}

impl Modifier {
    pub fn new(
        source_entity_id: EntityId,
        target_entity_id: EntityId,
        label: impl Into<String>,
        kind: ModifierKind,
    ) -> Self {
        Self {
            id: ModifierId::new(),
            source_entity_id,
            target_entity_id,
            label: label.into(),
            kind,
        }
    }

    pub fn numerical(
        source_entity_id: EntityId,
        target_entity_id: EntityId,
        label: impl Into<String>,
        value: i32,
    ) -> Self {
        Self::new(
            source_entity_id,
            target_entity_id,
            label,
            ModifierKind::Numerical { value },
        )
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.label)
    }
}
