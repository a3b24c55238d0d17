//! The Modifiable Value system: the layered, id-addressable container every
//! block attribute (ability scores, AC, attack rolls, damage rolls, ...) is
//! built from.

mod contextual_value;
mod modifiable_value;
mod static_value;

pub use contextual_value::ContextualValue;
pub use modifiable_value::ModifiableValue;
pub use static_value::{clamp_with_min_floor, StaticValue};
