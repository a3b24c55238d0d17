//! The Block aggregation layer: semantic groupings of `ModifiableValue`s
//! that share an owning entity and propagate target/context changes to
//! every value they contain atomically.

mod ability;
mod action_economy;
mod saving_throw;
mod skill;

pub use ability::AbilityBlock;
pub use action_economy::ActionEconomyBlock;
pub use saving_throw::SavingThrowBlock;
pub use skill::SkillBlock;

use crate::ids::EntityId;
use crate::modifier::RollContext;
use crate::value::ModifiableValue;

/// Set every value's current target/context in lockstep, the propagation
/// invariant every concrete block relies on.
pub(crate) fn propagate_target<'a>(
    values: impl Iterator<Item = &'a mut ModifiableValue>,
    target: Option<EntityId>,
    context: &RollContext,
) {
    for value in values {
        value.set_target(target, context.clone());
    }
}
