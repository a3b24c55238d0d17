//! Stable identifiers for every independently-addressable object kind.
//!
//! Each id family wraps a `Uuid` in its own newtype so a `ValueId` and a
//! `ConditionId` can't be swapped by accident at a call site.

use std::fmt;

use uuid::Uuid;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(EntityId);
id_type!(ValueId);
id_type!(BlockId);
id_type!(ConditionId);
id_type!(RollId);
id_type!(ModifierId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_stable() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
        assert_eq!(a, a);
        assert_eq!(a.to_string().len(), 36);
    }
}
