//! Lightweight handles into a program.
//!
//! Handles are plain indices; the program that issued them owns all backing
//! storage. A handle stays valid for the lifetime of that program because
//! variables and constraints are never removed individually.

macro_rules! define_id_type {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Get the inner u32 value.
            pub fn inner(self) -> u32 {
                self.0
            }

            /// Create an ID from a u32 value.
            pub fn new(value: u32) -> Self {
                Self(value)
            }

            /// Position of the handle in engine order.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

define_id_type!(VariableId, "x");
define_id_type!(ConstraintId, "c");

#[cfg(test)]
mod tests {
    use super::{ConstraintId, VariableId};

    #[test]
    fn variable_id_roundtrip() {
        let id = VariableId::new(7);
        assert_eq!(id.inner(), 7);
        assert_eq!(id.index(), 7);
    }

    #[test]
    fn constraint_id_roundtrip() {
        let id = ConstraintId::new(11);
        assert_eq!(id.inner(), 11);
    }

    #[test]
    fn display_uses_short_prefix() {
        assert_eq!(VariableId::new(3).to_string(), "x3");
        assert_eq!(ConstraintId::new(0).to_string(), "c0");
    }
}
