use core::fmt;
use core::marker::PhantomData;
use core::num::NonZeroU32;

/// Compact, stable identifier used across the editor stores.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Types that can be minted from a raw allocation index.
pub trait FromIndex: Copy {
    fn from_index(index: u32) -> Self;
}

impl FromIndex for Id {
    fn from_index(index: u32) -> Self {
        Id::from_index(index)
    }
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(Id);

        impl $name {
            /// Prefix used by the `Display` form.
            pub const PREFIX: &'static str = $prefix;

            pub fn from_index(index: u32) -> Self {
                Self(Id::from_index(index))
            }

            pub fn index(self) -> u32 {
                self.0.index()
            }
        }

        impl FromIndex for $name {
            fn from_index(index: u32) -> Self {
                $name::from_index(index)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", Self::PREFIX, self.index())
            }
        }
    };
}

typed_id!(
    /// Identity of a placed block instance (distinct from its block type).
    BlockId,
    "blk"
);
typed_id!(
    /// Identity of a port-to-port connection.
    ConnectionId,
    "conn"
);
typed_id!(
    /// Identity of an imported dataset.
    DatasetId,
    "ds"
);

/// Monotonic id allocator.
///
/// Every call hands out the next index, so ids are never reused inside one
/// store, even after deletions or many allocations in the same instant.
#[derive(Debug)]
pub struct IdAllocator<T> {
    next: u32,
    _marker: PhantomData<T>,
}

impl<T> Default for IdAllocator<T> {
    fn default() -> Self {
        Self {
            next: 0,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for IdAllocator<T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            _marker: PhantomData,
        }
    }
}

impl<T: FromIndex> IdAllocator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id.
    pub fn allocate(&mut self) -> T {
        let id = T::from_index(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<BlockId>(),
            core::mem::size_of::<Option<BlockId>>()
        );
    }

    #[test]
    fn typed_display_uses_prefix() {
        assert_eq!(BlockId::from_index(3).to_string(), "blk-3");
        assert_eq!(ConnectionId::from_index(0).to_string(), "conn-0");
        assert_eq!(DatasetId::from_index(7).to_string(), "ds-7");
    }

    #[test]
    fn allocator_never_repeats() {
        let mut alloc: IdAllocator<BlockId> = IdAllocator::new();
        let ids: HashSet<BlockId> = (0..1000).map(|_| alloc.allocate()).collect();
        assert_eq!(ids.len(), 1000);
        assert_eq!(alloc.issued(), 1000);
    }
}
