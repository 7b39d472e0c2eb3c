//! Component presence masks.
//!
//! Every live entity carries a [`ComponentMask`] recording which component
//! types are currently attached to it. Each registered component type is
//! assigned a [`ComponentIndex`] — a bit position — at registration time.
//! The bit width is a checked configuration constant: registering more
//! than [`MAX_COMPONENT_TYPES`] distinct types fails fast instead of
//! silently overflowing.

/// Maximum number of distinct component types one manager can register.
pub const MAX_COMPONENT_TYPES: usize = 64;

/// The bit position assigned to one registered component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentIndex(u8);

impl ComponentIndex {
    /// Create an index, failing fast when the type ceiling is exceeded.
    ///
    /// # Panics
    ///
    /// Panics if `index >= MAX_COMPONENT_TYPES`.
    #[must_use]
    pub fn new(index: usize) -> Self {
        assert!(
            index < MAX_COMPONENT_TYPES,
            "component type ceiling exceeded: {index} >= {MAX_COMPONENT_TYPES}"
        );
        Self(index as u8)
    }

    /// Returns the raw bit position.
    #[must_use]
    pub const fn bit(self) -> u8 {
        self.0
    }
}

/// A fixed-size bitset over registered component types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentMask(u64);

impl ComponentMask {
    /// The empty mask.
    pub const EMPTY: ComponentMask = ComponentMask(0);

    /// Sets the bit for `index`.
    pub fn set(&mut self, index: ComponentIndex) {
        self.0 |= 1 << index.bit();
    }

    /// Clears the bit for `index`.
    pub fn clear(&mut self, index: ComponentIndex) {
        self.0 &= !(1 << index.bit());
    }

    /// Returns `true` if the bit for `index` is set.
    #[must_use]
    pub const fn contains(self, index: ComponentIndex) -> bool {
        self.0 & (1 << index.bit()) != 0
    }

    /// Returns `true` if this mask is a superset of `other` — the query
    /// signature test.
    #[must_use]
    pub const fn contains_all(self, other: ComponentMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no bits are set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Builder-style variant of [`ComponentMask::set`].
    #[must_use]
    pub fn with(mut self, index: ComponentIndex) -> Self {
        self.set(index);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let idx = ComponentIndex::new(3);
        let mut mask = ComponentMask::EMPTY;
        assert!(!mask.contains(idx));

        mask.set(idx);
        assert!(mask.contains(idx));
        assert!(!mask.is_empty());

        mask.clear(idx);
        assert!(!mask.contains(idx));
        assert!(mask.is_empty());
    }

    #[test]
    fn test_contains_all_superset() {
        let a = ComponentIndex::new(0);
        let b = ComponentIndex::new(1);
        let c = ComponentIndex::new(2);

        let entity_mask = ComponentMask::EMPTY.with(a).with(b).with(c);
        let signature = ComponentMask::EMPTY.with(a).with(c);

        assert!(entity_mask.contains_all(signature));
        assert!(!signature.contains_all(entity_mask));
        assert!(entity_mask.contains_all(ComponentMask::EMPTY));
    }

    #[test]
    fn test_highest_valid_index() {
        let idx = ComponentIndex::new(MAX_COMPONENT_TYPES - 1);
        let mask = ComponentMask::EMPTY.with(idx);
        assert!(mask.contains(idx));
    }

    #[test]
    #[should_panic(expected = "component type ceiling exceeded")]
    fn test_index_ceiling_is_checked() {
        let _ = ComponentIndex::new(MAX_COMPONENT_TYPES);
    }
}
