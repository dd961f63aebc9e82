use crate::strategy::KeyStrategy;
use crate::Table;

/// Creation-time configuration of a [`Table`].
///
/// The slot count is `2^bit_width` and never changes afterwards.
pub struct Config<S> {
    pub(crate) strategy: S,
    pub(crate) bit_width: u32,
}

impl<S: KeyStrategy> Config<S> {
    /// Panics unless `0 < bit_width < usize::BITS`.
    pub fn new(strategy: S, bit_width: u32) -> Self {
        assert!(bit_width > 0, "bit_width must be positive");
        assert!(
            bit_width < usize::BITS,
            "bit_width {bit_width} exceeds the addressable slot count"
        );
        Config { strategy, bit_width }
    }

    #[inline(always)]
    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    #[inline(always)]
    pub fn slot_count(&self) -> usize {
        1usize << self.bit_width
    }

    pub fn create(self) -> Table<S> {
        Table::from_config(self)
    }
}
