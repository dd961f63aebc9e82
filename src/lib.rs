//! # bst-hashtable
//!
//! A fixed-size hash table whose collision chains are unbalanced binary
//! search trees. Every node caches its depth ("level") in its bucket's tree,
//! and removal repairs those levels only in the one subtree that moves.
//!
//! Keys are handled exclusively through a [`KeyStrategy`]; the table never
//! inspects a key itself. Membership is observable only through the
//! [`Outcome`] of `insert` and `remove`.
//!
//! ## Example
//!
//! ```rust
//! use bst_hashtable::{FnStrategy, Outcome, Table};
//!
//! let strategy = FnStrategy::new(
//!     |k: &u32| *k,
//!     |k, w| (*k as usize) & ((1 << w) - 1),
//!     |a, b| a.cmp(b),
//!     drop,
//!     |k, out| write!(out, "{k}"),
//! );
//! let mut table = Table::new(strategy, 2);
//! for k in [1, 5, 3, 9] {
//!     assert_eq!(table.insert(&k), Outcome::Success);
//! }
//! assert_eq!(table.insert(&5), Outcome::AlreadyStored);
//! assert_eq!(
//!     table.dump().to_string(),
//!     "0: []\n1: [0-1,1-5,2-9]\n2: []\n3: [0-3]\n"
//! );
//! ```

mod bucket;
mod config;
mod strategy;

pub use config::Config;
pub use strategy::{FnStrategy, KeyStrategy, OrdStrategy};

use bucket::Bucket;
use std::fmt;
use std::io;

/// Result of a membership-changing operation.
#[must_use]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Membership changed as requested.
    Success = 0,
    /// `insert` found an equal key; nothing was stored.
    AlreadyStored = 1,
    /// `remove` found no equal key; nothing was removed.
    NotStored = 2,
}

impl Outcome {
    #[inline(always)]
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl From<Outcome> for u8 {
    fn from(val: Outcome) -> Self {
        val as u8
    }
}

pub struct Table<S: KeyStrategy> {
    slots: Vec<Option<Bucket<S::Key>>>,
    bit_width: u32,
    len: usize,
    strategy: S,
}

impl<S: KeyStrategy> Table<S> {
    /// Table with `2^bit_width` slots. Panics unless `0 < bit_width < usize::BITS`.
    pub fn new(strategy: S, bit_width: u32) -> Self {
        Config::new(strategy, bit_width).create()
    }

    pub(crate) fn from_config(config: Config<S>) -> Self {
        let slot_count = config.slot_count();
        let mut slots = Vec::with_capacity(slot_count);
        slots.resize_with(slot_count, || None);
        log::debug!("Created table with {slot_count} slots (bit width {})", config.bit_width);

        Table {
            slots,
            bit_width: config.bit_width,
            len: 0,
            strategy: config.strategy,
        }
    }

    #[inline(always)]
    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    #[inline(always)]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots that have materialized a bucket.
    pub fn bucket_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[inline(always)]
    fn slot_of(&self, key: &S::Key) -> usize {
        let index = self.strategy.hash(key, self.bit_width);
        assert!(
            index < self.slots.len(),
            "hash returned slot {index}, table has {} slots",
            self.slots.len()
        );
        index
    }

    /// Stores a clone of `key` unless an equal key is already present.
    pub fn insert(&mut self, key: &S::Key) -> Outcome {
        let index = self.slot_of(key);
        let bucket = self.slots[index].get_or_insert_with(|| {
            log::trace!("Materialized bucket for slot {index}");
            Bucket::new()
        });
        let outcome = bucket.insert(key, &self.strategy);
        if outcome.is_success() {
            self.len += 1;
            log::trace!("Inserted key into slot {index}");
        }
        outcome
    }

    /// Removes the stored key equal to `key`, destroying the table's copy.
    pub fn remove(&mut self, key: &S::Key) -> Outcome {
        let index = self.slot_of(key);
        let Some(bucket) = &mut self.slots[index] else {
            return Outcome::NotStored;
        };
        let outcome = bucket.remove(key, &self.strategy);
        if outcome.is_success() {
            self.len -= 1;
            log::trace!("Removed key from slot {index}");
        }
        outcome
    }

    /// Display adapter rendering one `"{slot}: [{level}-{key},...]"` line per slot.
    pub fn dump(&self) -> Dump<'_, S> {
        Dump(self)
    }

    pub fn print(&self) {
        print!("{}", self.dump());
    }

    pub fn print_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self.dump())
    }

    /// Tears the table down, destroying every stored key exactly once.
    ///
    /// Dropping the table has the same effect.
    pub fn destroy(self) {
        drop(self);
    }
}

impl<S: KeyStrategy> Drop for Table<S> {
    fn drop(&mut self) {
        let mut released = 0;
        for slot in self.slots.iter_mut() {
            if let Some(bucket) = slot.take() {
                released += bucket.destroy(&self.strategy);
            }
        }
        self.len = 0;
        log::debug!("Destroyed table with {} slots, released {released} keys", self.slots.len());
    }
}

pub struct Dump<'a, S: KeyStrategy>(&'a Table<S>);

impl<S: KeyStrategy> fmt::Display for Dump<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0;
        for (index, slot) in table.slots.iter().enumerate() {
            write!(f, "{index}: [")?;
            if let Some(bucket) = slot {
                bucket.fmt_entries(&table.strategy, f)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod proptests;

include!("tests.rs");
