//! Stamp storage for an editing session.
//!
//! The store is an ordered, index-addressable sequence with copy-on-write
//! sharing: cloning a store is cheap, and a later edit on one copy never
//! shows through the other. Sessions rely on this to stage an edit,
//! re-segment, and only then commit.

use std::sync::Arc;

use crate::error::{HoleMatchError, Result};
use crate::{Loc, Stamp};

/// Ordered stamps of one round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StampStore {
    stamps: Arc<Vec<Stamp>>,
}

impl StampStore {
    /// Create a new empty stamp store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stamps(stamps: Vec<Stamp>) -> Self {
        Self {
            stamps: Arc::new(stamps),
        }
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn as_slice(&self) -> &[Stamp] {
        &self.stamps
    }

    /// Insert a stamp so that it ends up at `index` (`0..=len`).
    pub fn insert(&mut self, index: usize, stamp: Stamp) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(HoleMatchError::IndexOutOfRange { index, len });
        }
        Arc::make_mut(&mut self.stamps).insert(index, stamp);
        Ok(())
    }

    /// Remove and return the stamp at `index` (`0..len`).
    pub fn remove(&mut self, index: usize) -> Result<Stamp> {
        self.check_index(index)?;
        Ok(Arc::make_mut(&mut self.stamps).remove(index))
    }

    /// Replace the location of the stamp at `index`, keeping its disc.
    pub fn set_loc(&mut self, index: usize, loc: Loc) -> Result<()> {
        self.check_index(index)?;
        Arc::make_mut(&mut self.stamps)[index].loc = loc;
        Ok(())
    }

    /// Replace the whole stamp at `index`.
    pub fn replace(&mut self, index: usize, stamp: Stamp) -> Result<Stamp> {
        self.check_index(index)?;
        Ok(std::mem::replace(
            &mut Arc::make_mut(&mut self.stamps)[index],
            stamp,
        ))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(HoleMatchError::IndexOutOfRange { index, len });
        }
        Ok(())
    }
}

impl From<Vec<Stamp>> for StampStore {
    fn from(stamps: Vec<Stamp>) -> Self {
        Self::from_stamps(stamps)
    }
}
