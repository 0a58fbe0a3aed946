//! # Round Editing Session
//!
//! A [`RoundSession`] exclusively owns everything one round edit needs:
//! the course, the segmentation thresholds, the stamps and the derived
//! round table.
//!
//! ## Architecture
//!
//! - `StampStore` - Ordered, copy-on-write stamp sequence
//! - `RoundSummary` - Per-hole scoring of the derived table
//!
//! The table is never patched. Every edit stages a new stamp sequence,
//! re-runs segmentation and backfill over all of it, and commits stamps and
//! table together. A failed edit leaves the session as it was.

pub mod stamp_store;
pub mod summary;

pub use stamp_store::StampStore;
pub use summary::{HoleSummary, RoundSummary};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::course::Course;
use crate::error::{HoleMatchError, Result};
use crate::segment::{SegmentConfig, process_stamps};
use crate::{Loc, RoundRow, Stamp};
use summary::blocks;

/// Persisted form of a segmented round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub round_id: String,
    pub course_id: String,
    pub course_name: String,
    pub round_data: Vec<RoundRow>,
    #[serde(default)]
    pub notes: String,
}

/// Editing session for a single round.
#[derive(Debug, Clone)]
pub struct RoundSession {
    course: Course,
    config: SegmentConfig,
    stamps: StampStore,
    rows: Vec<RoundRow>,
}

impl RoundSession {
    /// Create a session with default thresholds and segment the stamps.
    pub fn new(course: Course, stamps: Vec<Stamp>) -> Result<Self> {
        Self::with_config(course, stamps, SegmentConfig::default())
    }

    /// Create a session with custom thresholds and segment the stamps.
    pub fn with_config(course: Course, stamps: Vec<Stamp>, config: SegmentConfig) -> Result<Self> {
        let stamps = StampStore::from_stamps(stamps);
        let rows = process_stamps(stamps.as_slice(), &course, &config)?;
        info!(
            "[session] course {}: {} stamps segmented",
            course.id,
            stamps.len()
        );
        Ok(Self {
            course,
            config,
            stamps,
            rows,
        })
    }

    /// Rebuild a session from a previously persisted round table.
    ///
    /// Only each row's location and disc are kept; holes, tees and pins are
    /// derived again.
    pub fn from_rows(course: Course, rows: &[RoundRow], config: SegmentConfig) -> Result<Self> {
        let stamps = rows.iter().map(RoundRow::stamp).collect();
        Self::with_config(course, stamps, config)
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    pub fn stamps(&self) -> &[Stamp] {
        self.stamps.as_slice()
    }

    /// The current round table.
    pub fn rows(&self) -> &[RoundRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// Insert a stamp with an undefined disc at `index` (`0..=len`).
    ///
    /// Fails with `InvalidLocation` for a location outside lat/lon range.
    pub fn insert(&mut self, index: usize, loc: Loc) -> Result<()> {
        loc.ensure_valid()?;
        let mut staged = self.stamps.clone();
        staged.insert(index, Stamp::undefined(loc))?;
        self.commit(staged)?;
        debug!("[session] inserted stamp at {}", index);
        Ok(())
    }

    /// Delete the stamp at `index` (`0..len`) and return it.
    ///
    /// Deleting the only stamp fails and leaves the session untouched.
    pub fn delete(&mut self, index: usize) -> Result<Stamp> {
        let mut staged = self.stamps.clone();
        let removed = staged.remove(index)?;
        self.commit(staged)?;
        debug!("[session] deleted stamp at {}", index);
        Ok(removed)
    }

    /// Move the stamp at `index` (`0..len`) to `loc`, keeping its disc.
    /// Like [`RoundSession::insert`], `loc` must be a valid location.
    pub fn move_stamp(&mut self, index: usize, loc: Loc) -> Result<()> {
        loc.ensure_valid()?;
        let mut staged = self.stamps.clone();
        staged.set_loc(index, loc)?;
        self.commit(staged)?;
        debug!("[session] moved stamp {}", index);
        Ok(())
    }

    /// Snap every played hole onto its landmarks.
    ///
    /// The first stamp of each hole moves onto its tee; the last moves onto
    /// its pin and is marked as the basket. A one-stamp hole only gets the
    /// pin. The table is then derived again from the snapped stamps.
    pub fn snap_to_landmarks(&mut self) -> Result<()> {
        let mut staged = self.stamps.clone();
        let played = blocks(&self.rows);

        for &(first, last) in &played {
            let row = &self.rows[first];
            let Some(hole) = self.course.get_hole(&row.hole_id) else {
                continue;
            };
            if let Some(tee) = hole.get_tee(&row.tee_id) {
                staged.set_loc(first, tee.loc)?;
            }
            if let Some(pin) = hole.get_pin(&self.rows[last].pin_id) {
                staged.replace(last, Stamp::basket(pin.loc))?;
            }
        }

        self.commit(staged)?;
        info!("[session] snapped {} holes to landmarks", played.len());
        Ok(())
    }

    /// Replace the thresholds and derive the table again.
    pub fn set_config(&mut self, config: SegmentConfig) -> Result<()> {
        let rows = process_stamps(self.stamps.as_slice(), &self.course, &config)?;
        self.config = config;
        self.rows = rows;
        Ok(())
    }

    fn commit(&mut self, staged: StampStore) -> Result<()> {
        if staged.is_empty() {
            return Err(HoleMatchError::EmptyStamps);
        }
        let rows = process_stamps(staged.as_slice(), &self.course, &self.config)?;
        self.stamps = staged;
        self.rows = rows;
        Ok(())
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Per-hole scoring of the current table.
    pub fn summary(&self) -> RoundSummary {
        RoundSummary::from_rows(&self.rows, &self.course)
    }

    /// Persisted form of the current table.
    pub fn to_record(&self, round_id: &str, notes: &str) -> RoundRecord {
        RoundRecord {
            round_id: round_id.to_string(),
            course_id: self.course.id.clone(),
            course_name: self.course.name.clone(),
            round_data: self.rows.clone(),
            notes: notes.to_string(),
        }
    }
}
