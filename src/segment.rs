//! Hole segmentation: turning an ordered stamp sequence into a round table.
//!
//! The scan is forward and greedy. It starts on the tee nearest the first
//! stamp and moves to a new hole only when three signals agree at stamp `i`:
//!
//! 1. stamp `i` is within `tee_threshold` of its nearest tee (over the whole course)
//! 2. stamp `i - 1` was within `pin_threshold` of a pin of the current hole
//! 3. the move from stamp `i` to stamp `i + 1` exceeds `drive_threshold`
//!
//! Any one signal alone fires on players walking past a tee or finishing
//! near a neighbouring basket; together they mark "holed out, walked to the
//! next tee, drove".
//!
//! Known limitation: a player who re-tees on an earlier tee mid-hole (after
//! an out-of-bounds drive, say) right after being near a pin can trigger a
//! transition. There is no special case for this.
//!
//! Segmentation leaves pins unresolved on every row except the last row of
//! each hole; [`backfill_pins`] propagates them backward.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::course::Course;
use crate::error::{HoleMatchError, OptionExt, Result};
use crate::geo_utils::haversine_distance;
use crate::matching::{infer_pin, infer_tee};
use crate::{RoundRow, Stamp};

/// Distance thresholds for hole transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SegmentConfig {
    /// A stamp closer than this to a tee counts as "on a tee".
    /// Default: 10.0 meters
    pub tee_threshold: f64,

    /// The previous stamp closer than this to a pin of the current hole
    /// counts as "holed out".
    /// Default: 10.0 meters
    pub pin_threshold: f64,

    /// The next move must be longer than this to count as a drive.
    /// Default: 20.0 meters
    pub drive_threshold: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            tee_threshold: 10.0,
            pin_threshold: 10.0,
            drive_threshold: 20.0,
        }
    }
}

impl SegmentConfig {
    /// Thresholds must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("tee_threshold", self.tee_threshold),
            ("pin_threshold", self.pin_threshold),
            ("drive_threshold", self.drive_threshold),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(HoleMatchError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}

/// Assign a hole and tee to every stamp.
///
/// The returned rows carry a pin only where a hole was closed out: the row
/// before each transition and the final row. Every other `pin_id` is empty
/// until [`backfill_pins`] runs.
///
/// Fails on an empty stamp sequence, an invalid course, or an invalid config.
pub fn segment_stamps(
    stamps: &[Stamp],
    course: &Course,
    config: &SegmentConfig,
) -> Result<Vec<RoundRow>> {
    config.validate()?;
    course.validate()?;
    let first = stamps.first().ok_or_empty_stamps()?;

    let (mut hole, mut tee) = infer_tee(&first.loc, course).ok_or_else(|| {
        HoleMatchError::EmptyCourse {
            course_id: course.id.clone(),
        }
    })?;

    let last_index = stamps.len() - 1;
    let mut rows: Vec<RoundRow> = Vec::with_capacity(stamps.len());

    for (i, stamp) in stamps.iter().enumerate() {
        let (next_hole, next_tee) = infer_tee(&stamp.loc, course).ok_or_else(|| {
            HoleMatchError::EmptyCourse {
                course_id: course.id.clone(),
            }
        })?;
        let tee_dist = haversine_distance(&stamp.loc, &next_tee.loc);

        let forward_drive = stamps
            .get(i + 1)
            .map_or(0.0, |next| haversine_distance(&stamp.loc, &next.loc));

        if i > 0 {
            let prev = &stamps[i - 1];
            let pin = infer_pin(&prev.loc, hole).ok_or_no_pins(&hole.id)?;
            let pin_dist = haversine_distance(&prev.loc, &pin.loc);

            if tee_dist < config.tee_threshold
                && pin_dist < config.pin_threshold
                && forward_drive > config.drive_threshold
            {
                debug!(
                    "[segment] stamp {}: hole {} closed at pin {} ({:.1}m)",
                    i, hole.id, pin.id, pin_dist
                );
                debug!(
                    "[segment] stamp {}: hole {} tee {} ({:.1}m, drive {:.1}m)",
                    i, next_hole.id, next_tee.id, tee_dist, forward_drive
                );
                if let Some(prev_row) = rows.last_mut() {
                    prev_row.pin_id = pin.id.clone();
                }
                hole = next_hole;
                tee = next_tee;
            }
        }

        let pin_id = if i == last_index {
            infer_pin(&stamp.loc, hole)
                .ok_or_no_pins(&hole.id)?
                .id
                .clone()
        } else {
            String::new()
        };

        rows.push(RoundRow {
            index: i,
            hole_id: hole.id.clone(),
            tee_id: tee.id.clone(),
            pin_id,
            loc: stamp.loc,
            disc: stamp.disc.clone(),
        });
    }

    Ok(rows)
}

/// Propagate each hole's resolved pin backward over the hole's rows and
/// renumber the rows by position.
///
/// Walking from the end, an empty `pin_id` takes the most recent pin seen;
/// a set one becomes the most recent pin. Since segmentation always resolves
/// the final row, no row is left without a pin.
pub fn backfill_pins(rows: &mut [RoundRow]) {
    let mut last_pin = match rows.last() {
        Some(row) => row.pin_id.clone(),
        None => return,
    };

    for (i, row) in rows.iter_mut().enumerate().rev() {
        if row.pin_id.is_empty() {
            row.pin_id = last_pin.clone();
        } else {
            last_pin = row.pin_id.clone();
        }
        row.index = i;
    }
}

/// Segment and backfill in one pass: the complete round table.
///
/// # Example
/// ```
/// use holematch::{Course, Hole, Loc, Pin, SegmentConfig, Stamp, Tee, process_stamps};
///
/// let course = Course {
///     id: "c".to_string(),
///     name: "C".to_string(),
///     loc: Loc::new(36.0, -115.0),
///     holes: vec![Hole {
///         id: "1".to_string(),
///         tees: vec![Tee::new("reg", Loc::new(36.0, -115.0))],
///         pins: vec![Pin::new("A", Loc::new(36.001, -115.0))],
///         pars: vec![],
///     }],
/// };
/// let stamps = [Stamp::new(Loc::new(36.0, -115.0), "driver")];
/// let rows = process_stamps(&stamps, &course, &SegmentConfig::default()).unwrap();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].pin_id, "A");
/// ```
pub fn process_stamps(
    stamps: &[Stamp],
    course: &Course,
    config: &SegmentConfig,
) -> Result<Vec<RoundRow>> {
    let mut rows = segment_stamps(stamps, course, config)?;
    backfill_pins(&mut rows);

    debug!(
        "[segment] {} stamps -> {} rows, {} holes",
        stamps.len(),
        rows.len(),
        count_holes(&rows)
    );

    Ok(rows)
}

/// Number of hole transitions plus one (zero for an empty table).
fn count_holes(rows: &[RoundRow]) -> usize {
    if rows.is_empty() {
        return 0;
    }
    1 + rows
        .windows(2)
        .filter(|w| w[0].hole_id != w[1].hole_id || w[0].tee_id != w[1].tee_id)
        .count()
}
