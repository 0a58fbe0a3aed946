//! Per-hole scoring of a segmented round.
//!
//! A round table is split into blocks: maximal runs of rows with the same
//! hole, tee and pin. Each block is one played hole. The last stamp of a
//! block marks the basket, so a block of `n` rows is `n - 1` throws.

use serde::{Deserialize, Serialize};

use crate::RoundRow;
use crate::course::Course;

/// Score line for one played hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleSummary {
    pub hole: String,
    pub tee: String,
    pub pin: String,
    /// Index of the block's first row in the round table
    pub first_row: usize,
    /// Index of the block's last row in the round table
    pub last_row: usize,
    /// Tee-to-pin length in meters, `None` if the course lacks the tee or pin
    pub length: Option<f64>,
    /// `None` when the course defines no par for this tee/pin pair
    pub par: Option<u32>,
    pub throws: u32,
    /// Throws relative to par, `None` without a par
    pub result: Option<i32>,
    /// Sum of all defined results up to and including this hole
    pub total: i32,
}

/// Score lines for a whole round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub holes: Vec<HoleSummary>,
}

impl RoundSummary {
    /// Summarize a backfilled round table against its course.
    pub fn from_rows(rows: &[RoundRow], course: &Course) -> Self {
        let mut holes = Vec::new();
        let mut total = 0;

        for (first_row, last_row) in blocks(rows) {
            let row = &rows[first_row];
            let hole = course.get_hole(&row.hole_id);
            let length = hole.and_then(|h| h.length(&row.tee_id, &row.pin_id));
            let par = hole.and_then(|h| h.par(&row.tee_id, &row.pin_id));
            let throws = (last_row - first_row) as u32;
            let result = par.map(|p| throws as i32 - p as i32);
            total += result.unwrap_or(0);

            holes.push(HoleSummary {
                hole: row.hole_id.clone(),
                tee: row.tee_id.clone(),
                pin: row.pin_id.clone(),
                first_row,
                last_row,
                length,
                par,
                throws,
                result,
                total,
            });
        }

        Self { holes }
    }

    /// Total throws over the round.
    pub fn total_throws(&self) -> u32 {
        self.holes.iter().map(|h| h.throws).sum()
    }

    /// Result relative to par over the holes that have a par.
    pub fn total_result(&self) -> i32 {
        self.holes.last().map_or(0, |h| h.total)
    }

    /// Holes played without a par entry in the course.
    pub fn holes_missing_par(&self) -> impl Iterator<Item = &HoleSummary> {
        self.holes.iter().filter(|h| h.par.is_none())
    }
}

/// Inclusive `(first, last)` row ranges of each block.
pub fn blocks(rows: &[RoundRow]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for i in 1..=rows.len() {
        let boundary = i == rows.len() || !same_block(&rows[i - 1], &rows[i]);
        if boundary && i > start {
            ranges.push((start, i - 1));
            start = i;
        }
    }
    ranges
}

fn same_block(a: &RoundRow, b: &RoundRow) -> bool {
    a.hole_id == b.hole_id && a.tee_id == b.tee_id && a.pin_id == b.pin_id
}
