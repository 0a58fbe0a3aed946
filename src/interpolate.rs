//! Timestamp-to-track interpolation.
//!
//! Throws are often logged as bare timestamps on one device while the
//! position track is sampled continuously on another. This module places each
//! throw on the track by interpolating latitude and longitude independently
//! against time.
//!
//! Policy:
//! - inside the anchor range: piecewise-linear between the surrounding anchors
//! - outside it: the boundary anchor's value (flat, never extended)
//! - duplicate anchor times: tolerated, no division by a zero-length span

use serde::{Deserialize, Serialize};

use crate::error::{HoleMatchError, Result};
use crate::{DiscLabel, Loc, Stamp};

/// One sample of a single axis: a value at a time (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub time: f64,
    pub value: f64,
}

impl Anchor {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// One sample of a position track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Seconds, on the same clock as the throw events
    pub time: f64,
    pub loc: Loc,
}

/// A throw logged by time only, with the disc that was thrown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrowEvent {
    pub time: f64,
    pub disc: DiscLabel,
}

impl ThrowEvent {
    pub fn new(time: f64, disc: impl Into<DiscLabel>) -> Self {
        Self {
            time,
            disc: disc.into(),
        }
    }
}

/// A piecewise-linear function of time built from validated anchors.
#[derive(Debug, Clone)]
pub struct PiecewiseLinear {
    anchors: Vec<Anchor>,
}

impl PiecewiseLinear {
    /// Build from anchors that are non-empty, finite in time, and
    /// non-decreasing in time. `axis` names the series in errors.
    pub fn new(axis: &'static str, anchors: Vec<Anchor>) -> Result<Self> {
        if anchors.is_empty() {
            return Err(HoleMatchError::EmptyAnchors { axis });
        }
        for (i, anchor) in anchors.iter().enumerate() {
            let out_of_order = i > 0 && anchor.time < anchors[i - 1].time;
            if !anchor.time.is_finite() || out_of_order {
                return Err(HoleMatchError::UnsortedAnchors { axis, index: i });
            }
        }
        Ok(Self { anchors })
    }

    /// Value at time `t`.
    ///
    /// At a repeated time the later anchor wins, except at or before the
    /// first time, where the first anchor's value is returned.
    pub fn at(&self, t: f64) -> f64 {
        let first = self.anchors[0];
        let last = self.anchors[self.anchors.len() - 1];
        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First anchor strictly after t; first.time < t < last.time keeps
        // this in 1..len.
        let upper = self.anchors.partition_point(|a| a.time <= t);
        let a0 = self.anchors[upper - 1];
        let a1 = self.anchors[upper];

        let span = a1.time - a0.time;
        if span <= 0.0 {
            return a0.value;
        }
        let ratio = (t - a0.time) / span;
        a0.value + ratio * (a1.value - a0.value)
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }
}

/// Split a sampled track into its latitude and longitude anchor series.
pub fn split_track(track: &[TrackPoint]) -> (Vec<Anchor>, Vec<Anchor>) {
    track
        .iter()
        .map(|p| {
            (
                Anchor::new(p.time, p.loc.latitude),
                Anchor::new(p.time, p.loc.longitude),
            )
        })
        .unzip()
}

/// Place each throw event on the track.
///
/// Returns one stamp per event, in event order, carrying the event's disc.
///
/// # Example
/// ```
/// use holematch::{Anchor, ThrowEvent, interpolate_stamps};
///
/// let lat = vec![Anchor::new(0.0, 36.0), Anchor::new(10.0, 36.001)];
/// let lon = vec![Anchor::new(0.0, -115.0), Anchor::new(10.0, -115.0)];
/// let events = vec![ThrowEvent::new(5.0, "driver")];
///
/// let stamps = interpolate_stamps(&lat, &lon, &events).unwrap();
/// assert!((stamps[0].loc.latitude - 36.0005).abs() < 1e-9);
/// ```
pub fn interpolate_stamps(
    lat_anchors: &[Anchor],
    lon_anchors: &[Anchor],
    events: &[ThrowEvent],
) -> Result<Vec<Stamp>> {
    let lat = PiecewiseLinear::new("latitude", lat_anchors.to_vec())?;
    let lon = PiecewiseLinear::new("longitude", lon_anchors.to_vec())?;

    Ok(events
        .iter()
        .map(|e| Stamp {
            loc: Loc::new(lat.at(e.time), lon.at(e.time)),
            disc: e.disc.clone(),
        })
        .collect())
}

/// [`interpolate_stamps`] straight from a sampled track.
pub fn interpolate_track(track: &[TrackPoint], events: &[ThrowEvent]) -> Result<Vec<Stamp>> {
    let (lat, lon) = split_track(track);
    interpolate_stamps(&lat, &lon, events)
}
