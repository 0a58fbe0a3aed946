//! # holematch
//!
//! Hole-by-hole segmentation of GPS-stamped disc golf rounds.
//!
//! A recorded round is a plain, ordered list of stamps: a GPS position and
//! the disc that was thrown from it. Nothing in the recording says where one
//! hole ends and the next begins. This library infers that structure from a
//! course definition (tees, pins, pars) and a few motion heuristics, and
//! produces a row table that names the hole, tee and pin behind every stamp.
//!
//! This library provides:
//! - Great-circle distance ([`geo_utils`])
//! - A read-only course model with optional par lookups ([`course`])
//! - Timestamp-to-track interpolation ([`interpolate`])
//! - Nearest tee/pin/course matching with a deterministic tie-break ([`matching`])
//! - Forward-greedy hole segmentation and pin backfill ([`segment`])
//! - An editing session that re-derives the table after every edit ([`engine`])
//!
//! ## Features
//!
//! - **`synthetic`** - Seeded synthetic courses and rounds for testing
//! - **`cli`** - The `holematch-cli` debug tool (GPX, CSV and JSON front end)
//!
//! ## Quick Start
//!
//! ```rust
//! use holematch::{Course, Hole, Loc, Pin, RoundSession, Stamp, Tee};
//!
//! let course = Course {
//!     id: "park".to_string(),
//!     name: "Park".to_string(),
//!     loc: Loc::new(36.1000, -115.1000),
//!     holes: vec![Hole {
//!         id: "1".to_string(),
//!         tees: vec![Tee::new("reg", Loc::new(36.1000, -115.1000))],
//!         pins: vec![Pin::new("A", Loc::new(36.1008, -115.1000))],
//!         pars: vec![],
//!     }],
//! };
//!
//! let stamps = vec![
//!     Stamp::new(Loc::new(36.1000, -115.1000), "driver"),
//!     Stamp::new(Loc::new(36.1006, -115.1000), "putter"),
//!     Stamp::basket(Loc::new(36.1008, -115.1000)),
//! ];
//!
//! let session = RoundSession::new(course, stamps).unwrap();
//! assert_eq!(session.rows().len(), 3);
//! assert!(session.rows().iter().all(|r| r.pin_id == "A"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{HoleMatchError, OptionExt, Result};

// Geographic utilities (distance, centroids)
pub mod geo_utils;

// Course model (holes, tees, pins, pars)
pub mod course;
pub use course::{Course, CourseSummaryRow, Hole, LandmarkRow, Par, Pin, Tee};

// Timestamp-to-track interpolation
pub mod interpolate;
pub use interpolate::{Anchor, PiecewiseLinear, ThrowEvent, TrackPoint, interpolate_stamps};

// Nearest tee/pin/course matching
pub mod matching;
pub use matching::{Landmark, infer_course, infer_pin, infer_tee, nearest};

// Hole segmentation and pin backfill
pub mod segment;
pub use segment::{SegmentConfig, backfill_pins, process_stamps, segment_stamps};

// Editing session with stamp store and round summary
pub mod engine;
pub use engine::{HoleSummary, RoundRecord, RoundSession, RoundSummary, StampStore};

// Synthetic data generation (for testing and benchmarking)
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate in degrees. No altitude.
///
/// Serialized as a `[lat, lon]` pair, the layout used by course files.
///
/// # Example
/// ```
/// use holematch::Loc;
/// let loc = Loc::new(36.1699, -115.1398); // Las Vegas
/// assert!(loc.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Loc {
    pub latitude: f64,
    pub longitude: f64,
}

impl Loc {
    /// Create a new location.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the location has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// [`HoleMatchError::InvalidLocation`] unless [`Loc::is_valid`].
    pub fn ensure_valid(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(HoleMatchError::InvalidLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl From<[f64; 2]> for Loc {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Loc> for [f64; 2] {
    fn from(loc: Loc) -> Self {
        [loc.latitude, loc.longitude]
    }
}

/// The disc thrown from a stamp, or one of the two sentinels.
///
/// Serialized as a plain string: `"BASKET"` and `"UNDEFINED"` are the
/// sentinels, anything else is a disc name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiscLabel {
    /// A named disc.
    Disc(String),
    /// The basket was reached at this stamp.
    Basket,
    /// No disc recorded (e.g. a stamp inserted while editing).
    #[default]
    Undefined,
}

impl DiscLabel {
    pub const BASKET: &'static str = "BASKET";
    pub const UNDEFINED: &'static str = "UNDEFINED";

    pub fn as_str(&self) -> &str {
        match self {
            DiscLabel::Disc(name) => name,
            DiscLabel::Basket => Self::BASKET,
            DiscLabel::Undefined => Self::UNDEFINED,
        }
    }
}

impl From<&str> for DiscLabel {
    fn from(s: &str) -> Self {
        match s {
            Self::BASKET => DiscLabel::Basket,
            Self::UNDEFINED | "" => DiscLabel::Undefined,
            name => DiscLabel::Disc(name.to_string()),
        }
    }
}

impl From<String> for DiscLabel {
    fn from(s: String) -> Self {
        match s.as_str() {
            Self::BASKET => DiscLabel::Basket,
            Self::UNDEFINED | "" => DiscLabel::Undefined,
            _ => DiscLabel::Disc(s),
        }
    }
}

impl From<DiscLabel> for String {
    fn from(label: DiscLabel) -> Self {
        match label {
            DiscLabel::Disc(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for DiscLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded event of a round: where a disc was thrown from.
///
/// Stamps are kept in recording order, which is assumed chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    pub loc: Loc,
    pub disc: DiscLabel,
}

impl Stamp {
    /// Create a stamp for a throw with the given disc.
    pub fn new(loc: Loc, disc: impl Into<DiscLabel>) -> Self {
        Self {
            loc,
            disc: disc.into(),
        }
    }

    /// Create a stamp with no disc recorded.
    pub fn undefined(loc: Loc) -> Self {
        Self {
            loc,
            disc: DiscLabel::Undefined,
        }
    }

    /// Create a stamp marking that the basket was reached.
    pub fn basket(loc: Loc) -> Self {
        Self {
            loc,
            disc: DiscLabel::Basket,
        }
    }
}

/// One row of a segmented round.
///
/// `pin_id` is empty only between segmentation and backfill; every row
/// returned by [`process_stamps`] or held by a [`RoundSession`] has it set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRow {
    /// Position of the row in the table
    #[serde(rename = "row")]
    pub index: usize,
    #[serde(rename = "hole")]
    pub hole_id: String,
    #[serde(rename = "tee")]
    pub tee_id: String,
    #[serde(rename = "pin")]
    pub pin_id: String,
    pub loc: Loc,
    pub disc: DiscLabel,
}

impl RoundRow {
    /// The stamp this row was derived from.
    pub fn stamp(&self) -> Stamp {
        Stamp {
            loc: self.loc,
            disc: self.disc.clone(),
        }
    }

    /// Whether the row has been assigned a pin.
    pub fn has_pin(&self) -> bool {
        !self.pin_id.is_empty()
    }
}
