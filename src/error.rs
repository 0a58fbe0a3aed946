//! Unified error handling for holematch.
//!
//! Every precondition the core checks (non-empty stamp sequences, complete
//! course definitions, in-range edit indices, sane thresholds) is reported
//! through [`HoleMatchError`]. Missing par entries are *not* errors; see
//! [`crate::Hole::par`].

use thiserror::Error;

/// Errors produced by the segmentation core.
#[derive(Debug, Error)]
pub enum HoleMatchError {
    /// Segmentation needs at least one stamp to seed the first hole.
    #[error("stamp sequence is empty")]
    EmptyStamps,

    /// A course must define at least one hole.
    #[error("course '{course_id}' has no holes")]
    EmptyCourse { course_id: String },

    /// Every hole needs a tee to be inferred from.
    #[error("hole '{hole_id}' has no tees")]
    HoleWithoutTees { hole_id: String },

    /// Every hole needs a pin to be closed out.
    #[error("hole '{hole_id}' has no pins")]
    HoleWithoutPins { hole_id: String },

    /// Edit index outside the stamp sequence.
    #[error("index {index} out of range for {len} stamps")]
    IndexOutOfRange { index: usize, len: usize },

    /// A configuration value that cannot be used as a distance threshold.
    #[error("invalid config: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f64 },

    /// The interpolator needs at least one anchor per axis.
    #[error("{axis} anchor series is empty")]
    EmptyAnchors { axis: &'static str },

    /// Anchor times must be finite and non-decreasing.
    #[error("{axis} anchor {index} is out of order or not finite")]
    UnsortedAnchors { axis: &'static str, index: usize },

    /// Coordinates outside the valid latitude/longitude range, or not finite.
    #[error("invalid location ({latitude}, {longitude})")]
    InvalidLocation { latitude: f64, longitude: f64 },

    /// A tee or pin id already used on the same hole.
    #[error("hole '{hole_id}' already has a landmark '{id}'")]
    DuplicateLandmark { hole_id: String, id: String },

    /// A tee or pin id that the hole does not define.
    #[error("hole '{hole_id}' has no landmark '{id}'")]
    UnknownLandmark { hole_id: String, id: String },

    /// Course or round JSON could not be (de)serialized.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HoleMatchError>;

/// Converts empty lookups into precondition errors.
pub trait OptionExt<T> {
    /// Map `None` to [`HoleMatchError::EmptyStamps`].
    fn ok_or_empty_stamps(self) -> Result<T>;

    /// Map `None` to [`HoleMatchError::HoleWithoutPins`].
    fn ok_or_no_pins(self, hole_id: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_empty_stamps(self) -> Result<T> {
        self.ok_or(HoleMatchError::EmptyStamps)
    }

    fn ok_or_no_pins(self, hole_id: &str) -> Result<T> {
        self.ok_or_else(|| HoleMatchError::HoleWithoutPins {
            hole_id: hole_id.to_string(),
        })
    }
}
