//! Course model: holes with their tees, pins and par table.
//!
//! A [`Course`] is reference data. It is loaded once, validated, and then
//! only read while rounds are segmented against it. Authoring is the
//! exception: [`Course::from_landmarks`] builds a course from surveyed tee and
//! pin positions, and the `Hole` editing methods adjust it afterwards.
//!
//! The JSON layout matches the course files the recorder produces:
//!
//! ```json
//! {
//!   "id": "sunset_park",
//!   "name": "Sunset Park Las Vegas",
//!   "loc": [36.0639, -115.1190],
//!   "holes": [
//!     {
//!       "id": "1",
//!       "tees": [{ "id": "reg", "loc": [36.0641, -115.1201] }],
//!       "pins": [{ "id": "A", "loc": [36.0648, -115.1195] }],
//!       "pars": [{ "tee": "reg", "pin": "A", "par": 3 }]
//!     }
//!   ]
//! }
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::Loc;
use crate::error::{HoleMatchError, Result};
use crate::geo_utils::{compute_center, haversine_distance};

/// A named teeing area of a hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tee {
    pub id: String,
    pub loc: Loc,
}

impl Tee {
    pub fn new(id: impl Into<String>, loc: Loc) -> Self {
        Self { id: id.into(), loc }
    }
}

/// A named basket position of a hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: String,
    pub loc: Loc,
}

impl Pin {
    pub fn new(id: impl Into<String>, loc: Loc) -> Self {
        Self { id: id.into(), loc }
    }
}

/// Par for one tee -> pin combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Par {
    pub tee: String,
    pub pin: String,
    pub par: u32,
}

/// One surveyed tee or pin: the row layout of `tees.csv` and `pins.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRow {
    pub hole: String,
    /// Tee or pin id within the hole
    pub variation: String,
    pub lat: f64,
    pub lon: f64,
}

impl LandmarkRow {
    pub fn loc(&self) -> Loc {
        Loc::new(self.lat, self.lon)
    }
}

/// One hole of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub id: String,
    pub tees: Vec<Tee>,
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub pars: Vec<Par>,
}

impl Hole {
    /// An empty hole; add tees and pins before segmenting against it.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tees: Vec::new(),
            pins: Vec::new(),
            pars: Vec::new(),
        }
    }

    /// Par for a tee/pin combination.
    ///
    /// Returns `None` when the par table has no entry for the pair. Callers
    /// decide how to present a missing par; no default is substituted.
    pub fn par(&self, tee_id: &str, pin_id: &str) -> Option<u32> {
        self.pars
            .iter()
            .find(|p| p.tee == tee_id && p.pin == pin_id)
            .map(|p| p.par)
    }

    pub fn get_tee(&self, tee_id: &str) -> Option<&Tee> {
        self.tees.iter().find(|t| t.id == tee_id)
    }

    pub fn get_pin(&self, pin_id: &str) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == pin_id)
    }

    /// Tee-to-pin length in meters, if both exist on this hole.
    pub fn length(&self, tee_id: &str, pin_id: &str) -> Option<f64> {
        let tee = self.get_tee(tee_id)?;
        let pin = self.get_pin(pin_id)?;
        Some(haversine_distance(&tee.loc, &pin.loc))
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Add a tee. The par table is left alone: new combinations have no par
    /// until [`Hole::set_par`] gives them one.
    pub fn add_tee(&mut self, id: impl Into<String>, loc: Loc) -> Result<()> {
        let id = id.into();
        loc.ensure_valid()?;
        if self.get_tee(&id).is_some() {
            return Err(self.duplicate(id));
        }
        self.tees.push(Tee::new(id, loc));
        Ok(())
    }

    /// Add a pin. Like [`Hole::add_tee`], no par is added.
    pub fn add_pin(&mut self, id: impl Into<String>, loc: Loc) -> Result<()> {
        let id = id.into();
        loc.ensure_valid()?;
        if self.get_pin(&id).is_some() {
            return Err(self.duplicate(id));
        }
        self.pins.push(Pin::new(id, loc));
        Ok(())
    }

    /// Relocate an existing tee.
    pub fn move_tee(&mut self, id: &str, loc: Loc) -> Result<()> {
        loc.ensure_valid()?;
        let hole_id = &self.id;
        let tee = self
            .tees
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| unknown(hole_id, id))?;
        tee.loc = loc;
        Ok(())
    }

    /// Relocate an existing pin.
    pub fn move_pin(&mut self, id: &str, loc: Loc) -> Result<()> {
        loc.ensure_valid()?;
        let hole_id = &self.id;
        let pin = self
            .pins
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| unknown(hole_id, id))?;
        pin.loc = loc;
        Ok(())
    }

    /// Set or replace the par of an existing tee/pin combination.
    pub fn set_par(&mut self, tee_id: &str, pin_id: &str, par: u32) -> Result<()> {
        if self.get_tee(tee_id).is_none() {
            return Err(unknown(&self.id, tee_id));
        }
        if self.get_pin(pin_id).is_none() {
            return Err(unknown(&self.id, pin_id));
        }

        match self
            .pars
            .iter_mut()
            .find(|p| p.tee == tee_id && p.pin == pin_id)
        {
            Some(entry) => entry.par = par,
            None => self.pars.push(Par {
                tee: tee_id.to_string(),
                pin: pin_id.to_string(),
                par,
            }),
        }
        Ok(())
    }

    fn duplicate(&self, id: String) -> HoleMatchError {
        HoleMatchError::DuplicateLandmark {
            hole_id: self.id.clone(),
            id,
        }
    }
}

fn unknown(hole_id: &str, id: &str) -> HoleMatchError {
    HoleMatchError::UnknownLandmark {
        hole_id: hole_id.to_string(),
        id: id.to_string(),
    }
}

/// A course: reference location plus its ordered holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    /// Reference location used to pick a course for a recording
    pub loc: Loc,
    pub holes: Vec<Hole>,
}

/// One line of a course overview: a single tee -> pin combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummaryRow {
    pub hole: String,
    pub tee: String,
    pub pin: String,
    /// Tee-to-pin length in meters
    pub length: f64,
    pub par: Option<u32>,
}

impl Course {
    /// Parse a course from its JSON file contents.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the course in the course file layout.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a course from surveyed tee and pin rows.
    ///
    /// Holes appear in the order their first tee row does; tees and pins keep
    /// their row order within a hole. The reference location is the first
    /// tee. The par table starts empty.
    ///
    /// # Example
    /// ```
    /// use holematch::{Course, LandmarkRow};
    ///
    /// let row = |hole: &str, variation: &str, lat: f64| LandmarkRow {
    ///     hole: hole.to_string(),
    ///     variation: variation.to_string(),
    ///     lat,
    ///     lon: -115.0,
    /// };
    /// let tees = vec![row("1", "reg", 36.000), row("2", "reg", 36.002)];
    /// let pins = vec![row("1", "A", 36.001), row("2", "A", 36.003)];
    ///
    /// let course = Course::from_landmarks("park", "Park", &tees, &pins).unwrap();
    /// assert_eq!(course.holes.len(), 2);
    /// assert_eq!(course.holes[0].par("reg", "A"), None);
    /// ```
    pub fn from_landmarks(
        id: impl Into<String>,
        name: impl Into<String>,
        tees: &[LandmarkRow],
        pins: &[LandmarkRow],
    ) -> Result<Self> {
        let id = id.into();
        let first = tees.first().ok_or_else(|| HoleMatchError::EmptyCourse {
            course_id: id.clone(),
        })?;

        let mut course = Self {
            id,
            name: name.into(),
            loc: first.loc(),
            holes: Vec::new(),
        };
        for row in tees {
            let hole = course.hole_entry(&row.hole);
            hole.add_tee(&row.variation, row.loc())?;
        }
        for row in pins {
            let hole = course.hole_entry(&row.hole);
            hole.add_pin(&row.variation, row.loc())?;
        }

        course.validate()?;
        debug!(
            "[course] built {} from {} tees and {} pins: {} holes",
            course.id,
            tees.len(),
            pins.len(),
            course.holes.len()
        );
        Ok(course)
    }

    /// Check the preconditions segmentation relies on: at least one hole,
    /// and a tee and a pin on every hole.
    pub fn validate(&self) -> Result<()> {
        if self.holes.is_empty() {
            return Err(HoleMatchError::EmptyCourse {
                course_id: self.id.clone(),
            });
        }
        for hole in &self.holes {
            if hole.tees.is_empty() {
                return Err(HoleMatchError::HoleWithoutTees {
                    hole_id: hole.id.clone(),
                });
            }
            if hole.pins.is_empty() {
                return Err(HoleMatchError::HoleWithoutPins {
                    hole_id: hole.id.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn get_hole(&self, hole_id: &str) -> Option<&Hole> {
        self.holes.iter().find(|h| h.id == hole_id)
    }

    pub fn hole_mut(&mut self, hole_id: &str) -> Option<&mut Hole> {
        self.holes.iter_mut().find(|h| h.id == hole_id)
    }

    /// The hole with this id, appended as an empty hole if it is new.
    pub fn hole_entry(&mut self, hole_id: &str) -> &mut Hole {
        let index = match self.holes.iter().position(|h| h.id == hole_id) {
            Some(index) => index,
            None => {
                self.holes.push(Hole::new(hole_id));
                self.holes.len() - 1
            }
        };
        &mut self.holes[index]
    }

    /// Every tee of the course with its hole, in hole order then tee order.
    pub fn tees(&self) -> impl Iterator<Item = (&Hole, &Tee)> {
        self.holes
            .iter()
            .flat_map(|hole| hole.tees.iter().map(move |tee| (hole, tee)))
    }

    /// Centroid of all tees and pins, `None` for a course without landmarks.
    pub fn landmark_center(&self) -> Option<Loc> {
        let locs: Vec<Loc> = self
            .holes
            .iter()
            .flat_map(|h| {
                h.tees
                    .iter()
                    .map(|t| t.loc)
                    .chain(h.pins.iter().map(|p| p.loc))
            })
            .collect();
        compute_center(&locs)
    }

    /// Overview of every tee -> pin combination with length and par.
    pub fn summary_table(&self) -> Vec<CourseSummaryRow> {
        let mut rows = Vec::new();
        for hole in &self.holes {
            for tee in &hole.tees {
                for pin in &hole.pins {
                    rows.push(CourseSummaryRow {
                        hole: hole.id.clone(),
                        tee: tee.id.clone(),
                        pin: pin.id.clone(),
                        length: haversine_distance(&tee.loc, &pin.loc),
                        par: hole.par(&tee.id, &pin.id),
                    });
                }
            }
        }
        rows
    }
}
