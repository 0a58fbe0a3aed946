//! Nearest-landmark matching.
//!
//! Every proximity decision in the segmentation engine goes through
//! [`nearest`]. Its tie-break is part of the contract: when two candidates
//! are exactly equidistant, the one that comes **first** in iteration order
//! wins. Candidate order is therefore significant:
//!
//! - [`infer_tee`] walks holes in course order and tees in hole order
//! - [`infer_pin`] walks the pins of one hole in order
//! - [`infer_course`] walks the catalog in the order given

use crate::Loc;
use crate::course::{Course, Hole, Pin, Tee};
use crate::geo_utils::haversine_distance;

/// Anything with an identity and a position that stamps can be matched to.
pub trait Landmark {
    fn id(&self) -> &str;
    fn loc(&self) -> Loc;
}

impl Landmark for Tee {
    fn id(&self) -> &str {
        &self.id
    }

    fn loc(&self) -> Loc {
        self.loc
    }
}

impl Landmark for Pin {
    fn id(&self) -> &str {
        &self.id
    }

    fn loc(&self) -> Loc {
        self.loc
    }
}

impl Landmark for Course {
    fn id(&self) -> &str {
        &self.id
    }

    fn loc(&self) -> Loc {
        self.loc
    }
}

/// Find the candidate closest to `point`, with its distance in meters.
///
/// Candidates are compared with a strict less-than, so among equidistant
/// candidates the first one yielded by the iterator is returned.
/// Returns `None` for an empty candidate set.
///
/// # Example
/// ```
/// use holematch::{Loc, Pin};
/// use holematch::matching::nearest;
///
/// let pins = vec![
///     Pin::new("A", Loc::new(0.5, 10.0)),
///     Pin::new("B", Loc::new(-0.5, 10.0)),
/// ];
/// // Exactly between A and B: A comes first and wins the tie.
/// let (pin, _) = nearest(&Loc::new(0.0, 10.0), &pins).unwrap();
/// assert_eq!(pin.id, "A");
/// ```
pub fn nearest<'a, T, I>(point: &Loc, candidates: I) -> Option<(&'a T, f64)>
where
    T: Landmark + 'a,
    I: IntoIterator<Item = &'a T>,
{
    nearest_by(point, candidates, |c| c.loc())
}

/// [`nearest`] over arbitrary items with a location accessor.
fn nearest_by<T, I, F>(point: &Loc, candidates: I, loc_of: F) -> Option<(T, f64)>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Loc,
{
    let mut best: Option<(T, f64)> = None;
    for candidate in candidates {
        let dist = haversine_distance(point, &loc_of(&candidate));
        let closer = match &best {
            Some((_, best_dist)) => dist < *best_dist,
            None => true,
        };
        if closer {
            best = Some((candidate, dist));
        }
    }
    best
}

/// Nearest tee over every hole of the course, returned with its hole.
///
/// `None` only for a course with no tees at all.
pub fn infer_tee<'a>(point: &Loc, course: &'a Course) -> Option<(&'a Hole, &'a Tee)> {
    nearest_by(point, course.tees(), |(_, tee)| tee.loc).map(|(pair, _)| pair)
}

/// Nearest pin within a single hole.
pub fn infer_pin<'a>(point: &Loc, hole: &'a Hole) -> Option<&'a Pin> {
    nearest(point, &hole.pins).map(|(pin, _)| pin)
}

/// Course from a catalog whose reference location is nearest to `point`.
pub fn infer_course<'a>(point: &Loc, courses: &'a [Course]) -> Option<&'a Course> {
    nearest(point, courses).map(|(course, _)| course)
}
