//! Synthetic courses and recorded rounds for stress testing and benchmarking.
//!
//! Generates a winding course of holes and a round played on it, with the
//! hole behind every stamp known in advance. The round is produced twice:
//! as stamps, and as a sampled position track plus throw times, so the
//! interpolator and the segmentation engine can be checked against the same
//! ground truth.
//!
//! Feature-gated behind `synthetic`; not included in production builds.
//!
//! # Example
//!
//! ```rust
//! use holematch::synthetic::SyntheticScenario;
//! use holematch::{SegmentConfig, process_stamps};
//!
//! let round = SyntheticScenario::with_hole_count(9, 42).generate();
//! let rows = process_stamps(&round.stamps, &round.course, &SegmentConfig::default()).unwrap();
//! assert_eq!(rows.len(), round.stamps.len());
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use crate::course::{Course, Hole, Par, Pin, Tee};
use crate::interpolate::{ThrowEvent, TrackPoint};
use crate::{Loc, Stamp};

// ============================================================================
// Types
// ============================================================================

/// Scenario configuration for generating a synthetic round.
#[derive(Debug, Clone)]
pub struct SyntheticScenario {
    /// First tee of the course.
    pub origin: Loc,
    /// Number of holes on the course (all are played, in order).
    pub hole_count: usize,
    /// Tee-to-pin length range in meters.
    pub hole_length_meters: (f64, f64),
    /// Throws per hole, including the drive. One extra stamp marks the basket.
    pub throws_per_hole: usize,
    /// Walk from a pin to the next tee in meters.
    pub walk_meters: f64,
    /// GPS noise standard deviation in meters.
    pub gps_noise_sigma_meters: f64,
    /// Seconds spent standing at each lie.
    pub pause_seconds: f64,
    /// Walking speed between lies in m/s.
    pub walking_speed: f64,
    /// RNG seed for deterministic reproduction.
    pub seed: u64,
}

/// A generated course and round with ground truth.
pub struct SyntheticRound {
    pub course: Course,
    /// Recorded stamps, in order.
    pub stamps: Vec<Stamp>,
    /// Hole ID behind each stamp.
    pub expected_holes: Vec<String>,
    /// Sampled position track covering the whole round.
    pub track: Vec<TrackPoint>,
    /// Throw times on the track's clock, one per stamp.
    pub events: Vec<ThrowEvent>,
}

// ============================================================================
// Coordinate Helpers
// ============================================================================

/// Meters per degree of latitude (approximately constant).
const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Track sampling interval while walking (seconds).
const SAMPLE_INTERVAL: f64 = 5.0;

/// Discs cycled through for generated throws.
const DISCS: [&str; 4] = ["driver", "fairway", "midrange", "putter"];

/// Convert meters to degrees of latitude.
fn meters_to_deg_lat(meters: f64) -> f64 {
    meters / METERS_PER_DEG_LAT
}

/// Convert meters to degrees of longitude at a given latitude.
fn meters_to_deg_lng(meters: f64, latitude: f64) -> f64 {
    let meters_per_deg_lng = METERS_PER_DEG_LAT * latitude.to_radians().cos();
    if meters_per_deg_lng.abs() < 1e-10 {
        return 0.0;
    }
    meters / meters_per_deg_lng
}

/// Move `meters` from `from` along `heading` (radians, 0 = east).
fn offset(from: &Loc, meters: f64, heading: f64) -> Loc {
    Loc::new(
        from.latitude + meters_to_deg_lat(meters * heading.sin()),
        from.longitude + meters_to_deg_lng(meters * heading.cos(), from.latitude),
    )
}

/// Linear blend between two locations.
fn lerp(a: &Loc, b: &Loc, t: f64) -> Loc {
    Loc::new(
        a.latitude + t * (b.latitude - a.latitude),
        a.longitude + t * (b.longitude - a.longitude),
    )
}

/// Add Gaussian GPS noise to a location (Box-Muller).
fn add_gps_noise(loc: &Loc, sigma_meters: f64, rng: &mut StdRng) -> Loc {
    if sigma_meters <= 0.0 {
        return *loc;
    }
    let u1: f64 = rng.gen_range(0.0001..1.0);
    let u2: f64 = rng.r#gen();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    let z1 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).sin();

    Loc::new(
        loc.latitude + meters_to_deg_lat(z0 * sigma_meters),
        loc.longitude + meters_to_deg_lng(z1 * sigma_meters, loc.latitude),
    )
}

// ============================================================================
// Course Generation
// ============================================================================

/// Lay out holes along a winding path: tee, pin, short walk, next tee.
fn generate_course(scenario: &SyntheticScenario, rng: &mut StdRng) -> Course {
    let mut holes = Vec::with_capacity(scenario.hole_count);
    let base_heading: f64 = rng.gen_range(0.0..(2.0 * PI));
    let mut heading = base_heading;
    let mut tee_loc = scenario.origin;

    for i in 0..scenario.hole_count {
        let (min_len, max_len) = scenario.hole_length_meters;
        let length = if max_len > min_len {
            rng.gen_range(min_len..max_len)
        } else {
            min_len
        };
        let pin_loc = offset(&tee_loc, length, heading);

        // Alternate pin position a little off the main line
        let alt_pin_loc = offset(&pin_loc, 15.0, heading + PI / 2.0);

        let par = if length > 250.0 { 4 } else { 3 };
        let hole_id = (i + 1).to_string();
        holes.push(Hole {
            id: hole_id,
            tees: vec![Tee::new("reg", tee_loc)],
            pins: vec![Pin::new("A", pin_loc), Pin::new("B", alt_pin_loc)],
            pars: vec![
                Par {
                    tee: "reg".to_string(),
                    pin: "A".to_string(),
                    par,
                },
                Par {
                    tee: "reg".to_string(),
                    pin: "B".to_string(),
                    par,
                },
            ],
        });

        // Walk sideways to the next tee, then turn gently. The heading stays
        // within 45 degrees of the start so holes never overlap.
        tee_loc = offset(&pin_loc, scenario.walk_meters, heading - PI / 2.0);
        heading = (heading + rng.gen_range(-0.3..0.3))
            .clamp(base_heading - PI / 4.0, base_heading + PI / 4.0);
    }

    let mut course = Course {
        id: format!("synth_{}", scenario.seed),
        name: format!("Synthetic {} holes", scenario.hole_count),
        loc: scenario.origin,
        holes,
    };
    if let Some(center) = course.landmark_center() {
        course.loc = center;
    }
    course
}

// ============================================================================
// Scenario Implementation
// ============================================================================

impl SyntheticScenario {
    /// Generate a course and a round played on it.
    pub fn generate(&self) -> SyntheticRound {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let course = generate_course(self, &mut rng);

        let mut stamps = Vec::new();
        let mut expected_holes = Vec::new();

        for hole in &course.holes {
            let tee = hole.tees[0].loc;
            let pin = hole.pins[0].loc;
            let throws = self.throws_per_hole.max(1);

            for k in 0..throws {
                let ideal = lerp(&tee, &pin, k as f64 / throws as f64);
                let lie = if k == 0 {
                    ideal
                } else {
                    // Fairway lies wander off the line a little
                    let heading: f64 = rng.gen_range(0.0..(2.0 * PI));
                    offset(&ideal, rng.gen_range(0.0..4.0), heading)
                };
                stamps.push(Stamp::new(
                    add_gps_noise(&lie, self.gps_noise_sigma_meters, &mut rng),
                    DISCS[k.min(DISCS.len() - 1)],
                ));
                expected_holes.push(hole.id.clone());
            }

            stamps.push(Stamp::basket(add_gps_noise(
                &pin,
                self.gps_noise_sigma_meters,
                &mut rng,
            )));
            expected_holes.push(hole.id.clone());
        }

        let (track, events) = self.record_track(&stamps);

        SyntheticRound {
            course,
            stamps,
            expected_holes,
            track,
            events,
        }
    }

    /// Walk the stamps in order: pause at each lie, then walk straight to the
    /// next one, sampling along the way. Each throw happens mid-pause.
    fn record_track(&self, stamps: &[Stamp]) -> (Vec<TrackPoint>, Vec<ThrowEvent>) {
        let mut track = Vec::new();
        let mut events = Vec::with_capacity(stamps.len());
        let mut time = 0.0;

        for (i, stamp) in stamps.iter().enumerate() {
            track.push(TrackPoint {
                time,
                loc: stamp.loc,
            });
            events.push(ThrowEvent {
                time: time + self.pause_seconds / 2.0,
                disc: stamp.disc.clone(),
            });
            time += self.pause_seconds;
            track.push(TrackPoint {
                time,
                loc: stamp.loc,
            });

            if let Some(next) = stamps.get(i + 1) {
                let dist = crate::geo_utils::haversine_distance(&stamp.loc, &next.loc);
                let walk_time = (dist / self.walking_speed).max(SAMPLE_INTERVAL);
                let samples = (walk_time / SAMPLE_INTERVAL).floor() as usize;
                for s in 1..samples {
                    let t = s as f64 * SAMPLE_INTERVAL;
                    track.push(TrackPoint {
                        time: time + t,
                        loc: lerp(&stamp.loc, &next.loc, t / walk_time),
                    });
                }
                time += walk_time;
            }
        }

        (track, events)
    }

    /// A full 18-hole round with realistic noise.
    pub fn standard_round() -> Self {
        Self::with_hole_count(18, 42)
    }

    /// A round on `hole_count` holes with default geometry.
    pub fn with_hole_count(hole_count: usize, seed: u64) -> Self {
        Self {
            origin: LAS_VEGAS,
            hole_count,
            hole_length_meters: (90.0, 300.0),
            throws_per_hole: 3,
            walk_meters: 40.0,
            gps_noise_sigma_meters: 1.0,
            pause_seconds: 30.0,
            walking_speed: 1.3,
            seed,
        }
    }
}

/// Default origin for generated courses.
pub const LAS_VEGAS: Loc = Loc {
    latitude: 36.0639,
    longitude: -115.1190,
};

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils::haversine_distance;

    #[test]
    fn test_standard_round_generation() {
        let round = SyntheticScenario::standard_round().generate();

        assert_eq!(round.course.holes.len(), 18);
        // 3 throws + basket per hole
        assert_eq!(round.stamps.len(), 18 * 4);
        assert_eq!(round.expected_holes.len(), round.stamps.len());
        assert_eq!(round.events.len(), round.stamps.len());
        assert!(round.course.validate().is_ok());
    }

    #[test]
    fn test_deterministic_generation() {
        let a = SyntheticScenario::with_hole_count(6, 7).generate();
        let b = SyntheticScenario::with_hole_count(6, 7).generate();

        assert_eq!(a.course, b.course);
        assert_eq!(a.stamps, b.stamps);
    }

    #[test]
    fn test_hole_lengths_in_range() {
        let scenario = SyntheticScenario::with_hole_count(12, 3);
        let round = scenario.generate();

        for hole in &round.course.holes {
            let len = hole.length("reg", "A").unwrap();
            assert!(
                len > 89.0 && len < 301.0,
                "hole {} length {}m outside range",
                hole.id,
                len
            );
        }
    }

    #[test]
    fn test_track_is_time_ordered() {
        let round = SyntheticScenario::with_hole_count(4, 11).generate();
        for w in round.track.windows(2) {
            assert!(w[0].time <= w[1].time);
        }
        for w in round.events.windows(2) {
            assert!(w[0].time < w[1].time);
        }
    }

    #[test]
    fn test_noise_free_stamps_on_landmarks() {
        let mut scenario = SyntheticScenario::with_hole_count(3, 5);
        scenario.gps_noise_sigma_meters = 0.0;
        let round = scenario.generate();

        let first_tee = round.course.holes[0].tees[0].loc;
        assert!(haversine_distance(&round.stamps[0].loc, &first_tee) < 1e-6);

        let first_pin = round.course.holes[0].pins[0].loc;
        assert!(haversine_distance(&round.stamps[3].loc, &first_pin) < 1e-6);
    }
}
