//! Tests for course module

use holematch::geo_utils::haversine_distance;
use holematch::{Course, Hole, HoleMatchError, LandmarkRow, Loc, Pin, Tee};

const SUNSET_PARK: &str = include_str!("fixtures/sunset_park.json");

fn sunset_park() -> Course {
    Course::from_json_str(SUNSET_PARK).unwrap()
}

#[test]
fn test_parse_course_file() {
    let course = sunset_park();

    assert_eq!(course.id, "sunset_park");
    assert_eq!(course.name, "Sunset Park Las Vegas");
    assert_eq!(course.loc, Loc::new(36.0639, -115.1190));
    assert_eq!(course.holes.len(), 3);
    assert_eq!(course.holes[1].tees.len(), 2);
    assert!(course.validate().is_ok());
}

#[test]
fn test_missing_pars_key_defaults_to_empty() {
    let course = sunset_park();
    let hole3 = course.get_hole("3").unwrap();
    assert!(hole3.pars.is_empty());
}

#[test]
fn test_par_lookup() {
    let course = sunset_park();
    let hole2 = course.get_hole("2").unwrap();

    assert_eq!(hole2.par("reg", "A"), Some(3));
    assert_eq!(hole2.par("long", "A"), Some(4));
}

#[test]
fn test_missing_par_is_none() {
    let course = sunset_park();

    // Unknown tee on a hole with a par table
    assert_eq!(course.get_hole("2").unwrap().par("pro", "A"), None);
    // Hole without any par table
    assert_eq!(course.get_hole("3").unwrap().par("reg", "A"), None);
}

#[test]
fn test_tee_and_pin_lookup() {
    let course = sunset_park();
    let hole1 = course.get_hole("1").unwrap();

    let tee = hole1.get_tee("reg").unwrap();
    let pin = hole1.get_pin("B").unwrap();
    assert_eq!(tee.loc, Loc::new(36.0640, -115.1200));
    assert_eq!(pin.loc, Loc::new(36.0650, -115.1200));
    assert!(hole1.get_pin("C").is_none());
    assert!(course.get_hole("19").is_none());
}

#[test]
fn test_hole_length() {
    let course = sunset_park();
    let hole1 = course.get_hole("1").unwrap();

    let expected = haversine_distance(&Loc::new(36.0640, -115.1200), &Loc::new(36.0650, -115.1200));
    assert_eq!(hole1.length("reg", "B"), Some(expected));
    assert!((expected - 111.3).abs() < 0.5);
    assert_eq!(hole1.length("reg", "Z"), None);
}

#[test]
fn test_tees_in_course_order() {
    let course = sunset_park();
    let tees: Vec<(&str, &str)> = course
        .tees()
        .map(|(hole, tee)| (hole.id.as_str(), tee.id.as_str()))
        .collect();

    assert_eq!(
        tees,
        vec![("1", "reg"), ("2", "reg"), ("2", "long"), ("3", "reg")]
    );
}

#[test]
fn test_summary_table() {
    let course = sunset_park();
    let table = course.summary_table();

    // hole 1: reg x {A, B}; hole 2: {reg, long} x A; hole 3: reg x A
    assert_eq!(table.len(), 5);
    assert_eq!(table[0].hole, "1");
    assert_eq!(table[1].pin, "B");
    assert_eq!(table[3].tee, "long");
    assert_eq!(table[3].par, Some(4));
    assert_eq!(table[4].hole, "3");
    assert_eq!(table[4].par, None);
    for row in &table {
        assert!(row.length > 50.0 && row.length < 250.0);
    }
}

#[test]
fn test_landmark_center() {
    let course = sunset_park();
    let center = course.landmark_center().unwrap();

    // All landmarks sit within a few hundred meters of the reference point
    assert!(haversine_distance(&center, &course.loc) < 300.0);

    let empty = Course {
        id: "empty".to_string(),
        name: "Empty".to_string(),
        loc: Loc::new(0.0, 0.0),
        holes: vec![],
    };
    assert!(empty.landmark_center().is_none());
}

#[test]
fn test_loc_serializes_as_pair() {
    let tee = Tee::new("reg", Loc::new(36.5, -115.25));
    let json = serde_json::to_value(&tee).unwrap();
    assert_eq!(json["loc"], serde_json::json!([36.5, -115.25]));
}

#[test]
fn test_json_round_trip() {
    let course = sunset_park();
    let json = course.to_json_string().unwrap();
    assert_eq!(Course::from_json_str(&json).unwrap(), course);
}

#[test]
fn test_parse_invalid_json() {
    let result = Course::from_json_str("{\"id\": \"broken\"");
    assert!(matches!(result, Err(HoleMatchError::Json(_))));
}

#[test]
fn test_validate_empty_course() {
    let mut course = sunset_park();
    course.holes.clear();
    assert!(matches!(
        course.validate(),
        Err(HoleMatchError::EmptyCourse { course_id }) if course_id == "sunset_park"
    ));
}

#[test]
fn test_validate_hole_without_tees_or_pins() {
    let mut course = sunset_park();
    course.holes.push(Hole {
        id: "4".to_string(),
        tees: vec![],
        pins: vec![Pin::new("A", Loc::new(36.0630, -115.1180))],
        pars: vec![],
    });
    assert!(matches!(
        course.validate(),
        Err(HoleMatchError::HoleWithoutTees { hole_id }) if hole_id == "4"
    ));

    let last = course.holes.last_mut().unwrap();
    last.tees.push(Tee::new("reg", Loc::new(36.0632, -115.1182)));
    last.pins.clear();
    assert!(matches!(
        course.validate(),
        Err(HoleMatchError::HoleWithoutPins { hole_id }) if hole_id == "4"
    ));
}

// ============================================================================
// Authoring
// ============================================================================

fn landmark(hole: &str, variation: &str, lat: f64, lon: f64) -> LandmarkRow {
    LandmarkRow {
        hole: hole.to_string(),
        variation: variation.to_string(),
        lat,
        lon,
    }
}

fn surveyed_tees() -> Vec<LandmarkRow> {
    vec![
        landmark("1", "reg", 36.0640, -115.1200),
        landmark("2", "reg", 36.0652, -115.1195),
        landmark("1", "long", 36.0635, -115.1200),
        landmark("3", "reg", 36.0665, -115.1180),
    ]
}

fn surveyed_pins() -> Vec<LandmarkRow> {
    vec![
        landmark("1", "A", 36.0648, -115.1195),
        landmark("2", "A", 36.0660, -115.1185),
        landmark("3", "A", 36.0672, -115.1170),
        landmark("1", "B", 36.0650, -115.1200),
    ]
}

fn build_survey() -> Course {
    Course::from_landmarks("sunset", "Sunset", &surveyed_tees(), &surveyed_pins()).unwrap()
}

#[test]
fn test_from_landmarks_groups_by_hole() {
    let course = build_survey();

    assert_eq!(course.id, "sunset");
    assert_eq!(course.name, "Sunset");
    let ids: Vec<&str> = course.holes.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    // Rows for a hole need not be adjacent; order within the hole is kept
    let hole1 = course.get_hole("1").unwrap();
    let tees: Vec<&str> = hole1.tees.iter().map(|t| t.id.as_str()).collect();
    let pins: Vec<&str> = hole1.pins.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(tees, vec!["reg", "long"]);
    assert_eq!(pins, vec!["A", "B"]);
    let pin = hole1.get_pin("B").unwrap();
    assert_eq!(pin.loc, Loc::new(36.0650, -115.1200));
    assert!(course.validate().is_ok());
}

#[test]
fn test_from_landmarks_uses_first_tee_as_reference() {
    let course = build_survey();
    assert_eq!(course.loc, Loc::new(36.0640, -115.1200));
}

#[test]
fn test_from_landmarks_leaves_pars_undefined() {
    let course = build_survey();

    assert!(course.holes.iter().all(|h| h.pars.is_empty()));
    assert_eq!(course.get_hole("1").unwrap().par("reg", "A"), None);
    assert!(course.summary_table().iter().all(|row| row.par.is_none()));
}

#[test]
fn test_from_landmarks_without_tees() {
    let result = Course::from_landmarks("empty", "Empty", &[], &surveyed_pins());
    assert!(matches!(
        result,
        Err(HoleMatchError::EmptyCourse { course_id }) if course_id == "empty"
    ));
}

#[test]
fn test_from_landmarks_pin_without_tee() {
    let mut pins = surveyed_pins();
    pins.push(landmark("4", "A", 36.0680, -115.1160));

    let result = Course::from_landmarks("sunset", "Sunset", &surveyed_tees(), &pins);
    assert!(matches!(
        result,
        Err(HoleMatchError::HoleWithoutTees { hole_id }) if hole_id == "4"
    ));
}

#[test]
fn test_from_landmarks_hole_without_pins() {
    let mut pins = surveyed_pins();
    pins.retain(|row| row.hole != "2");

    let result = Course::from_landmarks("sunset", "Sunset", &surveyed_tees(), &pins);
    assert!(matches!(
        result,
        Err(HoleMatchError::HoleWithoutPins { hole_id }) if hole_id == "2"
    ));
}

#[test]
fn test_from_landmarks_duplicate_tee() {
    let mut tees = surveyed_tees();
    tees.push(landmark("2", "reg", 36.0653, -115.1196));

    let result = Course::from_landmarks("sunset", "Sunset", &tees, &surveyed_pins());
    assert!(matches!(
        result,
        Err(HoleMatchError::DuplicateLandmark { hole_id, id }) if hole_id == "2" && id == "reg"
    ));
}

#[test]
fn test_from_landmarks_invalid_location() {
    let mut pins = surveyed_pins();
    pins[1].lat = 95.0;

    let result = Course::from_landmarks("sunset", "Sunset", &surveyed_tees(), &pins);
    assert!(matches!(
        result,
        Err(HoleMatchError::InvalidLocation { latitude, .. }) if latitude == 95.0
    ));
}

#[test]
fn test_landmark_rows_from_csv() {
    let data = "hole,variation,lat,lon\n1,reg,36.064,-115.12\n1,long,36.0635,-115.12\n";
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let rows: Vec<LandmarkRow> = reader.deserialize().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], landmark("1", "long", 36.0635, -115.12));
    assert_eq!(rows[0].loc(), Loc::new(36.064, -115.12));
}

#[test]
fn test_add_landmarks_adds_no_par() {
    let mut course = sunset_park();
    let hole1 = course.hole_mut("1").unwrap();

    hole1.add_tee("pro", Loc::new(36.0630, -115.1205)).unwrap();
    hole1.add_pin("C", Loc::new(36.0655, -115.1190)).unwrap();

    assert_eq!(hole1.tees.len(), 2);
    assert_eq!(hole1.pins.len(), 3);
    assert_eq!(hole1.pars.len(), 2);
    assert_eq!(hole1.par("pro", "A"), None);
    assert_eq!(hole1.par("reg", "C"), None);
    assert_eq!(hole1.par("reg", "A"), Some(3));
}

#[test]
fn test_add_duplicate_or_invalid_landmark() {
    let mut hole = Hole::new("7");
    hole.add_tee("reg", Loc::new(36.0, -115.0)).unwrap();
    hole.add_pin("A", Loc::new(36.001, -115.0)).unwrap();

    assert!(matches!(
        hole.add_tee("reg", Loc::new(36.0002, -115.0)),
        Err(HoleMatchError::DuplicateLandmark { hole_id, id }) if hole_id == "7" && id == "reg"
    ));
    assert!(matches!(
        hole.add_pin("B", Loc::new(f64::NAN, -115.0)),
        Err(HoleMatchError::InvalidLocation { .. })
    ));
    assert_eq!(hole.tees.len(), 1);
    assert_eq!(hole.pins.len(), 1);
}

#[test]
fn test_move_landmarks() {
    let mut course = sunset_park();
    let hole2 = course.hole_mut("2").unwrap();

    hole2.move_tee("long", Loc::new(36.0600, -115.1200)).unwrap();
    hole2.move_pin("A", Loc::new(36.0670, -115.1190)).unwrap();

    let tee = hole2.get_tee("long").unwrap();
    let pin = hole2.get_pin("A").unwrap();
    assert_eq!(tee.loc, Loc::new(36.0600, -115.1200));
    assert_eq!(pin.loc, Loc::new(36.0670, -115.1190));
    // Pars are keyed by id, so they follow the moved landmarks
    assert_eq!(hole2.par("long", "A"), Some(4));
}

#[test]
fn test_move_unknown_or_invalid_landmark() {
    let mut course = sunset_park();
    let hole1 = course.hole_mut("1").unwrap();
    let before = hole1.clone();

    assert!(matches!(
        hole1.move_tee("pro", Loc::new(36.0, -115.0)),
        Err(HoleMatchError::UnknownLandmark { hole_id, id }) if hole_id == "1" && id == "pro"
    ));
    assert!(matches!(
        hole1.move_pin("Z", Loc::new(36.0, -115.0)),
        Err(HoleMatchError::UnknownLandmark { .. })
    ));
    assert!(matches!(
        hole1.move_pin("A", Loc::new(36.0, 200.0)),
        Err(HoleMatchError::InvalidLocation { .. })
    ));
    assert_eq!(*hole1, before);
}

#[test]
fn test_set_par() {
    let mut course = sunset_park();
    let hole3 = course.hole_mut("3").unwrap();

    hole3.set_par("reg", "A", 4).unwrap();
    assert_eq!(hole3.par("reg", "A"), Some(4));

    hole3.set_par("reg", "A", 3).unwrap();
    assert_eq!(hole3.par("reg", "A"), Some(3));
    assert_eq!(hole3.pars.len(), 1);
}

#[test]
fn test_set_par_unknown_landmark() {
    let mut course = sunset_park();
    let hole2 = course.hole_mut("2").unwrap();

    assert!(matches!(
        hole2.set_par("pro", "A", 3),
        Err(HoleMatchError::UnknownLandmark { id, .. }) if id == "pro"
    ));
    assert!(matches!(
        hole2.set_par("reg", "Z", 3),
        Err(HoleMatchError::UnknownLandmark { id, .. }) if id == "Z"
    ));
    assert_eq!(hole2.pars.len(), 2);
    assert!(course.hole_mut("19").is_none());
}

#[test]
fn test_hole_entry_appends_new_hole() {
    let mut course = sunset_park();

    let hole2 = course.hole_entry("2");
    hole2.add_pin("B", Loc::new(36.0662, -115.1183)).unwrap();
    assert_eq!(hole2.pins.len(), 2);
    assert_eq!(course.holes.len(), 3);

    let hole4 = course.hole_entry("4");
    assert_eq!(*hole4, Hole::new("4"));
    assert_eq!(course.holes.len(), 4);
    assert_eq!(course.holes[3].id, "4");
    assert!(matches!(
        course.validate(),
        Err(HoleMatchError::HoleWithoutTees { hole_id }) if hole_id == "4"
    ));
}
