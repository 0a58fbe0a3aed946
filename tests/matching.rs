//! Tests for matching module

use holematch::{Course, Hole, Landmark, Loc, Pin, Tee, infer_course, infer_pin, infer_tee, nearest};

fn hole(id: &str, tees: Vec<Tee>, pins: Vec<Pin>) -> Hole {
    Hole {
        id: id.to_string(),
        tees,
        pins,
        pars: vec![],
    }
}

fn course(id: &str, loc: Loc, holes: Vec<Hole>) -> Course {
    Course {
        id: id.to_string(),
        name: id.to_uppercase(),
        loc,
        holes,
    }
}

fn three_hole_course() -> Course {
    course(
        "park",
        Loc::new(36.0, -115.0),
        vec![
            hole(
                "1",
                vec![Tee::new("reg", Loc::new(36.0000, -115.0000))],
                vec![Pin::new("A", Loc::new(36.0010, -115.0000))],
            ),
            hole(
                "2",
                vec![
                    Tee::new("reg", Loc::new(36.0012, -115.0002)),
                    Tee::new("long", Loc::new(36.0014, -115.0004)),
                ],
                vec![Pin::new("A", Loc::new(36.0012, -115.0020))],
            ),
            hole(
                "3",
                vec![Tee::new("reg", Loc::new(36.0010, -115.0024))],
                vec![
                    Pin::new("A", Loc::new(36.0000, -115.0024)),
                    Pin::new("B", Loc::new(35.9995, -115.0030)),
                ],
            ),
        ],
    )
}

#[test]
fn test_nearest_empty() {
    let pins: Vec<Pin> = vec![];
    assert!(nearest(&Loc::new(36.0, -115.0), &pins).is_none());
}

#[test]
fn test_nearest_returns_distance() {
    let pins = vec![
        Pin::new("far", Loc::new(36.01, -115.0)),
        Pin::new("near", Loc::new(36.001, -115.0)),
    ];
    let (pin, dist) = nearest(&Loc::new(36.0, -115.0), &pins).unwrap();
    assert_eq!(pin.id(), "near");
    assert!((dist - 111.3).abs() < 0.5);
}

#[test]
fn test_nearest_tie_first_wins() {
    // Identical locations give bit-identical distances
    let spot = Loc::new(36.002, -115.0);
    let pins = vec![Pin::new("first", spot), Pin::new("second", spot)];
    let (pin, _) = nearest(&Loc::new(36.0, -115.0), &pins).unwrap();
    assert_eq!(pin.id, "first");

    let reversed = vec![Pin::new("second", spot), Pin::new("first", spot)];
    let (pin, _) = nearest(&Loc::new(36.0, -115.0), &reversed).unwrap();
    assert_eq!(pin.id, "second");
}

#[test]
fn test_infer_tee_across_holes() {
    let course = three_hole_course();

    let (hole, tee) = infer_tee(&Loc::new(36.00001, -115.0), &course).unwrap();
    assert_eq!((hole.id.as_str(), tee.id.as_str()), ("1", "reg"));

    let (hole, tee) = infer_tee(&Loc::new(36.00141, -115.00041), &course).unwrap();
    assert_eq!((hole.id.as_str(), tee.id.as_str()), ("2", "long"));

    let (hole, _) = infer_tee(&Loc::new(36.0011, -115.0026), &course).unwrap();
    assert_eq!(hole.id, "3");
}

#[test]
fn test_infer_tee_tie_prefers_earlier_hole() {
    let shared = Loc::new(36.0, -115.0);
    let course = course(
        "shared",
        shared,
        vec![
            hole(
                "1",
                vec![Tee::new("reg", shared)],
                vec![Pin::new("A", Loc::new(36.001, -115.0))],
            ),
            hole(
                "2",
                vec![Tee::new("reg", shared)],
                vec![Pin::new("A", Loc::new(35.999, -115.0))],
            ),
        ],
    );

    let (hole, _) = infer_tee(&Loc::new(36.0005, -115.0005), &course).unwrap();
    assert_eq!(hole.id, "1");
}

#[test]
fn test_infer_tee_without_tees() {
    let course = course("bare", Loc::new(36.0, -115.0), vec![]);
    assert!(infer_tee(&Loc::new(36.0, -115.0), &course).is_none());
}

#[test]
fn test_infer_pin_within_hole() {
    let course = three_hole_course();
    let hole3 = course.get_hole("3").unwrap();

    // Closer to B, and hole 1's pin is never considered
    let pin = infer_pin(&Loc::new(35.9996, -115.0029), hole3).unwrap();
    assert_eq!(pin.id, "B");

    let pin = infer_pin(&Loc::new(36.0010, -115.0000), hole3).unwrap();
    assert_eq!(pin.id, "A");
}

#[test]
fn test_infer_course() {
    let courses = vec![
        course("vegas", Loc::new(36.06, -115.12), vec![]),
        course("henderson", Loc::new(36.03, -114.98), vec![]),
        course("reno", Loc::new(39.53, -119.81), vec![]),
    ];

    let found = infer_course(&Loc::new(36.031, -114.985), &courses).unwrap();
    assert_eq!(found.id, "henderson");
    assert_eq!(found.loc(), Loc::new(36.03, -114.98));

    assert!(infer_course(&Loc::new(36.0, -115.0), &[]).is_none());
}
