//! holematch CLI - Debug tool for round segmentation
//!
//! Usage:
//!   holematch-cli interpolate <recording.gpx> <timestamps.csv> [--output <stamps.csv>]
//!   holematch-cli segment <course.json> <stamps.csv> [--output <round.csv>] [--json <round.json>]
//!   holematch-cli course <course.json>
//!   holematch-cli infer <stamps.csv> <courses-dir>
//!   holematch-cli make-course <id> <name> <tees.csv> <pins.csv> [--output <course.json>]
//!   holematch-cli set-par <course.json> <hole> <tee> <pin> <par>
//!
//! This tool runs the segmentation pipeline on files and prints verbose
//! debug output, helping to understand where hole transitions are detected.

use anyhow::{Context, Result, bail};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use gpx::{Gpx, read};
use holematch::{
    Course, DiscLabel, LandmarkRow, Loc, RoundRow, RoundSession, SegmentConfig, Stamp, ThrowEvent,
    TrackPoint, geo_utils::path_distance, infer_course, interpolate::interpolate_track,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "holematch-cli")]
#[command(about = "Debug tool for disc golf round segmentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Place logged throw times on a GPX recording
    Interpolate {
        /// GPX recording of the round
        gpx: PathBuf,

        /// CSV of `time,disc` lines (RFC 3339 times, no header)
        timestamps: PathBuf,

        /// Output stamp CSV (`lat,lon,disc`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Segment a round into holes
    Segment {
        /// Course JSON file
        course: PathBuf,

        /// Stamp CSV (`lat,lon,disc`)
        stamps: PathBuf,

        /// Output round table CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output round record JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Round ID for the JSON record (defaults to the stamp file name)
        #[arg(long)]
        round_id: Option<String>,

        /// Threshold config JSON (camelCase keys, missing keys use defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the tee threshold in meters
        #[arg(long)]
        tee_threshold: Option<f64>,

        /// Override the pin threshold in meters
        #[arg(long)]
        pin_threshold: Option<f64>,

        /// Override the drive threshold in meters
        #[arg(long)]
        drive_threshold: Option<f64>,

        /// Snap each hole's first and last stamps onto its tee and pin
        #[arg(long)]
        snap: bool,
    },

    /// Show a course's tee/pin combinations
    Course {
        /// Course JSON file
        course: PathBuf,
    },

    /// Pick the nearest course for a round from a folder of course files
    Infer {
        /// Stamp CSV (`lat,lon,disc`)
        stamps: PathBuf,

        /// Folder containing course JSON files
        courses: PathBuf,
    },

    /// Build a course file from surveyed tee and pin positions
    MakeCourse {
        /// Course ID
        id: String,

        /// Course display name
        name: String,

        /// Tee CSV (`hole,variation,lat,lon`)
        tees: PathBuf,

        /// Pin CSV (`hole,variation,lat,lon`)
        pins: PathBuf,

        /// Output course JSON (defaults to `<id>.json`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Set the par of one tee/pin combination in a course file
    SetPar {
        /// Course JSON file, rewritten in place
        course: PathBuf,

        hole: String,
        tee: String,
        pin: String,
        par: u32,
    },
}

/// Stamp CSV line.
#[derive(Debug, Serialize, Deserialize)]
struct StampRecord {
    lat: f64,
    lon: f64,
    disc: String,
}

/// Round table CSV line.
#[derive(Debug, Serialize)]
struct RoundCsvRow<'a> {
    row: usize,
    hole: &'a str,
    tee: &'a str,
    pin: &'a str,
    lat: f64,
    lon: f64,
    disc: &'a str,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Interpolate {
            gpx,
            timestamps,
            output,
        } => run_interpolate(&gpx, &timestamps, output.as_deref(), cli.verbose),
        Commands::Segment {
            course,
            stamps,
            output,
            json,
            round_id,
            config,
            tee_threshold,
            pin_threshold,
            drive_threshold,
            snap,
        } => {
            let mut config = match config {
                Some(path) => load_config(&path)?,
                None => SegmentConfig::default(),
            };
            if let Some(v) = tee_threshold {
                config.tee_threshold = v;
            }
            if let Some(v) = pin_threshold {
                config.pin_threshold = v;
            }
            if let Some(v) = drive_threshold {
                config.drive_threshold = v;
            }
            run_segment(
                &course,
                &stamps,
                config,
                SegmentOutput {
                    csv: output.as_deref(),
                    json: json.as_deref(),
                    round_id,
                },
                snap,
                cli.verbose,
            )
        }
        Commands::Course { course } => run_course(&course),
        Commands::Infer { stamps, courses } => run_infer(&stamps, &courses, cli.verbose),
        Commands::MakeCourse {
            id,
            name,
            tees,
            pins,
            output,
        } => {
            let output = output.unwrap_or_else(|| format!("{}.json", id).into());
            run_make_course(id, name, &tees, &pins, &output)
        }
        Commands::SetPar {
            course,
            hole,
            tee,
            pin,
            par,
        } => run_set_par(&course, &hole, &tee, &pin, par),
    }
}

// ============================================================================
// Loading
// ============================================================================

fn load_course(path: &Path) -> Result<Course> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading course {}", path.display()))?;
    let course = Course::from_json_str(&json)
        .with_context(|| format!("parsing course {}", path.display()))?;
    course.validate()?;
    Ok(course)
}

fn load_config(path: &Path) -> Result<SegmentConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    Ok(serde_json::from_str(&json)?)
}

fn load_stamps(path: &Path) -> Result<Vec<Stamp>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening stamps {}", path.display()))?;
    let mut stamps = Vec::new();
    for record in reader.deserialize() {
        let record: StampRecord = record?;
        stamps.push(Stamp::new(Loc::new(record.lat, record.lon), record.disc));
    }
    if stamps.is_empty() {
        bail!("no stamps in {}", path.display());
    }
    Ok(stamps)
}

/// Read `hole,variation,lat,lon` rows.
fn load_landmarks(path: &Path) -> Result<Vec<LandmarkRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening landmarks {}", path.display()))?;
    let mut rows = Vec::new();
    for (i, record) in reader.deserialize().enumerate() {
        let row: LandmarkRow = record.with_context(|| format!("line {}", i + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parse a GPX file into a time-stamped track (seconds since the epoch).
fn load_track(path: &Path) -> Result<Vec<TrackPoint>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let gpx: Gpx = read(BufReader::new(file))
        .map_err(|e| anyhow::anyhow!("parsing {}: {}", path.display(), e))?;

    let mut track = Vec::new();
    let mut untimed = 0;
    for trk in &gpx.tracks {
        for segment in &trk.segments {
            for pt in &segment.points {
                let time = pt
                    .time
                    .as_ref()
                    .and_then(|t| t.format().ok())
                    .and_then(|s| DateTime::parse_from_rfc3339(&s).ok());
                let Some(time) = time else {
                    untimed += 1;
                    continue;
                };
                track.push(TrackPoint {
                    time: epoch_seconds(&time),
                    loc: Loc::new(pt.point().y(), pt.point().x()),
                });
            }
        }
    }

    if untimed > 0 {
        warn!("skipped {} track points without a time", untimed);
    }
    if track.is_empty() {
        bail!("no timed track points in {}", path.display());
    }
    Ok(track)
}

/// Parse `time,disc` lines without a header.
fn load_events(path: &Path) -> Result<Vec<ThrowEvent>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("opening timestamps {}", path.display()))?;

    let mut events = Vec::new();
    for (i, record) in reader.deserialize().enumerate() {
        let (time, disc): (String, String) = record?;
        let time = DateTime::parse_from_rfc3339(time.trim())
            .with_context(|| format!("line {}: bad time '{}'", i + 1, time))?;
        events.push(ThrowEvent::new(epoch_seconds(&time), disc));
    }
    Ok(events)
}

fn epoch_seconds<Tz: chrono::TimeZone>(time: &DateTime<Tz>) -> f64 {
    time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) / 1e9
}

// ============================================================================
// Commands
// ============================================================================

fn run_interpolate(
    gpx: &Path,
    timestamps: &Path,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let track = load_track(gpx)?;
    let events = load_events(timestamps)?;
    info!(
        "track: {} points, {:.2}km; {} throw times",
        track.len(),
        path_distance(&track.iter().map(|p| p.loc).collect::<Vec<_>>()) / 1000.0,
        events.len()
    );

    let stamps = interpolate_track(&track, &events)?;

    if verbose {
        for (i, stamp) in stamps.iter().enumerate() {
            println!(
                "  {:3}  {:.6}, {:.6}  {}",
                i, stamp.loc.latitude, stamp.loc.longitude, stamp.disc
            );
        }
    }

    match output {
        Some(path) => {
            let mut writer = csv::Writer::from_path(path)?;
            for stamp in &stamps {
                writer.serialize(StampRecord {
                    lat: stamp.loc.latitude,
                    lon: stamp.loc.longitude,
                    disc: stamp.disc.to_string(),
                })?;
            }
            writer.flush()?;
            println!("Wrote {} stamps to {}", stamps.len(), path.display());
        }
        None => println!("Interpolated {} stamps", stamps.len()),
    }
    Ok(())
}

struct SegmentOutput<'a> {
    csv: Option<&'a Path>,
    json: Option<&'a Path>,
    round_id: Option<String>,
}

fn run_segment(
    course_path: &Path,
    stamps_path: &Path,
    config: SegmentConfig,
    output: SegmentOutput<'_>,
    snap: bool,
    verbose: bool,
) -> Result<()> {
    let course = load_course(course_path)?;
    let stamps = load_stamps(stamps_path)?;

    println!("\n{}", "=".repeat(60));
    println!("SEGMENTING {} stamps on {}", stamps.len(), course.name);
    println!(
        "  thresholds: tee {:.1}m, pin {:.1}m, drive {:.1}m",
        config.tee_threshold, config.pin_threshold, config.drive_threshold
    );
    println!("{}", "=".repeat(60));

    let mut session = RoundSession::with_config(course, stamps, config)?;
    if snap {
        session.snap_to_landmarks()?;
    }

    if verbose {
        print_rows(session.rows());
    }

    let summary = session.summary();
    println!("\n{}", "-".repeat(60));
    println!(
        "{:>5} {:>5} {:>5} {:>8} {:>4} {:>6} {:>4} {:>5}",
        "hole", "tee", "pin", "length", "par", "throws", "res", "total"
    );
    println!("{}", "-".repeat(60));
    for hole in &summary.holes {
        println!(
            "{:>5} {:>5} {:>5} {:>8} {:>4} {:>6} {:>4} {:>5}",
            hole.hole,
            hole.tee,
            hole.pin,
            hole.length
                .map_or_else(|| "-".to_string(), |l| format!("{:.0}m", l)),
            hole.par.map_or_else(|| "-".to_string(), |p| p.to_string()),
            hole.throws,
            hole.result
                .map_or_else(|| "-".to_string(), |r| format!("{:+}", r)),
            hole.total
        );
    }
    println!(
        "\n  {} holes, {} throws, {:+} to par",
        summary.holes.len(),
        summary.total_throws(),
        summary.total_result()
    );
    for hole in summary.holes_missing_par() {
        warn!(
            "no par defined for hole {} tee {} pin {}",
            hole.hole, hole.tee, hole.pin
        );
    }

    if let Some(path) = output.csv {
        write_round_csv(path, session.rows())?;
        println!("Wrote round table to {}", path.display());
    }
    if let Some(path) = output.json {
        let round_id = output.round_id.unwrap_or_else(|| {
            stamps_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("round")
                .to_string()
        });
        let record = session.to_record(&round_id, "");
        fs::write(path, serde_json::to_string_pretty(&record)?)?;
        println!("Wrote round record to {}", path.display());
    }
    Ok(())
}

fn print_rows(rows: &[RoundRow]) {
    let mut current_hole = "";
    for row in rows {
        if row.hole_id != current_hole {
            println!(
                "\n  Hole {} (tee {}, pin {})",
                row.hole_id, row.tee_id, row.pin_id
            );
            current_hole = row.hole_id.as_str();
        }
        let marker = if row.disc == DiscLabel::Basket {
            " *"
        } else {
            ""
        };
        println!(
            "    {:3}  {:.6}, {:.6}  {}{}",
            row.index, row.loc.latitude, row.loc.longitude, row.disc, marker
        );
    }
}

fn write_round_csv(path: &Path, rows: &[RoundRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(RoundCsvRow {
            row: row.index,
            hole: &row.hole_id,
            tee: &row.tee_id,
            pin: &row.pin_id,
            lat: row.loc.latitude,
            lon: row.loc.longitude,
            disc: row.disc.as_str(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn run_course(path: &Path) -> Result<()> {
    let course = load_course(path)?;

    println!("\n{}", "=".repeat(60));
    println!(
        "{} ({}), {} holes",
        course.name,
        course.id,
        course.holes.len()
    );
    println!(
        "  reference: {:.5}, {:.5}",
        course.loc.latitude, course.loc.longitude
    );
    if let Some(center) = course.landmark_center() {
        println!(
            "  landmark center: {:.5}, {:.5}",
            center.latitude, center.longitude
        );
    }
    println!("{}", "=".repeat(60));

    let mut last_hole = String::new();
    for row in course.summary_table() {
        let hole = if row.hole != last_hole {
            row.hole.as_str()
        } else {
            ""
        };
        println!(
            "{:>5} {:>5} {:>5} {:>6.0}m  par {}",
            hole,
            row.tee,
            row.pin,
            row.length,
            row.par.map_or_else(|| "-".to_string(), |p| p.to_string())
        );
        last_hole = row.hole;
    }
    Ok(())
}

fn run_infer(stamps_path: &Path, courses_dir: &Path, verbose: bool) -> Result<()> {
    let stamps = load_stamps(stamps_path)?;

    let mut courses = Vec::new();
    let mut paths: Vec<PathBuf> = fs::read_dir(courses_dir)
        .with_context(|| format!("reading {}", courses_dir.display()))?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    // Directory order is unspecified; keep the tie-break reproducible
    paths.sort();

    for path in paths {
        match load_course(&path) {
            Ok(course) => {
                if verbose {
                    println!("  [OK] {} ({})", course.name, path.display());
                }
                courses.push(course);
            }
            Err(e) => eprintln!("  [ERR] {}: {:#}", path.display(), e),
        }
    }

    let first = &stamps[0].loc;
    match infer_course(first, &courses) {
        Some(course) => println!("{} ({})", course.id, course.name),
        None => bail!("no courses found in {}", courses_dir.display()),
    }
    Ok(())
}

fn run_make_course(
    id: String,
    name: String,
    tees_path: &Path,
    pins_path: &Path,
    output: &Path,
) -> Result<()> {
    let tees = load_landmarks(tees_path)?;
    let pins = load_landmarks(pins_path)?;
    info!("read {} tees and {} pins", tees.len(), pins.len());

    let course = Course::from_landmarks(id, name, &tees, &pins)?;
    fs::write(output, course.to_json_string()?)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Wrote {} ({} holes) to {}",
        course.name,
        course.holes.len(),
        output.display()
    );
    let missing = course.summary_table().len();
    println!("  {} tee/pin combinations without a par", missing);
    Ok(())
}

fn run_set_par(path: &Path, hole_id: &str, tee_id: &str, pin_id: &str, par: u32) -> Result<()> {
    let mut course = load_course(path)?;
    let hole = course
        .hole_mut(hole_id)
        .with_context(|| format!("no hole '{}' in {}", hole_id, path.display()))?;
    hole.set_par(tee_id, pin_id, par)?;

    fs::write(path, course.to_json_string()?)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Hole {} {} -> {}: par {}", hole_id, tee_id, pin_id, par);
    Ok(())
}
