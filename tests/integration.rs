//! Integration tests for the tactician binary.
//!
//! Spawns the engine process with command-line arguments and verifies the
//! single result line it prints on stdout.

use std::io::Write;
use std::process::{Command, Stdio};

/// Runs the binary and returns (success, stdout lines).
fn run_engine(args: &[&str]) -> (bool, Vec<String>) {
    let exe = env!("CARGO_BIN_EXE_tactician");
    let output = Command::new(exe)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .expect("failed to start tactician");
    let stdout = String::from_utf8(output.stdout).expect("stdout is not utf-8");
    (
        output.status.success(),
        stdout.lines().map(str::to_string).collect(),
    )
}

fn decide(position: &str, action: &str, extra: &[&str]) -> String {
    let mut args = vec!["decide", "--position", position, "--action", action, "--seed", "7"];
    args.extend_from_slice(extra);
    let (ok, lines) = run_engine(&args);
    assert!(ok, "decide {action} failed");
    assert_eq!(lines.len(), 1, "expected one line, got {lines:?}");
    lines.into_iter().next().unwrap()
}

/// A rook on the Boss back row with a weakened queen in reach.
const HANGING_QUEEN: &str = "6x6/10/bRa6,pQe6:h1,pPb1/-";

#[test]
fn eval_prints_every_component_and_total() {
    let (ok, lines) = run_engine(&["eval", "--position", HANGING_QUEEN]);
    assert!(ok);
    assert_eq!(lines.len(), 12);
    assert!(lines[0].starts_with("player_hp "));
    assert!(lines.iter().any(|l| l.starts_with("danger ")));

    let total: f32 = lines[11].strip_prefix("total ").unwrap().parse().unwrap();
    let sum: f32 = lines[..11]
        .iter()
        .map(|l| l.rsplit(' ').next().unwrap().parse::<f32>().unwrap())
        .sum();
    assert!((total - sum).abs() < 0.01, "total {total} vs sum {sum}");
}

#[test]
fn move_takes_the_queen() {
    let line = decide(HANGING_QUEEN, "move", &["--depth", "2"]);
    assert!(line.starts_with("best move b0 a6e6 searched "), "{line}");
}

#[test]
fn spawn_with_one_free_tile_is_single() {
    let line = decide("3x3/10/bRa3,bRb3,pPb1/-", "spawn", &[]);
    assert_eq!(line, "best spawn c3 single");
}

#[test]
fn spawn_on_full_row_reports_error() {
    let line = decide("3x2/10/bRa3,bRb3/-", "spawn", &["--kind", "N"]);
    assert_eq!(line, "error spawn no valid target");
}

#[test]
fn buff_names_live_unit() {
    let line = decide("6x6/10/bRa6,bPd4,pQd2/-", "buff", &["--depth", "1"]);
    assert!(line.starts_with("best buff b1 "), "{line}");
}

#[test]
fn tile_without_depth_is_random() {
    let line = decide("4x4/10/pRa1/-", "tile", &["--depth", "0"]);
    assert!(line.starts_with("best tile "), "{line}");
    assert!(line.ends_with(" random"), "{line}");
}

#[test]
fn move_without_depth_is_an_error() {
    let line = decide("4x4/10/bRa4/-", "move", &["--depth", "0"]);
    assert!(line.starts_with("error move invalid input"), "{line}");
}

#[test]
fn config_file_overrides_depth() {
    let dir = std::env::temp_dir().join(format!("tactician-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("engine.json");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, r#"{{ "depth": 0 }}"#).unwrap();
    drop(f);

    let line = decide("4x4/10/bRa4/-", "move", &["--config", path.to_str().unwrap()]);
    assert!(line.starts_with("error move invalid input"), "{line}");
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn bad_position_fails() {
    let (ok, lines) = run_engine(&["eval", "--position", "garbage"]);
    assert!(!ok);
    assert!(lines.is_empty());
}

#[test]
fn bad_action_fails() {
    let (ok, _) = run_engine(&["decide", "--position", "4x4/10/-/-", "--action", "dance"]);
    assert!(!ok);
}
