use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binaries that are guaranteed not to exist, so nothing is ever converted.
const NO_FFMPEG: &str = "/nonexistent/ffmpeg";
const NO_FFPROBE: &str = "/nonexistent/ffprobe";

fn audioconv(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("audioconv").unwrap();
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .args(["--ffmpeg-bin", NO_FFMPEG, "--ffprobe-bin", NO_FFPROBE]);
    cmd
}

fn touch(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, b"RIFF").unwrap();
    path
}

#[test]
fn missing_output_directory_aborts() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "a.wav");
    touch(&dir, "b.wav");

    audioconv(dir.path())
        .args(["-o", "./missingdir", "a.wav", "b.wav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Output directory \"./missingdir\" does not exist. Please create it first.",
        ))
        .stdout(predicate::str::contains("Processing").not());
}

#[test]
fn output_file_with_many_inputs_aborts() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "a.wav");
    touch(&dir, "b.wav");
    touch(&dir, "out.mp3");

    audioconv(dir.path())
        .args(["-o", "out.mp3", "a.wav", "b.wav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a file"))
        .stdout(predicate::str::contains("Processing").not());
}

#[test]
fn missing_input_is_skipped() {
    let dir = TempDir::new().unwrap();

    audioconv(dir.path())
        .args(["-b", "128k", "nope.wav"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Error: Input file \"nope.wav\" does not exist. Skipping.",
        ))
        .stdout(predicate::str::contains("All files have been processed"));
}

#[test]
fn engine_failures_do_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "a.wav");
    touch(&dir, "b.wav");

    audioconv(dir.path())
        .args(["-b", "128k", "a.wav", "b.wav"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to convert a.wav"))
        .stderr(predicate::str::contains("Failed to convert b.wav"))
        .stdout(predicate::str::contains("Failed to convert").not())
        .stdout(predicate::str::contains("All files have been processed"));
}

#[test]
fn input_without_file_name_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "a.wav");

    audioconv(dir.path())
        .args(["-b", "128k", "a.wav", ".."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing: a.wav"))
        .stderr(predicate::str::contains("Failed to convert a.wav"))
        .stderr(predicate::str::contains(
            "Failed to convert ..: no output file name can be derived from the input",
        ))
        .stdout(predicate::str::contains("All files have been processed"));
}

#[test]
fn dry_run_with_explicit_bitrate() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "a.wav");

    audioconv(dir.path())
        .args(["--dry-run", "-b", "128k", "-o", "out.mp3", "a.wav"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Target:     out.mp3"))
        .stdout(predicate::str::contains("Bitrate:    128k"))
        .stdout(predicate::str::contains("[dry-run] <ffmpeg>"))
        .stdout(predicate::str::contains("-b:a 128k"))
        .stdout(predicate::str::contains("Could not detect").not());

    assert!(!dir.path().join("out.mp3").exists());
}

#[test]
fn undetected_bitrate_falls_back_to_auto() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "a.wav");

    audioconv(dir.path())
        .args(["-D", "-f", "ogg", "a.wav"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[a.wav] Warning: Could not detect source bitrate. Defaulting to encoder settings.",
        ))
        .stdout(predicate::str::contains("Target:     a.ogg"))
        .stdout(predicate::str::contains("Bitrate:    auto"));
}
