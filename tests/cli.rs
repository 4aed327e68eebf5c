// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn mandel() -> Command {
    Command::cargo_bin("mandel").unwrap()
}

#[test]
fn small_run_reports_both_strategies() {
    mandel()
        .args(&["--size", "64x48", "--threads", "4", "--runs", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[mandelbrot serial]"))
        .stdout(predicate::str::contains("[mandelbrot thread block]"))
        .stdout(predicate::str::contains("[mandelbrot thread interleaved]"))
        .stdout(predicate::str::contains("speedup from 4 threads"));
}

#[test]
fn detail_view_with_one_strategy() {
    mandel()
        .args(&[
            "-v", "2", "-s", "40x30", "-t", "3", "--strategy", "striped", "-i", "512",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("interleaved"))
        .stdout(predicate::str::contains("thread block").not());
}

#[test]
fn images_land_in_the_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    mandel()
        .args(&["-s", "32x32", "-t", "2", "-r", "1", "-o"])
        .arg(dir.path())
        .assert()
        .success();
    for name in &[
        "mandelbrot-serial.ppm",
        "mandelbrot-thread-block.ppm",
        "mandelbrot-thread-interleaved.ppm",
    ] {
        assert!(dir.path().join(name).exists(), "{} missing", name);
    }
}

#[test]
fn too_many_threads_is_a_configuration_error() {
    mandel()
        .args(&["-s", "64x64", "-t", "64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max allowed threads is 48"));
}

#[test]
fn raised_ceiling_allows_more_threads() {
    mandel()
        .args(&["-s", "16x64", "-t", "64", "--max-threads", "64", "-r", "1"])
        .assert()
        .success();
}

#[test]
fn uneven_interleave_is_a_configuration_error() {
    mandel()
        .args(&["-s", "64x50", "-t", "4", "--strategy", "interleaved"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn uneven_height_is_fine_in_blocks() {
    mandel()
        .args(&["-s", "64x50", "-t", "4", "--strategy", "block", "-r", "1"])
        .assert()
        .success();
}

#[test]
fn bad_view_prints_usage() {
    mandel()
        .args(&["-v", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("USAGE"));
}

#[test]
fn unparseable_thread_count_fails() {
    mandel()
        .args(&["-t", "many"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse thread count"));
}

#[test]
fn overflowing_size_is_a_configuration_error() {
    mandel()
        .args(&["-s", "18446744073709551615x2", "-t", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("too large"));
}
