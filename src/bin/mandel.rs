// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate mandelthreads;

use clap::{App, Arg, ArgMatches};
use mandelthreads::config::{default_threads, DEFAULT_HEIGHT, DEFAULT_ITERATIONS, DEFAULT_WIDTH};
use mandelthreads::{Config, Harness, MandelError, Strategy, View, MAX_THREADS};
use std::path::PathBuf;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

const VIEW: &str = "view";
const THREADS: &str = "threads";
const STRATEGY: &str = "strategy";
const ITERATIONS: &str = "iterations";
const SIZE: &str = "size";
const OUTPUT_DIR: &str = "output-dir";
const MAX_THREADS_ARG: &str = "max-threads";
const RUNS: &str = "runs";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandel")
        .version("0.1.0")
        .about("Renders the Mandelbrot set serially and on threads, and compares the two")
        .arg(
            Arg::with_name(VIEW)
                .long(VIEW)
                .short("v")
                .takes_value(true)
                .default_value("1")
                .possible_values(&["1", "2"])
                .help("Use specified view settings"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| validate_number::<usize>(&s, "Could not parse thread count"))
                .help("Number of threads, the main thread included [default: CPU count]"),
        )
        .arg(
            Arg::with_name(STRATEGY)
                .long(STRATEGY)
                .takes_value(true)
                .default_value("both")
                .possible_values(&["block", "interleaved", "striped", "both"])
                .help("How rows are divided between threads"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .validator(|s| validate_number::<u32>(&s, "Could not parse iteration count"))
                .help("Maximum iterations per pixel"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse image size"))
                .help("Size of the image, as WIDTHxHEIGHT"),
        )
        .arg(
            Arg::with_name(OUTPUT_DIR)
                .long(OUTPUT_DIR)
                .short("o")
                .takes_value(true)
                .help("Write the rendered images into this directory"),
        )
        .arg(
            Arg::with_name(MAX_THREADS_ARG)
                .long(MAX_THREADS_ARG)
                .takes_value(true)
                .validator(|s| validate_number::<usize>(&s, "Could not parse thread ceiling"))
                .help("Refuse thread counts above this"),
        )
        .arg(
            Arg::with_name(RUNS)
                .long(RUNS)
                .short("r")
                .takes_value(true)
                .validator(|s| validate_number::<usize>(&s, "Could not parse run count"))
                .help("Timed runs per parallel strategy"),
        )
        .get_matches()
}

fn number<T: FromStr>(matches: &ArgMatches, name: &str, default: T) -> T {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .unwrap_or(default)
}

fn config(matches: &ArgMatches) -> Result<Config, MandelError> {
    let (width, height) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair(s, 'x'))
        .unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT));
    let view = View::from_str(matches.value_of(VIEW).unwrap_or("1"))?;
    let strategies = match matches.value_of(STRATEGY).unwrap_or("both") {
        "both" => Strategy::ALL.to_vec(),
        s => vec![Strategy::from_str(s)?],
    };
    let output_dir = matches.value_of(OUTPUT_DIR).map(PathBuf::from);

    let defaults = Config::default();
    Ok(Config {
        width,
        height,
        max_iterations: number(matches, ITERATIONS, DEFAULT_ITERATIONS),
        view,
        threads: number(matches, THREADS, default_threads(height)),
        max_threads: number(matches, MAX_THREADS_ARG, MAX_THREADS),
        strategies,
        parallel_runs: number(matches, RUNS, defaults.parallel_runs),
        output_dir,
        ..defaults
    })
}

fn main() {
    env_logger::init();
    let matches = args();

    let result = config(&matches)
        .and_then(Harness::new)
        .and_then(|harness| {
            info!("{:?}", harness.config());
            harness.run()
        });

    match result {
        Ok(report) => print!("{}", report),
        Err(e) => {
            if e.is_configuration() {
                eprintln!("Configuration error: {}", e);
            } else if e.is_mismatch() {
                eprintln!("Error: thread output differs from sequential output: {}", e);
            } else {
                eprintln!("Render failure: {}", e);
            }
            std::process::exit(1);
        }
    }
}
