use chrono::prelude::*;
use std::error::Error;
use std::{
    io::Write,
    path::Path,
    time::{Instant, SystemTime},
};

use distance::damerau_levenshtein;
use fluentfix::metrics;
use fluentfix::{Corrector, CorrectorConfig, Suggestion};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use structopt::clap::{App, AppSettings, Arg};

fn load_pairs(
    path: &str,
    max_lines: Option<usize>,
) -> Result<Vec<(String, String)>, Box<dyn Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;

    Ok(rdr
        .records()
        .filter_map(Result::ok)
        .filter_map(|r| {
            r.get(0)
                .and_then(|x| r.get(1).map(|y| (x.to_string(), y.to_string())))
        })
        .take(max_lines.unwrap_or(std::usize::MAX))
        .collect())
}

#[derive(Debug, Default, Serialize, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
struct Time {
    secs: u64,
    subsec_nanos: u32,
}

impl From<std::time::Duration> for Time {
    fn from(d: std::time::Duration) -> Time {
        Time {
            secs: d.as_secs(),
            subsec_nanos: d.subsec_nanos(),
        }
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let ms = self.secs * 1000 + (self.subsec_nanos as u64 / 1_000_000);
        write!(f, "{}ms", ms)
    }
}

#[derive(Debug, Serialize)]
struct AccuracyResult<'a> {
    input: &'a str,
    expected: &'a str,
    corrected: String,
    /// character distance from the input to the expected text
    input_distance: usize,
    /// character distance from the correction to the expected text
    distance: usize,
    /// share of expected words matched position by position
    word_accuracy: f64,
    suggestions: Vec<Suggestion>,
    time: Time,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    config: &'a CorrectorConfig,
    summary: Summary,
    results: Vec<AccuracyResult<'a>>,
    start_timestamp: Time,
    total_time: Time,
}

#[derive(Serialize, Default, Debug, Clone)]
struct Summary {
    total_lines: u32,
    exact: u32,
    improved: u32,
    unchanged: u32,
    worse: u32,
    mean_distance: f64,
    mean_word_accuracy: f64,
    slowest_correction: Time,
    fastest_correction: Time,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let percent = |v: u32| -> String {
            if self.total_lines == 0 {
                return "-".to_string();
            }
            format!("{:.2}%", v as f32 / self.total_lines as f32 * 100f32)
        };

        write!(
            f,
            "[exact] {} [better] {} [same] {} [worse] {} [dist] {:.2} [words] {:.2}% [fast] {} [slow] {}",
            percent(self.exact),
            percent(self.improved),
            percent(self.unchanged),
            percent(self.worse),
            self.mean_distance,
            self.mean_word_accuracy,
            self.fastest_correction,
            self.slowest_correction
        )
    }
}

impl Summary {
    fn new(results: &[AccuracyResult<'_>]) -> Summary {
        let mut summary = Summary::default();

        results.iter().for_each(|result| {
            summary.total_lines += 1;

            if result.corrected == result.expected {
                summary.exact += 1;
            }

            if result.corrected == result.input {
                summary.unchanged += 1;
            } else if result.distance < result.input_distance {
                summary.improved += 1;
            } else if result.distance > result.input_distance {
                summary.worse += 1;
            }
        });

        if !results.is_empty() {
            let n = results.len() as f64;
            summary.mean_distance = results.iter().map(|r| r.distance as f64).sum::<f64>() / n;
            summary.mean_word_accuracy = results.iter().map(|r| r.word_accuracy).sum::<f64>() / n;
        }

        summary.slowest_correction = results.iter().map(|r| r.time).max().unwrap_or_default();
        summary.fastest_correction = results.iter().map(|r| r.time).min().unwrap_or_default();

        summary
    }
}

fn git_output(args: &[&str]) -> Result<String, Box<dyn Error>> {
    let output = std::process::Command::new("git").args(args).output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let matches = App::new("fluentfix-accuracy")
        .setting(AppSettings::ArgRequiredElseHelp)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Accuracy testing for fluentfix.")
        .arg(
            Arg::with_name("config")
                .short("c")
                .takes_value(true)
                .help("Provide JSON config file to override test defaults"),
        )
        .arg(
            Arg::with_name("pairs")
                .value_name("PAIRS")
                .help("The 'input -> expected' list in tab-delimited value file (TSV)"),
        )
        .arg(
            Arg::with_name("json-output")
                .short("o")
                .value_name("JSON-OUTPUT")
                .help("The file path for the JSON report output"),
        )
        .arg(
            Arg::with_name("tsv-output")
                .short("t")
                .value_name("TSV-OUTPUT")
                .help("The file path for the TSV line append"),
        )
        .arg(
            Arg::with_name("max-lines")
                .short("w")
                .takes_value(true)
                .help("Truncate the pair list to max number of lines specified"),
        )
        .get_matches();

    let cfg: CorrectorConfig = match matches.value_of("config") {
        Some(path) => CorrectorConfig::from_path(Path::new(path))?,
        None => CorrectorConfig::default(),
    };

    let corrector = Corrector::from_config(&cfg)?;

    let pairs = match matches.value_of("pairs") {
        Some(path) => load_pairs(
            path,
            matches
                .value_of("max-lines")
                .and_then(|x| x.parse::<usize>().ok()),
        )?,
        None => {
            eprintln!("No pair list for given path; aborting.");
            std::process::exit(1);
        }
    };

    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{pos}/{len} [{percent}%] {wide_bar} {elapsed_precise}"),
    );

    let start_time = Instant::now();
    let results = pairs
        .par_iter()
        .progress_with(pb)
        .map(|(input, expected)| {
            let now = Instant::now();
            let correction = corrector.correct(input, &cfg.stages, cfg.confidence_threshold);
            let time = Time::from(now.elapsed());

            AccuracyResult {
                input,
                expected,
                input_distance: damerau_levenshtein(input, expected),
                distance: damerau_levenshtein(&correction.text, expected),
                word_accuracy: metrics::typing_errors(expected, &correction.text).accuracy,
                corrected: correction.text,
                suggestions: correction.suggestions,
                time,
            }
        })
        .collect::<Vec<_>>();

    let total_time = Time::from(start_time.elapsed());
    let start_timestamp = Time::from(
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default(),
    );

    let summary = Summary::new(&results);
    println!("{}", summary);

    if let Some(path) = matches.value_of("json-output") {
        let output = std::fs::File::create(path)?;
        let report = Report {
            config: &cfg,
            summary,
            results,
            start_timestamp,
            total_time,
        };
        println!("Writing JSON report…");
        serde_json::to_writer_pretty(output, &report)?;
    } else if let Some(path) = matches.value_of("tsv-output") {
        let mut output = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        if output.metadata()?.len() == 0 {
            // new file, write headers:
            output.write_all(
                b"id\tdate\ttag/branch\texact\tbetter\tsame\tworse\tmean dist\tword acc\n",
            )?;
        }

        let row = [
            git_output(&["rev-parse", "--short", "HEAD"])?,
            Local::now().to_rfc3339(),
            git_output(&["describe"])?,
            summary.exact.to_string(),
            summary.improved.to_string(),
            summary.unchanged.to_string(),
            summary.worse.to_string(),
            format!("{:.3}", summary.mean_distance),
            format!("{:.2}", summary.mean_word_accuracy),
        ];
        output.write_all(row.join("\t").as_bytes())?;
        output.write_all(b"\n")?;
    };

    println!("Done!");
    Ok(())
}
