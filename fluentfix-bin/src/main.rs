use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context};
use gumdrop::Options;
use serde::Serialize;
use serde_json::{json, Value};

use fluentfix::metrics::{self, ErrorRate, TextAnalysis, TypingErrors, TypingSpeed};
use fluentfix::normalize;
use fluentfix::{find_differences, Correction, CorrectionRecord, Corrector, CorrectorConfig, StageSet};

trait OutputWriter {
    fn write_correction(&mut self, input: &str, correction: &Correction, records: &[CorrectionRecord]);
    fn write_differences(&mut self, records: &[CorrectionRecord]);
    fn write_word(&mut self, word: &str, is_correct: bool, suggestions: &[String]);
    fn write_analysis(&mut self, text: &str, analysis: &TextAnalysis);
    fn write_comparison(&mut self, comparison: &Comparison);
    fn write_typing_speed(&mut self, speed: &TypingSpeed);
    fn finish(&mut self) -> anyhow::Result<()>;
}

#[derive(Serialize)]
struct Comparison {
    accuracy: f64,
    error_rate: ErrorRate,
    typing_errors: TypingErrors,
    differences: Vec<CorrectionRecord>,
}

struct StdoutWriter;

impl StdoutWriter {
    fn print_records(records: &[CorrectionRecord]) {
        for record in records {
            println!(
                "  {} -> {}\t[{}] {} ({:.2})",
                record.original, record.corrected, record.kind, record.reason, record.confidence
            );
        }
    }
}

impl OutputWriter for StdoutWriter {
    fn write_correction(&mut self, input: &str, correction: &Correction, records: &[CorrectionRecord]) {
        println!("Input:     {}", input);
        println!("Corrected: {}", correction.text);
        for s in &correction.suggestions {
            println!("  {:<12} {:.2}\t{:?} -> {:?}", s.kind, s.confidence, s.original, s.corrected);
        }
        if !records.is_empty() {
            println!("Changes:");
            StdoutWriter::print_records(records);
        }
        println!();
    }

    fn write_differences(&mut self, records: &[CorrectionRecord]) {
        if records.is_empty() {
            println!("No paired changes");
        }
        StdoutWriter::print_records(records);
    }

    fn write_word(&mut self, word: &str, is_correct: bool, suggestions: &[String]) {
        println!(
            "Input: {}\t\t[{}]",
            word,
            if is_correct { "CORRECT" } else { "INCORRECT" }
        );
        for suggestion in suggestions {
            println!("{}", suggestion);
        }
        println!();
    }

    fn write_analysis(&mut self, _text: &str, analysis: &TextAnalysis) {
        println!("Words:                  {}", analysis.word_count);
        println!("Characters:             {}", analysis.character_count);
        println!("Sentences:              {}", analysis.sentence_count);
        println!("Paragraphs:             {}", analysis.paragraph_count);
        println!("Words per sentence:     {}", analysis.avg_words_per_sentence);
        println!("Readability:            {}", analysis.readability_score);
        println!("Fluency:                {}", analysis.fluency_score);
    }

    fn write_comparison(&mut self, comparison: &Comparison) {
        println!("Changed words:  {:.1}%", comparison.accuracy);
        println!(
            "Error rate:     {}% ({} errors, accuracy {}%)",
            comparison.error_rate.error_rate,
            comparison.error_rate.errors_corrected,
            comparison.error_rate.accuracy_rate
        );
        println!(
            "Typing errors:  {} of {} words",
            comparison.typing_errors.errors_corrected, comparison.typing_errors.total_words
        );
        StdoutWriter::print_records(&comparison.differences);
    }

    fn write_typing_speed(&mut self, speed: &TypingSpeed) {
        println!("{} wpm, {} cpm", speed.wpm, speed.cpm);
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonWriter {
    results: Vec<Value>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { results: vec![] }
    }
}

impl OutputWriter for JsonWriter {
    fn write_correction(&mut self, input: &str, correction: &Correction, records: &[CorrectionRecord]) {
        self.results.push(json!({
            "input": input,
            "text": correction.text,
            "suggestions": correction.suggestions,
            "records": records,
        }));
    }

    fn write_differences(&mut self, records: &[CorrectionRecord]) {
        self.results.push(json!(records));
    }

    fn write_word(&mut self, word: &str, is_correct: bool, suggestions: &[String]) {
        self.results.push(json!({
            "word": word,
            "is_correct": is_correct,
            "suggestions": suggestions,
        }));
    }

    fn write_analysis(&mut self, text: &str, analysis: &TextAnalysis) {
        self.results.push(json!({ "text": text, "analysis": analysis }));
    }

    fn write_comparison(&mut self, comparison: &Comparison) {
        self.results.push(json!(comparison));
    }

    fn write_typing_speed(&mut self, speed: &TypingSpeed) {
        self.results.push(json!(speed));
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

fn writer(use_json: bool) -> Box<dyn OutputWriter> {
    if use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    }
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "correct text and show the changes made")]
    Correct(CorrectArgs),

    #[options(help = "list the word replacements between two texts")]
    Diff(DiffArgs),

    #[options(help = "print counts, readability and fluency of a text")]
    Analyze(AnalyzeArgs),

    #[options(help = "check words against the dictionary and suggest replacements")]
    Suggest(SuggestArgs),

    #[options(help = "compare an original text with its correction")]
    Compare(DiffArgs),

    #[options(help = "words and characters per minute for a typed text")]
    TypingSpeed(TypingSpeedArgs),
}

#[derive(Debug, Options)]
struct CorrectArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "comma-separated stages to run (spelling,grammar,punctuation,fluency)")]
    stages: Option<String>,

    #[options(help = "minimum confidence for fluency suggestions")]
    threshold: Option<f64>,

    #[options(help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[options(help = "normalize whitespace and punctuation spacing first")]
    preprocess: bool,

    #[options(help = "expand contractions first")]
    expand_contractions: bool,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "text to be corrected; one text per line of stdin if omitted")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct DiffArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "original and corrected text")]
    texts: Vec<String>,
}

#[derive(Debug, Options)]
struct AnalyzeArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "text to analyze; stdin if omitted")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct SuggestArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[options(help = "maximum number of suggestions per word")]
    limit: Option<usize>,

    #[options(short = "S", help = "always show suggestions even if word is correct")]
    always_suggest: bool,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "words to be checked")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct TypingSpeedArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "seconds taken to type the text", required)]
    seconds: f64,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "typed text; stdin if omitted")]
    inputs: Vec<String>,
}

fn read_stdin() -> anyhow::Result<String> {
    eprintln!("Reading from stdin...");
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("reading stdin")?;
    Ok(buffer)
}

fn joined_or_stdin(inputs: Vec<String>) -> anyhow::Result<String> {
    if inputs.is_empty() {
        read_stdin()
    } else {
        Ok(inputs.join(" "))
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<CorrectorConfig> {
    match path {
        Some(path) => CorrectorConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(CorrectorConfig::default()),
    }
}

fn pair(texts: Vec<String>) -> anyhow::Result<(String, String)> {
    let mut texts = texts.into_iter();
    match (texts.next(), texts.next(), texts.next()) {
        (Some(original), Some(corrected), None) => Ok((original, corrected)),
        _ => bail!("expected exactly two texts: ORIGINAL CORRECTED"),
    }
}

fn correct(args: CorrectArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(stages) = &args.stages {
        config.stages = StageSet::parse_list(stages)?;
    }
    if let Some(threshold) = args.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            bail!("threshold must lie in [0, 1], got {}", threshold);
        }
        config.confidence_threshold = threshold;
    }

    let corrector = Corrector::from_config(&config)?;
    let mut writer = writer(args.use_json);

    let texts: Vec<String> = if args.inputs.is_empty() {
        read_stdin()?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![args.inputs.join(" ")]
    };

    for text in texts {
        let mut input = text;
        if args.expand_contractions {
            input = normalize::expand_contractions(&input);
        }
        if args.preprocess {
            input = normalize::preprocess(&input);
        }

        let correction = corrector.correct(&input, &config.stages, config.confidence_threshold);
        let records = find_differences(&input, &correction.text);
        writer.write_correction(&input, &correction, &records);
    }

    writer.finish()
}

fn diff(args: DiffArgs) -> anyhow::Result<()> {
    let (original, corrected) = pair(args.texts)?;
    let mut writer = writer(args.use_json);
    writer.write_differences(&find_differences(&original, &corrected));
    writer.finish()
}

fn compare(args: DiffArgs) -> anyhow::Result<()> {
    let (original, corrected) = pair(args.texts)?;
    let comparison = Comparison {
        accuracy: metrics::accuracy(&original, &corrected),
        error_rate: metrics::error_rate(&original, &corrected),
        typing_errors: metrics::typing_errors(&original, &corrected),
        differences: find_differences(&original, &corrected),
    };

    let mut writer = writer(args.use_json);
    writer.write_comparison(&comparison);
    writer.finish()
}

fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let text = joined_or_stdin(args.inputs)?;
    let mut writer = writer(args.use_json);
    writer.write_analysis(&text, &metrics::analyze(&text));
    writer.finish()
}

fn suggest(args: SuggestArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let limit = args.limit.unwrap_or(config.speller.n_best);
    let corrector = Corrector::from_config(&config)?;
    let mut writer = writer(args.use_json);

    let words: Vec<String> = if args.inputs.is_empty() {
        read_stdin()?.split_whitespace().map(str::to_string).collect()
    } else {
        args.inputs
    };

    for word in words {
        let is_correct = corrector.is_word_correct(&word);
        let suggestions = if args.always_suggest || !is_correct {
            corrector.word_suggestions(&word, limit)
        } else {
            vec![]
        };
        writer.write_word(&word, is_correct, &suggestions);
    }

    writer.finish()
}

fn typing_speed(args: TypingSpeedArgs) -> anyhow::Result<()> {
    let text = joined_or_stdin(args.inputs)?;
    let mut writer = writer(args.use_json);
    writer.write_typing_speed(&metrics::typing_speed(text.trim_end(), args.seconds));
    writer.finish()
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();

    match args.command {
        None => Ok(()),
        Some(Command::Correct(args)) => correct(args),
        Some(Command::Diff(args)) => diff(args),
        Some(Command::Analyze(args)) => analyze(args),
        Some(Command::Suggest(args)) => suggest(args),
        Some(Command::Compare(args)) => compare(args),
        Some(Command::TypingSpeed(args)) => typing_speed(args),
    }
}
