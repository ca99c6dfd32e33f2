//! `riskdash analyze`: run one analysis without the dashboard.

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::config::Config;
use crate::feed::StagedLogFeed;
use crate::models::constants::SAMPLE_NOTE;
use crate::models::{RiskLevel, RiskResult};
use crate::predict::{HttpPredictor, PredictionService};
use crate::session::{AnalysisError, AnalysisSession, Phase, SessionTiming};

/// How often the headless loop advances the session.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Characters of the note echoed before the result.
const PREVIEW_CHARS: usize = 100;

/// Where the note comes from and how the result is printed.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Note file; `-` reads stdin.
    pub file: Option<PathBuf>,
    pub sample: bool,
    /// Skip the settle delay.
    pub no_delay: bool,
    pub json: bool,
}

/// Analyze a note and print the verdict.
pub fn execute(config: &Config, options: &AnalyzeOptions) -> Result<()> {
    let stdin = std::io::stdin();
    let is_terminal = stdin.is_terminal();
    let note = read_note(options, stdin.lock(), is_terminal)?;

    let mut timing = config.session_timing();
    if options.no_delay {
        timing.settle_delay = Duration::ZERO;
    }

    let predictor = HttpPredictor::new(
        &config.endpoint,
        config.connect_timeout(),
        config.response_timeout(),
    )
    .context("Failed to build prediction client")?;

    if !options.json {
        println!("{}", crate::LOGO.cyan());
        println!(
            "\n{} {}",
            "Analyzing note with".bold(),
            predictor.predict_url().cyan()
        );
        println!("Note: '{}'\n", note_preview(&note));
    }

    let mut feed = StagedLogFeed::new(config.feed_interval());
    let json = options.json;
    let outcome = run_analysis(Arc::new(predictor), timing, &mut feed, &note, |line| {
        if !json {
            println!("  {} {}", ">".cyan(), line.dimmed());
        }
    });

    match outcome {
        Ok(result) => {
            if options.json {
                let text = serde_json::to_string_pretty(&result)
                    .context("Failed to serialize result")?;
                println!("{text}");
            } else {
                print_result(&result);
            }
            Ok(())
        }
        Err(e) => {
            if e.downcast_ref::<AnalysisError>().is_some() && !options.json {
                eprintln!(
                    "\n{} Verify the prediction server is running at {}",
                    "hint:".yellow().bold(),
                    config.endpoint
                );
            }
            Err(e)
        }
    }
}

/// Drive one session to a terminal phase.
///
/// `on_line` sees each feed line as it is emitted. A failed analysis is
/// returned as an [`AnalysisError`] inside the `anyhow::Error`.
pub fn run_analysis(
    service: Arc<dyn PredictionService>,
    timing: SessionTiming,
    feed: &mut StagedLogFeed,
    note: &str,
    mut on_line: impl FnMut(&str),
) -> Result<RiskResult> {
    let mut session = AnalysisSession::new(service, timing);
    session.set_note_text(note);

    let started = Instant::now();
    session.submit(started)?;
    feed.activate(started);

    let mut shown = 0;
    while session.phase().is_processing() {
        thread::sleep(POLL_INTERVAL);
        let now = Instant::now();
        session.tick(now);
        feed.tick(now);

        for line in &feed.lines()[shown..] {
            on_line(line);
        }
        shown = feed.lines().len();
    }
    feed.deactivate();

    match session.phase() {
        Phase::Succeeded => session
            .result()
            .cloned()
            .context("Succeeded session has no result"),
        Phase::Failed => match session.error() {
            Some(err) => Err(err.clone().into()),
            None => bail!("Failed session has no error"),
        },
        phase => bail!("Analysis stopped in unexpected phase {phase}"),
    }
}

/// Resolve the note from `--sample`, a file, or piped stdin.
pub fn read_note(
    options: &AnalyzeOptions,
    mut stdin: impl Read,
    stdin_is_terminal: bool,
) -> Result<String> {
    if options.sample {
        return Ok(SAMPLE_NOTE.to_string());
    }

    match options.file.as_deref() {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read note from {}", path.display())),
        Some(_) => read_stdin(&mut stdin),
        None if !stdin_is_terminal => read_stdin(&mut stdin),
        None => bail!("No note given. Pass a FILE, pipe a note on stdin, or use --sample"),
    }
}

fn read_stdin(stdin: &mut impl Read) -> Result<String> {
    let mut note = String::new();
    stdin
        .read_to_string(&mut note)
        .context("Failed to read note from stdin")?;
    Ok(note)
}

/// First characters of the note on a single line.
pub fn note_preview(note: &str) -> String {
    let flat = crate::utils::single_line(note);
    let head: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head.trim())
}

/// `0.8200 (82.00%)`
pub fn format_probability(probability: f64) -> String {
    format!("{probability:.4} ({:.2}%)", probability * 100.0)
}

fn print_result(result: &RiskResult) {
    println!("\n{}", "--- Prediction Results ---".bold().blue());
    if let Some(logit) = result.logit_score {
        println!("Raw Logit Score: {logit:.4}");
    }
    println!("Risk Probability: {}", format_probability(result.probability));

    let verdict = format!("{} ({})", result.label, result.label.outcome());
    let verdict = match RiskLevel::from(result.label) {
        RiskLevel::High => verdict.red().bold(),
        RiskLevel::Low => verdict.green().bold(),
    };
    println!("Prediction: {verdict}");
    println!("{}", "=".repeat(50));
}
