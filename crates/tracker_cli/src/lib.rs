//! Line-oriented front end for the tracker calculators.
//!
//! Each input line is one record. Three fields make a training record, two
//! fields a daily steps record. Blank lines and lines starting with `#` are
//! skipped.

use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tracker_core::spentcalories::summarize_training;
use tracker_core::utils::field_count;
use tracker_core::{Biometrics, DayStepsCalculator, LogSink, TracingSink, training_info};

pub mod error;

pub use error::{CliError, CliResult};

pub const OUTPUT_KEY: &str = "TRACKER_OUTPUT";
pub const LOG_LEVEL_KEY: &str = "TRACKER_LOG_LEVEL";
pub const DEFAULT_LOG_FILTER: &str = "info";

const TRAINING_FIELDS: usize = 3;
const DAY_STEPS_FIELDS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Parse the value of `TRACKER_OUTPUT`; absent means text.
    pub fn from_env_value(value: Option<&str>) -> CliResult<Self> {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(OutputFormat::Text),
            Some(v) if v.is_empty() || v == "text" => Ok(OutputFormat::Text),
            Some(v) if v == "json" => Ok(OutputFormat::Json),
            Some(v) => Err(CliError::Validation(format!(
                "{OUTPUT_KEY} must be text or json, got {v:?}"
            ))),
        }
    }
}

/// Log filter from `TRACKER_LOG_LEVEL`, then `RUST_LOG`, then `info`.
pub fn log_filter_from_env_with<F>(mut get: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    get(LOG_LEVEL_KEY)
        .or_else(|| get("RUST_LOG"))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Build an `EnvFilter`, falling back to the default filter when `spec`
/// does not parse.
pub fn env_filter(spec: &str) -> EnvFilter {
    EnvFilter::try_new(spec).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// One JSON line of output.
#[derive(Debug, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum JsonReport<'a> {
    Training(&'a tracker_core::TrainingSummary),
    DaySteps(&'a tracker_core::DayStepsSummary),
}

/// Totals for one input stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub reports: usize,
    pub rejected: usize,
    pub skipped: usize,
}

pub struct Processor<L: LogSink = TracingSink> {
    biometrics: Biometrics,
    format: OutputFormat,
    day_steps: DayStepsCalculator<L>,
}

impl Processor<TracingSink> {
    pub fn new(biometrics: Biometrics, format: OutputFormat) -> Self {
        Self::with_sink(biometrics, format, TracingSink)
    }
}

impl<L: LogSink> Processor<L> {
    pub fn with_sink(biometrics: Biometrics, format: OutputFormat, sink: L) -> Self {
        Self {
            biometrics,
            format,
            day_steps: DayStepsCalculator::new(sink),
        }
    }

    /// Report for a single line, `None` when the line produces no output.
    pub fn process_line(&self, line: &str) -> CliResult<Option<String>> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let Biometrics { weight, height } = self.biometrics;

        match (field_count(line), self.format) {
            (TRAINING_FIELDS, OutputFormat::Text) => Ok(Some(training_info(line, weight, height)?)),
            (TRAINING_FIELDS, OutputFormat::Json) => {
                let summary = summarize_training(line, weight, height)?;
                Ok(Some(serde_json::to_string(&JsonReport::Training(&summary))?))
            }
            (DAY_STEPS_FIELDS, OutputFormat::Text) => {
                let report = self.day_steps.day_action_info(line, weight, height);
                Ok((!report.is_empty()).then_some(report))
            }
            (DAY_STEPS_FIELDS, OutputFormat::Json) => {
                match self.day_steps.report(line, weight, height) {
                    Some(summary) => Ok(Some(serde_json::to_string(&JsonReport::DaySteps(
                        &summary,
                    ))?)),
                    None => Ok(None),
                }
            }
            (found, _) => Err(CliError::Validation(format!(
                "expected {DAY_STEPS_FIELDS} or {TRAINING_FIELDS} fields, got {found}"
            ))),
        }
    }

    /// Process every line of `reader`, writing reports to `writer`.
    ///
    /// Rejected records are logged and counted; only IO and serialization
    /// failures stop the run.
    pub fn process_reader<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> CliResult<RunStats> {
        let mut stats = RunStats::default();
        let mut buf = Vec::new();
        let mut line_no = 0usize;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    warn!(line = line_no, error = %e, "record rejected: not valid UTF-8");
                    stats.rejected += 1;
                    continue;
                }
            };
            match self.process_line(line) {
                Ok(Some(report)) => {
                    stats.reports += 1;
                    match self.format {
                        OutputFormat::Text => {
                            if stats.reports > 1 {
                                writeln!(writer)?;
                            }
                            write!(writer, "{report}")?;
                        }
                        OutputFormat::Json => writeln!(writer, "{report}")?,
                    }
                }
                Ok(None) => {
                    debug!(line = line_no, "no report for line");
                    stats.skipped += 1;
                }
                Err(CliError::Tracker(e)) => {
                    warn!(line = line_no, error = %e, "record rejected");
                    stats.rejected += 1;
                }
                Err(CliError::Validation(msg)) => {
                    warn!(line = line_no, %msg, "record rejected");
                    stats.rejected += 1;
                }
                Err(other) => return Err(other),
            }
        }
        writer.flush()?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor(format: OutputFormat) -> Processor {
        Processor::new(Biometrics::new(72.0, 1.75), format)
    }

    #[test]
    fn output_format_from_env_value() {
        assert_eq!(OutputFormat::from_env_value(None).unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_env_value(Some("")).unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_env_value(Some("JSON")).unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_env_value(Some("yaml")).is_err());
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let p = processor(OutputFormat::Text);
        assert_eq!(p.process_line("").unwrap(), None);
        assert_eq!(p.process_line("   ").unwrap(), None);
        assert_eq!(p.process_line("# 1000,1h").unwrap(), None);
    }

    #[test]
    fn dispatches_by_field_count() {
        let p = processor(OutputFormat::Text);
        let training = p.process_line("8000,бег,1h").unwrap().unwrap();
        assert!(training.starts_with("Тип тренировки: бег\n"));
        let steps = p.process_line("10000,1h30m\r").unwrap().unwrap();
        assert!(steps.starts_with("Количество шагов: 10000.\n"));
        assert!(matches!(p.process_line("1000"), Err(CliError::Validation(_))));
    }

    #[test]
    fn training_errors_surface_and_steps_errors_do_not() {
        let p = processor(OutputFormat::Text);
        assert!(matches!(
            p.process_line("1000,плавание,1h"),
            Err(CliError::Tracker(_))
        ));
        assert_eq!(p.process_line(" 1000,1h").unwrap(), None);
    }

    #[test]
    fn json_lines_are_tagged() {
        let p = processor(OutputFormat::Json);
        let line = p.process_line("10000,1h30m").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["record"], "day_steps");
        assert_eq!(value["steps"], 10000);
        let line = p.process_line("8000,ходьба,1h").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["record"], "training");
        assert_eq!(value["kind"], "ходьба");
    }

    #[derive(Clone, Default)]
    struct SharedSink(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

    impl LogSink for SharedSink {
        fn log(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn steps_failures_log_the_same_message_in_both_formats() {
        for format in [OutputFormat::Text, OutputFormat::Json] {
            let sink = SharedSink::default();
            let p = Processor::with_sink(Biometrics::new(0.0, 1.75), format, sink.clone());
            assert_eq!(p.process_line("1000,30m").unwrap(), None, "{format:?}");
            assert_eq!(
                *sink.0.lock().unwrap(),
                vec!["unable to compute calories".to_string()],
                "{format:?}"
            );

            let sink = SharedSink::default();
            let p = Processor::with_sink(Biometrics::new(70.0, 1.75), format, sink.clone());
            assert_eq!(p.process_line(" 1000,30m").unwrap(), None, "{format:?}");
            let logged = sink.0.lock().unwrap();
            assert_eq!(logged.len(), 1, "{format:?}");
            assert!(logged[0].contains("whitespace"), "{format:?}");
        }
    }

    #[test]
    fn invalid_utf8_line_does_not_stop_the_run() {
        let p = processor(OutputFormat::Text);
        let input: &[u8] = b"3456,\xff\xfe,1h\n+1000,30m0s\n";
        let mut out = Vec::new();
        let stats = p.process_reader(input, &mut out).unwrap();
        assert_eq!(
            stats,
            RunStats {
                reports: 1,
                rejected: 1,
                skipped: 0
            }
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Количество шагов: 1000.\n"));
    }

    #[test]
    fn last_line_without_newline_is_processed() {
        let p = processor(OutputFormat::Json);
        let mut out = Vec::new();
        let stats = p.process_reader(&b"10000,1h30m\r\n8000"[..], &mut out).unwrap();
        assert_eq!(stats.reports, 1);
        assert_eq!(stats.rejected, 1);
    }

    #[test]
    fn log_filter_prefers_tracker_level() {
        let both = |k: &str| match k {
            LOG_LEVEL_KEY => Some("debug".to_string()),
            "RUST_LOG" => Some("warn".to_string()),
            _ => None,
        };
        assert_eq!(log_filter_from_env_with(both), "debug");
        let rust_log_only = |k: &str| (k == "RUST_LOG").then(|| "warn".to_string());
        assert_eq!(log_filter_from_env_with(rust_log_only), "warn");
        assert_eq!(log_filter_from_env_with(|_| None), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn process_reader_counts_outcomes() {
        let p = processor(OutputFormat::Text);
        let input = "8000,бег,1h\n\n# comment\n 1000,1h\n1000,плавание,1h\n10000,1h30m\n";
        let mut out = Vec::new();
        let stats = p.process_reader(input.as_bytes(), &mut out).unwrap();
        assert_eq!(
            stats,
            RunStats {
                reports: 2,
                rejected: 1,
                skipped: 3
            }
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Тип тренировки: бег\n"));
        assert!(text.contains("\n\nКоличество шагов: 10000.\n"));
    }
}
