//! Report counters. Nothing is exported unless the host installs a
//! `metrics` recorder.

pub const REPORTS_TOTAL: &str = "tracker_reports_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Training,
    DaySteps,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Training => "training",
            ReportKind::DaySteps => "day_steps",
        }
    }
}

pub fn record_report(kind: ReportKind, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!(REPORTS_TOTAL, "report" => kind.as_str(), "outcome" => outcome).increment(1);
}
