//! Colorful console output for planner runs.
//!
//! Provides a custom `tracing` layer that formats orchestration and
//! comparison events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Run start/end, per-partition outcomes, per-size comparisons
//! - **WARN**: Partition failures and excluded modules
//! - **DEBUG**: Evaluations and partition layout

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static RUN_START_NANOS: AtomicU64 = AtomicU64::new(0);

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DIRECTIVE: &str = "examforge=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// `RUST_LOG` overrides the default `examforge=info` filter.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(PlannerConsoleLayer)
            .try_init();
    });
}

fn mark_run_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    RUN_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = RUN_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 _____                     _____
| ____|_  ____ _ _ __ ___ |  ___|__  _ __ __ _  ___
|  _| \ \/ / _` | '_ ` _ \| |_ / _ \| '__/ _` |/ _ \
| |___ >  < (_| | | | | | |  _| (_) | | | (_| |  __/
|_____/_/\_\__,_|_| |_| |_|_|  \___/|_|  \__, |\___|
                                         |___/
"#;

    let version_line = format!("               v{} - Decomposed Exam Timetabling\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats planner events with colors.
pub struct PlannerConsoleLayer;

impl<S: Subscriber> Layer<S> for PlannerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("examforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    group: Option<String>,
    engine: Option<String>,
    status: Option<String>,
    naive: Option<String>,
    intelligent: Option<String>,
    module: Option<String>,
    reason: Option<String>,
    error: Option<String>,
    kind: Option<String>,
    wins: Option<String>,
    partitions: Option<u64>,
    threads: Option<u64>,
    modules: Option<u64>,
    entries: Option<u64>,
    solved: Option<u64>,
    size: Option<u64>,
    scenarios: Option<u64>,
    duration_ms: Option<u64>,
    naive_ms: Option<f64>,
    intelligent_ms: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "group" => self.group = Some(s),
            "engine" => self.engine = Some(s),
            "status" => self.status = Some(s),
            "naive" => self.naive = Some(s),
            "intelligent" => self.intelligent = Some(s),
            "module" => self.module = Some(s),
            "reason" => self.reason = Some(s),
            "error" => self.error = Some(s),
            "kind" => self.kind = Some(s),
            "wins" => self.wins = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "partitions" => self.partitions = Some(value),
            "threads" => self.threads = Some(value),
            "modules" => self.modules = Some(value),
            "entries" => self.entries = Some(value),
            "solved" => self.solved = Some(value),
            "size" => self.size = Some(value),
            "scenarios" => self.scenarios = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "naive_ms" => self.naive_ms = Some(value),
            "intelligent_ms" => self.intelligent_ms = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_debug(field, &value);
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "decomposed_solve_start" => format_solve_start(v),
        "decomposed_solve_end" => format_solve_end(v),
        "partition_end" => format_partition_end(v),
        "partition_failed" => format_partition_failed(v),
        "module_excluded" | "module_unpartitioned" => format_excluded(v),
        "comparison_start" => format_comparison_start(v),
        "comparison_size" => format_comparison_size(v),
        "comparison_end" => format_comparison_end(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_status(status: &str) -> String {
    match status {
        "OPTIMAL" | "FEASIBLE" => status.bright_green().bold().to_string(),
        "INFEASIBLE" => status.bright_red().bold().to_string(),
        other => other.white().to_string(),
    }
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_run_start();
    format!(
        "{} {} Solving │ {} partitions │ {} threads │ engine {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.partitions).bright_yellow(),
        count(v.threads).bright_yellow(),
        v.engine.as_deref().unwrap_or("engine").bright_magenta(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    format!(
        "{} {} Solving complete │ {} │ {} entries │ {}/{} partitions solved",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_status(v.status.as_deref().unwrap_or("N/A")),
        count(v.entries).white(),
        count(v.solved).bright_green(),
        count(v.partitions),
    )
}

fn format_partition_end(v: &EventVisitor) -> String {
    format!(
        "{} {} {} │ {} modules │ {} │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        v.group.as_deref().unwrap_or("?").white().bold(),
        count(v.modules).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        format_status(v.status.as_deref().unwrap_or("N/A")),
    )
}

fn format_partition_failed(v: &EventVisitor) -> String {
    format!(
        "{} {} {} │ {} │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        v.group.as_deref().unwrap_or("?").white().bold(),
        v.kind.as_deref().unwrap_or("Failure").bright_red(),
        v.error.as_deref().unwrap_or(""),
    )
}

fn format_excluded(v: &EventVisitor) -> String {
    let reason = match (&v.reason, v.event.as_deref()) {
        (Some(reason), _) => reason.clone(),
        (None, Some("module_unpartitioned")) => "no partition".to_string(),
        _ => String::new(),
    };
    format!(
        "{} {} {} excluded │ {}",
        format_elapsed(),
        "!".yellow().bold(),
        v.module.as_deref().unwrap_or("?").white(),
        reason.yellow(),
    )
}

fn format_comparison_start(v: &EventVisitor) -> String {
    mark_run_start();
    format!(
        "{} {} Comparing │ {} modules │ {} sizes │ engine {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.modules).bright_yellow(),
        count(v.scenarios).bright_yellow(),
        v.engine.as_deref().unwrap_or("engine").bright_magenta(),
    )
}

fn format_comparison_size(v: &EventVisitor) -> String {
    format!(
        "{} {} size {:>5} │ naive {} {} │ intelligent {} {}",
        format_elapsed(),
        "⚖".bright_cyan(),
        count(v.size).white().bold(),
        format_status(v.naive.as_deref().unwrap_or("N/A")),
        format_duration_ms(v.naive_ms.unwrap_or(0.0) as u64).yellow(),
        format_status(v.intelligent.as_deref().unwrap_or("N/A")),
        format_duration_ms(v.intelligent_ms.unwrap_or(0.0) as u64).yellow(),
    )
}

fn format_comparison_end(v: &EventVisitor) -> String {
    let wins = v.wins.as_deref().unwrap_or("[]");
    let wins = if wins == "[]" {
        "none".white().to_string()
    } else {
        wins.bright_green().bold().to_string()
    };
    format!(
        "{} {} Comparison complete │ decomposition wins at {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        wins,
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("validate".into()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor).is_empty());
    }

    #[test]
    fn test_partition_failure_line() {
        let visitor = EventVisitor {
            event: Some("partition_failed".into()),
            group: Some("upper".into()),
            kind: Some("Timeout".into()),
            error: Some("no result within 1.000s".into()),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor);
        assert!(line.contains("upper"));
        assert!(line.contains("Timeout"));
        assert!(line.contains("no result within 1.000s"));
    }

    #[test]
    fn test_comparison_size_line_groups_thousands() {
        let visitor = EventVisitor {
            event: Some("comparison_size".into()),
            size: Some(1200),
            naive: Some("INFEASIBLE".into()),
            intelligent: Some("FEASIBLE".into()),
            naive_ms: Some(12.5),
            intelligent_ms: Some(3.0),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor);
        assert!(line.contains("1,200"));
        assert!(line.contains("INFEASIBLE"));
        assert!(line.contains("12ms"));
    }
}
