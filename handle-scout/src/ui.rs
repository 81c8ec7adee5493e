//! Terminal display logic for the handle-scout CLI.
//!
//! This module handles the banner, the prompt, per-handle result tables,
//! summaries and the platform listing. Uses only the `console` crate.

use console::{pad_str, style, Alignment, StyledObject};
use handle_scout_lib::{Catalog, CheckReport, ProbeResult, ProbeStatus, StatusSummary};
use std::io::{self, Write};

/// Widest platform column before names get truncated.
const MAX_PLATFORM_WIDTH: usize = 24;

/// Widest reason column in pretty mode.
const MAX_REASON_WIDTH: usize = 64;

const STATUS_WIDTH: usize = 9;

// ── Banner ───────────────────────────────────────────────────────────────────

/// Print the interactive banner.
pub fn print_banner() {
    println!();
    println!(
        "{} {}",
        style("Handle Scout").cyan().bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
    );
    println!(
        "{}",
        style("Best-effort username checks across popular platforms.").dim()
    );
    println!();
}

/// Print the input prompt without a trailing newline.
pub fn print_prompt() -> io::Result<()> {
    print!("{}", style("Username (or 'q' to quit): ").bold());
    io::stdout().flush()
}

pub fn print_hint(message: &str) {
    println!("{}", style(message).yellow());
}

pub fn print_error(message: &str) {
    println!("{} {}", style("Error:").red().bold(), message);
}

// ── Results ──────────────────────────────────────────────────────────────────

/// Print one report as a table, followed by suggestions.
///
/// `pretty` adds the reason column and a summary line.
pub fn print_report(report: &CheckReport, pretty: bool) {
    println!();
    println!(
        "{} {}",
        style("Results for").bold(),
        style(&report.handle).cyan().bold(),
    );
    println!("{}", style(report.timestamp_string()).dim());
    println!();

    let width = platform_column_width(&report.results);

    let mut header = format!(
        "  {}  {}  ",
        pad_str("Platform", width, Alignment::Left, None),
        pad_str("Status", STATUS_WIDTH, Alignment::Left, None),
    );
    if pretty {
        header.push_str(&format!(
            "{}  ",
            pad_str("Reason", MAX_REASON_WIDTH, Alignment::Left, None)
        ));
    }
    header.push_str("Link");
    println!("{}", style(header).bold());
    println!(
        "  {}",
        style("─".repeat(width + STATUS_WIDTH + if pretty { 74 } else { 10 })).dim()
    );

    for result in &report.results {
        print_row(result, width, pretty);
    }

    if pretty {
        println!();
        print_summary(&report.summary());
    }

    if !report.suggestions.is_empty() {
        println!();
        println!("{}", style("Suggestions:").bold());
        println!("  {}", style(report.suggestions.join(", ")).green());
    }
    println!();
}

fn print_row(result: &ProbeResult, width: usize, pretty: bool) {
    let platform = pad_str(&result.platform, width, Alignment::Left, Some(".."));
    let status = pad_str(result.status.as_str(), STATUS_WIDTH, Alignment::Left, None);

    let reason = if pretty {
        format!(
            "{}  ",
            style(pad_str(
                &result.reason,
                MAX_REASON_WIDTH,
                Alignment::Left,
                Some("..")
            ))
            .dim()
        )
    } else {
        String::new()
    };

    println!(
        "  {}  {}  {}{}",
        platform,
        status_style(result.status, status.to_string()),
        reason,
        link_text(result),
    );
}

/// Apply the status colour to already-padded text.
fn status_style(status: ProbeStatus, text: String) -> StyledObject<String> {
    match status {
        ProbeStatus::Available => style(text).green().bold(),
        ProbeStatus::Taken => style(text).red().bold(),
        ProbeStatus::Unknown => style(text).yellow(),
        ProbeStatus::Error => style(text).magenta(),
    }
}

fn link_text(result: &ProbeResult) -> &str {
    result.url.as_deref().unwrap_or("-")
}

fn platform_column_width(results: &[ProbeResult]) -> usize {
    results
        .iter()
        .map(|r| r.platform.chars().count())
        .max()
        .unwrap_or(0)
        .clamp("Platform".len(), MAX_PLATFORM_WIDTH)
}

// ── Summary ──────────────────────────────────────────────────────────────────

fn summary_text(summary: &StatusSummary) -> String {
    let total = summary.total();
    format!(
        "{} platform{} | {} available | {} taken | {} unknown | {} error",
        total,
        if total == 1 { "" } else { "s" },
        summary.available,
        summary.taken,
        summary.unknown,
        summary.error,
    )
}

/// Print the per-status counts under a divider.
fn print_summary(summary: &StatusSummary) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!("  {}", summary_text(summary));
}

// ── Platform listing ─────────────────────────────────────────────────────────

/// Print every platform of a catalog with its probe URL or skip reason.
pub fn print_platforms(catalog: &Catalog) {
    println!();
    println!(
        "{}",
        style(format!("Platforms ({}):", catalog.len())).yellow().bold()
    );
    println!();

    let width = catalog
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_PLATFORM_WIDTH);

    for platform in catalog {
        let name = pad_str(&platform.name, width, Alignment::Left, Some(".."));
        if platform.skip_check {
            println!(
                "  {}  {}",
                style(name).green().bold(),
                style(format!("skipped: {}", platform.skip_reason())).dim(),
            );
        } else {
            println!(
                "  {}  {} {}",
                style(name).green().bold(),
                style(&platform.method).cyan(),
                platform.url_template,
            );
        }
    }
    println!();
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(platform: &str, url: Option<&str>) -> ProbeResult {
        ProbeResult {
            platform: platform.to_string(),
            url: url.map(str::to_string),
            status: ProbeStatus::Unknown,
            http_status: None,
            reason: "Not checkable".to_string(),
        }
    }

    #[test]
    fn test_link_text_dash_when_missing() {
        assert_eq!(link_text(&make_result("Figma", None)), "-");
        assert_eq!(
            link_text(&make_result("GitHub", Some("https://github.com/bob"))),
            "https://github.com/bob"
        );
    }

    #[test]
    fn test_platform_column_width() {
        assert_eq!(platform_column_width(&[]), "Platform".len());
        assert_eq!(
            platform_column_width(&[make_result("X (Twitter)", None)]),
            "X (Twitter)".len()
        );
        let long = "p".repeat(40);
        assert_eq!(
            platform_column_width(&[make_result(&long, None)]),
            MAX_PLATFORM_WIDTH
        );
    }

    #[test]
    fn test_summary_text() {
        let summary = StatusSummary {
            available: 2,
            taken: 1,
            unknown: 0,
            error: 1,
        };
        assert_eq!(
            summary_text(&summary),
            "4 platforms | 2 available | 1 taken | 0 unknown | 1 error"
        );

        let single = StatusSummary {
            taken: 1,
            ..Default::default()
        };
        assert!(summary_text(&single).starts_with("1 platform |"));
    }
}
