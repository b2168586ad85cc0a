//! Shared output formatting for lint results.

use anyhow::Result;
use chroma_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{NamedSource, Report};
use std::fmt::Write as _;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is where violation paths are relative to; pretty output reads
/// sources from there.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Compact => print!("{}", render_compact(result)),
        OutputFormat::Pretty => print_pretty(result, root),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn render_text(result: &LintResult) -> String {
    let mut out = String::new();
    for violation in &result.violations {
        let _ = writeln!(
            out,
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        let _ = writeln!(
            out,
            "  {}: {}",
            severity_indicator(violation.severity),
            violation.message
        );
        if let Some(suggestion) = &violation.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        if let Some(doc_ref) = &violation.doc_ref {
            let _ = writeln!(out, "  = see: {doc_ref}");
        }
        out.push('\n');
    }
    out.push_str(&summary(result));
    out
}

fn summary(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    format!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m\n",
        summary_color, errors, warnings, infos, result.files_checked
    )
}

fn render_compact(result: &LintResult) -> String {
    let mut out = String::new();
    for violation in &result.violations {
        let _ = writeln!(
            out,
            "{}:{}:{}: {} [{}] {}",
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
            violation.severity,
            violation.code,
            violation.message,
        );
    }
    out
}

fn print_pretty(result: &LintResult, root: &Path) {
    for violation in &result.violations {
        eprintln!("{:?}", pretty_report(violation, root));
    }
    print!("{}", summary(result));
}

/// Builds a miette report with the offending source attached when readable.
fn pretty_report(violation: &Violation, root: &Path) -> Report {
    let report = Report::new(ViolationDiagnostic::from(violation));
    let file = &violation.location.file;
    match std::fs::read_to_string(root.join(file)) {
        Ok(content) => {
            report.with_source_code(NamedSource::new(file.display().to_string(), content))
        }
        Err(e) => {
            tracing::debug!("No source for {}: {}", file.display(), e);
            report
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_lint_core::{Location, Suggestion};
    use std::path::PathBuf;

    fn sample() -> LintResult {
        LintResult {
            violations: vec![Violation::new(
                "CC001",
                "no-raw-color",
                Severity::Error,
                Location::new(PathBuf::from("src/Badge.tsx"), 3, 20),
                "Raw color utility \"bg-red-500\" detected. Use a design token instead.",
            )
            .with_token("bg-red-500")
            .with_suggestion(Suggestion::new("Use bg-destructive"))],
            files_checked: 2,
        }
    }

    #[test]
    fn compact_is_one_line_per_violation() {
        insta::assert_snapshot!(render_compact(&sample()), @r###"
        src/Badge.tsx:3:20: error [CC001] Raw color utility "bg-red-500" detected. Use a design token instead.
        "###);
    }

    #[test]
    fn text_includes_help_and_summary() {
        let text = render_text(&sample());
        assert!(text.starts_with("CC001 no-raw-color at src/Badge.tsx:3:20\n"));
        assert!(text.contains("= help: Use bg-destructive"));
        assert!(text.contains("Found 1 error(s), 0 warning(s), 0 info(s) in 2 file(s)"));
    }

    #[test]
    fn json_exposes_matched_token() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["violations"][0]["matchedToken"], "bg-red-500");
        assert_eq!(json["files_checked"], 2);
    }

    #[test]
    fn pretty_report_without_source_still_renders() {
        let report = pretty_report(&sample().violations[0], Path::new("/nonexistent"));
        assert!(report.to_string().contains("[CC001]"));
    }
}
