//! Markdown build report

use crate::models::{ArchiveEntry, BuildResult, Compression, LayoutKind};
use std::fmt::Write;

fn push_entries(report: &mut String, entries: &[ArchiveEntry]) {
    report.push_str("| Entry | Compression | Size |\n");
    report.push_str("|-------|-------------|------|\n");
    for entry in entries {
        let compression = match entry.compression {
            Compression::Stored => "stored",
            Compression::Deflated => "deflated",
            Compression::Other => "other",
        };
        let _ = writeln!(report, "| `{}` | {} | {} |", entry.name, compression, entry.size);
    }
    report.push('\n');
}

pub fn generate_markdown_report(result: &BuildResult) -> String {
    let mut report = String::new();

    report.push_str("# XPI Build Report\n\n");

    // Summary
    report.push_str("## Summary\n\n");
    let _ = writeln!(report, "- **Output**: {}", result.destination.display());
    let _ = writeln!(
        report,
        "- **Layout**: {}",
        match result.layout {
            LayoutKind::Flat => "flat",
            LayoutKind::Nested => "nested",
        }
    );
    let _ = writeln!(report, "- **Entries**: {}", result.entries.len());
    if result.layout == LayoutKind::Nested {
        let _ = writeln!(report, "- **Jar Entries**: {}", result.jar_entries.len());
    }
    let _ = writeln!(report, "- **Script Requirements**: {}", result.requirements.len());
    let _ = writeln!(report, "- **Total Size**: {} bytes\n", result.total_size());

    report.push_str("## Archive Entries\n\n");
    push_entries(&mut report, &result.entries);

    if !result.jar_entries.is_empty() {
        report.push_str("## Jar Entries\n\n");
        push_entries(&mut report, &result.jar_entries);
    }

    if !result.requirements.is_empty() {
        report.push_str("## Script Requirements\n\n");
        for script in &result.requirements {
            let _ = writeln!(report, "- `{}`", script);
        }
        report.push('\n');
    }

    // Patterns that silently dropped out of the build
    if !result.unmatched.is_empty() {
        report.push_str("## ⚠️ Unmatched Patterns\n\n");
        for pattern in &result.unmatched {
            let _ = writeln!(report, "- `{}`", pattern);
        }
        report.push('\n');
    }

    report
}
