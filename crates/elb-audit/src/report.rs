//! Human-readable report formatting.

use elb_core::{Check, Severity};

use crate::AuditReport;

pub fn format_report(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str("\n╔══════════════════════════════════════════╗\n");
    out.push_str("║  ELB Sanity Check                        ║\n");
    out.push_str("╠══════════════════════════════════════════╣\n");
    out.push_str(&format!("║  Regions:  {:<29}║\n", truncate(&report.regions.join(","), 29)));
    out.push_str(&format!("║  Checked:  {:<29}║\n", format!("{} load balancers", report.load_balancers.len())));
    out.push_str("╚══════════════════════════════════════════╝\n\n");

    let sections = [
        (Check::Selection, "Selection"),
        (Check::SecurityGroupPorts, "Security group ports"),
        (Check::HealthCheckListener, "Health check listeners"),
        (Check::ZoneBalance, "Availability zone balance"),
    ];

    for (check, title) in sections {
        let lines: Vec<String> = report
            .findings
            .iter()
            .filter(|f| f.check == check)
            .map(|f| f.to_string())
            .collect();
        if lines.is_empty() {
            continue;
        }
        out.push_str(&format!("{title}:\n"));
        for line in lines {
            out.push_str(&format!("  {line}\n"));
        }
        out.push('\n');
    }

    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    if errors == 0 && warnings == 0 {
        out.push_str("✅ No problems found\n");
    } else {
        out.push_str(&format!("❌ {errors} errors\n"));
        out.push_str(&format!("⚠️  {warnings} warnings\n"));
    }

    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
