use anyhow::{Context, Result};
use clauseguard_core::{Clause, DocumentReport, RiskLevel};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

// Long clause bodies are cut to this many characters in the text report
const PREVIEW_CHARS: usize = 240;

fn level_marker(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "🔴",
        RiskLevel::Medium => "🟠",
        RiskLevel::Low => "🟢",
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}…", cut.trim_end())
}

/// Human-readable report: document verdict first, then every clause.
pub fn render_text(report: &DocumentReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} Overall risk: {} ({})",
        level_marker(summary.overall_risk),
        summary.overall_risk.as_str().to_uppercase(),
        summary.overall_color.as_str()
    );
    let _ = writeln!(
        out,
        "   Clauses: {} (high {}, medium {}, low {}), average score {:.1}",
        summary.total_clauses,
        summary.high_risk_count,
        summary.medium_risk_count,
        summary.low_risk_count,
        summary.average_risk_score
    );
    if report.used_fallback_clause {
        let _ = writeln!(out, "   No clause boundaries found; the whole document was scored as one clause.");
    }

    if !summary.top_risk_factors.is_empty() {
        let _ = writeln!(out, "\nTop risk factors:");
        for factor in &summary.top_risk_factors {
            let _ = writeln!(out, "  - {factor}");
        }
    }
    if !summary.critical_warnings.is_empty() {
        let _ = writeln!(out, "\nCritical warnings:");
        for warning in &summary.critical_warnings {
            let _ = writeln!(out, "  ⚠️  {warning}");
        }
    }
    let _ = writeln!(out, "\n{}", summary.recommendation);

    for clause in &report.clauses {
        out.push('\n');
        render_clause(&mut out, clause);
    }
    out
}

fn render_clause(out: &mut String, clause: &Clause) {
    let _ = writeln!(
        out,
        "{} [{}] {} | importance: {} | risk: {} ({})",
        level_marker(clause.risk_level()),
        clause.id,
        clause.clause_type.label(),
        clause.importance,
        clause.risk_level().as_str().to_uppercase(),
        clause.risk_score()
    );
    let _ = writeln!(out, "    {}", preview(&clause.text));
    for warning in &clause.risk.warnings {
        let _ = writeln!(out, "    ⚠️  {warning}");
    }
    for recommendation in &clause.risk.recommendations {
        let _ = writeln!(out, "    → {recommendation}");
    }

    if let Some(enrichment) = &clause.enrichment {
        if let Some(simplified) = &enrichment.simplified {
            let _ = writeln!(out, "    Plain language: {simplified}");
        }
        if let Some(translated) = &enrichment.translated {
            let _ = writeln!(out, "    Translation: {translated}");
        }
        if let Some(explanation) = &enrichment.explanation {
            for line in explanation.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
    }
}

/// Write the report in one of the supported formats:
/// `report` (full JSON), `clauses` (clause array only) or `text`.
pub fn save_report(report: &DocumentReport, output_path: &Path, format: &str) -> Result<()> {
    let contents = match format {
        "report" => report.to_json_pretty()?,
        "clauses" => serde_json::to_string_pretty(&report.clauses)?,
        "text" => render_text(report),
        other => {
            println!("⚠️  Unknown output format '{other}', using default report format");
            report.to_json_pretty()?
        }
    };

    fs::write(output_path, contents)
        .with_context(|| format!("failed to write report to {}", output_path.display()))?;
    Ok(())
}

/// File extension that matches an output format.
pub fn extension_for(format: &str) -> &'static str {
    match format {
        "text" => "txt",
        _ => "json",
    }
}
