//! Plain-text report of a transformation.
//!
//! The report is meant for the person submitting the package: what was found
//! in the source, which identifiers were derived and what the output package
//! contains.

use crate::analysis::ArchiveAnalysis;
use crate::transform::TransformOutcome;
use std::fmt::Write;

const RULE: &str = "----------------------------------------------------------------";

/// Render the report of a transformation.
pub fn render(outcome: &TransformOutcome) -> String {
    let mut out = String::with_capacity(2048);
    let result = &outcome.result;

    let _ = writeln!(out, "Rapport {}", outcome.scenario.label());
    let _ = writeln!(out, "{RULE}");
    render_analysis(&mut out, &outcome.analysis);

    let _ = writeln!(out);
    let _ = writeln!(out, "Afgeleide gegevens");
    let _ = writeln!(out, "{RULE}");
    field(&mut out, "Doel", Some(result.goal_id.as_str()));
    field(&mut out, "Datum", Some(result.anchor_date.to_string().as_str()));
    if let Some(consolidation) = result.consolidation_id.as_deref() {
        field(&mut out, "Geconsolideerd", Some(consolidation));
    }
    if !result.modified.is_empty() {
        let _ = writeln!(out, "Beëindigde OW-bestanden:");
        for file in &result.modified {
            let _ = writeln!(out, "  {}", file.source_name);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Inhoud van het pakket ({} bestanden)", outcome.manifest.entries().len());
    let _ = writeln!(out, "{RULE}");
    for entry in outcome.manifest.entries() {
        let size = outcome
            .entries
            .get(&entry.file_name)
            .map(|e| e.content.len().to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "  {:<40} {:<26} {:>10}", entry.file_name, entry.content_type, size);
    }
    let hidden: Vec<_> = outcome
        .entries
        .names()
        .filter(|name| outcome.manifest.content_type_of(name).is_none())
        .collect();
    if !hidden.is_empty() {
        let _ = writeln!(out, "Niet in het manifest:");
        for name in hidden {
            let _ = writeln!(out, "  {name}");
        }
    }

    out
}

/// Render only the analysis part of a report.
pub fn render_analysis(out: &mut String, analysis: &ArchiveAnalysis) {
    field(out, "Work", analysis.work_id.as_deref());
    field(out, "Expressie", analysis.expression_id.as_deref());
    field(out, "Titel", analysis.title.as_deref());
    field(out, "Doel (bron)", analysis.goal.as_deref());
    match &analysis.authority {
        Some(authority) => {
            let _ = writeln!(out, "{:<16}{} ({})", "Bevoegd gezag:", authority.code, authority.kind);
        },
        None => field(out, "Bevoegd gezag", None),
    }
    let _ = writeln!(
        out,
        "{:<16}{} bestanden, {} bytes",
        "GML:", analysis.geo_payload_count, analysis.geo_payload_bytes
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Informatieobjecten ({})", analysis.information_objects.len());
    for record in &analysis.information_objects {
        let _ = writeln!(out, "  {}", record.folder);
        let _ = writeln!(out, "    titel:      {}", record.display_title());
        let _ = writeln!(out, "    expressie:  {}", record.expression_id.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "    bestand:    {}", record.payload_file.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "    eId:        {}", record.reference_element_id.as_deref().unwrap_or("-"));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Verwijzingen ({})", analysis.references.len());
    for reference in &analysis.references {
        let _ = writeln!(
            out,
            "  {} -> {}",
            reference.element_id.as_deref().unwrap_or("-"),
            reference.reference
        );
    }
}

fn field(out: &mut String, label: &str, value: Option<&str>) {
    let _ = writeln!(out, "{:<16}{}", format!("{label}:"), value.unwrap_or("-"));
}
