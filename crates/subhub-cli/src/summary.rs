use anyhow::{Context, Result};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::{Value, json};

use subhub_ingest::{BatchCreateReport, IngestError};
use subhub_model::{BatchOutcome, Entity, FlattenedRow, Rejection};
use subhub_persistence::{DraftSummary, PersistenceError};

use crate::types::CommandOutput;

/// Longest record excerpt shown in the rejection table.
const RECORD_EXCERPT_CHARS: usize = 60;

pub fn print_output(output: &CommandOutput, as_json: bool) -> Result<()> {
    if as_json {
        let value = output_json(output);
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("serialize output")?
        );
        return Ok(());
    }
    match output {
        CommandOutput::Entities(outcome) => {
            print_entity_table(&outcome.entities);
            print_outcome_footer(outcome);
        }
        CommandOutput::Rows { outcome, rows } => {
            print_row_table(rows);
            print_outcome_footer(outcome);
        }
        CommandOutput::Created(report) => print_create_report(report),
        CommandOutput::Drafts(drafts) => print_draft_table(drafts),
        CommandOutput::Draft { key, value } => match value {
            Some(value) => println!(
                "{}",
                serde_json::to_string_pretty(value).context("serialize draft")?
            ),
            None => eprintln!("No live draft for '{key}'."),
        },
        CommandOutput::DraftSaved { key } => println!("Saved draft '{key}'."),
        CommandOutput::DraftRemoved { key, existed } => {
            if *existed {
                println!("Removed draft '{key}'.");
            } else {
                println!("No draft named '{key}'.");
            }
        }
        CommandOutput::Purged(count) => println!("Purged {count} expired draft(s)."),
    }
    Ok(())
}

/// JSON shape of a command result.
pub fn output_json(output: &CommandOutput) -> Value {
    match output {
        CommandOutput::Entities(outcome) => json!(outcome),
        CommandOutput::Rows { outcome, rows } => json!({
            "rows": rows,
            "rejections": outcome.rejections,
            "failure": outcome.failure,
        }),
        CommandOutput::Created(report) => create_report_json(report),
        CommandOutput::Drafts(drafts) => json!(drafts),
        CommandOutput::Draft { key, value } => json!({ "key": key, "value": value }),
        CommandOutput::DraftSaved { key } => json!({ "saved": key }),
        CommandOutput::DraftRemoved { key, existed } => {
            json!({ "key": key, "removed": existed })
        }
        CommandOutput::Purged(count) => json!({ "purged": count }),
    }
}

/// User-facing explanation of a failed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorHint {
    pub message: String,
    pub suggestion: Option<String>,
}

/// Find the first ingest or draft-store error in the chain and explain it.
pub fn error_hint(error: &anyhow::Error) -> Option<ErrorHint> {
    error.chain().find_map(|cause| {
        if let Some(ingest) = cause.downcast_ref::<IngestError>() {
            let suggestion = ingest
                .is_retryable()
                .then(|| "The webhook may accept the request if you try again.".to_string());
            return Some(ErrorHint {
                message: ingest.user_message().to_string(),
                suggestion,
            });
        }
        cause
            .downcast_ref::<PersistenceError>()
            .map(|persistence| ErrorHint {
                message: persistence.user_message(),
                suggestion: persistence.suggestion(),
            })
    })
}

pub fn print_error(error: &anyhow::Error) {
    eprintln!("error: {error:#}");
    if let Some(hint) = error_hint(error) {
        eprintln!("  {}", hint.message);
        if let Some(suggestion) = hint.suggestion {
            eprintln!("  hint: {suggestion}");
        }
    }
}

fn create_report_json(report: &BatchCreateReport) -> Value {
    let failures: Vec<Value> = report
        .failures
        .iter()
        .map(|failure| {
            json!({
                "index": failure.index,
                "name": failure.name,
                "error": failure.error.to_string(),
            })
        })
        .collect();
    json!({ "created": report.created, "failures": failures })
}

fn print_entity_table(entities: &[Entity]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Kind"),
        header_cell("Created"),
        header_cell("Clients"),
        header_cell("Sub-orgs"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for entity in entities {
        table.add_row(vec![
            Cell::new(&entity.id).fg(Color::Blue),
            Cell::new(&entity.name).add_attribute(Attribute::Bold),
            Cell::new(entity.kind.as_str()),
            created_cell(entity),
            Cell::new(entity.client_count),
            count_cell(entity.children.len()),
        ]);
    }
    println!("{table}");
}

fn print_row_table(rows: &[FlattenedRow]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Kind"),
        header_cell("Created"),
        header_cell("Clients"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for row in rows {
        let key_cell = if row.is_sub_organization() {
            Cell::new(format!("  -> {}", row.key)).fg(Color::DarkGrey)
        } else {
            Cell::new(&row.key).fg(Color::Blue).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            key_cell,
            Cell::new(row.label()),
            Cell::new(row.entity.kind.as_str()),
            created_cell(&row.entity),
            Cell::new(row.entity.client_count),
        ]);
    }
    println!("{table}");
}

fn print_outcome_footer(outcome: &BatchOutcome) {
    if let Some(failure) = &outcome.failure {
        eprintln!("Batch failed: {failure}");
        return;
    }
    println!(
        "{} accepted, {} rejected",
        outcome.accepted_count(),
        outcome.rejected_count()
    );
    print_rejection_table(&outcome.rejections);
}

fn print_rejection_table(rejections: &[Rejection]) {
    if rejections.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Index"),
        header_cell("Reason"),
        header_cell("Detail"),
        header_cell("Record"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for rejection in rejections {
        table.add_row(vec![
            Cell::new(rejection.index),
            Cell::new(rejection.reason.as_str()).fg(Color::Red),
            match rejection.reason.detail() {
                Some(detail) => Cell::new(detail),
                None => dim_cell("-"),
            },
            Cell::new(record_excerpt(&rejection.record)),
        ]);
    }
    println!();
    println!("Rejected:");
    println!("{table}");
}

fn print_create_report(report: &BatchCreateReport) {
    if !report.created.is_empty() {
        print_entity_table(&report.created);
    }
    println!(
        "{} of {} created",
        report.created.len(),
        report.total()
    );
    if !report.has_failures() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Index"),
        header_cell("Name"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for failure in &report.failures {
        table.add_row(vec![
            Cell::new(failure.index),
            Cell::new(&failure.name).add_attribute(Attribute::Bold),
            Cell::new(failure.error.to_string()).fg(Color::Red),
        ]);
    }
    println!();
    println!("Failed:");
    println!("{table}");
}

fn print_draft_table(drafts: &[DraftSummary]) {
    if drafts.is_empty() {
        println!("No drafts.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Saved"),
        header_cell("Expires"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for draft in drafts {
        let status = if draft.expired {
            Cell::new("expired").fg(Color::Yellow)
        } else {
            Cell::new("live").fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(&draft.key).add_attribute(Attribute::Bold),
            Cell::new(&draft.saved_at),
            match &draft.expires_at {
                Some(at) => Cell::new(at),
                None => dim_cell("-"),
            },
            status,
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn created_cell(entity: &Entity) -> Cell {
    if entity.created_at_synthetic {
        dim_cell(format!("{}*", entity.created_at))
    } else {
        Cell::new(entity.created_at)
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

/// Compact JSON of a record, cut to a readable width.
fn record_excerpt(record: &Value) -> String {
    let text = record.to_string();
    if text.chars().count() <= RECORD_EXCERPT_CHARS {
        return text;
    }
    let cut: String = text.chars().take(RECORD_EXCERPT_CHARS).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    #[test]
    fn hint_comes_from_wrapped_persistence_error() {
        let source = PersistenceError::UnsupportedVersion {
            path: PathBuf::from("drafts.json"),
            found: 9,
            max_supported: 1,
        };
        let error = Err::<(), _>(source)
            .context("open drafts drafts.json")
            .unwrap_err();
        let hint = error_hint(&error).expect("hint");
        assert!(hint.message.contains("file version 9"));
        assert_eq!(
            hint.suggestion.as_deref(),
            Some("Update subhub to the latest version.")
        );
    }

    #[test]
    fn hint_for_retryable_ingest_error() {
        let error = anyhow::Error::new(IngestError::Webhook {
            status: 503,
            message: "unavailable".to_string(),
        })
        .context("fetch customers");
        let hint = error_hint(&error).expect("hint");
        assert_eq!(hint.message, "The customer webhook reported an error.");
        assert!(hint.suggestion.is_some());

        let error = anyhow::Error::new(IngestError::MissingBaseUrl);
        let hint = error_hint(&error).expect("hint");
        assert!(hint.message.contains("--webhook-url"));
        assert_eq!(hint.suggestion, None);
    }

    #[test]
    fn plain_errors_have_no_hint() {
        assert_eq!(error_hint(&anyhow::anyhow!("bad config")), None);
    }

    #[test]
    fn short_record_is_unchanged() {
        assert_eq!(record_excerpt(&json!({"id": 1})), r#"{"id":1}"#);
    }

    #[test]
    fn long_record_is_cut() {
        let record = json!({"name": "x".repeat(100)});
        let excerpt = record_excerpt(&record);
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), RECORD_EXCERPT_CHARS + 3);
    }
}
