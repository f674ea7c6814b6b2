use serde_json::Value;
use subhub_ingest::BatchCreateReport;
use subhub_model::{BatchOutcome, FlattenedRow};
use subhub_persistence::DraftSummary;

/// What a command produced, ready to print.
#[derive(Debug)]
pub enum CommandOutput {
    /// Normalized entities with rejections.
    Entities(BatchOutcome),
    /// Flattened rows (after any filtering) with the outcome they came from.
    Rows {
        outcome: BatchOutcome,
        rows: Vec<FlattenedRow>,
    },
    Created(BatchCreateReport),
    Drafts(Vec<DraftSummary>),
    Draft {
        key: String,
        value: Option<Value>,
    },
    DraftSaved {
        key: String,
    },
    DraftRemoved {
        key: String,
        existed: bool,
    },
    Purged(usize),
}

impl CommandOutput {
    /// Process exit code for this result.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Entities(outcome) | Self::Rows { outcome, .. } => {
                if outcome.is_clean() {
                    0
                } else {
                    1
                }
            }
            Self::Created(report) => i32::from(report.has_failures()),
            Self::Draft { value, .. } => i32::from(value.is_none()),
            Self::Drafts(_)
            | Self::DraftSaved { .. }
            | Self::DraftRemoved { .. }
            | Self::Purged(_) => 0,
        }
    }
}
