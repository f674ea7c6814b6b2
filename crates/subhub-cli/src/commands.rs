use std::collections::HashSet;
use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::info_span;

use subhub_ingest::{
    BatchProgress, WebhookClient, create_batch, fetch_customers, load_json, load_payload,
};
use subhub_model::{BatchOutcome, CreateCustomerRequest, FlattenedRow};
use subhub_normalization::{
    EntityNormalizer, flatten_hierarchy, search_rows, sub_organizations_only,
};
use subhub_persistence::DraftStore;

use subhub_cli::config::AppConfig;
use subhub_cli::types::CommandOutput;

use crate::cli::{CreateBatchArgs, DraftsCommand, FetchArgs, FlattenArgs, PayloadArgs};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

pub fn run_normalize(args: &PayloadArgs) -> Result<CommandOutput> {
    let payload = load_payload(&args.payload)
        .with_context(|| format!("load payload {}", args.payload.display()))?;
    let outcome = EntityNormalizer::default().normalize_batch(&payload);
    Ok(CommandOutput::Entities(outcome))
}

pub fn run_flatten(args: &FlattenArgs) -> Result<CommandOutput> {
    let payload = load_payload(&args.payload)
        .with_context(|| format!("load payload {}", args.payload.display()))?;
    let outcome = EntityNormalizer::default().normalize_batch(&payload);
    let rows = select_rows(&outcome, args.sub_orgs_only, args.search.as_deref());
    Ok(CommandOutput::Rows { outcome, rows })
}

pub fn run_fetch(args: &FetchArgs, config: &AppConfig) -> Result<CommandOutput> {
    let client =
        WebhookClient::new(config.webhook.clone()).context("configure webhook client")?;
    let outcome = fetch_customers(&client, &EntityNormalizer::default())
        .with_context(|| format!("fetch customers from {}", config.webhook.fetch_url()))?;
    if args.flatten {
        let rows = select_rows(&outcome, false, None);
        return Ok(CommandOutput::Rows { outcome, rows });
    }
    Ok(CommandOutput::Entities(outcome))
}

pub fn run_create_batch(
    args: &CreateBatchArgs,
    config: &AppConfig,
    show_progress: bool,
) -> Result<CommandOutput> {
    let requests: Vec<CreateCustomerRequest> = load_json(&args.requests)
        .with_context(|| format!("load requests {}", args.requests.display()))?;
    let client =
        WebhookClient::new(config.webhook.clone()).context("configure webhook client")?;

    let bar = progress_bar(requests.len(), show_progress);
    let report = create_batch(
        &client,
        &EntityNormalizer::default(),
        &requests,
        |progress: BatchProgress| {
            bar.set_position(progress.completed as u64);
            bar.set_message(format!(
                "{} created, {} failed",
                progress.succeeded, progress.failed
            ));
        },
    );
    bar.finish_and_clear();
    Ok(CommandOutput::Created(report))
}

pub fn run_drafts(command: &DraftsCommand, config: &AppConfig) -> Result<CommandOutput> {
    let span = info_span!("drafts", path = %config.drafts.path.display());
    let _guard = span.enter();
    let mut store = DraftStore::open_default(&config.drafts)
        .with_context(|| format!("open drafts {}", config.drafts.path.display()))?;

    let output = match command {
        DraftsCommand::List => CommandOutput::Drafts(store.summaries()),
        DraftsCommand::Show { key } => CommandOutput::Draft {
            key: key.clone(),
            value: store.load(key).context("read draft")?,
        },
        DraftsCommand::Save { key, file } => {
            let value: Value = load_json(file)
                .with_context(|| format!("load draft {}", file.display()))?;
            store.save(key, value).context("save draft")?;
            CommandOutput::DraftSaved { key: key.clone() }
        }
        DraftsCommand::Remove { key } => CommandOutput::DraftRemoved {
            key: key.clone(),
            existed: store.remove(key).context("remove draft")?,
        },
        DraftsCommand::Purge => {
            CommandOutput::Purged(store.purge_expired().context("purge drafts")?)
        }
    };
    Ok(output)
}

/// Flatten accepted entities, then apply the sub-organization and search filters.
fn select_rows(
    outcome: &BatchOutcome,
    sub_orgs_only: bool,
    search: Option<&str>,
) -> Vec<FlattenedRow> {
    let rows = flatten_hierarchy(&outcome.entities);
    let mut selected: Vec<&FlattenedRow> = if sub_orgs_only {
        sub_organizations_only(&rows)
    } else {
        rows.iter().collect()
    };
    if let Some(query) = search {
        let matching: HashSet<&str> = search_rows(&rows, query)
            .into_iter()
            .map(|row| row.key.as_str())
            .collect();
        selected.retain(|row| matching.contains(row.key.as_str()));
    }
    selected.into_iter().cloned().collect()
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
