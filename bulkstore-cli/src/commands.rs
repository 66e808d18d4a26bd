//! Command implementations behind the CLI
//!
//! Each command turns into one or more [`Call`]s run through the ledger.
//! Results come back as JSON lines for stdout.

use anyhow::{bail, Context, Result};
use bulkstore_core::config::Config;
use bulkstore_core::ledger::{Call, CallOutput, DispatchOutcome, LedgerClient, LocalLedger};
use bulkstore_core::store::{MessageStore, StoreState};
use std::path::Path;
use tracing::{info, warn};

/// Load the config file when given, then apply environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

/// Build the store, resuming from the state file if it exists
pub fn load_store(config: &Config, state: Option<&Path>) -> Result<MessageStore> {
    let store_config = config.store.clone();
    match state {
        Some(path) if path.exists() => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read state {}", path.display()))?;
            let state: StoreState = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse state {}", path.display()))?;
            info!(
                path = %path.display(),
                length = state.messages.len(),
                "Loaded store state"
            );
            Ok(MessageStore::from_state(store_config, config.gas, state))
        }
        _ => Ok(MessageStore::new(store_config, config.gas)),
    }
}

pub fn save_state(store: &MessageStore, path: &Path) -> Result<()> {
    let state = store.snapshot()?.to_state();
    let contents = serde_json::to_string_pretty(&state)?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write state {}", path.display()))?;
    Ok(())
}

/// Submit mutating calls, query the rest, and render the result as JSON
pub fn run(ledger: &LocalLedger, call: Call) -> Result<String> {
    let method = call.method();
    let outcome = ledger.dispatch(call)?;
    if let DispatchOutcome::Receipt(receipt) = &outcome {
        if !receipt.is_success() {
            warn!(method, reason = ?receipt.revert_reason, "Call reverted");
        }
    }
    Ok(serde_json::to_string(&outcome)?)
}

pub fn run_call(ledger: &LocalLedger, json: &str) -> Result<String> {
    let call = Call::from_json(json).context("Invalid call")?;
    run(ledger, call)
}

/// Run every call of a JSON array, stopping at the first failed query
pub fn run_batch(ledger: &LocalLedger, contents: &str) -> Result<Vec<String>> {
    let calls: Vec<Call> = serde_json::from_str(contents).context("Invalid batch")?;
    if calls.is_empty() {
        bail!("Batch contains no calls");
    }
    calls.into_iter().map(|call| run(ledger, call)).collect()
}

/// Store, store at sparse indices, read back, remove, read back
pub fn run_demo(ledger: &LocalLedger) -> Result<Vec<String>> {
    let initial = match ledger.query(Call::GetCount)? {
        CallOutput::Number(count) => count,
        other => bail!("Unexpected count output: {:?}", other),
    };

    let words = ["Welcome", "To", "Bulk", "Operations"];
    let sparse = ["Index6", "Index8", "Index10"];
    let all = vec![initial, initial + 1, initial + 2, initial + 3, 6, 8, 10];

    let steps = vec![
        Call::BulkStore(words.iter().map(|w| w.to_string()).collect()),
        Call::BulkStoreAt(vec![6, 8, 10], sparse.iter().map(|w| w.to_string()).collect()),
        Call::BulkGet(all.clone()),
        Call::BulkRemove(vec![initial + 1, 8]),
        Call::BulkGet(all),
        Call::GetStats,
    ];

    steps
        .into_iter()
        .map(|call| {
            let method = call.method();
            run(ledger, call).map(|json| format!("{} {}", method, json))
        })
        .collect()
}
