//! `history`, `detail` and `delete` commands

use anyhow::{bail, Result};
use std::sync::Arc;

use smartfit::{HistoryBackend, HistoryList, Operation, RequestKey};

use super::render;
use super::CommandContext;

async fn load(ctx: &CommandContext, user_id: &str) -> Result<Option<HistoryList>> {
    let client = Arc::clone(&ctx.client);
    let owner = user_id.to_string();
    let work = async move { client.list_history(&owner).await };

    let outcome = ctx
        .run_guarded(RequestKey::new(Operation::ListHistory, user_id), work)
        .await?;
    Ok(outcome.map(|outcome| HistoryList::from_outcome(user_id, outcome)))
}

/// Handle the `history` command
pub async fn history(ctx: &CommandContext, user: Option<String>) -> Result<()> {
    let user_id = ctx.user_id(user);
    if let Some(list) = load(ctx, &user_id).await? {
        ctx.emit(&list, render::history_text)?;
    }
    Ok(())
}

/// Handle the `detail` command
pub async fn detail(ctx: &CommandContext, user: Option<String>, key: &str) -> Result<()> {
    let user_id = ctx.user_id(user);
    let client = Arc::clone(&ctx.client);
    let (owner, prediction_key) = (user_id.clone(), key.to_string());
    let work = async move { client.get_detail(&owner, &prediction_key).await };

    let request_key = RequestKey::for_item(Operation::GetDetail, &user_id, key);
    match ctx.run_guarded(request_key, work).await? {
        Some(Ok(entry)) => ctx.emit(&entry, render::entry_text),
        Some(Err(e)) => bail!("Failed to load prediction {key}: {e}"),
        None => Ok(()),
    }
}

/// Handle the `delete` command
///
/// The remaining history is printed only after the server confirms.
pub async fn delete(ctx: &CommandContext, user: Option<String>, key: &str) -> Result<()> {
    let user_id = ctx.user_id(user);
    let Some(mut list) = load(ctx, &user_id).await? else {
        return Ok(());
    };
    if list.get(key).is_none() {
        tracing::warn!(user_id = %user_id, prediction_key = key, "key not in the listed history");
    }

    let client = Arc::clone(&ctx.client);
    let (owner, prediction_key) = (user_id.clone(), key.to_string());
    let work = async move { client.delete_history(&owner, &prediction_key).await };

    let request_key = RequestKey::for_item(Operation::DeleteHistory, &user_id, key);
    let Some(outcome) = ctx.run_guarded(request_key, work).await? else {
        return Ok(());
    };
    if let Err(e) = list.apply_deletion(key, outcome) {
        bail!("Failed to delete prediction {key}: {e}");
    }
    ctx.emit(&list, render::history_text)
}
