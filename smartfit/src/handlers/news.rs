//! `news` command

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};

use smartfit::{NewsClient, NewsQuery, Operation, RequestKey};

use super::render;
use super::CommandContext;

/// Handle the `news` command
pub async fn news(
    ctx: &CommandContext,
    query: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    sort_by: Option<String>,
) -> Result<()> {
    let client = NewsClient::new(&ctx.config.news)?;
    if !client.is_available() {
        bail!("News search needs an API key: set NEWS_API_KEY or [news].api_key");
    }

    let mut search = NewsQuery::recent(&ctx.config.news, Local::now().date_naive());
    if let Some(query) = query {
        search.query = query;
    }
    if let Some(from) = from {
        search.from = from;
    }
    if let Some(to) = to {
        search.to = to;
    }
    if let Some(sort_by) = sort_by {
        search.sort_by = sort_by;
    }
    if search.from > search.to {
        bail!("--from {} is after --to {}", search.from, search.to);
    }

    let key = RequestKey::new(Operation::News, search.query.clone());
    let work = async move { client.search(&search).await };
    match ctx.run_guarded(key, work).await? {
        Some(Ok(results)) => ctx.emit(&results, render::news_text),
        Some(Err(e)) => bail!("News search failed: {e}"),
        None => Ok(()),
    }
}
