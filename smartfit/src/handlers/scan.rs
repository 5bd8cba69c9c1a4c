//! `scan` command: one pass through the scan flow

use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::sync::Arc;

use smartfit::flow::ScanFailure;
use smartfit::{
    ClothingStyle, FlowOptions, Gender, Operation, RequestKey, ScanFlow, ScanState,
    StyleBackend, StyleRequest,
};

use super::render;
use super::CommandContext;

pub struct ScanArgs {
    pub image: PathBuf,
    pub user: Option<String>,
    pub gender: Option<Gender>,
    pub style: Option<ClothingStyle>,
    pub clothing_type: Option<String>,
}

/// Style for a skipped style step, from the configured default tag
///
/// The tag may carry a gender suffix (`formal-men`); only the style part is
/// used. Unknown styles fall back to streetwear.
fn default_style(tag: &str) -> ClothingStyle {
    let style = tag.split('-').next().unwrap_or_default();
    <ClothingStyle as ValueEnum>::from_str(style.trim(), true).unwrap_or_else(|_| {
        tracing::warn!(tag, "unknown default clothing type, using streetwear");
        ClothingStyle::Streetwear
    })
}

/// Walk the flow up to `Ready` using whatever the user passed
fn prepare(ctx: &CommandContext, args: ScanArgs, user_id: &str) -> Result<ScanFlow> {
    let ScanArgs {
        image,
        gender,
        style,
        clothing_type,
        ..
    } = args;

    if gender.is_none() && style.is_none() {
        let tag = clothing_type.unwrap_or_else(|| ctx.config.request.default_clothing_type.clone());
        let request = StyleRequest::new(image, Some(user_id), Some(&tag));
        return Ok(ScanFlow::ready(FlowOptions::quick_scan(), request));
    }

    let options = FlowOptions {
        ask_gender: gender.is_some(),
        ask_style: style.is_some(),
        default_style: default_style(&ctx.config.request.default_clothing_type),
    };
    let mut flow = ScanFlow::new(options, Some(user_id.to_string()));
    flow.select_image(image)?;
    if let Some(gender) = gender {
        flow.choose_gender(gender)?;
    }
    if let Some(style) = style {
        flow.choose_style(style)?;
    }
    Ok(flow)
}

/// Handle the `scan` command
pub async fn scan(ctx: &CommandContext, args: ScanArgs) -> Result<()> {
    let user_id = ctx.user_id(args.user.clone());
    let mut flow = prepare(ctx, args, &user_id)?;
    if let ScanState::Ready(request) = flow.state() {
        tracing::info!(user_id = %user_id, clothing_type = request.clothing_type(), "scan ready");
    }

    if let Some(payload) = flow.begin_submit()? {
        let client = Arc::clone(&ctx.client);
        let key = RequestKey::new(Operation::Submit, user_id);
        let work = async move { client.submit(payload).await };

        match ctx.run_guarded(key, work).await? {
            Some(outcome) => {
                flow.complete(outcome)?;
            }
            None => {
                eprintln!("Scan abandoned");
                return Ok(());
            }
        }
    }

    match flow.state() {
        ScanState::Showing(result) => ctx.emit(&**result, render::result_text),
        ScanState::Failed(ScanFailure::Local { message }) => bail!("{message}"),
        ScanState::Failed(failure @ ScanFailure::Network { .. }) => {
            bail!("Network error: {}. Retry with a new scan.", failure.message())
        }
        other => bail!("scan stopped in state {other}"),
    }
}
