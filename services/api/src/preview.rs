use chrono::Datelike;
use clap::{Args, ValueEnum};
use sg_quote::config::{AppConfig, NotificationConfig};
use sg_quote::error::AppError;
use sg_quote::quote::{parse_submission, render, validate, RenderOptions};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// JSON file holding a quote payload as the form would post it
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Part of the notification to print
    #[arg(long, value_enum, default_value_t = PreviewFormat::Text)]
    pub(crate) format: PreviewFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PreviewFormat {
    Text,
    Html,
    Subject,
    /// Subject and both bodies as one JSON document
    Json,
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let body = std::fs::read(&args.input)?;
    let year = chrono::Utc::now().year();

    let output = render_preview(&body, args.format, &config.notification, year)?;
    println!("{output}");
    Ok(())
}

fn render_preview(
    body: &[u8],
    format: PreviewFormat,
    notification: &NotificationConfig,
    year: i32,
) -> Result<String, AppError> {
    let quote = validate(parse_submission(body)?)?;
    let options = RenderOptions {
        style: notification.style,
        logo_src: notification.logo_url.clone(),
        year,
    };
    let rendered = render(&quote, &options);

    let output = match format {
        PreviewFormat::Text => rendered.plain_text_body,
        PreviewFormat::Html => rendered.html_body,
        PreviewFormat::Subject => rendered.subject,
        PreviewFormat::Json => serde_json::to_string_pretty(&rendered)?,
    };
    Ok(output)
}
