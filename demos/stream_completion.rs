//! Streams a completion to stdout as it is generated.
//!
//! ```text
//! OPENAI_API_KEY=sk-... RUST_LOG=openai_lite=debug cargo run --example stream_completion -- "Once upon a"
//! ```

use anyhow::Context;
use openai_lite::{ModelType, OpenAiClient, StreamAccumulator};
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Once upon a".to_string());

    let client = OpenAiClient::from_env().context("failed to configure client")?;

    let mut accumulator = StreamAccumulator::new();
    let responses = client
        .stream_completion_with(&prompt, ModelType::default(), 64, |response| {
            print!("{}", response.text().unwrap_or_default());
            let _ = std::io::stdout().flush();
            accumulator.process(response);
        })
        .await
        .context("streaming completion failed")?;
    println!();

    let merged = accumulator.into_response();
    tracing::info!(
        chunks = responses.len(),
        finish_reason = merged.choices.first().and_then(|c| c.finish_reason.as_deref()),
        "completion finished"
    );

    Ok(())
}
