//! Warmup command - fills the embedding cache ahead of serving

use tracing::warn;

use crate::Services;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let services = Services::build(&config).await?;

    let report = services.warmup.run().await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.failed.is_empty() {
        warn!(failed = report.failed.len(), "Some warmup queries were not embedded");
    }

    Ok(())
}
