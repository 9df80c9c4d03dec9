//! Ask command - one pipeline run from the terminal

use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::domain::Query;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::observability::ChannelObservabilitySink;

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Identifier recorded with the run
    #[arg(long, default_value = "cli")]
    pub user_id: String,

    /// The compliance question
    pub query: String,
}

/// Print the `PipelineResult` as pretty JSON; failures exit non-zero
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    let sink = Arc::new(ChannelObservabilitySink::spawn(config.metrics.trace_buffer));
    let pipeline = crate::build_pipeline(&config, sink).await?;

    let result = pipeline
        .run(Query::new(args.query, args.user_id))
        .await
        .with_context(|| "Compliance pipeline failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
