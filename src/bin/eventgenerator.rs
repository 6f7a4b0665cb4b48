// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use kube_busybox::config::EventArgs;
use kube_busybox::events::EventGenerator;
use kube_busybox::kubernetes::create_client;
use kube_busybox::logging;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args = EventArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: EventArgs) -> Result<()> {
    let (connection, config) = args.into_config();

    let client = create_client(&connection).await?;
    info!(
        "Generating {} event for {} {}",
        config.event_type.as_str(),
        config.kind,
        config.name
    );

    EventGenerator::new(client, config).run().await?;
    Ok(())
}
