// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use kube_busybox::config::TlsArgs;
use kube_busybox::logging;
use kube_busybox::tls::TlsController;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args = TlsArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: TlsArgs) -> Result<()> {
    let config = args.into_config()?;

    let mut stdout = std::io::stdout().lock();
    TlsController::new(config).run(&mut stdout).await?;
    Ok(())
}
