//! `escrow-openbooks-harness`
//!
//! Reads `ANCHOR_PROVIDER_URL` / `ANCHOR_WALLET` (see `config`), calls
//! `initialize` on the Escrow Openbooks program and prints the signature.
//! Exits 0 on success, 1 on any failure.

use escrow_openbooks_harness::{
    HarnessConfig, HarnessResult, InitializeHarness, ProgramHandle, ESCROW_OPENBOOKS,
};
use log::error;
use std::process::ExitCode;

async fn run() -> HarnessResult<()> {
    let config = HarnessConfig::from_env()?;
    let program = ProgramHandle::resolve(&config, ESCROW_OPENBOOKS)?;
    let harness = InitializeHarness::connect(&config, program)?;
    harness.run_initialize_test(&mut std::io::stdout()).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
