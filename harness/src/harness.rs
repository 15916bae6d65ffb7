//! Initialize Harness
//!
//! Connects to a cluster, checks the program handle points at a deployed
//! program, and calls `initialize` once.
//!
//! # Flow
//!
//! ```text
//! ProgramHandle (already resolved)
//!      │
//!      ▼
//! getAccountInfo(program_id) ── missing / not executable ──► ProgramNotFound
//!      │
//!      ▼
//! getLatestBlockhash
//!      │
//!      ▼
//! sign initialize() with payer ──► send + confirm ── rejected / timeout ──► TransactionRejected
//!      │
//!      ▼
//! "Your transaction signature <sig>" ──► sink + log
//! ```
//!
//! There is no retry anywhere: the first failure is returned to the caller.

use crate::{
    config::HarnessConfig,
    error::{HarnessError, HarnessResult},
    program::ProgramHandle,
    rpc::{ClusterRpc, HttpRpc},
};
use log::{debug, info, warn};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::io::Write;

/// Drives a single `initialize` call against a deployed program.
pub struct InitializeHarness<R> {
    rpc: R,
    payer: Keypair,
    program: ProgramHandle,
}

impl InitializeHarness<HttpRpc> {
    /// Harness for the live cluster described by `config`.
    ///
    /// No request is sent until [`run_initialize_test`](Self::run_initialize_test).
    pub fn connect(config: &HarnessConfig, program: ProgramHandle) -> HarnessResult<Self> {
        let rpc = HttpRpc::from_config(config)?;
        let payer = config.load_payer()?;
        info!(
            "harness for {} ({}) on {} as {}",
            program.name(),
            program.program_id(),
            rpc.url(),
            payer.pubkey()
        );
        Ok(Self::new(rpc, payer, program))
    }
}

impl<R: ClusterRpc> InitializeHarness<R> {
    pub fn new(rpc: R, payer: Keypair, program: ProgramHandle) -> Self {
        Self { rpc, payer, program }
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    /// Call `initialize()` and report the transaction signature.
    ///
    /// On success the line `Your transaction signature <sig>` is written to
    /// `sink` and logged at `info`.
    ///
    /// # Errors
    ///
    /// * `Network` - the endpoint could not be reached
    /// * `ProgramNotFound` - nothing executable at the program id
    /// * `TransactionRejected` - the cluster refused or never confirmed the call
    pub async fn run_initialize_test<W: Write>(&self, sink: &mut W) -> HarnessResult<Signature> {
        let program_id = self.program.program_id();

        match self.rpc.get_account(program_id).await? {
            Some(account) if account.executable => {
                debug!(
                    "{} is deployed, owner {}, {} lamports",
                    program_id, account.owner, account.lamports
                );
            }
            Some(_) => {
                return Err(HarnessError::program_not_found(
                    self.program.name(),
                    format!("account {program_id} is not executable"),
                ));
            }
            None => {
                return Err(HarnessError::program_not_found(
                    self.program.name(),
                    format!("no account at {program_id}"),
                ));
            }
        }

        let blockhash = self.rpc.get_latest_blockhash().await?;
        let tx = Transaction::new_signed_with_payer(
            &[self.program.initialize()],
            Some(&self.payer.pubkey()),
            &[&self.payer],
            blockhash,
        );

        let signature = self.rpc.send_and_confirm_transaction(&tx).await?;

        info!("Your transaction signature {}", signature);
        if let Err(e) = writeln!(sink, "Your transaction signature {}", signature) {
            // Sink errors only warn
            warn!("failed to write signature to sink: {}", e);
        }

        Ok(signature)
    }
}
