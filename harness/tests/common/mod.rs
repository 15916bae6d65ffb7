//! Shared fixtures for the harness integration tests.

use async_trait::async_trait;
use escrow_openbooks_harness::{AccountSummary, ClusterRpc, HarnessError, HarnessResult};
use solana_program_test::{processor, BanksClient, BanksClientError, ProgramTest};
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// ProgramTest with the Escrow Openbooks program loaded at `program_id`
pub fn program_test_at(program_id: Pubkey) -> ProgramTest {
    ProgramTest::new(
        "escrow_openbooks",
        program_id,
        processor!(escrow_openbooks::processor::Processor::process),
    )
}

/// ProgramTest with the program loaded at its declared id
pub fn program_test() -> ProgramTest {
    program_test_at(escrow_openbooks::id())
}

// =============================================================================
// IN-PROCESS BANK
// =============================================================================

/// [`ClusterRpc`] over the in-process bank of `solana-program-test`.
///
/// Transactions are simulated first, like a validator with preflight on, then
/// processed synchronously. A successful call is past any commitment level.
pub struct BanksRpc {
    client: BanksClient,
}

impl BanksRpc {
    pub fn new(client: BanksClient) -> Self {
        Self { client }
    }
}

fn banks_error(e: BanksClientError) -> HarnessError {
    match e {
        BanksClientError::TransactionError(err) | BanksClientError::SimulationError { err, .. } => {
            HarnessError::TransactionRejected(err.to_string())
        }
        other => HarnessError::Network(other.to_string()),
    }
}

#[async_trait]
impl ClusterRpc for BanksRpc {
    async fn get_latest_blockhash(&self) -> HarnessResult<Hash> {
        let mut client = self.client.clone();
        client.get_latest_blockhash().await.map_err(banks_error)
    }

    async fn get_account(&self, pubkey: &Pubkey) -> HarnessResult<Option<AccountSummary>> {
        let mut client = self.client.clone();
        let account = client.get_account(*pubkey).await.map_err(banks_error)?;
        Ok(account.map(|account| AccountSummary {
            owner: account.owner,
            lamports: account.lamports,
            executable: account.executable,
        }))
    }

    async fn send_and_confirm_transaction(&self, tx: &Transaction) -> HarnessResult<Signature> {
        let mut client = self.client.clone();
        client
            .process_transaction_with_preflight(tx.clone())
            .await
            .map_err(banks_error)?;
        Ok(tx.signatures[0])
    }
}

// =============================================================================
// CALL COUNTER
// =============================================================================

/// [`ClusterRpc`] that records every call and fails it as unreachable.
#[derive(Default)]
pub struct CountingRpc {
    calls: AtomicUsize,
}

impl CountingRpc {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn unreachable(&self) -> HarnessError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        HarnessError::Network("connection refused".to_string())
    }
}

#[async_trait]
impl ClusterRpc for CountingRpc {
    async fn get_latest_blockhash(&self) -> HarnessResult<Hash> {
        Err(self.unreachable())
    }

    async fn get_account(&self, _pubkey: &Pubkey) -> HarnessResult<Option<AccountSummary>> {
        Err(self.unreachable())
    }

    async fn send_and_confirm_transaction(&self, _tx: &Transaction) -> HarnessResult<Signature> {
        Err(self.unreachable())
    }
}
