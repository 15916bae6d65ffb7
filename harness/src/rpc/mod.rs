//! Cluster RPC seam.
//!
//! The harness only needs three things from a cluster, so it talks to it
//! through [`ClusterRpc`]. [`HttpRpc`] speaks JSON-RPC to a real validator;
//! the test suite plugs in an in-process bank instead.

pub mod http;

pub use http::HttpRpc;

use crate::error::HarnessResult;
use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::sync::Arc;

/// The parts of an on-chain account the harness inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub owner: Pubkey,
    pub lamports: u64,
    pub executable: bool,
}

#[async_trait]
pub trait ClusterRpc: Send + Sync {
    /// Blockhash to sign the next transaction against.
    async fn get_latest_blockhash(&self) -> HarnessResult<Hash>;

    /// Look up an account. `Ok(None)` means the account does not exist.
    async fn get_account(&self, pubkey: &Pubkey) -> HarnessResult<Option<AccountSummary>>;

    /// Submit a signed transaction and wait until it reaches the configured
    /// commitment. Single attempt, the transaction is never resent.
    async fn send_and_confirm_transaction(&self, tx: &Transaction) -> HarnessResult<Signature>;
}

#[async_trait]
impl<T: ClusterRpc + ?Sized> ClusterRpc for Arc<T> {
    async fn get_latest_blockhash(&self) -> HarnessResult<Hash> {
        (**self).get_latest_blockhash().await
    }

    async fn get_account(&self, pubkey: &Pubkey) -> HarnessResult<Option<AccountSummary>> {
        (**self).get_account(pubkey).await
    }

    async fn send_and_confirm_transaction(&self, tx: &Transaction) -> HarnessResult<Signature> {
        (**self).send_and_confirm_transaction(tx).await
    }
}
