//! JSON-RPC over HTTP.
//!
//! Methods used:
//!
//! | Method | Purpose |
//! |--------|---------|
//! | `getLatestBlockhash` | blockhash to sign against |
//! | `getAccountInfo` | check the program is deployed |
//! | `sendTransaction` | submit (base64 wire encoding, preflight on) |
//! | `getSignatureStatuses` | poll until the commitment is reached |
//!
//! Transport, HTTP and decoding failures are `Network` errors. A JSON-RPC
//! error from `sendTransaction`, a status carrying `err`, or a missed
//! confirmation deadline are `TransactionRejected`.

use super::{AccountSummary, ClusterRpc};
use crate::{
    config::{Commitment, HarnessConfig},
    error::{HarnessError, HarnessResult},
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use log::{debug, trace};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::{
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};
use tokio::time::{sleep, timeout, Instant};

/// Delay between two `getSignatureStatuses` polls.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(500);

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct JsonRpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorBody>,
}

/// Every "with context" response wraps its payload in `value`.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
}

#[derive(Debug, Deserialize)]
struct AccountValue {
    lamports: u64,
    owner: String,
    executable: bool,
}

/// One entry of a `getSignatureStatuses` response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    #[serde(default)]
    pub slot: u64,
    /// `None` once the transaction is rooted
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// Whether the transaction has progressed at least as far as `commitment`.
    pub fn satisfies(&self, commitment: Commitment) -> bool {
        match self.confirmation_status {
            Some(reached) => reached >= commitment,
            // Nodes that omit confirmationStatus report rooted transactions
            // with `confirmations: null`
            None => self.confirmations.is_none() || commitment == Commitment::Processed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum RpcFailure {
    Transport(String),
    Http { status: StatusCode, body: String },
    InvalidJson { error: String, body: String },
    JsonRpc { code: i64, message: String },
}

impl RpcFailure {
    fn summary(&self) -> String {
        match self {
            RpcFailure::Transport(message) => format!("transport_error={message}"),
            RpcFailure::Http { status, body } => format!("http_status={status} body={body}"),
            RpcFailure::InvalidJson { error, body } => format!("invalid_json_error={error} body={body}"),
            RpcFailure::JsonRpc { code, message } => format!("json_rpc_error code={code} message={message}"),
        }
    }
}

impl From<RpcFailure> for HarnessError {
    fn from(failure: RpcFailure) -> Self {
        HarnessError::Network(failure.summary())
    }
}

/// Split a JSON-RPC response body into its result or its error.
fn parse_envelope(body: String) -> Result<Value, RpcFailure> {
    let envelope: JsonRpcEnvelope = serde_json::from_str(&body)
        .map_err(|err| RpcFailure::InvalidJson { error: err.to_string(), body })?;
    if let Some(err) = envelope.error {
        return Err(RpcFailure::JsonRpc { code: err.code, message: err.message });
    }
    Ok(envelope.result.unwrap_or(Value::Null))
}

fn decode<T: for<'de> Deserialize<'de>>(method: &str, value: Value) -> HarnessResult<T> {
    serde_json::from_value(value)
        .map_err(|e| HarnessError::Network(format!("unexpected {method} response: {e}")))
}

// =============================================================================
// HTTP RPC CLIENT
// =============================================================================

/// [`ClusterRpc`] backed by a validator's JSON-RPC endpoint.
pub struct HttpRpc {
    client: Client,
    url: String,
    commitment: Commitment,
    confirm_timeout: Duration,
    next_id: AtomicU64,
}

impl HttpRpc {
    pub fn new(url: impl Into<String>, commitment: Commitment, confirm_timeout: Duration) -> HarnessResult<Self> {
        let client = Client::builder()
            .timeout(confirm_timeout)
            .build()
            .map_err(|e| HarnessError::Network(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            commitment,
            confirm_timeout,
            next_id: AtomicU64::new(1),
        })
    }

    /// Client for the cluster, commitment and timeout in `config`.
    pub fn from_config(config: &HarnessConfig) -> HarnessResult<Self> {
        Self::new(config.cluster.url(), config.commitment, config.confirm_timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcFailure> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        trace!("rpc request {} id={} url={}", method, id, self.url);

        let resp = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| RpcFailure::Transport(err.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|err| RpcFailure::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(RpcFailure::Http { status, body });
        }
        parse_envelope(body)
    }

    async fn get_signature_status(&self, signature: &Signature) -> HarnessResult<Option<SignatureStatus>> {
        let result = self
            .call(
                "getSignatureStatuses",
                json!([[signature.to_string()], { "searchTransactionHistory": false }]),
            )
            .await?;
        let statuses: WithContext<Vec<Option<SignatureStatus>>> = decode("getSignatureStatuses", result)?;
        Ok(statuses.value.into_iter().next().flatten())
    }

    async fn send_transaction(&self, tx: &Transaction) -> HarnessResult<Signature> {
        let wire = bincode::serialize(tx)
            .map_err(|e| HarnessError::TransactionRejected(format!("failed to serialize transaction: {e}")))?;
        let params = json!([
            STANDARD.encode(wire),
            { "encoding": "base64", "preflightCommitment": self.commitment.as_str() }
        ]);

        let result = match self.call("sendTransaction", params).await {
            Ok(result) => result,
            // The node answered and refused the transaction (preflight, bad signature, ...)
            Err(RpcFailure::JsonRpc { code, message }) => {
                return Err(HarnessError::TransactionRejected(format!("{message} (code {code})")));
            }
            Err(failure) => return Err(failure.into()),
        };

        let raw: String = decode("sendTransaction", result)?;
        Signature::from_str(&raw)
            .map_err(|e| HarnessError::Network(format!("invalid signature `{raw}` in response: {e}")))
    }

    async fn confirm(&self, signature: Signature) -> HarnessResult<Signature> {
        let deadline = Instant::now() + self.confirm_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let status = match timeout(remaining, self.get_signature_status(&signature)).await {
                Ok(status) => status?,
                Err(_) => return Err(self.not_confirmed(&signature)),
            };
            if let Some(status) = status {
                if let Some(err) = status.err {
                    return Err(HarnessError::TransactionRejected(format!("{signature} failed: {err}")));
                }
                if status.satisfies(self.commitment) {
                    debug!("{} reached {} at slot {}", signature, self.commitment.as_str(), status.slot);
                    return Ok(signature);
                }
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.not_confirmed(&signature));
            }
            sleep(remaining.min(STATUS_POLL_INTERVAL)).await;
        }
    }

    fn not_confirmed(&self, signature: &Signature) -> HarnessError {
        HarnessError::TransactionRejected(format!(
            "{} not {} within {:?}",
            signature,
            self.commitment.as_str(),
            self.confirm_timeout
        ))
    }
}

#[async_trait]
impl ClusterRpc for HttpRpc {
    async fn get_latest_blockhash(&self) -> HarnessResult<Hash> {
        let result = self
            .call("getLatestBlockhash", json!([{ "commitment": self.commitment.as_str() }]))
            .await?;
        let value: WithContext<BlockhashValue> = decode("getLatestBlockhash", result)?;
        Hash::from_str(&value.value.blockhash)
            .map_err(|e| HarnessError::Network(format!("invalid blockhash in response: {e}")))
    }

    async fn get_account(&self, pubkey: &Pubkey) -> HarnessResult<Option<AccountSummary>> {
        let result = self
            .call(
                "getAccountInfo",
                json!([pubkey.to_string(), { "encoding": "base64", "commitment": self.commitment.as_str() }]),
            )
            .await?;
        let value: WithContext<Option<AccountValue>> = decode("getAccountInfo", result)?;
        let Some(account) = value.value else {
            return Ok(None);
        };
        let owner = Pubkey::from_str(&account.owner)
            .map_err(|e| HarnessError::Network(format!("invalid owner in response: {e}")))?;
        Ok(Some(AccountSummary {
            owner,
            lamports: account.lamports,
            executable: account.executable,
        }))
    }

    async fn send_and_confirm_transaction(&self, tx: &Transaction) -> HarnessResult<Signature> {
        let signature = self.send_transaction(tx).await?;
        debug!("submitted {} to {}", signature, self.url);
        self.confirm(signature).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_result() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":5},"value":null}}"#;
        let value = parse_envelope(body.to_string()).unwrap();
        let account: WithContext<Option<AccountValue>> = decode("getAccountInfo", value).unwrap();
        assert!(account.value.is_none());
    }

    #[test]
    fn test_parse_envelope_error() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32002,"message":"Transaction simulation failed"}}"#;
        assert_eq!(
            parse_envelope(body.to_string()).unwrap_err(),
            RpcFailure::JsonRpc {
                code: -32002,
                message: "Transaction simulation failed".to_string()
            }
        );
    }

    #[test]
    fn test_parse_envelope_invalid_json() {
        let failure = parse_envelope("<html>bad gateway</html>".to_string()).unwrap_err();
        assert!(matches!(failure, RpcFailure::InvalidJson { .. }));
        assert!(matches!(HarnessError::from(failure), HarnessError::Network(_)));
    }

    #[test]
    fn test_decode_blockhash() {
        let value = json!({
            "context": { "slot": 2792 },
            "value": { "blockhash": Hash::default().to_string(), "lastValidBlockHeight": 3090 }
        });
        let decoded: WithContext<BlockhashValue> = decode("getLatestBlockhash", value).unwrap();
        assert_eq!(Hash::from_str(&decoded.value.blockhash).unwrap(), Hash::default());
    }

    #[test]
    fn test_decode_program_account() {
        let value = json!({
            "context": { "slot": 1 },
            "value": {
                "data": ["", "base64"],
                "executable": true,
                "lamports": 1141440,
                "owner": "BPFLoaderUpgradeab1e11111111111111111111111",
                "rentEpoch": 0,
                "space": 36
            }
        });
        let decoded: WithContext<Option<AccountValue>> = decode("getAccountInfo", value).unwrap();
        let account = decoded.value.unwrap();
        assert!(account.executable);
        assert_eq!(account.lamports, 1141440);
    }

    #[test]
    fn test_signature_status_commitment() {
        let status: SignatureStatus = serde_json::from_value(json!({
            "slot": 72,
            "confirmations": 10,
            "err": null,
            "status": { "Ok": null },
            "confirmationStatus": "confirmed"
        }))
        .unwrap();

        assert!(status.err.is_none());
        assert!(status.satisfies(Commitment::Processed));
        assert!(status.satisfies(Commitment::Confirmed));
        assert!(!status.satisfies(Commitment::Finalized));
    }

    #[test]
    fn test_signature_status_without_confirmation_status() {
        let rooted: SignatureStatus =
            serde_json::from_value(json!({ "slot": 1, "confirmations": null, "err": null })).unwrap();
        assert!(rooted.satisfies(Commitment::Finalized));

        let pending: SignatureStatus =
            serde_json::from_value(json!({ "slot": 1, "confirmations": 0, "err": null })).unwrap();
        assert!(pending.satisfies(Commitment::Processed));
        assert!(!pending.satisfies(Commitment::Confirmed));
    }

    #[test]
    fn test_signature_status_error() {
        let status: SignatureStatus = serde_json::from_value(json!({
            "slot": 9,
            "confirmations": 0,
            "err": { "InstructionError": [0, { "Custom": 101 }] },
            "confirmationStatus": "processed"
        }))
        .unwrap();
        assert!(status.err.is_some());
    }
}

/*
=============================================================================
DETAILED EXPLANATION
=============================================================================

SUBMIT AND CONFIRM
==================

    sendTransaction (preflight on)
         │
         ├── JSON-RPC error ───────────────► TransactionRejected
         ├── transport / non-2xx ──────────► Network
         ▼
    signature
         │
         ▼
    ┌─► getSignatureStatuses  (bounded by what is left of confirm_timeout)
    │        │
    │        ├── deadline hit mid-request ─► TransactionRejected
    │        ├── status.err set ───────────► TransactionRejected
    │        ├── commitment reached ───────► Ok(signature)
    │        ▼
    │   not seen yet / not far enough
    │        │
    │        ├── deadline passed ──────────► TransactionRejected
    │        ▼
    └── sleep min(500 ms, time left)

The whole confirmation phase never outlives confirm_timeout. The same
duration is also the per-request timeout of the reqwest client, which
bounds getLatestBlockhash, getAccountInfo and sendTransaction.

The transaction is submitted once. A status that never shows up is not
answered by resending, the deadline simply runs out.

COMMITMENT
==========

    processed < confirmed < finalized

A status satisfies the configured level when its confirmationStatus is at
least that level. Older nodes omit confirmationStatus; there a null
confirmations count means the transaction is rooted (finalized).
*/
