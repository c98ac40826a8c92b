// crates/ccg-anchor/src/jsonrpc.rs
//
// Pointer contract client over Ethereum JSON-RPC (HTTP POST).
//
// Reads go through `eth_call` and are each bounded by the read timeout.
// Writes are signed locally by a [`LocalSigner`] for the configured chain id:
// nonce, fees and gas come from the node, the signed envelope goes out via
// `eth_sendRawTransaction`, and the whole sequence is bounded by the write
// timeout. A write returns as soon as the node hands back a transaction hash:
// no receipt polling, no confirmation wait, no nonce-collision retry. Callers
// cannot tell a pending write from a finalized one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use ccg_core::{CcgError, ChainAnchor, ContentId, ContentPointer, RepositoryId, TransactionHash};

use crate::abi;
use crate::signer::{DynamicFeeTransaction, LocalSigner};

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection settings for [`JsonRpcAnchor`].
#[derive(Debug, Clone)]
pub struct AnchorConfig {
    /// HTTP JSON-RPC endpoint of the chain node.
    pub rpc_url: String,
    /// Chain id every transaction is bound to.
    pub chain_id: u64,
    /// `0x`-prefixed address of the deployed pointer contract.
    pub contract_address: String,
    /// Deadline applied to each read call.
    pub read_timeout: Duration,
    /// Deadline for a whole write: nonce, fee and gas lookups plus submission.
    pub write_timeout: Duration,
}

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub result: Option<serde_json::Value>,
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// [`ChainAnchor`] backed by a pointer contract on an EVM chain.
#[derive(Debug)]
pub struct JsonRpcAnchor {
    rpc_url: String,
    chain_id: u64,
    contract_address: String,
    contract: [u8; 20],
    signer: Option<LocalSigner>,
    read_timeout: Duration,
    write_timeout: Duration,
    client: reqwest::Client,
    next_id: AtomicU64,
}

fn parse_address(s: &str) -> Option<[u8; 20]> {
    let bytes = hex::decode(s.strip_prefix("0x")?).ok()?;
    bytes.try_into().ok()
}

fn parse_hex_bytes(value: &serde_json::Value) -> Result<Vec<u8>, CcgError> {
    let s = value
        .as_str()
        .ok_or_else(|| CcgError::Rpc(format!("expected hex string, got {}", value)))?;
    hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| CcgError::Rpc(format!("invalid hex in response: {}", e)))
}

fn parse_hex_u128(value: &serde_json::Value) -> Result<u128, CcgError> {
    let s = value
        .as_str()
        .ok_or_else(|| CcgError::Rpc(format!("expected hex quantity, got {}", value)))?;
    u128::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| CcgError::Rpc(format!("invalid hex quantity {}: {}", s, e)))
}

fn parse_hex_u64(value: &serde_json::Value) -> Result<u64, CcgError> {
    let quantity = parse_hex_u128(value)?;
    u64::try_from(quantity)
        .map_err(|_| CcgError::Rpc(format!("hex quantity {} does not fit in 64 bits", quantity)))
}

impl JsonRpcAnchor {
    /// Build a read-only client. Fails with `Configuration` on a malformed
    /// contract address. Attach a signer with [`JsonRpcAnchor::with_signer`]
    /// before writing.
    pub fn new(config: AnchorConfig) -> Result<Self, CcgError> {
        let contract = parse_address(&config.contract_address).ok_or_else(|| {
            CcgError::Configuration(format!(
                "contract address {:?} is not a 0x-prefixed 20-byte hex address",
                config.contract_address
            ))
        })?;
        if config.rpc_url.trim().is_empty() {
            return Err(CcgError::Configuration("chain RPC URL is not set".to_string()));
        }

        Ok(Self {
            rpc_url: config.rpc_url,
            chain_id: config.chain_id,
            contract_address: config.contract_address,
            contract,
            signer: None,
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Attach the key that signs pointer writes.
    pub fn with_signer(mut self, signer: LocalSigner) -> Self {
        tracing::debug!("Pointer writes will be signed by {}", signer.address_hex());
        self.signer = Some(signer);
        self
    }

    /// Replace the per-read deadline.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Replace the per-write deadline.
    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    /// Send a JSON-RPC call and return its `result`.
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<(serde_json::Value, Option<JsonRpcError>), CcgError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: method.to_string(),
            params,
        };

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CcgError::Rpc(format!("{} request failed: {}", method, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CcgError::Rpc(format!(
                "{} failed ({}): {}",
                method, status, body
            )));
        }

        let rpc_response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| CcgError::Rpc(format!("{} response parse failed: {}", method, e)))?;

        match (rpc_response.result, rpc_response.error) {
            (_, Some(error)) => Ok((serde_json::Value::Null, Some(error))),
            (Some(result), None) => Ok((result, None)),
            (None, None) => Err(CcgError::Rpc(format!(
                "{} response carried neither result nor error",
                method
            ))),
        }
    }

    /// Call a method whose errors are all `Rpc`.
    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, CcgError> {
        match self.rpc_call(method, params).await? {
            (_, Some(error)) => Err(CcgError::Rpc(format!(
                "{} returned error {}: {}",
                method, error.code, error.message
            ))),
            (result, None) => Ok(result),
        }
    }

    /// `eth_call` against the contract, bounded by the read timeout.
    async fn read(&self, data: Vec<u8>) -> Result<Vec<u8>, CcgError> {
        let params = serde_json::json!([
            {
                "to": self.contract_address,
                "data": format!("0x{}", hex::encode(data)),
            },
            "latest"
        ]);

        let result = tokio::time::timeout(self.read_timeout, self.call("eth_call", params))
            .await
            .map_err(|_| CcgError::Timeout(self.read_timeout))??;

        let bytes = parse_hex_bytes(&result)?;
        if bytes.is_empty() {
            return Err(CcgError::Rpc(format!(
                "eth_call returned no data; is the contract deployed at {}?",
                self.contract_address
            )));
        }
        Ok(bytes)
    }

    /// Check that the node serves the chain id transactions are bound to.
    pub async fn verify_chain_id(&self) -> Result<(), CcgError> {
        let result = tokio::time::timeout(
            self.read_timeout,
            self.call("eth_chainId", serde_json::json!([])),
        )
        .await
        .map_err(|_| CcgError::Timeout(self.read_timeout))??;

        let node_chain_id = parse_hex_u64(&result)?;
        if node_chain_id != self.chain_id {
            return Err(CcgError::Configuration(format!(
                "node serves chain id {}, configured chain id is {}",
                node_chain_id, self.chain_id
            )));
        }
        Ok(())
    }

    /// Fetch nonce, fees and gas, sign locally and submit.
    async fn submit(&self, signer: &LocalSigner, data: Vec<u8>) -> Result<String, CcgError> {
        let from = signer.address_hex();
        let data_hex = format!("0x{}", hex::encode(&data));

        let nonce = parse_hex_u64(
            &self
                .call("eth_getTransactionCount", serde_json::json!([from, "pending"]))
                .await?,
        )?;
        let gas_price = parse_hex_u128(&self.call("eth_gasPrice", serde_json::json!([])).await?)?;
        let priority_fee = parse_hex_u128(
            &self
                .call("eth_maxPriorityFeePerGas", serde_json::json!([]))
                .await?,
        )?;
        let gas_limit = parse_hex_u64(
            &self
                .call(
                    "eth_estimateGas",
                    serde_json::json!([{
                        "from": from,
                        "to": self.contract_address,
                        "data": data_hex,
                    }]),
                )
                .await?,
        )?;

        // Headroom for one base-fee doubling before the transaction is mined.
        let max_fee = gas_price.saturating_mul(2).saturating_add(priority_fee);
        let tx = DynamicFeeTransaction {
            chain_id: self.chain_id,
            nonce,
            max_priority_fee_per_gas: priority_fee,
            max_fee_per_gas: max_fee,
            gas_limit,
            to: self.contract,
            data,
        };
        tracing::debug!(
            "Signing setProject from {} (nonce {}, gas {}, max fee {})",
            from,
            nonce,
            gas_limit,
            max_fee
        );
        let envelope = signer.sign(&tx)?;

        let result = self
            .call(
                "eth_sendRawTransaction",
                serde_json::json!([format!("0x{}", hex::encode(envelope))]),
            )
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CcgError::Rpc(format!("expected transaction hash, got {}", result)))
    }
}

fn content_id_from(raw: Vec<u8>) -> Result<ContentId, CcgError> {
    String::from_utf8(raw)
        .map(ContentId)
        .map_err(|e| CcgError::Rpc(format!("stored content id is not UTF-8: {}", e)))
}

#[async_trait]
impl ChainAnchor for JsonRpcAnchor {
    async fn exists(&self, id: &RepositoryId) -> Result<bool, CcgError> {
        let data = self.read(abi::encode_id_call(&abi::GET_PROJECT, id)).await?;
        let (_, _, exists) = abi::decode_project(&data)?;
        Ok(exists)
    }

    async fn get_pointer(&self, id: &RepositoryId) -> Result<Option<ContentPointer>, CcgError> {
        let data = self.read(abi::encode_id_call(&abi::GET_PROJECT, id)).await?;
        let (blob, metadata, exists) = abi::decode_project(&data)?;
        if !exists {
            return Ok(None);
        }
        Ok(Some(ContentPointer {
            blob: content_id_from(blob)?,
            metadata: content_id_from(metadata)?,
        }))
    }

    async fn get_metadata(&self, id: &RepositoryId) -> Result<Option<ContentId>, CcgError> {
        let data = self.read(abi::encode_id_call(&abi::GET_METADATA, id)).await?;
        let (metadata, exists) = abi::decode_metadata(&data)?;
        if !exists {
            return Ok(None);
        }
        content_id_from(metadata).map(Some)
    }

    async fn set_pointer(
        &self,
        id: &RepositoryId,
        blob: &ContentId,
        metadata: &ContentId,
    ) -> Result<TransactionHash, CcgError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            CcgError::Signing("no signing key configured".to_string())
        })?;

        let data = abi::encode_set_project(id, blob.as_str().as_bytes(), metadata.as_str().as_bytes());
        let hash = tokio::time::timeout(self.write_timeout, self.submit(signer, data))
            .await
            .map_err(|_| CcgError::Timeout(self.write_timeout))??;

        tracing::info!("Submitted setProject for {} as {}", id, hash);
        Ok(TransactionHash(hash))
    }
}
