// crates/ccg-anchor/src/signer.rs
//
// Local transaction signing for pointer writes.
//
// The key is loaded from a hex private key or an encrypted JSON keystore and
// never leaves the process. Writes are EIP-1559 (type 2) transactions bound to
// the configured chain id and submitted pre-signed via
// `eth_sendRawTransaction`, which every public endpoint accepts.

use std::fmt;
use std::path::Path;

use k256::ecdsa::{SigningKey, VerifyingKey};
use rlp::RlpStream;
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use ccg_core::CcgError;

/// EIP-2718 type byte of a dynamic-fee transaction.
pub const EIP1559_TX_TYPE: u8 = 0x02;

/// Secp256k1 key held in memory for signing pointer writes.
#[derive(Clone)]
pub struct LocalSigner {
    key: SigningKey,
    address: [u8; 20],
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address_hex())
            .finish_non_exhaustive()
    }
}

/// Ethereum address of a public key: last 20 bytes of Keccak-256 over the
/// uncompressed point without its `0x04` tag.
pub fn address_of(key: &VerifyingKey) -> [u8; 20] {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}

impl LocalSigner {
    /// Load from raw 32-byte secret key material.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, CcgError> {
        let key = SigningKey::from_slice(secret)
            .map_err(|e| CcgError::Signing(format!("invalid secp256k1 private key: {}", e)))?;
        let address = address_of(key.verifying_key());
        Ok(Self { key, address })
    }

    /// Load from a hex private key, with or without `0x`.
    pub fn from_private_key_hex(private_key: &str) -> Result<Self, CcgError> {
        let secret = Zeroizing::new(
            hex::decode(private_key.trim().trim_start_matches("0x"))
                .map_err(|e| CcgError::Signing(format!("private key is not hex: {}", e)))?,
        );
        Self::from_bytes(&secret)
    }

    /// Decrypt a Web3 Secret Storage keystore file.
    pub fn from_keystore(path: &Path, password: &str) -> Result<Self, CcgError> {
        let secret = Zeroizing::new(eth_keystore::decrypt_key(path, password).map_err(|e| {
            CcgError::Signing(format!("cannot decrypt keystore {}: {}", path.display(), e))
        })?);
        Self::from_bytes(&secret)
    }

    pub fn address(&self) -> [u8; 20] {
        self.address
    }

    /// `0x`-prefixed lowercase address.
    pub fn address_hex(&self) -> String {
        format!("0x{}", hex::encode(self.address))
    }

    /// Sign `tx` and return the EIP-2718 envelope ready for
    /// `eth_sendRawTransaction`.
    pub fn sign(&self, tx: &DynamicFeeTransaction) -> Result<Vec<u8>, CcgError> {
        let hash = tx.signing_hash();
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| CcgError::Signing(format!("signing failed: {}", e)))?;
        let rs = signature.to_bytes();
        let (r, s) = rs.split_at(32);

        let mut stream = RlpStream::new_list(12);
        tx.append_unsigned_fields(&mut stream);
        append_uint(&mut stream, u128::from(recovery_id.to_byte()));
        stream.append(&trim_leading_zeros(r));
        stream.append(&trim_leading_zeros(s));

        let mut envelope = vec![EIP1559_TX_TYPE];
        envelope.extend_from_slice(&stream.out());
        Ok(envelope)
    }
}

/// Unsigned EIP-1559 contract call. Value transfer and access lists are
/// always empty for pointer writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicFeeTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub gas_limit: u64,
    pub to: [u8; 20],
    pub data: Vec<u8>,
}

impl DynamicFeeTransaction {
    fn append_unsigned_fields(&self, stream: &mut RlpStream) {
        append_uint(stream, u128::from(self.chain_id));
        append_uint(stream, u128::from(self.nonce));
        append_uint(stream, self.max_priority_fee_per_gas);
        append_uint(stream, self.max_fee_per_gas);
        append_uint(stream, u128::from(self.gas_limit));
        stream.append(&self.to.to_vec());
        append_uint(stream, 0);
        stream.append(&self.data);
        stream.begin_list(0);
    }

    /// Keccak-256 over `0x02 || rlp(unsigned fields)`.
    pub fn signing_hash(&self) -> [u8; 32] {
        let mut stream = RlpStream::new_list(9);
        self.append_unsigned_fields(&mut stream);

        let mut hasher = Keccak256::new();
        hasher.update([EIP1559_TX_TYPE]);
        hasher.update(stream.out());
        hasher.finalize().into()
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[start..].to_vec()
}

/// RLP integers are minimal big-endian byte strings; zero is empty.
fn append_uint(stream: &mut RlpStream, value: u128) {
    stream.append(&trim_leading_zeros(&value.to_be_bytes()));
}
