// crates/ccg-cli/src/config.rs
//
// Runtime configuration for the ccg CLI.
// Loaded once from a TOML file (or defaults), then overridden from the
// environment for secrets.

use std::fs;
use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use ccg_anchor::{AnchorConfig, LocalSigner};
use ccg_core::crypto::KEY_SIZE;
use ccg_core::CcgError;
use ccg_store::LighthouseConfig;

/// Environment variable holding the base64 encryption key.
pub const ENV_SECRET_KEY: &str = "CCG_SECRET_KEY";
/// Environment variable holding the content store API key.
pub const ENV_STORE_KEY: &str = "CCG_LIGHTHOUSE_KEY";
/// Environment variable overriding the chain RPC URL.
pub const ENV_RPC_URL: &str = "CCG_RPC_URL";
/// Environment variable holding the hex secp256k1 signing key.
pub const ENV_PRIVATE_KEY: &str = "CCG_PRIVATE_KEY";
/// Environment variable holding the keystore password.
pub const ENV_KEYSTORE_PASSWORD: &str = "CCG_KEYSTORE_PASSWORD";

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CcgConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Base64-encoded 32-byte symmetric key. Usually supplied via `CCG_SECRET_KEY`.
    #[serde(default)]
    pub encryption_key: Option<String>,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub chain: ChainSection,
}

/// `[store]` table: remote pinning service.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// Bearer token for the pinning service.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Fixed per-request timeout.
    #[serde(default = "default_store_timeout_secs")]
    pub timeout_secs: u64,
}

/// `[chain]` table: pointer contract.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainSection {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Address of the deployed pointer contract.
    #[serde(default)]
    pub contract_address: String,

    /// Hex secp256k1 key that signs pointer writes. Usually supplied via
    /// `CCG_PRIVATE_KEY`. Takes precedence over `keystore_path`.
    #[serde(default)]
    pub private_key: Option<String>,

    /// Encrypted JSON keystore holding the signing key.
    #[serde(default)]
    pub keystore_path: Option<String>,

    /// Password for `keystore_path`. Usually supplied via `CCG_KEYSTORE_PASSWORD`.
    #[serde(default)]
    pub keystore_password: Option<String>,

    /// Deadline for each read call.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Deadline for a whole write, from nonce lookup to submission.
    #[serde(default = "default_write_timeout_secs")]
    pub write_timeout_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_upload_url() -> String {
    ccg_store::lighthouse::DEFAULT_UPLOAD_URL.to_string()
}

fn default_gateway_url() -> String {
    ccg_store::lighthouse::DEFAULT_GATEWAY_URL.to_string()
}

fn default_store_timeout_secs() -> u64 {
    60
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_chain_id() -> u64 {
    31337
}

fn default_read_timeout_secs() -> u64 {
    10
}

fn default_write_timeout_secs() -> u64 {
    300
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            api_key: None,
            upload_url: default_upload_url(),
            gateway_url: default_gateway_url(),
            timeout_secs: default_store_timeout_secs(),
        }
    }
}

impl Default for ChainSection {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
            contract_address: String::new(),
            private_key: None,
            keystore_path: None,
            keystore_password: None,
            read_timeout_secs: default_read_timeout_secs(),
            write_timeout_secs: default_write_timeout_secs(),
        }
    }
}

impl Default for CcgConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            encryption_key: None,
            store: StoreSection::default(),
            chain: ChainSection::default(),
        }
    }
}

impl CcgConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: CcgConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply environment overrides for secrets and the RPC URL.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_SECRET_KEY).filter(|v| !v.is_empty()) {
            self.encryption_key = Some(key);
        }
        if let Some(api_key) = lookup(ENV_STORE_KEY).filter(|v| !v.is_empty()) {
            self.store.api_key = Some(api_key);
        }
        if let Some(rpc_url) = lookup(ENV_RPC_URL).filter(|v| !v.is_empty()) {
            self.chain.rpc_url = rpc_url;
        }
        if let Some(private_key) = lookup(ENV_PRIVATE_KEY).filter(|v| !v.is_empty()) {
            self.chain.private_key = Some(private_key);
        }
        if let Some(password) = lookup(ENV_KEYSTORE_PASSWORD) {
            self.chain.keystore_password = Some(password);
        }
    }

    /// Decode and validate the symmetric key.
    pub fn encryption_key_bytes(&self) -> Result<Vec<u8>, CcgError> {
        let encoded = self.encryption_key.as_deref().ok_or_else(|| {
            CcgError::Configuration(format!(
                "encryption key not set; export {} or set encryption_key",
                ENV_SECRET_KEY
            ))
        })?;
        let key = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CcgError::Configuration(format!("invalid base64 key: {}", e)))?;
        if key.len() != KEY_SIZE {
            return Err(CcgError::Configuration(format!(
                "invalid AES key size: {} bytes",
                key.len()
            )));
        }
        Ok(key)
    }

    pub fn lighthouse_config(&self) -> Result<LighthouseConfig, CcgError> {
        let api_key = self.store.api_key.clone().ok_or_else(|| {
            CcgError::Configuration(format!(
                "content store API key not set; export {} or set store.api_key",
                ENV_STORE_KEY
            ))
        })?;
        Ok(LighthouseConfig {
            api_key,
            upload_url: self.store.upload_url.clone(),
            gateway_url: self.store.gateway_url.clone(),
            timeout: Duration::from_secs(self.store.timeout_secs),
        })
    }

    pub fn anchor_config(&self) -> AnchorConfig {
        AnchorConfig {
            rpc_url: self.chain.rpc_url.clone(),
            chain_id: self.chain.chain_id,
            contract_address: self.chain.contract_address.clone(),
            read_timeout: Duration::from_secs(self.chain.read_timeout_secs),
            write_timeout: Duration::from_secs(self.chain.write_timeout_secs),
        }
    }

    /// Load the key that signs pointer writes.
    ///
    /// Fails with `Signing` when no key is configured or the keystore cannot
    /// be decrypted.
    pub fn signer(&self) -> Result<LocalSigner, CcgError> {
        if let Some(private_key) = &self.chain.private_key {
            return LocalSigner::from_private_key_hex(private_key);
        }
        if let Some(keystore_path) = &self.chain.keystore_path {
            let password = self.chain.keystore_password.as_deref().ok_or_else(|| {
                CcgError::Signing(format!(
                    "keystore {} needs a password; export {} or set chain.keystore_password",
                    keystore_path, ENV_KEYSTORE_PASSWORD
                ))
            })?;
            let path = expand_tilde(keystore_path);
            return LocalSigner::from_keystore(Path::new(&path), password);
        }
        Err(CcgError::Signing(format!(
            "no signing key configured; export {} or set chain.private_key or chain.keystore_path",
            ENV_PRIVATE_KEY
        )))
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_when_tables_missing() {
        let config: CcgConfig = toml::from_str("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.chain.chain_id, 31337);
        assert_eq!(config.chain.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.store.timeout_secs, 60);
        assert_eq!(config.chain.write_timeout_secs, 300);
        assert!(config.store.api_key.is_none());
        assert!(config.encryption_key.is_none());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
log_level = "debug"

[store]
api_key = "lh-key"
gateway_url = "http://127.0.0.1:9000/ipfs"

[chain]
rpc_url = "http://10.0.0.2:8545"
chain_id = 314159
contract_address = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
keystore_path = "/var/lib/ccg/signer.json"
read_timeout_secs = 3
write_timeout_secs = 120
"#
        )
        .unwrap();

        let config = CcgConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.store.api_key.as_deref(), Some("lh-key"));
        assert_eq!(config.store.upload_url, ccg_store::lighthouse::DEFAULT_UPLOAD_URL);

        let anchor = config.anchor_config();
        assert_eq!(anchor.chain_id, 314159);
        assert_eq!(anchor.read_timeout, Duration::from_secs(3));
        assert_eq!(anchor.write_timeout, Duration::from_secs(120));
        assert_eq!(
            config.chain.keystore_path.as_deref(),
            Some("/var/lib/ccg/signer.json")
        );

        let store = config.lighthouse_config().unwrap();
        assert_eq!(store.gateway_url, "http://127.0.0.1:9000/ipfs");
    }

    #[test]
    fn missing_file_is_error() {
        assert!(CcgConfig::load("/definitely/not/here/config.toml").is_err());
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_SECRET_KEY, "QkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkI="),
            (ENV_STORE_KEY, "env-store-key"),
            (ENV_RPC_URL, "http://node:8545"),
        ]);
        let mut config = CcgConfig::default();
        config.store.api_key = Some("file-key".to_string());
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.store.api_key.as_deref(), Some("env-store-key"));
        assert_eq!(config.chain.rpc_url, "http://node:8545");
        assert_eq!(config.encryption_key_bytes().unwrap(), vec![0x42u8; 32]);
    }

    #[test]
    fn key_validation() {
        let mut config = CcgConfig::default();
        assert!(matches!(
            config.encryption_key_bytes(),
            Err(CcgError::Configuration(_))
        ));

        config.encryption_key = Some("not base64!".to_string());
        assert!(matches!(
            config.encryption_key_bytes(),
            Err(CcgError::Configuration(_))
        ));

        // 16 bytes, valid base64, wrong size
        config.encryption_key = Some(STANDARD.encode([1u8; 16]));
        assert!(matches!(
            config.encryption_key_bytes(),
            Err(CcgError::Configuration(_))
        ));
    }

    #[test]
    fn missing_store_key_is_configuration_error() {
        let config = CcgConfig::default();
        assert!(matches!(
            config.lighthouse_config(),
            Err(CcgError::Configuration(_))
        ));
    }

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn signer_from_environment_key() {
        let env: HashMap<&str, &str> = HashMap::from([(ENV_PRIVATE_KEY, DEV_KEY)]);
        let mut config = CcgConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        let signer = config.signer().unwrap();
        assert_eq!(signer.address_hex(), "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    }

    #[test]
    fn missing_signing_key_is_signing_error() {
        let config = CcgConfig::default();
        assert!(matches!(config.signer(), Err(CcgError::Signing(_))));
    }

    #[test]
    fn keystore_without_password_is_signing_error() {
        let mut config = CcgConfig::default();
        config.chain.keystore_path = Some("/var/lib/ccg/signer.json".to_string());
        assert!(matches!(config.signer(), Err(CcgError::Signing(_))));

        config.chain.keystore_password = Some("hunter2".to_string());
        // Missing file fails to decrypt.
        assert!(matches!(config.signer(), Err(CcgError::Signing(_))));
    }

    #[test]
    fn tilde_expansion_leaves_plain_paths() {
        assert_eq!(expand_tilde("/etc/ccg.toml"), "/etc/ccg.toml");
        assert!(!expand_tilde("~/.ccg/config.toml").starts_with('~') || dirs::home_dir().is_none());
    }
}
