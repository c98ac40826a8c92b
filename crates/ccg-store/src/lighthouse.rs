// crates/ccg-store/src/lighthouse.rs
//
// Client for a Lighthouse-style pinning service.
//
// Upload: POST {upload_url}, multipart field `file`, bearer auth.
// Download: GET {gateway_url}/{cid}, bearer auth.
// No retries; every request carries the configured fixed timeout.

use std::time::Duration;

use async_trait::async_trait;

use ccg_core::{CcgError, ContentId, ContentStore};

pub const DEFAULT_UPLOAD_URL: &str = "https://upload.lighthouse.storage/api/v0/add";
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.lighthouse.storage/ipfs";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for [`LighthouseStore`].
#[derive(Debug, Clone)]
pub struct LighthouseConfig {
    pub api_key: String,
    pub upload_url: String,
    pub gateway_url: String,
    pub timeout: Duration,
}

impl LighthouseConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Remote content store backed by the Lighthouse HTTP API.
#[derive(Debug, Clone)]
pub struct LighthouseStore {
    upload_url: String,
    gateway_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl LighthouseStore {
    /// Build a client. Fails with `Configuration` when the API key is empty.
    pub fn new(config: LighthouseConfig) -> Result<Self, CcgError> {
        if config.api_key.trim().is_empty() {
            return Err(CcgError::Configuration(
                "content store API key is not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CcgError::Configuration(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            upload_url: config.upload_url,
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            client,
        })
    }
}

/// Turn a failed response into `RemoteStorage`, keeping the body.
async fn remote_error(response: reqwest::Response) -> CcgError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    CcgError::RemoteStorage {
        status: Some(status.as_u16()),
        body,
    }
}

fn transport_error(action: &str, e: reqwest::Error) -> CcgError {
    CcgError::RemoteStorage {
        status: None,
        body: format!("{} request failed: {}", action, e),
    }
}

/// Extract the content id from an upload response.
///
/// Deployments answer either with the bare id as text or with a JSON
/// envelope such as `{"Name":"x.git","Hash":"bafy...","Size":"42"}`.
fn parse_content_id(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if value.is_object() {
            let found = value["Hash"]
                .as_str()
                .or_else(|| value["cid"].as_str())
                .or_else(|| value["data"]["Hash"].as_str());
            return found.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        }
        if let Some(s) = value.as_str() {
            return Some(s.trim().to_string()).filter(|s| !s.is_empty());
        }
    }
    Some(trimmed.to_string()).filter(|s| !s.is_empty())
}

#[async_trait]
impl ContentStore for LighthouseStore {
    async fn upload(&self, data: &[u8], label: &str) -> Result<ContentId, CcgError> {
        let part = reqwest::multipart::Part::bytes(data.to_vec())
            .file_name(format!("{}.git", label));
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error("upload", e))?;

        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error("upload body read", e))?;

        let cid = parse_content_id(&body).ok_or_else(|| CcgError::RemoteStorage {
            status: None,
            body: format!("upload response carried no content id: {}", body),
        })?;

        tracing::debug!("Uploaded {} bytes as {} ({})", data.len(), cid, label);
        Ok(ContentId(cid))
    }

    async fn download(&self, cid: &ContentId) -> Result<Vec<u8>, CcgError> {
        let url = format!("{}/{}", self.gateway_url, cid);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| transport_error("download", e))?;

        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error("download body read", e))?;

        tracing::debug!("Downloaded {} bytes for {}", bytes.len(), cid);
        Ok(bytes.to_vec())
    }
}
