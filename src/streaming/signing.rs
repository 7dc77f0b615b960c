//! Signed, time-boxed segment URLs.
//!
//! Each logical storage path is signed with HMAC-SHA256 over the path and
//! its query parameters. One signature is reused per unique path within a
//! single assembly pass, since byte-range segments commonly reference the
//! same physical file dozens of times.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::{BTreeMap, HashMap};
use std::time::{SystemTime, UNIX_EPOCH};
use versecast_common::TransactionId;
use versecast_media::UrlResolver;

use crate::config::SigningConfig;

type HmacSha256 = Hmac<Sha256>;

/// Issues time-boxed signed URLs for storage paths.
#[derive(Debug, Clone)]
pub struct UrlSigner {
    key: String,
    key_id: String,
    base_url: String,
    ttl_secs: u64,
}

impl UrlSigner {
    pub fn new(config: &SigningConfig) -> Self {
        Self {
            key: config.key.clone(),
            key_id: config.key_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ttl_secs: config.ttl_secs,
        }
    }

    /// Sign one storage path. Returns `None` when no key is configured.
    pub fn sign(&self, path: &str, transaction_id: &TransactionId) -> Option<String> {
        if self.key.is_empty() {
            return None;
        }

        let expires = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()?
            .as_secs()
            + self.ttl_secs;

        let query = format!(
            "Expires={}&KeyId={}&TxId={}",
            expires, self.key_id, transaction_id
        );

        let mut mac = HmacSha256::new_from_slice(self.key.as_bytes()).ok()?;
        mac.update(path.as_bytes());
        mac.update(b"?");
        mac.update(query.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Some(format!(
            "{}/{}?{}&Signature={}",
            self.base_url, path, query, signature
        ))
    }
}

/// Generate a random hex signing key.
pub fn generate_signing_key() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

/// Per-assembly URL resolver deduplicating signatures by path.
///
/// In download mode, the manifest keeps raw logical paths and the signed
/// URLs are collected into a separate map the caller returns alongside the
/// body.
pub struct SignedResolver<'a> {
    signer: &'a UrlSigner,
    transaction_id: TransactionId,
    download: bool,
    resolved: HashMap<String, String>,
    signed_urls: BTreeMap<String, String>,
}

impl<'a> SignedResolver<'a> {
    pub fn new(signer: &'a UrlSigner, download: bool) -> Self {
        Self {
            signer,
            transaction_id: TransactionId::new(),
            download,
            resolved: HashMap::new(),
            signed_urls: BTreeMap::new(),
        }
    }

    /// The signed URL map accumulated in download mode.
    pub fn into_signed_urls(self) -> BTreeMap<String, String> {
        self.signed_urls
    }
}

impl UrlResolver for SignedResolver<'_> {
    fn resolve(&mut self, path: &str) -> Option<String> {
        if let Some(url) = self.resolved.get(path) {
            let url = url.clone();
            if self.download {
                return Some(path.to_string());
            }
            return Some(url);
        }

        let Some(url) = self.signer.sign(path, &self.transaction_id) else {
            tracing::warn!(path, "failed to sign segment URL; dropping segment");
            return None;
        };

        self.resolved.insert(path.to_string(), url.clone());
        if self.download {
            self.signed_urls.insert(path.to_string(), url);
            return Some(path.to_string());
        }
        Some(url)
    }
}
