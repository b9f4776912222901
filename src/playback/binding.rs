//! Object URLs: scoped registrations of audio payloads.
//!
//! `BlobUrls::create` hands out an `ObjectUrl` guard. The payload stays
//! resolvable for exactly as long as the guard lives; dropping it revokes the
//! URL.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::playlist::AudioBlob;

#[derive(Default)]
struct Registry {
    next_id: u64,
    live: HashMap<String, Arc<[u8]>>,
    revoked: u64,
}

/// Shared registry of live object URLs.
#[derive(Clone, Default)]
pub struct BlobUrls {
    inner: Arc<Mutex<Registry>>,
}

impl BlobUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `blob` under a fresh URL.
    pub fn create(&self, blob: &AudioBlob) -> ObjectUrl {
        let url = match self.inner.lock() {
            Ok(mut reg) => {
                reg.next_id += 1;
                let url = format!("blob:cadence/{}", reg.next_id);
                reg.live.insert(url.clone(), blob.bytes().clone());
                url
            }
            // A poisoned registry still hands out a guard; it just never
            // resolves.
            Err(_) => "blob:cadence/poisoned".to_string(),
        };
        trace!(%url, path = %blob.path().display(), "created object URL");

        ObjectUrl {
            url,
            registry: self.clone(),
        }
    }

    /// The payload behind `url`, if it has not been revoked.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.inner
            .lock()
            .ok()
            .and_then(|reg| reg.live.get(url).cloned())
    }

    /// Number of URLs currently live.
    pub fn live(&self) -> usize {
        self.inner.lock().map(|reg| reg.live.len()).unwrap_or(0)
    }

    /// Number of URLs revoked so far.
    pub fn revoked(&self) -> u64 {
        self.inner.lock().map(|reg| reg.revoked).unwrap_or(0)
    }

    fn revoke(&self, url: &str) {
        if let Ok(mut reg) = self.inner.lock() {
            if reg.live.remove(url).is_some() {
                reg.revoked += 1;
                trace!(%url, "revoked object URL");
            }
        }
    }
}

/// A live binding of a payload to a URL. Revoked on drop.
pub struct ObjectUrl {
    url: String,
    registry: BlobUrls,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}
