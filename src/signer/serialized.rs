//! Serialization wrapper for signers backed by a single physical device.
//!
//! A hardware wallet processes one request at a time. Wrapping its signer
//! here makes concurrent `sign()` calls queue instead of interleaving on the
//! transport.

use tokio::sync::Mutex;

use crate::signer::types::{SignOptions, SignResult, SignerData, SignerResult};
use crate::signer::Signer;

/// Signer that admits one in-flight `sign()` at a time.
#[derive(Debug)]
pub struct SerializedSigner<S> {
    inner: S,
    device: Mutex<()>,
}

impl<S: Signer> SerializedSigner<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            device: Mutex::new(()),
        }
    }

    /// The wrapped signer.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Signer> Signer for SerializedSigner<S> {
    async fn init(&mut self) -> SignerResult<()> {
        self.inner.init().await
    }

    async fn sign(
        &self,
        signer_address: &str,
        data: &SignerData,
        options: &SignOptions,
    ) -> SignerResult<SignResult> {
        let _guard = self.device.lock().await;
        self.inner.sign(signer_address, data, options).await
    }

    async fn get_public_key(&self, address: &str) -> SignerResult<Vec<u8>> {
        let _guard = self.device.lock().await;
        self.inner.get_public_key(address).await
    }
}
