//! Local Reporter Key - secp256k1 Signer Loaded From a File
//!
//! The key is only accepted as `@<path>`; a key typed on the command
//! line would end up in shell history. The file holds the hex secret.
//! The public identity is the checksummed address of the key and feeds
//! are signed as EIP-191 personal messages over the canonical payload.

use std::path::Path;

use alloy::hex;
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};

use crate::ports::ledger::FeedPayload;
use crate::ports::reporter_key::ReporterKey;

/// Reporter key held in process memory.
pub struct LocalKey {
    signer: PrivateKeySigner,
}

impl LocalKey {
    /// Load from a `@<path>` argument.
    ///
    /// # Errors
    /// Returns error if the argument is not `@`-prefixed, the file
    /// cannot be read, or it does not contain a valid secret key.
    pub fn from_arg(arg: &str) -> Result<Self> {
        let path = arg.strip_prefix('@').with_context(|| {
            "Only a key file is accepted, i.e. @<path>. \
             If you typed the private key in plain text, remove it from your shell history."
        })?;
        anyhow::ensure!(!path.is_empty(), "Missing key file path after '@'");
        Self::from_file(path)
    }

    /// Load the hex secret from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file: {}", path.display()))?;
        Self::from_hex(raw.trim())
    }

    /// Parse a hex secret (with or without `0x`).
    pub fn from_hex(secret: &str) -> Result<Self> {
        let signer: PrivateKeySigner = secret.parse().context("Invalid secp256k1 secret key")?;
        Ok(Self { signer })
    }
}

impl ReporterKey for LocalKey {
    fn public_key(&self) -> String {
        self.signer.address().to_string()
    }

    fn sign(&self, payload: &FeedPayload) -> Result<String> {
        let message = payload
            .signing_bytes()
            .context("Failed to encode feed payload")?;
        let signature = self
            .signer
            .sign_message_sync(&message)
            .context("Failed to sign feed payload")?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}
