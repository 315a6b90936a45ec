//! Reporter Key Adapters
//!
//! - `local_key`: secp256k1 secret loaded from a file (alloy signer)

pub mod local_key;

pub use local_key::LocalKey;
