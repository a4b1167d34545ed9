//! The secp256k1-blake160 lock as a signable script: entry generation, a
//! signer and sealing behind one handle.

use std::sync::Arc;
use tracing::info;

use super::entries::{generate_signing_entries, ScriptTemplate, SigningEntry};
use super::error::{SignerError, SigningError};
use super::sealer::seal;
use super::signer::{sign_entries, PrivateKeySigner, Signer};
use crate::config::NetworkConfig;
use crate::crypto::keys::Signature;
use crate::transaction::types::{Transaction, TransactionSkeleton};

/// Signs every input guarded by a secp256k1-blake160 lock.
///
/// # Examples
///
/// ```no_run
/// # async fn run(skeleton: cellseal_protocol::transaction::TransactionSkeleton)
/// #     -> Result<(), Box<dyn std::error::Error>> {
/// use cellseal_protocol::config::NetworkConfig;
/// use cellseal_protocol::signing::{PrivateKeySigner, Secp256k1Blake160SignableScript};
///
/// let signer = PrivateKeySigner::from_hex(&std::env::var("CELLSEAL_PRIVATE_KEY")?)?;
/// let script = Secp256k1Blake160SignableScript::for_network(&NetworkConfig::aggron4(), signer);
/// let tx = script.sign_skeleton(skeleton).await?;
/// println!("{}", tx.hash_hex()?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Secp256k1Blake160SignableScript {
    template: ScriptTemplate,
    signer: Arc<dyn Signer>,
}

impl Secp256k1Blake160SignableScript {
    pub fn new(template: ScriptTemplate, signer: Arc<dyn Signer>) -> Self {
        Self { template, signer }
    }

    /// Uses the network's deployed secp256k1-blake160 script as template.
    pub fn for_network(network: &NetworkConfig, signer: PrivateKeySigner) -> Self {
        Self::new(network.secp256k1_blake160.template(), Arc::new(signer))
    }

    pub fn template(&self) -> &ScriptTemplate {
        &self.template
    }

    pub fn generate_signing_entries(
        &self,
        skeleton: &TransactionSkeleton,
    ) -> Result<Vec<SigningEntry>, SigningError> {
        generate_signing_entries(skeleton, &self.template)
    }

    /// Signs a single message. `message` must be a 32-byte digest.
    pub async fn sign(&self, message: &[u8]) -> Result<Signature, SignerError> {
        let digest: &[u8; 32] = message
            .try_into()
            .map_err(|_| SignerError::InvalidMessage(message.len()))?;
        self.signer.sign(digest).await
    }

    /// Generates entries, signs each one in order and seals the skeleton.
    pub async fn sign_skeleton(
        &self,
        skeleton: TransactionSkeleton,
    ) -> Result<Transaction, SigningError> {
        let entries = self.generate_signing_entries(&skeleton)?;
        if entries.is_empty() {
            info!("no inputs matched the secp256k1-blake160 template");
        }
        let signatures = sign_entries(self.signer.as_ref(), &entries).await?;
        seal(skeleton, &entries, &signatures)
    }
}
