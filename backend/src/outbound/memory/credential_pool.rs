//! In-memory `CredentialPool`.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use rand::Rng;

use crate::domain::ports::{CredentialPool, CredentialPoolError};
use crate::domain::{Credential, CredentialId, NewCredential};

/// Credential pool held in process memory.
///
/// Records are kept in insertion order; `list` reverses them so the newest
/// comes first.
#[derive(Clone)]
pub struct InMemoryCredentialPool {
    credentials: Arc<Mutex<Vec<Credential>>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryCredentialPool {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryCredentialPool {
    /// Create an empty pool stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials: Arc::new(Mutex::new(Vec::new())),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Credential>>, CredentialPoolError> {
        self.credentials
            .lock()
            .map_err(|_| CredentialPoolError::query("credential pool lock poisoned"))
    }

    fn random_index(len: usize) -> Option<usize> {
        (len > 0).then(|| rand::thread_rng().gen_range(0..len))
    }
}

#[async_trait]
impl CredentialPool for InMemoryCredentialPool {
    async fn add(&self, credential: NewCredential) -> Result<Credential, CredentialPoolError> {
        let stored = credential.into_credential(CredentialId::random(), self.clock.utc());
        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Credential>, CredentialPoolError> {
        Ok(self.lock()?.iter().rev().cloned().collect())
    }

    async fn delete(&self, id: &CredentialId) -> Result<(), CredentialPoolError> {
        let mut credentials = self.lock()?;
        let position = credentials
            .iter()
            .position(|credential| credential.id == *id)
            .ok_or_else(|| CredentialPoolError::not_found(*id))?;
        credentials.remove(position);
        Ok(())
    }

    async fn pick_any(&self) -> Result<Option<Credential>, CredentialPoolError> {
        let credentials = self.lock()?;
        Ok(Self::random_index(credentials.len())
            .and_then(|index| credentials.get(index))
            .cloned())
    }

    async fn take_any(&self) -> Result<Option<Credential>, CredentialPoolError> {
        let mut credentials = self.lock()?;
        Ok(Self::random_index(credentials.len()).map(|index| credentials.remove(index)))
    }
}
