//! In-memory `CodeLedger`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{CodeLedger, CodeLedgerError};
use crate::domain::{CodeId, CodeValue, RedemptionCode};

/// Code ledger held in process memory, keyed by normalised value.
#[derive(Clone)]
pub struct InMemoryCodeLedger {
    codes: Arc<Mutex<HashMap<CodeValue, RedemptionCode>>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryCodeLedger {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryCodeLedger {
    /// Create an empty ledger stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CodeValue, RedemptionCode>>, CodeLedgerError> {
        self.codes
            .lock()
            .map_err(|_| CodeLedgerError::query("code ledger lock poisoned"))
    }

    fn insert(&self, code: RedemptionCode) -> Result<(), CodeLedgerError> {
        match self.lock()?.entry(code.value.clone()) {
            Entry::Occupied(_) => Err(CodeLedgerError::duplicate_code(code.value)),
            Entry::Vacant(slot) => {
                slot.insert(code);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl CodeLedger for InMemoryCodeLedger {
    async fn add(&self, value: CodeValue) -> Result<RedemptionCode, CodeLedgerError> {
        let code = RedemptionCode::new(value, self.clock.utc());
        self.insert(code.clone())?;
        Ok(code)
    }

    async fn list(&self) -> Result<Vec<RedemptionCode>, CodeLedgerError> {
        let mut codes: Vec<RedemptionCode> = self.lock()?.values().cloned().collect();
        codes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(codes)
    }

    async fn delete(&self, id: &CodeId) -> Result<(), CodeLedgerError> {
        let mut codes = self.lock()?;
        let value = codes
            .values()
            .find(|code| code.id == *id)
            .map(|code| code.value.clone())
            .ok_or_else(|| CodeLedgerError::not_found(*id))?;
        codes.remove(&value);
        Ok(())
    }

    async fn try_consume(
        &self,
        value: &CodeValue,
    ) -> Result<Option<RedemptionCode>, CodeLedgerError> {
        Ok(self.lock()?.remove(value))
    }

    async fn restore(&self, code: &RedemptionCode) -> Result<(), CodeLedgerError> {
        self.insert(code.clone())
    }
}
