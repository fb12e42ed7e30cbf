//! Airdrop form state restored from and persisted to a key/value store

use std::sync::Arc;

use tracing::warn;

use crate::amounts::calculate_total;
use crate::store::KeyValueStore;

pub const TOKEN_ADDRESS_KEY: &str = "lastTokenAddress";
pub const RECIPIENTS_KEY: &str = "lastRecipients";
pub const AMOUNTS_KEY: &str = "lastAmounts";

/// The three text fields of an airdrop: token, recipients, amounts
pub struct AirdropForm {
    store: Arc<dyn KeyValueStore>,
    token_address: String,
    recipients: String,
    amounts: String,
}

impl AirdropForm {
    /// Restore the last saved fields; missing keys start empty
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let token_address = store.get(TOKEN_ADDRESS_KEY).unwrap_or_default();
        let recipients = store.get(RECIPIENTS_KEY).unwrap_or_default();
        let amounts = store.get(AMOUNTS_KEY).unwrap_or_default();

        Self {
            store,
            token_address,
            recipients,
            amounts,
        }
    }

    pub fn token_address(&self) -> &str {
        &self.token_address
    }

    pub fn recipients(&self) -> &str {
        &self.recipients
    }

    pub fn amounts(&self) -> &str {
        &self.amounts
    }

    pub fn set_token_address(&mut self, value: impl Into<String>) {
        self.token_address = value.into();
        self.persist(TOKEN_ADDRESS_KEY, &self.token_address);
    }

    pub fn set_recipients(&mut self, value: impl Into<String>) {
        self.recipients = value.into();
        self.persist(RECIPIENTS_KEY, &self.recipients);
    }

    pub fn set_amounts(&mut self, value: impl Into<String>) {
        self.amounts = value.into();
        self.persist(AMOUNTS_KEY, &self.amounts);
    }

    /// Empty recipients and amounts after a successful airdrop
    pub fn clear_batch(&mut self) {
        self.set_recipients("");
        self.set_amounts("");
    }

    /// Empty every field
    pub fn clear(&mut self) {
        self.set_token_address("");
        self.clear_batch();
    }

    /// Sum of the amounts field, for display
    pub fn total_amount_needed(&self) -> f64 {
        calculate_total(&self.amounts)
    }

    fn persist(&self, key: &str, value: &str) {
        let result = if value.is_empty() {
            self.store.remove(key)
        } else {
            self.store.set(key, value)
        };

        if let Err(e) = result {
            warn!("Failed to persist form field {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AirdropError, Result};
    use crate::store::MemoryStore;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            Some("42".to_string())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(AirdropError::Storage("read only".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(AirdropError::Storage("read only".to_string()))
        }
    }

    #[test]
    fn test_fields_round_trip_through_store() {
        let store = Arc::new(MemoryStore::new());

        let mut form = AirdropForm::restore(store.clone());
        form.set_token_address("0xToken");
        form.set_recipients("0x1, 0x2");
        form.set_amounts("100, 200");

        let restored = AirdropForm::restore(store.clone());
        assert_eq!(restored.token_address(), "0xToken");
        assert_eq!(restored.recipients(), "0x1, 0x2");
        assert_eq!(restored.amounts(), "100, 200");
        assert_eq!(restored.total_amount_needed(), 300.0);
    }

    #[test]
    fn test_empty_value_removes_key() {
        let store = Arc::new(MemoryStore::new());
        let mut form = AirdropForm::restore(store.clone());
        form.set_token_address("0xToken");
        form.set_amounts("5");

        form.set_amounts("");
        assert_eq!(store.get(AMOUNTS_KEY), None);

        form.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_batch_keeps_token() {
        let store = Arc::new(MemoryStore::new());
        let mut form = AirdropForm::restore(store.clone());
        form.set_token_address("0xToken");
        form.set_recipients("0x1");
        form.set_amounts("1");

        form.clear_batch();
        assert_eq!(form.recipients(), "");
        assert_eq!(form.amounts(), "");
        assert_eq!(store.get(TOKEN_ADDRESS_KEY).as_deref(), Some("0xToken"));
    }

    #[test]
    fn test_persistence_failure_is_not_fatal() {
        let mut form = AirdropForm::restore(Arc::new(ReadOnlyStore));
        assert_eq!(form.amounts(), "42");

        form.set_amounts("7");
        assert_eq!(form.amounts(), "7");
    }
}
