use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::StoreError;

/// Key under which the record sequence is persisted.
pub const INVESTMENTS_KEY: &str = "investments";

/// JSON values on top of an embedded sled database.
///
/// Handed explicitly to whatever needs persisted state.
#[derive(Clone)]
pub struct Store {
    db: sled::Db,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Store, StoreError> {
        let db = sled::open(path)?;
        Ok(Store { db })
    }

    /// A throwaway database that disappears when dropped.
    pub fn temporary() -> Result<Store, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Store { db })
    }

    /// Read `key`, falling back to `default` if it is absent or cannot be decoded.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.db.get(key) {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Ignoring undecodable value under {key}: {e}");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!("Error reading {key} from database: {e}");
                default
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.db.insert(key, bytes)?;
        // block until all operations are stable on disk
        self.db.flush()?;
        tracing::debug!("Saved {key}");
        Ok(())
    }

    /// Drop every key the application has written.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.db.clear()?;
        self.db.flush()?;
        tracing::info!("Cleared all persisted data");
        Ok(())
    }
}

/// A value loaded once from the store and written back on every change.
pub struct Persisted<T> {
    store: Store,
    key: String,
    default: T,
    value: T,
}

impl<T: Serialize + DeserializeOwned + Clone> Persisted<T> {
    pub fn new(store: Store, key: &str, default: T) -> Self {
        let value = store.load(key, default.clone());
        Persisted {
            store,
            key: key.to_string(),
            default,
            value,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Apply `f` and persist the result. The in-memory value only changes
    /// once the save has succeeded.
    pub fn update<F: FnOnce(&mut T)>(&mut self, f: F) -> Result<(), StoreError> {
        let mut next = self.value.clone();
        f(&mut next);
        self.store.save(&self.key, &next)?;
        self.value = next;
        Ok(())
    }

    /// Clear the whole store and reload this value from it.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.reset()?;
        self.value = self.store.load(&self.key, self.default.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::InvestmentRecord;

    fn records() -> Vec<InvestmentRecord> {
        vec![
            InvestmentRecord::new("Axis Bluechip Fund", "1000", "6", "6500", "2024-01-05"),
            InvestmentRecord::new("SBI Small Cap Fund", "2500", "12", "31000", "2023-07-01"),
        ]
    }

    #[test]
    fn test_load_missing_key_returns_default() {
        let store = Store::temporary().unwrap();
        let loaded: Vec<InvestmentRecord> = store.load(INVESTMENTS_KEY, Vec::new());
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let store = Store::temporary().unwrap();
        store.save(INVESTMENTS_KEY, &records()).unwrap();
        let loaded: Vec<InvestmentRecord> = store.load(INVESTMENTS_KEY, Vec::new());
        assert_eq!(loaded, records());
    }

    #[test]
    fn test_round_trip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db");
        {
            let store = Store::open(&path).unwrap();
            let mut state = Persisted::new(store, INVESTMENTS_KEY, Vec::new());
            state.update(|list| *list = records()).unwrap();
        }
        let store = Store::open(&path).unwrap();
        let state = Persisted::new(store, INVESTMENTS_KEY, Vec::<InvestmentRecord>::new());
        assert_eq!(state.get(), &records());
    }

    #[test]
    fn test_invalid_value_falls_back_to_default() {
        let store = Store::temporary().unwrap();
        store.save(INVESTMENTS_KEY, "not a list").unwrap();
        let loaded: Vec<InvestmentRecord> = store.load(INVESTMENTS_KEY, Vec::new());
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_update_persists_immediately() {
        let store = Store::temporary().unwrap();
        let mut state = Persisted::new(store.clone(), INVESTMENTS_KEY, Vec::new());
        state
            .update(|list| list.push(records()[0].clone()))
            .unwrap();
        let loaded: Vec<InvestmentRecord> = store.load(INVESTMENTS_KEY, Vec::new());
        assert_eq!(loaded.len(), 1);
    }

    // Serializes fine up to 3, fails beyond.
    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    struct Capped(u32);

    impl Serialize for Capped {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if self.0 > 3 {
                return Err(serde::ser::Error::custom("value too large"));
            }
            serializer.serialize_u32(self.0)
        }
    }

    #[test]
    fn test_failed_update_keeps_previous_value() {
        let store = Store::temporary().unwrap();
        let mut state = Persisted::new(store.clone(), "capped", Capped(0));
        state.update(|c| c.0 = 2).unwrap();

        let result = state.update(|c| c.0 = 9);
        assert!(matches!(result, Err(StoreError::Serialization(_))));
        assert_eq!(state.get(), &Capped(2));
        assert_eq!(store.load("capped", Capped(0)), Capped(2));
    }

    #[test]
    fn test_reset_clears_and_reloads() {
        let store = Store::temporary().unwrap();
        let mut state = Persisted::new(store.clone(), INVESTMENTS_KEY, Vec::new());
        state.update(|list| *list = records()).unwrap();
        state.reset().unwrap();
        assert!(state.get().is_empty());
        let loaded: Vec<InvestmentRecord> = store.load(INVESTMENTS_KEY, Vec::new());
        assert!(loaded.is_empty());
    }
}
