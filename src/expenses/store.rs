use rand::Rng;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::{errors::SpendbookError, render::table::total, storage::KeyValueStore};

use super::{Expense, ExpenseId};

pub const EXPENSES_KEY: &str = "expenses";

/// The ordered expense list, mirrored write-through into a [`KeyValueStore`].
///
/// Every mutation persists the full list before returning. If persisting
/// fails the mutation is rolled back, so memory and storage never diverge.
#[derive(Debug)]
pub struct RecordStore<S> {
    storage: S,
    records: Vec<Expense>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Reads the persisted list. Absent or unreadable data yields an empty store.
    pub fn load(storage: S) -> Self {
        let records = match storage.get(EXPENSES_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Expense>>(&blob) {
                Ok(records) => records,
                Err(err) => {
                    warn!("stored expenses could not be parsed, starting empty: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("stored expenses could not be read, starting empty: {err}");
                Vec::new()
            }
        };
        info!(count = records.len(), "loaded expenses");
        Self { storage, records }
    }

    pub fn add(&mut self, expense: Expense) -> Result<(), SpendbookError> {
        debug!(id = %expense.id, "adding expense");
        self.records.push(expense);
        if let Err(err) = self.persist() {
            self.records.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Removes the record with `id`. Unknown ids are a no-op and return `None`.
    pub fn remove(&mut self, id: &ExpenseId) -> Result<Option<Expense>, SpendbookError> {
        let Some(index) = self.records.iter().position(|expense| &expense.id == id) else {
            debug!(%id, "no expense to remove");
            return Ok(None);
        };
        debug!(%id, "removing expense");
        let removed = self.records.remove(index);
        if let Err(err) = self.persist() {
            self.records.insert(index, removed);
            return Err(err);
        }
        Ok(Some(removed))
    }

    fn persist(&mut self) -> Result<(), SpendbookError> {
        let blob = serde_json::to_string(&self.records)?;
        self.storage.set(EXPENSES_KEY, &blob)
    }

    /// Generates an id not used by any current record.
    pub fn fresh_id<R: Rng>(&self, now_millis: i64, rng: &mut R) -> ExpenseId {
        loop {
            let id = ExpenseId::generate(now_millis, rng);
            if !self.contains(&id) {
                return id;
            }
            debug!(%id, "generated id already taken, retrying");
        }
    }
}

impl<S> RecordStore<S> {
    pub fn all(&self) -> &[Expense] {
        &self.records
    }

    pub fn contains(&self, id: &ExpenseId) -> bool {
        self.records.iter().any(|expense| &expense.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total(&self) -> Decimal {
        total(&self.records)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::storage::MemoryStore;

    fn expense(id: &str, amount: &str, category: &str) -> Expense {
        Expense {
            id: ExpenseId::from(id),
            description: format!("expense {id}"),
            amount: Decimal::from_str(amount).unwrap(),
            category: category.to_string(),
            date: "10/18/2026".to_string(),
        }
    }

    fn persisted(store: &RecordStore<MemoryStore>) -> Vec<Expense> {
        let blob = store.storage().get(EXPENSES_KEY).unwrap().unwrap();
        serde_json::from_str(&blob).unwrap()
    }

    /// Fails every write after the first `allowed` ones.
    struct FlakyStore {
        inner: MemoryStore,
        allowed: usize,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, SpendbookError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), SpendbookError> {
            if self.allowed == 0 {
                return Err(std::io::Error::other("disk full").into());
            }
            self.allowed -= 1;
            self.inner.set(key, value)
        }
    }

    #[test]
    fn load_from_absent_key_is_empty() {
        let store = RecordStore::load(MemoryStore::new());
        assert!(store.is_empty());
        assert_eq!(store.total(), Decimal::ZERO);
    }

    #[test]
    fn load_from_corrupt_blob_is_empty() {
        for blob in ["not json", "{\"id\": 1}", "[{\"id\": \"1\"}]", "null"] {
            let store = RecordStore::load(MemoryStore::with_entry(EXPENSES_KEY, blob));
            assert!(store.is_empty(), "{blob}");
        }
    }

    #[test]
    fn load_accepts_numeric_ids() {
        let blob = r#"[{"id":1760000000000,"description":"Tea","amount":2,"category":"Food","date":"1/2/2026"}]"#;
        let store = RecordStore::load(MemoryStore::with_entry(EXPENSES_KEY, blob));
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].id.as_str(), "1760000000000");
        assert_eq!(store.all()[0].amount, Decimal::from(2));
    }

    #[test]
    fn add_appends_and_persists() {
        let mut store = RecordStore::load(MemoryStore::new());
        store.add(expense("1", "10", "Food")).unwrap();
        store.add(expense("2", "5.25", "Rent")).unwrap();

        let ids: Vec<_> = store.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(persisted(&store), store.all());
        assert_eq!(store.total(), Decimal::from_str("15.25").unwrap());
    }

    #[test]
    fn remove_deletes_only_the_matching_record() {
        let mut store = RecordStore::load(MemoryStore::new());
        store.add(expense("1", "10", "Food")).unwrap();
        store.add(expense("2", "5", "Food")).unwrap();
        store.add(expense("3", "1", "Bills")).unwrap();

        let removed = store.remove(&ExpenseId::from("2")).unwrap();
        assert_eq!(removed.map(|e| e.id), Some(ExpenseId::from("2")));
        let ids: Vec<_> = store.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(persisted(&store), store.all());
    }

    #[test]
    fn removing_unknown_id_changes_nothing() {
        let mut store = RecordStore::load(MemoryStore::new());
        store.add(expense("1", "10", "Food")).unwrap();
        let before = store.all().to_vec();

        assert_eq!(store.remove(&ExpenseId::from("missing")).unwrap(), None);
        assert_eq!(store.all(), before.as_slice());
        assert_eq!(persisted(&store), before);
    }

    #[test]
    fn reload_reproduces_the_same_sequence() {
        let mut store = RecordStore::load(MemoryStore::new());
        store.add(expense("1", "3.5", "Food")).unwrap();
        store.add(expense("2", "12.75", "Transport")).unwrap();
        store.add(expense("3", "0.01", "Food")).unwrap();
        store.remove(&ExpenseId::from("1")).unwrap();

        let expected = store.all().to_vec();
        let reloaded = RecordStore::load(store.storage().clone());
        assert_eq!(reloaded.all(), expected.as_slice());
    }

    #[test]
    fn replay_matches_a_plain_list_model() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut store = RecordStore::load(MemoryStore::new());
        let mut model: Vec<Expense> = Vec::new();

        for step in 0..200i64 {
            if !model.is_empty() && rng.random_range(0..3) == 0 {
                let index = rng.random_range(0..model.len());
                let id = model[index].id.clone();
                model.retain(|e| e.id != id);
                store.remove(&id).unwrap();
            } else {
                let id = store.fresh_id(1_760_000_000_000 + step / 4, &mut rng);
                let cents: i64 = rng.random_range(1..100_000);
                let record = Expense {
                    id,
                    description: format!("step {step}"),
                    amount: Decimal::new(cents, 2),
                    category: ["Food", "Rent", "Fun"][rng.random_range(0..3)].to_string(),
                    date: "10/18/2026".to_string(),
                };
                model.push(record.clone());
                store.add(record).unwrap();
            }
            assert_eq!(store.all(), model.as_slice());
        }

        let reloaded = RecordStore::load(store.storage().clone());
        assert_eq!(reloaded.all(), model.as_slice());
    }

    #[test]
    fn fresh_ids_never_collide_within_one_millisecond() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut store = RecordStore::load(MemoryStore::new());
        for _ in 0..500 {
            let id = store.fresh_id(1_760_000_000_000, &mut rng);
            assert!(!store.contains(&id));
            store.add(expense(id.as_str(), "1", "Food")).unwrap();
        }
        assert_eq!(store.len(), 500);
    }

    #[test]
    fn failed_write_rolls_back_add() {
        let mut store = RecordStore::load(FlakyStore {
            inner: MemoryStore::new(),
            allowed: 1,
        });
        store.add(expense("1", "10", "Food")).unwrap();

        let err = store.add(expense("2", "5", "Food")).unwrap_err();
        assert!(matches!(err, SpendbookError::Io(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].id.as_str(), "1");
    }

    #[test]
    fn failed_write_rolls_back_remove() {
        let mut store = RecordStore::load(FlakyStore {
            inner: MemoryStore::new(),
            allowed: 2,
        });
        store.add(expense("1", "10", "Food")).unwrap();
        store.add(expense("2", "5", "Food")).unwrap();

        assert!(store.remove(&ExpenseId::from("1")).is_err());
        let ids: Vec<_> = store.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
