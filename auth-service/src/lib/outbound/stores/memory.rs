use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::AuthError;
use crate::account::models::UserRecord;
use crate::account::models::Username;
use crate::account::ports::CredentialStore;

/// Process-local credential store.
///
/// Records live only as long as the process. Inserts take the write lock and
/// go through the map entry, so uniqueness holds under concurrent callers.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<Username, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn exists(&self, username: &Username) -> Result<bool, AuthError> {
        Ok(self.records.read().await.contains_key(username))
    }

    async fn insert(&self, record: UserRecord) -> Result<(), AuthError> {
        let mut records = self.records.write().await;

        match records.entry(record.username.clone()) {
            Entry::Occupied(_) => Err(AuthError::UserAlreadyExists(
                record.username.as_str().to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.records.read().await.get(username).cloned())
    }
}
