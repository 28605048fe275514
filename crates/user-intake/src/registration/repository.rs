use std::sync::{Arc, Mutex};

use super::domain::PersistedUser;

/// Sink receiving accepted applicants.
pub trait UserRepository: Send + Sync {
    fn save(&self, user: PersistedUser) -> Result<(), RepositoryError>;
}

/// Error enumeration for user store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// User store scoped to its owner; clones share the same records.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<PersistedUser>>>,
}

impl InMemoryUserRepository {
    pub fn users(&self) -> Vec<PersistedUser> {
        match self.users.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.users().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserRepository for InMemoryUserRepository {
    fn save(&self, user: PersistedUser) -> Result<(), RepositoryError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|_| RepositoryError::Unavailable("user store lock poisoned".to_string()))?;
        guard.push(user);
        Ok(())
    }
}
