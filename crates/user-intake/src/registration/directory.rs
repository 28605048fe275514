use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{Client, ClientId, ClientTier};

/// Lookup abstraction over the client store.
pub trait ClientDirectory: Send + Sync {
    /// Unknown ids resolve to `Ok(None)`; errors are reserved for store failures.
    fn find(&self, id: ClientId) -> Result<Option<Client>, DirectoryError>;
}

/// Error enumeration for directory failures.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("client directory unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read client seed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid client seed data: {0}")]
    Csv(#[from] csv::Error),
    #[error("client {0} appears more than once")]
    DuplicateClient(ClientId),
}

/// Directory held in memory for the lifetime of the owning service.
#[derive(Debug, Default, Clone)]
pub struct InMemoryClientDirectory {
    clients: HashMap<ClientId, Client>,
}

impl InMemoryClientDirectory {
    pub fn from_clients<I>(clients: I) -> Result<Self, DirectoryError>
    where
        I: IntoIterator<Item = Client>,
    {
        let mut map = HashMap::new();
        for client in clients {
            if map.contains_key(&client.id) {
                return Err(DirectoryError::DuplicateClient(client.id));
            }
            map.insert(client.id, client);
        }
        Ok(Self { clients: map })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load clients from CSV with an `id,name,client_type` header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DirectoryError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut clients = Vec::new();
        for row in csv_reader.deserialize::<ClientRow>() {
            clients.push(row?.into_client());
        }

        Self::from_clients(clients)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl ClientDirectory for InMemoryClientDirectory {
    fn find(&self, id: ClientId) -> Result<Option<Client>, DirectoryError> {
        Ok(self.clients.get(&id).cloned())
    }
}

#[derive(Debug, Deserialize)]
struct ClientRow {
    id: u32,
    name: String,
    #[serde(default)]
    client_type: String,
}

impl ClientRow {
    fn into_client(self) -> Client {
        Client {
            id: ClientId(self.id),
            name: self.name,
            tier: ClientTier::from_label(&self.client_type),
        }
    }
}
