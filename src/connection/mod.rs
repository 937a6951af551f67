//! Connection management for MongoDB
//!
//! This module provides connection management functionality including:
//! - URI parsing into reusable client options
//! - Connection establishment verified with a ping
//! - Database handles and collection statistics for listing

use mongodb::bson::doc;
use mongodb::{Client, Database, options::ClientOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cli::sanitize_uri;
use crate::error::{ConnectionError, ExporterError, Result};

/// Application name reported to the server
const APP_NAME: &str = "mongo-flatten-export";

/// MongoDB connection manager
///
/// Owns the primary client used for listing collections. Export jobs open
/// their own clients from [`ConnectionManager::client_options`].
pub struct ConnectionManager {
    /// MongoDB client instance
    client: Option<Client>,

    /// Parsed client options, shared with per-job clients
    options: Option<ClientOptions>,

    /// Server selection timeout
    timeout: Duration,

    /// Current connection state
    state: Arc<RwLock<ConnectionState>>,

    /// Connection URI
    uri: String,
}

/// Connection state information
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,

    /// Currently connecting
    Connecting,

    /// Connected and ready
    Connected,

    /// Connection failed
    Failed(String),
}

impl ConnectionManager {
    /// Create a new connection manager
    ///
    /// # Arguments
    /// * `uri` - MongoDB connection URI
    /// * `timeout` - Server selection timeout
    ///
    /// # Returns
    /// * `Self` - New connection manager instance
    pub fn new(uri: String, timeout: Duration) -> Self {
        Self {
            client: None,
            options: None,
            timeout,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            uri,
        }
    }

    /// Establish connection to MongoDB
    ///
    /// Parses the URI, creates the client and pings the server so an
    /// unreachable cluster fails here instead of inside the first job.
    ///
    /// # Returns
    /// * `Result<()>` - Success or connection error
    pub async fn connect(&mut self) -> Result<()> {
        self.set_state(ConnectionState::Connecting).await;
        info!("Connecting to {}", sanitize_uri(&self.uri));

        let options = match self.parse_uri().await {
            Ok(options) => options,
            Err(e) => {
                self.set_state(ConnectionState::Failed(e.to_string())).await;
                return Err(e);
            }
        };

        let client = Client::with_options(options.clone())
            .map_err(|e| ConnectionError::ConnectionFailed(e.to_string()))?;

        if let Err(e) = Self::ping(&client).await {
            self.set_state(ConnectionState::Failed(e.to_string())).await;
            return Err(e);
        }

        self.client = Some(client);
        self.options = Some(options);
        self.set_state(ConnectionState::Connected).await;
        debug!("Connection established");
        Ok(())
    }

    /// Disconnect from MongoDB
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client.shutdown().await;
        }
        self.set_state(ConnectionState::Disconnected).await;
        Ok(())
    }

    /// Get a database handle
    ///
    /// # Arguments
    /// * `name` - Database name
    ///
    /// # Returns
    /// * `Result<Database>` - Database handle or error
    pub fn get_database(&self, name: &str) -> Result<Database> {
        Ok(self.get_client()?.database(name))
    }

    /// Get the MongoDB client
    ///
    /// # Returns
    /// * `Result<&Client>` - Reference to client or error
    pub fn get_client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| ConnectionError::NotConnected.into())
    }

    /// Client options parsed during [`connect`](Self::connect)
    pub fn client_options(&self) -> Result<&ClientOptions> {
        self.options
            .as_ref()
            .ok_or_else(|| ConnectionError::NotConnected.into())
    }

    /// Get current connection state
    pub async fn get_state(&self) -> ConnectionState {
        self.state.read().await.clone()
    }

    /// Check if currently connected
    pub async fn is_connected(&self) -> bool {
        matches!(*self.state.read().await, ConnectionState::Connected)
    }

    /// Document counts for every collection in `database`, sorted by name
    ///
    /// # Arguments
    /// * `database` - Database name
    ///
    /// # Returns
    /// * `Result<Vec<(String, u64)>>` - Collection names with document counts
    pub async fn collection_counts(&self, database: &str) -> Result<Vec<(String, u64)>> {
        let db = self.get_database(database)?;
        let mut names = db.list_collection_names().await?;
        names.sort();

        let mut counts = Vec::with_capacity(names.len());
        for name in names {
            let count = db
                .collection::<mongodb::bson::Document>(&name)
                .count_documents(doc! {})
                .await?;
            counts.push((name, count));
        }

        Ok(counts)
    }

    /// Parse connection URI and apply exporter settings
    async fn parse_uri(&self) -> Result<ClientOptions> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| ConnectionError::InvalidUri(e.to_string()))?;

        options.server_selection_timeout = Some(self.timeout);
        options.connect_timeout = Some(self.timeout);
        if options.app_name.is_none() {
            options.app_name = Some(APP_NAME.to_string());
        }

        Ok(options)
    }

    /// Update connection state
    async fn set_state(&self, new_state: ConnectionState) {
        *self.state.write().await = new_state;
    }

    /// Verify the connection is alive by sending a ping
    async fn ping(client: &Client) -> Result<()> {
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| match e.kind.as_ref() {
                mongodb::error::ErrorKind::Authentication { .. } => ExporterError::MongoDb(e),
                _ => ConnectionError::PingFailed(e.to_string()).into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state() {
        let state = ConnectionState::Disconnected;
        assert_eq!(state, ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_not_connected_errors() {
        let manager = ConnectionManager::new(
            "mongodb://localhost:27017".to_string(),
            Duration::from_secs(1),
        );
        assert!(!manager.is_connected().await);
        assert!(matches!(
            manager.get_client(),
            Err(ExporterError::Connection(ConnectionError::NotConnected))
        ));
        assert!(manager.client_options().is_err());
    }

    #[tokio::test]
    async fn test_invalid_uri_is_connection_error() {
        let mut manager =
            ConnectionManager::new("not-a-uri".to_string(), Duration::from_secs(1));

        let err = manager.connect().await.unwrap_err();
        assert!(matches!(
            err,
            ExporterError::Connection(ConnectionError::InvalidUri(_))
        ));
        assert!(matches!(
            manager.get_state().await,
            ConnectionState::Failed(_)
        ));
    }
}
