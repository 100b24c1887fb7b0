use bson::{Bson, Document, doc};
use log::info;
use mongodb::{Client, Collection, Database};

pub mod entity;
pub mod fixture;
pub mod generator;
pub mod profile;

pub const CONNECTION_STRING_VAR: &str = "MONGODB_URI";

pub const PROFILES_COLLECTION: &str = "profiles";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{} must be set", CONNECTION_STRING_VAR)]
    MissingConnectionString,
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("invalid connection string: {0}")]
    Client(#[source] mongodb::error::Error),
    #[error("connection string does not name a default database")]
    NoDefaultDatabase,
    #[error("problem connecting to database cluster: {0}")]
    Ping(#[source] mongodb::error::Error),
    #[error("problem connecting to database cluster: ping was not acknowledged")]
    NotAcknowledged,
}

#[derive(Clone, Debug)]
pub struct MongoConfig {
    pub connection_string: String,
}

impl MongoConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let connection_string = lookup(CONNECTION_STRING_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingConnectionString)?;
        Ok(Self { connection_string })
    }
}

/// One client plus its default database, verified with a ping on open.
///
/// Must be released with [`MongoConnection::close`]. Every failure inside
/// [`MongoConnection::open`] releases the client before returning.
pub struct MongoConnection {
    client: Client,
    database: Database,
}

impl MongoConnection {
    pub async fn open(config: &MongoConfig) -> Result<Self, ConnectError> {
        let client = Client::with_uri_str(&config.connection_string)
            .await
            .map_err(ConnectError::Client)?;
        let Some(database) = client.default_database() else {
            client.shutdown().await;
            return Err(ConnectError::NoDefaultDatabase);
        };

        let connection = Self { client, database };
        if let Err(e) = connection.ping().await {
            connection.close().await;
            return Err(e);
        }

        info!("Connected to database cluster.");
        Ok(connection)
    }

    pub async fn ping(&self) -> Result<(), ConnectError> {
        let response = self
            .database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(ConnectError::Ping)?;
        if ping_acknowledged(&response) {
            Ok(())
        } else {
            Err(ConnectError::NotAcknowledged)
        }
    }

    pub fn profiles(&self) -> Collection<Document> {
        self.database.collection(PROFILES_COLLECTION)
    }

    pub async fn close(self) {
        self.client.shutdown().await;
    }
}

fn ping_acknowledged(response: &Document) -> bool {
    match response.get("ok") {
        Some(Bson::Double(ok)) => *ok == 1.0,
        Some(Bson::Int32(ok)) => *ok == 1,
        Some(Bson::Int64(ok)) => *ok == 1,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNREACHABLE_URI: &str =
        "mongodb://127.0.0.1:1/profiles_test?serverSelectionTimeoutMS=200&connectTimeoutMS=200";

    #[test]
    fn test_config_requires_connection_string() {
        assert!(matches!(
            MongoConfig::from_lookup(|_| None),
            Err(ConfigError::MissingConnectionString)
        ));
        assert!(matches!(
            MongoConfig::from_lookup(|_| Some("  ".to_string())),
            Err(ConfigError::MissingConnectionString)
        ));

        let config = MongoConfig::from_lookup(|key| {
            (key == CONNECTION_STRING_VAR).then(|| "mongodb://localhost/profiles".to_string())
        })
        .unwrap();
        assert_eq!(config.connection_string, "mongodb://localhost/profiles");
    }

    #[test]
    fn test_ping_acknowledgement() {
        assert!(ping_acknowledged(&doc! { "ok": 1.0 }));
        assert!(ping_acknowledged(&doc! { "ok": 1 }));
        assert!(ping_acknowledged(&doc! { "ok": 1_i64 }));
        assert!(!ping_acknowledged(&doc! { "ok": 0.0 }));
        assert!(!ping_acknowledged(&doc! { "ok": 1.5 }));
        assert!(!ping_acknowledged(&doc! { "ok": "1" }));
        assert!(!ping_acknowledged(&doc! {}));
    }

    #[tokio::test]
    async fn test_open_fails_when_unreachable() {
        let config = MongoConfig {
            connection_string: UNREACHABLE_URI.to_string(),
        };
        assert!(matches!(
            MongoConnection::open(&config).await,
            Err(ConnectError::Ping(_))
        ));
    }

    #[tokio::test]
    async fn test_open_requires_default_database() {
        let config = MongoConfig {
            connection_string: "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200".to_string(),
        };
        assert!(matches!(
            MongoConnection::open(&config).await,
            Err(ConnectError::NoDefaultDatabase)
        ));
    }
}
