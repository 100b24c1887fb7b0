//! Fixture files: a JSON array of profile documents in MongoDB canonical
//! extended JSON, so doubles and dates keep their BSON types on reload.

use std::path::Path;

use bson::Bson;
use log::info;
use profile_server_app::domain::{RepoError, profile::Profile};

use crate::{
    ConnectError, MongoConfig, MongoConnection,
    entity::profile::{DocumentError, ProfileDocument},
    profile::ProfileRepositoryImpl,
};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to access fixture file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode fixture: {0}")]
    Decode(String),
    #[error("failed to encode fixture: {0}")]
    Encode(String),
    #[error(transparent)]
    Connect(#[from] ConnectError),
    #[error("failed to load profiles: {0}")]
    Storage(RepoError),
}

impl From<DocumentError> for FixtureError {
    fn from(e: DocumentError) -> Self {
        FixtureError::Decode(e.to_string())
    }
}

pub fn encode_profiles(profiles: &[Profile]) -> Result<String, FixtureError> {
    let documents = profiles
        .iter()
        .map(|profile| {
            bson::to_bson(&ProfileDocument::from(profile))
                .map(Bson::into_canonical_extjson)
                .map_err(|e| FixtureError::Encode(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    serde_json::to_string(&documents).map_err(|e| FixtureError::Encode(e.to_string()))
}

pub fn decode_profiles(text: &str) -> Result<Vec<Profile>, FixtureError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| FixtureError::Decode(e.to_string()))?;
    let items = match Bson::try_from(value).map_err(|e| FixtureError::Decode(e.to_string()))? {
        Bson::Array(items) => items,
        other => {
            return Err(FixtureError::Decode(format!(
                "expected an array of profiles, found {:?}",
                other.element_type()
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| -> Result<Profile, FixtureError> {
            match item {
                Bson::Document(document) => {
                    Ok(ProfileDocument::from_bson(document)?.into_profile()?)
                }
                other => Err(FixtureError::Decode(format!(
                    "entry {} is a {:?}, not a document",
                    index,
                    other.element_type()
                ))),
            }
        })
        .collect()
}

pub fn write_fixture(path: &Path, profiles: &[Profile]) -> Result<(), FixtureError> {
    let text = encode_profiles(profiles)?;
    std::fs::write(path, text).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn read_fixture(path: &Path) -> Result<Vec<Profile>, FixtureError> {
    let text = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    decode_profiles(&text)
}

/// Replaces the contents of the `profiles` collection with the fixture at
/// `path` and returns the number of profiles inserted.
///
/// The file is fully decoded and the ping verified before anything is
/// deleted. Existing documents in the collection are always lost.
pub async fn load_fixture(path: &Path, config: &MongoConfig) -> Result<usize, FixtureError> {
    let profiles = read_fixture(path)?;
    info!("Read {} profiles from {}", profiles.len(), path.display());

    let connection = MongoConnection::open(config).await?;
    let result = ProfileRepositoryImpl::new(&connection)
        .replace_all(&profiles)
        .await;
    connection.close().await;

    result.map_err(FixtureError::Storage)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::generator::{SAMPLE_PROFILE_COUNT, generate_sample_data};

    use super::*;

    const UNREACHABLE_URI: &str =
        "mongodb://127.0.0.1:1/profiles_test?serverSelectionTimeoutMS=200&connectTimeoutMS=200";

    const CANONICAL_ENTRY: &str = r#"[{
        "_id": "profile-1",
        "username": "rossmichele",
        "name": "Bridget Zavala",
        "address": "114 Derek Trafficway\nLake Sarah, WI 86822",
        "mail": "jonesbrenda@yahoo.com",
        "birthdate": { "$date": { "$numberLong": "-1406592000000" } },
        "sex": "F",
        "company": "Wood-Bartlett",
        "job": "Nurse, learning disability",
        "ssn": "211-17-0186",
        "residence": "83773 Nancy Port\nEast Coltonborough, MD 58656",
        "current_location": [
            { "$numberDouble": "-7.3013195" },
            { "$numberDouble": "-4.274565" }
        ],
        "blood_group": "AB+",
        "website": ["http://www.lara.com/", "http://cooley.biz/", "http://lopez.org/"]
    }]"#;

    #[test]
    fn test_decode_canonical_entry() {
        let profiles = decode_profiles(CANONICAL_ENTRY).unwrap();
        assert_eq!(profiles.len(), 1);
        let profile = &profiles[0];
        assert_eq!(profile.id.as_str(), "profile-1");
        assert_eq!(profile.current_location.to_pair(), [-7.3013195, -4.274565]);
        assert_eq!(profile.birthdate.to_string(), "1925-06-06 00:00:00");
    }

    #[test]
    fn test_encoding_is_type_tagged() {
        let profiles = decode_profiles(CANONICAL_ENTRY).unwrap();
        let text = encode_profiles(&profiles).unwrap();
        assert!(text.contains(r#"{"$numberDouble":"-7.3013195"}"#));
        assert!(text.contains(r#"{"$date":{"$numberLong":"-1406592000000"}}"#));
        assert!(text.contains(r#""_id":"profile-1""#));
    }

    #[test]
    fn test_generated_fixture_round_trip() {
        let profiles =
            generate_sample_data(&mut StdRng::seed_from_u64(3), SAMPLE_PROFILE_COUNT).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample_data.json");

        write_fixture(&path, &profiles).unwrap();
        let loaded = read_fixture(&path).unwrap();

        assert_eq!(loaded.len(), 200);
        assert_eq!(loaded, profiles);
        for (i, profile) in loaded.iter().enumerate() {
            assert_eq!(profile.id.as_str(), format!("profile-{}", i + 1));
            assert!(profile.born_at_midnight());
        }
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(matches!(
            decode_profiles("not json"),
            Err(FixtureError::Decode(_))
        ));
        assert!(matches!(
            decode_profiles(r#"{"_id": "profile-1"}"#),
            Err(FixtureError::Decode(_))
        ));
        assert!(matches!(
            decode_profiles(r#"[1, 2]"#),
            Err(FixtureError::Decode(_))
        ));
        assert!(matches!(
            decode_profiles(r#"[{"_id": "profile-1", "username": "x"}]"#),
            Err(FixtureError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_three_element_location() {
        let text = CANONICAL_ENTRY.replace(
            r#"{ "$numberDouble": "-4.274565" }"#,
            r#"{ "$numberDouble": "-4.274565" }, { "$numberDouble": "0.5" }"#,
        );
        assert!(matches!(decode_profiles(&text), Err(FixtureError::Decode(_))));
    }

    #[test]
    fn test_decode_requires_id() {
        let text = CANONICAL_ENTRY.replace(r#""_id": "profile-1","#, "");
        assert!(!text.contains("_id"));
        assert!(matches!(decode_profiles(&text), Err(FixtureError::Decode(_))));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_fixture(&dir.path().join("missing.json")),
            Err(FixtureError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_decodes_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{").unwrap();
        let config = MongoConfig {
            connection_string: UNREACHABLE_URI.to_string(),
        };

        assert!(matches!(
            load_fixture(&path, &config).await,
            Err(FixtureError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_load_fails_when_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample_data.json");
        std::fs::write(&path, CANONICAL_ENTRY).unwrap();
        let config = MongoConfig {
            connection_string: UNREACHABLE_URI.to_string(),
        };

        assert!(matches!(
            load_fixture(&path, &config).await,
            Err(FixtureError::Connect(ConnectError::Ping(_)))
        ));
    }
}
