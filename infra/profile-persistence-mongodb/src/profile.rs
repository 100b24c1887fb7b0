use bson::{Document, doc};
use log::debug;
use mongodb::Collection;
use profile_server_app::domain::{
    ProfileId, RepoError, RepoRetrieveError,
    profile::{Profile, ProfileRepository},
};

use crate::{MongoConnection, entity::profile::ProfileDocument};

pub struct ProfileRepositoryImpl {
    collection: Collection<Document>,
}

impl ProfileRepositoryImpl {
    pub fn new(connection: &MongoConnection) -> Self {
        Self {
            collection: connection.profiles(),
        }
    }

    /// Deletes every document in the collection, then inserts `profiles`.
    ///
    /// Not transactional: if the insert fails part way, the collection keeps
    /// whatever was inserted before the failure and the prior contents are gone.
    pub async fn replace_all(&self, profiles: &[Profile]) -> Result<usize, RepoError> {
        let deleted = self
            .collection
            .delete_many(doc! {})
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        debug!("Deleted {} existing profiles", deleted.deleted_count);

        if profiles.is_empty() {
            return Ok(0);
        }

        let documents: Vec<ProfileDocument> = profiles.iter().map(ProfileDocument::from).collect();
        let inserted = self
            .collection
            .clone_with_type::<ProfileDocument>()
            .insert_many(&documents)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(inserted.inserted_ids.len())
    }

    #[cfg(test)]
    pub async fn count(&self) -> Result<u64, RepoError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ProfileRepository for ProfileRepositoryImpl {
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, RepoRetrieveError> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.as_str() })
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;

        match document {
            Some(document) => ProfileDocument::from_bson(document)
                .and_then(ProfileDocument::into_profile)
                .map(Some)
                .map_err(|e| RepoRetrieveError::InvalidData(e.to_string())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{
        MongoConfig,
        fixture::{load_fixture, write_fixture},
        generator::generate_sample_data,
    };

    use super::*;

    // Points at a scratch database, e.g. mongodb://localhost:27017/profiles_test
    const TEST_URI_VAR: &str = "MONGODB_TEST_URI";

    // Everything touching the live collection stays in this one test so that
    // parallel test threads never race on it.
    #[tokio::test]
    #[ignore = "requires MONGODB_TEST_URI"]
    async fn test_live_collection() {
        let connection_string =
            std::env::var(TEST_URI_VAR).expect("MONGODB_TEST_URI must name a scratch database");
        let config = MongoConfig { connection_string };

        let profiles = generate_sample_data(&mut StdRng::seed_from_u64(12), 200).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample_data.json");
        write_fixture(&path, &profiles).unwrap();

        assert_eq!(load_fixture(&path, &config).await.unwrap(), 200);
        assert_eq!(load_fixture(&path, &config).await.unwrap(), 200);

        let connection = MongoConnection::open(&config).await.unwrap();
        let repo = ProfileRepositoryImpl::new(&connection);
        assert_eq!(repo.count().await.unwrap(), 200);

        let found = repo
            .find_by_id(&ProfileId::new("profile-12"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, profiles[11]);
        assert!(
            repo.find_by_id(&ProfileId::new("PROFILE-12"))
                .await
                .unwrap()
                .is_none()
        );

        connection
            .profiles()
            .insert_one(doc! { "_id": "broken", "username": "only-a-username" })
            .await
            .unwrap();
        assert!(matches!(
            repo.find_by_id(&ProfileId::new("broken")).await,
            Err(RepoRetrieveError::InvalidData(_))
        ));

        assert_eq!(repo.replace_all(&[]).await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 0);

        connection.close().await;
    }
}
