use std::sync::Arc;

use crate::domain::{
    ProfileId,
    profile::{Profile, ProfileRepository},
};

#[async_trait::async_trait]
pub trait GetProfileUseCase {
    async fn get_profile(&self, profile_id: ProfileId) -> Result<Profile, GetProfileError>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum GetProfileError {
    NotFound,
    RepositoryError,
}

pub struct GetProfileUseCaseImpl<PR: ProfileRepository> {
    profile_repo: Arc<PR>,
}

impl<PR: ProfileRepository> GetProfileUseCaseImpl<PR> {
    pub fn new(profile_repo: Arc<PR>) -> Self {
        Self { profile_repo }
    }
}

#[async_trait::async_trait]
impl<PR: ProfileRepository + Send + Sync + 'static> GetProfileUseCase
    for GetProfileUseCaseImpl<PR>
{
    async fn get_profile(&self, profile_id: ProfileId) -> Result<Profile, GetProfileError> {
        match self.profile_repo.find_by_id(&profile_id).await {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => {
                log::debug!("No profile with id '{}'", profile_id);
                Err(GetProfileError::NotFound)
            }
            Err(e) => {
                log::error!("Failed to retrieve profile {}: {}", profile_id, e);
                Err(GetProfileError::RepositoryError)
            }
        }
    }
}
