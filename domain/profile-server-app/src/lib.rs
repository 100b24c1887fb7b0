use std::sync::Arc;

use crate::{
    domain::profile::ProfileRepository,
    workflow::profile::get_profile::{GetProfileUseCase, GetProfileUseCaseImpl},
};

pub mod domain;
pub mod workflow;

pub struct Application {
    pub profile_get_use_case: Box<dyn GetProfileUseCase + Send + Sync + 'static>,
}

pub fn build_application<PR: ProfileRepository + Send + Sync + 'static>(
    profile_repository: Arc<PR>,
) -> Application {
    Application {
        profile_get_use_case: Box::new(GetProfileUseCaseImpl::new(profile_repository)),
    }
}
