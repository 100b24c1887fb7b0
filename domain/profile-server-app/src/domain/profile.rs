use chrono::{NaiveDateTime, NaiveTime};
use validator::{Validate, ValidationErrors};

use crate::domain::{ProfileId, RepoRetrieveError};

#[async_trait::async_trait]
pub trait ProfileRepository {
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, RepoRetrieveError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("current_location must have exactly 2 elements, got {0}")]
    InvalidLocation(usize),
    #[error("invalid profile: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Latitude/longitude pair. Serialized everywhere as `[latitude, longitude]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn to_pair(self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

impl TryFrom<&[f64]> for GeoLocation {
    type Error = ProfileError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match values {
            [latitude, longitude] => Ok(GeoLocation::new(*latitude, *longitude)),
            _ => Err(ProfileError::InvalidLocation(values.len())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Validate)]
pub struct Profile {
    pub id: ProfileId,
    pub username: String,
    pub name: String,
    pub address: String,
    pub mail: String,
    pub birthdate: NaiveDateTime,
    pub sex: String,
    pub company: String,
    pub job: String,
    pub ssn: String,
    pub residence: String,
    pub current_location: GeoLocation,
    pub blood_group: String,
    #[validate(length(min = 1))]
    pub website: Vec<String>,
}

impl Profile {
    /// Checks the invariants the type system does not already enforce.
    pub fn validated(self) -> Result<Self, ProfileError> {
        self.validate()?;
        Ok(self)
    }

    pub fn born_at_midnight(&self) -> bool {
        self.birthdate.time() == NaiveTime::MIN
    }
}
