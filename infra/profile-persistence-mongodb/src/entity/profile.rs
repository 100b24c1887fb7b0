use chrono::DateTime;
use profile_server_app::domain::{
    ProfileId,
    profile::{GeoLocation, Profile, ProfileError},
};
use serde::{Deserialize, Serialize};

/// Stored shape of a profile in the `profiles` collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub name: String,
    pub address: String,
    pub mail: String,
    pub birthdate: bson::DateTime,
    pub sex: String,
    pub company: String,
    pub job: String,
    pub ssn: String,
    pub residence: String,
    pub current_location: Vec<f64>,
    pub blood_group: String,
    pub website: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("malformed profile document: {0}")]
    Malformed(#[from] bson::de::Error),
    #[error("birthdate {0} is out of range")]
    BirthdateOutOfRange(i64),
    #[error("profile '{id}': {source}")]
    InvalidProfile {
        id: String,
        #[source]
        source: ProfileError,
    },
}

impl ProfileDocument {
    pub fn from_bson(document: bson::Document) -> Result<Self, DocumentError> {
        Ok(bson::from_document(document)?)
    }

    pub fn into_profile(self) -> Result<Profile, DocumentError> {
        let millis = self.birthdate.timestamp_millis();
        let birthdate = DateTime::from_timestamp_millis(millis)
            .ok_or(DocumentError::BirthdateOutOfRange(millis))?
            .naive_utc();
        let invalid = |source| DocumentError::InvalidProfile {
            id: self.id.clone(),
            source,
        };
        let current_location =
            GeoLocation::try_from(self.current_location.as_slice()).map_err(invalid)?;

        Profile {
            id: ProfileId::new(self.id.clone()),
            username: self.username,
            name: self.name,
            address: self.address,
            mail: self.mail,
            birthdate,
            sex: self.sex,
            company: self.company,
            job: self.job,
            ssn: self.ssn,
            residence: self.residence,
            current_location,
            blood_group: self.blood_group,
            website: self.website,
        }
        .validated()
        .map_err(|source| DocumentError::InvalidProfile {
            id: self.id,
            source,
        })
    }
}

impl From<&Profile> for ProfileDocument {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.as_str().to_string(),
            username: profile.username.clone(),
            name: profile.name.clone(),
            address: profile.address.clone(),
            mail: profile.mail.clone(),
            birthdate: bson::DateTime::from_millis(
                profile.birthdate.and_utc().timestamp_millis(),
            ),
            sex: profile.sex.clone(),
            company: profile.company.clone(),
            job: profile.job.clone(),
            ssn: profile.ssn.clone(),
            residence: profile.residence.clone(),
            current_location: profile.current_location.to_pair().to_vec(),
            blood_group: profile.blood_group.clone(),
            website: profile.website.clone(),
        }
    }
}
