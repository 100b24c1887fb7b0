use aide::transform::TransformOperation;
use axum::{
    Json,
    extract::{Path, State},
};
use profile_server_app::{
    domain::{ProfileId, profile::Profile},
    workflow::profile::get_profile::GetProfileError,
};

use crate::{AppState, ServiceError};

#[derive(serde::Deserialize, schemars::JsonSchema)]
pub struct ProfilePath {
    /// Identifier of the profile, matched exactly, e.g. `profile-12`.
    profile_id: String,
}

pub async fn get_by_id(
    Path(ProfilePath { profile_id }): Path<ProfilePath>,
    State(app_state): State<AppState>,
) -> Result<Json<JsonProfile>, ServiceError> {
    match app_state
        .app
        .profile_get_use_case
        .get_profile(ProfileId::new(profile_id.clone()))
        .await
    {
        Ok(profile) => Ok(Json(JsonProfile::from_profile(profile))),
        Err(GetProfileError::NotFound) => Err(ServiceError::NotFound(format!(
            "No profile with id '{}'",
            profile_id
        ))),
        Err(GetProfileError::RepositoryError) => Err(ServiceError::Internal(format!(
            "Error retrieving profile '{}'",
            profile_id
        ))),
    }
}

pub fn get_by_id_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Look up a single profile by ID.")
        .description("Try out \"profile-12\"!")
        .response_with::<200, Json<JsonProfile>, _>(|res| {
            res.description("Profile requested by ID")
                .example(JsonProfile::example())
        })
}

/// A profile for a single user, as returned over HTTP.
#[derive(serde::Serialize, schemars::JsonSchema)]
pub struct JsonProfile {
    #[serde(rename = "_id")]
    id: String,
    username: String,
    name: String,
    address: String,
    mail: String,
    birthdate: String,
    sex: String,
    company: String,
    job: String,
    ssn: String,
    residence: String,
    current_location: [f64; 2],
    blood_group: String,
    website: Vec<String>,
}

impl JsonProfile {
    fn from_profile(profile: Profile) -> Self {
        Self {
            id: profile.id.into_inner(),
            username: profile.username,
            name: profile.name,
            address: profile.address,
            mail: profile.mail,
            birthdate: profile.birthdate.format("%Y-%m-%dT%H:%M:%S").to_string(),
            sex: profile.sex,
            company: profile.company,
            job: profile.job,
            ssn: profile.ssn,
            residence: profile.residence,
            current_location: profile.current_location.to_pair(),
            blood_group: profile.blood_group,
            website: profile.website,
        }
    }

    fn example() -> Self {
        Self {
            id: "profile-12".to_string(),
            username: "terry53".to_string(),
            name: "Whitney Davis".to_string(),
            address: "3874 Brittany Rue Apt. 447\nWest Amber, AK 09494".to_string(),
            mail: "ztorres@hotmail.com".to_string(),
            birthdate: "1987-07-19T00:00:00".to_string(),
            sex: "F".to_string(),
            company: "Brown PLC".to_string(),
            job: "Research officer, trade union".to_string(),
            ssn: "636-75-3518".to_string(),
            residence: "3409 Robinson Harbor\nNorth Monica, HI 17943".to_string(),
            current_location: [89.371661, -102.604933],
            blood_group: "AB+".to_string(),
            website: vec![
                "http://carlson.com/".to_string(),
                "https://www.dougherty.info/".to_string(),
            ],
        }
    }
}
