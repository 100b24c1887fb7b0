use chrono::{Days, NaiveDate, NaiveTime, Utc};
use fake::{
    Fake,
    faker::{
        address::en::{BuildingNumber, CityName, SecondaryAddress, StateAbbr, StreetName, ZipCode},
        company::en::CompanyName,
        internet::en::{DomainSuffix, FreeEmail, Username},
        job::en::Title,
        name::en::{LastName, Name},
    },
};
use profile_server_app::domain::{
    ProfileId,
    profile::{GeoLocation, Profile, ProfileError},
};
use rand::{Rng, seq::IndexedRandom};

pub const SAMPLE_PROFILE_COUNT: usize = 200;

const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

const SEXES: [&str; 2] = ["F", "M"];

const MAX_AGE_DAYS: u64 = 115 * 365;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("coordinate {raw:?} is not a number")]
    Coordinate {
        raw: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Generates `count` profiles with ids `profile-1` through `profile-{count}`.
pub fn generate_sample_data<R: Rng>(
    rng: &mut R,
    count: usize,
) -> Result<Vec<Profile>, GenerateError> {
    let today = Utc::now().date_naive();
    (1..=count)
        .map(|n| generate_profile(rng, ProfileId::fixture(n), today))
        .collect()
}

pub fn generate_profile<R: Rng>(
    rng: &mut R,
    id: ProfileId,
    today: NaiveDate,
) -> Result<Profile, GenerateError> {
    let (latitude, longitude) = random_coordinates(rng);
    let current_location = GeoLocation::new(
        coerce_coordinate(&latitude)?,
        coerce_coordinate(&longitude)?,
    );

    let profile = Profile {
        id,
        username: Username().fake_with_rng(rng),
        name: Name().fake_with_rng(rng),
        address: random_address(rng),
        mail: FreeEmail().fake_with_rng(rng),
        birthdate: random_birthdate(rng, today).and_time(NaiveTime::MIN),
        sex: pick(rng, &SEXES),
        company: CompanyName().fake_with_rng(rng),
        job: Title().fake_with_rng(rng),
        ssn: format!(
            "{:03}-{:02}-{:04}",
            rng.random_range(1..900),
            rng.random_range(1..100),
            rng.random_range(1..10000)
        ),
        residence: random_address(rng),
        current_location,
        blood_group: pick(rng, &BLOOD_GROUPS),
        website: (0..rng.random_range(1..=4))
            .map(|_| random_website(rng))
            .collect(),
    };
    Ok(profile.validated()?)
}

// Coordinates come out as fixed-precision decimal text, six places.
fn random_coordinates<R: Rng>(rng: &mut R) -> (String, String) {
    (
        format!("{:.6}", rng.random_range(-90.0_f64..=90.0)),
        format!("{:.6}", rng.random_range(-180.0_f64..=180.0)),
    )
}

fn coerce_coordinate(raw: &str) -> Result<f64, GenerateError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|source| GenerateError::Coordinate {
            raw: raw.to_string(),
            source,
        })
}

fn random_birthdate<R: Rng>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(rng.random_range(0..MAX_AGE_DAYS)))
        .unwrap_or(today)
}

fn random_address<R: Rng>(rng: &mut R) -> String {
    let building: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    let city: String = CityName().fake_with_rng(rng);
    let state: String = StateAbbr().fake_with_rng(rng);
    let zip: String = ZipCode().fake_with_rng(rng);
    if rng.random_bool(0.3) {
        let secondary: String = SecondaryAddress().fake_with_rng(rng);
        format!("{building} {street} {secondary}\n{city}, {state} {zip}")
    } else {
        format!("{building} {street}\n{city}, {state} {zip}")
    }
}

fn random_website<R: Rng>(rng: &mut R) -> String {
    let host: String = LastName().fake_with_rng(rng);
    let host: String = host
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    let suffix: String = DomainSuffix().fake_with_rng(rng);
    let scheme = if rng.random_bool(0.5) { "https" } else { "http" };
    let www = if rng.random_bool(0.5) { "www." } else { "" };
    format!("{scheme}://{www}{host}.{suffix}/")
}

fn pick<R: Rng>(rng: &mut R, values: &[&str]) -> String {
    values.choose(rng).copied().unwrap_or_default().to_string()
}
