use serde::{Deserialize, Serialize};

/// A user document. Auth tokens and applications are embedded lists, so
/// token validation and ledger operations are a single lookup by user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Absent for accounts created through federated login.
    pub username: Option<String>,
    /// Argon2id PHC string. Absent for federated accounts, which can never
    /// log in with a password.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub institution: String,
    pub auth_tokens: Vec<AuthToken>,
    pub applications: Vec<Application>,
    pub skills: Vec<String>,
    pub job_levels: Vec<String>,
    pub locations: Vec<String>,
    /// Saved resume/job comparison analyses, stored as the client sent them.
    pub analyses: Vec<serde_json::Value>,
}

impl User {
    /// A blank user document with the given id. Callers fill in identity
    /// fields before inserting.
    pub fn new(id: i64) -> Self {
        User {
            id,
            username: None,
            password_hash: None,
            full_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            address: String::new(),
            institution: String::new(),
            auth_tokens: Vec::new(),
            applications: Vec::new(),
            skills: Vec::new(),
            job_levels: Vec::new(),
            locations: Vec::new(),
            analyses: Vec::new(),
        }
    }
}

/// One live session. `expiry` keeps its wire format
/// (`"%m/%d/%Y, %H:%M:%S"`, UTC) because clients echo it back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
    pub expiry: String,
}

/// A job application embedded in the owning user's document.
/// Ids are unique per user only; there is no cross-user id space.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub job_title: String,
    pub company_name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub job_link: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Free-form status code. "1" marks a wishlist entry.
    pub status: String,
}

/// The `{id, fullName, username}` summary returned by signup and
/// updateProfile.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub username: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id,
            full_name: user.full_name.clone(),
            username: user.username.clone(),
        }
    }
}

/// The full profile object embedded in the login response.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub username: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub institution: String,
    pub skills: Vec<String>,
    pub job_levels: Vec<String>,
    pub locations: Vec<String>,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        ProfileView {
            id: user.id,
            full_name: user.full_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            address: user.address.clone(),
            institution: user.institution.clone(),
            skills: user.skills.clone(),
            job_levels: user.job_levels.clone(),
            locations: user.locations.clone(),
        }
    }
}

/// The preference-centric object returned by GET /getProfile.
#[derive(Debug, Serialize)]
pub struct ProfileInfo {
    pub skills: Vec<String>,
    pub job_levels: Vec<String>,
    pub locations: Vec<String>,
    pub institution: String,
    pub phone_number: String,
    pub address: String,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

impl From<&User> for ProfileInfo {
    fn from(user: &User) -> Self {
        ProfileInfo {
            skills: user.skills.clone(),
            job_levels: user.job_levels.clone(),
            locations: user.locations.clone(),
            institution: user.institution.clone(),
            phone_number: user.phone_number.clone(),
            address: user.address.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
        }
    }
}
