//! Credential store operations: signup, login, logout, profile reads and
//! updates. Everything here works against the user document; handlers stay
//! thin wrappers in `handlers.rs`.

pub mod handlers;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::{self, password, IssuedToken};
use crate::errors::AppError;
use crate::models::user::{ProfileView, User, UserSummary};
use crate::store::DocumentStore;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub expiry: String,
    pub profile: ProfileView,
}

/// Loads the user behind an authenticated request. A token that validated
/// but points at a missing user means the credential is no longer good.
pub async fn load_user(store: &dyn DocumentStore, user_id: i64) -> Result<User, AppError> {
    store
        .find_user(user_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or(AppError::Unauthorized)
}

/// Creates a user: id is `1 + max(existing)`, password is argon2-hashed.
pub async fn signup(store: &dyn DocumentStore, req: SignupRequest) -> Result<UserSummary, AppError> {
    let (Some(username), Some(plain), Some(full_name)) = (req.username, req.password, req.full_name)
    else {
        return Err(AppError::Validation("Missing fields in input".to_string()));
    };

    if store
        .find_user_by_username(&username)
        .await
        .map_err(AppError::Internal)?
        .is_some()
    {
        return Err(AppError::Validation("Username already exists".to_string()));
    }

    let mut user = User::new(store.next_user_id().await.map_err(AppError::Internal)?);
    user.username = Some(username);
    user.password_hash = Some(password::hash(&plain).map_err(AppError::Internal)?);
    user.full_name = full_name;
    store.insert_user(&user).await.map_err(AppError::Internal)?;

    Ok(UserSummary::from(&user))
}

/// Verifies credentials and issues a session token. The response profile
/// mirrors the stored document field for field. Federated accounts carry no
/// password hash and always fall through to the wrong-password error.
pub async fn login(store: &dyn DocumentStore, req: LoginRequest) -> Result<LoginResponse, AppError> {
    let (Some(username), Some(plain)) = (req.username, req.password) else {
        return Err(AppError::Validation(
            "Missing username or password".to_string(),
        ));
    };

    let user = store
        .find_user_by_username(&username)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::Validation("User not found".to_string()))?;

    let verified = user
        .password_hash
        .as_deref()
        .map(|h| password::verify(h, &plain))
        .unwrap_or(false);
    if !verified {
        return Err(AppError::Validation(
            "Wrong username or password".to_string(),
        ));
    }

    let IssuedToken { token, expiry } = auth::issue_token(store, &user).await?;

    Ok(LoginResponse {
        message: "Login successful".to_string(),
        token,
        expiry,
        profile: ProfileView::from(&user),
    })
}

/// Merges an arbitrary key/value map into the user's profile and saves it.
/// Only profile fields are client-assignable; credential and ledger fields
/// are ignored no matter what the payload says.
pub async fn update_profile(
    store: &dyn DocumentStore,
    user_id: i64,
    fields: &Map<String, Value>,
) -> Result<UserSummary, AppError> {
    let mut user = load_user(store, user_id).await?;
    apply_profile_fields(&mut user, fields);
    store.save_user(&user).await.map_err(AppError::Internal)?;
    Ok(UserSummary::from(&user))
}

pub fn apply_profile_fields(user: &mut User, fields: &Map<String, Value>) {
    for (key, value) in fields {
        match key.as_str() {
            "fullName" => set_string(&mut user.full_name, value),
            "email" => set_string(&mut user.email, value),
            "phone_number" => set_string(&mut user.phone_number, value),
            "address" => set_string(&mut user.address, value),
            "institution" => set_string(&mut user.institution, value),
            "skills" => set_list(&mut user.skills, value),
            "job_levels" => set_list(&mut user.job_levels, value),
            "locations" => set_list(&mut user.locations, value),
            _ => {}
        }
    }
}

fn set_string(slot: &mut String, value: &Value) {
    if let Some(s) = value.as_str() {
        *slot = s.to_string();
    }
}

fn set_list(slot: &mut Vec<String>, value: &Value) {
    if let Some(items) = value.as_array() {
        *slot = items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemStore;
    use serde_json::json;

    fn signup_req(username: &str) -> SignupRequest {
        SignupRequest {
            username: Some(username.to_string()),
            password: Some("pass123".to_string()),
            full_name: Some(format!("{username} tester")),
        }
    }

    fn login_req(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn signup_assigns_max_plus_one_ids() {
        let store = MemStore::new();
        let first = signup(&store, signup_req("alice")).await.unwrap();
        let second = signup(&store, signup_req("bob")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn signup_rejects_missing_fields_and_duplicates() {
        let store = MemStore::new();
        let missing = signup(
            &store,
            SignupRequest {
                username: Some("alice".to_string()),
                password: None,
                full_name: Some("Alice".to_string()),
            },
        )
        .await;
        assert!(matches!(missing, Err(AppError::Validation(msg)) if msg == "Missing fields in input"));

        signup(&store, signup_req("alice")).await.unwrap();
        let dup = signup(&store, signup_req("alice")).await;
        assert!(matches!(dup, Err(AppError::Validation(msg)) if msg == "Username already exists"));
    }

    #[tokio::test]
    async fn login_appends_token_and_mirrors_profile() {
        let store = MemStore::new();
        signup(&store, signup_req("alice")).await.unwrap();

        let mut user = store.find_user(1).await.unwrap().unwrap();
        user.email = "alice@example.com".to_string();
        user.skills = vec!["rust".to_string()];
        store.save_user(&user).await.unwrap();

        let response = login(&store, login_req("alice", "pass123")).await.unwrap();
        assert_eq!(response.message, "Login successful");
        assert_eq!(response.profile.id, 1);
        assert_eq!(response.profile.email, "alice@example.com");
        assert_eq!(response.profile.skills, vec!["rust".to_string()]);

        let stored = store.find_user(1).await.unwrap().unwrap();
        assert_eq!(stored.auth_tokens.len(), 1);
        assert_eq!(stored.auth_tokens[0].token, response.token);
        assert_eq!(stored.auth_tokens[0].expiry, response.expiry);
    }

    #[tokio::test]
    async fn login_failures_keep_their_messages() {
        let store = MemStore::new();
        signup(&store, signup_req("alice")).await.unwrap();

        let unknown = login(&store, login_req("mallory", "pass123")).await;
        assert!(matches!(unknown, Err(AppError::Validation(msg)) if msg == "User not found"));

        let wrong = login(&store, login_req("alice", "wrong")).await;
        assert!(
            matches!(wrong, Err(AppError::Validation(msg)) if msg == "Wrong username or password")
        );
    }

    #[tokio::test]
    async fn federated_accounts_cannot_password_login() {
        let store = MemStore::new();
        let mut user = User::new(1);
        user.username = Some("carol".to_string());
        user.email = "carol@example.com".to_string();
        // No password_hash: account came from federated login.
        store.insert_user(&user).await.unwrap();

        let attempt = login(&store, login_req("carol", "anything")).await;
        assert!(
            matches!(attempt, Err(AppError::Validation(msg)) if msg == "Wrong username or password")
        );
    }

    #[tokio::test]
    async fn update_profile_merges_known_fields_only() {
        let store = MemStore::new();
        signup(&store, signup_req("alice")).await.unwrap();

        let fields = json!({
            "skills": ["rust", "sql"],
            "phone_number": "555-0100",
            "password_hash": "owned",
            "applications": [{"id": 99}]
        });
        update_profile(&store, 1, fields.as_object().unwrap())
            .await
            .unwrap();

        let user = store.find_user(1).await.unwrap().unwrap();
        assert_eq!(user.skills, vec!["rust".to_string(), "sql".to_string()]);
        assert_eq!(user.phone_number, "555-0100");
        assert!(user.applications.is_empty());
        assert_ne!(user.password_hash.as_deref(), Some("owned"));
    }
}
