use tracing::info;

use crate::auth::{issue_token_with_opaque, IssuedToken};
use crate::errors::AppError;
use crate::models::user::User;
use crate::store::DocumentStore;

/// An identity already verified by the external provider. The OAuth redirect
/// dance happens outside this service; only verified emails reach here.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub email: String,
    pub full_name: String,
    /// Provider access token; reused as the opaque segment of our token.
    pub access_token: String,
}

/// Session handed back to the provider's redirect target.
#[derive(Debug)]
pub struct FederatedSession {
    pub user_id: i64,
    pub token: String,
    pub expiry: String,
}

/// Completes a federated login: one account per email. A first-time email
/// gets a fresh user with no username or password — such accounts can never
/// log in with a password; a repeat email reuses the existing account, even
/// one originally created through password signup.
pub async fn complete_federated_login(
    store: &dyn DocumentStore,
    identity: VerifiedIdentity,
) -> Result<FederatedSession, AppError> {
    let user = match store
        .find_user_by_email(&identity.email)
        .await
        .map_err(AppError::Internal)?
    {
        Some(user) => user,
        None => {
            let mut user = User::new(store.next_user_id().await.map_err(AppError::Internal)?);
            user.full_name = identity.full_name.clone();
            user.email = identity.email.clone();
            store.insert_user(&user).await.map_err(AppError::Internal)?;
            info!("Created federated account {} for {}", user.id, user.email);
            user
        }
    };

    let IssuedToken { token, expiry } =
        issue_token_with_opaque(store, &user, &identity.access_token).await?;

    Ok(FederatedSession {
        user_id: user.id,
        token,
        expiry,
    })
}
