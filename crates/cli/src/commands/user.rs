//! User management commands.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use section_factory_api::db::{PgStore, RepositoryError, SectionStore};
use section_factory_core::{UserId, Username};

use super::{CliError, connect};

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Create a new user.
///
/// # Errors
///
/// Returns an error if the username or password is invalid, the username is
/// taken, or the database is unreachable.
pub async fn create(username: &str, password: &SecretString) -> Result<UserId, CliError> {
    let store = PgStore::new(connect().await?);
    create_in(&store, username, password).await
}

/// Create a user in any store.
///
/// A taken username is reported before the password is hashed; the unique
/// constraint still catches a concurrent insert of the same name.
async fn create_in(
    store: &dyn SectionStore,
    username: &str,
    password: &SecretString,
) -> Result<UserId, CliError> {
    let username = Username::parse(username)?;

    if store.get_user_by_username(&username).await?.is_some() {
        return Err(CliError::UserExists(username.to_string()));
    }

    let password_hash = hash_password(password)?;

    tracing::info!("Creating user: {username}");
    let user = store
        .create_user(&username, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => CliError::UserExists(username.to_string()),
            other => CliError::Repository(other),
        })?;

    tracing::info!(user_id = %user.id, "User created");
    Ok(user.id)
}

/// Hash a password using Argon2id.
fn hash_password(password: &SecretString) -> Result<String, CliError> {
    let password = password.expose_secret();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CliError::WeakPassword(MIN_PASSWORD_LENGTH));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CliError::PasswordHash)
}
