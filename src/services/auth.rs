//! Account service: registration, login and session lookup
//!
//! Passwords are hashed with Argon2id and stored as PHC strings. The session
//! itself is just `Settings::active_user`; this service never touches it.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde_json::json;

use crate::audit::EntityType;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::shared_user::is_plausible_email;
use crate::models::{User, UserId};
use crate::storage::{default_categories, Storage};

/// Shortest accepted password, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService<'a> {
    storage: &'a Storage,
}

impl<'a> AuthService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new account
    ///
    /// With `seed_categories` the starter category set is created for the user.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        seed_categories: bool,
    ) -> SpendwiseResult<User> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(SpendwiseError::Validation("Name cannot be empty".into()));
        }
        if !is_plausible_email(email) {
            return Err(SpendwiseError::Validation(format!(
                "Invalid email address: '{}'",
                email
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SpendwiseError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.storage.users.get_by_email(email)?.is_some() {
            return Err(SpendwiseError::Duplicate {
                entity_type: "User",
                identifier: email.to_string(),
            });
        }

        let user = User::new(name, email, hash_password(password)?);
        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &redacted(&user),
        )?;
        log::info!("registered user {}", user.id);

        if seed_categories {
            let categories = default_categories(user.id);
            let count = categories.len();
            for category in categories {
                self.storage.categories.upsert(category)?;
            }
            self.storage.categories.save()?;
            log::debug!("seeded {} categories for {}", count, user.id);
        }

        Ok(user)
    }

    /// Check credentials and return the matching user
    ///
    /// An unknown email and a wrong password produce the same error.
    pub fn login(&self, email: &str, password: &str) -> SpendwiseResult<User> {
        let user = self
            .storage
            .users
            .get_by_email(email)?
            .ok_or_else(|| SpendwiseError::Auth(INVALID_CREDENTIALS.into()))?;

        if !verify_password(password, &user.password_hash)? {
            log::warn!("failed login for {}", user.id);
            return Err(SpendwiseError::Auth(INVALID_CREDENTIALS.into()));
        }

        Ok(user)
    }

    /// Resolve the logged-in user from the session id
    pub fn current_user(&self, active_user: Option<UserId>) -> SpendwiseResult<User> {
        let id = active_user.ok_or_else(|| {
            SpendwiseError::Auth("Not logged in. Run 'spendwise user login' first".into())
        })?;

        self.storage.users.get(id)?.ok_or_else(|| {
            SpendwiseError::Auth(format!("Logged-in user {} no longer exists", id))
        })
    }
}

/// Audit view of a user without the password hash
fn redacted(user: &User) -> serde_json::Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "created_at": user.created_at,
    })
}

fn hash_password(password: &str) -> SpendwiseResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SpendwiseError::Auth(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored: &str) -> SpendwiseResult<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| SpendwiseError::Storage(format!("Corrupt password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SpendwisePaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_register_and_login() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AuthService::new(&storage);

        let user = service
            .register("Ana", "ana@example.com", "secret1", false)
            .unwrap();
        assert_ne!(user.password_hash, "secret1");
        assert!(user.password_hash.starts_with("$argon2"));

        let logged_in = service.login("ANA@example.com", "secret1").unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[test]
    fn test_login_failures_share_message() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AuthService::new(&storage);
        service
            .register("Ana", "ana@example.com", "secret1", false)
            .unwrap();

        let wrong_password = service.login("ana@example.com", "nope!!").unwrap_err();
        let unknown = service.login("bo@example.com", "secret1").unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown.to_string());
        assert!(matches!(wrong_password, SpendwiseError::Auth(_)));
    }

    #[test]
    fn test_register_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AuthService::new(&storage);

        assert!(service.register("", "a@b", "secret1", false).unwrap_err().is_validation());
        assert!(service.register("Ana", "nope", "secret1", false).unwrap_err().is_validation());
        assert!(service.register("Ana", "a@b", "short", false).unwrap_err().is_validation());

        service.register("Ana", "a@b", "secret1", false).unwrap();
        assert!(matches!(
            service.register("Other", "A@B", "secret2", false),
            Err(SpendwiseError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_register_seeds_categories_and_audits_without_hash() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AuthService::new(&storage);

        let user = service.register("Ana", "a@b", "secret1", true).unwrap();
        assert!(!storage.categories.get_by_owner(user.id).unwrap().is_empty());

        let entries = storage.audit().read_all().unwrap();
        let after = entries[0].after.as_ref().unwrap();
        assert!(after.get("password_hash").is_none());
    }

    #[test]
    fn test_current_user() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AuthService::new(&storage);
        let user = service.register("Ana", "a@b", "secret1", false).unwrap();

        assert_eq!(service.current_user(Some(user.id)).unwrap().id, user.id);
        assert!(matches!(service.current_user(None), Err(SpendwiseError::Auth(_))));
        assert!(matches!(
            service.current_user(Some(UserId::new())),
            Err(SpendwiseError::Auth(_))
        ));
    }
}
