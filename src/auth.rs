//! Login stub.
//!
//! There is no credential check: any non-empty identifier and secret log in.
//! Being logged in is a single flag in local storage.

use tracing::info;

use crate::storage::{AUTH_KEY, Storage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("identifier and secret are both required")]
    MissingCredentials,

    #[error("not logged in: run `obra login` first")]
    NotAuthenticated,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Logs in with any pair of non-empty credentials.
pub fn login(storage: &Storage, identifier: &str, secret: &str) -> Result<(), AuthError> {
    if identifier.is_empty() || secret.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    storage.set(AUTH_KEY, "true")?;
    info!(identifier, "logged in");
    Ok(())
}

pub fn logout(storage: &Storage) -> Result<(), AuthError> {
    storage.remove(AUTH_KEY)?;
    info!("logged out");
    Ok(())
}

pub fn is_authenticated(storage: &Storage) -> Result<bool, AuthError> {
    Ok(storage.get(AUTH_KEY)?.as_deref() == Some("true"))
}

/// Fails with [`AuthError::NotAuthenticated`] unless logged in.
pub fn require_login(storage: &Storage) -> Result<(), AuthError> {
    if is_authenticated(storage)? {
        Ok(())
    } else {
        Err(AuthError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data")).unwrap();
        (dir, storage)
    }

    #[test]
    fn starts_logged_out() {
        let (_dir, storage) = test_storage();
        assert!(!is_authenticated(&storage).unwrap());
        assert!(matches!(
            require_login(&storage).unwrap_err(),
            AuthError::NotAuthenticated
        ));
    }

    #[test]
    fn any_non_empty_credentials_log_in() {
        let (_dir, storage) = test_storage();
        login(&storage, "site@example.com", "x").unwrap();

        assert!(is_authenticated(&storage).unwrap());
        assert_eq!(storage.get(AUTH_KEY).unwrap().as_deref(), Some("true"));
        require_login(&storage).unwrap();
    }

    #[test]
    fn empty_credentials_are_refused() {
        let (_dir, storage) = test_storage();
        for (id, secret) in [("", "pw"), ("me", ""), ("", "")] {
            let err = login(&storage, id, secret).unwrap_err();
            assert!(matches!(err, AuthError::MissingCredentials));
        }
        assert!(!is_authenticated(&storage).unwrap());
    }

    #[test]
    fn logout_clears_the_flag() {
        let (_dir, storage) = test_storage();
        login(&storage, "me", "pw").unwrap();
        logout(&storage).unwrap();

        assert!(!is_authenticated(&storage).unwrap());
        assert!(storage.get(AUTH_KEY).unwrap().is_none());
    }

    #[test]
    fn only_the_exact_flag_counts() {
        let (_dir, storage) = test_storage();
        storage.set(AUTH_KEY, "yes").unwrap();
        assert!(!is_authenticated(&storage).unwrap());
    }
}
