use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::auth::CredentialHasher;
use crate::domain::{User, UserDraft, UserInput};
use crate::errors::{AuthFailure, ServiceError};
use crate::storage::UserStore;

/// User CRUD plus login.
///
/// Passwords are hashed before they reach the store. Email uniqueness is the
/// store's job: `create`/`update` surface [`ServiceError::DuplicateEmail`]
/// straight from the store's single write, with no lookup beforehand.
pub struct UserService<S: ?Sized> {
    store: Arc<S>,
    hasher: CredentialHasher,
}

impl<S> UserService<S>
where
    S: UserStore + ?Sized,
{
    pub fn new(store: Arc<S>, hasher: CredentialHasher) -> Self { Self { store, hasher } }

    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.get_all().await?)
    }

    pub async fn get(&self, id: i64) -> Result<User, ServiceError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.store.find_by_email(email).await?)
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::{auth::CredentialHasher, domain::UserInput, file::FileUserStore, user_service::UserService};
    /// let path = std::env::temp_dir().join(format!("doc_users_{}.json", uuid::Uuid::new_v4()));
    /// tokio_test::block_on(async {
    ///     let store = FileUserStore::new(&path).await.unwrap();
    ///     let svc = UserService::new(store, CredentialHasher::new(8, 1, 1).unwrap());
    ///     let user = svc.create(UserInput { email: "user@example.com".into(), password: "p".into() }).await.unwrap();
    ///     assert_eq!(user.email, "user@example.com");
    ///     assert!(svc.create(UserInput { email: "user@example.com".into(), password: "q".into() }).await.is_err());
    /// });
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: UserInput) -> Result<User, ServiceError> {
        let password_hash = self.hasher.hash_blocking(input.password).await?;
        let user = self
            .store
            .create(UserDraft { email: input.email, password_hash })
            .await
            .map_err(|e| {
                debug!(error = %e, "user create rejected");
                ServiceError::from(e)
            })?;
        info!(user_id = user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Check a claimed password against the stored hash for `email`.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let Some(user) = self.store.find_by_email(email).await? else {
            warn!("login for unknown email");
            return Err(AuthFailure::UserNotFound.into());
        };

        let ok = self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await?;
        if !ok {
            warn!(user_id = user.id, "login with wrong password");
            return Err(AuthFailure::WrongPassword.into());
        }

        info!(user_id = user.id, "user_authenticated");
        Ok(user)
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn update(&self, id: i64, input: UserInput) -> Result<User, ServiceError> {
        let password_hash = self.hasher.hash_blocking(input.password).await?;
        let user = self
            .store
            .update(id, UserDraft { email: input.email, password_hash })
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))?;
        info!(user_id = id, "user_updated");
        Ok(user)
    }

    /// Delete by id; returns whether a record was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let existed = self.store.delete(id).await?;
        if existed {
            info!(user_id = id, "user_deleted");
        } else {
            debug!(user_id = id, "delete of absent user");
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileUserStore;
    use crate::test_support::{fast_hasher, temp_table_path};

    fn input(email: &str, password: &str) -> UserInput {
        UserInput { email: email.into(), password: password.into() }
    }

    async fn service(tag: &str) -> Result<(UserService<FileUserStore>, std::path::PathBuf), anyhow::Error> {
        let tmp = temp_table_path(tag);
        let store = FileUserStore::new(&tmp).await?;
        Ok((UserService::new(store, fast_hasher()), tmp))
    }

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        let (svc, tmp) = service("svc_users").await?;

        let u = svc.create(input("a@x.com", "p")).await?;
        assert_eq!(u.email, "a@x.com");
        // stored hashed, never verbatim
        assert_ne!(u.password_hash, "p");
        assert_eq!(svc.get(u.id).await?, u);

        let dup = svc.create(input("a@x.com", "q")).await;
        assert!(matches!(dup, Err(ServiceError::DuplicateEmail)));
        assert_eq!(svc.list().await?.len(), 1);

        let updated = svc.update(u.id, input("b@x.com", "p2")).await?;
        assert_eq!(updated.email, "b@x.com");
        assert!(svc.find_by_email("a@x.com").await?.is_none());
        assert!(matches!(svc.update(u.id + 1, input("c@x.com", "p")).await, Err(ServiceError::NotFound(_))));

        assert!(svc.delete(u.id).await?);
        assert!(matches!(svc.get(u.id).await, Err(ServiceError::NotFound(_))));
        assert!(!svc.delete(u.id).await?);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn long_email_round_trips() -> Result<(), anyhow::Error> {
        let (svc, tmp) = service("svc_long_email").await?;
        let email = format!("{}@x.com", "l".repeat(300));
        let u = svc.create(input(&email, "p")).await?;
        assert_eq!(svc.authenticate(&email, "p").await?.id, u.id);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn authenticate_outcomes() -> Result<(), anyhow::Error> {
        let (svc, tmp) = service("svc_login").await?;
        let u = svc.create(input("a@x.com", "p")).await?;

        let ok = svc.authenticate("a@x.com", "p").await?;
        assert_eq!(ok.id, u.id);

        let wrong = svc.authenticate("a@x.com", "wrong").await;
        assert!(matches!(wrong, Err(ServiceError::Unauthorized(AuthFailure::WrongPassword))));

        let missing = svc.authenticate("nobody@x.com", "p").await;
        assert!(matches!(missing, Err(ServiceError::Unauthorized(AuthFailure::UserNotFound))));

        // the new password takes effect after an update
        svc.update(u.id, input("a@x.com", "p2")).await?;
        assert!(svc.authenticate("a@x.com", "p").await.is_err());
        assert!(svc.authenticate("a@x.com", "p2").await.is_ok());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
