//! Login sessions and the request principal.
//!
//! A session is a random key stored in the database and handed to the browser
//! in a cookie. Resolving the key yields a [`Principal`], the authenticated
//! user carried explicitly through each request.

use crate::{
    entities::{Role, Session, User, session, user},
    errors::{Error, Result},
};
use rand::{Rng, distributions::Alphanumeric};
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// Length of generated session keys.
pub const SESSION_KEY_LEN: usize = 32;
/// Lifetime of a session from login.
pub const SESSION_TTL_HOURS: i64 = 12;

/// The authenticated user attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// User primary key
    pub user_id: i64,
    /// Display name
    pub username: String,
    /// Account role
    pub role: Role,
    /// Admin flag
    pub is_admin: bool,
    /// Session key the principal was resolved from
    pub session_key: String,
}

impl Principal {
    /// Builds a principal from a user row and the session key that named it.
    #[must_use]
    pub fn from_user(user: &user::Model, session_key: String) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            is_admin: user.is_admin,
            session_key,
        }
    }

    /// Fails with [`Error::Forbidden`] unless the principal is an admin.
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(Error::Forbidden)
        }
    }
}

fn generate_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_KEY_LEN)
        .map(char::from)
        .collect()
}

/// Deletes every session whose expiry has passed.
pub async fn prune_expired(db: &DatabaseConnection) -> Result<u64> {
    let result = Session::delete_many()
        .filter(session::Column::ExpiresAt.lte(chrono::Utc::now().naive_utc()))
        .exec(db)
        .await?;
    if result.rows_affected > 0 {
        debug!(removed = result.rows_affected, "Pruned expired sessions");
    }
    Ok(result.rows_affected)
}

/// Creates a new session for `user_id`, valid for [`SESSION_TTL_HOURS`].
///
/// Expired sessions of every user are pruned first.
pub async fn open_session(db: &DatabaseConnection, user_id: i64) -> Result<session::Model> {
    prune_expired(db).await?;
    let now = chrono::Utc::now().naive_utc();
    let session = session::ActiveModel {
        key: Set(generate_key()),
        user_id: Set(user_id),
        created_at: Set(now),
        expires_at: Set(now + chrono::Duration::hours(SESSION_TTL_HOURS)),
        ..Default::default()
    };
    session.insert(db).await.map_err(Into::into)
}

/// Resolves a session key to its principal.
///
/// Returns `None` for unknown keys, expired sessions and sessions whose user
/// no longer exists. An expired session is deleted on sight.
pub async fn resolve_principal(db: &DatabaseConnection, key: &str) -> Result<Option<Principal>> {
    let Some(session) = Session::find()
        .filter(session::Column::Key.eq(key))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if session.expires_at <= chrono::Utc::now().naive_utc() {
        Session::delete_by_id(session.id).exec(db).await?;
        debug!(user_id = session.user_id, "Session expired");
        return Ok(None);
    }

    let user = User::find_by_id(session.user_id).one(db).await?;
    Ok(user.map(|u| Principal::from_user(&u, session.key)))
}

/// Deletes the session with `key`. Unknown keys are ignored.
pub async fn close_session(db: &DatabaseConnection, key: &str) -> Result<()> {
    Session::delete_many()
        .filter(session::Column::Key.eq(key))
        .exec(db)
        .await?;
    Ok(())
}

/// Deletes every session belonging to `user_id`.
pub(crate) async fn close_user_sessions<C>(conn: &C, user_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Session::delete_many()
        .filter(session::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_generated_keys_are_random_alphanumeric() {
        let a = generate_key();
        let b = generate_key();
        assert_eq!(a.len(), SESSION_KEY_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_open_resolve_close() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ada@school.edu", Role::Teacher).await?;

        let session = open_session(&db, user.id).await?;
        let principal = resolve_principal(&db, &session.key).await?.unwrap();
        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.role, Role::Teacher);
        assert!(!principal.is_admin);
        assert!(matches!(principal.require_admin(), Err(Error::Forbidden)));

        close_session(&db, &session.key).await?;
        assert!(resolve_principal(&db, &session.key).await?.is_none());

        Ok(())
    }

    async fn age_session(db: &DatabaseConnection, model: session::Model) -> Result<()> {
        let mut active: session::ActiveModel = model.into();
        active.expires_at = Set(chrono::Utc::now().naive_utc() - chrono::Duration::minutes(1));
        active.update(db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_key_resolves_to_none() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ada@school.edu", Role::Student).await?;
        let session = open_session(&db, user.id).await?;
        assert!(session.expires_at > session.created_at);

        let key = session.key.clone();
        age_session(&db, session).await?;

        assert!(resolve_principal(&db, &key).await?.is_none());
        // The expired row is gone
        assert_eq!(Session::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_login_prunes_expired_sessions() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ada@school.edu", Role::Student).await?;
        let old = open_session(&db, user.id).await?;
        age_session(&db, old).await?;

        let fresh = open_session(&db, user.id).await?;
        let remaining = Session::find().all(&db).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].key, fresh.key);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_key_resolves_to_none() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(resolve_principal(&db, "missing").await?.is_none());
        // Closing an unknown session is not an error
        close_session(&db, "missing").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_principal_passes_gate() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_user(&db, "root@school.edu", Role::Admin).await?;
        let session = open_session(&db, admin.id).await?;

        let principal = resolve_principal(&db, &session.key).await?.unwrap();
        assert!(principal.require_admin().is_ok());
        Ok(())
    }
}
