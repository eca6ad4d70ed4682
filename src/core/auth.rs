//! Registration and authentication.
//!
//! Registration validates the submitted form, checks every unique field, and
//! then creates the user together with its role profile in one database
//! transaction. Passwords are stored as argon2 PHC strings and never compared
//! in plaintext.

use crate::{
    config::database::SINGLE_ADMIN_INDEX,
    core::session,
    entities::{Role, User, student, teacher, user},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{Set, SqlErr, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// Maximum address length accepted by the registration form.
pub const MAX_ADDRESS_LEN: usize = 200;
/// Accepted contact number lengths.
pub const CONTACT_LEN: std::ops::RangeInclusive<usize> = 10..=15;

/// Data submitted by the registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    /// Login email
    pub email: String,
    /// Display name
    pub username: String,
    /// Phone number
    pub contact: String,
    /// Postal address
    pub address: String,
    /// "Student", "Teacher" or "Admin"
    pub role: String,
    /// Chosen password
    pub password: String,
    /// Must repeat `password`
    pub confirm_password: String,
}

/// The role profile created alongside a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    /// A student row was created
    Student(student::Model),
    /// A teacher row was created
    Teacher(teacher::Model),
    /// Admins carry no profile
    Admin,
}

/// Where a freshly authenticated user should be sent.
#[must_use]
pub const fn landing_path(user: &user::Model) -> &'static str {
    if user.is_admin {
        "/admin/dashboard"
    } else {
        "/dashboard"
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Checks every field of the registration form that can be checked without
/// the database, returning the selected role.
pub fn validate_registration(form: &RegistrationForm) -> Result<Role> {
    let email = form.email.trim();
    if email.is_empty() {
        return Err(Error::validation("email", "Email is required."));
    }
    if !is_valid_email(email) {
        return Err(Error::validation("email", "Invalid email address."));
    }

    if form.username.trim().is_empty() {
        return Err(Error::validation("username", "Username is required."));
    }

    let contact_len = form.contact.trim().chars().count();
    if !CONTACT_LEN.contains(&contact_len) {
        return Err(Error::validation(
            "contact",
            "Contact must be between 10 and 15 characters long.",
        ));
    }

    let address = form.address.trim();
    if address.is_empty() {
        return Err(Error::validation("address", "Address is required."));
    }
    if address.chars().count() > MAX_ADDRESS_LEN {
        return Err(Error::validation(
            "address",
            "Address cannot be longer than 200 characters.",
        ));
    }

    let role = Role::parse(&form.role)
        .ok_or_else(|| Error::validation("role", "Invalid role selected!"))?;

    if form.password.is_empty() {
        return Err(Error::validation("password", "Password is required."));
    }
    if form.password != form.confirm_password {
        return Err(Error::validation("password", "Passwords must match."));
    }

    Ok(role)
}

/// Hashes a password with argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Verifies a password against a stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

async fn is_taken<C>(conn: &C, column: user::Column, value: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let count = User::find()
        .filter(column.eq(value))
        .count(conn)
        .await?;
    Ok(count > 0)
}

async fn ensure_unique<C>(conn: &C, email: &str, username: &str, contact: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    if is_taken(conn, user::Column::Email, email).await? {
        return Err(Error::duplicate("email", "Email is already in use!"));
    }
    if is_taken(conn, user::Column::Username, username).await? {
        return Err(Error::duplicate("username", "Username is already in use!"));
    }
    if is_taken(conn, user::Column::Contact, contact).await? {
        return Err(Error::duplicate(
            "contact",
            "Contact number is already in use!",
        ));
    }
    Ok(())
}

/// Maps a failed user insert. The single-admin index becomes
/// [`Error::AdminExists`]; other unique violations become a duplicate.
fn user_insert_error(err: DbErr) -> Error {
    if let Some(SqlErr::UniqueConstraintViolation(message)) = err.sql_err() {
        if message.contains(SINGLE_ADMIN_INDEX) || message.contains("users.is_admin") {
            warn!("Concurrent admin registration rejected by the database");
            return Error::AdminExists;
        }
    }
    Error::from_db_unique(err, "email", "An account with these details already exists.")
}

/// Registers a new account and its role profile.
///
/// # Errors
/// - [`Error::Validation`] for a missing or malformed field
/// - [`Error::Duplicate`] when email, username or contact is taken
/// - [`Error::AdminExists`] when registering a second admin
#[instrument(skip(db, form), fields(username = %form.username.trim(), role = %form.role))]
pub async fn register(
    db: &DatabaseConnection,
    form: &RegistrationForm,
) -> Result<(user::Model, Profile)> {
    let role = validate_registration(form)?;
    let email = form.email.trim();
    let username = form.username.trim();
    let contact = form.contact.trim();
    let password_hash = hash_password(&form.password)?;

    let txn = db.begin().await?;

    ensure_unique(&txn, email, username, contact).await?;

    if role == Role::Admin {
        let admins = User::find()
            .filter(user::Column::IsAdmin.eq(true))
            .count(&txn)
            .await?;
        if admins > 0 {
            warn!("Rejected registration of a second admin");
            return Err(Error::AdminExists);
        }
    }

    let new_user = user::ActiveModel {
        email: Set(email.to_string()),
        username: Set(username.to_string()),
        contact: Set(contact.to_string()),
        address: Set(form.address.trim().to_string()),
        password_hash: Set(password_hash),
        role: Set(role),
        is_admin: Set(role == Role::Admin),
        status: Set(false),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let user = new_user.insert(&txn).await.map_err(user_insert_error)?;

    let profile = match role {
        Role::Student => Profile::Student(
            student::ActiveModel {
                user_id: Set(user.id),
                department_id: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?,
        ),
        Role::Teacher => Profile::Teacher(
            teacher::ActiveModel {
                user_id: Set(user.id),
                speciality: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?,
        ),
        Role::Admin => Profile::Admin,
    };

    txn.commit().await?;

    info!(user_id = user.id, "Registered new user");
    Ok((user, profile))
}

/// Checks an email/password pair.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let Some(user) = User::find()
        .filter(user::Column::Email.eq(email.trim()))
        .one(db)
        .await?
    else {
        return Err(Error::InvalidCredentials);
    };

    if verify_password(password, &user.password_hash)? {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Authenticates and opens a new session for the user.
#[instrument(skip(db, password))]
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<(user::Model, crate::entities::SessionModel)> {
    let user = match authenticate(db, email, password).await {
        Ok(user) => user,
        Err(e) => {
            info!("Login rejected");
            return Err(e);
        }
    };
    let session = session::open_session(db, user.id).await?;
    info!(user_id = user.id, "User logged in");
    Ok((user, session))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Student, Teacher};
    use crate::test_utils::*;

    #[test]
    fn test_validate_registration_accepts_good_form() {
        let form = registration_form("ada@school.edu", "ada", "0300123456", "Student");
        assert_eq!(validate_registration(&form).unwrap(), Role::Student);
    }

    #[test]
    fn test_validate_registration_rejects_bad_fields() {
        let base = registration_form("ada@school.edu", "ada", "0300123456", "Student");

        let mut form = base.clone();
        form.email = "not-an-email".to_string();
        assert!(matches!(
            validate_registration(&form),
            Err(Error::Validation { field: "email", .. })
        ));

        let mut form = base.clone();
        form.contact = "12345".to_string();
        assert!(matches!(
            validate_registration(&form),
            Err(Error::Validation { field: "contact", .. })
        ));

        let mut form = base.clone();
        form.contact = "1234567890123456".to_string();
        assert!(matches!(
            validate_registration(&form),
            Err(Error::Validation { field: "contact", .. })
        ));

        let mut form = base.clone();
        form.address = "x".repeat(201);
        assert!(matches!(
            validate_registration(&form),
            Err(Error::Validation { field: "address", .. })
        ));

        let mut form = base.clone();
        form.role = "Janitor".to_string();
        assert!(matches!(
            validate_registration(&form),
            Err(Error::Validation { field: "role", .. })
        ));

        let mut form = base;
        form.confirm_password = "different".to_string();
        assert!(matches!(
            validate_registration(&form),
            Err(Error::Validation { field: "password", .. })
        ));
    }

    #[tokio::test]
    async fn test_register_invalid_form_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let mut form = registration_form("ada@school.edu", "ada", "0300123456", "Student");
        form.username = "   ".to_string();

        let result = register(&db, &form).await;
        assert!(matches!(
            result,
            Err(Error::Validation {
                field: "username",
                ..
            })
        ));
        assert_eq!(User::find().count(&db).await?, 0);
        assert_eq!(Student::find().count(&db).await?, 0);
        Ok(())
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter22").unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_creates_matching_profile() -> Result<()> {
        let db = setup_test_db().await?;

        let (student_user, profile) = register(
            &db,
            &registration_form("s@school.edu", "stu", "0300000001", "Student"),
        )
        .await?;
        assert_eq!(student_user.role, Role::Student);
        assert!(!student_user.is_admin);
        assert!(!student_user.status);
        assert!(matches!(profile, Profile::Student(ref s) if s.user_id == student_user.id));

        let (teacher_user, profile) = register(
            &db,
            &registration_form("t@school.edu", "tea", "0300000002", "Teacher"),
        )
        .await?;
        assert!(matches!(profile, Profile::Teacher(ref t) if t.user_id == teacher_user.id));

        // Exactly one profile each, of the right kind
        assert_eq!(Student::find().count(&db).await?, 1);
        assert_eq!(Teacher::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_second_admin_rejected_by_database() -> Result<()> {
        let db = setup_test_db().await?;
        register(
            &db,
            &registration_form("root@school.edu", "root", "0300000001", "Admin"),
        )
        .await?;

        // Bypass the count check, as a concurrent registration would
        let raw = user::ActiveModel {
            email: Set("root2@school.edu".to_string()),
            username: Set("root2".to_string()),
            contact: Set("0300000002".to_string()),
            address: Set("1 College Road".to_string()),
            password_hash: Set(hash_password(TEST_PASSWORD)?),
            role: Set(Role::Admin),
            is_admin: Set(true),
            status: Set(false),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&db)
        .await;

        assert!(matches!(
            user_insert_error(raw.unwrap_err()),
            Error::AdminExists
        ));
        assert_eq!(
            User::find()
                .filter(user::Column::IsAdmin.eq(true))
                .count(&db)
                .await?,
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_non_admins_are_not_limited() -> Result<()> {
        let db = setup_test_db().await?;
        for (i, role) in ["Student", "Teacher", "Student"].iter().enumerate() {
            register(
                &db,
                &registration_form(
                    &format!("u{i}@school.edu"),
                    &format!("u{i}"),
                    &format!("031000000{i}"),
                    role,
                ),
            )
            .await?;
        }
        assert_eq!(User::find().count(&db).await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_email_fails_second() -> Result<()> {
        let db = setup_test_db().await?;

        register(
            &db,
            &registration_form("same@school.edu", "first", "0300000001", "Student"),
        )
        .await?;
        let second = register(
            &db,
            &registration_form("same@school.edu", "second", "0300000002", "Teacher"),
        )
        .await;

        assert!(matches!(
            second,
            Err(Error::Duplicate { field: "email", .. })
        ));
        assert_eq!(User::find().count(&db).await?, 1);
        // The failed registration left no teacher profile behind
        assert_eq!(Teacher::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_username_and_contact() -> Result<()> {
        let db = setup_test_db().await?;
        register(
            &db,
            &registration_form("a@school.edu", "taken", "0300000001", "Student"),
        )
        .await?;

        let result = register(
            &db,
            &registration_form("b@school.edu", "taken", "0300000002", "Student"),
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::Duplicate {
                field: "username",
                ..
            })
        ));

        let result = register(
            &db,
            &registration_form("c@school.edu", "fresh", "0300000001", "Student"),
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::Duplicate {
                field: "contact",
                ..
            })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_only_one_admin() -> Result<()> {
        let db = setup_test_db().await?;

        let (admin, profile) = register(
            &db,
            &registration_form("root@school.edu", "root", "0300000009", "Admin"),
        )
        .await?;
        assert!(admin.is_admin);
        assert_eq!(profile, Profile::Admin);

        let second = register(
            &db,
            &registration_form("root2@school.edu", "root2", "0300000008", "Admin"),
        )
        .await;
        assert!(matches!(second, Err(Error::AdminExists)));

        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_password() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "ada@school.edu", Role::Student).await?;

        let wrong = authenticate(&db, "ada@school.edu", "wrong-password").await;
        assert!(matches!(wrong, Err(Error::InvalidCredentials)));

        let unknown = authenticate(&db, "nobody@school.edu", TEST_PASSWORD).await;
        assert!(matches!(unknown, Err(Error::InvalidCredentials)));

        let ok = authenticate(&db, "ada@school.edu", TEST_PASSWORD).await?;
        assert_eq!(ok.email, "ada@school.edu");

        Ok(())
    }

    #[tokio::test]
    async fn test_login_lands_by_role() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "root@school.edu", Role::Admin).await?;
        create_test_user(&db, "stu@school.edu", Role::Student).await?;

        let (admin, session) = login(&db, "root@school.edu", TEST_PASSWORD).await?;
        assert_eq!(landing_path(&admin), "/admin/dashboard");
        assert_eq!(session.user_id, admin.id);

        let (student, _) = login(&db, "stu@school.edu", TEST_PASSWORD).await?;
        assert_eq!(landing_path(&student), "/dashboard");

        Ok(())
    }
}
