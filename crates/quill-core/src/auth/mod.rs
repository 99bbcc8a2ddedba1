//! Auth shim: a single "current user" record plus the demo login flow.
//!
//! This is a demo mechanism, not a security boundary. In
//! [`PasswordMode::Demo`] every account accepts [`DEMO_PASSWORD`].

pub mod password;
pub mod session;

pub use password::{DEMO_PASSWORD, hash_password, password_matches, verify_password};
pub use session::{get_stored_user, logout, set_stored_user};

use chrono::Utc;

use crate::config::PasswordMode;
use crate::error::{FieldErrors, QuillError};
use crate::models::{Role, User, UserPatch};
use crate::store::{RecordStore, next_id};
use crate::validation::{self, LoginForm, PasswordChangeForm, ProfileUpdateForm, SignupForm};

pub const UNKNOWN_EMAIL: &str = "No account found with this email address.";
pub const WRONG_DEMO_PASSWORD: &str = "Incorrect password. Use 'password' for demo.";
pub const WRONG_PASSWORD: &str = "Incorrect password.";
pub const EMAIL_TAKEN: &str = "An account with this email already exists.";

/// Login, signup and account maintenance over a [`RecordStore`].
#[derive(Clone)]
pub struct AuthService {
    store: RecordStore,
    mode: PasswordMode,
}

impl AuthService {
    pub fn new(store: RecordStore, mode: PasswordMode) -> Self {
        AuthService { store, mode }
    }

    pub fn mode(&self) -> PasswordMode {
        self.mode
    }

    pub fn current_user(&self) -> Option<User> {
        get_stored_user(&self.store)
    }

    /// Validate the form, look the email up, check the password, and store
    /// the user as current.
    pub fn login(&self, form: LoginForm) -> Result<User, QuillError> {
        let form = validation::check(form)?;

        let Some(user) = self.store.user_by_email(&form.email) else {
            tracing::info!(email = %form.email, "login rejected: unknown email");
            return Err(QuillError::Unauthorized(UNKNOWN_EMAIL.to_string()));
        };

        if !password_matches(self.mode, &user, &form.password)? {
            tracing::info!(user_id = %user.id, "login rejected: wrong password");
            let message = match self.mode {
                PasswordMode::Demo => WRONG_DEMO_PASSWORD,
                PasswordMode::Hashed => WRONG_PASSWORD,
            };
            return Err(QuillError::Unauthorized(message.to_string()));
        }

        set_stored_user(&self.store, Some(&user))?;
        tracing::info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    /// Create a `USER` account and log it in. Emails are unique by lookup.
    pub fn signup(&self, form: SignupForm) -> Result<User, QuillError> {
        let form = validation::check(form)?;

        if self.store.user_by_email(&form.email).is_some() {
            return Err(QuillError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let user = User {
            id: next_id(),
            name: form.name,
            email: form.email,
            role: Role::User,
            password_hash: Some(hash_password(&form.password)?),
            created_at: Some(Utc::now()),
        };

        self.store.add_user(user.clone())?;
        set_stored_user(&self.store, Some(&user))?;
        tracing::info!(user_id = %user.id, "signed up");
        Ok(user)
    }

    /// Rename the current user in both the users collection and the auth key.
    pub fn update_profile(&self, user: &User, form: ProfileUpdateForm) -> Result<User, QuillError> {
        let form = validation::check(form)?;

        let patch = UserPatch {
            name: Some(form.name),
            ..UserPatch::default()
        };
        let updated = self
            .store
            .update_user(&user.id, patch)?
            .ok_or_else(|| QuillError::NotFound("Your account no longer exists.".to_string()))?;

        set_stored_user(&self.store, Some(&updated))?;
        Ok(updated)
    }

    /// Verify the current password under the active mode and store a new hash.
    pub fn change_password(&self, user: &User, form: PasswordChangeForm) -> Result<(), QuillError> {
        let form = validation::check(form)?;

        let stored = self
            .store
            .user_by_id(&user.id)
            .ok_or_else(|| QuillError::NotFound("Your account no longer exists.".to_string()))?;

        if !password_matches(self.mode, &stored, &form.current_password)? {
            let mut fields = FieldErrors::new();
            fields.insert(
                "current_password".to_string(),
                "Current password is incorrect".to_string(),
            );
            return Err(QuillError::Validation(fields));
        }

        let patch = UserPatch {
            password_hash: Some(hash_password(&form.new_password)?),
            ..UserPatch::default()
        };
        self.store.update_user(&stored.id, patch)?;
        tracing::info!(user_id = %stored.id, "password changed");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), QuillError> {
        logout(&self.store)
    }
}
