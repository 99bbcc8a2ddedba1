use serde::Serialize;

use super::{App, Screen, Toast, View};
use crate::error::{ErrorDetail, QuillError};
use crate::models::{User, UserResponse};
use crate::routes::Route;
use crate::validation::{LoginForm, PasswordChangeForm, ProfileUpdateForm, SignupForm};

/// Login and signup pages: just the errors from the last submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthFormView {
    pub errors: Option<ErrorDetail>,
}

impl AuthFormView {
    fn failed(err: &QuillError) -> Self {
        AuthFormView {
            errors: Some(err.detail()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub user: UserResponse,
    pub profile_errors: Option<ErrorDetail>,
    pub password_errors: Option<ErrorDetail>,
}

impl App {
    pub(super) fn settings_page(&self, user: &User) -> View {
        View::Settings(SettingsView {
            user: user.into(),
            profile_errors: None,
            password_errors: None,
        })
    }

    pub fn login(&mut self, form: LoginForm) -> Screen {
        match self.auth.login(form) {
            Ok(user) => {
                self.toast(Toast::new(
                    "Login successful!",
                    format!("Welcome back, {}", user.name),
                ));
                Screen::Redirect(Route::Dashboard)
            }
            Err(err) => {
                if !matches!(err, QuillError::Validation(_)) {
                    self.report("Login failed", &err);
                }
                Screen::Render(View::Login(AuthFormView::failed(&err)))
            }
        }
    }

    pub fn signup(&mut self, form: SignupForm) -> Screen {
        match self.auth.signup(form) {
            Ok(user) => {
                self.toast(Toast::new(
                    "Account created!",
                    format!("Welcome to Quill, {}", user.name),
                ));
                Screen::Redirect(Route::Dashboard)
            }
            Err(err) => {
                if !matches!(err, QuillError::Validation(_)) {
                    self.report("Signup failed", &err);
                }
                Screen::Render(View::Signup(AuthFormView::failed(&err)))
            }
        }
    }

    pub fn logout(&mut self) -> Screen {
        if let Err(err) = self.auth.logout() {
            self.report("Logout failed", &err);
        }
        Screen::Redirect(Route::Login)
    }

    pub fn update_profile(&mut self, form: ProfileUpdateForm) -> Screen {
        let user = or_screen!(self.require_user());

        match self.auth.update_profile(&user, form) {
            Ok(updated) => {
                self.toast(Toast::new("Profile updated", "Your name has been updated."));
                Screen::Render(self.settings_page(&updated))
            }
            Err(err) => {
                if !matches!(err, QuillError::Validation(_)) {
                    self.report("Update failed", &err);
                }
                Screen::Render(View::Settings(SettingsView {
                    user: (&user).into(),
                    profile_errors: Some(err.detail()),
                    password_errors: None,
                }))
            }
        }
    }

    pub fn change_password(&mut self, form: PasswordChangeForm) -> Screen {
        let user = or_screen!(self.require_user());

        match self.auth.change_password(&user, form) {
            Ok(()) => {
                self.toast(Toast::new(
                    "Password changed",
                    "Your password has been updated.",
                ));
                Screen::Render(self.settings_page(&user))
            }
            Err(err) => {
                if !matches!(err, QuillError::Validation(_)) {
                    self.report("Update failed", &err);
                }
                Screen::Render(View::Settings(SettingsView {
                    user: (&user).into(),
                    profile_errors: None,
                    password_errors: Some(err.detail()),
                }))
            }
        }
    }
}
