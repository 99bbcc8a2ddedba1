//! Form schemas and their field rules.
//!
//! Each form trims its free-text fields (never passwords) and is then checked
//! with `validator`. Failures come back as a [`FieldErrors`] map holding the
//! first message per field.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::error::{FieldErrors, QuillError};
use crate::models::{Post, PostStatus};

/// A submitted form: normalized, then validated.
pub trait Form: Validate + Sized {
    /// Trim free-text fields and turn blank optionals into `None`.
    fn normalize(self) -> Self;
}

/// Normalize and validate `form`, returning it ready for use.
pub fn check<F: Form>(form: F) -> Result<F, QuillError> {
    let form = form.normalize();
    form.validate()
        .map_err(|errors| QuillError::Validation(field_errors(&errors)))?;
    Ok(form)
}

/// Flatten validator output into field → first message.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect()
}

fn trim(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value.map(trim).filter(|v| !v.is_empty())
}

// ── Length rules ──
//
// One rule per field so the "too short" and "too long" messages can differ.

fn bounded(
    value: &str,
    min: usize,
    max: usize,
    too_short: &'static str,
    too_long: &'static str,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new("length").with_message(Cow::Borrowed(too_short)));
    }
    if len > max {
        return Err(ValidationError::new("length").with_message(Cow::Borrowed(too_long)));
    }
    Ok(())
}

macro_rules! length_rule {
    ($name:ident, $min:expr, $max:expr, $too_short:expr, $too_long:expr) => {
        fn $name(value: &str) -> Result<(), ValidationError> {
            bounded(value, $min, $max, $too_short, $too_long)
        }
    };
}

const PASSWORD_TOO_LONG: &str = "Password must be less than 100 characters";

length_rule!(
    name_length,
    2,
    100,
    "Name must be at least 2 characters",
    "Name must be less than 100 characters"
);
const INVALID_EMAIL: &str = "Please enter a valid email address";
const EMAIL_MAX_CHARS: usize = 255;

/// Length first, so an over-long address gets its own message rather than
/// the format one.
fn email_address(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > EMAIL_MAX_CHARS {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Email must be less than 255 characters")));
    }
    if !value.validate_email() {
        return Err(ValidationError::new("email").with_message(Cow::Borrowed(INVALID_EMAIL)));
    }
    Ok(())
}
length_rule!(
    signup_password_length,
    6,
    100,
    "Password must be at least 6 characters",
    PASSWORD_TOO_LONG
);
length_rule!(
    login_password_length,
    1,
    100,
    "Password is required",
    PASSWORD_TOO_LONG
);
length_rule!(
    title_length,
    3,
    200,
    "Title must be at least 3 characters",
    "Title must be less than 200 characters"
);
length_rule!(
    excerpt_length,
    10,
    500,
    "Excerpt must be at least 10 characters",
    "Excerpt must be less than 500 characters"
);
length_rule!(
    content_length,
    50,
    50_000,
    "Content must be at least 50 characters",
    "Content must be less than 50,000 characters"
);
length_rule!(
    current_password_length,
    1,
    100,
    "Current password is required",
    PASSWORD_TOO_LONG
);
length_rule!(
    new_password_length,
    6,
    100,
    "New password must be at least 6 characters",
    PASSWORD_TOO_LONG
);
length_rule!(
    confirm_password_length,
    1,
    100,
    "Please confirm your new password",
    PASSWORD_TOO_LONG
);
length_rule!(
    topic_name_length,
    2,
    50,
    "Topic name must be at least 2 characters",
    "Topic name must be less than 50 characters"
);

// ── Forms ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(custom(function = "name_length"))]
    pub name: String,

    #[validate(custom(function = "email_address"))]
    pub email: String,

    #[validate(custom(function = "signup_password_length"))]
    pub password: String,
}

impl Form for SignupForm {
    fn normalize(self) -> Self {
        SignupForm {
            name: trim(self.name),
            email: trim(self.email),
            password: self.password,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "email_address"))]
    pub email: String,

    #[validate(custom(function = "login_password_length"))]
    pub password: String,
}

impl Form for LoginForm {
    fn normalize(self) -> Self {
        LoginForm {
            email: trim(self.email),
            password: self.password,
        }
    }
}

/// Create/edit post form. `image_url` accepts http(s) and `data:` URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[validate(custom(function = "title_length"))]
    pub title: String,

    #[validate(custom(function = "excerpt_length"))]
    pub excerpt: String,

    #[validate(custom(function = "content_length"))]
    pub content: String,

    #[validate(url(message = "Please enter a valid URL"))]
    pub image_url: Option<String>,

    pub topic_id: Option<String>,

    #[serde(default)]
    pub status: PostStatus,
}

impl Form for PostForm {
    fn normalize(self) -> Self {
        PostForm {
            title: trim(self.title),
            excerpt: trim(self.excerpt),
            content: trim(self.content),
            image_url: trim_optional(self.image_url),
            topic_id: trim_optional(self.topic_id),
            status: self.status,
        }
    }
}

/// Prefill for the edit page.
impl From<&Post> for PostForm {
    fn from(post: &Post) -> Self {
        PostForm {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            image_url: post.image_url.clone(),
            topic_id: post.topic_id.clone(),
            status: post.status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProfileUpdateForm {
    #[validate(custom(function = "name_length"))]
    pub name: String,
}

impl Form for ProfileUpdateForm {
    fn normalize(self) -> Self {
        ProfileUpdateForm {
            name: trim(self.name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PasswordChangeForm {
    #[validate(custom(function = "current_password_length"))]
    pub current_password: String,

    #[validate(custom(function = "new_password_length"))]
    pub new_password: String,

    #[validate(custom(function = "confirm_password_length"))]
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl Form for PasswordChangeForm {
    fn normalize(self) -> Self {
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TopicForm {
    #[validate(custom(function = "topic_name_length"))]
    pub name: String,
}

impl Form for TopicForm {
    fn normalize(self) -> Self {
        TopicForm {
            name: trim(self.name),
        }
    }
}
