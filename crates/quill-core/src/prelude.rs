//! Quill prelude: the types a front end needs, in one import.
//!
//! ```rust,ignore
//! use quill_core::prelude::*;
//! ```

// ── Core types ─────────────────────────────────────────────────
pub use crate::config::{Config, LogFormat, PasswordMode};
pub use crate::error::{ErrorDetail, FieldErrors, QuillError};
pub use crate::pages::{App, Screen, Toast, ToastVariant, View};
pub use crate::routes::{Access, Route};

// ── Storage ────────────────────────────────────────────────────
pub use crate::storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use crate::store::RecordStore;

// ── Records & forms ────────────────────────────────────────────
pub use crate::models::{Post, PostStatus, Role, Topic, User};
pub use crate::validation::{
    LoginForm, PasswordChangeForm, PostForm, ProfileUpdateForm, SignupForm, TopicForm,
};
