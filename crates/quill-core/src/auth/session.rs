use crate::error::QuillError;
use crate::models::User;
use crate::store::{AUTH_KEY, RecordStore};

/// Read the current user from the auth key. Corrupt values read as logged out.
pub fn get_stored_user(store: &RecordStore) -> Option<User> {
    store.read_json(AUTH_KEY)
}

/// Store `user` as the current user, or clear the key for `None`.
///
/// The password hash is never written under the auth key.
pub fn set_stored_user(store: &RecordStore, user: Option<&User>) -> Result<(), QuillError> {
    match user {
        Some(user) => store.write_json(AUTH_KEY, &user.without_secret()),
        None => store.remove(AUTH_KEY),
    }
}

/// Forget the current user.
pub fn logout(store: &RecordStore) -> Result<(), QuillError> {
    if let Some(user) = get_stored_user(store) {
        tracing::info!(user_id = %user.id, "logged out");
    }
    set_stored_user(store, None)
}
