//! Record store: Post, User and Topic collections kept as JSON arrays in a
//! [`KeyValueStore`].
//!
//! Every accessor round-trips the whole collection. There is no index, no
//! pagination and no cross-collection transaction; a missing or corrupt value
//! reads as an empty collection.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::QuillError;
use crate::models::{Post, PostPatch, Topic, TopicPatch, User, UserPatch};
use crate::storage::{KeyValueStore, MemoryStorage};

pub const AUTH_KEY: &str = "blog_auth_user";
pub const POSTS_KEY: &str = "blog_posts";
pub const USERS_KEY: &str = "blog_users";
pub const TOPICS_KEY: &str = "blog_topics";

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Timestamp-based record id: milliseconds since the Unix epoch.
///
/// Monotonic within the process, so two records created in the same
/// millisecond still get distinct ids.
pub fn next_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return candidate.to_string(),
            Err(actual) => last = actual,
        }
    }
}

/// Collection accessor over a shared key-value backend.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        RecordStore {
            backend: Arc::new(backend),
        }
    }

    pub fn from_shared(backend: Arc<dyn KeyValueStore>) -> Self {
        RecordStore { backend }
    }

    /// Store over a fresh [`MemoryStorage`].
    pub fn in_memory() -> Self {
        RecordStore::new(MemoryStorage::new())
    }

    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    // ── Raw JSON values ──

    /// Read and decode a single value. Missing, unreadable, or corrupt values
    /// come back as `None`.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed, treating as missing");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "corrupt stored value, treating as missing");
                None
            }
        }
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), QuillError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set_item(key, &raw)
    }

    pub fn remove(&self, key: &str) -> Result<(), QuillError> {
        self.backend.remove_item(key)
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let records: Vec<T> = self.read_json(key).unwrap_or_default();
        tracing::debug!(key, count = records.len(), "read collection");
        records
    }

    fn write_collection<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), QuillError> {
        tracing::debug!(key, count = records.len(), "write collection");
        self.write_json(key, records)
    }

    /// True when no posts, users or topics are stored.
    pub fn is_empty(&self) -> bool {
        self.posts().is_empty() && self.users().is_empty() && self.topics().is_empty()
    }

    /// Remove all four storage keys.
    pub fn clear(&self) -> Result<(), QuillError> {
        for key in [AUTH_KEY, POSTS_KEY, USERS_KEY, TOPICS_KEY] {
            self.backend.remove_item(key)?;
        }
        Ok(())
    }

    // ── Posts ──

    pub fn posts(&self) -> Vec<Post> {
        self.read_collection(POSTS_KEY)
    }

    pub fn set_posts(&self, posts: &[Post]) -> Result<(), QuillError> {
        self.write_collection(POSTS_KEY, posts)
    }

    pub fn add_post(&self, post: Post) -> Result<(), QuillError> {
        let mut posts = self.posts();
        posts.push(post);
        self.set_posts(&posts)
    }

    /// Merge `patch` into the post with `id` and refresh `updated_at`.
    ///
    /// Returns the updated post, or `None` (and writes nothing) for an unknown id.
    pub fn update_post(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, QuillError> {
        let mut posts = self.posts();
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        patch.apply(post);
        post.updated_at = Utc::now();
        let updated = post.clone();

        self.set_posts(&posts)?;
        Ok(Some(updated))
    }

    /// Remove every post with `id`. Returns whether anything was removed.
    pub fn delete_post(&self, id: &str) -> Result<bool, QuillError> {
        let posts = self.posts();
        let before = posts.len();
        let remaining: Vec<Post> = posts.into_iter().filter(|p| p.id != id).collect();
        let removed = remaining.len() != before;
        self.set_posts(&remaining)?;
        Ok(removed)
    }

    pub fn post_by_id(&self, id: &str) -> Option<Post> {
        self.posts().into_iter().find(|p| p.id == id)
    }

    /// First post with `slug`. Slugs are not unique; earlier posts win.
    pub fn post_by_slug(&self, slug: &str) -> Option<Post> {
        self.posts().into_iter().find(|p| p.slug == slug)
    }

    /// First published post with `slug`, skipping drafts that share it.
    pub fn published_post_by_slug(&self, slug: &str) -> Option<Post> {
        self.posts()
            .into_iter()
            .find(|p| p.slug == slug && p.is_published())
    }

    // ── Users ──

    pub fn users(&self) -> Vec<User> {
        self.read_collection(USERS_KEY)
    }

    pub fn set_users(&self, users: &[User]) -> Result<(), QuillError> {
        self.write_collection(USERS_KEY, users)
    }

    pub fn add_user(&self, user: User) -> Result<(), QuillError> {
        let mut users = self.users();
        users.push(user);
        self.set_users(&users)
    }

    pub fn update_user(&self, id: &str, patch: UserPatch) -> Result<Option<User>, QuillError> {
        let mut users = self.users();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        patch.apply(user);
        let updated = user.clone();

        self.set_users(&users)?;
        Ok(Some(updated))
    }

    pub fn delete_user(&self, id: &str) -> Result<bool, QuillError> {
        let users = self.users();
        let before = users.len();
        let remaining: Vec<User> = users.into_iter().filter(|u| u.id != id).collect();
        let removed = remaining.len() != before;
        self.set_users(&remaining)?;
        Ok(removed)
    }

    pub fn user_by_id(&self, id: &str) -> Option<User> {
        self.users().into_iter().find(|u| u.id == id)
    }

    /// Email lookup, ignoring ASCII case and surrounding whitespace.
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.users()
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    // ── Topics ──

    pub fn topics(&self) -> Vec<Topic> {
        self.read_collection(TOPICS_KEY)
    }

    pub fn set_topics(&self, topics: &[Topic]) -> Result<(), QuillError> {
        self.write_collection(TOPICS_KEY, topics)
    }

    pub fn add_topic(&self, topic: Topic) -> Result<(), QuillError> {
        let mut topics = self.topics();
        topics.push(topic);
        self.set_topics(&topics)
    }

    pub fn update_topic(&self, id: &str, patch: TopicPatch) -> Result<Option<Topic>, QuillError> {
        let mut topics = self.topics();
        let Some(topic) = topics.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        patch.apply(topic);
        let updated = topic.clone();

        self.set_topics(&topics)?;
        Ok(Some(updated))
    }

    /// Remove the topic only. Posts keep their (now dangling) `topic_id`.
    pub fn delete_topic(&self, id: &str) -> Result<bool, QuillError> {
        let topics = self.topics();
        let before = topics.len();
        let remaining: Vec<Topic> = topics.into_iter().filter(|t| t.id != id).collect();
        let removed = remaining.len() != before;
        self.set_topics(&remaining)?;
        Ok(removed)
    }

    pub fn topic_by_id(&self, id: &str) -> Option<Topic> {
        self.topics().into_iter().find(|t| t.id == id)
    }

    pub fn topic_by_slug(&self, slug: &str) -> Option<Topic> {
        self.topics().into_iter().find(|t| t.slug == slug)
    }
}
