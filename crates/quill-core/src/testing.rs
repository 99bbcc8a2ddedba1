use chrono::{DateTime, Utc};

use crate::auth::DEMO_PASSWORD;
use crate::config::Config;
use crate::models::{Post, PostStatus, Role, Topic, User};
use crate::pages::{App, Screen};
use crate::slug::slugify;
use crate::storage::MemoryStorage;
use crate::store::{RecordStore, next_id};
use crate::validation::LoginForm;

/// A test application over in-memory storage.
///
/// Starts empty (no demo data) in demo password mode. Fixtures are written
/// straight to the store so tests only pay for argon2 when they ask for it.
///
/// ```rust,ignore
/// let mut t = TestApp::new();
/// let jane = t.user("Jane", "jane@example.com", Role::User);
/// t.login_as(&jane);
/// assert!(t.app.visit("/dashboard").view().is_some());
/// ```
pub struct TestApp {
    pub app: App,
    pub storage: MemoryStorage,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::for_tests())
    }

    /// A test app with the demo users, topics and posts installed.
    pub fn seeded() -> Self {
        Self::with_config(Config {
            seed_demo_data: true,
            ..Config::for_tests()
        })
    }

    /// Create a test app with custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if seeding the in-memory store fails.
    pub fn with_config(config: Config) -> Self {
        let storage = MemoryStorage::new();
        let store = RecordStore::new(storage.clone());
        let app = App::new(store, config).expect("in-memory app should build");
        TestApp { app, storage }
    }

    pub fn store(&self) -> &RecordStore {
        self.app.store()
    }

    /// Insert a user with no password hash.
    pub fn user(&self, name: &str, email: &str, role: Role) -> User {
        let user = User {
            id: next_id(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            password_hash: None,
            created_at: Some(Utc::now()),
        };
        self.store()
            .add_user(user.clone())
            .expect("add user to in-memory store");
        user
    }

    pub fn topic(&self, name: &str) -> Topic {
        let topic = Topic {
            id: next_id(),
            name: name.to_string(),
            slug: slugify(name),
        };
        self.store()
            .add_topic(topic.clone())
            .expect("add topic to in-memory store");
        topic
    }

    pub fn post(&self, author: &User, title: &str, status: PostStatus) -> Post {
        self.post_at(author, title, status, Utc::now())
    }

    pub fn post_at(
        &self,
        author: &User,
        title: &str,
        status: PostStatus,
        created_at: DateTime<Utc>,
    ) -> Post {
        let post = Post {
            id: next_id(),
            title: title.to_string(),
            slug: slugify(title),
            excerpt: format!("About {}", title),
            content: format!("# {}\n\nBody text.", title),
            image_url: None,
            author_id: author.id.clone(),
            topic_id: None,
            status,
            created_at,
            updated_at: created_at,
        };
        self.store()
            .add_post(post.clone())
            .expect("add post to in-memory store");
        post
    }

    /// Log in through the login page with the demo password.
    ///
    /// # Panics
    ///
    /// Panics if the login does not redirect to the dashboard.
    pub fn login_as(&mut self, user: &User) {
        let screen = self.app.login(LoginForm {
            email: user.email.clone(),
            password: DEMO_PASSWORD.to_string(),
        });
        assert!(
            matches!(screen, Screen::Redirect(_)),
            "login as {} failed: {:?}",
            user.email,
            screen
        );
        self.app.take_toasts();
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
