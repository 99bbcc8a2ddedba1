//! Page controllers.
//!
//! Each page reads the store, builds a serializable view model or a redirect,
//! writes changes back, and queues toasts. [`App::visit`] applies the access
//! guard for a location before rendering it; the action methods
//! (`login`, `create_post`, `admin_delete_user`, ...) are what form
//! submissions and buttons call.

/// Unwrap a `Result<T, Screen>` inside a method returning `Screen`.
macro_rules! or_screen {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(screen) => return screen,
        }
    };
}

pub mod account;
pub mod admin;
pub mod dashboard;
pub mod public;

use serde::Serialize;

pub use account::{AuthFormView, SettingsView};
pub use admin::{AdminOverview, ManagePostsView, ManageTopicsView, ManageUsersView, TopicRow, UserRow};
pub use dashboard::{DashboardView, EditorMode, PostEditorView};
pub use public::{BlogDetailView, BlogsView, HomeView, PostCard};

use crate::auth::AuthService;
use crate::config::Config;
use crate::error::QuillError;
use crate::models::{Role, User};
use crate::routes::{Access, Route};
use crate::seed;
use crate::store::RecordStore;

pub const ACCESS_DENIED: &str = "Access Denied";
pub const ADMIN_ONLY: &str = "You must be an admin to access this page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// A transient notification shown after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Toast {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Toast {
            variant: ToastVariant::Destructive,
            ..Toast::new(title, description)
        }
    }

    /// Destructive toast carrying the error's user-facing message.
    pub fn from_error(title: impl Into<String>, err: &QuillError) -> Self {
        Toast::destructive(title, err.user_message())
    }
}

/// Every renderable page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum View {
    Home(HomeView),
    Blogs(BlogsView),
    BlogDetail(BlogDetailView),
    Login(AuthFormView),
    Signup(AuthFormView),
    Settings(SettingsView),
    Dashboard(DashboardView),
    PostEditor(PostEditorView),
    Admin(AdminOverview),
    AdminPosts(ManagePostsView),
    AdminUsers(ManageUsersView),
    AdminTopics(ManageTopicsView),
    /// A post id or slug that matches nothing; `back` is where the button leads.
    PostNotFound { back: Route },
    NotFound { path: String },
}

/// Result of visiting a page or submitting an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Screen {
    Render(View),
    Redirect(Route),
}

impl Screen {
    pub fn view(&self) -> Option<&View> {
        match self {
            Screen::Render(view) => Some(view),
            Screen::Redirect(_) => None,
        }
    }

    pub fn redirect_target(&self) -> Option<&Route> {
        match self {
            Screen::Redirect(route) => Some(route),
            Screen::Render(_) => None,
        }
    }
}

/// The application: store, auth shim, configuration and pending toasts.
pub struct App {
    store: RecordStore,
    auth: AuthService,
    config: Config,
    toasts: Vec<Toast>,
}

impl App {
    /// Build the app over `store`, installing demo data first when configured.
    pub fn new(store: RecordStore, config: Config) -> Result<Self, QuillError> {
        if config.seed_demo_data {
            seed::install_demo_data(&store)?;
        }
        let auth = AuthService::new(store.clone(), config.password_mode);
        Ok(App {
            store,
            auth,
            config,
            toasts: Vec::new(),
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The logged-in user, refreshed from the users collection.
    ///
    /// A stored user whose account has since been deleted counts as logged out.
    pub fn current_user(&self) -> Option<User> {
        let stored = self.auth.current_user()?;
        match self.store.user_by_id(&stored.id) {
            Some(user) => Some(user.without_secret()),
            None => {
                tracing::warn!(user_id = %stored.id, "stored user no longer exists");
                None
            }
        }
    }

    pub fn toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Drain the queued toasts.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    /// Navigate to `location`, applying the route's access guard.
    pub fn visit(&mut self, location: &str) -> Screen {
        let route = Route::parse(location);
        tracing::debug!(route = %route, "visit");

        let user = match self.guard(route.requires()) {
            Ok(user) => user,
            Err(screen) => return screen,
        };
        self.render(route, user)
    }

    fn render(&mut self, route: Route, user: Option<User>) -> Screen {
        // The guard has already established a user wherever one is required.
        match (route, user) {
            (Route::Home, user) => Screen::Render(self.home_page(user.as_ref())),
            (Route::Blogs { query }, _) => Screen::Render(self.blogs_page(query)),
            (Route::BlogDetail { slug }, _) => Screen::Render(self.blog_detail_page(&slug)),
            (Route::Login, _) => Screen::Render(View::Login(AuthFormView::default())),
            (Route::Signup, _) => Screen::Render(View::Signup(AuthFormView::default())),
            (Route::Dashboard, Some(user)) => Screen::Render(self.dashboard_page(&user)),
            (Route::CreatePost, Some(_)) => Screen::Render(self.new_post_page()),
            (Route::EditPost { id }, Some(user)) => self.edit_post_page(&user, &id),
            (Route::Settings, Some(user)) => Screen::Render(self.settings_page(&user)),
            (Route::Admin, Some(_)) => Screen::Render(self.admin_overview_page()),
            (Route::AdminPosts, Some(_)) => Screen::Render(self.manage_posts_page()),
            (Route::AdminUsers, Some(user)) => Screen::Render(self.manage_users_page(&user)),
            (Route::AdminTopics, Some(_)) => Screen::Render(self.manage_topics_page()),
            (Route::NotFound { path }, _) => Screen::Render(View::NotFound { path }),
            (_, None) => Screen::Redirect(Route::Login),
        }
    }

    /// Check `access` against the current user.
    ///
    /// Returns the user (if any) on success, or the redirect to show instead.
    fn guard(&mut self, access: Access) -> Result<Option<User>, Screen> {
        let user = self.current_user();
        match access {
            Access::Public => Ok(user),
            Access::Guest => match user {
                Some(_) => Err(Screen::Redirect(Route::Dashboard)),
                None => Ok(None),
            },
            Access::Authenticated => match user {
                Some(user) => Ok(Some(user)),
                None => Err(Screen::Redirect(Route::Login)),
            },
            Access::Admin => match user {
                Some(user) if user.role.has_permission(&Role::Admin) => Ok(Some(user)),
                other => {
                    tracing::warn!(
                        user_id = other.as_ref().map(|u| u.id.as_str()).unwrap_or("-"),
                        "admin page denied"
                    );
                    self.toast(Toast::destructive(ACCESS_DENIED, ADMIN_ONLY));
                    Err(Screen::Redirect(Route::Home))
                }
            },
        }
    }

    /// Current user for an action, or the login redirect.
    fn require_user(&mut self) -> Result<User, Screen> {
        self.guard(Access::Authenticated)?
            .ok_or(Screen::Redirect(Route::Login))
    }

    /// Current admin for an admin action, or the denial redirect.
    fn require_admin(&mut self) -> Result<User, Screen> {
        self.guard(Access::Admin)?
            .ok_or(Screen::Redirect(Route::Home))
    }

    /// Queue a toast for `err` and log it; storage failures are logged as errors.
    fn report(&mut self, title: &str, err: &QuillError) {
        match err {
            QuillError::Storage(_) | QuillError::Internal(_) => {
                tracing::error!(error = %err, "{}", title)
            }
            _ => tracing::info!(code = err.error_code(), "{}", title),
        }
        self.toast(Toast::from_error(title, err));
    }
}
