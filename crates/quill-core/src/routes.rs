//! Path ↔ page mapping and the access level each page requires.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every page of the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Route {
    Home,
    Blogs { query: Option<String> },
    BlogDetail { slug: String },
    Login,
    Signup,
    Dashboard,
    CreatePost,
    EditPost { id: String },
    Settings,
    Admin,
    AdminPosts,
    AdminUsers,
    AdminTopics,
    NotFound { path: String },
}

/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Public,
    /// Logged-out visitors only; logged-in users are sent to the dashboard.
    Guest,
    Authenticated,
    Admin,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

impl Route {
    /// Resolve a location such as `/blogs?q=rust` or `/dashboard/edit/42`.
    ///
    /// Trailing slashes are ignored. Unknown paths become [`Route::NotFound`].
    pub fn parse(location: &str) -> Route {
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (location, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["blogs"] => Route::Blogs {
                query: query.and_then(search_term),
            },
            ["blog", slug] => Route::BlogDetail {
                slug: slug.to_string(),
            },
            ["login"] => Route::Login,
            ["signup"] => Route::Signup,
            ["dashboard"] => Route::Dashboard,
            ["dashboard", "new"] => Route::CreatePost,
            ["dashboard", "edit", id] => Route::EditPost { id: id.to_string() },
            ["dashboard", "settings"] => Route::Settings,
            ["admin"] => Route::Admin,
            ["admin", "posts"] => Route::AdminPosts,
            ["admin", "users"] => Route::AdminUsers,
            ["admin", "topics"] => Route::AdminTopics,
            _ => Route::NotFound {
                path: path.to_string(),
            },
        }
    }

    /// Canonical location for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Blogs { query: None } => "/blogs".to_string(),
            Route::Blogs { query: Some(q) } => {
                match serde_urlencoded::to_string(&[("q", q.as_str())][..]) {
                    Ok(encoded) => format!("/blogs?{}", encoded),
                    Err(_) => "/blogs".to_string(),
                }
            }
            Route::BlogDetail { slug } => format!("/blog/{}", slug),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::CreatePost => "/dashboard/new".to_string(),
            Route::EditPost { id } => format!("/dashboard/edit/{}", id),
            Route::Settings => "/dashboard/settings".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::AdminPosts => "/admin/posts".to_string(),
            Route::AdminUsers => "/admin/users".to_string(),
            Route::AdminTopics => "/admin/topics".to_string(),
            Route::NotFound { path } => path.clone(),
        }
    }

    pub fn requires(&self) -> Access {
        match self {
            Route::Home | Route::Blogs { .. } | Route::BlogDetail { .. } | Route::NotFound { .. } => {
                Access::Public
            }
            Route::Login | Route::Signup => Access::Guest,
            Route::Dashboard | Route::CreatePost | Route::EditPost { .. } | Route::Settings => {
                Access::Authenticated
            }
            Route::Admin | Route::AdminPosts | Route::AdminUsers | Route::AdminTopics => Access::Admin,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn search_term(query: &str) -> Option<String> {
    serde_urlencoded::from_str::<SearchParams>(query)
        .ok()
        .and_then(|params| params.q)
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
}
