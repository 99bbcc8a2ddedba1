use chrono::Local;
use serde::Serialize;

use super::{App, PostCard, Screen, Toast, View};
use crate::error::{ErrorDetail, QuillError};
use crate::models::{PostPatch, Topic, TopicPatch, User, UserPatch, UserResponse};
use crate::slug::slugify;
use crate::store::next_id;
use crate::validation::{self, TopicForm};
use crate::views::{self, CHART_DAYS, DayCount, Stats};

pub const TOPIC_EXISTS: &str = "A topic with this name already exists.";
pub const CANNOT_DELETE_SELF: &str = "You cannot delete your own account.";
pub const CANNOT_DEMOTE_SELF: &str = "You cannot change your own role.";

/// How many posts the overview lists under "Recent posts".
const RECENT_POSTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub stats: Stats,
    pub posts_per_day: Vec<DayCount>,
    pub recent_posts: Vec<PostCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagePostsView {
    pub posts: Vec<PostCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub user: UserResponse,
    pub post_count: usize,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManageUsersView {
    pub users: Vec<UserRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRow {
    pub topic: Topic,
    pub post_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManageTopicsView {
    pub topics: Vec<TopicRow>,
    pub errors: Option<ErrorDetail>,
}

fn missing(what: &str) -> QuillError {
    QuillError::NotFound(format!("That {} no longer exists.", what))
}

impl App {
    /// All posts, newest first, drafts included.
    fn all_cards(&self) -> Vec<PostCard> {
        let mut posts = self.store.posts();
        views::sort_newest_first(&mut posts);
        let users = self.store.users();
        let topics = self.store.topics();
        posts
            .iter()
            .map(|post| PostCard::build(post, &users, &topics))
            .collect()
    }

    pub(super) fn admin_overview_page(&self) -> View {
        let posts = self.store.posts();
        let mut recent_posts = self.all_cards();
        recent_posts.truncate(RECENT_POSTS);

        View::Admin(AdminOverview {
            stats: views::stats(&posts, &self.store.users(), &self.store.topics()),
            posts_per_day: views::posts_per_day(&posts, &Local::now(), CHART_DAYS),
            recent_posts,
        })
    }

    pub(super) fn manage_posts_page(&self) -> View {
        View::AdminPosts(ManagePostsView {
            posts: self.all_cards(),
        })
    }

    pub(super) fn manage_users_page(&self, admin: &User) -> View {
        let posts = self.store.posts();
        let users = self
            .store
            .users()
            .iter()
            .map(|user| UserRow {
                user: user.into(),
                post_count: posts.iter().filter(|p| p.is_authored_by(&user.id)).count(),
                is_current: user.id == admin.id,
            })
            .collect();
        View::AdminUsers(ManageUsersView { users })
    }

    pub(super) fn manage_topics_page(&self) -> View {
        self.topics_view(None)
    }

    fn topics_view(&self, errors: Option<ErrorDetail>) -> View {
        let posts = self.store.posts();
        let topics = self
            .store
            .topics()
            .into_iter()
            .map(|topic| TopicRow {
                post_count: posts
                    .iter()
                    .filter(|p| p.topic_id.as_deref() == Some(topic.id.as_str()))
                    .count(),
                topic,
            })
            .collect();
        View::AdminTopics(ManageTopicsView { topics, errors })
    }

    // ── Posts ──

    pub fn admin_delete_post(&mut self, id: &str) -> Screen {
        let admin = or_screen!(self.require_admin());

        match self.store.delete_post(id) {
            Ok(true) => {
                tracing::info!(admin_id = %admin.id, post_id = %id, "post deleted by admin");
                self.toast(Toast::new(
                    "Post Deleted",
                    "The post has been successfully deleted.",
                ));
            }
            Ok(false) => self.report("Delete failed", &missing("post")),
            Err(err) => self.report("Delete failed", &err),
        }
        Screen::Render(self.manage_posts_page())
    }

    /// Flip a post between draft and published.
    pub fn admin_toggle_post_status(&mut self, id: &str) -> Screen {
        let admin = or_screen!(self.require_admin());

        let result = match self.store.post_by_id(id) {
            Some(post) => self
                .store
                .update_post(id, PostPatch::status(post.status.toggled())),
            None => Ok(None),
        };

        match result {
            Ok(Some(post)) => {
                tracing::info!(admin_id = %admin.id, post_id = %id, status = %post.status, "post status changed");
                self.toast(Toast::new(
                    "Status Updated",
                    format!("Post is now {}.", post.status),
                ));
            }
            Ok(None) => self.report("Update failed", &missing("post")),
            Err(err) => self.report("Update failed", &err),
        }
        Screen::Render(self.manage_posts_page())
    }

    // ── Users ──

    /// Delete an account. Its posts stay and show an unknown author.
    pub fn admin_delete_user(&mut self, id: &str) -> Screen {
        let admin = or_screen!(self.require_admin());

        if admin.id == id {
            self.report(
                "Delete failed",
                &QuillError::Forbidden(CANNOT_DELETE_SELF.to_string()),
            );
            return Screen::Render(self.manage_users_page(&admin));
        }

        match self.store.delete_user(id) {
            Ok(true) => {
                tracing::info!(admin_id = %admin.id, user_id = %id, "user deleted");
                self.toast(Toast::new(
                    "User Deleted",
                    "The user has been successfully deleted.",
                ));
            }
            Ok(false) => self.report("Delete failed", &missing("user")),
            Err(err) => self.report("Delete failed", &err),
        }
        Screen::Render(self.manage_users_page(&admin))
    }

    /// Flip a user between `USER` and `ADMIN`.
    pub fn admin_toggle_role(&mut self, id: &str) -> Screen {
        let admin = or_screen!(self.require_admin());

        if admin.id == id {
            self.report(
                "Update failed",
                &QuillError::Forbidden(CANNOT_DEMOTE_SELF.to_string()),
            );
            return Screen::Render(self.manage_users_page(&admin));
        }

        let result = match self.store.user_by_id(id) {
            Some(user) => {
                let patch = UserPatch {
                    role: Some(user.role.toggled()),
                    ..UserPatch::default()
                };
                self.store.update_user(id, patch)
            }
            None => Ok(None),
        };

        match result {
            Ok(Some(user)) => {
                tracing::info!(admin_id = %admin.id, user_id = %id, role = %user.role, "role changed");
                self.toast(Toast::new(
                    "Role Updated",
                    "User role has been successfully updated.",
                ));
            }
            Ok(None) => self.report("Update failed", &missing("user")),
            Err(err) => self.report("Update failed", &err),
        }
        Screen::Render(self.manage_users_page(&admin))
    }

    // ── Topics ──

    /// Validate a topic name and make sure no other topic has its slug.
    fn checked_topic(&self, form: TopicForm, except: Option<&str>) -> Result<(String, String), QuillError> {
        let form = validation::check(form)?;
        let slug = slugify(&form.name);
        if let Some(existing) = self.store.topic_by_slug(&slug)
            && Some(existing.id.as_str()) != except
        {
            return Err(QuillError::Conflict(TOPIC_EXISTS.to_string()));
        }
        Ok((form.name, slug))
    }

    fn topic_failed(&mut self, title: &str, err: QuillError) -> Screen {
        if !matches!(err, QuillError::Validation(_)) {
            self.report(title, &err);
        }
        Screen::Render(self.topics_view(Some(err.detail())))
    }

    pub fn add_topic(&mut self, form: TopicForm) -> Screen {
        let admin = or_screen!(self.require_admin());

        let topic = match self.checked_topic(form, None) {
            Ok((name, slug)) => Topic {
                id: next_id(),
                name,
                slug,
            },
            Err(err) => return self.topic_failed("Create failed", err),
        };
        let description = format!("\"{}\" has been added.", topic.name);
        let topic_id = topic.id.clone();

        if let Err(err) = self.store.add_topic(topic) {
            return self.topic_failed("Create failed", err);
        }
        tracing::info!(admin_id = %admin.id, %topic_id, "topic created");
        self.toast(Toast::new("Topic Created", description));
        Screen::Render(self.manage_topics_page())
    }

    pub fn rename_topic(&mut self, id: &str, form: TopicForm) -> Screen {
        let admin = or_screen!(self.require_admin());

        let patch = match self.checked_topic(form, Some(id)) {
            Ok((name, slug)) => TopicPatch {
                name: Some(name),
                slug: Some(slug),
            },
            Err(err) => return self.topic_failed("Update failed", err),
        };

        match self.store.update_topic(id, patch) {
            Ok(Some(topic)) => {
                tracing::info!(admin_id = %admin.id, topic_id = %id, "topic renamed");
                self.toast(Toast::new(
                    "Topic Updated",
                    format!("Topic renamed to \"{}\".", topic.name),
                ));
                Screen::Render(self.manage_topics_page())
            }
            Ok(None) => self.topic_failed("Update failed", missing("topic")),
            Err(err) => self.topic_failed("Update failed", err),
        }
    }

    /// Delete a topic. Posts that used it keep their reference and render as
    /// uncategorized.
    pub fn delete_topic(&mut self, id: &str) -> Screen {
        let admin = or_screen!(self.require_admin());

        match self.store.delete_topic(id) {
            Ok(true) => {
                tracing::info!(admin_id = %admin.id, topic_id = %id, "topic deleted");
                self.toast(Toast::new(
                    "Topic Deleted",
                    "The topic has been successfully deleted.",
                ));
                Screen::Render(self.manage_topics_page())
            }
            Ok(false) => self.topic_failed("Delete failed", missing("topic")),
            Err(err) => self.topic_failed("Delete failed", err),
        }
    }
}
