use chrono::Utc;
use serde::Serialize;

use super::{App, PostCard, Screen, Toast, View};
use crate::error::{ErrorDetail, FieldErrors, QuillError};
use crate::models::{Post, PostPatch, PostStatus, Topic, User, UserResponse};
use crate::routes::Route;
use crate::slug::slugify;
use crate::store::next_id;
use crate::validation::{self, PostForm};
use crate::views;

pub const NOT_YOUR_POST: &str = "You can only edit your own posts.";
pub const INVALID_TOPIC: &str = "Please select a valid topic";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub user: UserResponse,
    pub posts: Vec<PostCard>,
    pub published: usize,
    pub drafts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EditorMode {
    Create,
    Edit { id: String },
}

/// Create/edit form, prefilled when editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEditorView {
    pub mode: EditorMode,
    pub form: PostForm,
    pub topics: Vec<Topic>,
    pub errors: Option<ErrorDetail>,
}

/// Slug for a new or retitled post. Titles with no ASCII letters or digits
/// fall back to the post id so the detail route stays reachable.
fn post_slug(title: &str, id: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() { id.to_string() } else { slug }
}

impl App {
    pub(super) fn dashboard_page(&self, user: &User) -> View {
        let own = views::posts_by_author(self.store.posts(), &user.id);
        let users = self.store.users();
        let topics = self.store.topics();

        let published = own.iter().filter(|p| p.is_published()).count();
        View::Dashboard(DashboardView {
            user: user.into(),
            drafts: own.len() - published,
            published,
            posts: own
                .iter()
                .map(|post| PostCard::build(post, &users, &topics))
                .collect(),
        })
    }

    pub(super) fn new_post_page(&self) -> View {
        self.editor(EditorMode::Create, PostForm::default(), None)
    }

    pub(super) fn edit_post_page(&mut self, user: &User, id: &str) -> Screen {
        let post = or_screen!(self.editable_post(user, id));
        Screen::Render(self.editor(
            EditorMode::Edit {
                id: post.id.clone(),
            },
            PostForm::from(&post),
            None,
        ))
    }

    fn editor(&self, mode: EditorMode, form: PostForm, errors: Option<ErrorDetail>) -> View {
        View::PostEditor(PostEditorView {
            mode,
            form,
            topics: self.store.topics(),
            errors,
        })
    }

    fn editor_failed(&mut self, mode: EditorMode, form: PostForm, err: QuillError) -> Screen {
        if !matches!(err, QuillError::Validation(_)) {
            self.report("Error", &err);
        }
        Screen::Render(self.editor(mode, form, Some(err.detail())))
    }

    /// Look up a post `user` may modify: their own, or any post for an admin.
    fn editable_post(&mut self, user: &User, id: &str) -> Result<Post, Screen> {
        let Some(post) = self.store.post_by_id(id) else {
            return Err(Screen::Render(View::PostNotFound {
                back: Route::Dashboard,
            }));
        };

        if !post.is_authored_by(&user.id) && !user.is_admin() {
            tracing::warn!(user_id = %user.id, post_id = %post.id, "edit of another user's post refused");
            self.toast(Toast::destructive("Unauthorized", NOT_YOUR_POST));
            return Err(Screen::Redirect(Route::Dashboard));
        }
        Ok(post)
    }

    /// Validate the form and confirm its topic, if any, exists.
    fn checked_post_form(&self, form: PostForm) -> Result<PostForm, QuillError> {
        let form = validation::check(form)?;
        if let Some(topic_id) = &form.topic_id
            && self.store.topic_by_id(topic_id).is_none()
        {
            let mut fields = FieldErrors::new();
            fields.insert("topic_id".to_string(), INVALID_TOPIC.to_string());
            return Err(QuillError::Validation(fields));
        }
        Ok(form)
    }

    pub fn create_post(&mut self, form: PostForm) -> Screen {
        let user = or_screen!(self.require_user());

        let form = match self.checked_post_form(form.clone()) {
            Ok(checked) => checked,
            Err(err) => return self.editor_failed(EditorMode::Create, form, err),
        };

        let id = next_id();
        let now = Utc::now();
        let post = Post {
            slug: post_slug(&form.title, &id),
            id,
            title: form.title.clone(),
            excerpt: form.excerpt.clone(),
            content: form.content.clone(),
            image_url: form.image_url.clone(),
            author_id: user.id.clone(),
            topic_id: form.topic_id.clone(),
            status: form.status,
            created_at: now,
            updated_at: now,
        };
        let (post_id, status) = (post.id.clone(), post.status);

        if let Err(err) = self.store.add_post(post) {
            return self.editor_failed(EditorMode::Create, form, err);
        }

        tracing::info!(user_id = %user.id, %post_id, "post created");
        let description = match status {
            PostStatus::Published => "Your blog post has been published successfully.",
            PostStatus::Draft => "Your blog post has been saved as a draft.",
        };
        self.toast(Toast::new("Post created!", description));
        Screen::Redirect(Route::Dashboard)
    }

    pub fn update_post(&mut self, id: &str, form: PostForm) -> Screen {
        let user = or_screen!(self.require_user());
        let post = or_screen!(self.editable_post(&user, id));
        let mode = EditorMode::Edit {
            id: post.id.clone(),
        };

        let checked = match self.checked_post_form(form.clone()) {
            Ok(checked) => checked,
            Err(err) => return self.editor_failed(mode, form, err),
        };

        let patch = PostPatch {
            slug: Some(post_slug(&checked.title, &post.id)),
            title: Some(checked.title),
            excerpt: Some(checked.excerpt),
            content: Some(checked.content),
            image_url: Some(checked.image_url),
            topic_id: Some(checked.topic_id),
            status: Some(checked.status),
        };

        match self.store.update_post(&post.id, patch) {
            Ok(Some(_)) => {
                tracing::info!(user_id = %user.id, post_id = %post.id, "post updated");
                self.toast(Toast::new(
                    "Post updated!",
                    "Your changes have been saved successfully.",
                ));
                Screen::Redirect(Route::Dashboard)
            }
            Ok(None) => Screen::Render(View::PostNotFound {
                back: Route::Dashboard,
            }),
            Err(err) => self.editor_failed(mode, form, err),
        }
    }

    /// Delete one of the user's posts and show the dashboard without it.
    pub fn delete_post(&mut self, id: &str) -> Screen {
        let user = or_screen!(self.require_user());
        let post = or_screen!(self.editable_post(&user, id));

        match self.store.delete_post(&post.id) {
            Ok(_) => {
                tracing::info!(user_id = %user.id, post_id = %post.id, "post deleted");
                self.toast(Toast::new(
                    "Post deleted",
                    format!("\"{}\" has been removed.", post.title),
                ));
            }
            Err(err) => self.report("Error", &err),
        }
        Screen::Render(self.dashboard_page(&user))
    }
}
