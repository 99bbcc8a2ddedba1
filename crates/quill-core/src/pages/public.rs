use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::{App, View};
use crate::models::{Post, PostStatus, Topic, User};
use crate::routes::Route;
use crate::views::{self, UNKNOWN_AUTHOR_DETAIL};

pub const TAGLINE: &str =
    "Discover amazing stories, insights, and ideas from talented writers around the world.";
pub const NO_MATCHES: &str = "No posts found matching your search.";

/// How many posts the home page previews.
const HOME_PREVIEW: usize = 3;

/// A post as shown in any list, with names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub image_url: Option<String>,
    pub author: String,
    pub topic: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}

impl PostCard {
    pub fn build(post: &Post, users: &[User], topics: &[Topic]) -> Self {
        PostCard {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            image_url: post.image_url.clone(),
            author: views::author_name(users, &post.author_id),
            topic: views::topic_name(topics, post.topic_id.as_deref()),
            status: post.status,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub tagline: String,
    pub latest: Vec<PostCard>,
    pub signed_in: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogsView {
    pub query: Option<String>,
    pub posts: Vec<PostCard>,
    /// Set when a search matched nothing.
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetailView {
    pub post: PostCard,
    pub content: String,
    /// `"Month D, YYYY"` in local time.
    pub published_on: String,
}

impl App {
    /// Published posts matching `query`, newest first, as cards.
    fn public_cards(&self, query: &str) -> Vec<PostCard> {
        let users = self.store.users();
        let topics = self.store.topics();
        views::published_newest_first(self.store.posts())
            .iter()
            .filter(|post| views::matches_query(post, query))
            .map(|post| PostCard::build(post, &users, &topics))
            .collect()
    }

    pub(super) fn home_page(&self, user: Option<&User>) -> View {
        let mut latest = self.public_cards("");
        latest.truncate(HOME_PREVIEW);
        View::Home(HomeView {
            tagline: TAGLINE.to_string(),
            latest,
            signed_in: user.is_some(),
        })
    }

    pub(super) fn blogs_page(&self, query: Option<String>) -> View {
        let posts = self.public_cards(query.as_deref().unwrap_or(""));
        let empty_message = (posts.is_empty() && query.is_some()).then(|| NO_MATCHES.to_string());
        View::Blogs(BlogsView {
            query,
            posts,
            empty_message,
        })
    }

    pub(super) fn blog_detail_page(&self, slug: &str) -> View {
        let Some(post) = self.store.published_post_by_slug(slug) else {
            tracing::debug!(slug, "no published post for slug");
            return View::PostNotFound {
                back: Route::Blogs { query: None },
            };
        };

        let users = self.store.users();
        let mut card = PostCard::build(&post, &users, &self.store.topics());
        if !users.iter().any(|u| u.id == post.author_id) {
            card.author = UNKNOWN_AUTHOR_DETAIL.to_string();
        }

        View::BlogDetail(BlogDetailView {
            published_on: post
                .created_at
                .with_timezone(&Local)
                .format("%B %-d, %Y")
                .to_string(),
            content: post.content,
            post: card,
        })
    }
}
