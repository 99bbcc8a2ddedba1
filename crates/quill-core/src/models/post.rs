use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuillError;

/// Publication state. Records written before statuses existed read as published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    #[default]
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    pub fn toggled(self) -> PostStatus {
        match self {
            PostStatus::Draft => PostStatus::Published,
            PostStatus::Published => PostStatus::Draft,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = QuillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(QuillError::InvalidInput(format!(
                "unknown post status '{}'",
                other
            ))),
        }
    }
}

/// A blog post as stored under `blog_posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Derived from the title; not guaranteed unique.
    pub slug: String,
    pub excerpt: String,
    /// Editor output (HTML or markdown).
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    pub author_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,

    #[serde(default)]
    pub status: PostStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }
}

/// Partial update for a post; `None` fields are left untouched.
///
/// The doubly optional fields distinguish "leave alone" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
    pub topic_id: Option<Option<String>>,
    pub status: Option<PostStatus>,
}

impl PostPatch {
    pub fn status(status: PostStatus) -> Self {
        PostPatch {
            status: Some(status),
            ..PostPatch::default()
        }
    }

    /// Merge into `post`. The caller owns `updated_at`.
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(slug) = self.slug {
            post.slug = slug;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = image_url;
        }
        if let Some(topic_id) = self.topic_id {
            post.topic_id = topic_id;
        }
        if let Some(status) = self.status {
            post.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_reads_legacy_record_without_status_or_topic() {
        let raw = r#"{
            "id": "1",
            "title": "Getting Started with React",
            "slug": "getting-started-with-react",
            "excerpt": "Learn the basics of React.",
            "content": "Body",
            "imageUrl": "https://images.example.com/react.png",
            "authorId": "1",
            "createdAt": "2024-01-15T10:00:00Z",
            "updatedAt": "2024-01-15T10:00:00Z"
        }"#;

        let post: Post = serde_json::from_str(raw).expect("legacy post parses");
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.topic_id, None);
        assert_eq!(post.author_id, "1");
        assert_eq!(
            post.image_url.as_deref(),
            Some("https://images.example.com/react.png")
        );
    }

    #[test]
    fn test_post_serializes_camel_case_and_skips_missing_image() {
        let raw = r#"{"id":"7","title":"T","slug":"t","excerpt":"e","content":"c",
            "authorId":"2","status":"draft",
            "createdAt":"2024-02-01T09:15:00Z","updatedAt":"2024-02-01T09:15:00Z"}"#;
        let post: Post = serde_json::from_str(raw).expect("parse");
        let json = serde_json::to_value(&post).expect("serialize");

        assert_eq!(json["authorId"], "2");
        assert_eq!(json["status"], "draft");
        assert!(json.get("imageUrl").is_none());
        assert!(json.get("topicId").is_none());
    }

    #[test]
    fn test_status_toggle_and_parse() {
        assert_eq!(PostStatus::Draft.toggled(), PostStatus::Published);
        assert_eq!(PostStatus::Published.toggled(), PostStatus::Draft);
        assert_eq!("Draft".parse::<PostStatus>().unwrap(), PostStatus::Draft);
        assert!("archived".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_patch_clears_optional_fields() {
        let raw = r#"{"id":"1","title":"T","slug":"t","excerpt":"e","content":"c",
            "imageUrl":"https://x.test/a.png","authorId":"1","topicId":"9",
            "createdAt":"2024-01-15T10:00:00Z","updatedAt":"2024-01-15T10:00:00Z"}"#;
        let mut post: Post = serde_json::from_str(raw).expect("parse");

        PostPatch {
            image_url: Some(None),
            topic_id: Some(None),
            ..PostPatch::default()
        }
        .apply(&mut post);

        assert_eq!(post.image_url, None);
        assert_eq!(post.topic_id, None);
        assert_eq!(post.title, "T");
    }
}
