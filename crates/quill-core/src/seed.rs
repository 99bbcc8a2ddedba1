//! Demo data installed into an empty store.

use chrono::{DateTime, Utc};

use crate::auth::{DEMO_PASSWORD, hash_password};
use crate::error::QuillError;
use crate::models::{Post, PostStatus, Role, Topic, User};
use crate::slug::slugify;
use crate::store::RecordStore;

struct SeedPost {
    id: &'static str,
    title: &'static str,
    excerpt: &'static str,
    content: &'static str,
    image_url: &'static str,
    author_id: &'static str,
    topic_id: &'static str,
    created_at: &'static str,
}

const SEED_POSTS: &[SeedPost] = &[
    SeedPost {
        id: "1",
        title: "Getting Started with React",
        excerpt: "Learn the basics of React and start building modern web applications.",
        content: "# Getting Started with React\n\nReact is a powerful JavaScript library for building user interfaces. In this guide, we'll explore the fundamentals.\n\n## Key Concepts\n\n- Components\n- Props\n- State\n- Hooks",
        image_url: "https://images.unsplash.com/photo-1633356122544-f134324a6cee?w=800&q=80",
        author_id: "1",
        topic_id: "1",
        created_at: "2024-01-15T10:00:00Z",
    },
    SeedPost {
        id: "2",
        title: "Mastering TypeScript",
        excerpt: "Take your TypeScript skills to the next level with advanced patterns.",
        content: "# Mastering TypeScript\n\nTypeScript adds static typing to JavaScript, making your code more robust and maintainable.\n\n## Best Practices\n\n- Use strict mode\n- Leverage type inference\n- Create reusable type utilities",
        image_url: "https://images.unsplash.com/photo-1516116216624-53e697fedbea?w=800&q=80",
        author_id: "1",
        topic_id: "2",
        created_at: "2024-01-20T14:30:00Z",
    },
    SeedPost {
        id: "3",
        title: "Building Beautiful UIs with Tailwind CSS",
        excerpt: "Discover how to create stunning user interfaces using Tailwind CSS.",
        content: "# Building Beautiful UIs with Tailwind CSS\n\nTailwind CSS is a utility-first CSS framework that makes styling your applications a breeze.\n\n## Responsive Design\n\nTailwind makes responsive design intuitive with its mobile-first approach.",
        image_url: "https://images.unsplash.com/photo-1507721999472-8ed4421c4af2?w=800&q=80",
        author_id: "2",
        topic_id: "3",
        created_at: "2024-02-01T09:15:00Z",
    },
    SeedPost {
        id: "4",
        title: "State Management in Modern React",
        excerpt: "Explore different approaches to managing state in your React applications.",
        content: "# State Management in Modern React\n\nManaging state effectively is crucial for building scalable React applications.\n\n## Built-in Solutions\n\n- useState for local state\n- useReducer for complex state logic\n- Context API for global state",
        image_url: "https://images.unsplash.com/photo-1555066931-4365d14bab8c?w=800&q=80",
        author_id: "2",
        topic_id: "1",
        created_at: "2024-02-10T16:45:00Z",
    },
];

const SEED_TOPICS: &[(&str, &str)] = &[("1", "React"), ("2", "TypeScript"), ("3", "CSS")];

fn timestamp(raw: &str) -> Result<DateTime<Utc>, QuillError> {
    raw.parse()
        .map_err(|e| QuillError::Internal(format!("bad seed timestamp {}: {}", raw, e)))
}

pub fn demo_users() -> Result<Vec<User>, QuillError> {
    let hash = hash_password(DEMO_PASSWORD)?;
    Ok(vec![
        User {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: Role::Admin,
            password_hash: Some(hash.clone()),
            created_at: Some(timestamp("2024-01-01T00:00:00Z")?),
        },
        User {
            id: "2".to_string(),
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            role: Role::User,
            password_hash: Some(hash),
            created_at: Some(timestamp("2024-01-02T00:00:00Z")?),
        },
    ])
}

pub fn demo_topics() -> Vec<Topic> {
    SEED_TOPICS
        .iter()
        .map(|(id, name)| Topic {
            id: id.to_string(),
            name: name.to_string(),
            slug: slugify(name),
        })
        .collect()
}

pub fn demo_posts() -> Result<Vec<Post>, QuillError> {
    SEED_POSTS
        .iter()
        .map(|seed| {
            let created_at = timestamp(seed.created_at)?;
            Ok(Post {
                id: seed.id.to_string(),
                title: seed.title.to_string(),
                slug: slugify(seed.title),
                excerpt: seed.excerpt.to_string(),
                content: seed.content.to_string(),
                image_url: Some(seed.image_url.to_string()),
                author_id: seed.author_id.to_string(),
                topic_id: Some(seed.topic_id.to_string()),
                status: PostStatus::Published,
                created_at,
                updated_at: created_at,
            })
        })
        .collect()
}

/// Install demo users, topics and posts when the store holds none of them.
///
/// Returns whether anything was written.
pub fn install_demo_data(store: &RecordStore) -> Result<bool, QuillError> {
    if !store.is_empty() {
        return Ok(false);
    }

    store.set_users(&demo_users()?)?;
    store.set_topics(&demo_topics())?;
    store.set_posts(&demo_posts()?)?;
    tracing::info!("installed demo data");
    Ok(true)
}
