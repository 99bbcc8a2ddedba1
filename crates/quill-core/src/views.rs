//! Derived views over the stored collections: per-day counts, search,
//! author/topic name resolution and admin statistics.

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::Serialize;

use crate::models::{Post, PostStatus, Role, Topic, User};

pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const UNKNOWN_AUTHOR_DETAIL: &str = "Unknown Author";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Width of the admin overview chart, in days.
pub const CHART_DAYS: u64 = 7;

/// One bar of the posts-per-day chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    /// `"%b %d"`, e.g. `Jan 05`.
    pub label: String,
    pub posts: usize,
}

/// Count posts created on each of the last `days` calendar days, oldest first.
///
/// Day boundaries are taken in `now`'s time zone (local time in the app), so a
/// post at 23:30 UTC can land on the next day for a viewer east of UTC. Posts
/// outside the window are ignored and empty days are zero-filled.
pub fn posts_per_day<Tz: TimeZone>(posts: &[Post], now: &DateTime<Tz>, days: u64) -> Vec<DayCount> {
    let zone = now.timezone();
    let today = now.date_naive();

    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let count = posts
                .iter()
                .filter(|post| post.created_at.with_timezone(&zone).date_naive() == date)
                .count();
            DayCount {
                date,
                label: date.format("%b %d").to_string(),
                posts: count,
            }
        })
        .collect()
}

/// Case-insensitive substring match on title or excerpt. A blank query matches all.
pub fn matches_query(post: &Post, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    post.title.to_lowercase().contains(&query) || post.excerpt.to_lowercase().contains(&query)
}

pub fn search<'a>(posts: &'a [Post], query: &str) -> Vec<&'a Post> {
    posts.iter().filter(|p| matches_query(p, query)).collect()
}

/// Published posts, newest first.
pub fn published_newest_first(posts: Vec<Post>) -> Vec<Post> {
    let mut published: Vec<Post> = posts.into_iter().filter(Post::is_published).collect();
    sort_newest_first(&mut published);
    published
}

pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

pub fn posts_by_author(posts: Vec<Post>, author_id: &str) -> Vec<Post> {
    let mut own: Vec<Post> = posts
        .into_iter()
        .filter(|p| p.is_authored_by(author_id))
        .collect();
    sort_newest_first(&mut own);
    own
}

/// Author display name for lists; `"Unknown"` for a missing author.
pub fn author_name(users: &[User], author_id: &str) -> String {
    users
        .iter()
        .find(|u| u.id == author_id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

/// Topic display name; `"Uncategorized"` when unset or dangling.
pub fn topic_name(topics: &[Topic], topic_id: Option<&str>) -> String {
    topic_id
        .and_then(|id| topics.iter().find(|t| t.id == id))
        .map(|t| t.name.clone())
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

/// Counts shown on the admin overview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_posts: usize,
    pub published_posts: usize,
    pub draft_posts: usize,
    pub total_users: usize,
    pub admins: usize,
    pub total_topics: usize,
}

pub fn stats(posts: &[Post], users: &[User], topics: &[Topic]) -> Stats {
    let published_posts = posts
        .iter()
        .filter(|p| p.status == PostStatus::Published)
        .count();
    Stats {
        total_posts: posts.len(),
        published_posts,
        draft_posts: posts.len() - published_posts,
        total_users: users.len(),
        admins: users.iter().filter(|u| u.role == Role::Admin).count(),
        total_topics: topics.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn post_at(id: &str, created_at: &str) -> Post {
        let ts: DateTime<Utc> = created_at.parse().expect("timestamp");
        Post {
            id: id.to_string(),
            title: format!("Post {}", id),
            slug: format!("post-{}", id),
            excerpt: "An excerpt".to_string(),
            content: String::new(),
            image_url: None,
            author_id: "1".to_string(),
            topic_id: None,
            status: PostStatus::Published,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_posts_per_day_buckets_last_seven_days() {
        let now: DateTime<Utc> = "2024-03-10T12:00:00Z".parse().unwrap();
        let posts = vec![
            post_at("1", "2024-03-10T00:00:00Z"),
            post_at("2", "2024-03-10T23:59:59.999Z"),
            post_at("3", "2024-03-04T08:00:00Z"),
            post_at("4", "2024-03-03T23:59:59Z"),
            post_at("5", "2024-03-11T00:00:00Z"),
        ];

        let chart = posts_per_day(&posts, &now, CHART_DAYS);

        assert_eq!(chart.len(), 7);
        assert_eq!(chart[0].label, "Mar 04");
        assert_eq!(chart[0].posts, 1);
        assert_eq!(chart[6].label, "Mar 10");
        assert_eq!(chart[6].posts, 2);
        assert_eq!(chart.iter().map(|d| d.posts).sum::<usize>(), 3);
    }

    #[test]
    fn test_posts_per_day_uses_viewer_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = tokyo.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        // 20:00 UTC on the 9th is 05:00 on the 10th in Tokyo.
        let posts = vec![post_at("1", "2024-03-09T20:00:00Z")];

        let chart = posts_per_day(&posts, &now, CHART_DAYS);
        assert_eq!(chart[6].posts, 1);
        assert_eq!(chart[5].posts, 0);
    }

    #[test]
    fn test_search_matches_title_or_excerpt() {
        let mut a = post_at("1", "2024-01-01T00:00:00Z");
        a.title = "Mastering TypeScript".to_string();
        let mut b = post_at("2", "2024-01-02T00:00:00Z");
        b.excerpt = "All about TYPESCRIPT generics".to_string();
        let c = post_at("3", "2024-01-03T00:00:00Z");
        let posts = vec![a, b, c];

        let found: Vec<&str> = search(&posts, "typescript").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(found, vec!["1", "2"]);
        assert_eq!(search(&posts, "   ").len(), 3);
    }

    #[test]
    fn test_name_fallbacks() {
        let topics = vec![Topic {
            id: "t1".to_string(),
            name: "Rust".to_string(),
            slug: "rust".to_string(),
        }];
        assert_eq!(topic_name(&topics, Some("t1")), "Rust");
        assert_eq!(topic_name(&topics, Some("gone")), UNCATEGORIZED);
        assert_eq!(topic_name(&topics, None), UNCATEGORIZED);
        assert_eq!(author_name(&[], "1"), UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_published_newest_first_hides_drafts() {
        let mut draft = post_at("3", "2024-01-03T00:00:00Z");
        draft.status = PostStatus::Draft;
        let posts = vec![
            post_at("1", "2024-01-01T00:00:00Z"),
            draft,
            post_at("2", "2024-01-02T00:00:00Z"),
        ];

        let ids: Vec<String> = published_newest_first(posts).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }
}
