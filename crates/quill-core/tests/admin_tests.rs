use quill_core::TestApp;
use quill_core::models::{PostStatus, Role, User};
use quill_core::pages::admin::{CANNOT_DELETE_SELF, TOPIC_EXISTS};
use quill_core::pages::{Screen, ToastVariant, View};
use quill_core::validation::TopicForm;

fn admin_app() -> (TestApp, User) {
    let mut t = TestApp::new();
    let admin = t.user("Root", "root@example.com", Role::Admin);
    t.login_as(&admin);
    (t, admin)
}

fn render(screen: Screen) -> View {
    match screen {
        Screen::Render(view) => view,
        Screen::Redirect(route) => panic!("expected a page, got redirect to {}", route),
    }
}

fn topic_form(name: &str) -> TopicForm {
    TopicForm {
        name: name.to_string(),
    }
}

// ═══ Overview ═══

#[test]
fn test_overview_stats_and_chart() {
    let (mut t, admin) = admin_app();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    t.post(&admin, "Published One", PostStatus::Published);
    t.post(&jane, "Draft One", PostStatus::Draft);
    t.topic("Rust");

    let View::Admin(view) = render(t.app.visit("/admin")) else {
        panic!("expected overview");
    };
    assert_eq!(view.stats.total_posts, 2);
    assert_eq!(view.stats.published_posts, 1);
    assert_eq!(view.stats.draft_posts, 1);
    assert_eq!(view.stats.total_users, 2);
    assert_eq!(view.stats.admins, 1);
    assert_eq!(view.stats.total_topics, 1);

    assert_eq!(view.posts_per_day.len(), 7);
    assert_eq!(view.posts_per_day.iter().map(|d| d.posts).sum::<usize>(), 2);
    assert_eq!(view.recent_posts.len(), 2);
}

#[test]
fn test_manage_posts_includes_drafts() {
    let (mut t, admin) = admin_app();
    t.post(&admin, "Published One", PostStatus::Published);
    t.post(&admin, "Draft One", PostStatus::Draft);

    let View::AdminPosts(view) = render(t.app.visit("/admin/posts")) else {
        panic!("expected manage posts");
    };
    assert_eq!(view.posts.len(), 2);
}

// ═══ Post actions ═══

#[test]
fn test_admin_delete_post() {
    let (mut t, _) = admin_app();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    let post = t.post(&jane, "Jane's Post", PostStatus::Published);

    let View::AdminPosts(view) = render(t.app.admin_delete_post(&post.id)) else {
        panic!("expected manage posts");
    };
    assert!(view.posts.is_empty());
    assert_eq!(t.app.take_toasts()[0].title, "Post Deleted");

    render(t.app.admin_delete_post(&post.id));
    assert_eq!(t.app.take_toasts()[0].variant, ToastVariant::Destructive);
}

#[test]
fn test_admin_toggle_post_status() {
    let (mut t, admin) = admin_app();
    let post = t.post(&admin, "Flip Me", PostStatus::Published);

    render(t.app.admin_toggle_post_status(&post.id));
    assert_eq!(
        t.store().post_by_id(&post.id).map(|p| p.status),
        Some(PostStatus::Draft)
    );
    assert_eq!(t.app.take_toasts()[0].title, "Status Updated");

    render(t.app.admin_toggle_post_status(&post.id));
    assert_eq!(
        t.store().post_by_id(&post.id).map(|p| p.status),
        Some(PostStatus::Published)
    );
}

// ═══ User actions ═══

#[test]
fn test_admin_toggle_role() {
    let (mut t, _) = admin_app();
    let jane = t.user("Jane", "jane@example.com", Role::User);

    render(t.app.admin_toggle_role(&jane.id));
    assert_eq!(t.store().user_by_id(&jane.id).map(|u| u.role), Some(Role::Admin));
    assert_eq!(t.app.take_toasts()[0].title, "Role Updated");

    render(t.app.admin_toggle_role(&jane.id));
    assert_eq!(t.store().user_by_id(&jane.id).map(|u| u.role), Some(Role::User));
}

#[test]
fn test_admin_delete_user_keeps_posts() {
    let (mut t, _) = admin_app();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    let post = t.post(&jane, "Left Behind", PostStatus::Published);

    let View::AdminUsers(view) = render(t.app.admin_delete_user(&jane.id)) else {
        panic!("expected manage users");
    };
    assert_eq!(view.users.len(), 1);
    assert!(view.users[0].is_current);
    assert_eq!(t.app.take_toasts()[0].title, "User Deleted");
    assert!(t.store().post_by_id(&post.id).is_some());
}

#[test]
fn test_admin_cannot_delete_self() {
    let (mut t, admin) = admin_app();

    render(t.app.admin_delete_user(&admin.id));
    let toasts = t.app.take_toasts();
    assert_eq!(toasts[0].description, CANNOT_DELETE_SELF);
    assert!(t.store().user_by_id(&admin.id).is_some());

    render(t.app.admin_toggle_role(&admin.id));
    assert_eq!(t.store().user_by_id(&admin.id).map(|u| u.role), Some(Role::Admin));
}

#[test]
fn test_demoted_admin_loses_access() {
    let mut t = TestApp::new();
    let root = t.user("Root", "root@example.com", Role::Admin);
    let other = t.user("Other", "other@example.com", Role::Admin);
    t.login_as(&other);

    render(t.app.admin_toggle_role(&root.id));
    t.app.take_toasts();

    t.login_as(&root);
    assert!(matches!(t.app.visit("/admin"), Screen::Redirect(_)));
}

#[test]
fn test_admin_actions_need_admin() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    let post = t.post(&jane, "Jane's Post", PostStatus::Published);
    t.login_as(&jane);

    assert!(matches!(t.app.admin_delete_post(&post.id), Screen::Redirect(_)));
    assert!(matches!(t.app.add_topic(topic_form("Sneaky")), Screen::Redirect(_)));
    assert!(t.store().post_by_id(&post.id).is_some());
    assert!(t.store().topics().is_empty());
}

// ═══ Topics ═══

#[test]
fn test_add_rename_delete_topic() {
    let (mut t, _) = admin_app();

    let View::AdminTopics(view) = render(t.app.add_topic(topic_form("  Web Dev "))) else {
        panic!("expected manage topics");
    };
    assert_eq!(view.topics.len(), 1);
    let topic = view.topics[0].topic.clone();
    assert_eq!(topic.name, "Web Dev");
    assert_eq!(topic.slug, "web-dev");
    assert_eq!(t.app.take_toasts()[0].title, "Topic Created");

    render(t.app.rename_topic(&topic.id, topic_form("Web Development")));
    assert_eq!(
        t.store().topic_by_id(&topic.id).map(|t| t.slug),
        Some("web-development".to_string())
    );
    assert_eq!(t.app.take_toasts()[0].title, "Topic Updated");

    render(t.app.delete_topic(&topic.id));
    assert!(t.store().topics().is_empty());
    assert_eq!(t.app.take_toasts()[0].title, "Topic Deleted");
}

#[test]
fn test_duplicate_topic_rejected() {
    let (mut t, _) = admin_app();
    let rust = t.topic("Rust");

    let View::AdminTopics(view) = render(t.app.add_topic(topic_form("RUST"))) else {
        panic!("expected manage topics");
    };
    assert_eq!(view.errors.map(|e| e.message), Some(TOPIC_EXISTS.to_string()));
    assert_eq!(t.store().topics().len(), 1);

    // Renaming a topic to its own name is fine.
    render(t.app.rename_topic(&rust.id, topic_form("Rust")));
    assert_eq!(t.app.take_toasts().last().map(|t| t.title.clone()), Some("Topic Updated".to_string()));
}

#[test]
fn test_topic_name_validation() {
    let (mut t, _) = admin_app();

    let View::AdminTopics(view) = render(t.app.add_topic(topic_form("x"))) else {
        panic!("expected manage topics");
    };
    let fields = view.errors.and_then(|e| e.fields).expect("field errors");
    assert_eq!(
        fields.get("name").map(String::as_str),
        Some("Topic name must be at least 2 characters")
    );
    assert!(t.store().topics().is_empty());
}

#[test]
fn test_topic_post_counts() {
    let (mut t, admin) = admin_app();
    let topic = t.topic("Rust");
    let post = t.post(&admin, "Counting", PostStatus::Published);
    t.store()
        .update_post(
            &post.id,
            quill_core::models::PostPatch {
                topic_id: Some(Some(topic.id.clone())),
                ..Default::default()
            },
        )
        .expect("set topic");

    let View::AdminTopics(view) = render(t.app.visit("/admin/topics")) else {
        panic!("expected manage topics");
    };
    assert_eq!(view.topics[0].post_count, 1);
}
