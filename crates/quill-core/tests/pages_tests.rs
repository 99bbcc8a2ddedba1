use chrono::{Duration, Utc};
use quill_core::TestApp;
use quill_core::models::{PostPatch, PostStatus, Role};
use quill_core::pages::{EditorMode, Screen, ToastVariant, View};
use quill_core::routes::Route;
use quill_core::validation::{LoginForm, PostForm, SignupForm};
use quill_core::views::{UNCATEGORIZED, UNKNOWN_AUTHOR, UNKNOWN_AUTHOR_DETAIL};

const CONTENT: &str = "This body is comfortably longer than the fifty character minimum.";

fn post_form(title: &str, status: PostStatus) -> PostForm {
    PostForm {
        title: title.to_string(),
        excerpt: "A short summary of the post".to_string(),
        content: CONTENT.to_string(),
        image_url: None,
        topic_id: None,
        status,
    }
}

fn render(screen: Screen) -> View {
    match screen {
        Screen::Render(view) => view,
        Screen::Redirect(route) => panic!("expected a page, got redirect to {}", route),
    }
}

// ═══ Public pages ═══

#[test]
fn test_blogs_lists_published_newest_first() {
    let mut t = TestApp::new();
    let author = t.user("Jane", "jane@example.com", Role::User);
    let now = Utc::now();
    t.post_at(&author, "Older Post", PostStatus::Published, now - Duration::days(2));
    t.post_at(&author, "Newer Post", PostStatus::Published, now - Duration::days(1));
    t.post_at(&author, "Secret Draft", PostStatus::Draft, now);

    let View::Blogs(view) = render(t.app.visit("/blogs")) else {
        panic!("expected blogs page");
    };
    let titles: Vec<&str> = view.posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Newer Post", "Older Post"]);
    assert_eq!(view.posts[0].author, "Jane");
}

#[test]
fn test_blogs_search_filters_and_reports_empty() {
    let mut t = TestApp::new();
    let author = t.user("Jane", "jane@example.com", Role::User);
    t.post(&author, "Mastering TypeScript", PostStatus::Published);
    t.post(&author, "Rust for Everyone", PostStatus::Published);

    let View::Blogs(view) = render(t.app.visit("/blogs?q=typescript")) else {
        panic!("expected blogs page");
    };
    assert_eq!(view.posts.len(), 1);
    assert_eq!(view.query.as_deref(), Some("typescript"));
    assert!(view.empty_message.is_none());

    let View::Blogs(view) = render(t.app.visit("/blogs?q=haskell")) else {
        panic!("expected blogs page");
    };
    assert!(view.posts.is_empty());
    assert!(view.empty_message.is_some());
}

#[test]
fn test_blog_detail_hides_drafts_and_resolves_author() {
    let mut t = TestApp::new();
    let author = t.user("Jane", "jane@example.com", Role::User);
    t.post(&author, "Visible Post", PostStatus::Published);
    t.post(&author, "Hidden Draft", PostStatus::Draft);

    let View::BlogDetail(view) = render(t.app.visit("/blog/visible-post")) else {
        panic!("expected detail page");
    };
    assert_eq!(view.post.author, "Jane");

    assert_eq!(
        render(t.app.visit("/blog/hidden-draft")),
        View::PostNotFound {
            back: Route::Blogs { query: None }
        }
    );
}

#[test]
fn test_blog_detail_skips_draft_sharing_slug() {
    let mut t = TestApp::new();
    let author = t.user("Jane", "jane@example.com", Role::User);
    t.post(&author, "Shared Title", PostStatus::Draft);
    let published = t.post(&author, "Shared Title", PostStatus::Published);

    let View::Blogs(list) = render(t.app.visit("/blogs")) else {
        panic!("expected blogs page");
    };
    assert_eq!(list.posts.len(), 1);
    assert_eq!(list.posts[0].slug, "shared-title");

    let View::BlogDetail(view) = render(t.app.visit("/blog/shared-title")) else {
        panic!("expected detail page");
    };
    assert_eq!(view.post.id, published.id);
}

#[test]
fn test_deleted_author_shows_unknown() {
    let mut t = TestApp::new();
    let author = t.user("Jane", "jane@example.com", Role::User);
    t.post(&author, "Orphaned Post", PostStatus::Published);
    t.store().delete_user(&author.id).expect("delete user");

    let View::Blogs(list) = render(t.app.visit("/blogs")) else {
        panic!("expected blogs page");
    };
    assert_eq!(list.posts[0].author, UNKNOWN_AUTHOR);

    let View::BlogDetail(detail) = render(t.app.visit("/blog/orphaned-post")) else {
        panic!("expected detail page");
    };
    assert_eq!(detail.post.author, UNKNOWN_AUTHOR_DETAIL);
}

#[test]
fn test_unknown_path_is_not_found() {
    let mut t = TestApp::new();
    assert_eq!(
        render(t.app.visit("/nope")),
        View::NotFound {
            path: "/nope".to_string()
        }
    );
}

// ═══ Guards ═══

#[test]
fn test_dashboard_requires_login() {
    let mut t = TestApp::new();
    assert_eq!(t.app.visit("/dashboard"), Screen::Redirect(Route::Login));
    assert_eq!(t.app.visit("/dashboard/new"), Screen::Redirect(Route::Login));
    assert_eq!(t.app.visit("/dashboard/settings"), Screen::Redirect(Route::Login));
}

#[test]
fn test_guest_pages_redirect_logged_in_users() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    t.login_as(&jane);

    assert_eq!(t.app.visit("/login"), Screen::Redirect(Route::Dashboard));
    assert_eq!(t.app.visit("/signup"), Screen::Redirect(Route::Dashboard));
}

#[test]
fn test_non_admin_redirected_from_admin_routes() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    t.login_as(&jane);

    for path in ["/admin", "/admin/posts", "/admin/users", "/admin/topics"] {
        assert_eq!(t.app.visit(path), Screen::Redirect(Route::Home), "{}", path);
    }

    let toasts = t.app.take_toasts();
    assert_eq!(toasts.len(), 4);
    assert_eq!(toasts[0].title, "Access Denied");
    assert_eq!(toasts[0].description, "You must be an admin to access this page.");
    assert_eq!(toasts[0].variant, ToastVariant::Destructive);
}

#[test]
fn test_admin_sees_admin_pages() {
    let mut t = TestApp::new();
    let admin = t.user("Root", "root@example.com", Role::Admin);
    t.login_as(&admin);

    assert!(matches!(render(t.app.visit("/admin")), View::Admin(_)));
    assert!(matches!(render(t.app.visit("/admin/users")), View::AdminUsers(_)));
    assert!(t.app.take_toasts().is_empty());
}

#[test]
fn test_deleted_account_counts_as_logged_out() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    t.login_as(&jane);
    t.store().delete_user(&jane.id).expect("delete user");

    assert_eq!(t.app.visit("/dashboard"), Screen::Redirect(Route::Login));
}

// ═══ Login & signup pages ═══

#[test]
fn test_login_page_flow() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);

    let screen = t.app.login(LoginForm {
        email: jane.email.clone(),
        password: "wrong".to_string(),
    });
    assert!(matches!(screen, Screen::Render(View::Login(ref v)) if v.errors.is_some()));
    assert_eq!(t.app.take_toasts()[0].title, "Login failed");

    let screen = t.app.login(LoginForm {
        email: jane.email.clone(),
        password: "password".to_string(),
    });
    assert_eq!(screen, Screen::Redirect(Route::Dashboard));
    let toasts = t.app.take_toasts();
    assert_eq!(toasts[0].title, "Login successful!");
    assert_eq!(toasts[0].description, "Welcome back, Jane");
}

#[test]
fn test_signup_page_flow_and_logout() {
    let mut t = TestApp::new();

    let screen = t.app.signup(SignupForm {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        password: "engines".to_string(),
    });
    assert_eq!(screen, Screen::Redirect(Route::Dashboard));
    assert!(matches!(render(t.app.visit("/dashboard")), View::Dashboard(_)));

    assert_eq!(t.app.logout(), Screen::Redirect(Route::Login));
    assert_eq!(t.app.visit("/dashboard"), Screen::Redirect(Route::Login));
}

// ═══ Dashboard ═══

#[test]
fn test_create_post_as_draft() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    t.login_as(&jane);

    let screen = t.app.create_post(post_form("My Draft, Vol. 1!", PostStatus::Draft));
    assert_eq!(screen, Screen::Redirect(Route::Dashboard));

    let toasts = t.app.take_toasts();
    assert_eq!(toasts[0].title, "Post created!");
    assert_eq!(toasts[0].description, "Your blog post has been saved as a draft.");

    let post = t.store().post_by_slug("my-draft-vol-1").expect("post stored");
    assert_eq!(post.author_id, jane.id);
    assert_eq!(post.status, PostStatus::Draft);

    let View::Dashboard(view) = render(t.app.visit("/dashboard")) else {
        panic!("expected dashboard");
    };
    assert_eq!(view.posts.len(), 1);
    assert_eq!(view.drafts, 1);
    assert_eq!(view.published, 0);
}

#[test]
fn test_create_post_validation_keeps_form() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    t.login_as(&jane);

    let mut form = post_form("Hi", PostStatus::Published);
    form.content = "too short".to_string();

    let View::PostEditor(view) = render(t.app.create_post(form.clone())) else {
        panic!("expected editor");
    };
    assert_eq!(view.mode, EditorMode::Create);
    assert_eq!(view.form, form);
    let fields = view.errors.and_then(|e| e.fields).expect("field errors");
    assert!(fields.contains_key("title"));
    assert!(fields.contains_key("content"));
    assert!(t.store().posts().is_empty());
}

#[test]
fn test_create_post_rejects_unknown_topic() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    t.login_as(&jane);

    let mut form = post_form("Topical Post", PostStatus::Published);
    form.topic_id = Some("missing".to_string());

    let View::PostEditor(view) = render(t.app.create_post(form)) else {
        panic!("expected editor");
    };
    assert!(view.errors.and_then(|e| e.fields).expect("fields").contains_key("topic_id"));
}

#[test]
fn test_edit_post_prefills_and_updates() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    let post = t.post(&jane, "First Title", PostStatus::Published);
    t.login_as(&jane);

    let View::PostEditor(view) = render(t.app.visit(&format!("/dashboard/edit/{}", post.id))) else {
        panic!("expected editor");
    };
    assert_eq!(view.form.title, "First Title");
    assert_eq!(view.mode, EditorMode::Edit { id: post.id.clone() });

    let screen = t.app.update_post(&post.id, post_form("Second Title", PostStatus::Draft));
    assert_eq!(screen, Screen::Redirect(Route::Dashboard));
    assert_eq!(t.app.take_toasts()[0].title, "Post updated!");

    let stored = t.store().post_by_id(&post.id).expect("still stored");
    assert_eq!(stored.title, "Second Title");
    assert_eq!(stored.slug, "second-title");
    assert_eq!(stored.status, PostStatus::Draft);
    assert_eq!(stored.created_at, post.created_at);
}

#[test]
fn test_editing_another_users_post_refused() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    let mallory = t.user("Mallory", "mallory@example.com", Role::User);
    let post = t.post(&jane, "Jane's Post", PostStatus::Published);
    t.login_as(&mallory);

    let screen = t.app.visit(&format!("/dashboard/edit/{}", post.id));
    assert_eq!(screen, Screen::Redirect(Route::Dashboard));
    let toasts = t.app.take_toasts();
    assert_eq!(toasts[0].variant, ToastVariant::Destructive);
    assert_eq!(toasts[0].description, "You can only edit your own posts.");

    let screen = t.app.update_post(&post.id, post_form("Hijacked", PostStatus::Published));
    assert_eq!(screen, Screen::Redirect(Route::Dashboard));
    assert_eq!(t.app.delete_post(&post.id), Screen::Redirect(Route::Dashboard));

    let stored = t.store().post_by_id(&post.id).expect("untouched");
    assert_eq!(stored.title, "Jane's Post");
}

#[test]
fn test_admin_may_edit_any_post() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    let admin = t.user("Root", "root@example.com", Role::Admin);
    let post = t.post(&jane, "Jane's Post", PostStatus::Published);
    t.login_as(&admin);

    assert!(matches!(
        render(t.app.visit(&format!("/dashboard/edit/{}", post.id))),
        View::PostEditor(_)
    ));
}

#[test]
fn test_edit_missing_post_is_not_found() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    t.login_as(&jane);

    assert_eq!(
        render(t.app.visit("/dashboard/edit/404")),
        View::PostNotFound {
            back: Route::Dashboard
        }
    );
}

#[test]
fn test_dashboard_delete_updates_list() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    let keep = t.post(&jane, "Keep Me", PostStatus::Published);
    let gone = t.post(&jane, "Delete Me", PostStatus::Published);
    t.login_as(&jane);

    let View::Dashboard(view) = render(t.app.delete_post(&gone.id)) else {
        panic!("expected dashboard");
    };
    let ids: Vec<&str> = view.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![keep.id.as_str()]);

    let toasts = t.app.take_toasts();
    assert_eq!(toasts[0].title, "Post deleted");
    assert_eq!(toasts[0].description, "\"Delete Me\" has been removed.");
}

// ═══ Topics in views ═══

#[test]
fn test_deleting_topic_falls_back_to_uncategorized() {
    let mut t = TestApp::new();
    let jane = t.user("Jane", "jane@example.com", Role::User);
    let topic = t.topic("Rust");
    let post = t.post(&jane, "Ownership Explained", PostStatus::Published);
    t.store()
        .update_post(
            &post.id,
            PostPatch {
                topic_id: Some(Some(topic.id.clone())),
                ..Default::default()
            },
        )
        .expect("set topic");

    let View::Blogs(before) = render(t.app.visit("/blogs")) else {
        panic!("expected blogs page");
    };
    assert_eq!(before.posts[0].topic, "Rust");

    t.store().delete_topic(&topic.id).expect("delete topic");

    let View::Blogs(after) = render(t.app.visit("/blogs")) else {
        panic!("expected blogs page");
    };
    assert_eq!(after.posts.len(), 1);
    assert_eq!(after.posts[0].topic, UNCATEGORIZED);
    assert!(t.store().post_by_id(&post.id).is_some());
}

// ═══ Seed data ═══

#[test]
fn test_seeded_app_has_demo_content() {
    let mut t = TestApp::seeded();

    assert_eq!(t.store().users().len(), 2);
    assert_eq!(t.store().posts().len(), 4);

    let View::Home(home) = render(t.app.visit("/")) else {
        panic!("expected home page");
    };
    assert_eq!(home.latest.len(), 3);
    assert_eq!(home.latest[0].title, "State Management in Modern React");
    assert!(!home.signed_in);
}
