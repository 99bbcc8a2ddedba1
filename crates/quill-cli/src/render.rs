use colored::Colorize;
use quill_core::error::ErrorDetail;
use quill_core::models::PostStatus;
use quill_core::pages::{PostCard, Screen, Toast, ToastVariant, View};
use serde_json::json;

/// Print a screen and the toasts it raised, as JSON or as text.
pub fn print(screen: &Screen, toasts: &[Toast], as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let out = json!({ "screen": screen, "toasts": toasts });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_toasts(toasts);
    match screen {
        Screen::Redirect(route) => println!("{} {}", "→".dimmed(), route.to_string().cyan()),
        Screen::Render(view) => print_view(view),
    }
    Ok(())
}

fn print_toasts(toasts: &[Toast]) {
    for toast in toasts {
        let title = match toast.variant {
            ToastVariant::Default => toast.title.green().bold(),
            ToastVariant::Destructive => toast.title.red().bold(),
        };
        println!("{} {}", title, toast.description);
    }
}

fn print_errors(errors: Option<&ErrorDetail>) {
    let Some(detail) = errors else {
        return;
    };
    match &detail.fields {
        Some(fields) => {
            for (field, message) in fields {
                println!("  {} {}", format!("{}:", field).yellow(), message);
            }
        }
        None => println!("  {}", detail.message.yellow()),
    }
}

fn status_badge(status: PostStatus) -> colored::ColoredString {
    match status {
        PostStatus::Published => "published".green(),
        PostStatus::Draft => "draft".yellow(),
    }
}

fn print_cards(cards: &[PostCard]) {
    for card in cards {
        println!(
            "  {} {}  [{}]",
            card.title.bold(),
            format!("({})", card.id).dimmed(),
            status_badge(card.status)
        );
        println!(
            "    by {} in {} on {}  /blog/{}",
            card.author,
            card.topic,
            card.created_at.format("%Y-%m-%d"),
            card.slug
        );
        println!("    {}", card.excerpt.dimmed());
    }
}

fn heading(text: &str) {
    println!("{}", text.bold().underline());
}

fn print_view(view: &View) {
    match view {
        View::Home(home) => {
            heading("Quill");
            println!("{}", home.tagline);
            if !home.latest.is_empty() {
                println!();
                heading("Latest");
                print_cards(&home.latest);
            }
        }
        View::Blogs(blogs) => {
            match &blogs.query {
                Some(q) => heading(&format!("Blogs matching \"{}\"", q)),
                None => heading("Blogs"),
            }
            print_cards(&blogs.posts);
            if let Some(message) = &blogs.empty_message {
                println!("{}", message.dimmed());
            }
        }
        View::BlogDetail(detail) => {
            heading(&detail.post.title);
            println!(
                "By {} • {} • {}",
                detail.post.author, detail.published_on, detail.post.topic
            );
            if let Some(url) = &detail.post.image_url {
                println!("{}", url.dimmed());
            }
            println!();
            println!("{}", detail.post.excerpt.italic());
            println!();
            println!("{}", detail.content);
        }
        View::Login(form) => {
            heading("Log in");
            print_errors(form.errors.as_ref());
        }
        View::Signup(form) => {
            heading("Sign up");
            print_errors(form.errors.as_ref());
        }
        View::Settings(settings) => {
            heading("Settings");
            println!(
                "{} <{}> {}",
                settings.user.name, settings.user.email, settings.user.role
            );
            print_errors(settings.profile_errors.as_ref());
            print_errors(settings.password_errors.as_ref());
        }
        View::Dashboard(dashboard) => {
            heading(&format!("{}'s posts", dashboard.user.name));
            println!(
                "{} published, {} drafts",
                dashboard.published, dashboard.drafts
            );
            print_cards(&dashboard.posts);
        }
        View::PostEditor(editor) => {
            heading("Post editor");
            println!("title:   {}", editor.form.title);
            println!("excerpt: {}", editor.form.excerpt);
            println!("status:  {}", status_badge(editor.form.status));
            if !editor.topics.is_empty() {
                let topics: Vec<String> = editor
                    .topics
                    .iter()
                    .map(|t| format!("{} ({})", t.name, t.id))
                    .collect();
                println!("topics:  {}", topics.join(", "));
            }
            print_errors(editor.errors.as_ref());
        }
        View::Admin(overview) => {
            heading("Admin overview");
            let s = &overview.stats;
            println!(
                "posts {} ({} published, {} drafts)  users {} ({} admins)  topics {}",
                s.total_posts, s.published_posts, s.draft_posts, s.total_users, s.admins, s.total_topics
            );
            println!();
            for day in &overview.posts_per_day {
                println!("  {}  {} {}", day.label, "█".repeat(day.posts), day.posts);
            }
            println!();
            heading("Recent posts");
            print_cards(&overview.recent_posts);
        }
        View::AdminPosts(manage) => {
            heading("All posts");
            print_cards(&manage.posts);
        }
        View::AdminUsers(manage) => {
            heading("Users");
            for row in &manage.users {
                let marker = if row.is_current { " (you)" } else { "" };
                println!(
                    "  {} <{}> {} {} posts {}{}",
                    row.user.name.bold(),
                    row.user.email,
                    row.user.role,
                    row.post_count,
                    format!("({})", row.user.id).dimmed(),
                    marker
                );
            }
        }
        View::AdminTopics(manage) => {
            heading("Topics");
            for row in &manage.topics {
                println!(
                    "  {} /{} {} posts {}",
                    row.topic.name.bold(),
                    row.topic.slug,
                    row.post_count,
                    format!("({})", row.topic.id).dimmed()
                );
            }
            print_errors(manage.errors.as_ref());
        }
        View::PostNotFound { back } => {
            heading("Post not found");
            println!("{} {}", "back:".dimmed(), back);
        }
        View::NotFound { path } => {
            heading("404");
            println!("Nothing lives at {}", path);
        }
    }
}
