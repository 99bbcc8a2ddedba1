mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Password};
use quill_core::logging::init_logging_as;
use quill_core::media::image_file_data_url;
use quill_core::models::PostStatus;
use quill_core::pages::{App, Screen};
use quill_core::seed::install_demo_data;
use quill_core::storage::FileStorage;
use quill_core::validation::{
    LoginForm, PasswordChangeForm, PostForm, ProfileUpdateForm, SignupForm, TopicForm,
};
use quill_core::{Config, RecordStore};

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 5;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "A local-first blog you drive from the terminal")]
#[command(version)]
struct Cli {
    /// Print screens and toasts as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Data directory (overrides QUILL_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install demo users, topics and posts into an empty store
    Seed,
    /// Create an account and log in
    Signup {
        name: String,
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Log in ("password" works for every account in demo mode)
    Login {
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Render a page, e.g. `/blogs?q=react` or `/admin`
    Visit { path: String },
    /// Write and manage your posts
    Post {
        #[command(subcommand)]
        action: PostCommands,
    },
    /// Update your profile or password
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
    /// Admin actions on posts and users
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
    /// Manage topics (admin)
    Topic {
        #[command(subcommand)]
        action: TopicCommands,
    },
    /// Delete all stored data
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct PostFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    excerpt: Option<String>,
    /// Post body (markdown)
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,
    /// Read the post body from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// Remote image URL
    #[arg(long, conflicts_with = "image")]
    image_url: Option<String>,
    /// Local image file, embedded as a data URL (max 2MB)
    #[arg(long)]
    image: Option<PathBuf>,
    /// Topic id
    #[arg(long)]
    topic: Option<String>,
    /// Save as draft instead of publishing
    #[arg(long, conflicts_with = "publish")]
    draft: bool,
    /// Publish (when editing a draft)
    #[arg(long)]
    publish: bool,
}

impl PostFields {
    /// Overlay the given flags onto `form`.
    fn apply(self, mut form: PostForm) -> Result<PostForm> {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(excerpt) = self.excerpt {
            form.excerpt = excerpt;
        }
        if let Some(content) = self.content {
            form.content = content;
        }
        if let Some(path) = self.content_file {
            form.content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
        }
        if let Some(url) = self.image_url {
            form.image_url = Some(url);
        }
        if let Some(path) = self.image {
            form.image_url = Some(image_file_data_url(&path)?);
        }
        if let Some(topic) = self.topic {
            form.topic_id = Some(topic);
        }
        if self.draft {
            form.status = PostStatus::Draft;
        }
        if self.publish {
            form.status = PostStatus::Published;
        }
        Ok(form)
    }
}

#[derive(Subcommand)]
enum PostCommands {
    /// Create a post
    New(PostFields),
    /// Edit a post; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        fields: PostFields,
    },
    /// Delete one of your posts
    Delete { id: String },
    /// Switch one of your posts between draft and published
    ToggleStatus { id: String },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Change your display name
    Profile { name: String },
    /// Change your password (prompts for anything omitted)
    Password {
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        new: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Delete any post
    DeletePost { id: String },
    /// Switch any post between draft and published
    TogglePostStatus { id: String },
    /// Delete a user (their posts remain)
    DeleteUser { id: String },
    /// Switch a user between USER and ADMIN
    ToggleRole { id: String },
}

#[derive(Subcommand)]
enum TopicCommands {
    /// Add a topic
    Add { name: String },
    /// Rename a topic
    Rename { id: String, name: String },
    /// Delete a topic; its posts become uncategorized
    Delete { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    init_logging_as(config.log_format, "warn");

    let mut app = open_app(config, &cli.command)?;

    let screen = match cli.command {
        Commands::Seed => {
            if install_demo_data(app.store())? {
                println!("{}", "Demo data installed.".green());
            } else {
                println!("{}", "Store already has data; nothing installed.".yellow());
            }
            return Ok(());
        }
        Commands::Reset { yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt(format!(
                        "Delete all data in {}?",
                        app.config().data_dir.display()
                    ))
                    .default(false)
                    .interact()?;
            if confirmed {
                app.store().clear()?;
                println!("{}", "All data removed.".green());
            }
            return Ok(());
        }
        Commands::Whoami => {
            match app.current_user() {
                Some(user) => println!("{} <{}> {}", user.name.bold(), user.email, user.role),
                None => println!("{}", "Not logged in.".dimmed()),
            }
            return Ok(());
        }
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Repeat password", "Passwords do not match")
                    .interact()?,
            };
            app.signup(SignupForm {
                name,
                email,
                password,
            })
        }
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => Password::new().with_prompt("Password").interact()?,
            };
            app.login(LoginForm { email, password })
        }
        Commands::Logout => app.logout(),
        Commands::Visit { path } => app.visit(&path),
        Commands::Post { action } => post_command(&mut app, action)?,
        Commands::Settings { action } => match action {
            SettingsCommands::Profile { name } => app.update_profile(ProfileUpdateForm { name }),
            SettingsCommands::Password {
                current,
                new,
                confirm,
            } => {
                let current_password = prompt_or("Current password", current)?;
                let new_password = prompt_or("New password", new)?;
                let confirm_password = prompt_or("Confirm new password", confirm)?;
                app.change_password(PasswordChangeForm {
                    current_password,
                    new_password,
                    confirm_password,
                })
            }
        },
        Commands::Admin { action } => match action {
            AdminCommands::DeletePost { id } => app.admin_delete_post(&id),
            AdminCommands::TogglePostStatus { id } => app.admin_toggle_post_status(&id),
            AdminCommands::DeleteUser { id } => app.admin_delete_user(&id),
            AdminCommands::ToggleRole { id } => app.admin_toggle_role(&id),
        },
        Commands::Topic { action } => match action {
            TopicCommands::Add { name } => app.add_topic(TopicForm { name }),
            TopicCommands::Rename { id, name } => app.rename_topic(&id, TopicForm { name }),
            TopicCommands::Delete { id } => app.delete_topic(&id),
        },
    };

    let screen = follow_redirects(&mut app, screen)?;
    let toasts = app.take_toasts();
    render::print(&screen, &toasts, cli.json)
}

/// Open the app over the data directory. Demo data is only installed on
/// first use, when the directory does not exist yet, so a `reset` store stays
/// empty. `seed` and `reset` never auto-seed.
fn open_app(mut config: Config, command: &Commands) -> Result<App> {
    let first_run = !config.data_dir.exists();
    config.seed_demo_data = config.seed_demo_data
        && first_run
        && !matches!(command, Commands::Seed | Commands::Reset { .. });

    let storage = FileStorage::new(&config.data_dir);
    storage.ensure_dir()?;
    Ok(App::new(RecordStore::new(storage), config)?)
}

fn post_command(app: &mut App, action: PostCommands) -> Result<Screen> {
    let screen = match action {
        PostCommands::New(fields) => app.create_post(fields.apply(PostForm::default())?),
        PostCommands::Edit { id, fields } => {
            let Some(post) = app.store().post_by_id(&id) else {
                return Ok(app.visit(&format!("/dashboard/edit/{}", id)));
            };
            app.update_post(&id, fields.apply(PostForm::from(&post))?)
        }
        PostCommands::Delete { id } => app.delete_post(&id),
        PostCommands::ToggleStatus { id } => {
            let Some(post) = app.store().post_by_id(&id) else {
                return Ok(app.visit(&format!("/dashboard/edit/{}", id)));
            };
            let mut form = PostForm::from(&post);
            form.status = post.status.toggled();
            app.update_post(&id, form)
        }
    };
    Ok(screen)
}

/// Keep navigating while the app answers with a redirect, like a browser would.
fn follow_redirects(app: &mut App, mut screen: Screen) -> Result<Screen> {
    for _ in 0..MAX_REDIRECTS {
        match screen {
            Screen::Redirect(route) => screen = app.visit(&route.path()),
            rendered => return Ok(rendered),
        }
    }
    bail!("too many redirects")
}

fn prompt_or(prompt: &str, given: Option<String>) -> Result<String> {
    match given {
        Some(value) => Ok(value),
        None => Ok(Password::new().with_prompt(prompt).interact()?),
    }
}
