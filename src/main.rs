//! CLI entry point for markdown-pulse

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use markdown_pulse::commands::{self, edit::PostChanges, theme::ThemeAction};
use markdown_pulse::content::join_tags;
use markdown_pulse::session::DeleteOutcome;
use markdown_pulse::theme::Theme;
use markdown_pulse::Pulse;

#[derive(Parser)]
#[command(name = "markdown-pulse")]
#[command(version)]
#[command(about = "A local-first markdown notebook", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create pulse.yml in a directory
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        #[arg(short, long)]
        title: String,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Markdown content
        #[arg(long)]
        content: Option<String>,

        /// Read markdown from a file ("-" for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Edit an existing post
    Edit {
        /// Post id
        id: i64,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// New markdown content
        #[arg(long)]
        content: Option<String>,

        /// Read new markdown from a file ("-" for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Delete a post
    #[command(alias = "rm")]
    Delete {
        /// Post id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Render a post as sanitized HTML
    Show {
        /// Post id
        id: i64,

        /// Write a standalone page instead of printing the article
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List posts
    #[command(alias = "ls")]
    List {
        /// Only posts whose title or content contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only posts with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// List all tags
    Tags,

    /// Render markdown without saving it
    Preview {
        /// Markdown file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show or change the theme (toggle, light, dark)
    Theme {
        action: Option<String>,
    },

    /// Print the code highlighting stylesheet for the current theme
    Css,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "markdown_pulse=debug,info"
    } else {
        "markdown_pulse=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing notebook in {:?}", target_dir);
            commands::init::init_notebook(&target_dir)?;
            println!("Initialized notebook in {:?}", target_dir);
        }

        Commands::New {
            title,
            tags,
            content,
            file,
        } => {
            let pulse = Pulse::new(&base_dir)?;
            let content = match commands::read_content(content, file.as_deref())? {
                Some(content) => content,
                None => commands::read_content(None, Some(std::path::Path::new("-")))?
                    .unwrap_or_default(),
            };
            let post = commands::new::create_post(&pulse, &title, tags.as_deref(), &content)?;
            println!("Created post {} ({})", post.id, post.title);
        }

        Commands::Edit {
            id,
            title,
            tags,
            content,
            file,
        } => {
            let pulse = Pulse::new(&base_dir)?;
            let changes = PostChanges {
                title,
                tags,
                content: commands::read_content(content, file.as_deref())?,
            };
            let post = commands::edit::edit_post(&pulse, id, changes)?;
            println!("Updated post {} ({}) [{}]", post.id, post.title, join_tags(&post.tags));
        }

        Commands::Delete { id, yes } => {
            let pulse = Pulse::new(&base_dir)?;
            let outcome = commands::delete::delete_post(&pulse, id, |post| {
                yes || confirm(&format!("Delete \"{}\"?", post.title))
            })?;
            match outcome {
                DeleteOutcome::Deleted => println!("Deleted post {}", id),
                DeleteOutcome::Declined => println!("Kept post {}", id),
                DeleteOutcome::NothingSelected => println!("No post selected"),
            }
        }

        Commands::Show { id, output } => {
            let pulse = Pulse::new(&base_dir)?;
            match output {
                Some(path) => {
                    commands::show::write_page(&pulse, id, &path)?;
                    println!("Wrote {:?}", path);
                }
                None => println!("{}", commands::show::render_post(&pulse, id)?),
            }
        }

        Commands::List { search, tag } => {
            let pulse = Pulse::new(&base_dir)?;
            commands::list::run(&pulse, search.as_deref(), tag.as_deref())?;
        }

        Commands::Tags => {
            let pulse = Pulse::new(&base_dir)?;
            commands::list::run_tags(&pulse)?;
        }

        Commands::Preview { file } => {
            let pulse = Pulse::new(&base_dir)?;
            let file = file.unwrap_or_else(|| PathBuf::from("-"));
            let markdown = commands::read_content(None, Some(file.as_path()))?.unwrap_or_default();
            println!("{}", commands::preview::render(&pulse, &markdown));
        }

        Commands::Theme { action } => {
            let pulse = Pulse::new(&base_dir)?;
            let action = match action.as_deref() {
                None => None,
                Some("toggle") => Some(ThemeAction::Toggle),
                Some(name) => Some(ThemeAction::Set(name.parse::<Theme>()?)),
            };
            let theme = commands::theme::run(&pulse, action)?;
            println!("{} {}", theme.icon(), theme);
        }

        Commands::Css => {
            let pulse = Pulse::new(&base_dir)?;
            println!("{}", commands::theme::stylesheet(&pulse)?);
        }

        Commands::Version => {
            println!("markdown-pulse version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Ask a yes/no question on the terminal
fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
