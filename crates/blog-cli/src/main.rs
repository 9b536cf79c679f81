//! blog CLI - manage and serve a blog store from the command line.

mod commands;
mod output;
mod seed;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "blog")]
#[command(author, version, about = "Blog store CLI and HTTP server")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    format: output::OutputFormat,

    /// Store path (defaults to current directory)
    #[arg(long, short = 'C', global = true)]
    path: Option<std::path::PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new store
    Init {
        /// Display name of the blog
        #[arg(long, short = 'n')]
        name: Option<String>,
    },

    /// Start the HTTP API
    Serve {
        /// Port to listen on
        #[arg(long, short = 'p', env = "APP_PORT", default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "APP_HOST", default_value = "127.0.0.1")]
        host: String,
    },

    /// Load users and their posts from a YAML or JSON file
    Seed {
        /// Seed file path
        file: std::path::PathBuf,
    },

    /// Inspect users
    #[command(subcommand)]
    Users(UsersCommands),

    /// Inspect posts
    #[command(subcommand)]
    Posts(PostsCommands),
}

#[derive(Subcommand)]
enum UsersCommands {
    /// List users, newest first
    #[command(alias = "ls")]
    List {
        /// Maximum number of users
        #[arg(long)]
        limit: Option<usize>,

        /// Number of users to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Show a user by id
    Get {
        /// User id
        id: String,
    },
}

#[derive(Subcommand)]
enum PostsCommands {
    /// List posts, newest first
    #[command(alias = "ls")]
    List {
        /// Only posts written by this user id
        #[arg(long, short = 'a')]
        author: Option<String>,

        /// Maximum number of posts
        #[arg(long)]
        limit: Option<usize>,

        /// Number of posts to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Show a post by id
    Get {
        /// Post id
        id: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let store_path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Commands::Init { name } => commands::init(&store_path, name, cli.format),
        Commands::Serve { port, host } => commands::serve(&store_path, &host, port),
        Commands::Seed { file } => commands::seed(&store_path, &file, cli.format),
        Commands::Users(UsersCommands::List { limit, offset }) => {
            commands::users_list(&store_path, limit, offset, cli.format)
        }
        Commands::Users(UsersCommands::Get { id }) => {
            commands::users_get(&store_path, &id, cli.format)
        }
        Commands::Posts(PostsCommands::List {
            author,
            limit,
            offset,
        }) => commands::posts_list(&store_path, author.as_deref(), limit, offset, cli.format),
        Commands::Posts(PostsCommands::Get { id }) => {
            commands::posts_get(&store_path, &id, cli.format)
        }
    }
}
