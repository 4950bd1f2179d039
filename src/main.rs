mod commands;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use taskboard::config::{Config, DEFAULT_STORE_PORT, DEFAULT_STORE_URL};

#[derive(Parser)]
#[command(
    name = "tb",
    version,
    about = "Team task board engine with a local document store"
)]
struct Cli {
    /// Base URL of the document store
    #[arg(long, env = "TASKBOARD_STORE_URL", default_value = DEFAULT_STORE_URL, global = true)]
    store_url: String,

    /// Output as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output (repeat for less)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the local document store
    Serve {
        /// Path to the store database (default: .taskboard/store.db in current dir)
        #[arg(long, env = "TASKBOARD_DB")]
        db: Option<PathBuf>,
        /// Port to listen on
        #[arg(long, default_value_t = DEFAULT_STORE_PORT)]
        port: u16,
        /// Reject every write with 403
        #[arg(long)]
        read_only: bool,
    },
    /// Print the board columns
    Board,
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task description
        #[arg(short, long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Priority (urgent, medium, low)
        #[arg(short, long)]
        priority: Option<String>,
        /// Category (default: User Story)
        #[arg(short, long)]
        category: Option<String>,
        /// Assignee name (repeatable)
        #[arg(short = 'a', long = "assign")]
        assignees: Vec<String>,
        /// Subtask title (repeatable)
        #[arg(short = 's', long = "subtask")]
        subtasks: Vec<String>,
        /// Initial column (todo, inprogress, await_feedback, done)
        #[arg(long)]
        status: Option<String>,
    },
    /// Move a task to another column
    Move {
        /// Task ID or store key
        #[arg(allow_hyphen_values = true)]
        id: String,
        /// Target column
        status: String,
    },
    /// Show detailed info for a task
    Show {
        /// Task ID or store key
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
    /// Edit a task; fields not given keep their value
    Edit {
        /// Task ID or store key
        #[arg(allow_hyphen_values = true)]
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New due date (YYYY-MM-DD, empty to clear)
        #[arg(long)]
        due: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
        /// Replace assignees (repeatable)
        #[arg(short = 'a', long = "assign")]
        assignees: Vec<String>,
    },
    /// Mark a subtask done or open
    Toggle {
        /// Task ID or store key
        #[arg(allow_hyphen_values = true)]
        id: String,
        /// Subtask index (0-based)
        index: usize,
        /// true or false
        #[arg(action = ArgAction::Set)]
        checked: bool,
    },
    /// Delete a task after confirmation
    Delete {
        /// Task ID or store key
        #[arg(allow_hyphen_values = true)]
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

async fn run(cli: Cli) -> Result<(), String> {
    let Cli {
        store_url,
        json,
        command,
        ..
    } = cli;
    let config = || Config::new(&store_url);

    match command {
        Commands::Serve {
            db,
            port,
            read_only,
        } => commands::serve::run(db, port, read_only).await,
        Commands::Board => commands::board::run(&config()?, json).await,
        Commands::Create {
            title,
            description,
            due,
            priority,
            category,
            assignees,
            subtasks,
            status,
        } => {
            commands::create::run(
                &config()?,
                &title,
                description.as_deref(),
                due.as_deref(),
                priority.as_deref(),
                category.as_deref(),
                &assignees,
                &subtasks,
                status.as_deref(),
                json,
            )
            .await
        }
        Commands::Move { id, status } => {
            commands::move_card::run(&config()?, &id, &status, json).await
        }
        Commands::Show { id } => commands::show::run(&config()?, &id, json).await,
        Commands::Edit {
            id,
            title,
            description,
            due,
            priority,
            assignees,
        } => {
            commands::edit::run(
                &config()?,
                &id,
                title.as_deref(),
                description.as_deref(),
                due.as_deref(),
                priority.as_deref(),
                &assignees,
                json,
            )
            .await
        }
        Commands::Toggle { id, index, checked } => {
            commands::toggle::run(&config()?, &id, index, checked, json).await
        }
        Commands::Delete { id, yes } => commands::delete::run(&config()?, &id, yes).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = taskboard::logging::init_tracing(cli.verbose, cli.quiet) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
