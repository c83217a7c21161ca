use clap::{Args, Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "better-todo",
    version = VERSION,
    about = "To-do lists with due-date grouping and recurring tasks",
    after_help = "\
NOTE:
  Data lives in $BETTER_TODO_DIR, or ./.better-todo when unset.
  Run `better-todo init` before any other command.

EXIT CODES:
  0  Success
  1  Error (DB, validation, unknown task or list, etc.)

GROUPING:
  Open tasks are shown under `No due date`, `This week` and `Forthcoming`.
  Overdue tasks stay in `This week`. Malformed due dates count as undated.
  The week starts on Sunday for en-US style locales, Monday otherwise."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub globals: Globals,
}

#[derive(Args, Debug, Clone, Default)]
pub struct Globals {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Specify list by name or ID
    #[arg(long, global = true)]
    pub list: Option<String>,

    /// Override today's date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Override the locale used for week start and labels (e.g. en-US, es)
    #[arg(long, global = true)]
    pub locale: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize storage and create the default list
    Init,

    /// List management
    #[command(subcommand)]
    List(ListCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show open tasks grouped by due date
    #[command(after_help = "\
NOTE:
  JSON output always carries the completed tasks in `completed`.
  Text output prints them only with --completed.")]
    View {
        /// Also print completed tasks
        #[arg(long)]
        completed: bool,
    },

    /// Recurrence rules
    #[command(subcommand)]
    Recur(RecurCommands),

    /// Show counts for the active list
    Status,
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// Create a new list
    Create {
        /// List name
        name: String,
    },
    /// Show all lists
    Ls,
    /// Set active list
    Activate {
        /// List name or ID
        name: String,
    },
    /// Delete a list with all its tasks
    Delete {
        /// List name or ID
        reference: String,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task at the end of the list
    Add {
        /// Task summary
        summary: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// Change fields of a task; its position is kept
    Update {
        /// Task ID or prefix
        id: String,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "no_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        no_due: bool,
        #[arg(long, value_parser = ["needs_action", "completed"])]
        status: Option<String>,
    },
    /// Delete tasks (unknown IDs are ignored)
    Delete {
        /// Task IDs or prefixes
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Move a task after another one, or to the top
    #[command(after_help = "\
NOTE:
  Without --after the task moves to the top.
  If the --after task does not exist, the task moves to the bottom.")]
    Move {
        id: String,
        #[arg(long)]
        after: Option<String>,
    },
    /// Show task details
    Show {
        /// Task ID or prefix
        id: String,
    },
    /// Complete a task, creating its next occurrence if it recurs
    Done {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum RecurCommands {
    /// Attach or replace a rule (progress restarts at zero)
    Set {
        /// Task ID or prefix
        id: String,
        #[arg(long, default_value = "1")]
        interval: u32,
        #[arg(long, default_value = "days", value_parser = ["days", "weeks", "months", "years"])]
        unit: String,
        /// How the rule ends
        #[arg(long, default_value = "never", value_parser = ["never", "count", "date"])]
        end: String,
        /// Number of occurrences (with --end count)
        #[arg(long)]
        count: Option<u32>,
        /// Last allowed date, YYYY-MM-DD (with --end date)
        #[arg(long)]
        until: Option<String>,
    },
    /// Remove a task's rule
    Clear {
        id: String,
    },
    /// Show a task's rule
    Show {
        id: String,
    },
}
