use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::ops::board::SortOrder;

#[derive(Parser)]
#[command(name = "osb", about = concat!("osb v", env!("CARGO_PKG_VERSION"), " - OpenSpec changes, specs and ideas on one board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Client config file (default: <config dir>/openspec-board/config.toml)
    #[arg(long, global = true, env = "OSB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Dashboard server URL, overriding the config file
    #[arg(long, global = true, env = "OSB_SERVER")]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered sources
    Sources,
    /// List changes (filtered and sorted like the board)
    Changes(BoardArgs),
    /// Show the kanban board
    Board(BoardArgs),
    /// Show a change with its proposal, design, specs and tasks
    Show(IdArgs),
    /// List specs, grouped by source
    Specs(SpecsArgs),
    /// Print one spec
    Spec(IdArgs),
    /// List ideas
    Ideas(SpecsArgs),
    /// Create, edit or delete an idea
    Idea(IdeaCmd),
    /// Show the server configuration
    Config,
    /// Add or remove a source
    Source(SourceCmd),
    /// Print live update signals as they arrive
    Watch(WatchArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args, Default)]
pub struct BoardArgs {
    /// Only this source
    #[arg(long)]
    pub source: Option<String>,
    /// Case-insensitive substring filter
    #[arg(long)]
    pub search: Option<String>,
    /// Change ordering
    #[arg(long, value_enum, default_value_t = SortOrder::NameAsc)]
    pub sort: SortOrder,
    /// Include archived changes
    #[arg(long)]
    pub archived: bool,
}

#[derive(Args)]
pub struct IdArgs {
    /// Resource id, e.g. proj-a/add-auth
    pub id: String,
}

#[derive(Args)]
pub struct SpecsArgs {
    /// Only this source
    #[arg(long)]
    pub source: Option<String>,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Exit after this many update signals
    #[arg(long)]
    pub count: Option<u64>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdeaCmd {
    #[command(subcommand)]
    pub action: IdeaAction,
}

#[derive(Subcommand)]
pub enum IdeaAction {
    /// Capture a new idea
    Add {
        /// Idea title
        title: String,
        /// Longer description
        #[arg(long, short, default_value = "")]
        description: String,
        /// Source id the idea belongs to
        #[arg(long)]
        project: Option<String>,
    },
    /// Change an idea's title or description
    Edit {
        /// Idea id
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Delete an idea
    Rm {
        /// Idea id
        id: String,
    },
}

#[derive(Args)]
pub struct SourceCmd {
    #[command(subcommand)]
    pub action: SourceAction,
}

#[derive(Subcommand)]
pub enum SourceAction {
    /// Register a project root
    Add {
        /// Display name
        name: String,
        /// Path to the project root on the server
        path: String,
    },
    /// Unregister a source by name
    Rm {
        name: String,
    },
}
