use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "plotz", bin_name = "plotz", version = get_version())]
#[command(about = "Keep track of what grows in your garden and what it needs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the garden data and config.json (default: $PLOTZ_HOME)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage plants
    #[command(alias = "p")]
    Plants {
        #[command(subcommand)]
        action: Option<PlantCommand>,
    },

    /// Manage garden activities
    #[command(alias = "a")]
    Activities {
        #[command(subcommand)]
        action: Option<ActivityCommand>,
    },

    /// Get or set garden settings
    Settings {
        /// Setting key (e.g., garden-name)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,

        /// Restore every setting to its default
        #[arg(long, conflicts_with_all = ["key", "value"])]
        reset: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., log-level)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlantCommand {
    /// List plants
    #[command(alias = "ls")]
    List {
        /// Only plants with this status (growing, harvested, dormant)
        #[arg(long)]
        status: Option<String>,

        /// Only plants in this location (e.g. herb-garden)
        #[arg(long)]
        location: Option<String>,

        /// Search name and variety
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one plant and its activities
    #[command(alias = "v")]
    View { id: String },

    /// Add a plant
    #[command(alias = "n")]
    Add {
        name: String,

        /// Where it grows (vegetable-bed, herb-garden, flower-bed, container, greenhouse)
        #[arg(short, long)]
        location: String,

        #[arg(long, default_value = "")]
        variety: String,

        /// Planting date: YYYY-MM-DD, today, yesterday or tomorrow
        #[arg(long, default_value = "today")]
        planted: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Change fields of a plant
    #[command(alias = "e")]
    Edit {
        id: String,

        #[command(flatten)]
        fields: PlantFields,
    },

    /// Delete a plant
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct PlantFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub variety: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub planted: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ActivityCommand {
    /// List activities
    #[command(alias = "ls")]
    List {
        /// Only activities due now or later, soonest first
        #[arg(long, conflicts_with = "recent")]
        upcoming: bool,

        /// Only past activities, most recent first
        #[arg(long)]
        recent: bool,

        /// Only activities for this plant id
        #[arg(long)]
        plant: Option<String>,

        /// Only activities of this type (watering, planting, ...)
        #[arg(long = "type")]
        kind: Option<String>,
    },

    /// Record or plan an activity
    #[command(alias = "n")]
    Add {
        /// Activity type (watering, planting, harvesting, pruning, fertilizing)
        kind: String,

        /// Plant id
        plant: String,

        /// YYYY-MM-DD, today, yesterday or tomorrow
        #[arg(long, default_value = "today")]
        date: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Change fields of an activity
    #[command(alias = "e")]
    Edit {
        id: String,

        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long)]
        plant: Option<String>,

        #[arg(long)]
        date: Option<String>,

        /// New notes; an empty string clears them
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete an activity
    #[command(alias = "rm")]
    Delete {
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}
