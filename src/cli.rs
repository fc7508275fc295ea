use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sanctum", version, about = "Fixed-program workout tracker")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Emit machine-readable JSON instead of colorful text.
    #[arg(global = true, long)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Training calendar, rest days, and deload scheduling
    #[command(subcommand, visible_alias = "p")]
    Plan(PlanCmd),

    /// Run and log workout sessions
    #[command(subcommand, visible_alias = "w")]
    Workout(WorkoutCmd),

    /// Cycle volume, PRs, and training frequency
    #[command(visible_alias = "st")]
    Status {
        /// Show the weekly volume graph instead of the summary
        #[arg(short, long)]
        graph: bool,

        /// Weeks of history for the graph
        #[arg(short, long, default_value = "8")]
        weeks: u32,
    },

    /// View or edit sanctum config
    #[command(subcommand)]
    Config(ConfigCmd),

    /// Backup, restore, and reset stored progress
    #[command(subcommand)]
    Data(DataCmd),
}

#[derive(Subcommand)]
pub enum PlanCmd {
    /// Show the projected training calendar
    #[command(visible_alias = "s")]
    Show,

    /// Toggle an explicit rest day
    #[command(visible_alias = "r")]
    Rest {
        /// Date in YYYY-MM-DD (defaults to today)
        date: Option<String>,
    },

    /// Deload week management
    #[command(subcommand, visible_alias = "d")]
    Deload(DeloadCmd),

    /// Set how many weeks sit between deloads
    Interval { weeks: u32 },

    /// Set the current cycle number
    Cycle { cycle: u32 },
}

#[derive(Subcommand)]
pub enum DeloadCmd {
    /// Begin a deload week starting now
    Start,

    /// End the active deload and restart the interval clock
    End,

    /// Dismiss the current deload suggestion without deloading
    Skip,
}

#[derive(Subcommand)]
pub enum WorkoutCmd {
    /// Start (or resume) a session for a program day
    #[command(visible_alias = "s")]
    Start {
        /// Program day 1-6 (defaults to the next uncompleted day)
        day: Option<u32>,
    },

    /// Show the current session
    #[command(visible_alias = "i")]
    Show,

    /// Log a set - Usage: workout set EXERCISE WEIGHT REPS
    #[command(override_usage = "workout set <EXERCISE> <WEIGHT> <REPS>")]
    Set {
        /// 1-based exercise index (same order shown in `workout show`)
        #[arg(value_name = "EXERCISE")]
        exercise: usize,

        /// Weight in the configured unit
        #[arg(value_name = "WEIGHT")]
        weight: f64,

        /// Number of reps
        #[arg(value_name = "REPS")]
        reps: u32,

        /// Specific set number to log (defaults to next unlogged set)
        #[arg(long, short = 's')]
        set: Option<usize>,
    },

    /// Skip an exercise for this session
    Skip {
        /// 1-based exercise index
        exercise: usize,
    },

    /// Swap an exercise for a substitute this session
    #[command(visible_alias = "sw")]
    Replace {
        /// 1-based exercise index
        exercise: usize,

        /// Name of the exercise actually performed
        substitute: String,
    },

    /// Attach a note to an exercise
    #[command(visible_alias = "n")]
    Note {
        /// 1-based exercise index
        exercise: usize,

        /// Free-form text
        note: String,
    },

    /// Start a rest timer for an exercise's category
    Rest {
        /// 1-based exercise index
        exercise: usize,
    },

    /// Show elapsed session time and any running rest timer
    #[command(visible_alias = "t")]
    Timer,

    /// Discard the current session
    #[command(visible_alias = "c")]
    Cancel,

    /// Validate, compute volume, and append the session to the log
    #[command(visible_alias = "f")]
    Finish {
        /// Session notes
        #[arg(long)]
        notes: Option<String>,

        /// Finish even with incomplete sets
        #[arg(long)]
        force: bool,
    },

    /// Show a completed workout from a specific date
    Log {
        /// Date in YYYY-MM-DD format
        date: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}

#[derive(Subcommand)]
pub enum DataCmd {
    /// Export progress to a JSON backup
    Export {
        /// Output file path (defaults to sanctum-backup-DATE.json)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Import progress from a JSON backup
    Import {
        /// Input JSON file path
        file: String,
    },

    /// Wipe all stored progress and active sessions
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
