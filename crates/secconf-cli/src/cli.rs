use clap::{ArgAction, Parser, Subcommand, ValueHint};
use secconf_db::Value;

use crate::utils::{parse_assignment, parse_key};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List events whose deadlines have not long passed
    #[clap(name = "deadlines", visible_alias = "d")]
    Deadlines {
        /// Only events tagged with this name (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List events starting in the next six months
    #[clap(name = "upcoming", visible_alias = "u")]
    Upcoming {
        /// Only events tagged with this name (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List events that took place in the last six months
    #[clap(name = "recent", visible_alias = "r")]
    Recent {
        /// Only events tagged with this name (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Show the latest instance of every conference
    #[clap(name = "most-recent")]
    MostRecent,

    /// Show a conference and all of its events
    #[command(arg_required_else_help = true)]
    Conference {
        /// Numeric id or abbreviation
        key: String,
    },

    /// List all conferences
    Conferences,

    /// List known locations
    Locations,

    /// List meeting types
    #[clap(name = "meeting-types")]
    MeetingTypes,

    /// List tags
    Tags,

    /// Dump every row of a table
    #[command(arg_required_else_help = true)]
    Get {
        /// Table name
        table: String,
    },

    /// Update one row, using the configured write account
    #[command(arg_required_else_help = true)]
    Update {
        /// Table name
        table: String,

        /// Row key, as `column=id`
        #[arg(short, long, value_parser = parse_key)]
        key: (String, i64),

        /// New values, as `column=value`
        #[arg(required = true, value_parser = parse_assignment)]
        values: Vec<(String, Value)>,
    },

    /// Insert one row, using the configured write account
    #[command(arg_required_else_help = true)]
    Create {
        /// Table name
        table: String,

        /// Values, as `column=value`
        #[arg(required = true, value_parser = parse_assignment)]
        values: Vec<(String, Value)>,
    },

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,
}
