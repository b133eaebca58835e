use clap::{Parser, Subcommand};
use frameseq::Interval;

#[derive(Parser, Debug)]
#[command(name = "fseq", version, about = "Inspect and renumber numbered file sequences")]
pub struct Args {
    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the sequences matching name patterns on disk
    Ls(LsArgs),
    /// Group names given as arguments (or one per line on stdin)
    Group(GroupArgs),
    /// Compact numbers into a range expression
    Compact(CompactArgs),
    /// Expand a range expression into its numbers
    Expand(ExpandArgs),
    /// Print the rename table for moving or renumbering a sequence
    Plan(PlanArgs),
}

#[derive(clap::Args, Debug)]
pub struct LsArgs {
    /// Name patterns: `#` is a 4-digit number, `@@` a 2-digit one, `*` anything
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct GroupArgs {
    /// Names to group; read from stdin when empty
    pub names: Vec<String>,

    /// Treat names as file paths (numbered directories stay apart)
    #[arg(long)]
    pub paths: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct CompactArgs {
    #[arg(required = true)]
    pub values: Vec<u64>,
}

#[derive(clap::Args, Debug)]
pub struct ExpandArgs {
    /// Range expression such as `1-10,20-30x2`
    pub range: Interval,

    /// Print at most this many numbers (required for open ranges)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Source sequence pattern
    pub source: String,

    /// Destination name or directory
    pub destination: String,

    /// Only move these source frames
    #[arg(short, long, default_value = "0-")]
    pub source_frames: Interval,

    /// Renumber the moved frames with these numbers
    #[arg(short, long)]
    pub destination_frames: Option<Interval>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}
