use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Verbose logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build instruction sheets for saved article pages.
    Build(BuildArgs),
    /// Print the text/image alignment of one article as JSON.
    Align(AlignArgs),
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Article file, or a directory of article files.
    #[arg(long)]
    pub input: String,

    /// Output directory for sheets (must not exist).
    #[arg(long)]
    pub out: String,

    /// Channel configuration (YAML). Built-in defaults when omitted.
    #[arg(long)]
    pub config: Option<String>,

    /// Site parser; overrides `site` from the channel configuration.
    #[arg(long)]
    pub site: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = SheetFormat::Json)]
    pub format: SheetFormat,

    /// RNG seed for speaker rotation and overlay choices.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sentiment classifier.
    #[arg(long, value_enum, default_value_t = ClassifierEngine::Fixed)]
    pub classifier: ClassifierEngine,

    /// Emotion reported by the fixed classifier.
    #[arg(long, default_value = "joy")]
    pub emotion: String,

    /// Program run by the command classifier (text on stdin, label on stdout).
    #[arg(long)]
    pub classifier_command: Option<String>,

    /// Argument passed to the classifier command (repeatable).
    #[arg(long = "classifier-arg")]
    pub classifier_args: Vec<String>,
}

#[derive(Debug, Args)]
pub struct AlignArgs {
    /// Article file.
    #[arg(long)]
    pub input: String,

    /// Site parser.
    #[arg(long, default_value = "json")]
    pub site: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SheetFormat {
    Json,
    Tsv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassifierEngine {
    Fixed,
    Command,
}
