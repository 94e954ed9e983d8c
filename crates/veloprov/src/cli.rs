//! Clap derive structures for the `veloprov` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This
//! file is also compiled by `build.rs` for man pages, so it may only use
//! clap, clap_complete, and std.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// veloprov -- provision virtual SD-WAN edges for cloud deployment
#[derive(Debug, Parser)]
#[command(
    name = "veloprov",
    version,
    about = "Provision virtual SD-WAN edges and render their cloud stack templates",
    long_about = "Provision a virtual edge on an SD-WAN orchestrator, attach it to a hub\n\
        configuration profile (created on demand), rewrite its interface layout\n\
        for cloud hosting, and fill a stack template with its activation key.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Orchestrator profile to use
    #[arg(long, short = 'O', env = "VELOPROV_ORCHESTRATOR", global = true)]
    pub orchestrator: Option<String>,

    /// Orchestrator hostname or URL (overrides profile)
    #[arg(long, env = "VCO_HOSTNAME", global = true)]
    pub host: Option<String>,

    /// Portal API token
    #[arg(long, env = "VCO_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VELOPROV_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "VELOPROV_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "VELOPROV_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Settings for the first synthesized WAN interface.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WanRole {
    /// Keep the LAN-facing settings it is copied from
    MirrorLan,
    /// NAT on, not advertised, no overlay
    Underlay,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Provision a virtual edge and render its stack template
    #[command(alias = "prov")]
    Provision(ProvisionArgs),

    /// List or ensure configuration profiles
    #[command(alias = "prof")]
    Profiles(ProfilesArgs),

    /// Rewrite a device settings document offline
    Transform(TransformArgs),

    /// Work with cloud stack templates
    #[command(alias = "tpl")]
    Template(TemplateArgs),

    /// Manage CLI configuration and orchestrator profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Provision ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// Configuration profile to attach the edge to (created if missing)
    #[arg(long)]
    pub profile_name: Option<String>,

    /// Prefix for the generated edge name
    #[arg(long)]
    pub edge_prefix: Option<String>,

    /// Exact edge name (skips name generation)
    #[arg(long)]
    pub edge_name: Option<String>,

    /// Expected enterprise name; abort if the token belongs to another
    #[arg(long)]
    pub enterprise: Option<String>,

    /// Settings for the first WAN interface
    #[arg(long, value_enum)]
    pub first_wan_role: Option<WanRole>,

    /// Stack template to populate (bundled template when omitted)
    #[arg(long, short = 't')]
    pub template: Option<PathBuf>,

    /// Key pair name written into the template
    #[arg(long)]
    pub key_pair: Option<String>,

    /// Where to write the populated template
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Skip template rendering
    #[arg(long, conflicts_with_all = ["template", "out", "key_pair"])]
    pub no_template: bool,
}

// ── Profiles ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    pub command: ProfilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCommand {
    /// List the enterprise's configuration profiles
    #[command(alias = "ls")]
    List,

    /// Find a profile by name, creating it if absent
    Ensure {
        /// Profile name (exact match)
        name: String,
    },
}

// ── Transform ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Device settings JSON: a module `data` object or a full configuration stack
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Settings for the first WAN interface
    #[arg(long, value_enum)]
    pub first_wan_role: Option<WanRole>,
}

// ── Template ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommand,
}

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// Fill a stack template's parameter defaults
    Render {
        /// Stack template to populate (bundled template when omitted)
        #[arg(long, short = 't')]
        template: Option<PathBuf>,

        /// Edge activation key
        #[arg(long)]
        activation_key: String,

        /// Edge name
        #[arg(long)]
        edge_name: String,

        /// Key pair name
        #[arg(long)]
        key_pair: Option<String>,

        /// Output path (`-` for stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the bundled stack template
    Bundled,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Store an API token in the system keyring
    SetToken {
        /// Orchestrator profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
