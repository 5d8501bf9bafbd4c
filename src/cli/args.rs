// src/cli/args.rs
use crate::domain::{ExportFormat, PlanTier};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (default: <config_dir>/tagsmith/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Path to workspace file (default: <data_dir>/tagsmith/workspace.json)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub workspace: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate tags for a text; replaces the current workspace
    Generate {
        /// Text to tag (reads --file or stdin when omitted)
        #[arg(value_name = "TEXT", conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Show the current tags with selection and links
    Tags {
        /// Output the workspace as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit tags and selection
    #[command(subcommand)]
    Tag(TagCommand),

    /// Manage per-tag links and the base URL
    #[command(subcommand)]
    Link(LinkCommand),

    /// Copy tags to the clipboard
    Export {
        /// rich, plain or messaging (default from config)
        #[arg(long, value_name = "FORMAT")]
        format: Option<ExportFormat>,

        /// Export only selected tags
        #[arg(long)]
        selected: bool,

        /// Print instead of copying to the clipboard
        #[arg(long)]
        stdout: bool,
    },

    /// Account and session commands
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Show plan and monthly usage
    Usage,

    /// User and plan administration
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Check that both services respond
    Health,

    /// Manage the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum TagCommand {
    /// Add a tag manually
    Add {
        #[arg(value_name = "TAG")]
        tag: String,
    },
    /// Rename a tag, keeping its link and selection
    Rename {
        #[arg(value_name = "OLD")]
        old: String,
        #[arg(value_name = "NEW")]
        new: String,
    },
    /// Remove a tag
    Remove {
        #[arg(value_name = "TAG")]
        tag: String,
    },
    /// Flip selection of a tag
    Toggle {
        #[arg(value_name = "TAG")]
        tag: String,
    },
    /// Select one or more tags
    Select {
        #[arg(value_name = "TAG", required = true)]
        tags: Vec<String>,
    },
    /// Deselect one or more tags
    Deselect {
        #[arg(value_name = "TAG", required = true)]
        tags: Vec<String>,
    },
    /// Select every tag
    SelectAll,
    /// Clear the selection
    DeselectAll,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LinkCommand {
    /// Link a tag to a URL (an empty URL removes the link)
    Set {
        #[arg(value_name = "TAG")]
        tag: String,
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Remove a tag's link
    Clear {
        #[arg(value_name = "TAG")]
        tag: String,
    },
    /// Set the base URL; omit to unset
    Base {
        #[arg(value_name = "URL")]
        url: Option<String>,

        /// Link every current tag through the base URL
        #[arg(long)]
        apply: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Log in and persist the session
    Login {
        #[arg(value_name = "EMAIL")]
        email: String,
        #[arg(long, env = "TAGSMITH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(value_name = "EMAIL")]
        email: String,
        #[arg(long, env = "TAGSMITH_PASSWORD", hide_env_values = true)]
        password: String,
        /// Repeat the password (defaults to --password)
        #[arg(long)]
        confirm: Option<String>,
    },
    /// End the session
    Logout,
    /// Show the logged-in user
    Me {
        #[arg(long)]
        json: bool,
    },
    /// Confirm an email address with the token from the verification mail
    VerifyEmail {
        #[arg(value_name = "TOKEN")]
        token: String,
    },
    /// Request a password reset mail
    ForgotPassword {
        #[arg(value_name = "EMAIL")]
        email: String,
    },
    /// Set a new password with a reset token
    ResetPassword {
        #[arg(value_name = "TOKEN")]
        token: String,
        #[arg(long, env = "TAGSMITH_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Change the password of the logged-in user
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Send the verification mail again (defaults to the logged-in user)
    ResendVerification {
        #[arg(value_name = "EMAIL")]
        email: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    #[command(subcommand)]
    User(AdminUserCommand),
    #[command(subcommand)]
    Plan(AdminPlanCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminUserCommand {
    /// List all users
    List {
        #[arg(long)]
        json: bool,
    },
    /// Move a user to another plan
    SetPlan {
        #[arg(value_name = "USER_ID")]
        user_id: String,
        /// free, plus or pro
        #[arg(value_name = "PLAN")]
        plan: PlanTier,
    },
    /// Delete a user
    Delete {
        #[arg(value_name = "USER_ID")]
        user_id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminPlanCommand {
    /// List plans
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create a plan
    Create {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
        /// Monthly tag limit, -1 for unlimited
        #[arg(long, allow_hyphen_values = true)]
        limit: i64,
        #[arg(long = "feature", value_name = "TEXT")]
        features: Vec<String>,
    },
    /// Update fields of a plan
    Update {
        #[arg(value_name = "PLAN_ID")]
        plan_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<i64>,
        /// Replaces the feature list when given
        #[arg(long = "feature", value_name = "TEXT")]
        features: Vec<String>,
    },
    /// Delete a plan
    Delete {
        #[arg(value_name = "PLAN_ID")]
        plan_id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}
