//! CLI command definitions and dispatch.

pub mod env;
pub mod list;
pub mod run;

use clap::{Parser, Subcommand, ValueEnum};

use cgverify_common::types::Profile;
use cgverify_harness::report::Suite;

/// cgverify — verify a container runtime's cgroup limit handling.
#[derive(Parser, Debug)]
#[command(name = "cgverify", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the scenario matrix against a runtime binary.
    Run(run::RunArgs),
    /// List the scenario matrix without executing anything.
    List(list::ListArgs),
    /// Show the detected cgroup hierarchy and delegation status.
    Env(env::EnvArgs),
}

/// Privilege profile selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    /// Full root.
    Root,
    /// Plain unprivileged user.
    User,
    /// User-namespace isolated.
    Usernamespace,
    /// Fake-root uid mapping.
    Fakeroot,
}

impl std::fmt::Display for ProfileArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::User => write!(f, "user"),
            Self::Usernamespace => write!(f, "usernamespace"),
            Self::Fakeroot => write!(f, "fakeroot"),
        }
    }
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Root => Self::Root,
            ProfileArg::User => Self::User,
            ProfileArg::Usernamespace => Self::UserNamespace,
            ProfileArg::Fakeroot => Self::Fakeroot,
        }
    }
}

/// Scenario suite selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteArg {
    /// Persistent-instance lifecycle scenarios.
    Instance,
    /// One-shot action scenarios.
    Action,
    /// Resource-flag verification scenarios.
    Flags,
}

impl std::fmt::Display for SuiteArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance => write!(f, "instance"),
            Self::Action => write!(f, "action"),
            Self::Flags => write!(f, "flags"),
        }
    }
}

impl From<SuiteArg> for Suite {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Instance => Self::Instance,
            SuiteArg::Action => Self::Action,
            SuiteArg::Flags => Self::Flags,
        }
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => run::execute(args),
        Command::List(args) => list::execute(args),
        Command::Env(args) => env::execute(args),
    }
}
