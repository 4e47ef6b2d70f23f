//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::Parser;
use kickstart_core::ResolveMode;

/// kickstart - install the standard/tap toolchain and common dotfiles
///
/// With no flags, updates package.json scripts and dev dependencies, runs the
/// package manager, then writes .editorconfig, .gitignore and .travis.yml.
#[derive(Parser, Debug)]
#[command(name = "kickstart")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Install the toolchain and deploy every template file (the default)
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Deploy every template file without touching dependencies
    #[arg(short = 'A', long)]
    pub all_files: bool,

    /// Deploy .editorconfig
    #[arg(short, long)]
    pub editorconfig: bool,

    /// Deploy .gitignore
    #[arg(short, long)]
    pub gitignore: bool,

    /// Deploy .travis.yml
    #[arg(short, long)]
    pub travis: bool,

    /// Update scripts and dev dependencies, then run the installer
    #[arg(short, long)]
    pub scripts: bool,

    /// Project directory
    #[arg(short, long, default_value = ".")]
    pub dir: Utf8PathBuf,

    /// Path to a config file (default: ~/.kickstart/config.yaml)
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// Version resolution: live registry lookup or the bundled table
    #[arg(long, value_name = "MODE")]
    pub resolve: Option<ResolveMode>,

    /// Kill the installer after this many seconds
    #[arg(long, value_name = "SECS")]
    pub install_timeout: Option<u64>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long)]
    pub quiet: bool,
}
