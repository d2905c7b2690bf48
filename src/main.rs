mod changeset;
mod commands;
mod core;
mod credentials;
mod host;
mod release;
mod runner;
mod ui;
mod vcs;

use clap::{Parser, Subcommand};
use core::config::RunOverrides;
use core::error::{YardError, print_error};
use std::path::PathBuf;

/// Automate version PRs and registry publishing from changesets
#[derive(Parser)]
#[command(name = "railyard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct RailyardCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Execute the release decision: publish, open a version PR, or skip
  Run {
    /// Change to this directory before doing anything else
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Script that publishes packages to the registry
    #[arg(long)]
    publish_script: Option<String>,

    /// Script that applies pending changesets (default: npx changeset version)
    #[arg(long)]
    version_script: Option<String>,

    /// Title for the version PR
    #[arg(long)]
    title: Option<String>,

    /// Commit message for version commits
    #[arg(long)]
    commit: Option<String>,

    /// Base branch the version PR targets (default: current branch)
    #[arg(long)]
    branch: Option<String>,

    /// Registry whose credentials are reconciled before publishing
    #[arg(long)]
    registry: Option<String>,

    /// Skip configuring the bot git user
    #[arg(long)]
    no_git_user: bool,

    /// Skip creating host releases for published packages
    #[arg(long)]
    no_host_releases: bool,
  },

  /// Show pending changesets and the action a run would take
  Status {
    /// Change to this directory before doing anything else
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = RailyardCli::parse();

  let result = match cli.command {
    Commands::Run {
      cwd,
      publish_script,
      version_script,
      title,
      commit,
      branch,
      registry,
      no_git_user,
      no_host_releases,
    } => {
      let overrides = RunOverrides {
        publish: publish_script,
        version: version_script,
        title,
        commit,
        branch,
        registry,
        no_git_user,
        no_host_releases,
      };
      commands::run_release(cwd, overrides)
    }
    Commands::Status { cwd, json } => commands::run_status(cwd, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: YardError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
