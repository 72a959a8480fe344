mod cargo;
mod commands;
mod compare;
mod core;
mod github;
mod notes;
mod release;

use clap::{Parser, Subcommand};
use core::error::{HeraldError, print_error};
use tracing_subscriber::EnvFilter;

/// Env variable overriding the log filter, e.g. `HERALD_LOG=cargo_herald=debug`
const LOG_ENV: &str = "HERALD_LOG";

/// Release notes from git and GitHub, release-needed checks from published artifacts
#[derive(Parser)]
#[command(name = "cargo")]
#[command(bin_name = "cargo")]
#[command(styles = get_styles())]
enum CargoCli {
  Herald(HeraldCli),
}

#[derive(Parser)]
#[command(name = "herald")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct HeraldCli {
  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Setup
  // ============================================================================
  /// Write a starter herald.toml (no-op when a configuration exists)
  Init,

  // ============================================================================
  // Release notes
  // ============================================================================
  /// Release notes data and files
  #[command(subcommand)]
  Notes(NotesCommands),

  // ============================================================================
  // Release gating
  // ============================================================================
  /// Compare the current publications with the previous release
  Compare {
    /// Previous version to compare against (default: newest older tag)
    #[arg(long)]
    previous_version: Option<String>,
  },

  /// Decide whether a release is needed
  ReleaseNeeded {
    /// Fail with exit code 3 when the release is not needed
    #[arg(long)]
    explosive: bool,
  },

  // ============================================================================
  // Publishing
  // ============================================================================
  /// Commit the release notes files
  Commit,

  /// Push the release branch to the remote
  Push {
    /// Also create (if missing) and push the version tag
    #[arg(long)]
    tag: bool,
  },
}

#[derive(Subcommand)]
enum NotesCommands {
  /// Aggregate commits, issues and contributors into the data directory
  Fetch {
    /// Fetch the cross-version digest of noteworthy improvements instead
    #[arg(long)]
    notable: bool,
  },

  /// Fetch all GitHub contributors (skipped when team.contributors is configured)
  Contributors,

  /// Print the detailed release notes
  Preview,

  /// Prepend the detailed release notes to the release notes file
  Update,

  /// Write the notable release notes file
  Notable,
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

fn init_logging(verbose: u8) {
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
    EnvFilter::new(match verbose {
      0 => "warn",
      1 => "warn,cargo_herald=info",
      2 => "info,cargo_herald=debug",
      _ => "debug,cargo_herald=trace",
    })
  });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .compact()
    .init();
}

fn main() {
  let CargoCli::Herald(cli) = CargoCli::parse();
  init_logging(cli.verbose);

  let workspace_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // Init runs before any configuration exists
  if matches!(cli.command, Commands::Init) {
    if let Err(err) = commands::run_init(&workspace_root) {
      handle_error(err);
    }
    return;
  }

  let ctx = match core::context::HeraldContext::build(&workspace_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Init => Ok(()), // handled before the context is built
    Commands::Notes(notes_cmd) => match notes_cmd {
      NotesCommands::Fetch { notable } => commands::run_notes_fetch(&ctx, notable),
      NotesCommands::Contributors => commands::run_notes_contributors(&ctx),
      NotesCommands::Preview => commands::run_notes_preview(&ctx),
      NotesCommands::Update => commands::run_notes_update(&ctx),
      NotesCommands::Notable => commands::run_notes_notable(&ctx),
    },
    Commands::Compare { previous_version } => commands::run_compare(&ctx, previous_version),
    Commands::ReleaseNeeded { explosive } => commands::run_release_needed(&ctx, explosive),
    Commands::Commit => commands::run_commit(&ctx),
    Commands::Push { tag } => commands::run_push(&ctx, tag),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: HeraldError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
