use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_tools::cli::{orchestration, Cli, Command};
use release_tools::git::Repository;
use release_tools::{ui, ReleaseError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ReleaseError>() {
                Some(ReleaseError::InvalidReleaseNotes(violations)) => {
                    ui::display_violations(violations)
                }
                _ => ui::display_error(&format!("{:#}", e)),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = orchestration::load_config(cli.config.as_deref(), &cli.command.overrides())?;

    match cli.command {
        Command::CutRelease(args) => {
            let repository = orchestration::open_repository(&config)?;
            if !confirmed(&repository, "Cut release", args.release_version, args.yes)? {
                return Ok(());
            }
            let branch = orchestration::cut_release(&config, &repository, args.release_version)?;
            ui::display_success(&format!("Release branch created: {}", branch.name));
        }
        Command::FinalizeRelease(args) => {
            let repository = orchestration::open_repository(&config)?;
            if !confirmed(&repository, "Finalize release", args.release_version, args.yes)? {
                return Ok(());
            }
            let version =
                orchestration::finalize_release(&config, &repository, args.release_version)?;
            ui::display_success(&format!("Release finalized: {}", version));
        }
        Command::ReleaseNotes(args) => {
            let repository = orchestration::open_repository(&config)?;
            ui::display_status("Generating release notes...");
            let pull_request =
                orchestration::release_notes(&config, &repository, args.release_version)?;
            ui::display_success(&format!(
                "Release notes pull request created: {}",
                pull_request.url
            ));
        }
        Command::CheckReleaseNotes => {
            let items = orchestration::check_release_notes(std::io::stdin().lock())?;
            ui::display_success(&format!("{} release notes found", items.len()));
        }
    }
    Ok(())
}

fn confirmed(
    repository: &dyn Repository,
    action: &str,
    version: Option<release_tools::domain::Version>,
    skip_prompt: bool,
) -> Result<bool> {
    let version = version.map(|v| v.to_string());
    ui::display_release_plan(
        action,
        version.as_deref(),
        &repository.directory().display().to_string(),
    );
    if skip_prompt {
        return Ok(true);
    }
    let confirmed = ui::confirm_action(&format!("{} and push to upstream?", action))?;
    if !confirmed {
        ui::display_status("Aborted");
    }
    Ok(confirmed)
}
