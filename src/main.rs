//! Resume lens: upload a resume to the analysis service and render the result

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::error;
use resume_lens::cli::{self, Cli, Commands, ConfigAction};
use resume_lens::client::{AnalysisResult, HttpAnalysisClient};
use resume_lens::config::{Config, OutputFormat};
use resume_lens::error::SubmissionError;
use resume_lens::input::file_detector::{ACCEPT_FILTER, SIZE_HINT};
use resume_lens::input::{CandidateFile, DragEvent, FileSource};
use resume_lens::output::formatter::save_report_to_file;
use resume_lens::output::{render, ReportContext, ReportGenerator};
use resume_lens::session::{PendingSubmission, Session};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run_command(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("Command failed: {:#}", e);
            process::exit(1);
        }
    }
}

/// `Ok(false)` means the session ended in an error state that was already shown.
async fn run_command(cli: Cli) -> anyhow::Result<bool> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    match cli.command {
        Commands::Analyze {
            file,
            location,
            output,
            save,
            no_color,
        } => {
            let config = load_config(&config_path, cli.api_url)?;
            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(anyhow::Error::msg)?,
                None => config.output.format,
            };
            let use_colors = config.output.color_output && !no_color;
            if !use_colors {
                colored::control::set_override(false);
            }

            analyze(&config, &file, location, format, use_colors, save.as_deref()).await
        }

        Commands::Interactive { location } => {
            let config = load_config(&config_path, cli.api_url)?;
            if !config.output.color_output {
                colored::control::set_override(false);
            }
            interactive(&config, location).await
        }

        Commands::Config { action } => {
            config_command(action, &config_path)?;
            Ok(true)
        }
    }
}

fn load_config(path: &Path, api_url: Option<String>) -> anyhow::Result<Config> {
    let config = Config::load_or_init(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok(config.with_env().with_base_url_override(api_url))
}

async fn analyze(
    config: &Config,
    file: &Path,
    location: Option<String>,
    format: OutputFormat,
    use_colors: bool,
    save: Option<&Path>,
) -> anyhow::Result<bool> {
    let candidate = CandidateFile::from_path(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut session = Session::with_timeout(config.timeout());
    if let Some(location) = &location {
        session.set_location(location);
    }

    if session.select_file(FileSource::Picker(vec![candidate])).is_err() {
        print_error(&session);
        return Ok(false);
    }

    let client = HttpAnalysisClient::new(config.endpoint(), config.timeout())?;
    let spinner = pending_spinner(format!("Analyzing {} via {}", file.display(), client.endpoint()));
    session.submit(&client).await;
    spinner.finish_and_clear();

    show_outcome(&session, format, use_colors, save)
}

/// A request in flight, owning its token until it settles.
type InFlight<'a> = Pin<
    Box<dyn Future<Output = (PendingSubmission, Result<AnalysisResult, SubmissionError>)> + 'a>,
>;

enum LoopEvent {
    Line(Option<String>),
    Settled(PendingSubmission, Result<AnalysisResult, SubmissionError>),
}

async fn interactive(config: &Config, location: Option<String>) -> anyhow::Result<bool> {
    let client = HttpAnalysisClient::new(config.endpoint(), config.timeout())?;
    let mut session = Session::with_timeout(config.timeout());
    if let Some(location) = &location {
        session.set_location(location);
    }

    println!("{}", "Resume Lens".bold());
    println!(
        "Drop a resume into this terminal or type its path ({}; {}).",
        ACCEPT_FILTER, SIZE_HINT
    );
    println!("Analysis service: {}", client.endpoint());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<InFlight<'_>> = None;

    loop {
        // `next_line` is cancel safe, so losing the race to a settled request drops no input.
        let event = match in_flight.as_mut() {
            Some(request) => tokio::select! {
                (submission, outcome) = request => LoopEvent::Settled(submission, outcome),
                line = lines.next_line() => LoopEvent::Line(line?),
            },
            None => LoopEvent::Line(lines.next_line().await?),
        };

        let line = match event {
            LoopEvent::Settled(submission, outcome) => {
                in_flight = None;
                session.settle(submission, outcome);
                show_outcome(&session, OutputFormat::Console, config.output.color_output, None)?;
                continue;
            }
            LoopEvent::Line(None) => break,
            LoopEvent::Line(Some(line)) => line,
        };

        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => print_help(),
            "show" => print_session(&session),
            "location" => {
                session.set_location(rest);
                match session.location_hint() {
                    Some(hint) => println!("Location: {}", hint),
                    None => println!("Location cleared"),
                }
            }
            "submit" if !session.can_submit() => {
                eprintln!("{} A submission is already in progress", "…".yellow());
            }
            "submit" => match session.begin_submit() {
                Ok(submission) => {
                    println!("Analyzing {} via {}...", submission.request().file.name(), client.endpoint());
                    let client = &client;
                    in_flight = Some(Box::pin(async move {
                        let outcome = submission.run(client).await;
                        (submission, outcome)
                    }));
                }
                Err(_) => print_error(&session),
            },
            _ => drop_paths(&mut session, line).await,
        }
    }

    if in_flight.is_some() {
        eprintln!("{} Leaving with a submission still in flight", "…".yellow());
        return Ok(false);
    }

    Ok(session.error_message().is_none())
}

/// A pasted line of paths is what a terminal produces for a drag-and-drop.
async fn drop_paths(session: &mut Session, line: &str) {
    let paths: Vec<PathBuf> = cli::split_dropped_paths(line);
    session.handle_drag(DragEvent::Enter);

    let mut files = Vec::new();
    for path in &paths {
        match CandidateFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => eprintln!("{} Could not read {}: {}", "✗".red(), path.display(), e),
        }
    }

    if files.is_empty() {
        session.handle_drag(DragEvent::Leave);
        return;
    }

    session.handle_drag(DragEvent::Drop(files));
    match (session.error_message(), session.candidate()) {
        (Some(_), _) => print_error(session),
        (None, Some(candidate)) => println!(
            "{} Selected {} ({} bytes)",
            "✓".green(),
            candidate.name(),
            candidate.len()
        ),
        (None, None) => {}
    }
}

fn show_outcome(
    session: &Session,
    format: OutputFormat,
    use_colors: bool,
    save: Option<&Path>,
) -> anyhow::Result<bool> {
    let Some(view) = render(session.state()) else {
        print_error(session);
        return Ok(false);
    };

    let context = ReportContext::new(session.candidate().map(|c| c.name().to_string()));
    let generator = ReportGenerator::with_options(use_colors && save.is_none(), true, true, true);
    let content = generator.generate_report(&view, &context, &format)?;

    match save {
        Some(path) => {
            save_report_to_file(&content, path)?;
            println!("{} Report saved to {}", "✓".green(), path.display());
        }
        None => println!("{}", content),
    }

    Ok(true)
}

fn print_error(session: &Session) {
    if let Some(message) = session.error_message() {
        eprintln!("{} {}", "✗".red(), message.red());
    }
}

fn print_session(session: &Session) {
    println!(
        "File: {}",
        session.candidate().map(|c| c.name()).unwrap_or("(none)")
    );
    println!(
        "Location: {}",
        session
            .location_hint()
            .map(|h| h.to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("State: {}", session.state().label());
    print_error(session);
}

fn print_help() {
    println!("Commands: <path>  location <text>  submit  show  help  quit");
}

fn pending_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn config_command(action: Option<ConfigAction>, path: &Path) -> anyhow::Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config = Config::load_or_init(path)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Reset => {
            Config::default().save_to(path)?;
            println!("Configuration reset: {}", path.display());
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_init(path)?;
            config.set(&key, &value)?;
            config.save_to(path)?;
            println!("Set {} = {}", key, value);
        }
    }
    Ok(())
}
