//! Entry point: logging setup, config loading, interrupt handling, and
//! command dispatch.

mod cli;
mod error_fmt;
mod run;

use clap::Parser;
use cli::{Cli, FILE_GUARD, JSON_MODE};
use eyre::{Result, WrapErr};
use std::fs;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    let (cfg, cfg_note) = match load_config(&cli) {
        Ok(v) => v,
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    };
    init_tracing(&cli, &cfg.logging);
    if let Some(note) = cfg_note {
        tracing::info!("{note}");
    }
    install_interrupt_handler();

    if let Err(err) = run::run(&cfg, &cli.cmd) {
        report(&err);
        std::process::exit(1);
    }
    Ok(())
}

/// Load the TOML config, falling back to defaults when the file is absent.
fn load_config(cli: &Cli) -> Result<(dial_config::Config, Option<String>)> {
    if cli.config.exists() {
        let text = fs::read_to_string(&cli.config)
            .wrap_err_with(|| format!("failed to read config {}", cli.config.display()))?;
        let cfg = dial_config::load_toml(&text)
            .wrap_err_with(|| format!("failed to parse config {}", cli.config.display()))?;
        Ok((cfg, None))
    } else {
        Ok((
            dial_config::Config::default(),
            Some(format!(
                "config {} not found; using defaults",
                cli.config.display()
            )),
        ))
    }
}

fn init_tracing(cli: &Cli, logging: &dial_config::Logging) {
    use tracing_subscriber::EnvFilter;

    let level = logging
        .level
        .clone()
        .unwrap_or_else(|| cli.log_level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.file {
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(".", path),
            Some("hourly") => tracing_appender::rolling::hourly(".", path),
            _ => tracing_appender::rolling::never(".", path),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        if cli.json {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .json()
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
        }
    } else if cli.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn install_interrupt_handler() {
    // No graceful shutdown of in-flight motion: the actuator and session are
    // left wherever the current pulse leaves them.
    if let Err(e) = ctrlc::set_handler(|| {
        tracing::warn!("interrupt received; exiting");
        std::process::exit(130);
    }) {
        tracing::warn!(error = %e, "failed to install interrupt handler");
    }
}

fn report(err: &eyre::Report) {
    if JSON_MODE.get().copied().unwrap_or(false) {
        eprintln!("{}", error_fmt::to_json(err));
    } else {
        eprintln!("{}", error_fmt::humanize(err));
    }
}
