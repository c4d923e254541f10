use anyhow::{Context, Result};
use cli::Cli;
use config::Configuration;
use indicatif::{ProgressBar, ProgressStyle};
use library::{BatchReport, Library};
use locale::LocaleTable;
use log::{LevelFilter, Log, Metadata, Record};
use sinks::{EpubSink, SiteSink};
use std::process::ExitCode;

mod cli;
mod config;
mod errors;
mod init;
mod library;
mod locale;
mod manuscript;
mod sinks;
mod template;

fn main() -> ExitCode {
    match try_main() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}: {e:#}", console::style("Error").red());
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the run finished but some manuscripts failed.
fn try_main() -> Result<bool> {
    use clap::Parser;
    let cli = Cli::parse();

    let progress = ProgressBar::new(0);
    init_logging(cli.verbose, progress.clone())?;

    match &cli.command {
        cli::Commands::Init => {
            let written = init::run(&cli.config)?;
            println!("Initialised project ({} file(s) written).", written.len());
            Ok(true)
        }
        cli::Commands::Epub => {
            let config = Configuration::load(&cli.config)?;
            let locales = LocaleTable::builtin().with_overrides(&config.locales);
            let library = Library::scan(&config.books_dir, &config.manuscript_glob)?;
            let mut sink = EpubSink::new(&config.epub, &locales)?;

            let report = library::bind(&library, &mut sink, &progress_bar(progress, &library))?;
            print_report(&report, "book(s) created");
            Ok(!report.has_failures())
        }
        cli::Commands::Html => {
            let config = Configuration::load(&cli.config)?;
            let library = Library::scan(&config.books_dir, &config.manuscript_glob)?;
            let mut sink = SiteSink::new(&config.html)?;

            let report = library::bind(&library, &mut sink, &progress_bar(progress, &library))?;
            print_report(&report, "page(s) created");
            println!("  Site:    {}", config.html.build_dir.join("index.html").display());
            Ok(!report.has_failures())
        }
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Writes log records with the progress bar cleared, so lines don't land in
/// the middle of it.
struct ProgressLogger {
    inner: env_logger::Logger,
    progress: ProgressBar,
}

impl Log for ProgressLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.inner.matches(record) {
            self.progress.suspend(|| self.inner.log(record));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

fn init_logging(verbose: u8, progress: ProgressBar) -> Result<()> {
    let inner = env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .format_timestamp(None)
        .parse_default_env()
        .build();
    let max_level = inner.filter();
    log::set_boxed_logger(Box::new(ProgressLogger { inner, progress }))
        .with_context(|| "Failed to install logger")?;
    log::set_max_level(max_level);
    Ok(())
}

fn progress_bar(progress: ProgressBar, library: &Library) -> ProgressBar {
    log::info!(
        "found {} manuscript(s) in {}",
        library.manuscript_count(),
        library.root.display()
    );
    progress.set_length(library.manuscript_count() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress
}

fn print_report(report: &BatchReport, created: &str) {
    println!();
    println!("  {} {}", report.created, created);
    if report.skipped > 0 {
        println!("  {} skipped (already built)", report.skipped);
    }
    if report.has_failures() {
        println!(
            "  {} {}:",
            report.failed.len(),
            console::style("failed").red()
        );
        for path in &report.failed {
            println!("    {}", path.display());
        }
    }
}
