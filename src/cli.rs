use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes a default quire.toml, templates, stylesheet and books directory
    Init,
    /// Binds every manuscript into an EPUB, skipping books that already exist
    Epub,
    /// Renders every manuscript into a static HTML site with author and index pages
    Html,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short, long, default_value = "quire.toml", env = "QUIRE_CONFIG", global = true)]
    pub config: PathBuf,

    /// Log more detail (repeat for even more)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Commands,
}
