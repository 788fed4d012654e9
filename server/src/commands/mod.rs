use clap::Subcommand;

use crate::Result;

pub(crate) mod info;
pub(crate) mod seed;

#[derive(Subcommand, Default)]
pub(crate) enum Command {
    /// Run the web server (the default)
    #[default]
    Serve,
    /// Insert the sample authors, categories, recipes and learning plans
    Seed,
    /// Print what a running server currently holds
    Info,
}

impl Command {
    pub(crate) async fn run(&self) -> Result<()> {
        match &self {
            Command::Serve => crate::http_server::cmd::serve().await,
            Command::Seed => seed::seed().await,
            Command::Info => info::print_info().await,
        }
    }
}
