mod api;
mod app;
mod config;
mod error;
mod events;
mod logger;
mod state;
mod ui;
mod utils;

use crate::app::App;
use crate::config::Config;
use anyhow::Result;
use clap::{App as ClapApp, Arg};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = ClapApp::new("planreg-tui")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A terminal user interface for the energy-savings plan registry")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory containing config.yml")
                .takes_value(true),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    App::start(config).await
}
