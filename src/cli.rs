//! Command-line interface for the launch dashboard.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_DATA_PATH: &str = "spacex_launch_dash.csv";
pub const DEFAULT_PORT: u16 = 8051;

#[derive(Parser, Debug)]
#[command(name = "spacex-dash")]
#[command(author, version, about = "Launch records dashboard: success by site and payload correlation")]
pub struct Cli {
    /// Launch table to load (.csv, .json or .parquet)
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Local port for the JSON API
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Serve the API only, without opening the dashboard window
    #[arg(long)]
    pub headless: bool,
}

impl Cli {
    pub fn api_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}
