//! Command-line configuration.  Everything is fixed at startup.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::pipeline::CandidatePolicy;
use crate::source::HN_API_BASE;

#[derive(Debug, Parser)]
#[command(name = "quiet-hn")]
#[command(about = "Serve the top Hacker News link stories, fetched concurrently, in rank order")]
#[command(version)]
pub struct Args {
    /// The port to start the web server on
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// The number of top stories to display
    #[arg(long = "num-stories", alias = "num_stories", default_value_t = 30)]
    pub num_stories: usize,

    /// Resolve this many top ids (at least --num-stories) and keep the first
    /// stories to arrive, instead of resolving exactly --num-stories ids
    #[arg(long)]
    pub window: Option<usize>,

    /// Base URL of the Hacker News API
    #[arg(long, default_value = HN_API_BASE)]
    pub api_base: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Show the stories in a terminal view instead of serving HTTP
    #[arg(long)]
    pub tui: bool,

    /// Terminal view refresh interval in seconds
    #[arg(long, default_value_t = 60)]
    pub refresh_secs: u64,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn policy(&self) -> CandidatePolicy {
        match self.window {
            Some(window) => CandidatePolicy::Window(window),
            None => CandidatePolicy::Exact,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }
}
