use clap::Parser;

/// remotepad — turn this window into a touchpad for a remote machine.
#[derive(Parser, Debug)]
#[command(name = "remotepad", version, about)]
pub struct Args {
    /// Server origin override, e.g. "http://192.168.1.50:8080".
    #[arg(short = 's', long)]
    pub server: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
