//! CLI argument definitions using clap

use clap::Parser;

/// Detective Quest: explore the mansion's fixed map one room at a time
#[derive(Parser, Debug)]
#[command(name = "mansion-quest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
