//! [`Args`] definitions.

use clap::Parser;

/// GraphQL server managing a wallet session with the Welcomy rental contract.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// JSON-RPC endpoint of the ledger, taking precedence over the
    /// configured one.
    #[arg(long, value_name = "URL")]
    pub rpc_url: Option<String>,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// If the command line arguments are malformed, or `--help`/`--version`
    /// is requested.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
