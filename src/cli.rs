use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use crate::{
    broker::CredentialBroker,
    config::ProfileStore,
    constants::{self, DEFAULT_GRACE_SECONDS},
    exec,
    sts::StsExchange,
};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "awsudo",
    version,
    about = "Run a command with cached temporary credentials for an assumed AWS role",
    long_about = None
)]
pub struct Cli {
    #[arg(short = 'v', long, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[arg(help = "AWS profile whose role to assume")]
    pub profile: String,

    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Command to run under the assumed role"
    )]
    pub command: Vec<String>,
}

impl Cli {
    /// Resolve the profile, obtain credentials, and run the command,
    /// returning the child's exit code
    pub async fn execute(self) -> Result<i32> {
        let store = ProfileStore::load()?;
        let profile_config = store.resolve(&self.profile)?;
        let source = store.source_credentials(&profile_config)?;

        let cache_dir =
            constants::get_cache_dir().context("Failed to determine cache directory")?;

        let exchange = StsExchange::new(source, profile_config.region.clone());
        let broker = CredentialBroker::new(&exchange, cache_dir, DEFAULT_GRACE_SECONDS);
        let record = broker.obtain(&profile_config).await?;

        exec::run_command(&self.command, &record, profile_config.region.as_deref()).await
    }
}
