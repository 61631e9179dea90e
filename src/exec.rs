use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use crate::{cache::CredentialRecord, constants::CREDENTIAL_ENV_VARS};

/// Run the user command under the resolved credentials and return its exit
/// code.
///
/// Pre-existing credential variables are cleared from the child environment
/// before the resolved ones are set, so the assumed role always wins over
/// whatever the invoking shell exported.
pub async fn run_command(
    command: &[String],
    record: &CredentialRecord,
    region: Option<&str>,
) -> Result<i32> {
    let command_line = command.join(" ");
    debug!("Executing via shell: {}", command_line);

    let mut child = Command::new("sh");
    child.arg("-c").arg(&command_line);

    for var in CREDENTIAL_ENV_VARS {
        child.env_remove(var);
    }

    if let Some(region) = region {
        child.env("AWS_DEFAULT_REGION", region);
        child.env("AWS_REGION", region);
    }

    child
        .env("AWS_ACCESS_KEY_ID", &record.access_key_id)
        .env("AWS_SECRET_ACCESS_KEY", &record.secret_access_key)
        .env("AWS_SESSION_TOKEN", &record.session_token);

    let status = child
        .status()
        .await
        .with_context(|| format!("Failed to execute command: {command_line}"))?;

    // Signal-terminated children carry no code; report generic failure
    Ok(status.code().unwrap_or(1))
}
