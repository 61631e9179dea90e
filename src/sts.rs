use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sts::Client as StsClient;
use aws_sdk_sts::config::Credentials as StaticCredentials;
use chrono::{DateTime, Utc};
use dialoguer::{Input, theme::ColorfulTheme};
use tracing::{debug, info};

use crate::{
    cache::CredentialRecord,
    config::SourceCredentials,
    constants::DEFAULT_AWS_REGION,
};

/// Parameters for one role-assumption exchange
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    pub role_arn: String,
    pub session_name: String,
    pub duration_seconds: i32,
    pub mfa_serial: Option<String>,
}

/// Seam between the broker and the identity service
#[async_trait]
pub trait TokenExchange {
    async fn assume_role(&self, request: &ExchangeRequest) -> Result<CredentialRecord>;
}

/// STS-backed exchange using the source profile's long-lived keys as the
/// caller identity
pub struct StsExchange {
    source: SourceCredentials,
    region: Option<String>,
}

impl StsExchange {
    pub fn new(source: SourceCredentials, region: Option<String>) -> Self {
        Self { source, region }
    }

    async fn client(&self) -> StsClient {
        let region = match &self.region {
            Some(region) => region.clone(),
            None => {
                info!(
                    "No region configured, using default {} for STS",
                    DEFAULT_AWS_REGION
                );
                DEFAULT_AWS_REGION.to_string()
            }
        };

        let credentials = StaticCredentials::new(
            self.source.access_key_id.clone(),
            self.source.secret_access_key.clone(),
            None,
            None,
            "awsudo-source-profile",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(region))
            .load()
            .await;

        StsClient::new(&config)
    }
}

#[async_trait]
impl TokenExchange for StsExchange {
    async fn assume_role(&self, request: &ExchangeRequest) -> Result<CredentialRecord> {
        info!("Calling AWS STS AssumeRole");
        debug!("Role ARN: {}", request.role_arn);
        debug!("Session name: {}", request.session_name);
        debug!("Duration: {} seconds", request.duration_seconds);

        let client = self.client().await;

        let mut call = client
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.session_name)
            .duration_seconds(request.duration_seconds);

        if let Some(serial) = &request.mfa_serial {
            let code = prompt_mfa_code(serial)?;
            call = call.serial_number(serial).token_code(code);
        }

        let response = call
            .send()
            .await
            .with_context(|| format!("Failed to assume role {}", request.role_arn))?;

        let sts_creds = response
            .credentials()
            .context("AWS STS returned no credentials")?;

        let credentials = CredentialRecord {
            access_key_id: sts_creds.access_key_id().to_string(),
            secret_access_key: sts_creds.secret_access_key().to_string(),
            session_token: sts_creds.session_token().to_string(),
            expiration: convert_expiration(sts_creds.expiration())?,
        };

        info!("Successfully obtained AWS credentials");
        Ok(credentials)
    }
}

/// Block on an operator-supplied one-time code for the configured MFA device
fn prompt_mfa_code(serial: &str) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("MFA code for {serial}"))
        .validate_with(|input: &String| {
            if is_valid_mfa_code(input) {
                Ok(())
            } else {
                Err("MFA code must be 6 or more digits")
            }
        })
        .interact_text()
        .context("Failed to read MFA code")
}

fn is_valid_mfa_code(code: &str) -> bool {
    code.len() >= 6 && code.chars().all(|c| c.is_ascii_digit())
}

fn convert_expiration(expiration: &aws_sdk_sts::primitives::DateTime) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(expiration.secs(), expiration.subsec_nanos())
        .context("STS returned an out-of-range expiration time")
}
