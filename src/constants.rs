use std::{env, path::PathBuf};

use dirs;

/// Cache directory name under the user's cache directory
pub const CACHE_DIR_NAME: &str = "awsudo";

/// AWS configuration directory name
pub const AWS_CONFIG_DIR_NAME: &str = ".aws";

/// AWS configuration file name
pub const AWS_CONFIG_FILE_NAME: &str = "config";

/// AWS credentials file name
pub const AWS_CREDENTIALS_FILE_NAME: &str = "credentials";

/// Requested lifetime for assumed-role credentials (STS minimum)
pub const SESSION_DURATION_SECONDS: i32 = 900;

/// Minimum remaining lifetime for a cached credential to be reused
pub const DEFAULT_GRACE_SECONDS: i64 = 300;

/// Default AWS region for STS operations when no region is configured
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Environment variables cleared from the child before credentials are set
pub const CREDENTIAL_ENV_VARS: [&str; 5] = [
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_SESSION_TOKEN",
    "AWS_DEFAULT_PROFILE",
    "AWS_PROFILE",
];

/// Get the AWS config file path
/// Respects AWS_CONFIG_FILE environment variable if set
pub fn get_aws_config_path() -> Option<PathBuf> {
    // Check environment variable first
    if let Ok(path) = env::var("AWS_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }

    // Use default AWS config location
    dirs::home_dir().map(|home| home.join(AWS_CONFIG_DIR_NAME).join(AWS_CONFIG_FILE_NAME))
}

/// Get the AWS credentials file path
/// Respects AWS_SHARED_CREDENTIALS_FILE environment variable if set
pub fn get_aws_credentials_path() -> Option<PathBuf> {
    // Check environment variable first
    if let Ok(path) = env::var("AWS_SHARED_CREDENTIALS_FILE") {
        return Some(PathBuf::from(path));
    }

    // Use default AWS credentials location
    dirs::home_dir().map(|home| {
        home.join(AWS_CONFIG_DIR_NAME)
            .join(AWS_CREDENTIALS_FILE_NAME)
    })
}

/// Get the credential cache directory path
/// Respects AWSUDO_CACHE_DIR environment variable if set
pub fn get_cache_dir() -> Option<PathBuf> {
    // Check environment variable first
    if let Ok(path) = env::var("AWSUDO_CACHE_DIR") {
        return Some(PathBuf::from(path));
    }

    // Use platform cache location
    dirs::cache_dir().map(|cache| cache.join(CACHE_DIR_NAME))
}
