use std::path::Path;

use anyhow::{Context, Result};
use ini::{Ini, Properties};
use thiserror::Error;

use crate::constants;

/// Configuration errors with distinct CLI exit codes
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Profile '{0}' not found in AWS config")]
    ProfileNotFound(String),
    #[error("Profile '{profile}' is missing required key '{key}'")]
    MissingRoleField { profile: String, key: &'static str },
    #[error("Source profile '{profile}' is missing '{key}'")]
    MissingSourceCredentials { profile: String, key: &'static str },
}

impl ConfigError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ConfigError::ProfileNotFound(_) => 2,
            ConfigError::MissingRoleField { .. } => 3,
            ConfigError::MissingSourceCredentials { .. } => 4,
        }
    }
}

/// Resolved role-assumption parameters for one named profile
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    pub profile_name: String,
    pub role_arn: String,
    pub source_profile: String,
    pub role_session_name: Option<String>,
    pub region: Option<String>,
    pub mfa_serial: Option<String>,
}

/// Long-lived keys of the source profile used as the STS caller identity
#[derive(Debug, Clone)]
pub struct SourceCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Merged view over the AWS config and credentials files
#[derive(Debug, Default)]
pub struct ProfileStore {
    config: Option<Ini>,
    credentials: Option<Ini>,
}

impl ProfileStore {
    /// Load from the default AWS file locations (env overrides respected)
    pub fn load() -> Result<Self> {
        let config_path = constants::get_aws_config_path();
        let credentials_path = constants::get_aws_credentials_path();
        Self::from_files(config_path.as_deref(), credentials_path.as_deref())
    }

    pub fn from_files(config: Option<&Path>, credentials: Option<&Path>) -> Result<Self> {
        let load_ini = |path: Option<&Path>| -> Result<Option<Ini>> {
            match path {
                Some(p) if p.exists() => Ini::load_from_file(p)
                    .map(Some)
                    .with_context(|| format!("Failed to parse {}", p.display())),
                _ => Ok(None),
            }
        };

        Ok(Self {
            config: load_ini(config)?,
            credentials: load_ini(credentials)?,
        })
    }

    /// Resolve the role-assumption parameters for a named profile
    pub fn resolve(&self, profile: &str) -> Result<ProfileConfig, ConfigError> {
        if !self.has_profile(profile) {
            return Err(ConfigError::ProfileNotFound(profile.to_string()));
        }

        let required = |key| {
            self.get(profile, key)
                .map(String::from)
                .ok_or_else(|| ConfigError::MissingRoleField {
                    profile: profile.to_string(),
                    key,
                })
        };

        Ok(ProfileConfig {
            profile_name: profile.to_string(),
            role_arn: required("role_arn")?,
            source_profile: required("source_profile")?,
            role_session_name: self.get(profile, "role_session_name").map(String::from),
            region: self.get(profile, "region").map(String::from),
            mfa_serial: self.get(profile, "mfa_serial").map(String::from),
        })
    }

    /// Resolve the long-lived keys of a profile's source profile
    pub fn source_credentials(
        &self,
        config: &ProfileConfig,
    ) -> Result<SourceCredentials, ConfigError> {
        let required = |key| {
            self.get(&config.source_profile, key).map(String::from).ok_or_else(|| {
                ConfigError::MissingSourceCredentials {
                    profile: config.source_profile.clone(),
                    key,
                }
            })
        };

        Ok(SourceCredentials {
            access_key_id: required("aws_access_key_id")?,
            secret_access_key: required("aws_secret_access_key")?,
        })
    }

    fn has_profile(&self, profile: &str) -> bool {
        self.credentials_section(profile).is_some() || self.config_section(profile).is_some()
    }

    /// Credentials file is the more specific store for key material, so it
    /// wins when a key appears in both files
    fn get(&self, profile: &str, key: &str) -> Option<&str> {
        self.credentials_section(profile)
            .and_then(|section| section.get(key))
            .or_else(|| {
                self.config_section(profile)
                    .and_then(|section| section.get(key))
            })
    }

    /// Non-default profiles live under `[profile <name>]` in the config file
    fn config_section(&self, profile: &str) -> Option<&Properties> {
        let ini = self.config.as_ref()?;
        let section_name = if profile == "default" {
            profile.to_string()
        } else {
            format!("profile {profile}")
        };
        ini.section(Some(&section_name))
    }

    /// The credentials file uses plain `[<name>]` sections
    fn credentials_section(&self, profile: &str) -> Option<&Properties> {
        self.credentials.as_ref()?.section(Some(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn store(config: &str, credentials: &str) -> (ProfileStore, NamedTempFile, NamedTempFile) {
        let config_file = write_temp(config);
        let credentials_file = write_temp(credentials);
        let store =
            ProfileStore::from_files(Some(config_file.path()), Some(credentials_file.path()))
                .unwrap();
        (store, config_file, credentials_file)
    }

    const CONFIG: &str = "\
[profile admin]
role_arn = arn:aws:iam::123456789012:role/Admin
source_profile = default
region = eu-west-1
mfa_serial = arn:aws:iam::123456789012:mfa/me
";

    const CREDENTIALS: &str = "\
[default]
aws_access_key_id = AKIAEXAMPLE
aws_secret_access_key = secretexample
";

    #[test]
    fn test_resolve_full_profile() {
        let (store, _c, _k) = store(CONFIG, CREDENTIALS);

        let profile = store.resolve("admin").unwrap();
        assert_eq!(profile.role_arn, "arn:aws:iam::123456789012:role/Admin");
        assert_eq!(profile.source_profile, "default");
        assert_eq!(profile.region.as_deref(), Some("eu-west-1"));
        assert_eq!(
            profile.mfa_serial.as_deref(),
            Some("arn:aws:iam::123456789012:mfa/me")
        );
        assert_eq!(profile.role_session_name, None);
    }

    #[test]
    fn test_resolve_source_credentials() {
        let (store, _c, _k) = store(CONFIG, CREDENTIALS);

        let profile = store.resolve("admin").unwrap();
        let source = store.source_credentials(&profile).unwrap();
        assert_eq!(source.access_key_id, "AKIAEXAMPLE");
        assert_eq!(source.secret_access_key, "secretexample");
    }

    #[test]
    fn test_profile_not_found_is_exit_2() {
        let (store, _c, _k) = store(CONFIG, CREDENTIALS);

        let err = store.resolve("nonexistent").unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_role_arn_is_exit_3() {
        let config = "\
[profile broken]
source_profile = default
";
        let (store, _c, _k) = store(config, CREDENTIALS);

        let err = store.resolve("broken").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRoleField { key: "role_arn", .. }
        ));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_missing_source_profile_is_exit_3() {
        let config = "\
[profile broken]
role_arn = arn:aws:iam::123456789012:role/Admin
";
        let (store, _c, _k) = store(config, CREDENTIALS);

        let err = store.resolve("broken").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRoleField {
                key: "source_profile",
                ..
            }
        ));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_missing_source_keys_is_exit_4() {
        let credentials = "\
[default]
aws_access_key_id = AKIAEXAMPLE
";
        let (store, _c, _k) = store(CONFIG, credentials);

        let profile = store.resolve("admin").unwrap();
        let err = store.source_credentials(&profile).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSourceCredentials {
                key: "aws_secret_access_key",
                ..
            }
        ));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_missing_role_distinct_from_missing_keys() {
        // Spec-level distinction: a profile without role_arn and a source
        // profile without keys must surface as different error signals
        let config = "\
[profile broken]
source_profile = default
";
        let credentials = "[default]\n";
        let (store, _c, _k) = store(config, credentials);

        let role_err = store.resolve("broken").unwrap_err();
        assert_eq!(role_err.exit_code(), 3);

        let profile = ProfileConfig {
            profile_name: "broken".to_string(),
            role_arn: "arn:aws:iam::123456789012:role/Admin".to_string(),
            source_profile: "default".to_string(),
            role_session_name: None,
            region: None,
            mfa_serial: None,
        };
        let key_err = store.source_credentials(&profile).unwrap_err();
        assert_eq!(key_err.exit_code(), 4);
    }

    #[test]
    fn test_profile_defined_only_in_credentials_file() {
        let credentials = "\
[assume]
role_arn = arn:aws:iam::123456789012:role/Ops
source_profile = default
aws_access_key_id = unused

[default]
aws_access_key_id = AKIAEXAMPLE
aws_secret_access_key = secretexample
";
        let (store, _c, _k) = store("", credentials);

        let profile = store.resolve("assume").unwrap();
        assert_eq!(profile.role_arn, "arn:aws:iam::123456789012:role/Ops");
    }

    #[test]
    fn test_credentials_file_wins_over_config() {
        let config = "\
[profile dual]
role_arn = arn:aws:iam::123456789012:role/FromConfig
source_profile = default
";
        let credentials = "\
[dual]
role_arn = arn:aws:iam::123456789012:role/FromCredentials
";
        let (store, _c, _k) = store(config, credentials);

        let profile = store.resolve("dual").unwrap();
        assert_eq!(
            profile.role_arn,
            "arn:aws:iam::123456789012:role/FromCredentials"
        );
    }

    #[test]
    fn test_default_profile_uses_plain_section_name() {
        let config = "\
[default]
role_arn = arn:aws:iam::123456789012:role/Default
source_profile = root
";
        let (store, _c, _k) = store(config, "");

        let profile = store.resolve("default").unwrap();
        assert_eq!(profile.role_arn, "arn:aws:iam::123456789012:role/Default");
    }

    #[test]
    fn test_missing_files_report_profile_not_found() {
        let store = ProfileStore::from_files(None, None).unwrap();
        let err = store.resolve("anything").unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(_)));
    }
}
