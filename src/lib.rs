//! awsudo resolves an AWS profile that designates a role to assume, obtains
//! short-lived credentials for that role via STS (cached on disk keyed by
//! profile and role), and runs a command with them in its environment.

pub mod broker;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod exec;
pub mod sts;
