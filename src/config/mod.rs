// ABOUTME: Configuration types and parsing for sitewright.yml.
// ABOUTME: Handles YAML parsing, validated newtypes, and config file discovery.

mod init;

pub use init::init_config;

use crate::error::{Error, Result};
use crate::types::{DomainName, EmailAddress, PackageName};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "sitewright.yml";
pub const CONFIG_FILENAME_ALT: &str = "sitewright.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".sitewright/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    /// Domain for the nginx site and certificate. SSL is skipped when unset.
    #[serde(default, deserialize_with = "deserialize_domain")]
    pub domain: Option<DomainName>,

    /// Contact email for certificate registration.
    #[serde(deserialize_with = "deserialize_email")]
    pub email: EmailAddress,

    /// Local port the application listens on behind the proxy.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Packages to install during provisioning.
    #[serde(deserialize_with = "deserialize_packages")]
    pub packages: NonEmpty<PackageName>,

    /// Timeout for standalone lock waits (`sitewright locks --wait`).
    #[serde(default = "default_lock_timeout", with = "humantime_serde")]
    pub lock_timeout: Duration,

    /// Log file override. Defaults to the standard system location.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_port() -> u16 {
    8080
}

fn default_lock_timeout() -> Duration {
    Duration::from_secs(600)
}

impl DeployConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }
}

// Custom deserializers

fn deserialize_domain<'de, D>(deserializer: D) -> std::result::Result<Option<DomainName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| DomainName::new(&s))
        .transpose()
        .map_err(serde::de::Error::custom)
}

fn deserialize_email<'de, D>(deserializer: D) -> std::result::Result<EmailAddress, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    EmailAddress::new(&s).map_err(serde::de::Error::custom)
}

fn deserialize_packages<'de, D>(
    deserializer: D,
) -> std::result::Result<NonEmpty<PackageName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    let packages = values
        .iter()
        .map(|v| PackageName::new(v))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)?;

    NonEmpty::from_vec(packages)
        .ok_or_else(|| serde::de::Error::custom("at least one package is required"))
}
