// ABOUTME: Config scaffolding for new deployments.
// ABOUTME: Creates sitewright.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{DomainName, EmailAddress};

use super::CONFIG_FILENAME;

pub fn init_config(
    dir: &Path,
    domain: Option<&str>,
    email: Option<&str>,
    port: Option<u16>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let domain = domain
        .map(DomainName::new)
        .transpose()
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;

    let email = match email {
        Some(e) => EmailAddress::new(e).map_err(|e| Error::InvalidConfig(e.to_string()))?,
        None => EmailAddress::new("admin@example.com").expect("template email is valid"),
    };

    let yaml = generate_template_yaml(domain.as_ref(), &email, port.unwrap_or(8080));
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(domain: Option<&DomainName>, email: &EmailAddress, port: u16) -> String {
    let domain_line = match domain {
        Some(d) => format!("domain: {d}"),
        // SSL setup is skipped while the domain stays commented out.
        None => "# domain: mautic.example.com".to_string(),
    };

    format!(
        r#"{domain_line}
email: {email}
port: {port}
packages:
  - nginx
  - certbot
  - python3-certbot-nginx
"#
    )
}
