// ABOUTME: Writes the nginx reverse-proxy site, reloads nginx, and requests a certificate.
// ABOUTME: Certificate failure is soft; only an invalid nginx configuration aborts.

use snafu::ResultExt;
use std::fs;
use std::path::PathBuf;

use crate::config::DeployConfig;
use crate::logger::Logger;
use crate::process::{CommandExecutor, RunOptions};
use crate::types::DomainName;

use super::error::{SiteWriteSnafu, SslError};

/// Nginx site directories. Overridable for tests.
#[derive(Debug, Clone)]
pub struct NginxPaths {
    pub sites_available: PathBuf,
    pub sites_enabled: PathBuf,
}

impl Default for NginxPaths {
    fn default() -> Self {
        Self {
            sites_available: PathBuf::from("/etc/nginx/sites-available"),
            sites_enabled: PathBuf::from("/etc/nginx/sites-enabled"),
        }
    }
}

/// Configures nginx as a reverse proxy for the deployed application and
/// requests a Let's Encrypt certificate through certbot.
pub struct SslProvisioner<'a, E: CommandExecutor> {
    executor: &'a E,
    logger: &'a Logger,
    config: &'a DeployConfig,
    paths: NginxPaths,
}

impl<'a, E: CommandExecutor> SslProvisioner<'a, E> {
    pub fn new(executor: &'a E, logger: &'a Logger, config: &'a DeployConfig) -> Self {
        Self::with_paths(executor, logger, config, NginxPaths::default())
    }

    pub fn with_paths(
        executor: &'a E,
        logger: &'a Logger,
        config: &'a DeployConfig,
        paths: NginxPaths,
    ) -> Self {
        Self {
            executor,
            logger,
            config,
            paths,
        }
    }

    /// Set up SSL for the configured domain.
    ///
    /// Returns `Ok(true)` when SSL is fully configured or no domain is set,
    /// `Ok(false)` when certificate generation (or any other recoverable
    /// step) failed and the deployment should continue without HTTPS. An
    /// invalid nginx configuration is the only fatal error.
    pub async fn setup_ssl(&self) -> Result<bool, SslError> {
        let Some(domain) = &self.config.domain else {
            self.logger.info("No domain specified, skipping SSL setup");
            return Ok(true);
        };

        self.logger
            .log(&format!("Setting up SSL for domain: {domain}"), "🔒");

        match self.configure_nginx(domain).await {
            Ok(()) => {}
            Err(e @ SslError::ConfigTest { .. }) => return Err(e),
            Err(e) => {
                self.logger.error(&format!("SSL setup failed: {e}"));
                return Ok(false);
            }
        }

        let cert_ok = match self.request_certificate(domain).await {
            Ok(ok) => ok,
            Err(e) => {
                self.logger.error(&format!("SSL setup failed: {e}"));
                return Ok(false);
            }
        };

        if !cert_ok {
            self.logger
                .warning("SSL certificate generation failed, but continuing...");
            return Ok(false);
        }

        self.logger.success("SSL setup completed successfully");
        Ok(true)
    }

    /// Write the site file, enable it, and reload nginx after a config test.
    async fn configure_nginx(&self, domain: &DomainName) -> Result<(), SslError> {
        self.logger.log("Configuring Nginx...", "🌐");

        let site_path = self.paths.sites_available.join(domain.as_str());
        let site = render_site(domain, self.config.port);
        fs::write(&site_path, site).context(SiteWriteSnafu {
            path: site_path.clone(),
        })?;

        let _ = self
            .executor
            .run_shell(
                &format!(
                    "ln -sf {} {}/",
                    site_path.display(),
                    self.paths.sites_enabled.display()
                ),
                &RunOptions::ignore_errors(),
            )
            .await;

        let test = self
            .executor
            .run_shell("nginx -t", &RunOptions::ignore_errors())
            .await?;
        if !test.success {
            return Err(SslError::ConfigTest {
                output: test.output,
            });
        }

        let reload = self
            .executor
            .run_shell("systemctl reload nginx", &RunOptions::ignore_errors())
            .await?;
        if reload.success {
            self.logger.success("Nginx configured successfully");
        } else {
            self.logger
                .warning(&format!("Failed to reload nginx: {}", reload.output));
        }

        Ok(())
    }

    /// Request a certificate through certbot, rewriting the nginx config
    /// for HTTPS redirection on success.
    async fn request_certificate(&self, domain: &DomainName) -> Result<bool, SslError> {
        self.logger.log("Generating SSL certificate...", "🔐");

        let result = self
            .executor
            .run_shell(
                &format!(
                    "certbot --nginx -d {domain} --non-interactive --agree-tos --email {} --redirect",
                    self.config.email
                ),
                &RunOptions::ignore_errors(),
            )
            .await?;

        if result.success {
            self.logger.success("SSL certificate generated successfully");
            Ok(true)
        } else {
            self.logger
                .error(&format!("Certbot failed: {}", result.output));
            Ok(false)
        }
    }
}

/// Render the reverse-proxy site configuration for a domain.
fn render_site(domain: &DomainName, port: u16) -> String {
    format!(
        r#"server {{
    listen 80;
    server_name {domain};

    location / {{
        proxy_pass http://localhost:{port};
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
    }}
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_routes_domain_to_local_port() {
        let domain = DomainName::new("example.com").unwrap();
        let site = render_site(&domain, 8080);

        assert!(site.contains("server_name example.com;"));
        assert!(site.contains("proxy_pass http://localhost:8080;"));
        assert!(site.contains("listen 80;"));
    }

    #[test]
    fn site_preserves_forwarding_headers() {
        let domain = DomainName::new("app.example.org").unwrap();
        let site = render_site(&domain, 3000);

        assert!(site.contains("proxy_set_header Host $host;"));
        assert!(site.contains("proxy_set_header X-Real-IP $remote_addr;"));
        assert!(site.contains("proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;"));
        assert!(site.contains("proxy_set_header X-Forwarded-Proto $scheme;"));
    }
}
