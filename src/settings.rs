//! # Settings
//!
//! Startup configuration, layered with the `config` crate:
//!
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/local.toml` (optional, untracked overrides)
//! 4. environment variables prefixed `PROPOSALS`, sections separated by
//!    `__` (`PROPOSALS__RESEND__API_KEY`, `PROPOSALS__DELIVERY__ORDER=resend,smtp`)
//!
//! A `.env` file is loaded into the environment first when present.
//!
//! Configuration is read once and validated before the server starts; a
//! provider named in `delivery.order` without its credentials stops startup.

use crate::application::error::ConfigError;
use crate::domain::entities::catalog::PackageCatalog;
use crate::domain::entities::package::Package;
use crate::domain::value_objects::{EmailAddress, Money, PackageId, ProviderId};
use crate::infrastructure::delivery::content::SenderIdentity;
use crate::infrastructure::delivery::emailjs::{EmailJsConfig, EmailJsProvider};
use crate::infrastructure::delivery::resend::{ResendConfig, ResendProvider};
use crate::infrastructure::delivery::smtp::{SmtpConfig, SmtpProvider, SmtpSecurity};
use crate::infrastructure::delivery::traits::{DEFAULT_TIMEOUT_MS, DeliveryProvider};
use crate::infrastructure::rendering::layout::RenderOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PROPOSALS";

/// Provider id of the Resend adapter.
pub const RESEND: &str = "resend";
/// Provider id of the EmailJS adapter.
pub const EMAILJS: &str = "emailjs";
/// Provider id of the SMTP adapter.
pub const SMTP: &str = "smtp";

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// Sender identity for outgoing proposals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SenderSettings {
    /// From address.
    pub from_address: String,
    /// From display name, also printed as the issuer on documents.
    pub from_name: String,
    /// Optional Reply-To address.
    #[serde(default)]
    pub reply_to: Option<String>,
    /// Contact line closing documents and emails.
    pub contact_line: String,
}

/// Fail-over settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliverySettings {
    /// Provider ids in attempt order.
    pub order: Vec<String>,
    /// Default per-attempt timeout.
    pub timeout_ms: u64,
}

/// `[resend]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResendSettings {
    /// API key sent as a bearer token.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Endpoint override.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Timeout override.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// `[emailjs]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmailJsSettings {
    /// EmailJS service id.
    #[serde(default)]
    pub service_id: Option<String>,
    /// EmailJS template id.
    #[serde(default)]
    pub template_id: Option<String>,
    /// Public key, sent as `user_id`.
    #[serde(default)]
    pub public_key: Option<String>,
    /// Private key, sent as `accessToken`.
    #[serde(default)]
    pub private_key: Option<String>,
    /// Endpoint override.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Timeout override.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// `[smtp]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SmtpSettings {
    /// Relay host.
    #[serde(default)]
    pub host: Option<String>,
    /// Relay port.
    #[serde(default)]
    pub port: Option<u16>,
    /// Login user.
    #[serde(default)]
    pub username: Option<String>,
    /// Login password.
    #[serde(default)]
    pub password: Option<String>,
    /// Connection security.
    #[serde(default)]
    pub security: Option<SmtpSecurity>,
    /// Timeout override.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// One configured package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageSettings {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base monthly price.
    pub price: Money,
    /// Deliverables in display order.
    #[serde(default)]
    pub deliverables: Vec<String>,
    /// Monthly prospect estimate.
    #[serde(default)]
    pub estimated_prospects: Option<u32>,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogSettings {
    /// Packages; empty means the built-in catalog.
    #[serde(default)]
    pub packages: Vec<PackageSettings>,
}

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerSettings,
    /// Logging.
    pub logging: LoggingSettings,
    /// Sender identity.
    pub sender: SenderSettings,
    /// Provider order and timeout.
    pub delivery: DeliverySettings,
    /// Resend credentials.
    #[serde(default)]
    pub resend: Option<ResendSettings>,
    /// EmailJS credentials.
    #[serde(default)]
    pub emailjs: Option<EmailJsSettings>,
    /// SMTP relay.
    #[serde(default)]
    pub smtp: Option<SmtpSettings>,
    /// Package catalog.
    #[serde(default)]
    pub catalog: CatalogSettings,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.cors_origins", Vec::<String>::new())?
        .set_default("logging.level", "info")?
        .set_default("logging.json", false)?
        .set_default("sender.from_address", "proposals@example.com")?
        .set_default("sender.from_name", "Proposal Desk")?
        .set_default(
            "sender.contact_line",
            "Questions? Reply to this email and our team will get back to you.",
        )?
        .set_default("delivery.order", vec![RESEND, EMAILJS])?
        .set_default("delivery.timeout_ms", DEFAULT_TIMEOUT_MS)?)
}

fn required(value: Option<&String>, provider: &str, field: &'static str) -> Result<String, ConfigError> {
    match value.map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::missing(provider, field)),
    }
}

impl AppConfig {
    /// Loads configuration from `config/`, the environment and `.env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load_from_dir(Path::new("config"))
    }

    /// Loads configuration using `dir` for the TOML files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source cannot be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config = defaults()?
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join("local")).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("delivery.order")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parses configuration from a TOML document layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the document is malformed.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config = defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Checks every startup rule without building anything.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sender_identity()?;
        self.catalog()?;
        self.provider_configs().map(|_| ())
    }

    /// Returns the sender identity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an address is malformed.
    pub fn sender_identity(&self) -> Result<SenderIdentity, ConfigError> {
        let from_address = EmailAddress::parse(&self.sender.from_address)
            .map_err(|e| ConfigError::invalid("sender.from_address", e.to_string()))?;
        let reply_to = match self.sender.reply_to.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                EmailAddress::parse(raw)
                    .map_err(|e| ConfigError::invalid("sender.reply_to", e.to_string()))?,
            ),
            _ => None,
        };
        Ok(SenderIdentity {
            from_address,
            from_name: self.sender.from_name.trim().to_string(),
            reply_to,
            contact_line: self.sender.contact_line.clone(),
        })
    }

    /// Returns the document issuer details.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            issuer_name: self.sender.from_name.trim().to_string(),
            contact_line: self.sender.contact_line.clone(),
        }
    }

    /// Builds the package catalog, falling back to the built-in one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a configured package is invalid.
    pub fn catalog(&self) -> Result<PackageCatalog, ConfigError> {
        if self.catalog.packages.is_empty() {
            return PackageCatalog::standard()
                .map_err(|e| ConfigError::invalid("catalog", e.to_string()));
        }
        let packages = self
            .catalog
            .packages
            .iter()
            .map(|p| {
                let package = Package::new(PackageId::new(p.id.trim()), p.name.clone(), p.price)
                    .map_err(|e| ConfigError::invalid(format!("catalog.packages.{}", p.id), e.to_string()))?
                    .with_deliverables(p.deliverables.iter().cloned());
                Ok(match p.estimated_prospects {
                    Some(prospects) => package.with_estimated_prospects(prospects),
                    None => package,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(PackageCatalog::new(packages))
    }

    fn timeout_for(&self, override_ms: Option<u64>) -> u64 {
        override_ms.unwrap_or(self.delivery.timeout_ms)
    }

    fn provider_configs(&self) -> Result<Vec<ProviderConfig>, ConfigError> {
        if self.delivery.order.is_empty() {
            return Err(ConfigError::EmptyProviderList);
        }
        let mut seen = HashSet::new();
        let mut configs = Vec::with_capacity(self.delivery.order.len());

        for raw in &self.delivery.order {
            let id = raw.trim().to_lowercase();
            if !seen.insert(id.clone()) {
                return Err(ConfigError::DuplicateProvider(id));
            }
            let config = match id.as_str() {
                RESEND => {
                    let section = self.resend.clone().unwrap_or_default();
                    let mut config = ResendConfig::new(required(section.api_key.as_ref(), RESEND, "api_key")?)
                        .with_timeout_ms(self.timeout_for(section.timeout_ms));
                    if let Some(endpoint) = section.endpoint {
                        config = config.with_endpoint(endpoint);
                    }
                    ProviderConfig::Resend(config)
                }
                EMAILJS => {
                    let section = self.emailjs.clone().unwrap_or_default();
                    let mut config = EmailJsConfig::new(
                        required(section.service_id.as_ref(), EMAILJS, "service_id")?,
                        required(section.template_id.as_ref(), EMAILJS, "template_id")?,
                        required(section.public_key.as_ref(), EMAILJS, "public_key")?,
                    )
                    .with_timeout_ms(self.timeout_for(section.timeout_ms));
                    if let Some(key) = section.private_key.filter(|k| !k.trim().is_empty()) {
                        config = config.with_private_key(key);
                    }
                    if let Some(endpoint) = section.endpoint {
                        config = config.with_endpoint(endpoint);
                    }
                    ProviderConfig::EmailJs(config)
                }
                SMTP => {
                    let section = self.smtp.clone().unwrap_or_default();
                    let mut config = SmtpConfig::new(
                        required(section.host.as_ref(), SMTP, "host")?,
                        required(section.username.as_ref(), SMTP, "username")?,
                        required(section.password.as_ref(), SMTP, "password")?,
                    )
                    .with_security(section.security.unwrap_or_default())
                    .with_timeout_ms(self.timeout_for(section.timeout_ms));
                    if let Some(port) = section.port {
                        config = config.with_port(port);
                    }
                    ProviderConfig::Smtp(config)
                }
                _ => return Err(ConfigError::UnknownProvider(id)),
            };
            configs.push(config);
        }
        Ok(configs)
    }

    /// Builds the provider chain in `delivery.order`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty or unknown order entry, a
    /// missing credential, or an adapter that cannot be constructed.
    pub fn build_providers(&self) -> Result<Vec<Arc<dyn DeliveryProvider>>, ConfigError> {
        let sender = self.sender_identity()?;
        self.provider_configs()?
            .into_iter()
            .map(|config| config.build(sender.clone()))
            .collect()
    }
}

enum ProviderConfig {
    Resend(ResendConfig),
    EmailJs(EmailJsConfig),
    Smtp(SmtpConfig),
}

impl ProviderConfig {
    fn build(self, sender: SenderIdentity) -> Result<Arc<dyn DeliveryProvider>, ConfigError> {
        let provider: Arc<dyn DeliveryProvider> = match self {
            Self::Resend(config) => Arc::new(
                ResendProvider::new(ProviderId::new(RESEND), config, sender)
                    .map_err(|e| ConfigError::invalid(RESEND, e.to_string()))?,
            ),
            Self::EmailJs(config) => Arc::new(
                EmailJsProvider::new(ProviderId::new(EMAILJS), config, sender)
                    .map_err(|e| ConfigError::invalid(EMAILJS, e.to_string()))?,
            ),
            Self::Smtp(config) => Arc::new(
                SmtpProvider::new(ProviderId::new(SMTP), config, sender)
                    .map_err(|e| ConfigError::invalid(SMTP, e.to_string()))?,
            ),
        };
        Ok(provider)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [sender]
        from_address = "proposals@agency.test"
        from_name = "Agency"
        reply_to = "sales@agency.test"
        contact_line = "Call us"

        [delivery]
        order = ["resend", "emailjs", "smtp"]
        timeout_ms = 8000

        [resend]
        api_key = "re_key"

        [emailjs]
        service_id = "svc"
        template_id = "tpl"
        public_key = "pub"
        timeout_ms = 3000

        [smtp]
        host = "smtp.agency.test"
        port = 2525
        username = "user"
        password = "pass"
        security = "none"

        [[catalog.packages]]
        id = "basic"
        name = "Basic"
        price = 1500
        deliverables = ["200 outreach emails"]
    "#;

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.delivery.order, vec!["resend", "emailjs"]);
        assert_eq!(config.delivery.timeout_ms, 10_000);
        assert!(config.resend.is_none());
    }

    #[test]
    fn full_config_builds_providers_in_order() {
        let config = AppConfig::from_toml_str(FULL).unwrap();
        config.validate().unwrap();
        let providers = config.build_providers().unwrap();
        let ids: Vec<&str> = providers.iter().map(|p| p.provider_id().as_str()).collect();
        assert_eq!(ids, vec!["resend", "emailjs", "smtp"]);
        assert_eq!(providers[0].timeout_ms(), 8000);
        assert_eq!(providers[1].timeout_ms(), 3000);
    }

    #[test]
    fn missing_credential_is_rejected() {
        let config = AppConfig::from_toml_str("[delivery]\norder = [\"resend\"]\ntimeout_ms = 1000").unwrap();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::missing("resend", "api_key")
        );
    }

    #[test]
    fn blank_credential_is_rejected() {
        let config = AppConfig::from_toml_str(
            "[delivery]\norder = [\"emailjs\"]\ntimeout_ms = 1000\n[emailjs]\nservice_id = \" \"",
        )
        .unwrap();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::missing("emailjs", "service_id")
        );
    }

    #[test]
    fn empty_and_unknown_orders_are_rejected() {
        let config = AppConfig::from_toml_str("[delivery]\norder = []\ntimeout_ms = 1000").unwrap();
        assert_eq!(config.validate().unwrap_err(), ConfigError::EmptyProviderList);

        let config = AppConfig::from_toml_str("[delivery]\norder = [\"fax\"]\ntimeout_ms = 1000").unwrap();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::UnknownProvider("fax".into())
        );
    }

    #[test]
    fn duplicate_order_entry_is_rejected() {
        let mut config = AppConfig::from_toml_str(FULL).unwrap();
        config.delivery.order = vec!["smtp".into(), "SMTP".into()];
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::DuplicateProvider("smtp".into())
        );
    }

    #[test]
    fn bad_sender_address_is_rejected() {
        let mut config = AppConfig::from_toml_str(FULL).unwrap();
        config.sender.from_address = "nobody".into();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn configured_catalog_replaces_builtin() {
        let config = AppConfig::from_toml_str(FULL).unwrap();
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("basic").unwrap().monthly_price(), Money::from_whole(1500));

        let builtin = AppConfig::from_toml_str("").unwrap().catalog().unwrap();
        assert!(builtin.get("growth").is_some());
    }

    #[test]
    fn render_options_follow_sender() {
        let config = AppConfig::from_toml_str(FULL).unwrap();
        let options = config.render_options();
        assert_eq!(options.issuer_name, "Agency");
        assert_eq!(options.contact_line, "Call us");
    }

    #[test]
    fn malformed_toml_is_load_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[server\nport = 1").unwrap_err(),
            ConfigError::Load(_)
        ));
    }
}
