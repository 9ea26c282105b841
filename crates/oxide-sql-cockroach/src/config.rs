//! Connection configuration.
//!
//! A [`ConnectionConfig`] is loaded once, from JSON or a connection URL,
//! and decides both how to reach the cluster and how the dialect behaves
//! (see [`IdentityStrategy`]).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::ConnectOptions;
use url::Url;

use crate::error::{Error, Result};

/// Default CockroachDB SQL port.
pub const DEFAULT_PORT: u16 = 26257;

/// How auto-increment columns get their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStrategy {
    /// `GENERATED BY DEFAULT AS IDENTITY`: sequence-backed, roughly ordered.
    #[default]
    Identity,
    /// `DEFAULT unique_rowid()`: unordered 64-bit ids without a sequence.
    UniqueRowId,
}

/// TLS negotiation mode, as understood by libpq.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    /// Plain TCP.
    Disable,
    /// Try plain TCP first, then TLS.
    Allow,
    /// Try TLS first, then plain TCP.
    #[default]
    Prefer,
    /// TLS without certificate verification.
    Require,
    /// TLS, verifying the server certificate against the CA.
    VerifyCa,
    /// TLS, verifying the certificate and the host name.
    VerifyFull,
}

impl SslMode {
    /// Parses a libpq `sslmode` value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for unknown modes.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "disable" => Ok(Self::Disable),
            "allow" => Ok(Self::Allow),
            "prefer" | "" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            "verify-ca" => Ok(Self::VerifyCa),
            "verify-full" => Ok(Self::VerifyFull),
            other => Err(Error::Config(format!(
                "Invalid sslmode '{other}'. Valid values: disable, allow, prefer, require, verify-ca, verify-full"
            ))),
        }
    }

    /// Returns the libpq spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Allow => "allow",
            Self::Prefer => "prefer",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
        }
    }

    /// Converts to the driver's mode.
    #[must_use]
    pub const fn to_pg(self) -> PgSslMode {
        match self {
            Self::Disable => PgSslMode::Disable,
            Self::Allow => PgSslMode::Allow,
            Self::Prefer => PgSslMode::Prefer,
            Self::Require => PgSslMode::Require,
            Self::VerifyCa => PgSslMode::VerifyCa,
            Self::VerifyFull => PgSslMode::VerifyFull,
        }
    }
}

/// Everything needed to open and initialise a CockroachDB session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Dialect name this configuration is registered under.
    pub driver: String,
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database (catalog) name.
    pub database: String,
    /// User name.
    pub username: String,
    /// Password, if the user authenticates with one.
    pub password: Option<String>,
    /// TLS mode.
    pub sslmode: SslMode,
    /// CA certificate used to verify the server.
    pub sslrootcert: Option<PathBuf>,
    /// Client certificate.
    pub sslcert: Option<PathBuf>,
    /// Client key.
    pub sslkey: Option<PathBuf>,
    /// Serverless routing id, sent as the `--cluster` startup option.
    pub cluster: Option<String>,
    /// Comma-separated schema search path; the first entry is the default
    /// schema for introspection.
    pub search_path: String,
    /// `application_name` session variable.
    pub application_name: Option<String>,
    /// Session time zone.
    pub timezone: Option<String>,
    /// Extra session variables, set after connecting.
    pub session: BTreeMap<String, String>,
    /// How auto-increment columns are generated.
    pub identity: IdentityStrategy,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            driver: String::from("cockroachdb"),
            host: String::from("127.0.0.1"),
            port: DEFAULT_PORT,
            database: String::from("defaultdb"),
            username: String::from("root"),
            password: None,
            sslmode: SslMode::Prefer,
            sslrootcert: None,
            sslcert: None,
            sslkey: None,
            cluster: None,
            search_path: String::from("public"),
            application_name: None,
            timezone: None,
            session: BTreeMap::new(),
            identity: IdentityStrategy::Identity,
        }
    }
}

impl ConnectionConfig {
    /// Parses a `postgresql://` (or `cockroachdb://`) connection URL.
    ///
    /// Recognised query parameters: `sslmode`, `sslrootcert`, `sslcert`,
    /// `sslkey`, `cluster`, `options` (`--cluster=<id>`), `search_path`,
    /// `application_name` and `timezone`. Anything else becomes a session
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the URL is malformed.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| Error::Config(format!("invalid URL: {e}")))?;
        if !matches!(url.scheme(), "postgresql" | "postgres" | "cockroachdb") {
            return Err(Error::Config(format!(
                "connection URL does not have a `postgresql` scheme; url={url}"
            )));
        }

        let mut config = Self::default();
        if let Some(host) = url.host_str() {
            config.host = String::from(host);
        }
        if let Some(port) = url.port() {
            config.port = port;
        }
        let database = url.path().trim_start_matches('/');
        if !database.is_empty() {
            config.database = String::from(database);
        }
        if !url.username().is_empty() {
            config.username = decode_userinfo(url.username());
        }
        config.password = url.password().map(decode_userinfo);

        for (key, value) in url.query_pairs() {
            let value = value.into_owned();
            match key.as_ref() {
                "sslmode" => config.sslmode = SslMode::parse(&value)?,
                "sslrootcert" => config.sslrootcert = Some(PathBuf::from(value)),
                "sslcert" => config.sslcert = Some(PathBuf::from(value)),
                "sslkey" => config.sslkey = Some(PathBuf::from(value)),
                "cluster" => config.cluster = Some(value),
                "options" => config.cluster = cluster_from_options(&value)?,
                "search_path" => config.search_path = value,
                "application_name" => config.application_name = Some(value),
                "timezone" => config.timezone = Some(value),
                other => {
                    config.session.insert(String::from(other), value);
                }
            }
        }
        Ok(config)
    }

    /// Parses a JSON configuration; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid JSON: {e}")))
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Returns the schema introspection defaults to: the first search path
    /// entry.
    #[must_use]
    pub fn default_schema(&self) -> &str {
        self.search_path
            .split(',')
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or("public")
    }

    /// Builds the connection URL the driver is given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the host or credentials cannot be
    /// represented in a URL.
    pub fn to_url(&self) -> Result<Url> {
        let mut url = Url::parse("postgresql://localhost")
            .map_err(|e| Error::Config(format!("invalid URL: {e}")))?;
        url.set_host(Some(&self.host))
            .map_err(|e| Error::Config(format!("invalid host '{}': {e}", self.host)))?;
        url.set_port(Some(self.port))
            .map_err(|()| Error::Config(String::from("cannot set port")))?;
        url.set_username(&self.username)
            .map_err(|()| Error::Config(String::from("cannot set username")))?;
        url.set_password(self.password.as_deref())
            .map_err(|()| Error::Config(String::from("cannot set password")))?;
        url.set_path(&self.database);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("sslmode", self.sslmode.as_str());
            if let Some(path) = &self.sslrootcert {
                query.append_pair("sslrootcert", &path.to_string_lossy());
            }
            if let Some(path) = &self.sslcert {
                query.append_pair("sslcert", &path.to_string_lossy());
            }
            if let Some(path) = &self.sslkey {
                query.append_pair("sslkey", &path.to_string_lossy());
            }
            if let Some(cluster) = &self.cluster {
                query.append_pair("options", &format!("--cluster={cluster}"));
            }
        }
        Ok(url)
    }

    /// Builds driver connect options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the options cannot be built.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let url = self.to_url()?;
        let options = PgConnectOptions::from_url(&url)
            .map_err(|e| Error::Config(format!("invalid connection options: {e}")))?;
        Ok(options.ssl_mode(self.sslmode.to_pg()))
    }

    /// Returns `user@host:port/database`, without the password, for logs.
    #[must_use]
    pub fn redacted(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }
}

/// Percent-decodes a user name or password taken from a URL.
fn decode_userinfo(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Extracts `--cluster=<id>` from a libpq `options` string.
fn cluster_from_options(options: &str) -> Result<Option<String>> {
    let mut cluster = None;
    for option in options.split_whitespace() {
        match option.strip_prefix("--cluster=") {
            Some(id) if !id.is_empty() => cluster = Some(String::from(id)),
            _ => {
                return Err(Error::Config(format!(
                    "unsupported startup option '{option}'"
                )))
            }
        }
    }
    Ok(cluster)
}
