//! Broker credentials and player identity.

use std::collections::HashMap;
use std::env;
use std::path::Path;

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::constants::MAX_NAME_LEN;
use crate::error::ConfigError;

const BROKER_ADDRESS: &str = "BROKER_ADDRESS";
const BROKER_PORT: &str = "BROKER_PORT";
const USER_NAME: &str = "USER_NAME";
const PASSWORD: &str = "PASSWORD";

#[derive(Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Option<(String, String)>,
    pub tls: bool,
}

impl std::fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.credentials.as_ref().map(|(user, _)| user))
            .field("tls", &self.tls)
            .finish()
    }
}

impl BrokerConfig {
    /// Reads broker settings from the process environment, falling back to
    /// the dotenv file at `credentials_path`. A missing file is fine.
    pub fn load(credentials_path: &Path, tls: bool) -> Result<Self, ConfigError> {
        let file_vars = read_credentials_file(credentials_path)?;
        Self::from_lookup(
            |key: &str| env::var(key).ok().or_else(|| file_vars.get(key).cloned()),
            tls,
        )
    }

    pub fn from_lookup<F>(lookup: F, tls: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(BROKER_ADDRESS)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(BROKER_ADDRESS))?;

        let raw_port = lookup(BROKER_PORT).ok_or(ConfigError::Missing(BROKER_PORT))?;
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid {
                key: BROKER_PORT,
                value: raw_port.clone(),
            })?;

        let credentials = match (lookup(USER_NAME), lookup(PASSWORD)) {
            (Some(user), Some(password)) => Some((user, password)),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(PASSWORD)),
            (None, Some(_)) => return Err(ConfigError::Missing(USER_NAME)),
        };

        Ok(Self {
            host,
            port,
            credentials,
            tls,
        })
    }
}

pub fn read_credentials_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(error) if error.not_found() => return Ok(HashMap::new()),
        Err(error) => return Err(error.into()),
    };
    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Who this agent is within a lobby. Every name becomes an MQTT topic
/// segment, so topic metacharacters are refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub lobby: String,
    pub team: String,
    pub player: String,
}

impl Identity {
    pub fn new(lobby: &str, team: &str, player: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            lobby: validate_name("lobby", lobby)?,
            team: validate_name("team", team)?,
            player: validate_name("player", player)?,
        })
    }
}

pub fn validate_name(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    let reject = |reason| ConfigError::BadName {
        field,
        value: value.to_string(),
        reason,
    };
    if trimmed.is_empty() {
        return Err(reject("must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(reject("too long"));
    }
    if trimmed.contains(['/', '+', '#']) {
        return Err(reject("must not contain '/', '+' or '#'"));
    }
    Ok(trimmed.to_string())
}

/// Broker-unique client id derived from the player name.
pub fn make_client_id(player: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{player}-{suffix}")
}

#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub broker: BrokerConfig,
    pub identity: Identity,
    pub client_id: String,
}

impl AgentConfig {
    pub fn new(broker: BrokerConfig, identity: Identity) -> Self {
        let client_id = make_client_id(&identity.player);
        Self {
            broker,
            identity,
            client_id,
        }
    }
}
