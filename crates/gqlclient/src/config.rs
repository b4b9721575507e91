use std::str::FromStr;

/// How the operation is encoded on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// `application/json` body with `query` and `variables` keys.
    #[default]
    Json,
    /// `multipart/form-data` body. Required to attach files.
    Multipart,
}

/// Settings of a [`Client`](crate::Client) that can live in a configuration file.
///
/// ```toml
/// transport = "multipart"
/// close_request_body = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Request encoding, JSON unless stated otherwise
    pub transport: TransportMode,
    /// Send `Connection: close` so the connection is not kept for reuse
    pub close_request_body: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid client configuration: {0}")]
pub struct ConfigError(#[source] toml::de::Error);

impl ClientConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(ConfigError)
    }
}

impl FromStr for ClientConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_toml(s)
    }
}
