use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InteropError {
    #[error("Signature \"{0}\" is not a sequence of hex bytes and ?? wildcards")]
    SignatureFormat(Box<str>),
    #[error("Unable to find signature for {0}")]
    SignatureNotFound(&'static str),
    #[error("Resolved address for {0} is null")]
    NullAddress(&'static str),

    #[error("Failed to install hook for {name}")]
    HookInstall {
        name: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to enable hook for {name}")]
    HookEnable {
        name: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to disable hook for {name}")]
    HookDisable {
        name: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Game version \"{0}\" is malformed")]
    GameVersionFormat(Box<str>),
    #[error("No struct layout is known for game version {0}")]
    UnknownGameVersion(Box<str>),

    #[error("Customize data \"{0}\" is not 26 hex-encoded bytes")]
    CustomizeFormat(Box<str>),
    #[error("Failed to read customize data")]
    CustomizeRead(#[source] binrw::Error),

    #[error("Failed to parse configuration")]
    Config(#[source] toml::de::Error),

    #[error(transparent)]
    IO(io::Error),
}
