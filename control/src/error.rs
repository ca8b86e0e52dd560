use thiserror::Error;

/// Errors returned while building or starting the event controller
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("unable to read hostname: {0}")]
    Hostname(#[source] std::io::Error),

    #[error("hostname {0:?} is not valid UTF-8")]
    InvalidHostname(std::ffi::OsString),

    #[error("error processing env vars: {0}")]
    Config(#[from] ConfigError),

    #[error("error creating Kubernetes client: {0}")]
    Client(#[source] kube::Error),

    #[error("error creating resource watcher: {0}")]
    Watcher(#[source] WatcherError),

    #[error("error starting the resource watcher: {0}")]
    Start(#[source] WatcherError),
}

/// Environment configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {name} is not valid unicode")]
    NotUnicode { name: String },
}

/// Resource watcher errors
#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("unable to map resource {kind} ({api_version}): {source}")]
    Mapping {
        kind: String,
        api_version: String,
        #[source]
        source: kube::Error,
    },

    #[error("resource watcher already started")]
    AlreadyStarted,

    #[error("failed to sync caches for {0}")]
    SyncFailed(String),
}
