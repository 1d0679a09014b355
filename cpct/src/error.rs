//! Error type for the CLI layer.
//!
//! Library errors (`cpc_pre`, `cpc_gen`, pipeline orchestration) already carry
//! enough structure via [`cpc_drv::PipelineError`]; this type only adds the
//! handful of failure modes that belong to the CLI itself (bad config file,
//! writing output).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read configuration file {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {}: {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("-o/--output may only be given a single file path when compiling more than one input file; give a directory instead")]
    OutputPathAmbiguous,

    #[error(transparent)]
    Pipeline(#[from] cpc_drv::PipelineError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
