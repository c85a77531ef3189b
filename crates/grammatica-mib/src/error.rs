//! Error types for the MIB front-end, layered on top of
//! `grammatica_core::error`.

use grammatica_core::error::Diagnostics;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MibError {
    #[error(transparent)]
    Core(#[from] grammatica_core::error::Error),

    #[error("could not locate MIB module '{0}'")]
    NotFound(String),

    #[error("failed to load MIB module '{module}': {diagnostics} error(s)")]
    LoadFailure { module: String, diagnostics: Diagnostics },

    #[error("grammar is invalid: {0}")]
    Grammar(Diagnostics),
}

pub type Result<T> = std::result::Result<T, MibError>;
