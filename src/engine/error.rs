//! Engine-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::text::InputError;

/// The only failures a caller of the engine ever sees.
///
/// Remote model failures never appear here: they are absorbed into
/// degraded-mode fusion and recorded in diagnostics.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid request input; rejected before any signal is computed.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Invalid configuration; raised at engine construction, never per request.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
