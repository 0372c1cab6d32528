use crate::config::ConfigError;
use crate::table::TableError;
use thiserror::Error;

/// Error returned by the [`TableFormatter`].
///
/// [`TableFormatter`]: crate::formatter::TableFormatter
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration or one of the collaborators was rejected while
    /// building the formatter.
    #[error("could not create formatter")]
    Create {
        #[source]
        source: CreateError,
    },
    /// The table sink failed to render a record. Nothing was written.
    #[error("could not render record")]
    Render(#[source] TableError),
}

/// The cause of an [`Error::Create`].
#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Table(#[from] TableError),
}

impl Error {
    pub(crate) fn create(source: impl Into<CreateError>) -> Self {
        Error::Create {
            source: source.into(),
        }
    }
}
