use std::fmt;

/// Machine-readable error codes for callers that branch on failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A config file exists but could not be read or parsed.
    ConfigParseError,
    /// Config parsed, but the traversal limits are out of range.
    InvalidConfig,
    PersonNotFound,
    /// The read-model file is not a usable SQLite database.
    CorruptProjection,
    StoreFailure,
    QueryCancelled,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidConfig => "E1002",
            Self::PersonNotFound => "E2001",
            Self::CorruptProjection => "E3001",
            Self::StoreFailure => "E4001",
            Self::QueryCancelled => "E4002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file unreadable",
            Self::InvalidConfig => "Traversal limits out of range",
            Self::PersonNotFound => "Person not found",
            Self::CorruptProjection => "Read-model database is corrupt",
            Self::StoreFailure => "Record store lookup failed",
            Self::QueryCancelled => "Query cancelled",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix .lineage/config.toml (or the user config) and retry."),
            Self::InvalidConfig => Some(
                "Keep 1 <= traversal.default_generations <= traversal.max_generations <= 10.",
            ),
            Self::CorruptProjection => {
                Some("Delete the read-model file and let the importer repopulate it.")
            }
            Self::StoreFailure => Some("Check that the read-model database is reachable and retry."),
            Self::PersonNotFound | Self::QueryCancelled => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Why a traversal stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller flipped the cancel token.
    Requested,
    /// The context deadline passed between two node expansions.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => f.write_str("cancellation requested"),
            Self::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Errors returned by descendancy, pedigree and Ahnentafel queries.
///
/// None of these ever carries a partial tree. Cycles in the source data are
/// not an error: they are truncated during traversal.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The root person identifier does not resolve to a stored person.
    #[error("person not found: '{0}'")]
    PersonNotFound(String),

    /// An underlying record store lookup failed; the traversal was aborted.
    #[error("record store lookup failed: {0:#}")]
    Store(#[from] anyhow::Error),

    /// The caller's context cancelled the query.
    #[error("query cancelled: {0}")]
    Cancelled(CancelReason),
}

impl QueryError {
    /// Map to the stable [`ErrorCode`] catalog.
    ///
    /// Store failures caused by a corrupt or non-SQLite file report
    /// [`ErrorCode::CorruptProjection`]; every other store failure is
    /// [`ErrorCode::StoreFailure`].
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::PersonNotFound(_) => ErrorCode::PersonNotFound,
            Self::Store(err) if is_corrupt_projection(err) => ErrorCode::CorruptProjection,
            Self::Store(_) => ErrorCode::StoreFailure,
            Self::Cancelled(_) => ErrorCode::QueryCancelled,
        }
    }
}

/// Whether any cause in `err` is SQLite reporting a damaged database file.
#[must_use]
pub fn is_corrupt_projection(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<rusqlite::Error>())
        .any(|cause| {
            matches!(
                cause.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseCorrupt | rusqlite::ErrorCode::NotADatabase)
            )
        })
}
