/// Error types for catalogue loading and export
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested scenario does not exist in the catalogue
    #[error("no tender scenario named '{slug}'")]
    NotFound { slug: String },

    /// The scenario exists but has no supplier with this id
    #[error("tender '{slug}' has no supplier with id '{id}'")]
    SupplierNotFound { slug: String, id: String },

    #[error("failed to read catalogue {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalogue {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid catalogue: {0}")]
    Invalid(String),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. } | CatalogError::SupplierNotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything a subcommand can fail with
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// 2 for unknown tenders and suppliers, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Catalog(e) if e.is_not_found() => 2,
            _ => 1,
        }
    }
}
