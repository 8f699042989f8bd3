use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn station_not_found(station_id: i32) -> Self {
        DomainError::NotFound {
            entity: "Station",
            field: "station_id",
            value: station_id.to_string(),
        }
    }

    pub fn report_not_found(report_id: impl ToString) -> Self {
        DomainError::NotFound {
            entity: "MalfunctionReport",
            field: "id",
            value: report_id.to_string(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = DomainError::station_not_found(7);
        assert_eq!(err.to_string(), "Not found: Station with station_id=7");
    }

    #[test]
    fn domain_error_converts_into_app_error() {
        let err: AppError = DomainError::Conflict("dup".into()).into();
        assert!(matches!(err, AppError::Domain(DomainError::Conflict(_))));
    }
}
