use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Ledger and storage credentials are non-empty
/// - The CDN template can receive an object key
/// - Scan bounds are usable
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.ledger.spreadsheet_id.is_empty() {
        return Err(ConfigError::ValidationError(
            "ledger.spreadsheet_id cannot be empty".to_string(),
        ));
    }
    if config.ledger.api_token.is_empty() {
        return Err(ConfigError::ValidationError(
            "ledger.api_token cannot be empty".to_string(),
        ));
    }

    for (field, value) in [
        ("storage.bucket", &config.storage.bucket),
        ("storage.region", &config.storage.region),
        ("storage.key", &config.storage.key),
        ("storage.secret", &config.storage.secret),
    ] {
        if value.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
    }

    if !config.storage.cdn_url.contains("{key}") {
        return Err(ConfigError::ValidationError(
            "storage.cdn_url must contain a {key} placeholder".to_string(),
        ));
    }

    if config.capture.worksheets == 0 {
        return Err(ConfigError::ValidationError(
            "capture.worksheets cannot be 0".to_string(),
        ));
    }
    if config.capture.first_data_row == 0 {
        return Err(ConfigError::ValidationError(
            "capture.first_data_row is 1-based and cannot be 0".to_string(),
        ));
    }

    Ok(())
}
