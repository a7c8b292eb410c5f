use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Listener ports are not 0
/// - The static listener does not collide with the catalog listener
/// - The static listener has a file to serve
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let static_site = &config.static_site;
    if static_site.enabled {
        if static_site.port == 0 {
            return Err(ConfigError::ValidationError(
                "static.port cannot be 0".to_string(),
            ));
        }

        if static_site.addr() == config.server.addr() {
            return Err(ConfigError::ValidationError(format!(
                "static listener address {} is already used by the server",
                static_site.addr()
            )));
        }

        if static_site.file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "static.file cannot be empty".to_string(),
            ));
        }
    }

    if config.database.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "database.path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
