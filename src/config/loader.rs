//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::AppConfig;
use super::secret::secret_string;
use crate::domain::errors::LayerExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AppConfig
/// 4. Applies environment variable overrides (LAYER_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use layer_export::config::loader::load_config;
///
/// let config = load_config("layer-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LayerExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LayerExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: AppConfig = toml::from_str(&contents)
        .map_err(|e| LayerExportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(&mut config)?;
    Ok(config)
}

/// Loads configuration from `path` if it exists, otherwise starts from defaults
///
/// Environment overrides and validation apply in both cases.
///
/// # Errors
///
/// Returns an error if an existing file is invalid or the resulting
/// configuration fails validation.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "Configuration file not found, using defaults"
    );
    let mut config = AppConfig::default();
    finish(&mut config)?;
    Ok(config)
}

fn finish(config: &mut AppConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        LayerExportError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| LayerExportError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(LayerExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

/// Parse a numeric override, reporting the variable on failure
fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        LayerExportError::Configuration(format!("{name} has an invalid value '{value}'"))
    })
}

/// Applies environment variable overrides using LAYER_EXPORT_* prefix
///
/// Environment variables follow the pattern: LAYER_EXPORT_<SECTION>_<KEY>
/// For example: LAYER_EXPORT_FIGMA_ACCESS_TOKEN, LAYER_EXPORT_EXPORT_OUTPUT_DIR
fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    let var = |name: &str| std::env::var(name).ok();

    // Application overrides
    if let Some(val) = var("LAYER_EXPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Figma overrides
    if let Some(val) = var("LAYER_EXPORT_FIGMA_API_BASE_URL") {
        config.figma.api_base_url = val;
    }
    if let Some(val) = var("LAYER_EXPORT_FIGMA_ACCESS_TOKEN") {
        config.figma.access_token = Some(secret_string(val));
    }
    if let Some(val) = var("LAYER_EXPORT_FIGMA_FILE_KEY") {
        config.figma.file_key = Some(val);
    }
    if let Some(val) = var("LAYER_EXPORT_FIGMA_TIMEOUT_SECONDS") {
        config.figma.timeout_seconds = parse_override("LAYER_EXPORT_FIGMA_TIMEOUT_SECONDS", &val)?;
    }

    // Export overrides
    if let Some(val) = var("LAYER_EXPORT_EXPORT_DEFAULT_SCALE") {
        config.export.default_scale = parse_override("LAYER_EXPORT_EXPORT_DEFAULT_SCALE", &val)?;
    }
    if let Some(val) = var("LAYER_EXPORT_EXPORT_DEFAULT_FORMAT") {
        config.export.default_format = val;
    }
    if let Some(val) = var("LAYER_EXPORT_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Some(val) = var("LAYER_EXPORT_EXPORT_OUTPUT_PREFIX") {
        config.export.output_prefix = Some(val);
    }
    if let Some(val) = var("LAYER_EXPORT_EXPORT_CHANNEL_CAPACITY") {
        config.export.channel_capacity =
            parse_override("LAYER_EXPORT_EXPORT_CHANNEL_CAPACITY", &val)?;
    }

    // Compression overrides
    if let Some(val) = var("LAYER_EXPORT_COMPRESSION_DEFAULT_SERVICE_URL") {
        config.compression.default_service_url = val;
    }
    if let Some(val) = var("LAYER_EXPORT_COMPRESSION_TIMEOUT_SECONDS") {
        config.compression.timeout_seconds =
            parse_override("LAYER_EXPORT_COMPRESSION_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = var("LAYER_EXPORT_COMPRESSION_SETTINGS_PATH") {
        config.compression.settings_path = val;
    }

    // Server overrides
    if let Some(val) = var("LAYER_EXPORT_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Some(val) = var("LAYER_EXPORT_SERVER_TINYPNG_API_KEY") {
        config.server.tinypng_api_key = Some(secret_string(val));
    }
    if let Some(val) = var("LAYER_EXPORT_SERVER_TINYPNG_BASE_URL") {
        config.server.tinypng_base_url = val;
    }
    if let Some(val) = var("LAYER_EXPORT_SERVER_TIMEOUT_SECONDS") {
        config.server.timeout_seconds =
            parse_override("LAYER_EXPORT_SERVER_TIMEOUT_SECONDS", &val)?;
    }

    // Logging overrides
    if let Some(val) = var("LAYER_EXPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = var("LAYER_EXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = var("LAYER_EXPORT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LAYER_EXPORT_TEST_SUBST", "test_value");
        let input = "access_token = \"${LAYER_EXPORT_TEST_SUBST}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "access_token = \"test_value\"");
        std::env::remove_var("LAYER_EXPORT_TEST_SUBST");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LAYER_EXPORT_TEST_MISSING");
        let input = "access_token = \"${LAYER_EXPORT_TEST_MISSING}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("LAYER_EXPORT_TEST_MISSING"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("LAYER_EXPORT_TEST_COMMENTED");
        let input = "# token = \"${LAYER_EXPORT_TEST_COMMENTED}\"\nfile_key = \"abc\"\n";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(LayerExportError::Configuration(_))));
    }

    #[test]
    fn test_load_config_or_default_missing_file() {
        let config = load_config_or_default("nonexistent-layer-export.toml").unwrap();
        assert_eq!(config.export.output_dir, "./exports");
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[figma]
access_token = "figd_test"
file_key = "AbCdEf123"

[export]
default_scale = 2
default_format = "jpg"
output_dir = "./out"
output_prefix = "icons"

[compression]
default_service_url = "http://localhost:9000/compress"

[server]
bind_address = "0.0.0.0:8765"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(
            config
                .figma
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            Some("figd_test".to_string())
        );
        assert_eq!(config.figma.file_key.as_deref(), Some("AbCdEf123"));
        assert_eq!(config.export.default_scale, 2);
        assert_eq!(config.export.output_prefix.as_deref(), Some("icons"));
        assert_eq!(
            config.compression.default_service_url,
            "http://localhost:9000/compress"
        );
        assert_eq!(config.server.bind_address, "0.0.0.0:8765");
    }

    #[test]
    fn test_load_config_validation_failure() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[export]\ndefault_scale = 9\n")
            .unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("default_scale"));
    }

    #[test]
    fn test_parse_override_reports_variable() {
        let err = parse_override::<u64>("LAYER_EXPORT_X", "abc").unwrap_err();
        assert!(err.to_string().contains("LAYER_EXPORT_X"));
        assert_eq!(parse_override::<u64>("LAYER_EXPORT_X", " 30 ").unwrap(), 30);
    }
}
