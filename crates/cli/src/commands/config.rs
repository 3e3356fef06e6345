use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use metrohost_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, Some(env_key), config_file_doc.as_ref(), config_file_path.as_deref())
    };

    lines.push(render_line(
        "database.url",
        &config.database.url,
        source("database.url", "METROHOST_DATABASE_URL"),
    ));
    lines.push(render_line(
        "database.max_connections",
        &config.database.max_connections.to_string(),
        source("database.max_connections", "METROHOST_DATABASE_MAX_CONNECTIONS"),
    ));
    lines.push(render_line(
        "database.timeout_secs",
        &config.database.timeout_secs.to_string(),
        source("database.timeout_secs", "METROHOST_DATABASE_TIMEOUT_SECS"),
    ));

    lines.push(render_line(
        "mail.api_base_url",
        &config.mail.api_base_url,
        source("mail.api_base_url", "METROHOST_MAIL_API_BASE_URL"),
    ));
    let api_token = redact_token(config.mail.api_token.expose_secret());
    lines.push(render_line(
        "mail.api_token",
        &api_token,
        source("mail.api_token", "METROHOST_MAIL_API_TOKEN"),
    ));
    lines.push(render_line(
        "mail.from_address",
        &config.mail.from_address,
        source("mail.from_address", "METROHOST_MAIL_FROM_ADDRESS"),
    ));
    lines.push(render_line(
        "mail.operator_address",
        &config.mail.operator_address,
        source("mail.operator_address", "METROHOST_MAIL_OPERATOR_ADDRESS"),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", "METROHOST_SERVER_BIND_ADDRESS"),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", "METROHOST_SERVER_PORT"),
    ));
    lines.push(render_line(
        "server.health_check_port",
        &config.server.health_check_port.to_string(),
        source("server.health_check_port", "METROHOST_SERVER_HEALTH_CHECK_PORT"),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", "METROHOST_LOGGING_LEVEL"),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", "METROHOST_LOGGING_FORMAT"),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("metrohost.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/metrohost.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}

#[cfg(test)]
mod tests {
    use super::redact_token;

    #[test]
    fn tokens_are_redacted_to_their_prefix() {
        assert_eq!(redact_token("mk-live-abcdef"), "mk-***");
        assert_eq!(redact_token("opaque"), "<redacted>");
        assert_eq!(redact_token("   "), "<empty>");
    }
}
