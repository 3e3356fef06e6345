pub mod config;
pub mod doctor;
pub mod migrate;

use serde_json::json;

/// Every subcommand resolves to one printable line and a process exit code.
/// Machine consumers parse the line as JSON; humans read the message field.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            output: json!({
                "command": command,
                "status": "ok",
                "error_class": Option::<&str>::None,
                "message": message.into(),
            })
            .to_string(),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self {
            exit_code,
            output: json!({
                "command": command,
                "status": "error",
                "error_class": error_class,
                "message": message.into(),
            })
            .to_string(),
        }
    }
}
