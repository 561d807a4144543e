use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::GeneratorError;
use crate::generator::TextGenerator;
use crate::prompts::SYSTEM_PROMPT;

pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// A [`TextGenerator`] that shells out to the local `claude` CLI, one
/// process per prompt, with the advisory system prompt attached.
#[derive(Debug, Clone)]
pub struct ClaudeCliGenerator {
    program: String,
    model: String,
    timeout: Duration,
}

impl Default for ClaudeCliGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL.to_string(), Duration::from_secs(15))
    }
}

impl ClaudeCliGenerator {
    pub fn new(model: String, timeout: Duration) -> Self {
        Self {
            program: "claude".to_string(),
            model,
            timeout,
        }
    }

    /// Run a different executable with the same arguments.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn args<'a>(&'a self, prompt: &'a str) -> [&'a str; 8] {
        [
            "-p",
            prompt,
            "--system-prompt",
            SYSTEM_PROMPT,
            "--model",
            self.model.as_str(),
            "--output-format",
            "text",
        ]
    }

    /// Whether the executable runs `--version` successfully.
    pub async fn is_available(&self) -> bool {
        match Command::new(&self.program).arg("--version").output().await {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl TextGenerator for ClaudeCliGenerator {
    fn name(&self) -> &str {
        "claude_cli"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        debug!(program = %self.program, model = %self.model, "Running advisory prompt");

        let child = Command::new(&self.program)
            .args(self.args(prompt))
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| GeneratorError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| GeneratorError::Cli(format!("Failed to spawn {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr, "Advisory CLI failed");
            return Err(GeneratorError::Cli(format!(
                "{} exited {}: {}",
                self.program, output.status, stderr
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.trim().is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let generator = ClaudeCliGenerator::default();
        assert_eq!(generator.model(), DEFAULT_MODEL);
        assert_eq!(generator.timeout(), Duration::from_secs(15));
        assert_eq!(generator.name(), "claude_cli");
    }

    #[test]
    fn prompt_and_model_are_passed_as_arguments() {
        let generator =
            ClaudeCliGenerator::new("claude-sonnet-4-5".to_string(), Duration::from_secs(3));
        let args = generator.args("Spread=0.90%");
        assert_eq!(&args[..2], &["-p", "Spread=0.90%"]);
        assert_eq!(&args[4..6], &["--model", "claude-sonnet-4-5"]);
        assert_eq!(args[3], SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn stdout_is_the_reply() {
        let generator = ClaudeCliGenerator::default().with_program("echo");
        let reply = generator.generate("hello pools").await.unwrap();
        assert!(reply.contains("hello pools"));
    }

    #[tokio::test]
    async fn missing_executable_is_a_cli_error() {
        let generator = ClaudeCliGenerator::default().with_program("dexarb-no-such-binary");
        assert!(!generator.is_available().await);
        let err = generator.generate("?").await.unwrap_err();
        assert!(matches!(err, GeneratorError::Cli(_)));
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_cli_error() {
        let generator = ClaudeCliGenerator::default().with_program("false");
        let err = generator.generate("?").await.unwrap_err();
        assert!(matches!(err, GeneratorError::Cli(ref m) if m.contains("exited")));
    }
}
