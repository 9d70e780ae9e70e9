// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error states:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use lift_core::ConfigError;
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The run parameters were rejected before the park opened.
    pub fn invalid_config(err: ConfigError, file: Option<&Path>) -> Self {
        let mut cli_err = CliError::new(err.to_string());
        if let Some(file) = file {
            cli_err = cli_err.with_context(format!("while loading {}", file.display()));
        }
        cli_err = match &err {
            ConfigError::DurationOutOfRange(_) => {
                cli_err.with_suggestion("Pass a day length in seconds: lift -t 60")
            }
            ConfigError::VisitorsOutOfRange(_) => {
                cli_err.with_suggestion("Pass a visitor cap between 1 and 500: lift -n 100")
            }
            ConfigError::Invalid { field, .. } => cli_err
                .with_context(format!("{field} is set in the config file or its default"))
                .with_suggestion(format!("Fix or remove `{field}` in the config file")),
            ConfigError::Read(..) => {
                cli_err.with_suggestion("Check the path given to --config")
            }
            ConfigError::Parse(_) => cli_err
                .with_context("Durations are written like \"2s\" or \"500ms\"")
                .with_suggestion("Check the config file is valid TOML"),
        };
        cli_err.with_source(err)
    }

    /// The log directory could not be prepared.
    pub fn log_dir(dir: &Path, err: std::io::Error) -> Self {
        CliError::new(format!("cannot write logs to {}", dir.display()))
            .with_context(err.to_string())
            .with_suggestion("Choose another directory with --log-dir")
            .with_source(err)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
