// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LoggingLevel {
    fn default() -> Self {
        LoggingLevel::Info
    }
}

/// Process-wide configuration for the facade (§6). `userStore` and
/// `transport` are left to the caller to construct (a `SqliteUserStore`
/// and an `ApiClient` by default - see [`crate::orchestrator`]), so this
/// struct only carries the plain fields.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_id: String,
    pub platform_url: String,
    pub device_name: String,
    pub logging_level: LoggingLevel,
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("projectId must not be empty")]
    EmptyProjectId,
}

impl Config {
    pub fn new(
        project_id: impl Into<String>,
        platform_url: impl Into<String>,
        device_name: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let project_id = project_id.into();
        if project_id.is_empty() {
            return Err(ConfigurationError::EmptyProjectId);
        }
        Ok(Self {
            project_id,
            platform_url: platform_url.into(),
            device_name: device_name.into(),
            logging_level: LoggingLevel::default(),
        })
    }

    pub fn with_logging_level(mut self, level: LoggingLevel) -> Self {
        self.logging_level = level;
        self
    }
}
