// Checker safety limits module
//
// Provides configurable resource limits to prevent:
// - Stack overflow from deeply nested statements and expressions
// - Memory exhaustion from very large source files
//
// All limits have permissive defaults and can be overridden via project.toml

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Checker safety limits with permissive defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerLimits {
    // Lexer limits
    pub max_input_size: usize,        // Maximum source file size in bytes
    pub max_token_count: usize,       // Maximum number of tokens per file
    pub max_identifier_length: usize, // Maximum identifier length in bytes
    pub max_string_length: usize,     // Maximum string constant length in bytes

    // Parser limits
    pub max_nesting_depth: usize, // Maximum number of simultaneously active rules
}

impl Default for CheckerLimits {
    fn default() -> Self {
        Self {
            max_input_size: 10_000_000,    // 10 MB
            max_token_count: 100_000,      // 100k tokens
            max_identifier_length: 1_000,  // 1k bytes
            max_string_length: 10_000_000, // 10 MB
            max_nesting_depth: 256,
        }
    }
}

/// Largest accepted `max_nesting_depth`
pub const MAX_NESTING_DEPTH: usize = 2_000;

// Stack reserved per active rule (`rule` frame, closure, routine), sized for debug builds
const STACK_PER_RULE: usize = 16 * 1024;
const STACK_BASE: usize = 1024 * 1024;

impl CheckerLimits {
    /// Stack size a checking thread needs to reach `max_nesting_depth` without overflowing
    pub fn parser_stack_size(&self) -> usize {
        STACK_BASE + self.max_nesting_depth * STACK_PER_RULE
    }

    /// Load limits from project.toml, falling back to defaults
    ///
    /// Returns error only if TOML is malformed, not if file is missing
    pub fn from_project_toml<P: AsRef<Path>>(path: P) -> Result<Self, LimitError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| LimitError {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;

        Self::from_toml_str(&content).map_err(|e| LimitError {
            message: format!("Failed to parse {}: {}", path.display(), e.message),
        })
    }

    /// Parse limits from TOML text, overriding only the keys present in `[limits]`
    pub fn from_toml_str(content: &str) -> Result<Self, LimitError> {
        let config: ProjectConfig = toml::from_str(content).map_err(|e| LimitError {
            message: e.to_string(),
        })?;

        let mut limits = Self::default();

        if let Some(overrides) = config.limits {
            if let Some(v) = overrides.max_input_size {
                limits.max_input_size = v;
            }
            if let Some(v) = overrides.max_token_count {
                limits.max_token_count = v;
            }
            if let Some(v) = overrides.max_identifier_length {
                limits.max_identifier_length = v;
            }
            if let Some(v) = overrides.max_string_length {
                limits.max_string_length = v;
            }
            if let Some(v) = overrides.max_nesting_depth {
                limits.max_nesting_depth = v;
            }
        }

        Ok(limits)
    }

    /// Validate that all limits are reasonable (positive, not absurdly large)
    pub fn validate(&self) -> Result<(), LimitError> {
        const MAX_REASONABLE: usize = 100_000_000; // 100 MB

        if self.max_input_size == 0 || self.max_input_size > MAX_REASONABLE {
            return Err(LimitError::invalid("max_input_size", self.max_input_size));
        }

        if self.max_token_count == 0 {
            return Err(LimitError::invalid("max_token_count", self.max_token_count));
        }

        if self.max_identifier_length == 0 || self.max_identifier_length > 100_000 {
            return Err(LimitError::invalid(
                "max_identifier_length",
                self.max_identifier_length,
            ));
        }

        if self.max_string_length == 0 || self.max_string_length > MAX_REASONABLE {
            return Err(LimitError::invalid(
                "max_string_length",
                self.max_string_length,
            ));
        }

        // The statement part alone needs a handful of levels
        if self.max_nesting_depth < 8 || self.max_nesting_depth > MAX_NESTING_DEPTH {
            return Err(LimitError::invalid(
                "max_nesting_depth",
                self.max_nesting_depth,
            ));
        }

        Ok(())
    }
}

/// TOML configuration structures for deserialization
#[derive(Debug, Deserialize)]
struct ProjectConfig {
    limits: Option<LimitsConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsConfig {
    max_input_size: Option<usize>,
    max_token_count: Option<usize>,
    max_identifier_length: Option<usize>,
    max_string_length: Option<usize>,
    max_nesting_depth: Option<usize>,
}

/// Error type for limit validation and loading
#[derive(Debug, Clone, Error)]
#[error("Limit error: {message}")]
pub struct LimitError {
    pub message: String,
}

impl LimitError {
    fn invalid(name: &str, value: usize) -> Self {
        Self {
            message: format!(
                "Invalid limit '{}': {} (must be positive and reasonable)",
                name, value
            ),
        }
    }
}
