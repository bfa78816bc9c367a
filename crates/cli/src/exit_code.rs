//! Exit codes for the GraphQL CLI.
//!
//! This module defines distinct exit codes for different error types,
//! allowing scripts and CI systems to distinguish between different
//! failure modes.

use graphql_config::ConfigError;
use graphql_introspect::IntrospectionError;
use graphql_synth::SynthError;

/// Exit codes used by the CLI.
///
/// These follow standard Unix conventions where 0 indicates success
/// and non-zero values indicate different types of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no errors
    #[allow(dead_code)]
    Success = 0,
    /// Any failure not covered below (bad arguments, serialization)
    Failure = 1,
    /// Configuration error (missing or invalid config file)
    ConfigError = 2,
    /// Schema load error (introspection failed, payload malformed)
    SchemaError = 3,
    /// I/O error (file read/write failure)
    IoError = 4,
    /// Operation could not be synthesized for the schema
    SynthesisError = 5,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    #[allow(dead_code)]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Classifies an error by the first typed cause found in its chain.
    #[must_use]
    pub fn for_error(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if let Some(e) = cause.downcast_ref::<SynthError>() {
                return match e {
                    SynthError::SchemaUnavailable(_) | SynthError::MalformedTypeRef(_) => {
                        Self::SchemaError
                    }
                    _ => Self::SynthesisError,
                };
            }
            if cause.is::<IntrospectionError>() {
                return Self::SchemaError;
            }
            if cause.is::<ConfigError>() {
                return Self::ConfigError;
            }
            if cause.is::<std::io::Error>() {
                return Self::IoError;
            }
        }
        Self::Failure
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema load error"),
            Self::IoError => write!(f, "I/O error"),
            Self::SynthesisError => write!(f, "synthesis error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::ConfigError.code(), 2);
        assert_eq!(ExitCode::SchemaError.code(), 3);
        assert_eq!(ExitCode::IoError.code(), 4);
        assert_eq!(ExitCode::SynthesisError.code(), 5);
    }

    #[test]
    fn test_classifies_synth_errors() {
        let err = anyhow::Error::new(SynthError::TypeNotFound("User".into()));
        assert_eq!(ExitCode::for_error(&err), ExitCode::SynthesisError);

        let err = anyhow::Error::new(SynthError::SchemaUnavailable("down".into()));
        assert_eq!(ExitCode::for_error(&err), ExitCode::SchemaError);
    }

    #[test]
    fn test_classifies_through_context() {
        let result: Result<(), _> = Err(IntrospectionError::Http(502, String::new()));
        let err = result.context("Failed to fetch schema").unwrap_err();
        assert_eq!(ExitCode::for_error(&err), ExitCode::SchemaError);

        let result: Result<(), _> = Err(std::io::Error::other("disk full"));
        let err = result.context("Failed to write").unwrap_err();
        assert_eq!(ExitCode::for_error(&err), ExitCode::IoError);

        let err = anyhow::Error::new(ConfigError::UnsupportedFormat("x.toml".into()));
        assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);

        assert_eq!(
            ExitCode::for_error(&anyhow::anyhow!("bad flag")),
            ExitCode::Failure
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::SynthesisError.to_string(), "synthesis error");
    }
}
