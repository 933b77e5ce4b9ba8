//! Process exit codes and the error that carries them to `main`.

use std::fmt;

/// Exit statuses other than success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Anything not classified below.
    Generic = 1,
    /// An explicitly named configuration file does not exist.
    NoConfigFile = 3,
    /// The request could not be satisfied from the catalog.
    BadCall = 4,
    /// A fetch request or transfer failed.
    Network = 5,
    /// Configuration or package indexes could not be loaded.
    CoreConfig = 6,
    /// A command argument is malformed.
    BadArgument = 7,
}

impl ExitCode {
    /// The numeric process status.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// An error tagged with the exit code it should end the process with.
///
/// It displays as the error it wraps, so the tag is invisible in messages.
#[derive(Debug)]
pub struct CommandError {
    pub code: ExitCode,
    source: anyhow::Error,
}

impl CommandError {
    pub fn new(code: ExitCode, source: impl Into<anyhow::Error>) -> Self {
        CommandError {
            code,
            source: source.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.source()
    }
}

/// Tag the error of a `Result` with an exit code.
pub trait WithExitCode<T> {
    fn exit_code(self, code: ExitCode) -> anyhow::Result<T>;
}

impl<T, E> WithExitCode<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn exit_code(self, code: ExitCode) -> anyhow::Result<T> {
        self.map_err(|e| CommandError::new(code, e).into())
    }
}

/// The exit code for an error returned from a command.
///
/// Untagged errors are generic failures.
pub fn code_for(err: &anyhow::Error) -> ExitCode {
    err.chain()
        .find_map(|e| e.downcast_ref::<CommandError>())
        .map(|e| e.code)
        .unwrap_or(ExitCode::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn numeric_codes() {
        assert_eq!(ExitCode::Generic.code(), 1);
        assert_eq!(ExitCode::NoConfigFile.code(), 3);
        assert_eq!(ExitCode::BadCall.code(), 4);
        assert_eq!(ExitCode::Network.code(), 5);
        assert_eq!(ExitCode::CoreConfig.code(), 6);
        assert_eq!(ExitCode::BadArgument.code(), 7);
    }

    #[test]
    fn tag_survives_context() {
        let tagged: anyhow::Result<()> = Err(anyhow::anyhow!("unreachable host"))
            .context("Error downloading arduino:samd@1.6.9")
            .exit_code(ExitCode::Network);
        let err = tagged
            .context("while running download")
            .unwrap_err();
        assert_eq!(code_for(&err), ExitCode::Network);
    }

    #[test]
    fn untagged_is_generic() {
        assert_eq!(code_for(&anyhow::anyhow!("boom")), ExitCode::Generic);
    }

    #[test]
    fn message_is_unchanged_by_tag() {
        let err: anyhow::Error = Err::<(), _>(anyhow::anyhow!("unreachable host"))
            .context("Error downloading arduino:samd@1.6.9")
            .exit_code(ExitCode::Network)
            .unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "Error downloading arduino:samd@1.6.9: unreachable host"
        );
    }
}
