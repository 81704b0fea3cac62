//! Sprite build errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::optimize::OptimizeError;

/// Any failure that aborts a sprite build.
///
/// Builds are all-or-nothing: one error discards the whole pass.
#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to walk {}: {}", .0.display(), .1)]
    Discovery(PathBuf, #[source] jwalk::Error),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Read(PathBuf, #[source] io::Error),

    #[error("failed to optimize {}: {}", .0.display(), .1)]
    Optimize(PathBuf, #[source] OptimizeError),

    #[error("invalid optimizer config: {0}")]
    OptimizerConfig(String),

    #[error("failed to write {}: {}", .0.display(), .1)]
    Write(PathBuf, #[source] io::Error),

    #[error("sprite session used before the host resolved its config")]
    Unresolved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path_and_cause() {
        let err = SpriteError::Read(
            PathBuf::from("icons/home.svg"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "failed to read icons/home.svg: gone");

        let err = SpriteError::Write(
            PathBuf::from("dist/sprite.svg"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to write dist/sprite.svg: denied");
    }
}
