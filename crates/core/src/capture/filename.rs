//! Downloaded-artifact filename resolution.
//!
//! Extractors occasionally land the capture under a different container
//! than the one they declared, most commonly when a live stream is
//! remuxed. When the declared path is absent, the resolver substitutes a
//! single fixed fallback container extension and stops: the candidate is
//! returned unverified, and a wrong guess surfaces as a read error at
//! upload time. This is a one-shot substitution, not a search.

use std::path::{Path, PathBuf};

/// Container extension substituted when the declared path is absent.
pub const FALLBACK_CONTAINER_EXT: &str = "mkv";

/// How the artifact path was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The declared path exists on disk.
    Exact,
    /// The declared path was absent; the fallback container extension
    /// was substituted without verification.
    FallbackContainer,
}

/// The resolved on-disk artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub path: PathBuf,
    pub resolution: Resolution,
}

/// Resolves the declared path against the real filesystem.
pub fn resolve_artifact(declared: &Path) -> ResolvedArtifact {
    resolve_with(declared, |p| p.exists())
}

/// Resolves the declared path using the given existence probe.
///
/// The fallback truncates the path string at its first `.` before
/// appending the fallback extension, so multi-part extensions like
/// `.f137.mp4` collapse entirely.
pub fn resolve_with(declared: &Path, mut exists: impl FnMut(&Path) -> bool) -> ResolvedArtifact {
    if exists(declared) {
        return ResolvedArtifact {
            path: declared.to_path_buf(),
            resolution: Resolution::Exact,
        };
    }

    let declared = declared.to_string_lossy();
    let stem = match declared.find('.') {
        Some(dot) => &declared[..dot],
        None => declared.as_ref(),
    };

    ResolvedArtifact {
        path: PathBuf::from(format!("{}.{}", stem, FALLBACK_CONTAINER_EXT)),
        resolution: Resolution::FallbackContainer,
    }
}
