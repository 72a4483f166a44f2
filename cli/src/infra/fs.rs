//! Filesystem infrastructure: implements `ArtifactWriter`.

use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::ArtifactWriter;

/// Production filesystem implementation of `ArtifactWriter`.
///
/// Writes go to a temp file in the destination directory and are renamed
/// into place, so readers never observe a half-written public key or stack
/// document.
pub struct LocalFs;

impl ArtifactWriter for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("cannot create temp file in {}", parent.display()))?;
        tmp.write_all(contents.as_bytes())
            .with_context(|| format!("cannot write {}", tmp.path().display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o644))
                .with_context(|| format!("cannot set permissions on {}", tmp.path().display()))?;
        }

        tmp.persist(path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        debug!(path = %path.display(), bytes = contents.len(), "fs: wrote artifact");
        Ok(())
    }
}
