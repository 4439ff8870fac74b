use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};

/// A file a command reads and must never write over.
pub struct Protected<'a> {
    pub role: &'static str,
    pub path: &'a Path,
}

impl<'a> Protected<'a> {
    pub fn new(role: &'static str, path: &'a Path) -> Self {
        Self { role, path }
    }
}

/// Refuse to write `target` when it names the same file as any `protected`
/// input.
pub fn ensure_distinct_target(target: &Path, protected: &[Protected<'_>]) -> Result<()> {
    let target_key = comparable(target)?;
    for input in protected {
        if comparable(input.path)? == target_key {
            bail!(
                "refusing to overwrite {} {} with {}",
                input.role,
                input.path.display(),
                target.display()
            );
        }
    }
    Ok(())
}

/// Canonical form for existing files; absolute and lexically cleaned for
/// files that do not exist yet.
fn comparable(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", path.display()));
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("failed to read current directory")?
            .join(path)
    };
    Ok(lexical_clean(&absolute))
}

fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    // Existing parent directories are canonicalized to match `canonicalize`.
    if let (Some(parent), Some(name)) = (out.parent(), out.file_name()) {
        if let Ok(dir) = parent.canonicalize() {
            return dir.join(name);
        }
    }
    out
}
