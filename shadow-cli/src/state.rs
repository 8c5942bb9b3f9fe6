use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn shadow_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".shadow-hours"))
}

pub fn ensure_shadow_home() -> Result<PathBuf> {
    let dir = shadow_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Read calendar text from a file, or from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let text = std::io::read_to_string(std::io::stdin()).context("read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
