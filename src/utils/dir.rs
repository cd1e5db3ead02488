use std::{env, io, path::PathBuf};

use anyhow::{Context, Result};

/// Resolves the directory holding ledger tables and logs. On Linux this is
/// `$XDG_STATE_HOME/spotter` falling back to `$HOME/.local/state/spotter`;
/// on Windows it lives under `%APPDATA%`.
pub fn application_state_dir() -> Result<PathBuf> {
    let mut path = state_root()?;
    path.push("spotter");

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(e) => Err(e.into()),
    }
}

fn state_root() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        env::var("APPDATA")
            .map(PathBuf::from)
            .context("APPDATA should be present on Windows")
    }
    #[cfg(not(windows))]
    {
        if let Ok(state_home) = env::var("XDG_STATE_HOME") {
            return Ok(PathBuf::from(state_home));
        }
        let home = env::var("HOME").context("Couldn't find neither XDG_STATE_HOME nor HOME")?;
        Ok(PathBuf::from(home).join(".local/state"))
    }
}
