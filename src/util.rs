use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber for the binary. `RUST_LOG` wins when set;
/// otherwise `info`, or `debug` for this crate when `verbose`.
/// Library code never calls this: without a subscriber its events are dropped.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "info,rdump=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Temp sibling used while `dest` is being written.
pub fn tmp_path_for(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    dest.with_file_name(name)
}

/// Write `bytes` to `dest` through a temp file + rename, so a failed write
/// leaves any previous content of `dest` untouched.
pub fn write_file_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = dest.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
    }
    let tmp = tmp_path_for(dest);
    {
        let f = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
        let mut w = BufWriter::new(f);
        w.write_all(bytes).with_context(|| format!("write {}", tmp.display()))?;
        w.flush().with_context(|| format!("flush {}", tmp.display()))?;
    }
    if let Err(e) = fs::rename(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("rename {} -> {}", tmp.display(), dest.display()));
    }
    Ok(())
}
