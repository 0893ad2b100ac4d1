use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Exclusive per-fixture lock; released on drop.
#[derive(Debug)]
pub struct FixtureLock {
    file: File,
    path: PathBuf,
}

impl FixtureLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FixtureLock {
    fn drop(&mut self) {
        // Best-effort unlock. The file stays: a waiter may already hold an fd to this inode.
        let _ = self.file.unlock();
    }
}

/// Lock file path for a fixture container name.
pub fn fixture_lock_path(dir: &Path, name: &str) -> PathBuf {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    dir.join(format!("dahu-fixtures-{safe}.lock"))
}

/// Acquire a non-blocking exclusive lock at `p`.
pub fn acquire_lock_at(p: &Path) -> io::Result<FixtureLock> {
    if let Some(parent) = p.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let f = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(p)?;
    match f.try_lock_exclusive() {
        Ok(_) => Ok(FixtureLock {
            file: f,
            path: p.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock || is_lock_contended(&e) => {
            Err(io::Error::other(format!(
                "fixture lock already held by another process: {}",
                p.display()
            )))
        }
        Err(e) => Err(e),
    }
}

fn is_lock_contended(e: &io::Error) -> bool {
    e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Poll for the lock of fixture `name` under `dir` until `timeout` elapses.
pub fn acquire_fixture_lock(
    dir: &Path,
    name: &str,
    timeout: Duration,
) -> io::Result<FixtureLock> {
    let path = fixture_lock_path(dir, name);
    let deadline = Instant::now() + timeout;
    loop {
        match acquire_lock_at(&path) {
            Ok(lock) => return Ok(lock),
            Err(e) if e.to_string().contains("already held") => {
                if Instant::now() >= deadline {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!(
                            "timed out after {:?} waiting for fixture lock {}",
                            timeout,
                            path.display()
                        ),
                    ));
                }
                tracing::debug!(lock = %path.display(), "fixture lock busy; waiting");
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return Err(e),
        }
    }
}
