use crate::config::DependencyCheckConfig;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const SUCCESS_TTL: Duration = Duration::from_secs(30);
pub const FAILURE_TTL: Duration = Duration::from_secs(10);
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_millis(3000);
pub const DEFAULT_BATCH_DEADLINE: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy)]
struct CachedCheck {
    available: bool,
    expires_at: Instant,
}

/// Decides whether the external tool behind a category is installed.
///
/// Each check spawns the configured command and treats a zero exit status
/// as "available". Results are cached briefly per category.
#[derive(Debug)]
pub struct DependencyChecker {
    checks: BTreeMap<String, DependencyCheckConfig>,
    cache: Mutex<HashMap<String, CachedCheck>>,
}

impl DependencyChecker {
    pub fn new(checks: BTreeMap<String, DependencyCheckConfig>) -> Self {
        Self {
            checks,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Categories that have a check configured
    pub fn configured_categories(&self) -> Vec<String> {
        self.checks.keys().cloned().collect()
    }

    /// Whether `category` can be used. Categories without an enabled check are always available.
    pub fn is_available(&self, category: &str) -> bool {
        let Some(check) = self.checks.get(category).filter(|c| c.enabled) else {
            return true;
        };

        if let Some(cached) = self.lock_cache().get(category) {
            if cached.expires_at > Instant::now() {
                return cached.available;
            }
        }

        let available = run_check(category, check);
        let ttl = if available { SUCCESS_TTL } else { FAILURE_TTL };
        self.lock_cache().insert(
            category.to_string(),
            CachedCheck {
                available,
                expires_at: Instant::now() + ttl,
            },
        );
        available
    }

    /// Check several categories concurrently.
    ///
    /// Checks still running when `deadline` elapses are reported as unavailable.
    pub fn check_batch(
        self: &Arc<Self>,
        categories: &[String],
        deadline: Duration,
    ) -> BTreeMap<String, bool> {
        let unique: BTreeSet<&String> = categories.iter().collect();
        let (tx, rx) = mpsc::channel();
        for &category in &unique {
            let checker = Arc::clone(self);
            let tx = tx.clone();
            let category = category.clone();
            let spawned = thread::Builder::new()
                .name(format!("depcmd-check-{category}"))
                .spawn(move || {
                    let available = checker.is_available(&category);
                    let _ = tx.send((category, available));
                });
            if let Err(e) = spawned {
                warn!("Failed to spawn dependency check thread: {e}");
            }
        }
        drop(tx);

        let mut results: BTreeMap<String, bool> =
            unique.iter().map(|&c| (c.clone(), false)).collect();
        let started = Instant::now();
        let mut pending = unique.len();

        while pending > 0 {
            let Some(remaining) = deadline.checked_sub(started.elapsed()) else {
                break;
            };
            match rx.recv_timeout(remaining) {
                Ok((category, available)) => {
                    results.insert(category, available);
                    pending -= 1;
                }
                Err(_) => break,
            }
        }

        if pending > 0 {
            warn!("{pending} dependency check(s) did not finish within {deadline:?}");
        }
        info!("Dependency detection completed: {results:?}");
        results
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
        info!("Dependency detection cache cleared");
    }

    pub fn clear_category_cache(&self, category: &str) {
        self.lock_cache().remove(category);
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<String, CachedCheck>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn run_check(category: &str, check: &DependencyCheckConfig) -> bool {
    let Some((program, args)) = check.argv() else {
        warn!("Dependency check for {category} has an empty command");
        return false;
    };
    let timeout = check
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_CHECK_TIMEOUT);

    debug!("Detecting dependency {category} with {program} {args:?}");
    let mut child = match Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            info!("Dependency not found: {category} ({e})");
            return false;
        }
    };

    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Dependency check {category} exited with {status}");
                return status.success();
            }
            Ok(None) if started.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                info!("Dependency check {category} timed out after {timeout:?}");
                return false;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                warn!("Dependency check {category} failed: {e}");
                let _ = child.kill();
                return false;
            }
        }
    }
}
