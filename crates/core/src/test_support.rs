// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers shared by the unit tests
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::controller::CrossingController;
use crate::state::CrossingState;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::fmt::MakeWriter;

/// Generous bound for anything that should finish promptly; hitting it
/// means a deadlock.
pub const DEADLOCK_LIMIT: Duration = Duration::from_secs(30);

/// Poll snapshots until `predicate` holds, checking invariants on each one
pub fn wait_until(
    controller: &CrossingController,
    what: &str,
    predicate: impl Fn(&CrossingState) -> bool,
) -> CrossingState {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.check(), Ok(()), "invariant broken: {snapshot:?}");
        if predicate(&snapshot) {
            return snapshot;
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting for {what}: {snapshot:?}"
        );
        thread::sleep(Duration::from_millis(1));
    }
}

/// Run `f` on its own thread and fail if it does not finish within `limit`
pub fn within<T, F>(limit: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    match rx.recv_timeout(limit) {
        Ok(value) => value,
        Err(mpsc::RecvTimeoutError::Timeout) => panic!("did not finish within {limit:?}"),
        Err(mpsc::RecvTimeoutError::Disconnected) => panic!("worker thread panicked"),
    }
}

/// A writer that captures log output for testing
#[derive(Clone, Default)]
pub struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }

    /// A subscriber writing every event at DEBUG or above into this buffer
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .finish()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
