// Author: Dustin Pilgrim
// License: MIT

use std::future::Future;
use std::path::Path;
use std::pin::pin;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use eventline::runtime::{self, LogLevel};

/// File output always; console (with colour) only when `verbose`.
pub fn init_logging(log_path: &Path, verbose: bool) -> Result<(), String> {
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("create log dir {}: {e}", dir.display()))?;
    }

    run_to_completion(runtime::init());

    runtime::enable_file_output(log_path)
        .map_err(|e| format!("log file {}: {e}", log_path.display()))?;
    runtime::enable_console_output(verbose);
    runtime::enable_console_color(verbose);
    runtime::set_log_level(level_for(verbose));

    Ok(())
}

fn level_for(verbose: bool) -> LogLevel {
    if verbose { LogLevel::Debug } else { LogLevel::Info }
}

// runtime::init is async; it is polled to completion on this thread.
static NOOP: RawWakerVTable = RawWakerVTable::new(noop_clone, noop, noop, noop);

unsafe fn noop_clone(_: *const ()) -> RawWaker {
    RawWaker::new(std::ptr::null(), &NOOP)
}

unsafe fn noop(_: *const ()) {}

fn run_to_completion<F: Future>(fut: F) -> F::Output {
    // SAFETY: the vtable functions ignore the data pointer.
    let waker = unsafe { Waker::from_raw(RawWaker::new(std::ptr::null(), &NOOP)) };
    let mut cx = Context::from_waker(&waker);
    let mut fut = pin!(fut);

    loop {
        if let Poll::Ready(v) = fut.as_mut().poll(&mut cx) {
            return v;
        }
        std::thread::yield_now();
    }
}
