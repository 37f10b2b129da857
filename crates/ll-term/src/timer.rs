// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Liveness watchdog — a SIGALRM heartbeat at 100 ms.
//
// The handler body is deliberately tiny: it bumps an atomic tick counter
// and, when a hang deadline is armed, aborts the process if the deadline
// tick has passed. Nothing else. A signal handler runs in an
// interrupt-like context where only async-signal-safe operations are
// permitted, so it must never touch rendering state, allocate, or lock.
//
// The deadline exists for test harnesses: set `LOGLOOK_HANG_DEADLINE` to a
// number of seconds before installing the watchdog and a hung process
// kills itself instead of wedging the harness.

use std::sync::atomic::{AtomicU64, Ordering};

/// Heartbeat period in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 100;

const TICKS_PER_SECOND: u64 = 1000 / TICK_INTERVAL_MS;

/// Environment variable holding the hang deadline in seconds.
pub const DEADLINE_ENV: &str = "LOGLOOK_HANG_DEADLINE";

static TICKS: AtomicU64 = AtomicU64::new(0);

/// Tick at which the process aborts. Zero means disarmed.
static DEADLINE_TICK: AtomicU64 = AtomicU64::new(0);

/// Ticks elapsed since the watchdog was installed.
#[must_use]
pub fn ticks() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

/// Arm (or re-arm) the hang deadline `secs` seconds from now.
pub fn arm(secs: u64) {
    let deadline = ticks() + secs.max(1) * TICKS_PER_SECOND;
    DEADLINE_TICK.store(deadline, Ordering::Relaxed);
}

/// Disarm the hang deadline.
pub fn disarm() {
    DEADLINE_TICK.store(0, Ordering::Relaxed);
}

/// One heartbeat. Returns true when an armed deadline has passed.
fn on_tick() -> bool {
    let now = TICKS.fetch_add(1, Ordering::Relaxed) + 1;
    let deadline = DEADLINE_TICK.load(Ordering::Relaxed);
    deadline != 0 && now >= deadline
}

/// Install the watchdog: a SIGALRM handler plus a 100 ms interval timer.
///
/// Reads [`DEADLINE_ENV`] once and arms the deadline when it parses as a
/// positive number of seconds.
#[cfg(unix)]
pub fn install() -> std::io::Result<()> {
    if let Some(secs) = std::env::var(DEADLINE_ENV)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|&s| s > 0)
    {
        arm(secs);
    }

    extern "C" fn handle_alarm(_sig: libc::c_int) {
        // Async-signal-safe only: atomics and abort.
        if on_tick() {
            unsafe { libc::abort() };
        }
    }

    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = handle_alarm as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        if libc::sigaction(libc::SIGALRM, &raw const sa, std::ptr::null_mut()) != 0 {
            return Err(std::io::Error::last_os_error());
        }

        let interval = libc::timeval {
            tv_sec: 0,
            tv_usec: (TICK_INTERVAL_MS * 1000) as libc::suseconds_t,
        };
        let timer = libc::itimerval {
            it_interval: interval,
            it_value: interval,
        };
        if libc::setitimer(libc::ITIMER_REAL, &raw const timer, std::ptr::null_mut()) != 0 {
            return Err(std::io::Error::last_os_error());
        }
    }

    Ok(())
}

/// No periodic timer off unix; the watchdog is inert.
#[cfg(not(unix))]
pub fn install() -> std::io::Result<()> {
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────
