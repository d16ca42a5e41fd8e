// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in whole seconds since the Unix epoch. Returns 0
/// if the system clock reads before the epoch, which callers treat as
/// "creation time unknown".
#[inline]
pub fn now_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
