//! Small helpers shared by the binary and tests

use chrono::Utc;

/// Current time in epoch milliseconds, the usual shape of a trade timestamp.
pub fn make_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}
