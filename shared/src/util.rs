/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER so the
/// dashboard can keep ids as plain numbers):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: process-wide sequence, randomly seeded (4096 ids per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicI64, Ordering};

    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    static SEQUENCE: OnceLock<AtomicI64> = OnceLock::new();

    let seq = SEQUENCE
        .get_or_init(|| AtomicI64::new(rand::thread_rng().gen_range(0..0x1000)))
        .fetch_add(1, Ordering::Relaxed)
        & 0xFFF; // 12 bits
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    (ts << 12) | seq
}

/// Today's UTC date as `YYYYMMDD`, used in order and PO numbers
pub fn date_stamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .format("%Y%m%d")
        .to_string()
}
