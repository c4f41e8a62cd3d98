/// Application name
pub const APP_NAME: &str = "SOWP";

/// Milliseconds in one hour
pub const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Milliseconds in one day
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Chat messages older than this are eligible for deletion (7 days)
pub const RETENTION_HORIZON_MS: i64 = 7 * MILLIS_PER_DAY;

/// Minimum time between two automatic sweeps (24 hours)
pub const CLEANUP_COOLDOWN_MS: i64 = 24 * MILLIS_PER_HOUR;

/// Number of deletions issued together during a sweep
pub const CLEANUP_BATCH_SIZE: usize = 50;

/// Items per page in list screens
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum chat message body length in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Role of ordinary members; the only role muted while the chat is closed
pub const PLAIN_USER_ROLE: &str = "User";

/// Interval between periodic sweep attempts in the maintenance loop (1 hour)
pub const SWEEP_INTERVAL_SECS: u64 = 3600;

/// Size of the local database key in bytes
pub const DB_KEY_SIZE: usize = 32;
