/// Primary key type shared by every table.
pub type DbId = i64;

/// Timestamp type used for `created_at` / `updated_at` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
