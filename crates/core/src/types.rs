/// All entity identifiers are UUID v7 values, which sort by creation time.
pub type Id = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh time-sortable identifier.
pub fn new_id() -> Id {
    uuid::Uuid::now_v7()
}
