//! Ticket lifecycle constants and booking reference generation.

/// Ticket status values as persisted on the ticket row.
pub const TICKET_PENDING: &str = "pending";
pub const TICKET_CONFIRMED: &str = "confirmed";
pub const TICKET_EXPIRED: &str = "expired";
pub const TICKET_CANCELLED: &str = "cancelled";

/// Human-visible booking reference prefix.
pub const REFERENCE_PREFIX: &str = "HIVE-";

/// Number of hex characters following the prefix.
const REFERENCE_HEX_LEN: usize = 8;

/// How many times a collided reference is regenerated before giving up.
/// Collisions are astronomically rare; the unique index is the arbiter.
pub const MAX_REFERENCE_ATTEMPTS: usize = 3;

/// Generate a booking reference of the form `HIVE-XXXXXXXX` from a fresh
/// random identifier. Uniqueness is enforced by the database index, not
/// here.
pub fn new_reference() -> String {
    let id = uuid::Uuid::new_v4();
    let hex = id.simple().to_string();
    format!(
        "{REFERENCE_PREFIX}{}",
        hex[..REFERENCE_HEX_LEN].to_uppercase()
    )
}

/// Check the `HIVE-` + 8 uppercase hex shape of a reference.
pub fn is_valid_reference(reference: &str) -> bool {
    match reference.strip_prefix(REFERENCE_PREFIX) {
        Some(rest) => {
            rest.len() == REFERENCE_HEX_LEN
                && rest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())
        }
        None => false,
    }
}
