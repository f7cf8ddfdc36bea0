use uuid::Uuid;

/// Trait for persisted records addressed by a UUID primary key
pub trait Identifiable {
    /// Returns the primary key of the record
    fn get_id(&self) -> Uuid;
}
