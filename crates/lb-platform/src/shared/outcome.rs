//! Outcomes of conditional repository writes

/// Result of moving a record to a new identity in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome<T> {
    Renamed(T),
    /// Nothing stored under the old identity
    Missing,
    /// The new identity is already in use; nothing was changed
    Taken,
}
