//! Mutation state machine and targets.

use darzi_shared::types::{BillItemId, PaymentId};

/// The entity a mutation is aimed at.
///
/// The busy-guard is keyed on this: one in-flight mutation per target,
/// while mutations on different targets may run concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationTarget {
    /// The add-payment form (the payment does not exist yet).
    NewPayment,
    /// An existing payment being edited or deleted.
    Payment(PaymentId),
    /// A specific line item whose delivery status is changing.
    Item(BillItemId),
}

impl std::fmt::Display for MutationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewPayment => write!(f, "new payment"),
            Self::Payment(id) => write!(f, "payment {id}"),
            Self::Item(id) => write!(f, "item {id}"),
        }
    }
}

/// State of one mutation against one target.
///
/// The valid transitions are:
/// - Idle → Validating (mutation starts)
/// - Validating → AppliedLocally (validation passed)
/// - Validating → Idle (validation failed; nothing was applied)
/// - AppliedLocally → Committing (remote call issued)
/// - Committing → Committed (remote accepted)
/// - Committing → RolledBack (remote failed; snapshot restored)
/// - Committed → Idle, RolledBack → Idle (mutation finished)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// No mutation pending for the target.
    Idle,
    /// Synchronous validation in progress.
    Validating,
    /// Local aggregate updated; snapshot retained for rollback.
    AppliedLocally,
    /// Remote commit in flight. The target is busy.
    Committing,
    /// Remote accepted; the mutation is durable.
    Committed,
    /// Remote failed; the pre-mutation snapshot was restored.
    RolledBack,
}

impl MutationState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::AppliedLocally => "applied_locally",
            Self::Committing => "committing",
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
        }
    }

    /// Returns true while the mutation occupies its target.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Validating | Self::AppliedLocally | Self::Committing)
    }

    /// Returns true once the mutation has finished, either way.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack)
    }

    /// Check if a state transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: Self, to: Self) -> bool {
        matches!(
            (from, to),
            (Self::Idle, Self::Validating)
                | (Self::Validating, Self::AppliedLocally | Self::Idle)
                | (Self::AppliedLocally, Self::Committing)
                | (Self::Committing, Self::Committed | Self::RolledBack)
                | (Self::Committed | Self::RolledBack, Self::Idle)
        )
    }
}

impl std::fmt::Display for MutationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
