//! Optimistic mutation coordinator.
//!
//! One coordinator owns one bill session. Every mutation follows the same
//! shape: validate synchronously, apply to the local aggregate, commit to
//! the remote service, and either adopt the authoritative result or restore
//! the pre-mutation snapshot. Derived fields are never patched by hand; the
//! aggregate recomputes them on read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{info, warn};

use super::error::MutationError;
use super::feedback::{Feedback, FeedbackConfig};
use super::service::{BillPatch, BillService, CacheScope};
use super::state::{MutationState, MutationTarget};
use crate::bill::types::{BillAggregate, DeliveryStatus, PaymentInput};
use crate::bill::validation::{outstanding_excluding, validate_payment};
use darzi_shared::types::{BillId, BillItemId, PaymentId};

/// How a mutation attempt ended when it did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The mutation was committed remotely.
    Committed,
    /// The request matched the current state; nothing was sent. Used for
    /// delivery-status changes equal to the current value.
    NoChange,
}

/// Session state guarded by one mutex: the live aggregate plus the single
/// feedback slot.
struct Session {
    bill: BillAggregate,
    feedback: Option<Feedback>,
}

/// Coordinates optimistic mutations for one bill session.
///
/// The coordinator is `&self`-based so mutations against different targets
/// may be in flight concurrently; the per-target state map rejects a second
/// mutation on an occupied target with [`MutationError::Busy`]. Internal
/// mutexes are never held across an await.
pub struct MutationCoordinator<S: BillService> {
    service: Arc<S>,
    bill_id: BillId,
    feedback_config: FeedbackConfig,
    session: Mutex<Session>,
    states: Mutex<HashMap<MutationTarget, MutationState>>,
}

/// Locks a mutex, recovering the data on poisoning. Critical sections here
/// only move plain data, so a poisoned guard is still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// RAII handle for one in-flight mutation. Advances the target's state and
/// releases the target (back to `Idle`) when dropped, whichever way the
/// mutation ends.
struct InFlight<'a> {
    states: &'a Mutex<HashMap<MutationTarget, MutationState>>,
    target: MutationTarget,
}

impl InFlight<'_> {
    fn advance(&self, next: MutationState) {
        let mut states = lock(self.states);
        let current = states
            .get(&self.target)
            .copied()
            .unwrap_or(MutationState::Idle);
        debug_assert!(
            MutationState::is_valid_transition(current, next),
            "invalid mutation transition {current} -> {next}"
        );
        states.insert(self.target, next);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.states).remove(&self.target);
    }
}

impl<S: BillService> MutationCoordinator<S> {
    /// Creates a coordinator for a bill snapshot.
    #[must_use]
    pub fn new(service: Arc<S>, bill: BillAggregate, feedback_config: FeedbackConfig) -> Self {
        Self {
            service,
            bill_id: bill.id,
            feedback_config,
            session: Mutex::new(Session {
                bill,
                feedback: None,
            }),
            states: Mutex::new(HashMap::new()),
        }
    }

    /// The bill this session coordinates.
    #[must_use]
    pub fn bill_id(&self) -> BillId {
        self.bill_id
    }

    /// Returns a copy of the current aggregate for rendering.
    #[must_use]
    pub fn bill(&self) -> BillAggregate {
        lock(&self.session).bill.clone()
    }

    /// Returns the feedback message still visible, if any. Expired
    /// messages are dropped on read.
    #[must_use]
    pub fn current_feedback(&self) -> Option<Feedback> {
        let mut session = lock(&self.session);
        if session.feedback.as_ref().is_some_and(|f| !f.is_visible()) {
            session.feedback = None;
        }
        session.feedback.clone()
    }

    /// Mutation state of a target; `Idle` when nothing is in flight.
    #[must_use]
    pub fn state_of(&self, target: MutationTarget) -> MutationState {
        lock(&self.states)
            .get(&target)
            .copied()
            .unwrap_or(MutationState::Idle)
    }

    /// Replaces the aggregate wholesale with a fresh remote snapshot.
    pub async fn refresh(&self) -> Result<(), MutationError> {
        let bill = self.service.fetch_bill(self.bill_id).await?;
        lock(&self.session).bill = bill;
        Ok(())
    }

    /// Records a new payment.
    ///
    /// The service response carries the authoritative recomputed bill,
    /// which replaces the optimistic local copy on success.
    pub async fn add_payment(
        &self,
        input: PaymentInput,
    ) -> Result<MutationOutcome, MutationError> {
        let flight = self.begin(MutationTarget::NewPayment)?;

        let snapshot = {
            let mut session = lock(&self.session);
            let outstanding = session.bill.outstanding_amount();
            validate_payment(&input, outstanding, today())?;
            flight.advance(MutationState::AppliedLocally);

            let snapshot = session.bill.clone();
            let provisional = input.clone().into_payment(PaymentId::new());
            session.bill.insert_payment(provisional);
            snapshot
        };

        flight.advance(MutationState::Committing);
        match self.service.add_payment(self.bill_id, input).await {
            Ok(response) => {
                {
                    let mut session = lock(&self.session);
                    session.bill = response.bill;
                    session.feedback = Some(Feedback::success(
                        "payment.add.success",
                        self.feedback_config.success_clear,
                    ));
                }
                flight.advance(MutationState::Committed);
                info!(bill_id = %self.bill_id, "payment added");
                self.invalidate_caches().await;
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                self.roll_back(snapshot, "payment.add.failed");
                flight.advance(MutationState::RolledBack);
                warn!(bill_id = %self.bill_id, error = %err, "payment add failed, rolled back");
                Err(MutationError::Remote(err))
            }
        }
    }

    /// Edits an existing payment.
    ///
    /// The service returns the updated payment only; bill-level derived
    /// fields come from the local resolvers.
    pub async fn update_payment(
        &self,
        payment_id: PaymentId,
        input: PaymentInput,
    ) -> Result<MutationOutcome, MutationError> {
        let flight = self.begin(MutationTarget::Payment(payment_id))?;

        let snapshot = {
            let mut session = lock(&self.session);
            if session.bill.payment(payment_id).is_none() {
                return Err(MutationError::UnknownPayment(payment_id));
            }
            // Outstanding is computed without the payment being edited, so
            // its own previous amount does not count against it.
            let outstanding = outstanding_excluding(&session.bill, Some(payment_id));
            validate_payment(&input, outstanding, today())?;
            flight.advance(MutationState::AppliedLocally);

            let snapshot = session.bill.clone();
            session
                .bill
                .replace_payment(input.clone().into_payment(payment_id));
            snapshot
        };

        flight.advance(MutationState::Committing);
        match self
            .service
            .update_payment(self.bill_id, payment_id, input)
            .await
        {
            Ok(updated) => {
                {
                    let mut session = lock(&self.session);
                    session.bill.replace_payment(updated);
                    session.feedback = Some(Feedback::success(
                        "payment.update.success",
                        self.feedback_config.success_clear,
                    ));
                }
                flight.advance(MutationState::Committed);
                info!(bill_id = %self.bill_id, payment_id = %payment_id, "payment updated");
                self.invalidate_caches().await;
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                self.roll_back(snapshot, "payment.update.failed");
                flight.advance(MutationState::RolledBack);
                warn!(
                    bill_id = %self.bill_id,
                    payment_id = %payment_id,
                    error = %err,
                    "payment update failed, rolled back"
                );
                Err(MutationError::Remote(err))
            }
        }
    }

    /// Deletes a payment.
    pub async fn delete_payment(
        &self,
        payment_id: PaymentId,
    ) -> Result<MutationOutcome, MutationError> {
        let flight = self.begin(MutationTarget::Payment(payment_id))?;

        let snapshot = {
            let mut session = lock(&self.session);
            if session.bill.payment(payment_id).is_none() {
                return Err(MutationError::UnknownPayment(payment_id));
            }
            flight.advance(MutationState::AppliedLocally);

            let snapshot = session.bill.clone();
            session.bill.remove_payment(payment_id);
            snapshot
        };

        flight.advance(MutationState::Committing);
        match self.service.delete_payment(self.bill_id, payment_id).await {
            Ok(()) => {
                {
                    let mut session = lock(&self.session);
                    session.feedback = Some(Feedback::success(
                        "payment.delete.success",
                        self.feedback_config.success_clear,
                    ));
                }
                flight.advance(MutationState::Committed);
                info!(bill_id = %self.bill_id, payment_id = %payment_id, "payment deleted");
                self.invalidate_caches().await;
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                self.roll_back(snapshot, "payment.delete.failed");
                flight.advance(MutationState::RolledBack);
                warn!(
                    bill_id = %self.bill_id,
                    payment_id = %payment_id,
                    error = %err,
                    "payment delete failed, rolled back"
                );
                Err(MutationError::Remote(err))
            }
        }
    }

    /// Changes one item's delivery status and persists the item list plus
    /// the recomputed aggregate delivery status.
    ///
    /// A change equal to the current status is suppressed as a no-op.
    pub async fn set_item_delivery_status(
        &self,
        item_id: BillItemId,
        status: DeliveryStatus,
    ) -> Result<MutationOutcome, MutationError> {
        let flight = self.begin(MutationTarget::Item(item_id))?;

        let (snapshot, patch) = {
            let mut session = lock(&self.session);
            let Some(item) = session.bill.item(item_id) else {
                return Err(MutationError::UnknownItem(item_id));
            };
            if item.delivery_status == status {
                return Ok(MutationOutcome::NoChange);
            }
            flight.advance(MutationState::AppliedLocally);

            let snapshot = session.bill.clone();
            session.bill.set_item_status(item_id, status, Utc::now());
            let patch = BillPatch {
                items: session.bill.items.clone(),
                delivery_status: session.bill.delivery_status(),
            };
            (snapshot, patch)
        };

        flight.advance(MutationState::Committing);
        match self.service.update_bill(self.bill_id, patch).await {
            Ok(()) => {
                {
                    let mut session = lock(&self.session);
                    session.feedback = Some(Feedback::success(
                        "item.status.success",
                        self.feedback_config.success_clear,
                    ));
                }
                flight.advance(MutationState::Committed);
                info!(
                    bill_id = %self.bill_id,
                    item_id = %item_id,
                    status = %status,
                    "item delivery status updated"
                );
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                self.roll_back(snapshot, "item.status.failed");
                flight.advance(MutationState::RolledBack);
                warn!(
                    bill_id = %self.bill_id,
                    item_id = %item_id,
                    error = %err,
                    "item status change failed, rolled back"
                );
                Err(MutationError::Remote(err))
            }
        }
    }

    /// Claims a target for one mutation. A new attempt supersedes any
    /// still-visible feedback from the previous one.
    fn begin(&self, target: MutationTarget) -> Result<InFlight<'_>, MutationError> {
        {
            let mut states = lock(&self.states);
            if states.contains_key(&target) {
                return Err(MutationError::Busy { target });
            }
            states.insert(target, MutationState::Validating);
        }
        lock(&self.session).feedback = None;
        Ok(InFlight {
            states: &self.states,
            target,
        })
    }

    /// Restores the pre-mutation snapshot verbatim and shows error
    /// feedback.
    fn roll_back(&self, snapshot: BillAggregate, message_key: &str) {
        let mut session = lock(&self.session);
        session.bill = snapshot;
        session.feedback = Some(Feedback::error(
            message_key,
            self.feedback_config.error_clear,
        ));
    }

    /// Emits the cache invalidation signal after a successful payment
    /// mutation. Failures are logged and swallowed: the mutation already
    /// committed and must not be rolled back for a stale cache.
    async fn invalidate_caches(&self) {
        if let Err(err) = self
            .service
            .clear_cache(CacheScope::Bill(self.bill_id))
            .await
        {
            warn!(bill_id = %self.bill_id, error = %err, "cache invalidation failed (ignored)");
        }
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
