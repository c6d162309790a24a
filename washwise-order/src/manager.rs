use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use washwise_catalog::{LineItem, PricingEngine};
use washwise_shared::models::events::ActivityEvent;

use crate::models::{LaundryRecord, RecordDraft, RecordStatus};
use crate::payment::{PaymentMethod, PaymentStatus};
use crate::record_id::RecordIdGenerator;

/// Manages laundry records and their workflow transitions
pub struct RecordManager {
    records: Vec<LaundryRecord>,
    ids: RecordIdGenerator,
    engine: PricingEngine,
    activity: Vec<ActivityEvent>,
}

impl RecordManager {
    pub fn new(engine: PricingEngine) -> Self {
        Self {
            records: Vec::new(),
            ids: RecordIdGenerator::new(Utc::now()),
            engine,
            activity: Vec::new(),
        }
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// Create a record from a submitted form. Totals are computed here, never taken from input.
    pub fn create_record(&mut self, draft: RecordDraft) -> Result<&LaundryRecord, RecordError> {
        if draft.customer_id.trim().is_empty() {
            return Err(RecordError::InvalidArgument("customer id is required".to_string()));
        }
        if draft.items.is_empty() && draft.weight_kg.is_none() {
            return Err(RecordError::InvalidArgument(
                "a record needs at least one item or a weight".to_string(),
            ));
        }

        let now = Utc::now();
        let record = LaundryRecord::new(self.ids.next_id(now), draft, &self.engine);

        tracing::info!(record_id = %record.id, customer_id = %record.customer_id, total = %record.total_amount(), "laundry record created");
        self.activity.push(ActivityEvent::RecordReceived {
            record_id: record.id.clone(),
            customer_id: record.customer_id.clone(),
            at: now,
        });
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Adopt a record that already has an id (loaded from the shop API).
    pub fn import_record(&mut self, record: LaundryRecord) {
        self.ids.observe(&record.id);
        self.records.push(record);
    }

    /// Drop a record that was never accepted by the shop API, freeing its id.
    pub fn discard_record(&mut self, record_id: &str) -> Option<LaundryRecord> {
        let index = self.records.iter().position(|r| r.id == record_id)?;
        let record = self.records.remove(index);
        self.activity.retain(|event| event.record_id() != record_id);
        self.ids.release(record_id);
        tracing::warn!(record_id, "laundry record discarded");
        Some(record)
    }

    pub fn get_record(&self, record_id: &str) -> Option<&LaundryRecord> {
        self.records.iter().find(|r| r.id == record_id)
    }

    pub fn records(&self) -> &[LaundryRecord] {
        &self.records
    }

    pub fn activity(&self) -> &[ActivityEvent] {
        &self.activity
    }

    /// Correct the receipt rows. Only allowed before sorting starts.
    pub fn update_items(&mut self, record_id: &str, items: Vec<LineItem>) -> Result<&LaundryRecord, RecordError> {
        let engine = self.engine.clone();
        let record = self.get_record_mut(record_id)?;

        if record.status() != RecordStatus::Pending {
            return Err(RecordError::ModificationFailed(format!(
                "record {} is already {}",
                record.id,
                record.status().label()
            )));
        }
        if record.payment.amount_paid > Decimal::ZERO || record.payment.status.is_settled() {
            return Err(RecordError::ModificationFailed(format!(
                "record {} already has payments",
                record.id
            )));
        }

        record.set_items(items, &engine);
        Ok(&*record)
    }

    /// Move a record one step along Pending → Sorting → Drying → ReadyForPickup → PickedUp.
    pub fn advance(&mut self, record_id: &str) -> Result<RecordStatus, RecordError> {
        let current = self
            .get_record(record_id)
            .ok_or_else(|| RecordError::NotFound(record_id.to_string()))?
            .status();
        let next = current.next().ok_or_else(|| RecordError::InvalidTransition {
            from: format!("{:?}", current),
            to: "NONE".to_string(),
        })?;
        self.transition(record_id, next)?;
        Ok(next)
    }

    /// Transition to `target`, which must be the immediate successor of the current status.
    pub fn transition(&mut self, record_id: &str, target: RecordStatus) -> Result<(), RecordError> {
        let record = self.get_record_mut(record_id)?;
        let current = record.status();

        if current.next() != Some(target) {
            return Err(RecordError::InvalidTransition {
                from: format!("{:?}", current),
                to: format!("{:?}", target),
            });
        }

        record.update_status(target);
        let event = ActivityEvent::RecordStatusChanged {
            record_id: record.id.clone(),
            from: current.label().to_string(),
            to: target.label().to_string(),
            at: record.updated_at,
        };

        tracing::info!(record_id, from = ?current, to = ?target, "record status changed");
        self.activity.push(event);
        Ok(())
    }

    /// Transition: Drying → ReadyForPickup
    pub fn mark_ready_for_pickup(&mut self, record_id: &str) -> Result<(), RecordError> {
        self.transition(record_id, RecordStatus::ReadyForPickup)
    }

    /// Transition: ReadyForPickup → PickedUp
    pub fn mark_picked_up(&mut self, record_id: &str) -> Result<(), RecordError> {
        self.transition(record_id, RecordStatus::PickedUp)
    }

    pub fn record_payment(
        &mut self,
        record_id: &str,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<PaymentStatus, RecordError> {
        let record = self.get_record_mut(record_id)?;

        if record.payment.status.is_settled() {
            return Err(RecordError::AlreadyPaid(record.id.clone()));
        }

        let amount_due = record.total_amount();
        let paid_before = record.payment.amount_paid;
        let status = record
            .payment
            .apply(amount, method, amount_due)
            .ok_or_else(|| RecordError::InvalidArgument(format!("payment amount must be positive, got {}", amount)))?;
        record.updated_at = Utc::now();

        let collected = record.payment.amount_paid - paid_before;
        if collected < amount {
            tracing::debug!(record_id, change = %(amount - collected), "payment exceeds balance");
        }
        let event = ActivityEvent::PaymentRecorded {
            record_id: record.id.clone(),
            amount: collected,
            method: format!("{:?}", method),
            at: record.updated_at,
        };

        tracing::info!(record_id, %collected, status = ?status, "payment recorded");
        self.activity.push(event);
        Ok(status)
    }

    /// Settle the remaining balance in one go (the "mark as paid" button).
    pub fn mark_paid(&mut self, record_id: &str, method: PaymentMethod) -> Result<PaymentStatus, RecordError> {
        let record = self.get_record_mut(record_id)?;
        if record.payment.status.is_settled() {
            return Err(RecordError::AlreadyPaid(record.id.clone()));
        }

        let balance = record.balance();
        if balance > Decimal::ZERO {
            return self.record_payment(record_id, balance, method);
        }

        // Nothing owed (weight-only or already covered): close it without collecting.
        let status = record.payment.settle(method);
        record.updated_at = Utc::now();
        tracing::info!(record_id, "record settled with nothing owed");
        Ok(status)
    }

    pub fn attach_receipt(&mut self, record_id: &str, receipt_url: String) -> Result<(), RecordError> {
        let record = self.get_record_mut(record_id)?;
        record.payment.receipt_url = Some(receipt_url);
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Flag unpaid records created before `cutoff` as overdue. Returns how many changed.
    pub fn flag_overdue(&mut self, cutoff: DateTime<Utc>) -> usize {
        let mut flagged = 0;
        for record in self.records.iter_mut() {
            let unpaid = matches!(
                record.payment.status,
                PaymentStatus::Pending | PaymentStatus::PartiallyPaid
            );
            if unpaid && record.created_at < cutoff {
                record.payment.status = PaymentStatus::Overdue;
                flagged += 1;
            }
        }
        if flagged > 0 {
            tracing::warn!(flagged, "records flagged overdue");
        }
        flagged
    }

    /// Records waiting to be sorted.
    pub fn pending(&self) -> Vec<&LaundryRecord> {
        self.with_status(|s| s == RecordStatus::Pending)
    }

    pub fn ongoing(&self) -> Vec<&LaundryRecord> {
        self.with_status(|s| s.is_ongoing())
    }

    pub fn ready_for_pickup(&self) -> Vec<&LaundryRecord> {
        self.with_status(|s| s == RecordStatus::ReadyForPickup)
    }

    pub fn history(&self) -> Vec<&LaundryRecord> {
        self.with_status(|s| s == RecordStatus::PickedUp)
    }

    pub fn pending_payments(&self) -> Vec<&LaundryRecord> {
        self.records
            .iter()
            .filter(|r| !r.payment.status.is_settled())
            .collect()
    }

    /// Money collected in the given calendar month, partial payments included.
    pub fn revenue_for_month(&self, year: i32, month: u32) -> Decimal {
        self.records
            .iter()
            .map(|r| r.payment.collected_in(year, month))
            .sum()
    }

    fn with_status(&self, predicate: impl Fn(RecordStatus) -> bool) -> Vec<&LaundryRecord> {
        self.records.iter().filter(|r| predicate(r.status())).collect()
    }

    fn get_record_mut(&mut self, record_id: &str) -> Result<&mut LaundryRecord, RecordError> {
        self.records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| RecordError::NotFound(record_id.to_string()))
    }
}

impl Default for RecordManager {
    fn default() -> Self {
        Self::new(PricingEngine::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: String,
        to: String,
    },

    #[error("Record modification failed: {0}")]
    ModificationFailed(String),

    #[error("Record {0} is already paid")]
    AlreadyPaid(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rust_decimal_macros::dec;
    use washwise_catalog::ItemType;

    fn draft(manager: &RecordManager, customer_id: &str) -> RecordDraft {
        RecordDraft {
            customer_id: customer_id.to_string(),
            customer_name: "Miguel Santos".to_string(),
            service: "Premium Hand Wash".to_string(),
            batch: "B".to_string(),
            items: manager
                .engine()
                .line_items_from_quantities(&[(ItemType::Shirts, 2), (ItemType::Towel, 3)])
                .unwrap(),
            weight_kg: Some(dec!(5)),
            washing: true,
        }
    }

    #[test]
    fn test_record_lifecycle() {
        let mut manager = RecordManager::default();
        let record_id = manager.create_record(draft(&manager, "C-0013")).unwrap().id.clone();

        // Pending → Sorting → Drying
        assert_eq!(manager.advance(&record_id).unwrap(), RecordStatus::Sorting);
        assert_eq!(manager.advance(&record_id).unwrap(), RecordStatus::Drying);
        assert_eq!(manager.ongoing().len(), 1);

        // Drying → ReadyForPickup → PickedUp
        manager.mark_ready_for_pickup(&record_id).unwrap();
        assert_eq!(manager.ready_for_pickup().len(), 1);
        manager.mark_picked_up(&record_id).unwrap();
        assert_eq!(manager.history().len(), 1);

        assert!(matches!(
            manager.advance(&record_id),
            Err(RecordError::InvalidTransition { .. })
        ));
        assert_eq!(manager.activity().len(), 5);
    }

    #[test]
    fn test_invalid_transition() {
        let mut manager = RecordManager::default();
        let record_id = manager.create_record(draft(&manager, "C-0013")).unwrap().id.clone();

        // Cannot skip from Pending to ReadyForPickup
        let result = manager.mark_ready_for_pickup(&record_id);
        assert_eq!(
            result.unwrap_err(),
            RecordError::InvalidTransition {
                from: "Pending".to_string(),
                to: "ReadyForPickup".to_string(),
            }
        );
    }

    #[test]
    fn test_create_requires_customer_and_contents() {
        let mut manager = RecordManager::default();

        let missing_customer = draft(&manager, "  ");
        assert!(manager.create_record(missing_customer).is_err());

        let mut empty = draft(&manager, "C-0001");
        empty.items.clear();
        empty.weight_kg = None;
        assert!(manager.create_record(empty).is_err());
        assert!(manager.records().is_empty());
    }

    #[test]
    fn test_items_locked_after_sorting() {
        let mut manager = RecordManager::default();
        let record_id = manager.create_record(draft(&manager, "C-0013")).unwrap().id.clone();

        let items = manager
            .engine()
            .line_items_from_quantities(&[(ItemType::Jeans, 2)])
            .unwrap();
        let updated = manager.update_items(&record_id, items.clone()).unwrap();
        assert_eq!(updated.total_amount(), dec!(50.00));
        assert_eq!(updated.item_count(), 2);

        manager.advance(&record_id).unwrap();
        assert!(matches!(
            manager.update_items(&record_id, items),
            Err(RecordError::ModificationFailed(_))
        ));
    }

    #[test]
    fn test_payments() {
        let mut manager = RecordManager::default();
        let record_id = manager.create_record(draft(&manager, "C-0015")).unwrap().id.clone();
        assert_eq!(manager.pending_payments().len(), 1);

        let status = manager.record_payment(&record_id, dec!(16), PaymentMethod::Cash).unwrap();
        assert_eq!(status, PaymentStatus::PartiallyPaid);
        assert_eq!(manager.get_record(&record_id).unwrap().balance(), dec!(50));

        assert!(manager.record_payment(&record_id, dec!(-5), PaymentMethod::Cash).is_err());

        let status = manager.mark_paid(&record_id, PaymentMethod::Gcash).unwrap();
        assert_eq!(status, PaymentStatus::Paid);
        assert!(manager.pending_payments().is_empty());
        assert!(matches!(
            manager.mark_paid(&record_id, PaymentMethod::Cash),
            Err(RecordError::AlreadyPaid(_))
        ));

        let now = Utc::now();
        assert_eq!(manager.revenue_for_month(now.year(), now.month()), dec!(66));
    }

    #[test]
    fn test_items_locked_once_paid() {
        let mut manager = RecordManager::default();
        let record_id = manager.create_record(draft(&manager, "C-0015")).unwrap().id.clone();
        manager.mark_paid(&record_id, PaymentMethod::Cash).unwrap();

        let items = manager
            .engine()
            .line_items_from_quantities(&[(ItemType::BedSheets, 5)])
            .unwrap();
        assert!(matches!(
            manager.update_items(&record_id, items),
            Err(RecordError::ModificationFailed(_))
        ));

        let record = manager.get_record(&record_id).unwrap();
        assert_eq!(record.total_amount(), dec!(66.00));
        assert_eq!(record.balance(), Decimal::ZERO);
    }

    #[test]
    fn test_mark_paid_settles_weight_only_record() {
        let mut manager = RecordManager::default();
        let mut weight_only = draft(&manager, "C-0021");
        weight_only.items.clear();
        let record_id = manager.create_record(weight_only).unwrap().id.clone();
        assert_eq!(manager.get_record(&record_id).unwrap().total_amount(), Decimal::ZERO);

        assert_eq!(manager.mark_paid(&record_id, PaymentMethod::Cash).unwrap(), PaymentStatus::Paid);
        assert!(manager.pending_payments().is_empty());
        assert!(matches!(
            manager.mark_paid(&record_id, PaymentMethod::Cash),
            Err(RecordError::AlreadyPaid(_))
        ));
    }

    #[test]
    fn test_overpayment_is_not_revenue() {
        let mut manager = RecordManager::default();
        let record_id = manager.create_record(draft(&manager, "C-0015")).unwrap().id.clone();

        let status = manager.record_payment(&record_id, dec!(100), PaymentMethod::Cash).unwrap();
        assert_eq!(status, PaymentStatus::Paid);
        assert_eq!(manager.get_record(&record_id).unwrap().payment.amount_paid, dec!(66));

        let now = Utc::now();
        assert_eq!(manager.revenue_for_month(now.year(), now.month()), dec!(66));
        assert!(matches!(
            manager.activity().last(),
            Some(ActivityEvent::PaymentRecorded { amount, .. }) if *amount == dec!(66)
        ));
    }

    #[test]
    fn test_flag_overdue_skips_paid_records() {
        let mut manager = RecordManager::default();
        let paid = manager.create_record(draft(&manager, "C-0001")).unwrap().id.clone();
        let unpaid = manager.create_record(draft(&manager, "C-0002")).unwrap().id.clone();
        manager.mark_paid(&paid, PaymentMethod::Cash).unwrap();

        let flagged = manager.flag_overdue(Utc::now() + chrono::Duration::days(1));
        assert_eq!(flagged, 1);
        assert_eq!(
            manager.get_record(&unpaid).unwrap().payment.status,
            PaymentStatus::Overdue
        );
    }

    #[test]
    fn test_discarded_record_frees_its_id() {
        let mut manager = RecordManager::default();
        let record_id = manager.create_record(draft(&manager, "C-0015")).unwrap().id.clone();

        let discarded = manager.discard_record(&record_id).unwrap();
        assert_eq!(discarded.customer_id, "C-0015");
        assert!(manager.records().is_empty());
        assert!(manager.activity().is_empty());
        assert!(manager.discard_record(&record_id).is_none());

        let again = manager.create_record(draft(&manager, "C-0015")).unwrap();
        assert_eq!(again.id, record_id);
    }

    #[test]
    fn test_imported_ids_are_not_reused() {
        let mut manager = RecordManager::default();
        let engine = manager.engine().clone();
        let mut seeded = draft(&manager, "C-0015");
        seeded.items = engine.line_items_from_quantities(&[(ItemType::Pants, 1)]).unwrap();

        let year = Utc::now().year().rem_euclid(100);
        let existing_id = format!("{:02}-0015", year);
        manager.import_record(LaundryRecord::new(existing_id, seeded, &engine));

        let created = manager.create_record(draft(&manager, "C-0016")).unwrap();
        assert_eq!(created.id, format!("{:02}-0016", year));
    }
}
