use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    PartiallyPaid,
    Paid,
    Overdue,
}

impl PaymentStatus {
    pub fn is_settled(&self) -> bool {
        *self == PaymentStatus::Paid
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::PartiallyPaid => "Partially Paid",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Overdue => "Overdue",
        }
    }
}

/// How the customer paid. Gcash payments are confirmed by staff from the uploaded receipt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Gcash,
}

/// Money actually collected at the counter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentEntry {
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub at: DateTime<Utc>,
}

/// Payment side of a laundry record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PaymentState {
    pub status: PaymentStatus,
    pub amount_paid: Decimal,
    pub method: Option<PaymentMethod>,
    pub receipt_url: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entries: Vec<PaymentEntry>,
}

impl PaymentState {
    pub fn balance(&self, amount_due: Decimal) -> Decimal {
        (amount_due - self.amount_paid).max(Decimal::ZERO)
    }

    /// Apply a payment of `amount` against `amount_due` and return the new status.
    ///
    /// Only the outstanding balance is collected; anything above it is change.
    /// Returns `None` when the amount is not positive; the state is left untouched.
    pub(crate) fn apply(&mut self, amount: Decimal, method: PaymentMethod, amount_due: Decimal) -> Option<PaymentStatus> {
        if amount <= Decimal::ZERO {
            return None;
        }

        let now = Utc::now();
        let collected = amount.min(self.balance(amount_due));
        if collected > Decimal::ZERO {
            self.amount_paid += collected;
            self.entries.push(PaymentEntry {
                amount: collected,
                method,
                at: now,
            });
        }

        self.method = Some(method);
        self.status = if self.amount_paid >= amount_due {
            self.paid_at = Some(now);
            PaymentStatus::Paid
        } else {
            PaymentStatus::PartiallyPaid
        };
        Some(self.status)
    }

    /// Close a record that has nothing left to pay.
    pub(crate) fn settle(&mut self, method: PaymentMethod) -> PaymentStatus {
        self.method = Some(method);
        self.status = PaymentStatus::Paid;
        self.paid_at = Some(Utc::now());
        self.status
    }

    /// Sum of the money collected in the given calendar month.
    pub fn collected_in(&self, year: i32, month: u32) -> Decimal {
        self.entries
            .iter()
            .filter(|entry| entry.at.year() == year && entry.at.month() == month)
            .map(|entry| entry.amount)
            .sum()
    }

    pub fn has_receipt(&self) -> bool {
        self.receipt_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_then_full_payment() {
        let mut payment = PaymentState::default();
        let due = dec!(450);

        assert_eq!(payment.apply(dec!(200), PaymentMethod::Cash, due), Some(PaymentStatus::PartiallyPaid));
        assert_eq!(payment.balance(due), dec!(250));
        assert!(payment.paid_at.is_none());

        assert_eq!(payment.apply(dec!(250), PaymentMethod::Gcash, due), Some(PaymentStatus::Paid));
        assert_eq!(payment.balance(due), Decimal::ZERO);
        assert_eq!(payment.method, Some(PaymentMethod::Gcash));
        assert!(payment.paid_at.is_some());
    }

    #[test]
    fn test_overpayment_collects_only_the_balance() {
        let mut payment = PaymentState::default();
        let due = dec!(66);

        assert_eq!(payment.apply(dec!(100), PaymentMethod::Cash, due), Some(PaymentStatus::Paid));
        assert_eq!(payment.amount_paid, dec!(66));
        assert_eq!(payment.entries.len(), 1);

        let now = Utc::now();
        assert_eq!(payment.collected_in(now.year(), now.month()), dec!(66));
    }

    #[test]
    fn test_non_positive_payment_is_ignored() {
        let mut payment = PaymentState::default();
        assert_eq!(payment.apply(Decimal::ZERO, PaymentMethod::Cash, dec!(100)), None);
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.amount_paid, Decimal::ZERO);
        assert!(payment.entries.is_empty());
    }
}
