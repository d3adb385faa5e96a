//! Installment scheduler
//!
//! Turns one purchase into the transactions that record it: a single
//! transaction, or for split credit card purchases a parent (installment 1)
//! plus one child per following month.

use chrono::NaiveDate;

use crate::error::{ParcelaError, ParcelaResult};
use crate::models::billing;
use crate::models::{
    CategoryId, Money, OwnerId, PaymentKind, PaymentTarget, Transaction, TransactionId,
};

/// What the caller wants to record
#[derive(Debug, Clone)]
pub struct PurchaseSpec {
    pub description: String,
    /// Total amount of the purchase
    pub amount: Money,
    /// Date of the purchase (and of installment 1)
    pub date: NaiveDate,
    pub category_id: CategoryId,
    pub payment_kind: PaymentKind,
    pub installments: u32,
    pub target: PaymentTarget,
}

/// One scheduled transaction together with its statement due date
#[derive(Debug, Clone)]
pub struct Installment {
    pub transaction: Transaction,
    /// Closing date of the card statement it is billed on (cards only)
    pub due_date: Option<NaiveDate>,
}

/// Everything a purchase expands into, ready to be persisted as one unit
#[derive(Debug, Clone)]
pub struct InstallmentPlan {
    pub parent: Installment,
    /// Installments 2..N, in order; empty for single transactions
    pub children: Vec<Installment>,
}

impl InstallmentPlan {
    /// Parent first, then children in installment order
    pub fn installments(&self) -> impl Iterator<Item = &Installment> {
        std::iter::once(&self.parent).chain(self.children.iter())
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.installments().map(|i| &i.transaction)
    }

    pub fn parent_id(&self) -> TransactionId {
        self.parent.transaction.id
    }

    /// Amount the ledger moves for this purchase
    pub fn purchase_total(&self) -> Money {
        self.parent.transaction.purchase_total
    }

    pub fn installment_count(&self) -> usize {
        1 + self.children.len()
    }
}

/// Expand a purchase into its installments
///
/// `closing_day` is the closing day of the target card, used for due dates;
/// pass `None` for account targets.
pub fn schedule(
    owner: OwnerId,
    spec: &PurchaseSpec,
    closing_day: Option<u8>,
) -> ParcelaResult<InstallmentPlan> {
    let mut parent = Transaction::new(
        owner,
        spec.category_id,
        spec.target,
        spec.payment_kind,
        spec.description.trim(),
        spec.amount,
        spec.date,
    );
    parent.installments = spec.installments;
    parent
        .validate()
        .map_err(|e| ParcelaError::validation(e.field(), e.to_string()))?;

    let share = spec.amount.split(spec.installments);
    if !share.is_positive() {
        return Err(ParcelaError::validation(
            "amount",
            format!(
                "Amount {} is too small to split into {} installments",
                spec.amount, spec.installments
            ),
        ));
    }
    parent.amount = share;

    let due = |txn: &Transaction| closing_day.and_then(|day| txn.due_date(day));

    let children = (2..=spec.installments)
        .map(|number| {
            let mut child = parent.clone();
            child.id = TransactionId::new();
            child.installment_number = number;
            child.parent_id = Some(parent.id);
            child.date = billing::add_months(spec.date, number - 1);
            child.description = format!("{} - {}/{}", parent.description, number, spec.installments);
            Installment {
                due_date: due(&child),
                transaction: child,
            }
        })
        .collect();

    Ok(InstallmentPlan {
        parent: Installment {
            due_date: due(&parent),
            transaction: parent,
        },
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, CreditCardId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn card_spec(amount: i64, installments: u32, on: NaiveDate) -> PurchaseSpec {
        PurchaseSpec {
            description: "Notebook".into(),
            amount: Money::from_cents(amount),
            date: on,
            category_id: CategoryId::new(),
            payment_kind: PaymentKind::CreditCard,
            installments,
            target: PaymentTarget::CreditCard(CreditCardId::new()),
        }
    }

    #[test]
    fn test_three_installments_on_closing_day_15() {
        let plan = schedule(OwnerId::new(), &card_spec(30000, 3, date(2024, 1, 20)), Some(15)).unwrap();

        assert_eq!(plan.installment_count(), 3);
        let dates: Vec<_> = plan.transactions().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 20), date(2024, 2, 20), date(2024, 3, 20)]);

        let due: Vec<_> = plan.installments().map(|i| i.due_date.unwrap()).collect();
        assert_eq!(due, vec![date(2024, 2, 15), date(2024, 3, 15), date(2024, 4, 15)]);

        assert!(plan.transactions().all(|t| t.amount.cents() == 10000));
        assert_eq!(plan.purchase_total().cents(), 30000);
    }

    #[test]
    fn test_parent_and_children_linkage() {
        let plan = schedule(OwnerId::new(), &card_spec(30000, 3, date(2024, 1, 20)), Some(15)).unwrap();

        let parent = &plan.parent.transaction;
        assert!(parent.is_parent());
        assert_eq!(parent.description, "Notebook");
        assert!(parent.parent_id.is_none());

        for (i, child) in plan.children.iter().enumerate() {
            let txn = &child.transaction;
            assert_eq!(txn.parent_id, Some(parent.id));
            assert_eq!(txn.installment_number, i as u32 + 2);
            assert_eq!(txn.description, format!("Notebook - {}/3", i + 2));
            assert!(txn.validate().is_ok());
        }
    }

    #[test]
    fn test_uneven_split_truncates() {
        let plan = schedule(OwnerId::new(), &card_spec(10000, 3, date(2024, 1, 5)), Some(10)).unwrap();

        let shares: Vec<_> = plan.transactions().map(|t| t.amount.cents()).collect();
        assert_eq!(shares, vec![3333, 3333, 3333]);

        let sum: Money = plan.transactions().map(|t| t.amount).sum();
        let remainder = plan.purchase_total() - sum;
        assert!(remainder.cents() >= 0 && remainder.cents() < 3);
    }

    #[test]
    fn test_due_dates_never_decrease() {
        for closing_day in [1, 15, 28, 29, 30, 31] {
            let plan = schedule(
                OwnerId::new(),
                &card_spec(120000, 24, date(2023, 12, 31)),
                Some(closing_day),
            )
            .unwrap();

            let due: Vec<_> = plan.installments().map(|i| i.due_date.unwrap()).collect();
            assert!(due.windows(2).all(|w| w[0] <= w[1]), "closing day {}", closing_day);
        }
    }

    #[test]
    fn test_month_end_purchase_clamps() {
        let plan = schedule(OwnerId::new(), &card_spec(40000, 4, date(2024, 1, 31)), Some(31)).unwrap();
        let dates: Vec<_> = plan.transactions().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );
    }

    #[test]
    fn test_single_debit() {
        let spec = PurchaseSpec {
            description: "Padaria".into(),
            amount: Money::from_cents(3000),
            date: date(2024, 5, 2),
            category_id: CategoryId::new(),
            payment_kind: PaymentKind::Debit,
            installments: 1,
            target: PaymentTarget::Account(AccountId::new()),
        };

        let plan = schedule(OwnerId::new(), &spec, None).unwrap();
        assert!(plan.children.is_empty());
        assert!(plan.parent.due_date.is_none());
        assert!(!plan.parent.transaction.is_parent());
    }

    #[test]
    fn test_rejections() {
        let owner = OwnerId::new();

        let mut pix = card_spec(1000, 2, date(2024, 1, 1));
        pix.payment_kind = PaymentKind::Pix;
        pix.target = PaymentTarget::Account(AccountId::new());
        let err = schedule(owner, &pix, None).unwrap_err();
        assert!(matches!(err, ParcelaError::Validation { ref field, .. } if field == "installments"));

        let err = schedule(owner, &card_spec(1000, 25, date(2024, 1, 1)), Some(5)).unwrap_err();
        assert!(err.is_validation());

        let err = schedule(owner, &card_spec(0, 1, date(2024, 1, 1)), Some(5)).unwrap_err();
        assert!(matches!(err, ParcelaError::Validation { ref field, .. } if field == "amount"));

        let err = schedule(owner, &card_spec(2, 3, date(2024, 1, 1)), Some(5)).unwrap_err();
        assert!(matches!(err, ParcelaError::Validation { ref field, .. } if field == "amount"));

        let mut mismatched = card_spec(1000, 1, date(2024, 1, 1));
        mismatched.target = PaymentTarget::Account(AccountId::new());
        let err = schedule(owner, &mismatched, None).unwrap_err();
        assert!(matches!(err, ParcelaError::Validation { ref field, .. } if field == "credit_card_id"));
    }
}
