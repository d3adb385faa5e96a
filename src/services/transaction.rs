//! Transaction service
//!
//! Records purchases and income as atomic units: the installment group, the
//! balance ledger update and the audit trail are committed together or not
//! at all. Deleting a split purchase goes through its parent and takes the
//! whole group with it.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{
    Category, CategoryKind, Money, OwnerId, PaymentTarget, Transaction, TransactionId,
};
use crate::storage::Storage;

use super::installment::{self, InstallmentPlan, PurchaseSpec};
use super::ledger::BalanceEffect;

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transaction listings
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Earliest date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end_date: Option<NaiveDate>,
    /// Only transactions filed under categories of this kind
    pub kind: Option<CategoryKind>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn kind(mut self, kind: CategoryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }
}

/// One page of a listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    pub limit: usize,
    /// Matches across all pages
    pub total: usize,
    pub pages: usize,
}

/// What a delete removed
#[derive(Debug, Clone)]
pub struct DeletedTransaction {
    pub transaction: Transaction,
    pub children_removed: usize,
    /// Balance change undone on the account or card
    pub reversed: Money,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a purchase or income, splitting it into installments if asked
    pub fn create(&self, owner: OwnerId, spec: PurchaseSpec) -> ParcelaResult<InstallmentPlan> {
        let category = self.category(owner, &spec)?;

        let closing_day = match spec.target {
            PaymentTarget::Account(id) => {
                self.storage
                    .accounts
                    .get(owner, id)?
                    .ok_or_else(|| ParcelaError::account_not_found(id.to_string()))?;
                None
            }
            PaymentTarget::CreditCard(id) => {
                let card = self
                    .storage
                    .credit_cards
                    .get(owner, id)?
                    .ok_or_else(|| ParcelaError::credit_card_not_found(id.to_string()))?;
                Some(card.closing_day)
            }
        };

        let plan = installment::schedule(owner, &spec, closing_day)?;

        self.storage.atomically(|storage| {
            for txn in plan.transactions() {
                storage.transactions.upsert(txn.clone())?;
                storage.log_create(
                    EntityType::Transaction,
                    txn.id.full(),
                    owner,
                    Some(txn.description.clone()),
                    txn,
                )?;
            }

            BalanceEffect::for_transaction(category.kind, spec.target, plan.purchase_total())
                .apply(storage, owner)
        })?;

        Ok(plan)
    }

    /// Delete a transaction, or a whole split purchase through its parent
    ///
    /// Children cannot be deleted on their own.
    pub fn delete(&self, owner: OwnerId, id: TransactionId) -> ParcelaResult<DeletedTransaction> {
        let txn = self.get(owner, id)?;

        if let Some(parent_id) = txn.parent_id {
            return Err(ParcelaError::Conflict(format!(
                "{} is installment {} of a split purchase; delete the parent {} instead",
                txn.id,
                txn.installment_label().unwrap_or_default(),
                parent_id
            )));
        }

        let kind = self
            .storage
            .categories
            .get(owner, txn.category_id)?
            .map(|c| c.kind)
            .ok_or_else(|| ParcelaError::category_not_found(txn.category_id.to_string()))?;

        let effect = BalanceEffect::for_transaction(kind, txn.target, txn.purchase_total);

        let children_removed = self.storage.atomically(|storage| {
            let children = storage.transactions.children_of(txn.id)?;
            for child in &children {
                storage.transactions.delete(child.id)?;
                storage.log_delete(
                    EntityType::Transaction,
                    child.id.full(),
                    owner,
                    Some(child.description.clone()),
                    child,
                )?;
            }

            storage.transactions.delete(txn.id)?;
            storage.log_delete(
                EntityType::Transaction,
                txn.id.full(),
                owner,
                Some(txn.description.clone()),
                &txn,
            )?;

            effect.reverse(storage, owner)?;
            Ok(children.len())
        })?;

        Ok(DeletedTransaction {
            transaction: txn,
            children_removed,
            reversed: effect.delta(),
        })
    }

    /// Get one of the owner's transactions
    pub fn get(&self, owner: OwnerId, id: TransactionId) -> ParcelaResult<Transaction> {
        self.storage
            .transactions
            .get(owner, id)?
            .ok_or_else(|| ParcelaError::transaction_not_found(id.to_string()))
    }

    /// Every installment of the purchase `id` belongs to, in order
    pub fn installment_group(&self, owner: OwnerId, id: TransactionId) -> ParcelaResult<Vec<Transaction>> {
        let txn = self.get(owner, id)?;
        let parent = match txn.parent_id {
            Some(parent_id) => self.get(owner, parent_id)?,
            None => txn,
        };

        let mut group = self.storage.transactions.children_of(parent.id)?;
        group.insert(0, parent);
        Ok(group)
    }

    /// Filtered listing, newest first, one page at a time
    pub fn list(
        &self,
        owner: OwnerId,
        filter: &TransactionFilter,
        page: usize,
        limit: usize,
    ) -> ParcelaResult<Page<Transaction>> {
        if page == 0 {
            return Err(ParcelaError::validation("page", "Page numbers start at 1"));
        }
        if limit == 0 {
            return Err(ParcelaError::validation("limit", "Limit must be at least 1"));
        }

        let categories = self.storage.categories.list(owner, filter.kind)?;

        let matching: Vec<_> = self
            .storage
            .transactions
            .list(owner)?
            .into_iter()
            .filter(|t| filter.matches_date(t.date))
            .filter(|t| filter.kind.is_none() || categories.iter().any(|c| c.id == t.category_id))
            .collect();

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Ok(Page {
            items,
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
        })
    }

    fn category(&self, owner: OwnerId, spec: &PurchaseSpec) -> ParcelaResult<Category> {
        self.storage
            .categories
            .get(owner, spec.category_id)?
            .ok_or_else(|| ParcelaError::category_not_found(spec.category_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ParcelaPaths;
    use crate::models::{Account, AccountId, CategoryId, CreditCard, CreditCardId, PaymentKind};
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        storage: Storage,
        owner: OwnerId,
        account: AccountId,
        card: CreditCardId,
        groceries: CategoryId,
        salary: CategoryId,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let storage =
            Storage::new(ParcelaPaths::with_base_dir(temp.path().to_path_buf())).unwrap();
        let owner = OwnerId::new();

        let account = Account::with_balance(owner, "Conta Corrente", Money::from_cents(10000));
        let card = CreditCard::new(owner, "Nubank", 15);
        let groceries = Category::new(owner, "Mercado", CategoryKind::Expense);
        let salary = Category::new(owner, "Salário", CategoryKind::Income);

        let fixture = Fixture {
            owner,
            account: account.id,
            card: card.id,
            groceries: groceries.id,
            salary: salary.id,
            storage,
            _temp: temp,
        };

        fixture.storage.accounts.upsert(account).unwrap();
        fixture.storage.credit_cards.upsert(card).unwrap();
        fixture.storage.categories.upsert(groceries).unwrap();
        fixture.storage.categories.upsert(salary).unwrap();
        fixture
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    impl Fixture {
        fn service(&self) -> TransactionService<'_> {
            TransactionService::new(&self.storage)
        }

        fn debit(&self, cents: i64, on: NaiveDate) -> PurchaseSpec {
            PurchaseSpec {
                description: "Mercado".into(),
                amount: Money::from_cents(cents),
                date: on,
                category_id: self.groceries,
                payment_kind: PaymentKind::Debit,
                installments: 1,
                target: PaymentTarget::Account(self.account),
            }
        }

        fn card_purchase(&self, cents: i64, installments: u32, on: NaiveDate) -> PurchaseSpec {
            PurchaseSpec {
                description: "Geladeira".into(),
                amount: Money::from_cents(cents),
                date: on,
                category_id: self.groceries,
                payment_kind: PaymentKind::CreditCard,
                installments,
                target: PaymentTarget::CreditCard(self.card),
            }
        }

        fn account_balance(&self) -> i64 {
            self.storage
                .accounts
                .get(self.owner, self.account)
                .unwrap()
                .unwrap()
                .balance
                .cents()
        }

        fn card_balance(&self) -> i64 {
            self.storage
                .credit_cards
                .get(self.owner, self.card)
                .unwrap()
                .unwrap()
                .balance
                .cents()
        }
    }

    #[test]
    fn test_debit_expense_then_delete_restores_balance() {
        let f = fixture();
        let plan = f.service().create(f.owner, f.debit(3000, date(2024, 3, 1))).unwrap();
        assert_eq!(f.account_balance(), 7000);

        let deleted = f.service().delete(f.owner, plan.parent_id()).unwrap();
        assert_eq!(f.account_balance(), 10000);
        assert_eq!(deleted.children_removed, 0);
        assert_eq!(deleted.reversed.cents(), -3000);
    }

    #[test]
    fn test_income_raises_account_balance() {
        let f = fixture();
        let mut spec = f.debit(500000, date(2024, 3, 5));
        spec.category_id = f.salary;
        spec.payment_kind = PaymentKind::Pix;

        f.service().create(f.owner, spec).unwrap();
        assert_eq!(f.account_balance(), 510000);
    }

    #[test]
    fn test_split_purchase_charges_full_amount_once() {
        let f = fixture();
        let plan = f
            .service()
            .create(f.owner, f.card_purchase(30000, 3, date(2024, 1, 20)))
            .unwrap();

        assert_eq!(plan.installment_count(), 3);
        assert_eq!(f.card_balance(), 30000);
        assert_eq!(f.storage.transactions.count().unwrap(), 3);

        let group = f.service().installment_group(f.owner, plan.children[1].transaction.id).unwrap();
        let labels: Vec<_> = group.iter().filter_map(|t| t.installment_label()).collect();
        assert_eq!(labels, vec!["1/3", "2/3", "3/3"]);
    }

    #[test]
    fn test_delete_parent_cascades_and_round_trips() {
        let f = fixture();
        let plan = f
            .service()
            .create(f.owner, f.card_purchase(10000, 3, date(2024, 1, 20)))
            .unwrap();
        assert_eq!(f.card_balance(), 10000);

        let deleted = f.service().delete(f.owner, plan.parent_id()).unwrap();
        assert_eq!(deleted.children_removed, 2);
        assert_eq!(f.card_balance(), 0);
        assert_eq!(f.storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_deleting_child_is_conflict() {
        let f = fixture();
        let plan = f
            .service()
            .create(f.owner, f.card_purchase(30000, 3, date(2024, 1, 20)))
            .unwrap();

        let child = plan.children[0].transaction.id;
        let err = f.service().delete(f.owner, child).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(err.status_code(), 400);
        assert_eq!(f.storage.transactions.count().unwrap(), 3);
        assert_eq!(f.card_balance(), 30000);
    }

    #[test]
    fn test_unknown_or_foreign_references() {
        let f = fixture();

        let mut spec = f.debit(100, date(2024, 1, 1));
        spec.category_id = CategoryId::new();
        assert!(f.service().create(f.owner, spec).unwrap_err().is_not_found());

        let err = f
            .service()
            .create(OwnerId::new(), f.debit(100, date(2024, 1, 1)))
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let plan = f.service().create(f.owner, f.debit(100, date(2024, 1, 1))).unwrap();
        assert!(f
            .service()
            .delete(OwnerId::new(), plan.parent_id())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_invalid_purchase_writes_nothing() {
        let f = fixture();
        let mut spec = f.debit(100, date(2024, 1, 1));
        spec.installments = 3;

        assert!(f.service().create(f.owner, spec).unwrap_err().is_validation());
        assert_eq!(f.storage.transactions.count().unwrap(), 0);
        assert_eq!(f.account_balance(), 10000);
    }

    #[test]
    fn test_failed_commit_leaves_no_partial_group() {
        let f = fixture();
        std::fs::create_dir(f.storage.paths().data_dir().join("accounts.json.tmp")).unwrap();

        let err = f
            .service()
            .create(f.owner, f.card_purchase(30000, 3, date(2024, 1, 20)))
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(f.storage.transactions.count().unwrap(), 0);
        assert_eq!(f.card_balance(), 0);
        assert!(!f.storage.paths().transactions_file().exists());
    }

    #[test]
    fn test_failed_last_rename_keeps_disk_consistent() {
        let f = fixture();
        f.storage.save_all().unwrap();
        let paths = f.storage.paths().clone();

        // transactions.json is renamed last; a non-empty directory blocks it
        let transactions_file = paths.transactions_file();
        std::fs::remove_file(&transactions_file).unwrap();
        std::fs::create_dir(&transactions_file).unwrap();
        std::fs::write(transactions_file.join("keep"), "x").unwrap();

        let err = f
            .service()
            .create(f.owner, f.card_purchase(30000, 3, date(2024, 1, 20)))
            .unwrap_err();
        assert!(matches!(err, ParcelaError::Storage(_)));
        assert_eq!(f.card_balance(), 0);

        std::fs::remove_dir_all(&transactions_file).unwrap();
        let reloaded = Storage::open(paths.clone()).unwrap();
        let card = reloaded.credit_cards.get(f.owner, f.card).unwrap().unwrap();
        assert!(card.balance.is_zero());
        assert_eq!(reloaded.transactions.count().unwrap(), 0);
        assert!(!paths.credit_cards_file().with_extension("json.bak").exists());
    }

    #[test]
    fn test_income_on_card_leaves_balance_alone() {
        let f = fixture();
        let mut spec = f.card_purchase(15000, 1, date(2024, 2, 10));
        spec.description = "Estorno".into();
        spec.category_id = f.salary;

        let plan = f.service().create(f.owner, spec).unwrap();
        assert_eq!(f.card_balance(), 0);
        assert_eq!(f.storage.transactions.count().unwrap(), 1);

        let deleted = f.service().delete(f.owner, plan.parent_id()).unwrap();
        assert!(deleted.reversed.is_zero());
        assert_eq!(f.card_balance(), 0);
        assert_eq!(f.storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_list_filters_and_paginates() {
        let f = fixture();
        for day in 1..=5 {
            f.service().create(f.owner, f.debit(100, date(2024, 3, day))).unwrap();
        }
        let mut income = f.debit(1000, date(2024, 3, 10));
        income.category_id = f.salary;
        f.service().create(f.owner, income).unwrap();

        let page = f
            .service()
            .list(f.owner, &TransactionFilter::new().kind(CategoryKind::Expense), 1, 2)
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
        assert_eq!(page.items[0].date, date(2024, 3, 5));

        let last = f
            .service()
            .list(f.owner, &TransactionFilter::new().kind(CategoryKind::Expense), 3, 2)
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].date, date(2024, 3, 1));

        let ranged = f
            .service()
            .list(
                f.owner,
                &TransactionFilter::new().from(date(2024, 3, 4)).until(date(2024, 3, 10)),
                1,
                DEFAULT_PAGE_SIZE,
            )
            .unwrap();
        assert_eq!(ranged.total, 3);

        assert!(f
            .service()
            .list(f.owner, &TransactionFilter::new(), 0, 10)
            .unwrap_err()
            .is_validation());
    }
}
