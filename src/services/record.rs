//! Record service
//!
//! Adds and removes expenses, revenue, assets, loans, and their payments.
//! Every change is validated, saved, and written to the audit log.

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Asset, AssetPayment, Expense, Loan, LoanPayment, Revenue};
use crate::storage::{RecordRepository, Storage, StoredRecord};

use super::aggregator::DateWindow;

/// Service for record management
pub struct RecordService<'a> {
    storage: &'a Storage,
}

fn not_found<R: StoredRecord>(identifier: &str) -> TallyError {
    TallyError::NotFound {
        entity_type: R::ENTITY,
        identifier: identifier.to_string(),
    }
}

impl<'a> RecordService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn add<R: StoredRecord>(
        &self,
        repo: &RecordRepository<R>,
        entity_type: EntityType,
        record: R,
    ) -> TallyResult<R> {
        repo.upsert(record.clone())?;
        repo.save()?;
        self.storage.log_create(
            entity_type,
            record.id().to_string(),
            Some(record.name().to_string()),
            &record,
        )?;
        tracing::info!(entity = R::ENTITY, name = record.name(), "added record");
        Ok(record)
    }

    fn remove<R: StoredRecord>(
        &self,
        repo: &RecordRepository<R>,
        entity_type: EntityType,
        identifier: &str,
    ) -> TallyResult<R> {
        let record = repo.find(identifier)?.ok_or_else(|| not_found::<R>(identifier))?;
        repo.delete(record.id())?;
        repo.save()?;
        self.storage.log_delete(
            entity_type,
            record.id().to_string(),
            Some(record.name().to_string()),
            &record,
        )?;
        tracing::info!(entity = R::ENTITY, name = record.name(), "removed record");
        Ok(record)
    }

    /// Replace a record with an edited copy, auditing the change
    fn update<R: StoredRecord>(
        &self,
        repo: &RecordRepository<R>,
        entity_type: EntityType,
        before: &R,
        after: R,
    ) -> TallyResult<R> {
        repo.upsert(after.clone())?;
        repo.save()?;
        self.storage.log_update(
            entity_type,
            after.id().to_string(),
            Some(after.name().to_string()),
            before,
            &after,
        )?;
        Ok(after)
    }

    // === Expenses ===

    pub fn add_expense(&self, expense: Expense) -> TallyResult<Expense> {
        self.add(&self.storage.expenses, EntityType::Expense, expense)
    }

    /// Expenses in date order, optionally limited to a window and a label
    pub fn list_expenses(
        &self,
        window: Option<&DateWindow>,
        category: Option<&str>,
    ) -> TallyResult<Vec<Expense>> {
        Ok(self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .filter(|e| window.map_or(true, |w| w.contains(e.date)))
            .filter(|e| category.map_or(true, |c| e.category == c))
            .collect())
    }

    pub fn remove_expense(&self, identifier: &str) -> TallyResult<Expense> {
        self.remove(&self.storage.expenses, EntityType::Expense, identifier)
    }

    // === Revenue ===

    pub fn add_revenue(&self, revenue: Revenue) -> TallyResult<Revenue> {
        self.add(&self.storage.revenue, EntityType::Revenue, revenue)
    }

    pub fn list_revenue(&self, window: Option<&DateWindow>) -> TallyResult<Vec<Revenue>> {
        Ok(self
            .storage
            .revenue
            .get_all()?
            .into_iter()
            .filter(|r| window.map_or(true, |w| w.contains(r.date)))
            .collect())
    }

    pub fn remove_revenue(&self, identifier: &str) -> TallyResult<Revenue> {
        self.remove(&self.storage.revenue, EntityType::Revenue, identifier)
    }

    // === Assets ===

    pub fn add_asset(&self, asset: Asset) -> TallyResult<Asset> {
        self.add(&self.storage.assets, EntityType::Asset, asset)
    }

    pub fn get_asset(&self, identifier: &str) -> TallyResult<Asset> {
        self.storage
            .assets
            .find(identifier)?
            .ok_or_else(|| TallyError::asset_not_found(identifier))
    }

    pub fn list_assets(&self) -> TallyResult<Vec<Asset>> {
        self.storage.assets.get_all()
    }

    /// Record a payment toward an asset
    pub fn add_asset_payment(&self, identifier: &str, payment: AssetPayment) -> TallyResult<Asset> {
        let before = self.get_asset(identifier)?;
        let mut after = before.clone();
        after.add_payment(payment.clone());

        let asset = self.update(&self.storage.assets, EntityType::Asset, &before, after)?;
        self.storage.log_create(
            EntityType::AssetPayment,
            payment.id.to_string(),
            Some(asset.name.clone()),
            &payment,
        )?;
        Ok(asset)
    }

    pub fn remove_asset(&self, identifier: &str) -> TallyResult<Asset> {
        self.remove(&self.storage.assets, EntityType::Asset, identifier)
    }

    // === Loans ===

    pub fn add_loan(&self, loan: Loan) -> TallyResult<Loan> {
        self.add(&self.storage.loans, EntityType::Loan, loan)
    }

    pub fn get_loan(&self, identifier: &str) -> TallyResult<Loan> {
        self.storage
            .loans
            .find(identifier)?
            .ok_or_else(|| TallyError::loan_not_found(identifier))
    }

    pub fn list_loans(&self) -> TallyResult<Vec<Loan>> {
        self.storage.loans.get_all()
    }

    /// Record a loan payment; payments past the balance are accepted
    pub fn add_loan_payment(&self, identifier: &str, payment: LoanPayment) -> TallyResult<Loan> {
        payment.validate()?;
        let before = self.get_loan(identifier)?;
        let mut after = before.clone();
        after.add_payment(payment.clone());

        let loan = self.update(&self.storage.loans, EntityType::Loan, &before, after)?;
        self.storage.log_create(
            EntityType::LoanPayment,
            payment.id.to_string(),
            Some(loan.name.clone()),
            &payment,
        )?;
        Ok(loan)
    }

    /// Remove one payment from a loan by payment id
    pub fn remove_loan_payment(&self, identifier: &str, payment_id: &str) -> TallyResult<Loan> {
        let before = self.get_loan(identifier)?;
        let payment = before
            .payments
            .iter()
            .find(|p| p.id.matches(payment_id))
            .cloned()
            .ok_or_else(|| TallyError::NotFound {
                entity_type: "Loan payment",
                identifier: payment_id.to_string(),
            })?;

        let mut after = before.clone();
        after.remove_payment(payment.id);
        let loan = self.update(&self.storage.loans, EntityType::Loan, &before, after)?;
        self.storage.log_delete(
            EntityType::LoanPayment,
            payment.id.to_string(),
            Some(loan.name.clone()),
            &payment,
        )?;
        Ok(loan)
    }

    pub fn remove_loan(&self, identifier: &str) -> TallyResult<Loan> {
        self.remove(&self.storage.loans, EntityType::Loan, identifier)
    }
}
