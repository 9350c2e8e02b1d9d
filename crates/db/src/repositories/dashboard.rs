//! Dashboard repository.
//!
//! Fetches the row slices the pure aggregation functions consume. All the
//! arithmetic lives in `faktura_core::aggregation`; this repository only
//! selects and maps rows.

use faktura_core::aggregation::{ExpenseFigures, InvoiceFigures};
use faktura_core::period::DateRange;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{expenses, invoices};

/// Read-only repository behind the dashboard and per-client summaries.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All invoice figures for an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn invoice_figures(&self, org_id: Uuid) -> Result<Vec<InvoiceFigures>, DbErr> {
        let rows = invoices::Entity::find()
            .filter(invoices::Column::OrganizationId.eq(org_id))
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(to_figures).collect())
    }

    /// Invoice figures for a single client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn invoice_figures_for_client(
        &self,
        org_id: Uuid,
        client_id: Uuid,
    ) -> Result<Vec<InvoiceFigures>, DbErr> {
        let rows = invoices::Entity::find()
            .filter(invoices::Column::OrganizationId.eq(org_id))
            .filter(invoices::Column::ClientId.eq(client_id))
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(to_figures).collect())
    }

    /// Expense figures inside a reporting window.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn expense_figures(
        &self,
        org_id: Uuid,
        window: DateRange,
    ) -> Result<Vec<ExpenseFigures>, DbErr> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::OrganizationId.eq(org_id))
            .filter(expenses::Column::ExpenseDate.gte(window.start))
            .filter(expenses::Column::ExpenseDate.lte(window.end))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|e| ExpenseFigures {
                amount: e.amount,
                expense_date: e.expense_date,
            })
            .collect())
    }
}

fn to_figures(invoice: invoices::Model) -> InvoiceFigures {
    InvoiceFigures {
        client_id: invoice.client_id,
        status: invoice.status.into(),
        total: invoice.total,
        amount_paid: invoice.amount_paid,
        due_date: invoice.due_date,
        paid_at: invoice.paid_at,
    }
}
