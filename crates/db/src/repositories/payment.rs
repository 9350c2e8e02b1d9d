//! Payment repository.
//!
//! Recording a payment is the only write path that touches
//! `invoices.amount_paid`. The increment happens in SQL, not
//! read-modify-write, so concurrent payments never lose updates.

use chrono::NaiveDate;
use faktura_shared::types::PageRequest;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Condition, Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{clients, invoices, payments, sea_orm_active_enums::InvoiceStatus};

/// Data for a new payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Invoice the payment applies to.
    pub invoice_id: Uuid,
    /// Payment amount.
    pub amount: Decimal,
    /// Payment date.
    pub payment_date: NaiveDate,
    /// Payment method, free-form.
    pub method: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Paginated payment list with invoice rows, newest first.
    ///
    /// `query` searches notes, method, invoice number, and client name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        org_id: Uuid,
        query: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<(payments::Model, Option<invoices::Model>)>, u64), DbErr> {
        let mut select = payments::Entity::find()
            .find_also_related(invoices::Entity)
            .filter(payments::Column::OrganizationId.eq(org_id))
            .order_by_desc(payments::Column::PaymentDate);

        if let Some(q) = query.filter(|q| !q.trim().is_empty()) {
            let pattern = format!("%{}%", q.trim());
            select = select
                .join(JoinType::LeftJoin, invoices::Relation::Clients.def())
                .filter(
                    Condition::any()
                        .add(
                            Expr::col((payments::Entity, payments::Column::Notes))
                                .ilike(pattern.clone()),
                        )
                        .add(
                            Expr::col((payments::Entity, payments::Column::Method))
                                .ilike(pattern.clone()),
                        )
                        .add(
                            Expr::col((invoices::Entity, invoices::Column::Number))
                                .ilike(pattern.clone()),
                        )
                        .add(
                            Expr::col((clients::Entity, clients::Column::DisplayName))
                                .ilike(pattern),
                        ),
                );
        }

        let paginator = select.paginate(&self.db, page.page_size());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.page() - 1).await?;

        Ok((items, total))
    }

    /// Records a payment atomically.
    ///
    /// One transaction: insert the payment row, increment the invoice's
    /// `amount_paid` with a column expression, and flip the invoice to
    /// PAID (stamping `paid_at`) when the post-increment amount reaches
    /// the total. Returns `None` when the invoice is not in scope.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; nothing is committed then.
    pub async fn record_payment(
        &self,
        org_id: Uuid,
        payment: NewPayment,
    ) -> Result<Option<(payments::Model, invoices::Model)>, DbErr> {
        let txn = self.db.begin().await?;

        let Some(invoice) = invoices::Entity::find_by_id(payment.invoice_id)
            .filter(invoices::Column::OrganizationId.eq(org_id))
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let payment_row = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(org_id),
            invoice_id: Set(invoice.id),
            amount: Set(payment.amount),
            currency: Set(invoice.currency.clone()),
            payment_date: Set(payment.payment_date),
            method: Set(payment.method),
            notes: Set(payment.notes),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        invoices::Entity::update_many()
            .col_expr(
                invoices::Column::AmountPaid,
                Expr::col(invoices::Column::AmountPaid).add(payment.amount),
            )
            .col_expr(invoices::Column::UpdatedAt, Expr::value(now))
            .filter(invoices::Column::Id.eq(invoice.id))
            .exec(&txn)
            .await?;

        let updated = invoices::Entity::find_by_id(invoice.id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("invoice vanished mid-transaction".to_string()))?;

        let final_invoice = if updated.amount_paid >= updated.total
            && updated.status != InvoiceStatus::Paid
        {
            mark_paid(&txn, updated.id, payment.payment_date).await?
        } else {
            updated
        };

        txn.commit().await?;

        tracing::info!(
            invoice_id = %final_invoice.id,
            amount = %payment_row.amount,
            status = ?final_invoice.status,
            "payment recorded"
        );

        Ok(Some((payment_row, final_invoice)))
    }
}

async fn mark_paid<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
    paid_at: NaiveDate,
) -> Result<invoices::Model, DbErr> {
    invoices::ActiveModel {
        id: Set(invoice_id),
        status: Set(InvoiceStatus::Paid),
        paid_at: Set(Some(paid_at)),
        updated_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    }
    .update(conn)
    .await
}
