//! Invoice repository for database operations.

use faktura_shared::types::PageRequest;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Condition, Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    clients, invoice_line_items, invoices, sea_orm_active_enums::InvoiceStatus,
};

/// A line item to attach to an invoice.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    /// Item description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Line total as submitted.
    pub line_total: Decimal,
}

/// Invoice repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Paginated invoice list with client rows, newest first.
    ///
    /// `query` searches invoice number, client display name, and company,
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        org_id: Uuid,
        query: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<(invoices::Model, Option<clients::Model>)>, u64), DbErr> {
        let mut select = invoices::Entity::find()
            .find_also_related(clients::Entity)
            .filter(invoices::Column::OrganizationId.eq(org_id))
            .order_by_desc(invoices::Column::CreatedAt);

        if let Some(q) = query.filter(|q| !q.trim().is_empty()) {
            let pattern = format!("%{}%", q.trim());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::col((invoices::Entity, invoices::Column::Number))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((clients::Entity, clients::Column::DisplayName))
                            .ilike(pattern.clone()),
                    )
                    .add(Expr::col((clients::Entity, clients::Column::Company)).ilike(pattern)),
            );
        }

        let paginator = select.paginate(&self.db, page.page_size());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.page() - 1).await?;

        Ok((items, total))
    }

    /// Finds an invoice by id within the organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, org_id: Uuid, id: Uuid) -> Result<Option<invoices::Model>, DbErr> {
        invoices::Entity::find_by_id(id)
            .filter(invoices::Column::OrganizationId.eq(org_id))
            .one(&self.db)
            .await
    }

    /// Finds an invoice with its client and line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_details(
        &self,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<
        Option<(
            invoices::Model,
            Option<clients::Model>,
            Vec<invoice_line_items::Model>,
        )>,
        DbErr,
    > {
        let Some((invoice, client)) = invoices::Entity::find_by_id(id)
            .find_also_related(clients::Entity)
            .filter(invoices::Column::OrganizationId.eq(org_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let items = invoice_line_items::Entity::find()
            .filter(invoice_line_items::Column::InvoiceId.eq(id))
            .order_by_asc(invoice_line_items::Column::SortOrder)
            .all(&self.db)
            .await?;

        Ok(Some((invoice, client, items)))
    }

    /// Inserts an invoice with its line items in one transaction. The
    /// active model must carry the submitted fields; id, organization, and
    /// timestamps are set here.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is committed then.
    pub async fn create_with_items(
        &self,
        org_id: Uuid,
        mut model: invoices::ActiveModel,
        items: Vec<NewLineItem>,
    ) -> Result<invoices::Model, DbErr> {
        let txn = self.db.begin().await?;

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let invoice_id = Uuid::new_v4();
        model.id = Set(invoice_id);
        model.organization_id = Set(org_id);
        model.created_at = Set(now);
        model.updated_at = Set(now);

        let invoice = model.insert(&txn).await?;
        insert_items(&txn, invoice_id, items, now).await?;

        txn.commit().await?;
        Ok(invoice)
    }

    /// Updates an invoice, replacing all line items when a new set is
    /// given (delete-then-recreate), in one transaction. Returns `None`
    /// when the invoice is not in scope.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is committed then.
    pub async fn update_with_items(
        &self,
        org_id: Uuid,
        id: Uuid,
        mut model: invoices::ActiveModel,
        items: Option<Vec<NewLineItem>>,
    ) -> Result<Option<invoices::Model>, DbErr> {
        if self.find(org_id, id).await?.is_none() {
            return Ok(None);
        }

        let txn = self.db.begin().await?;

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        model.id = Set(id);
        model.organization_id = Set(org_id);
        model.updated_at = Set(now);
        let invoice = model.update(&txn).await?;

        if let Some(items) = items {
            invoice_line_items::Entity::delete_many()
                .filter(invoice_line_items::Column::InvoiceId.eq(id))
                .exec(&txn)
                .await?;
            insert_items(&txn, id, items, now).await?;
        }

        txn.commit().await?;
        Ok(Some(invoice))
    }

    /// Deletes an invoice and its line items together. Payments already
    /// recorded against it are left in place. Returns false when the
    /// invoice is not in scope.
    ///
    /// # Errors
    ///
    /// Returns an error if any delete fails; nothing is committed then.
    pub async fn delete(&self, org_id: Uuid, id: Uuid) -> Result<bool, DbErr> {
        if self.find(org_id, id).await?.is_none() {
            return Ok(false);
        }

        let txn = self.db.begin().await?;

        invoice_line_items::Entity::delete_many()
            .filter(invoice_line_items::Column::InvoiceId.eq(id))
            .exec(&txn)
            .await?;
        invoices::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(true)
    }

    /// Flips a DRAFT invoice to SENT; any other status is a no-op.
    /// Returns the invoice as stored afterwards, or `None` when not in
    /// scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn mark_sent(&self, org_id: Uuid, id: Uuid) -> Result<Option<invoices::Model>, DbErr> {
        let Some(invoice) = self.find(org_id, id).await? else {
            return Ok(None);
        };

        let transition =
            faktura_core::invoice::send_transition(invoice.status.clone().into());
        let Some(next) = transition else {
            return Ok(Some(invoice));
        };

        let updated = invoices::ActiveModel {
            id: Set(id),
            status: Set(InvoiceStatus::from(next)),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        Ok(Some(updated))
    }
}

async fn insert_items(
    txn: &sea_orm::DatabaseTransaction,
    invoice_id: Uuid,
    items: Vec<NewLineItem>,
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Result<(), DbErr> {
    if items.is_empty() {
        return Ok(());
    }

    let models = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| invoice_line_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice_id),
            description: Set(item.description),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            line_total: Set(item.line_total),
            sort_order: Set(i32::try_from(idx).unwrap_or(i32::MAX)),
            created_at: Set(now),
        });

    invoice_line_items::Entity::insert_many(models).exec(txn).await?;
    Ok(())
}
