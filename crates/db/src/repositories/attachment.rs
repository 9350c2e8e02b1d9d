//! Invoice attachment repository.
//!
//! Visibility is enforced here, not in the presentation layer: locked
//! attachments are only returned when the invoice's effective status is
//! PAID.

use chrono::NaiveDate;
use faktura_core::invoice::effective_status;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{invoice_attachments, invoices, sea_orm_active_enums::AttachmentVisibility};

/// Attachment metadata repository.
#[derive(Debug, Clone)]
pub struct AttachmentRepository {
    db: DatabaseConnection,
}

impl AttachmentRepository {
    /// Creates a new attachment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attachments on an invoice that the caller may see today. Returns
    /// `None` when the invoice is not in scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_visible(
        &self,
        org_id: Uuid,
        invoice_id: Uuid,
        today: NaiveDate,
    ) -> Result<Option<Vec<invoice_attachments::Model>>, DbErr> {
        let Some(invoice) = invoices::Entity::find_by_id(invoice_id)
            .filter(invoices::Column::OrganizationId.eq(org_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let status = effective_status(invoice.status.into(), invoice.due_date, today);

        let attachments = invoice_attachments::Entity::find()
            .filter(invoice_attachments::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(invoice_attachments::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(Some(
            attachments
                .into_iter()
                .filter(|a| {
                    faktura_core::AttachmentVisibility::from(a.visibility.clone())
                        .is_visible(status)
                })
                .collect(),
        ))
    }

    /// Finds one attachment, applying the same visibility rule. Returns
    /// `None` when out of scope or not visible today.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_visible(
        &self,
        org_id: Uuid,
        attachment_id: Uuid,
        today: NaiveDate,
    ) -> Result<Option<invoice_attachments::Model>, DbErr> {
        let Some(attachment) = invoice_attachments::Entity::find_by_id(attachment_id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let Some(invoice) = invoices::Entity::find_by_id(attachment.invoice_id)
            .filter(invoices::Column::OrganizationId.eq(org_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let status = effective_status(invoice.status.into(), invoice.due_date, today);
        let visible = faktura_core::AttachmentVisibility::from(attachment.visibility.clone())
            .is_visible(status);

        Ok(visible.then_some(attachment))
    }

    /// Records attachment metadata for an invoice. Returns `None` when
    /// the invoice is not in scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(
        &self,
        org_id: Uuid,
        invoice_id: Uuid,
        file_name: String,
        file_path: String,
        file_size: i64,
        file_type: String,
        visibility: AttachmentVisibility,
    ) -> Result<Option<invoice_attachments::Model>, DbErr> {
        let in_scope = invoices::Entity::find_by_id(invoice_id)
            .filter(invoices::Column::OrganizationId.eq(org_id))
            .one(&self.db)
            .await?
            .is_some();
        if !in_scope {
            return Ok(None);
        }

        let model = invoice_attachments::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice_id),
            file_name: Set(file_name),
            file_path: Set(file_path),
            file_size: Set(file_size),
            file_type: Set(file_type),
            visibility: Set(visibility),
            created_at: Set(chrono::Utc::now().into()),
        };

        model.insert(&self.db).await.map(Some)
    }
}
