//! Expense repository for database operations.

use faktura_shared::types::PageRequest;
use sea_orm::sea_query::{Condition, Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{clients, expenses};

/// Expense repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Paginated expense list, newest first.
    ///
    /// `query` searches merchant, category, description, and the linked
    /// client's name/company; `recurring` filters on the recurring flag
    /// when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        org_id: Uuid,
        query: Option<&str>,
        recurring: Option<bool>,
        page: &PageRequest,
    ) -> Result<(Vec<expenses::Model>, u64), DbErr> {
        let mut select = expenses::Entity::find()
            .left_join(clients::Entity)
            .filter(expenses::Column::OrganizationId.eq(org_id))
            .order_by_desc(expenses::Column::ExpenseDate);

        if let Some(recurring) = recurring {
            select = select.filter(expenses::Column::IsRecurring.eq(recurring));
        }

        if let Some(q) = query.filter(|q| !q.trim().is_empty()) {
            let pattern = format!("%{}%", q.trim());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::col((expenses::Entity, expenses::Column::Merchant))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((expenses::Entity, expenses::Column::Category))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((expenses::Entity, expenses::Column::Description))
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

    /// Inserts a new expense. The active model must already carry its
    /// fields; id, organization, and timestamps are set here.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        org_id: Uuid,
        mut model: expenses::ActiveModel,
    ) -> Result<expenses::Model, DbErr> {
        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        model.id = Set(Uuid::new_v4());
        model.organization_id = Set(org_id);
        model.created_at = Set(now);
        model.updated_at = Set(now);
        model.insert(&self.db).await
    }
}
