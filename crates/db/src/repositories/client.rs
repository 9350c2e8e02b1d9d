//! Client repository for database operations.

use faktura_core::csv::ClientCsvFields;
use faktura_shared::types::PageRequest;
use sea_orm::sea_query::{Condition, Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::clients;

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Paginated client list for an organization.
    ///
    /// `query` searches display name, company, and email,
    /// case-insensitively. Archived clients only appear when
    /// `include_archived` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        org_id: Uuid,
        query: Option<&str>,
        include_archived: bool,
        page: &PageRequest,
    ) -> Result<(Vec<clients::Model>, u64), DbErr> {
        let mut select = clients::Entity::find()
            .filter(clients::Column::OrganizationId.eq(org_id))
            .order_by_asc(clients::Column::DisplayName);

        if !include_archived {
            select = select.filter(clients::Column::IsActive.eq(true));
        }

        if let Some(q) = query.filter(|q| !q.trim().is_empty()) {
            let pattern = format!("%{}%", q.trim());
            select = select.filter(
                Condition::any()
                    .add(Expr::col(clients::Column::DisplayName).ilike(pattern.clone()))
                    .add(Expr::col(clients::Column::Company).ilike(pattern.clone()))
                    .add(Expr::col(clients::Column::Email).ilike(pattern)),
            );
        }

        let paginator = select.paginate(&self.db, page.page_size());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.page() - 1).await?;

        Ok((items, total))
    }

    /// Finds a client by id within the organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, org_id: Uuid, id: Uuid) -> Result<Option<clients::Model>, DbErr> {
        clients::Entity::find_by_id(id)
            .filter(clients::Column::OrganizationId.eq(org_id))
            .one(&self.db)
            .await
    }

    /// Inserts a new client. The active model must already carry its
    /// fields; id, organization, and timestamps are set here.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        org_id: Uuid,
        mut model: clients::ActiveModel,
    ) -> Result<clients::Model, DbErr> {
        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        model.id = Set(Uuid::new_v4());
        model.organization_id = Set(org_id);
        model.created_at = Set(now);
        model.updated_at = Set(now);
        model.insert(&self.db).await
    }

    /// Applies a partial update to a client in the organization. Returns
    /// `None` when the client is not in scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn update(
        &self,
        org_id: Uuid,
        id: Uuid,
        mut model: clients::ActiveModel,
    ) -> Result<Option<clients::Model>, DbErr> {
        if self.find(org_id, id).await?.is_none() {
            return Ok(None);
        }

        model.id = Set(id);
        model.organization_id = Set(org_id);
        model.updated_at = Set(chrono::Utc::now().into());
        model.update(&self.db).await.map(Some)
    }

    /// Archives the given clients (`is_active = false`). Returns the
    /// number of rows touched; ids outside the organization are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn bulk_archive(&self, org_id: Uuid, ids: &[Uuid]) -> Result<u64, DbErr> {
        let result = clients::Entity::update_many()
            .col_expr(clients::Column::IsActive, Expr::value(false))
            .col_expr(
                clients::Column::UpdatedAt,
                Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(
                    chrono::Utc::now(),
                )),
            )
            .filter(clients::Column::OrganizationId.eq(org_id))
            .filter(clients::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Hard-deletes the given clients. Ids outside the organization are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn bulk_delete(&self, org_id: Uuid, ids: &[Uuid]) -> Result<u64, DbErr> {
        let result = clients::Entity::delete_many()
            .filter(clients::Column::OrganizationId.eq(org_id))
            .filter(clients::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// All clients in the organization, oldest first, for CSV export.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn all_for_export(&self, org_id: Uuid) -> Result<Vec<clients::Model>, DbErr> {
        clients::Entity::find()
            .filter(clients::Column::OrganizationId.eq(org_id))
            .order_by_asc(clients::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Inserts imported clients. Returns the number inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn import(&self, org_id: Uuid, rows: Vec<ClientCsvFields>) -> Result<u64, DbErr> {
        if rows.is_empty() {
            return Ok(0);
        }

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let count = rows.len() as u64;
        let models = rows.into_iter().map(|row| clients::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(org_id),
            display_name: Set(row.display_name),
            company: Set(non_empty(row.company)),
            email: Set(non_empty(row.email)),
            phone: Set(non_empty(row.phone)),
            business_phone: Set(None),
            mobile_phone: Set(None),
            address_line1: Set(non_empty(row.address_line1)),
            address_line2: Set(non_empty(row.address_line2)),
            city: Set(non_empty(row.city)),
            state: Set(non_empty(row.state)),
            postal_code: Set(non_empty(row.postal_code)),
            country: Set(non_empty(row.country)),
            notes: Set(non_empty(row.notes)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        });

        clients::Entity::insert_many(models).exec(&self.db).await?;
        Ok(count)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
