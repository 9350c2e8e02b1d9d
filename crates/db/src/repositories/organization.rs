//! Organization repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    memberships, organizations, sea_orm_active_enums::OrganizationRole, users,
};

/// Organization repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if a user is a member of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_member(&self, org_id: Uuid, user_id: Uuid) -> Result<bool, DbErr> {
        let count = memberships::Entity::find()
            .filter(memberships::Column::OrganizationId.eq(org_id))
            .filter(memberships::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// All of a user's memberships with their organizations, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn memberships_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(memberships::Model, organizations::Model)>, DbErr> {
        memberships::Entity::find()
            .filter(memberships::Column::UserId.eq(user_id))
            .order_by_asc(memberships::Column::CreatedAt)
            .find_also_related(organizations::Entity)
            .all(&self.db)
            .await
            .map(|rows| {
                rows.into_iter()
                    .filter_map(|(membership, org)| org.map(|o| (membership, o)))
                    .collect()
            })
    }

    /// Creates an organization with the creator as OWNER and points the
    /// creator's default at it, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is committed then.
    pub async fn create_with_owner(
        &self,
        name: &str,
        owner_id: Uuid,
    ) -> Result<organizations::Model, DbErr> {
        let txn = self.db.begin().await?;

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let org_id = Uuid::new_v4();
        let slug = faktura_core::slug::unique_slug(name, now.timestamp_millis());

        let org = organizations::ActiveModel {
            id: Set(org_id),
            name: Set(name.to_string()),
            slug: Set(slug),
            base_currency: Set("USD".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        memberships::ActiveModel {
            user_id: Set(owner_id),
            organization_id: Set(org_id),
            role: Set(OrganizationRole::Owner),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        users::ActiveModel {
            id: Set(owner_id),
            organization_id: Set(Some(org_id)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;

        Ok(org)
    }
}
