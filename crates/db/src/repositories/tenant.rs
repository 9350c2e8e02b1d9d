//! Tenant resolution.
//!
//! Decides which organization a request acts on. This is the single
//! scoping rule for the whole API; handlers never trust a raw header or
//! environment value.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{memberships, organizations, sea_orm_active_enums::OrganizationRole, users};

/// Resolves the active organization for an authenticated user.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    db: DatabaseConnection,
}

impl TenantResolver {
    /// Creates a new tenant resolver.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves the active organization id for `user`.
    ///
    /// Resolution order, first match wins:
    /// 1. `cookie_org_id`, if the user holds a membership there;
    /// 2. the user's stored default, if a membership exists for it;
    /// 3. the user's oldest membership;
    /// 4. auto-provision a fresh organization with an OWNER membership and
    ///    set it as the default, transactionally.
    ///
    /// # Errors
    ///
    /// Returns an error if any database operation fails. Auto-provisioning
    /// commits all rows or none.
    pub async fn resolve(
        &self,
        user: &users::Model,
        cookie_org_id: Option<Uuid>,
    ) -> Result<Uuid, DbErr> {
        if let Some(org_id) = self.resolve_existing(user, cookie_org_id).await? {
            return Ok(org_id);
        }

        let org = self.provision_default_org(user).await?;
        tracing::info!(user_id = %user.id, organization_id = %org.id, "auto-provisioned default organization");
        Ok(org.id)
    }

    /// Steps 1-3 of resolution, without auto-provisioning. Read paths that
    /// merely display the active organization use this.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn resolve_existing(
        &self,
        user: &users::Model,
        cookie_org_id: Option<Uuid>,
    ) -> Result<Option<Uuid>, DbErr> {
        if let Some(org_id) = cookie_org_id
            && self.is_member(user.id, org_id).await?
        {
            return Ok(Some(org_id));
        }

        if let Some(org_id) = user.organization_id
            && self.is_member(user.id, org_id).await?
        {
            return Ok(Some(org_id));
        }

        let oldest = memberships::Entity::find()
            .filter(memberships::Column::UserId.eq(user.id))
            .order_by_asc(memberships::Column::CreatedAt)
            .one(&self.db)
            .await?;

        Ok(oldest.map(|m| m.organization_id))
    }

    async fn is_member(&self, user_id: Uuid, org_id: Uuid) -> Result<bool, DbErr> {
        let count = memberships::Entity::find()
            .filter(memberships::Column::UserId.eq(user_id))
            .filter(memberships::Column::OrganizationId.eq(org_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn provision_default_org(
        &self,
        user: &users::Model,
    ) -> Result<organizations::Model, DbErr> {
        let txn = self.db.begin().await?;

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let org_id = Uuid::new_v4();

        let name = if user.name.trim().is_empty() {
            "My Business".to_string()
        } else {
            format!("{}'s Business", user.name.trim())
        };
        let slug = faktura_core::slug::unique_slug(&name, now.timestamp_millis());

        let org = organizations::ActiveModel {
            id: Set(org_id),
            name: Set(name),
            slug: Set(slug),
            base_currency: Set("USD".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        memberships::ActiveModel {
            user_id: Set(user.id),
            organization_id: Set(org_id),
            role: Set(OrganizationRole::Owner),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        users::ActiveModel {
            id: Set(user.id),
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
