//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{memberships, organizations, sea_orm_active_enums::OrganizationRole, users};

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Creates a user together with their first organization and OWNER
    /// membership, all in one transaction.
    ///
    /// The organization name comes from `company_name` when given,
    /// otherwise `"{name}'s Business"`.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is committed then.
    pub async fn create_with_organization(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        company_name: Option<&str>,
    ) -> Result<(users::Model, organizations::Model), DbErr> {
        let txn = self.db.begin().await?;

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();

        let org_name = match company_name {
            Some(company) if !company.trim().is_empty() => company.trim().to_string(),
            _ => format!("{name}'s Business"),
        };
        let slug = faktura_core::slug::unique_slug(&org_name, now.timestamp_millis());

        let org = organizations::ActiveModel {
            id: Set(org_id),
            name: Set(org_name),
            slug: Set(slug),
            base_currency: Set("USD".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let user = users::ActiveModel {
            id: Set(user_id),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            name: Set(name.to_string()),
            organization_id: Set(Some(org_id)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        memberships::ActiveModel {
            user_id: Set(user_id),
            organization_id: Set(org_id),
            role: Set(OrganizationRole::Owner),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok((user, org))
    }

    /// Points the user's default organization at `org_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn set_default_organization(&self, user_id: Uuid, org_id: Uuid) -> Result<(), DbErr> {
        let user = users::ActiveModel {
            id: Set(user_id),
            organization_id: Set(Some(org_id)),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        users::Entity::update(user).exec(&self.db).await?;
        Ok(())
    }
}
