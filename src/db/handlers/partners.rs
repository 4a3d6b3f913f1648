//! Database repository for partners.

use crate::types::PartnerId;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::partners::{PartnerCreateDBRequest, PartnerDBResponse, PartnerUpdateDBRequest},
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

/// Filter for listing partners
#[derive(Debug, Clone)]
pub struct PartnerFilter {
    pub skip: i64,
    pub limit: i64,
}

impl PartnerFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Partner {
    pub id: PartnerId,
    pub name: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}

impl From<Partner> for PartnerDBResponse {
    fn from(partner: Partner) -> Self {
        Self {
            id: partner.id,
            name: partner.name,
            api_key: partner.api_key,
            created_at: partner.created_at,
        }
    }
}

pub struct Partners<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Partners<'c> {
    type CreateRequest = PartnerCreateDBRequest;
    type UpdateRequest = PartnerUpdateDBRequest;
    type Response = PartnerDBResponse;
    type Id = PartnerId;
    type Filter = PartnerFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let partner = sqlx::query_as::<_, Partner>(
            "INSERT INTO partners (name, api_key) VALUES ($1, $2) RETURNING id, name, api_key, created_at",
        )
        .bind(&request.name)
        .bind(&request.api_key)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(partner.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let partner = sqlx::query_as::<_, Partner>("SELECT id, name, api_key, created_at FROM partners WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(partner.map(Into::into))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let partners = sqlx::query_as::<_, Partner>(
            "SELECT id, name, api_key, created_at FROM partners ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(partners.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM partners WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let partner = sqlx::query_as::<_, Partner>(
            "UPDATE partners SET name = COALESCE($2, name) WHERE id = $1 RETURNING id, name, api_key, created_at",
        )
        .bind(id)
        .bind(&request.name)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(partner.into())
    }
}

impl<'c> Partners<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Credential lookup, used by collaborators that resolve partners by key.
    #[instrument(skip(self, api_key), err)]
    pub async fn get_by_api_key(&mut self, api_key: &str) -> Result<Option<PartnerDBResponse>> {
        let partner = sqlx::query_as::<_, Partner>("SELECT id, name, api_key, created_at FROM partners WHERE api_key = $1")
            .bind(api_key)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(partner.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::super::repository::Repository;
    use super::*;
    use crate::crypto::generate_api_key;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_partner(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Partners::new(&mut conn);

        let request = PartnerCreateDBRequest {
            name: "Acme Analytics".to_string(),
            api_key: generate_api_key(),
        };

        let partner = repo.create(&request).await.unwrap();
        assert_eq!(partner.name, "Acme Analytics");
        assert!(partner.api_key.starts_with("pk-"));
        assert!(partner.id > 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_api_key_rejected(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Partners::new(&mut conn);

        let key = generate_api_key();
        let request = PartnerCreateDBRequest {
            name: "First".to_string(),
            api_key: key.clone(),
        };
        repo.create(&request).await.unwrap();

        let request = PartnerCreateDBRequest {
            name: "Second".to_string(),
            api_key: key,
        };
        let err = repo.create(&request).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_by_id_and_api_key(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Partners::new(&mut conn);

        let request = PartnerCreateDBRequest {
            name: "Lookup Co".to_string(),
            api_key: generate_api_key(),
        };
        let created = repo.create(&request).await.unwrap();

        let by_id = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "Lookup Co");

        let by_key = repo.get_by_api_key(&created.api_key).await.unwrap().unwrap();
        assert_eq!(by_key.id, created.id);

        assert!(repo.get_by_id(999_999).await.unwrap().is_none());
        assert!(repo.get_by_api_key("pk-nope").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_and_delete(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Partners::new(&mut conn);

        for i in 0..3 {
            let request = PartnerCreateDBRequest {
                name: format!("Partner {i}"),
                api_key: generate_api_key(),
            };
            repo.create(&request).await.unwrap();
        }

        let listed = repo.list(&PartnerFilter::new(0, 10)).await.unwrap();
        assert_eq!(listed.len(), 3);

        let deleted = repo.delete(listed[0].id).await.unwrap();
        assert!(deleted);
        assert_eq!(repo.list(&PartnerFilter::new(0, 10)).await.unwrap().len(), 2);

        // Deleting a missing partner reports false, not an error
        assert!(!repo.delete(999_999).await.unwrap());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_name(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Partners::new(&mut conn);

        let request = PartnerCreateDBRequest {
            name: "Old Name".to_string(),
            api_key: generate_api_key(),
        };
        let created = repo.create(&request).await.unwrap();

        let updated = repo
            .update(
                created.id,
                &PartnerUpdateDBRequest {
                    name: Some("New Name".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.api_key, created.api_key);

        let err = repo
            .update(999_999, &PartnerUpdateDBRequest { name: None })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }
}
