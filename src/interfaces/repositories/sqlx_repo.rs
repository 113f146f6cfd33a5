use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, types::Json, PgPool, Row};

use crate::{
    entities::document::{Collection, Document, FieldFilter, Fields, SortOrder},
    errors::StoreError,
    repositories::document_store::{new_document_id, DocumentStore},
};

/// Documents kept in one `documents` table keyed by `(collection, id)`,
/// with the fields in a JSONB column.
#[derive(Clone)]
pub struct SqlxDocumentStore {
    pub pool: PgPool,
}

impl SqlxDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        SqlxDocumentStore { pool }
    }
}

fn document_from_row(row: &PgRow) -> Result<Document, StoreError> {
    let Json(fields): Json<Fields> = row.try_get("data")?;
    Ok(Document {
        id: row.try_get("id")?,
        fields,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl DocumentStore for SqlxDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(StoreError::from)
    }

    async fn query(
        &self,
        collection: Collection,
        filter: Option<FieldFilter>,
        order: Option<SortOrder>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut sql = String::from(
            "SELECT id, data, created_at, updated_at FROM documents WHERE collection = $1",
        );
        if filter.is_some() {
            sql.push_str(" AND data -> $2 = $3");
        }
        match order {
            Some(SortOrder::CreatedAtDesc) => sql.push_str(" ORDER BY created_at DESC"),
            None => sql.push_str(" ORDER BY ctid"),
        }

        let mut query = sqlx::query(&sql).bind(collection.as_str());
        if let Some(filter) = filter {
            query = query.bind(filter.field).bind(Json(filter.value));
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(document_from_row).collect()
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            "SELECT id, data, created_at, updated_at FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
        at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let id = new_document_id();
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            "#,
        )
        .bind(collection.as_str())
        .bind(&id)
        .bind(Json(fields))
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn merge(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = $4
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(fields))
        .bind(at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing);
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
