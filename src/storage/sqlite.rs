//! SQLite implementation of the identifier store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_query::{Expr, Func, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::interfaces::identifier_store::{IdentifierStore, Page, Result, StoreError};
use crate::model::{
    AlternateIdentifier, Dataset, Doi, DoiRecord, DoiStatus, DoiType, Download, IdentifierKind,
    User,
};

use super::schema::{
    DatasetIdentifiers, Datasets, DoiTable, Downloads, Users, CREATE_DATASET_TABLES,
    CREATE_DOI_TABLE, CREATE_DOWNLOAD_TABLES,
};

/// SQLite implementation of IdentifierStore.
pub struct SqliteIdentifierStore {
    pool: SqlitePool,
}

impl SqliteIdentifierStore {
    /// Create a new SQLite identifier store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the database schema.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(CREATE_DOI_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_DATASET_TABLES).execute(&self.pool).await?;
        sqlx::query(CREATE_DOWNLOAD_TABLES)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Load datasets with the given keys, alternate identifiers included.
    async fn load_datasets(&self, keys: Vec<String>) -> Result<Vec<Dataset>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let (sql, values) = Query::select()
            .columns([
                Datasets::Key,
                Datasets::Title,
                Datasets::Doi,
                Datasets::ParentDatasetKey,
                Datasets::Deleted,
            ])
            .from(Datasets::Table)
            .and_where(Expr::col(Datasets::Key).is_in(keys.clone()))
            .order_by(Datasets::Key, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        let mut datasets = BTreeMap::new();
        for row in rows {
            let dataset = decode_dataset(&row)?;
            datasets.insert(dataset.key.to_string(), dataset);
        }

        let (sql, values) = Query::select()
            .columns([
                DatasetIdentifiers::DatasetKey,
                DatasetIdentifiers::Type,
                DatasetIdentifiers::Identifier,
            ])
            .from(DatasetIdentifiers::Table)
            .and_where(Expr::col(DatasetIdentifiers::DatasetKey).is_in(keys))
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        for row in rows {
            let dataset_key: String = row.try_get("dataset_key")?;
            let kind: String = row.try_get("type")?;
            let value: String = row.try_get("identifier")?;
            if let Some(dataset) = datasets.get_mut(&dataset_key) {
                // Kinds outside the vocabulary never denote a DOI.
                dataset.identifiers.push(AlternateIdentifier {
                    kind: kind.parse().unwrap_or(IdentifierKind::Other),
                    value,
                });
            }
        }

        Ok(datasets.into_values().collect())
    }
}

#[async_trait]
impl IdentifierStore for SqliteIdentifierStore {
    async fn get(&self, doi: &Doi) -> Result<Option<DoiRecord>> {
        let (sql, values) = Query::select()
            .columns([
                DoiTable::Doi,
                DoiTable::Type,
                DoiTable::Status,
                DoiTable::Target,
            ])
            .from(DoiTable::Table)
            .and_where(Expr::expr(Func::lower(Expr::col(DoiTable::Doi))).eq(doi.name()))
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_with(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let doi_type: String = row.try_get("type")?;
                let status: String = row.try_get("status")?;
                Ok(Some(DoiRecord {
                    doi: doi.clone(),
                    doi_type: doi_type.parse()?,
                    status: status.parse()?,
                    target: row.try_get("target")?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn get_metadata(&self, doi: &Doi) -> Result<Option<String>> {
        let (sql, values) = Query::select()
            .column(DoiTable::Metadata)
            .from(DoiTable::Table)
            .and_where(Expr::expr(Func::lower(Expr::col(DoiTable::Doi))).eq(doi.name()))
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_with(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.try_get("metadata")?),
            None => Ok(None),
        }
    }

    async fn list_by_status(
        &self,
        status: DoiStatus,
        doi_type: Option<DoiType>,
        page: Option<Page>,
    ) -> Result<Vec<(Doi, DoiType)>> {
        let mut query = Query::select();
        query
            .columns([DoiTable::Doi, DoiTable::Type])
            .from(DoiTable::Table)
            .and_where(Expr::col(DoiTable::Status).eq(status.as_str()))
            .order_by(DoiTable::Doi, Order::Asc);

        if let Some(doi_type) = doi_type {
            query.and_where(Expr::col(DoiTable::Type).eq(doi_type.as_str()));
        }
        if let Some(page) = page {
            query.limit(page.limit).offset(page.offset);
        }

        let (sql, values) = query.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_with(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        let mut dois = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("doi")?;
            let doi_type: String = row.try_get("type")?;
            dois.push((parse_doi("doi", &name)?, doi_type.parse()?));
        }

        debug!(status = %status, count = dois.len(), "Listed DOIs by status");
        Ok(dois)
    }

    async fn list_datasets_by_primary(&self, doi: &Doi) -> Result<Vec<Dataset>> {
        let (sql, values) = Query::select()
            .column(Datasets::Key)
            .from(Datasets::Table)
            .and_where(Expr::expr(Func::lower(Expr::col(Datasets::Doi))).eq(doi.name()))
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        let keys = rows
            .iter()
            .map(|row| row.try_get("key"))
            .collect::<std::result::Result<Vec<String>, _>>()?;

        self.load_datasets(keys).await
    }

    async fn list_datasets_by_alternate(&self, doi: &Doi) -> Result<Vec<Dataset>> {
        // Narrow on the bare name, then match with the same parsing the
        // model applies so stray whitespace or prefixes do not hide an owner.
        let (sql, values) = Query::select()
            .columns([
                DatasetIdentifiers::DatasetKey,
                DatasetIdentifiers::Identifier,
            ])
            .from(DatasetIdentifiers::Table)
            .and_where(Expr::col(DatasetIdentifiers::Type).eq(IdentifierKind::Doi.as_str()))
            .and_where(
                Expr::expr(Func::lower(Expr::col(DatasetIdentifiers::Identifier)))
                    .like(format!("%{}%", doi.name())),
            )
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        let mut keys = Vec::new();
        for row in rows {
            let key: String = row.try_get("dataset_key")?;
            let identifier = AlternateIdentifier {
                kind: IdentifierKind::Doi,
                value: row.try_get("identifier")?,
            };
            if identifier.as_doi().as_ref() == Some(doi) && !keys.contains(&key) {
                keys.push(key);
            }
        }

        self.load_datasets(keys).await
    }

    async fn get_download_by_doi(&self, doi: &Doi) -> Result<Option<Download>> {
        let (sql, values) = Query::select()
            .columns([
                Downloads::Key,
                Downloads::Doi,
                Downloads::Status,
                Downloads::CreatedBy,
            ])
            .from(Downloads::Table)
            .and_where(Expr::expr(Func::lower(Expr::col(Downloads::Doi))).eq(doi.name()))
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_with(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let status: String = row.try_get("status")?;
                Ok(Some(Download {
                    key: row.try_get("key")?,
                    doi: Some(doi.clone()),
                    status: status.parse()?,
                    creator: row.try_get("created_by")?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let (sql, values) = Query::select()
            .columns([Users::Username, Users::Email])
            .from(Users::Table)
            .and_where(Expr::col(Users::Username).eq(name))
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_with(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(User {
                name: row.try_get("username")?,
                email: row.try_get("email")?,
            })),
            None => Ok(None),
        }
    }
}

fn parse_doi(column: &'static str, value: &str) -> Result<Doi> {
    Doi::parse(value).map_err(|_| StoreError::Corrupt {
        column,
        value: value.to_string(),
    })
}

fn parse_uuid(column: &'static str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|_| StoreError::Corrupt {
        column,
        value: value.to_string(),
    })
}

fn decode_dataset(row: &SqliteRow) -> Result<Dataset> {
    let key: String = row.try_get("key")?;
    let doi: Option<String> = row.try_get("doi")?;
    let parent_key: Option<String> = row.try_get("parent_dataset_key")?;
    let deleted: Option<String> = row.try_get("deleted")?;

    let deleted = deleted
        .map(|ts| {
            DateTime::parse_from_rfc3339(&ts)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| StoreError::Corrupt {
                    column: "deleted",
                    value: ts.clone(),
                })
        })
        .transpose()?;

    Ok(Dataset {
        key: parse_uuid("key", &key)?,
        title: row.try_get("title")?,
        doi: doi.as_deref().map(|d| parse_doi("doi", d)).transpose()?,
        parent_key: parent_key
            .as_deref()
            .map(|k| parse_uuid("parent_dataset_key", k))
            .transpose()?,
        deleted,
        identifiers: Vec::new(),
    })
}
