//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// DOI table schema.
#[derive(Iden)]
pub enum DoiTable {
    #[iden = "doi"]
    Table,
    #[iden = "doi"]
    Doi,
    #[iden = "type"]
    Type,
    #[iden = "status"]
    Status,
    #[iden = "target"]
    Target,
    #[iden = "metadata"]
    Metadata,
}

/// Dataset table schema.
#[derive(Iden)]
pub enum Datasets {
    #[iden = "dataset"]
    Table,
    #[iden = "key"]
    Key,
    #[iden = "title"]
    Title,
    #[iden = "doi"]
    Doi,
    #[iden = "parent_dataset_key"]
    ParentDatasetKey,
    #[iden = "deleted"]
    Deleted,
}

/// Dataset alternate identifiers schema.
#[derive(Iden)]
pub enum DatasetIdentifiers {
    #[iden = "dataset_identifier"]
    Table,
    #[iden = "dataset_key"]
    DatasetKey,
    #[iden = "type"]
    Type,
    #[iden = "identifier"]
    Identifier,
}

/// Occurrence download table schema.
#[derive(Iden)]
pub enum Downloads {
    #[iden = "occurrence_download"]
    Table,
    #[iden = "key"]
    Key,
    #[iden = "doi"]
    Doi,
    #[iden = "status"]
    Status,
    #[iden = "created_by"]
    CreatedBy,
}

/// User account table schema.
#[derive(Iden)]
pub enum Users {
    #[iden = "app_user"]
    Table,
    #[iden = "username"]
    Username,
    #[iden = "email"]
    Email,
}

/// SQL for creating the DOI table.
pub const CREATE_DOI_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS doi (
    doi TEXT NOT NULL PRIMARY KEY,
    type TEXT NOT NULL,
    status TEXT NOT NULL,
    target TEXT,
    metadata TEXT
);

CREATE INDEX IF NOT EXISTS idx_doi_status_type ON doi(status, type);
"#;

/// SQL for creating the dataset and alternate identifier tables.
pub const CREATE_DATASET_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS dataset (
    key TEXT NOT NULL PRIMARY KEY,
    title TEXT NOT NULL,
    doi TEXT,
    parent_dataset_key TEXT,
    deleted TEXT
);

CREATE INDEX IF NOT EXISTS idx_dataset_doi ON dataset(doi);

CREATE TABLE IF NOT EXISTS dataset_identifier (
    dataset_key TEXT NOT NULL,
    type TEXT NOT NULL,
    identifier TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_dataset_identifier_value ON dataset_identifier(identifier);
"#;

/// SQL for creating the download and user tables.
pub const CREATE_DOWNLOAD_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS occurrence_download (
    key TEXT NOT NULL PRIMARY KEY,
    doi TEXT,
    status TEXT NOT NULL,
    created_by TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_occurrence_download_doi ON occurrence_download(doi);

CREATE TABLE IF NOT EXISTS app_user (
    username TEXT NOT NULL PRIMARY KEY,
    email TEXT
);
"#;
