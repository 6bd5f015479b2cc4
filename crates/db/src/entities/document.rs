use sea_orm::entity::prelude::*;

use crate::types::DocumentType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uuid: Uuid,
    pub brand_id: i64,
    pub document_type: DocumentType,
    pub name: String,
    pub url: String,
    pub file_size: Option<i64>,
    pub version: Option<String>,
    pub upload_date: DateTimeUtc,
    pub uploaded_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
