use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub use crate::types::DocumentType;

use crate::{entities::document, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Document {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub document_type: DocumentType,
    pub name: String,
    pub url: String,
    pub file_size: Option<i64>,
    pub version: Option<String>,
    #[ts(type = "Date")]
    pub upload_date: DateTime<Utc>,
    pub uploaded_by: Option<String>,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateDocument {
    pub brand_id: Uuid,
    pub document_type: DocumentType,
    pub name: String,
    pub url: String,
    pub file_size: Option<i64>,
    pub version: Option<String>,
    pub upload_date: Option<DateTime<Utc>>,
    pub uploaded_by: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
pub struct UpdateDocument {
    pub document_type: Option<DocumentType>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub file_size: Option<i64>,
    pub version: Option<String>,
    pub uploaded_by: Option<String>,
}

impl Document {
    async fn from_model<C: ConnectionTrait>(db: &C, model: document::Model) -> Result<Self, DbErr> {
        let brand_id = ids::brand_uuid_by_id(db, model.brand_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            brand_id,
            document_type: model.document_type,
            name: model.name,
            url: model.url,
            file_size: model.file_size,
            version: model.version,
            upload_date: model.upload_date.into(),
            uploaded_by: model.uploaded_by,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = document::Entity::find()
            .filter(document::Column::Uuid.eq(id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    /// A brand's documents, newest upload first.
    pub async fn find_by_brand_id<C: ConnectionTrait>(
        db: &C,
        brand_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(brand_row_id) = ids::brand_id_by_uuid(db, brand_id).await? else {
            return Ok(Vec::new());
        };

        let models = document::Entity::find()
            .filter(document::Column::BrandId.eq(brand_row_id))
            .order_by_desc(document::Column::UploadDate)
            .all(db)
            .await?;

        let mut documents = Vec::with_capacity(models.len());
        for model in models {
            documents.push(Self::from_model(db, model).await?);
        }
        Ok(documents)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateDocument,
        document_id: Uuid,
    ) -> Result<Self, DbErr> {
        let brand_row_id = ids::brand_id_by_uuid(db, data.brand_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;

        let now = Utc::now();
        let active = document::ActiveModel {
            uuid: Set(document_id),
            brand_id: Set(brand_row_id),
            document_type: Set(data.document_type.clone()),
            name: Set(data.name.clone()),
            url: Set(data.url.clone()),
            file_size: Set(data.file_size),
            version: Set(data.version.clone()),
            upload_date: Set(data.upload_date.unwrap_or(now).into()),
            uploaded_by: Set(data.uploaded_by.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active.insert(db).await?;
        Self::from_model(db, model).await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateDocument,
    ) -> Result<Self, DbErr> {
        let record = document::Entity::find()
            .filter(document::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Document not found".to_string()))?;

        let mut active: document::ActiveModel = record.into();
        if let Some(document_type) = data.document_type.clone() {
            active.document_type = Set(document_type);
        }
        if let Some(name) = data.name.clone() {
            active.name = Set(name);
        }
        if let Some(url) = data.url.clone() {
            active.url = Set(url);
        }
        if let Some(file_size) = data.file_size {
            active.file_size = Set(Some(file_size));
        }
        if let Some(version) = data.version.clone() {
            active.version = Set(Some(version));
        }
        if let Some(uploaded_by) = data.uploaded_by.clone() {
            active.uploaded_by = Set(Some(uploaded_by));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Self::from_model(db, updated).await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = document::Entity::delete_many()
            .filter(document::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::models::brand::{Brand, CreateBrand};

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn documents_ordered_by_upload_date_descending() {
        let db = setup_db().await;
        let brand = Brand::create(
            &db,
            &CreateBrand {
                name: "Brand".to_string(),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let now = Utc::now();
        Document::create(
            &db,
            &CreateDocument {
                brand_id: brand.id,
                document_type: DocumentType::PriceList,
                name: "Price List".to_string(),
                url: "https://example.com/prices.pdf".to_string(),
                file_size: None,
                version: None,
                upload_date: Some(now - Duration::days(7)),
                uploaded_by: None,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let newest = Document::create(
            &db,
            &CreateDocument {
                brand_id: brand.id,
                document_type: DocumentType::Contract,
                name: "Contract".to_string(),
                url: "https://example.com/contract.pdf".to_string(),
                file_size: Some(1024),
                version: Some("v2".to_string()),
                upload_date: Some(now),
                uploaded_by: Some("anna".to_string()),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let documents = Document::find_by_brand_id(&db, brand.id).await.unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].id, newest.id);
        assert_eq!(documents[0].document_type, DocumentType::Contract);
    }

    #[tokio::test]
    async fn create_requires_live_brand() {
        let db = setup_db().await;
        let result = Document::create(
            &db,
            &CreateDocument {
                brand_id: Uuid::new_v4(),
                document_type: DocumentType::Other,
                name: "Orphan".to_string(),
                url: "https://example.com".to_string(),
                file_size: None,
                version: None,
                upload_date: None,
                uploaded_by: None,
            },
            Uuid::new_v4(),
        )
        .await;
        assert!(matches!(result, Err(DbErr::RecordNotFound(_))));
    }
}
