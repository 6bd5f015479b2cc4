use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub use crate::types::{BrandStatus, DealStage};

use crate::{
    entities::brand,
    models::{
        communication::Communication, contact::Contact, deal::Deal, document::Document,
        task::Task,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub brand_type: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub country_of_origin: Option<String>,
    pub project_sectors: Vec<String>,
    pub design_categories: Vec<String>,
    pub status: BrandStatus,
    pub deal_stage: DealStage,
    pub priority: Option<i32>,
    pub annual_contract_value: Option<f64>,
    pub sales_owner: Option<String>,
    #[ts(type = "Date")]
    pub date_added: DateTime<Utc>,
    #[ts(type = "Date")]
    pub last_contact_date: Option<DateTime<Utc>>,
    #[ts(type = "Date")]
    pub next_followup_date: Option<DateTime<Utc>>,
    pub excluded_categories: Option<String>,
    pub comments: Option<String>,
    pub hide: bool,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct CreateBrand {
    pub name: String,
    pub brand_type: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub country_of_origin: Option<String>,
    pub project_sectors: Option<Vec<String>>,
    pub design_categories: Option<Vec<String>>,
    pub status: Option<BrandStatus>,
    pub deal_stage: Option<DealStage>,
    pub priority: Option<i32>,
    pub annual_contract_value: Option<f64>,
    pub sales_owner: Option<String>,
    pub next_followup_date: Option<DateTime<Utc>>,
    pub excluded_categories: Option<String>,
    pub comments: Option<String>,
    pub hide: Option<bool>,
}

#[derive(Debug, Default, Deserialize, TS)]
pub struct UpdateBrand {
    pub name: Option<String>,
    pub brand_type: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub country_of_origin: Option<String>,
    pub project_sectors: Option<Vec<String>>,
    pub design_categories: Option<Vec<String>>,
    pub status: Option<BrandStatus>,
    pub deal_stage: Option<DealStage>,
    pub priority: Option<i32>,
    pub annual_contract_value: Option<f64>,
    pub sales_owner: Option<String>,
    pub last_contact_date: Option<DateTime<Utc>>,
    pub next_followup_date: Option<DateTime<Utc>>,
    pub excluded_categories: Option<String>,
    pub comments: Option<String>,
    pub hide: Option<bool>,
}

/// Equality/substring filters accepted by the brand list endpoint.
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct BrandFilters {
    pub status: Option<BrandStatus>,
    pub deal_stage: Option<DealStage>,
    pub priority: Option<i32>,
    pub sales_owner: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct BrandWithRelations {
    #[serde(flatten)]
    #[ts(flatten)]
    pub brand: Brand,
    pub contacts: Vec<Contact>,
    pub deal: Option<Deal>,
    pub communications: Vec<Communication>,
    pub documents: Vec<Document>,
    pub tasks: Vec<Task>,
}

impl std::ops::Deref for BrandWithRelations {
    type Target = Brand;
    fn deref(&self) -> &Self::Target {
        &self.brand
    }
}

fn tags_from_json(value: Option<serde_json::Value>) -> Vec<String> {
    value
        .and_then(|value| serde_json::from_value::<Vec<String>>(value).ok())
        .unwrap_or_default()
}

/// Trims, drops empties, and dedupes while preserving order.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || seen.iter().any(|existing: &String| existing == tag) {
            continue;
        }
        seen.push(tag.to_string());
    }
    seen
}

fn validate_priority(priority: Option<i32>) -> Result<(), DbErr> {
    match priority {
        Some(p) if !(1..=3).contains(&p) => Err(DbErr::Custom(
            "Brand priority must be between 1 and 3".to_string(),
        )),
        _ => Ok(()),
    }
}

impl Brand {
    pub(crate) fn from_model(model: brand::Model) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            brand_type: model.brand_type,
            website: model.website,
            country: model.country,
            country_of_origin: model.country_of_origin,
            project_sectors: tags_from_json(model.project_sectors),
            design_categories: tags_from_json(model.design_categories),
            status: model.status,
            deal_stage: model.deal_stage,
            priority: model.priority,
            annual_contract_value: model.annual_contract_value,
            sales_owner: model.sales_owner,
            date_added: model.date_added.into(),
            last_contact_date: model.last_contact_date.map(Into::into),
            next_followup_date: model.next_followup_date.map(Into::into),
            excluded_categories: model.excluded_categories,
            comments: model.comments,
            hide: model.hide,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }

    /// Visible brands (hide = false), name ascending, with the list filters applied.
    pub async fn find_all<C: ConnectionTrait>(
        db: &C,
        filters: &BrandFilters,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = brand::Entity::find()
            .filter(brand::Column::Hide.eq(false))
            .order_by_asc(brand::Column::Name);

        if let Some(status) = filters.status.clone() {
            query = query.filter(brand::Column::Status.eq(status));
        }
        if let Some(deal_stage) = filters.deal_stage.clone() {
            query = query.filter(brand::Column::DealStage.eq(deal_stage));
        }
        if let Some(priority) = filters.priority {
            query = query.filter(brand::Column::Priority.eq(priority));
        }
        if let Some(sales_owner) = filters.sales_owner.as_deref() {
            query = query.filter(brand::Column::SalesOwner.eq(sales_owner));
        }
        if let Some(search) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.filter(brand::Column::Name.contains(search.trim()));
        }

        let models = query.all(db).await?;
        Ok(models.into_iter().map(Self::from_model).collect())
    }

    /// Every brand row, hidden ones included. Dashboard stats count these.
    pub async fn find_all_unfiltered<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let models = brand::Entity::find()
            .order_by_asc(brand::Column::Name)
            .all(db)
            .await?;
        Ok(models.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = brand::Entity::find()
            .filter(brand::Column::Uuid.eq(id))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    /// Brand detail view: the brand plus each child table fetched
    /// independently, ordered the way the detail page renders them.
    pub async fn find_with_relations<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<BrandWithRelations>, DbErr> {
        let Some(brand) = Self::find_by_id(db, id).await? else {
            return Ok(None);
        };

        let contacts = Contact::find_by_brand_id(db, id).await?;
        let deal = Deal::find_by_brand_id(db, id).await?;
        let communications = Communication::find_by_brand_id(db, id).await?;
        let documents = Document::find_by_brand_id(db, id).await?;
        let tasks = Task::find_by_brand_id(db, id).await?;

        Ok(Some(BrandWithRelations {
            brand,
            contacts,
            deal,
            communications,
            documents,
            tasks,
        }))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateBrand,
        brand_id: Uuid,
    ) -> Result<Self, DbErr> {
        validate_priority(data.priority)?;

        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(DbErr::Custom("Brand name must not be empty".to_string()));
        }

        let sectors = data.project_sectors.as_deref().map(normalize_tags);
        let categories = data.design_categories.as_deref().map(normalize_tags);

        let now = Utc::now();
        let active = brand::ActiveModel {
            uuid: Set(brand_id),
            name: Set(name),
            brand_type: Set(data.brand_type.clone()),
            website: Set(data.website.clone()),
            country: Set(data.country.clone()),
            country_of_origin: Set(data.country_of_origin.clone()),
            project_sectors: Set(sectors.map(|t| serde_json::json!(t))),
            design_categories: Set(categories.map(|t| serde_json::json!(t))),
            status: Set(data.status.clone().unwrap_or_default()),
            deal_stage: Set(data.deal_stage.clone().unwrap_or_default()),
            priority: Set(data.priority),
            annual_contract_value: Set(data.annual_contract_value),
            sales_owner: Set(data.sales_owner.clone()),
            date_added: Set(now.into()),
            next_followup_date: Set(data.next_followup_date.map(Into::into)),
            excluded_categories: Set(data.excluded_categories.clone()),
            comments: Set(data.comments.clone()),
            hide: Set(data.hide.unwrap_or(false)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateBrand,
    ) -> Result<Self, DbErr> {
        validate_priority(data.priority)?;

        let record = brand::Entity::find()
            .filter(brand::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;

        let mut active: brand::ActiveModel = record.into();
        if let Some(name) = data.name.as_deref() {
            let name = name.trim();
            if name.is_empty() {
                return Err(DbErr::Custom("Brand name must not be empty".to_string()));
            }
            active.name = Set(name.to_string());
        }
        if let Some(brand_type) = data.brand_type.clone() {
            active.brand_type = Set(Some(brand_type));
        }
        if let Some(website) = data.website.clone() {
            active.website = Set(Some(website));
        }
        if let Some(country) = data.country.clone() {
            active.country = Set(Some(country));
        }
        if let Some(country_of_origin) = data.country_of_origin.clone() {
            active.country_of_origin = Set(Some(country_of_origin));
        }
        if let Some(sectors) = data.project_sectors.as_deref() {
            active.project_sectors = Set(Some(serde_json::json!(normalize_tags(sectors))));
        }
        if let Some(categories) = data.design_categories.as_deref() {
            active.design_categories = Set(Some(serde_json::json!(normalize_tags(categories))));
        }
        if let Some(status) = data.status.clone() {
            active.status = Set(status);
        }
        if let Some(deal_stage) = data.deal_stage.clone() {
            active.deal_stage = Set(deal_stage);
        }
        if let Some(priority) = data.priority {
            active.priority = Set(Some(priority));
        }
        if let Some(annual_contract_value) = data.annual_contract_value {
            active.annual_contract_value = Set(Some(annual_contract_value));
        }
        if let Some(sales_owner) = data.sales_owner.clone() {
            active.sales_owner = Set(Some(sales_owner));
        }
        if let Some(last_contact_date) = data.last_contact_date {
            active.last_contact_date = Set(Some(last_contact_date.into()));
        }
        if let Some(next_followup_date) = data.next_followup_date {
            active.next_followup_date = Set(Some(next_followup_date.into()));
        }
        if let Some(excluded_categories) = data.excluded_categories.clone() {
            active.excluded_categories = Set(Some(excluded_categories));
        }
        if let Some(comments) = data.comments.clone() {
            active.comments = Set(Some(comments));
        }
        if let Some(hide) = data.hide {
            active.hide = Set(hide);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }

    /// Stamp the last contact date. Used when a communication is logged.
    pub async fn touch_last_contact<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        contact_date: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let record = brand::Entity::find()
            .filter(brand::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;

        let mut active: brand::ActiveModel = record.into();
        active.last_contact_date = Set(Some(contact_date.into()));
        active.updated_at = Set(Utc::now().into());
        active.update(db).await?;
        Ok(())
    }

    /// Deletes the brand row only. Children are left in place (no cascade
    /// in application code).
    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = brand::Entity::delete_many()
            .filter(brand::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    fn named(name: &str) -> CreateBrand {
        CreateBrand {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn find_all_hides_hidden_and_orders_by_name() {
        let db = setup_db().await;

        Brand::create(&db, &named("Zeta"), Uuid::new_v4()).await.unwrap();
        Brand::create(&db, &named("Alpha"), Uuid::new_v4()).await.unwrap();
        Brand::create(
            &db,
            &CreateBrand {
                name: "Hidden".to_string(),
                hide: Some(true),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let brands = Brand::find_all(&db, &BrandFilters::default()).await.unwrap();
        let names: Vec<_> = brands.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);

        let all = Brand::find_all_unfiltered(&db).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn find_all_applies_filters() {
        let db = setup_db().await;

        Brand::create(
            &db,
            &CreateBrand {
                name: "Nordic Lights".to_string(),
                status: Some(BrandStatus::Active),
                deal_stage: Some(DealStage::Won),
                priority: Some(1),
                sales_owner: Some("anna".to_string()),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        Brand::create(
            &db,
            &CreateBrand {
                name: "Other".to_string(),
                status: Some(BrandStatus::Prospect),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let by_status = Brand::find_all(
            &db,
            &BrandFilters {
                status: Some(BrandStatus::Active),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].name, "Nordic Lights");

        let by_search = Brand::find_all(
            &db,
            &BrandFilters {
                search: Some("nordic".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_search.len(), 1);

        let by_owner = Brand::find_all(
            &db,
            &BrandFilters {
                sales_owner: Some("nobody".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(by_owner.is_empty());
    }

    #[tokio::test]
    async fn tags_are_normalized_and_roundtrip() {
        let db = setup_db().await;

        let brand = Brand::create(
            &db,
            &CreateBrand {
                name: "Tagged".to_string(),
                project_sectors: Some(vec![
                    "Hospitality".to_string(),
                    " Hospitality ".to_string(),
                    "".to_string(),
                    "Retail".to_string(),
                ]),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        assert_eq!(brand.project_sectors, vec!["Hospitality", "Retail"]);

        let reloaded = Brand::find_by_id(&db, brand.id).await.unwrap().unwrap();
        assert_eq!(reloaded.project_sectors, vec!["Hospitality", "Retail"]);
        assert!(reloaded.design_categories.is_empty());
    }

    #[tokio::test]
    async fn priority_out_of_range_is_rejected() {
        let db = setup_db().await;

        let result = Brand::create(
            &db,
            &CreateBrand {
                name: "Bad".to_string(),
                priority: Some(4),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn update_and_delete() {
        let db = setup_db().await;

        let brand = Brand::create(&db, &named("Before"), Uuid::new_v4())
            .await
            .unwrap();

        let updated = Brand::update(
            &db,
            brand.id,
            &UpdateBrand {
                name: Some("After".to_string()),
                status: Some(BrandStatus::Negotiation),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "After");
        assert_eq!(updated.status, BrandStatus::Negotiation);

        assert_eq!(Brand::delete(&db, brand.id).await.unwrap(), 1);
        assert!(Brand::find_by_id(&db, brand.id).await.unwrap().is_none());
    }
}
