use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::deal, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Deal {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub discount: Option<f64>,
    pub payment_terms: Option<String>,
    pub shipping_terms: Option<String>,
    pub freight_free_limit: Option<f64>,
    pub rrp_inc_vat: Option<f64>,
    pub rrp_exc_vat: Option<f64>,
    pub dealer_access: Option<String>,
    pub contract_start_date: Option<NaiveDate>,
    pub contract_end_date: Option<NaiveDate>,
    pub renewal_date: Option<NaiveDate>,
    pub first_purchase_date: Option<NaiveDate>,
    pub minimum_order_value: Option<f64>,
    pub commission_structure: Option<String>,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for the brand-deal upsert. Every field optional; the brand id
/// comes from the route path.
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct UpsertDeal {
    pub discount: Option<f64>,
    pub payment_terms: Option<String>,
    pub shipping_terms: Option<String>,
    pub freight_free_limit: Option<f64>,
    pub rrp_inc_vat: Option<f64>,
    pub rrp_exc_vat: Option<f64>,
    pub dealer_access: Option<String>,
    pub contract_start_date: Option<NaiveDate>,
    pub contract_end_date: Option<NaiveDate>,
    pub renewal_date: Option<NaiveDate>,
    pub first_purchase_date: Option<NaiveDate>,
    pub minimum_order_value: Option<f64>,
    pub commission_structure: Option<String>,
}

fn validate_discount(discount: Option<f64>) -> Result<(), DbErr> {
    match discount {
        Some(d) if !(0.0..=1.0).contains(&d) => Err(DbErr::Custom(
            "Deal discount must be a fraction between 0 and 1".to_string(),
        )),
        _ => Ok(()),
    }
}

impl Deal {
    async fn from_model<C: ConnectionTrait>(db: &C, model: deal::Model) -> Result<Self, DbErr> {
        let brand_id = ids::brand_uuid_by_id(db, model.brand_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            brand_id,
            discount: model.discount,
            payment_terms: model.payment_terms,
            shipping_terms: model.shipping_terms,
            freight_free_limit: model.freight_free_limit,
            rrp_inc_vat: model.rrp_inc_vat,
            rrp_exc_vat: model.rrp_exc_vat,
            dealer_access: model.dealer_access,
            contract_start_date: model.contract_start_date,
            contract_end_date: model.contract_end_date,
            renewal_date: model.renewal_date,
            first_purchase_date: model.first_purchase_date,
            minimum_order_value: model.minimum_order_value,
            commission_structure: model.commission_structure,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_brand_id<C: ConnectionTrait>(
        db: &C,
        brand_id: Uuid,
    ) -> Result<Option<Self>, DbErr> {
        let Some(brand_row_id) = ids::brand_id_by_uuid(db, brand_id).await? else {
            return Ok(None);
        };

        let record = deal::Entity::find()
            .filter(deal::Column::BrandId.eq(brand_row_id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    /// Update the brand's deal if one exists, insert otherwise. A brand
    /// carries at most one deal.
    pub async fn upsert<C: ConnectionTrait>(
        db: &C,
        brand_id: Uuid,
        data: &UpsertDeal,
    ) -> Result<Self, DbErr> {
        validate_discount(data.discount)?;

        let brand_row_id = ids::brand_id_by_uuid(db, brand_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;

        let existing = deal::Entity::find()
            .filter(deal::Column::BrandId.eq(brand_row_id))
            .one(db)
            .await?;

        let now = Utc::now();
        let model = match existing {
            Some(record) => {
                let mut active: deal::ActiveModel = record.into();
                active.discount = Set(data.discount);
                active.payment_terms = Set(data.payment_terms.clone());
                active.shipping_terms = Set(data.shipping_terms.clone());
                active.freight_free_limit = Set(data.freight_free_limit);
                active.rrp_inc_vat = Set(data.rrp_inc_vat);
                active.rrp_exc_vat = Set(data.rrp_exc_vat);
                active.dealer_access = Set(data.dealer_access.clone());
                active.contract_start_date = Set(data.contract_start_date);
                active.contract_end_date = Set(data.contract_end_date);
                active.renewal_date = Set(data.renewal_date);
                active.first_purchase_date = Set(data.first_purchase_date);
                active.minimum_order_value = Set(data.minimum_order_value);
                active.commission_structure = Set(data.commission_structure.clone());
                active.updated_at = Set(now.into());
                active.update(db).await?
            }
            None => {
                let active = deal::ActiveModel {
                    uuid: Set(Uuid::new_v4()),
                    brand_id: Set(brand_row_id),
                    discount: Set(data.discount),
                    payment_terms: Set(data.payment_terms.clone()),
                    shipping_terms: Set(data.shipping_terms.clone()),
                    freight_free_limit: Set(data.freight_free_limit),
                    rrp_inc_vat: Set(data.rrp_inc_vat),
                    rrp_exc_vat: Set(data.rrp_exc_vat),
                    dealer_access: Set(data.dealer_access.clone()),
                    contract_start_date: Set(data.contract_start_date),
                    contract_end_date: Set(data.contract_end_date),
                    renewal_date: Set(data.renewal_date),
                    first_purchase_date: Set(data.first_purchase_date),
                    minimum_order_value: Set(data.minimum_order_value),
                    commission_structure: Set(data.commission_structure.clone()),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                    ..Default::default()
                };
                active.insert(db).await?
            }
        };

        Self::from_model(db, model).await
    }

    pub async fn delete_by_brand_id<C: ConnectionTrait>(
        db: &C,
        brand_id: Uuid,
    ) -> Result<u64, DbErr> {
        let Some(brand_row_id) = ids::brand_id_by_uuid(db, brand_id).await? else {
            return Ok(0);
        };

        let result = deal::Entity::delete_many()
            .filter(deal::Column::BrandId.eq(brand_row_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::models::brand::{Brand, CreateBrand};

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn make_brand(db: &sea_orm::DatabaseConnection) -> Brand {
        Brand::create(
            db,
            &CreateBrand {
                name: "Brand".to_string(),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn brand_without_deal_has_none() {
        let db = setup_db().await;
        let brand = make_brand(&db).await;
        assert!(Deal::find_by_brand_id(&db, brand.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_inserts_then_updates_in_place() {
        let db = setup_db().await;
        let brand = make_brand(&db).await;

        let first = Deal::upsert(
            &db,
            brand.id,
            &UpsertDeal {
                discount: Some(0.3),
                payment_terms: Some("Net 30".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(first.discount, Some(0.3));

        let second = Deal::upsert(
            &db,
            brand.id,
            &UpsertDeal {
                discount: Some(0.35),
                shipping_terms: Some("EXW".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        // Same row, replaced terms.
        assert_eq!(second.id, first.id);
        assert_eq!(second.discount, Some(0.35));
        assert_eq!(second.payment_terms, None);
        assert_eq!(second.shipping_terms.as_deref(), Some("EXW"));

        let loaded = Deal::find_by_brand_id(&db, brand.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, first.id);
    }

    #[tokio::test]
    async fn discount_outside_unit_interval_is_rejected() {
        let db = setup_db().await;
        let brand = make_brand(&db).await;

        let result = Deal::upsert(
            &db,
            brand.id,
            &UpsertDeal {
                discount: Some(30.0),
                ..Default::default()
            },
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn delete_by_brand_id() {
        let db = setup_db().await;
        let brand = make_brand(&db).await;

        Deal::upsert(&db, brand.id, &UpsertDeal::default()).await.unwrap();
        assert_eq!(Deal::delete_by_brand_id(&db, brand.id).await.unwrap(), 1);
        assert!(Deal::find_by_brand_id(&db, brand.id).await.unwrap().is_none());
    }
}
