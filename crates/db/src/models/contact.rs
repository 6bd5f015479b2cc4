use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::contact, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Contact {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_primary: bool,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct CreateContact {
    pub brand_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_primary: Option<bool>,
}

#[derive(Debug, Default, Deserialize, TS)]
pub struct UpdateContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_primary: Option<bool>,
}

impl Contact {
    async fn from_model<C: ConnectionTrait>(db: &C, model: contact::Model) -> Result<Self, DbErr> {
        let brand_id = ids::brand_uuid_by_id(db, model.brand_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            brand_id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            role: model.role,
            is_primary: model.is_primary,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = contact::Entity::find()
            .filter(contact::Column::Uuid.eq(id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    /// Contacts of a brand, primary first. Returns an empty list when the
    /// brand does not exist.
    pub async fn find_by_brand_id<C: ConnectionTrait>(
        db: &C,
        brand_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(brand_row_id) = ids::brand_id_by_uuid(db, brand_id).await? else {
            return Ok(Vec::new());
        };

        let models = contact::Entity::find()
            .filter(contact::Column::BrandId.eq(brand_row_id))
            .order_by_desc(contact::Column::IsPrimary)
            .order_by_asc(contact::Column::CreatedAt)
            .all(db)
            .await?;

        let mut contacts = Vec::with_capacity(models.len());
        for model in models {
            contacts.push(Self::from_model(db, model).await?);
        }
        Ok(contacts)
    }

    /// Clears the primary flag on every contact of the brand. Form-logic
    /// convention: at most one primary contact per brand.
    async fn demote_primaries<C: ConnectionTrait>(db: &C, brand_row_id: i64) -> Result<(), DbErr> {
        contact::Entity::update_many()
            .col_expr(contact::Column::IsPrimary, Expr::value(false))
            .filter(contact::Column::BrandId.eq(brand_row_id))
            .filter(contact::Column::IsPrimary.eq(true))
            .exec(db)
            .await?;
        Ok(())
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateContact,
        contact_id: Uuid,
    ) -> Result<Self, DbErr> {
        let brand_row_id = ids::brand_id_by_uuid(db, data.brand_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;

        let is_primary = data.is_primary.unwrap_or(false);
        if is_primary {
            Self::demote_primaries(db, brand_row_id).await?;
        }

        let now = Utc::now();
        let active = contact::ActiveModel {
            uuid: Set(contact_id),
            brand_id: Set(brand_row_id),
            name: Set(data.name.clone()),
            email: Set(data.email.clone()),
            phone: Set(data.phone.clone()),
            role: Set(data.role.clone()),
            is_primary: Set(is_primary),
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
        data: &UpdateContact,
    ) -> Result<Self, DbErr> {
        let record = contact::Entity::find()
            .filter(contact::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Contact not found".to_string()))?;

        if data.is_primary == Some(true) && !record.is_primary {
            Self::demote_primaries(db, record.brand_id).await?;
        }

        let mut active: contact::ActiveModel = record.into();
        if let Some(name) = data.name.clone() {
            active.name = Set(Some(name));
        }
        if let Some(email) = data.email.clone() {
            active.email = Set(Some(email));
        }
        if let Some(phone) = data.phone.clone() {
            active.phone = Set(Some(phone));
        }
        if let Some(role) = data.role.clone() {
            active.role = Set(Some(role));
        }
        if let Some(is_primary) = data.is_primary {
            active.is_primary = Set(is_primary);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Self::from_model(db, updated).await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = contact::Entity::delete_many()
            .filter(contact::Column::Uuid.eq(id))
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

    async fn make_brand(db: &sea_orm::DatabaseConnection, name: &str) -> Brand {
        Brand::create(
            db,
            &CreateBrand {
                name: name.to_string(),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn at_most_one_primary_per_brand() {
        let db = setup_db().await;
        let brand = make_brand(&db, "Brand").await;

        let first = Contact::create(
            &db,
            &CreateContact {
                brand_id: brand.id,
                name: Some("First".to_string()),
                is_primary: Some(true),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        assert!(first.is_primary);

        let second = Contact::create(
            &db,
            &CreateContact {
                brand_id: brand.id,
                name: Some("Second".to_string()),
                is_primary: Some(true),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        assert!(second.is_primary);

        let contacts = Contact::find_by_brand_id(&db, brand.id).await.unwrap();
        let primaries: Vec<_> = contacts.iter().filter(|c| c.is_primary).collect();
        assert_eq!(primaries.len(), 1);
        assert_eq!(primaries[0].id, second.id);
    }

    #[tokio::test]
    async fn promoting_via_update_demotes_sibling() {
        let db = setup_db().await;
        let brand = make_brand(&db, "Brand").await;

        let first = Contact::create(
            &db,
            &CreateContact {
                brand_id: brand.id,
                name: Some("First".to_string()),
                is_primary: Some(true),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let second = Contact::create(
            &db,
            &CreateContact {
                brand_id: brand.id,
                name: Some("Second".to_string()),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        assert!(!second.is_primary);

        Contact::update(
            &db,
            second.id,
            &UpdateContact {
                is_primary: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let first = Contact::find_by_id(&db, first.id).await.unwrap().unwrap();
        assert!(!first.is_primary);
    }

    #[tokio::test]
    async fn deleting_primary_does_not_touch_other_brands() {
        let db = setup_db().await;
        let brand_a = make_brand(&db, "A").await;
        let brand_b = make_brand(&db, "B").await;

        let primary_a = Contact::create(
            &db,
            &CreateContact {
                brand_id: brand_a.id,
                name: Some("Only".to_string()),
                is_primary: Some(true),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        Contact::create(
            &db,
            &CreateContact {
                brand_id: brand_b.id,
                name: Some("Other".to_string()),
                is_primary: Some(true),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        assert_eq!(Contact::delete(&db, primary_a.id).await.unwrap(), 1);
        assert!(
            Contact::find_by_brand_id(&db, brand_a.id)
                .await
                .unwrap()
                .is_empty()
        );

        let b_contacts = Contact::find_by_brand_id(&db, brand_b.id).await.unwrap();
        assert_eq!(b_contacts.len(), 1);
        assert!(b_contacts[0].is_primary);
    }

    #[tokio::test]
    async fn create_requires_live_brand() {
        let db = setup_db().await;
        let result = Contact::create(
            &db,
            &CreateContact {
                brand_id: Uuid::new_v4(),
                name: Some("Ghost".to_string()),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await;
        assert!(matches!(result, Err(DbErr::RecordNotFound(_))));
    }
}
