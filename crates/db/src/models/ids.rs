use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::entities::{brand, contact};

pub async fn brand_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    brand::Entity::find()
        .select_only()
        .column(brand::Column::Id)
        .filter(brand::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn brand_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    brand::Entity::find()
        .select_only()
        .column(brand::Column::Uuid)
        .filter(brand::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn contact_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    contact::Entity::find()
        .select_only()
        .column(contact::Column::Id)
        .filter(contact::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn contact_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    contact::Entity::find()
        .select_only()
        .column(contact::Column::Uuid)
        .filter(contact::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
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

    #[tokio::test]
    async fn brand_ids_roundtrip() {
        let db = setup_db().await;

        let brand_id = Uuid::new_v4();
        let brand = Brand::create(
            &db,
            &CreateBrand {
                name: "Test brand".to_string(),
                ..Default::default()
            },
            brand_id,
        )
        .await
        .unwrap();
        assert_eq!(brand.id, brand_id);

        let row_id = brand_id_by_uuid(&db, brand_id)
            .await
            .unwrap()
            .expect("brand row id");
        assert_eq!(brand_uuid_by_id(&db, row_id).await.unwrap(), Some(brand_id));

        assert_eq!(brand_id_by_uuid(&db, Uuid::new_v4()).await.unwrap(), None);
    }
}
