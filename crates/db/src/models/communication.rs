use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub use crate::types::CommunicationType;

use crate::{
    entities::{brand, communication},
    models::{brand::Brand, ids},
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Communication {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub contact_id: Option<Uuid>,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub comm_type: CommunicationType,
    #[ts(type = "Date")]
    pub date: DateTime<Utc>,
    pub subject: Option<String>,
    pub summary: Option<String>,
    pub participants: Option<String>,
    pub follow_up_required: bool,
    pub next_action: Option<String>,
    pub created_by: Option<String>,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

/// Communication joined with the owning brand's name, for the cross-brand
/// log views.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CommunicationWithBrand {
    #[serde(flatten)]
    #[ts(flatten)]
    pub communication: Communication,
    pub brand_name: String,
}

impl std::ops::Deref for CommunicationWithBrand {
    type Target = Communication;
    fn deref(&self) -> &Self::Target {
        &self.communication
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateCommunication {
    pub brand_id: Uuid,
    pub contact_id: Option<Uuid>,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub comm_type: CommunicationType,
    pub date: Option<DateTime<Utc>>,
    pub subject: Option<String>,
    pub summary: Option<String>,
    pub participants: Option<String>,
    pub follow_up_required: Option<bool>,
    pub next_action: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
pub struct UpdateCommunication {
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub comm_type: Option<CommunicationType>,
    pub date: Option<DateTime<Utc>>,
    pub subject: Option<String>,
    pub summary: Option<String>,
    pub participants: Option<String>,
    pub follow_up_required: Option<bool>,
    pub next_action: Option<String>,
}

impl Communication {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: communication::Model,
    ) -> Result<Self, DbErr> {
        let brand_id = ids::brand_uuid_by_id(db, model.brand_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;
        let contact_id = match model.contact_id {
            Some(id) => ids::contact_uuid_by_id(db, id).await?,
            None => None,
        };
        Ok(Self {
            id: model.uuid,
            brand_id,
            contact_id,
            comm_type: model.comm_type,
            date: model.date.into(),
            subject: model.subject,
            summary: model.summary,
            participants: model.participants,
            follow_up_required: model.follow_up_required,
            next_action: model.next_action,
            created_by: model.created_by,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = communication::Entity::find()
            .filter(communication::Column::Uuid.eq(id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    /// A brand's communication log, newest first.
    pub async fn find_by_brand_id<C: ConnectionTrait>(
        db: &C,
        brand_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(brand_row_id) = ids::brand_id_by_uuid(db, brand_id).await? else {
            return Ok(Vec::new());
        };

        let models = communication::Entity::find()
            .filter(communication::Column::BrandId.eq(brand_row_id))
            .order_by_desc(communication::Column::Date)
            .all(db)
            .await?;

        let mut communications = Vec::with_capacity(models.len());
        for model in models {
            communications.push(Self::from_model(db, model).await?);
        }
        Ok(communications)
    }

    /// Most recent communications across every brand, each carrying the
    /// brand's name.
    pub async fn find_recent<C: ConnectionTrait>(
        db: &C,
        limit: u64,
    ) -> Result<Vec<CommunicationWithBrand>, DbErr> {
        let models = communication::Entity::find()
            .order_by_desc(communication::Column::Date)
            .limit(limit)
            .all(db)
            .await?;

        let mut brand_names: HashMap<i64, String> = HashMap::new();
        let mut entries = Vec::with_capacity(models.len());
        for model in models {
            let brand_row_id = model.brand_id;
            let brand_name = match brand_names.get(&brand_row_id) {
                Some(name) => name.clone(),
                None => {
                    let name: String = brand::Entity::find()
                        .select_only()
                        .column(brand::Column::Name)
                        .filter(brand::Column::Id.eq(brand_row_id))
                        .into_tuple()
                        .one(db)
                        .await?
                        .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;
                    brand_names.insert(brand_row_id, name.clone());
                    name
                }
            };
            entries.push(CommunicationWithBrand {
                communication: Self::from_model(db, model).await?,
                brand_name,
            });
        }
        Ok(entries)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateCommunication,
        communication_id: Uuid,
    ) -> Result<Self, DbErr> {
        let brand_row_id = ids::brand_id_by_uuid(db, data.brand_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;
        let contact_row_id = match data.contact_id {
            Some(id) => ids::contact_id_by_uuid(db, id)
                .await?
                .ok_or(DbErr::RecordNotFound("Contact not found".to_string()))
                .map(Some)?,
            None => None,
        };

        let now = Utc::now();
        let date = data.date.unwrap_or(now);
        let active = communication::ActiveModel {
            uuid: Set(communication_id),
            brand_id: Set(brand_row_id),
            contact_id: Set(contact_row_id),
            comm_type: Set(data.comm_type.clone()),
            date: Set(date.into()),
            subject: Set(data.subject.clone()),
            summary: Set(data.summary.clone()),
            participants: Set(data.participants.clone()),
            follow_up_required: Set(data.follow_up_required.unwrap_or(false)),
            next_action: Set(data.next_action.clone()),
            created_by: Set(data.created_by.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active.insert(db).await?;

        // Logging a communication counts as contact with the brand.
        if let Err(err) = Brand::touch_last_contact(db, data.brand_id, date).await {
            tracing::warn!("Failed to update brand last contact date: {}", err);
        }

        Self::from_model(db, model).await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateCommunication,
    ) -> Result<Self, DbErr> {
        let record = communication::Entity::find()
            .filter(communication::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Communication not found".to_string()))?;

        let mut active: communication::ActiveModel = record.into();
        if let Some(comm_type) = data.comm_type.clone() {
            active.comm_type = Set(comm_type);
        }
        if let Some(date) = data.date {
            active.date = Set(date.into());
        }
        if let Some(subject) = data.subject.clone() {
            active.subject = Set(Some(subject));
        }
        if let Some(summary) = data.summary.clone() {
            active.summary = Set(Some(summary));
        }
        if let Some(participants) = data.participants.clone() {
            active.participants = Set(Some(participants));
        }
        if let Some(follow_up_required) = data.follow_up_required {
            active.follow_up_required = Set(follow_up_required);
        }
        if let Some(next_action) = data.next_action.clone() {
            active.next_action = Set(Some(next_action));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Self::from_model(db, updated).await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = communication::Entity::delete_many()
            .filter(communication::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
