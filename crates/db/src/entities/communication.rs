use sea_orm::entity::prelude::*;

use crate::types::CommunicationType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "communications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uuid: Uuid,
    pub brand_id: i64,
    pub contact_id: Option<i64>,
    pub comm_type: CommunicationType,
    pub date: DateTimeUtc,
    pub subject: Option<String>,
    pub summary: Option<String>,
    pub participants: Option<String>,
    pub follow_up_required: bool,
    pub next_action: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
