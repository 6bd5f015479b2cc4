use sea_orm::entity::prelude::*;

use crate::types::{BrandStatus, DealStage};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "brands")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub brand_type: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub country_of_origin: Option<String>,
    pub project_sectors: Option<Json>,
    pub design_categories: Option<Json>,
    pub status: BrandStatus,
    pub deal_stage: DealStage,
    pub priority: Option<i32>,
    pub annual_contract_value: Option<f64>,
    pub sales_owner: Option<String>,
    pub date_added: DateTimeUtc,
    pub last_contact_date: Option<DateTimeUtc>,
    pub next_followup_date: Option<DateTimeUtc>,
    pub excluded_categories: Option<String>,
    pub comments: Option<String>,
    pub hide: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
