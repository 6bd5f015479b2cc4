use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "deals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uuid: Uuid,
    pub brand_id: i64,
    pub discount: Option<f64>,
    pub payment_terms: Option<String>,
    pub shipping_terms: Option<String>,
    pub freight_free_limit: Option<f64>,
    pub rrp_inc_vat: Option<f64>,
    pub rrp_exc_vat: Option<f64>,
    pub dealer_access: Option<String>,
    pub contract_start_date: Option<Date>,
    pub contract_end_date: Option<Date>,
    pub renewal_date: Option<Date>,
    pub first_purchase_date: Option<Date>,
    pub minimum_order_value: Option<f64>,
    pub commission_structure: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
