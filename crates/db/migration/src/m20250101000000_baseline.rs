use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Brands::Table)
                    .col(pk_id_col(manager, Brands::Id))
                    .col(uuid_col(Brands::Uuid))
                    .col(ColumnDef::new(Brands::Name).string().not_null())
                    .col(ColumnDef::new(Brands::BrandType).string())
                    .col(ColumnDef::new(Brands::Website).string())
                    .col(ColumnDef::new(Brands::Country).string())
                    .col(ColumnDef::new(Brands::CountryOfOrigin).string())
                    .col(ColumnDef::new(Brands::ProjectSectors).json())
                    .col(ColumnDef::new(Brands::DesignCategories).json())
                    .col(
                        ColumnDef::new(Brands::Status)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("prospect")),
                    )
                    .col(
                        ColumnDef::new(Brands::DealStage)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("lead")),
                    )
                    .col(ColumnDef::new(Brands::Priority).integer())
                    .col(ColumnDef::new(Brands::AnnualContractValue).double())
                    .col(ColumnDef::new(Brands::SalesOwner).string())
                    .col(timestamp_col(Brands::DateAdded))
                    .col(ColumnDef::new(Brands::LastContactDate).timestamp())
                    .col(ColumnDef::new(Brands::NextFollowupDate).timestamp())
                    .col(ColumnDef::new(Brands::ExcludedCategories).text())
                    .col(ColumnDef::new(Brands::Comments).text())
                    .col(
                        ColumnDef::new(Brands::Hide)
                            .boolean()
                            .not_null()
                            .default(Expr::val(false)),
                    )
                    .col(timestamp_col(Brands::CreatedAt))
                    .col(timestamp_col(Brands::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_brands_uuid")
                    .table(Brands::Table)
                    .col(Brands::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_brands_status")
                    .table(Brands::Table)
                    .col(Brands::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_brands_deal_stage")
                    .table(Brands::Table)
                    .col(Brands::DealStage)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Contacts::Table)
                    .col(pk_id_col(manager, Contacts::Id))
                    .col(uuid_col(Contacts::Uuid))
                    .col(fk_id_col(manager, Contacts::BrandId))
                    .col(ColumnDef::new(Contacts::Name).string())
                    .col(ColumnDef::new(Contacts::Email).string())
                    .col(ColumnDef::new(Contacts::Phone).string())
                    .col(ColumnDef::new(Contacts::Role).string())
                    .col(
                        ColumnDef::new(Contacts::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(Expr::val(false)),
                    )
                    .col(timestamp_col(Contacts::CreatedAt))
                    .col(timestamp_col(Contacts::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_contacts_uuid")
                    .table(Contacts::Table)
                    .col(Contacts::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_contacts_brand_id")
                    .table(Contacts::Table)
                    .col(Contacts::BrandId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Deals::Table)
                    .col(pk_id_col(manager, Deals::Id))
                    .col(uuid_col(Deals::Uuid))
                    .col(fk_id_col(manager, Deals::BrandId))
                    .col(ColumnDef::new(Deals::Discount).double())
                    .col(ColumnDef::new(Deals::PaymentTerms).string())
                    .col(ColumnDef::new(Deals::ShippingTerms).string())
                    .col(ColumnDef::new(Deals::FreightFreeLimit).double())
                    .col(ColumnDef::new(Deals::RrpIncVat).double())
                    .col(ColumnDef::new(Deals::RrpExcVat).double())
                    .col(ColumnDef::new(Deals::DealerAccess).string())
                    .col(ColumnDef::new(Deals::ContractStartDate).date())
                    .col(ColumnDef::new(Deals::ContractEndDate).date())
                    .col(ColumnDef::new(Deals::RenewalDate).date())
                    .col(ColumnDef::new(Deals::FirstPurchaseDate).date())
                    .col(ColumnDef::new(Deals::MinimumOrderValue).double())
                    .col(ColumnDef::new(Deals::CommissionStructure).text())
                    .col(timestamp_col(Deals::CreatedAt))
                    .col(timestamp_col(Deals::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_deals_uuid")
                    .table(Deals::Table)
                    .col(Deals::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One deal per brand.
        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_deals_brand_id")
                    .table(Deals::Table)
                    .col(Deals::BrandId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Communications::Table)
                    .col(pk_id_col(manager, Communications::Id))
                    .col(uuid_col(Communications::Uuid))
                    .col(fk_id_col(manager, Communications::BrandId))
                    .col(fk_id_nullable_col(manager, Communications::ContactId))
                    .col(
                        ColumnDef::new(Communications::CommType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(timestamp_col(Communications::Date))
                    .col(ColumnDef::new(Communications::Subject).string())
                    .col(ColumnDef::new(Communications::Summary).text())
                    .col(ColumnDef::new(Communications::Participants).string())
                    .col(
                        ColumnDef::new(Communications::FollowUpRequired)
                            .boolean()
                            .not_null()
                            .default(Expr::val(false)),
                    )
                    .col(ColumnDef::new(Communications::NextAction).string())
                    .col(ColumnDef::new(Communications::CreatedBy).string())
                    .col(timestamp_col(Communications::CreatedAt))
                    .col(timestamp_col(Communications::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_communications_uuid")
                    .table(Communications::Table)
                    .col(Communications::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_communications_brand_id")
                    .table(Communications::Table)
                    .col(Communications::BrandId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_communications_date")
                    .table(Communications::Table)
                    .col(Communications::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Documents::Table)
                    .col(pk_id_col(manager, Documents::Id))
                    .col(uuid_col(Documents::Uuid))
                    .col(fk_id_col(manager, Documents::BrandId))
                    .col(
                        ColumnDef::new(Documents::DocumentType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Documents::Name).string().not_null())
                    .col(ColumnDef::new(Documents::Url).string().not_null())
                    .col(ColumnDef::new(Documents::FileSize).big_integer())
                    .col(ColumnDef::new(Documents::Version).string())
                    .col(timestamp_col(Documents::UploadDate))
                    .col(ColumnDef::new(Documents::UploadedBy).string())
                    .col(timestamp_col(Documents::CreatedAt))
                    .col(timestamp_col(Documents::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_documents_uuid")
                    .table(Documents::Table)
                    .col(Documents::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_documents_brand_id")
                    .table(Documents::Table)
                    .col(Documents::BrandId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Tasks::Table)
                    .col(pk_id_col(manager, Tasks::Id))
                    .col(uuid_col(Tasks::Uuid))
                    .col(fk_id_col(manager, Tasks::BrandId))
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(ColumnDef::new(Tasks::Description).text())
                    .col(ColumnDef::new(Tasks::DueDate).timestamp())
                    .col(ColumnDef::new(Tasks::AssignedTo).string())
                    .col(
                        ColumnDef::new(Tasks::Status)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("pending")),
                    )
                    .col(
                        ColumnDef::new(Tasks::Priority)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("medium")),
                    )
                    .col(ColumnDef::new(Tasks::CreatedBy).string())
                    .col(ColumnDef::new(Tasks::CompletedAt).timestamp())
                    .col(timestamp_col(Tasks::CreatedAt))
                    .col(timestamp_col(Tasks::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tasks_uuid")
                    .table(Tasks::Table)
                    .col(Tasks::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tasks_brand_id")
                    .table(Tasks::Table)
                    .col(Tasks::BrandId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tasks_status")
                    .table(Tasks::Table)
                    .col(Tasks::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tasks_due_date")
                    .table(Tasks::Table)
                    .col(Tasks::DueDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Communications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Deals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Brands::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn pk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().auto_increment().primary_key().to_owned()
}

fn fk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().to_owned()
}

fn fk_id_nullable_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.to_owned()
}

fn uuid_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().to_owned()
}

fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
enum Brands {
    Table,
    Id,
    Uuid,
    Name,
    BrandType,
    Website,
    Country,
    CountryOfOrigin,
    ProjectSectors,
    DesignCategories,
    Status,
    DealStage,
    Priority,
    AnnualContractValue,
    SalesOwner,
    DateAdded,
    LastContactDate,
    NextFollowupDate,
    ExcludedCategories,
    Comments,
    Hide,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Contacts {
    Table,
    Id,
    Uuid,
    BrandId,
    Name,
    Email,
    Phone,
    Role,
    IsPrimary,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Deals {
    Table,
    Id,
    Uuid,
    BrandId,
    Discount,
    PaymentTerms,
    ShippingTerms,
    FreightFreeLimit,
    RrpIncVat,
    RrpExcVat,
    DealerAccess,
    ContractStartDate,
    ContractEndDate,
    RenewalDate,
    FirstPurchaseDate,
    MinimumOrderValue,
    CommissionStructure,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Communications {
    Table,
    Id,
    Uuid,
    BrandId,
    ContactId,
    CommType,
    Date,
    Subject,
    Summary,
    Participants,
    FollowUpRequired,
    NextAction,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Documents {
    Table,
    Id,
    Uuid,
    BrandId,
    DocumentType,
    Name,
    Url,
    FileSize,
    Version,
    UploadDate,
    UploadedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    Uuid,
    BrandId,
    Title,
    Description,
    DueDate,
    AssignedTo,
    Status,
    Priority,
    CreatedBy,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
