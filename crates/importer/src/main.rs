use std::collections::HashMap;

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDate;
use db::{
    DBService,
    models::{
        brand::{Brand, CreateBrand},
        contact::{Contact, CreateContact},
        deal::{Deal, UpsertDeal},
        document::{CreateDocument, Document},
        task::{CreateTask, Task},
    },
    types::DocumentType,
};
use importer::{
    is_status_marker, map_deal_stage, map_status, normalize_payment_terms,
    normalize_shipping_terms, parse_contact,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_WORKBOOK: &str = "Brands_List.xlsx";
const SHEET_NAME: &str = "Brands";
/// The sheet opens with three key/label rows below the header.
const KEY_ROWS: usize = 3;
const PROGRESS_EVERY: u64 = 50;

type ColumnMap = HashMap<String, usize>;

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => format!("{}", f),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({:?})", e),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

fn text(columns: &ColumnMap, row: &[Data], key: &str) -> Option<String> {
    let index = *columns.get(key)?;
    let value = cell_to_string(row.get(index)?);
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn number(columns: &ColumnMap, row: &[Data], key: &str) -> Option<f64> {
    let index = *columns.get(key)?;
    match row.get(index)? {
        Data::Int(n) => Some(*n as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn truthy(columns: &ColumnMap, row: &[Data], key: &str) -> bool {
    let Some(index) = columns.get(key) else {
        return false;
    };
    match row.get(*index) {
        Some(Data::Bool(b)) => *b,
        Some(Data::Int(n)) => *n != 0,
        Some(Data::Float(f)) => *f != 0.0,
        Some(Data::String(s)) => !s.trim().is_empty(),
        _ => false,
    }
}

async fn import_row(db: &DBService, columns: &ColumnMap, row: &[Data], name: &str) -> Result<()> {
    let status = map_status(name);
    let deal_stage = map_deal_stage(&status);

    let brand = Brand::create(
        &db.pool,
        &CreateBrand {
            name: name.to_string(),
            brand_type: text(columns, row, "Type"),
            website: text(columns, row, "Website"),
            status: Some(status),
            deal_stage: Some(deal_stage),
            priority: number(columns, row, "Priority (1: Highest)").map(|p| p as i32),
            excluded_categories: text(columns, row, "Excluded categories"),
            comments: text(columns, row, "Comments"),
            hide: Some(truthy(columns, row, "Hide")),
            ..Default::default()
        },
        Uuid::new_v4(),
    )
    .await?;

    let contact_person = text(columns, row, "Contact person");
    let contact_email = text(columns, row, "Contact Email");
    if contact_person.is_some() || contact_email.is_some() {
        let parsed = parse_contact(contact_person.as_deref().unwrap_or_default());
        Contact::create(
            &db.pool,
            &CreateContact {
                brand_id: brand.id,
                name: parsed.name,
                email: contact_email.or(parsed.email),
                is_primary: Some(true),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await?;
    }

    let discount = number(columns, row, "Discount");
    let payment_terms = text(columns, row, "Payment Terms");
    let shipping_terms = text(columns, row, "Shipping terms");
    if discount.is_some() || payment_terms.is_some() || shipping_terms.is_some() {
        Deal::upsert(
            &db.pool,
            brand.id,
            &UpsertDeal {
                discount,
                payment_terms: payment_terms.map(|t| normalize_payment_terms(&t)),
                shipping_terms: shipping_terms.map(|t| normalize_shipping_terms(&t)),
                freight_free_limit: number(columns, row, "Freight free limit"),
                rrp_inc_vat: number(columns, row, "rrp inc VAT"),
                rrp_exc_vat: number(columns, row, "rrp exc VAT"),
                dealer_access: text(columns, row, "Dealer Access"),
                first_purchase_date: text(columns, row, "1st purchase made")
                    .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
                ..Default::default()
            },
        )
        .await?;
    }

    // Document cells hold either a yes/no marker or a link worth keeping.
    let mut documents = Vec::new();
    if let Some(master_data) = text(columns, row, "Master data")
        && !master_data.eq_ignore_ascii_case("no")
    {
        documents.push((DocumentType::MasterData, "Master Data", master_data));
    }
    if let Some(price_list) = text(columns, row, "Price list")
        && price_list != "Yes"
    {
        documents.push((DocumentType::PriceList, "Price List", price_list));
    }
    if let Some(images) = text(columns, row, "Images") {
        documents.push((DocumentType::Images, "Images", images));
    }
    for (document_type, doc_name, url) in documents {
        Document::create(
            &db.pool,
            &CreateDocument {
                brand_id: brand.id,
                document_type,
                name: doc_name.to_string(),
                url,
                file_size: None,
                version: None,
                upload_date: None,
                uploaded_by: None,
            },
            Uuid::new_v4(),
        )
        .await?;
    }

    if let Some(action) = text(columns, row, "Action") {
        Task::create(
            &db.pool,
            &CreateTask::from_title(brand.id, action),
            Uuid::new_v4(),
        )
        .await?;
    }

    Ok(())
}

async fn run(path: &str) -> Result<()> {
    tracing::info!("Starting data migration from {path}");

    let db = DBService::new()
        .await
        .context("Failed to open the database")?;

    let mut workbook = open_workbook_auto(path).with_context(|| format!("Failed to open {path}"))?;
    let range = workbook
        .worksheet_range(SHEET_NAME)
        .with_context(|| format!("Workbook has no '{SHEET_NAME}' sheet"))?;

    let mut rows = range.rows();
    let header = rows.next().context("Sheet is empty")?;
    let columns: ColumnMap = header
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| {
            let label = cell_to_string(cell).trim().to_string();
            (!label.is_empty()).then_some((label, index))
        })
        .collect();
    anyhow::ensure!(
        columns.contains_key("Brand"),
        "Sheet has no 'Brand' column"
    );

    let mut imported = 0u64;
    let mut skipped = 0u64;
    let mut errors = 0u64;

    for row in rows.skip(KEY_ROWS) {
        let Some(name) = text(&columns, row, "Brand") else {
            continue;
        };
        if is_status_marker(&name) {
            skipped += 1;
            continue;
        }

        match import_row(&db, &columns, row, &name).await {
            Ok(()) => {
                imported += 1;
                if imported % PROGRESS_EVERY == 0 {
                    tracing::info!("Imported {imported} brands...");
                }
            }
            Err(err) => {
                tracing::error!("Failed to import '{name}': {err:#}");
                errors += 1;
            }
        }
    }

    tracing::info!(imported, skipped, errors, "Migration complete");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_WORKBOOK.to_string());
    run(&path).await
}
