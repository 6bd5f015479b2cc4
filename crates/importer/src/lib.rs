//! Heuristics for translating the hand-maintained spreadsheet into clean
//! CRM records. Kept as pure functions so the mapping rules are testable
//! without a workbook or a database.

use std::sync::LazyLock;

use db::types::{BrandStatus, DealStage};
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+@[^)]+)\)").expect("email regex"));
static CONTACT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(Info|Contact form|Contact):?\s*").expect("prefix regex"));

/// Rows whose brand cell is one of the sheet's section markers rather than
/// an actual brand.
const STATUS_MARKERS: &[&str] = &["Connected", "Not relevant at all/now", "KEY"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedContact {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub fn is_status_marker(brand_cell: &str) -> bool {
    STATUS_MARKERS.contains(&brand_cell)
}

/// The sheet encoded status inside the brand cell itself.
pub fn map_status(brand_name: &str) -> BrandStatus {
    let name = brand_name.to_lowercase();
    if name.contains("connected") {
        BrandStatus::Active
    } else if name.contains("not relevant") {
        BrandStatus::NotRelevant
    } else {
        BrandStatus::Prospect
    }
}

pub fn map_deal_stage(status: &BrandStatus) -> DealStage {
    match status {
        BrandStatus::Active => DealStage::Won,
        BrandStatus::NotRelevant => DealStage::Lost,
        _ => DealStage::Lead,
    }
}

/// Splits a free-form "Name (email@host)" cell into its parts, stripping
/// the `Info:` / `Contact form:` / `Contact:` prefixes the sheet used.
pub fn parse_contact(contact_cell: &str) -> ParsedContact {
    let email = EMAIL_RE
        .captures(contact_cell)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string());

    let name_part = contact_cell
        .split('(')
        .next()
        .unwrap_or_default()
        .trim();
    let name = CONTACT_PREFIX_RE.replace(name_part, "").trim().to_string();

    ParsedContact {
        name: (!name.is_empty()).then_some(name),
        email,
    }
}

pub fn normalize_payment_terms(terms: &str) -> String {
    let t = terms.to_lowercase();
    if t.contains("prepay") {
        "Prepayment".to_string()
    } else if t.contains("net") && t.contains("30") {
        "Net 30".to_string()
    } else if t.contains("net") && t.contains("14") {
        "Net 14".to_string()
    } else if t.contains("ex works") {
        "EX WORKS".to_string()
    } else {
        terms.to_string()
    }
}

pub fn normalize_shipping_terms(terms: &str) -> String {
    let t = terms.to_lowercase();
    if t.contains("exw") || t.contains("ex works") {
        "EXW".to_string()
    } else if t.contains("dap") {
        "DAP".to_string()
    } else {
        terms.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_comes_from_the_brand_cell() {
        assert_eq!(map_status("Flos (Connected)"), BrandStatus::Active);
        assert_eq!(map_status("Muuto - NOT RELEVANT"), BrandStatus::NotRelevant);
        assert_eq!(map_status("Vitra"), BrandStatus::Prospect);
    }

    #[test]
    fn deal_stage_follows_status() {
        assert_eq!(map_deal_stage(&BrandStatus::Active), DealStage::Won);
        assert_eq!(map_deal_stage(&BrandStatus::NotRelevant), DealStage::Lost);
        assert_eq!(map_deal_stage(&BrandStatus::Prospect), DealStage::Lead);
        assert_eq!(map_deal_stage(&BrandStatus::Negotiation), DealStage::Lead);
    }

    #[test]
    fn contact_cell_splits_into_name_and_email() {
        assert_eq!(
            parse_contact("Maria Rossi (maria@flos.com)"),
            ParsedContact {
                name: Some("Maria Rossi".to_string()),
                email: Some("maria@flos.com".to_string()),
            }
        );
    }

    #[test]
    fn contact_prefixes_are_stripped() {
        assert_eq!(
            parse_contact("Info: sales team (info@vitra.com)"),
            ParsedContact {
                name: Some("sales team".to_string()),
                email: Some("info@vitra.com".to_string()),
            }
        );
        assert_eq!(
            parse_contact("Contact form:"),
            ParsedContact {
                name: None,
                email: None,
            }
        );
    }

    #[test]
    fn payment_terms_are_normalized() {
        assert_eq!(normalize_payment_terms("100% prepayment"), "Prepayment");
        assert_eq!(normalize_payment_terms("Net 30 days"), "Net 30");
        assert_eq!(normalize_payment_terms("net14"), "Net 14");
        assert_eq!(normalize_payment_terms("Ex Works Milano"), "EX WORKS");
        assert_eq!(normalize_payment_terms("on invoice"), "on invoice");
    }

    #[test]
    fn shipping_terms_are_normalized() {
        assert_eq!(normalize_shipping_terms("EXW factory"), "EXW");
        assert_eq!(normalize_shipping_terms("ex works"), "EXW");
        assert_eq!(normalize_shipping_terms("DAP Stockholm"), "DAP");
        assert_eq!(normalize_shipping_terms("FOB"), "FOB");
    }

    #[test]
    fn marker_rows_are_recognized() {
        assert!(is_status_marker("Connected"));
        assert!(is_status_marker("Not relevant at all/now"));
        assert!(is_status_marker("KEY"));
        assert!(!is_status_marker("Flos"));
    }
}
