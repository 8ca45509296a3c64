//! Static catalog data: commission categories, their detail records, and the
//! item records the gallery pages are built from.
//!
//! The catalog is a TOML document, loaded once and immutable afterwards. A
//! stock catalog is embedded at compile time from `static/catalog.toml`; a
//! user catalog file replaces it entirely (no merging).
//!
//! ## File Layout
//!
//! ```toml
//! # Filter chips for the works gallery, in display order.
//! [[categories]]
//! key = "full"
//! label = "全身立繪"
//!
//! # Shared process tables, referenced by name from details.
//! [process]
//! standard = [
//!   { item = "01", desc = "需求確認" },
//! ]
//!
//! [details.full]
//! title = "全身立繪"
//! lead = "完整角色造型與服裝細節展示。"
//! process = "standard"          # or inline `process_rows = [...]`
//! notes = ["..."]
//! samples = [{ src = "images/mio.jpg", alt = "範例", caption = "範例" }]
//! price_rows = [{ item = "全身", desc = "...", price = "NT$ 1000 ~ 1400" }]
//!
//! [[works]]
//! id = "w01"
//! category = "full"
//! title = "Mio"
//! text = "city walk"
//! keywords = "mio city"
//! chips = ["全身"]
//! thumb = "images/mio.jpg"
//!
//! [[images]]
//! id = "i01"
//! category = "fanart"
//! title = "Cat"
//! desc = "line one\nline two"
//! tags = "cat chibi"
//! src = "images/cat.jpg"
//! ```
//!
//! Prices are display strings: the source data mixes fixed amounts, ranges,
//! multipliers and free text, so nothing here parses them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

const STOCK_CATALOG: &str = include_str!("../static/catalog.toml");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("detail '{key}' references unknown process table '{name}'")]
    UnknownProcessTable { key: String, name: String },
}

/// One example image in a category's sample gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub caption: String,
}

/// One row of the price table: three opaque display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRow {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub price: String,
}

/// One step of the commission process table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRow {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub desc: String,
}

/// Detail record shown in the works modal for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDetail {
    pub key: String,
    pub title: String,
    pub lead: String,
    pub samples: Vec<Sample>,
    pub price_rows: Vec<PriceRow>,
    pub process_rows: Vec<ProcessRow>,
    pub notes: Vec<String>,
}

/// A filter chip: category key plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    pub key: String,
    pub label: String,
}

/// A card in the works gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkRecord {
    pub id: String,
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    /// Free-text search keywords (space separated), not displayed.
    #[serde(default)]
    pub keywords: String,
    /// Tag chips displayed on the card.
    #[serde(default)]
    pub chips: Vec<String>,
    #[serde(default)]
    pub thumb: String,
}

/// A card in the "my images" gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRecord {
    pub id: String,
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    /// Space-separated tags.
    #[serde(default)]
    pub tags: String,
    pub src: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailFile {
    title: String,
    #[serde(default)]
    lead: String,
    #[serde(default)]
    samples: Vec<Sample>,
    #[serde(default)]
    price_rows: Vec<PriceRow>,
    #[serde(default)]
    process_rows: Vec<ProcessRow>,
    /// Name of a shared table in `[process]`; appended after inline rows.
    #[serde(default)]
    process: Option<String>,
    #[serde(default)]
    notes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<CategoryLabel>,
    #[serde(default)]
    image_categories: Vec<CategoryLabel>,
    #[serde(default)]
    process: BTreeMap<String, Vec<ProcessRow>>,
    #[serde(default)]
    details: BTreeMap<String, DetailFile>,
    #[serde(default)]
    works: Vec<WorkRecord>,
    #[serde(default)]
    images: Vec<ImageRecord>,
}

/// The loaded catalog.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    /// Works filter chips, in display order.
    pub categories: Vec<CategoryLabel>,
    /// My-images filter chips, in display order.
    pub image_categories: Vec<CategoryLabel>,
    pub details: BTreeMap<String, CategoryDetail>,
    pub works: Vec<WorkRecord>,
    pub images: Vec<ImageRecord>,
}

impl Catalog {
    /// The catalog embedded in the binary.
    pub fn stock() -> Result<Self, CatalogError> {
        Self::from_toml_str(STOCK_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut details = BTreeMap::new();
        for (key, raw) in file.details {
            let mut process_rows = raw.process_rows;
            if let Some(name) = raw.process {
                let shared = file.process.get(&name).ok_or_else(|| {
                    CatalogError::UnknownProcessTable {
                        key: key.clone(),
                        name: name.clone(),
                    }
                })?;
                process_rows.extend(shared.iter().cloned());
            }
            details.insert(
                key.clone(),
                CategoryDetail {
                    key,
                    title: raw.title,
                    lead: raw.lead,
                    samples: raw.samples,
                    price_rows: raw.price_rows,
                    process_rows,
                    notes: raw.notes,
                },
            );
        }
        Ok(Self {
            categories: file.categories,
            image_categories: file.image_categories,
            details,
            works: file.works,
            images: file.images,
        })
    }

    pub fn detail(&self, key: &str) -> Option<&CategoryDetail> {
        self.details.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stock_catalog_parses() {
        let catalog = Catalog::stock().unwrap();
        assert_eq!(catalog.details.len(), 6);
        assert!(!catalog.works.is_empty());
        assert!(!catalog.images.is_empty());
    }

    #[test]
    fn stock_categories_have_details() {
        let catalog = Catalog::stock().unwrap();
        for cat in &catalog.categories {
            assert!(
                catalog.detail(&cat.key).is_some(),
                "chip '{}' has no detail record",
                cat.key
            );
        }
    }

    #[test]
    fn stock_details_share_process_table() {
        let catalog = Catalog::stock().unwrap();
        let full = catalog.detail("full").unwrap();
        let chibi = catalog.detail("chibi").unwrap();
        assert_eq!(full.process_rows.len(), 5);
        assert_eq!(full.process_rows, chibi.process_rows);
        assert_eq!(full.process_rows[0].item, "01");
    }

    #[test]
    fn samples_keep_catalog_order() {
        let catalog = Catalog::stock().unwrap();
        let full = catalog.detail("full").unwrap();
        assert_eq!(full.samples[0].src, "images/mio.JPG");
        assert_eq!(full.samples[1].src, "images/miocity.JPG");
    }

    #[test]
    fn prices_stay_opaque_strings() {
        let catalog = Catalog::stock().unwrap();
        let full = catalog.detail("full").unwrap();
        let prices: Vec<&str> = full.price_rows.iter().map(|r| r.price.as_str()).collect();
        assert_eq!(prices[0], "NT$ 1000 ~ 1400");
        assert_eq!(prices[1], "×2");
    }

    #[test]
    fn inline_process_rows_precede_shared() {
        let toml = r#"
[process]
std = [{ item = "02", desc = "draft" }]

[details.x]
title = "X"
process_rows = [{ item = "01", desc = "brief" }]
process = "std"
"#;
        let catalog = Catalog::from_toml_str(toml).unwrap();
        let items: Vec<&str> = catalog.details["x"]
            .process_rows
            .iter()
            .map(|r| r.item.as_str())
            .collect();
        assert_eq!(items, vec!["01", "02"]);
    }

    #[test]
    fn unknown_process_table_is_error() {
        let toml = r#"
[details.x]
title = "X"
process = "missing"
"#;
        let err = Catalog::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownProcessTable { .. }));
    }

    #[test]
    fn unknown_work_field_rejected() {
        let toml = r#"
[[works]]
id = "1"
category = "full"
title = "t"
colour = "red"
"#;
        assert!(matches!(
            Catalog::from_toml_str(toml),
            Err(CatalogError::Toml(_))
        ));
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = Catalog::from_toml_str("").unwrap();
        assert!(catalog.details.is_empty());
        assert!(catalog.detail("full").is_none());
    }

    #[test]
    fn load_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("catalog.toml");
        fs::write(
            &path,
            r#"
[details.half]
title = "Half"
lead = "Bust"
"#,
        )
        .unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.detail("half").unwrap().title, "Half");
        assert_eq!(catalog.detail("half").unwrap().key, "half");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Catalog::load(&tmp.path().join("nope.toml")),
            Err(CatalogError::Io(_))
        ));
    }
}
