//! # Initialisation Catalogue
//!
//! Static data a client downloads once on startup: the selectable store and
//! product types, the bulk products with their fixed ids, and the measurement
//! units with their conversion factors.
//!
//! ```text
//! formats
//! ├── volume
//! │   ├── ml  (1000 ml = 1 l)
//! │   └── l
//! └── weight
//!     ├── gr  (1000 gr = 1 kg)
//!     └── kg
//! ```

use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{ProductType, StoreType};
use crate::{BULK_PRODUCT_FRUIT, BULK_PRODUCT_MEAT, BULK_PRODUCT_VEGETABLE};

/// Size format category for weighed goods.
pub const SIZE_FORMAT_WEIGHT: &str = "weight";
/// Size format category for liquids.
pub const SIZE_FORMAT_VOLUME: &str = "volume";

pub const UNIT_GRAM: &str = "gr";
pub const UNIT_KILOGRAM: &str = "kg";
pub const UNIT_MILLILITER: &str = "ml";
pub const UNIT_LITER: &str = "l";

/// A selectable option: display name plus the value to send back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRow {
    pub name: String,
    pub field: String,
}

/// A bulk product and the size format it is measured in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkProduct {
    pub field: String,
    pub name: String,
    pub format: String,
}

/// A measurement unit and how it converts to its sibling units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitFormat {
    pub field: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub conversion: BTreeMap<String, f64>,
}

/// Payload of `GET /init`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppInitialisation {
    #[serde(rename = "store_type")]
    pub store_types: Vec<CatalogRow>,
    pub product_types: Vec<CatalogRow>,
    pub bulk_products: Vec<BulkProduct>,
    pub formats: BTreeMap<String, BTreeMap<String, UnitFormat>>,
}

fn row(name: &str, field: &str) -> CatalogRow {
    CatalogRow {
        name: name.to_string(),
        field: field.to_string(),
    }
}

fn bulk(name: &str, id: &str) -> BulkProduct {
    BulkProduct {
        field: id.to_string(),
        name: name.to_string(),
        format: SIZE_FORMAT_WEIGHT.to_string(),
    }
}

fn unit(field: &str, name: &str, kind: &str, to: &str, factor: f64) -> (String, UnitFormat) {
    (
        field.to_string(),
        UnitFormat {
            field: field.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            conversion: BTreeMap::from([(to.to_string(), factor)]),
        },
    )
}

/// Builds the initialisation payload.
pub fn app_initialisation() -> AppInitialisation {
    let volume = BTreeMap::from([
        unit(UNIT_MILLILITER, "milliliter", SIZE_FORMAT_VOLUME, UNIT_LITER, 1000.0),
        unit(UNIT_LITER, "liter", SIZE_FORMAT_VOLUME, UNIT_MILLILITER, 0.001),
    ]);
    let weight = BTreeMap::from([
        unit(UNIT_GRAM, "grams", SIZE_FORMAT_WEIGHT, UNIT_KILOGRAM, 1000.0),
        unit(UNIT_KILOGRAM, "kilograms", SIZE_FORMAT_WEIGHT, UNIT_GRAM, 0.001),
    ]);

    AppInitialisation {
        store_types: vec![
            row("shop", StoreType::Shop.as_str()),
            row("web", StoreType::Web.as_str()),
        ],
        product_types: vec![
            row("Bulk", ProductType::BulkProduct.as_str()),
            row("Barcoded", ProductType::BarcodedProduct.as_str()),
        ],
        bulk_products: vec![
            bulk("Meat", BULK_PRODUCT_MEAT),
            bulk("Vegetable", BULK_PRODUCT_VEGETABLE),
            bulk("Fruit", BULK_PRODUCT_FRUIT),
        ],
        formats: BTreeMap::from([
            (SIZE_FORMAT_VOLUME.to_string(), volume),
            (SIZE_FORMAT_WEIGHT.to_string(), weight),
        ]),
    }
}
