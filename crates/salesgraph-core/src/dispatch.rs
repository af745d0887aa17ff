//! # Variant Dispatcher
//!
//! Picks the item variant for a catalog row or a sale-line row and converts
//! the remaining fields into that variant's quantities.
//!
//! ## Sale-Line Table
//! ```text
//! ┌──────────────────┬─────────────────────────────┬──────────────────────┐
//! │ Catalog variant  │ Extra fields (after codes)  │ Produces             │
//! ├──────────────────┼─────────────────────────────┼──────────────────────┤
//! │ Product          │ none                        │ Purchase             │
//! │ Product          │ start date, end date        │ Lease                │
//! │ Service          │ hours, servicer uuid        │ Service line         │
//! │ Data             │ GBs                         │ Data line            │
//! │ Voice            │ phone, days                 │ Voice line           │
//! │ anything else    │ any other count             │ Skip                 │
//! └──────────────────┴─────────────────────────────┴──────────────────────┘
//! ```

use crate::error::{LoadError, LoadResult};
use crate::item::{Item, ItemKind};
use crate::parser::{ItemRow, Parsed, SaleLineRow};
use crate::record::{parse_count, parse_date, parse_quantity};
use crate::resolver::{PersonRole, Resolver};

/// Builds the catalog entry for an item row.
///
/// An unrecognized type code is a skip.
pub fn catalog_item(row: ItemRow) -> Parsed<Item> {
    match ItemKind::from_code(&row.type_code) {
        Some(kind) => Parsed::Row(Item::catalog(kind, row.code, row.name, row.price)),
        None => Parsed::Skip(format!("unknown item type '{}'", row.type_code)),
    }
}

/// Builds a fresh sale-line item from its catalog entry.
///
/// ## Errors
/// - `MissingReference` when a service line names an unknown servicer
/// - `InvalidField` when a quantity or date does not parse
/// - `Domain` when a lease term is zero months
pub fn sale_line(catalog: &Item, line: &SaleLineRow, resolver: &Resolver<'_>) -> LoadResult<Parsed<Item>> {
    let row = line.row;
    let extra: Vec<&str> = line.extra.iter().map(String::as_str).collect();

    let item = match (catalog, extra.as_slice()) {
        (Item::Product(product), []) => Item::Purchase(product.purchase()),
        (Item::Product(product), [start, end]) => {
            let start = parse_date(row, "startDate", start)?;
            let end = parse_date(row, "endDate", end)?;
            let lease = product
                .lease(start, end)
                .map_err(|source| LoadError::Domain { row, source })?;
            Item::Lease(lease)
        }
        (Item::Service(service), [hours, servicer_uuid]) => {
            let hours = parse_quantity(row, "numHours", hours)?;
            let context = format!("sale {} line {}", line.sale_code, row);
            let servicer = resolver.person(servicer_uuid, PersonRole::Servicer, &context)?;
            Item::Service(service.line(hours, servicer))
        }
        (Item::Data(data), [gbs]) => Item::Data(data.line(parse_quantity(row, "numGBs", gbs)?)),
        (Item::Voice(voice), [phone, days]) => {
            Item::Voice(voice.line(*phone, parse_count(row, "numDays", days)?))
        }
        (catalog, extra) => {
            return Ok(Parsed::Skip(format!(
                "{} item {} cannot take {} extra fields",
                catalog.kind(),
                catalog.code(),
                extra.len()
            )))
        }
    };
    Ok(Parsed::Row(item))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::UnitPrice;
    use crate::registry::Registry;
    use crate::types::{Address, Person};
    use std::sync::Arc;

    fn persons() -> Registry<Arc<Person>> {
        let mut registry = Registry::new();
        registry
            .insert(Arc::new(Person::new(
                "srv-1",
                "Hopper",
                "Grace",
                Address::new("1 Main St", "Lincoln", "NE", "68508"),
            )))
            .unwrap();
        registry
    }

    fn line(extra: &[&str]) -> SaleLineRow {
        SaleLineRow {
            row: 3,
            sale_code: "S001".to_string(),
            item_code: "X".to_string(),
            extra: extra.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn item_row(type_code: &str) -> ItemRow {
        ItemRow {
            code: "X01".to_string(),
            type_code: type_code.to_string(),
            name: "Thing".to_string(),
            price: UnitPrice::new(10.0),
        }
    }

    fn dispatch(catalog: &Item, extra: &[&str]) -> LoadResult<Parsed<Item>> {
        let persons = persons();
        sale_line(catalog, &line(extra), &Resolver::persons(&persons))
    }

    #[test]
    fn test_catalog_dispatch_by_discriminant() {
        for (code, kind) in [
            ("V", ItemKind::Voice),
            ("D", ItemKind::Data),
            ("S", ItemKind::Service),
            ("P", ItemKind::Product),
        ] {
            let Parsed::Row(item) = catalog_item(item_row(code)) else {
                panic!("expected {}", code);
            };
            assert_eq!(item.kind(), kind);
        }
        assert!(matches!(catalog_item(item_row("Z")), Parsed::Skip(_)));
    }

    #[test]
    fn test_product_becomes_purchase_or_lease() {
        let product = Item::catalog(ItemKind::Product, "P01", "Laptop", UnitPrice::new(1200.0));

        assert!(matches!(dispatch(&product, &[]).unwrap(), Parsed::Row(Item::Purchase(_))));
        let Parsed::Row(Item::Lease(lease)) =
            dispatch(&product, &["2024-01-01", "2024-07-01"]).unwrap()
        else {
            panic!("expected a lease");
        };
        assert_eq!(lease.term_months(), 6);
        assert!(matches!(dispatch(&product, &["2024-01-01"]).unwrap(), Parsed::Skip(_)));
    }

    #[test]
    fn test_zero_term_lease_is_domain_failure() {
        let product = Item::catalog(ItemKind::Product, "P01", "Laptop", UnitPrice::new(1200.0));
        let err = dispatch(&product, &["2024-01-01", "2024-01-20"]).unwrap_err();
        assert!(matches!(err, LoadError::Domain { row: 3, .. }));
    }

    #[test]
    fn test_service_requires_known_servicer() {
        let service = Item::catalog(ItemKind::Service, "S01", "Repair", UnitPrice::new(40.0));

        let Parsed::Row(Item::Service(line)) = dispatch(&service, &["2", "srv-1"]).unwrap() else {
            panic!("expected a service line");
        };
        assert_eq!(line.num_hours, 2.0);
        assert_eq!(line.servicer.unwrap().uuid, "srv-1");

        let err = dispatch(&service, &["2", "nobody"]).unwrap_err();
        assert!(matches!(err, LoadError::MissingReference { kind: "Person", .. }));
    }

    #[test]
    fn test_data_and_voice_lines() {
        let data = Item::catalog(ItemKind::Data, "D01", "5G", UnitPrice::new(10.0));
        let Parsed::Row(Item::Data(d)) = dispatch(&data, &["2.5"]).unwrap() else {
            panic!("expected a data line");
        };
        assert_eq!(d.num_gbs, 2.5);

        let voice = Item::catalog(ItemKind::Voice, "V01", "Talk", UnitPrice::new(30.0));
        let Parsed::Row(Item::Voice(v)) = dispatch(&voice, &["402-555-0100", "15"]).unwrap() else {
            panic!("expected a voice line");
        };
        assert_eq!(v.phone.as_deref(), Some("402-555-0100"));
        assert_eq!(v.num_days, 15);

        assert!(matches!(dispatch(&voice, &["402-555-0100"]).unwrap(), Parsed::Skip(_)));
        assert!(dispatch(&voice, &["402-555-0100", "fifteen"]).is_err());
    }
}
