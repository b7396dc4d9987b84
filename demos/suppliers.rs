//! Binds a small supplier/product table and prints the results.
//!
//! Run with `RUST_LOG=debug cargo run --example suppliers` to see the
//! binder's logging. Pass a CSV path to bind that file instead of the
//! built-in table.

use std::fmt;
use std::path::Path;

use rowbind::metadata::{Bindable, Field, PropertyDef};
use rowbind::storage::CsvLoadConfig;
use rowbind::types::{DbType, Row, RowSet};
use rowbind::{Binder, Result};
use rust_decimal::Decimal;

#[derive(Default)]
struct Supplier {
    name: Field<String>,
    number_of_employees: Field<i32>,
    markup: Field<Decimal>,
}

impl Supplier {
    fn name(&self) -> Result<Option<&String>> {
        self.name.read::<Self>("name")
    }

    fn number_of_employees(&self) -> Result<Option<&i32>> {
        self.number_of_employees.read::<Self>("number_of_employees")
    }

    fn markup(&self) -> Result<Option<&Decimal>> {
        self.markup.read::<Self>("markup")
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_option().map_or("", String::as_str))
    }
}

impl Bindable for Supplier {
    const TYPE_NAME: &'static str = "Supplier";

    fn properties() -> Vec<PropertyDef<Self>> {
        vec![
            PropertyDef::new("name").column(
                "sup_CompanyName",
                DbType::NVarChar,
                |s: &mut Self, v| s.name.assign(v),
            ),
            PropertyDef::new("number_of_employees").column(
                "sup_TotalEmployees",
                DbType::Int,
                |s: &mut Self, v| s.number_of_employees.assign(v),
            ),
            PropertyDef::new("markup").column(
                "sup_markup",
                DbType::Decimal,
                |s: &mut Self, v| s.markup.assign(v),
            ),
        ]
    }

    fn is_empty(&self) -> bool {
        self.name.as_option().map_or(true, |n| n.trim().is_empty())
    }
}

#[derive(Default)]
struct Product {
    name: Field<String>,
    in_stock: Field<i32>,
    price: Field<Decimal>,
    supplier: Field<Supplier>,
}

impl Product {
    fn name(&self) -> Result<Option<&String>> {
        self.name.read::<Self>("name")
    }

    fn in_stock(&self) -> Result<Option<&i32>> {
        self.in_stock.read::<Self>("in_stock")
    }

    fn price(&self) -> Result<Option<&Decimal>> {
        self.price.read::<Self>("price")
    }

    fn supplier(&self) -> Result<Option<&Supplier>> {
        self.supplier.read::<Self>("supplier")
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_option().map_or("", String::as_str))
    }
}

impl Bindable for Product {
    const TYPE_NAME: &'static str = "Product";

    fn properties() -> Vec<PropertyDef<Self>> {
        vec![
            PropertyDef::new("name").column(
                "prod_name",
                DbType::NVarChar,
                |p: &mut Self, v| p.name.assign(v),
            ),
            PropertyDef::new("in_stock").column(
                "prod_instock",
                DbType::Int,
                |p: &mut Self, v| p.in_stock.assign(v),
            ),
            PropertyDef::new("price").column(
                "prod_unitprice",
                DbType::Decimal,
                |p: &mut Self, v| p.price.assign(v),
            ),
            PropertyDef::new("supplier")
                .object::<Supplier>("SupplierID", |p: &mut Self, s| p.supplier.set_value(s)),
        ]
    }

    fn is_empty(&self) -> bool {
        self.name.as_option().map_or(true, |n| n.trim().is_empty())
    }
}

fn demo_table() -> RowSet {
    let mut table = RowSet::new([
        "sup_CompanyName",
        "sup_TotalEmployees",
        "sup_FieldNotUsed",
        "prod_name",
        "prod_instock",
        "prod_unitprice",
    ]);
    table.add_row(
        Row::new()
            .with("sup_CompanyName", "Mike Milk Man McIsaac the Dairy")
            .with("sup_TotalEmployees", 9000)
            .with("sup_FieldNotUsed", "This is some empty field.")
            .with("prod_name", "2L 2% Lactose Free")
            .with("prod_instock", 2879)
            .with("prod_unitprice", 2.54),
    );
    table.add_row(
        Row::new()
            .with("sup_CompanyName", "Another company")
            .with("sup_FieldNotUsed", "It is not anything but a thing."),
    );
    table
}

fn show<T: fmt::Display>(value: Result<Option<&T>>) -> String {
    match value {
        Ok(Some(v)) => v.to_string(),
        Ok(None) => "(null)".to_string(),
        Err(e) => format!("Exception: {e}"),
    }
}

fn display_supplier(supplier: &Supplier) {
    println!("Company: {}", show(supplier.name()));
    println!("Total Employees: {}", show(supplier.number_of_employees()));
    println!("Markup %: {}", show(supplier.markup()));
    println!();
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let table = match std::env::args().nth(1) {
        Some(path) => RowSet::from_csv_path(Path::new(&path), &CsvLoadConfig::default())?,
        None => demo_table(),
    };
    let binder = Binder::default();

    let suppliers: Vec<Supplier> = binder.bind_all(&table)?;
    println!("Suppliers ({}):", suppliers.len());
    println!();
    for supplier in &suppliers {
        display_supplier(supplier);
    }

    let products: Vec<Product> = binder.bind_all(&table)?;
    println!("Products ({}):", products.len());
    println!();
    for product in &products {
        println!("Product: {}", show(product.name()));
        println!("Price: {}", show(product.price()));
        println!("In Stock: {}", show(product.in_stock()));
        println!();
        match product.supplier() {
            Ok(Some(supplier)) => display_supplier(supplier),
            other => println!("Supplier: {}", show(other)),
        }
    }

    Ok(())
}
