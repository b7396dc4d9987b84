//! Sample target types shared by the integration tests.

#![allow(dead_code)]

use std::fmt;

use rowbind::metadata::{Bindable, Field, PropertyDef};
use rowbind::types::{DbType, Value};
use rowbind::Result;
use rust_decimal::Decimal;

fn text(field: &Field<String>) -> &str {
    field.as_option().map_or("", String::as_str)
}

fn blank(field: &Field<String>) -> bool {
    field.as_option().map_or(true, |s| s.trim().is_empty())
}

// -----------------------------------------------------------------------------
// Supplier
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Supplier {
    pub name: Field<String>,
    pub number_of_employees: Field<i32>,
    pub markup: Field<Decimal>,
    pub not_databound: f64,
}

impl Supplier {
    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.name.read::<Self>("name")?.map(String::as_str))
    }

    pub fn number_of_employees(&self) -> Result<Option<i32>> {
        Ok(self
            .number_of_employees
            .read::<Self>("number_of_employees")?
            .copied())
    }

    pub fn markup(&self) -> Result<Option<Decimal>> {
        Ok(self.markup.read::<Self>("markup")?.copied())
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(text(&self.name))
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
            PropertyDef::new("not_databound"),
            PropertyDef::new("markup").column(
                "sup_markup",
                DbType::Decimal,
                |s: &mut Self, v| s.markup.assign(v),
            ),
        ]
    }

    fn is_empty(&self) -> bool {
        blank(&self.name)
    }
}

// -----------------------------------------------------------------------------
// Product (nested Supplier)
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Product {
    pub name: Field<String>,
    pub in_stock: Field<i32>,
    pub price: Field<Decimal>,
    pub supplier: Field<Supplier>,
    pub supplier_id: Field<i32>,
    /// Derived in `on_loaded`.
    pub stock_value: Option<Decimal>,
    pub loaded_calls: u32,
}

impl Product {
    pub fn supplier(&self) -> Result<Option<&Supplier>> {
        self.supplier.read::<Self>("supplier")
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(text(&self.name))
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
            PropertyDef::new("supplier").object::<Supplier>(
                "SupplierID",
                |p: &mut Self, s| p.supplier.set_value(s),
            ),
            PropertyDef::new("supplier_id").column(
                "prod_SupplierId",
                DbType::Int,
                |p: &mut Self, v| p.supplier_id.assign(v),
            ),
        ]
    }

    fn is_empty(&self) -> bool {
        blank(&self.name)
    }

    fn on_loaded(&mut self) {
        self.loaded_calls += 1;
        if let (Some(price), Some(count)) = (self.price.as_option(), self.in_stock.as_option()) {
            self.stock_value = Some(*price * Decimal::from(*count));
        }
    }
}

// -----------------------------------------------------------------------------
// Employee (self-referential)
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Employee {
    pub name: Field<String>,
    pub manager: Field<Box<Employee>>,
}

impl Employee {
    /// Number of manager hops that were bound below this employee.
    pub fn chain_length(&self) -> usize {
        match self.manager.as_option() {
            Some(m) => 1 + m.chain_length(),
            None => 0,
        }
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(text(&self.name))
    }
}

impl Bindable for Employee {
    const TYPE_NAME: &'static str = "Employee";

    fn properties() -> Vec<PropertyDef<Self>> {
        vec![
            PropertyDef::new("name")
                .column("emp_name", DbType::VarChar, |e: &mut Self, v| e.name.assign(v)),
            PropertyDef::new("manager")
                .object::<Employee>("ManagerID", |e: &mut Self, m| {
                    e.manager.set_value(Box::new(m));
                }),
        ]
    }

    fn is_empty(&self) -> bool {
        blank(&self.name)
    }
}

// -----------------------------------------------------------------------------
// Order (one property with both scalar and object metadata)
// -----------------------------------------------------------------------------

#[derive(Debug)]
pub enum VendorRef {
    Raw(Value),
    Bound(Supplier),
}

#[derive(Debug, Default)]
pub struct Order {
    pub code: Field<String>,
    pub vendor: Field<VendorRef>,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(text(&self.code))
    }
}

impl Bindable for Order {
    const TYPE_NAME: &'static str = "Order";

    fn properties() -> Vec<PropertyDef<Self>> {
        vec![
            PropertyDef::new("code")
                .column("ord_code", DbType::Char, |o: &mut Self, v| o.code.assign(v)),
            PropertyDef::new("vendor")
                .column("ord_vendor", DbType::Variant, |o: &mut Self, v| {
                    o.vendor.set_value(VendorRef::Raw(v));
                    Ok(())
                })
                .object::<Supplier>("SupplierID", |o: &mut Self, s| {
                    o.vendor.set_value(VendorRef::Bound(s));
                }),
        ]
    }

    fn is_empty(&self) -> bool {
        blank(&self.code)
    }
}

// -----------------------------------------------------------------------------
// Misconfigured types
// -----------------------------------------------------------------------------

/// Declares an INT column but stores it in a string field.
#[derive(Debug, Default)]
pub struct Mistyped {
    pub id: Field<String>,
}

impl fmt::Display for Mistyped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(text(&self.id))
    }
}

impl Bindable for Mistyped {
    const TYPE_NAME: &'static str = "Mistyped";

    fn properties() -> Vec<PropertyDef<Self>> {
        vec![PropertyDef::new("id").column("id", DbType::Int, |m: &mut Self, v| {
            m.id.assign(v)
        })]
    }

    fn is_empty(&self) -> bool {
        blank(&self.id)
    }
}

/// Declares the same property twice.
#[derive(Debug, Default)]
pub struct Duplicated {
    pub id: Field<String>,
}

impl fmt::Display for Duplicated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(text(&self.id))
    }
}

impl Bindable for Duplicated {
    const TYPE_NAME: &'static str = "Duplicated";

    fn properties() -> Vec<PropertyDef<Self>> {
        vec![
            PropertyDef::new("id").column("a", DbType::VarChar, |d: &mut Self, v| {
                d.id.assign(v)
            }),
            PropertyDef::new("id").column("b", DbType::VarChar, |d: &mut Self, v| {
                d.id.assign(v)
            }),
        ]
    }

    fn is_empty(&self) -> bool {
        blank(&self.id)
    }
}
