//! Tabula Test Utilities
//!
//! This crate provides shared record fixtures and sample data generators
//! for the tabula test suites.

use tabula_frame::descriptor::NumericKind;
use tabula_frame::record::{Record, Shape};
use tabula_frame::value::RawValue;

/// Flat record covering every scalar kind
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Order identifier
    pub id: i64,
    /// Customer display name
    pub customer: String,
    /// Order total
    pub total: f64,
    /// Line count
    pub lines: i32,
    /// Priority class, small range
    pub priority: i8,
    /// Warehouse code, small range
    pub warehouse: i16,
    /// Weight in kilograms
    pub weight: f32,
    /// Discount applied, absent when none
    pub discount: Option<f64>,
    /// Loyalty points, absent for guests
    pub points: Option<i32>,
    /// Whether the order has shipped
    pub shipped: bool,
}

impl Record for Order {
    fn shape() -> Shape {
        Shape::builder::<Order>("Order")
            .primitive("id", NumericKind::Int64, |o| o.id.into())
            .text("customer", false, |o| o.customer.as_str().into())
            .primitive("total", NumericKind::Float64, |o| o.total.into())
            .primitive("lines", NumericKind::Int32, |o| o.lines.into())
            .primitive("priority", NumericKind::Int8, |o| o.priority.into())
            .primitive("warehouse", NumericKind::Int16, |o| o.warehouse.into())
            .primitive("weight", NumericKind::Float32, |o| o.weight.into())
            .boxed("discount", NumericKind::Float64, true, |o| o.discount.into())
            .boxed("points", NumericKind::Int32, true, |o| o.points.into())
            .boolean("shipped", false, |o| o.shipped.into())
            .finish()
    }
}

/// Leaf record of the nested fixtures
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    /// Street line
    pub street: String,
    /// City name
    pub city: String,
}

impl Record for Address {
    fn shape() -> Shape {
        Shape::builder::<Address>("Address")
            .text("street", false, |a| a.street.as_str().into())
            .text("city", false, |a| a.city.as_str().into())
            .finish()
    }
}

/// Record with a nested record and an optional nested record
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// Customer name
    pub name: String,
    /// Billing address
    pub billing: Address,
    /// Shipping address when it differs from billing
    pub shipping: Option<Address>,
}

impl Record for Customer {
    fn shape() -> Shape {
        Shape::builder::<Customer>("Customer")
            .text("name", false, |c| c.name.as_str().into())
            .record::<Address>("billing", false, |c| RawValue::record(c.billing.clone()))
            .record::<Address>("shipping", true, |c| {
                RawValue::nullable_record(c.shipping.clone())
            })
            .finish()
    }
}

/// Element record of the invoice line collection
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Stock keeping unit
    pub sku: String,
    /// Quantity ordered
    pub quantity: i32,
    /// Unit price
    pub price: f64,
}

impl Record for LineItem {
    fn shape() -> Shape {
        Shape::builder::<LineItem>("LineItem")
            .text("sku", false, |l| l.sku.as_str().into())
            .primitive("quantity", NumericKind::Int32, |l| l.quantity.into())
            .primitive("price", NumericKind::Float64, |l| l.price.into())
            .finish()
    }
}

/// Record combining a nested record with a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    /// Invoice number
    pub number: i64,
    /// Invoiced customer
    pub customer: Customer,
    /// Invoice lines
    pub items: Vec<LineItem>,
}

impl Record for Invoice {
    fn shape() -> Shape {
        Shape::builder::<Invoice>("Invoice")
            .primitive("number", NumericKind::Int64, |i| i.number.into())
            .record::<Customer>("customer", false, |i| {
                RawValue::record(i.customer.clone())
            })
            .collection::<LineItem>("items", false, |i| {
                RawValue::collection(i.items.clone())
            })
            .finish()
    }
}

/// Innermost record of the doubly nested collection fixtures
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    /// Badge code
    pub code: String,
}

impl Record for Badge {
    fn shape() -> Shape {
        Shape::builder::<Badge>("Badge")
            .text("code", false, |b| b.code.as_str().into())
            .finish()
    }
}

/// Middle record holding a collection of badges
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Member name
    pub name: String,
    /// Badges earned
    pub badges: Vec<Badge>,
}

impl Record for Member {
    fn shape() -> Shape {
        Shape::builder::<Member>("Member")
            .text("name", false, |m| m.name.as_str().into())
            .collection::<Badge>("badges", false, |m| {
                RawValue::collection(m.badges.clone())
            })
            .finish()
    }
}

/// Record with collections at two nesting depths
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    /// Team name
    pub name: String,
    /// Team members
    pub members: Vec<Member>,
}

impl Record for Team {
    fn shape() -> Shape {
        Shape::builder::<Team>("Team")
            .text("name", false, |t| t.name.as_str().into())
            .collection::<Member>("members", false, |t| {
                RawValue::collection(t.members.clone())
            })
            .finish()
    }
}

/// Innermost record of the five-level nesting fixture
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// Person name
    pub name: String,
}

impl Record for Person {
    fn shape() -> Shape {
        Shape::builder::<Person>("Person")
            .text("name", false, |p| p.name.as_str().into())
            .finish()
    }
}

/// Fourth level of the five-level nesting fixture
#[derive(Debug, Clone, PartialEq)]
pub struct Squad {
    /// Squad name
    pub name: String,
    /// Squad members
    pub members: Vec<Person>,
}

impl Record for Squad {
    fn shape() -> Shape {
        Shape::builder::<Squad>("Squad")
            .text("name", false, |s| s.name.as_str().into())
            .collection::<Person>("members", false, |s| {
                RawValue::collection(s.members.clone())
            })
            .finish()
    }
}

/// Third level of the five-level nesting fixture
#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    /// Department name
    pub name: String,
    /// Department squads
    pub squads: Vec<Squad>,
}

impl Record for Department {
    fn shape() -> Shape {
        Shape::builder::<Department>("Department")
            .text("name", false, |d| d.name.as_str().into())
            .collection::<Squad>("squads", false, |d| {
                RawValue::collection(d.squads.clone())
            })
            .finish()
    }
}

/// Second level of the five-level nesting fixture
#[derive(Debug, Clone, PartialEq)]
pub struct Division {
    /// Division name
    pub name: String,
    /// Division departments
    pub departments: Vec<Department>,
}

impl Record for Division {
    fn shape() -> Shape {
        Shape::builder::<Division>("Division")
            .text("name", false, |d| d.name.as_str().into())
            .collection::<Department>("departments", false, |d| {
                RawValue::collection(d.departments.clone())
            })
            .finish()
    }
}

/// Root record with collections at four nesting depths
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    /// Company name
    pub name: String,
    /// Company divisions
    pub divisions: Vec<Division>,
}

impl Record for Company {
    fn shape() -> Shape {
        Shape::builder::<Company>("Company")
            .text("name", false, |c| c.name.as_str().into())
            .collection::<Division>("divisions", false, |c| {
                RawValue::collection(c.divisions.clone())
            })
            .finish()
    }
}

/// Self-referential record; conversion must refuse it rather than diverge
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Node label
    pub label: String,
    /// Child nodes
    pub children: Vec<TreeNode>,
}

impl Record for TreeNode {
    fn shape() -> Shape {
        Shape::builder::<TreeNode>("TreeNode")
            .text("label", false, |n| n.label.as_str().into())
            .collection::<TreeNode>("children", false, |n| {
                RawValue::collection(n.children.clone())
            })
            .finish()
    }
}

/// Generate sample data with deterministic contents
pub struct SampleData;

impl SampleData {
    /// Orders with a mix of null and non-null optionals
    pub fn orders(count: usize) -> Vec<Order> {
        (0..count)
            .map(|i| Order {
                id: i as i64,
                customer: format!("customer_{}", i % 17),
                total: (i as f64) * 9.75,
                lines: (i % 11) as i32 + 1,
                priority: (i % 5) as i8,
                warehouse: (i % 300) as i16,
                weight: (i % 40) as f32 * 0.25,
                discount: if i % 3 == 0 { Some(i as f64 * 0.05) } else { None },
                points: if i % 4 == 0 { None } else { Some((i % 500) as i32) },
                shipped: i % 2 == 0,
            })
            .collect()
    }

    /// Invoices with nested customers and varying line counts
    pub fn invoices(count: usize) -> Vec<Invoice> {
        (0..count)
            .map(|i| Invoice {
                number: 1000 + i as i64,
                customer: Customer {
                    name: format!("customer_{}", i % 7),
                    billing: Address {
                        street: format!("{} Main St", i),
                        city: "Springfield".to_string(),
                    },
                    shipping: if i % 2 == 0 {
                        Some(Address {
                            street: format!("{} Dock Rd", i),
                            city: "Shelbyville".to_string(),
                        })
                    } else {
                        None
                    },
                },
                items: (0..(i % 4))
                    .map(|j| LineItem {
                        sku: format!("SKU-{}-{}", i, j),
                        quantity: j as i32 + 1,
                        price: 2.5 * (j as f64 + 1.0),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Teams exercising collections nested inside collections
    pub fn teams(count: usize) -> Vec<Team> {
        (0..count)
            .map(|i| Team {
                name: format!("team_{}", i),
                members: (0..(i % 3 + 1))
                    .map(|j| Member {
                        name: format!("member_{}_{}", i, j),
                        badges: (0..j)
                            .map(|k| Badge {
                                code: format!("badge_{}_{}_{}", i, j, k),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// A company with `width` children at each of its four collection levels
    pub fn company(width: usize) -> Company {
        Company {
            name: "acme".to_string(),
            divisions: (0..width)
                .map(|i| Division {
                    name: format!("division_{}", i),
                    departments: (0..width)
                        .map(|j| Department {
                            name: format!("department_{}_{}", i, j),
                            squads: (0..width)
                                .map(|k| Squad {
                                    name: format!("squad_{}_{}_{}", i, j, k),
                                    members: (0..width)
                                        .map(|m| Person {
                                            name: format!("person_{}_{}_{}_{}", i, j, k, m),
                                        })
                                        .collect(),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// A balanced tree of the given depth and fan-out
    pub fn tree(depth: usize, fanout: usize) -> TreeNode {
        TreeNode {
            label: format!("depth_{}", depth),
            children: if depth == 0 {
                Vec::new()
            } else {
                (0..fanout).map(|_| Self::tree(depth - 1, fanout)).collect()
            },
        }
    }
}
