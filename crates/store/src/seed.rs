//! Demo records loaded at startup.

use chrono::NaiveDate;

use crate::customers::{Communication, Customer, Preferences, Tier};
use crate::money::Money;
use crate::orders::{Order, OrderItem, OrderStatus};
use crate::products::Product;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn item(product_id: &str, name: &str, quantity: u32, cents: i64) -> OrderItem {
    OrderItem {
        product_id: product_id.into(),
        name: name.into(),
        quantity,
        price: Money::from_cents(cents),
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    category: &str,
    cents: i64,
    stock: u32,
    rating: f32,
    description: &str,
    features: &[&str],
) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        category: category.into(),
        price: Money::from_cents(cents),
        stock,
        rating,
        description: description.into(),
        features: strings(features),
    }
}

pub(crate) fn products() -> Vec<Product> {
    vec![
        product(
            "PROD001",
            "Wireless Bluetooth Headphones",
            "Electronics",
            7999,
            45,
            4.5,
            "Over-ear headphones with active noise cancellation and a 30-hour battery.",
            &["Active noise cancellation", "30-hour battery", "Bluetooth 5.2", "Foldable design"],
        ),
        product(
            "PROD002",
            "Smart Fitness Watch",
            "Electronics",
            19999,
            20,
            4.3,
            "Fitness tracker with heart-rate monitoring, GPS and sleep tracking.",
            &["Heart-rate monitor", "Built-in GPS", "Water resistant to 50m", "7-day battery"],
        ),
        product(
            "PROD003",
            "Waterproof Rain Jacket",
            "Clothing",
            8999,
            30,
            4.6,
            "Lightweight breathable jacket that keeps you dry in heavy rain.",
            &["Fully waterproof", "Breathable membrane", "Packable hood", "Reflective details"],
        ),
        product(
            "PROD004",
            "Polarized Sunglasses",
            "Accessories",
            4999,
            60,
            4.4,
            "UV400 polarized sunglasses for bright days and outdoor activities.",
            &["UV400 protection", "Polarized lenses", "Lightweight frame"],
        ),
        product(
            "PROD005",
            "Compact Travel Umbrella",
            "Accessories",
            2499,
            5,
            4.2,
            "Windproof folding umbrella that fits in any bag.",
            &["Windproof frame", "Auto open and close", "Waterproof canopy"],
        ),
        product(
            "PROD006",
            "Cotton Summer T-Shirt",
            "Clothing",
            1999,
            120,
            4.1,
            "Soft breathable cotton tee for warm summer weather.",
            &["100% organic cotton", "Breathable fabric", "Machine washable"],
        ),
        product(
            "PROD007",
            "Insulated Water Bottle",
            "Sports",
            2999,
            80,
            4.7,
            "Stainless steel bottle that keeps drinks cold for 24 hours outdoors.",
            &["Double-wall insulation", "750ml capacity", "Leak-proof lid"],
        ),
        product(
            "PROD008",
            "Python Programming Book",
            "Books",
            3999,
            0,
            4.8,
            "Hands-on introduction to Python programming for beginners.",
            &["500 pages", "Practical exercises", "Online code samples"],
        ),
        product(
            "PROD009",
            "Portable Power Bank",
            "Electronics",
            3499,
            50,
            4.3,
            "20000mAh power bank that keeps your devices charged during outages.",
            &["20000mAh capacity", "Fast charging", "Dual USB ports"],
        ),
        product(
            "PROD010",
            "Hiking Backpack",
            "Sports",
            6999,
            25,
            4.5,
            "Durable 40L backpack for outdoor hikes with a rain cover included.",
            &["40L capacity", "Rain cover included", "Padded hip belt"],
        ),
    ]
}

pub(crate) fn orders() -> Vec<Order> {
    vec![
        Order {
            id: "ORD001".into(),
            customer_id: "CUST001".into(),
            status: OrderStatus::Shipped,
            order_date: date(2024, 1, 15),
            items: vec![
                item("PROD001", "Wireless Bluetooth Headphones", 1, 7999),
                item("PROD007", "Insulated Water Bottle", 1, 2999),
            ],
            shipping_address: "123 Main St, New York, NY 10001".into(),
            tracking_number: Some("TRK123456789".into()),
        },
        Order {
            id: "ORD002".into(),
            customer_id: "CUST002".into(),
            status: OrderStatus::Processing,
            order_date: date(2024, 1, 20),
            items: vec![item("PROD002", "Smart Fitness Watch", 1, 19999)],
            shipping_address: "456 Oak Ave, Los Angeles, CA 90001".into(),
            tracking_number: None,
        },
        Order {
            id: "ORD003".into(),
            customer_id: "CUST001".into(),
            status: OrderStatus::Delivered,
            order_date: date(2024, 1, 10),
            items: vec![
                item("PROD003", "Waterproof Rain Jacket", 1, 8999),
                item("PROD005", "Compact Travel Umbrella", 2, 2499),
            ],
            shipping_address: "123 Main St, New York, NY 10001".into(),
            tracking_number: Some("TRK987654321".into()),
        },
        Order {
            id: "ORD004".into(),
            customer_id: "CUST003".into(),
            status: OrderStatus::Pending,
            order_date: date(2024, 1, 22),
            items: vec![item("PROD008", "Python Programming Book", 1, 3999)],
            shipping_address: "789 Pine Rd, Chicago, IL 60601".into(),
            tracking_number: None,
        },
        Order {
            id: "ORD005".into(),
            customer_id: "CUST002".into(),
            status: OrderStatus::Cancelled,
            order_date: date(2024, 1, 18),
            items: vec![item("PROD009", "Portable Power Bank", 1, 3499)],
            shipping_address: "456 Oak Ave, Los Angeles, CA 90001".into(),
            tracking_number: None,
        },
    ]
}

pub(crate) fn customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "CUST001".into(),
            name: "John Smith".into(),
            email: "john.smith@email.com".into(),
            phone: "+1-555-0101".into(),
            address: "123 Main St, New York, NY 10001".into(),
            loyalty_points: 1250,
            tier: Tier::Gold,
            preferences: Preferences {
                categories: strings(&["Electronics", "Sports"]),
                brands: strings(&["TechPro", "FitGear"]),
                communication: Communication::Email,
            },
            order_history: strings(&["ORD001", "ORD003"]),
        },
        Customer {
            id: "CUST002".into(),
            name: "Sarah Johnson".into(),
            email: "sarah.j@email.com".into(),
            phone: "+1-555-0102".into(),
            address: "456 Oak Ave, Los Angeles, CA 90001".into(),
            loyalty_points: 820,
            tier: Tier::Silver,
            preferences: Preferences {
                categories: strings(&["Clothing", "Accessories"]),
                brands: strings(&["StyleCo"]),
                communication: Communication::Sms,
            },
            order_history: strings(&["ORD002", "ORD005"]),
        },
        Customer {
            id: "CUST003".into(),
            name: "Michael Chen".into(),
            email: "m.chen@email.com".into(),
            phone: "+1-555-0103".into(),
            address: "789 Pine Rd, Chicago, IL 60601".into(),
            loyalty_points: 2400,
            tier: Tier::Platinum,
            preferences: Preferences {
                categories: strings(&["Books", "Electronics"]),
                brands: strings(&["ReadMore"]),
                communication: Communication::Email,
            },
            order_history: strings(&["ORD004"]),
        },
        Customer {
            id: "CUST004".into(),
            name: "Emily Davis".into(),
            email: "emily.davis@email.com".into(),
            phone: "+1-555-0104".into(),
            address: "321 Elm St, Seattle, WA 98101".into(),
            loyalty_points: 150,
            tier: Tier::Bronze,
            preferences: Preferences {
                categories: strings(&["Sports"]),
                brands: Vec::new(),
                communication: Communication::Phone,
            },
            order_history: Vec::new(),
        },
    ]
}
