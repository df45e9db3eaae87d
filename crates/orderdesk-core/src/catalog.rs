//! # Sample Catalog
//!
//! The product catalog is external input; this module ships the sample data
//! used by the wizard's defaults, the seed binary and the tests.
//!
//! ```text
//! ┌──────────────────────────┬──────────────┬──────────────┬──────────────┐
//! │ Product                  │ Tier 1       │ Tier 2       │ Tier 3       │
//! ├──────────────────────────┼──────────────┼──────────────┼──────────────┤
//! │ API Gateway Pro          │  99.00       │ 299.00       │  799.00      │
//! │ Analytics Suite          │ 149.00       │ 399.00       │  999.00      │
//! │ Data Processing Engine   │ 199.00       │ 499.00       │ 1299.00      │
//! └──────────────────────────┴──────────────┴──────────────┴──────────────┘
//! ```

use crate::money::Money;
use crate::types::{AddOn, Contract, Customer, DurationOption, Order, Plan, Product, WizardStep};

/// Marker value of the "custom duration" option.
pub const CUSTOM_DURATION: i32 = -1;

fn plan(id: &str, name: &str, dollars: i64) -> Plan {
    Plan {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::from_cents(dollars * 100),
    }
}

fn add_on(id: &str, name: &str, description: &str, price: Money) -> AddOn {
    AddOn {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        quantity: 0,
        included: false,
    }
}

/// Three products with three monthly plans each.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: "api-gateway".to_string(),
            name: "API Gateway Pro".to_string(),
            description: Some("Enterprise-grade API management and gateway solution".to_string()),
            plans: vec![
                plan("gateway-starter", "Starter Plan", 99),
                plan("gateway-professional", "Professional Plan", 299),
                plan("gateway-enterprise", "Enterprise Plan", 799),
            ],
        },
        Product {
            id: "analytics-suite".to_string(),
            name: "Analytics Suite".to_string(),
            description: Some("Advanced analytics and reporting platform".to_string()),
            plans: vec![
                plan("analytics-basic", "Basic Analytics", 149),
                plan("analytics-pro", "Pro Analytics", 399),
                plan("analytics-enterprise", "Enterprise Analytics", 999),
            ],
        },
        Product {
            id: "data-processing".to_string(),
            name: "Data Processing Engine".to_string(),
            description: Some("High-performance data processing and transformation".to_string()),
            plans: vec![
                plan("processing-lite", "Lite Processing", 199),
                plan("processing-standard", "Standard Processing", 499),
                plan("processing-premium", "Premium Processing", 1299),
            ],
        },
    ]
}

/// Looks up a sample product by id.
pub fn find_product(product_id: &str) -> Option<Product> {
    sample_products()
        .into_iter()
        .find(|product| product.id == product_id)
}

/// The standard add-ons, all excluded with quantity 0.
pub fn sample_add_ons() -> Vec<AddOn> {
    vec![
        add_on(
            "api-calls",
            "Additional API Calls",
            "Extra API call quota beyond base plan",
            Money::from_scaled(1, 3),
        ),
        add_on(
            "storage-gb",
            "Extra Storage",
            "Additional storage capacity",
            Money::from_cents(10),
        ),
        add_on(
            "bandwidth-gb",
            "Extra Bandwidth",
            "Additional monthly bandwidth",
            Money::from_cents(5),
        ),
        add_on(
            "support-hours",
            "Premium Support Hours",
            "Additional premium support hours",
            Money::from_cents(15_000),
        ),
        add_on(
            "custom-integration",
            "Custom Integration",
            "Custom API integration setup",
            Money::from_cents(50_000),
        ),
        add_on(
            "priority-processing",
            "Priority Processing",
            "High-priority queue access",
            Money::from_cents(9_900),
        ),
    ]
}

pub fn wizard_steps() -> Vec<WizardStep> {
    [
        (1, "Customer Information", "Enter customer details and address", "/step-1"),
        (2, "Product & Plan", "Select product and pricing plan", "/step-2"),
        (3, "Contract Details", "Set contract dates and duration", "/step-3"),
        (4, "Review & Finalize", "Review order and configure add-ons", "/step-4"),
    ]
    .into_iter()
    .map(|(id, title, description, path)| WizardStep {
        id,
        title: title.to_string(),
        description: description.to_string(),
        path: path.to_string(),
        completed: false,
    })
    .collect()
}

/// Preset contract lengths, ending with the custom entry.
pub fn duration_options() -> Vec<DurationOption> {
    [6, 12, 24, 36]
        .into_iter()
        .map(|months| DurationOption {
            value: months,
            label: format!("{months} months"),
        })
        .chain(std::iter::once(DurationOption {
            value: CUSTOM_DURATION,
            label: "Custom duration".to_string(),
        }))
        .collect()
}

/// A fresh order: empty customer, nothing selected, default contract,
/// every standard add-on present but excluded.
pub fn create_default_order() -> Order {
    Order {
        customer: Customer::default(),
        product: None,
        selected_plan: None,
        contract: Contract::default(),
        add_ons: sample_add_ons(),
        total: 0.0,
    }
}

/// US state codes and names for the address form.
pub const US_STATES: [(&str, &str); 50] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_DURATION_MONTHS, WIZARD_STEP_COUNT};

    #[test]
    fn test_sample_products() {
        let products = sample_products();
        assert_eq!(products.len(), 3);
        assert!(products.iter().all(|p| p.plans.len() == 3));

        let gateway = find_product("api-gateway").unwrap();
        let professional = gateway.find_plan("gateway-professional").unwrap();
        assert_eq!(professional.price.to_fixed(2), "299.00");

        assert!(find_product("unknown").is_none());
    }

    #[test]
    fn test_sample_add_ons_start_excluded() {
        let add_ons = sample_add_ons();
        assert_eq!(add_ons.len(), 6);
        assert!(add_ons.iter().all(|a| a.quantity == 0 && !a.included));
        assert_eq!(add_ons[0].price.to_string(), "0.001");
        assert_eq!(add_ons[1].price.to_fixed(2), "0.10");
    }

    #[test]
    fn test_default_order() {
        let order = create_default_order();
        assert!(order.product.is_none());
        assert!(order.selected_plan.is_none());
        assert_eq!(order.contract.duration_months, DEFAULT_DURATION_MONTHS);
        assert_eq!(order.add_ons, sample_add_ons());
        assert_eq!(order.total, 0.0);
    }

    #[test]
    fn test_wizard_metadata() {
        let steps = wizard_steps();
        assert_eq!(steps.len(), WIZARD_STEP_COUNT as usize);
        assert_eq!(steps[3].path, "/step-4");

        let options = duration_options();
        assert_eq!(
            options.iter().map(|o| o.value).collect::<Vec<_>>(),
            vec![6, 12, 24, 36, CUSTOM_DURATION]
        );
        assert_eq!(options[0].label, "6 months");

        assert!(US_STATES.iter().any(|(code, _)| *code == "TX"));
    }
}
