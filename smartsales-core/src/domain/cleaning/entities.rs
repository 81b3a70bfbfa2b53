// smartsales-core/src/domain/cleaning/entities.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::cleaning::{
    Cleaned, DedupKey, EntityRules, MissingKeyBehavior, MissingPolicy, MissingRule, OutlierRule,
    apply_rules,
};
use crate::domain::error::DomainError;
use crate::domain::table::Table;

pub const DEFAULT_MIN_AMOUNT_SPENT: f64 = 200.0;
pub const DEFAULT_MAX_AMOUNT_SPENT: f64 = 10_000.0;
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_CUSTOMER_NAME: &str = "Unknown";
pub const DEFAULT_PRODUCT_NAME: &str = "Unknown Product";

// --- CUSTOMERS ---

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[validate(schema(function = "validate_amount_range"))]
pub struct CustomerRules {
    #[serde(default = "default_customer_name")]
    pub default_name: String,

    #[validate(range(min = 0.0))]
    #[serde(default = "default_min_amount_spent")]
    pub min_amount_spent: f64,

    #[validate(range(min = 0.0))]
    #[serde(default = "default_max_amount_spent")]
    pub max_amount_spent: f64,
}

impl Default for CustomerRules {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_CUSTOMER_NAME.to_string(),
            min_amount_spent: DEFAULT_MIN_AMOUNT_SPENT,
            max_amount_spent: DEFAULT_MAX_AMOUNT_SPENT,
        }
    }
}

impl CustomerRules {
    pub fn entity_rules(&self) -> EntityRules {
        EntityRules {
            entity: "customer".to_string(),
            dedup_key: DedupKey::AllColumns,
            missing_key: MissingKeyBehavior::Fail,
            missing: vec![
                MissingRule::new("name", MissingPolicy::FillConstant(self.default_name.clone())),
                MissingRule::new("customer_id", MissingPolicy::DropRow),
            ],
            outliers: vec![OutlierRule::Range {
                column: "amount_spent".to_string(),
                lower: self.min_amount_spent,
                upper: self.max_amount_spent,
                inclusive: false,
            }],
        }
    }
}

fn validate_amount_range(rules: &CustomerRules) -> Result<(), ValidationError> {
    if rules.min_amount_spent >= rules.max_amount_spent {
        let mut err = ValidationError::new("amount_range");
        err.message = Some("min_amount_spent must be lower than max_amount_spent".into());
        return Err(err);
    }
    Ok(())
}

// --- PRODUCTS ---

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct ProductRules {
    #[serde(default = "default_product_name")]
    pub default_name: String,

    #[validate(range(min = 0.0))]
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,

    /// Fail instead of skipping deduplication when `product_id` is absent.
    #[serde(default)]
    pub require_key: bool,
}

impl Default for ProductRules {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_PRODUCT_NAME.to_string(),
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            require_key: false,
        }
    }
}

impl ProductRules {
    pub fn entity_rules(&self) -> EntityRules {
        EntityRules {
            entity: "product".to_string(),
            dedup_key: DedupKey::Column("product_id".to_string()),
            missing_key: key_behavior(self.require_key),
            missing: vec![
                MissingRule::new("product_name", MissingPolicy::FillConstant(self.default_name.clone())),
                MissingRule::new("unit_price", MissingPolicy::FillMedian),
                MissingRule::new("category", MissingPolicy::FillMode),
                MissingRule::new("product_id", MissingPolicy::DropRow),
            ],
            outliers: vec![OutlierRule::Iqr {
                column: "unit_price".to_string(),
                multiplier: self.iqr_multiplier,
            }],
        }
    }
}

// --- SALES ---

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Default)]
pub struct SaleRules {
    /// Inclusive lower bound on `sale_amount`; no range check when unset.
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sale_amount: Option<f64>,

    #[serde(default)]
    pub require_key: bool,
}

impl SaleRules {
    pub fn entity_rules(&self) -> EntityRules {
        let outliers = self
            .min_sale_amount
            .map(|lower| OutlierRule::Range {
                column: "sale_amount".to_string(),
                lower,
                upper: f64::MAX,
                inclusive: true,
            })
            .into_iter()
            .collect();

        EntityRules {
            entity: "sale".to_string(),
            dedup_key: DedupKey::Column("transaction_id".to_string()),
            missing_key: key_behavior(self.require_key),
            missing: vec![MissingRule::new("transaction_id", MissingPolicy::DropRow)],
            outliers,
        }
    }
}

fn key_behavior(require_key: bool) -> MissingKeyBehavior {
    if require_key {
        MissingKeyBehavior::Fail
    } else {
        MissingKeyBehavior::Skip
    }
}

pub fn clean_customers(table: &Table, rules: &CustomerRules) -> Result<Cleaned, DomainError> {
    apply_rules(table, &rules.entity_rules())
}

pub fn clean_products(table: &Table, rules: &ProductRules) -> Result<Cleaned, DomainError> {
    apply_rules(table, &rules.entity_rules())
}

pub fn clean_sales(table: &Table, rules: &SaleRules) -> Result<Cleaned, DomainError> {
    apply_rules(table, &rules.entity_rules())
}

fn default_customer_name() -> String {
    DEFAULT_CUSTOMER_NAME.to_string()
}
fn default_product_name() -> String {
    DEFAULT_PRODUCT_NAME.to_string()
}
fn default_min_amount_spent() -> f64 {
    DEFAULT_MIN_AMOUNT_SPENT
}
fn default_max_amount_spent() -> f64 {
    DEFAULT_MAX_AMOUNT_SPENT
}
fn default_iqr_multiplier() -> f64 {
    DEFAULT_IQR_MULTIPLIER
}
