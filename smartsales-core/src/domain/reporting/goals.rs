// smartsales-core/src/domain/reporting/goals.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::domain::error::DomainError;
use crate::domain::warehouse::schema::quote_ident;

/// Column names of the precomputed cube file.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct CubeColumns {
    #[validate(length(min = 1))]
    #[serde(default = "default_day_of_week")]
    pub day_of_week: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_month")]
    pub month: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_region")]
    pub region: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_supplier")]
    pub supplier: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_customer_id")]
    pub customer_id: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_revenue")]
    pub revenue: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_transaction_count")]
    pub transaction_count: String,
}

impl Default for CubeColumns {
    fn default() -> Self {
        Self {
            day_of_week: default_day_of_week(),
            month: default_month(),
            region: default_region(),
            supplier: default_supplier(),
            customer_id: default_customer_id(),
            revenue: default_revenue(),
            transaction_count: default_transaction_count(),
        }
    }
}

fn default_day_of_week() -> String {
    "DayOfWeek".to_string()
}
fn default_month() -> String {
    "Month".to_string()
}
fn default_region() -> String {
    "Region".to_string()
}
fn default_supplier() -> String {
    "Supplier".to_string()
}
fn default_customer_id() -> String {
    "customer_id".to_string()
}
fn default_revenue() -> String {
    "sale_amount_sum".to_string()
}
fn default_transaction_count() -> String {
    "transaction_id_count".to_string()
}

/// A business question answered from the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportGoal {
    /// Best day of the week per (region, supplier).
    PeakSellTimes,
    /// Revenue per day of the week, lowest first.
    WeekdayRevenue,
    /// Average transactions per (month, customer) next to that month's
    /// revenue, most frequent first.
    PurchaseFrequency,
}

pub const ALL_GOALS: [ReportGoal; 3] = [
    ReportGoal::PeakSellTimes,
    ReportGoal::WeekdayRevenue,
    ReportGoal::PurchaseFrequency,
];

impl ReportGoal {
    pub fn name(&self) -> &'static str {
        match self {
            ReportGoal::PeakSellTimes => "peak_sell_times",
            ReportGoal::WeekdayRevenue => "weekday_revenue",
            ReportGoal::PurchaseFrequency => "purchase_frequency",
        }
    }

    /// Cube columns the goal reads.
    pub fn required_columns<'a>(&self, cube: &'a CubeColumns) -> Vec<&'a str> {
        let columns = match self {
            ReportGoal::PeakSellTimes => vec![&cube.day_of_week, &cube.region, &cube.supplier, &cube.revenue],
            ReportGoal::WeekdayRevenue => vec![&cube.day_of_week, &cube.revenue],
            ReportGoal::PurchaseFrequency => {
                vec![&cube.month, &cube.customer_id, &cube.transaction_count, &cube.revenue]
            }
        };
        columns.into_iter().map(String::as_str).collect()
    }

    /// Columns of the result set, in order.
    pub fn output_columns(&self) -> &'static [&'static str] {
        match self {
            ReportGoal::PeakSellTimes => &["day_of_week", "region", "supplier", "total_revenue"],
            ReportGoal::WeekdayRevenue => &["day_of_week", "total_revenue"],
            ReportGoal::PurchaseFrequency => &["month", "customer_id", "avg_transaction_count", "monthly_revenue"],
        }
    }

    /// Full-scan query over the view `source`. Every output column is VARCHAR.
    pub fn sql(&self, cube: &CubeColumns, source: &str) -> String {
        let src = quote_ident(source);
        let day = quote_ident(&cube.day_of_week);
        let revenue = quote_ident(&cube.revenue);

        match self {
            ReportGoal::PeakSellTimes => format!(
                "WITH grouped AS (\n\
                 \x20   SELECT CAST({day} AS VARCHAR) AS day_of_week, CAST({region} AS VARCHAR) AS region,\n\
                 \x20          CAST({supplier} AS VARCHAR) AS supplier, SUM({revenue}) AS revenue\n\
                 \x20   FROM {src}\n\
                 \x20   GROUP BY 1, 2, 3\n\
                 )\n\
                 SELECT day_of_week, region, supplier, CAST(ROUND(revenue, 2) AS VARCHAR) AS total_revenue\n\
                 FROM grouped\n\
                 QUALIFY ROW_NUMBER() OVER (PARTITION BY region, supplier ORDER BY revenue DESC, day_of_week) = 1\n\
                 ORDER BY region, supplier",
                region = quote_ident(&cube.region),
                supplier = quote_ident(&cube.supplier),
            ),
            ReportGoal::WeekdayRevenue => format!(
                "SELECT CAST({day} AS VARCHAR) AS day_of_week, CAST(ROUND(SUM({revenue}), 2) AS VARCHAR) AS total_revenue\n\
                 FROM {src}\n\
                 GROUP BY 1\n\
                 ORDER BY SUM({revenue}) ASC, 1"
            ),
            ReportGoal::PurchaseFrequency => format!(
                "WITH frequency AS (\n\
                 \x20   SELECT CAST({month} AS VARCHAR) AS month, CAST({customer} AS VARCHAR) AS customer_id,\n\
                 \x20          AVG({count}) AS avg_count\n\
                 \x20   FROM {src}\n\
                 \x20   GROUP BY 1, 2\n\
                 ),\n\
                 monthly AS (\n\
                 \x20   SELECT CAST({month} AS VARCHAR) AS month, SUM({revenue}) AS revenue\n\
                 \x20   FROM {src}\n\
                 \x20   GROUP BY 1\n\
                 )\n\
                 SELECT f.month, f.customer_id, CAST(ROUND(f.avg_count, 2) AS VARCHAR) AS avg_transaction_count,\n\
                 \x20      CAST(ROUND(m.revenue, 2) AS VARCHAR) AS monthly_revenue\n\
                 FROM frequency f\n\
                 JOIN monthly m ON f.month = m.month\n\
                 ORDER BY f.avg_count DESC, f.month, f.customer_id",
                month = quote_ident(&cube.month),
                customer = quote_ident(&cube.customer_id),
                count = quote_ident(&cube.transaction_count),
            ),
        }
    }
}

impl fmt::Display for ReportGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportGoal {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_GOALS
            .into_iter()
            .find(|g| g.name() == s.trim())
            .ok_or_else(|| {
                DomainError::InvalidRule(format!(
                    "unknown report goal '{}' (expected one of: {})",
                    s,
                    ALL_GOALS.map(|g| g.name()).join(", ")
                ))
            })
    }
}
