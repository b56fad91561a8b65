use serde::{Deserialize, Serialize};

/// Raw values from the six metrics form controls. Sent verbatim as
/// URL-encoded fields; the server owns parsing and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsInput {
    pub daily_revenue: String,
    pub daily_cost: String,
    pub daily_customers: String,
    pub prev_revenue: String,
    pub prev_cost: String,
    pub prev_customers: String,
}

impl MetricsInput {
    /// Two-paragraph summary of both days' figures, shown as the user's
    /// chat bubble.
    pub fn summary(&self) -> String {
        format!(
            "Today:\n- Revenue: ${}, Cost: ${}, Customers: {}\n\nPrevious Day:\n- Revenue: ${}, Cost: ${}, Customers: {}",
            self.daily_revenue,
            self.daily_cost,
            self.daily_customers,
            self.prev_revenue,
            self.prev_cost,
            self.prev_customers,
        )
    }
}

/// Analysis produced by the server for one metrics submission. The list
/// fields may be absent or empty; either way no section is rendered for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub profit_loss_status: String,
    #[serde(default)]
    pub alerts_or_warnings: Vec<String>,
    #[serde(default)]
    pub decision_making_recommendations: Vec<String>,
}
