use super::format_thousands;
use crate::core::aggregation::AggregateViews;
use crate::core::forecast::ForecastResult;

/// Render the plain-text insights summary.
///
/// An empty table has no overall means; those lines report zero.
pub fn render_insights(
    views: &AggregateViews,
    forecast: &ForecastResult,
    high_risk_threshold: f64,
    horizon_days: usize,
) -> String {
    let overall = views.overall.clone().unwrap_or_default();

    let mut lines = vec![
        "Medical Supply Chain Insights:".to_string(),
        String::new(),
        format!("Average Daily Demand: {} units", format_thousands(overall.mean_demand)),
        format!(
            "Average Inventory Level: {} units",
            format_thousands(overall.mean_inventory)
        ),
        format!("Average Delivery Time: {:.1} days", overall.mean_delivery_time),
        String::new(),
        format!("High-Risk Products (Stockout Risk > {high_risk_threshold}):"),
    ];
    lines.extend(views.high_risk_products(high_risk_threshold).map(|product| {
        format!(
            "- {}: {:.1}% risk",
            product.product,
            product.mean_stockout_risk * 100.0
        )
    }));

    lines.push(String::new());
    lines.push("Supplier Performance:".to_string());
    lines.extend(views.by_supplier.iter().map(|supplier| {
        format!(
            "- {}: {:.1} days avg delivery",
            supplier.supplier, supplier.mean_delivery_time
        )
    }));

    lines.push(String::new());
    lines.push("Demand Forecast:".to_string());
    lines.push(format!(
        "Projected {horizon_days}-day demand trend: {}",
        forecast.direction
    ));
    lines.push(format!(
        "Average projected daily demand: {} units",
        format_thousands(forecast.projected_mean)
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
