use crate::core::aggregation::DashboardPanels;
use crate::core::errors::Result;
use crate::core::types::Series;
use std::fmt::Write;

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 800.0;
const PANEL_W: f64 = WIDTH / 2.0;
const PANEL_H: f64 = (HEIGHT - 60.0) / 2.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 70.0;

pub const TITLE: &str = "Medical Supply Chain Dashboard";

enum Chart<'a> {
    Lines(Vec<(&'a Series, &'static str)>),
    Bars(&'a Series, &'static str),
}

struct Panel<'a> {
    title: &'static str,
    chart: Chart<'a>,
}

/// Render the 2x2 dashboard as a standalone HTML document.
///
/// The panel series are also embedded as JSON for downstream tooling.
pub fn render_dashboard(panels: &DashboardPanels) -> Result<String> {
    let layout = [
        Panel {
            title: "Inventory vs Demand Trends",
            chart: Chart::Lines(vec![(&panels.inventory, "blue"), (&panels.demand, "red")]),
        },
        Panel {
            title: "Supplier Performance",
            chart: Chart::Bars(&panels.supplier_delivery, "steelblue"),
        },
        Panel {
            title: "Product Stockout Risk",
            chart: Chart::Bars(&panels.product_risk, "red"),
        },
        Panel {
            title: "Delivery Time Analysis",
            chart: Chart::Lines(vec![(&panels.delivery_trend, "green")]),
        },
    ];

    let data = serde_json::to_string(panels)?;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="30" font-size="20" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        TITLE
    );
    for (i, panel) in layout.iter().enumerate() {
        let x0 = (i % 2) as f64 * PANEL_W;
        let y0 = 60.0 + (i / 2) as f64 * PANEL_H;
        render_panel(&mut svg, panel, x0, y0);
    }
    svg.push_str("</svg>\n");

    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{TITLE}</title>\n</head>\n<body>\n{svg}<script type=\"application/json\" id=\"dashboard-data\">{}</script>\n</body>\n</html>\n",
        escape_script(&data)
    ))
}

fn render_panel(svg: &mut String, panel: &Panel<'_>, x0: f64, y0: f64) {
    let plot_x = x0 + MARGIN_LEFT;
    let plot_y = y0 + MARGIN_TOP;
    let plot_w = PANEL_W - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = PANEL_H - MARGIN_TOP - MARGIN_BOTTOM;

    let _ = writeln!(svg, r#"<g class="panel">"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" font-size="14" text-anchor="middle">{}</text>"#,
        x0 + PANEL_W / 2.0,
        y0 + 24.0,
        escape(panel.title)
    );
    let _ = writeln!(
        svg,
        r##"<rect x="{plot_x}" y="{plot_y}" width="{plot_w}" height="{plot_h}" fill="none" stroke="#ccc"/>"##
    );

    let all: Vec<&Series> = match &panel.chart {
        Chart::Lines(lines) => lines.iter().map(|(s, _)| *s).collect(),
        Chart::Bars(series, _) => vec![*series],
    };
    let Some((lo, hi)) = value_range(&all, matches!(panel.chart, Chart::Bars(..))) else {
        let _ = writeln!(svg, "</g>");
        return;
    };
    let scale_y = |v: f64| plot_y + plot_h - (v - lo) / (hi - lo) * plot_h;

    for tick in [lo, (lo + hi) / 2.0, hi] {
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{:.1}" font-size="10" text-anchor="end">{}</text>"#,
            plot_x - 6.0,
            scale_y(tick) + 3.0,
            format_tick(tick)
        );
    }

    match &panel.chart {
        Chart::Lines(lines) => {
            for (series, color) in lines {
                let n = series.len().max(2) as f64 - 1.0;
                let points: Vec<String> = series
                    .values()
                    .enumerate()
                    .map(|(i, v)| format!("{:.1},{:.1}", plot_x + i as f64 / n * plot_w, scale_y(v)))
                    .collect();
                let _ = writeln!(
                    svg,
                    r#"<polyline fill="none" stroke="{color}" stroke-width="1.2" points="{}"><title>{}</title></polyline>"#,
                    points.join(" "),
                    escape(&series.label)
                );
            }
            // Lines in one panel share the date axis
            if let Some((series, _)) = lines.first() {
                axis_labels(svg, series, plot_x, plot_y + plot_h, plot_w);
            }
            legend(svg, lines, plot_x + plot_w - 130.0, plot_y + 8.0);
        }
        Chart::Bars(series, color) => {
            let slot = plot_w / series.len().max(1) as f64;
            for (i, (key, v)) in series.points.iter().enumerate() {
                let top = scale_y(*v).min(scale_y(0.0));
                let height = (scale_y(0.0) - scale_y(*v)).abs();
                let _ = writeln!(
                    svg,
                    r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{color}"><title>{}: {:.3}</title></rect>"#,
                    plot_x + i as f64 * slot + slot * 0.15,
                    top,
                    slot * 0.7,
                    height,
                    escape(key),
                    v
                );
            }
            axis_labels(svg, series, plot_x, plot_y + plot_h, plot_w);
        }
    }
    let _ = writeln!(svg, "</g>");
}

// One swatch and label per line, stacked down from (x, y)
fn legend(svg: &mut String, lines: &[(&Series, &'static str)], x: f64, y: f64) {
    let _ = writeln!(svg, r#"<g class="legend">"#);
    for (i, (series, color)) in lines.iter().enumerate() {
        let row = y + i as f64 * 14.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{x:.1}" y="{row:.1}" width="10" height="10" fill="{color}"/><text x="{:.1}" y="{:.1}" font-size="10">{}</text>"#,
            x + 14.0,
            row + 9.0,
            escape(&series.label)
        );
    }
    let _ = writeln!(svg, "</g>");
}

// At most eight x labels, rotated 45 degrees
fn axis_labels(svg: &mut String, series: &Series, x: f64, y: f64, w: f64) {
    if series.is_empty() {
        return;
    }
    let step = series.len().div_ceil(8);
    let slot = w / series.len() as f64;
    for (i, (key, _)) in series.points.iter().enumerate().step_by(step) {
        let lx = x + i as f64 * slot + slot / 2.0;
        let _ = writeln!(
            svg,
            r#"<text x="{lx:.1}" y="{:.1}" font-size="10" transform="rotate(45 {lx:.1} {:.1})">{}</text>"#,
            y + 12.0,
            y + 12.0,
            escape(key)
        );
    }
}

fn value_range(series: &[&Series], include_zero: bool) -> Option<(f64, f64)> {
    let mut values = series.iter().flat_map(|s| s.values()).filter(|v| v.is_finite());
    let first = values.next()?;
    let (mut lo, mut hi) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if hi - lo < f64::EPSILON {
        hi = lo + 1.0;
    }
    Some((lo, hi))
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 100.0 {
        super::format_thousands(v)
    } else {
        format!("{v:.2}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panels() -> DashboardPanels {
        let dates = |vals: &[f64]| {
            vals.iter()
                .enumerate()
                .map(|(i, v)| (format!("2023-01-0{}", i + 1), *v))
                .collect::<Vec<_>>()
        };
        DashboardPanels {
            inventory: Series::new("Total Inventory", dates(&[6000.0, 6100.0, 5900.0])),
            demand: Series::new("Total Demand", dates(&[5000.0, 5200.0, 5100.0])),
            supplier_delivery: Series::new(
                "Avg Delivery Time",
                vec![("MedSupply Co".to_string(), 3.1), ("R&D <Labs>".to_string(), 2.9)],
            ),
            product_risk: Series::new("Stockout Risk", vec![("Syringes".to_string(), 0.12)]),
            delivery_trend: Series::new("Avg Delivery Time", dates(&[3.0, 2.8, 3.2])),
        }
    }

    #[test]
    fn test_dashboard_has_four_panels() {
        let html = render_dashboard(&panels()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(TITLE));
        assert_eq!(html.matches(r#"<g class="panel">"#).count(), 4);
        for title in [
            "Inventory vs Demand Trends",
            "Supplier Performance",
            "Product Stockout Risk",
            "Delivery Time Analysis",
        ] {
            assert!(html.contains(title), "missing panel {title}");
        }
        assert_eq!(html.matches("<polyline").count(), 3);
    }

    #[test]
    fn test_line_panels_have_legends() {
        let html = render_dashboard(&panels()).unwrap();
        assert_eq!(html.matches(r#"<g class="legend">"#).count(), 2);
        assert!(html.contains(r#"fill="blue"/><text"#));
        assert!(html.contains(r#"font-size="10">Total Inventory</text>"#));
        assert!(html.contains(r#"font-size="10">Total Demand</text>"#));
        assert!(html.contains(r#"font-size="10">Avg Delivery Time</text>"#));
    }

    #[test]
    fn test_labels_are_escaped() {
        let html = render_dashboard(&panels()).unwrap();
        assert!(html.contains("R&amp;D &lt;Labs&gt;"));
    }

    #[test]
    fn test_embedded_data_round_trips() {
        let html = render_dashboard(&panels()).unwrap();
        let start = html.find(r#"id="dashboard-data">"#).unwrap() + r#"id="dashboard-data">"#.len();
        let end = html[start..].find("</script>").unwrap() + start;
        let parsed: DashboardPanels = serde_json::from_str(&html[start..end]).unwrap();
        assert_eq!(parsed, panels());
    }

    #[test]
    fn test_empty_panels_render() {
        let empty = DashboardPanels {
            inventory: Series::new("Total Inventory", Vec::new()),
            demand: Series::new("Total Demand", Vec::new()),
            supplier_delivery: Series::new("Avg Delivery Time", Vec::new()),
            product_risk: Series::new("Stockout Risk", Vec::new()),
            delivery_trend: Series::new("Avg Delivery Time", Vec::new()),
        };
        let html = render_dashboard(&empty).unwrap();
        assert_eq!(html.matches(r#"<g class="panel">"#).count(), 4);
        assert_eq!(html.matches("<polyline").count(), 0);
    }
}
