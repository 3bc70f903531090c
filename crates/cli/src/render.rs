//! Plain-text rendering of the dashboard for terminals.

use freightdash_core::analytics::{Dashboard, DashboardStatus, NamedCount};
use freightdash_core::domain::load::Load;
use std::fmt::Write;

pub fn render_dashboard(dashboard: &Dashboard, status: &DashboardStatus, window_days: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Load & Call Analytics");

    match status {
        DashboardStatus::Loading => {
            let _ = writeln!(out, "Loading…");
            return out;
        }
        DashboardStatus::Failed(errors) => {
            for err in errors {
                let _ = writeln!(out, "Error: {err}");
            }
        }
        DashboardStatus::Ready => {}
    }

    let loads = &dashboard.loads;
    let _ = writeln!(out, "\nLoads by equipment");
    for agg in &loads.equipment {
        let _ = writeln!(
            out,
            "  {:<16} {:>5} loads  avg ${}",
            agg.equipment, agg.count, agg.avg_rate
        );
    }

    let _ = writeln!(out, "\nRate distribution");
    for bucket in loads.rate_buckets.iter() {
        let _ = writeln!(out, "  {:<8} {:>5}", bucket.bucket, bucket.count);
    }

    let calls = &dashboard.calls;
    write_named_counts(&mut out, &format!("Call outcomes (last {window_days} days)"), &calls.outcomes);
    write_named_counts(&mut out, &format!("Sentiment mix (last {window_days} days)"), &calls.sentiments);

    let _ = writeln!(out, "\nOutcomes by day");
    if calls.stacked.keys.is_empty() {
        let _ = writeln!(out, "  (no calls)");
    } else {
        let _ = write!(out, "  {:<12}", "date");
        for key in &calls.stacked.keys {
            let _ = write!(out, " {key:>14}");
        }
        let _ = writeln!(out);
        for row in calls.stacked.dense_rows() {
            let _ = write!(out, "  {:<12}", row.date);
            for value in row.values.values() {
                let _ = write!(out, " {value:>14}");
            }
            let _ = writeln!(out);
        }
    }

    let _ = writeln!(out, "\nRecent calls");
    if dashboard.recent_calls.is_empty() {
        let _ = writeln!(out, "  No recent calls.");
    } else {
        let _ = writeln!(
            out,
            "  {:<22} {:<10} {:<24} {:<3} {:<10} {:<16} {:<10} {:>9} {:>6}",
            "When", "MC #", "Legal Name", "Ver", "Load", "Outcome", "Sentiment", "Agreed $", "Rounds"
        );
        for row in dashboard.recent_calls.iter() {
            let _ = writeln!(
                out,
                "  {:<22} {:<10} {:<24} {:<3} {:<10} {:<16} {:<10} {:>9} {:>6}",
                row.when,
                row.mc_number,
                row.legal_name,
                row.verified,
                row.load_id,
                row.outcome,
                row.sentiment,
                row.agreed_price,
                row.negotiation_rounds
            );
        }
    }

    let _ = writeln!(out, "\nShowing {} load(s).", loads.load_count);
    out
}

fn write_named_counts(out: &mut String, title: &str, series: &[NamedCount]) {
    let _ = writeln!(out, "\n{title}");
    if series.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for c in series {
        let _ = writeln!(out, "  {:<16} {:>5}", c.name, c.value);
    }
}

pub fn render_load_table(loads: &[Load]) -> String {
    let mut out = String::new();
    if loads.is_empty() {
        let _ = writeln!(out, "No rows.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<10} {:<20} {:<20} {:<20} {:<20} {:<10} {:>8} {:>6}",
        "Load ID", "Origin", "Destination", "Pickup", "Delivery", "Equipment", "Rate", "Miles"
    );
    for load in loads {
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:<20} {:<20} {:<20} {:<10} {:>8} {:>6}",
            load.load_id,
            load.origin,
            load.destination,
            load.pickup_datetime,
            load.delivery_datetime,
            load.equipment_type.as_deref().unwrap_or_default(),
            format!("${}", load.loadboard_rate),
            load.miles.to_string()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use freightdash_core::analytics::{assemble, DashboardInputs};
    use freightdash_core::domain::call::CallAnalytics;

    fn analytics() -> CallAnalytics {
        serde_json::from_str(
            r#"{
                "outcome_counts": {"agreed": 2, "price_rejected": 1},
                "sentiment_counts": {"positive": 3},
                "by_day": [
                    {"date": "2024-01-01", "agreed": 2},
                    {"date": "2024-01-02", "price_rejected": 1}
                ]
            }"#,
        )
        .unwrap()
    }

    fn loads() -> Vec<Load> {
        serde_json::from_str(
            r#"[{"load_id": "L-1", "origin": "Chicago, IL", "equipment_type": "Dry Van",
                 "loadboard_rate": 1200, "miles": 800}]"#,
        )
        .unwrap()
    }

    #[test]
    fn loading_status_short_circuits() {
        let dashboard = assemble(None, None, None);
        let text = render_dashboard(&dashboard, &DashboardStatus::Loading, 7);
        assert!(text.contains("Loading…"));
        assert!(!text.contains("Rate distribution"));
    }

    #[test]
    fn ready_dashboard_lists_every_section() {
        let loads = loads();
        let analytics = analytics();
        let dashboard = assemble(Some(&loads[..]), Some(&analytics), None);
        let text = render_dashboard(&dashboard, &DashboardStatus::Ready, 7);

        assert!(text.contains("Dry Van"));
        assert!(text.contains("≤1500"));
        assert!(text.contains("Call outcomes (last 7 days)"));
        assert!(text.contains("price_rejected"));
        assert!(text.contains("No recent calls."));
        assert!(text.ends_with("Showing 1 load(s).\n"));

        let day_one = text.lines().find(|l| l.contains("2024-01-01")).unwrap();
        let cells: Vec<_> = day_one.split_whitespace().collect();
        assert_eq!(cells, ["2024-01-01", "2", "0"]);
    }

    #[test]
    fn failures_are_listed_but_charts_still_render() {
        let loads = loads();
        let dashboard = assemble(Some(&loads[..]), None, None);
        let inputs = DashboardInputs::default();
        let status = DashboardStatus::from_inputs(&inputs, &["call analytics: timeout".to_string()]);
        let text = render_dashboard(&dashboard, &status, 7);
        assert!(text.contains("Error: call analytics: timeout"));
        assert!(text.contains("Dry Van"));
        assert!(text.contains("(no calls)"));
    }

    #[test]
    fn load_table_renders_rows() {
        let text = render_load_table(&loads());
        assert!(text.contains("L-1"));
        assert!(text.contains("$1200"));
        assert!(text.contains("800"));
        assert_eq!(render_load_table(&[]), "No rows.\n");
    }
}
