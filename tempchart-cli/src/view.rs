//! Terminal rendition of the three output regions.

use tempchart_core::{ChartSummary, SearchOutcome, ViewState, Visibility};

pub fn loading(city: &str) {
    eprintln!("{}", loading_line(city));
}

pub fn outcome(state: ViewState, outcome: &SearchOutcome) {
    if let Some(line) = render(state.visibility(), outcome) {
        println!("{line}");
    }
}

fn loading_line(city: &str) -> String {
    format!("Loading forecast for {city}...")
}

fn render(visibility: Visibility, outcome: &SearchOutcome) -> Option<String> {
    match outcome {
        SearchOutcome::Rendered(summary) if visibility.chart => Some(success_line(summary)),
        SearchOutcome::Failed(_) if visibility.error => {
            Some("Could not load the forecast. Check the city name and try again.".to_string())
        }
        _ => None,
    }
}

fn success_line(summary: &ChartSummary) -> String {
    let place = summary
        .location
        .display_name()
        .unwrap_or_else(|| format!("{:.4}, {:.4}", summary.location.latitude, summary.location.longitude));

    let mut line = format!("{place}: {} hourly points", summary.points);
    if let (Some(first), Some(last)) = (&summary.first_label, &summary.last_label) {
        line.push_str(&format!(" ({first} to {last})"));
    }
    if let Some((lo, hi)) = summary.range {
        line.push_str(&format!(", {lo:.1}°C to {hi:.1}°C"));
    }
    if let Some(path) = &summary.path {
        line.push_str(&format!("\nChart written to {}", path.display()));
    }
    line
}
