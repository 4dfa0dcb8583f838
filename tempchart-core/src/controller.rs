//! One search: resolve → fetch → render → swap chart, with UI state kept
//! in step.

use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::{
    Config, ForecastError, Location, SearchQuery, ViewState,
    chart::{ChartId, ChartModel, ChartSlot, SvgRenderer},
    provider::{ForecastSource, Geocoder, open_meteo_from_config},
};

/// What a finished search produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSummary {
    pub id: ChartId,
    pub location: Location,
    pub points: usize,
    pub path: Option<PathBuf>,
    pub first_label: Option<String>,
    pub last_label: Option<String>,
    /// (min, max) °C.
    pub range: Option<(f64, f64)>,
    pub replaced: Option<ChartId>,
}

#[derive(Debug)]
pub enum SearchOutcome {
    /// Blank input; nothing happened.
    Skipped,
    Rendered(ChartSummary),
    Failed(ForecastError),
    /// A newer search started before this one finished; its result was dropped.
    Superseded,
}

impl SearchOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, SearchOutcome::Rendered(_))
    }
}

#[derive(Debug)]
pub struct SearchController {
    geocoder: Box<dyn Geocoder>,
    forecasts: Box<dyn ForecastSource>,
    renderer: SvgRenderer,
    output: Option<PathBuf>,
    days: u32,
    chart: Mutex<ChartSlot>,
    state: watch::Sender<ViewState>,
    generation: AtomicU64,
}

impl SearchController {
    pub fn new(geocoder: Box<dyn Geocoder>, forecasts: Box<dyn ForecastSource>) -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            geocoder,
            forecasts,
            renderer: SvgRenderer::default(),
            output: None,
            days: 5,
            chart: Mutex::new(ChartSlot::new()),
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Open-Meteo clients, writing charts to `config.output`.
    pub fn from_config(config: &Config) -> Result<Self, ForecastError> {
        let (geocoder, forecasts) = open_meteo_from_config(config)?;
        let mut controller = Self::new(geocoder, forecasts).with_output(Some(config.output.clone()));
        controller.days = config.forecast_days;
        Ok(controller)
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_renderer(mut self, renderer: SvgRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn state(&self) -> ViewState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn live_charts(&self) -> usize {
        self.chart.lock().live()
    }

    /// SVG of the chart currently on display.
    pub fn current_svg(&self) -> Option<String> {
        self.chart.lock().current().map(|c| c.svg().to_string())
    }

    pub async fn search(&self, query: &SearchQuery) -> SearchOutcome {
        let Some(city) = query.city() else {
            tracing::debug!("blank search ignored");
            return SearchOutcome::Skipped;
        };

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(ViewState::Loading);

        let fetched = self.fetch(city, query.start).await;

        // Staleness is checked under the chart lock so that a newer search
        // cannot slip in between the check and the swap.
        let mut slot = self.chart.lock();
        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::warn!(city, "discarding result of superseded search");
            return SearchOutcome::Superseded;
        }

        let result = fetched.and_then(|(location, model)| {
            let rendered = self.renderer.render(&model, self.output.clone())?;
            let id = rendered.id();
            let path = rendered.path().map(PathBuf::from);
            let replaced = slot.replace(rendered)?;

            Ok(ChartSummary {
                id,
                location,
                points: model.len(),
                path,
                first_label: model.points.first().map(|p| p.label.clone()),
                last_label: model.points.last().map(|p| p.label.clone()),
                range: model.range(),
                replaced,
            })
        });

        match result {
            Ok(summary) => {
                tracing::info!(city, points = summary.points, id = %summary.id, "forecast chart ready");
                self.set_state(ViewState::Success);
                SearchOutcome::Rendered(summary)
            }
            Err(e) => {
                tracing::error!(city, error = %e, "search failed");
                self.set_state(ViewState::Error);
                SearchOutcome::Failed(e)
            }
        }
    }

    async fn fetch(
        &self,
        city: &str,
        start: Option<NaiveDate>,
    ) -> Result<(Location, ChartModel), ForecastError> {
        let location = self.geocoder.resolve(city).await?;
        let series = self.forecasts.fetch(&location, start).await?;

        let place = location.display_name().unwrap_or_else(|| city.to_string());
        let title = format!("{}-day forecast · {place}", self.days);
        let model = ChartModel::from_series(title, &series)?;

        Ok((location, model))
    }

    fn set_state(&self, next: ViewState) {
        let prev = self.state.send_replace(next);
        if !prev.can_transition_to(next) {
            tracing::warn!(%prev, %next, "unexpected view state transition");
        }
        tracing::debug!(%prev, %next, "view state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ForecastSeries;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedGeocoder(Option<Location>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn resolve(&self, city: &str) -> Result<Location, ForecastError> {
            self.0.clone().ok_or_else(|| ForecastError::LocationNotFound(city.to_string()))
        }
    }

    #[derive(Debug)]
    struct FixedForecast(ForecastSeries);

    #[async_trait]
    impl ForecastSource for FixedForecast {
        async fn fetch(
            &self,
            _location: &Location,
            _start: Option<NaiveDate>,
        ) -> Result<ForecastSeries, ForecastError> {
            Ok(self.0.clone())
        }
    }

    fn hours(n: usize) -> ForecastSeries {
        ForecastSeries {
            times: (0..n).map(|h| format!("2024-06-{:02}T{:02}:00", 1 + h / 24, h % 24)).collect(),
            temperatures: (0..n).map(|h| h as f64 % 40.0).collect(),
            timezone: Some("Europe/Madrid".into()),
        }
    }

    fn controller(location: Option<Location>, series: ForecastSeries) -> SearchController {
        SearchController::new(Box::new(FixedGeocoder(location)), Box::new(FixedForecast(series)))
    }

    #[tokio::test]
    async fn blank_query_changes_nothing() {
        let c = controller(None, hours(0));
        let outcome = c.search(&SearchQuery::new("  ")).await;

        assert!(matches!(outcome, SearchOutcome::Skipped));
        assert_eq!(c.state(), ViewState::Idle);
        assert_eq!(c.live_charts(), 0);
    }

    #[tokio::test]
    async fn unknown_city_ends_in_error() {
        let c = controller(None, hours(24));
        let outcome = c.search(&SearchQuery::new("Atlantis")).await;

        match outcome {
            SearchOutcome::Failed(e) => assert!(e.is_not_found()),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(c.state(), ViewState::Error);
        assert!(c.state().visibility().error);
    }

    #[tokio::test]
    async fn success_renders_every_point() {
        let c = controller(Some(Location::new(40.4168, -3.7038)), hours(120));
        let outcome = c.search(&SearchQuery::new("Madrid")).await;

        let SearchOutcome::Rendered(summary) = outcome else {
            panic!("expected a chart");
        };
        assert_eq!(summary.points, 120);
        assert_eq!(summary.first_label.as_deref(), Some("1/6 0:00"));
        assert_eq!(summary.last_label.as_deref(), Some("5/6 23:00"));
        assert_eq!(summary.replaced, None);
        assert_eq!(c.state(), ViewState::Success);
        assert_eq!(c.live_charts(), 1);
    }

    #[tokio::test]
    async fn second_search_replaces_first_chart() {
        let c = controller(Some(Location::new(40.4168, -3.7038)), hours(24));

        let SearchOutcome::Rendered(first) = c.search(&SearchQuery::new("Madrid")).await else {
            panic!("expected a chart");
        };
        let SearchOutcome::Rendered(second) = c.search(&SearchQuery::new("Madrid")).await else {
            panic!("expected a chart");
        };

        assert_eq!(second.replaced, Some(first.id));
        assert_eq!(c.live_charts(), 1);
    }

    #[tokio::test]
    async fn mismatched_series_is_an_error() {
        let mut broken = hours(3);
        broken.temperatures.pop();
        let c = controller(Some(Location::new(1.0, 1.0)), broken);
        let outcome = c.search(&SearchQuery::new("x")).await;

        assert!(matches!(outcome, SearchOutcome::Failed(ForecastError::SeriesMismatch { .. })));
        assert_eq!(c.state(), ViewState::Error);
        assert_eq!(c.live_charts(), 0);
    }

    #[tokio::test]
    async fn subscribers_see_final_state() {
        let c = controller(Some(Location::new(1.0, 1.0)), hours(2));
        let rx = c.subscribe();

        c.search(&SearchQuery::new("x")).await;
        assert_eq!(*rx.borrow(), ViewState::Success);
    }
}
