//! Chart data: labels, threshold colors and the renderable model.
//!
//! Rendering to SVG lives in [`svg`]; ownership of the single live chart
//! lives in [`slot`].

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::{ForecastError, ForecastSeries};

pub mod slot;
pub mod svg;

pub use slot::{ChartId, ChartSlot, RenderedChart};
pub use svg::SvgRenderer;

/// Above this a reading is hot. Exclusive.
pub const HOT_ABOVE_C: f64 = 30.0;
/// Below this a reading is cold. Exclusive.
pub const COLD_BELOW_C: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TempClass {
    Hot,
    Cold,
    Neutral,
}

impl TempClass {
    pub fn color(self) -> Rgb {
        match self {
            TempClass::Hot => Rgb(0xff, 0x4d, 0x4d),
            TempClass::Cold => Rgb(0x33, 0x99, 0xff),
            TempClass::Neutral => Rgb(0x66, 0x66, 0x66),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Threshold rule shared by line segments and points.
pub fn classify(temperature: f64) -> TempClass {
    if temperature > HOT_ABOVE_C {
        TempClass::Hot
    } else if temperature < COLD_BELOW_C {
        TempClass::Cold
    } else {
        TempClass::Neutral
    }
}

/// `2024-06-01T07:00` → `1/6 7:00`.
pub fn format_label(timestamp: &str) -> Result<String, ForecastError> {
    let parsed = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| ForecastError::Parse(format!("bad timestamp '{timestamp}': {e}")))?;

    Ok(format!("{}/{} {}:00", parsed.day(), parsed.month(), parsed.hour()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub temperature: f64,
    pub class: TempClass,
}

/// The line between two consecutive points, colored by where it ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
    pub class: TempClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartModel {
    pub title: String,
    pub series_label: String,
    pub points: Vec<ChartPoint>,
}

impl ChartModel {
    pub fn from_series(title: impl Into<String>, series: &ForecastSeries) -> Result<Self, ForecastError> {
        if series.times.len() != series.temperatures.len() {
            return Err(ForecastError::SeriesMismatch {
                times: series.times.len(),
                temperatures: series.temperatures.len(),
            });
        }

        let points = series
            .times
            .iter()
            .zip(&series.temperatures)
            .map(|(time, &temperature)| {
                Ok(ChartPoint {
                    label: format_label(time)?,
                    temperature,
                    class: classify(temperature),
                })
            })
            .collect::<Result<Vec<_>, ForecastError>>()?;

        Ok(Self {
            title: title.into(),
            series_label: "Temperature (°C)".to_string(),
            points,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).enumerate().map(|(i, pair)| Segment {
            from: i,
            to: i + 1,
            class: pair[1].class,
        })
    }

    /// (min, max) temperature, or `None` for an empty chart.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.temperature).fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(&str, f64)]) -> ForecastSeries {
        ForecastSeries {
            times: points.iter().map(|(t, _)| t.to_string()).collect(),
            temperatures: points.iter().map(|(_, v)| *v).collect(),
            timezone: None,
        }
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(31.0), TempClass::Hot);
        assert_eq!(classify(5.0), TempClass::Cold);
        assert_eq!(classify(20.0), TempClass::Neutral);
    }

    #[test]
    fn classify_boundaries_are_exclusive() {
        assert_eq!(classify(30.0), TempClass::Neutral);
        assert_eq!(classify(10.0), TempClass::Neutral);
        assert_eq!(classify(30.01), TempClass::Hot);
        assert_eq!(classify(9.99), TempClass::Cold);
    }

    #[test]
    fn class_colors() {
        assert_eq!(TempClass::Hot.color().hex(), "#ff4d4d");
        assert_eq!(TempClass::Cold.color().hex(), "#3399ff");
        assert_eq!(TempClass::Neutral.color().hex(), "#666666");
    }

    #[test]
    fn labels_have_no_zero_padding() {
        assert_eq!(format_label("2024-06-01T07:00").unwrap(), "1/6 7:00");
        assert_eq!(format_label("2024-12-25T23:00").unwrap(), "25/12 23:00");
        assert_eq!(format_label("2024-01-09T00:00:00").unwrap(), "9/1 0:00");
    }

    #[test]
    fn bad_label_is_a_parse_error() {
        let err = format_label("yesterday").unwrap_err();
        assert!(matches!(err, ForecastError::Parse(_)));
    }

    #[test]
    fn model_has_one_point_per_sample() {
        let s = series(&[
            ("2024-06-01T00:00", 8.0),
            ("2024-06-01T01:00", 15.0),
            ("2024-06-01T02:00", 32.5),
        ]);
        let model = ChartModel::from_series("t", &s).unwrap();

        assert_eq!(model.len(), 3);
        let classes: Vec<_> = model.points.iter().map(|p| p.class).collect();
        assert_eq!(classes, vec![TempClass::Cold, TempClass::Neutral, TempClass::Hot]);
        assert_eq!(model.range(), Some((8.0, 32.5)));
    }

    #[test]
    fn segments_take_the_end_point_class() {
        let s = series(&[
            ("2024-06-01T00:00", 35.0),
            ("2024-06-01T01:00", 5.0),
            ("2024-06-01T02:00", 20.0),
        ]);
        let model = ChartModel::from_series("t", &s).unwrap();
        let segments: Vec<_> = model.segments().collect();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], Segment { from: 0, to: 1, class: TempClass::Cold });
        assert_eq!(segments[1], Segment { from: 1, to: 2, class: TempClass::Neutral });
    }

    #[test]
    fn mismatched_series_is_rejected() {
        let s = ForecastSeries {
            times: vec!["2024-06-01T00:00".into()],
            temperatures: vec![],
            timezone: None,
        };
        let err = ChartModel::from_series("t", &s).unwrap_err();
        assert!(matches!(err, ForecastError::SeriesMismatch { times: 1, temperatures: 0 }));
    }

    #[test]
    fn empty_series_gives_empty_model() {
        let model = ChartModel::from_series("t", &ForecastSeries::default()).unwrap();
        assert!(model.is_empty());
        assert_eq!(model.range(), None);
        assert_eq!(model.segments().count(), 0);
    }
}
