use std::collections::HashMap;

use serde::Serialize;

use crate::model::CountryGroup;

/// Per-date sums of cases and deaths, aligned with `labels`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub cases: Vec<i64>,
    pub deaths: Vec<i64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Sum the records of the selected country (or of every country) per raw date string.
///
/// Labels come out in the order dates are first seen, not in calendar order.
pub fn build_series(groups: &[CountryGroup], selected: Option<&str>) -> Series {
    let mut series = Series::default();
    let mut index: HashMap<&str, usize> = HashMap::new();

    let selected_groups = groups
        .iter()
        .filter(|group| selected.map_or(true, |country| group.country == country));

    for group in selected_groups {
        for record in &group.records {
            let slot = *index.entry(record.date.as_str()).or_insert_with(|| {
                series.labels.push(record.date.clone());
                series.cases.push(0);
                series.deaths.push(0);
                series.labels.len() - 1
            });

            series.cases[slot] += record.cases;
            series.deaths[slot] += record.deaths;
        }
    }

    series
}

/// A [Series] laid out as SVG polylines inside a `width` x `height` box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plot {
    pub width: f64,
    pub height: f64,
    pub y_min: i64,
    pub y_max: i64,
    pub cases: String,
    pub deaths: String,
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub x: f64,
    pub label: String,
}

const MAX_TICKS: usize = 8;

impl Plot {
    pub fn layout(series: &Series, width: f64, height: f64) -> Plot {
        let values = series.cases.iter().chain(&series.deaths);
        let y_min = values.clone().copied().min().unwrap_or(0).min(0);
        let y_max = values.copied().max().unwrap_or(0).max(y_min + 1);

        let step = match series.len() {
            0 | 1 => 0.0,
            n => width / (n - 1) as f64,
        };
        let span = (y_max - y_min) as f64;
        let y = |value: i64| height - (value - y_min) as f64 / span * height;

        let points = |values: &[i64]| {
            values
                .iter()
                .enumerate()
                .map(|(i, &value)| format!("{:.1},{:.1}", i as f64 * step, y(value)))
                .collect::<Vec<_>>()
                .join(" ")
        };

        let every = series.len().div_ceil(MAX_TICKS).max(1);
        let ticks = series
            .labels
            .iter()
            .enumerate()
            .step_by(every)
            .map(|(i, label)| Tick {
                x: i as f64 * step,
                label: label.clone(),
            })
            .collect();

        Plot {
            width,
            height,
            y_min,
            y_max,
            cases: points(&series.cases),
            deaths: points(&series.deaths),
            ticks,
        }
    }
}
