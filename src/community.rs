//! Community statistics the dashboard compares a user against

use crate::dataset::Dataset;
use crate::types::Gender;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One bin of the calorie histogram, covering `[lower, upper)` (the last
/// bin also includes its upper edge)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Least-squares line `calories = slope * heart_rate + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenderSummary {
    pub gender: Gender,
    pub records: usize,
    pub mean_calories: f64,
    pub mean_bmi: f64,
}

/// Everything the comparison panels need for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityComparison {
    pub calorie_histogram: Vec<HistogramBin>,
    /// Share of community workouts burning fewer calories than the user
    pub calorie_percentile: f64,
    pub mean_calories_by_age: BTreeMap<u32, f64>,
    /// Community mean at the user's age, if any record has it
    pub mean_calories_at_age: Option<f64>,
    pub heart_rate_trend: Option<TrendLine>,
    pub by_gender: Vec<GenderSummary>,
}

impl CommunityComparison {
    pub fn build(dataset: &Dataset, calories: f64, age: u32, bins: usize) -> Self {
        let mean_calories_by_age = mean_calories_by_age(dataset);
        Self {
            calorie_histogram: calorie_histogram(dataset, bins),
            calorie_percentile: percentile_of(dataset, calories),
            mean_calories_at_age: mean_calories_by_age.get(&age).copied(),
            mean_calories_by_age,
            heart_rate_trend: heart_rate_trend(dataset),
            by_gender: gender_summaries(dataset),
        }
    }
}

/// Equal-width histogram of the calorie labels.
///
/// Empty when the dataset is empty or `bins` is zero; a single bin when
/// every label is equal.
pub fn calorie_histogram(dataset: &Dataset, bins: usize) -> Vec<HistogramBin> {
    let Some((lo, hi)) = dataset.label_range() else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if hi <= lo {
        return vec![HistogramBin {
            lower: lo,
            upper: hi,
            count: dataset.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for record in dataset.records() {
        let index = (((record.calories - lo) / width) as usize).min(bins - 1);
        histogram[index].count += 1;
    }

    histogram
}

/// Percentage (0-100) of records with fewer calories than `calories`
pub fn percentile_of(dataset: &Dataset, calories: f64) -> f64 {
    if dataset.is_empty() {
        return 0.0;
    }
    let below = dataset.records().iter().filter(|r| r.calories < calories).count();
    below as f64 / dataset.len() as f64 * 100.0
}

pub fn mean_calories_by_age(dataset: &Dataset) -> BTreeMap<u32, f64> {
    let mut sums: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in dataset.records() {
        let entry = sums.entry(record.age).or_insert((0.0, 0));
        entry.0 += record.calories;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(age, (sum, count))| (age, sum / count as f64))
        .collect()
}

/// Ordinary least squares of calories on heart rate.
///
/// `None` with fewer than two records or no spread in heart rate.
pub fn heart_rate_trend(dataset: &Dataset) -> Option<TrendLine> {
    let records = dataset.records();
    if records.len() < 2 {
        return None;
    }

    let n = records.len() as f64;
    let mean_x = records.iter().map(|r| r.heart_rate_bpm).sum::<f64>() / n;
    let mean_y = records.iter().map(|r| r.calories).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for r in records {
        let dx = r.heart_rate_bpm - mean_x;
        let dy = r.calories - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx <= 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let r_squared = if syy > 0.0 { sxy * sxy / (sxx * syy) } else { 1.0 };

    Some(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
        r_squared,
    })
}

/// Per-gender counts and means, male first; genders with no records are
/// left out
pub fn gender_summaries(dataset: &Dataset) -> Vec<GenderSummary> {
    [Gender::Male, Gender::Female]
        .into_iter()
        .filter_map(|gender| {
            let group: Vec<_> = dataset
                .records()
                .iter()
                .filter(|r| r.gender == gender)
                .collect();
            if group.is_empty() {
                return None;
            }
            let n = group.len() as f64;
            Some(GenderSummary {
                gender,
                records: group.len(),
                mean_calories: group.iter().map(|r| r.calories).sum::<f64>() / n,
                mean_bmi: group.iter().map(|r| r.bmi).sum::<f64>() / n,
            })
        })
        .collect()
}
