// Time series domain models
use serde::Deserialize;

/// One sample of a series. Graphite encodes it as `[value, timestamp]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "(Option<f64>, i64)")]
pub struct DataPoint {
    pub value: Option<f64>,
    pub timestamp: i64,
}

impl DataPoint {
    #[cfg(test)]
    pub fn new(value: Option<f64>, timestamp: i64) -> Self {
        Self { value, timestamp }
    }
}

impl From<(Option<f64>, i64)> for DataPoint {
    fn from((value, timestamp): (Option<f64>, i64)) -> Self {
        Self { value, timestamp }
    }
}

/// A sample that is known to carry a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Series {
    #[serde(rename = "target")]
    pub name: String,
    #[serde(default)]
    pub datapoints: Vec<DataPoint>,
}

impl Series {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, datapoints: Vec<DataPoint>) -> Self {
        Self {
            name: name.into(),
            datapoints,
        }
    }

    /// Most recent datapoint with a non-null value, scanning from the end.
    pub fn last_valid(&self) -> Option<Sample> {
        self.datapoints.iter().rev().find_map(|p| {
            p.value.map(|value| Sample {
                value,
                timestamp: p.timestamp,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_graphite_render() {
        let body = r#"[{"target": "cpu.value", "datapoints": [[1.5, 100], [null, 160]]}]"#;
        let series: Vec<Series> = serde_json::from_str(body).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "cpu.value");
        assert_eq!(
            series[0].datapoints,
            vec![DataPoint::new(Some(1.5), 100), DataPoint::new(None, 160)]
        );
    }

    #[test]
    fn test_last_valid_skips_trailing_nulls() {
        let series = Series::new(
            "cpu",
            vec![
                DataPoint::new(Some(1.0), 10),
                DataPoint::new(Some(2.0), 20),
                DataPoint::new(None, 30),
                DataPoint::new(None, 40),
            ],
        );

        assert_eq!(
            series.last_valid(),
            Some(Sample {
                value: 2.0,
                timestamp: 20
            })
        );
    }

    #[test]
    fn test_last_valid_all_null() {
        let series = Series::new("cpu", vec![DataPoint::new(None, 10)]);
        assert_eq!(series.last_valid(), None);
        assert_eq!(Series::new("empty", vec![]).last_valid(), None);
    }
}
