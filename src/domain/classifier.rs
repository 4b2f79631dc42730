// Health state of one series against its bounds
use super::event::CheckState;
use super::series::Sample;

/// Samples older than this (relative to the evaluation time) are stale.
pub const STALENESS_WINDOW_SECS: i64 = 180;

/// A bound as seen at the timestamp of the latest sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// The check has no bound on this side.
    Undefined,
    /// A bound is defined but could not be computed at that instant.
    Uncomputable,
    At(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub state: CheckState,
    pub summary: String,
}

/// Classifies the latest sample of `series_name`.
///
/// `reference` is the evaluation time minus the staleness window. Missing or
/// stale data and uncomputable bounds win over breaches; the lower bound is
/// tested before the upper one.
pub fn classify(
    series_name: &str,
    last: Option<Sample>,
    lower: Bound,
    upper: Bound,
    reference: i64,
) -> Classification {
    let fresh = last.filter(|s| s.timestamp >= reference);
    let sample = match fresh {
        Some(sample) if lower != Bound::Uncomputable && upper != Bound::Uncomputable => sample,
        _ => {
            return Classification {
                state: CheckState::Warning,
                summary: format!(
                    "the value of {} is missing for more than {} seconds",
                    series_name, STALENESS_WINDOW_SECS
                ),
            };
        }
    };

    if let Bound::At(lower) = lower {
        if sample.value < lower {
            return Classification {
                state: CheckState::Critical,
                summary: format!(
                    "the value of {}({}) is beyond the lower bound ({})",
                    series_name, sample.value, lower
                ),
            };
        }
    }

    if let Bound::At(upper) = upper {
        if sample.value > upper {
            return Classification {
                state: CheckState::Critical,
                summary: format!(
                    "the value of {}({}) is beyond the upper bound ({})",
                    series_name, sample.value, upper
                ),
            };
        }
    }

    Classification {
        state: CheckState::Ok,
        summary: format!("the value of {} is within range", series_name),
    }
}
