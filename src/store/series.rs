use crate::history::Reading;
use crate::timezone::convert_timestamp;
use chrono::DateTime;
use chrono_tz::Tz;
use tracing::warn;

/// Index-aligned timestamps and values for one attribute.
///
/// Both vectors always have the same length; the constructors are the only
/// way to build one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    timestamps: Vec<DateTime<Tz>>,
    values: Vec<f64>,
}

impl Series {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from (timestamp, value) pairs
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Tz>, f64)>,
    {
        let (timestamps, values) = points.into_iter().unzip();
        Self { timestamps, values }
    }

    /// Convert fetched readings into display-zone points.
    ///
    /// A reading whose timestamp cannot be parsed, or whose value is not
    /// numeric, is dropped whole so the two sequences stay aligned.
    pub fn from_readings(attribute: &str, readings: &[Reading], tz: Tz) -> Self {
        Self::from_points(readings.iter().filter_map(|reading| {
            let timestamp = match convert_timestamp(&reading.recv_time, tz) {
                Ok(ts) => ts,
                Err(e) => {
                    warn!(attribute = %attribute, error = %e, "Dropping reading");
                    return None;
                }
            };
            match reading.value() {
                Some(value) => Some((timestamp, value)),
                None => {
                    warn!(
                        attribute = %attribute,
                        attr_value = %reading.attr_value,
                        "Dropping reading with non-numeric value"
                    );
                    None
                }
            }
        }))
    }

    pub fn timestamps(&self) -> &[DateTime<Tz>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean of the values, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }
}
