//! Period definition and validation

use crate::period::labels::month_label;
use crate::ConfigError;
use std::fmt;

/// A (month, year) pair identifying one disclosure cycle
///
/// Built only through [`Period::new`], so a `Period` value always holds a
/// month in 1..=12 and a positive year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    month: u32,
    year: u32,
}

impl Period {
    /// Creates a validated period
    ///
    /// # Arguments
    ///
    /// * `month` - Month number, 1 through 12
    /// * `year` - Four-digit year, must be positive
    ///
    /// # Returns
    ///
    /// * `Ok(Period)` - The validated period
    /// * `Err(ConfigError)` - Month or year out of range
    ///
    /// # Example
    ///
    /// ```
    /// use tjpb_crawler::period::Period;
    ///
    /// let period = Period::new(3, 2012).unwrap();
    /// assert_eq!(period.to_string(), "03-2012");
    /// ```
    pub fn new(month: u32, year: u32) -> Result<Self, ConfigError> {
        if !(1..=12).contains(&month) {
            return Err(ConfigError::Validation(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }

        if year == 0 {
            return Err(ConfigError::Validation(
                "year must be a positive integer".to_string(),
            ));
        }

        Ok(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    /// Localized label used by the portal's older year listings, e.g. "Março 2012"
    pub fn label(&self) -> String {
        // month is validated in `new`, so the lookup always hits
        let name = month_label(self.month).unwrap_or_default();
        format!("{} {:04}", name, self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}
