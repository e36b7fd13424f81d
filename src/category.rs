//! Health category for an overall air-quality index value

use serde::{Deserialize, Serialize};

/// US EPA index bands
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Band containing `aqi`; upper bounds are inclusive
    #[must_use]
    pub fn from_aqi(aqi: f64) -> Self {
        match aqi {
            a if a <= 50.0 => AqiCategory::Good,
            a if a <= 100.0 => AqiCategory::Moderate,
            a if a <= 150.0 => AqiCategory::UnhealthyForSensitiveGroups,
            a if a <= 200.0 => AqiCategory::Unhealthy,
            a if a <= 300.0 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    #[must_use]
    pub fn health_implications(self) -> &'static str {
        match self {
            AqiCategory::Good => {
                "Air quality is considered satisfactory, and air pollution poses little or no risk."
            }
            AqiCategory::Moderate => {
                "Air quality is acceptable; however, there may be some pollution that poses a moderate health concern for a very small number of individuals who are unusually sensitive to air pollution."
            }
            AqiCategory::UnhealthyForSensitiveGroups => {
                "Members of sensitive groups may experience health effects. The general public is not likely to be affected."
            }
            AqiCategory::Unhealthy => {
                "Everyone may begin to experience health effects; members of sensitive groups may experience more serious health effects."
            }
            AqiCategory::VeryUnhealthy => {
                "Health alert: everyone may experience more serious health effects."
            }
            AqiCategory::Hazardous => {
                "Health warning of emergency conditions. The entire population is more likely to be affected."
            }
        }
    }

    #[must_use]
    pub fn cautionary_statement(self) -> &'static str {
        match self {
            AqiCategory::Good => "None.",
            AqiCategory::Moderate => {
                "Unusually sensitive people should consider reducing prolonged or heavy exertion."
            }
            AqiCategory::UnhealthyForSensitiveGroups => {
                "Active children and adults, and people with respiratory disease, such as asthma, should limit prolonged outdoor exertion."
            }
            AqiCategory::Unhealthy => {
                "Active children and adults, and people with respiratory disease, such as asthma, should avoid prolonged outdoor exertion; everyone else, especially children, should limit prolonged outdoor exertion."
            }
            AqiCategory::VeryUnhealthy | AqiCategory::Hazardous => {
                "Everyone should avoid all outdoor exertion."
            }
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
