//! Early warnings and health recommendations derived from an AQI value.

use serde::Serialize;

use crate::aqi::calculator::Aqi;
use crate::aqi::category::AqiCategory;

/// Alert level shown alongside a prediction.
///
/// | AQI      | Level     | Colour |
/// |----------|-----------|--------|
/// | >= 150   | High      | red    |
/// | >= 100   | Moderate  | orange |
/// | >= 50    | Good      | yellow |
/// | < 50     | Excellent | green  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    Excellent,
    Good,
    Moderate,
    High,
}

impl WarningLevel {
    pub fn message(self) -> &'static str {
        match self {
            WarningLevel::High => {
                "Early Warning! AQI is high. Take necessary precautions to avoid health issues."
            }
            WarningLevel::Moderate => {
                "Warning: Air quality is moderate. Sensitive individuals should limit outdoor activities."
            }
            WarningLevel::Good => "Air Quality is Good. No immediate health concerns.",
            WarningLevel::Excellent => "Excellent Air Quality. No health risks.",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            WarningLevel::High => "red",
            WarningLevel::Moderate => "orange",
            WarningLevel::Good => "yellow",
            WarningLevel::Excellent => "green",
        }
    }
}

pub fn early_warning(aqi: Aqi) -> WarningLevel {
    match aqi.value() {
        v if v >= 150 => WarningLevel::High,
        v if v >= 100 => WarningLevel::Moderate,
        v if v >= 50 => WarningLevel::Good,
        _ => WarningLevel::Excellent,
    }
}

/// Likely causes and prevention measures for one AQI category.
#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub category: AqiCategory,
    pub summary: &'static str,
    pub causes: [&'static str; 5],
    pub prevention: [&'static str; 5],
}

static RECOMMENDATIONS: [Recommendation; 6] = [
    Recommendation {
        category: AqiCategory::Good,
        summary: "Air quality is satisfactory, and air pollution poses little or no risk.",
        causes: [
            "Minimal emissions from vehicles and industries.",
            "Low levels of natural air pollutants.",
            "Clean energy sources being used widely.",
            "Favorable weather conditions dispersing pollutants.",
            "Low urban traffic congestion.",
        ],
        prevention: [
            "Continue using clean energy sources.",
            "Maintain low emissions from vehicles and industries.",
            "Encourage walking and biking to reduce traffic.",
            "Support policies for reducing air pollution.",
            "Promote awareness of air quality benefits.",
        ],
    },
    Recommendation {
        category: AqiCategory::Moderate,
        summary: "Air quality is acceptable; however, some pollutants may be a concern for sensitive individuals.",
        causes: [
            "Slight increase in vehicle emissions.",
            "Higher industrial activity producing moderate pollutants.",
            "Pollutants from household activities, such as heating.",
            "Weather conditions allowing pollutants to accumulate.",
            "Occasional high traffic congestion.",
        ],
        prevention: [
            "Limit outdoor activities for sensitive individuals.",
            "Use eco-friendly transport options like carpooling.",
            "Reduce household emissions (e.g., using cleaner fuels).",
            "Maintain proper ventilation indoors.",
            "Encourage the use of public transportation.",
        ],
    },
    Recommendation {
        category: AqiCategory::UnhealthyForSensitiveGroups,
        summary: "Members of sensitive groups may experience health effects.",
        causes: [
            "Higher levels of pollutants like PM2.5 and ozone.",
            "Emissions from vehicles and factories in urban areas.",
            "Weather conditions like temperature inversions trapping pollutants.",
            "Dust storms or wildfires contributing to particulate matter.",
            "Industrial waste or agricultural activity releasing pollutants.",
        ],
        prevention: [
            "Sensitive individuals should limit outdoor activities.",
            "Install air purifiers indoors.",
            "Reduce vehicle usage, especially in peak hours.",
            "Encourage urban green spaces to improve air quality.",
            "Stay hydrated and wear protective masks outdoors.",
        ],
    },
    Recommendation {
        category: AqiCategory::Unhealthy,
        summary: "Everyone may experience health effects; sensitive groups may experience more serious effects.",
        causes: [
            "High levels of pollution from industrial emissions.",
            "Traffic congestion in densely populated areas.",
            "Seasonal smog or haze affecting air quality.",
            "Burning of fossil fuels contributing to elevated emissions.",
            "Climatic conditions limiting the dispersal of pollutants.",
        ],
        prevention: [
            "Avoid prolonged outdoor activities.",
            "Wear protective masks, especially for children and elderly.",
            "Use air purifiers indoors to reduce pollution exposure.",
            "Limit industrial and vehicular emissions.",
            "Follow health advisories issued by local authorities.",
        ],
    },
    Recommendation {
        category: AqiCategory::VeryUnhealthy,
        summary: "Health alert: everyone may experience more serious health effects.",
        causes: [
            "Extreme pollution from uncontrolled industrial activities.",
            "High levels of particulate matter from wildfire smoke.",
            "Vehicle emissions in high-density urban areas.",
            "Seasonal weather patterns trapping air pollutants.",
            "Air pollution from both local and distant sources.",
        ],
        prevention: [
            "Avoid all outdoor activities.",
            "Keep windows and doors closed to limit outdoor air infiltration.",
            "Use high-efficiency air filters indoors.",
            "Follow health guidelines from local health authorities.",
            "Use air quality apps to stay updated and reduce exposure.",
        ],
    },
    Recommendation {
        category: AqiCategory::Hazardous,
        summary: "Health warnings of emergency conditions. The entire population is more likely to be affected.",
        causes: [
            "Severe pollution from wildfires, industrial disasters, or major accidents.",
            "Large-scale emissions from factories, power plants, and refineries.",
            "Persistent weather conditions causing pollutant buildup.",
            "High concentrations of toxic air pollutants like sulfur dioxide.",
            "Extreme weather conditions like heat waves worsening air quality.",
        ],
        prevention: [
            "Remain indoors and avoid all outdoor activities.",
            "Keep windows closed and use air conditioning with proper filtration.",
            "Follow emergency measures from local health and government agencies.",
            "Use N95 masks for added protection when going outdoors.",
            "Stay updated with local air quality warnings and alerts.",
        ],
    },
];

/// Returns the recommendation for the category `aqi` falls into.
pub fn health_recommendation(aqi: Aqi) -> &'static Recommendation {
    let category = aqi.category();
    RECOMMENDATIONS
        .iter()
        .find(|r| r.category == category)
        .unwrap_or(&RECOMMENDATIONS[RECOMMENDATIONS.len() - 1])
}

impl Recommendation {
    /// Multi-line plain text rendering: headline, then numbered causes and
    /// prevention measures.
    pub fn to_text(&self) -> String {
        let mut out = format!("{}: {}\n\nCauses:\n", self.category, self.summary);
        for (i, cause) in self.causes.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, cause));
        }
        out.push_str("\nPrevention:\n");
        for (i, step) in self.prevention.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, step));
        }
        out
    }
}
