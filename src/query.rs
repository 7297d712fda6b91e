use crate::indicators::{DEFAULT_COUNTRY, IndicatorSpec};
use serde::{Deserialize, Serialize};

/// Inbound query parameters as the dashboard sends them.
///
/// All fields are optional; empty strings count as absent (the browser client
/// serializes unset fields that way).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorQuery {
    pub country: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub unit_measure: Option<String>,
}

/// Query with every default applied, ready to be turned into an upstream URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    /// Upper-cased ISO3 reference area.
    pub country: String,
    pub from: String,
    pub to: String,
    /// Forwarded as `UNIT_MEASURE`; never validated.
    pub unit_measure: Option<String>,
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl IndicatorQuery {
    pub fn for_country(country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            ..Self::default()
        }
    }

    /// Build from decoded `key=value` pairs. Unknown keys are ignored and the
    /// first occurrence of a repeated key wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut q = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "country" => &mut q.country,
                "from" => &mut q.from,
                "to" => &mut q.to,
                "unit_measure" => &mut q.unit_measure,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        q
    }

    pub fn resolve(&self, spec: &IndicatorSpec) -> ResolvedQuery {
        let country = present(&self.country)
            .unwrap_or(DEFAULT_COUNTRY)
            .to_uppercase();
        let from = present(&self.from)
            .map(str::to_string)
            .unwrap_or_else(|| spec.default_from.to_string());
        let to = present(&self.to)
            .map(str::to_string)
            .unwrap_or_else(|| spec.default_to().to_string());
        let unit_measure = if spec.tracks_units {
            present(&self.unit_measure).map(str::to_string)
        } else {
            None
        };
        ResolvedQuery {
            country,
            from,
            to,
            unit_measure,
        }
    }
}
