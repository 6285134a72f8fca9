//! GPU resource catalog and its client-side filters.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Columns in the side-by-side comparison table.
pub const COMPARISON_COLUMNS: usize = 4;

/// Minimum-memory choices offered by the filter panel, in GB (0 = any).
pub const MEMORY_THRESHOLDS_GB: [u32; 5] = [0, 16, 24, 32, 80];

/// A GPU model in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GpuResource {
    pub id: String,
    pub name: String,
    pub memory_gb: u32,
    pub cores: u32,
    pub clock_speed: String,
    pub power_draw: String,
    pub available: u32,
    pub total: u32,
    pub location: String,
}

impl GpuResource {
    /// Memory as displayed, e.g. `24GB`.
    pub fn memory_label(&self) -> String {
        format!("{}GB", self.memory_gb)
    }

    pub fn is_available(&self) -> bool {
        self.available > 0
    }

    pub fn availability_level(&self) -> AvailabilityLevel {
        if self.available == 0 {
            AvailabilityLevel::None
        } else if self.available * 3 < self.total {
            AvailabilityLevel::Low
        } else {
            AvailabilityLevel::Healthy
        }
    }

    /// Share of units free, 0-100.
    pub fn availability_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.available) / f64::from(self.total) * 100.0
    }
}

/// Colour band of the availability bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityLevel {
    None,
    Low,
    Healthy,
}

/// Manufacturer selector. Matching is a substring test on the model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Manufacturer {
    #[default]
    All,
    Nvidia,
    Amd,
}

impl Manufacturer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Manufacturer::All => "all",
            Manufacturer::Nvidia => "nvidia",
            Manufacturer::Amd => "amd",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Manufacturer::All => "All Manufacturers",
            Manufacturer::Nvidia => "NVIDIA",
            Manufacturer::Amd => "AMD",
        }
    }
}

impl FromStr for Manufacturer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "" => Ok(Manufacturer::All),
            "nvidia" => Ok(Manufacturer::Nvidia),
            "amd" => Ok(Manufacturer::Amd),
            other => Err(format!("unknown manufacturer '{}'", other)),
        }
    }
}

/// Catalog filter. Every active predicate must hold.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema, utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[serde(default)]
pub struct ResourceFilter {
    /// Case-insensitive substring of the model name
    pub search: String,
    pub manufacturer: Manufacturer,
    /// Minimum memory in GB; 0 disables the check
    pub min_memory: u32,
    pub only_available: bool,
}

impl ResourceFilter {
    pub fn matches(&self, resource: &GpuResource) -> bool {
        let name = resource.name.to_lowercase();

        if !self.search.is_empty() && !name.contains(&self.search.to_lowercase()) {
            return false;
        }
        if self.manufacturer != Manufacturer::All && !name.contains(self.manufacturer.as_str()) {
            return false;
        }
        if self.min_memory > 0 && resource.memory_gb < self.min_memory {
            return false;
        }
        if self.only_available && !resource.is_available() {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, resources: &'a [GpuResource]) -> Vec<&'a GpuResource> {
        resources.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Leading entries of a filtered list shown in the comparison table.
pub fn comparison<'a, 'b>(filtered: &'b [&'a GpuResource]) -> &'b [&'a GpuResource] {
    &filtered[..filtered.len().min(COMPARISON_COLUMNS)]
}

/// Look up a catalog entry by id.
pub fn find<'a>(resources: &'a [GpuResource], id: &str) -> Option<&'a GpuResource> {
    resources.iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use rstest::rstest;

    fn names(list: &[&GpuResource]) -> Vec<String> {
        list.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn default_filter_keeps_everything() {
        let catalog = mock::catalog();
        assert_eq!(ResourceFilter::default().apply(&catalog).len(), 6);
    }

    #[test]
    fn nvidia_with_24gb_minimum() {
        let catalog = mock::catalog();
        let filter = ResourceFilter {
            manufacturer: Manufacturer::Nvidia,
            min_memory: 24,
            ..Default::default()
        };
        assert_eq!(
            names(&filter.apply(&catalog)),
            ["NVIDIA RTX 4090", "NVIDIA A100", "NVIDIA V100"]
        );
    }

    #[rstest]
    #[case("", Manufacturer::All, 0, false)]
    #[case("a1", Manufacturer::All, 0, false)]
    #[case("", Manufacturer::Amd, 0, false)]
    #[case("", Manufacturer::Nvidia, 32, false)]
    #[case("RTX", Manufacturer::Nvidia, 16, true)]
    #[case("", Manufacturer::All, 80, true)]
    #[case("mi", Manufacturer::Amd, 128, true)]
    #[case("zzz", Manufacturer::All, 0, false)]
    fn result_is_exactly_the_and_of_predicates(
        #[case] search: &str,
        #[case] manufacturer: Manufacturer,
        #[case] min_memory: u32,
        #[case] only_available: bool,
    ) {
        let mut catalog = mock::catalog();
        catalog[3].available = 0;
        let filter = ResourceFilter {
            search: search.to_string(),
            manufacturer,
            min_memory,
            only_available,
        };

        let expected: Vec<&GpuResource> = catalog
            .iter()
            .filter(|r| {
                let name = r.name.to_lowercase();
                (search.is_empty() || name.contains(&search.to_lowercase()))
                    && (manufacturer == Manufacturer::All || name.contains(manufacturer.as_str()))
                    && (min_memory == 0 || r.memory_gb >= min_memory)
                    && (!only_available || r.available > 0)
            })
            .collect();

        assert_eq!(filter.apply(&catalog), expected);
    }

    #[test]
    fn only_available_drops_empty_models() {
        let mut catalog = mock::catalog();
        catalog[0].available = 0;
        let filter = ResourceFilter {
            only_available: true,
            ..Default::default()
        };
        let visible = filter.apply(&catalog);
        assert_eq!(visible.len(), 5);
        assert!(visible.iter().all(|r| r.id != "1"));
    }

    #[rstest]
    #[case(0, 16, AvailabilityLevel::None)]
    #[case(5, 16, AvailabilityLevel::Low)]
    #[case(6, 16, AvailabilityLevel::Healthy)]
    #[case(1, 4, AvailabilityLevel::Low)]
    #[case(4, 8, AvailabilityLevel::Healthy)]
    fn availability_bands(#[case] available: u32, #[case] total: u32, #[case] level: AvailabilityLevel) {
        let mut gpu = mock::catalog().remove(0);
        gpu.available = available;
        gpu.total = total;
        assert_eq!(gpu.availability_level(), level);
    }

    #[test]
    fn comparison_takes_first_four() {
        let catalog = mock::catalog();
        let visible = ResourceFilter::default().apply(&catalog);
        let columns = comparison(&visible);
        assert_eq!(columns.len(), COMPARISON_COLUMNS);
        assert_eq!(columns[0].id, "1");

        let few = &visible[..2];
        assert_eq!(comparison(few).len(), 2);
    }

    #[test]
    fn manufacturer_parses_case_insensitively() {
        assert_eq!("NVIDIA".parse::<Manufacturer>(), Ok(Manufacturer::Nvidia));
        assert_eq!("all".parse::<Manufacturer>(), Ok(Manufacturer::All));
        assert!("intel".parse::<Manufacturer>().is_err());
    }

    #[test]
    fn memory_label_and_percent() {
        let gpu = find(&mock::catalog(), "2").cloned().expect("A100");
        assert_eq!(gpu.memory_label(), "80GB");
        assert!((gpu.availability_percent() - 37.5).abs() < f64::EPSILON);
    }
}
