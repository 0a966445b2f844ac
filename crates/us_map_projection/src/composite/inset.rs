//! The inset registry and selection.
//!
//! Each [`Inset`] pairs a sub-projection with its placement inside the composite: a translate
//! offset, an exclusive clip rectangle and a relative scale, all expressed as fractions of the
//! composite's scale. Selection is two-staged: [`inset_states`] keeps only the region codes
//! eligible for an inset, then [`make_insets`] keeps the registry entries claiming any of them.
use std::fmt;

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::extent::Extent;
use crate::projection::{PointStream, Projection};

/// Every FIPS code that can activate an inset, in registry order.
pub const INSET_FIPS: [&str; 7] = ["02", "15", "72", "78", "66", "69", "60"];

/// First FIPS code reserved for insular areas.
const INSULAR_AREA_MIN_FIPS: f64 = 60.0;

/// Political status of the region an inset shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InsetKind {
    State,
    InsularArea,
}

impl fmt::Display for InsetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsetKind::State => f.write_str("state"),
            InsetKind::InsularArea => f.write_str("insular area"),
        }
    }
}

/// A repositioned sub-projection for one or more non-contiguous regions.
#[derive(Debug, Clone)]
pub struct Inset {
    /// Comma-joined FIPS codes, e.g. `"72,78"`.
    pub id: &'static str,
    pub name: &'static str,
    pub kind: InsetKind,
    /// FIPS codes that activate this inset.
    pub fips: &'static [&'static str],
    /// USPS postal codes of the regions shown.
    pub codes: &'static [&'static str],
    /// The sub-projection, before composite scale and translate are applied.
    pub projection: Projection,
    /// Offset from the composite center, relative to scale.
    pub translate: DVec2,
    /// Rectangle claimed by this inset, relative to scale and the composite center.
    pub extent: Extent,
    /// Multiplier on the composite scale.
    pub scale: f64,
    /// Bound point path, present once attached to a composite.
    pub(crate) point: Option<PointStream>,
}

impl Inset {
    /// Whether this inset is activated by FIPS code `code`.
    pub fn claims(&self, code: &str) -> bool {
        self.fips.contains(&code)
    }

    /// The bound point path, if this inset belongs to a live composite.
    pub fn point_stream(&self) -> Option<&PointStream> {
        self.point.as_ref()
    }
}

/// Builds a fresh copy of the inset registry.
///
/// Every call constructs new sub-projections, so insets taken from separate calls never share
/// state.
pub fn inset_data() -> Vec<Inset> {
    vec![
        Inset {
            id: "02",
            name: "Alaska",
            kind: InsetKind::State,
            fips: &["02"],
            codes: &["AK"],
            projection: Projection::conic_equal_area()
                .with_rotate([154.0, 0.0, 0.0])
                .with_center([-2.0, 58.5])
                .with_parallels([55.0, 65.0]),
            translate: DVec2::new(-0.337, 0.214),
            extent: Extent::new([-0.4655, 0.123], [-0.239, 0.262]),
            scale: 0.35,
            point: None,
        },
        Inset {
            id: "15",
            name: "Hawaii",
            kind: InsetKind::State,
            fips: &["15"],
            codes: &["HI"],
            projection: Projection::conic_equal_area()
                .with_rotate([157.0, 0.0, 0.0])
                .with_center([-3.0, 19.9])
                .with_parallels([8.0, 18.0]),
            translate: DVec2::new(-0.225, 0.227),
            extent: Extent::new([-0.239, 0.169], [-0.127, 0.262]),
            scale: 1.0,
            point: None,
        },
        Inset {
            id: "72,78",
            name: "Puerto Rico and US Virgin Islands",
            kind: InsetKind::InsularArea,
            fips: &["72", "78"],
            codes: &["PR", "VI"],
            projection: Projection::conic_equal_area()
                .with_rotate([66.0, 0.0, 0.0])
                .with_center([0.0, 18.0])
                .with_parallels([8.0, 18.0]),
            translate: DVec2::new(0.350, 0.239),
            extent: Extent::new([0.310, 0.214], [0.385, 0.262]),
            scale: 1.0,
            point: None,
        },
        Inset {
            id: "60",
            name: "American Samoa",
            kind: InsetKind::InsularArea,
            fips: &["60"],
            codes: &["AS"],
            projection: Projection::equirectangular().with_rotate([173.0, 14.0, 0.0]),
            translate: DVec2::new(-0.475, 0.098),
            extent: Extent::new([-0.4655, 0.083], [-0.390, 0.123]),
            scale: 1.0,
            point: None,
        },
        Inset {
            id: "66,69",
            name: "Guam and Northern Mariana Islands",
            kind: InsetKind::InsularArea,
            fips: &["66", "69"],
            codes: &["GU", "MP"],
            projection: Projection::equirectangular().with_rotate([-145.0, -16.8, 0.0]),
            translate: DVec2::new(-0.433, 0.011),
            extent: Extent::new([-0.4655, -0.037], [-0.390, 0.083]),
            scale: 1.0,
            point: None,
        },
    ]
}

/// Keeps the FIPS codes eligible for an inset: Alaska, Hawaii and every code from 60 up.
///
/// Codes of the contiguous states and anything unparseable are dropped silently.
pub fn inset_states<S: AsRef<str>>(codes: &[S]) -> Vec<String> {
    codes
        .iter()
        .map(AsRef::as_ref)
        .filter(|code| {
            *code == "02"
                || *code == "15"
                || code
                    .trim()
                    .parse::<f64>()
                    .is_ok_and(|n| n >= INSULAR_AREA_MIN_FIPS)
        })
        .map(str::to_owned)
        .collect()
}

/// Keeps the insets claiming any of `states`, in registry order, detached from any composite.
pub fn make_insets<S: AsRef<str>>(
    insets: impl IntoIterator<Item = Inset>,
    states: &[S],
) -> Vec<Inset> {
    insets
        .into_iter()
        .filter(|inset| states.iter().any(|s| inset.claims(s.as_ref())))
        .map(|inset| Inset {
            point: None,
            ..inset
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(insets: &[Inset]) -> Vec<&'static str> {
        insets.iter().map(|i| i.id).collect()
    }

    #[test]
    fn inset_states_keeps_all_inset_codes() {
        assert_eq!(inset_states(&INSET_FIPS), INSET_FIPS.to_vec());
    }

    #[test]
    fn inset_states_drops_lower_48() {
        assert!(inset_states(&["01", "06", "36", "56"]).is_empty());
        assert_eq!(inset_states(&["01", "02", "72", "39"]), vec!["02", "72"]);
    }

    #[test]
    fn inset_states_drops_garbage() {
        assert!(inset_states(&["", "XX", "ak"]).is_empty());
    }

    #[test]
    fn full_list_selects_five_insets() {
        let insets = make_insets(inset_data(), &INSET_FIPS);
        assert_eq!(ids(&insets), vec!["02", "15", "72,78", "60", "66,69"]);
    }

    #[test]
    fn selects_alaska_hawaii_samoa() {
        let insets = make_insets(inset_data(), &["02", "15", "60"]);
        assert_eq!(ids(&insets), vec!["02", "15", "60"]);
    }

    #[test]
    fn shared_insets_selected_by_either_code() {
        assert_eq!(ids(&make_insets(inset_data(), &["72"])), vec!["72,78"]);
        assert_eq!(ids(&make_insets(inset_data(), &["78"])), vec!["72,78"]);
        assert_eq!(ids(&make_insets(inset_data(), &["66"])), vec!["66,69"]);
        assert_eq!(ids(&make_insets(inset_data(), &["69"])), vec!["66,69"]);
    }

    #[test]
    fn lower_48_codes_select_nothing() {
        assert!(make_insets(inset_data(), &["06", "36"]).is_empty());
        assert!(make_insets(inset_data(), &[] as &[&str]).is_empty());
    }

    #[test]
    fn selected_insets_are_detached() {
        let mut data = inset_data();
        data[0].point = Some(data[0].projection.point_stream());
        let insets = make_insets(data, &["02"]);
        assert!(insets[0].point_stream().is_none());
    }

    #[test]
    fn registry_metadata() {
        let data = inset_data();
        assert_eq!(data.len(), 5);
        assert_eq!(data[2].codes, &["PR", "VI"]);
        assert_eq!(data[0].kind.to_string(), "state");
        assert_eq!(data[4].kind, InsetKind::InsularArea);
        assert_eq!(data[0].projection.parallels(), Some(DVec2::new(55.0, 65.0)));
    }
}
