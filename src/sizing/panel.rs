//! Roof-height based panel product recommendation.

use super::reference::PanelBands;
use super::types::PanelRecommendation;

/// Recommends a panel for a roof at `height_m`.
///
/// Returns the first band whose inclusive range contains the height. Heights
/// above the last band get the last band ("at least this tall"); anything else
/// that matches no band, including heights below the first band, gets the
/// first band. Never fails.
pub fn recommend_panel(height_m: f64, bands: &PanelBands) -> PanelRecommendation {
    if let Some(rec) = find_panel(height_m, bands) {
        return rec;
    }
    let last = bands.last();
    if height_m > last.max_height_m {
        last.recommendation()
    } else {
        bands.first().recommendation()
    }
}

/// Strict lookup: the first band containing `height_m`, or `None`.
pub fn find_panel(height_m: f64, bands: &PanelBands) -> Option<PanelRecommendation> {
    bands
        .iter()
        .find(|band| band.contains(height_m))
        .map(|band| band.recommendation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::reference::ReferenceData;

    fn bands() -> PanelBands {
        match ReferenceData::reference() {
            Ok(data) => data.panel_bands().clone(),
            Err(e) => panic!("reference data invalid: {e:?}"),
        }
    }

    #[test]
    fn twenty_meters_gets_half_cut_band() {
        let rec = recommend_panel(20.0, &bands());
        assert_eq!(rec.panel_type, "Half-cut Mono PERC / TOPCon");
        assert_eq!(rec.wattage_w, 535);
        assert_eq!(rec.brands, vec!["Trina", "Jinko", "Canadian Solar"]);
    }

    #[test]
    fn shared_boundary_goes_to_lower_band() {
        let rec = recommend_panel(15.0, &bands());
        assert_eq!(rec.panel_type, "Mono PERC / Bifacial");
    }

    #[test]
    fn above_last_band_caps_at_last() {
        let bands = bands();
        let rec = recommend_panel(200.0, &bands);
        assert_eq!(rec, bands.last().recommendation());
        assert_eq!(rec.panel_type, "CdTe Thin-film / Reinforced HJT");
    }

    #[test]
    fn below_first_band_defaults_to_first() {
        let bands = bands();
        assert_eq!(recommend_panel(0.0, &bands), bands.first().recommendation());
        assert_eq!(recommend_panel(2.5, &bands), bands.first().recommendation());
    }

    #[test]
    fn strict_lookup_reports_no_match() {
        let bands = bands();
        assert!(find_panel(2.0, &bands).is_none());
        assert!(find_panel(90.5, &bands).is_none());
        assert_eq!(
            find_panel(90.0, &bands).map(|r| r.wattage_w),
            Some(565)
        );
    }
}
