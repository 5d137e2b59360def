use crate::models::questionnaire::Band;
use crate::services::errors::CatalogError;

/// Lower bounds (inclusive) of the Borderline and Adequate bands.
///
/// `total < borderline_from` is Inadequate, `borderline_from <= total < adequate_from`
/// is Borderline and `total >= adequate_from` is Adequate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandThresholds {
    pub borderline_from: i32,
    pub adequate_from: i32,
}

impl BandThresholds {
    pub fn new(borderline_from: i32, adequate_from: i32) -> Result<Self, CatalogError> {
        if borderline_from >= adequate_from {
            return Err(CatalogError::InvertedThresholds {
                borderline: borderline_from,
                adequate: adequate_from,
            });
        }
        Ok(Self {
            borderline_from,
            adequate_from,
        })
    }
}

pub fn classify(total: i32, thresholds: &BandThresholds) -> Band {
    if total >= thresholds.adequate_from {
        Band::Adequate
    } else if total >= thresholds.borderline_from {
        Band::Borderline
    } else {
        Band::Inadequate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::{ADEQUATE_MIN_SCORE, BORDERLINE_MIN_SCORE};

    #[test]
    fn boundaries_are_inclusive_lower_bounds() {
        let t = BandThresholds::new(BORDERLINE_MIN_SCORE, ADEQUATE_MIN_SCORE).unwrap();
        assert_eq!(classify(BORDERLINE_MIN_SCORE - 1, &t), Band::Inadequate);
        assert_eq!(classify(BORDERLINE_MIN_SCORE, &t), Band::Borderline);
        assert_eq!(classify(ADEQUATE_MIN_SCORE - 1, &t), Band::Borderline);
        assert_eq!(classify(ADEQUATE_MIN_SCORE, &t), Band::Adequate);
    }

    #[test]
    fn every_total_lands_in_a_band() {
        let t = BandThresholds::new(3, 5).unwrap();
        let bands: Vec<Band> = (-2..=10).map(|total| classify(total, &t)).collect();
        // bands only ever move upward as the total grows
        let rank = |b: &Band| match b {
            Band::Inadequate => 0,
            Band::Borderline => 1,
            Band::Adequate => 2,
        };
        assert!(bands.windows(2).all(|w| rank(&w[0]) <= rank(&w[1])));
        assert!(bands.contains(&Band::Inadequate));
        assert!(bands.contains(&Band::Borderline));
        assert!(bands.contains(&Band::Adequate));
    }

    #[test]
    fn three_points_is_borderline_on_small_catalog() {
        let t = BandThresholds::new(3, 5).unwrap();
        assert_eq!(classify(3, &t), Band::Borderline);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        assert!(BandThresholds::new(6, 5).is_err());
        // equal bounds would leave Borderline empty
        assert!(BandThresholds::new(5, 5).is_err());
        assert!(BandThresholds::new(4, 5).is_ok());
    }
}
