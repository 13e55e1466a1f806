use crate::{PlateConfig, MM_PER_INCH};

/// Number of sub-apertures across the plate. The layout is fixed: two
/// full-throw outer lenses flanking three half-throw inner lenses.
pub const REGION_COUNT: usize = 5;

/// Minimum plate width in pixels that can host the six-way partition. At 6
/// the ceil/floor cuts invert region 2's span; 7 is the smallest width where
/// all five spans are non-empty.
pub const MIN_WIDTH: usize = 7;

// Fractional cut points of `width - 1`, in sixths. The outer two slices are
// 1.5x the width of the three central ones.
const CUTS: [f64; 4] = [1.5, 2.5, 3.5, 4.5];

// Fractional positions of each sub-aperture's focal axis, in sixths.
const CENTERS: [f64; REGION_COUNT] = [1.5, 2.0, 3.0, 4.0, 4.5];

// Focal length of each sub-aperture as a fraction of the target distance.
const FOCUS_FACTORS: [f64; REGION_COUNT] = [1.0, 0.5, 0.5, 0.5, 1.0];

/// One of the five independently focused column bands composing the plate.
///
/// * `x_begin`, `x_end` - inclusive column span of the band
/// * `center_x` - physical position of the band's focal axis in mm
/// * `focal_length` - throw of the band's lens in mm
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x_begin: usize,
    pub x_end: usize,
    pub center_x: f64,
    pub focal_length: f64,
}

/// Splits `width` columns into the five sub-aperture spans.
///
/// Spans are cut at `{1.5, 2.5, 3.5, 4.5}/6` of `width - 1`, floor on the
/// left of each cut and ceiling on the right, so together they always cover
/// every column. When a cut point lands on an integer the two neighbouring
/// spans share that boundary column; the separator pass zeroes it either way.
pub fn partition(width: usize, config: &PlateConfig) -> [Region; REGION_COUNT] {
    debug_assert!(width >= MIN_WIDTH);

    let w = (width - 1) as f64;
    let focal_length = MM_PER_INCH * config.distance;

    let mut bounds = [(0usize, width - 1); REGION_COUNT];
    for (k, c) in CUTS.iter().enumerate() {
        let cut = c * w / 6.0;
        bounds[k].1 = cut.floor() as usize;
        bounds[k + 1].0 = cut.ceil() as usize;
    }

    let mut regions = [Region {
        x_begin: 0,
        x_end: 0,
        center_x: 0.0,
        focal_length,
    }; REGION_COUNT];
    for k in 0..REGION_COUNT {
        regions[k] = Region {
            x_begin: bounds[k].0,
            x_end: bounds[k].1,
            center_x: MM_PER_INCH * w * CENTERS[k] / config.dpi_x / 6.0,
            focal_length: focal_length * FOCUS_FACTORS[k],
        };
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::{partition, MIN_WIDTH, REGION_COUNT};
    use crate::{PlateConfig, MM_PER_INCH};

    #[test]
    fn spans_match_worked_example() {
        // 600 px wide at 600 dpi: w = 599, cuts at 149.75, 249.58.., 349.41.., 449.25
        let regions = partition(600, &PlateConfig::default());

        let spans: Vec<(usize, usize)> = regions.iter().map(|r| (r.x_begin, r.x_end)).collect();
        assert_eq!(
            spans,
            vec![(0, 149), (150, 249), (250, 349), (350, 449), (450, 599)]
        );
    }

    #[test]
    fn focal_lengths_are_full_half_half_half_full() {
        let config = PlateConfig {
            distance: 12.0,
            ..PlateConfig::default()
        };
        let regions = partition(600, &config);

        let full = MM_PER_INCH * config.distance;
        assert_eq!(regions[0].focal_length, full);
        assert_eq!(regions[4].focal_length, full);
        for r in &regions[1..4] {
            assert_eq!(r.focal_length, full * 0.5);
        }
    }

    #[test]
    fn centers_sit_at_sixths_of_plate_width() {
        let config = PlateConfig::default();
        let regions = partition(600, &config);

        let expected = [1.5, 2.0, 3.0, 4.0, 4.5];
        for (r, c) in regions.iter().zip(&expected) {
            assert_eq!(r.center_x, 25.4 * 599.0 * c / config.dpi_x / 6.0);
        }
    }

    #[test]
    fn spans_tile_all_columns_for_any_width() {
        let config = PlateConfig::default();
        for width in MIN_WIDTH..500 {
            let regions = partition(width, &config);

            assert_eq!(regions[0].x_begin, 0);
            assert_eq!(regions[REGION_COUNT - 1].x_end, width - 1);
            for k in 0..REGION_COUNT - 1 {
                // adjacent spans either abut or share one boundary column
                let gap = regions[k + 1].x_begin as i64 - regions[k].x_end as i64;
                assert!(gap == 0 || gap == 1, "width {}: gap {}", width, gap);
            }
            for r in &regions {
                assert!(r.x_begin <= r.x_end, "width {}: empty span", width);
            }
        }
    }

    #[test]
    fn integral_cut_points_share_boundary_columns() {
        // width 13: w = 12, every cut lands on an integer
        let regions = partition(13, &PlateConfig::default());

        let spans: Vec<(usize, usize)> = regions.iter().map(|r| (r.x_begin, r.x_end)).collect();
        assert_eq!(spans, vec![(0, 3), (3, 5), (5, 7), (7, 9), (9, 12)]);
    }
}
