use crate::regions::{partition, Region, MIN_WIDTH, REGION_COUNT};
use log::debug;
use ndarray::parallel::prelude::{IntoParallelIterator, ParallelIterator};
use ndarray::{ArrayViewMut3, Axis};
use std::f64::consts::PI;
use thiserror::Error;

pub mod regions;

pub const MM_PER_INCH: f64 = 25.4;

/// Transmittance law of the plate.
///
/// Unlike a standard lens, a binary zone plate produces intensity maxima
/// along the axis of the plate at odd fractions (f/3, f/5, f/7, etc.).
/// Although these contain less energy than the principal focus (because it
/// is wider), they have the same maximum intensity. If the opacity instead
/// varies in a gradual, sinusoidal manner, the resulting diffraction forms
/// only a single focal point; this pattern is the equivalent of a
/// transmission hologram of a converging lens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlateMode {
    Binary,
    Sinusoidal,
}

/// Parameters of one render, immutable once the fill starts.
///
/// * `mode` - transmittance law
/// * `distance` - target focal distance in inches
/// * `dpi_x`, `dpi_y` - printable dots per inch on each axis
/// * `wavelength` - design wavelength in nm
#[derive(Clone, Copy, Debug)]
pub struct PlateConfig {
    pub mode: PlateMode,
    pub distance: f64,
    pub dpi_x: f64,
    pub dpi_y: f64,
    pub wavelength: f64,
}

impl Default for PlateConfig {
    fn default() -> Self {
        PlateConfig {
            mode: PlateMode::Binary,
            distance: 12.0,
            dpi_x: 600.0,
            dpi_y: 600.0,
            wavelength: 500.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "plate is {width} columns wide, the five-aperture layout needs at least {min}",
        min = MIN_WIDTH
    )]
    TooNarrow { width: usize },
}

/// Grid shape `[height, width]` for a plate of the given physical size,
/// one grid cell per printable dot.
pub fn grid_shape(width_in: f64, height_in: f64, dpi_x: f64, dpi_y: f64) -> [usize; 2] {
    [
        (dpi_y * height_in).ceil() as usize,
        (dpi_x * width_in).ceil() as usize,
    ]
}

/// Renders the five-aperture zone plate pattern into `grid`.
///
/// `grid` is indexed `[row][column][channel]` and is only written, never
/// resized; every channel of a cell receives the same value, in
/// `[0.0, 255.0]`. The five sub-apertures are evaluated in parallel over
/// disjoint column slabs, then a final pass zeroes the first and last
/// column of every aperture span so adjacent apertures stay visibly
/// separated on the print.
///
/// Geometry degenerate in ways other than a too-narrow plate (zero dpi,
/// zero wavelength) is not validated and propagates as NaN intensities.
pub fn fill(config: &PlateConfig, mut grid: ArrayViewMut3<f32>) -> Result<(), Error> {
    let height = grid.shape()[0];
    let width = grid.shape()[1];
    if width < MIN_WIDTH {
        return Err(Error::TooNarrow { width });
    }

    let y_center = MM_PER_INCH * (height as f64 - 1.0) / config.dpi_y / 2.0;
    let regions = partition(width, config);
    debug!(
        "filling {}x{} grid, y_center {} mm, regions {:?}",
        height, width, y_center, regions
    );

    // Cut the grid into five disjoint column slabs, one per region. Where
    // adjacent spans share a boundary column the left region keeps it; the
    // separator pass below zeroes that column no matter who wrote it.
    let mut slabs = Vec::with_capacity(REGION_COUNT);
    let mut rest = grid.view_mut();
    let mut consumed = 0;
    for region in &regions {
        let (slab, tail) = rest.split_at(Axis(1), region.x_end + 1 - consumed);
        slabs.push((consumed, *region, slab));
        rest = tail;
        consumed = region.x_end + 1;
    }

    slabs.into_par_iter().for_each(|(x_offset, region, slab)| {
        fill_region(config, &region, x_offset, y_center, slab)
    });

    // Separator pass, strictly after all region tasks have joined.
    for region in &regions {
        grid.index_axis_mut(Axis(1), region.x_begin).fill(0.0);
        grid.index_axis_mut(Axis(1), region.x_end).fill(0.0);
    }

    Ok(())
}

// Evaluates one sub-aperture over its column slab. `x_offset` is the global
// column index of the slab's first column.
fn fill_region(
    config: &PlateConfig,
    region: &Region,
    x_offset: usize,
    y_center: f64,
    mut slab: ArrayViewMut3<f32>,
) {
    let f = region.focal_length;
    let f2 = f * f;

    for (ci, mut column) in slab.axis_iter_mut(Axis(1)).enumerate() {
        let x = MM_PER_INCH * (x_offset + ci) as f64 / config.dpi_x;
        let dx = x - region.center_x;
        let dx2 = dx * dx;

        for (j, mut cell) in column.axis_iter_mut(Axis(0)).enumerate() {
            let y = MM_PER_INCH * j as f64 / config.dpi_y;
            let dy = y - y_center;
            let dr = (f2 + dx2 + dy * dy).sqrt() - f;
            // operand order matters: a different association can be an ulp
            // off and flip a binary pixel at a near-zero crossing
            let cos_phase = (2_000_000.0 * PI * dr / config.wavelength).cos();
            cell.fill(opacity(config.mode, cos_phase) as f32);
        }
    }
}

// Maps the cosine of the interference phase to an intensity in [0, 255].
fn opacity(mode: PlateMode, cos_phase: f64) -> f64 {
    match mode {
        PlateMode::Binary => (1.0 + sign(cos_phase)) * 255.0 / 2.0,
        PlateMode::Sinusoidal => (1.0 + cos_phase) * 255.0 / 2.0,
    }
}

// Not f64::signum: that returns 1.0 at 0.0, but the binary law emits
// mid-gray at exact phase zero-crossings and renders must reproduce it.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
