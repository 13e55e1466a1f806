use image::{GrayImage, Luma};
use ndarray::Array3;
use zone_plate::{fill, grid_shape, PlateConfig, PlateMode};

pub fn main() {
    env_logger::init();

    // 18 x 3 inch plate at 600 dpi, 500 nm design wavelength, 12 inch throw
    let config = PlateConfig {
        mode: PlateMode::Binary,
        ..PlateConfig::default()
    };
    let [height, width] = grid_shape(18.0, 3.0, config.dpi_x, config.dpi_y);

    let mut grid = Array3::zeros([height, width, 1]);
    fill(&config, grid.view_mut()).unwrap();

    let mut img = GrayImage::new(width as u32, height as u32);
    for (x, y, p) in img.enumerate_pixels_mut() {
        *p = Luma([grid[[y as usize, x as usize, 0]] as u8]);
    }
    img.save("zone_plate.png").unwrap();
}
