// Spectrogram rasterization
// Maps normalized magnitudes to grayscale pixel intensities

use serde::Serialize;

use crate::detection::types::Spectrogram;

/// Grayscale image of one spectrogram window
/// Column = time step, row 0 = highest frequency bin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpectrogramImage {
    pub width: usize,
    pub height: usize,

    /// Row-major intensities, `width * height` long
    pub pixels: Vec<u8>,
}

impl SpectrogramImage {
    /// Intensity at column `x`, row `y`
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Map a magnitude in [-1, 1] to a gray level in [0, 255]
pub fn intensity(magnitude: f32) -> u8 {
    ((magnitude + 1.0) * 127.5).floor().clamp(0.0, 255.0) as u8
}

/// Rasterize a spectrogram window
/// Low frequencies land on the bottom row; incomplete trailing time steps are skipped.
pub fn rasterize(spectrogram: &Spectrogram) -> SpectrogramImage {
    let width = spectrogram.time_steps();
    let height = spectrogram.frame_size;
    let mut pixels = vec![0u8; width * height];

    for t in 0..width {
        for f in 0..height {
            let value = spectrogram.data[t * height + f];
            let row = height - 1 - f;
            pixels[row * width + t] = intensity(value);
        }
    }

    SpectrogramImage {
        width,
        height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_range() {
        assert_eq!(intensity(-1.0), 0);
        assert_eq!(intensity(0.0), 127);
        assert_eq!(intensity(1.0), 255);
    }

    #[test]
    fn test_intensity_clamps_out_of_range() {
        assert_eq!(intensity(-3.0), 0);
        assert_eq!(intensity(2.5), 255);
    }

    #[test]
    fn test_rasterize_orientation() {
        // Two time steps, three bins each
        let spec = Spectrogram::new(vec![-1.0, 0.0, 1.0, 1.0, 0.0, -1.0], 3);
        let image = rasterize(&spec);

        assert_eq!(image.width, 2);
        assert_eq!(image.height, 3);
        // t = 0: lowest bin (-1.0) on the bottom row, highest (1.0) on top
        assert_eq!(image.pixel(0, 2), Some(0));
        assert_eq!(image.pixel(0, 1), Some(127));
        assert_eq!(image.pixel(0, 0), Some(255));
        // t = 1 mirrors it
        assert_eq!(image.pixel(1, 2), Some(255));
        assert_eq!(image.pixel(1, 0), Some(0));
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let spec = Spectrogram::new((0..64).map(|i| (i as f32 / 32.0) - 1.0).collect(), 8);
        assert_eq!(rasterize(&spec), rasterize(&spec));
    }

    #[test]
    fn test_rasterize_skips_partial_time_step() {
        let spec = Spectrogram::new(vec![0.0; 7], 3);
        let image = rasterize(&spec);
        assert_eq!(image.width, 2);
        assert_eq!(image.pixels.len(), 6);
    }

    #[test]
    fn test_rasterize_empty() {
        let image = rasterize(&Spectrogram::default());
        assert!(image.is_empty());
        assert_eq!(image.pixel(0, 0), None);
    }
}
