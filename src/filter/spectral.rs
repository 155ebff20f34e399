use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use crate::frame::GrayFrame;

/// Computes the dominant-frequency magnitude image for one full window.
///
/// `planes` holds the buffered pixel planes oldest first, one per frame
/// in the window; every plane is `width * height` bytes. For each pixel
/// the intensity series along the window is transformed with a forward
/// DFT, the strongest non-DC bin is selected, and the magnitude of that
/// coefficient becomes the raw output value. The frame is then rescaled
/// so the smallest magnitude maps to 0 and the largest to 255.
pub fn analyze_window(planes: &[&[u8]], width: u32, height: u32) -> GrayFrame {
    let window = planes.len();
    let row_len = width as usize;
    let num_pixels = row_len * height as usize;
    debug_assert!(window >= 2);
    debug_assert!(planes.iter().all(|p| p.len() == num_pixels));

    let mut magnitudes = vec![0.0f32; num_pixels];
    magnitudes
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(row, out)| {
            // Per-worker FFT planner (rayon-safe)
            let mut planner = FftPlanner::<f32>::new();
            let fft = planner.plan_fft_forward(window);
            let mut signal = vec![Complex::new(0.0f32, 0.0); window];
            let mut scratch = vec![Complex::new(0.0f32, 0.0); fft.get_inplace_scratch_len()];
            let mut bins = vec![0.0f32; window];

            let base = row * row_len;
            for (col, slot) in out.iter_mut().enumerate() {
                for (t, plane) in planes.iter().enumerate() {
                    signal[t] = Complex::new(plane[base + col] as f32, 0.0);
                }
                fft.process_with_scratch(&mut signal, &mut scratch);
                for (bin, c) in bins.iter_mut().zip(signal.iter()) {
                    *bin = c.norm();
                }
                *slot = bins[dominant_bin(&bins)];
            }
        });

    normalize(&magnitudes, width, height)
}

/// First (lowest-index) bin in `1..len` attaining the maximum magnitude.
/// Bin 0 is the DC term and never participates.
pub fn dominant_bin(magnitudes: &[f32]) -> usize {
    debug_assert!(magnitudes.len() >= 2);
    let mut best = 1;
    for (i, &m) in magnitudes.iter().enumerate().skip(2) {
        if m > magnitudes[best] {
            best = i;
        }
    }
    best
}

/// Linear rescale of the magnitude image to 0..=255.
///
/// A window with zero magnitude range carries no ranking information and
/// would divide by zero; it is emitted as a uniform frame instead.
fn normalize(magnitudes: &[f32], width: u32, height: u32) -> GrayFrame {
    let min = magnitudes.iter().copied().fold(f32::INFINITY, f32::min);
    let max = magnitudes.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;

    if range <= 0.0 {
        log::warn!("Degenerate window (flat magnitudes), emitting uniform frame");
        return GrayFrame::new(width, height, vec![0u8; magnitudes.len()]);
    }

    let data = magnitudes
        .iter()
        .map(|&m| ((m - min) / range * 255.0).round() as u8)
        .collect();
    GrayFrame::new(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_bin_skips_dc() {
        // DC dwarfs everything; the pick must still come from 1..len.
        assert_eq!(dominant_bin(&[100.0, 1.0, 2.0, 0.5]), 2);
    }

    #[test]
    fn dominant_bin_ties_break_low() {
        assert_eq!(dominant_bin(&[0.0, 5.0, 5.0, 5.0]), 1);
        assert_eq!(dominant_bin(&[9.0, 3.0, 7.0, 7.0, 1.0]), 2);
    }

    #[test]
    fn sinusoid_pixel_dominates_constant_pixel() {
        let window = 8usize;
        let k = 2usize;
        // Pixel 0 is constant; pixel 1 oscillates at bin k with amplitude
        // 100 around 128 (integer-exact for k = 2, window = 8).
        let frames: Vec<Vec<u8>> = (0..window)
            .map(|t| {
                let phase = 2.0 * std::f64::consts::PI * k as f64 * t as f64 / window as f64;
                let osc = (128.0 + 100.0 * phase.cos()).round() as u8;
                vec![100u8, osc]
            })
            .collect();
        let planes: Vec<&[u8]> = frames.iter().map(|f| f.as_slice()).collect();

        let out = analyze_window(&planes, 2, 1);
        assert_eq!(out.width, 2);
        assert_eq!(out.height, 1);
        // Constant pixel has zero non-DC energy, sinusoid pixel has the
        // window maximum, so normalization pins them to the extremes.
        assert_eq!(out.data, vec![0, 255]);
    }

    #[test]
    fn sinusoid_bin_recovery() {
        let window = 16usize;
        let k = 3usize;
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(window);
        let mut signal: Vec<Complex<f32>> = (0..window)
            .map(|t| {
                let phase = 2.0 * std::f64::consts::PI * k as f64 * t as f64 / window as f64;
                Complex::new((128.0 + 90.0 * phase.cos()).round() as f32, 0.0)
            })
            .collect();
        fft.process(&mut signal);
        let bins: Vec<f32> = signal.iter().map(|c| c.norm()).collect();
        let chosen = dominant_bin(&bins);
        // A real sinusoid puts equal energy in bins k and window - k;
        // either is an exact recovery.
        assert!(chosen == k || chosen == window - k, "chosen bin {}", chosen);
        // Quantizing to u8 perturbs the peak by a few units at most.
        assert!((bins[chosen] - 90.0 * window as f32 / 2.0).abs() < 8.0);
    }

    #[test]
    fn flat_window_is_uniform_and_finite() {
        let frames: Vec<Vec<u8>> = (0..6).map(|_| vec![37u8; 12]).collect();
        let planes: Vec<&[u8]> = frames.iter().map(|f| f.as_slice()).collect();
        let out = analyze_window(&planes, 4, 3);
        assert_eq!(out.data, vec![0u8; 12]);
    }

    #[test]
    fn nondegenerate_output_spans_full_range() {
        // Three pixel behaviors: constant, alternating, slow ramp.
        let frames: Vec<Vec<u8>> = (0..8)
            .map(|t| vec![50u8, if t % 2 == 0 { 200 } else { 20 }, (t * 10) as u8])
            .collect();
        let planes: Vec<&[u8]> = frames.iter().map(|f| f.as_slice()).collect();
        let out = analyze_window(&planes, 3, 1);
        assert!(out.data.contains(&0));
        assert!(out.data.contains(&255));
    }
}
