/// A single-channel 8-bit frame, row-major, immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl GrayFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height) as usize);
        Self { width, height, data }
    }

    /// BT.601 luminance reduction from packed rgb24. This is the only
    /// color-to-gray path, so every frame goes through the same weights.
    pub fn from_rgb24(width: u32, height: u32, rgb: &[u8]) -> Self {
        let mut data = Vec::with_capacity((width * height) as usize);
        for px in rgb.chunks_exact(3) {
            let y = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            data.push(y.round().min(255.0) as u8);
        }
        Self { width, height, data }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_of_primaries() {
        let rgb = [
            255, 255, 255, // white
            0, 0, 0, // black
            255, 0, 0, // red
            0, 255, 0, // green
            0, 0, 255, // blue
            128, 128, 128, // mid gray
        ];
        let frame = GrayFrame::from_rgb24(6, 1, &rgb);
        assert_eq!(frame.data, vec![255, 0, 76, 150, 29, 128]);
    }

    #[test]
    fn dimensions_match_input() {
        let rgb = vec![10u8; 4 * 3 * 3];
        let frame = GrayFrame::from_rgb24(4, 3, &rgb);
        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 3);
        assert_eq!(frame.data.len(), 12);
    }
}
