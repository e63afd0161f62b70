use crate::Float;

#[repr(u8)]
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum ImageEncoding {
    U8,
    F64
}

impl ImageEncoding {
    // https://en.wikipedia.org/wiki/Normalization_(image_processing)
    pub fn normalize_to_gray(&self, max: Float, min: Float, value: Float) -> u8 {
        match self {
            ImageEncoding::U8 => value.round().clamp(0.0, 255.0) as u8,
            ImageEncoding::F64 if max > min => {
                let range = 255 as Float; // 255 - 0
                ((value - min) * (range / (max - min))) as u8
            },
            ImageEncoding::F64 => 0
        }
    }
}
