use crate::Float;

/// A symmetric 1D filter with an odd number of taps
pub trait Kernel {
    fn kernel(&self) -> &[Float];
    /// Pixel distance between neighbouring taps
    fn step(&self) -> usize;
    /// Taps on either side of the center
    fn half_width(&self) -> usize {
        (self.kernel().len()-1)/2
    }
    /// Sum the convolution is divided by
    fn normalizing_constant(&self) -> Float;
}
