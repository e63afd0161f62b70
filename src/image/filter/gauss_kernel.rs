use crate::{Float,float};
use float::consts::PI;
use super::kernel::Kernel;

/// Sampled 1D gaussian, truncated at `ceil(4 sigma)`
pub struct GaussKernel1D {
    kernel: Vec<Float>,
    step: usize,
    normalizing_constant: Float
}

impl GaussKernel1D {
    fn sample(mean: Float, std: Float, x:Float) -> Float {
        let exponent = (-0.5*((x-mean)/std).powi(2)).exp();
        let factor = 1.0/(std*(2.0*PI).sqrt());
        factor*exponent
    }

    pub fn new(mean: Float, std: Float, step: usize) -> GaussKernel1D {
        let half_width = (4.0*std).ceil().max(1.0) as isize;
        let kernel: Vec<Float> = (-half_width..half_width+1).map(|x| GaussKernel1D::sample(mean,std,x as Float)).collect();
        // Renormalize the truncated tails
        let normalizing_constant = kernel.iter().sum();
        GaussKernel1D { kernel, step, normalizing_constant }
    }
}

impl Kernel for GaussKernel1D {
    fn kernel(&self) -> &[Float] {
        &self.kernel
    }

    fn step(&self) -> usize {
        self.step
    }

    fn normalizing_constant(&self) -> Float{
        self.normalizing_constant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_sums_to_one_after_normalization() {
        let kernel = GaussKernel1D::new(0.0, 1.6, 1);
        assert_eq!(kernel.half_width(), 7);
        let sum: Float = kernel.kernel().iter().sum::<Float>()/kernel.normalizing_constant();
        assert!((sum-1.0).abs() < 1e-12);
        assert_eq!(kernel.kernel()[0], kernel.kernel()[14]);
    }
}
