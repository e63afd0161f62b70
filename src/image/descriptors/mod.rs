use crate::Float;
use crate::image::features::KeyPoint;
use self::brief_descriptor::bit_vector::BitVector;

pub mod brief_descriptor;
pub mod freak_descriptor;
pub mod fuzzy_transform;
pub mod hog_descriptor;
pub mod sift_descriptor;
pub mod surf_descriptor;

/// Descriptors of one image. Real vectors are compared under L2, binary ones under the hamming distance.
#[derive(Debug,Clone,PartialEq)]
pub enum DescriptorSet {
    Real(Vec<Vec<Float>>),
    Binary(Vec<BitVector>)
}

impl DescriptorSet {
    pub fn len(&self) -> usize {
        match self {
            DescriptorSet::Real(v) => v.len(),
            DescriptorSet::Binary(v) => v.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored elements. Binary descriptors count one element per byte.
    pub fn size(&self) -> usize {
        match self {
            DescriptorSet::Real(v) => v.iter().map(|d| d.len()).sum(),
            DescriptorSet::Binary(v) => v.iter().map(|d| d.bytes()).sum()
        }
    }
}

/// Keypoints and their descriptors. `descriptors[i]` describes `keypoints[i]`.
#[derive(Debug,Clone)]
pub struct KeypointFeatures {
    pub keypoints: Vec<KeyPoint>,
    pub descriptors: DescriptorSet
}

impl KeypointFeatures {
    pub fn real(keypoints: Vec<KeyPoint>, descriptors: Vec<Vec<Float>>) -> KeypointFeatures {
        KeypointFeatures { keypoints, descriptors: DescriptorSet::Real(descriptors) }
    }

    pub fn binary(keypoints: Vec<KeyPoint>, descriptors: Vec<BitVector>) -> KeypointFeatures {
        KeypointFeatures { keypoints, descriptors: DescriptorSet::Binary(descriptors) }
    }
}
