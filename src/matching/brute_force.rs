use serde::{Serialize, Deserialize};

use crate::{BenchError,Result,Float};
use crate::image::descriptors::{DescriptorSet,brief_descriptor::bit_vector::BitVector};

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct DMatch {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: Float
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct BruteForceMatcher {
    pub cross_check: bool
}

fn l2(a: &[Float], b: &[Float]) -> Float {
    a.iter().zip(b.iter()).map(|(x,y)| (x-y)*(x-y)).sum::<Float>().sqrt()
}

fn hamming(a: &BitVector, b: &BitVector) -> Float {
    a.hamming_distance(b) as Float
}

/// Index and distance of the nearest candidate, the lowest index wins ties
fn nearest<T, F: Fn(&T,&T) -> Float>(query: &T, candidates: &[T], distance: &F) -> Option<(usize,Float)> {
    let mut best: Option<(usize,Float)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let d = distance(query, candidate);
        let improves = match best {
            None => true,
            Some((_, best_distance)) => d < best_distance
        };
        if improves {
            best = Some((idx, d));
        }
    }
    best
}

impl BruteForceMatcher {
    pub fn new(cross_check: bool) -> BruteForceMatcher {
        BruteForceMatcher { cross_check }
    }

    fn match_with<T, F: Fn(&T,&T) -> Float>(&self, query: &[T], train: &[T], distance: F) -> Vec<DMatch> {
        query.iter().enumerate().filter_map(|(query_idx, q)| {
            let (train_idx, d) = nearest(q, train, &distance)?;
            if self.cross_check {
                let (back_idx, _) = nearest(&train[train_idx], query, &distance)?;
                if back_idx != query_idx {
                    return None;
                }
            }
            Some(DMatch { query_idx, train_idx, distance: d })
        }).collect()
    }

    /// Nearest train descriptor for every query descriptor, L2 for real and hamming for binary descriptors
    pub fn match_descriptors(&self, query: &DescriptorSet, train: &DescriptorSet) -> Result<Vec<DMatch>> {
        match (query, train) {
            (DescriptorSet::Real(q), DescriptorSet::Real(t)) => {
                let lengths_agree = q.iter().chain(t.iter()).all(|d| q.first().map_or(true, |f| d.len() == f.len()));
                if !lengths_agree {
                    return Err(BenchError::DescriptorMismatch("real descriptors of different lengths".to_string()));
                }
                Ok(self.match_with(q, t, |a: &Vec<Float>, b: &Vec<Float>| l2(a, b)))
            },
            (DescriptorSet::Binary(q), DescriptorSet::Binary(t)) => Ok(self.match_with(q, t, hamming)),
            _ => Err(BenchError::DescriptorMismatch("cannot match real against binary descriptors".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(pattern: &[bool]) -> BitVector {
        let mut v = BitVector::new(pattern.len());
        for &b in pattern {
            v.add_value(b);
        }
        v
    }

    #[test]
    fn cross_check_keeps_mutual_nearest_neighbours() {
        let query = DescriptorSet::Real(vec![vec![0.0,0.0], vec![0.1,0.0], vec![5.0,5.0]]);
        let train = DescriptorSet::Real(vec![vec![0.05,0.0], vec![5.0,5.5]]);

        let plain = BruteForceMatcher::new(false).match_descriptors(&query, &train).unwrap();
        assert_eq!(plain.len(), 3);

        let checked = BruteForceMatcher::new(true).match_descriptors(&query, &train).unwrap();
        assert_eq!(checked.len(), 2);
        assert_eq!((checked[0].query_idx, checked[0].train_idx), (0,0));
        assert_eq!((checked[1].query_idx, checked[1].train_idx), (2,1));
        assert!((checked[1].distance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn binary_descriptors_use_hamming() {
        let query = DescriptorSet::Binary(vec![bits(&[true,true,false,false])]);
        let train = DescriptorSet::Binary(vec![bits(&[false,false,true,true]), bits(&[true,false,false,false])]);
        let matches = BruteForceMatcher::new(true).match_descriptors(&query, &train).unwrap();
        assert_eq!(matches, vec![DMatch{query_idx: 0, train_idx: 1, distance: 1.0}]);
    }

    #[test]
    fn mixed_or_empty_sets() {
        let real = DescriptorSet::Real(vec![vec![1.0]]);
        let binary = DescriptorSet::Binary(vec![bits(&[true])]);
        assert!(BruteForceMatcher::new(true).match_descriptors(&real, &binary).is_err());
        assert!(BruteForceMatcher::new(true).match_descriptors(&real, &DescriptorSet::Real(vec![])).unwrap().is_empty());
        let uneven = DescriptorSet::Real(vec![vec![1.0, 2.0]]);
        assert!(BruteForceMatcher::new(true).match_descriptors(&real, &uneven).is_err());
    }
}
