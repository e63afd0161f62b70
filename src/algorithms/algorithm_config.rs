use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::{BenchError,Result};
use crate::io::InputImage;
use crate::image::descriptors::{
    brief_descriptor::BriefRuntimeParameters,
    freak_descriptor::FreakRuntimeParameters,
    fuzzy_transform::FuzzyTransformRuntimeParameters,
    hog_descriptor::HogRuntimeParameters,
    surf_descriptor::SurfRuntimeParameters};
use crate::image::pyramid::{orb::OrbRuntimeParameters,sift::sift_runtime_params::SiftRuntimeParams};
use super::MatchingAlgorithm;
use super::keypoint::KeypointMatchingParameters;
use super::{hog,ft,sift,surf,brief,orb,freak};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    Hog,
    Ft,
    Sift,
    Surf,
    Brief,
    Orb,
    Freak
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 7] = [
        AlgorithmKind::Hog, AlgorithmKind::Ft, AlgorithmKind::Sift, AlgorithmKind::Surf,
        AlgorithmKind::Brief, AlgorithmKind::Orb, AlgorithmKind::Freak];

    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::Hog => "HOG",
            AlgorithmKind::Ft => "FT",
            AlgorithmKind::Sift => "SIFT",
            AlgorithmKind::Surf => "SURF",
            AlgorithmKind::Brief => "BRIEF",
            AlgorithmKind::Orb => "ORB",
            AlgorithmKind::Freak => "FREAK"
        }
    }

    /// Default output folder
    pub fn folder(&self) -> &'static str {
        match self {
            AlgorithmKind::Hog => "hog",
            AlgorithmKind::Ft => "ft",
            AlgorithmKind::Sift => "sift",
            AlgorithmKind::Surf => "surf",
            AlgorithmKind::Brief => "fast_brief",
            AlgorithmKind::Orb => "orb",
            AlgorithmKind::Freak => "fast_freak"
        }
    }

    pub fn default_config(&self) -> AlgorithmConfig {
        match self {
            AlgorithmKind::Hog => AlgorithmConfig::Hog { parameters: Default::default() },
            AlgorithmKind::Ft => AlgorithmConfig::Ft { parameters: Default::default() },
            AlgorithmKind::Sift => AlgorithmConfig::Sift { parameters: Default::default(), matching: Default::default() },
            AlgorithmKind::Surf => AlgorithmConfig::Surf { parameters: Default::default(), matching: Default::default() },
            AlgorithmKind::Brief => AlgorithmConfig::Brief { parameters: Default::default(), matching: Default::default() },
            AlgorithmKind::Orb => AlgorithmConfig::Orb { parameters: Default::default(), matching: Default::default() },
            AlgorithmKind::Freak => AlgorithmConfig::Freak { parameters: Default::default(), matching: Default::default() }
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Accepts the display name or the output folder in any case, e.g. `HOG`, `sift` or `fast_brief`
impl FromStr for AlgorithmKind {
    type Err = BenchError;

    fn from_str(name: &str) -> Result<AlgorithmKind> {
        let lowered = name.trim().to_lowercase();
        AlgorithmKind::ALL.iter()
            .find(|k| k.name().to_lowercase() == lowered || k.folder() == lowered)
            .copied()
            .ok_or_else(|| BenchError::Config(format!("unknown algorithm {}", name)))
    }
}

/// An algorithm together with its runtime parameters, tagged by `kind`
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AlgorithmConfig {
    Hog {
        #[serde(default)]
        parameters: HogRuntimeParameters
    },
    Ft {
        #[serde(default)]
        parameters: FuzzyTransformRuntimeParameters
    },
    Sift {
        #[serde(default)]
        parameters: SiftRuntimeParams,
        #[serde(default)]
        matching: KeypointMatchingParameters
    },
    Surf {
        #[serde(default)]
        parameters: SurfRuntimeParameters,
        #[serde(default)]
        matching: KeypointMatchingParameters
    },
    Brief {
        #[serde(default)]
        parameters: BriefRuntimeParameters,
        #[serde(default)]
        matching: KeypointMatchingParameters
    },
    Orb {
        #[serde(default)]
        parameters: OrbRuntimeParameters,
        #[serde(default)]
        matching: KeypointMatchingParameters
    },
    Freak {
        #[serde(default)]
        parameters: FreakRuntimeParameters,
        #[serde(default)]
        matching: KeypointMatchingParameters
    }
}

impl AlgorithmConfig {
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            AlgorithmConfig::Hog{..} => AlgorithmKind::Hog,
            AlgorithmConfig::Ft{..} => AlgorithmKind::Ft,
            AlgorithmConfig::Sift{..} => AlgorithmKind::Sift,
            AlgorithmConfig::Surf{..} => AlgorithmKind::Surf,
            AlgorithmConfig::Brief{..} => AlgorithmKind::Brief,
            AlgorithmConfig::Orb{..} => AlgorithmKind::Orb,
            AlgorithmConfig::Freak{..} => AlgorithmKind::Freak
        }
    }

    /// Rejects parameters the matchers cannot run with
    pub fn validate(&self) -> Result<()> {
        match self {
            AlgorithmConfig::Sift{matching, ..}
            | AlgorithmConfig::Surf{matching, ..}
            | AlgorithmConfig::Brief{matching, ..}
            | AlgorithmConfig::Orb{matching, ..}
            | AlgorithmConfig::Freak{matching, ..} => matching.validate(),
            AlgorithmConfig::Hog{..} | AlgorithmConfig::Ft{..} => Ok(())
        }
    }

    pub fn build(&self, parts: Vec<InputImage>, images: Vec<InputImage>, iteration: usize) -> Box<dyn MatchingAlgorithm> {
        match *self {
            AlgorithmConfig::Hog{parameters} => Box::new(hog::new_hog_matcher(parameters, parts, images, iteration)),
            AlgorithmConfig::Ft{parameters} => Box::new(ft::new_ft_matcher(parameters, parts, images, iteration)),
            AlgorithmConfig::Sift{parameters, matching} => Box::new(sift::new_sift_matcher(parameters, matching, parts, images, iteration)),
            AlgorithmConfig::Surf{parameters, matching} => Box::new(surf::new_surf_matcher(parameters, matching, parts, images, iteration)),
            AlgorithmConfig::Brief{parameters, matching} => Box::new(brief::new_brief_matcher(parameters, matching, parts, images, iteration)),
            AlgorithmConfig::Orb{parameters, matching} => Box::new(orb::new_orb_matcher(parameters, matching, parts, images, iteration)),
            AlgorithmConfig::Freak{parameters, matching} => Box::new(freak::new_freak_matcher(parameters, matching, parts, images, iteration))
        }
    }
}
