use std::fmt;
use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::{Float,Result};
use crate::algorithms::MatchingResult;

pub mod lighting;

/// Distance in pixels below which a location counts as a match
pub const MATCH_DISTANCE: Float = 5.0;
/// Distance in pixels below which a location needs a manual check
pub const NOT_SURE_DISTANCE: Float = 20.0;

/// Where a part really is: top left corner `(x, y)` inside `image`
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Annotation {
    pub part: String,
    pub image: String,
    pub x: Float,
    pub y: Float
}

#[derive(Debug,Clone,PartialEq,Default,Serialize,Deserialize)]
pub struct Annotations {
    pub matches: Vec<Annotation>
}

impl Annotations {
    pub fn load(path: &Path) -> Result<Annotations> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Annotation for a part file name
    pub fn find(&self, part: &str) -> Option<&Annotation> {
        self.matches.iter().find(|a| a.part == part)
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum Verdict {
    Match,
    NotSure,
    Miss
}

impl Verdict {
    pub fn folder(&self) -> &'static str {
        match self {
            Verdict::Match => "match",
            Verdict::NotSure => "notSure",
            Verdict::Miss => "nope"
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.folder())
    }
}

fn file_name(path: &str) -> Option<String> {
    Path::new(path).file_name().map(|n| n.to_string_lossy().into_owned())
}

pub fn judge(result: &MatchingResult, annotations: &Annotations) -> Verdict {
    let annotation = match file_name(&result.part_path).and_then(|name| annotations.find(&name)) {
        Some(a) => a,
        None => return Verdict::Miss
    };
    let location = match &result.location {
        Some(l) => l,
        None => return Verdict::Miss
    };
    if file_name(&location.image_path).as_deref() != Some(annotation.image.as_str()) {
        return Verdict::Miss;
    }

    let dx = location.start.0 as Float - annotation.x;
    let dy = location.start.1 as Float - annotation.y;
    match (dx*dx + dy*dy).sqrt() {
        d if d < MATCH_DISTANCE => Verdict::Match,
        d if d < NOT_SURE_DISTANCE => Verdict::NotSure,
        _ => Verdict::Miss
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
pub struct VerdictCounts {
    pub matched: usize,
    pub not_sure: usize,
    pub missed: usize
}

impl VerdictCounts {
    pub fn add(&mut self, verdict: Verdict) -> () {
        match verdict {
            Verdict::Match => self.matched += 1,
            Verdict::NotSure => self.not_sure += 1,
            Verdict::Miss => self.missed += 1
        }
    }

    pub fn total(&self) -> usize {
        self.matched + self.not_sure + self.missed
    }
}

pub fn evaluate(results: &[MatchingResult], annotations: &Annotations) -> VerdictCounts {
    let mut counts = VerdictCounts::default();
    for result in results {
        counts.add(judge(result, annotations));
    }
    counts
}
