use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use log::info;
use serde::{Serialize, Deserialize};

use crate::{Float,Result};
use crate::numerics::{mean,round};

/// Raw measurements collected while an algorithm runs
#[derive(Debug,Clone,Default)]
pub struct Diagnostics {
    pub part_descriptor: Vec<Duration>,
    pub image_descriptor: Vec<Duration>,
    pub individual_image_matching: Vec<Duration>,
    pub all_images_matching: Vec<Duration>,
    pub part_process: Vec<Duration>,

    pub part_descriptor_size: Vec<usize>,
    pub image_descriptor_size: Vec<usize>,
    pub subsets: Vec<usize>,

    /// Milliseconds, rounded to 3 decimal places
    pub total_time: Float
}

impl Diagnostics {
    pub fn set_total_time(&mut self, elapsed: Duration) -> () {
        self.total_time = round(elapsed.as_secs_f64()*1000.0, 3);
    }
}

/// Mean duration in milliseconds rounded to 3 decimal places, NaN if there is nothing to average
pub fn average_time(times: &[Duration]) -> Float {
    let seconds = times.iter().map(|t| t.as_secs_f64()).collect::<Vec<Float>>();
    round(mean(&seconds)*1000.0, 3)
}

/// Mean count rounded to 2 decimal places, NaN if there is nothing to average
pub fn average_count(counts: &[usize]) -> Float {
    let values = counts.iter().map(|&c| c as Float).collect::<Vec<Float>>();
    round(mean(&values), 2)
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Dense,
    Keypoint
}

/// Averaged diagnostics of one run
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ReportSummary {
    pub algorithm: String,
    pub kind: ReportKind,
    pub total_time_ms: Float,
    pub part_descriptor_ms: Float,
    pub image_descriptor_ms: Float,
    pub individual_image_matching_ms: Float,
    pub all_images_matching_ms: Float,
    pub part_process_ms: Float,
    pub part_descriptor_size: Float,
    pub image_descriptor_size: Float,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsets: Option<Float>
}

impl ReportSummary {
    pub fn from_diagnostics(algorithm: &str, kind: ReportKind, diagnostics: &Diagnostics) -> ReportSummary {
        ReportSummary {
            algorithm: algorithm.to_string(),
            kind,
            total_time_ms: diagnostics.total_time,
            part_descriptor_ms: average_time(&diagnostics.part_descriptor),
            image_descriptor_ms: average_time(&diagnostics.image_descriptor),
            individual_image_matching_ms: average_time(&diagnostics.individual_image_matching),
            all_images_matching_ms: average_time(&diagnostics.all_images_matching),
            part_process_ms: average_time(&diagnostics.part_process),
            part_descriptor_size: average_count(&diagnostics.part_descriptor_size),
            image_descriptor_size: average_count(&diagnostics.image_descriptor_size),
            subsets: match kind {
                ReportKind::Dense => Some(average_count(&diagnostics.subsets)),
                ReportKind::Keypoint => None
            }
        }
    }

    pub fn write_yaml(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn read_yaml(path: &Path) -> Result<ReportSummary> {
        Ok(serde_yaml::from_str(&fs::read_to_string(path)?)?)
    }
}

/// Field by field mean of several summaries, rounded like the individual averages.
/// Returns None for an empty slice.
pub fn aggregate(summaries: &[ReportSummary]) -> Option<ReportSummary> {
    let first = summaries.first()?;
    let field = |f: &dyn Fn(&ReportSummary) -> Float, dp: i32| {
        round(mean(&summaries.iter().map(|s| f(s)).collect::<Vec<Float>>()), dp)
    };
    let subsets = summaries.iter().map(|s| s.subsets).collect::<Option<Vec<Float>>>().map(|v| round(mean(&v), 2));

    Some(ReportSummary {
        algorithm: first.algorithm.clone(),
        kind: first.kind,
        total_time_ms: field(&|s| s.total_time_ms, 3),
        part_descriptor_ms: field(&|s| s.part_descriptor_ms, 3),
        image_descriptor_ms: field(&|s| s.image_descriptor_ms, 3),
        individual_image_matching_ms: field(&|s| s.individual_image_matching_ms, 3),
        all_images_matching_ms: field(&|s| s.all_images_matching_ms, 3),
        part_process_ms: field(&|s| s.part_process_ms, 3),
        part_descriptor_size: field(&|s| s.part_descriptor_size, 2),
        image_descriptor_size: field(&|s| s.image_descriptor_size, 2),
        subsets: match first.kind {
            ReportKind::Dense => subsets,
            ReportKind::Keypoint => None
        }
    })
}

/// Prints like a python float: integral values keep one decimal, NaN is `nan`
pub fn format_number(value: Float) -> String {
    match value {
        v if v.is_nan() => "nan".to_string(),
        v if v.is_infinite() && v > 0.0 => "inf".to_string(),
        v if v.is_infinite() => "-inf".to_string(),
        v if v.fract() == 0.0 && v.abs() < 1e16 => format!("{:.1}", v),
        v => format!("{}", v)
    }
}

/// Textual result report of one run
#[derive(Debug,Clone,PartialEq)]
pub struct Report {
    pub summary: ReportSummary
}

impl Report {
    pub fn new(summary: ReportSummary) -> Report {
        Report { summary }
    }

    pub fn lines(&self) -> Vec<String> {
        let s = &self.summary;
        let (part_label, image_label) = match s.kind {
            ReportKind::Dense => ("Descriptor computing for a part", "Descriptor computing for a image"),
            ReportKind::Keypoint => ("Keypoint and descriptor computing for a part", "Keypoint and descriptor computing for an image")
        };

        let mut lines = vec![
            format!("Total time [ms]: {}", format_number(s.total_time_ms)),
            "Average times [ms]:".to_string(),
            format!("    - {}: {}", part_label, format_number(s.part_descriptor_ms)),
            format!("    - {}: {}", image_label, format_number(s.image_descriptor_ms)),
            format!("    - Matching part with individual image: {}", format_number(s.individual_image_matching_ms)),
            format!("    - Matching part with all images: {}", format_number(s.all_images_matching_ms)),
            format!("    - Processing entire part: {}", format_number(s.part_process_ms)),
            String::new(),
            format!("Average part descriptor size: {}", format_number(s.part_descriptor_size)),
            format!("Average image descriptor size: {}", format_number(s.image_descriptor_size))
        ];
        if let Some(subsets) = s.subsets {
            lines.push(format!("Average subsets in image: {}", format_number(subsets)));
        }
        lines
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }

    pub fn print(&self) -> () {
        for line in self.lines() {
            info!("{}", line);
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostics() -> Diagnostics {
        Diagnostics {
            part_descriptor: vec![Duration::from_micros(1500), Duration::from_micros(2500)],
            image_descriptor: vec![Duration::from_millis(10)],
            individual_image_matching: vec![Duration::from_micros(333), Duration::from_micros(334), Duration::from_micros(334)],
            all_images_matching: vec![],
            part_process: vec![Duration::from_millis(3)],
            part_descriptor_size: vec![10, 11, 11],
            image_descriptor_size: vec![100],
            subsets: vec![12],
            total_time: 123.456
        }
    }

    #[test]
    fn averages_are_rounded() {
        assert_eq!(average_time(&[Duration::from_micros(1500), Duration::from_micros(2500)]), 2.0);
        assert_eq!(average_count(&[10, 11, 11]), 10.67);
        assert!(average_time(&[]).is_nan());
    }

    #[test]
    fn numbers_print_like_python_floats() {
        assert_eq!(format_number(12.0), "12.0");
        assert_eq!(format_number(0.333), "0.333");
        assert_eq!(format_number(Float::NAN), "nan");
    }

    #[test]
    fn dense_report_layout() {
        let report = Report::new(ReportSummary::from_diagnostics("HOG", ReportKind::Dense, &diagnostics()));
        let expected = "Total time [ms]: 123.456\n\
                        Average times [ms]:\n    \
                        - Descriptor computing for a part: 2.0\n    \
                        - Descriptor computing for a image: 10.0\n    \
                        - Matching part with individual image: 0.334\n    \
                        - Matching part with all images: nan\n    \
                        - Processing entire part: 3.0\n\
                        \n\
                        Average part descriptor size: 10.67\n\
                        Average image descriptor size: 100.0\n\
                        Average subsets in image: 12.0";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn keypoint_report_has_no_subsets() {
        let report = Report::new(ReportSummary::from_diagnostics("ORB", ReportKind::Keypoint, &diagnostics()));
        let text = report.to_string();
        assert!(text.contains("    - Keypoint and descriptor computing for an image: 10.0"));
        assert!(text.ends_with("Average image descriptor size: 100.0"));
        assert!(!text.contains("subsets"));
    }

    #[test]
    fn aggregate_averages_fields() {
        let mut a = ReportSummary::from_diagnostics("FT", ReportKind::Dense, &diagnostics());
        let mut b = a.clone();
        a.total_time_ms = 100.0;
        b.total_time_ms = 200.0;
        b.subsets = Some(14.0);
        let aggregated = aggregate(&[a, b]).unwrap();
        assert_eq!(aggregated.total_time_ms, 150.0);
        assert_eq!(aggregated.subsets, Some(13.0));
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn summary_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.yaml");
        let summary = ReportSummary::from_diagnostics("SIFT", ReportKind::Keypoint, &diagnostics());
        summary.write_yaml(&path).unwrap();
        let read = ReportSummary::read_yaml(&path).unwrap();
        assert_eq!(read.algorithm, "SIFT");
        assert_eq!(read.part_descriptor_size, 10.67);
        assert!(read.all_images_matching_ms.is_nan());
    }
}
