extern crate image as image_rs;

use std::fs;
use std::path::Path;
use image_rs::{Rgb,RgbImage,imageops};
use patchbench::io::{self,InputImage};
use patchbench::algorithms::{AlgorithmConfig,AlgorithmKind,MatchingAlgorithm,ResultTarget};
use patchbench::benchmark::{run_benchmark,config::BenchmarkConfig};
use patchbench::evaluation::Verdict;
use patchbench::report::ReportSummary;

fn scene(object: (u32,u32), seed: u32) -> RgbImage {
    RgbImage::from_fn(96, 80, |x,y| {
        let inside = x >= object.0 && x < object.0 + 16 && y >= object.1 && y < object.1 + 16;
        match inside {
            true => {
                let v = (40 + ((x - object.0)*13 + (y - object.1)*seed) % 200) as u8;
                Rgb([v,v,v])
            },
            false => Rgb([100,100,100])
        }
    })
}

fn write_inputs(root: &Path) -> () {
    let originals = root.join("original");
    let parts = root.join("parts");
    fs::create_dir_all(&originals).unwrap();
    fs::create_dir_all(&parts).unwrap();

    let a = scene((32,24), 29);
    let b = scene((48,40), 7);
    a.save(originals.join("a.png")).unwrap();
    b.save(originals.join("b.png")).unwrap();
    imageops::crop_imm(&a, 24, 16, 32, 32).to_image().save(parts.join("p1.png")).unwrap();
    imageops::crop_imm(&b, 40, 32, 32, 32).to_image().save(parts.join("p2.png")).unwrap();

    fs::write(root.join("annotations.json"), r#"{"matches": [
        {"part": "p1.png", "image": "a.png", "x": 24, "y": 16},
        {"part": "p2.png", "image": "b.png", "x": 40, "y": 32}]}"#).unwrap();
}

#[test]
fn dense_run_writes_results_and_report() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let parts = io::from_directory(&dir.path().join("parts")).unwrap();
    let images = io::from_directory(&dir.path().join("original")).unwrap();

    let mut ft = AlgorithmKind::Ft.default_config().build(parts, images, 0);
    ft.process();
    let out = dir.path().join("out");
    assert_eq!(ft.write_results(&ResultTarget::Directory(out.clone()), true).unwrap(), 2);
    let first = image_rs::open(out.join("0.jpg")).unwrap().to_rgb8();
    assert_eq!(first.dimensions(), (96 + 32, 80));

    let text_path = dir.path().join("result.txt");
    ft.report().write_to(&text_path).unwrap();
    let text = fs::read_to_string(&text_path).unwrap();
    let lines = text.lines().collect::<Vec<&str>>();
    assert_eq!(lines.len(), 11);
    assert!(lines[0].starts_with("Total time [ms]: "));
    assert_eq!(lines[7], "");
    assert_eq!(lines[10], "Average subsets in image: 63.0");
    assert!(!text.ends_with('\n'));
}

#[test]
fn processing_again_replaces_earlier_results() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let parts = io::from_directory(&dir.path().join("parts")).unwrap();
    let images = io::from_directory(&dir.path().join("original")).unwrap();

    for kind in [AlgorithmKind::Ft, AlgorithmKind::Brief] {
        let mut algorithm = kind.default_config().build(parts.clone(), images.clone(), 0);
        algorithm.process();
        let first = algorithm.results().to_vec();
        let image_descriptors = algorithm.diagnostics().image_descriptor.len();
        let subsets = algorithm.diagnostics().subsets.len();

        algorithm.process();
        assert_eq!(algorithm.results().len(), first.len(), "{}", kind);
        assert_eq!(algorithm.results().iter().map(|r| r.location.clone()).collect::<Vec<_>>(),
            first.iter().map(|r| r.location.clone()).collect::<Vec<_>>(), "{}", kind);
        assert_eq!(algorithm.diagnostics().image_descriptor.len(), image_descriptors, "{}", kind);
        assert_eq!(algorithm.diagnostics().subsets.len(), subsets, "{}", kind);
    }
}

#[test]
fn in_memory_results_can_be_named_freely() {
    let image = scene((32,24), 29);
    let part = imageops::crop_imm(&image, 24, 16, 32, 32).to_image();
    let config = AlgorithmConfig::Hog { parameters: Default::default() };
    let mut hog = config.build(vec![InputImage::new(part, None)], vec![InputImage::new(image, None)], 0);
    hog.process();
    assert_eq!(hog.results()[0].location.as_ref().unwrap().start, (24,16));

    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().to_path_buf();
    let target = ResultTarget::Paths(Box::new(move |i| base.join(format!("hog_{}.png", i))));
    hog.write_results(&target, false).unwrap();
    let written = image_rs::open(dir.path().join("hog_0.png")).unwrap().to_rgb8();
    assert_eq!(written.dimensions(), (96, 80));
    assert_eq!(*written.get_pixel(24, 16), Rgb([255, 0, 0]));
    assert_eq!(*written.get_pixel(56, 48), Rgb([255, 0, 0]));
}

#[test]
fn benchmark_runs_iterations_and_aggregates() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let root = dir.path();
    let yaml = format!("
parts_dir: {parts}
originals_dir: {originals}
output_dir: {output}
iterations: 2
annotations: {annotations}
algorithms:
  - kind: ft
",
        parts = root.join("parts").display(),
        originals = root.join("original").display(),
        output = root.join("out").display(),
        annotations = root.join("annotations.json").display());
    let config_path = root.join("bench.yaml");
    fs::write(&config_path, yaml).unwrap();

    let config = BenchmarkConfig::load(&config_path).unwrap();
    let runs = run_benchmark(&config).unwrap();
    let ft = &runs["FT"];
    assert_eq!(ft.summaries.len(), 2);
    assert_eq!(ft.verdicts.len(), 2);
    assert!(ft.verdicts.iter().all(|v| v.matched == 2));

    let ft_dir = root.join("out").join("ft");
    for iteration in 0..2 {
        assert!(ft_dir.join(iteration.to_string()).join("0.jpg").is_file());
        assert!(ft_dir.join(format!("{}_result.txt", iteration)).is_file());
        assert!(ft_dir.join(format!("{}_result.yaml", iteration)).is_file());
    }
    let summary = ReportSummary::read_yaml(&ft_dir.join("summary.yaml")).unwrap();
    assert_eq!(summary.algorithm, "FT");
    assert_eq!(summary.subsets, Some(63.0));
    assert_eq!(summary.part_descriptor_size, 25.0);
    assert_eq!(Verdict::Match.folder(), "match");
}
