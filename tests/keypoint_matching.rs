extern crate image as image_rs;

use image_rs::{Rgb,RgbImage,imageops};
use patchbench::Float;
use patchbench::io::InputImage;
use patchbench::algorithms::{AlgorithmConfig,AlgorithmKind,MatchingAlgorithm};
use patchbench::algorithms::keypoint::KeypointMatchingParameters;

/// Flat background with rectangles of distinct shapes
fn rectangle_scene() -> RgbImage {
    let rectangles: [(u32,u32,u32,u32,u8); 4] = [
        (60, 100, 40, 25, 230),
        (20, 20, 14, 30, 200),
        (110, 20, 30, 12, 150),
        (150, 120, 12, 12, 120)];
    RgbImage::from_fn(200, 160, |x,y| {
        let value = rectangles.iter()
            .find(|&&(rx,ry,w,h,_)| x >= rx && x < rx + w && y >= ry && y < ry + h)
            .map_or(40, |r| r.4);
        Rgb([value,value,value])
    })
}

fn blob_scene() -> RgbImage {
    let blobs: [(Float,Float,Float); 2] = [(36.0, 40.0, 3.0), (90.0, 80.0, 4.0)];
    RgbImage::from_fn(128, 128, |x,y| {
        let v = blobs.iter().map(|&(cx,cy,sigma)| {
            let dx = x as Float - cx;
            let dy = y as Float - cy;
            200.0*(-(dx*dx + dy*dy)/(2.0*sigma*sigma)).exp()
        }).sum::<Float>();
        let value = (25.0 + v).min(255.0) as u8;
        Rgb([value,value,value])
    })
}

fn run(config: &AlgorithmConfig, part: RgbImage, image: RgbImage) -> Box<dyn MatchingAlgorithm> {
    let mut algorithm = config.build(vec![InputImage::new(part, None)], vec![InputImage::new(image, None)], 0);
    algorithm.process();
    algorithm
}

fn assert_self_match(kind: AlgorithmKind, scene: RgbImage) {
    let (width, height) = scene.dimensions();
    let algorithm = run(&kind.default_config(), scene.clone(), scene);
    let results = algorithm.results();
    assert_eq!(results.len(), 1, "{} skipped the part", kind);

    let location = results[0].location.as_ref().unwrap();
    assert_eq!(location.start, (0,0), "{}", kind);
    assert_eq!(location.end, (width as i64, height as i64), "{}", kind);
    assert_eq!(location.distance, 0.0, "{}", kind);

    let evidence = results[0].keypoints.as_ref().unwrap();
    assert!(!evidence.top_matches.is_empty());
    assert!(evidence.top_matches.len() <= KeypointMatchingParameters::default().top_matches);
    assert!(evidence.top_matches.iter().all(|m| m.query_idx == m.train_idx));
}

#[test]
fn corner_based_algorithms_match_an_image_with_itself() {
    for kind in [AlgorithmKind::Brief, AlgorithmKind::Orb, AlgorithmKind::Freak] {
        assert_self_match(kind, rectangle_scene());
    }
}

#[test]
fn blob_based_algorithms_match_an_image_with_itself() {
    for kind in [AlgorithmKind::Sift, AlgorithmKind::Surf] {
        assert_self_match(kind, blob_scene());
    }
}

#[test]
fn cropped_part_is_located_by_its_corners() {
    let scene = rectangle_scene();
    let part = imageops::crop_imm(&scene, 30, 70, 100, 90).to_image();
    for kind in [AlgorithmKind::Brief, AlgorithmKind::Freak] {
        let algorithm = run(&kind.default_config(), part.clone(), scene.clone());
        let location = algorithm.results()[0].location.as_ref().unwrap();
        assert_eq!(location.start, (30,70), "{}", kind);
        assert_eq!(location.end, (130,160), "{}", kind);
    }
}

#[test]
fn featureless_inputs_are_skipped() {
    let flat = RgbImage::from_pixel(96, 96, Rgb([128,128,128]));
    for kind in [AlgorithmKind::Sift, AlgorithmKind::Surf, AlgorithmKind::Brief, AlgorithmKind::Orb, AlgorithmKind::Freak] {
        let algorithm = run(&kind.default_config(), flat.clone(), rectangle_scene());
        assert!(algorithm.results().is_empty(), "{}", kind);
        assert!(algorithm.diagnostics().part_descriptor.is_empty());
        assert!(algorithm.diagnostics().part_process.is_empty());
    }
}

#[test]
fn match_drawing_puts_the_part_left_of_the_image() {
    let dir = tempfile::tempdir().unwrap();
    let scene = rectangle_scene();
    let algorithm = run(&AlgorithmKind::Brief.default_config(), scene.clone(), scene);
    let path = dir.path().join("matches").join("0.png");
    assert!(algorithm.write_single_result(&algorithm.results()[0], &path, false).unwrap());
    let written = image_rs::open(&path).unwrap().to_rgb8();
    assert_eq!(written.dimensions(), (400, 160));

    let undrawn = AlgorithmConfig::Brief { parameters: Default::default(), matching: KeypointMatchingParameters { top_matches: 20, draw_matches: false } };
    let scene = rectangle_scene();
    let algorithm = run(&undrawn, scene.clone(), scene);
    let path = dir.path().join("plain.png");
    algorithm.write_single_result(&algorithm.results()[0], &path, false).unwrap();
    assert_eq!(image_rs::open(&path).unwrap().to_rgb8().dimensions(), (200, 160));
}

#[test]
fn zero_top_matches_leave_the_part_unlocated() {
    let config = AlgorithmConfig::Brief { parameters: Default::default(), matching: KeypointMatchingParameters { top_matches: 0, draw_matches: true } };
    assert!(config.validate().is_err());
    let scene = rectangle_scene();
    let algorithm = run(&config, scene.clone(), scene);
    let results = algorithm.results();
    assert_eq!(results.len(), 1);
    assert!(results[0].location.is_none());
    assert!(results[0].keypoints.is_none());
}
