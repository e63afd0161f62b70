extern crate image as image_rs;

use std::fs;
use std::path::{Path,PathBuf};
use image_rs::{GrayImage,RgbImage};
use log::{debug,warn};

use crate::{BenchError,Result};

pub const IN_MEMORY_PATH: &str = "<in memory image>";

/// A loaded image together with the file it was read from
#[derive(Debug,Clone)]
pub struct InputImage {
    pub color_image: RgbImage,
    pub file_path: String
}

impl InputImage {
    pub fn new(color_image: RgbImage, path: Option<&Path>) -> InputImage {
        let file_path = match path {
            Some(p) => p.to_string_lossy().into_owned(),
            None => IN_MEMORY_PATH.to_string()
        };
        InputImage { color_image, file_path }
    }

    pub fn gray(&self) -> GrayImage {
        image_rs::imageops::grayscale(&self.color_image)
    }

    /// (width, height) in pixels
    pub fn size(&self) -> (usize,usize) {
        (self.color_image.width() as usize, self.color_image.height() as usize)
    }

    pub fn file_name(&self) -> Option<String> {
        Path::new(&self.file_path).file_name().map(|n| n.to_string_lossy().into_owned())
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    match path.is_absolute() {
        true => Ok(path.to_path_buf()),
        false => Ok(std::env::current_dir()?.join(path))
    }
}

fn load(path: &Path) -> Result<InputImage> {
    let color_image = image_rs::open(path)?.to_rgb8();
    Ok(InputImage::new(color_image, Some(path)))
}

/// Loads every decodable image in a directory, ordered by file name.
pub fn from_directory(path: &Path) -> Result<Vec<InputImage>> {
    let directory = absolute(path)?;
    if !directory.is_dir() {
        return Err(BenchError::InvalidPath(format!("{} is not a directory", directory.display())));
    }

    let mut file_paths = fs::read_dir(&directory)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()?;
    file_paths.retain(|p| p.is_file());
    file_paths.sort();

    let mut result = Vec::<InputImage>::with_capacity(file_paths.len());
    for file_path in file_paths {
        match load(&file_path) {
            Ok(image) => result.push(image),
            Err(e) => warn!("Skipping {}: {}", file_path.display(), e)
        }
    }
    debug!("Loaded {} images from {}", result.len(), directory.display());
    Ok(result)
}

/// Loads the given files. Paths which are not files are skipped.
pub fn from_files<P: AsRef<Path>>(files: &[P]) -> Result<Vec<InputImage>> {
    let mut result = Vec::<InputImage>::with_capacity(files.len());
    for file in files {
        let file_path = absolute(file.as_ref())?;
        if !file_path.is_file() {
            continue;
        }
        result.push(load(&file_path)?);
    }
    Ok(result)
}

pub fn from_images(images: Vec<RgbImage>) -> Vec<InputImage> {
    images.into_iter().map(|image| InputImage::new(image, None)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::Rgb;

    #[test]
    fn in_memory_images_have_placeholder_path() {
        let images = from_images(vec![RgbImage::from_pixel(4, 3, Rgb([10,20,30]))]);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].file_path, IN_MEMORY_PATH);
        assert_eq!(images[0].size(), (4,3));
        assert_eq!(images[0].file_name().as_deref(), Some(IN_MEMORY_PATH));
    }

    #[test]
    fn directory_loading_skips_non_images_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(5, 5, Rgb([1,2,3])).save(dir.path().join("b.png")).unwrap();
        RgbImage::from_pixel(6, 6, Rgb([1,2,3])).save(dir.path().join("a.png")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let images = from_directory(dir.path()).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].file_name().as_deref(), Some("a.png"));
        assert_eq!(images[1].size(), (5,5));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(from_directory(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("part.png");
        RgbImage::from_pixel(3, 3, Rgb([0,0,0])).save(&existing).unwrap();
        let images = from_files(&[existing, dir.path().join("nope.png")]).unwrap();
        assert_eq!(images.len(), 1);
    }
}
