#![allow(dead_code)]

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;
use std::path::Path;

use playlist_ocr::catalog::{
    CatalogAlbum, CatalogArtist, CatalogImage, CatalogResolver, CatalogTrack, ResolverSettings,
};
use playlist_ocr::imaging::{ImageNormalizer, NormalizeSettings};
use playlist_ocr::ocr::{OcrEngine, OcrExtractor};
use playlist_ocr::pipeline::{PlaylistImporter, StagingArea, Upload};
use playlist_ocr::text::SongPairExtractor;
use playlist_ocr::Fidelity;

/// Gray levels identifying fixture screenshots.
pub const LEVEL_1: u8 = 40;
pub const LEVEL_2: u8 = 120;
pub const LEVEL_3: u8 = 200;

/// A uniform gray PNG screenshot, narrower than the normalization width.
pub fn screenshot_png(filename: &str, level: u8) -> Upload {
    let image = GrayImage::from_pixel(300, 200, Luma([level]));
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    Upload::new(filename, bytes)
}

pub fn track(id: &str, name: &str, artists: &[&str]) -> CatalogTrack {
    CatalogTrack {
        id: id.to_string(),
        uri: format!("spotify:track:{}", id),
        name: name.to_string(),
        artists: artists
            .iter()
            .map(|name| CatalogArtist {
                name: name.to_string(),
            })
            .collect(),
        album: CatalogAlbum {
            images: vec![CatalogImage {
                url: format!("https://i.scdn.co/image/{}", id),
            }],
        },
        preview_url: None,
    }
}

/// An importer staging under `staging_root`, without median denoise so the
/// fixtures stay fast.
pub fn importer<E: OcrEngine + 'static>(
    engine: E,
    fidelity: Fidelity,
    staging_root: &Path,
) -> PlaylistImporter {
    let settings = NormalizeSettings {
        median_radius: None,
        ..Default::default()
    };

    PlaylistImporter::new(
        ImageNormalizer::new(settings),
        OcrExtractor::new(Box::new(engine), fidelity),
        SongPairExtractor::default(),
        CatalogResolver::new(ResolverSettings {
            fidelity,
            ..Default::default()
        }),
        StagingArea::new(staging_root, 1024 * 1024),
    )
}
