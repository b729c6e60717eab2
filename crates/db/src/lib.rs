//! On-device gallery storage backed by an embedded SQLite database.

pub mod gallery;

pub use gallery::{Clock, GalleryError, GalleryStore};

/// File name of the gallery database inside its data directory.
pub fn gallery_file_name() -> String {
    format!("{}.db", photobooth_core::gallery::GALLERY_DB_NAME)
}
