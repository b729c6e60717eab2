//! Gallery record types.
//!
//! Records are immutable once created. The store assigns `id` and
//! `created_at`; callers only ever supply a [`NewGalleryRecord`].

use serde::{Deserialize, Serialize};

use crate::image::{self, DEFAULT_OUTPUT_MIME};
use crate::theme::Theme;

/// Name of the on-device gallery database.
pub const GALLERY_DB_NAME: &str = "party-favor-gallery";

/// A saved transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryRecord {
    /// UUID assigned on save.
    pub id: String,
    pub original_image_data: String,
    pub transformed_image_data: String,
    pub theme_id: String,
    pub theme_name: String,
    pub theme_icon: String,
    /// Milliseconds since the Unix epoch at save time.
    pub created_at: i64,
}

/// Gallery record content before the store assigns identity and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGalleryRecord {
    pub original_image_data: String,
    pub transformed_image_data: String,
    pub theme_id: String,
    pub theme_name: String,
    pub theme_icon: String,
}

impl NewGalleryRecord {
    /// Build a record for a transformation produced with `theme`.
    pub fn for_theme(
        theme: &Theme,
        original_image_data: impl Into<String>,
        transformed_image_data: impl Into<String>,
    ) -> Self {
        Self {
            original_image_data: original_image_data.into(),
            transformed_image_data: transformed_image_data.into(),
            theme_id: theme.id.to_string(),
            theme_name: theme.name.to_string(),
            theme_icon: theme.icon.to_string(),
        }
    }

    /// Attach the store-assigned identity and timestamp.
    pub fn into_record(self, id: String, created_at: i64) -> GalleryRecord {
        GalleryRecord {
            id,
            original_image_data: self.original_image_data,
            transformed_image_data: self.transformed_image_data,
            theme_id: self.theme_id,
            theme_name: self.theme_name,
            theme_icon: self.theme_icon,
            created_at,
        }
    }
}

impl GalleryRecord {
    /// Whether this record holds the same content as `new`.
    pub fn matches(&self, new: &NewGalleryRecord) -> bool {
        self.original_image_data == new.original_image_data
            && self.transformed_image_data == new.transformed_image_data
            && self.theme_id == new.theme_id
            && self.theme_name == new.theme_name
            && self.theme_icon == new.theme_icon
    }

    /// Download name for the transformed image, e.g.
    /// `party-favor-wedding-1767225600000.png`.
    pub fn export_file_name(&self) -> String {
        let mime = image::split_data_uri(&self.transformed_image_data, DEFAULT_OUTPUT_MIME).mime_type;
        format!(
            "party-favor-{}-{}.{}",
            self.theme_id,
            self.created_at,
            image::extension_for_mime(mime)
        )
    }
}
