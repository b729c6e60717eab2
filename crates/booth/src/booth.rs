//! Drives the screen flow against a transformer and the gallery.

use photobooth_core::gallery::GalleryRecord;
use photobooth_core::theme::Theme;
use photobooth_core::transform::TransformRequest;
use photobooth_db::GalleryStore;

use crate::client::Transformer;
use crate::flow::{BoothFlow, FlowError, FlowState};

/// Transient message for the user after a gallery action. Gallery failures
/// end up here instead of interrupting the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved { id: String },
    SaveFailed,
    Deleted,
    DeleteFailed,
    Cleared { removed: u64 },
    ClearFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Saved { .. } => "Photo saved to gallery!",
            Self::SaveFailed => "Failed to save photo",
            Self::Deleted => "Photo deleted",
            Self::DeleteFailed => "Failed to delete",
            Self::Cleared { .. } => "Gallery cleared",
            Self::ClearFailed => "Failed to clear gallery",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::SaveFailed | Self::DeleteFailed | Self::ClearFailed)
    }
}

/// One booth session: the flow plus its collaborators.
pub struct Booth<T: Transformer> {
    flow: BoothFlow,
    transformer: T,
    gallery: GalleryStore,
}

impl<T: Transformer> Booth<T> {
    pub fn new(transformer: T, gallery: GalleryStore) -> Self {
        Self {
            flow: BoothFlow::new(),
            transformer,
            gallery,
        }
    }

    pub fn flow(&self) -> &BoothFlow {
        &self.flow
    }

    pub fn state(&self) -> &FlowState {
        self.flow.state()
    }

    pub fn gallery(&self) -> &GalleryStore {
        &self.gallery
    }

    // -- Navigation --

    pub fn start(&mut self) -> Result<(), FlowError> {
        self.flow.start()
    }

    pub fn open_gallery(&mut self) -> Result<(), FlowError> {
        self.flow.open_gallery()
    }

    pub fn select_theme(&mut self, theme: &'static Theme) -> Result<(), FlowError> {
        self.flow.select_theme(theme)
    }

    pub fn back_to_themes(&mut self) -> Result<(), FlowError> {
        self.flow.back_to_themes()
    }

    pub fn try_another(&mut self) -> Result<(), FlowError> {
        self.flow.try_another()
    }

    pub fn start_over(&mut self) {
        self.flow.start_over();
    }

    // -- Transformation --

    /// Submit a captured photo and wait for the outcome. Ends on the result
    /// or the error step.
    pub async fn capture(&mut self, photo: impl Into<String>) -> Result<&FlowState, FlowError> {
        let request = self.flow.capture(photo)?;
        self.run(request).await
    }

    /// Replay the failed request with the same photo and theme.
    pub async fn retry(&mut self) -> Result<&FlowState, FlowError> {
        let request = self.flow.retry()?;
        self.run(request).await
    }

    async fn run(&mut self, request: TransformRequest) -> Result<&FlowState, FlowError> {
        match self.transformer.transform(&request).await {
            Ok(result) => {
                tracing::info!(theme_id = %request.theme.id, "Transformation complete");
                self.flow.complete(result)?;
            }
            Err(e) => {
                tracing::warn!(theme_id = %request.theme.id, kind = %e.kind(), error = %e, "Transformation failed");
                self.flow.fail(e.user_message())?;
            }
        }
        Ok(self.flow.state())
    }

    // -- Gallery --

    /// Save the result on screen. Storage failures become a [`Notice`].
    pub async fn save_to_gallery(&self) -> Result<Notice, FlowError> {
        let candidate = self.flow.save_candidate()?;
        Ok(match self.gallery.save(candidate).await {
            Ok(record) => Notice::Saved { id: record.id },
            Err(e) => {
                tracing::error!(error = %e, "Failed to save photo");
                Notice::SaveFailed
            }
        })
    }

    /// Saved photos, newest first. Empty if the gallery cannot be read.
    pub async fn photos(&self) -> Vec<GalleryRecord> {
        self.gallery.list().await
    }

    pub async fn delete_photo(&self, id: &str) -> Notice {
        match self.gallery.delete_by_id(id).await {
            Ok(()) => Notice::Deleted,
            Err(e) => {
                tracing::error!(error = %e, id, "Failed to delete photo");
                Notice::DeleteFailed
            }
        }
    }

    pub async fn clear_gallery(&self) -> Notice {
        match self.gallery.clear_all().await {
            Ok(removed) => Notice::Cleared { removed },
            Err(e) => {
                tracing::error!(error = %e, "Failed to clear photos");
                Notice::ClearFailed
            }
        }
    }

    /// End the session and release the gallery connection.
    pub async fn close(self) {
        self.gallery.close().await;
    }
}
