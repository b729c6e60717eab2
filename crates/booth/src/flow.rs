//! Booth screen flow as an explicit state machine.
//!
//! ```text
//! welcome -> theme -> capture -> processing -> result
//!    |                               |           |
//!    v                               v           v
//! gallery                          error ----> theme (try another / back)
//!                                    |
//!                                    +--> processing (retry)
//! ```
//!
//! Every step can go back to `welcome` with [`BoothFlow::start_over`]. Only
//! one transformation is ever in flight: a new capture is only accepted from
//! the `capture` step.

use std::fmt;

use photobooth_core::gallery::NewGalleryRecord;
use photobooth_core::theme::Theme;
use photobooth_core::transform::{TransformRequest, TransformResult};

/// Screen identifier, without the data each screen carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Welcome,
    Gallery,
    Theme,
    Capture,
    Processing,
    Result,
    Error,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Gallery => "gallery",
            Self::Theme => "theme",
            Self::Capture => "capture",
            Self::Processing => "processing",
            Self::Result => "result",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current screen together with the data it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Welcome,
    Gallery,
    Theme,
    Capture {
        theme: &'static Theme,
    },
    Processing {
        theme: &'static Theme,
        photo: String,
    },
    Result {
        theme: &'static Theme,
        photo: String,
        result: TransformResult,
    },
    Error {
        theme: &'static Theme,
        photo: String,
        message: String,
    },
}

impl FlowState {
    pub fn step(&self) -> Step {
        match self {
            Self::Welcome => Step::Welcome,
            Self::Gallery => Step::Gallery,
            Self::Theme => Step::Theme,
            Self::Capture { .. } => Step::Capture,
            Self::Processing { .. } => Step::Processing,
            Self::Result { .. } => Step::Result,
            Self::Error { .. } => Step::Error,
        }
    }

    /// Theme chosen for the current attempt, if any.
    pub fn theme(&self) -> Option<&'static Theme> {
        match self {
            Self::Capture { theme }
            | Self::Processing { theme, .. }
            | Self::Result { theme, .. }
            | Self::Error { theme, .. } => Some(*theme),
            Self::Welcome | Self::Gallery | Self::Theme => None,
        }
    }
}

/// Rejected flow action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("cannot {action} from the {step} step")]
    InvalidTransition { action: &'static str, step: Step },
}

/// The booth's screen flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoothFlow {
    state: FlowState,
}

impl Default for BoothFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl BoothFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Welcome,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            action,
            step: self.step(),
        }
    }

    fn set(&mut self, next: FlowState) {
        tracing::debug!(from = %self.step(), to = %next.step(), "Booth step");
        self.state = next;
    }

    // -- Navigation --

    /// Welcome -> theme selection.
    pub fn start(&mut self) -> Result<(), FlowError> {
        match self.state {
            FlowState::Welcome => {
                self.set(FlowState::Theme);
                Ok(())
            }
            _ => Err(self.invalid("start")),
        }
    }

    /// Welcome -> gallery.
    pub fn open_gallery(&mut self) -> Result<(), FlowError> {
        match self.state {
            FlowState::Welcome => {
                self.set(FlowState::Gallery);
                Ok(())
            }
            _ => Err(self.invalid("open the gallery")),
        }
    }

    /// Theme selection -> capture.
    pub fn select_theme(&mut self, theme: &'static Theme) -> Result<(), FlowError> {
        match self.state {
            FlowState::Theme => {
                self.set(FlowState::Capture { theme });
                Ok(())
            }
            _ => Err(self.invalid("select a theme")),
        }
    }

    /// Capture or error -> theme selection, discarding the photo.
    pub fn back_to_themes(&mut self) -> Result<(), FlowError> {
        match self.state {
            FlowState::Capture { .. } | FlowState::Error { .. } => {
                self.set(FlowState::Theme);
                Ok(())
            }
            _ => Err(self.invalid("go back to themes")),
        }
    }

    /// Result -> theme selection, discarding the photo and its result.
    pub fn try_another(&mut self) -> Result<(), FlowError> {
        match self.state {
            FlowState::Result { .. } => {
                self.set(FlowState::Theme);
                Ok(())
            }
            _ => Err(self.invalid("try another theme")),
        }
    }

    /// Any step -> welcome, clearing everything.
    pub fn start_over(&mut self) {
        self.set(FlowState::Welcome);
    }

    // -- Transformation --

    /// Capture -> processing. Returns the request to send to the relay.
    pub fn capture(&mut self, photo: impl Into<String>) -> Result<TransformRequest, FlowError> {
        let FlowState::Capture { theme } = self.state else {
            return Err(self.invalid("capture a photo"));
        };
        let photo = photo.into();
        let request = TransformRequest::new(photo.clone(), theme.to_ref());
        self.set(FlowState::Processing { theme, photo });
        Ok(request)
    }

    /// Error -> processing, replaying the same photo and theme.
    pub fn retry(&mut self) -> Result<TransformRequest, FlowError> {
        let FlowState::Error { theme, photo, .. } = &self.state else {
            return Err(self.invalid("retry"));
        };
        let (theme, photo) = (*theme, photo.clone());
        let request = TransformRequest::new(photo.clone(), theme.to_ref());
        self.set(FlowState::Processing { theme, photo });
        Ok(request)
    }

    /// Processing -> result.
    pub fn complete(&mut self, result: TransformResult) -> Result<(), FlowError> {
        let FlowState::Processing { theme, photo } = &mut self.state else {
            return Err(self.invalid("complete"));
        };
        let (theme, photo) = (*theme, std::mem::take(photo));
        self.set(FlowState::Result {
            theme,
            photo,
            result,
        });
        Ok(())
    }

    /// Processing -> error.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), FlowError> {
        let FlowState::Processing { theme, photo } = &mut self.state else {
            return Err(self.invalid("fail"));
        };
        let (theme, photo) = (*theme, std::mem::take(photo));
        self.set(FlowState::Error {
            theme,
            photo,
            message: message.into(),
        });
        Ok(())
    }

    /// The gallery record for the result on screen. Leaves the flow as is.
    pub fn save_candidate(&self) -> Result<NewGalleryRecord, FlowError> {
        match &self.state {
            FlowState::Result {
                theme,
                photo,
                result,
            } => Ok(NewGalleryRecord::for_theme(
                theme,
                photo.clone(),
                result.transformed_image.clone(),
            )),
            _ => Err(self.invalid("save to the gallery")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use photobooth_core::theme::find_theme;

    use super::*;

    fn wedding() -> &'static Theme {
        find_theme("wedding").unwrap()
    }

    fn result() -> TransformResult {
        TransformResult {
            transformed_image: "data:image/png;base64,T1VU".into(),
            message: "Done".into(),
        }
    }

    fn at_capture() -> BoothFlow {
        let mut flow = BoothFlow::new();
        flow.start().unwrap();
        flow.select_theme(wedding()).unwrap();
        flow
    }

    #[test]
    fn happy_path_reaches_result() {
        let mut flow = at_capture();
        assert_eq!(flow.step(), Step::Capture);

        let request = flow.capture("data:image/jpeg;base64,aW1n").unwrap();
        assert_eq!(request.image_base64, "data:image/jpeg;base64,aW1n");
        assert_eq!(request.theme.id, "wedding");
        assert_eq!(request.theme.prompt, wedding().prompt);
        assert_eq!(flow.step(), Step::Processing);

        flow.complete(result()).unwrap();
        assert_matches!(
            flow.state(),
            FlowState::Result { photo, result, .. }
                if photo == "data:image/jpeg;base64,aW1n" && result.message == "Done"
        );
    }

    #[test]
    fn retry_replays_the_same_request() {
        let mut flow = at_capture();
        let first = flow.capture("img1").unwrap();
        flow.fail("All AI providers failed. Please try again.").unwrap();
        assert_matches!(flow.state(), FlowState::Error { message, .. } if message.contains("failed"));

        let replay = flow.retry().unwrap();
        assert_eq!(replay, first);
        assert_eq!(flow.step(), Step::Processing);
    }

    #[test]
    fn only_one_transformation_in_flight() {
        let mut flow = at_capture();
        flow.capture("img1").unwrap();

        assert_eq!(
            flow.capture("img2"),
            Err(FlowError::InvalidTransition {
                action: "capture a photo",
                step: Step::Processing
            })
        );
        assert_matches!(flow.retry(), Err(FlowError::InvalidTransition { .. }));
    }

    #[test]
    fn back_and_try_another_return_to_theme_selection() {
        let mut flow = at_capture();
        flow.back_to_themes().unwrap();
        assert_eq!(flow.state(), &FlowState::Theme);

        flow.select_theme(wedding()).unwrap();
        flow.capture("img1").unwrap();
        flow.complete(result()).unwrap();
        assert_matches!(flow.back_to_themes(), Err(FlowError::InvalidTransition { .. }));
        flow.try_another().unwrap();
        assert_eq!(flow.state(), &FlowState::Theme);
        assert_eq!(flow.state().theme(), None);
    }

    #[test]
    fn gallery_only_from_welcome() {
        let mut flow = BoothFlow::new();
        flow.open_gallery().unwrap();
        assert_eq!(flow.step(), Step::Gallery);
        assert_matches!(flow.start(), Err(FlowError::InvalidTransition { .. }));

        flow.start_over();
        assert_eq!(flow.step(), Step::Welcome);
    }

    #[test]
    fn completion_outside_processing_is_rejected() {
        let mut flow = BoothFlow::new();
        assert_matches!(flow.complete(result()), Err(FlowError::InvalidTransition { .. }));
        assert_matches!(flow.fail("x"), Err(FlowError::InvalidTransition { .. }));
        assert_matches!(flow.select_theme(wedding()), Err(FlowError::InvalidTransition { .. }));
    }

    #[test]
    fn save_candidate_only_on_result() {
        let mut flow = at_capture();
        assert_matches!(flow.save_candidate(), Err(FlowError::InvalidTransition { .. }));

        flow.capture("img1").unwrap();
        flow.complete(result()).unwrap();

        let candidate = flow.save_candidate().unwrap();
        assert_eq!(candidate.original_image_data, "img1");
        assert_eq!(candidate.transformed_image_data, "data:image/png;base64,T1VU");
        assert_eq!(candidate.theme_id, "wedding");
        assert_eq!(candidate.theme_icon, wedding().icon);
        assert_eq!(flow.step(), Step::Result);
    }

    #[test]
    fn error_message_names_action_and_step() {
        let err = BoothFlow::new().retry().unwrap_err();
        assert_eq!(err.to_string(), "cannot retry from the welcome step");
    }
}
