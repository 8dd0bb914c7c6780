//! Progress display for installations

use indicatif::{ProgressBar, ProgressStyle};

use crate::installer::{InstallStage, ProgressReporter};

const STAGES: u64 = 4;

/// Stage progress bar shown by the `install` command
pub struct ProgressDisplay {
    stage_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display; hidden when `visible` is false
    pub fn new(visible: bool) -> Self {
        let stage_pb = if visible {
            ProgressBar::new(STAGES)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}") {
            stage_pb.set_style(style.progress_chars("#>-"));
        }
        Self { stage_pb }
    }

    /// Finish the bar after a successful installation
    pub fn finish(&self, message: impl Into<String>) {
        self.stage_pb.set_position(STAGES);
        self.stage_pb.finish_with_message(message.into());
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.stage_pb.abandon();
    }
}

impl ProgressReporter for ProgressDisplay {
    fn stage(&mut self, stage: InstallStage) {
        let position = match stage {
            InstallStage::Validate => 0,
            InstallStage::Materialize => 1,
            InstallStage::Link => 2,
            InstallStage::Bins => 3,
        };
        self.stage_pb.set_position(position);
        self.stage_pb.set_message(stage.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_display_tracks_stages() {
        let mut display = ProgressDisplay::new(false);
        display.stage(InstallStage::Link);
        assert_eq!(display.stage_pb.position(), 2);
        display.finish("done");
        assert_eq!(display.stage_pb.position(), STAGES);
    }
}
