//! Prompt text for a shot.

use crate::catalog::ShotSpec;

/// Appended to every prompt so the frames look like they belong together.
pub const STYLE_SUFFIX: &str = "Style: grounded sci-fi desert epic, dramatic film lighting, realistic detail, single clear composition, no text, no logos, no watermark.";

/// Builds the image prompt for a shot.
pub fn build_prompt(shot: &ShotSpec) -> String {
    format!(
        "Create a cinematic storyboard keyframe for Scene {}: '{}', Shot {}: '{}'. {} {STYLE_SUFFIX}",
        shot.scene_number,
        shot.scene_title,
        shot.shot_number,
        shot.shot_title,
        shot.start_frame_prompt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::all_shots;

    #[test]
    fn prompt_for_first_shot() {
        let shot = all_shots()[0];
        assert_eq!(
            build_prompt(&shot),
            "Create a cinematic storyboard keyframe for Scene 1: 'Arrakis Arrival', Shot 1: \
             'Cinematic Dunes Wide'. Endless sand dunes at golden hour, cinematic scale, \
             atmospheric haze, 2.39:1. Style: grounded sci-fi desert epic, dramatic film \
             lighting, realistic detail, single clear composition, no text, no logos, no watermark."
        );
    }

    #[test]
    fn prompts_are_distinct() {
        let shots = all_shots();
        let prompts: std::collections::HashSet<String> = shots.iter().map(build_prompt).collect();
        assert_eq!(prompts.len(), shots.len());
        assert!(prompts.iter().all(|prompt| prompt.ends_with(STYLE_SUFFIX)));
    }
}
