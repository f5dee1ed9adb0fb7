//! The fixed list of storyboard shots we know how to generate.

use std::path::PathBuf;

use crate::constants::SHOT_IMAGE_DIR;

/// Scene titles, in story order.
pub const SCENES: [&str; 5] = [
    "Arrakis Arrival",
    "Gom Jabbar Test",
    "House Atreides Betrayed",
    "Escape into the Desert",
    "First Ride with the Fremen",
];

/// A shot that gets repeated in every scene.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShotTemplate {
    /// Shot title
    pub title: &'static str,
    /// What the first frame should look like
    pub start_frame_prompt: &'static str,
}

/// Shot templates, in order within a scene.
pub const SHOT_TEMPLATES: [ShotTemplate; 5] = [
    ShotTemplate {
        title: "Cinematic Dunes Wide",
        start_frame_prompt: "Endless sand dunes at golden hour, cinematic scale, atmospheric haze, 2.39:1.",
    },
    ShotTemplate {
        title: "Paul Close-up",
        start_frame_prompt: "Intense cinematic close-up of a young man in desert light, expressive eyes.",
    },
    ShotTemplate {
        title: "Ornithopter Flight",
        start_frame_prompt: "Futuristic desert aircraft crossing sunlit dunes, cinematic action framing.",
    },
    ShotTemplate {
        title: "Sandworm Emergence",
        start_frame_prompt: "Massive sandworm breaching from the desert, epic cinematic scale and dust.",
    },
    ShotTemplate {
        title: "Battle Momentum",
        start_frame_prompt: "Desert battle sequence with kinetic camera and high-contrast cinematic grading.",
    },
];

/// One start frame to generate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShotSpec {
    /// 1-based scene number
    pub scene_number: u32,
    /// 1-based shot number within the scene
    pub shot_number: u32,
    /// Scene title
    pub scene_title: &'static str,
    /// Shot title
    pub shot_title: &'static str,
    /// Prompt fragment describing the first frame
    pub start_frame_prompt: &'static str,
}

impl ShotSpec {
    /// `(scene, shot)` pair identifying this shot.
    pub fn key(&self) -> (u32, u32) {
        (self.scene_number, self.shot_number)
    }

    /// File name, eg `scene-01-shot-03-start.png`
    pub fn output_filename(&self) -> String {
        format!(
            "scene-{:02}-shot-{:02}-start.png",
            self.scene_number, self.shot_number
        )
    }

    /// Path relative to the project root.
    pub fn output_relpath(&self) -> PathBuf {
        SHOT_IMAGE_DIR.join(self.output_filename())
    }

    /// Short label used in the plan, eg `S01.SH03`
    pub fn label(&self) -> String {
        format!("S{:02}.SH{:02}", self.scene_number, self.shot_number)
    }
}

/// Cartesian product of scenes and templates, template order kept within each scene.
pub fn build_catalog(scenes: &[&'static str], templates: &[ShotTemplate]) -> Vec<ShotSpec> {
    scenes
        .iter()
        .zip(1u32..)
        .flat_map(move |(&scene_title, scene_number)| {
            templates
                .iter()
                .zip(1u32..)
                .map(move |(template, shot_number)| ShotSpec {
                    scene_number,
                    shot_number,
                    scene_title,
                    shot_title: template.title,
                    start_frame_prompt: template.start_frame_prompt,
                })
        })
        .collect()
}

/// The shipped catalog.
pub fn all_shots() -> Vec<ShotSpec> {
    build_catalog(&SCENES, &SHOT_TEMPLATES)
}
