//! Clip playback for character animation.
//!
//! Abilities ask for clips by name through [`ClipPlayer`]. The
//! controller advances frames on the fixed tick and reports one-shot clips
//! that run out with a [`ClipFinished`] message.

use std::collections::HashMap;

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::content::ClipDef;

/// Name-based clip playback used by abilities.
pub trait ClipPlayer {
    /// Start `clip`. Asking again for a clip that is still playing keeps it going.
    fn play_clip(&mut self, clip: &str);
    fn has_clip(&self, clip: &str) -> bool;
    /// Length of one play-through in seconds.
    fn clip_duration(&self, clip: &str) -> Option<f32>;
}

/// Clips available to a character, by name.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: HashMap<String, ClipDef>,
}

impl ClipLibrary {
    pub fn from_defs(defs: &[ClipDef]) -> Self {
        let clips = defs
            .iter()
            .filter(|def| def.frames > 0)
            .map(|def| (def.name.clone(), def.clone()))
            .collect();
        Self { clips }
    }

    pub fn get(&self, name: &str) -> Option<&ClipDef> {
        self.clips.get(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Component for clip playback on a character.
#[derive(Component, Debug, Default)]
pub struct AnimationController {
    library: ClipLibrary,
    /// Clip being played.
    current: Option<String>,
    /// Current frame index (0-based).
    pub current_frame: u32,
    /// Time accumulator for frame timing.
    pub frame_timer: f32,
    /// Whether a one-shot clip has run out.
    pub finished: bool,
}

impl AnimationController {
    pub fn new(library: ClipLibrary) -> Self {
        Self {
            library,
            ..default()
        }
    }

    pub fn set_library(&mut self, library: ClipLibrary) {
        self.library = library;
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Advance by `dt`. Returns the clip name if a one-shot clip ended.
    pub fn advance(&mut self, dt: f32) -> Option<String> {
        if self.finished {
            return None;
        }
        let (frames, frame_duration, looping) = {
            let def = self.current.as_deref().and_then(|name| self.library.get(name))?;
            (def.frames, def.frame_duration, def.looping)
        };
        if frame_duration <= 0.0 {
            if looping {
                return None;
            }
            self.finished = true;
            return self.current.clone();
        }

        self.frame_timer += dt;
        while self.frame_timer >= frame_duration {
            self.frame_timer -= frame_duration;
            self.current_frame += 1;

            if self.current_frame >= frames {
                if looping {
                    self.current_frame = 0;
                } else {
                    self.current_frame = frames - 1;
                    self.finished = true;
                    return self.current.clone();
                }
            }
        }
        None
    }
}

impl ClipPlayer for AnimationController {
    fn play_clip(&mut self, clip: &str) {
        if self.current.as_deref() == Some(clip) && !self.finished {
            return;
        }
        if self.library.get(clip).is_none() {
            warn!("Clip '{}' is not in the library", clip);
            return;
        }
        self.current = Some(clip.to_string());
        self.current_frame = 0;
        self.frame_timer = 0.0;
        self.finished = false;
    }

    fn has_clip(&self, clip: &str) -> bool {
        self.library.get(clip).is_some()
    }

    fn clip_duration(&self, clip: &str) -> Option<f32> {
        self.library.get(clip).map(ClipDef::duration)
    }
}

/// Message fired when a non-looping clip completes.
#[derive(Debug)]
pub struct ClipFinished {
    pub entity: Entity,
    pub clip: String,
}

impl Message for ClipFinished {}

/// System that advances clip frames on the fixed tick.
pub fn advance_clips(
    time: Res<Time>,
    mut query: Query<(Entity, &mut AnimationController)>,
    mut finished_events: MessageWriter<ClipFinished>,
) {
    let dt = time.delta_secs();
    for (entity, mut controller) in &mut query {
        if let Some(clip) = controller.advance(dt) {
            finished_events.write(ClipFinished { entity, clip });
        }
    }
}
