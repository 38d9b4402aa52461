use crate::model::StatField;
use crate::signal::AnimationHandle;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("audio playback failed: {0}")]
    Audio(String),
}

/// Everything the lifecycle needs from the presentation layer.
///
/// Implementations own drawing, animation playback and sound. A started
/// reaction animation reports its completion through the
/// [`SignalSender`](crate::signal::SignalSender) it was built with, never by
/// calling back into the controller.
pub trait PetView {
    fn render_stats(&mut self, hunger: u8, happiness: u8);

    fn render_name(&mut self, _name: &str) {}

    /// `None` when no reaction clip is available.
    fn play_reaction_animation(&mut self) -> Option<AnimationHandle>;

    fn stop_reaction_animation(&mut self);

    fn play_idle_animation(&mut self);

    fn set_dead_appearance(&mut self, dead: bool);

    fn disable_interaction(&mut self, disabled: bool);

    fn set_restart_visible(&mut self, _visible: bool) {}

    fn play_feedback_sound(&mut self, volume: f32) -> Result<(), ViewError>;

    fn show_feedback(&mut self, _field: StatField) {}
}
