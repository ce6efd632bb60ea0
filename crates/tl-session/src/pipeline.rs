//! The per-turn pipeline: scene text first, then its illustration.

use tl_backend::{BackendResult, NarrativeBackend};
use tl_core::PlayableScene;

use crate::state::LoadingStage;

/// Everything one run of the turn pipeline needs.
///
/// Handed out by [`GameSession::start`](crate::GameSession::start) and
/// [`GameSession::choose`](crate::GameSession::choose); the `epoch` ties the
/// outcome back to the turn that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTicket {
    /// Identifies the turn within its session.
    pub epoch: u64,
    /// The opening prompt or chosen action.
    pub action: String,
    /// Rendered transcript of earlier turns.
    pub history: String,
}

/// Run one turn against the backend.
///
/// The two calls are sequential because the image prompt comes from the
/// scene. Nothing is retried, and a scene is only returned when both calls
/// succeed. `on_stage` is told when each call begins.
pub async fn run_turn<B>(
    backend: &B,
    ticket: &TurnTicket,
    mut on_stage: impl FnMut(LoadingStage),
) -> BackendResult<PlayableScene>
where
    B: NarrativeBackend + ?Sized,
{
    on_stage(LoadingStage::Narrating);
    let scene = backend
        .generate_scene(&ticket.action, &ticket.history)
        .await?;

    on_stage(LoadingStage::Illustrating);
    let image = backend.generate_image(&scene.image_prompt).await?;

    Ok(PlayableScene::new(scene, image))
}
