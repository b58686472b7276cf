//! Due timeline events and timed status expiry.

use tracing::debug;

use crate::game::ability;
use crate::game::frame::Frame;
use crate::game::{AgentId, SpiritId, TimedEvent};

/// Run every due event, then drop timed statuses and temporary spirits whose
/// timestamp has passed.
pub(crate) fn run(frame: &mut Frame<'_>) {
    let due = frame.world.timeline_mut().drain_due(frame.now);
    for event in due {
        match event {
            TimedEvent::RespawnSpirit => {
                let drift = frame.config.spirits.drift_speed;
                let id = frame.world.spawn_random_spirit(frame.rng, drift);
                debug!(spirit = id, "spirit respawned");
            }
            TimedEvent::RevertTeam { agent } => ability::revert_team(frame, agent),
            TimedEvent::ExpireClone { agent } => ability::expire_clone(frame, agent),
            TimedEvent::CompleteRecall { agent } => ability::complete_recall(frame, agent),
            TimedEvent::ExpireObstacle { obstacle } => {
                frame.world.remove_obstacle(obstacle);
            }
        }
    }

    expire_temporary_spirits(frame);
    expire_statuses(frame);
}

fn expire_temporary_spirits(frame: &mut Frame<'_>) {
    let now = frame.now;
    let expired: Vec<SpiritId> = frame
        .world
        .spirits()
        .filter(|s| s.expires_at.is_some_and(|t| t <= now) && !s.is_in_flight())
        .map(|s| s.id)
        .collect();
    for id in expired {
        frame.world.destroy_spirit(id, now);
    }
}

fn expire_statuses(frame: &mut Frame<'_>) {
    let now = frame.now;
    let ids: Vec<AgentId> = frame.world.agent_ids();
    for id in ids {
        let Some(agent) = frame.world.agent_mut(id) else {
            continue;
        };
        let status = &mut agent.status;
        if status.poisoned_until.is_some_and(|t| t <= now) {
            status.poisoned_until = None;
        }
        if status.buff.is_some_and(|b| b.until <= now) {
            status.buff = None;
            debug!(agent = id, "buff expired");
        }
        if status.vanished_until.is_some_and(|t| t <= now) {
            status.vanished_until = None;
            debug!(agent = id, "reappeared");
        }
        if status.knockback.is_some_and(|k| k.until <= now) {
            status.knockback = None;
        }
    }
}
