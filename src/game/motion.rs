//! Agent motion integration.

use crate::game::frame::Frame;
use crate::game::{AgentId, Obstacle, Vec2, millis_to_secs};

/// Move every agent by its velocity (or knockback), push it out of
/// obstacles, clamp it to the world and accrue human charge.
///
/// Stored velocities are at base speed; slows, poison and buffs scale them
/// here each tick so modifiers apply and revert without re-steering.
pub(crate) fn integrate(frame: &mut Frame<'_>) {
    let dt = millis_to_secs(frame.delta);
    let now = frame.now;
    let bounds = frame.world.bounds();
    let obstacles: Vec<Obstacle> = frame.world.obstacles().copied().collect();
    let charge_rate = frame.config.agents.charge_rate;
    let charge_max = frame.config.agents.charge_max;
    let poison_slow = frame.config.agents.poison_slow;

    let ids: Vec<AgentId> = frame.world.agent_ids();
    for id in ids {
        let Some(agent) = frame.world.agent_mut(id) else {
            continue;
        };
        if agent.is_vanished() {
            agent.velocity = Vec2::ZERO;
            continue;
        }

        if agent.is_frozen() {
            agent.velocity = Vec2::ZERO;
        } else if let Some(knockback) = agent.status.knockback.filter(|k| now < k.until) {
            agent.position += knockback.velocity * dt;
        } else {
            agent.position += agent.velocity * (agent.speed_multiplier(poison_slow) * dt);
        }

        for obstacle in &obstacles {
            if let Some(pushed) = obstacle.push_out(agent.position) {
                agent.position = pushed;
            }
        }
        agent.position = bounds.clamp(agent.position);

        if !agent.is_autonomous {
            agent.charge = (agent.charge + charge_rate * dt).min(charge_max);
        }
    }
}
