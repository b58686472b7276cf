//! Effect routines, one scenario per ability.
//!
//! Casters are human agents so no controller interferes; every test charges
//! the caster by hand and drives the clock explicitly.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use spirit_arena::ArenaConfig;
use spirit_arena::game::{
    AbilityId, Activation, AgentId, BlockReason, Bounds, Element, MatchContext, NotificationLog,
    Simulation, Team, TeamBase, TimedEvent, Vec2, WorldState, check_invariants,
};

const CENTER: Vec2 = Vec2::new(500.0, 500.0);

fn two_teams() -> WorldState {
    let mut world = WorldState::new(Bounds::new(1000.0, 1000.0));
    for (id, element, x) in [(0, Element::Fire, 100.0), (1, Element::Ice, 900.0)] {
        world.add_team(
            Team::new(id, element),
            TeamBase {
                team: id,
                position: Vec2::new(x, 500.0),
                radius: 60.0,
                element,
            },
        );
    }
    world
}

fn quiet_config() -> ArenaConfig {
    let mut config = ArenaConfig::default();
    config.round.grace_ms = 0.0;
    config.agents.ability_chance = 0.0;
    config.abilities.friendly_fire = false;
    config
}

fn simulation(world: WorldState, config: ArenaConfig) -> Simulation<NotificationLog> {
    Simulation::from_world(MatchContext::new(config, 11), world, NotificationLog::new())
}

fn cast(sim: &mut Simulation<NotificationLog>, agent: AgentId, ability: AbilityId) {
    let max = sim.config().agents.charge_max;
    sim.world_mut().agent_mut(agent).unwrap().charge = max;
    assert_eq!(sim.activate_ability(agent, ability), Activation::Resolved);
}

fn carrying(world: &mut WorldState, agent: AgentId, at: &[Vec2]) -> Vec<u32> {
    at.iter()
        .map(|&p| {
            let s = world.spawn_spirit(p, Vec2::ZERO);
            assert!(world.attach_spirit(s, agent));
            s
        })
        .collect()
}

fn position(sim: &Simulation<NotificationLog>, agent: AgentId) -> Vec2 {
    sim.world().agent(agent).unwrap().position
}

#[test]
fn test_extra_ability_ignores_charge() {
    let mut world = two_teams();
    let a = world.spawn_agent(0, Element::Fire, CENTER, false);
    world.team_mut(0).unwrap().grant_extra(AbilityId::Bloom, 3);
    world.refresh_team_abilities(0, 3);
    world.agent_mut(a).unwrap().charge = 40.0;
    let mut sim = simulation(world, quiet_config());

    assert_eq!(sim.activate_ability(a, AbilityId::Bloom), Activation::Resolved);
    let agent = sim.world().agent(a).unwrap();
    assert_eq!(agent.charge, 40.0);
    assert!(agent.last_used.contains_key(&AbilityId::Bloom));
    assert_eq!(sim.world().spirits().count(), 3);

    assert_eq!(
        sim.activate_ability(a, AbilityId::Bloom),
        Activation::Blocked(BlockReason::CoolingDown)
    );
    assert_eq!(
        sim.activate_ability(a, AbilityId::Eruption),
        Activation::Blocked(BlockReason::ChargeNotFull)
    );
}

#[test]
fn test_innate_ability_spends_charge() {
    let mut world = two_teams();
    let a = world.spawn_agent(0, Element::Fire, CENTER, false);
    let mut sim = simulation(world, quiet_config());

    cast(&mut sim, a, AbilityId::Eruption);
    assert_eq!(sim.world().agent(a).unwrap().charge, 0.0);
}

#[test]
fn test_eruption_knocks_back_and_burns() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Fire, CENTER, false);
    let hostile = world.spawn_agent(1, Element::Ice, Vec2::new(560.0, 500.0), false);
    let ally = world.spawn_agent(0, Element::Air, Vec2::new(500.0, 440.0), false);
    carrying(&mut world, hostile, &[Vec2::new(560.0, 540.0)]);
    let mut sim = simulation(world, quiet_config());

    cast(&mut sim, caster, AbilityId::Eruption);

    let knockback = sim.world().agent(hostile).unwrap().status.knockback.unwrap();
    assert!(knockback.velocity.x > 0.0);
    assert!(knockback.velocity.y.abs() < 1e-3);
    assert!(sim.world().agent(ally).unwrap().status.knockback.is_none());
    assert_eq!(sim.world().spirits().count(), 0);
    assert_eq!(sim.world().ledger().destroyed, 1);
    assert_eq!(
        sim.world().timeline().count(|e| *e == TimedEvent::RespawnSpirit),
        1
    );

    sim.update(16.0, 16.0);
    assert!(position(&sim, hostile).x > 560.0);
    assert_eq!(position(&sim, ally), Vec2::new(500.0, 440.0));
    assert!(check_invariants(sim.world()).is_empty());
}

#[test]
fn test_friendly_fire_polarity_frost_and_eruption() {
    for friendly_fire in [false, true] {
        let mut world = two_teams();
        let caster = world.spawn_agent(1, Element::Ice, CENTER, false);
        let ally = world.spawn_agent(1, Element::Fire, Vec2::new(530.0, 500.0), false);
        let hostile = world.spawn_agent(0, Element::Fire, Vec2::new(470.0, 500.0), false);
        let mut config = quiet_config();
        config.abilities.friendly_fire = friendly_fire;
        let mut sim = simulation(world, config);

        cast(&mut sim, caster, AbilityId::Frost);
        sim.update(16.0, 16.0);

        let world = sim.world();
        assert!(world.agent(hostile).unwrap().is_frozen());
        assert_eq!(world.agent(ally).unwrap().is_frozen(), !friendly_fire);
        assert!(!world.agent(caster).unwrap().is_frozen());
    }

    for friendly_fire in [false, true] {
        let mut world = two_teams();
        let caster = world.spawn_agent(0, Element::Fire, CENTER, false);
        let ally = world.spawn_agent(0, Element::Ice, Vec2::new(540.0, 500.0), false);
        let mut config = quiet_config();
        config.abilities.friendly_fire = friendly_fire;
        let mut sim = simulation(world, config);

        cast(&mut sim, caster, AbilityId::Eruption);

        let knocked = sim.world().agent(ally).unwrap().status.knockback.is_some();
        assert_eq!(knocked, friendly_fire);
    }
}

#[test]
fn test_quicksand_slows_a_moving_human() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Earth, CENTER, false);
    let hostile = world.spawn_agent(1, Element::Ice, Vec2::new(520.0, 500.0), false);
    let config = quiet_config();
    let factor = config.abilities.quicksand.slow_factor;
    let speed = config.agents.speed;
    let mut sim = simulation(world, config);

    cast(&mut sim, caster, AbilityId::Quicksand);
    sim.steer(hostile, Vec2::new(1.0, 0.0));
    sim.update(16.0, 16.0);

    let agent = sim.world().agent(hostile).unwrap();
    assert_eq!(agent.status.slowed_by.map(|(_, f)| f), Some(factor));
    let expected = speed * factor * 0.016;
    assert!((agent.position.x - 520.0 - expected).abs() < 1e-3);

    sim.update(32.0, 16.0);
    let moved = position(&sim, hostile).x - 520.0;
    assert!((moved - 2.0 * expected).abs() < 1e-3);
}

#[test]
fn test_speed_buff_reverts_without_resteering() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Light, CENTER, false);
    let mut config = quiet_config();
    config.abilities.radiance.duration_ms = 100.0;
    let multiplier = config.abilities.radiance.speed_multiplier;
    let speed = config.agents.speed;
    let mut sim = simulation(world, config);

    sim.steer(caster, Vec2::new(1.0, 0.0));
    cast(&mut sim, caster, AbilityId::Radiance);

    sim.update(16.0, 16.0);
    let boosted = position(&sim, caster).x - 500.0;
    assert!((boosted - speed * multiplier * 0.016).abs() < 1e-3);

    let before = position(&sim, caster).x;
    sim.update(116.0, 100.0);
    assert!(!sim.world().agent(caster).unwrap().is_invincible());
    assert!((position(&sim, caster).x - before - speed * 0.1).abs() < 1e-3);
}

#[test]
fn test_tornado_scatters_spins_then_ejects() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Air, CENTER, false);
    let hostile = world.spawn_agent(1, Element::Ice, Vec2::new(600.0, 500.0), false);
    let spirits = carrying(
        &mut world,
        hostile,
        &[Vec2::new(600.0, 520.0), Vec2::new(600.0, 540.0)],
    );
    world.agent_mut(hostile).unwrap().status.poisoned_until = Some(100_000.0);
    let mut config = quiet_config();
    config.abilities.tornado.scatter = 20.0;
    let dwell = config.abilities.tornado.dwell_ms;
    let mut sim = simulation(world, config);

    cast(&mut sim, caster, AbilityId::Tornado);
    sim.update(100.0, 100.0);

    assert_eq!(sim.world().possession().carried_count(hostile), 0);
    for spirit in spirits {
        let s = sim.world().spirit(spirit).unwrap();
        assert!(!sim.world().possession().is_owned(spirit));
        assert!(s.position.distance(Vec2::new(600.0, 500.0)) <= 20.0 * 2f32.sqrt() + 1e-3);
    }

    let start = Vec2::new(600.0, 500.0);
    let mut time = 100.0;
    while time < dwell {
        time += 100.0;
        sim.update(time, 100.0);
        let at = position(&sim, hostile);
        assert!((at.distance(CENTER) - 100.0).abs() < 1e-2, "off orbit at {time}");
    }
    assert!(position(&sim, hostile).distance(start) > 1.0);

    sim.update(time + 100.0, 100.0);
    let agent = sim.world().agent(hostile).unwrap();
    assert!(agent.status.knockback.is_some());
    assert!(agent.position.distance(CENTER) > 120.0);
}

#[test]
fn test_riptide_sends_hostiles_to_caster_base() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Water, CENTER, false);
    let hostile = world.spawn_agent(1, Element::Ice, Vec2::new(550.0, 500.0), false);
    carrying(
        &mut world,
        hostile,
        &[Vec2::new(550.0, 520.0), Vec2::new(550.0, 540.0)],
    );
    let mut sim = simulation(world, quiet_config());

    cast(&mut sim, caster, AbilityId::Riptide);
    sim.update(16.0, 16.0);

    assert_eq!(position(&sim, hostile), Vec2::new(100.0, 500.0));
    assert_eq!(sim.world().possession().carried_count(hostile), 0);
    let team = sim.world().team(0).unwrap();
    assert_eq!(team.score, 2);
    assert_eq!(team.deposited, 2);
    assert_eq!(sim.world().team(1).unwrap().score, 0);
    assert_eq!(sim.world().spirits().count(), 0);
    assert!(check_invariants(sim.world()).is_empty());
}

#[test]
fn test_void_pulls_designated_target_only() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Void, CENTER, false);
    let hostile = world.spawn_agent(1, Element::Ice, Vec2::new(650.0, 500.0), false);
    let mut sim = simulation(world, quiet_config());

    cast(&mut sim, caster, AbilityId::Void);
    sim.world_mut().agent_mut(caster).unwrap().position = Vec2::new(600.0, 600.0);
    sim.update(100.0, 100.0);

    let pulled = position(&sim, hostile);
    assert!(pulled.x < 650.0);
    assert!(pulled.x > 630.0);
    assert_eq!(position(&sim, caster), Vec2::new(600.0, 600.0));
}

#[test]
fn test_void_without_target_pulls_caster_but_never_vanishes_it() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Void, CENTER, false);
    let mut sim = simulation(world, quiet_config());

    cast(&mut sim, caster, AbilityId::Void);
    sim.world_mut().agent_mut(caster).unwrap().position = Vec2::new(600.0, 500.0);
    sim.update(100.0, 100.0);

    let x = position(&sim, caster).x;
    assert!((580.0..600.0).contains(&x), "caster at {x}");

    sim.world_mut().agent_mut(caster).unwrap().position = Vec2::new(510.0, 500.0);
    sim.update(200.0, 100.0);
    assert!(!sim.world().agent(caster).unwrap().is_vanished());
    assert_eq!(sim.zones().len(), 1);
}

#[test]
fn test_void_core_vanishes_hostiles_and_drops_spirits() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Void, CENTER, false);
    let hostile = world.spawn_agent(1, Element::Ice, Vec2::new(520.0, 500.0), false);
    let spirits = carrying(&mut world, hostile, &[Vec2::new(520.0, 560.0)]);
    let config = quiet_config();
    let vanish_ms = config.abilities.void.vanish_ms;
    let mut sim = simulation(world, config);

    cast(&mut sim, caster, AbilityId::Void);
    sim.update(16.0, 16.0);

    let agent = sim.world().agent(hostile).unwrap();
    assert!(agent.is_vanished());
    assert_eq!(agent.status.vanished_until, Some(16.0 + vanish_ms));
    assert!(!sim.world().possession().is_owned(spirits[0]));
    assert!(!sim.world().agent(caster).unwrap().is_vanished());

    sim.update(16.0 + vanish_ms, vanish_ms);
    assert!(!sim.world().agent(hostile).unwrap().is_vanished());
}

#[test]
fn test_radiance_aura_lives_as_long_as_the_buff() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Light, CENTER, false);
    let spirit = world.spawn_spirit(Vec2::new(570.0, 500.0), Vec2::ZERO);
    let mut config = quiet_config();
    config.abilities.radiance.duration_ms = 100.0;
    let mut sim = simulation(world, config);

    cast(&mut sim, caster, AbilityId::Radiance);
    assert!(sim.world().agent(caster).unwrap().is_invincible());
    assert_eq!(sim.zones().len(), 1);

    sim.update(16.0, 16.0);
    assert!(sim.world().spirit(spirit).unwrap().position.x < 570.0);

    sim.update(116.0, 100.0);
    assert!(!sim.world().agent(caster).unwrap().is_invincible());
    sim.update(132.0, 16.0);
    assert!(sim.zones().is_empty());
}

#[test]
fn test_miasma_drops_spirits_blocks_pickup_and_resets() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Nature, CENTER, false);
    let hostile = world.spawn_agent(1, Element::Ice, Vec2::new(550.0, 500.0), false);
    let spirits = carrying(&mut world, hostile, &[Vec2::new(550.0, 515.0)]);
    let config = quiet_config();
    let duration = config.abilities.miasma.duration_ms;
    let mut sim = simulation(world, config);

    cast(&mut sim, caster, AbilityId::Miasma);
    assert_eq!(
        sim.world().agent(hostile).unwrap().status.poisoned_until,
        Some(duration)
    );
    assert_eq!(sim.world().possession().carried_count(hostile), 0);

    sim.update(16.0, 16.0);
    assert!(!sim.world().possession().is_owned(spirits[0]));

    sim.update(1_000.0, 984.0);
    cast(&mut sim, caster, AbilityId::Miasma);
    assert_eq!(
        sim.world().agent(hostile).unwrap().status.poisoned_until,
        Some(1_000.0 + duration)
    );
}

#[test]
fn test_barricade_obstacles_expire() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Metal, CENTER, false);
    let config = quiet_config();
    let cfg = config.abilities.barricade;
    let mut sim = simulation(world, config);

    cast(&mut sim, caster, AbilityId::Barricade);

    assert_eq!(sim.world().obstacles().count(), cfg.count);
    for obstacle in sim.world().obstacles() {
        assert!((obstacle.position.distance(CENTER) - cfg.distance).abs() < 1e-2);
    }
    let expiring = sim
        .world()
        .timeline()
        .count(|e| matches!(e, TimedEvent::ExpireObstacle { .. }));
    assert_eq!(expiring, cfg.count);

    sim.update(cfg.lifespan_ms, cfg.lifespan_ms);
    assert_eq!(sim.world().obstacles().count(), 0);
}

#[test]
fn test_bloom_spirits_expire_without_respawn() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Life, CENTER, false);
    let config = quiet_config();
    let cfg = config.abilities.bloom;
    let mut sim = simulation(world, config);

    cast(&mut sim, caster, AbilityId::Bloom);
    assert_eq!(sim.world().spirits().count(), cfg.count);
    assert!(
        sim.world()
            .spirits()
            .all(|s| s.expires_at == Some(cfg.lifespan_ms))
    );

    sim.update(cfg.lifespan_ms, cfg.lifespan_ms);
    assert_eq!(sim.world().spirits().count(), 0);
    let ledger = sim.world().ledger();
    assert_eq!(ledger.spawned, ledger.destroyed);
    assert_eq!(
        sim.world().timeline().count(|e| *e == TimedEvent::RespawnSpirit),
        0
    );
    assert!(check_invariants(sim.world()).is_empty());
}

#[test]
fn test_recall_sanctuary_then_teleport_at_multiplier() {
    let mut world = two_teams();
    let caster = world.spawn_agent(0, Element::Arcane, CENTER, false);
    carrying(
        &mut world,
        caster,
        &[Vec2::new(500.0, 520.0), Vec2::new(500.0, 540.0)],
    );
    let loose = world.spawn_spirit(Vec2::new(530.0, 500.0), Vec2::ZERO);
    let hostile = world.spawn_agent(1, Element::Ice, Vec2::new(540.0, 500.0), false);
    let ally = world.spawn_agent(0, Element::Fire, Vec2::new(480.0, 500.0), false);
    world.agent_mut(ally).unwrap().status.poisoned_until = Some(100_000.0);
    let config = quiet_config();
    let cfg = config.abilities.recall;
    let mut sim = simulation(world, config);

    cast(&mut sim, caster, AbilityId::Recall);
    sim.update(16.0, 16.0);

    assert!(sim.world().spirit(loose).is_none());
    assert_eq!(sim.world().team(0).unwrap().score, 1);
    assert!(position(&sim, hostile).x > 540.0);
    assert!(!sim.world().agent(ally).unwrap().is_poisoned());
    assert_eq!(sim.world().possession().carried_count(caster), 2);

    sim.update(cfg.delay_ms, cfg.delay_ms - 16.0);

    assert_eq!(position(&sim, caster), Vec2::new(100.0, 500.0));
    assert_eq!(sim.world().possession().carried_count(caster), 0);
    let team = sim.world().team(0).unwrap();
    assert_eq!(team.score, 1 + 2 * cfg.multiplier);
    assert_eq!(team.deposited, 3);
    assert!(check_invariants(sim.world()).is_empty());
}
