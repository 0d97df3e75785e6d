//! Per-frame simulation tick
//!
//! Advances the phase machine by the measured frame time. All motion is
//! scaled by `dt` (milliseconds), so the game runs the same at any refresh
//! rate.

use super::gem::{Gem, update_gems};
use super::generate::generate_platform;
use super::hit::check_hit;
use super::housekeeping;
use super::score;
use super::state::{GameEvent, GamePhase, GameState, Landing, Platform, Stick};
use super::SimError;
use crate::consts::*;

/// Input edges for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch/space went down
    pub press: bool,
    /// Pointer/touch/space went up
    pub release: bool,
}

/// Advance the game state by one frame of `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), SimError> {
    // Fallen out of view: idle until the host resets
    if state.over {
        return Ok(());
    }

    if input.press {
        state.press();
    }
    if input.release {
        state.release();
    }

    // Cosmetic upkeep, independent of phase
    state.bonus_gem_rotation = (state.bonus_gem_rotation + dt * BONUS_GEM_SPIN) % 360.0;
    housekeeping::tend_decorations(
        &mut state.decorations,
        state.scene_offset,
        state.viewport,
        state.settings.theme,
        &mut state.rng,
    );
    update_gems(&mut state.gems, dt);
    if state.settings.blink {
        state.blink.update(dt, &mut state.rng);
    }

    match state.phase {
        GamePhase::Waiting => Ok(()),
        GamePhase::Coding => {
            state.current_stick.length += dt / CODING_SPEED;
            Ok(())
        }
        GamePhase::Deploying => deploy(state, dt),
        GamePhase::Running => run(state, dt),
        GamePhase::Migrating => migrate(state, dt),
        GamePhase::Crashing => {
            crash(state, dt);
            Ok(())
        }
    }
}

/// Rotate the stick down; once flat, check the hit and score it
fn deploy(state: &mut GameState, dt: f32) -> Result<(), SimError> {
    let stick = &mut state.current_stick;
    stick.rotation += dt / DEPLOYING_SPEED;
    if stick.rotation < STICK_FLAT_DEGREES {
        return Ok(());
    }
    stick.rotation = STICK_FLAT_DEGREES;

    let hit = check_hit(&state.current_stick, &state.platforms, state.perfect_area())?;
    if let Some(platform) = hit.platform {
        land(state, platform, hit.perfect);
    } else {
        log::debug!("Stick tip at {} hit nothing", state.current_stick.tip());
    }

    state.set_phase(GamePhase::Running);
    Ok(())
}

/// Score a hit and extend the world by one platform
///
/// Decorations are left to `tend_decorations`: the background scrolls slower
/// than the scene and is filled against its own frontier.
fn land(state: &mut GameState, platform: Platform, perfect: bool) {
    let outcome = score::award(perfect, state.streak, state.score, state.record);
    state.score = outcome.score;
    state.record = outcome.record;
    state.streak = outcome.streak;
    state.landing = Some(Landing {
        platform_id: platform.id,
        perfect,
    });

    log::info!(
        "Hit platform {} ({}), +{} -> {}",
        platform.id,
        if perfect { "perfect" } else { "plain" },
        outcome.points,
        outcome.score
    );

    if perfect && state.settings.gem_feedback {
        let gem = Gem::collected(
            platform.center(),
            PERFECT_AREA_SIZE,
            state.bonus_gem_rotation,
            state.settings.debug_mode,
        );
        state.spawn_gem(gem);
    }

    state.push_event(GameEvent::Scored {
        points: outcome.points,
        perfect,
        streak: outcome.streak,
    });
    if let Some(message) = outcome.message {
        state.push_event(GameEvent::Banner(message));
    }
    if outcome.record_broken {
        log::info!("New record: {}", outcome.record);
        state.push_event(GameEvent::RecordBroken {
            record: outcome.record,
        });
    }

    let next = generate_platform(
        &state.platforms,
        state.platforms_generated,
        state.settings.debug_mode,
        &mut state.rng,
    );
    state.platforms.push(next);
    state.platforms_generated += 1;
}

/// Walk along the stick until the far platform or the end of the stick
fn run(state: &mut GameState, dt: f32) -> Result<(), SimError> {
    state.hero.x += dt / RUNNING_SPEED;

    let hit = check_hit(&state.current_stick, &state.platforms, state.perfect_area())?;
    match hit.platform {
        Some(platform) => {
            let max_x = platform.right() - HERO_DISTANCE_FROM_EDGE;
            if state.hero.x > max_x {
                state.hero.x = max_x;
                state.set_phase(GamePhase::Migrating);
            }
        }
        None => {
            let max_x = state.current_stick.tip() + HERO_WIDTH;
            if state.hero.x > max_x {
                state.hero.x = max_x;
                log::info!("Crashed at x={} with score {}", max_x, state.score);
                state.push_event(GameEvent::Crashed);
                state.set_phase(GamePhase::Crashing);
            }
        }
    }
    Ok(())
}

/// Scroll the scene until the landed platform sits where the hero waits
fn migrate(state: &mut GameState, dt: f32) -> Result<(), SimError> {
    state.scene_offset += dt / MIGRATING_SPEED;

    let landing = state.landing.ok_or(SimError::NoLanding)?;
    let platform = state
        .find_platform(landing.platform_id)
        .ok_or(SimError::MissingLandingPlatform {
            id: landing.platform_id,
        })?;

    if state.scene_offset <= platform.right() - PADDING_X {
        return Ok(());
    }

    if !landing.perfect && state.settings.gem_feedback {
        let gem = Gem::missed(platform.center(), PERFECT_AREA_SIZE, state.settings.debug_mode);
        state.spawn_gem(gem);
    }

    let finished = std::mem::replace(&mut state.current_stick, Stick::new(platform.right()));
    state.sticks.push(finished);

    housekeeping::prune_after_landing(
        &mut state.platforms,
        &mut state.sticks,
        state.scene_offset,
        Some(platform.id),
    );

    state.landing = None;
    state.push_event(GameEvent::Landed {
        platform_id: platform.id,
        perfect: landing.perfect,
    });
    state.set_phase(GamePhase::Waiting);
    Ok(())
}

/// Drop the hero and swing the stick down until out of view
fn crash(state: &mut GameState, dt: f32) {
    let stick = &mut state.current_stick;
    if stick.rotation < STICK_HANGING_DEGREES {
        stick.rotation = (stick.rotation + dt / DEPLOYING_SPEED).min(STICK_HANGING_DEGREES);
    }

    state.hero.y += dt / CRASHING_SPEED;
    if state.hero.y > state.fall_threshold() {
        state.over = true;
        log::info!("Game over with score {} (record {})", state.score, state.record);
        state.push_event(GameEvent::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::gem::GemKind;
    use crate::sim::score::StreakMessage;
    use crate::{Settings, Viewport};

    const FRAME: f32 = 16.0;

    fn new_state() -> GameState {
        GameState::new(12345, 0, Settings::default(), Viewport::default())
    }

    /// A state with a hand-placed second platform at [200, 250)
    fn staged(stick_length: f32) -> GameState {
        let mut state = new_state();
        state.platforms = vec![Platform::new(50.0, 50.0, 0), Platform::new(200.0, 50.0, 1)];
        state.platforms_generated = 2;
        state.current_stick.length = stick_length;
        state.phase = GamePhase::Deploying;
        state.drain_events();
        state
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_waiting_is_idle() {
        let mut state = new_state();
        let hero = state.hero;
        tick(&mut state, &idle(), FRAME).unwrap();
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.hero, hero);
        assert_eq!(state.current_stick.length, 0.0);
    }

    #[test]
    fn test_press_codes_and_release_deploys() {
        let mut state = new_state();
        let press = TickInput {
            press: true,
            ..Default::default()
        };
        tick(&mut state, &press, FRAME).unwrap();
        assert_eq!(state.phase, GamePhase::Coding);
        assert_eq!(state.current_stick.length, FRAME / CODING_SPEED);

        tick(&mut state, &idle(), FRAME).unwrap();
        assert_eq!(state.current_stick.length, 2.0 * FRAME / CODING_SPEED);

        let release = TickInput {
            release: true,
            ..Default::default()
        };
        tick(&mut state, &release, FRAME).unwrap();
        assert_eq!(state.phase, GamePhase::Deploying);
        assert_eq!(state.current_stick.rotation, FRAME / DEPLOYING_SPEED);
        assert_eq!(state.current_stick.length, 2.0 * FRAME / CODING_SPEED);
    }

    #[test]
    fn test_release_ignored_while_waiting() {
        let mut state = new_state();
        let release = TickInput {
            release: true,
            ..Default::default()
        };
        tick(&mut state, &release, FRAME).unwrap();
        assert_eq!(state.phase, GamePhase::Waiting);
    }

    #[test]
    fn test_perfect_landing_round_trip() {
        // Tip lands on the center of [200, 250)
        let mut state = staged(125.0);

        tick(&mut state, &idle(), 400.0).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.current_stick.rotation, 90.0);
        assert_eq!(state.score, 2);
        assert_eq!(state.streak, 1);
        assert_eq!(state.record, 2);
        assert_eq!(state.platforms.len(), 3);
        assert_eq!(state.platforms[2].id, 2);
        assert_eq!(state.gems.len(), 1);
        assert_eq!(state.gems[0].rotation(), state.bonus_gem_rotation);
        assert!(state.bonus_gem_rotation > 0.0);
        assert_eq!(
            state.landing,
            Some(Landing {
                platform_id: 1,
                perfect: true
            })
        );

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Banner(StreakMessage::Bonus)));
        assert!(events.contains(&GameEvent::RecordBroken { record: 2 }));
        assert!(events.contains(&GameEvent::GemSpawned(GemKind::Collected)));

        // Hero walks to 10 px inside the landed platform's right edge
        tick(&mut state, &idle(), 1000.0).unwrap();
        assert_eq!(state.phase, GamePhase::Migrating);
        assert_eq!(state.hero.x, 240.0);

        // Scene scrolls past 250 - 100
        tick(&mut state, &idle(), 200.0).unwrap();
        assert_eq!(state.phase, GamePhase::Migrating);
        tick(&mut state, &idle(), 200.0).unwrap();
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.current_stick, Stick::new(250.0));
        assert_eq!(state.sticks.len(), 1);
        assert_eq!(state.sticks[0].length, 125.0);
        assert_eq!(state.landing, None);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Landed {
                    platform_id: 1,
                    perfect: true
                })
        );
    }

    #[test]
    fn test_plain_landing_spawns_missed_gem() {
        let mut state = staged(110.0);
        tick(&mut state, &idle(), 400.0).unwrap();
        assert_eq!(state.score, 1);
        assert_eq!(state.streak, 0);
        assert!(state.gems.is_empty());

        tick(&mut state, &idle(), 1000.0).unwrap();
        tick(&mut state, &idle(), 400.0).unwrap();
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.gems.len(), 1);
        assert_eq!(state.gems[0].kind(), GemKind::Missed);
    }

    #[test]
    fn test_gem_feedback_can_be_disabled() {
        let mut state = staged(125.0);
        state.settings.gem_feedback = false;
        tick(&mut state, &idle(), 400.0).unwrap();
        assert_eq!(state.score, 2);
        assert!(state.gems.is_empty());
    }

    #[test]
    fn test_miss_runs_off_the_stick() {
        // Tip at 150 falls in the gap before 200
        let mut state = staged(50.0);
        tick(&mut state, &idle(), 400.0).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.platforms.len(), 2);
        assert_eq!(state.landing, None);

        tick(&mut state, &idle(), 1000.0).unwrap();
        assert_eq!(state.phase, GamePhase::Crashing);
        assert_eq!(state.hero.x, 150.0 + HERO_WIDTH);
        assert!(state.drain_events().contains(&GameEvent::Crashed));
    }

    #[test]
    fn test_crash_falls_after_fixed_ticks() {
        let mut state = staged(50.0);
        state.phase = GamePhase::Crashing;
        state.current_stick.rotation = 90.0;
        state.hero.y = 0.0;

        // 8 px per 16 ms frame against a 200 px threshold
        let mut ticks = 0;
        while !state.over {
            tick(&mut state, &idle(), FRAME).unwrap();
            ticks += 1;
            assert!(ticks <= 100);
        }
        assert_eq!(ticks, 26);
        assert_eq!(state.current_stick.rotation, 180.0);
        assert!(state.drain_events().contains(&GameEvent::GameOver));

        // Terminal: further ticks do nothing
        let hero = state.hero;
        tick(&mut state, &idle(), FRAME).unwrap();
        assert_eq!(state.hero, hero);
    }

    #[test]
    fn test_streak_across_landings() {
        let mut state = staged(125.0);
        for expected in [2, 6, 11] {
            state.phase = GamePhase::Deploying;
            state.current_stick.rotation = 0.0;
            let target = state.platforms[1];
            state.current_stick.length = target.center() - state.current_stick.x;
            tick(&mut state, &idle(), 400.0).unwrap();
            assert_eq!(state.score, expected);
            state.landing = None;
        }
        assert_eq!(state.streak, 3);
    }

    #[test]
    fn test_hit_check_rejects_bent_stick() {
        let mut state = staged(125.0);
        state.phase = GamePhase::Running;
        state.current_stick.rotation = 45.0;
        assert_eq!(
            tick(&mut state, &idle(), FRAME),
            Err(SimError::InvalidStickRotation { degrees: 45.0 })
        );
    }

    #[test]
    fn test_migrating_without_platform_is_fault() {
        let mut state = staged(125.0);
        state.phase = GamePhase::Migrating;
        state.landing = Some(Landing {
            platform_id: 99,
            perfect: false,
        });
        assert_eq!(
            tick(&mut state, &idle(), FRAME),
            Err(SimError::MissingLandingPlatform { id: 99 })
        );

        state.landing = None;
        assert_eq!(tick(&mut state, &idle(), FRAME), Err(SimError::NoLanding));
    }

    /// Steps a bot that aims every stick at the next platform's center.
    /// Calls `on_landing` after each completed landing.
    fn play_landings(state: &mut GameState, landings: u32, mut on_landing: impl FnMut(&GameState, u32)) {
        let mut input = idle();
        let mut target = 0.0;
        let mut landed = 0;
        let mut frames = 0;
        while landed < landings {
            tick(state, &input, FRAME).unwrap();
            input = idle();
            frames += 1;
            assert!(frames < landings * 1000, "bot stalled after {landed} landings");
            assert!(!state.over, "bot fell after {landed} landings");

            for event in state.drain_events() {
                if let GameEvent::Landed { platform_id, .. } = event {
                    landed += 1;
                    on_landing(state, platform_id);
                }
            }

            match state.phase {
                GamePhase::Waiting => {
                    let stick_x = state.current_stick.x;
                    let next = state.platforms.iter().find(|p| p.x > stick_x).unwrap();
                    target = next.center() - stick_x;
                    input.press = true;
                }
                GamePhase::Coding => {
                    let step = FRAME / CODING_SPEED;
                    if state.current_stick.length + step / 2.0 >= target {
                        input.release = true;
                    }
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_long_run_keeps_world_bounded() {
        let mut state = GameState::new(77, 0, Settings::default(), Viewport::default());
        let mut max_decorations = 0;
        play_landings(&mut state, 600, |state, _| {
            max_decorations = max_decorations.max(state.decorations.len());
        });
        assert_eq!(state.streak, 600);
        assert!(state.scene_offset > 30_000.0);

        // Settle one waiting frame so upkeep sees the final offset
        tick(&mut state, &idle(), FRAME).unwrap();

        // Everything lies between the prune margin behind and one batch past
        // the lookahead: about 2200 px at 40 px or more apart, plus the
        // denser initial scatter early on
        let (start, end) = housekeeping::visible_decoration_span(state.scene_offset, state.viewport);
        assert!(state.decorations.iter().all(|d| d.x > start - DECORATION_BEHIND_MARGIN));
        let frontier = state.decorations.last().unwrap().x;
        assert!(frontier < end + DECORATION_LOOKAHEAD + DECORATION_BATCH as f32 * 200.0);
        assert!(max_decorations <= 70, "{max_decorations} decorations");
    }

    #[test]
    fn test_pruning_keeps_landing_platforms() {
        let mut state = GameState::new(2024, 0, Settings::default(), Viewport::default());
        let mut pruned = false;
        play_landings(&mut state, 120, |state, platform_id| {
            let landed = state.find_platform(platform_id).unwrap();
            assert_eq!(landed.right(), state.current_stick.x);
            assert!(
                state
                    .platforms
                    .iter()
                    .any(|p| p.x < state.current_stick.x && state.current_stick.x <= p.right())
            );
            assert_eq!(state.platforms[0].id, 0);
            assert!(state.platforms.windows(2).all(|w| w[0].right() < w[1].x));
            assert!(state.platforms.len() <= 1 + KEEP_PAST_PLATFORMS + INITIAL_PLATFORMS);
            assert!(state.sticks.len() <= KEEP_PAST_STICKS);
            pruned |= state.platforms[1].id > 1;
        });
        assert!(pruned);
        assert_eq!(state.sticks.len(), KEEP_PAST_STICKS);
    }

    #[test]
    fn test_frame_rate_independence() {
        let mut fast = staged(125.0);
        fast.phase = GamePhase::Coding;
        fast.current_stick.length = 0.0;
        let mut slow = fast.clone();

        for _ in 0..4 {
            tick(&mut fast, &idle(), 8.0).unwrap();
        }
        tick(&mut slow, &idle(), 32.0).unwrap();
        assert_eq!(fast.current_stick.length, slow.current_stick.length);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state();
        let mut b = new_state();
        let inputs = [
            TickInput {
                press: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                release: true,
                ..Default::default()
            },
        ];
        for input in inputs.iter().chain(std::iter::repeat_n(&TickInput::default(), 200)) {
            let ra = tick(&mut a, input, FRAME);
            let rb = tick(&mut b, input, FRAME);
            assert_eq!(ra, rb);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.hero, b.hero);
        assert_eq!(a.platforms, b.platforms);
        assert_eq!(a.decorations, b.decorations);
    }
}
