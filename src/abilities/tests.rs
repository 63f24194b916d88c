use bevy::prelude::*;

use super::attack_combo::CLIP_ATTACK_END;
use super::jump::{CLIP_JUMP_LAND, JumpLaunch};
use super::test_support::*;
use super::*;
use crate::content::{ComboStep, ComboTable, EaseType, GameContent, SettingsHandle};
use crate::core::CharacterStatus;
use crate::interaction::InteractableId;
use crate::movement::BodyMode;

fn jump_settings(height: f32, time_to_apex: f32, gravity: f32) -> crate::content::SettingsHandle {
    settings_with(|s| {
        s.jump_height = height;
        s.jump_time_to_apex = time_to_apex;
        s.world_gravity = gravity;
        s.coyote_time = 0.08;
        s.cliff_fall_speed = -10.0;
    })
}

fn dash_settings(distance: f32, duration: f32, easing: EaseType) -> crate::content::SettingsHandle {
    settings_with(|s| {
        s.dash_distance = distance;
        s.dash_duration = duration;
        s.dash_easing = easing;
        s.dash_curve = None;
    })
}

// ----------------------------------------------------------------------------
// Watchdog
// ----------------------------------------------------------------------------

#[test]
fn test_watchdog_fires_inside_completion_window() {
    let clip = 0.3;
    let mut watchdog = Watchdog::default();
    watchdog.arm(1_u8, clip + watchdog::COMPLETION_MARGIN);

    let mut now = 0.0;
    let fired_at = loop {
        if watchdog.poll(now).is_some() {
            break now;
        }
        now += DT;
        assert!(now < 1.0, "watchdog never fired");
    };

    assert!(fired_at >= clip);
    assert!(fired_at <= clip + watchdog::COMPLETION_MARGIN + DT + 1e-5);
    assert!(!watchdog.is_armed());
}

#[test]
fn test_watchdog_only_awaits_armed_phase() {
    let mut watchdog = Watchdog::default();
    assert!(!watchdog.awaits(DashPhase::Start));

    watchdog.arm(DashPhase::Start, 1.0);
    assert!(watchdog.awaits(DashPhase::Start));
    assert!(!watchdog.awaits(DashPhase::End));
    assert_eq!(watchdog.poll(0.5), None);

    watchdog.cancel();
    assert_eq!(watchdog.poll(2.0), None);
}

// ----------------------------------------------------------------------------
// Physics override token
// ----------------------------------------------------------------------------

#[test]
fn test_override_denies_second_owner() {
    let body = MockBody::default();
    let mut physics = PhysicsOverride::default();

    assert!(physics.claim(AbilityKind::Jump, &body));
    assert!(!physics.claim(AbilityKind::Dash, &body));
    assert_eq!(physics.owner(), Some(AbilityKind::Jump));
}

#[test]
fn test_override_hand_off_restores_first_baseline() {
    let mut body = MockBody::default();
    let mut physics = PhysicsOverride::default();

    physics.claim(AbilityKind::Jump, &body);
    body.gravity_scale = 5.0;
    assert!(physics.release(AbilityKind::Jump));

    physics.claim(AbilityKind::Dash, &body);
    body.gravity_scale = 0.0;
    assert!(physics.restore(AbilityKind::Dash, &mut body));

    assert_eq!(body.gravity_scale, 1.0);
    assert!(!physics.has_pending_baseline());
}

#[test]
fn test_override_restore_by_non_owner_is_ignored() {
    let mut body = MockBody::default();
    let mut physics = PhysicsOverride::default();

    physics.claim(AbilityKind::Climb, &body);
    body.gravity_scale = 0.0;
    body.mode = BodyMode::Kinematic;

    assert!(!physics.restore(AbilityKind::Jump, &mut body));
    assert_eq!(body.gravity_scale, 0.0);
    assert!(!physics.settle(&mut body));
}

#[test]
fn test_override_settle_restores_orphaned_baseline() {
    let mut body = MockBody::default();
    let mut physics = PhysicsOverride::default();

    physics.claim(AbilityKind::Climb, &body);
    body.gravity_scale = 0.0;
    body.mode = BodyMode::Kinematic;
    physics.release(AbilityKind::Climb);

    assert!(physics.settle(&mut body));
    assert_eq!(body.gravity_scale, 1.0);
    assert_eq!(body.mode, BodyMode::Dynamic);
    assert!(!physics.settle(&mut body));
}

// ----------------------------------------------------------------------------
// Easing
// ----------------------------------------------------------------------------

#[test]
fn test_every_ease_spans_zero_to_one() {
    for ease in [
        EaseType::Linear,
        EaseType::EaseInQuad,
        EaseType::EaseOutQuad,
        EaseType::EaseInOutQuad,
        EaseType::EaseOutCubic,
        EaseType::EaseInOutSine,
    ] {
        let curve = DashCurve::Ease(ease);
        assert!(curve.evaluate(0.0).abs() < 1e-6, "{:?} at 0", ease);
        assert!((curve.evaluate(1.0) - 1.0).abs() < 1e-6, "{:?} at 1", ease);
        assert_eq!(curve.evaluate(-1.0), curve.evaluate(0.0));
        assert_eq!(curve.evaluate(2.0), curve.evaluate(1.0));
    }
}

#[test]
fn test_sampled_curve_interpolates() {
    let curve = DashCurve::Sampled(vec![0.0, 0.5, 1.0]);
    assert!((curve.evaluate(0.25) - 0.25).abs() < 1e-6);
    assert!((curve.evaluate(0.75) - 0.75).abs() < 1e-6);

    let front_loaded = DashCurve::Sampled(vec![0.0, 0.8, 1.0]);
    assert!((front_loaded.evaluate(0.5) - 0.8).abs() < 1e-6);
}

// ----------------------------------------------------------------------------
// Jump
// ----------------------------------------------------------------------------

#[test]
fn test_launch_reaches_height_at_time_to_apex() {
    for (height, time_to_apex) in [(3.0, 0.35), (1.0, 0.2), (110.0, 0.35), (0.5, 1.0)] {
        let launch = JumpLaunch::new(height, time_to_apex, 9.8);
        let dt = 1e-4_f32;
        let steps = (time_to_apex / dt).round() as usize;
        let (mut y, mut vy) = (0.0_f32, launch.velocity);
        for _ in 0..steps {
            vy -= launch.gravity * dt;
            y += vy * dt;
        }
        assert!(
            (y - height).abs() / height < 0.01,
            "h={} t={} reached {}",
            height,
            time_to_apex,
            y
        );
        assert!(vy.abs() < launch.gravity * dt * 2.0);
        assert!((launch.gravity_scale * 9.8 - launch.gravity).abs() < 1e-3);
    }
}

#[test]
fn test_jump_apex_scenario() {
    let handle = jump_settings(3.0, 0.35, 9.8);
    let mut jump = JumpAbility::new(&handle);
    let mut rig = Rig {
        dt: 1.0 / 120.0,
        ..default()
    };

    assert!(jump.begin(&mut rig.ctx()));
    assert_eq!(rig.status, CharacterStatus::Jump);

    let (mut apex, mut apex_time) = (0.0_f32, 0.0_f32);
    for _ in 0..240 {
        rig.tick(&mut jump);
        rig.body.integrate(rig.dt, 9.8, Some(0.0));
        if rig.body.position.y > apex {
            apex = rig.body.position.y;
            apex_time = rig.now;
        }
    }

    assert!((apex - 3.0).abs() / 3.0 < 0.05, "apex {}", apex);
    assert!((apex_time - 0.35).abs() <= 2.0 * rig.dt + 1e-4, "apex at {}", apex_time);
}

#[test]
fn test_jump_lands_and_restores_gravity() {
    let handle = jump_settings(3.0, 0.35, 9.8);
    let mut jump = JumpAbility::new(&handle);
    let mut rig = Rig::default();

    jump.begin(&mut rig.ctx());
    assert!(rig.body.gravity_scale > 1.0);

    for _ in 0..120 {
        if !jump.is_active() {
            break;
        }
        rig.tick(&mut jump);
        rig.body.integrate(rig.dt, 9.8, Some(0.0));
    }

    assert!(!jump.is_active());
    assert_eq!(rig.body.gravity_scale, 1.0);
    assert_eq!(rig.status, CharacterStatus::Idle);
    assert_eq!(rig.physics.owner(), None);
}

#[test]
fn test_jump_landing_clip_falls_back_to_watchdog() {
    let handle = jump_settings(3.0, 0.35, 9.8);
    let mut jump = JumpAbility::new(&handle);
    let mut rig = Rig {
        animator: MockAnimator::with_clips(&[(CLIP_JUMP_LAND, 0.1)]),
        ..default()
    };

    jump.begin(&mut rig.ctx());
    for _ in 0..120 {
        rig.tick(&mut jump);
        rig.body.integrate(rig.dt, 9.8, Some(0.0));
        if jump.phase() == JumpPhase::Landing {
            break;
        }
    }
    assert_eq!(jump.phase(), JumpPhase::Landing);
    assert_eq!(rig.animator.last_played(), Some(CLIP_JUMP_LAND));

    // A stale notice for another clip does nothing.
    rig.clip_finished(&mut jump, "jump");
    assert_eq!(jump.phase(), JumpPhase::Landing);

    let ticks = rig.run_until_idle(&mut jump, 60);
    assert!(!jump.is_active());
    assert!(ticks as f32 * rig.dt <= 0.1 + watchdog::COMPLETION_MARGIN + 2.0 * rig.dt);
    assert_eq!(rig.status, CharacterStatus::Idle);
}

#[test]
fn test_cliff_fall_leaves_gravity_alone() {
    let handle = jump_settings(3.0, 0.35, 9.8);
    let mut jump = JumpAbility::new(&handle);
    let mut rig = Rig::default();
    rig.probe.ground_y = None;
    rig.body.position.y = 5.0;
    rig.body.velocity = Vec2::new(0.0, -50.0);

    for _ in 0..6 {
        rig.tick(&mut jump);
    }

    assert_eq!(jump.phase(), JumpPhase::Falling);
    assert!(jump.is_cliff_fall());
    assert_eq!(rig.status, CharacterStatus::Jump);
    assert_eq!(rig.body.gravity_scale, 1.0);
    assert_eq!(rig.physics.owner(), None);

    rig.probe.ground_y = Some(0.0);
    rig.body.position.y = 0.0;
    rig.body.velocity = Vec2::ZERO;
    rig.tick(&mut jump);

    assert!(!jump.is_active());
    assert_eq!(rig.status, CharacterStatus::Idle);
    assert_eq!(rig.body.gravity_scale, 1.0);
}

#[test]
fn test_cliff_fall_waits_for_coyote_time() {
    let handle = jump_settings(3.0, 0.35, 9.8);
    let mut jump = JumpAbility::new(&handle);
    let mut rig = Rig::default();
    rig.probe.ground_y = None;
    rig.body.velocity = Vec2::new(0.0, -50.0);

    for _ in 0..4 {
        rig.tick(&mut jump);
    }
    assert!(!jump.is_active());
}

#[test]
fn test_cliff_fall_suppressed_while_dashing() {
    let handle = jump_settings(3.0, 0.35, 9.8);
    let mut jump = JumpAbility::new(&handle);
    let flag = ActivityFlag::default();
    jump.set_dash_active_query(flag.clone());
    flag.set(true);

    let mut rig = Rig::default();
    rig.probe.ground_y = None;
    rig.body.velocity = Vec2::new(0.0, -50.0);

    for _ in 0..10 {
        rig.tick(&mut jump);
    }
    assert!(!jump.is_active());

    flag.set(false);
    rig.tick(&mut jump);
    assert!(jump.is_cliff_fall());
}

#[test]
fn test_jump_begin_is_idempotent() {
    let handle = jump_settings(3.0, 0.35, 9.8);
    let mut jump = JumpAbility::new(&handle);
    let mut rig = Rig::default();

    assert!(jump.begin(&mut rig.ctx()));
    rig.body.velocity.y = 1.0;
    assert!(jump.begin(&mut rig.ctx()));
    assert_eq!(rig.body.velocity.y, 1.0);
}

#[test]
fn test_disabled_jump_refuses_to_begin() {
    let handle = jump_settings(3.0, 0.35, 9.8);
    let mut jump = JumpAbility::new(&handle);
    jump.disable("collider");
    let mut rig = Rig::default();

    assert!(!jump.begin(&mut rig.ctx()));
    assert_eq!(rig.status, CharacterStatus::Idle);
    assert_eq!(rig.body.gravity_scale, 1.0);
}

// ----------------------------------------------------------------------------
// Dash
// ----------------------------------------------------------------------------

#[test]
fn test_dash_scenario_covers_distance_in_twelve_ticks() {
    let handle = dash_settings(4.0, 0.2, EaseType::Linear);
    let mut dash = DashAbility::new(&handle);
    let mut rig = Rig::default();

    assert!(dash.begin(&mut rig.ctx()));
    assert_eq!(rig.status, CharacterStatus::Dash);
    assert_eq!(rig.body.gravity_scale, 0.0);

    for _ in 0..12 {
        rig.tick(&mut dash);
    }

    assert!((rig.body.position.x - 4.0).abs() <= 0.05);
    assert!(!dash.is_active());
    assert_eq!(rig.status, CharacterStatus::Idle);
    assert_eq!(rig.body.gravity_scale, 1.0);
}

#[test]
fn test_dash_total_is_independent_of_tick_size() {
    let curves: Vec<(EaseType, Option<Vec<f32>>)> = vec![
        (EaseType::Linear, None),
        (EaseType::EaseInQuad, None),
        (EaseType::EaseOutCubic, None),
        (EaseType::EaseInOutSine, None),
        (EaseType::Linear, Some(vec![0.0, 0.6, 0.9, 1.0])),
    ];
    for (ease, samples) in curves {
        for dt in [1.0 / 30.0, 1.0 / 60.0, 1.0 / 144.0, 0.013, 0.07] {
            let handle = settings_with(|s| {
                s.dash_distance = 4.0;
                s.dash_duration = 0.2;
                s.dash_easing = ease;
                s.dash_curve = samples.clone();
            });
            let mut dash = DashAbility::new(&handle);
            let mut rig = Rig { dt, ..default() };

            dash.begin(&mut rig.ctx());
            rig.run_until_idle(&mut dash, 1000);

            assert!(
                (rig.body.position.x - 4.0).abs() < 1e-3,
                "{:?} dt={} moved {}",
                ease,
                dt,
                rig.body.position.x
            );
        }
    }
}

#[test]
fn test_dash_follows_facing() {
    let handle = dash_settings(4.0, 0.2, EaseType::EaseOutQuad);
    let mut dash = DashAbility::new(&handle);
    let mut rig = Rig {
        facing: Facing::Left,
        ..default()
    };

    dash.begin(&mut rig.ctx());
    rig.run_until_idle(&mut dash, 100);
    assert!((rig.body.position.x + 4.0).abs() < 1e-3);
}

#[test]
fn test_dash_comes_to_rest_one_skin_from_wall() {
    let handle = dash_settings(160.0, 0.2, EaseType::Linear);
    let mut dash = DashAbility::new(&handle);
    let mut rig = Rig::default();
    rig.probe.wall_x = Some(100.0);
    rig.probe.skin = 1.0;

    dash.begin(&mut rig.ctx());
    rig.run_until_idle(&mut dash, 100);

    assert!((rig.body.position.x - 99.0).abs() < 1e-3);
    assert!(!dash.is_active());
}

#[test]
fn test_dash_stops_short_of_wall() {
    let handle = dash_settings(4.0, 0.2, EaseType::Linear);
    let mut dash = DashAbility::new(&handle);
    let mut rig = Rig::default();
    rig.probe.wall_x = Some(2.0);

    dash.begin(&mut rig.ctx());
    rig.run_until_idle(&mut dash, 100);

    assert!(rig.body.position.x < 2.0);
    assert!(rig.body.position.x > 1.5);
    assert!(!dash.is_active());
    assert_eq!(rig.body.gravity_scale, 1.0);
}

#[test]
fn test_dash_start_clip_completion_is_guarded_by_phase() {
    let handle = dash_settings(4.0, 0.2, EaseType::Linear);
    let mut dash = DashAbility::new(&handle);
    let mut rig = Rig {
        animator: MockAnimator::with_clips(&[(dash::CLIP_DASH, 0.05)]),
        ..default()
    };

    dash.begin(&mut rig.ctx());
    assert_eq!(dash.phase(), DashPhase::Start);
    rig.tick(&mut dash);
    assert_eq!(rig.body.position.x, 0.0);

    rig.clip_finished(&mut dash, dash::CLIP_DASH_END);
    assert_eq!(dash.phase(), DashPhase::Start);

    rig.clip_finished(&mut dash, dash::CLIP_DASH);
    assert_eq!(dash.phase(), DashPhase::Travel);

    rig.clip_finished(&mut dash, dash::CLIP_DASH);
    assert_eq!(dash.phase(), DashPhase::Travel);
}

#[test]
fn test_dash_start_clip_watchdog() {
    let handle = dash_settings(4.0, 0.2, EaseType::Linear);
    let mut dash = DashAbility::new(&handle);
    let mut rig = Rig {
        animator: MockAnimator::with_clips(&[(dash::CLIP_DASH, 0.05)]),
        ..default()
    };

    dash.begin(&mut rig.ctx());
    for _ in 0..4 {
        rig.tick(&mut dash);
    }
    assert_eq!(dash.phase(), DashPhase::Start);

    for _ in 0..4 {
        rig.tick(&mut dash);
    }
    assert_eq!(dash.phase(), DashPhase::Travel);
    assert!(rig.body.position.x > 0.0);
}

#[test]
fn test_dash_activity_flag_tracks_run() {
    let handle = dash_settings(4.0, 0.2, EaseType::Linear);
    let mut dash = DashAbility::new(&handle);
    let flag = dash.activity_flag();
    let mut rig = Rig::default();

    dash.begin(&mut rig.ctx());
    assert!(flag.get());
    rig.run_until_idle(&mut dash, 100);
    assert!(!flag.get());
}

#[test]
fn test_dash_cancel_without_restore_leaves_pending_baseline() {
    let handle = dash_settings(4.0, 0.2, EaseType::Linear);
    let mut dash = DashAbility::new(&handle);
    let mut rig = Rig::default();

    dash.begin(&mut rig.ctx());
    rig.cancel(&mut dash, true, false);

    assert!(!dash.is_active());
    assert_eq!(rig.body.gravity_scale, 0.0);
    assert_eq!(rig.physics.owner(), None);
    assert!(rig.physics.settle(&mut rig.body));
    assert_eq!(rig.body.gravity_scale, 1.0);
}

#[test]
fn test_dash_picks_up_reloaded_settings() {
    let handle = dash_settings(4.0, 0.2, EaseType::Linear);
    let mut dash = DashAbility::new(&handle);
    let mut rig = Rig::default();

    let mut content = GameContent::with_defaults();
    content.settings.dash_distance = 2.0;
    content.settings.dash_duration = 0.2;
    content.settings.dash_easing = EaseType::Linear;
    handle.replace(content);

    rig.tick(&mut dash);
    dash.begin(&mut rig.ctx());
    rig.run_until_idle(&mut dash, 100);
    assert!((rig.body.position.x - 2.0).abs() < 1e-3);
}

// ----------------------------------------------------------------------------
// Climb
// ----------------------------------------------------------------------------

const LADDER_ID: InteractableId = InteractableId(3);

fn ladder() -> LadderSpec {
    LadderSpec::new(LADDER_ID, Rect::new(-10.0, 0.0, 10.0, 100.0))
}

fn climb_rig(y: f32) -> Rig {
    let mut rig = Rig::default();
    rig.body.position = Vec2::new(3.0, y);
    rig
}

#[test]
fn test_climb_begin_switches_to_kinematic() {
    let handle = settings_with(|_| {});
    let mut climb = ClimbAbility::new(&handle);
    let mut rig = climb_rig(10.0);

    assert!(climb.begin(&mut rig.ctx(), &ladder()));

    assert_eq!(rig.body.mode, BodyMode::Kinematic);
    assert_eq!(rig.body.gravity_scale, 0.0);
    assert_eq!(rig.body.position.x, 0.0);
    assert_eq!(rig.status, CharacterStatus::Climb);
    assert_eq!(climb.phase(), ClimbPhase::Wait);
    assert_eq!(rig.physics.owner(), Some(AbilityKind::Climb));
}

#[test]
fn test_climb_to_top_exits_and_restores() {
    let handle = settings_with(|s| {
        s.move_speed = 240.0;
        s.climb_speed = 0.6;
    });
    let mut climb = ClimbAbility::new(&handle);
    let mut rig = climb_rig(10.0);
    rig.axis = Vec2::Y;

    climb.begin(&mut rig.ctx(), &ladder());
    rig.run_until_idle(&mut climb, 200);

    assert!(!climb.is_active());
    assert!((rig.body.position.y - ladder().top_landing_y() - 1.0).abs() < 1e-4);
    assert_eq!(rig.body.mode, BodyMode::Dynamic);
    assert_eq!(rig.body.gravity_scale, 1.0);
    assert_eq!(rig.status, CharacterStatus::Idle);
    assert_eq!(
        rig.events,
        vec![AbilityEvent::InteractionEnded {
            candidate: LADDER_ID,
            ability: AbilityKind::Climb,
        }]
    );
}

#[test]
fn test_climb_start_clip_follows_entry_side() {
    let clips = [(climb::CLIP_CLIMB_START_BOTTOM, 0.1), (climb::CLIP_CLIMB, 0.1)];
    let handle = settings_with(|_| {});

    for (y, expected) in [
        (5.0, climb::CLIP_CLIMB_START_BOTTOM),
        (50.0, climb::CLIP_CLIMB),
        (95.0, climb::CLIP_CLIMB),
    ] {
        let mut climb = ClimbAbility::new(&handle);
        let mut rig = climb_rig(y);
        rig.animator = MockAnimator::with_clips(&clips);

        climb.begin(&mut rig.ctx(), &ladder());
        assert_eq!(climb.phase(), ClimbPhase::Enter);
        assert_eq!(rig.animator.last_played(), Some(expected), "entry at {}", y);
    }
}

#[test]
fn test_climb_side_exit_without_clip_finishes_at_once() {
    let handle = settings_with(|s| s.can_move_side_while_climbing = true);
    let mut climb = ClimbAbility::new(&handle);
    let mut rig = climb_rig(50.0);
    rig.axis = Vec2::X;

    climb.begin(&mut rig.ctx(), &ladder());
    let ticks = rig.run_until_idle(&mut climb, 50);

    assert!(!climb.is_active());
    assert!(ticks < 10);
    assert!(rig.body.position.x <= 10.0);
    assert_eq!(rig.events.len(), 1);
}

#[test]
fn test_climb_side_motion_disabled_by_default() {
    let handle = settings_with(|_| {});
    let mut climb = ClimbAbility::new(&handle);
    let mut rig = climb_rig(50.0);
    rig.axis = Vec2::X;

    climb.begin(&mut rig.ctx(), &ladder());
    for _ in 0..30 {
        rig.tick(&mut climb);
    }
    assert!(climb.is_active());
    assert_eq!(rig.body.position.x, 0.0);
}

#[test]
fn test_climb_exit_clip_completes_on_notice() {
    let handle = settings_with(|_| {});
    let mut climb = ClimbAbility::new(&handle);
    let mut rig = climb_rig(10.0);
    rig.animator = MockAnimator::with_clips(&[(climb::CLIP_CLIMB_END, 0.1)]);
    rig.axis = Vec2::Y;

    climb.begin(&mut rig.ctx(), &ladder());
    for _ in 0..200 {
        rig.tick(&mut climb);
        if climb.phase() == ClimbPhase::End {
            break;
        }
    }
    assert_eq!(climb.phase(), ClimbPhase::End);
    assert_eq!(rig.status, CharacterStatus::Climb);

    rig.clip_finished(&mut climb, climb::CLIP_CLIMB_END);
    assert!(!climb.is_active());
    assert!((rig.body.position.y - ladder().top_landing_y() - 1.0).abs() < 1e-4);
}

#[test]
fn test_climb_end_restores_previous_velocity() {
    let handle = settings_with(|_| {});
    let mut climb = ClimbAbility::new(&handle);
    let mut rig = climb_rig(50.0);
    rig.body.velocity = Vec2::new(5.0, -3.0);

    climb.begin(&mut rig.ctx(), &ladder());
    assert_eq!(rig.body.velocity, Vec2::ZERO);
    climb.end(&mut rig.ctx());

    assert_eq!(rig.body.velocity, Vec2::new(5.0, -3.0));
    assert_eq!(rig.body.mode, BodyMode::Dynamic);
    assert_eq!(climb.ladder(), None);
}

#[test]
fn test_climb_up_held_at_top_exits_over_top() {
    let handle = settings_with(|_| {});
    let mut climb = ClimbAbility::new(&handle);
    let mut rig = climb_rig(99.9);

    climb.begin(&mut rig.ctx(), &ladder());
    assert_eq!(climb.phase(), ClimbPhase::Wait);

    rig.axis = Vec2::Y;
    rig.tick(&mut climb);

    assert!(!climb.is_active());
    assert!((rig.body.position.y - ladder().top_landing_y() - 1.0).abs() < 1e-4);
    assert_eq!(rig.events.len(), 1);
}

#[test]
fn test_climb_down_held_at_bottom_lands_feet_on_floor() {
    let handle = settings_with(|_| {});
    let mut climb = ClimbAbility::new(&handle);
    let mut rig = climb_rig(20.1);
    rig.body.half_extents = Vec2::new(8.0, 20.0);

    climb.begin(&mut rig.ctx(), &ladder());
    rig.axis = Vec2::NEG_Y;
    rig.tick(&mut climb);

    assert!(!climb.is_active());
    assert!((rig.body.position.y - 20.0).abs() < 1e-4);
    assert_eq!(rig.body.mode, BodyMode::Dynamic);
    assert_eq!(rig.status, CharacterStatus::Idle);
}

#[test]
fn test_climb_descent_stops_at_feet_not_centre() {
    let handle = settings_with(|s| {
        s.move_speed = 240.0;
        s.climb_speed = 0.6;
    });
    let mut climb = ClimbAbility::new(&handle);
    let mut rig = climb_rig(70.0);
    rig.body.half_extents = Vec2::new(8.0, 20.0);
    rig.axis = Vec2::NEG_Y;

    climb.begin(&mut rig.ctx(), &ladder());
    let mut lowest_feet = f32::MAX;
    for _ in 0..200 {
        if !climb.is_active() {
            break;
        }
        rig.tick(&mut climb);
        lowest_feet = lowest_feet.min(rig.body.position.y - 20.0);
    }

    assert!(!climb.is_active());
    assert!(lowest_feet >= -1e-4);
    assert!((rig.body.position.y - 20.0).abs() < 1e-4);
}

#[test]
fn test_climb_tall_body_tops_out_above_ladder() {
    let handle = settings_with(|s| {
        s.move_speed = 240.0;
        s.climb_speed = 0.6;
    });
    let mut climb = ClimbAbility::new(&handle);
    let mut rig = climb_rig(40.0);
    rig.body.half_extents = Vec2::new(8.0, 20.0);
    rig.axis = Vec2::Y;

    climb.begin(&mut rig.ctx(), &ladder());
    rig.run_until_idle(&mut climb, 200);

    assert!(!climb.is_active());
    assert!((rig.body.position.y - ladder().top_landing_y() - 20.0).abs() < 1e-4);
}

#[test]
fn test_climb_side_motion_while_moving_vertically() {
    let handle = settings_with(|s| {
        s.move_speed = 240.0;
        s.climb_speed = 0.6;
        s.can_move_side_while_climbing = true;
    });

    for vertical in [1.0, -1.0] {
        let mut climb = ClimbAbility::new(&handle);
        let mut rig = climb_rig(50.0);
        rig.axis = Vec2::new(0.7, 0.7 * vertical);

        climb.begin(&mut rig.ctx(), &ladder());
        for _ in 0..2 {
            rig.tick(&mut climb);
        }
        let expected = if vertical > 0.0 { ClimbPhase::Up } else { ClimbPhase::Down };
        assert_eq!(climb.phase(), expected);
        assert!(rig.body.position.x > 0.0);
        assert!((rig.body.position.y - 50.0) * vertical > 0.0);

        rig.run_until_idle(&mut climb, 50);
        assert!(!climb.is_active());
        assert!(rig.body.position.x <= 10.0);
        assert!(rig.body.position.y > 20.0 && rig.body.position.y < 80.0);
        assert_eq!(rig.body.mode, BodyMode::Dynamic);
    }
}

// ----------------------------------------------------------------------------
// PushPull
// ----------------------------------------------------------------------------

const BOX_ID: InteractableId = InteractableId(7);

fn push_rig(player_x: f32) -> Rig {
    let mut rig = Rig::default();
    rig.body.position = Vec2::new(player_x, 0.0);
    rig.targets = MockTargets::with_box(BOX_ID, Vec2::ZERO, Vec2::splat(16.0));
    rig
}

fn box_x(rig: &Rig) -> f32 {
    rig.targets.boxes[&BOX_ID].position.x
}

#[test]
fn test_grip_side_from_nearest_face() {
    let handle = settings_with(|s| s.grip_gap = 2.0);

    let mut left = PushPullAbility::new(&handle);
    let mut rig = push_rig(-30.0);
    assert!(left.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID)));
    assert_eq!(left.grip(), GripSide::Left);
    assert!((rig.body.position.x - (-16.0 - 2.0 - 0.5)).abs() < 1e-5);
    assert_eq!(rig.facing, Facing::Right);
    assert!(rig.targets.boxes[&BOX_ID].solid);
    assert_eq!(rig.status, CharacterStatus::Push);

    let mut right = PushPullAbility::new(&handle);
    let mut rig = push_rig(30.0);
    right.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID));
    assert_eq!(right.grip(), GripSide::Right);
    assert_eq!(rig.facing, Facing::Left);
}

#[test]
fn test_push_moves_box_and_character_together() {
    let handle = settings_with(|s| {
        s.move_speed = 240.0;
        s.push_speed = 0.5;
        s.grip_gap = 1.0;
    });
    let mut push = PushPullAbility::new(&handle);
    let mut rig = push_rig(-30.0);
    rig.axis = Vec2::X;

    push.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID));
    for _ in 0..5 {
        rig.tick(&mut push);
    }

    assert_eq!(push.phase(), PushPullPhase::Push);
    assert!((box_x(&rig) - 8.0).abs() < 1e-3);
    let gap = (box_x(&rig) - 16.0) - (rig.body.position.x + 0.5);
    assert!((gap - 1.0).abs() < 1e-3);
}

#[test]
fn test_grip_side_flips_input_sign() {
    let handle = settings_with(|s| {
        s.move_speed = 240.0;
        s.push_speed = 0.5;
    });
    let mut push = PushPullAbility::new(&handle);
    let mut rig = push_rig(30.0);
    rig.axis = Vec2::NEG_X;

    push.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID));
    for _ in 0..3 {
        rig.tick(&mut push);
    }

    assert_eq!(push.phase(), PushPullPhase::Push);
    assert!((box_x(&rig) + 4.0).abs() < 1e-3);
}

#[test]
fn test_pull_uses_pull_speed() {
    let handle = settings_with(|s| {
        s.move_speed = 240.0;
        s.pull_speed = 0.4;
    });
    let mut push = PushPullAbility::new(&handle);
    let mut rig = push_rig(-30.0);
    rig.axis = Vec2::NEG_X;

    push.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID));
    for _ in 0..3 {
        rig.tick(&mut push);
    }

    assert_eq!(push.phase(), PushPullPhase::Pull);
    assert!((box_x(&rig) + 3.2).abs() < 1e-3);
}

#[test]
fn test_blocked_box_does_not_move() {
    let handle = settings_with(|_| {});
    let mut push = PushPullAbility::new(&handle);
    let mut rig = push_rig(-30.0);
    rig.probe.target_blocked = true;
    rig.axis = Vec2::X;

    push.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID));
    for _ in 0..5 {
        rig.tick(&mut push);
    }

    assert_eq!(box_x(&rig), 0.0);
    assert_eq!(rig.targets.boxes[&BOX_ID].velocity_x, 0.0);
}

#[test]
fn test_disallowed_direction_keeps_waiting() {
    let handle = settings_with(|_| {});
    let mut push = PushPullAbility::new(&handle);
    let mut rig = push_rig(-30.0);
    rig.axis = Vec2::NEG_X;

    let spec = PushTargetSpec {
        can_pull: false,
        ..PushTargetSpec::new(BOX_ID)
    };
    push.begin(&mut rig.ctx(), &spec);
    for _ in 0..5 {
        rig.tick(&mut push);
    }

    assert_eq!(push.phase(), PushPullPhase::Wait);
    assert_eq!(box_x(&rig), 0.0);
}

#[test]
fn test_push_end_releases_box() {
    let handle = settings_with(|_| {});
    let mut push = PushPullAbility::new(&handle);
    let mut rig = push_rig(-30.0);

    push.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID));
    push.end(&mut rig.ctx());

    assert!(!push.is_active());
    assert!(!rig.targets.boxes[&BOX_ID].solid);
    assert_eq!(rig.status, CharacterStatus::Idle);
    assert_eq!(
        rig.events,
        vec![AbilityEvent::InteractionEnded {
            candidate: BOX_ID,
            ability: AbilityKind::PushPull,
        }]
    );
}

#[test]
fn test_push_requires_target_body() {
    let handle = settings_with(|_| {});
    let mut push = PushPullAbility::new(&handle);
    let mut rig = Rig::default();

    assert!(!push.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID)));
    assert_eq!(rig.status, CharacterStatus::Idle);
}

#[test]
fn test_push_ends_when_target_vanishes() {
    let handle = settings_with(|_| {});
    let mut push = PushPullAbility::new(&handle);
    let mut rig = push_rig(-30.0);

    push.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID));
    rig.targets.boxes.clear();
    rig.tick(&mut push);

    assert!(!push.is_active());
    assert_eq!(rig.status, CharacterStatus::Idle);
    assert_eq!(rig.events.len(), 1);
}

// ----------------------------------------------------------------------------
// AttackCombo
// ----------------------------------------------------------------------------

fn three_step_table() -> ComboTable {
    ComboTable {
        steps: vec![
            ComboStep {
                clip: "attack1".to_string(),
                wait_time: 0.3,
                affect_id: Some(1),
                ..default()
            },
            ComboStep {
                clip: "attack2".to_string(),
                wait_time: 0.3,
                affect_id: Some(2),
                ..default()
            },
            ComboStep {
                clip: "attack3".to_string(),
                wait_time: 0.2,
                affect_id: Some(3),
                ..default()
            },
        ],
    }
}

fn attack_rig() -> Rig {
    Rig {
        animator: MockAnimator::with_clips(&[
            ("attack1", 0.24),
            ("attack2", 0.24),
            ("attack3", 0.32),
            (CLIP_ATTACK_END, 0.16),
        ]),
        ..default()
    }
}

#[test]
fn test_first_press_starts_combo() {
    let handle = combo_with(three_step_table());
    let mut attack = AttackComboAbility::new(&handle);
    let mut rig = attack_rig();

    assert!(attack.press(&mut rig.ctx()));
    assert_eq!(attack.combo_index(), Some(0));
    assert_eq!(attack.phase(), AttackPhase::Strike);
    assert_eq!(rig.status, CharacterStatus::Attack);
    assert_eq!(
        rig.events,
        vec![AbilityEvent::AffectTriggered {
            affect_id: 1,
            duration: 0.24,
        }]
    );

    assert!(!attack.press(&mut rig.ctx()));
    assert_eq!(attack.combo_index(), Some(0));
}

#[test]
fn test_combo_advances_only_inside_window() {
    let handle = combo_with(three_step_table());
    let mut attack = AttackComboAbility::new(&handle);
    let mut rig = attack_rig();

    attack.press(&mut rig.ctx());
    let mut seen = vec![attack.combo_index()];
    for clip in ["attack1", "attack2"] {
        rig.clip_finished(&mut attack, clip);
        assert_eq!(attack.phase(), AttackPhase::ComboWait);
        assert_eq!(rig.status, CharacterStatus::AttackComboWait);
        assert!(attack.press(&mut rig.ctx()));
        seen.push(attack.combo_index());
    }
    assert_eq!(seen, vec![Some(0), Some(1), Some(2)]);

    rig.clip_finished(&mut attack, "attack3");
    assert!(!attack.press(&mut rig.ctx()));
    assert_eq!(attack.combo_index(), Some(2));
}

#[test]
fn test_combo_runs_out_on_watchdogs_alone() {
    let handle = combo_with(three_step_table());
    let mut attack = AttackComboAbility::new(&handle);
    let mut rig = attack_rig();

    attack.press(&mut rig.ctx());
    let ticks = rig.run_until_idle(&mut attack, 300);

    assert!(!attack.is_active());
    assert!(ticks < 60);
    assert_eq!(attack.combo_index(), None);
    assert_eq!(rig.status, CharacterStatus::Idle);
    assert!(rig.animator.played.iter().any(|c| c == CLIP_ATTACK_END));

    assert!(attack.press(&mut rig.ctx()));
    assert_eq!(attack.combo_index(), Some(0));
}

#[test]
fn test_stale_strike_notice_is_ignored_in_window() {
    let handle = combo_with(three_step_table());
    let mut attack = AttackComboAbility::new(&handle);
    let mut rig = attack_rig();

    attack.press(&mut rig.ctx());
    rig.clip_finished(&mut attack, "attack1");
    rig.clip_finished(&mut attack, "attack1");

    assert_eq!(attack.phase(), AttackPhase::ComboWait);
}

#[test]
fn test_single_step_table_ignores_press_in_window() {
    let mut table = three_step_table();
    table.steps.truncate(1);
    let handle = combo_with(table);
    let mut attack = AttackComboAbility::new(&handle);
    let mut rig = attack_rig();

    attack.press(&mut rig.ctx());
    rig.clip_finished(&mut attack, "attack1");
    assert!(!attack.press(&mut rig.ctx()));
    assert_eq!(attack.combo_index(), Some(0));
}

#[test]
fn test_empty_table_never_attacks() {
    let handle = combo_with(ComboTable { steps: Vec::new() });
    let mut attack = AttackComboAbility::new(&handle);
    let mut rig = attack_rig();

    assert!(!attack.press(&mut rig.ctx()));
    assert_eq!(rig.status, CharacterStatus::Idle);
}

#[test]
fn test_lunge_is_mirrored_by_facing() {
    let mut table = three_step_table();
    table.steps[0].forward_distance = 12.0;
    table.steps[0].forward_time_fraction = 0.5;
    let handle = combo_with(table);
    let mut attack = AttackComboAbility::new(&handle);
    let mut rig = attack_rig();
    rig.facing = Facing::Left;

    attack.press(&mut rig.ctx());
    for _ in 0..10 {
        rig.tick(&mut attack);
    }

    assert!((rig.body.position.x + 12.0).abs() < 1e-3);
}

#[test]
fn test_missing_strike_clip_skips_to_window() {
    let handle = combo_with(three_step_table());
    let mut attack = AttackComboAbility::new(&handle);
    let mut rig = Rig::default();

    attack.press(&mut rig.ctx());
    assert_eq!(attack.phase(), AttackPhase::ComboWait);
    assert_eq!(rig.status, CharacterStatus::AttackComboWait);
}

// ----------------------------------------------------------------------------
// Cancel
// ----------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Snapshot {
    active: bool,
    status: CharacterStatus,
    gravity_scale: f32,
    mode: BodyMode,
    events: usize,
}

fn snapshot(ability: &dyn Ability, rig: &Rig) -> Snapshot {
    Snapshot {
        active: ability.is_active(),
        status: rig.status,
        gravity_scale: rig.body.gravity_scale,
        mode: rig.body.mode,
        events: rig.events.len(),
    }
}

fn assert_cancel_idempotent(ability: &mut dyn Ability, rig: &mut Rig, skip: bool) {
    rig.cancel(ability, skip, true);
    let first = snapshot(ability, rig);
    rig.cancel(ability, skip, true);
    assert_eq!(snapshot(ability, rig), first, "{} skip={}", ability.kind(), skip);
}

#[test]
fn test_cancel_on_inactive_abilities_changes_nothing() {
    let handle = settings_with(|_| {});
    let mut rig = Rig::default();
    let mut abilities: Vec<Box<dyn Ability>> = vec![
        Box::new(JumpAbility::new(&handle)),
        Box::new(DashAbility::new(&handle)),
        Box::new(ClimbAbility::new(&handle)),
        Box::new(PushPullAbility::new(&handle)),
        Box::new(AttackComboAbility::new(&handle)),
    ];

    for ability in abilities.iter_mut() {
        let before = snapshot(ability.as_ref(), &rig);
        rig.cancel(ability.as_mut(), false, true);
        rig.cancel(ability.as_mut(), true, false);
        assert_eq!(snapshot(ability.as_ref(), &rig), before);
    }
}

fn every_clip() -> MockAnimator {
    MockAnimator::with_clips(&[
        (CLIP_JUMP_LAND, 0.1),
        (dash::CLIP_DASH, 0.1),
        (dash::CLIP_DASH_END, 0.1),
        (climb::CLIP_CLIMB, 0.1),
        (climb::CLIP_CLIMB_END, 0.1),
        (push_pull::CLIP_PUSH, 0.1),
        (push_pull::CLIP_PUSH_END, 0.1),
        ("attack1", 0.1),
        (CLIP_ATTACK_END, 0.1),
    ])
}

#[test]
fn test_cancel_twice_is_idempotent_from_every_ability() {
    let handle = settings_with(|_| {});
    let all_clips = every_clip();

    for skip in [true, false] {
        let mut rig = push_rig(-30.0);
        rig.animator = all_clips.clone();
        let mut jump = JumpAbility::new(&handle);
        jump.begin(&mut rig.ctx());
        assert_cancel_idempotent(&mut jump, &mut rig, skip);

        let mut rig = push_rig(-30.0);
        rig.animator = all_clips.clone();
        let mut dash = DashAbility::new(&handle);
        dash.begin(&mut rig.ctx());
        assert_cancel_idempotent(&mut dash, &mut rig, skip);

        let mut rig = push_rig(-30.0);
        rig.animator = all_clips.clone();
        let mut climb = ClimbAbility::new(&handle);
        climb.begin(&mut rig.ctx(), &ladder());
        assert_cancel_idempotent(&mut climb, &mut rig, skip);

        let mut rig = push_rig(-30.0);
        rig.animator = all_clips.clone();
        let mut push = PushPullAbility::new(&handle);
        push.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID));
        assert_cancel_idempotent(&mut push, &mut rig, skip);

        let mut rig = push_rig(-30.0);
        rig.animator = all_clips.clone();
        let mut attack = AttackComboAbility::new(&handle);
        attack.press(&mut rig.ctx());
        assert_cancel_idempotent(&mut attack, &mut rig, skip);
    }
}

#[test]
fn test_skip_cancel_finishes_exit_phase() {
    let handle = settings_with(|_| {});
    let mut rig = Rig {
        animator: MockAnimator::with_clips(&[(dash::CLIP_DASH_END, 0.1)]),
        ..default()
    };
    let mut dash = DashAbility::new(&handle);

    dash.begin(&mut rig.ctx());
    rig.cancel(&mut dash, false, true);
    assert_eq!(dash.phase(), DashPhase::End);

    rig.cancel(&mut dash, true, true);
    assert!(!dash.is_active());
    assert_eq!(rig.body.gravity_scale, 1.0);
}

fn falling_jump(handle: &SettingsHandle, rig: &mut Rig) -> JumpAbility {
    let mut jump = JumpAbility::new(handle);
    jump.begin(&mut rig.ctx());
    rig.body.position.y = 10.0;
    rig.body.velocity.y = -1.0;
    rig.tick(&mut jump);
    assert_eq!(jump.phase(), JumpPhase::Falling);
    jump
}

fn jump_in_falling(handle: &SettingsHandle, rig: &mut Rig) -> Box<dyn Ability> {
    Box::new(falling_jump(handle, rig))
}

fn jump_in_landing(handle: &SettingsHandle, rig: &mut Rig) -> Box<dyn Ability> {
    let mut jump = falling_jump(handle, rig);
    rig.body.position.y = 0.0;
    rig.body.velocity.y = 0.0;
    rig.tick(&mut jump);
    assert_eq!(jump.phase(), JumpPhase::Landing);
    Box::new(jump)
}

fn dash_in_travel(handle: &SettingsHandle, rig: &mut Rig) -> Box<dyn Ability> {
    let mut dash = DashAbility::new(handle);
    dash.begin(&mut rig.ctx());
    rig.clip_finished(&mut dash, dash::CLIP_DASH);
    assert_eq!(dash.phase(), DashPhase::Travel);
    Box::new(dash)
}

fn waiting_climb(handle: &SettingsHandle, rig: &mut Rig, y: f32) -> ClimbAbility {
    let mut climb = ClimbAbility::new(handle);
    rig.body.position = Vec2::new(0.0, y);
    climb.begin(&mut rig.ctx(), &ladder());
    rig.clip_finished(&mut climb, climb::CLIP_CLIMB);
    assert_eq!(climb.phase(), ClimbPhase::Wait);
    climb
}

fn climb_in_up(handle: &SettingsHandle, rig: &mut Rig) -> Box<dyn Ability> {
    let mut climb = waiting_climb(handle, rig, 50.0);
    rig.axis = Vec2::Y;
    rig.tick(&mut climb);
    assert_eq!(climb.phase(), ClimbPhase::Up);
    Box::new(climb)
}

fn climb_in_down(handle: &SettingsHandle, rig: &mut Rig) -> Box<dyn Ability> {
    let mut climb = waiting_climb(handle, rig, 50.0);
    rig.axis = Vec2::NEG_Y;
    rig.tick(&mut climb);
    assert_eq!(climb.phase(), ClimbPhase::Down);
    Box::new(climb)
}

fn climb_in_end(handle: &SettingsHandle, rig: &mut Rig) -> Box<dyn Ability> {
    let mut climb = waiting_climb(handle, rig, 99.9);
    rig.axis = Vec2::Y;
    rig.tick(&mut climb);
    assert_eq!(climb.phase(), ClimbPhase::End);
    Box::new(climb)
}

fn gripping(handle: &SettingsHandle, rig: &mut Rig, axis: Vec2) -> PushPullAbility {
    let mut push = PushPullAbility::new(handle);
    push.begin(&mut rig.ctx(), &PushTargetSpec::new(BOX_ID));
    rig.clip_finished(&mut push, push_pull::CLIP_PUSH);
    rig.axis = axis;
    rig.tick(&mut push);
    push
}

fn push_in_push(handle: &SettingsHandle, rig: &mut Rig) -> Box<dyn Ability> {
    let push = gripping(handle, rig, Vec2::X);
    assert_eq!(push.phase(), PushPullPhase::Push);
    Box::new(push)
}

fn push_in_pull(handle: &SettingsHandle, rig: &mut Rig) -> Box<dyn Ability> {
    let push = gripping(handle, rig, Vec2::NEG_X);
    assert_eq!(push.phase(), PushPullPhase::Pull);
    Box::new(push)
}

fn combo_waiting(handle: &SettingsHandle, rig: &mut Rig) -> AttackComboAbility {
    let mut attack = AttackComboAbility::new(handle);
    attack.press(&mut rig.ctx());
    rig.clip_finished(&mut attack, "attack1");
    assert_eq!(attack.phase(), AttackPhase::ComboWait);
    attack
}

fn combo_in_window(handle: &SettingsHandle, rig: &mut Rig) -> Box<dyn Ability> {
    Box::new(combo_waiting(handle, rig))
}

fn combo_in_recover(handle: &SettingsHandle, rig: &mut Rig) -> Box<dyn Ability> {
    let mut attack = combo_waiting(handle, rig);
    rig.now += 1.0;
    rig.tick(&mut attack);
    assert_eq!(attack.phase(), AttackPhase::Recover);
    Box::new(attack)
}

#[test]
fn test_cancel_from_every_phase_hands_back_body_and_status() {
    let handle = combo_with(three_step_table());
    let cases: [(&str, fn(&SettingsHandle, &mut Rig) -> Box<dyn Ability>); 10] = [
        ("jump falling", jump_in_falling),
        ("jump landing", jump_in_landing),
        ("dash travel", dash_in_travel),
        ("climb up", climb_in_up),
        ("climb down", climb_in_down),
        ("climb end", climb_in_end),
        ("push", push_in_push),
        ("pull", push_in_pull),
        ("combo window", combo_in_window),
        ("combo recover", combo_in_recover),
    ];

    for skip in [true, false] {
        for (label, setup) in cases {
            let mut rig = push_rig(-30.0);
            rig.animator = every_clip();
            let mut ability = setup(&handle, &mut rig);
            let kind = ability.kind();

            assert_cancel_idempotent(ability.as_mut(), &mut rig, skip);
            if !skip {
                rig.cancel(ability.as_mut(), true, true);
            }

            assert!(!ability.is_active(), "{} skip={}", label, skip);
            assert_ne!(rig.physics.owner(), Some(kind), "{} skip={}", label, skip);
            assert_eq!(rig.status, CharacterStatus::Idle, "{} skip={}", label, skip);
            assert_eq!(rig.body.gravity_scale, 1.0, "{} skip={}", label, skip);
            assert_eq!(rig.body.mode, BodyMode::Dynamic, "{} skip={}", label, skip);
        }
    }
}
