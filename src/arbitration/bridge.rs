//! Arbitration domain: the avian-backed body, probe and target adapters,
//! and the systems that drive coordinators on the fixed tick.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::abilities::AbilityEvent;
use crate::arbitration::{AbilityCoordinator, TickEnv};
use crate::content::SettingsHandle;
use crate::core::{AffectTriggered, CharacterStatus, InteractionEnded, LeftPlayableArea};
use crate::interaction::{Candidate, InteractableId, InteractionScanner, Ladder, PushBox};
use crate::movement::{
    ActionInput, BodyMode, CastHit, CharacterBody, Facing, GameLayer, KinematicProbe, Player,
    TargetBodies,
};
use crate::sprites::{AnimationController, ClipFinished, ClipPlayer};

/// Length of the downward ray under the character's feet.
const GROUND_PROBE_DISTANCE: f32 = 2.0;
/// Sweeps use the leading face shortened by this much at each end, so a
/// body resting on the floor does not hit it.
const FACE_INSET: f32 = 1.0;
/// Gap kept between swept bodies and what they run into, in pixels.
const CAST_SKIN: f32 = 1.0;
const FALLBACK_HALF_EXTENTS: Vec2 = Vec2::new(12.0, 24.0);

fn half_extents_of(collider: &Collider) -> Vec2 {
    match collider.shape_scaled().as_cuboid() {
        Some(c) => Vec2::new(c.half_extents.x, c.half_extents.y),
        None => FALLBACK_HALF_EXTENTS,
    }
}

// ============================================================================
// Body
// ============================================================================

/// `RigidBody` is immutable, so mode switches are recorded here and
/// reinserted through `Commands` once the tick is done.
pub(crate) struct AvianBody<'a> {
    transform: &'a mut Transform,
    velocity: &'a mut LinearVelocity,
    gravity: &'a mut GravityScale,
    initial_mode: BodyMode,
    mode: BodyMode,
    half_extents: Vec2,
}

impl<'a> AvianBody<'a> {
    pub(crate) fn new(
        transform: &'a mut Transform,
        velocity: &'a mut LinearVelocity,
        gravity: &'a mut GravityScale,
        rigid_body: &RigidBody,
        half_extents: Vec2,
    ) -> Self {
        let mode = body_mode_of(rigid_body);
        Self {
            transform,
            velocity,
            gravity,
            initial_mode: mode,
            mode,
            half_extents,
        }
    }

    /// The rigid body to insert if the mode changed during the tick.
    pub(crate) fn mode_change(&self) -> Option<RigidBody> {
        (self.mode != self.initial_mode).then(|| rigid_body_for(self.mode))
    }
}

fn body_mode_of(rigid_body: &RigidBody) -> BodyMode {
    match rigid_body {
        RigidBody::Kinematic => BodyMode::Kinematic,
        _ => BodyMode::Dynamic,
    }
}

fn rigid_body_for(mode: BodyMode) -> RigidBody {
    match mode {
        BodyMode::Dynamic => RigidBody::Dynamic,
        BodyMode::Kinematic => RigidBody::Kinematic,
    }
}

impl CharacterBody for AvianBody<'_> {
    fn position(&self) -> Vec2 {
        self.transform.translation.truncate()
    }

    fn move_position(&mut self, position: Vec2) {
        self.transform.translation.x = position.x;
        self.transform.translation.y = position.y;
    }

    fn velocity(&self) -> Vec2 {
        self.velocity.0
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity.0 = velocity;
    }

    fn gravity_scale(&self) -> f32 {
        self.gravity.0
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity.0 = scale;
    }

    fn mode(&self) -> BodyMode {
        self.mode
    }

    fn set_mode(&mut self, mode: BodyMode) {
        self.mode = mode;
    }

    fn half_extents(&self) -> Vec2 {
        self.half_extents
    }
}

// ============================================================================
// Probe
// ============================================================================

struct ProbeTarget {
    id: InteractableId,
    entity: Entity,
    position: Vec2,
    half_size: Vec2,
}

pub(crate) struct AvianProbe<'a, 'w, 's> {
    spatial: &'a SpatialQuery<'w, 's>,
    character: Entity,
    half_extents: Vec2,
    targets: Vec<ProbeTarget>,
}

impl AvianProbe<'_, '_, '_> {
    fn sweep(
        &self,
        origin: Vec2,
        half: Vec2,
        direction: Vec2,
        distance: f32,
        exclude: &[Entity],
    ) -> Vec<CastHit> {
        let Ok(dir) = Dir2::new(direction) else {
            return Vec::new();
        };
        let (shape, lead) = if direction.x.abs() >= direction.y.abs() {
            let h = (half.y - FACE_INSET).max(0.01);
            (
                Collider::segment(Vec2::new(0.0, -h), Vec2::new(0.0, h)),
                Vec2::new(half.x * direction.x.signum(), 0.0),
            )
        } else {
            let w = (half.x - FACE_INSET).max(0.01);
            (
                Collider::segment(Vec2::new(-w, 0.0), Vec2::new(w, 0.0)),
                Vec2::new(0.0, half.y * direction.y.signum()),
            )
        };

        let filter = SpatialQueryFilter::from_mask([GameLayer::Ground, GameLayer::Wall])
            .with_excluded_entities(exclude.iter().copied());
        let config = ShapeCastConfig::from_max_distance(distance);

        self.spatial
            .cast_shape(&shape, origin + lead, 0.0, dir, &config, &filter)
            .map(|hit| CastHit::new(hit.distance))
            .into_iter()
            .collect()
    }
}

impl KinematicProbe for AvianProbe<'_, '_, '_> {
    fn is_grounded(&self, position: Vec2) -> bool {
        let filter = SpatialQueryFilter::from_mask(GameLayer::Ground)
            .with_excluded_entities([self.character]);
        let feet = position - Vec2::new(0.0, self.half_extents.y);
        self.spatial
            .cast_ray(feet, Dir2::NEG_Y, GROUND_PROBE_DISTANCE, true, &filter)
            .is_some()
    }

    fn skin(&self) -> f32 {
        CAST_SKIN
    }

    fn cast_character(&self, origin: Vec2, direction: Vec2, distance: f32) -> Vec<CastHit> {
        self.sweep(
            origin,
            self.half_extents,
            direction,
            distance,
            &[self.character],
        )
    }

    fn cast_target(&self, target: InteractableId, direction: Vec2, distance: f32) -> Vec<CastHit> {
        let Some(t) = self.targets.iter().find(|t| t.id == target) else {
            return Vec::new();
        };
        self.sweep(
            t.position,
            t.half_size,
            direction,
            distance,
            &[self.character, t.entity],
        )
    }
}

// ============================================================================
// Targets
// ============================================================================

/// A push box copied out of the world for one tick and written back after.
struct TargetBox {
    entity: Entity,
    push_box: PushBox,
    position: Vec2,
    velocity_x: f32,
    solid: bool,
    dirty: bool,
}

pub(crate) struct AvianTargets<'a> {
    boxes: &'a mut [TargetBox],
}

impl AvianTargets<'_> {
    fn find(&self, id: InteractableId) -> Option<&TargetBox> {
        self.boxes.iter().find(|b| b.push_box.id == id)
    }

    fn find_mut(&mut self, id: InteractableId) -> Option<&mut TargetBox> {
        let found = self.boxes.iter_mut().find(|b| b.push_box.id == id)?;
        found.dirty = true;
        Some(found)
    }
}

impl TargetBodies for AvianTargets<'_> {
    fn position(&self, id: InteractableId) -> Option<Vec2> {
        self.find(id).map(|b| b.position)
    }

    fn move_position(&mut self, id: InteractableId, position: Vec2) {
        if let Some(b) = self.find_mut(id) {
            b.position = position;
        }
    }

    fn bounds(&self, id: InteractableId) -> Option<Rect> {
        self.find(id)
            .map(|b| Rect::from_center_half_size(b.position, b.push_box.half_size))
    }

    fn set_velocity_x(&mut self, id: InteractableId, x: f32) {
        if let Some(b) = self.find_mut(id) {
            b.velocity_x = x;
        }
    }

    fn set_solid(&mut self, id: InteractableId, solid: bool) {
        if let Some(b) = self.find_mut(id) {
            b.solid = solid;
        }
    }
}

// ============================================================================
// Systems
// ============================================================================

type PlayerParts = (
    Entity,
    &'static mut AbilityCoordinator,
    &'static mut Transform,
    &'static mut LinearVelocity,
    &'static mut GravityScale,
    &'static RigidBody,
    &'static Collider,
    &'static mut CharacterStatus,
    &'static mut Facing,
    &'static mut AnimationController,
    &'static InteractionScanner,
);

type BoxParts = (
    Entity,
    &'static PushBox,
    &'static mut Transform,
    &'static mut LinearVelocity,
    Has<Sensor>,
);

fn snapshot_candidates(
    scanner: &InteractionScanner,
    ladders: &Query<&Ladder>,
    boxes: &[TargetBox],
) -> Vec<Candidate> {
    scanner
        .iter()
        .filter_map(|id| {
            if let Some(ladder) = ladders.iter().find(|l| l.id == id) {
                return Some(Candidate::Ladder(ladder.clone()));
            }
            boxes
                .iter()
                .find(|b| b.push_box.id == id)
                .map(|b| Candidate::PushBox(b.push_box.clone()))
        })
        .collect()
}

/// Run every coordinator for one fixed step.
#[allow(clippy::too_many_arguments)]
pub(crate) fn tick_abilities(
    time: Res<Time>,
    spatial_query: SpatialQuery,
    mut input: ResMut<ActionInput>,
    mut clip_finished: MessageReader<ClipFinished>,
    mut left_area: MessageReader<LeftPlayableArea>,
    mut interaction_ended: MessageWriter<InteractionEnded>,
    mut affects: MessageWriter<AffectTriggered>,
    mut commands: Commands,
    mut players: Query<PlayerParts, (With<Player>, Without<PushBox>)>,
    ladders: Query<&Ladder>,
    mut boxes: Query<BoxParts, Without<Player>>,
) {
    let finished: Vec<(Entity, String)> = clip_finished
        .read()
        .map(|event| (event.entity, event.clip.clone()))
        .collect();
    let fallen: Vec<Entity> = left_area.read().map(|event| event.entity).collect();
    let taken = input.take();
    let now = time.elapsed_secs();
    let dt = time.delta_secs();

    let mut target_boxes: Vec<TargetBox> = boxes
        .iter()
        .map(|(entity, push_box, transform, velocity, sensor)| TargetBox {
            entity,
            push_box: push_box.clone(),
            position: transform.translation.truncate(),
            velocity_x: velocity.x,
            solid: !sensor,
            dirty: false,
        })
        .collect();

    for (
        entity,
        mut coordinator,
        mut transform,
        mut velocity,
        mut gravity,
        rigid_body,
        collider,
        mut status,
        mut facing,
        mut animator,
        scanner,
    ) in &mut players
    {
        let half_extents = half_extents_of(collider);
        let candidates = snapshot_candidates(scanner, &ladders, &target_boxes);
        let probe = AvianProbe {
            spatial: &spatial_query,
            character: entity,
            half_extents,
            targets: target_boxes
                .iter()
                .map(|b| ProbeTarget {
                    id: b.push_box.id,
                    entity: b.entity,
                    position: b.position,
                    half_size: b.push_box.half_size,
                })
                .collect(),
        };
        let mut body = AvianBody::new(
            &mut *transform,
            &mut *velocity,
            &mut *gravity,
            rigid_body,
            half_extents,
        );
        let mut targets = AvianTargets {
            boxes: &mut target_boxes,
        };
        let mut env = TickEnv {
            body: &mut body,
            probe: &probe,
            animator: &mut *animator,
            targets: &mut targets,
            status: &mut *status,
            facing: &mut *facing,
            axis: taken.axis,
            now,
            dt,
        };

        if fallen.contains(&entity) {
            coordinator.on_left_playable_area(&mut env);
        }
        for (_, clip) in finished.iter().filter(|(e, _)| *e == entity) {
            coordinator.on_clip_finished(&mut env, clip);
        }

        for event in coordinator.tick(&mut env, &taken, &candidates) {
            match event {
                AbilityEvent::InteractionEnded { candidate, ability } => {
                    interaction_ended.write(InteractionEnded {
                        actor: entity,
                        candidate,
                        ability,
                    });
                }
                AbilityEvent::AffectTriggered {
                    affect_id,
                    duration,
                } => {
                    affects.write(AffectTriggered {
                        actor: entity,
                        affect_id,
                        duration,
                    });
                }
            }
        }

        if let Some(next) = body.mode_change() {
            commands.entity(entity).insert(next);
        }
    }

    for target in target_boxes.iter().filter(|t| t.dirty) {
        let Ok((_, _, mut transform, mut velocity, sensor)) = boxes.get_mut(target.entity) else {
            continue;
        };
        transform.translation.x = target.position.x;
        transform.translation.y = target.position.y;
        velocity.x = target.velocity_x;
        if target.solid && sensor {
            commands.entity(target.entity).remove::<Sensor>();
        } else if !target.solid && !sensor {
            commands.entity(target.entity).insert(Sensor);
        }
    }
}

/// Disable abilities on characters spawned without a usable body.
pub(crate) fn check_capabilities(
    mut query: Query<
        (
            &mut AbilityCoordinator,
            Has<RigidBody>,
            Has<Collider>,
            Has<LinearVelocity>,
            Has<GravityScale>,
        ),
        Added<AbilityCoordinator>,
    >,
) {
    for (mut coordinator, rigid_body, collider, velocity, gravity) in &mut query {
        if !(rigid_body && velocity && gravity) {
            coordinator.disable_all("rigid body");
        } else if !collider {
            coordinator.disable_all("collider");
        }
    }
}

/// Keep idle and run clips playing while no ability owns the animation.
pub(crate) fn sync_locomotion_clip(
    mut query: Query<(&CharacterStatus, &mut AnimationController), With<AbilityCoordinator>>,
) {
    for (status, mut animator) in &mut query {
        let clip = match status {
            CharacterStatus::Idle => "idle",
            CharacterStatus::Run => "run",
            _ => continue,
        };
        if animator.has_clip(clip) {
            animator.play_clip(clip);
        }
    }
}

/// Mirror the configured world gravity into the physics world.
pub(crate) fn sync_world_gravity(
    settings: Res<SettingsHandle>,
    mut seen: Local<Option<u64>>,
    mut gravity: ResMut<Gravity>,
) {
    let generation = settings.generation();
    if *seen == Some(generation) {
        return;
    }
    *seen = Some(generation);
    let world_gravity = settings.current().settings.world_gravity;
    gravity.0 = Vec2::NEG_Y * world_gravity.abs();
    debug!("World gravity set to {}", world_gravity);
}
