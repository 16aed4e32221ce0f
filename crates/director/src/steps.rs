//! The narrative step sequence.
//!
//! One type per beat: Entry → Intro → OkayStop → SoundChoice → PostChoice →
//! Bells → Violin → Outro → Run. Steps that react to scene events subscribe
//! an [`EventLatch`] on enter and drain it from their update; the bus itself
//! guarantees snapshot delivery, so a latch registered before an emission
//! always sees it.

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;

use scene_core::{ObjectId, Scene, SceneError, Tuning, Vec2};
use scene_events::{EventLatch, SubscriptionId};

use crate::{DirectorStep, StepFlow};

/// Builds the canonical nine-step sequence from tuning values.
pub fn default_sequence(tuning: &Tuning) -> Vec<Box<dyn DirectorStep>> {
    vec![
        Box::new(EntryStep),
        Box::new(IntroStep::new(tuning.intro_trigger_distance)),
        Box::new(OkayStopStep),
        Box::new(SoundChoiceStep::new()),
        Box::new(PostChoiceStep),
        Box::new(BellsStep::new(tuning.bells_timeout, tuning.bells_void_offset)),
        Box::new(ViolinStep::new(
            tuning.violin_offset_min,
            tuning.violin_offset_max,
        )),
        Box::new(OutroStep),
        Box::new(RunStep::new(
            tuning.run_vaultable_count,
            tuning.run_vaultable_spacing,
            tuning.run_first_vaultable_offset,
        )),
    ]
}

/// Opening narration; nothing else happens until it finishes.
#[derive(Debug, Default)]
pub struct EntryStep;

impl DirectorStep for EntryStep {
    fn name(&self) -> &'static str {
        "entry"
    }

    fn enter(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        scene.play_narration("entry")
    }

    fn update(&mut self, _dt: f32, scene: &mut Scene) -> Result<StepFlow, SceneError> {
        Ok(if scene.narration_finished() {
            StepFlow::Advance
        } else {
            StepFlow::Hold
        })
    }
}

/// Waits for the player to walk away from their start position, then narrates.
#[derive(Debug)]
pub struct IntroStep {
    /// Threshold compared as-is against the squared travelled distance, so
    /// the value is in squared units (see the tuning docs).
    trigger_distance: f32,
    start_position: Vec2,
    activated: bool,
}

impl IntroStep {
    pub fn new(trigger_distance: f32) -> Self {
        Self {
            trigger_distance,
            start_position: Vec2::ZERO,
            activated: false,
        }
    }
}

impl DirectorStep for IntroStep {
    fn name(&self) -> &'static str {
        "intro"
    }

    fn enter(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        self.start_position = scene.player.position;
        self.activated = false;
        scene.player.gate.allow_right = true;
        Ok(())
    }

    fn update(&mut self, _dt: f32, scene: &mut Scene) -> Result<StepFlow, SceneError> {
        if !self.activated {
            let travelled = (scene.player.position - self.start_position).length_squared();
            if travelled > self.trigger_distance {
                self.activated = true;
                scene.play_narration("intro")?;
            }
        }

        if self.activated && scene.narration_finished() {
            return Ok(StepFlow::Advance);
        }
        Ok(StepFlow::Hold)
    }
}

/// Tells the player off and takes rightward movement away while doing so.
#[derive(Debug, Default)]
pub struct OkayStopStep;

impl DirectorStep for OkayStopStep {
    fn name(&self) -> &'static str {
        "okay_stop"
    }

    fn enter(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        scene.player.gate.allow_right = false;
        scene.play_narration("okay_stop")
    }

    fn update(&mut self, _dt: f32, scene: &mut Scene) -> Result<StepFlow, SceneError> {
        Ok(if scene.narration_finished() {
            StepFlow::Advance
        } else {
            StepFlow::Hold
        })
    }
}

/// Lets the player pick a sound by touching a spawned choice object.
///
/// The first event to arrive names the chosen sound; the step then plays the
/// "choose_sound" commentary followed by the narration named after the event,
/// and advances once both have finished.
pub struct SoundChoiceStep {
    latch: Rc<RefCell<EventLatch>>,
    subscription: Option<SubscriptionId>,
    chosen: Option<String>,
    choice_object: Option<ObjectId>,
    explaining: bool,
}

impl SoundChoiceStep {
    pub fn new() -> Self {
        Self {
            latch: EventLatch::shared(),
            subscription: None,
            chosen: None,
            choice_object: None,
            explaining: false,
        }
    }
}

impl Default for SoundChoiceStep {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectorStep for SoundChoiceStep {
    fn name(&self) -> &'static str {
        "sound_choice"
    }

    fn enter(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        scene.player.gate.allow_right = true;
        scene.player.gate.allow_left = true;
        self.chosen = None;
        self.explaining = false;
        self.latch.borrow_mut().clear();
        self.subscription = Some(scene.subscribe(self.latch.clone()));

        let position = scene.player.position;
        self.choice_object = Some(scene.spawn("sound_choice", position, 0.0)?);
        Ok(())
    }

    fn update(&mut self, _dt: f32, scene: &mut Scene) -> Result<StepFlow, SceneError> {
        loop {
            let event = self.latch.borrow_mut().pop();
            let Some(sound) = event else { break };

            if let Some(id) = self.choice_object.take() {
                scene.despawn(id);
            }
            tracing::info!("player chose sound '{}'", sound);
            self.chosen = Some(sound);
            scene.play_narration("choose_sound")?;
        }

        if let Some(sound) = self.chosen.as_deref() {
            if !self.explaining && scene.narration_finished() {
                scene.play_narration(sound)?;
                self.explaining = true;
            }
        }
        if self.explaining && scene.narration_finished() {
            return Ok(StepFlow::Advance);
        }
        Ok(StepFlow::Hold)
    }

    fn exit(&mut self, scene: &mut Scene) {
        if let Some(subscription) = self.subscription.take() {
            scene.unsubscribe(subscription);
        }
        if let Some(id) = self.choice_object.take() {
            scene.despawn(id);
        }
    }
}

/// Short commentary on the choice just made.
#[derive(Debug, Default)]
pub struct PostChoiceStep;

impl DirectorStep for PostChoiceStep {
    fn name(&self) -> &'static str {
        "post_choice"
    }

    fn enter(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        scene.play_narration("post_choice")
    }

    fn update(&mut self, _dt: f32, scene: &mut Scene) -> Result<StepFlow, SceneError> {
        Ok(if scene.narration_finished() {
            StepFlow::Advance
        } else {
            StepFlow::Hold
        })
    }
}

/// Chase beat: run right, away from the void. Advances on any event or when
/// the elapsed-time ceiling is hit, whichever comes first.
pub struct BellsStep {
    timeout: f32,
    void_offset: Vec2,
    latch: Rc<RefCell<EventLatch>>,
    subscription: Option<SubscriptionId>,
    void_object: Option<ObjectId>,
    elapsed: f32,
}

impl BellsStep {
    pub fn new(timeout: f32, void_offset: Vec2) -> Self {
        Self {
            timeout,
            void_offset,
            latch: EventLatch::shared(),
            subscription: None,
            void_object: None,
            elapsed: 0.0,
        }
    }
}

impl DirectorStep for BellsStep {
    fn name(&self) -> &'static str {
        "bells"
    }

    fn enter(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        scene.player.gate.allow_right = true;
        scene.player.gate.allow_left = false;
        scene.player.gate.run_enabled = true;
        self.elapsed = 0.0;
        self.latch.borrow_mut().clear();
        self.subscription = Some(scene.subscribe(self.latch.clone()));

        let position = scene.player.position + self.void_offset;
        self.void_object = Some(scene.spawn("void", position, 0.0)?);
        scene.play_narration("run_go_now")
    }

    fn update(&mut self, dt: f32, _scene: &mut Scene) -> Result<StepFlow, SceneError> {
        self.elapsed += dt;
        if !self.latch.borrow().is_empty() || self.elapsed > self.timeout {
            return Ok(StepFlow::Advance);
        }
        Ok(StepFlow::Hold)
    }

    fn exit(&mut self, scene: &mut Scene) {
        if let Some(subscription) = self.subscription.take() {
            scene.unsubscribe(subscription);
        }
        if let Some(id) = self.void_object.take() {
            scene.despawn(id);
        }
    }
}

/// Freezes the player while a violin materializes nearby, then releases them
/// to go find it. Advances on any event.
pub struct ViolinStep {
    offset_min: f32,
    offset_max: f32,
    latch: Rc<RefCell<EventLatch>>,
    subscription: Option<SubscriptionId>,
    violin_object: Option<ObjectId>,
    released: bool,
}

impl ViolinStep {
    pub fn new(offset_min: f32, offset_max: f32) -> Self {
        Self {
            offset_min,
            offset_max,
            latch: EventLatch::shared(),
            subscription: None,
            violin_object: None,
            released: false,
        }
    }

    /// Offset magnitude per axis is uniform in `[min, max]`; the quadrant
    /// comes from two independent coin flips.
    fn random_offset(&self, scene: &mut Scene) -> Vec2 {
        let mut offset = Vec2::new(
            scene.rng.gen_range(self.offset_min..=self.offset_max),
            scene.rng.gen_range(self.offset_min..=self.offset_max),
        );
        if scene.rng.gen_bool(0.5) {
            offset.x = -offset.x;
        }
        if scene.rng.gen_bool(0.5) {
            offset.y = -offset.y;
        }
        offset
    }
}

impl DirectorStep for ViolinStep {
    fn name(&self) -> &'static str {
        "violin"
    }

    fn enter(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        scene.player.gate.deny_all();
        scene.player.gate.run_enabled = false;
        self.released = false;
        self.latch.borrow_mut().clear();
        self.subscription = Some(scene.subscribe(self.latch.clone()));

        let position = scene.player.position + self.random_offset(scene);
        self.violin_object = Some(scene.spawn("violin", position, 0.0)?);
        scene.play_narration("violin")
    }

    fn update(&mut self, _dt: f32, scene: &mut Scene) -> Result<StepFlow, SceneError> {
        if !self.released && scene.narration_finished() {
            scene.player.gate.allow_all();
            scene.player.gate.run_enabled = true;
            self.released = true;
        }

        if !self.latch.borrow().is_empty() {
            return Ok(StepFlow::Advance);
        }
        Ok(StepFlow::Hold)
    }

    fn exit(&mut self, scene: &mut Scene) {
        if let Some(subscription) = self.subscription.take() {
            scene.unsubscribe(subscription);
        }
        if let Some(id) = self.violin_object.take() {
            scene.despawn(id);
        }
    }
}

/// Closing narration with the player held still.
#[derive(Debug, Default)]
pub struct OutroStep;

impl DirectorStep for OutroStep {
    fn name(&self) -> &'static str {
        "outro"
    }

    fn enter(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        scene.player.gate.deny_all();
        scene.play_narration("outro")
    }

    fn update(&mut self, _dt: f32, scene: &mut Scene) -> Result<StepFlow, SceneError> {
        Ok(if scene.narration_finished() {
            StepFlow::Advance
        } else {
            StepFlow::Hold
        })
    }
}

/// Final stretch: a line of vaultables ahead of the player. Terminal; the
/// director never advances past it on its own.
pub struct RunStep {
    count: usize,
    spacing: f32,
    first_offset: f32,
    spawned: Vec<ObjectId>,
}

impl RunStep {
    pub fn new(count: usize, spacing: f32, first_offset: f32) -> Self {
        Self {
            count,
            spacing,
            first_offset,
            spawned: Vec::new(),
        }
    }
}

impl DirectorStep for RunStep {
    fn name(&self) -> &'static str {
        "run"
    }

    fn enter(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        scene.player.gate.allow_right = true;
        scene.player.gate.run_enabled = true;
        self.spawned.clear();

        let origin = scene.player.position;
        for index in 0..self.count {
            let position = Vec2::new(
                origin.x + self.first_offset + index as f32 * self.spacing,
                origin.y,
            );
            self.spawned.push(scene.spawn("vaultable", position, 0.0)?);
        }
        Ok(())
    }

    fn update(&mut self, _dt: f32, _scene: &mut Scene) -> Result<StepFlow, SceneError> {
        Ok(StepFlow::Hold)
    }
}
