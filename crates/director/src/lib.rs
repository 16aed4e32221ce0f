//! Scene director: sequential narrative orchestration.
//!
//! The director owns an ordered list of steps and walks them one at a time.
//! Each step gates player movement, plays narration, and spawns or despawns
//! scene objects through the shared [`Scene`] context; the director's job is
//! only to drive the Enter/Update/Exit lifecycle and to know which step is
//! active.
//!
//! ```text
//! driver tick ──▶ Director::update ──▶ active step ──▶ Scene (gate, audio,
//!                                        │               spawner, bus)
//!                                        └─ StepFlow::Advance ─▶ next step
//! ```

pub mod steps;

// Re-export the step sequence
pub use steps::{
    default_sequence, BellsStep, EntryStep, IntroStep, OkayStopStep, OutroStep, PostChoiceStep,
    RunStep, SoundChoiceStep, ViolinStep,
};

use scene_core::{Scene, SceneError, TemplateHandle};

/// What a step's update asks the director to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepFlow {
    /// Stay on this step.
    Hold,
    /// Exit this step and enter the next one.
    Advance,
}

/// Where the director currently is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCursor {
    /// Constructed but not started.
    BeforeFirst,
    /// The step at this index is active (entered, not yet exited).
    Active(usize),
    /// Every step has run; updates are no-ops.
    Exhausted,
}

/// One beat of the narrative sequence.
///
/// Steps are constructed once and reused, never rebuilt between activations,
/// so `enter` must reset every piece of transient state rather than relying
/// on freshly-zeroed fields.
pub trait DirectorStep {
    fn name(&self) -> &'static str;

    fn enter(&mut self, scene: &mut Scene) -> Result<(), SceneError>;

    fn update(&mut self, dt: f32, scene: &mut Scene) -> Result<StepFlow, SceneError>;

    fn exit(&mut self, _scene: &mut Scene) {}
}

/// Drives the ordered step sequence over a scene.
pub struct Director {
    steps: Vec<Box<dyn DirectorStep>>,
    cursor: StepCursor,
    scene: Scene,
}

impl Director {
    /// Creates a director over an explicit step sequence.
    pub fn new(scene: Scene, steps: Vec<Box<dyn DirectorStep>>) -> Self {
        Self {
            steps,
            cursor: StepCursor::BeforeFirst,
            scene,
        }
    }

    /// Enters the first step. Call once after construction.
    pub fn start(&mut self) -> Result<(), SceneError> {
        if self.cursor != StepCursor::BeforeFirst {
            tracing::warn!("start() called after the sequence already began");
            return Ok(());
        }
        self.advance()
    }

    /// Forwards one tick to the active step. No-op once exhausted.
    pub fn update(&mut self, dt: f32) -> Result<(), SceneError> {
        let StepCursor::Active(index) = self.cursor else {
            return Ok(());
        };
        if self.steps[index].update(dt, &mut self.scene)? == StepFlow::Advance {
            self.advance()?;
        }
        Ok(())
    }

    /// Exits the active step and enters the next one.
    ///
    /// This is the only place the cursor moves: it only ever moves forward,
    /// by exactly one step. Past the final step the director logs that the
    /// sequence is exhausted and stays there.
    pub fn advance(&mut self) -> Result<(), SceneError> {
        let next = match self.cursor {
            StepCursor::Exhausted => {
                tracing::info!("director sequence exhausted; nothing left to run");
                return Ok(());
            }
            StepCursor::BeforeFirst => 0,
            StepCursor::Active(index) => {
                self.steps[index].exit(&mut self.scene);
                index + 1
            }
        };

        if next < self.steps.len() {
            self.cursor = StepCursor::Active(next);
            tracing::info!(
                "entering director step '{}' ({}/{})",
                self.steps[next].name(),
                next + 1,
                self.steps.len()
            );
            self.steps[next].enter(&mut self.scene)
        } else {
            self.cursor = StepCursor::Exhausted;
            tracing::info!(
                "director sequence exhausted after {} steps",
                self.steps.len()
            );
            Ok(())
        }
    }

    pub fn cursor(&self) -> StepCursor {
        self.cursor
    }

    /// Name of the active step, if any.
    pub fn current_step(&self) -> Option<&'static str> {
        match self.cursor {
            StepCursor::Active(index) => Some(self.steps[index].name()),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == StepCursor::Exhausted
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Starts the named narration cue.
    pub fn play_narration(&mut self, name: &str) -> Result<(), SceneError> {
        self.scene.play_narration(name)
    }

    /// True iff no narration audio is currently playing.
    pub fn narration_finished(&self) -> bool {
        self.scene.narration_finished()
    }

    /// Looks up a spawn template by name.
    pub fn spawn_template(&self, name: &str) -> Result<&TemplateHandle, SceneError> {
        self.scene.spawn_template(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_core::{SceneConfig, StubEffects, StubNarration, StubSpawner};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Step that records its lifecycle calls and advances after a fixed
    /// number of updates.
    struct ProbeStep {
        label: &'static str,
        updates_until_advance: u32,
        seen_updates: u32,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ProbeStep {
        fn boxed(
            label: &'static str,
            updates_until_advance: u32,
            log: &Rc<RefCell<Vec<String>>>,
        ) -> Box<dyn DirectorStep> {
            Box::new(Self {
                label,
                updates_until_advance,
                seen_updates: 0,
                log: log.clone(),
            })
        }
    }

    impl DirectorStep for ProbeStep {
        fn name(&self) -> &'static str {
            self.label
        }

        fn enter(&mut self, _scene: &mut Scene) -> Result<(), SceneError> {
            self.seen_updates = 0;
            self.log.borrow_mut().push(format!("enter:{}", self.label));
            Ok(())
        }

        fn update(&mut self, _dt: f32, _scene: &mut Scene) -> Result<StepFlow, SceneError> {
            self.seen_updates += 1;
            if self.seen_updates >= self.updates_until_advance {
                Ok(StepFlow::Advance)
            } else {
                Ok(StepFlow::Hold)
            }
        }

        fn exit(&mut self, _scene: &mut Scene) {
            self.log.borrow_mut().push(format!("exit:{}", self.label));
        }
    }

    fn test_scene() -> Scene {
        Scene::from_config(
            &SceneConfig::default(),
            StubNarration::new(1.0),
            StubEffects::default(),
            StubSpawner::default(),
        )
        .unwrap()
    }

    fn probe_director(log: &Rc<RefCell<Vec<String>>>) -> Director {
        Director::new(
            test_scene(),
            vec![
                ProbeStep::boxed("one", 1, log),
                ProbeStep::boxed("two", 2, log),
                ProbeStep::boxed("three", 1, log),
            ],
        )
    }

    #[test]
    fn start_enters_first_step_exactly_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut director = probe_director(&log);

        assert_eq!(director.cursor(), StepCursor::BeforeFirst);
        director.start().unwrap();

        assert_eq!(director.cursor(), StepCursor::Active(0));
        assert_eq!(*log.borrow(), vec!["enter:one"]);

        // A second start is ignored.
        director.start().unwrap();
        assert_eq!(*log.borrow(), vec!["enter:one"]);
    }

    #[test]
    fn cursor_moves_forward_one_step_at_a_time() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut director = probe_director(&log);
        director.start().unwrap();

        director.update(0.1).unwrap();
        assert_eq!(director.cursor(), StepCursor::Active(1));

        director.update(0.1).unwrap();
        assert_eq!(director.cursor(), StepCursor::Active(1));

        director.update(0.1).unwrap();
        assert_eq!(director.cursor(), StepCursor::Active(2));

        director.update(0.1).unwrap();
        assert!(director.is_exhausted());
    }

    #[test]
    fn every_enter_is_preceded_by_the_previous_exit() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut director = probe_director(&log);
        director.start().unwrap();
        for _ in 0..4 {
            director.update(0.1).unwrap();
        }

        assert_eq!(
            *log.borrow(),
            vec![
                "enter:one",
                "exit:one",
                "enter:two",
                "exit:two",
                "enter:three",
                "exit:three",
            ]
        );
    }

    #[test]
    fn update_after_exhaustion_is_a_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut director = probe_director(&log);
        director.start().unwrap();
        for _ in 0..4 {
            director.update(0.1).unwrap();
        }
        assert!(director.is_exhausted());

        let entries = log.borrow().len();
        director.update(0.1).unwrap();
        director.advance().unwrap();
        assert!(director.is_exhausted());
        assert_eq!(log.borrow().len(), entries);
    }

    #[test]
    fn current_step_reports_the_active_name() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut director = probe_director(&log);
        assert_eq!(director.current_step(), None);

        director.start().unwrap();
        assert_eq!(director.current_step(), Some("one"));

        director.update(0.1).unwrap();
        assert_eq!(director.current_step(), Some("two"));
    }

    #[test]
    fn empty_sequence_exhausts_on_start() {
        let mut director = Director::new(test_scene(), Vec::new());
        director.start().unwrap();
        assert!(director.is_exhausted());
        director.update(0.1).unwrap();
    }

    #[test]
    fn delegates_expose_scene_lookups() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut director = probe_director(&log);

        assert!(director.narration_finished());
        director.play_narration("entry").unwrap();
        assert!(!director.narration_finished());

        assert!(director.spawn_template("vaultable").is_ok());
        assert!(director.spawn_template("nope").is_err());
    }
}
