use std::sync::{Arc, Mutex};

use crate::params::{LiveParams, SkyParams};
use crate::scene::Scene;
use crate::SkyCube;

/// Generation function run for each job. Opaque to the scheduler: one
/// parameter snapshot in, one finished cube out.
pub type GenerateFn = Box<dyn Fn(SkyParams) -> SkyCube + Send + Sync>;

/// Scheduler state, guarded by one mutex. A pending change can only exist
/// while a job is running; this encoding has no other combination to get
/// wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Running { change_pending: bool },
}

/// Debounced single-flight regeneration.
///
/// `notify_change()` is the only input: constant-time, never blocking on
/// generation. From idle it launches the one background job; while a job is
/// in flight it marks a change as pending, and any number of further calls
/// collapse into that single mark. A finishing job that sees the mark clears
/// it and runs one follow-up with a fresh parameter snapshot, so the last
/// change of a slider drag always gets rendered, exactly once.
#[derive(Clone)]
pub struct Regenerator {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    params: Arc<LiveParams>,
    scene: Arc<Scene>,
    generate: GenerateFn,
}

impl Regenerator {
    /// Scheduler wired to the real sky generator at the given face size.
    pub fn new(params: Arc<LiveParams>, scene: Arc<Scene>, size: usize) -> Self {
        Self::with_generator(
            params,
            scene,
            Box::new(move |snapshot| {
                let (cube, timings) = crate::generate(snapshot, size);
                if let Some(total) = timings.last() {
                    log::info!("sky cube {size}x{size} regenerated in {:.1}ms", total.ms);
                }
                cube
            }),
        )
    }

    /// Scheduler running an arbitrary generation function, for callers that
    /// need to control what a job does and how long it takes.
    pub fn with_generator(
        params: Arc<LiveParams>,
        scene: Arc<Scene>,
        generate: GenerateFn,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::Idle),
                params,
                scene,
                generate,
            }),
        }
    }

    /// Record that the live parameters changed. Must be called on the
    /// runtime; the generation work itself runs on the blocking pool.
    ///
    /// The state flips to Running under the lock before the task is spawned,
    /// so a burst of calls in the same instant still launches exactly once.
    pub fn notify_change(&self) {
        let mut state = self.inner.state.lock().unwrap();
        match *state {
            State::Idle => {
                *state = State::Running {
                    change_pending: false,
                };
                drop(state);
                tokio::spawn(Inner::run(Arc::clone(&self.inner)));
            }
            State::Running { .. } => {
                *state = State::Running {
                    change_pending: true,
                };
            }
        }
    }

    /// True while a generation job is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(*self.inner.state.lock().unwrap(), State::Running { .. })
    }
}

impl Inner {
    /// The one background job. Each pass samples the parameters at its own
    /// start, not at schedule time, so a follow-up renders the state the
    /// burst ended on. Relaunching is a loop iteration rather than a new
    /// task: the state never passes through Idle between a job and its
    /// follow-up.
    async fn run(inner: Arc<Inner>) {
        loop {
            let snapshot = inner.params.snapshot();

            let worker = Arc::clone(&inner);
            let result = tokio::task::spawn_blocking(move || (worker.generate)(snapshot)).await;

            match result {
                Ok(cube) => inner.scene.publish(Arc::new(cube)),
                // A panicked generator skips its publish but must not wedge
                // the scheduler; the state step below still runs.
                Err(err) => log::error!("sky generation failed: {err}"),
            }

            let relaunch = {
                let mut state = inner.state.lock().unwrap();
                if let State::Running { change_pending: true } = *state {
                    *state = State::Running {
                        change_pending: false,
                    };
                    true
                } else {
                    *state = State::Idle;
                    false
                }
            };
            if !relaunch {
                return;
            }
        }
    }
}
