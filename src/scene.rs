use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::SkyCube;

/// The two display sinks a finished texture is published to: the torus
/// material's reflection map and the scene background. Both always end up
/// holding the same allocation, so the reflection and the backdrop can never
/// show different skies.
pub struct Scene {
    inner: Mutex<Sinks>,
    tx: watch::Sender<u64>,
}

struct Sinks {
    reflection_map: Option<Arc<SkyCube>>,
    background: Option<Arc<SkyCube>>,
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Sinks {
                reflection_map: None,
                background: None,
                revision: 0,
            }),
            tx: watch::channel(0).0,
        }
    }

    /// Install `cube` as both the reflection map and the background in one
    /// atomic step, replacing whatever was there. Long-pollers are woken
    /// after the sinks are consistent.
    pub fn publish(&self, cube: Arc<SkyCube>) {
        let rev = {
            let mut s = self.inner.lock().unwrap();
            s.reflection_map = Some(Arc::clone(&cube));
            s.background = Some(cube);
            s.revision += 1;
            s.revision
        };
        self.tx.send_replace(rev);
    }

    /// Latest revision and cube; revision 0 means nothing published yet.
    pub fn current(&self) -> (u64, Option<Arc<SkyCube>>) {
        let s = self.inner.lock().unwrap();
        (s.revision, s.background.clone())
    }

    pub fn reflection_map(&self) -> Option<Arc<SkyCube>> {
        self.inner.lock().unwrap().reflection_map.clone()
    }

    pub fn background(&self) -> Option<Arc<SkyCube>> {
        self.inner.lock().unwrap().background.clone()
    }

    /// Receiver that observes every revision bump. Subscribe before reading
    /// `current()` so no publish can slip between the two.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
