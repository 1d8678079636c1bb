//! Background shape regeneration.
//!
//! Generating tens of thousands of points can take longer than a frame, so
//! requests go to a dedicated thread. Queued requests collapse to the newest
//! one, and finished clouds land in a single slot the render loop polls.
//! A result whose request was superseded before it finished is dropped.

use crate::shape::{ShapeCloud, ShapeRequest};
use rand::prelude::*;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

struct Job {
    id: u64,
    request: ShapeRequest,
}

type Slot = Arc<Mutex<Option<(u64, ShapeCloud)>>>;

pub struct ShapeWorker {
    tx: Option<mpsc::Sender<Job>>,
    slot: Slot,
    latest_id: u64,
    handle: Option<thread::JoinHandle<()>>,
}

impl ShapeWorker {
    /// Start the generator thread for a field of `count` particles.
    pub fn spawn(count: usize) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        let slot: Slot = Arc::new(Mutex::new(None));
        let slot_worker = Arc::clone(&slot);
        let handle = thread::Builder::new()
            .name("shape-generator".into())
            .spawn(move || {
                let mut rng = StdRng::from_entropy();
                while let Ok(mut job) = rx.recv() {
                    while let Ok(newer) = rx.try_recv() {
                        job = newer;
                    }
                    let cloud = job.request.generate(count, &mut rng);
                    log::debug!(
                        "[regen] request {} ({}) ready",
                        job.id,
                        job.request.shape.name()
                    );
                    *slot_worker.lock().unwrap_or_else(|p| p.into_inner()) = Some((job.id, cloud));
                }
            })?;
        Ok(Self {
            tx: Some(tx),
            slot,
            latest_id: 0,
            handle: Some(handle),
        })
    }

    /// Queue a request, superseding anything still pending. Returns its id.
    pub fn submit(&mut self, request: ShapeRequest) -> u64 {
        self.latest_id += 1;
        let id = self.latest_id;
        let sent = self
            .tx
            .as_ref()
            .map(|tx| tx.send(Job { id, request }).is_ok())
            .unwrap_or(false);
        if !sent {
            log::warn!("[regen] generator thread gone, request {id} dropped");
        }
        id
    }

    /// Take the finished cloud for the newest request, if it is ready.
    pub fn poll(&self) -> Option<ShapeCloud> {
        let mut slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        match slot.take() {
            Some((id, cloud)) if id == self.latest_id => Some(cloud),
            Some((id, _)) => {
                log::debug!("[regen] dropping stale result {id}");
                None
            }
            None => None,
        }
    }
}

impl Drop for ShapeWorker {
    fn drop(&mut self) {
        // closing the channel ends the worker loop
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            _ = handle.join();
        }
    }
}
