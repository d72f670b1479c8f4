//! Process-wide effect queue.
//!
//! Effects are a global screen-space resource: every conversation engine
//! shares one queue, and the queue plays at most one effect at a time in
//! first-requested-first-served order. Each request is fully awaited before
//! the next one starts; nothing cancels an effect once it has started.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parley_core::effect::{EffectBackend, EffectKind, EffectObserver, EffectReport, EffectRequest};
use tokio::sync::oneshot;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// A request waiting in the queue, with its completion channel.
struct PendingEffect {
    request: EffectRequest,
    done: oneshot::Sender<EffectReport>,
}

/// State guarded by the queue lock.
#[derive(Default)]
struct QueueState {
    pending: VecDeque<PendingEffect>,
    /// True while a drain task is running.
    draining: bool,
}

struct QueueInner {
    state: Mutex<QueueState>,
    backend: Option<Arc<dyn EffectBackend>>,
    observers: Vec<Arc<dyn EffectObserver>>,
}

/// Cloneable handle to the shared effect queue.
#[derive(Clone)]
pub struct EffectQueue {
    inner: Arc<QueueInner>,
}

impl std::fmt::Debug for EffectQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectQueue")
            .field("has_backend", &self.inner.backend.is_some())
            .field("observers", &self.inner.observers.len())
            .field("pending", &self.pending_len())
            .field("draining", &self.is_draining())
            .finish()
    }
}

/// Resolves once the matching request has finished playing.
#[derive(Debug)]
pub struct EffectCompletion {
    request_id: Uuid,
    done: oneshot::Receiver<EffectReport>,
}

impl EffectCompletion {
    /// The request this completion belongs to.
    #[must_use]
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Waits for the effect to finish.
    ///
    /// If the queue was torn down before the request ran (e.g. the runtime
    /// shut down), the effect is reported as not executed.
    pub async fn wait(self) -> EffectReport {
        match self.done.await {
            Ok(report) => report,
            Err(_) => {
                warn!(request_id = %self.request_id, "effect queue dropped request before completion");
                EffectReport {
                    request_id: self.request_id,
                    executed: false,
                }
            }
        }
    }
}

impl EffectQueue {
    /// Creates a queue playing effects on `backend`.
    ///
    /// Without a backend every request completes immediately with a warning.
    #[must_use]
    pub fn new(backend: Option<Arc<dyn EffectBackend>>) -> Self {
        Self::with_observers(backend, Vec::new())
    }

    /// Creates a queue that also notifies `observers` around timed effects.
    #[must_use]
    pub fn with_observers(
        backend: Option<Arc<dyn EffectBackend>>,
        observers: Vec<Arc<dyn EffectObserver>>,
    ) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState::default()),
                backend,
                observers,
            }),
        }
    }

    /// Appends `request` to the tail and starts draining if idle.
    ///
    /// A second call while a drain is running only appends.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, since draining runs as a
    /// spawned task.
    pub fn enqueue(&self, request: EffectRequest) -> EffectCompletion {
        let request_id = request.id;
        let (done, rx) = oneshot::channel();

        let start_drain = {
            let mut state = self.inner.lock();
            debug!(
                %request_id,
                branch_id = %request.branch_id,
                effect = %request.kind,
                queued_behind = state.pending.len(),
                "effect enqueued"
            );
            state.pending.push_back(PendingEffect { request, done });
            !std::mem::replace(&mut state.draining, true)
        };

        if start_drain {
            tokio::spawn(Arc::clone(&self.inner).drain());
        }

        EffectCompletion {
            request_id,
            done: rx,
        }
    }

    /// Number of requests waiting behind the one playing.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Returns true while a drain task is running.
    #[must_use]
    pub fn is_draining(&self) -> bool {
        self.inner.lock().draining
    }
}

impl QueueInner {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Plays pending requests until the queue is empty.
    ///
    /// Each request runs in its own task so a panicking backend only loses
    /// that request; the drain carries on with the next one.
    async fn drain(self: Arc<Self>) {
        loop {
            let next = {
                let mut state = self.lock();
                if let Some(next) = state.pending.pop_front() {
                    next
                } else {
                    state.draining = false;
                    return;
                }
            };

            let inner = Arc::clone(&self);
            let request = next.request.clone();
            let played = tokio::spawn(async move { inner.execute(&request).await }).await;
            let executed = match played {
                Ok(executed) => executed,
                Err(e) => {
                    error!(
                        request_id = %next.request.id,
                        effect = %next.request.kind,
                        error = %e,
                        "effect backend failed; effect skipped"
                    );
                    if next.request.kind.is_timed() {
                        for observer in &self.observers {
                            observer.effect_completed(&next.request);
                        }
                    }
                    false
                }
            };
            // The waiter may have lost interest; the effect still counts as played.
            let _ = next.done.send(EffectReport {
                request_id: next.request.id,
                executed,
            });
        }
    }

    #[instrument(skip_all, fields(request_id = %request.id, branch_id = %request.branch_id, effect = %request.kind))]
    async fn execute(&self, request: &EffectRequest) -> bool {
        let Some(backend) = &self.backend else {
            warn!("no effect backend available; treating effect as complete");
            return false;
        };

        info!("playing effect");
        if request.kind.is_timed() {
            for observer in &self.observers {
                observer.effect_started(request);
            }
        }

        let executed = match &request.kind {
            EffectKind::Blink => {
                backend.blink(request.blink).await;
                true
            }
            EffectKind::BlurStart => {
                if let Some(values) = request.blur {
                    backend.set_blur_values(values);
                }
                backend.apply_start_blur();
                true
            }
            EffectKind::BlurEnd => {
                if let Some(values) = request.blur {
                    backend.set_blur_values(values);
                }
                backend.apply_end_blur();
                true
            }
            EffectKind::BlinkWithBlur => {
                if let Some(values) = request.blur {
                    backend.set_blur_values(values);
                }
                backend.blink_with_blur(request.blink).await;
                true
            }
            EffectKind::Reset => {
                backend.reset_all_effects();
                true
            }
            EffectKind::Unknown(name) => {
                warn!(effect = %name, "unknown effect type; skipped");
                false
            }
        };

        if request.kind.is_timed() {
            for observer in &self.observers {
                observer.effect_completed(request);
            }
        }
        executed
    }
}
