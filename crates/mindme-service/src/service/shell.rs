//! Service lifecycle: create, handshake, update dispatch, destroy.
//!
//! Handshake and update entry points run on whatever thread the host's IPC
//! layer uses. They never wait on extension logic: updates are queued on the
//! extension's own worker.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use tokio::sync::oneshot;

use mindme_core::error::{ExtensionError, Result};
use mindme_core::protocol::UpdateReason;

use crate::config::ExtensionMetadata;
use crate::dispatch::SerialWorker;
use crate::host::ExtensionHost;
use crate::obs::ServiceMetrics;
use crate::security::CallerVerifier;

use super::context::{ExtensionContext, HostSlot};
use super::extension::Extension;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    /// First handshake accepted; the extension's hook is still running.
    Initializing,
    Initialized,
    Destroyed,
}

struct Shared<E: Extension> {
    extension: Arc<E>,
    metadata: Option<ExtensionMetadata>,
    world_readable: bool,
    verifier: CallerVerifier,
    host: HostSlot,
    ctx: ExtensionContext,
    state: Mutex<Lifecycle>,
    worker: SerialWorker,
    metrics: Arc<ServiceMetrics>,
}

impl<E: Extension> Shared<E> {
    fn state(&self) -> MutexGuard<'_, Lifecycle> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One running extension instance.
pub struct ExtensionService<E: Extension> {
    shared: Arc<Shared<E>>,
}

impl<E: Extension> ExtensionService<E> {
    /// Create the service and start its worker.
    ///
    /// `metadata` is what the extension declared at registration. If it could
    /// not be read the service still starts, but is never world-readable.
    pub fn create(
        extension: E,
        metadata: Result<ExtensionMetadata>,
        verifier: CallerVerifier,
    ) -> Result<Self> {
        let name = extension.name();
        let metadata = match metadata {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(extension = name, error = %e, "could not load metadata (e.g. world readable) for extension");
                None
            }
        };
        let world_readable = metadata
            .as_ref()
            .is_some_and(ExtensionMetadata::is_world_readable);

        let worker = SerialWorker::spawn(&format!("mindme-extension:{name}"))?;
        let metrics = Arc::new(ServiceMetrics::default());
        let host = HostSlot::default();
        let ctx = ExtensionContext::new(name, host.clone(), Arc::clone(&metrics));

        tracing::info!(extension = name, world_readable, "extension service created");

        Ok(Self {
            shared: Arc::new(Shared {
                extension: Arc::new(extension),
                metadata,
                world_readable,
                verifier,
                host,
                ctx,
                state: Mutex::new(Lifecycle::Created),
                worker,
                metrics,
            }),
        })
    }

    /// Binder handed to a connecting host.
    pub fn on_bind(&self) -> ExtensionBinder<E> {
        ExtensionBinder {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn metadata(&self) -> Option<&ExtensionMetadata> {
        self.shared.metadata.as_ref()
    }

    pub fn is_world_readable(&self) -> bool {
        self.shared.world_readable
    }

    pub fn is_initialized(&self) -> bool {
        *self.shared.state() == Lifecycle::Initialized
    }

    pub fn extension(&self) -> &E {
        &self.shared.extension
    }

    /// Publishing handle, usable from any thread once initialized.
    pub fn context(&self) -> ExtensionContext {
        self.shared.ctx.clone()
    }

    pub fn metrics(&self) -> Arc<ServiceMetrics> {
        Arc::clone(&self.shared.metrics)
    }

    /// Tear down. Queued updates are discarded; an update already running
    /// finishes but can no longer reach the host.
    ///
    /// Returns the worker thread handle on the first call.
    pub fn destroy(&self) -> Option<JoinHandle<()>> {
        *self.shared.state() = Lifecycle::Destroyed;
        self.shared.host.set(None);
        tracing::info!(extension = self.shared.ctx.name(), "extension service destroyed");
        self.shared.worker.shutdown()
    }
}

/// Host-facing entry points of an extension service.
pub struct ExtensionBinder<E: Extension> {
    shared: Arc<Shared<E>>,
}

impl<E: Extension> Clone for ExtensionBinder<E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E: Extension> ExtensionBinder<E> {
    /// Connection handshake from the host process running as `caller_uid`.
    ///
    /// Unless the extension is world-readable, the caller must be signed by a
    /// trusted certificate or the call fails with `SecurityDenied`. The first
    /// accepted handshake runs the extension's `on_initialize`; later ones
    /// only replace the host handle.
    ///
    /// The hook runs without holding the lifecycle lock. Updates that arrive
    /// meanwhile are queued at once and start only after the hook returns.
    pub fn on_initialize(
        &self,
        caller_uid: u32,
        host: Arc<dyn ExtensionHost>,
        is_reconnect: bool,
    ) -> Result<()> {
        let s = &self.shared;
        let name = s.ctx.name();

        let init_done = {
            let mut state = s.state();
            if *state == Lifecycle::Destroyed {
                return Err(ExtensionError::Destroyed);
            }

            if !s.world_readable {
                match s.verifier.check(caller_uid) {
                    Ok(package) => {
                        tracing::debug!(extension = name, uid = caller_uid, %package, "caller verified");
                    }
                    Err(rejection) => {
                        s.metrics
                            .handshakes
                            .inc(&[("outcome", "rejected"), ("reason", rejection.as_str())]);
                        return Err(s.verifier.deny(caller_uid, &rejection));
                    }
                }
            }

            s.host.set(Some(host));
            s.metrics.handshakes.inc(&[("outcome", "accepted")]);

            if *state != Lifecycle::Created {
                tracing::debug!(extension = name, uid = caller_uid, "host handle replaced");
                return Ok(());
            }
            *state = Lifecycle::Initializing;
            self.hold_worker_until_initialized()
        };

        s.extension.on_initialize(&s.ctx, is_reconnect);
        let _ = init_done.send(());

        let mut state = s.state();
        if *state == Lifecycle::Initializing {
            *state = Lifecycle::Initialized;
        }
        tracing::info!(extension = name, uid = caller_uid, is_reconnect, "extension initialized");
        Ok(())
    }

    /// Park the worker on a barrier released once the init hook returns (or
    /// unwinds and drops the sender).
    fn hold_worker_until_initialized(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel::<()>();
        if !self.shared.worker.post(async move {
            let _ = rx.await;
        }) {
            tracing::debug!(extension = self.shared.ctx.name(), "worker gone before initialization");
        }
        tx
    }

    /// Update request carrying a raw reason code. Queues the work and returns
    /// immediately; ignored until the first successful handshake.
    pub fn on_update(&self, reason_code: i32) -> Result<()> {
        let s = &self.shared;
        let name = s.ctx.name();
        let reason = UpdateReason::from_code(reason_code);

        match *s.state() {
            Lifecycle::Created => {
                tracing::debug!(extension = name, reason = reason.as_str(), "update before initialization; ignored");
                s.metrics
                    .updates
                    .inc(&[("reason", reason.as_str()), ("outcome", "ignored")]);
                return Ok(());
            }
            Lifecycle::Destroyed => return Err(ExtensionError::Destroyed),
            Lifecycle::Initializing | Lifecycle::Initialized => {}
        }

        let extension = Arc::clone(&s.extension);
        let ctx = s.ctx.clone();
        let metrics = Arc::clone(&s.metrics);
        let posted = s.worker.post(async move {
            extension.on_update_data(&ctx, reason).await;
            metrics
                .updates
                .inc(&[("reason", reason.as_str()), ("outcome", "completed")]);
        });

        if !posted {
            tracing::warn!(extension = name, reason = reason.as_str(), "worker is gone; update dropped");
            return Err(ExtensionError::Destroyed);
        }

        s.metrics
            .updates
            .inc(&[("reason", reason.as_str()), ("outcome", "enqueued")]);
        tracing::trace!(extension = name, reason = reason.as_str(), "update enqueued");
        Ok(())
    }
}
