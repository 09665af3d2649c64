//! Shared fixtures for service tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use mindme_core::error::{ExtensionError, Result};
use mindme_core::protocol::UpdateReason;
use mindme_core::ExtensionData;
use mindme_service::config::ExtensionMetadata;
use mindme_service::{
    CallerVerifier, Extension, ExtensionContext, ExtensionService, InMemoryPackageManager,
    Signature, TrustedSignatures,
};

pub const HOST_UID: u32 = 10_001;
pub const HOST_PACKAGE: &str = "com.mindmeapp.alarmpad";
pub const STRANGER_UID: u32 = 10_666;
pub const STRANGER_PACKAGE: &str = "com.example.snoop";

pub fn trusted_sig() -> Signature {
    Signature::new(vec![0x30, 0x82, 0x02, 0xd1, 0x01])
}

pub fn stranger_sig() -> Signature {
    Signature::new(vec![0x30, 0x82, 0x02, 0xd1, 0x02])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Init { is_reconnect: bool },
    Start(UpdateReason),
    End(UpdateReason),
}

/// Extension that reports every hook call and publishes a status per update.
pub struct RecordingExtension {
    events: mpsc::UnboundedSender<Event>,
    gate: Option<Mutex<std_mpsc::Receiver<()>>>,
    init_gate: Option<Mutex<std_mpsc::Receiver<()>>>,
    work: Duration,
}

fn wait_on(gate: &Option<Mutex<std_mpsc::Receiver<()>>>) {
    if let Some(gate) = gate {
        let _ = gate.lock().unwrap().recv_timeout(Duration::from_secs(5));
    }
}

#[async_trait]
impl Extension for RecordingExtension {
    fn name(&self) -> &'static str {
        "RecordingExtension"
    }

    fn on_initialize(&self, _ctx: &ExtensionContext, is_reconnect: bool) {
        let _ = self.events.send(Event::Init { is_reconnect });
        wait_on(&self.init_gate);
    }

    async fn on_update_data(&self, ctx: &ExtensionContext, reason: UpdateReason) {
        let _ = self.events.send(Event::Start(reason));
        // holds the worker until the test opens the gate
        wait_on(&self.gate);
        tokio::time::sleep(self.work).await;
        ctx.publish_update(Some(
            ExtensionData::new()
                .with_visible(true)
                .with_icon(reason.code())
                .with_status_to_display(reason.as_str()),
        ));
        let _ = self.events.send(Event::End(reason));
    }
}

pub struct Fixture {
    pub service: ExtensionService<RecordingExtension>,
    pub events: mpsc::UnboundedReceiver<Event>,
    pub packages: Arc<InMemoryPackageManager>,
}

pub struct Options {
    pub world_readable: bool,
    pub metadata_missing: bool,
    pub gate: Option<std_mpsc::Receiver<()>>,
    pub init_gate: Option<std_mpsc::Receiver<()>>,
    pub work: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            world_readable: false,
            metadata_missing: false,
            gate: None,
            init_gate: None,
            work: Duration::from_millis(0),
        }
    }
}

pub fn metadata(world_readable: bool) -> ExtensionMetadata {
    ExtensionMetadata {
        protocol_version: 1,
        description: "Records hook calls".into(),
        settings_activity: None,
        world_readable,
    }
}

pub fn fixture(opts: Options) -> Fixture {
    let packages = Arc::new(InMemoryPackageManager::new());
    packages.install(HOST_UID, HOST_PACKAGE, vec![trusted_sig()]);
    packages.install(STRANGER_UID, STRANGER_PACKAGE, vec![stranger_sig()]);

    let verifier = CallerVerifier::new(
        TrustedSignatures::new(vec![trusted_sig()]),
        packages.clone(),
    );
    let meta: Result<ExtensionMetadata> = if opts.metadata_missing {
        Err(ExtensionError::InvalidConfig("service info not found".into()))
    } else {
        Ok(metadata(opts.world_readable))
    };

    let (tx, events) = mpsc::unbounded_channel();
    let extension = RecordingExtension {
        events: tx,
        gate: opts.gate.map(Mutex::new),
        init_gate: opts.init_gate.map(Mutex::new),
        work: opts.work,
    };
    let service = ExtensionService::create(extension, meta, verifier).unwrap();

    Fixture {
        service,
        events,
        packages,
    }
}

pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

pub async fn next_update(
    rx: &mut mindme_service::HostReceiver,
) -> Option<ExtensionData> {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for host update")
        .expect("host channel closed")
        .expect("host could not decode update")
}
