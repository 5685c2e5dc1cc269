//! Application service: the hexagonal core.
//!
//! [`DeskNode`] is the explicit context the main loop owns: credentials,
//! connectivity, occupancy and indicator state all live here and are
//! passed by `&mut` into each component.  All I/O flows through port
//! traits injected at call sites, so the whole node runs against mocks.
//!
//! ```text
//!  RadioPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!   HttpPort ──▶ │           DeskNode           │ ──▶ IndicatorPort
//!  ClockPort ──▶ │ Connectivity · Sync · Portal │
//!                └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::DeviceConfig;
use crate::error::Error;
use crate::portal::{PortalRequest, PortalResponse, PortalRoute, pages, router};

use super::commands::AppCommand;
use super::connectivity::{ConnectivityManager, ConnectivityState, JoinPolicy};
use super::credentials::{CredentialStore, Credentials};
use super::events::AppEvent;
use super::indicator::{IndicatorController, IndicatorMode};
use super::occupancy::{OccupancyState, OccupancySynchronizer, SyncOutcome};
use super::ports::{ByteStorePort, ClockPort, EventSink, HttpPort, IndicatorPort, RadioPort};
use super::remote::RemoteAuthority;
use super::retry::RetryPolicy;

// ───────────────────────────────────────────────────────────────
// DeskNode
// ───────────────────────────────────────────────────────────────

pub struct DeskNode<S> {
    config: DeviceConfig,
    credentials: CredentialStore<S>,
    connectivity: ConnectivityManager,
    sync: OccupancySynchronizer,
    indicator: IndicatorController,
    remote: RemoteAuthority,
    registered: bool,
    pending: Option<AppCommand>,
    restart_at_ms: Option<u64>,
}

impl<S: ByteStorePort> DeskNode<S> {
    /// Build the node and load stored credentials.
    ///
    /// Does **not** touch the radio; call [`boot`](Self::boot) next.
    pub fn new(config: DeviceConfig, store: S, ap_ssid: &str) -> Self {
        let credentials = CredentialStore::open(store);
        let connectivity = ConnectivityManager::new(
            ap_ssid,
            JoinPolicy {
                poll_interval_ms: config.join_poll_interval_ms,
                max_attempts: config.join_max_attempts,
            },
        );
        let remote = RemoteAuthority::new(
            &config.api_base_url,
            credentials.current().dev_id(),
            RetryPolicy::new(config.http_max_attempts, config.http_retry_delay_ms),
        );

        Self {
            sync: OccupancySynchronizer::new(config.refresh_interval_ms),
            indicator: IndicatorController::new(config.breathe_step, config.breathe_tick_ms),
            config,
            credentials,
            connectivity,
            remote,
            registered: false,
            pending: None,
            restart_at_ms: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Make the boot-time connectivity decision.
    ///
    /// `force_ap` (button held at power-up) skips the join entirely.
    pub fn boot(
        &mut self,
        force_ap: bool,
        radio: &mut impl RadioPort,
        http: &mut impl HttpPort,
        clock: &mut impl ClockPort,
        led: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> ConnectivityState {
        let from = self.connectivity.state();
        let creds = self.credentials.current().clone();

        if force_ap {
            info!("DeskNode: boot button held, forcing access point");
            self.connectivity.open_access_point(radio);
        } else {
            if creds.is_configured() {
                let out = self.indicator.render(
                    ConnectivityState::Connecting,
                    self.sync.state(),
                    clock.now_ms(),
                );
                self.indicator.apply(out, led);
            }
            self.connectivity.connect(&creds, radio, clock);
        }

        let to = self.connectivity.state();
        Self::emit_transition(from, to, sink);
        if self.connectivity.is_connected() {
            self.register(http, sink);
        }
        sink.emit(&AppEvent::Booted { force_ap });
        self.render(clock, led);
        to
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One main-loop iteration.
    ///
    /// Offline: keep the access point up and drop queued input.
    /// Online: keep the access point down, refresh when due, then run
    /// the queued command.  The indicator is rendered in both cases.
    pub fn tick(
        &mut self,
        radio: &mut impl RadioPort,
        http: &mut impl HttpPort,
        clock: &mut impl ClockPort,
        led: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> ConnectivityState {
        let from = self.connectivity.state();
        self.connectivity.poll(radio);

        if self.connectivity.is_connected() {
            self.connectivity.close_access_point(radio);

            let result = self.sync.refresh(false, &self.remote, http, clock);
            Self::report_sync(result, sink);

            if let Some(cmd) = self.pending.take() {
                self.perform(cmd, http, clock, led, sink);
            }
        } else {
            self.connectivity.open_access_point(radio);
            if let Some(cmd) = self.pending.take() {
                debug!("DeskNode: dropping {:?} while offline", cmd);
            }
        }

        Self::emit_transition(from, self.connectivity.state(), sink);
        self.render(clock, led);
        self.connectivity.state()
    }

    // ── Command handling ──────────────────────────────────────

    /// Queue a command for the next connected tick.  A newer command
    /// replaces one that has not run yet.
    pub fn queue_command(&mut self, cmd: AppCommand) {
        if let Some(prev) = self.pending.replace(cmd) {
            debug!("DeskNode: {:?} superseded before it ran", prev);
        }
    }

    fn perform(
        &mut self,
        cmd: AppCommand,
        http: &mut impl HttpPort,
        clock: &mut impl ClockPort,
        led: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        let indicator = &mut self.indicator;
        let show = || indicator.show_transitional(led);
        let result = match &cmd {
            AppCommand::Occupy { tag } => {
                self.sync
                    .set_occupied(true, tag.as_deref(), &self.remote, http, clock, show)
            }
            AppCommand::Free => self.sync.set_occupied(false, None, &self.remote, http, clock, show),
            AppCommand::Toggle => self.sync.toggle(None, &self.remote, http, clock, show),
            AppCommand::RefreshNow => self.sync.refresh(true, &self.remote, http, clock),
        };
        Self::report_sync(result, sink);
    }

    fn register(&mut self, http: &mut impl HttpPort, sink: &mut impl EventSink) {
        if self.registered {
            return;
        }
        let ok = self.remote.register(http);
        self.registered = true;
        sink.emit(&AppEvent::Registered { ok });
    }

    // ── Portal ────────────────────────────────────────────────

    /// Perform the action behind a portal request and render the reply.
    ///
    /// Saved or wiped credentials take effect after a restart.
    pub fn handle_portal(
        &mut self,
        req: &PortalRequest,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> PortalResponse {
        match router::resolve(req) {
            PortalRoute::Home => {
                let c = self.credentials.current();
                pages::home(c.ssid(), c.dev_id())
            }
            PortalRoute::ConfigureForm => {
                let c = self.credentials.current();
                pages::configure_form(c.ssid(), c.dev_id())
            }
            PortalRoute::ConfigureSubmit { ssid, pass, dev_id } => {
                let saved = Credentials::new(&ssid, &pass, &dev_id)
                    .and_then(|c| self.credentials.save(&c));
                match saved {
                    Ok(()) => {
                        sink.emit(&AppEvent::CredentialsSaved);
                        pages::configure_saved()
                    }
                    Err(e) => {
                        let err = Error::from(e);
                        warn!("Portal: save rejected: {}", err);
                        sink.emit(&AppEvent::SaveFailed(err));
                        pages::configure_failed(&err.to_string())
                    }
                }
            }
            PortalRoute::ResetPrompt => pages::reset_prompt(),
            PortalRoute::ResetConfirmed => match self.credentials.reset() {
                Ok(()) => {
                    sink.emit(&AppEvent::CredentialsReset);
                    pages::reset_done()
                }
                Err(e) => {
                    let err = Error::from(e);
                    warn!("Portal: reset failed: {}", err);
                    sink.emit(&AppEvent::SaveFailed(err));
                    pages::reset_failed(&err.to_string())
                }
            },
            PortalRoute::RestartPrompt => pages::restart_prompt(),
            PortalRoute::RestartConfirmed => {
                self.schedule_restart(clock.now_ms(), sink);
                pages::restarting()
            }
            PortalRoute::MethodNotAllowed => pages::method_not_allowed(),
            PortalRoute::NotFound => pages::not_found(&req.path),
        }
    }

    fn schedule_restart(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        let in_ms = self.config.restart_delay_ms;
        if self.restart_at_ms.is_none() {
            self.restart_at_ms = Some(now_ms + in_ms as u64);
            sink.emit(&AppEvent::RestartScheduled { in_ms });
        }
    }

    /// Whether a scheduled restart is due at `now_ms`.
    pub fn restart_due(&self, now_ms: u64) -> bool {
        self.restart_at_ms.is_some_and(|at| now_ms >= at)
    }

    // ── Helpers ───────────────────────────────────────────────

    fn render(&mut self, clock: &impl ClockPort, led: &mut impl IndicatorPort) {
        let out = self.indicator.render(
            self.connectivity.state(),
            self.sync.state(),
            clock.now_ms(),
        );
        self.indicator.apply(out, led);
    }

    fn report_sync(result: Result<SyncOutcome, Error>, sink: &mut impl EventSink) {
        match result {
            Ok(SyncOutcome::Updated { occupied }) => {
                sink.emit(&AppEvent::OccupancyChanged { occupied })
            }
            Ok(SyncOutcome::Skipped | SyncOutcome::Unchanged) => {}
            Err(e) => sink.emit(&AppEvent::SyncFailed(e)),
        }
    }

    fn emit_transition(
        from: ConnectivityState,
        to: ConnectivityState,
        sink: &mut impl EventSink,
    ) {
        if from != to {
            sink.emit(&AppEvent::ConnectivityChanged { from, to });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        self.credentials.current()
    }

    pub fn connectivity(&self) -> ConnectivityState {
        self.connectivity.state()
    }

    pub fn occupancy(&self) -> &OccupancyState {
        self.sync.state()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn ap_ssid(&self) -> &str {
        self.connectivity.ap_ssid()
    }

    pub fn last_join_polls(&self) -> u32 {
        self.connectivity.last_join_polls()
    }

    pub fn indicator_mode(&self) -> IndicatorMode {
        self.indicator.mode()
    }

    pub fn pending_command(&self) -> Option<&AppCommand> {
        self.pending.as_ref()
    }

    /// Borrow the byte store (diagnostics and tests).
    pub fn store(&self) -> &S {
        self.credentials.store()
    }

    /// Tear the node down and hand back its byte store.
    pub fn into_store(self) -> S {
        self.credentials.into_inner()
    }
}
