//! End-to-end DeskNode scenarios: button commands, read-back and the
//! indicator, driven through mock adapters.

use super::mock_hw::{MockClock, MockHttp, MockLed, MockRadio, MockStore, RecordingSink};

use desk_occupancy::app::commands::{AppCommand, TagCode};
use desk_occupancy::app::connectivity::ConnectivityState;
use desk_occupancy::app::events::AppEvent;
use desk_occupancy::app::indicator::{
    COLOUR_FREE, COLOUR_OCCUPIED, COLOUR_TRANSITIONAL, IndicatorMode,
};
use desk_occupancy::app::ports::{HttpError, HttpResponse};
use desk_occupancy::app::service::DeskNode;
use desk_occupancy::config::DeviceConfig;
use desk_occupancy::error::Error;

const AVAILABLE: &str = r#"{"status":"Available"}"#;
const OCCUPIED: &str = r#"{"status":"Occupied"}"#;

struct Rig {
    node: DeskNode<MockStore>,
    radio: MockRadio,
    http: MockHttp,
    clock: MockClock,
    led: MockLed,
    sink: RecordingSink,
}

impl Rig {
    /// Adapters and a configured node, not yet booted.
    fn online_parts() -> Self {
        Self {
            node: DeskNode::new(
                DeviceConfig::default(),
                MockStore::with("Office", "hunter22", "Desk-7"),
                "DOM-TEST",
            ),
            radio: MockRadio::joins_after(1),
            http: MockHttp::answering(AVAILABLE),
            clock: MockClock::default(),
            led: MockLed::default(),
            sink: RecordingSink::default(),
        }
    }

    /// A node that boots straight onto the network.
    fn online() -> Self {
        let mut rig = Self::online_parts();
        assert_eq!(rig.boot(), ConnectivityState::Connected);
        rig
    }

    fn boot(&mut self) -> ConnectivityState {
        self.node.boot(
            false,
            &mut self.radio,
            &mut self.http,
            &mut self.clock,
            &mut self.led,
            &mut self.sink,
        )
    }

    fn tick(&mut self) -> ConnectivityState {
        self.node.tick(
            &mut self.radio,
            &mut self.http,
            &mut self.clock,
            &mut self.led,
            &mut self.sink,
        )
    }
}

#[test]
fn button_press_marks_desk_occupied() {
    let mut rig = Rig::online();
    rig.tick(); // first read-back
    rig.led.colours.clear();

    rig.node.queue_command(AppCommand::Toggle);
    rig.tick();

    assert!(rig.node.occupancy().occupied);
    assert_eq!(rig.http.count_containing("/desk/Desk-7/occupied"), 1);
    assert_eq!(rig.led.colours, vec![COLOUR_TRANSITIONAL, COLOUR_OCCUPIED]);
    assert_eq!(rig.node.indicator_mode(), IndicatorMode::Occupied);
    assert!(rig.sink.contains(&AppEvent::OccupancyChanged { occupied: true }));
    assert!(rig.node.pending_command().is_none());
}

#[test]
fn unacknowledged_press_restores_previous_colour() {
    let mut rig = Rig::online();
    rig.tick();
    rig.led.colours.clear();

    rig.http.set_fallback(Err(HttpError::Connect));
    rig.node.queue_command(AppCommand::Toggle);
    rig.tick();

    assert!(!rig.node.occupancy().occupied);
    assert_eq!(rig.led.colours, vec![COLOUR_TRANSITIONAL, COLOUR_FREE]);
    assert!(rig.sink.contains(&AppEvent::SyncFailed(Error::RemoteUnavailable {
        attempts: 3,
        last_status: None,
    })));
}

#[test]
fn only_newest_queued_command_runs() {
    let mut rig = Rig::online();
    rig.tick();

    rig.node.queue_command(AppCommand::Toggle);
    rig.node.queue_command(AppCommand::Free);
    assert_eq!(rig.node.pending_command(), Some(&AppCommand::Free));
    rig.tick();

    // Free on a free desk is a no-op: nothing is written.
    assert_eq!(rig.http.count_containing("/occupied"), 0);
    assert_eq!(rig.http.count_containing("/available"), 0);
}

#[test]
fn tagged_occupy_reaches_remote() {
    let mut rig = Rig::online();
    rig.tick();

    let mut tag = TagCode::new();
    tag.push_str("04A1B2").unwrap();
    rig.node.queue_command(AppCommand::Occupy { tag: Some(tag) });
    rig.tick();

    assert_eq!(rig.http.count_containing("/desk/Desk-7/occupied/04A1B2"), 1);
    assert!(rig.node.occupancy().occupied);
}

#[test]
fn commands_are_dropped_while_offline() {
    let mut rig = Rig::online();
    rig.radio.drop_link();
    let requests_before = rig.http.urls.len();

    rig.node.queue_command(AppCommand::Toggle);
    assert_eq!(rig.tick(), ConnectivityState::AccessPointActive);

    assert!(rig.node.pending_command().is_none());
    assert_eq!(rig.http.urls.len(), requests_before);
    assert!(!rig.node.occupancy().occupied);
}

#[test]
fn read_back_follows_remote_changes() {
    let mut rig = Rig::online();
    rig.tick();
    assert!(!rig.node.occupancy().occupied);

    rig.http.set_fallback(Ok(HttpResponse::new(200, OCCUPIED)));
    rig.clock.advance(10_000);
    rig.tick();
    assert!(!rig.node.occupancy().occupied, "refresh not due yet");

    rig.clock.advance(20_001);
    rig.tick();
    assert!(rig.node.occupancy().occupied);
    assert_eq!(rig.led.colour(), Some(COLOUR_OCCUPIED));
}

#[test]
fn refresh_now_bypasses_rate_limit() {
    let mut rig = Rig::online();
    rig.tick();
    let reads = rig.http.count_containing("/desk/Desk-7");

    rig.http.set_fallback(Ok(HttpResponse::new(200, OCCUPIED)));
    rig.node.queue_command(AppCommand::RefreshNow);
    rig.tick();

    assert_eq!(rig.http.count_containing("/desk/Desk-7"), reads + 1);
    assert!(rig.node.occupancy().occupied);
}

#[test]
fn registration_happens_once() {
    let mut rig = Rig::online();
    for _ in 0..5 {
        rig.clock.advance(31_000);
        rig.tick();
    }
    assert_eq!(rig.http.count_containing("/desk/register/Desk-7"), 1);
    assert!(rig.node.is_registered());
}

#[test]
fn failed_registration_is_not_retried() {
    let mut rig = Rig {
        http: MockHttp::answering(AVAILABLE).then(Ok(HttpResponse::new(500, ""))),
        ..Rig::online_parts()
    };
    rig.boot();
    rig.tick();

    assert!(rig.sink.contains(&AppEvent::Registered { ok: false }));
    assert_eq!(rig.http.count_containing("/register/"), 1);
}

#[test]
fn free_desk_breathes_within_bounds() {
    let mut rig = Rig::online();
    rig.tick();
    assert_eq!(rig.node.indicator_mode(), IndicatorMode::Free);

    let mut seen_dim = false;
    for _ in 0..200 {
        rig.clock.advance(25);
        rig.tick();
        assert_eq!(rig.led.colour(), Some(COLOUR_FREE));
        if rig.led.brightness < 128 {
            seen_dim = true;
        }
    }
    assert!(seen_dim, "brightness ramp never moved");
}
