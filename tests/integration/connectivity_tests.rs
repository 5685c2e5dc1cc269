//! Boot-time connectivity decision and link-loss fallback.

use super::mock_hw::{MockClock, MockHttp, MockLed, MockRadio, MockStore, RadioCall, RecordingSink};

use desk_occupancy::app::connectivity::{ConnectivityManager, ConnectivityState, JoinPolicy};
use desk_occupancy::app::events::AppEvent;
use desk_occupancy::app::indicator::{
    COLOUR_ACCESS_POINT, COLOUR_CONNECTING, COLOUR_FREE, COLOUR_OFF, IndicatorController,
    IndicatorMode,
};
use desk_occupancy::app::occupancy::OccupancyState;
use desk_occupancy::app::service::DeskNode;
use desk_occupancy::config::DeviceConfig;

const AP_SSID: &str = "DOM-DEADBEEFCAFE";
const AVAILABLE: &str = r#"{"status":"Available"}"#;

struct Rig {
    radio: MockRadio,
    http: MockHttp,
    clock: MockClock,
    led: MockLed,
    sink: RecordingSink,
}

impl Rig {
    fn new(radio: MockRadio) -> Self {
        Self {
            radio,
            http: MockHttp::answering(AVAILABLE),
            clock: MockClock::default(),
            led: MockLed::default(),
            sink: RecordingSink::default(),
        }
    }

    fn boot(&mut self, node: &mut DeskNode<MockStore>, force_ap: bool) -> ConnectivityState {
        node.boot(
            force_ap,
            &mut self.radio,
            &mut self.http,
            &mut self.clock,
            &mut self.led,
            &mut self.sink,
        )
    }

    fn tick(&mut self, node: &mut DeskNode<MockStore>) -> ConnectivityState {
        node.tick(
            &mut self.radio,
            &mut self.http,
            &mut self.clock,
            &mut self.led,
            &mut self.sink,
        )
    }
}

fn configured_node() -> DeskNode<MockStore> {
    DeskNode::new(
        DeviceConfig::default(),
        MockStore::with("Office", "hunter22", "Desk-7"),
        AP_SSID,
    )
}

#[test]
fn stored_credentials_join_within_budget() {
    let mut node = configured_node();
    let mut rig = Rig::new(MockRadio::joins_after(3));

    assert_eq!(rig.boot(&mut node, false), ConnectivityState::Connected);
    assert_eq!(node.last_join_polls(), 3);
    assert_eq!(rig.clock.total_slept(), 3 * 500);

    assert_eq!(
        rig.radio.calls[..4],
        [
            RadioCall::Disconnect,
            RadioCall::StationMode,
            RadioCall::Hostname("Desk-7".into()),
            RadioCall::BeginJoin {
                ssid: "Office".into(),
                pass: "hunter22".into()
            },
        ]
    );
    assert_eq!(rig.radio.ap_starts(), 0);

    // Connecting colour first, then the free colour once online.
    assert_eq!(rig.led.colours, vec![COLOUR_CONNECTING, COLOUR_FREE]);
    assert!(rig.sink.contains(&AppEvent::ConnectivityChanged {
        from: ConnectivityState::Disconnected,
        to: ConnectivityState::Connected,
    }));
    assert!(rig.sink.contains(&AppEvent::Registered { ok: true }));
}

#[test]
fn join_timeout_falls_back_to_access_point() {
    let mut node = configured_node();
    let mut rig = Rig::new(MockRadio::unreachable());

    assert_eq!(rig.boot(&mut node, false), ConnectivityState::AccessPointActive);

    let config = DeviceConfig::default();
    assert_eq!(node.last_join_polls(), config.join_max_attempts);
    assert_eq!(rig.clock.total_slept(), config.join_budget_ms());
    assert!(rig.clock.total_slept() < config.watchdog_timeout_ms as u64);

    assert_eq!(rig.radio.calls.last(), Some(&RadioCall::StartAp(AP_SSID.into())));
    assert_eq!(rig.led.colour(), Some(COLOUR_ACCESS_POINT));
    assert_eq!(node.indicator_mode(), IndicatorMode::AccessPoint);
    assert!(rig.http.urls.is_empty(), "no registration without a link");
    assert!(!node.is_registered());
}

#[test]
fn empty_store_opens_access_point_without_join() {
    let mut node = DeskNode::new(DeviceConfig::default(), MockStore::blank(), AP_SSID);
    let mut rig = Rig::new(MockRadio::joins_after(1));

    assert_eq!(rig.boot(&mut node, false), ConnectivityState::AccessPointActive);
    assert_eq!(rig.radio.join_count(), 0);
    assert_eq!(rig.clock.total_slept(), 0);
    assert_eq!(rig.led.colours, vec![COLOUR_ACCESS_POINT]);
}

#[test]
fn held_button_forces_access_point() {
    let mut node = configured_node();
    let mut rig = Rig::new(MockRadio::joins_after(1));

    assert_eq!(rig.boot(&mut node, true), ConnectivityState::AccessPointActive);
    assert_eq!(rig.radio.join_count(), 0);
    assert!(rig.sink.contains(&AppEvent::Booted { force_ap: true }));
}

#[test]
fn link_loss_opens_access_point_on_next_tick() {
    let mut node = configured_node();
    let mut rig = Rig::new(MockRadio::joins_after(1));
    rig.boot(&mut node, false);

    assert_eq!(rig.tick(&mut node), ConnectivityState::Connected);
    assert_eq!(rig.radio.ap_starts(), 0);

    rig.radio.drop_link();
    assert_eq!(rig.tick(&mut node), ConnectivityState::AccessPointActive);
    assert_eq!(rig.radio.ap_starts(), 1);
    assert!(rig.sink.contains(&AppEvent::ConnectivityChanged {
        from: ConnectivityState::Connected,
        to: ConnectivityState::AccessPointActive,
    }));
    assert_eq!(rig.led.colour(), Some(COLOUR_ACCESS_POINT));

    // The access point is not restarted on every tick.
    rig.tick(&mut node);
    rig.tick(&mut node);
    assert_eq!(rig.radio.ap_starts(), 1);
}

#[test]
fn failed_access_point_is_retried() {
    let mut node = DeskNode::new(DeviceConfig::default(), MockStore::blank(), AP_SSID);
    let mut radio = MockRadio::unreachable();
    radio.fail_ap = true;
    let mut rig = Rig::new(radio);

    assert_eq!(rig.boot(&mut node, false), ConnectivityState::Disconnected);
    assert_eq!(rig.radio.ap_starts(), 1);

    rig.radio.fail_ap = false;
    assert_eq!(rig.tick(&mut node), ConnectivityState::AccessPointActive);
    assert_eq!(rig.radio.ap_starts(), 2);
}

#[test]
fn closing_access_point_turns_led_off() {
    let mut manager = ConnectivityManager::new(
        AP_SSID,
        JoinPolicy {
            poll_interval_ms: 500,
            max_attempts: 60,
        },
    );
    let mut indicator = IndicatorController::new(5, 25);
    let mut radio = MockRadio::unreachable();
    let mut led = MockLed::default();
    let desk = OccupancyState::default();

    assert!(manager.open_access_point(&mut radio));
    let out = indicator.render(manager.state(), &desk, 0);
    indicator.apply(out, &mut led);
    assert_eq!(led.colour(), Some(COLOUR_ACCESS_POINT));

    assert!(manager.close_access_point(&mut radio));
    assert_eq!(manager.state(), ConnectivityState::Disconnected);
    let out = indicator.render(manager.state(), &desk, 10);
    indicator.apply(out, &mut led);
    assert_eq!(led.colour(), Some(COLOUR_OFF));
    assert_eq!(radio.ap_stops(), 1);
}
