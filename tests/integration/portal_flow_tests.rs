//! Configuration portal flows: save, reset and restart, including the
//! failure paths that must leave the stored record untouched.

use super::mock_hw::{MockClock, MockHttp, MockLed, MockRadio, MockStore, RadioCall, RecordingSink};

use desk_occupancy::adapters::portal_server::PortalServer;
use desk_occupancy::app::connectivity::ConnectivityState;
use desk_occupancy::app::credentials::Credentials;
use desk_occupancy::app::events::AppEvent;
use desk_occupancy::app::service::DeskNode;
use desk_occupancy::config::DeviceConfig;
use desk_occupancy::error::Error;
use desk_occupancy::portal::{Method, PortalRequest, PortalResponse};

fn node(store: MockStore) -> DeskNode<MockStore> {
    DeskNode::new(DeviceConfig::default(), store, "DOM-TEST")
}

fn request(
    node: &mut DeskNode<MockStore>,
    sink: &mut RecordingSink,
    method: Method,
    url: &str,
    body: &str,
) -> PortalResponse {
    let clock = MockClock::at(1_000);
    node.handle_portal(&PortalRequest::parse(method, url, body), &clock, sink)
}

#[test]
fn home_shows_stored_identity() {
    let mut node = node(MockStore::with("Office", "hunter22", "Desk-7"));
    let mut sink = RecordingSink::default();

    let page = request(&mut node, &mut sink, Method::Get, "/", "");
    assert_eq!(page.status, 200);
    assert!(page.body.contains("Office"));
    assert!(page.body.contains("Desk-7"));
    assert!(!page.body.contains("hunter22"));
}

#[test]
fn configure_form_never_echoes_password() {
    let mut node = node(MockStore::with("Office", "hunter22", "Desk-7"));
    let mut sink = RecordingSink::default();

    let page = request(&mut node, &mut sink, Method::Get, "/configure", "");
    assert_eq!(page.status, 200);
    assert!(page.body.contains(r#"value="Office""#));
    assert!(!page.body.contains("hunter22"));
}

#[test]
fn configure_post_persists_credentials() {
    let mut node = node(MockStore::blank());
    let mut sink = RecordingSink::default();

    let page = request(
        &mut node,
        &mut sink,
        Method::Post,
        "/configure",
        "ssid=Office+2.4&pass=s%26cret&devId=Desk-9",
    );

    assert_eq!(page.status, 200);
    assert!(sink.contains(&AppEvent::CredentialsSaved));
    let stored = node.store().durable_credentials();
    assert_eq!(stored, Credentials::new("Office 2.4", "s&cret", "Desk-9").unwrap());
    assert_eq!(node.credentials(), &stored);
    assert_eq!(node.store().commits, 1);
}

#[test]
fn saved_credentials_survive_restart() {
    let mut node = node(MockStore::blank());
    let mut sink = RecordingSink::default();

    let page = request(
        &mut node,
        &mut sink,
        Method::Post,
        "/configure",
        "ssid=Home&pass=secret123&devId=Desk-7",
    );
    assert_eq!(page.status, 200);

    let mut rebooted = DeskNode::new(
        DeviceConfig::default(),
        node.into_store().power_cycle(),
        "DOM-TEST",
    );
    let creds = rebooted.credentials();
    assert_eq!(creds.ssid(), "Home");
    assert_eq!(creds.pass(), "secret123");
    assert_eq!(creds.dev_id(), "Desk-7");

    let mut radio = MockRadio::joins_after(1);
    let mut http = MockHttp::answering(r#"{"status":"Available"}"#);
    let state = rebooted.boot(
        false,
        &mut radio,
        &mut http,
        &mut MockClock::default(),
        &mut MockLed::default(),
        &mut sink,
    );
    assert_eq!(state, ConnectivityState::Connected);
    assert!(radio.calls.contains(&RadioCall::BeginJoin {
        ssid: "Home".into(),
        pass: "secret123".into(),
    }));
    assert_eq!(http.count_containing("/desk/register/Desk-7"), 1);
}

#[test]
fn configure_via_query_string() {
    let mut node = node(MockStore::blank());
    let mut sink = RecordingSink::default();

    request(
        &mut node,
        &mut sink,
        Method::Get,
        "/configure?ssid=Lab&pass=&devId=Desk-3",
        "",
    );
    assert_eq!(node.store().durable_credentials().ssid(), "Lab");
    assert_eq!(node.store().durable_credentials().pass(), "");
}

#[test]
fn failed_commit_keeps_previous_record() {
    let mut store = MockStore::with("Office", "hunter22", "Desk-7");
    store.fail_commits = true;
    let mut node = node(store);
    let mut sink = RecordingSink::default();

    let page = request(
        &mut node,
        &mut sink,
        Method::Post,
        "/configure",
        "ssid=Other&pass=x&devId=Desk-8",
    );

    assert_eq!(page.status, 400);
    assert!(sink.contains(&AppEvent::SaveFailed(Error::StoreCommitFailure)));
    assert_eq!(node.credentials().ssid(), "Office");
    assert_eq!(node.store().durable_credentials().ssid(), "Office");
}

#[test]
fn overlong_ssid_is_rejected_before_storage() {
    let mut node = node(MockStore::blank());
    let mut sink = RecordingSink::default();
    let body = format!("ssid={}&pass=x&devId=Desk-1", "A".repeat(33));

    let page = request(&mut node, &mut sink, Method::Post, "/configure", &body);

    assert_eq!(page.status, 400);
    assert_eq!(node.store().commits, 0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::SaveFailed(Error::Store(_)))),
        1
    );
    assert!(!node.credentials().is_configured());
}

#[test]
fn partial_form_shows_form_again() {
    let mut node = node(MockStore::blank());
    let mut sink = RecordingSink::default();

    let page = request(&mut node, &mut sink, Method::Post, "/configure", "ssid=Office");
    assert_eq!(page.status, 200);
    assert!(page.body.contains("<form"));
    assert!(sink.events.is_empty());
}

#[test]
fn reset_requires_confirmation() {
    let mut node = node(MockStore::with("Office", "hunter22", "Desk-7"));
    let mut sink = RecordingSink::default();

    request(&mut node, &mut sink, Method::Get, "/reset", "");
    assert!(node.credentials().is_configured());
    assert!(sink.events.is_empty());

    let page = request(&mut node, &mut sink, Method::Get, "/reset?confirmed=true", "");
    assert_eq!(page.status, 200);
    assert!(sink.contains(&AppEvent::CredentialsReset));
    assert_eq!(node.store().durable_credentials(), Credentials::default());
    assert!(!node.credentials().is_configured());
}

#[test]
fn restart_is_scheduled_not_immediate() {
    let mut node = node(MockStore::blank());
    let mut sink = RecordingSink::default();

    request(&mut node, &mut sink, Method::Get, "/restart", "");
    assert!(!node.restart_due(u64::MAX));

    request(&mut node, &mut sink, Method::Post, "/restart", "confirmed=1");
    assert!(sink.contains(&AppEvent::RestartScheduled { in_ms: 3000 }));
    assert!(!node.restart_due(3_999));
    assert!(node.restart_due(4_000));

    // A second confirmation does not push the deadline out.
    request(&mut node, &mut sink, Method::Get, "/restart?confirmed", "");
    assert_eq!(sink.count(|e| matches!(e, AppEvent::RestartScheduled { .. })), 1);
}

#[test]
fn unknown_paths_and_methods() {
    let mut node = node(MockStore::blank());
    let mut sink = RecordingSink::default();

    let page = request(&mut node, &mut sink, Method::Get, "/favicon.ico", "");
    assert_eq!(page.status, 404);

    let page = request(&mut node, &mut sink, Method::from_name("DELETE"), "/reset", "");
    assert_eq!(page.status, 405);
    assert!(node.credentials() == &Credentials::default());
}

#[test]
fn portal_server_saves_over_http() {
    use std::io::{Read, Write};
    use std::net::TcpStream;

    let mut node = node(MockStore::blank());
    let mut sink = RecordingSink::default();
    let clock = MockClock::default();
    let server = PortalServer::bind_addr("127.0.0.1:0").unwrap();
    let addr = server.local_addr().unwrap();

    let body = "ssid=Office&pass=hunter22&devId=Desk-7";
    let mut stream = TcpStream::connect(addr).unwrap();
    write!(
        stream,
        "POST /configure HTTP/1.1\r\nHost: x\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
    .unwrap();

    let mut served = 0;
    for _ in 0..200 {
        served += server.poll(|req| node.handle_portal(req, &clock, &mut sink));
        if served > 0 {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
    assert_eq!(served, 1);

    let mut reply = String::new();
    stream.read_to_string(&mut reply).unwrap();
    assert!(reply.starts_with("HTTP/1.1 200"));
    assert_eq!(node.store().durable_credentials().ssid(), "Office");
    assert!(sink.contains(&AppEvent::CredentialsSaved));
}
