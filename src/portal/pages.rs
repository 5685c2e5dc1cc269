//! Page bodies.  Every interpolated value goes through [`html_escape`].

use super::PortalResponse;
use super::template::{html_escape, render};

const BACK: &str = r#"<a href="/" class="button">Back</a>"#;
const RESTART: &str = r#"<a href="/restart" class="button">Restart</a>"#;

pub fn home(ssid: &str, dev_id: &str) -> PortalResponse {
    let body = format!(
        concat!(
            "<p>SSID: {}</p>",
            "<p>Device ID: {}</p>",
            r#"<a href="/configure" class="button">Configure WiFi</a>"#,
            r#"<a href="/reset" class="button">Factory Reset</a>"#,
            r#"<a href="/restart" class="button">Restart Device</a>"#,
        ),
        html_escape(ssid),
        html_escape(dev_id),
    );
    PortalResponse::ok(render("Desk Occupancy", &body))
}

/// Credential form, prefilled with the stored SSID and device name.
pub fn configure_form(ssid: &str, dev_id: &str) -> PortalResponse {
    let body = format!(
        concat!(
            r#"<form action="/configure" method="post">"#,
            r#"<label for="ssid">SSID*</label>"#,
            r#"<input type="text" class="textbox" id="ssid" name="ssid" maxlength="32" required value="{}">"#,
            r#"<label for="pass">Password</label>"#,
            r#"<input type="password" class="textbox" id="pass" name="pass" maxlength="63">"#,
            r#"<label for="devId">Device name*</label>"#,
            r#"<input type="text" class="textbox" id="devId" name="devId" maxlength="32" required value="{}">"#,
            r#"<input type="submit" class="button" value="Save">"#,
            "</form>",
            "{}",
        ),
        html_escape(ssid),
        html_escape(dev_id),
        BACK,
    );
    PortalResponse::ok(render("Configure device", &body))
}

pub fn configure_saved() -> PortalResponse {
    let body = format!(
        "<p>Configuration settings saved. Restart the device to apply them.</p>{RESTART}{BACK}"
    );
    PortalResponse::ok(render("Configure device", &body))
}

/// Save rejected or not committed.  The stored record is unchanged.
pub fn configure_failed(reason: &str) -> PortalResponse {
    let body = format!(
        concat!(
            r#"<p class="error">Settings were not saved: {}</p>"#,
            r#"<a href="/configure" class="button">Try again</a>"#,
            "{}",
        ),
        html_escape(reason),
        BACK,
    );
    PortalResponse::new(400, render("Configure device", &body))
}

pub fn reset_prompt() -> PortalResponse {
    let body = concat!(
        "<p>Are you sure you want to wipe all settings?</p>",
        r#"<a href="/reset?confirmed=true" class="button">Yes</a>"#,
        r#"<a href="/" class="button">No</a>"#,
    );
    PortalResponse::ok(render("Reset device", body))
}

pub fn reset_done() -> PortalResponse {
    let body = format!(
        "<p>Settings have been reset. A restart is required to apply them.</p>{RESTART}{BACK}"
    );
    PortalResponse::ok(render("Reset device", &body))
}

pub fn reset_failed(reason: &str) -> PortalResponse {
    let body = format!(
        r#"<p class="error">Settings were not reset: {}</p>{}"#,
        html_escape(reason),
        BACK
    );
    PortalResponse::new(500, render("Reset device", &body))
}

pub fn restart_prompt() -> PortalResponse {
    let body = concat!(
        "<p>Are you sure you want to restart the device?</p>",
        r#"<a href="/restart?confirmed=true" class="button">Yes</a>"#,
        r#"<a href="/" class="button">No</a>"#,
    );
    PortalResponse::ok(render("Restart device", body))
}

pub fn restarting() -> PortalResponse {
    let body =
        format!("<p>Device is being restarted. You may have to reconnect with it.</p>{BACK}");
    PortalResponse::ok(render("Restart device", &body))
}

pub fn not_found(path: &str) -> PortalResponse {
    let body = format!("<p>No page at {}</p>{}", html_escape(path), BACK);
    PortalResponse::new(404, render("Not found", &body))
}

pub fn method_not_allowed() -> PortalResponse {
    PortalResponse::new(405, render("Method not allowed", BACK))
}
