//! Request → route resolution for the configuration portal.
//!
//! | Path         | Without args       | With args                          |
//! |--------------|--------------------|------------------------------------|
//! | `/`          | home               | home                               |
//! | `/configure` | credentials form   | `ssid`+`pass`+`devId` → save       |
//! | `/reset`     | confirmation page  | `confirmed` → wipe credentials     |
//! | `/restart`   | confirmation page  | `confirmed` → delayed restart      |
//! | anything else| 404                |                                    |
//!
//! Arguments are accepted from the query string or an urlencoded body,
//! so both GET links and POST forms reach the same routes.

use super::form::FormArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

impl Method {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("GET") {
            Self::Get
        } else if name.eq_ignore_ascii_case("POST") {
            Self::Post
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalRequest {
    pub method: Method,
    pub path: String,
    pub args: FormArgs,
}

impl PortalRequest {
    /// Split `url` into path and query and merge the body arguments.
    pub fn parse(method: Method, url: &str, body: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self {
            method,
            path: path.into(),
            args: FormArgs::parse(query, body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalRoute {
    Home,
    ConfigureForm,
    ConfigureSubmit {
        ssid: String,
        pass: String,
        dev_id: String,
    },
    ResetPrompt,
    ResetConfirmed,
    RestartPrompt,
    RestartConfirmed,
    MethodNotAllowed,
    NotFound,
}

pub fn resolve(req: &PortalRequest) -> PortalRoute {
    if req.method == Method::Other {
        return PortalRoute::MethodNotAllowed;
    }
    let args = &req.args;
    match req.path.as_str() {
        "/" => PortalRoute::Home,
        "/configure" => match (args.get("ssid"), args.get("pass"), args.get("devId")) {
            (Some(ssid), Some(pass), Some(dev_id)) => PortalRoute::ConfigureSubmit {
                ssid: ssid.into(),
                pass: pass.into(),
                dev_id: dev_id.into(),
            },
            _ => PortalRoute::ConfigureForm,
        },
        "/reset" if args.has("confirmed") => PortalRoute::ResetConfirmed,
        "/reset" => PortalRoute::ResetPrompt,
        "/restart" if args.has("confirmed") => PortalRoute::RestartConfirmed,
        "/restart" => PortalRoute::RestartPrompt,
        _ => PortalRoute::NotFound,
    }
}
