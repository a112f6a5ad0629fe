/// Control-surface route table. The handler resolves the incoming method and
/// path to one variant up front; everything that does not match falls through
/// to `Unknown` and becomes a 404.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRoute {
    Banner,
    Status,
    Start,
    Stop,
    SyncDns,
    Preflight,
    Unknown,
}

pub fn resolve_control_route(method: &str, path: &str) -> ControlRoute {
    if method == "OPTIONS" {
        return ControlRoute::Preflight;
    }
    match (method, path) {
        ("GET", "/") => ControlRoute::Banner,
        ("GET", "/status") => ControlRoute::Status,
        ("GET" | "POST", "/start") => ControlRoute::Start,
        ("GET" | "POST", "/stop") => ControlRoute::Stop,
        ("GET" | "POST", "/syncdns") => ControlRoute::SyncDns,
        _ => ControlRoute::Unknown,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldsRoute {
    Index,
    World { world: String },
    Map { world: String, map: String },
    Preflight,
    Unknown,
}

pub fn resolve_worlds_route(method: &str, path: &str) -> WorldsRoute {
    if method == "OPTIONS" {
        return WorldsRoute::Preflight;
    }
    if method != "GET" {
        return WorldsRoute::Unknown;
    }
    if path == "/api/worlds" {
        return WorldsRoute::Index;
    }
    let Some(rest) = path.strip_prefix("/api/worlds/") else {
        return WorldsRoute::Unknown;
    };
    let mut segments = rest.split('/');
    let world = segments.next().unwrap_or_default();
    if world.is_empty() {
        return WorldsRoute::Unknown;
    }
    match (segments.next(), segments.next()) {
        (None, _) => WorldsRoute::World {
            world: world.to_string(),
        },
        (Some(map), None) if !map.is_empty() => WorldsRoute::Map {
            world: world.to_string(),
            map: map.to_string(),
        },
        _ => WorldsRoute::Unknown,
    }
}
