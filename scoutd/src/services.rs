use once_cell::sync::OnceCell;
use tracing::warn;

use crate::config::ServerConfig;
use crate::search::SearchService;

pub struct Services {
    server: ServerConfig,
    search: SearchService,
}

impl Services {
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }
}

static SERVICES: OnceCell<Services> = OnceCell::new();

/// Install the process-wide services. Returns false if they were already set;
/// the first installation wins.
pub fn init(server: ServerConfig, search: SearchService) -> bool {
    let ok = SERVICES.set(Services { server, search }).is_ok();
    if !ok {
        warn!(target: "scoutd::services", "services already initialized; keeping the first instance");
    }
    ok
}

pub fn try_services() -> Option<&'static Services> {
    SERVICES.get()
}
