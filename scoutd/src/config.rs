use std::time::Duration;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_UPSTREAM_BASE: &str = "https://www.linkedin.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Front door settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
    pub search_rate: usize,       // 5 requests
    pub search_window: Duration,  // per 60s, per client ip
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            search_rate: 5,
            search_window: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// - SCOUT_ADDR (default 127.0.0.1:8000)
    /// - SCOUT_SEARCH_RATE (default 5)
    /// - SCOUT_SEARCH_WINDOW (seconds, default 60)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(addr) = env_string("SCOUT_ADDR") {
            cfg.addr = addr;
        }
        cfg.search_rate = parse_env_usize("SCOUT_SEARCH_RATE", cfg.search_rate);
        cfg.search_window =
            Duration::from_secs(parse_env_u64("SCOUT_SEARCH_WINDOW", cfg.search_window.as_secs()));
        cfg
    }
}

/// Crawl policy and upstream constants, injected into the crawler.
#[derive(Clone, Debug)]
pub struct CrawlConfig {
    pub upstream_base: String,
    pub user_agent: String,

    /// Entries the upstream returns for a full listing page; fewer means last page.
    pub page_size: usize, // 25
    pub default_max_results: usize, // 10
    pub max_results_limit: usize,   // 50

    /// Randomized pause between consecutive detail fetches.
    pub pace_min: Duration, // 1s
    pub pace_max: Duration, // 2s

    pub request_timeout: Duration, // 15s
    /// Retries for transient transport errors only; non-2xx answers are never retried.
    pub retry_max: usize, // 2
    pub retry_base_backoff: Duration, // 250ms

    /// Wall-clock budget for one crawl session.
    pub crawl_budget: Duration, // 120s
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            upstream_base: DEFAULT_UPSTREAM_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_size: 25,
            default_max_results: 10,
            max_results_limit: 50,
            pace_min: Duration::from_millis(1_000),
            pace_max: Duration::from_millis(2_000),
            request_timeout: Duration::from_millis(15_000),
            retry_max: 2,
            retry_base_backoff: Duration::from_millis(250),
            crawl_budget: Duration::from_secs(120),
        }
    }
}

impl CrawlConfig {
    /// - SCOUT_UPSTREAM_BASE (default https://www.linkedin.com)
    /// - SCOUT_USER_AGENT (default browser-like UA)
    /// - SCOUT_PAGE_SIZE (default 25)
    /// - SCOUT_DEFAULT_MAX_RESULTS (default 10)
    /// - SCOUT_MAX_RESULTS_LIMIT (default 50)
    /// - SCOUT_PACE_MIN_MS / SCOUT_PACE_MAX_MS (default 1000 / 2000)
    /// - SCOUT_REQUEST_TIMEOUT_MS (default 15000)
    /// - SCOUT_RETRY_MAX (default 2)
    /// - SCOUT_RETRY_BASE_BACKOFF_MS (default 250)
    /// - SCOUT_CRAWL_BUDGET_SECS (default 120)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(base) = env_string("SCOUT_UPSTREAM_BASE") {
            cfg.upstream_base = base;
        }
        if let Some(ua) = env_string("SCOUT_USER_AGENT") {
            cfg.user_agent = ua;
        }
        cfg.page_size = parse_env_usize("SCOUT_PAGE_SIZE", cfg.page_size);
        cfg.default_max_results =
            parse_env_usize("SCOUT_DEFAULT_MAX_RESULTS", cfg.default_max_results);
        cfg.max_results_limit = parse_env_usize("SCOUT_MAX_RESULTS_LIMIT", cfg.max_results_limit);

        cfg.pace_min = Duration::from_millis(parse_env_u64(
            "SCOUT_PACE_MIN_MS",
            cfg.pace_min.as_millis() as u64,
        ));
        cfg.pace_max = Duration::from_millis(parse_env_u64(
            "SCOUT_PACE_MAX_MS",
            cfg.pace_max.as_millis() as u64,
        ));
        cfg.request_timeout = Duration::from_millis(
            parse_env_u64("SCOUT_REQUEST_TIMEOUT_MS", cfg.request_timeout.as_millis() as u64)
                .clamp(500, 120_000),
        );
        cfg.retry_max = parse_env_usize("SCOUT_RETRY_MAX", cfg.retry_max).min(10);
        cfg.retry_base_backoff = Duration::from_millis(parse_env_u64(
            "SCOUT_RETRY_BASE_BACKOFF_MS",
            cfg.retry_base_backoff.as_millis() as u64,
        ));
        cfg.crawl_budget = Duration::from_secs(parse_env_u64(
            "SCOUT_CRAWL_BUDGET_SECS",
            cfg.crawl_budget.as_secs(),
        ));

        cfg.sanitized()
    }

    /// Repair inconsistent combinations instead of failing startup.
    pub fn sanitized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self.max_results_limit = self.max_results_limit.max(1);
        self.default_max_results = self.default_max_results.clamp(1, self.max_results_limit);
        if self.pace_max < self.pace_min {
            self.pace_max = self.pace_min;
        }
        self.upstream_base = self.upstream_base.trim_end_matches('/').to_string();
        self
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_repairs_inverted_pacing_and_zero_sizes() {
        let cfg = CrawlConfig {
            page_size: 0,
            default_max_results: 500,
            max_results_limit: 20,
            pace_min: Duration::from_millis(900),
            pace_max: Duration::from_millis(100),
            upstream_base: "https://jobs.example/".into(),
            ..CrawlConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.page_size, 1);
        assert_eq!(cfg.default_max_results, 20);
        assert_eq!(cfg.pace_max, cfg.pace_min);
        assert_eq!(cfg.upstream_base, "https://jobs.example");
    }

    #[test]
    fn defaults_match_upstream_constants() {
        let cfg = CrawlConfig::default();
        assert_eq!(cfg.page_size, 25);
        assert_eq!(cfg.default_max_results, 10);
        assert_eq!(cfg.pace_min, Duration::from_secs(1));
        assert_eq!(cfg.pace_max, Duration::from_secs(2));
    }
}
