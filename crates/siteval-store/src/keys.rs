//! Option keys used by SiteVal.

/// Option holding the URL validation queue (hash → `{url, type}`).
pub const URL_VALIDATION_QUEUE: &str = "amp_url_validation_queue";

/// Option holding actions recorded for the running worker to dispatch.
pub const PENDING_ACTIONS: &str = "siteval_pending_actions";
