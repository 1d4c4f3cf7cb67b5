//! Process-wide AMap security configuration.
//!
//! The SDK reads its security code from shared global state that must be
//! populated before the first load. It is written at most once; later
//! injections keep the first value.

use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    pub security_js_code: String,
}

static SECURITY_CONFIG: OnceLock<SecurityConfig> = OnceLock::new();

/// Install the security code unless one is already present.
///
/// Returns `true` only for the call that performed the write.
pub fn inject_security_config(security_js_code: &str) -> bool {
    let mut injected = false;
    SECURITY_CONFIG.get_or_init(|| {
        injected = true;
        SecurityConfig {
            security_js_code: security_js_code.to_string(),
        }
    });

    if injected {
        tracing::info!("[AMap] Security config injected");
    }
    injected
}

pub fn security_config() -> Option<&'static SecurityConfig> {
    SECURITY_CONFIG.get()
}
