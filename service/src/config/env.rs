//! Process environment access, injectable so builds stay pure over their inputs.

use std::collections::HashMap;

pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Stored value if non-blank, else the environment variable, else empty.
pub fn resolve(stored: Option<&String>, env: &impl Environment, var: &str) -> String {
    match stored {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => env.var(var).unwrap_or_default(),
    }
}
