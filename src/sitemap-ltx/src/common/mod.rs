pub mod logging;

pub use logging::setup_logging;

/// True if the environment variable is set and not empty (ignoring whitespace). False otherwise.
pub fn is_env_set(env_var: &str) -> bool {
    match std::env::var(env_var) {
        Ok(val) => !val.trim().is_empty(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_env_set_missing_variable() {
        assert!(!is_env_set("SITEMAP_LTX_SURELY_UNSET_VARIABLE_9F2C"));
    }
}
