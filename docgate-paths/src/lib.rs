//! XDG Base Directory paths for docgate.
//!
//! Policy files follow XDG paths on every platform, the same way tools like
//! gh and kubectl lay out their config.

use std::path::PathBuf;

/// File name of a policy inside a config directory
pub const POLICY_FILE: &str = "policy.toml";

/// Get the docgate config directory.
///
/// Returns `$XDG_CONFIG_HOME/docgate` if set, otherwise `~/.config/docgate`.
///
/// # Examples
///
/// ```
/// use docgate_paths::config_dir;
///
/// let config = config_dir();
/// let policy = config.join("policy.toml");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("docgate")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/docgate")
    } else {
        PathBuf::from(".config/docgate")
    }
}

/// Path of the user-wide policy file
pub fn user_policy_path() -> PathBuf {
    config_dir().join(POLICY_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_docgate() {
        let path = config_dir();
        assert!(
            path.ends_with("docgate"),
            "config_dir should end with 'docgate'"
        );
    }

    #[test]
    fn test_user_policy_path_file_name() {
        let path = user_policy_path();
        assert_eq!(path.file_name().unwrap(), POLICY_FILE);
    }

    #[test]
    fn test_config_dir_respects_xdg_env() {
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/tmp/test-config");
        }
        let path = config_dir();
        assert_eq!(path, PathBuf::from("/tmp/test-config/docgate"));
        unsafe {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }
}
