use std::path::PathBuf;

use thiserror::Error;

const APP_DIR_NAME: &str = "codeyatri-dashboard";

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("platform data-local directory is unavailable")]
    DataLocalDirUnavailable,
}

/// `CY_PROFILE` keeps side-by-side instances in separate directories.
fn resolved_app_dir_name() -> String {
    match std::env::var("CY_PROFILE") {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// On-disk layout under the application data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub data_root: PathBuf,
}

impl AppDirs {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    /// Resolves `<data_local_dir>/codeyatri-dashboard[-<profile>]`.
    pub fn resolve() -> Result<Self, AppDirsError> {
        Self::resolve_from(dirs::data_local_dir())
    }

    fn resolve_from(base: Option<PathBuf>) -> Result<Self, AppDirsError> {
        let base = base.ok_or(AppDirsError::DataLocalDirUnavailable)?;
        Ok(Self::new(base.join(resolved_app_dir_name())))
    }

    pub fn kv_dir(&self) -> PathBuf {
        self.data_root.join("kv")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_root.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static CY_PROFILE_ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_cy_profile<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _guard = CY_PROFILE_ENV_LOCK.lock().unwrap();
        let previous = std::env::var("CY_PROFILE").ok();

        match value {
            Some(profile) => std::env::set_var("CY_PROFILE", profile),
            None => std::env::remove_var("CY_PROFILE"),
        }

        let result = f();

        match previous {
            Some(profile) => std::env::set_var("CY_PROFILE", profile),
            None => std::env::remove_var("CY_PROFILE"),
        }

        result
    }

    #[test]
    fn appends_app_dir_name() {
        with_cy_profile(None, || {
            let dirs = AppDirs::resolve_from(Some(PathBuf::from("/tmp"))).unwrap();
            assert_eq!(dirs.data_root, PathBuf::from("/tmp/codeyatri-dashboard"));
            assert_eq!(dirs.kv_dir(), PathBuf::from("/tmp/codeyatri-dashboard/kv"));
            assert_eq!(dirs.logs_dir(), PathBuf::from("/tmp/codeyatri-dashboard/logs"));
        });
    }

    #[test]
    fn profiles_get_separate_roots() {
        let resolve = || AppDirs::resolve_from(Some(PathBuf::from("/tmp"))).unwrap();
        let a = with_cy_profile(Some("a"), resolve);
        let b = with_cy_profile(Some("b"), resolve);

        assert_eq!(a.data_root, PathBuf::from("/tmp/codeyatri-dashboard-a"));
        assert_eq!(b.data_root, PathBuf::from("/tmp/codeyatri-dashboard-b"));
    }

    #[test]
    fn missing_platform_dir_is_an_error() {
        assert!(matches!(
            AppDirs::resolve_from(None),
            Err(AppDirsError::DataLocalDirUnavailable)
        ));
    }
}
