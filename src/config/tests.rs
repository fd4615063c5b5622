use super::load::{default_config_path, resolve_config_path};
use super::schema::Settings;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn defaults_are_sane() {
    let s = Settings::default();
    assert_eq!(s.library.extension, "wav");
    assert_eq!(s.audio.chunk_samples, 4096);
    assert!(s.audio.gain_floor_db < s.audio.gain_ceiling_db);
    assert!(s.playback.gain_step > 0.0);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_chunk() {
    let mut s = Settings::default();
    s.audio.chunk_samples = 0;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_inverted_gain_range() {
    let mut s = Settings::default();
    s.audio.gain_floor_db = 3.0;
    s.audio.gain_ceiling_db = -3.0;
    assert!(s.validate().is_err());
}

#[test]
fn resolve_config_path_prefers_shufflebox_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SHUFFLEBOX_CONFIG_PATH", "/tmp/shufflebox-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/shufflebox-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home/shufflebox/config.toml")
    );
}

#[test]
fn env_overrides_take_effect() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SHUFFLEBOX_CONFIG_PATH", "/nonexistent/shufflebox.toml");
    let _g2 = EnvGuard::set("SHUFFLEBOX__LIBRARY__EXTENSION", "flac");
    let _g3 = EnvGuard::remove("SHUFFLEBOX__AUDIO__CHUNK_SAMPLES");

    let s = Settings::load().expect("settings should load from env");
    assert_eq!(s.library.extension, "flac");
    assert_eq!(s.audio.chunk_samples, 4096);
}
