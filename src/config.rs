pub mod log;

use crate::item::repo::PREFS_NAMESPACE;
use serde::Deserialize;
use std::env;

/// 내 목록 저장 위치
#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    dir: String,
    namespace: String,
}

impl Storage {
    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    storage: Storage,
    logger: Option<log::Config>,
}

impl AppConfig {
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn logger(&self) -> Option<&log::Config> {
        self.logger.as_ref()
    }

    /// 명령행에서 받은 저장 디렉토리로 설정을 덮어쓴다.
    pub fn override_storage_dir(&mut self, dir: String) {
        self.storage.dir = dir;
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// `RUN_MODE` 환경 변수(기본값 development)에 해당하는 `config/<RUN_MODE>.json`을 읽는다.
pub fn load_config() -> Result<AppConfig, config::ConfigError> {
    let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
    load_config_from(&format!("config/{}.json", env))
}

/// 설정 파일을 읽는다. 파일이 없거나 값이 빠져 있으면 기본값을 사용한다.
pub fn load_config_from(path: &str) -> Result<AppConfig, config::ConfigError> {
    let config = config::Config::builder()
        .set_default("storage.dir", "data")?
        .set_default("storage.namespace", PREFS_NAMESPACE)?
        .add_source(config::File::with_name(path).required(false))
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let config = load_config_from(path.to_str().unwrap()).unwrap();

        assert_eq!(config.storage().dir(), "data");
        assert_eq!(config.storage().namespace(), "bookworm_prefs");
        assert!(config.logger().is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.json");
        fs::write(&path, r#"{
            "storage": { "dir": "/var/lib/bookworm" },
            "logger": { "dir": "logs", "name": "bookworm", "level": "INFO" }
        }"#).unwrap();

        let config = load_config_from(path.to_str().unwrap()).unwrap();

        assert_eq!(config.storage().dir(), "/var/lib/bookworm");
        assert_eq!(config.storage().namespace(), "bookworm_prefs");
        assert_eq!(config.logger().map(|l| l.name()), Some("bookworm"));
    }

    #[test]
    fn override_storage_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = load_config_from(dir.path().join("absent.json").to_str().unwrap()).unwrap();

        config.override_storage_dir("elsewhere".to_owned());

        assert_eq!(config.storage().dir(), "elsewhere");
    }
}
