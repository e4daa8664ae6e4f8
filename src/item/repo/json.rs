use crate::item::repo::{decode, encode, logging_with_default_vec, StoreError, MY_LIST_KEY};
use crate::item::{Book, MyListRepository};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

type Prefs = Map<String, Value>;

/// 네임스페이스 이름의 JSON 파일(`<dir>/<namespace>.json`)을 키-값 저장소로 사용한다.
///
/// 파일은 JSON 오브젝트이며 내 목록은 [`MY_LIST_KEY`] 키 아래 배열로 저장 된다.
/// 같은 파일의 다른 키들은 저장시 그대로 유지된다.
pub struct JsonPrefsRepository {
    path: PathBuf,
    key: String,
}

impl JsonPrefsRepository {
    pub fn new<P: AsRef<Path>>(dir: P, namespace: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", namespace)),
            key: MY_LIST_KEY.to_owned(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_prefs(&self) -> Result<Prefs, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Prefs::new()),
            Err(e) => return Err(StoreError::from(e)),
        };

        match serde_json::from_str::<Value>(&text)? {
            Value::Object(prefs) => Ok(prefs),
            other => Err(StoreError::Malformed(format!("expected object but {}", other))),
        }
    }

    fn write_prefs(&self, prefs: &Prefs) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // 임시 파일에 먼저 기록한 후 교체하여 중간에 끊겨도 기존 파일이 깨지지 않도록 한다.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(prefs)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn load_books(&self) -> Result<Vec<Book>, StoreError> {
        let mut prefs = self.read_prefs()?;
        match prefs.remove(&self.key) {
            Some(value) => decode(value),
            None => Ok(vec![]),
        }
    }

    fn save_books(&self, books: &[Book]) -> Result<(), StoreError> {
        let mut prefs = self.read_prefs().unwrap_or_else(|e| {
            info!("기존 설정 파일을 읽을 수 없어 새로 작성합니다. ({}) {}", self.path.display(), e);
            Prefs::new()
        });
        prefs.insert(self.key.clone(), encode(books)?);
        self.write_prefs(&prefs)
    }
}

impl MyListRepository for JsonPrefsRepository {
    fn load(&self) -> Vec<Book> {
        let books = self.load_books()
            .unwrap_or_else(|e| logging_with_default_vec(e));
        debug!("{}에서 도서 {}권을 읽었습니다.", self.path.display(), books.len());
        books
    }

    fn save(&self, books: &[Book]) {
        match self.save_books(books) {
            Ok(()) => debug!("{}에 도서 {}권을 저장했습니다.", self.path.display(), books.len()),
            Err(e) => error!("내 목록을 저장하지 못했습니다. ({}) {:?}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::repo::PREFS_NAMESPACE;
    use crate::item::CoverImage;
    use serde_json::json;

    fn book(title: &str, return_date_millis: i64) -> Book {
        Book::builder()
            .title(title.to_owned())
            .author("author".to_owned())
            .cover_image(CoverImage::new("cover"))
            .website_url(format!("https://example.com/{}", title.len()))
            .return_date_millis(return_date_millis)
            .build()
            .unwrap()
    }

    #[test]
    fn load_without_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonPrefsRepository::new(dir.path(), PREFS_NAMESPACE);

        assert!(repository.load().is_empty());
        assert!(!repository.path().exists());
    }

    #[test]
    fn save_then_load_keeps_order_and_dates() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonPrefsRepository::new(dir.path().join("nested"), PREFS_NAMESPACE);
        let books = vec![
            book("Clean Code", 0),
            book("Effective Java (3rd Edition)", 1_760_000_000_000),
            book("Design Patterns", 0),
        ];

        repository.save(&books);

        assert_eq!(repository.load(), books);
        // 다른 인스턴스(재시작)에서도 같은 값을 읽는다.
        assert_eq!(JsonPrefsRepository::new(dir.path().join("nested"), PREFS_NAMESPACE).load(), books);
    }

    #[test]
    fn save_empty_list_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonPrefsRepository::new(dir.path(), PREFS_NAMESPACE);

        repository.save(&[book("Clean Code", 0)]);
        repository.save(&[]);

        assert!(repository.load().is_empty());
        assert!(repository.path().exists());
    }

    #[test]
    fn corrupted_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonPrefsRepository::new(dir.path(), PREFS_NAMESPACE);
        fs::write(repository.path(), "{ not json").unwrap();

        assert!(repository.load().is_empty());
    }

    #[test]
    fn wrong_shape_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonPrefsRepository::new(dir.path(), PREFS_NAMESPACE);
        fs::write(repository.path(), r#"{ "my_list_books": "oops" }"#).unwrap();

        assert!(repository.load().is_empty());
    }

    #[test]
    fn save_overwrites_corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonPrefsRepository::new(dir.path(), PREFS_NAMESPACE);
        fs::write(repository.path(), "[1, 2, 3]").unwrap();

        repository.save(&[book("Clean Code", 0)]);

        assert_eq!(repository.load(), vec![book("Clean Code", 0)]);
    }

    #[test]
    fn other_keys_survive_save() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonPrefsRepository::new(dir.path(), PREFS_NAMESPACE);
        fs::write(repository.path(), r#"{ "theme": "dark" }"#).unwrap();

        repository.save(&[book("Clean Code", 0)]);

        let text = fs::read_to_string(repository.path()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["theme"], json!("dark"));
        assert_eq!(value[MY_LIST_KEY][0]["title"], json!("Clean Code"));
    }
}
