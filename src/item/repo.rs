use crate::item::{Book, CoverImage, ItemError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use tracing::warn;

mod json;
mod memory;

pub use json::JsonPrefsRepository;
pub use memory::InMemoryRepository;

/// 내 목록을 저장하는 기본 네임스페이스
pub const PREFS_NAMESPACE: &str = "bookworm_prefs";

/// 네임스페이스 안에서 내 목록이 저장 되는 키
pub const MY_LIST_KEY: &str = "my_list_books";

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// 저장된 값이 예상한 JSON 구조가 아님
    Malformed(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "io error, {}", e),
            StoreError::Json(e) => write!(f, "json error, {}", e),
            StoreError::Malformed(message) => write!(f, "malformed value, {}", message),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        StoreError::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        StoreError::Json(value)
    }
}

/// 저장소에 기록 되는 도서 한 건의 형태
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookEntity {
    title: String,
    author: String,
    #[serde(default)]
    cover_image_res_id: String,
    #[serde(default)]
    website_url: String,
    #[serde(default)]
    return_date_millis: i64,
}

impl BookEntity {
    fn to_domain(self) -> Result<Book, ItemError> {
        Book::builder()
            .title(self.title)
            .author(self.author)
            .cover_image(CoverImage::from(self.cover_image_res_id))
            .website_url(self.website_url)
            .return_date_millis(self.return_date_millis)
            .build()
    }
}

impl From<&Book> for BookEntity {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title().to_owned(),
            author: book.author().to_owned(),
            cover_image_res_id: book.cover_image().as_str().to_owned(),
            website_url: book.website_url().to_owned(),
            return_date_millis: book.return_date_millis(),
        }
    }
}

fn encode(books: &[Book]) -> Result<serde_json::Value, StoreError> {
    let entities: Vec<BookEntity> = books.iter().map(BookEntity::from).collect();
    Ok(serde_json::to_value(entities)?)
}

fn decode(value: serde_json::Value) -> Result<Vec<Book>, StoreError> {
    let entities: Vec<BookEntity> = serde_json::from_value(value)?;

    let books = entities.into_iter()
        .filter_map(|entity| entity.to_domain()
            .map_err(|e| warn!("저장된 도서 중 유효하지 않은 항목을 건너뜁니다. {}", e))
            .ok())
        .collect();
    Ok(books)
}

fn logging_with_default_vec<E, R>(e: E) -> Vec<R>
where
    E: Debug
{
    warn!("내 목록을 읽지 못해 빈 목록으로 대체합니다. {:?}", e);
    vec![]
}
