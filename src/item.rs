pub mod repo;

use chrono::{DateTime, Local, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Item 모듈에서 사용할 에러 열거
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// 필수 데이터가 입력 되지 않음
    RequireArgumentMissing(String),
}

impl Display for ItemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ItemError {}

/// 도서 표지 이미지 식별자
///
/// 실제 이미지로 변환하는 것은 화면 쪽의 일이며, 여기서는 불투명한 토큰으로만 다룬다.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct CoverImage(String);

impl CoverImage {
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CoverImage {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 도서
///
/// 제목, 저자, 표지, 웹사이트는 생성 이후 변경 되지 않으며 반납일만 한번 설정 될 수 있다.
/// 반납일은 epoch 밀리초로 저장되며 0은 반납일이 설정 되지 않았음을 뜻한다.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Book {
    title: String,
    author: String,
    cover_image: CoverImage,
    website_url: String,
    return_date_millis: i64,
}

impl Book {
    pub fn builder() -> BookBuilder {
        BookBuilder::new()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn cover_image(&self) -> &CoverImage {
        &self.cover_image
    }

    pub fn website_url(&self) -> &str {
        &self.website_url
    }

    pub fn return_date_millis(&self) -> i64 {
        self.return_date_millis
    }

    pub fn has_return_date(&self) -> bool {
        self.return_date_millis > 0
    }

    /// 설정된 반납일을 로컬 날짜로 변환한다. 반납일이 없으면 [`None`]
    pub fn return_date(&self) -> Option<NaiveDate> {
        if !self.has_return_date() {
            return None;
        }
        DateTime::from_timestamp_millis(self.return_date_millis)
            .map(|utc| utc.with_timezone(&Local).date_naive())
    }

    /// 대소문자를 구분하지 않고 제목이 같은지 확인한다. 저자와 표지는 비교하지 않는다.
    ///
    /// # Example
    /// ```
    /// use bookworm::item::Book;
    ///
    /// let a = Book::builder().title("Clean Code".to_owned()).author("Robert C. Martin".to_owned()).build().unwrap();
    /// let b = Book::builder().title("clean code".to_owned()).author("someone else".to_owned()).build().unwrap();
    /// assert!(a.is_same_title(&b));
    /// ```
    pub fn is_same_title(&self, other: &Book) -> bool {
        // 문자 단위로 소문자 변환해 비교한다. str::to_lowercase는 문맥에 따라 시그마를 바꾼다.
        self.title.chars().flat_map(char::to_lowercase)
            .eq(other.title.chars().flat_map(char::to_lowercase))
    }

    pub(crate) fn set_return_date_millis(&mut self, millis: i64) {
        self.return_date_millis = millis;
    }

    pub fn to_builder(&self) -> BookBuilder {
        BookBuilder::new()
            .title(self.title.clone())
            .author(self.author.clone())
            .cover_image(self.cover_image.clone())
            .website_url(self.website_url.clone())
            .return_date_millis(self.return_date_millis)
    }
}

/// Book 빌더
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BookBuilder {
    title: Option<String>,
    author: Option<String>,
    cover_image: Option<CoverImage>,
    website_url: Option<String>,
    return_date_millis: Option<i64>,
}

impl BookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    pub fn author(mut self, author: String) -> Self {
        self.author = Some(author);
        self
    }

    pub fn cover_image(mut self, cover_image: CoverImage) -> Self {
        self.cover_image = Some(cover_image);
        self
    }

    pub fn website_url(mut self, website_url: String) -> Self {
        self.website_url = Some(website_url);
        self
    }

    pub fn return_date_millis(mut self, millis: i64) -> Self {
        self.return_date_millis = Some(millis);
        self
    }

    pub fn build(self) -> Result<Book, ItemError> {
        let title = self.title
            .filter(|t| !t.trim().is_empty())
            .ok_or(ItemError::RequireArgumentMissing("title".to_owned()))?;
        let author = self.author.ok_or(ItemError::RequireArgumentMissing("author".to_owned()))?;

        Ok(Book {
            title,
            author,
            cover_image: self.cover_image.unwrap_or_default(),
            website_url: self.website_url.unwrap_or_default(),
            // 음수는 "설정 안됨"과 같게 취급한다.
            return_date_millis: self.return_date_millis.unwrap_or(0).max(0),
        })
    }
}

/// 내 도서 목록 저장소
///
/// 저장소 오류는 호출자에게 전파하지 않는다. 읽기에 실패하면 빈 목록을, 쓰기에 실패하면 로그만 남긴다.
pub trait MyListRepository {

    /// 저장된 목록 전체를 읽는다. 저장된 값이 없거나 파싱할 수 없으면 빈 목록을 반환한다.
    fn load(&self) -> Vec<Book>;

    /// 전달 받은 목록 전체로 저장된 값을 덮어쓴다.
    fn save(&self, books: &[Book]);
}

impl<R: MyListRepository + ?Sized> MyListRepository for Rc<R> {
    fn load(&self) -> Vec<Book> {
        (**self).load()
    }

    fn save(&self, books: &[Book]) {
        (**self).save(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str) -> Book {
        Book::builder()
            .title(title.to_owned())
            .author("author".to_owned())
            .build()
            .unwrap()
    }

    #[test]
    fn build_without_title_fails() {
        let result = Book::builder().author("Joshua Bloch".to_owned()).build();
        assert_eq!(result, Err(ItemError::RequireArgumentMissing("title".to_owned())));
    }

    #[test]
    fn build_with_blank_title_fails() {
        let result = Book::builder()
            .title("   ".to_owned())
            .author("Joshua Bloch".to_owned())
            .build();
        assert_eq!(result, Err(ItemError::RequireArgumentMissing("title".to_owned())));
    }

    #[test]
    fn build_without_author_fails() {
        let result = Book::builder().title("Effective Java".to_owned()).build();
        assert_eq!(result, Err(ItemError::RequireArgumentMissing("author".to_owned())));
    }

    #[test]
    fn new_book_has_no_return_date() {
        let b = book("Clean Code");
        assert_eq!(b.return_date_millis(), 0);
        assert!(!b.has_return_date());
        assert_eq!(b.return_date(), None);
        assert_eq!(b.website_url(), "");
    }

    #[test]
    fn negative_return_date_is_treated_as_unset() {
        let b = book("Clean Code").to_builder().return_date_millis(-5).build().unwrap();
        assert_eq!(b.return_date_millis(), 0);
    }

    #[test]
    fn return_date_is_local_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let midnight = day.and_hms_opt(0, 0, 0).unwrap()
            .and_local_timezone(Local)
            .earliest()
            .unwrap();
        let b = book("Clean Code")
            .to_builder()
            .return_date_millis(midnight.timestamp_millis())
            .build()
            .unwrap();

        assert_eq!(b.return_date(), Some(day));
    }

    #[test]
    fn title_comparison_ignores_case_only() {
        assert!(book("Clean Code").is_same_title(&book("CLEAN CODE")));
        assert!(!book("Clean Code").is_same_title(&book("Clean Coder")));
    }

    #[test]
    fn title_comparison_is_per_character() {
        assert!(book("ΟΔΟΣ").is_same_title(&book("οδοσ")));
        assert!(book("οδοσ").is_same_title(&book("ΟΔΟΣ")));
        assert!(book("Ärger").is_same_title(&book("ÄRGER")));
    }

    #[test]
    fn to_builder_keeps_every_field() {
        let original = Book::builder()
            .title("Black Hat Python (2nd Edition)".to_owned())
            .author("Justin Seitz, Tim Arnold".to_owned())
            .cover_image(CoverImage::new("blackhatpy"))
            .website_url("https://nostarch.com/black-hat-python2E".to_owned())
            .return_date_millis(1_700_000_000_000)
            .build()
            .unwrap();

        assert_eq!(original.to_builder().build().unwrap(), original);
    }
}
