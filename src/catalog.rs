use crate::item::{Book, CoverImage};
use tracing::warn;

/// 둘러보기 화면에 보여줄 도서 목록을 제공한다.
pub trait CatalogSource {
    fn available_books(&self) -> Vec<Book>;
}

/// 프로그램에 내장된 고정 도서 목록
///
/// (제목, 저자, 표지, 웹사이트)
const CATALOG: [(&str, &str, &str, &str); 5] = [
    (
        "Clean Code",
        "Robert C. Martin",
        "clean_code",
        "https://www.oreilly.com/library/view/clean-code/9780136083238/",
    ),
    (
        "Effective Java (3rd Edition)",
        "Joshua Bloch",
        "effective_java",
        "https://www.oreilly.com/library/view/effective-java-3rd/9780134686097/",
    ),
    (
        "Design Patterns: Elements of Reusable Object-Oriented Software",
        "Erich Gamma, Richard Helm, Ralph Johnson, John Vlissides",
        "design_patterns",
        "https://www.oreilly.com/library/view/design-patterns-elements/0201633612/",
    ),
    (
        "Black Hat Python (2nd Edition)",
        "Justin Seitz, Tim Arnold",
        "blackhatpy",
        "https://nostarch.com/black-hat-python2E",
    ),
    (
        "The Pragmatic Programmer (20th Anniversary Edition)",
        "Andrew Hunt, David Thomas",
        "thepragm",
        "https://pragprog.com/titles/tpp20/the-pragmatic-programmer-20th-anniversary-edition/",
    ),
];

/// 내장 도서 목록을 그대로 반환하는 [`CatalogSource`]
///
/// # Example
/// ```
/// use bookworm::catalog::{CatalogSource, StaticCatalog};
///
/// let books = StaticCatalog.available_books();
/// assert_eq!(books.len(), 5);
/// assert_eq!(books[0].title(), "Clean Code");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl CatalogSource for StaticCatalog {
    fn available_books(&self) -> Vec<Book> {
        CATALOG.iter()
            .filter_map(|(title, author, cover, url)| {
                Book::builder()
                    .title((*title).to_owned())
                    .author((*author).to_owned())
                    .cover_image(CoverImage::new(cover))
                    .website_url((*url).to_owned())
                    .build()
                    .map_err(|e| warn!("도서 목록의 항목을 만들 수 없어 건너뜁니다. ({}) {}", title, e))
                    .ok()
            })
            .collect()
    }
}
