use crate::item::repo::{decode, encode, logging_with_default_vec, StoreError};
use crate::item::{Book, MyListRepository};
use std::cell::{Cell, RefCell};
use tracing::error;

/// 프로세스 메모리에 직렬화된 JSON 문자열을 보관하는 저장소
///
/// 파일 저장소와 같은 직렬화를 거치므로 저장/읽기 결과가 동일하다. 저장 횟수를 세기 때문에
/// 테스트에서 쓰기 발생 여부를 확인하는 용도로도 사용한다.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    raw: RefCell<Option<String>>,
    write_count: Cell<usize>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이미 저장된 값이 있는 상태로 만든다. 값의 유효성은 검사하지 않는다.
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: RefCell::new(Some(raw.to_owned())),
            write_count: Cell::new(0),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.write_count.get()
    }

    fn load_books(&self) -> Result<Vec<Book>, StoreError> {
        match self.raw.borrow().as_deref() {
            Some(raw) => decode(serde_json::from_str(raw)?),
            None => Ok(vec![]),
        }
    }

    fn save_books(&self, books: &[Book]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&encode(books)?)?;
        self.raw.replace(Some(raw));
        Ok(())
    }
}

impl MyListRepository for InMemoryRepository {
    fn load(&self) -> Vec<Book> {
        self.load_books()
            .unwrap_or_else(|e| logging_with_default_vec(e))
    }

    fn save(&self, books: &[Book]) {
        self.write_count.set(self.write_count.get() + 1);
        if let Err(e) = self.save_books(books) {
            error!("내 목록을 메모리에 저장하지 못했습니다. {:?}", e);
        }
    }
}
