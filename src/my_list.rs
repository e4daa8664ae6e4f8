use crate::item::{Book, MyListRepository};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use std::fmt;
use std::fmt::{Display, Formatter};
use tracing::{debug, info};

/// 하루를 밀리초로 나타낸 값
pub const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// 반납일로부터 이 일수 이상 지나면 연체료가 부과 된다.
pub const FINE_AFTER_DAYS: i64 = 10;

/// 연체된 도서 한 권당 부과되는 연체료(달러). 연체 일수와 관계 없이 고정이다.
pub const LATE_FINE_DOLLARS: u32 = 10;

/// 현재 시각을 제공한다.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// 시스템 시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 항상 같은 시각을 반환하는 시계
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 총 연체료가 바뀌었을 때 알림을 받는다.
pub trait FineListener {
    fn on_fine_changed(&self, total_fine: u32);
}

impl<T> FineListener for T where T: Fn(u32) {
    fn on_fine_changed(&self, total_fine: u32) {
        self(total_fine)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AddBookResult {
    Added,
    /// 같은 제목(대소문자 무시)의 도서가 이미 목록에 있음
    AlreadyExists,
}

impl AddBookResult {
    pub fn message(&self) -> &'static str {
        match self {
            AddBookResult::Added => "Added to My List!",
            AddBookResult::AlreadyExists => "This book is already in your list.",
        }
    }
}

impl Display for AddBookResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SetReturnDateResult {
    Updated { total_fine: u32 },
    IndexOutOfRange,
    /// 반납일은 한번만 설정할 수 있다.
    AlreadyHasDate,
}

impl SetReturnDateResult {
    /// 사용자에게 보여줄 메시지. 범위를 벗어난 요청은 조용히 무시하므로 [`None`]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SetReturnDateResult::Updated { .. } => Some("Reminder saved. We'll warn you if you're late."),
            SetReturnDateResult::AlreadyHasDate => Some("A reminder is already set for this book."),
            SetReturnDateResult::IndexOutOfRange => None,
        }
    }
}

/// 범위를 벗어난 요청은 빈 문자열로 표시된다.
impl Display for SetReturnDateResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ReturnBookResult {
    Removed { total_fine: u32 },
    IndexOutOfRange,
}

impl ReturnBookResult {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ReturnBookResult::Removed { .. } => Some("Book returned and removed from your list."),
            ReturnBookResult::IndexOutOfRange => None,
        }
    }
}

impl Display for ReturnBookResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message().unwrap_or_default())
    }
}

/// 목록 전체의 연체료를 계산한다.
///
/// 반납일이 설정된 도서마다 `(now - 반납일) / 하루` 를 정수 나눗셈(버림)으로 구해 연체 일수로 쓰며,
/// 달력상의 날짜 차이가 아니다. 연체 일수가 [`FINE_AFTER_DAYS`] 이상이면 [`LATE_FINE_DOLLARS`]가 더해진다.
///
/// # Example
/// ```
/// use bookworm::item::Book;
/// use bookworm::my_list::{calculate_total_fine, MILLIS_PER_DAY};
///
/// let now = 1_760_000_000_000;
/// let late = Book::builder()
///     .title("Clean Code".to_owned())
///     .author("Robert C. Martin".to_owned())
///     .return_date_millis(now - 10 * MILLIS_PER_DAY)
///     .build()
///     .unwrap();
///
/// assert_eq!(calculate_total_fine(&[late], now), 10);
/// ```
pub fn calculate_total_fine(books: &[Book], now_millis: i64) -> u32 {
    books.iter()
        .filter(|b| b.has_return_date())
        .filter(|b| now_millis.saturating_sub(b.return_date_millis()) / MILLIS_PER_DAY >= FINE_AFTER_DAYS)
        .fold(0, |total, _| total + LATE_FINE_DOLLARS)
}

/// 반납일이 지난 도서를 목록 순서대로 찾는다.
pub fn find_late_books(books: &[Book], now_millis: i64) -> Vec<Book> {
    books.iter()
        .filter(|b| b.has_return_date() && now_millis > b.return_date_millis())
        .cloned()
        .collect()
}

/// 날짜를 로컬 시간 기준 그날 00:00:00.000의 epoch 밀리초로 변환한다.
///
/// 자정이 존재하지 않는 날(서머타임 시작)은 그날 처음으로 존재하는 정시(보통 01:00)를 사용한다.
/// 1970-01-01 이전 날짜는 "설정 안됨"(0)과 구분 되도록 1로 맞춘다.
pub fn start_of_day_millis(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    let millis = (0..24)
        .find_map(|hour| Local.from_local_datetime(&(midnight + TimeDelta::hours(hour))).earliest())
        .map(|t| t.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis());
    millis.max(1)
}

/// 내 목록 관리
///
/// 화면 하나가 열려 있는 동안의 목록을 소유하며 모든 변경은 이 타입을 통해서만 이루어진다.
/// 변경이 일어날 때마다 목록 전체를 저장소에 다시 쓴다. 저장소에 쓰는 주체는 하나라고 가정하며
/// 잠금은 사용하지 않는다.
pub struct MyListManager<R, C = SystemClock>
where
    R: MyListRepository,
    C: Clock,
{
    repository: R,
    clock: C,
    books: Vec<Book>,
    listener: Option<Box<dyn FineListener>>,
}

impl<R: MyListRepository> MyListManager<R> {
    pub fn open(repository: R) -> Self {
        Self::with_clock(repository, SystemClock)
    }
}

impl<R: MyListRepository, C: Clock> MyListManager<R, C> {
    pub fn with_clock(repository: R, clock: C) -> Self {
        let books = repository.load();
        Self {
            repository,
            clock,
            books,
            listener: None,
        }
    }

    pub fn set_fine_listener<L>(&mut self, listener: L)
    where
        L: FineListener + 'static
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// 저장소에서 목록을 다시 읽고 반납일이 지난 도서를 반환한다.
    pub fn refresh(&mut self) -> Vec<Book> {
        self.books = self.repository.load();
        self.late_books()
    }

    pub fn total_fine(&self) -> u32 {
        calculate_total_fine(&self.books, self.clock.now_millis())
    }

    pub fn late_books(&self) -> Vec<Book> {
        find_late_books(&self.books, self.clock.now_millis())
    }

    /// 도서를 목록 끝에 추가한다. 같은 제목의 도서가 있으면 아무것도 저장하지 않는다.
    pub fn add_book(&mut self, book: Book) -> AddBookResult {
        let mut books = self.repository.load();

        if books.iter().any(|b| b.is_same_title(&book)) {
            debug!("이미 목록에 있는 도서입니다. ({})", book.title());
            self.books = books;
            return AddBookResult::AlreadyExists;
        }

        info!("내 목록에 도서를 추가합니다. ({})", book.title());
        books.push(book);
        self.repository.save(&books);
        self.books = books;
        AddBookResult::Added
    }

    /// 반납일을 설정한다. 이미 반납일이 있는 도서는 변경하지 않는다.
    pub fn set_return_date(&mut self, index: usize, date: NaiveDate) -> SetReturnDateResult {
        let Some(book) = self.books.get_mut(index) else {
            debug!("반납일을 설정할 도서가 없습니다. (index: {})", index);
            return SetReturnDateResult::IndexOutOfRange;
        };

        if book.has_return_date() {
            debug!("반납일이 이미 설정된 도서입니다. ({})", book.title());
            return SetReturnDateResult::AlreadyHasDate;
        }

        book.set_return_date_millis(start_of_day_millis(date));
        info!("반납일을 설정합니다. ({}, {})", book.title(), date);

        self.repository.save(&self.books);
        SetReturnDateResult::Updated { total_fine: self.notify_fine() }
    }

    /// 도서를 반납하여 목록에서 제거한다.
    pub fn return_book(&mut self, index: usize) -> ReturnBookResult {
        if index >= self.books.len() {
            debug!("반납할 도서가 없습니다. (index: {})", index);
            return ReturnBookResult::IndexOutOfRange;
        }

        let returned = self.books.remove(index);
        info!("도서를 반납합니다. ({})", returned.title());

        self.repository.save(&self.books);
        ReturnBookResult::Removed { total_fine: self.notify_fine() }
    }

    fn notify_fine(&self) -> u32 {
        let total_fine = self.total_fine();
        if let Some(listener) = &self.listener {
            listener.on_fine_changed(total_fine);
        }
        total_fine
    }
}
