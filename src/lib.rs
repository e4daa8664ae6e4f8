use crate::config::log::LogError;
use std::fmt;
use std::fmt::Formatter;

pub mod catalog;
pub mod config;
pub mod item;
pub mod my_list;

#[derive(Debug)]
pub enum AppError {
    Config(::config::ConfigError),
    Logging(LogError),
    InvalidArgument(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Cannot load config, {}", e),
            AppError::Logging(e) => write!(f, "Cannot set up logging, {}", e),
            AppError::InvalidArgument(message) => write!(f, "Invalid argument, {}", message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<::config::ConfigError> for AppError {
    fn from(value: ::config::ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<LogError> for AppError {
    fn from(value: LogError) -> Self {
        AppError::Logging(value)
    }
}

/// 화면에 보여줄 번호(1부터 시작)를 목록 인덱스로 바꾼다.
/// 0은 어떤 목록에서도 범위를 벗어난 인덱스가 된다.
///
/// # Example
/// ```
/// use bookworm::index_of;
///
/// assert_eq!(index_of(1), 0);
/// assert_eq!(index_of(0), usize::MAX);
/// ```
pub fn index_of(number: usize) -> usize {
    number.checked_sub(1).unwrap_or(usize::MAX)
}

/// 연체료 표시 문구
pub fn fine_line(total_fine: u32) -> String {
    format!("Total fine: ${}", total_fine)
}

/// 반납일이 지난 도서 경고 문구
pub fn late_warning(title: &str) -> String {
    format!("Late return: {}", title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lines() {
        assert_eq!(fine_line(20), "Total fine: $20");
        assert_eq!(late_warning("Clean Code"), "Late return: Clean Code");
    }

    #[test]
    fn app_error_displays_message() {
        let e = AppError::InvalidArgument("No catalog book numbered 9".to_owned());
        assert_eq!(e.to_string(), "Invalid argument, No catalog book numbered 9");

        let e = AppError::from(LogError::InvalidLevel("LOUD".to_owned()));
        assert!(e.to_string().starts_with("Cannot set up logging, "));
    }

    #[test]
    fn index_of_large_number() {
        assert_eq!(index_of(usize::MAX), usize::MAX - 1);
    }
}
