//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use bookshelf::application::service::BookService;
use bookshelf::domain::model::book::Book;
use bookshelf::domain::model::collection::BookCollection;
use bookshelf::domain::repository::BookRepository;

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    #[error("in-memory store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("in-memory store rejected write")]
    WriteRejected,
}

/// ファイルI/O不要のインメモリリポジトリ。中身はJSON文字列で保持する。
pub struct InMemoryRepo {
    store: Mutex<Option<String>>,
    reject_writes: bool,
    saves: Mutex<usize>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(None),
            reject_writes: false,
            saves: Mutex::new(0),
        }
    }

    /// 生の内容を直接入れる（壊れたファイル相当）。
    pub fn with_raw(raw: &str) -> Self {
        let repo = Self::new();
        *repo.store.lock().unwrap() = Some(raw.to_string());
        repo
    }

    /// save が常に失敗するリポジトリ。
    pub fn read_only(collection: &BookCollection) -> Self {
        let repo = Self::new();
        *repo.store.lock().unwrap() = Some(serde_json::to_string(collection).unwrap());
        Self {
            reject_writes: true,
            ..repo
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.store.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl BookRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Option<BookCollection>, Self::Error> {
        match self.store.lock().unwrap().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, collection: &BookCollection) -> Result<(), Self::Error> {
        if self.reject_writes {
            return Err(InMemoryError::WriteRejected);
        }
        let json = serde_json::to_string(collection).unwrap();
        *self.store.lock().unwrap() = Some(json);
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// 必須項目のみの書籍
pub fn book(isbn: &str, title: &str) -> Book {
    Book::new(isbn, title, "B", "C")
}

/// 任意項目まで埋まった書籍
pub fn dune() -> Book {
    Book::new(
        "9780441013593",
        "Dune",
        "Frank Herbert",
        "A desert planet and the spice that binds an empire.",
    )
    .with_cover_url("https://covers.example.com/dune.jpg")
    .with_year_published(1965)
    .with_pages(412)
}

pub fn empty_service() -> BookService<InMemoryRepo> {
    BookService::new(InMemoryRepo::new())
}

pub fn service_with(books: Vec<Book>) -> BookService<InMemoryRepo> {
    let repo = InMemoryRepo::new();
    repo.save(&BookCollection::from(books)).unwrap();
    BookService::new(repo)
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
