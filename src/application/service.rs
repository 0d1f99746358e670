use std::sync::{Mutex, PoisonError};

use crate::domain::error::DomainError;
use crate::domain::model::book::Book;
use crate::domain::model::collection::BookCollection;
use crate::domain::model::isbn::Isbn;
use crate::domain::repository::BookRepository;

use super::error::AppError;

/// 直近のloadでストレージがどういう状態だったか。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreState {
    /// ファイルを読めた
    Loaded,
    /// ファイルがまだ無い
    Missing,
    /// 読めない・壊れている。空コレクションとして扱った
    Unreadable(String),
}

impl StoreState {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Unreadable(_))
    }
}

/// loadの結果。コレクションと、それがどこから来たか。
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub collection: BookCollection,
    pub state: StoreState,
}

/// 書籍コレクションに対するユースケース。
/// load → mutate → save のパターンで操作する。
///
/// 各操作は `gate` を保持したまま load から save まで進むため、
/// 同一サービス経由の書き込みが互いを上書きすることはない。
pub struct BookService<R: BookRepository> {
    repo: R,
    gate: Mutex<()>,
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            gate: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// 全件を挿入順で返す。
    pub fn list(&self) -> Vec<Book> {
        let _guard = self.lock();
        self.snapshot().collection.into_books()
    }

    /// ISBNで1件引く。
    pub fn get(&self, isbn: &Isbn) -> Result<Book, AppError> {
        let _guard = self.lock();
        let collection = self.snapshot().collection;
        let book = collection
            .get(isbn)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(isbn.clone()))?;
        Ok(book)
    }

    /// 新規追加。同じISBNがあればConflictで、何も保存しない。
    pub fn create(&self, book: Book) -> Result<Book, AppError> {
        let _guard = self.lock();
        let mut collection = self.snapshot().collection;
        collection.insert(book.clone())?;
        self.persist(&collection)?;
        tracing::info!(isbn = %book.isbn(), "book created");
        Ok(book)
    }

    /// 最初に一致したレコードを丸ごと置き換える。
    pub fn replace(&self, isbn: &Isbn, book: Book) -> Result<Book, AppError> {
        let _guard = self.lock();
        let mut collection = self.snapshot().collection;
        if book.isbn() != isbn {
            tracing::warn!(
                path_isbn = %isbn,
                payload_isbn = %book.isbn(),
                "replace payload isbn differs from target; record will be renumbered"
            );
        }
        collection.replace(isbn, book.clone())?;
        self.persist(&collection)?;
        tracing::info!(isbn = %isbn, "book replaced");
        Ok(book)
    }

    /// 最初に一致したレコードを削除し、削除したものを返す。
    pub fn delete(&self, isbn: &Isbn) -> Result<Book, AppError> {
        let _guard = self.lock();
        let mut collection = self.snapshot().collection;
        let removed = collection.remove(isbn)?;
        self.persist(&collection)?;
        tracing::info!(isbn = %isbn, "book deleted");
        Ok(removed)
    }

    /// 現在のストレージ状態を返す（空と読み込み失敗を区別したい呼び出し側向け）。
    pub fn load(&self) -> Snapshot {
        let _guard = self.lock();
        self.snapshot()
    }

    // --- private ---

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // 保護対象は () なので poison されても続行してよい
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 読み込み失敗は空コレクションに縮退させ、警告だけ出す。
    fn snapshot(&self) -> Snapshot {
        match self.repo.load() {
            Ok(Some(collection)) => {
                tracing::debug!(count = collection.len(), "collection loaded");
                Snapshot {
                    collection,
                    state: StoreState::Loaded,
                }
            }
            Ok(None) => Snapshot {
                collection: BookCollection::new(),
                state: StoreState::Missing,
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to read book store; treating as empty");
                Snapshot {
                    collection: BookCollection::new(),
                    state: StoreState::Unreadable(e.to_string()),
                }
            }
        }
    }

    fn persist(&self, collection: &BookCollection) -> Result<(), AppError> {
        self.repo
            .save(collection)
            .map_err(|e| AppError::Storage(Box::new(e)))
    }
}
