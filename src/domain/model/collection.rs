use serde::{Deserialize, Serialize};

use super::book::Book;
use super::isbn::Isbn;
use crate::domain::error::DomainError;

/// 書籍コレクション — 集約ルート。保存ファイル全体に対応する。
///
/// 順序は挿入順のみ。索引は持たず、検索はすべて先頭からの線形走査で
/// 最初に一致したレコードを返す（重複ISBNがあっても2件目以降は見えない）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCollection {
    books: Vec<Book>,
}

impl BookCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, isbn: &Isbn) -> Option<&Book> {
        self.books.iter().find(|b| b.isbn() == isbn)
    }

    pub fn contains(&self, isbn: &Isbn) -> bool {
        self.position(isbn).is_some()
    }

    /// 末尾に追加する。同一ISBNが既にあれば何も変更しない。
    pub fn insert(&mut self, book: Book) -> Result<(), DomainError> {
        if self.contains(book.isbn()) {
            return Err(DomainError::Conflict(book.isbn().clone()));
        }
        self.books.push(book);
        Ok(())
    }

    /// 最初の一致位置を丸ごと置き換え、置き換え前のレコードを返す。
    /// 新レコード自身のISBNは照合しない。
    pub fn replace(&mut self, isbn: &Isbn, book: Book) -> Result<Book, DomainError> {
        let pos = self
            .position(isbn)
            .ok_or_else(|| DomainError::NotFound(isbn.clone()))?;
        Ok(std::mem::replace(&mut self.books[pos], book))
    }

    /// 最初の一致を取り除いて返す。
    pub fn remove(&mut self, isbn: &Isbn) -> Result<Book, DomainError> {
        let pos = self
            .position(isbn)
            .ok_or_else(|| DomainError::NotFound(isbn.clone()))?;
        Ok(self.books.remove(pos))
    }

    fn position(&self, isbn: &Isbn) -> Option<usize> {
        self.books.iter().position(|b| b.isbn() == isbn)
    }
}

impl From<Vec<Book>> for BookCollection {
    fn from(books: Vec<Book>) -> Self {
        Self { books }
    }
}
