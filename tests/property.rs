//! Property-based tests — collection invariants with proptest.

mod common;

use std::collections::BTreeSet;

use common::{book, empty_service, service_with};
use proptest::prelude::*;

use bookshelf::domain::model::collection::BookCollection;
use bookshelf::domain::model::isbn::Isbn;
use bookshelf::domain::repository::BookRepository;
use bookshelf::infra::json_store::JsonBookRepository;

fn distinct_isbns() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[0-9]{3,13}", 0..12).prop_map(|isbns| {
        let mut seen = BTreeSet::new();
        isbns
            .into_iter()
            .filter(|isbn| seen.insert(isbn.clone()))
            .collect()
    })
}

proptest! {
    /// N件の異なるISBNを作成すると、list() は作成順にN件を返す。
    #[test]
    fn list_returns_creates_in_order(isbns in distinct_isbns()) {
        let svc = empty_service();
        for isbn in &isbns {
            svc.create(book(isbn, "T")).unwrap();
        }

        let listed: Vec<String> = svc.list().iter().map(|b| b.isbn().to_string()).collect();
        prop_assert_eq!(listed, isbns);
    }

    /// 既存ISBNでのcreateはConflictで、コレクションは変わらない。
    #[test]
    fn duplicate_create_leaves_collection_unchanged(
        isbns in distinct_isbns().prop_filter("non-empty", |v| !v.is_empty()),
        pick in any::<prop::sample::Index>(),
    ) {
        let books: Vec<_> = isbns.iter().map(|i| book(i, "T")).collect();
        let svc = service_with(books);
        let before = svc.list();

        let dup = &isbns[pick.index(isbns.len())];
        prop_assert!(svc.create(book(dup, "Other")).is_err());
        prop_assert_eq!(svc.list(), before);
    }

    /// 存在しないISBNへの get/replace/delete は NotFound で、何も変わらない。
    #[test]
    fn absent_isbn_operations_are_no_ops(
        isbns in distinct_isbns(),
        absent in "[a-z]{1,8}",
    ) {
        let books: Vec<_> = isbns.iter().map(|i| book(i, "T")).collect();
        let svc = service_with(books);
        let before = svc.list();
        let saves = svc.repository().save_count();
        let key = Isbn::from(absent.as_str());

        prop_assert!(svc.get(&key).is_err());
        prop_assert!(svc.replace(&key, book(&absent, "X")).is_err());
        prop_assert!(svc.delete(&key).is_err());

        prop_assert_eq!(svc.list(), before);
        prop_assert_eq!(svc.repository().save_count(), saves);
    }

    /// create → delete で件数が元に戻る。
    #[test]
    fn create_delete_preserves_count(isbns in distinct_isbns(), extra in "[a-z]{1,8}") {
        let books: Vec<_> = isbns.iter().map(|i| book(i, "T")).collect();
        let svc = service_with(books);
        let before = svc.list().len();

        svc.create(book(&extra, "Extra")).unwrap();
        prop_assert_eq!(svc.list().len(), before + 1);

        svc.delete(&Isbn::from(extra.as_str())).unwrap();
        prop_assert_eq!(svc.list().len(), before);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// save(load()) を繰り返してもファイル内容は変わらない。
    #[test]
    fn save_load_is_idempotent(
        isbns in distinct_isbns(),
        title in "[A-Za-z &<>\"']{1,20}",
        pages in prop::option::of(any::<i64>()),
        year in prop::option::of(any::<i64>()),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        let repo = JsonBookRepository::new(&path);

        let books: Vec<_> = isbns
            .iter()
            .map(|i| {
                let mut b = book(i, &title);
                if let Some(p) = pages {
                    b = b.with_pages(p);
                }
                if let Some(y) = year {
                    b = b.with_year_published(y);
                }
                b
            })
            .collect();
        repo.save(&BookCollection::from(books)).unwrap();
        let first = std::fs::read(&path).unwrap();

        let loaded = repo.load().unwrap().unwrap();
        repo.save(&loaded).unwrap();

        prop_assert_eq!(std::fs::read(&path).unwrap(), first);
        prop_assert_eq!(loaded.books().len(), isbns.len());
        if let Some(first_book) = loaded.books().first() {
            prop_assert_eq!(first_book.pages(), pages);
            prop_assert_eq!(first_book.year_published(), year);
        }
    }
}
