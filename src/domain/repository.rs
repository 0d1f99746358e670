use super::model::collection::BookCollection;

/// 永続化の抽象。Infra層が実装する。
///
/// `load` はファイルが存在しなければ `Ok(None)`、
/// 読めない・壊れている場合は `Err` を返す。空扱いにするかは呼び出し側が決める。
pub trait BookRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<Option<BookCollection>, Self::Error>;
    fn save(&self, collection: &BookCollection) -> Result<(), Self::Error>;
}
