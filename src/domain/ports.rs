use crate::domain::model::RawContact;
use crate::utils::error::Result;
use async_trait::async_trait;

/// A directory source yielding structured contact items (EWS path).
#[async_trait]
pub trait ContactSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawContact>>;
}

/// A directory source yielding raw vCard texts (CardDAV path).
#[async_trait]
pub trait CardSource: Send + Sync {
    async fn fetch_cards(&self) -> Result<Vec<String>>;
}
