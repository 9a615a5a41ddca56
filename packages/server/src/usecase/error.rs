//! UseCase 層のエラー定義

use thiserror::Error;

use crate::{
    domain::{RegistryError, ValueObjectError},
    infrastructure::CodecError,
};

/// Text of the `error` envelope sent when a name is taken.
pub const NAME_IN_USE: &str = "Name already in use, choose another one.";

/// 参加者接続時のエラー
#[derive(Debug, Error)]
pub enum ConnectError {
    /// 同じ名前のピアが既に接続している
    #[error("name already in use: {0}")]
    NameConflict(String),

    /// 名前が不正
    #[error(transparent)]
    InvalidName(#[from] ValueObjectError),

    /// 登録後の通知に失敗
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl ConnectError {
    /// Text shown to a refused client, if the connection must be refused.
    pub fn refusal_message(&self) -> Option<String> {
        match self {
            Self::NameConflict(_) => Some(NAME_IN_USE.to_string()),
            Self::InvalidName(e) => Some(e.to_string()),
            Self::Delivery(_) => None,
        }
    }
}

impl From<RegistryError> for ConnectError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::NameConflict(name) => Self::NameConflict(name),
        }
    }
}

/// 配信時のエラー
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// ピアのコネクションが既に閉じている
    #[error("delivery to '{0}' failed: connection closed")]
    DeliveryFailed(String),

    /// エンベロープのエンコードに失敗
    #[error(transparent)]
    Codec(#[from] CodecError),
}
