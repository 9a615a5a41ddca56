//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層（コネクションハンドラ）から呼び出され、Domain 層を操作します。

pub mod connect_peer;
pub mod delivery;
pub mod disconnect_peer;
pub mod dispatch_command;
pub mod error;
pub mod list_peers;
pub mod send_message;

pub use connect_peer::ConnectPeerUseCase;
pub use delivery::{BroadcastReport, Delivery};
pub use disconnect_peer::DisconnectPeerUseCase;
pub use dispatch_command::{CommandDispatcher, Flow};
pub use error::{ConnectError, DeliveryError};
pub use list_peers::ListPeersUseCase;
pub use send_message::{SendMessageUseCase, SendOutcome};
