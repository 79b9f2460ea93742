//! Wire objects for the EpusdtPay API.

pub mod callback;
pub mod create_transaction;
pub mod trade_type;

pub use callback::{CALLBACK_STATUS_PAID, CallbackPayload};
pub use create_transaction::{
    CreateTransactionRequest, CreateTransactionResponse, PaymentResult, TransactionData,
};
pub use trade_type::TradeType;
