/*
    Ledger subsystem - call surface and the serialized write path
*/

pub mod call;
pub mod client;

pub use call::{Call, CallOutput};
pub use client::{DispatchOutcome, LedgerClient, LedgerError, LocalLedger, Receipt, ReceiptStatus};
