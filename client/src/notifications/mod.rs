//! # Notifications
//!
//! Transient toasts shown to the user after requests succeed or fail.
//!
//! ## Module Structure
//!
//! - `toast.rs` - [`Toast`] builder, ids, variants and the read-only [`ToastView`]
//! - `store.rs` - [`ToastStore`], the ordered list with timed dismissal

pub mod store;
pub mod toast;

pub use store::{ToastStore, DEFAULT_TOAST_LIMIT};
pub use toast::{Toast, ToastId, ToastPhase, ToastVariant, ToastView, DEFAULT_TOAST_DURATION};
