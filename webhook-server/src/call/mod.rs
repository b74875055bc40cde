//! Function call handling.
//!
//! ## Flow
//!
//! ```text
//! request body → FunctionCall::from_body() → (name, Args) → Dispatcher::dispatch() → reply
//! ```

pub mod args;
pub mod dispatch;
pub mod function;

pub use args::{normalize_args, text, Args, FunctionCall};
pub use dispatch::{DispatchSettings, Dispatcher};
pub use function::Function;
