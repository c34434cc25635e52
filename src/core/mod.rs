/*!
 * Core Module
 * Fundamental plugin types and error handling
 */

pub mod errors;
pub mod types;

pub use errors::*;
pub use types::*;
