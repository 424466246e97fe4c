//! Reflective access to a toolkit living on a foreign classpath.
//!
//! The engine never links against the toolkit. Instead it asks a
//! [`context::ClassContext`] for classes by name, finds members by exact
//! signature with [`invoker`], and calls them with dynamically typed
//! [`value::Value`] arguments. [`locator::ToolkitLocator`] builds one fresh
//! context per task and works out which toolkit release it contains.

pub mod class;
pub mod context;
pub mod invoker;
pub mod jar;
pub mod locator;
pub mod value;
