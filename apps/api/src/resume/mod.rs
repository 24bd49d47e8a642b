//! Resume API: request handlers plus the generation pipeline that ties the
//! store, the renderer and PDF capture together.

pub mod handlers;
pub mod service;
pub mod validation;
