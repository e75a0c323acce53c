//! Request handlers: the JSON API under `/api` and the HTML site.

pub mod api;
pub mod site;
