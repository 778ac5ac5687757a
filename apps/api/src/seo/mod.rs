// Programmatic SEO surface: slug translation, inbound URL rewriting and the
// read-only page data endpoints the rewritten URLs land on.

pub mod handlers;
pub mod pages;
pub mod rewrite;
pub mod slugs;
