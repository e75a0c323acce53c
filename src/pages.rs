//! HTML page rendering.
//!
//! Templates are compiled into the binary and loaded once into a [`Tera`]
//! instance. Handlers pass named values through a [`Context`].

use tera::{Context, Tera};
use tracing::error;

use crate::error::Error;
use crate::status::Status;

const TEMPLATES: [(&str, &str); 5] = [
    ("layout.html", include_str!("../templates/layout.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("post.html", include_str!("../templates/post.html")),
    ("user_posts.html", include_str!("../templates/user_posts.html")),
    ("error.html", include_str!("../templates/error.html")),
];

/// The page renderer.
#[derive(Debug)]
pub struct Pages {
    tera: Tera,
}

impl Pages {
    /// Compiles the built-in templates.
    pub fn new() -> Result<Self, Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    /// Renders `template` with the named values in `context`.
    pub fn render(&self, template: &str, context: &Context) -> Result<String, Error> {
        Ok(self.tera.render(template, context)?)
    }

    /// Renders the error page. The page title is the status code.
    ///
    /// Falls back to a bare page if the template itself fails, since this is
    /// the last stop for every failure.
    pub fn render_error(&self, status: Status, message: &str) -> String {
        let mut context = Context::new();
        context.insert("status_code", &status.code());
        context.insert("title", &status.code().to_string());
        context.insert("message", message);

        self.tera.render("error.html", &context).unwrap_or_else(|e| {
            error!("failed to render error page: {e}");
            format!(
                "<!doctype html><title>{code}</title><h1>{code}</h1><p>{reason}</p>",
                code = status.code(),
                reason = status.reason(),
            )
        })
    }
}

/// Shortens `title` to at most `max` characters for the page `<title>`.
pub fn short_title(title: &str, max: usize) -> String {
    title.chars().take(max).collect()
}
