//! Minimal HTML page shells.
//!
//! Page chrome is intentionally small: a shared shell, a handful of forms,
//! and the highlighted-content wrapper. Anything fancier belongs in front of
//! the service, not in it.

use pastel_core::highlight::escape_html;
use pastel_core::models::paste::PasteMeta;

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 2em auto; max-width: 60em; }}\n\
         .linenos {{ text-align: right; padding-right: 0.8em; user-select: none; }}\n\
         .linenos a {{ color: #999; text-decoration: none; }}\n\
         .highlighttable td.code {{ width: 100%; }}\n\
         textarea {{ width: 100%; }}\n\
         </style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
        body = body
    )
}

/// Landing/help page.
pub fn index_page(title: &str) -> String {
    let body = format!(
        "<h1>{title}</h1>\n\
         <p>A minimal pastebin. Post text, get a URL back.</p>\n\
         <ul>\n\
         <li><a href=\"/post\">New paste</a></li>\n\
         <li><a href=\"/recent\">Recent pastes</a></li>\n\
         </ul>\n\
         <p>From the command line:</p>\n\
         <pre>curl -F 'upload=&lt;-' http://this-host/post &lt; file.txt</pre>",
        title = escape_html(title)
    );
    page(title, &body)
}

/// Recent-pastes listing.
pub fn recent_page(title: &str, items: &[PasteMeta]) -> String {
    let mut rows = String::new();
    for item in items {
        let label = item
            .filename
            .clone()
            .unwrap_or_else(|| format!("Paste #{}", item.id));
        rows.push_str(&format!(
            "<li><a href=\"/{id}\">{label}</a> \u{2014} {mimetype}, {created}{lock}</li>\n",
            id = item.id,
            label = escape_html(&label),
            mimetype = escape_html(&item.mimetype),
            created = item.created.format("%Y-%m-%d %H:%M UTC"),
            lock = if item.protected { " \u{1f512}" } else { "" },
        ));
    }
    let body = format!(
        "<h1>Recent pastes</h1>\n<ul>\n{rows}</ul>\n<p><a href=\"/post\">New paste</a></p>"
    );
    page(title, &body)
}

/// Pre-fill values for the upload form.
#[derive(Debug, Default)]
pub struct PostPrefill<'a> {
    pub content: &'a str,
    pub password: &'a str,
    /// `checked` attribute for the pre-hashed checkbox.
    pub checked: bool,
    pub syntax: &'a str,
    pub parent: Option<u64>,
}

/// Upload form, optionally pre-filled from an existing paste.
pub fn post_page(title: &str, prefill: &PostPrefill) -> String {
    let parent_field = match prefill.parent {
        Some(parent) => format!(
            "<input type=\"hidden\" name=\"parent\" value=\"{parent}\">\n"
        ),
        None => String::new(),
    };
    let body = format!(
        "<h1>{title}</h1>\n\
         <form action=\"/post\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <p><textarea name=\"upload\" rows=\"20\">{content}</textarea></p>\n\
         <p>Filename: <input type=\"text\" name=\"filename\"></p>\n\
         <p>Syntax: <input type=\"text\" name=\"syntax\" value=\"{syntax}\"></p>\n\
         <p>Password: <input type=\"password\" name=\"password\" value=\"{password}\">\n\
         <label><input type=\"checkbox\" name=\"is_encrypted\"{checked}> already hashed</label></p>\n\
         {parent_field}\
         <input type=\"hidden\" name=\"redirect\" value=\"1\">\n\
         <p><input type=\"submit\" value=\"Paste\"></p>\n\
         </form>",
        title = escape_html(title),
        content = escape_html(prefill.content),
        syntax = escape_html(prefill.syntax),
        password = escape_html(prefill.password),
        checked = if prefill.checked { " checked" } else { "" },
        parent_field = parent_field,
    );
    page(title, &body)
}

/// Password prompt shown for protected pastes. Posts back to the same URL.
pub fn password_prompt(title: &str) -> String {
    let body = "<h1>Protected paste</h1>\n\
         <form method=\"post\">\n\
         <p>Password: <input type=\"password\" name=\"password\">\n\
         <label><input type=\"checkbox\" name=\"is_encrypted\"> already hashed</label></p>\n\
         <p><input type=\"submit\" value=\"View\"></p>\n\
         </form>";
    page(title, body)
}

/// Wrapper around a highlighted fragment.
pub fn highlight_page(title: &str, id: u64, parent: Option<u64>, fragment: &str) -> String {
    let nav = match parent {
        Some(parent) => format!(
            "<p><a href=\"/raw/{id}\">raw</a> | <a href=\"/edit/{id}\">edit</a> | \
             <a href=\"/diff/{parent}..{id}\">diff against #{parent}</a></p>\n"
        ),
        None => format!("<p><a href=\"/raw/{id}\">raw</a> | <a href=\"/edit/{id}\">edit</a></p>\n"),
    };
    let body = format!(
        "<h1>{title}</h1>\n{nav}{fragment}",
        title = escape_html(title),
    );
    page(title, &body)
}

/// Error page body used by the HTTP error mapper.
pub fn error_page(status: u16, message: &str) -> String {
    let body = format!(
        "<h1>Error {status}</h1>\n<p>{message}</p>\n<p><a href=\"/\">Home</a></p>",
        message = escape_html(message),
    );
    page(&format!("Error {status}"), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_page_escapes_prefilled_content() {
        let prefill = PostPrefill {
            content: "<script>alert(1)</script>",
            ..PostPrefill::default()
        };
        let html = post_page("Paste New", &prefill);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn post_page_carries_parent_reference() {
        let prefill = PostPrefill {
            parent: Some(7),
            ..PostPrefill::default()
        };
        let html = post_page("Edit", &prefill);
        assert!(html.contains("name=\"parent\" value=\"7\""));
    }

    #[test]
    fn prehashed_checkbox_prefill() {
        let prefill = PostPrefill {
            password: "abcd",
            checked: true,
            ..PostPrefill::default()
        };
        let html = post_page("Edit", &prefill);
        assert!(html.contains("name=\"is_encrypted\" checked"));
        assert!(html.contains("value=\"abcd\""));
    }
}
