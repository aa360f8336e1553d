use crate::flash::FlashMessage;
use maud::{html, Markup, PreEscaped, DOCTYPE};

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f7f9; color: #1d2330; }
header { background: #1d2330; padding: 0.75rem 1.5rem; }
header a { color: #fff; margin-right: 1.25rem; text-decoration: none; }
header a.brand { font-weight: 700; }
main { max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }
.alert { padding: 0.75rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.alert-success { background: #d1e7dd; color: #0f5132; }
.alert-danger { background: #f8d7da; color: #842029; }
form label { display: block; margin: 1rem 0 0.25rem; font-weight: 600; }
form select, form input[type=file] { width: 100%; }
form button { margin-top: 1.25rem; padding: 0.5rem 1.25rem; }
"#;

/// Renders the base HTML document structure
pub fn base_document(title: &str, flashes: &[FlashMessage], content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Pixform" }
                style { (PreEscaped(CSS)) }
            }
            body {
                header {
                    nav {
                        a.brand href="/" { "Pixform" }
                        a href="/" { "Home" }
                        a href="/edit" { "Edit" }
                        a href="/about" { "About" }
                    }
                }
                main {
                    (render_flash(flashes))
                    (content)
                }
            }
        }
    }
}

/// Renders pending notices, each followed by its optional link.
pub fn render_flash(flashes: &[FlashMessage]) -> Markup {
    html! {
        @for message in flashes {
            div class=(message.level.css_class()) role="alert" {
                (message.text)
                @if let Some(link) = &message.link {
                    " "
                    a href=(link.href) target="_blank" rel="noopener" { (link.label) }
                }
            }
        }
    }
}
