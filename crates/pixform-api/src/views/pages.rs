use super::layout::base_document;
use crate::flash::FlashMessage;
use maud::{html, Markup};
use pixform_core::{constants::OPERATION_SENTINEL, Operation};

/// Upload form, served at both `/` and `/edit`.
pub fn edit_page(flashes: &[FlashMessage], allowed_extensions: &[String]) -> Markup {
    let accept = allowed_extensions
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");

    base_document(
        "Edit an image",
        flashes,
        html! {
            h1 { "Edit an image" }
            p { "Upload an image and pick what to do with it." }
            form method="post" action="/edit" enctype="multipart/form-data" {
                label for="operation" { "Operation" }
                select name="operation" id="operation" {
                    option selected { (OPERATION_SENTINEL) }
                    @for op in Operation::ALL {
                        option value=(op.wire_id()) { (op.label()) }
                    }
                }
                label for="file" { "Image" }
                input type="file" name="file" id="file" accept=(accept);
                button type="submit" { "Process" }
            }
            p { small { "Allowed types: " (allowed_extensions.join(", ")) } }
        },
    )
}

pub fn about_page(flashes: &[FlashMessage]) -> Markup {
    base_document(
        "About",
        flashes,
        html! {
            h1 { "About" }
            p {
                "Pixform converts uploaded images to grayscale or re-encodes them "
                "as WebP, JPEG or PNG. Each result gets its own link, so earlier "
                "results are never overwritten."
            }
        },
    )
}
