//! Upload form served at `GET /`.
//!
//! Rendered with [maud](https://maud.lambda.xyz/); interpolated values are
//! auto-escaped. CSS and the form script are embedded at compile time from
//! `static/`, so the binary ships without a template or asset directory.

use crate::imaging::StripWidth;
use crate::naming::ALLOWED_EXTENSIONS;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/upload.js");

/// Value for the file inputs' `accept` attribute: `.png,.jpg,...`.
fn accept_attr() -> String {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// A labelled drop target wrapping a file input with id `{prefix}-input`.
fn drop_zone(prefix: &str, field: &str, accept: &str, multiple: bool, hint: &str) -> Markup {
    html! {
        label.drop-zone id=(format!("{prefix}-drop")) {
            input.file-input id=(format!("{prefix}-input")) type="file" name=(field)
                accept=(accept) multiple[multiple];
            span { (hint) }
        }
    }
}

/// Renders the base HTML document structure
fn base_document(title: &str, strip_width: StripWidth, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body data-strip-width=(strip_width.value()) {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the upload page with both single and batch forms.
pub fn render_index(strip_width: StripWidth) -> Markup {
    let accept = accept_attr();
    let content = html! {
        main {
            h1 { "Carousel Splitter" }
            p.lead {
                "Cuts wide images into " (strip_width.to_string()) " strips for carousel posts "
                "and downloads them as a ZIP."
            }
            nav.tabs {
                button.tab.active type="button" data-tab="single-mode" { "Single image" }
                button.tab type="button" data-tab="batch-mode" { "Batch" }
            }
            section #single-mode.tab-content.active {
                form #single-form {
                    (drop_zone("single", "image", &accept, false, "Drop an image here or click to choose"))
                    img #single-preview.preview alt="" hidden;
                    p #single-info.info {}
                    button type="submit" { "Split" }
                }
            }
            section #batch-mode.tab-content {
                form #batch-form {
                    (drop_zone("batch", "images", &accept, true, "Drop images here or click to choose"))
                    p #batch-info.info {}
                    ul #batch-list.file-list {}
                    button type="submit" { "Split all" }
                }
            }
            p #status.status {}
        }
    };

    base_document("Carousel Splitter", strip_width, content)
}
