//! PDF upload and extracted text review

use crate::app::AppState;
use crate::document::{extract_text, ExtractError};
use crate::ui::components::loading::LoadingRow;
use dioxus::prelude::*;
use std::path::Path;

/// File name without the directory part
fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[component]
pub fn UploadPanel() -> Element {
    let app_state = use_context::<AppState>();
    let mut session = app_state.session;
    let mut is_reading = use_signal(|| false);

    let handle_upload = move |evt: FormEvent| async move {
        let Some(file_engine) = evt.files() else {
            return;
        };
        let Some(path) = file_engine.files().into_iter().next() else {
            session.write().clear_document();
            return;
        };

        is_reading.set(true);
        let result = match file_engine.read_file(&path).await {
            Some(bytes) => tokio::task::spawn_blocking(move || extract_text(&bytes))
                .await
                .unwrap_or_else(|e| Err(ExtractError::Unreadable(e.to_string()))),
            None => Err(ExtractError::Unreadable(path.clone())),
        };
        is_reading.set(false);

        session.write().load_document(display_name(&path), result);
    };

    let (has_document, edited_text, page_count, generating) = {
        let session = session.read();
        (
            session.document.is_some(),
            session.edited_text.clone(),
            session.document.as_ref().map(|d| d.page_count).unwrap_or(0),
            session.generating,
        )
    };

    rsx! {
        section {
            class: "panel",

            label { class: "field-label", "Upload a PDF file" }
            input {
                r#type: "file",
                accept: ".pdf,application/pdf",
                multiple: false,
                disabled: is_reading() || generating,
                onchange: handle_upload,
            }

            if is_reading() {
                LoadingRow { label: "Extracting text..." }
            }

            if has_document {
                label {
                    class: "field-label",
                    "Extracted PDF Text (editable, optional) - {page_count} pages"
                }
                textarea {
                    class: "extracted-text",
                    rows: "10",
                    value: "{edited_text}",
                    oninput: move |e| session.write().edited_text = e.value(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_directories() {
        assert_eq!(display_name("/home/me/docs/report.pdf"), "report.pdf");
        assert_eq!(display_name("report.pdf"), "report.pdf");
    }
}
