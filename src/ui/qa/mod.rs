//! Main window: upload a PDF, review its text, ask questions about it

pub mod question;
pub mod upload;

use crate::app::{AppState, ModelState};
use crate::ui::components::banner::StatusBanner;
use crate::ui::components::loading::LoadingRow;
use dioxus::prelude::*;
use question::QuestionPanel;
use upload::UploadPanel;

const STYLE: &str = include_str!("../../../assets/main.css");

#[component]
pub fn QaView() -> Element {
    let app_state = use_context::<AppState>();
    let model_state = app_state.model_state.read().clone();

    let (banners, show_question) = {
        let session = app_state.session.read();
        (
            session.banners(&model_state),
            session.shows_question_input(model_state.is_ready()),
        )
    };
    let is_loading = matches!(model_state, ModelState::NotLoaded | ModelState::Loading);

    rsx! {
        style { {STYLE} }
        main {
            class: "page",

            h1 { class: "title", "PDF Question-Answer System (Llama LLM)" }

            if is_loading {
                LoadingRow { label: "Loading model..." }
            }

            div {
                class: "banners",
                for (index, banner) in banners.into_iter().enumerate() {
                    StatusBanner { key: "{index}", banner: banner }
                }
            }

            UploadPanel {}

            if show_question {
                QuestionPanel {}
            }
        }
    }
}
