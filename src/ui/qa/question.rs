//! Question input and answer display

use crate::app::AppState;
use crate::inference::MODEL_CACHE;
use crate::qa::{ask_pdf_question, QueryAnswer};
use crate::ui::components::loading::LoadingRow;
use dioxus::prelude::*;

#[component]
pub fn QuestionPanel() -> Element {
    let app_state = use_context::<AppState>();
    let mut session = app_state.session;
    let model_ready = app_state.model_state.read().is_ready();

    let (question, generating, can_ask, answer) = {
        let session = session.read();
        (
            session.question.clone(),
            session.generating,
            session.can_ask(model_ready),
            session.answer_text().map(str::to_string),
        )
    };

    let handle_ask = move |_| {
        let model_ready = app_state.model_state.read().is_ready();
        if !session.read().can_ask(model_ready) {
            return;
        }
        let Some(model) = MODEL_CACHE.slot().handle() else {
            tracing::warn!("Get Answer clicked without a loaded model");
            return;
        };
        let Some(request) = session.write().begin_generation(model_ready) else {
            return;
        };
        let params = app_state.settings.read().generation.clone();

        spawn(async move {
            let job = request.clone();
            let answer = tokio::task::spawn_blocking(move || {
                ask_pdf_question(model.as_ref(), &job.context, &job.question, &params)
            })
            .await
            .unwrap_or_else(|e| QueryAnswer::Failed(e.to_string()));

            session.write().finish_generation(&request, answer);
        });
    };

    rsx! {
        section {
            class: "panel",

            label { class: "field-label", "Enter your question:" }
            textarea {
                class: "question",
                rows: "3",
                value: "{question}",
                disabled: generating,
                oninput: move |e| session.write().question = e.value(),
            }

            button {
                class: "primary",
                disabled: !can_ask,
                onclick: handle_ask,
                "Get Answer"
            }

            if generating {
                LoadingRow { label: "Generating answer..." }
            }

            if let Some(answer) = answer {
                div {
                    class: "answer",
                    strong { "Answer:" }
                    p { class: "answer-text", "{answer}" }
                }
            }
        }
    }
}
