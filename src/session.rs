//! Per-window session state
//!
//! Holds the current document, question and answer, and decides which
//! controls are active and which status banners are shown. Kept free of UI
//! types so the rules can be tested directly.

use crate::app::ModelState;
use crate::document::{DocumentText, ExtractError};
use crate::inference::LoadError;
use crate::qa::QueryAnswer;

/// Severity of a status banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A status message shown above the controls
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Everything needed to run one question through the model
#[derive(Debug, Clone, PartialEq)]
pub struct AskRequest {
    pub context: String,
    pub question: String,
    /// Upload the request was made against
    pub upload_id: u64,
}

/// State of one window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Text extracted from the current upload
    pub document: Option<DocumentText>,
    /// Name of the uploaded file
    pub file_name: Option<String>,
    /// Contents of the editable text area. Not used for answering.
    pub edited_text: String,
    pub question: String,
    pub answer: Option<QueryAnswer>,
    pub upload_error: Option<String>,
    pub generating: bool,
    /// Bumped on every upload; answers carry the id they were asked against
    upload_id: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current document with the outcome of an upload
    pub fn load_document(
        &mut self,
        file_name: impl Into<String>,
        result: Result<DocumentText, ExtractError>,
    ) {
        let file_name = file_name.into();
        self.upload_id += 1;
        self.answer = None;
        self.generating = false;
        match result {
            Ok(document) => {
                tracing::info!(
                    "Loaded '{}' ({} pages, {} chars)",
                    file_name,
                    document.page_count,
                    document.text.len()
                );
                self.edited_text = document.text.clone();
                self.document = Some(document);
                self.file_name = Some(file_name);
                self.upload_error = None;
            }
            Err(e) => {
                tracing::error!("Failed to read '{}': {}", file_name, e);
                self.clear_document();
                self.upload_error = Some(format!("Could not read PDF: {e}"));
            }
        }
    }

    /// Forget the current upload
    pub fn clear_document(&mut self) {
        self.document = None;
        self.file_name = None;
        self.edited_text.clear();
        self.answer = None;
        self.upload_error = None;
    }

    /// Whether the uploaded document produced any text
    pub fn has_text(&self) -> bool {
        self.document.as_ref().is_some_and(|d| !d.is_empty())
    }

    /// The question box is shown once a model and a non-empty document are available
    pub fn shows_question_input(&self, model_ready: bool) -> bool {
        model_ready && self.has_text()
    }

    pub fn can_ask(&self, model_ready: bool) -> bool {
        self.shows_question_input(model_ready)
            && !self.generating
            && !self.question.trim().is_empty()
    }

    /// Request for the current question, or `None` if asking is not allowed
    ///
    /// Uses the extracted text, not the edited copy.
    pub fn ask_request(&self, model_ready: bool) -> Option<AskRequest> {
        if !self.can_ask(model_ready) {
            return None;
        }
        let document = self.document.as_ref()?;
        Some(AskRequest {
            context: document.text.clone(),
            question: self.question.clone(),
            upload_id: self.upload_id,
        })
    }

    /// Mark a generation as started and return its request
    pub fn begin_generation(&mut self, model_ready: bool) -> Option<AskRequest> {
        let request = self.ask_request(model_ready)?;
        self.generating = true;
        self.answer = None;
        Some(request)
    }

    /// Store the answer to `request`
    ///
    /// Answers to a document that has since been replaced are dropped.
    pub fn finish_generation(&mut self, request: &AskRequest, answer: QueryAnswer) {
        if request.upload_id != self.upload_id {
            tracing::info!("Dropping answer for a document that was replaced");
            return;
        }
        self.generating = false;
        self.answer = Some(answer);
    }

    /// Status banners for the current model and session state
    pub fn banners(&self, model: &ModelState) -> Vec<Banner> {
        let mut banners = Vec::new();

        match model {
            ModelState::NotLoaded | ModelState::Loading => {
                banners.push(Banner::new(
                    BannerKind::Info,
                    "Wait While Your Model is Loading...",
                ));
            }
            ModelState::Error(LoadError::NotFound(_)) => {
                banners.push(Banner::new(
                    BannerKind::Error,
                    "Model file not found! Please place the model in the app directory.",
                ));
            }
            ModelState::Error(e) => {
                banners.push(Banner::new(
                    BannerKind::Error,
                    format!("Error loading model: {e}"),
                ));
            }
            ModelState::Loaded(_) => {}
        }

        if let Some(error) = &self.upload_error {
            banners.push(Banner::new(BannerKind::Error, error.clone()));
        }

        if self.document.is_some() {
            banners.push(Banner::new(BannerKind::Success, "PDF loaded successfully!"));
        }

        if matches!(model, ModelState::Error(_)) {
            banners.push(Banner::new(
                BannerKind::Warning,
                "The Llama model could not be loaded. Please check the model file.",
            ));
        } else if model.is_ready() && !self.has_text() {
            banners.push(Banner::new(
                BannerKind::Info,
                "Please upload a PDF file to begin.",
            ));
        }

        if let Some(answer @ QueryAnswer::Failed(_)) = &self.answer {
            banners.push(Banner::new(BannerKind::Error, answer.to_string()));
        }

        banners
    }

    /// Answer text to display, if the last question succeeded
    pub fn answer_text(&self) -> Option<&str> {
        match &self.answer {
            Some(QueryAnswer::Answered(text)) => Some(text),
            _ => None,
        }
    }
}
