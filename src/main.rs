use dioxus::desktop::{Config, WindowBuilder};
use pdf_qa::app::App;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdf_qa=info")),
        )
        .init();

    tracing::info!("Starting PDF question-answer app");

    let window = WindowBuilder::new().with_title("PDF Question-Answer System (Llama LLM)");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(Config::new().with_window(window))
        .launch(App);
}
