//! Loading indicators

use dioxus::prelude::*;

/// Spinning ring, `size` in pixels
#[component]
pub fn Spinner(size: u32) -> Element {
    rsx! {
        div {
            class: "spinner",
            style: "width: {size}px; height: {size}px;",
        }
    }
}

/// Spinner with a caption, shown while the window waits on the model
#[component]
pub fn LoadingRow(label: String) -> Element {
    rsx! {
        div {
            class: "loading-row",
            Spinner { size: 16 }
            span { "{label}" }
        }
    }
}
