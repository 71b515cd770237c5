//! Status banner component

use crate::session::{Banner, BannerKind};
use dioxus::prelude::*;

fn banner_class(kind: BannerKind) -> &'static str {
    match kind {
        BannerKind::Info => "banner banner-info",
        BannerKind::Success => "banner banner-success",
        BannerKind::Warning => "banner banner-warning",
        BannerKind::Error => "banner banner-error",
    }
}

#[component]
pub fn StatusBanner(banner: Banner) -> Element {
    let class = banner_class(banner.kind);

    rsx! {
        div {
            class: "{class}",
            "{banner.message}"
        }
    }
}
