use dioxus::prelude::*;
use dioxus_router::prelude::*;

use crate::styles;
use crate::Route;

#[component]
pub fn Navbar() -> Element {
    rsx! {
        div {
            class: styles::LAYOUT,
            aside {
                class: styles::SIDEBAR,
                nav {
                    ul {
                        li {
                            Link {
                                to: Route::Home {},
                                class: styles::NAV_LINK,
                                "Devices"
                            }
                        }
                        li {
                            Link {
                                to: Route::Settings {},
                                class: styles::NAV_LINK,
                                "Settings"
                            }
                        }
                    }
                }
            }

            main {
                class: styles::CONTENT,
                Outlet::<Route> {}
            }
        }
    }
}
