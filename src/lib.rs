//! Wallet risk explorer: force-directed transaction graphs, a risk dial and
//! downloadable assessment reports, rendered client-side with Leptos.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod api;
pub mod camera;
mod components;
pub mod config;
pub mod error;
pub mod model;
mod pages;
pub mod report;
pub mod risk;

// Top-Level pages
use crate::config::AppConfig;
use crate::pages::graph::GraphView;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::validate::Validate;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Routes for the landing page, the graph view and the assessment view.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(AppConfig::default());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Wallet Risk Network" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/graph/:address") view=GraphView />
				<Route path=path!("/validate") view=Validate />
			</Routes>
		</Router>
	}
}
