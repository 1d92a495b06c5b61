use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use super::validate::parse_address;

/// Landing page: jump straight to a wallet's graph or to the full assessment.
#[component]
pub fn Home() -> impl IntoView {
	let input = RwSignal::new(String::new());
	let error = RwSignal::new(None::<&'static str>);
	let navigate = use_navigate();

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		match parse_address(&input.get_untracked()) {
			Ok(address) => {
				error.set(None);
				navigate(&format!("/graph/{address}"), Default::default());
			}
			Err(message) => error.set(Some(message)),
		}
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="home">
				<h1>"Wallet Risk Network"</h1>
				<p class="subtitle">"Blockchain transaction graph with risk-based visualization"</p>
				<form class="address-form" on:submit=on_submit>
					<input
						type="text"
						placeholder="Wallet address (0x...)"
						prop:value=move || input.get()
						on:input=move |ev| input.set(event_target_value(&ev))
					/>
					<button type="submit">"Show graph"</button>
				</form>
				{move || error.get().map(|message| view! { <div class="form-error">{message}</div> })}
				<a href="/validate" class="validate-link">"Run a full risk assessment"</a>
			</div>
		</ErrorBoundary>
	}
}
