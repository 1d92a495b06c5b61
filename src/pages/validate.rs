use chrono::Utc;
use leptos::html::Canvas;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::api::RiskClient;
use crate::camera::{CameraController, LoadGeneration};
use crate::components::force_graph::{ForceGraphCanvas, GraphData};
use crate::components::risk_gauge::RiskGauge;
use crate::config::AppConfig;
use crate::model::{AssessmentPayload, GraphModelBuilder, is_evm_address};
use crate::report::{
	CanvasCapture, PageSize, ReportLayout, ReportSynthesizer, RiskReport, SvgPageCanvas,
};
use crate::risk::RiskEncoder;

/// An assessment together with the address it was requested for.
#[derive(Clone, Debug, PartialEq)]
struct Assessment {
	address: String,
	payload: AssessmentPayload,
}

/// Trims the input and checks it names an EVM wallet.
pub fn parse_address(input: &str) -> Result<String, &'static str> {
	let address = input.trim();
	if address.is_empty() {
		return Err("Please enter a valid recipient address");
	}
	if !is_evm_address(address) {
		return Err("Invalid Ethereum address format");
	}
	Ok(address.to_string())
}

fn save_file(filename: &str, contents: &str, mime: &str) -> Result<(), JsValue> {
	let options = BlobPropertyBag::new();
	options.set_type(mime);
	let parts = js_sys::Array::of1(&JsValue::from_str(contents));
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(filename);
	anchor.click();
	Url::revoke_object_url(&url)
}

#[component]
pub fn Validate() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let encoder = RiskEncoder::from_config(&config);
	let builder = GraphModelBuilder::new(encoder.graph);
	let client = RiskClient::new(config.api.clone());
	let synthesizer = StoredValue::new(ReportSynthesizer::new(
		encoder.assessment,
		ReportLayout::default(),
	));

	let input = RwSignal::new(String::new());
	let assessment = RwSignal::new(None::<Assessment>);
	let network = RwSignal::new(GraphData::default());
	let loading = RwSignal::new(false);
	let error = RwSignal::new(None::<String>);
	let loads = StoredValue::new(LoadGeneration::default());
	let camera = StoredValue::new(CameraController::new(config.camera.clone()));
	let gauge_ref = NodeRef::<Canvas>::new();

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		error.set(None);
		let address = match parse_address(&input.get_untracked()) {
			Ok(address) => address,
			Err(message) => {
				error.set(Some(message.to_string()));
				return;
			}
		};

		let Some(current) = loads.try_update_value(LoadGeneration::begin) else {
			return;
		};
		loading.set(true);
		let client = client.clone();
		spawn_local(async move {
			let result = client.fetch_assessment(&address).await;
			if loads.try_with_value(|l| l.is_current(current)) != Some(true) {
				log::debug!("dropping stale assessment for {address}");
				return;
			}
			match result {
				Ok(payload) => {
					log::info!("assessment for {address}: score {}", payload.risk_score);
					let data = payload
						.graph(&address)
						.map(|graph| GraphData::from_model(&builder.build(&graph), &encoder))
						.unwrap_or_default();
					camera.update_value(|c| {
						c.reset();
						c.content_ready(data.nodes.len(), js_sys::Date::now());
					});
					network.set(data);
					assessment.set(Some(Assessment { address, payload }));
				}
				Err(err) => {
					log::error!("assessment for {address} failed: {err}");
					error.set(Some(err.to_string()));
				}
			}
			loading.set(false);
		});
	};

	let on_download = move |_| {
		let Some(current) = assessment.get_untracked() else {
			return;
		};
		let capture = CanvasCapture::new(gauge_ref.get_untracked().map(Into::into));
		let document = synthesizer.with_value(|s| {
			let report = RiskReport::from_assessment(&current.address, &current.payload);
			let canvas = SvgPageCanvas::new(PageSize::A4_PORTRAIT, s.layout().title.clone());
			s.export(&report, Some(&capture), Utc::now(), canvas)
		});
		let filename = document.filename;
		if let Err(err) = save_file(&filename, &document.canvas.into_html(), "text/html") {
			log::error!("saving {filename} failed: {err:?}");
			error.set(Some("Failed to generate report".to_string()));
		}
	};

	let score = Signal::derive(move || {
		assessment.with(|a| a.as_ref().map(|a| a.payload.risk_score).unwrap_or(0))
	});
	let scale = encoder.assessment;
	let badge_style = move || {
		let hex = scale.color(score.get()).to_hex();
		format!("color: {hex}; background-color: {hex}20; border: 1px solid {hex}40;")
	};

	let form = view! {
		<form class="address-form" on:submit=on_submit>
			<input
				type="text"
				placeholder="Recipient address (0x...)"
				prop:value=move || input.get()
				on:input=move |ev| input.set(event_target_value(&ev))
			/>
			<button type="submit" disabled=move || loading.get()>
				{move || if loading.get() { "Analyzing..." } else { "Analyze & Check Risk" }}
			</button>
		</form>
	};

	view! {
		<div class="validate-page">
			<a href="/" class="back-link">"← Back"</a>
			<h1>"Wallet Risk Assessment"</h1>
			{form}
			{move || error.get().map(|message| view! { <div class="form-error">{message}</div> })}

			<Show when=move || assessment.with(Option::is_some)>
				<div class="assessment">
					<a
						class="graph-link"
						href=move || {
							assessment
								.with(|a| a.as_ref().map(|a| format!("/graph/{}", a.address)))
								.unwrap_or_default()
						}
					>
						"Go To Risk Graph"
					</a>

					<RiskGauge score=score scale=scale node_ref=gauge_ref />
					<div class="risk-badge" style=badge_style>
						{move || scale.label(score.get())}
					</div>

					{move || {
						let reasons = assessment
							.with(|a| a.as_ref().map(|a| a.payload.reasons.clone()))
							.unwrap_or_default();
						(!reasons.is_empty())
							.then(|| {
								view! {
									<div class="reasons">
										<h3>"Risk Factors"</h3>
										{reasons
											.into_iter()
											.map(|reason| view! { <div class="reason">{reason}</div> })
											.collect_view()}
									</div>
								}
							})
					}}

					<Show when=move || network.with(|g| !g.nodes.is_empty())>
						<div class="embedded-graph">
							<ForceGraphCanvas data=network camera=camera height=Some(480.0) />
						</div>
					</Show>

					<button class="download" on:click=on_download>
						"Download report"
					</button>
				</div>
			</Show>
		</div>
	}
}
