use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;

use crate::api::RiskClient;
use crate::camera::{CameraController, LoadGeneration};
use crate::components::force_graph::{ForceGraphCanvas, GraphData};
use crate::config::AppConfig;
use crate::model::{GraphModel, GraphModelBuilder};
use crate::risk::{RiskEncoder, SuspicionTier};

pub fn zoom_readout(scale: f64) -> String {
	format!("{scale:.1}x")
}

pub fn legend_caption(tier: SuspicionTier, lower: u32, upper: u32) -> String {
	format!("{} ({lower}-{upper})", tier.name())
}

/// Loads one wallet graph. Responses from an earlier address are discarded.
#[component]
pub fn GraphView() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let encoder = RiskEncoder::from_config(&config);
	let builder = GraphModelBuilder::new(encoder.graph);
	let client = RiskClient::new(config.api.clone());

	let params = use_params_map();
	let address = Memo::new(move |_| params.read().get("address").unwrap_or_default());

	let camera = StoredValue::new(CameraController::new(config.camera.clone()));
	let loads = StoredValue::new(LoadGeneration::default());
	let model = RwSignal::new(None::<GraphModel>);
	let graph = RwSignal::new(GraphData::default());
	let loading = RwSignal::new(true);
	let error = RwSignal::new(None::<String>);
	let hovered = RwSignal::new(None::<String>);
	let scale = RwSignal::new(config.camera.initial_scale);
	let settled_scale = config.camera.settled_scale;

	Effect::new(move |_| {
		let wallet = address.get();
		let Some(current) = loads.try_update_value(LoadGeneration::begin) else {
			return;
		};
		camera.update_value(|c| c.reset());
		loading.set(true);
		error.set(None);
		hovered.set(None);

		let client = client.clone();
		spawn_local(async move {
			log::info!("loading graph for {wallet}");
			let result = client.fetch_graph(&wallet).await;
			if loads.try_with_value(|l| l.is_current(current)) != Some(true) {
				log::debug!("dropping stale graph response for {wallet}");
				return;
			}
			match result {
				Ok(payload) => {
					let built = builder.build(&payload);
					let data = GraphData::from_model(&built, &encoder);
					let node_count = data.nodes.len();
					camera.update_value(|c| c.content_ready(node_count, js_sys::Date::now()));
					scale.set(settled_scale);
					model.set(Some(built));
					graph.set(data);
				}
				Err(err) => {
					log::error!("graph fetch for {wallet} failed: {err}");
					model.set(None);
					graph.set(GraphData::default());
					error.set(Some(err.to_string()));
				}
			}
			loading.set(false);
		});
	});

	let on_zoom = move |ev: leptos::ev::Event| {
		let Ok(requested) = event_target_value(&ev).parse::<f64>() else {
			return;
		};
		let applied = camera.try_update_value(|c| {
			c.set_scale(requested, js_sys::Date::now());
			c.scale()
		});
		if let Some(applied) = applied {
			scale.set(applied);
		}
	};

	let tooltip = move || {
		let id = hovered.get()?;
		model.with(|m| m.as_ref()?.node(&id).map(|n| n.tooltip.clone()))
	};

	let legend = encoder
		.graph
		.legend()
		.into_iter()
		.map(|(tier, lower, upper)| {
			let swatch = format!("background: {};", tier.color().to_hex());
			view! {
				<div class="legend-row">
					<span class="legend-swatch" style=swatch></span>
					<span>{legend_caption(tier, lower, upper)}</span>
				</div>
			}
		})
		.collect_view();

	view! {
		<div class="fullscreen-graph">
			<Show when=move || !loading.get() fallback=|| view! { <div class="status">"Loading graph..."</div> }>
				{move || match error.get() {
					Some(message) => view! {
						<div class="status error">
							<h2>"Error Loading Data"</h2>
							<p>{message}</p>
						</div>
					}
					.into_any(),
					None if graph.with(|g| g.nodes.is_empty()) => {
						view! { <div class="status">"No data available"</div> }.into_any()
					}
					None => view! {
						<ForceGraphCanvas
							data=graph
							camera=camera
							on_hover=Callback::new(move |id| hovered.set(id))
							fullscreen=true
						/>
					}
					.into_any(),
				}}
			</Show>

			<div class="graph-overlay">
				<h1>"Wallet Risk Network"</h1>
				<p class="subtitle">{move || address.get()}</p>
				<div class="zoom-control">
					<label for="graph-zoom">"Zoom"</label>
					<input
						id="graph-zoom"
						aria-label="Graph zoom"
						type="range"
						min=config.camera.min_scale
						max=config.camera.max_scale
						step=config.camera.scale_step
						prop:value=move || scale.get()
						on:input=on_zoom
					/>
					<span class="zoom-readout">{move || zoom_readout(scale.get())}</span>
				</div>
			</div>

			<div class="legend">
				<div class="legend-title">"Risk Levels"</div>
				{legend}
			</div>

			{move || tooltip().map(|text| view! { <pre class="tooltip">{text}</pre> })}
		</div>
	}
}
