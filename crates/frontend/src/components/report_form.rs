use dioxus::prelude::*;
use leakwatch_shared::models::{LatLng, Severity, ValidationError};

/// A validated submission ready to be added to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub location_name: String,
    pub position: LatLng,
    pub severity: Severity,
}

/// Parse raw form fields into a draft. Pure, so the validation rules are
/// testable without a DOM; errors stay inside the form as inline messages.
pub fn parse_draft(
    location_name: &str,
    lat: &str,
    lng: &str,
    severity: Severity,
) -> Result<ReportDraft, String> {
    let location_name = location_name.trim();
    if location_name.is_empty() {
        return Err(ValidationError::EmptyLocationName.to_string());
    }
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| ValidationError::LatitudeOutOfRange.to_string())?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| ValidationError::LongitudeOutOfRange.to_string())?;
    let position = LatLng::new(lat, lng).map_err(|e| e.to_string())?;
    Ok(ReportDraft {
        location_name: location_name.to_string(),
        position,
        severity,
    })
}

#[component]
pub fn ReportForm(
    prefill: ReadSignal<Option<LatLng>>,
    on_submit: EventHandler<ReportDraft>,
) -> Element {
    let mut location_name = use_signal(String::new);
    let mut lat = use_signal(String::new);
    let mut lng = use_signal(String::new);
    let mut severity = use_signal(|| Severity::Low);
    let mut error = use_signal(|| None::<String>);

    // A map click drops the picked point into the coordinate fields.
    use_effect(move || {
        if let Some(point) = *prefill.read() {
            lat.set(format!("{:.5}", point.lat()));
            lng.set(format!("{:.5}", point.lng()));
        }
    });

    rsx! {
        div { class: "panel report-form",
            h2 { "Report a New Leak" }
            form {
                onsubmit: move |evt: Event<FormData>| {
                    evt.prevent_default();
                    let parsed = parse_draft(
                        &location_name.read(),
                        &lat.read(),
                        &lng.read(),
                        *severity.read(),
                    );
                    match parsed {
                        Ok(draft) => {
                            error.set(None);
                            location_name.set(String::new());
                            lat.set(String::new());
                            lng.set(String::new());
                            severity.set(Severity::Low);
                            on_submit.call(draft);
                        }
                        Err(message) => error.set(Some(message)),
                    }
                },

                label { r#for: "location-name", "Location Name" }
                input {
                    id: "location-name",
                    r#type: "text",
                    placeholder: "e.g., Near Marina Beach",
                    value: "{location_name}",
                    oninput: move |evt: Event<FormData>| location_name.set(evt.value().to_string()),
                }

                div { class: "coord-fields",
                    div {
                        label { r#for: "latitude", "Latitude" }
                        input {
                            id: "latitude",
                            r#type: "number",
                            step: "any",
                            placeholder: "13.0827",
                            value: "{lat}",
                            oninput: move |evt: Event<FormData>| lat.set(evt.value().to_string()),
                        }
                    }
                    div {
                        label { r#for: "longitude", "Longitude" }
                        input {
                            id: "longitude",
                            r#type: "number",
                            step: "any",
                            placeholder: "80.2707",
                            value: "{lng}",
                            oninput: move |evt: Event<FormData>| lng.set(evt.value().to_string()),
                        }
                    }
                }

                label { r#for: "severity", "Severity" }
                select {
                    id: "severity",
                    value: "{severity}",
                    onchange: move |evt: Event<FormData>| {
                        if let Some(parsed) = Severity::from_label(&evt.value()) {
                            severity.set(parsed);
                        }
                    },
                    for s in Severity::ALL {
                        option { value: "{s}", selected: *severity.read() == s, "{s}" }
                    }
                }

                if let Some(message) = error.read().clone() {
                    p { class: "form-error", "{message}" }
                }

                button { r#type: "submit", class: "submit-report", "Submit Report" }
            }
        }
    }
}
