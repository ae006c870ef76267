use dioxus::prelude::*;
use leakwatch_shared::models::{LatLng, Role};
use leakwatch_shared::store::IncidentStore;

use crate::components::notice::NoticeBar;
use crate::components::report_form::{ReportDraft, ReportForm};
use crate::map::interaction::InteractionState;
use crate::map::MapView;

/// Citizen view: the report form floating over the live map. Clicking the
/// map prefills the form's coordinates; submitting recenters on the new
/// report.
#[component]
pub fn CitizenPage(store: Signal<IncidentStore>, reporter: String) -> Element {
    let interaction = use_signal(InteractionState::new);
    let mut prefill = use_signal(|| None::<LatLng>);
    let mut center_on = use_signal(|| None::<LatLng>);
    let mut notice = use_signal(|| None::<String>);

    let reports = use_memo(move || store.read().reports().to_vec());

    rsx! {
        div { class: "citizen-page",
            NoticeBar { message: notice }
            div { class: "report-overlay",
                ReportForm {
                    prefill: prefill.into(),
                    on_submit: move |draft: ReportDraft| {
                        let position = draft.position;
                        store.write().add(
                            &draft.location_name,
                            position,
                            draft.severity,
                            &reporter,
                        );
                        center_on.set(Some(position));
                        notice.set(Some("Report submitted. Thank you!".to_string()));
                    },
                }
            }
            MapView {
                reports: reports.into(),
                role: Role::Citizen,
                interaction,
                on_notice: move |message: String| notice.set(Some(message)),
                on_map_pick: move |point: LatLng| prefill.set(Some(point)),
                center_on: center_on.into(),
            }
        }
    }
}
