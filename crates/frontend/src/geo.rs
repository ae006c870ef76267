//! Browser geolocation collaborator.
//!
//! The Geolocation API is callback-based; exactly one of the two callbacks
//! fires, so the completion handler sits in a shared slot both sides take
//! from. Re-entrancy is gated by the caller through
//! `InteractionState::begin_locating`, so at most one request is in flight.

use std::cell::RefCell;
use std::rc::Rc;

use leakwatch_shared::models::LatLng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{GeolocationPosition, GeolocationPositionError};

pub const UNSUPPORTED_NOTICE: &str = "Your browser doesn't support geolocation.";
pub const FAILED_NOTICE: &str =
    "The geolocation service failed. Please check your browser permissions.";

/// Request the device position once, completing with `on_done`.
pub fn request_position<F>(on_done: F)
where
    F: FnOnce(Result<LatLng, String>) + 'static,
{
    let slot = Rc::new(RefCell::new(Some(on_done)));
    let complete = |slot: &Rc<RefCell<Option<F>>>, result: Result<LatLng, String>| {
        if let Some(done) = slot.borrow_mut().take() {
            done(result);
        }
    };

    let geolocation = match web_sys::window().map(|w| w.navigator().geolocation()) {
        Some(Ok(geolocation)) => geolocation,
        _ => {
            complete(&slot, Err(UNSUPPORTED_NOTICE.to_string()));
            return;
        }
    };

    let success = {
        let slot = Rc::clone(&slot);
        Closure::once(move |position: GeolocationPosition| {
            let coords = position.coords();
            let result = LatLng::new(coords.latitude(), coords.longitude())
                .map_err(|e| e.to_string());
            if let Some(done) = slot.borrow_mut().take() {
                done(result);
            }
        })
    };
    let failure = {
        let slot = Rc::clone(&slot);
        Closure::once(move |_error: GeolocationPositionError| {
            if let Some(done) = slot.borrow_mut().take() {
                done(Err(FAILED_NOTICE.to_string()));
            }
        })
    };

    if geolocation
        .get_current_position_with_error_callback(
            success.as_ref().unchecked_ref(),
            Some(failure.as_ref().unchecked_ref()),
        )
        .is_err()
    {
        complete(&slot, Err(FAILED_NOTICE.to_string()));
        return;
    }

    // The browser owns the callbacks now; exactly one will fire.
    success.forget();
    failure.forget();
}
