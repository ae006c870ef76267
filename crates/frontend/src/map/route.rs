//! The routed-path overlay.
//!
//! `update` is re-run whenever either endpoint changes and decides, without
//! any external call, whether to clear the overlay or request a new path.
//! Requests carry a ticket; a response whose ticket no longer matches the
//! current endpoints is discarded, so a slow lookup can never overwrite a
//! newer route or repaint a cleared one.

use leakwatch_shared::models::LatLng;
use tracing::warn;

use super::surface::MapSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum RouteCommand {
    /// An endpoint is missing: clear the overlay now, call nobody.
    Clear,
    /// Endpoints unchanged since the last request: nothing to do.
    Unchanged,
    /// Issue exactly one lookup for this pair and complete with the ticket.
    Request {
        origin: LatLng,
        destination: LatLng,
        ticket: RouteTicket,
    },
}

#[derive(Debug, Default)]
pub struct RoutePlan {
    endpoints: Option<(LatLng, LatLng)>,
    generation: u64,
}

impl RoutePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, origin: Option<LatLng>, destination: Option<LatLng>) -> RouteCommand {
        match (origin, destination) {
            (Some(origin), Some(destination)) => {
                if self.endpoints == Some((origin, destination)) {
                    return RouteCommand::Unchanged;
                }
                self.endpoints = Some((origin, destination));
                self.generation += 1;
                RouteCommand::Request {
                    origin,
                    destination,
                    ticket: RouteTicket(self.generation),
                }
            }
            _ => {
                self.endpoints = None;
                // Bump so any in-flight response is discarded too.
                self.generation += 1;
                RouteCommand::Clear
            }
        }
    }

    fn is_current(&self, ticket: RouteTicket) -> bool {
        self.endpoints.is_some() && ticket.0 == self.generation
    }

    /// Apply a finished lookup. Returns a user-visible notice on failure.
    /// Stale tickets are silently discarded.
    pub fn complete(
        &mut self,
        surface: &mut MapSurface,
        ticket: RouteTicket,
        outcome: Result<Vec<LatLng>, String>,
    ) -> Option<String> {
        if !self.is_current(ticket) {
            return None;
        }
        match outcome {
            Ok(points) if !points.is_empty() => {
                surface.set_path(points);
                None
            }
            Ok(_) => {
                surface.clear_path();
                Some("The routing service returned no route.".to_string())
            }
            Err(message) => {
                warn!(error = %message, "route lookup failed");
                surface.clear_path();
                Some(format!("Route lookup failed: {message}"))
            }
        }
    }
}
