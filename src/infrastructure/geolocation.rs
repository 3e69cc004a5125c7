//! Device position capture for delivery orders.
//!
//! The platform supplies a [`PositionSource`]; [`LocationCapture`] keeps at most one
//! lookup in flight and hands out a cancel handle for it. A cancelled lookup never
//! reaches the draft, whatever the source answers afterwards.

use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;
use crate::domain::aggregates::Checkout;
use crate::domain::value_objects::Coordinates;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Geolocation is not supported on this device")]
    Unsupported,
    #[error("Location permission denied")]
    Denied,
    #[error("Location lookup timed out")]
    Timeout,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

pub type PositionResult = std::result::Result<Coordinates, GeolocationError>;

pub trait PositionSource {
    /// Starts one lookup. The answer arrives on the returned receiver.
    fn request_position(&self) -> oneshot::Receiver<PositionResult>;
}

#[derive(Clone, Debug)]
pub struct CancelHandle { id: Uuid, token: CancellationToken }

impl CancelHandle {
    pub fn id(&self) -> Uuid { self.id }
    pub fn cancel(&self) { self.token.cancel(); }
    pub fn is_cancelled(&self) -> bool { self.token.is_cancelled() }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Located(Coordinates),
    Failed(GeolocationError),
    Cancelled,
    Pending,
    Idle,
}

#[derive(Debug)]
struct PendingLookup {
    id: Uuid,
    receiver: oneshot::Receiver<PositionResult>,
    token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct LocationCapture { pending: Option<PendingLookup> }

impl LocationCapture {
    pub fn new() -> Self { Self::default() }

    pub fn is_pending(&self) -> bool { self.pending.is_some() }

    /// Starts a lookup, cancelling whichever one was still in flight.
    pub fn start(&mut self, source: &dyn PositionSource) -> CancelHandle {
        self.cancel();
        let id = Uuid::new_v4();
        let token = CancellationToken::new();
        self.pending = Some(PendingLookup { id, receiver: source.request_position(), token: token.clone() });
        debug!(lookup = %id, "Location lookup started");
        CancelHandle { id, token }
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
            debug!(lookup = %pending.id, "Location lookup cancelled");
        }
    }

    /// Checks the in-flight lookup without waiting.
    pub fn poll(&mut self, checkout: &mut Checkout) -> CaptureOutcome {
        let Some(mut pending) = self.pending.take() else { return CaptureOutcome::Idle };
        if pending.token.is_cancelled() { return CaptureOutcome::Cancelled; }
        match pending.receiver.try_recv() {
            Ok(result) => settle(pending.id, result, checkout),
            Err(TryRecvError::Empty) => { self.pending = Some(pending); CaptureOutcome::Pending }
            Err(TryRecvError::Closed) => settle(pending.id, Err(source_dropped()), checkout),
        }
    }

    /// Waits for the in-flight lookup to answer or be cancelled.
    pub async fn wait(&mut self, checkout: &mut Checkout) -> CaptureOutcome {
        let Some(pending) = self.pending.take() else { return CaptureOutcome::Idle };
        let PendingLookup { id, receiver, token } = pending;
        tokio::select! {
            biased;
            _ = token.cancelled() => CaptureOutcome::Cancelled,
            answer = receiver => settle(id, answer.unwrap_or_else(|_| Err(source_dropped())), checkout),
        }
    }
}

fn source_dropped() -> GeolocationError { GeolocationError::Unavailable("position source went away".into()) }

fn settle(id: Uuid, result: PositionResult, checkout: &mut Checkout) -> CaptureOutcome {
    match result {
        Ok(coords) => {
            checkout.set_coordinates(Some(coords));
            debug!(lookup = %id, lat = coords.lat, lng = coords.lng, "Location captured");
            CaptureOutcome::Located(coords)
        }
        Err(e) => {
            warn!(lookup = %id, error = %e, "Location lookup failed");
            CaptureOutcome::Failed(e)
        }
    }
}
