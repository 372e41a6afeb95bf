//! # Simulated Backend
//!
//! Login, registration, order submission and AR start-up all "talk to a
//! server" in the storefront. There is no server: each call is a tokio task
//! that sleeps for a configured delay and then succeeds.
//!
//! ## Pending Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  backend.login(form) ──► tokio::spawn(sleep(delay); Ok(session))        │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  PendingOperation<AuthSession>                                          │
//! │          │                                                              │
//! │          ├── .await ──────────► Ok(AuthSession)                         │
//! │          │                                                              │
//! │          └── .cancel() ─► abort ─► .await ─► Err(Cancelled)             │
//! │                                                                         │
//! │  Dropping a PendingOperation does NOT cancel it: the task runs to the   │
//! │  end and its result is discarded.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers validate forms BEFORE calling the backend. The backend itself
//! never rejects anything.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;
use vitrine_core::account::{LoginForm, RegistrationForm};
use vitrine_core::checkout::CheckoutQuote;
use vitrine_core::viewer::ArPath;

use crate::config::SimulatedDelays;
use crate::error::{BackendError, BackendResult};

// =============================================================================
// Pending Operation
// =============================================================================

/// A backend call in flight.
#[derive(Debug)]
pub struct PendingOperation<T> {
    handle: JoinHandle<BackendResult<T>>,
}

impl<T: Send + 'static> PendingOperation<T> {
    /// Runs `fut` on the current tokio runtime.
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = BackendResult<T>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(fut),
        }
    }
}

impl<T> PendingOperation<T> {
    /// Stops the operation. Awaiting it afterwards yields `Cancelled`
    /// unless it had already finished.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for PendingOperation<T> {
    type Output = BackendResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) if e.is_cancelled() => Poll::Ready(Err(BackendError::Cancelled)),
            Poll::Ready(Err(e)) => Poll::Ready(Err(BackendError::TaskFailed(e.to_string()))),
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// A signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub remember_me: bool,
    pub signed_in_at: DateTime<Utc>,
}

/// What checkout sends to the order service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub email: String,
    pub quote: CheckoutQuote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// `ORD-` followed by eight uppercase hex digits.
    pub order_id: String,
    pub placed_at: DateTime<Utc>,
}

/// An AR session that finished its start-up sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArSession {
    pub session_id: String,
    pub path: ArPath,
    pub started_at: DateTime<Utc>,
}

// =============================================================================
// Backend Trait
// =============================================================================

/// The remote services the storefront would call.
pub trait Backend: Send + Sync {
    fn login(&self, form: LoginForm) -> PendingOperation<AuthSession>;

    fn register(&self, form: RegistrationForm) -> PendingOperation<AuthSession>;

    fn submit_order(&self, order: OrderRequest) -> PendingOperation<OrderReceipt>;

    fn start_ar(&self, path: ArPath) -> PendingOperation<ArSession>;
}

/// Sleeps, then succeeds.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    delays: SimulatedDelays,
}

impl SimulatedBackend {
    pub fn new(delays: SimulatedDelays) -> Self {
        Self { delays }
    }

    pub fn delays(&self) -> &SimulatedDelays {
        &self.delays
    }
}

fn user_id_for(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, normalized.as_bytes());
    format!("user-{}", id.simple())
}

async fn after<T>(delay: Duration, value: impl FnOnce() -> T) -> BackendResult<T> {
    tokio::time::sleep(delay).await;
    Ok(value())
}

impl Backend for SimulatedBackend {
    fn login(&self, form: LoginForm) -> PendingOperation<AuthSession> {
        let delay = self.delays.login;
        PendingOperation::spawn(after(delay, move || {
            let display_name = form
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string();
            info!(email = %form.email, "Shopper signed in");
            AuthSession {
                user_id: user_id_for(&form.email),
                email: form.email,
                display_name,
                remember_me: form.remember_me,
                signed_in_at: Utc::now(),
            }
        }))
    }

    fn register(&self, form: RegistrationForm) -> PendingOperation<AuthSession> {
        let delay = self.delays.register;
        PendingOperation::spawn(after(delay, move || {
            info!(email = %form.email, "Shopper registered");
            AuthSession {
                user_id: user_id_for(&form.email),
                display_name: form.display_name(),
                email: form.email,
                remember_me: false,
                signed_in_at: Utc::now(),
            }
        }))
    }

    fn submit_order(&self, order: OrderRequest) -> PendingOperation<OrderReceipt> {
        let delay = self.delays.checkout;
        PendingOperation::spawn(after(delay, move || {
            let order_id = format!("ORD-{:08X}", rand::random::<u32>());
            info!(
                order_id = %order_id,
                email = %order.email,
                total_cents = order.quote.total.cents(),
                "Order submitted"
            );
            OrderReceipt {
                order_id,
                placed_at: Utc::now(),
            }
        }))
    }

    fn start_ar(&self, path: ArPath) -> PendingOperation<ArSession> {
        let delay = self.delays.ar_init;
        PendingOperation::spawn(after(delay, move || {
            let session_id = Uuid::new_v4().to_string();
            info!(session_id = %session_id, ?path, "AR session started");
            ArSession {
                session_id,
                path,
                started_at: Utc::now(),
            }
        }))
    }
}
