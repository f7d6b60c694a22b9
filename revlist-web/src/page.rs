//! Page-level view state with a stale-result guard
//!
//! A page shows whatever its latest load produced. Starting a new load, or
//! tearing the page down, cancels the load in flight; a load that finishes
//! after that is dropped instead of overwriting newer state.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Cancelled;
use crate::payment::{PaymentCheck, PaymentStatus};
use crate::product_view::{ProductView, ViewError};

/// What a page currently displays
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    Ready(T),
    /// The requested entity does not exist; the page navigates away
    NotFound,
    /// Nothing to load (e.g. no payment id on the return page)
    Unavailable,
    Failed(String),
}

impl PageState<ProductView> {
    /// Page state for a product view load; `None` if the load was cancelled
    pub fn from_view(result: Result<ProductView, ViewError>) -> Option<Self> {
        match result {
            Ok(view) => Some(PageState::Ready(view)),
            Err(ViewError::NotFound(_)) => Some(PageState::NotFound),
            Err(ViewError::Store(msg)) => Some(PageState::Failed(msg)),
            Err(ViewError::Cancelled(_)) => None,
        }
    }
}

impl PageState<PaymentStatus> {
    /// Page state for a payment check; `None` if the check was cancelled
    pub fn from_payment(result: Result<PaymentCheck, Cancelled>) -> Option<Self> {
        match result {
            Ok(PaymentCheck::Resolved(status)) => Some(PageState::Ready(status)),
            Ok(PaymentCheck::Unavailable) => Some(PageState::Unavailable),
            Err(Cancelled) => None,
        }
    }
}

/// Ticket for one load; only the newest ticket may commit
#[derive(Debug, Clone)]
pub struct PageLoad {
    generation: u64,
    token: CancellationToken,
}

impl PageLoad {
    /// Cancellation signal to hand to the pipeline
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Latest view state of one page, shared with whoever renders it
pub struct PageSlot<T> {
    state: watch::Sender<PageState<T>>,
    generation: AtomicU64,
    current: watch::Sender<CancellationToken>,
    root: CancellationToken,
}

impl<T> PageSlot<T> {
    pub fn new() -> Self {
        let root = CancellationToken::new();
        let (state, _) = watch::channel(PageState::Loading);
        let (current, _) = watch::channel(root.child_token());

        Self {
            state,
            generation: AtomicU64::new(0),
            current,
            root,
        }
    }

    /// Start a new load, cancelling the one in flight
    ///
    /// After teardown the page state is left alone and the returned ticket is
    /// already cancelled.
    pub fn begin(&self) -> PageLoad {
        if self.root.is_cancelled() {
            return PageLoad {
                generation: self.generation.load(Ordering::SeqCst),
                token: self.root.child_token(),
            };
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = PageState::Loading;
        });

        let token = self.root.child_token();
        let previous = self.current.send_replace(token.clone());
        previous.cancel();

        PageLoad { generation, token }
    }

    /// Publish a load's result if it is still the newest live load
    ///
    /// Returns `false` when the result was discarded as stale.
    pub fn commit(&self, load: &PageLoad, result: PageState<T>) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if load.token.is_cancelled()
                || self.generation.load(Ordering::SeqCst) != load.generation
            {
                return false;
            }
            *state = result;
            true
        });

        if !applied {
            debug!(generation = load.generation, "Discarded stale page load");
        }
        applied
    }

    /// Run one load to completion and commit its result
    ///
    /// `run` returns `None` when it stopped because of cancellation.
    pub async fn load<F, Fut>(&self, run: F) -> bool
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Option<PageState<T>>>,
    {
        let load = self.begin();
        match run(load.token.clone()).await {
            Some(result) => self.commit(&load, result),
            None => false,
        }
    }

    /// Page is gone: cancel the current load and refuse all later commits
    pub fn teardown(&self) {
        self.root.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.root.is_cancelled()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState<T>> {
        self.state.subscribe()
    }
}

impl<T: Clone> PageSlot<T> {
    pub fn current(&self) -> PageState<T> {
        self.state.borrow().clone()
    }
}

impl<T> Default for PageSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
