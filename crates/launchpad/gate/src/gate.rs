use tracing::{debug, info};

/// A type-erased action for ad-hoc gating.
pub type DeferredAction = Box<dyn FnOnce() + Send + 'static>;

/// What the caller should do after [`WalletGate::require_wallet`].
#[derive(Debug, PartialEq, Eq)]
pub enum GateDecision<A> {
    /// The wallet is connected; run the action now.
    Proceed(A),
    /// The action is held until the wallet connects.
    Deferred {
        /// Whether an earlier pending action was replaced
        replaced: bool,
    },
}

/// Holds at most one action until a wallet is connected.
///
/// `A` is the pending action value. The workflow uses a tagged enum of its
/// actions; [`DeferredAction`] closures are supported for ad-hoc use through
/// [`WalletGate::require`] and [`WalletGate::notify_connected`].
#[derive(Debug)]
pub struct WalletGate<A> {
    pending: Option<A>,
    prompt_visible: bool,
}

impl<A> WalletGate<A> {
    pub fn new() -> Self {
        Self {
            pending: None,
            prompt_visible: false,
        }
    }

    /// Route `action` through the gate.
    ///
    /// When `connected` the action is handed straight back for execution and
    /// any older pending action is discarded.
    /// Otherwise it becomes the pending action, replacing any earlier one,
    /// and the connection prompt is raised.
    pub fn require_wallet(&mut self, connected: bool, action: A) -> GateDecision<A> {
        if connected {
            self.prompt_visible = false;
            if self.pending.take().is_some() {
                debug!("older pending action superseded by a connected request");
            }
            debug!("wallet connected, gated action proceeds");
            return GateDecision::Proceed(action);
        }

        let replaced = self.pending.replace(action).is_some();
        self.prompt_visible = true;
        info!(replaced, "gated action deferred until wallet connects");
        GateDecision::Deferred { replaced }
    }

    /// Connection-success notification.
    ///
    /// Takes the pending action (at most once) and dismisses the prompt.
    pub fn on_connected(&mut self) -> Option<A> {
        self.prompt_visible = false;
        let action = self.pending.take();
        if action.is_some() {
            info!("wallet connected, releasing pending action");
        }
        action
    }

    /// The user cancelled the prompt: drop the pending action unrun.
    ///
    /// Returns whether an action was dropped.
    pub fn dismiss(&mut self) -> bool {
        self.prompt_visible = false;
        let dropped = self.pending.take().is_some();
        if dropped {
            debug!("wallet prompt dismissed, pending action dropped");
        }
        dropped
    }

    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the host should show its wallet connection prompt.
    pub fn is_prompt_visible(&self) -> bool {
        self.prompt_visible
    }
}

impl<A> Default for WalletGate<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletGate<DeferredAction> {
    /// Run `action` now if connected, otherwise hold it.
    ///
    /// Returns whether the action ran.
    pub fn require<F>(&mut self, connected: bool, action: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.require_wallet(connected, Box::new(action)) {
            GateDecision::Proceed(action) => {
                action();
                true
            }
            GateDecision::Deferred { .. } => false,
        }
    }

    /// Connection-success notification for closure gates: runs the pending
    /// action, if any. Returns whether an action ran.
    pub fn notify_connected(&mut self) -> bool {
        match self.on_connected() {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }
}
