//! # Kiosk Runtime
//!
//! One task owns the [`CheckoutSession`] and applies events in arrival
//! order; everything else only sends.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  Kiosk::run                                                        │
//! │                                                                    │
//! │   spawn keyboard ─┐                                                │
//! │   spawn ad ticker ├──► mpsc<KioskEvent> ──► apply() ──► render()   │
//! │   spawn pruner   ─┘                            │                   │
//! │                                                ▼                   │
//! │   Ctrl-C / Quit / EOF ──► teardown: tickers, keyboard, session     │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use checkout_core::{Catalog, CheckoutSession};
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::KioskConfig;
use crate::error::KioskResult;
use crate::event::{Command, KioskEvent};
use crate::keyboard;
use crate::render::Renderer;
use crate::ticker;

/// Capacity of the event channel. A scan burst is a dozen keys.
const EVENT_BUFFER: usize = 256;

/// A running kiosk: the session plus where its screen goes.
pub struct Kiosk<C, W> {
    session_id: Uuid,
    session: CheckoutSession<C>,
    renderer: Renderer,
    out: W,
    ad_rotation: Duration,
    prune_interval: Duration,
}

impl<C: Catalog, W: Write> Kiosk<C, W> {
    pub fn new(config: &KioskConfig, catalog: C, out: W) -> Self {
        Kiosk {
            session_id: Uuid::new_v4(),
            session: CheckoutSession::new(catalog, config.session_config()),
            renderer: Renderer::new(config),
            out,
            ad_rotation: config.ad_rotation(),
            prune_interval: config.prune_interval(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn session(&self) -> &CheckoutSession<C> {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Writes the current view.
    pub fn render(&mut self) -> KioskResult<()> {
        let text = self.renderer.view(&self.session.view())?;
        self.write_line(&text)
    }

    fn write_line(&mut self, text: &str) -> KioskResult<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    /// Applies one event to the session.
    ///
    /// ## Returns
    /// `Break` when the session should end.
    pub fn apply(&mut self, event: KioskEvent) -> KioskResult<ControlFlow<()>> {
        match event {
            KioskEvent::Key(key) => {
                // Only a completed scan changes what's on screen
                if self.session.handle_key(key).is_some() {
                    self.render()?;
                }
            }

            KioskEvent::Command(command) => return self.apply_command(command),

            KioskEvent::RotateAd => {
                self.session.rotate_ad();
                self.render()?;
            }

            KioskEvent::PruneNotifications(now) => {
                if self.session.prune_notifications(now) > 0 {
                    self.render()?;
                }
            }

            KioskEvent::InputClosed => {
                info!("Input closed, ending session");
                return Ok(ControlFlow::Break(()));
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    fn apply_command(&mut self, command: Command) -> KioskResult<ControlFlow<()>> {
        debug!(?command, "Operator command");
        let now = Instant::now();

        match command {
            Command::Search(query) => {
                if self.session.search(&query, now).is_none() {
                    info!(query = %query, "Search found nothing");
                }
            }
            Command::Find(query) => {
                let products = self.session.search_results(&query);
                let text = self.renderer.matches(&query, &products)?;
                self.write_line(&text)?;
                return Ok(ControlFlow::Continue(()));
            }
            Command::AddRecommended(index) => {
                if self.session.add_recommended(index, now).is_none() {
                    warn!(number = index + 1, "No such recommendation");
                }
            }
            Command::ChangeQuantity { product_id, delta } => {
                self.session.change_quantity(&product_id, delta);
            }
            Command::Remove(product_id) => {
                self.session.remove_item(&product_id);
            }
            Command::Pay => {
                self.session.proceed_to_payment();
            }
            Command::ClearError => self.session.clear_error(),
            Command::Quit => {
                info!("Quit requested");
                return Ok(ControlFlow::Break(()));
            }
        }

        self.render()?;
        Ok(ControlFlow::Continue(()))
    }

    /// Runs the session until quit, end of input, or Ctrl-C.
    ///
    /// `input` is stdin in production.
    pub async fn run<R>(&mut self, input: R) -> KioskResult<()>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let span = info_span!("session", id = %self.session_id);
        self.run_inner(input).instrument(span).await
    }

    async fn run_inner<R>(&mut self, input: R) -> KioskResult<()>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        info!("Checkout session started");

        let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);

        let keyboard = keyboard::spawn(input, tx.clone());
        let ads = ticker::spawn("ads", self.ad_rotation, tx.clone(), |_| {
            KioskEvent::RotateAd
        });
        let toasts = ticker::spawn(
            "toasts",
            self.prune_interval,
            tx,
            KioskEvent::PruneNotifications,
        );

        let mut result = self.render();

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        while result.is_ok() {
            tokio::select! {
                maybe_event = rx.recv() => {
                    let Some(event) = maybe_event else {
                        break;
                    };
                    match self.apply(event) {
                        Ok(ControlFlow::Continue(())) => {}
                        Ok(ControlFlow::Break(())) => break,
                        Err(e) => result = Err(e),
                    }
                }
                _ = &mut ctrl_c => {
                    info!("Received Ctrl-C, ending session");
                    break;
                }
            }
        }

        // Senders first, then the session they feed
        ads.shutdown().await;
        toasts.shutdown().await;
        keyboard.shutdown().await;
        self.session.teardown();

        info!(
            lines = self.session.cart().len(),
            total = %self.session.cart().total(),
            "Checkout session ended"
        );

        result
    }
}
