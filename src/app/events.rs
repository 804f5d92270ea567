// ABOUTME: Terminal input thread feeding keys, resizes, and ticks into the wizard channel
// Blocking crossterm polling runs off the async runtime; the loop only awaits the channel

use crossterm::event::{self, Event, KeyEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::components::connection_wizard::WizardMsg;

/// Owns the input thread and the receiving end of the wizard channel
pub struct EventHandler {
    rx: UnboundedReceiver<WizardMsg>,
    tx: UnboundedSender<WizardMsg>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl EventHandler {
    /// Channel without an input thread, for driving wizards from code
    pub fn detached() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            tx,
            stop: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    /// Start polling the terminal; a tick is sent every `tick_rate` even while keys arrive
    pub fn new(tick_rate: Duration) -> Self {
        let mut handler = Self::detached();
        let tx = handler.tx.clone();
        let stop = Arc::clone(&handler.stop);

        handler.thread = Some(std::thread::spawn(move || {
            let mut last_tick = Instant::now();
            while !stop.load(Ordering::Relaxed) {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());

                match event::poll(timeout) {
                    Ok(true) => {
                        let msg = match event::read() {
                            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                                Some(WizardMsg::Key(key))
                            }
                            Ok(Event::Resize(width, height)) => Some(WizardMsg::Resize(width, height)),
                            Ok(_) => None,
                            Err(e) => {
                                warn!(error = %e, "Failed to read terminal event");
                                None
                            }
                        };
                        if let Some(msg) = msg {
                            if tx.send(msg).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!(error = %e, "Terminal poll failed, stopping input thread");
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if tx.send(WizardMsg::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
            debug!("Input thread stopped");
        }));

        handler
    }

    /// Sender for tasks that report back into the loop, such as probes
    pub fn sender(&self) -> UnboundedSender<WizardMsg> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<WizardMsg> {
        self.rx.recv().await
    }

    /// Drop input that was buffered before the wizard was shown
    pub fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }

    /// Stop the input thread and wait for it to exit
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Input thread panicked");
            }
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
