//! Workflow driver
//!
//! `ScanWorkflow` runs the state machine: it receives operator commands,
//! spawns lookup/print collaborator calls, arms the countdown and reset
//! timers, and forwards workflow events to the observer. All state lives
//! in the machine and is only touched from the run loop; spawned calls
//! report back over an internal channel tagged with their generation.

use crate::collab::{BarcodeLookup, PrintDispatch};
use crate::machine::{
    Effect, LookupOutcome, PrintOutcome, RESET_PAUSE_MS, WorkflowEvent, WorkflowMachine,
};
use crate::settings::SettingsStore;
use shared::{BarcodeMapping, PrintRequest, ScanResponse};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// Operator commands accepted by the workflow
#[derive(Debug)]
enum Command {
    Lookup(String),
    Confirm,
    Cancel,
    Print,
}

/// Collaborator completions, tagged with the generation at issue time
#[derive(Debug)]
enum Completion {
    Lookup {
        generation: u64,
        outcome: LookupOutcome,
    },
    Print {
        generation: u64,
        outcome: PrintOutcome,
    },
}

/// Armed timer deadlines. At most one countdown exists at a time; all
/// deadlines share the generation they were armed under.
#[derive(Debug, Default)]
struct Timers {
    generation: u64,
    /// Next display tick
    tick_at: Option<Instant>,
    /// Auto-print deadline
    fire_at: Option<Instant>,
    /// Post-print display pause
    reset_at: Option<Instant>,
}

impl Timers {
    fn disarm(&mut self) {
        self.tick_at = None;
        self.fire_at = None;
        self.reset_at = None;
    }
}

/// Command handle for a running workflow
#[derive(Debug, Clone)]
pub struct WorkflowHandle {
    commands: mpsc::Sender<Command>,
}

impl WorkflowHandle {
    /// Submit a scanned/typed code for lookup
    pub async fn lookup(&self, code: impl Into<String>) {
        let _ = self.commands.send(Command::Lookup(code.into())).await;
    }

    /// Confirm printing a duplicate
    pub async fn confirm(&self) {
        let _ = self.commands.send(Command::Confirm).await;
    }

    /// Abort the active cycle
    pub async fn cancel(&self) {
        let _ = self.commands.send(Command::Cancel).await;
    }

    /// Print immediately, skipping the countdown (or retrying a failure)
    pub async fn print(&self) {
        let _ = self.commands.send(Command::Print).await;
    }
}

/// The scan-to-print workflow driver
pub struct ScanWorkflow<L, P, S> {
    machine: WorkflowMachine,
    lookup: Arc<L>,
    printer: Arc<P>,
    settings: Arc<S>,
    timers: Timers,
    commands: mpsc::Receiver<Command>,
    completions_tx: mpsc::Sender<Completion>,
    completions: mpsc::Receiver<Completion>,
    events: mpsc::UnboundedSender<WorkflowEvent>,
    shutdown: CancellationToken,
}

impl<L, P, S> ScanWorkflow<L, P, S>
where
    L: BarcodeLookup,
    P: PrintDispatch,
    S: SettingsStore,
{
    /// Create a workflow with its command handle and event stream
    pub fn new(
        lookup: Arc<L>,
        printer: Arc<P>,
        settings: Arc<S>,
        shutdown: CancellationToken,
    ) -> (
        Self,
        WorkflowHandle,
        mpsc::UnboundedReceiver<WorkflowEvent>,
    ) {
        let (commands_tx, commands) = mpsc::channel(32);
        let (completions_tx, completions) = mpsc::channel(32);
        let (events, events_rx) = mpsc::unbounded_channel();

        let workflow = Self {
            machine: WorkflowMachine::new(),
            lookup,
            printer,
            settings,
            timers: Timers::default(),
            commands,
            completions_tx,
            completions,
            events,
            shutdown,
        };
        let handle = WorkflowHandle {
            commands: commands_tx,
        };

        (workflow, handle, events_rx)
    }

    /// Run the workflow until shutdown or the last handle is dropped
    pub async fn run(mut self) {
        tracing::debug!("scan workflow started");

        loop {
            let tick_at = self.timers.tick_at.unwrap_or_else(far_future);
            let fire_at = self.timers.fire_at.unwrap_or_else(far_future);
            let reset_at = self.timers.reset_at.unwrap_or_else(far_future);

            tokio::select! {
                _ = self.shutdown.cancelled() => break,

                command = self.commands.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => break,
                    }
                }

                Some(completion) = self.completions.recv() => {
                    self.handle_completion(completion);
                }

                _ = sleep_until(tick_at), if self.timers.tick_at.is_some() => {
                    let generation = self.timers.generation;
                    // Next display tick, stopping short of the deadline
                    let next = tick_at + Duration::from_secs(1);
                    self.timers.tick_at = match self.timers.fire_at {
                        Some(fire) if next < fire => Some(next),
                        _ => None,
                    };
                    let effects = self.machine.tick(generation);
                    self.apply(effects);
                }

                _ = sleep_until(fire_at), if self.timers.fire_at.is_some() => {
                    let generation = self.timers.generation;
                    self.timers.tick_at = None;
                    self.timers.fire_at = None;
                    let effects = self.machine.timer_elapsed(generation);
                    self.apply(effects);
                }

                _ = sleep_until(reset_at), if self.timers.reset_at.is_some() => {
                    let generation = self.timers.generation;
                    self.timers.reset_at = None;
                    let effects = self.machine.reset_elapsed(generation);
                    self.apply(effects);
                }
            }
        }

        tracing::debug!("scan workflow stopped");
    }

    fn handle_command(&mut self, command: Command) {
        let effects = match command {
            Command::Lookup(code) => self.machine.begin_lookup(&code),
            Command::Confirm => {
                let delay = self.settings.auto_print_delay();
                self.machine.confirm_duplicate(delay)
            }
            Command::Cancel => self.machine.cancel(),
            Command::Print => self.machine.request_print(),
        };
        self.apply(effects);
    }

    fn handle_completion(&mut self, completion: Completion) {
        let effects = match completion {
            Completion::Lookup {
                generation,
                outcome,
            } => {
                let delay = self.settings.auto_print_delay();
                self.machine.lookup_finished(generation, outcome, delay)
            }
            Completion::Print {
                generation,
                outcome,
            } => self.machine.print_finished(generation, outcome),
        };
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::DisarmTimers => self.timers.disarm(),

                Effect::Emit(event) => {
                    let _ = self.events.send(event);
                }

                Effect::Lookup { generation, code } => self.spawn_lookup(generation, code),

                Effect::ArmCountdown { generation, secs } => {
                    let now = Instant::now();
                    self.timers.generation = generation;
                    self.timers.fire_at = Some(now + Duration::from_secs(u64::from(secs)));
                    self.timers.tick_at = (secs > 1).then(|| now + Duration::from_secs(1));
                    self.timers.reset_at = None;
                }

                Effect::SubmitPrint {
                    generation,
                    mapping,
                } => self.spawn_print(generation, mapping),

                Effect::ArmResetPause { generation } => {
                    self.timers.generation = generation;
                    self.timers.reset_at =
                        Some(Instant::now() + Duration::from_millis(RESET_PAUSE_MS));
                }
            }
        }
    }

    fn spawn_lookup(&self, generation: u64, code: String) {
        let lookup = self.lookup.clone();
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = match lookup.scan(&code).await {
                Ok(response) => classify_scan(response),
                Err(e) => {
                    tracing::warn!(code, "barcode lookup failed: {e}");
                    LookupOutcome::TransportFailed
                }
            };
            let _ = completions
                .send(Completion::Lookup {
                    generation,
                    outcome,
                })
                .await;
        });
    }

    fn spawn_print(&self, generation: u64, mapping: BarcodeMapping) {
        // Settings are read here, at print time, so changes made after the
        // lookup are honored
        let request = PrintRequest {
            file_id: mapping.file_id,
            page_num: mapping.page_num,
            printer_name: self.settings.printer_name(),
            label_settings: self.settings.label_settings(),
            username: self.settings.username(),
        };

        let printer = self.printer.clone();
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = match printer.submit(&request).await {
                Ok(response) if response.success => PrintOutcome::Succeeded {
                    mode: response.mode,
                    preview_url: response.preview_url,
                    message: response.message,
                },
                Ok(response) => PrintOutcome::Rejected {
                    reason: response.failure_reason(),
                },
                Err(e) => {
                    tracing::warn!("print submission failed: {e}");
                    PrintOutcome::TransportFailed
                }
            };
            let _ = completions
                .send(Completion::Print {
                    generation,
                    outcome,
                })
                .await;
        });
    }
}

/// Map a scan response to a lookup outcome
fn classify_scan(response: ScanResponse) -> LookupOutcome {
    if !response.success {
        return LookupOutcome::TransportFailed;
    }
    if !response.found {
        return LookupOutcome::NotFound;
    }
    match response.mapping {
        Some(mapping) => LookupOutcome::Found {
            mapping,
            print_count: response.print_count,
            last_print: response.last_print,
        },
        None => {
            tracing::warn!("scan response claims found but carries no mapping");
            LookupOutcome::TransportFailed
        }
    }
}

/// Placeholder deadline for disarmed timer branches
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400)
}
