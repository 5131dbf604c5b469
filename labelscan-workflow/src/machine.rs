//! Workflow state machine
//!
//! `WorkflowMachine` owns all controller state and processes commands and
//! completions synchronously, returning the effects the driver must
//! execute. Every asynchronous operation and timer is stamped with the
//! generation counter at issue time; completions carrying a stale
//! generation are discarded, so a cancel or a superseding lookup can never
//! be reopened by a late response.

use shared::{BarcodeMapping, PrintMode, PrintRecord, WorkflowError};

/// How long a finished print stays on screen before the workflow resets
pub const RESET_PAUSE_MS: u64 = 500;

/// Workflow lifecycle state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    LookingUp,
    AwaitingConfirmation,
    CountingDown,
    Printing,
    Error,
}

/// The match the workflow is currently working on
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMatch {
    pub mapping: BarcodeMapping,
    pub print_count: u32,
    pub last_print: Option<PrintRecord>,
}

/// Result of a lookup collaborator call, as fed back into the machine
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Found {
        mapping: BarcodeMapping,
        print_count: u32,
        last_print: Option<PrintRecord>,
    },
    NotFound,
    TransportFailed,
}

/// Result of a print collaborator call, as fed back into the machine
#[derive(Debug, Clone)]
pub enum PrintOutcome {
    Succeeded {
        mode: Option<PrintMode>,
        preview_url: Option<String>,
        message: Option<String>,
    },
    Rejected {
        reason: String,
    },
    TransportFailed,
}

/// Observable workflow events, emitted through the driver's event channel
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    StateChanged(WorkflowState),
    /// A fresh match with no prior prints; countdown is starting
    MatchFound { mapping: BarcodeMapping },
    /// Match has prior prints; confirmation required before any countdown
    DuplicateDetected {
        mapping: BarcodeMapping,
        print_count: u32,
        last_print: Option<PrintRecord>,
    },
    /// Seconds left until auto-print. Presentational only - the armed
    /// timer, not this number, is what triggers the print.
    CountdownTick(u32),
    /// Print succeeded in preview mode; location to open instead
    PreviewReady { preview_url: String },
    /// Print submission resolved successfully
    Printed { message: Option<String> },
    Failed(WorkflowError),
}

/// Effects the driver must execute after a machine call
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Spawn a lookup for `code`, reporting back with `generation`
    Lookup { generation: u64, code: String },
    /// Arm the auto-print countdown: per-second ticks plus the firing
    /// deadline at `secs`
    ArmCountdown { generation: u64, secs: u32 },
    /// Build a print request from the live settings and submit it
    SubmitPrint {
        generation: u64,
        mapping: BarcodeMapping,
    },
    /// Arm the short post-print display pause
    ArmResetPause { generation: u64 },
    /// Stop every armed timer
    DisarmTimers,
    /// Forward to the event channel
    Emit(WorkflowEvent),
}

/// The scan-to-print workflow state machine
#[derive(Debug)]
pub struct WorkflowMachine {
    state: WorkflowState,
    generation: u64,
    query: Option<String>,
    current: Option<ActiveMatch>,
    remaining: u32,
    error: Option<WorkflowError>,
}

impl Default for WorkflowMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowMachine {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            generation: 0,
            query: None,
            current: None,
            remaining: 0,
            error: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// The raw scanned/typed code of the active cycle
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn current_match(&self) -> Option<&ActiveMatch> {
        self.current.as_ref()
    }

    /// Seconds left on the countdown display
    pub fn countdown_remaining(&self) -> u32 {
        self.remaining
    }

    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ========== Commands ==========

    /// A code was scanned or typed. Supersedes whatever is in flight:
    /// cancel-then-replace, never queue.
    pub fn begin_lookup(&mut self, code: &str) -> Vec<Effect> {
        let code = code.trim();
        if code.is_empty() {
            return Vec::new();
        }

        // Invalidates any outstanding completion or armed timer
        self.generation += 1;
        self.query = Some(code.to_string());
        self.current = None;
        self.error = None;
        self.remaining = 0;
        self.state = WorkflowState::LookingUp;

        vec![
            Effect::DisarmTimers,
            Effect::Emit(WorkflowEvent::StateChanged(WorkflowState::LookingUp)),
            Effect::Lookup {
                generation: self.generation,
                code: code.to_string(),
            },
        ]
    }

    /// Operator confirmed a duplicate print. Only now may the countdown
    /// start for a duplicate match.
    pub fn confirm_duplicate(&mut self, delay_secs: u32) -> Vec<Effect> {
        if self.state != WorkflowState::AwaitingConfirmation {
            return Vec::new();
        }

        let mut effects = Vec::new();
        self.arm_countdown(delay_secs, &mut effects);
        effects
    }

    /// Abort the active cycle. Idempotent; valid in every state.
    pub fn cancel(&mut self) -> Vec<Effect> {
        if self.state == WorkflowState::Idle {
            return Vec::new();
        }

        // Marks in-flight responses stale; they are discarded on arrival
        self.generation += 1;
        self.query = None;
        self.current = None;
        self.error = None;
        self.remaining = 0;
        self.state = WorkflowState::Idle;

        vec![
            Effect::DisarmTimers,
            Effect::Emit(WorkflowEvent::StateChanged(WorkflowState::Idle)),
        ]
    }

    /// Operator asked for an immediate print, skipping the countdown or
    /// retrying after a failed print.
    pub fn request_print(&mut self) -> Vec<Effect> {
        match self.state {
            WorkflowState::CountingDown => self.begin_print(),
            // Retry path: the failed match is retained in Error state
            WorkflowState::Error if self.current.is_some() => self.begin_print(),
            // Re-entrant print while Printing is a no-op, as is printing
            // before a match is confirmed or resolved
            _ => Vec::new(),
        }
    }

    // ========== Completions ==========

    /// Lookup collaborator finished. `delay_secs` is the auto-print delay
    /// read from settings at this moment.
    pub fn lookup_finished(
        &mut self,
        generation: u64,
        outcome: LookupOutcome,
        delay_secs: u32,
    ) -> Vec<Effect> {
        if generation != self.generation || self.state != WorkflowState::LookingUp {
            tracing::debug!(generation, "discarding stale lookup completion");
            return Vec::new();
        }

        match outcome {
            LookupOutcome::Found {
                mapping,
                print_count,
                last_print,
            } => {
                self.current = Some(ActiveMatch {
                    mapping: mapping.clone(),
                    print_count,
                    last_print: last_print.clone(),
                });

                if print_count > 0 {
                    self.state = WorkflowState::AwaitingConfirmation;
                    vec![
                        Effect::Emit(WorkflowEvent::DuplicateDetected {
                            mapping,
                            print_count,
                            last_print,
                        }),
                        Effect::Emit(WorkflowEvent::StateChanged(
                            WorkflowState::AwaitingConfirmation,
                        )),
                    ]
                } else {
                    let mut effects = vec![Effect::Emit(WorkflowEvent::MatchFound { mapping })];
                    self.arm_countdown(delay_secs, &mut effects);
                    effects
                }
            }
            LookupOutcome::NotFound => self.fail(WorkflowError::NotFound),
            LookupOutcome::TransportFailed => self.fail(WorkflowError::Connectivity),
        }
    }

    /// One display second elapsed on the countdown
    pub fn tick(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.generation || self.state != WorkflowState::CountingDown {
            return Vec::new();
        }
        if self.remaining > 1 {
            self.remaining -= 1;
            vec![Effect::Emit(WorkflowEvent::CountdownTick(self.remaining))]
        } else {
            Vec::new()
        }
    }

    /// The auto-print deadline fired
    pub fn timer_elapsed(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.generation || self.state != WorkflowState::CountingDown {
            tracing::debug!(generation, "discarding stale countdown expiry");
            return Vec::new();
        }
        self.begin_print()
    }

    /// Print collaborator finished
    pub fn print_finished(&mut self, generation: u64, outcome: PrintOutcome) -> Vec<Effect> {
        if generation != self.generation || self.state != WorkflowState::Printing {
            tracing::debug!(generation, "discarding stale print completion");
            return Vec::new();
        }

        match outcome {
            PrintOutcome::Succeeded {
                mode,
                preview_url,
                message,
            } => {
                let mut effects = Vec::new();
                if mode == Some(PrintMode::Preview)
                    && let Some(preview_url) = preview_url
                {
                    effects.push(Effect::Emit(WorkflowEvent::PreviewReady { preview_url }));
                }
                effects.push(Effect::Emit(WorkflowEvent::Printed { message }));
                effects.push(Effect::ArmResetPause {
                    generation: self.generation,
                });
                effects
            }
            PrintOutcome::Rejected { reason } => self.fail(WorkflowError::PrintFailed(reason)),
            PrintOutcome::TransportFailed => self.fail(WorkflowError::Connectivity),
        }
    }

    /// The post-print display pause elapsed; reset for the next scan
    pub fn reset_elapsed(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.generation || self.state != WorkflowState::Printing {
            return Vec::new();
        }

        self.query = None;
        self.current = None;
        self.error = None;
        self.state = WorkflowState::Idle;

        vec![Effect::Emit(WorkflowEvent::StateChanged(
            WorkflowState::Idle,
        ))]
    }

    // ========== Internals ==========

    fn arm_countdown(&mut self, delay_secs: u32, effects: &mut Vec<Effect>) {
        let secs = delay_secs.max(1);
        self.remaining = secs;
        self.state = WorkflowState::CountingDown;
        effects.push(Effect::Emit(WorkflowEvent::StateChanged(
            WorkflowState::CountingDown,
        )));
        effects.push(Effect::Emit(WorkflowEvent::CountdownTick(secs)));
        effects.push(Effect::ArmCountdown {
            generation: self.generation,
            secs,
        });
    }

    fn begin_print(&mut self) -> Vec<Effect> {
        let Some(active) = &self.current else {
            return Vec::new();
        };
        let mapping = active.mapping.clone();

        self.error = None;
        self.remaining = 0;
        self.state = WorkflowState::Printing;

        vec![
            Effect::DisarmTimers,
            Effect::Emit(WorkflowEvent::StateChanged(WorkflowState::Printing)),
            Effect::SubmitPrint {
                generation: self.generation,
                mapping,
            },
        ]
    }

    fn fail(&mut self, error: WorkflowError) -> Vec<Effect> {
        // The match is retained on print failures so the operator can
        // retry; lookup failures never had one
        self.remaining = 0;
        self.error = Some(error.clone());
        self.state = WorkflowState::Error;

        vec![
            Effect::Emit(WorkflowEvent::Failed(error)),
            Effect::Emit(WorkflowEvent::StateChanged(WorkflowState::Error)),
        ]
    }
}
