//! Room state and the authoritative tick loop
//!
//! The room is a single actor task that owns both per-participant stores
//! (the registry of simulated state and the latest input samples). All
//! mutation — join, leave, inbound messages and the periodic tick — runs on
//! this one task, so connection events and the simulation never race.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::game::input::InputSample;
use crate::game::movement::MovementSystem;
use crate::game::snapshot::build_state;
use crate::game::RoomEvent;
use crate::util::time::SIMULATION_TICK;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Display names are truncated to this many characters after trimming
pub const MAX_NAME_LEN: usize = 16;

/// A connected client's authoritative simulated state
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Participant {
    /// New participant at the world origin with zero orientation
    pub fn new(id: Uuid, name: String, color: String) -> Self {
        Self {
            id,
            name,
            color,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

/// Handle connections use to talk to the room task
#[derive(Clone)]
pub struct RoomHandle {
    pub event_tx: mpsc::Sender<RoomEvent>,
    pub snapshot_tx: broadcast::Sender<ServerMsg>,
    participant_count: Arc<AtomicUsize>,
}

impl RoomHandle {
    pub fn participant_count(&self) -> usize {
        self.participant_count.load(Ordering::Relaxed)
    }
}

/// The authoritative room
pub struct Room {
    participants: HashMap<Uuid, Participant>,
    inputs: HashMap<Uuid, InputSample>,
    event_rx: mpsc::Receiver<RoomEvent>,
    snapshot_tx: broadcast::Sender<ServerMsg>,
    participant_count: Arc<AtomicUsize>,
    tick: u64,
}

impl Room {
    pub fn new() -> (Self, RoomHandle) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (snapshot_tx, _) = broadcast::channel(64);
        let participant_count = Arc::new(AtomicUsize::new(0));

        let handle = RoomHandle {
            event_tx,
            snapshot_tx: snapshot_tx.clone(),
            participant_count: participant_count.clone(),
        };

        let room = Self {
            participants: HashMap::new(),
            inputs: HashMap::new(),
            event_rx,
            snapshot_tx,
            participant_count,
            tick: 0,
        };

        (room, handle)
    }

    /// Run the room: connection events are applied as they arrive,
    /// interleaved with the fixed-period simulation tick.
    pub async fn run(mut self) {
        info!("Room task started");

        let mut tick_interval = interval(SIMULATION_TICK);
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                _ = tick_interval.tick() => {
                    // Integrate over real elapsed time so a slow tick still
                    // covers the correct distance in one larger step
                    let now = Instant::now();
                    let dt = now.duration_since(last_tick).as_secs_f32();
                    last_tick = now;

                    self.step(dt);
                    self.broadcast_state();
                }
                event = self.event_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        None => break,
                    }
                }
            }
        }

        info!("Room task stopped");
    }

    /// Apply one connection event
    pub fn handle_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Join { id, name, color } => self.handle_join(id, name, color),
            RoomEvent::Message { id, msg } => match msg {
                ClientMsg::Identify { name } => self.handle_identify(id, name),
                ClientMsg::Reset => self.handle_reset(id),
                ClientMsg::Input {
                    movement,
                    speed,
                    view,
                } => self.handle_input(id, movement, speed, view),
            },
            RoomEvent::Leave { id } => self.handle_leave(id),
        }
    }

    fn handle_join(&mut self, id: Uuid, name: String, color: String) {
        self.participants
            .insert(id, Participant::new(id, name, color));
        self.inputs.insert(id, InputSample::default());
        self.participant_count
            .store(self.participants.len(), Ordering::Relaxed);

        info!(
            participant_id = %id,
            participant_count = self.participants.len(),
            "Participant joined"
        );
    }

    fn handle_identify(&mut self, id: Uuid, name: String) {
        if let Some(participant) = self.participants.get_mut(&id) {
            let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
            if !trimmed.is_empty() {
                debug!(participant_id = %id, name = %trimmed, "Participant renamed");
                participant.name = trimmed;
            }
        }
    }

    fn handle_reset(&mut self, id: Uuid) {
        if let Some(participant) = self.participants.get_mut(&id) {
            participant.x = 0.0;
            participant.y = 0.0;
            participant.z = 0.0;
        }
    }

    fn handle_input(
        &mut self,
        id: Uuid,
        movement: Option<crate::ws::protocol::MoveWire>,
        speed: Option<f32>,
        view: Option<crate::ws::protocol::ViewWire>,
    ) {
        // Input for an id that never joined (or already left) is dropped so
        // the stores stay strictly 1:1 with connected participants
        if !self.participants.contains_key(&id) {
            return;
        }
        self.inputs
            .entry(id)
            .or_default()
            .apply(movement, speed, view);
    }

    fn handle_leave(&mut self, id: Uuid) {
        self.participants.remove(&id);
        self.inputs.remove(&id);
        self.participant_count
            .store(self.participants.len(), Ordering::Relaxed);

        info!(
            participant_id = %id,
            participant_count = self.participants.len(),
            "Participant left"
        );
    }

    /// Advance every participant by `dt` seconds of simulation
    pub fn step(&mut self, dt: f32) {
        self.tick += 1;

        for participant in self.participants.values_mut() {
            // The handler inserts the sample at join; or_default covers an
            // out-of-order removal without faulting
            let input = self.inputs.entry(participant.id).or_default();

            let (x, y, z, yaw, pitch) =
                MovementSystem::integrate(participant.x, participant.y, participant.z, input, dt);
            participant.x = x;
            participant.y = y;
            participant.z = z;
            participant.yaw = yaw;
            participant.pitch = pitch;
        }

        trace!(tick = self.tick, dt, "Simulation tick");
    }

    /// Serialize and fan out the registry snapshot. Returns whether a
    /// snapshot was actually sent; with zero open connections the build is
    /// skipped entirely.
    pub fn broadcast_state(&self) -> bool {
        if self.snapshot_tx.receiver_count() == 0 {
            return false;
        }
        let _ = self.snapshot_tx.send(build_state(&self.participants));
        true
    }

    #[cfg(test)]
    fn participant(&self, id: Uuid) -> &Participant {
        self.participants.get(&id).expect("participant missing")
    }

    #[cfg(test)]
    fn input(&self, id: Uuid) -> &InputSample {
        self.inputs.get(&id).expect("input sample missing")
    }
}
