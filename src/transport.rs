//! MQTT side of the agent: connection lifecycle, handshake and routing of
//! inbound messages to a [`Controller`].

use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS, Transport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::{AgentConfig, Identity};
use crate::constants::{
    EVENT_QUEUE_CAPACITY, KEEP_ALIVE, MANUAL_INPUT_BUFFER, NEW_GAME_TOPIC, RECONNECT_BACKOFF,
    START_DELAY, START_PAYLOAD,
};
use crate::engine::MoveDecisionEngine;
use crate::error::TransportError;
use crate::protocol::{classify_topic, decode_snapshot, encode_new_game, TopicKind, Topics};
use crate::render::render_board;
use crate::types::{BoardSnapshot, Move, NewGameAnnouncement};

/// Decides what, if anything, to publish for each game-state update.
pub trait Controller: Send {
    fn on_game_state(&mut self, snapshot: &BoardSnapshot) -> Option<Move>;

    /// Whether moves come from the operator's keyboard.
    fn reads_keyboard(&self) -> bool {
        false
    }
}

pub struct AutoController {
    engine: MoveDecisionEngine,
    show_board: bool,
}

impl AutoController {
    pub fn new(engine: MoveDecisionEngine, show_board: bool) -> Self {
        Self { engine, show_board }
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &MoveDecisionEngine {
        &self.engine
    }
}

impl Controller for AutoController {
    fn on_game_state(&mut self, snapshot: &BoardSnapshot) -> Option<Move> {
        if self.show_board {
            print_board(snapshot);
        }
        Some(self.engine.on_snapshot(snapshot).mv)
    }
}

#[derive(Default)]
pub struct ManualController;

impl Controller for ManualController {
    fn on_game_state(&mut self, snapshot: &BoardSnapshot) -> Option<Move> {
        print_board(snapshot);
        None
    }

    fn reads_keyboard(&self) -> bool {
        true
    }
}

fn print_board(snapshot: &BoardSnapshot) {
    println!("Game state:");
    for row in render_board(snapshot) {
        println!("{row}");
    }
}

/// Handles one inbound publish and returns the move to send back, if any.
/// Undecodable game states skip the cycle.
pub fn route_publish<C: Controller + ?Sized>(
    controller: &mut C,
    topic: &str,
    payload: &[u8],
) -> Option<Move> {
    match classify_topic(topic) {
        TopicKind::GameState => match decode_snapshot(payload) {
            Ok(snapshot) => controller.on_game_state(&snapshot),
            Err(error) => {
                tracing::warn!(%topic, %error, "skipping game state");
                None
            }
        },
        TopicKind::Lobby => {
            tracing::info!(message = %String::from_utf8_lossy(payload), "lobby");
            None
        }
        TopicKind::Scores => {
            tracing::info!(scores = %String::from_utf8_lossy(payload), "scores");
            None
        }
        TopicKind::Other => {
            tracing::debug!(%topic, "ignoring message");
            None
        }
    }
}

pub fn mqtt_options(config: &AgentConfig) -> MqttOptions {
    let mut options = MqttOptions::new(&config.client_id, &config.broker.host, config.broker.port);
    options.set_keep_alive(KEEP_ALIVE);
    if let Some((user, password)) = &config.broker.credentials {
        options.set_credentials(user, password);
    }
    if config.broker.tls {
        options.set_transport(Transport::tls_with_default_config());
    }
    options
}

struct Session {
    client: AsyncClient,
    topics: Topics,
    announcement: NewGameAnnouncement,
    announced: bool,
    send_start: bool,
}

/// Requests go through `try_*` so a full request queue during an outage
/// fails fast instead of parking the event loop that would drain it.
impl Session {
    fn new(client: AsyncClient, identity: &Identity, send_start: bool) -> Self {
        Self {
            client,
            topics: Topics::new(&identity.lobby, &identity.player),
            announcement: NewGameAnnouncement {
                lobby_name: identity.lobby.clone(),
                team_name: identity.team.clone(),
                player_name: identity.player.clone(),
            },
            announced: false,
            send_start,
        }
    }

    /// Runs after every ConnAck. Subscriptions are renewed each time; the
    /// handshake and start signal go out once per process.
    fn on_connected(&mut self) -> Result<(), TransportError> {
        for topic in self.topics.subscriptions() {
            tracing::debug!(%topic, "subscribing");
            self.client.try_subscribe(topic, QoS::AtMostOnce)?;
        }
        if self.announced {
            return Ok(());
        }

        let payload = encode_new_game(&self.announcement)?;
        self.client
            .try_publish(NEW_GAME_TOPIC, QoS::AtMostOnce, false, payload)?;
        self.announced = true;
        tracing::info!(
            lobby = %self.announcement.lobby_name,
            team = %self.announcement.team_name,
            player = %self.announcement.player_name,
            "joined lobby"
        );

        if self.send_start {
            let client = self.client.clone();
            let topic = self.topics.start();
            tokio::spawn(async move {
                tokio::time::sleep(START_DELAY).await;
                match client.try_publish(topic, QoS::AtMostOnce, false, START_PAYLOAD) {
                    Ok(()) => tracing::info!("start signal sent"),
                    Err(error) => tracing::warn!(%error, "failed to send start signal"),
                }
            });
        }
        Ok(())
    }

    fn publish_move(&self, mv: Move) -> Result<(), TransportError> {
        self.client
            .try_publish(self.topics.moves(), QoS::AtMostOnce, false, mv.as_str())?;
        tracing::debug!(%mv, "move queued");
        Ok(())
    }
}

fn spawn_keyboard_reader(tx: mpsc::Sender<Move>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("Enter move (UP/DOWN/LEFT/RIGHT):");
        while let Ok(Some(line)) = lines.next_line().await {
            match Move::parse(&line) {
                Some(mv) => {
                    if tx.send(mv).await.is_err() {
                        break;
                    }
                }
                None => println!("Invalid move! Please enter UP/DOWN/LEFT/RIGHT."),
            }
        }
    });
}

/// Connects, announces the player and serves game states until Ctrl-C.
///
/// Connection errors are logged and retried; rumqttc reconnects on the
/// next poll.
pub async fn run<C: Controller>(
    config: AgentConfig,
    mut controller: C,
    send_start: bool,
) -> Result<(), TransportError> {
    let (client, mut eventloop) = AsyncClient::new(mqtt_options(&config), EVENT_QUEUE_CAPACITY);
    let mut session = Session::new(client, &config.identity, send_start);

    let (input_tx, mut input_rx) = mpsc::channel::<Move>(MANUAL_INPUT_BUFFER);
    if controller.reads_keyboard() {
        spawn_keyboard_reader(input_tx);
    } else {
        drop(input_tx);
    }

    tracing::info!(
        host = %config.broker.host,
        port = config.broker.port,
        client_id = %config.client_id,
        tls = config.broker.tls,
        "connecting to broker"
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let backoff = tokio::time::sleep(Duration::ZERO);
    tokio::pin!(backoff);
    let mut backing_off = false;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutting down");
                break;
            }
            () = &mut backoff, if backing_off => {
                backing_off = false;
            }
            Some(mv) = input_rx.recv() => {
                if let Err(error) = session.publish_move(mv) {
                    tracing::warn!(%mv, %error, "move dropped");
                }
            }
            event = eventloop.poll(), if !backing_off => match event {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    tracing::info!(code = ?ack.code, "connected");
                    if let Err(error) = session.on_connected() {
                        tracing::warn!(%error, "handshake incomplete");
                    }
                }
                Ok(Event::Incoming(Packet::SubAck(ack))) => {
                    tracing::debug!(pkid = ack.pkid, codes = ?ack.return_codes, "subscribed");
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let reply = route_publish(&mut controller, &publish.topic, &publish.payload);
                    if let Some(mv) = reply {
                        if let Err(error) = session.publish_move(mv) {
                            tracing::warn!(%mv, %error, "move dropped");
                        }
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(%error, backoff = ?RECONNECT_BACKOFF, "broker connection error");
                    backoff.as_mut().reset(Instant::now() + RECONNECT_BACKOFF);
                    backing_off = true;
                }
            },
        }
    }

    if let Err(error) = session.client.try_disconnect() {
        tracing::debug!(%error, "disconnect request failed");
    }
    Ok(())
}
