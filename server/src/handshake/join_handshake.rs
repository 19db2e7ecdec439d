use log::{debug, info, warn};

use facade_shared::{BundleStatus, ClientboundPacket, Text};

use crate::{
    connection::connection::Connection,
    handshake::{
        early_play::{EarlyPlayHandler, HandshakeProgress},
        error::HandshakeError,
        placeholder::placeholder_packets,
        session::{HandshakePhase, HandshakeSession},
        verified_peers::VerifiedPeers,
    },
    server::server_config::HandshakeConfig,
};

/// Translation key of the text shown to peers disconnected for refusing a
/// required bundle
pub const BUNDLE_FAILURE_KEY: &str = "multiplayer.texturePrompt.failure.line1";

/// Keepalive parameter reserved for the handshake round trip
pub const HANDSHAKE_KEEPALIVE: i32 = 0;

/// Defers a peer's exposure to synthetic content until it has confirmed the
/// asset bundle.
///
/// ```text
/// start ── verified ──────────────────────────────────────────────┐
///   │                                                             v
///   └─> Placeholder ─> AwaitingStatus ─(loaded/tolerated)─> AwaitingAck ─(0)─> Finalized
///                          │
///                          └─(declined, required)─> Disconnected
/// ```
pub struct JoinHandshake {
    session: HandshakeSession,
}

impl JoinHandshake {
    /// Starts the handshake for `connection`. A peer that verified the bundle
    /// before is finalized at once and its gate opened. Otherwise the
    /// placeholder scene and the bundle push are sent.
    pub fn start(
        connection: &mut Connection,
        config: &HandshakeConfig,
        verified_peers: &dyn VerifiedPeers,
    ) -> Result<Self, HandshakeError> {
        let mut session = HandshakeSession::new(config.is_required());

        if verified_peers.is_verified(&connection.peer()) {
            info!(
                "JoinHandshake: peer {:?} already verified, skipping placeholder",
                connection.peer()
            );
            connection.enable_capability();
            session.phase = HandshakePhase::Finalized;
            return Ok(Self { session });
        }

        let Some(bundle) = config.bundle.as_ref() else {
            info!(
                "JoinHandshake: no asset bundle configured, {:?} joins without capability",
                connection.key()
            );
            session.phase = HandshakePhase::Finalized;
            return Ok(Self { session });
        };

        let push = bundle.push_packet(session.required, config.prompt_message.clone());
        for packet in placeholder_packets(&config.placeholder, &config.brand, push) {
            connection.send(packet)?;
        }
        session.phase = HandshakePhase::AwaitingStatus;
        debug!(
            "JoinHandshake: {:?} parked in placeholder scene (required: {})",
            connection.key(),
            session.required
        );

        Ok(Self { session })
    }

    pub fn session(&self) -> &HandshakeSession {
        &self.session
    }

    pub fn phase(&self) -> HandshakePhase {
        self.session.phase
    }

    fn mark_verified(connection: &mut Connection, verified_peers: &dyn VerifiedPeers) {
        connection.enable_capability();
        verified_peers.set_verified(&connection.peer(), true);
    }

    fn await_ack(&mut self, connection: &Connection) -> Result<(), HandshakeError> {
        connection.send(ClientboundPacket::KeepAlive {
            parameter: HANDSHAKE_KEEPALIVE,
        })?;
        self.session.phase = HandshakePhase::AwaitingAck;
        Ok(())
    }
}

impl EarlyPlayHandler for JoinHandshake {
    fn progress(&self) -> HandshakeProgress {
        match self.session.phase {
            HandshakePhase::Finalized => HandshakeProgress::Finalized,
            HandshakePhase::Disconnected => HandshakeProgress::Disconnected,
            _ => HandshakeProgress::Pending,
        }
    }

    fn on_status_event(
        &mut self,
        connection: &mut Connection,
        verified_peers: &dyn VerifiedPeers,
        status: BundleStatus,
    ) -> Result<HandshakeProgress, HandshakeError> {
        if self.session.phase != HandshakePhase::AwaitingStatus {
            debug!(
                "JoinHandshake: ignoring {:?} from {:?} in phase {:?}",
                status,
                connection.key(),
                self.session.phase
            );
            return Ok(self.progress());
        }

        match status {
            BundleStatus::Accepted => {
                // the gate opens before the download completes
                self.session.accepted = true;
                Self::mark_verified(connection, verified_peers);
            }
            BundleStatus::SuccessfullyLoaded => {
                self.session.loaded = true;
                Self::mark_verified(connection, verified_peers);
                self.await_ack(connection)?;
            }
            BundleStatus::Declined | BundleStatus::FailedDownload => {
                if self.session.required {
                    warn!(
                        "JoinHandshake: {:?} reported {:?} for a required bundle",
                        connection.key(),
                        status
                    );
                    self.session.phase = HandshakePhase::Disconnected;
                    connection.disconnect(Text::translatable(BUNDLE_FAILURE_KEY))?;
                } else {
                    info!(
                        "JoinHandshake: {:?} reported {:?}, continuing without bundle",
                        connection.key(),
                        status
                    );
                    self.await_ack(connection)?;
                }
            }
        }

        Ok(self.progress())
    }

    fn on_keepalive_reply(
        &mut self,
        connection: &mut Connection,
        parameter: i32,
    ) -> Result<HandshakeProgress, HandshakeError> {
        if self.session.phase == HandshakePhase::AwaitingAck && parameter == HANDSHAKE_KEEPALIVE {
            self.session.phase = HandshakePhase::Finalized;
            info!(
                "JoinHandshake: {:?} finalized (capable: {})",
                connection.key(),
                connection.is_capable()
            );
        } else {
            debug!(
                "JoinHandshake: ignoring keepalive {} from {:?} in phase {:?}",
                parameter,
                connection.key(),
                self.session.phase
            );
        }
        Ok(self.progress())
    }
}
