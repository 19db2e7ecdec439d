/// Integration tests for the asset bundle join handshake
/// Drives a server through each path a joining peer can take.

use facade_server::{FacadeServerError, ServerConfig, BUNDLE_FAILURE_KEY, HANDSHAKE_KEEPALIVE};
use facade_shared::{
    BundleStatus, CellPos, ClientboundPacket, CustomChannel, PeerId, ServerboundPacket,
};
use facade_test::{
    assert_disconnected_with, assert_no_virtual_packets, helpers::test_server::test_config,
    TestContent, TestServer,
};

const PLACEHOLDER_PACKETS: usize = 7;

fn server(config: ServerConfig) -> (TestServer, TestContent) {
    let (content, registry) = TestContent::build(2);
    (TestServer::new(config, registry), content)
}

fn keepalive() -> ClientboundPacket {
    ClientboundPacket::KeepAlive {
        parameter: HANDSHAKE_KEEPALIVE,
    }
}

#[test]
fn unverified_peer_gets_placeholder_and_push() {
    let (mut server, _) = server(test_config(false));
    let client = server.connect(1);

    let packets = client.drain();
    assert_eq!(packets.len(), PLACEHOLDER_PACKETS);

    let ClientboundPacket::AssetBundlePush(push) = &packets[6] else {
        panic!("bundle push should come last, got {:?}", packets[6]);
    };
    assert!(!push.required);
    assert_eq!(push.hash.to_hex().len(), 40);

    let ClientboundPacket::TimeUpdate(time) = &packets[5] else {
        panic!("time update expected");
    };
    assert_eq!((time.world_age, time.time_of_day, time.advance_time), (0, 18_000, false));

    assert!(!server.server.is_joined(&client.key));
    assert_eq!(server.joined(&client.key), None);
}

#[test]
fn required_decline_disconnects_without_keepalive() {
    let (mut server, _) = server(test_config(true));
    let client = server.connect(1);
    client.drain();

    server.send_status(&client, BundleStatus::Declined);

    let packets = client.drain();
    assert_eq!(packets.len(), 1);
    assert!(!packets.contains(&keepalive()));
    assert_disconnected_with!(packets, BUNDLE_FAILURE_KEY);
    assert!(client.is_closed());
    assert!(server.was_disconnected(&client.key));
    assert!(server.server.connection(&client.key).is_none());
}

#[test]
fn required_failed_download_disconnects() {
    let (mut server, _) = server(test_config(true));
    let client = server.connect(1);
    client.drain();

    server.send_status(&client, BundleStatus::FailedDownload);

    assert_disconnected_with!(client.drain(), BUNDLE_FAILURE_KEY);
    assert_eq!(server.joined(&client.key), None);
}

#[test]
fn forced_requirement_overrides_policy() {
    let mut config = test_config(false);
    config.handshake.force_required = true;
    let (mut server, _) = server(config);
    let client = server.connect(1);

    let packets = client.drain();
    let ClientboundPacket::AssetBundlePush(push) = &packets[6] else {
        panic!("bundle push expected");
    };
    assert!(push.required);

    server.send_status(&client, BundleStatus::Declined);
    assert_disconnected_with!(client.drain(), BUNDLE_FAILURE_KEY);
}

#[test]
fn optional_failed_download_joins_without_capability() {
    let (mut server, content) = server(test_config(false));
    let client = server.connect(1);
    client.drain();

    server.send_status(&client, BundleStatus::FailedDownload);
    assert_eq!(client.drain(), vec![keepalive()]);
    assert!(!server.server.connection(&client.key).unwrap().is_capable());

    server.send_keepalive(&client, 0);
    assert_eq!(server.joined(&client.key), Some(false));

    // nothing virtual reaches the peer, not even on explicit sync
    assert_eq!(
        server
            .server
            .send_cell_update(&client.key, CellPos::new(0, 0, 0), content.synthetic[0]),
        Ok(false)
    );
    assert_eq!(server.server.sync_registries(&client.key), Ok(0));
    let packets = client.drain();
    assert!(packets.is_empty());
    assert_no_virtual_packets!(packets);
}

#[test]
fn successful_load_joins_with_capability() {
    let (mut server, _) = server(test_config(true));
    let client = server.connect(1);
    client.drain();

    server.send_status(&client, BundleStatus::SuccessfullyLoaded);
    assert_eq!(client.drain(), vec![keepalive()]);
    assert!(server.server.connection(&client.key).unwrap().is_capable());
    assert_eq!(server.joined(&client.key), None);

    server.send_keepalive(&client, 0);
    assert_eq!(server.joined(&client.key), Some(true));
    assert!(server.server.is_joined(&client.key));

    // registries are synced on join: one content page and one state page
    let pages = client.drain_registry_pages();
    assert_eq!(pages.len(), 2);
}

#[test]
fn accepted_then_declined_keeps_gate_open() {
    let (mut server, _) = server(test_config(false));
    let client = server.connect(1);
    client.drain();

    server.send_status(&client, BundleStatus::Accepted);
    assert!(client.drain().is_empty());
    assert!(server.server.connection(&client.key).unwrap().is_capable());

    server.send_status(&client, BundleStatus::Declined);
    assert_eq!(client.drain(), vec![keepalive()]);

    server.send_keepalive(&client, 0);
    assert_eq!(server.joined(&client.key), Some(true));
}

#[test]
fn other_keepalive_parameters_are_ignored() {
    let (mut server, _) = server(test_config(false));
    let client = server.connect(1);
    server.send_status(&client, BundleStatus::SuccessfullyLoaded);

    server.send_keepalive(&client, 17);
    server.send_keepalive(&client, -1);
    assert_eq!(server.joined(&client.key), None);

    server.send_keepalive(&client, 0);
    assert_eq!(server.joined(&client.key), Some(true));
}

#[test]
fn keepalive_before_status_is_ignored() {
    let (mut server, _) = server(test_config(false));
    let client = server.connect(1);

    server.send_keepalive(&client, 0);
    assert_eq!(server.joined(&client.key), None);
}

#[test]
fn verified_peer_skips_placeholder_on_rejoin() {
    let (mut server, _) = server(test_config(true));
    let first = server.connect(5);
    server.send_status(&first, BundleStatus::SuccessfullyLoaded);
    server.send_keepalive(&first, 0);
    assert_eq!(server.joined(&first.key), Some(true));

    let second = server.connect(5);
    let packets = second.drain();
    assert_eq!(server.joined(&second.key), Some(true));
    assert!(packets
        .iter()
        .all(|packet| packet.as_custom_payload().map_or(false, |payload| {
            payload.is_on(CustomChannel::ContentRegistry)
                || payload.is_on(CustomChannel::StateRegistry)
        })));
    assert!(server
        .server
        .verified_peers()
        .is_verified(&PeerId(5)));
}

#[test]
fn packets_for_unknown_connection_are_rejected() {
    let (mut server, _) = server(test_config(false));
    let client = server.connect(1);
    server
        .server
        .disconnect(&client.key, facade_shared::Text::literal("bye"))
        .unwrap();

    assert_eq!(
        server
            .server
            .handle_packet(&client.key, ServerboundPacket::KeepAliveReply { parameter: 0 }),
        Err(FacadeServerError::UnknownConnection { key: client.key })
    );
}

#[test]
fn sync_before_join_is_rejected() {
    let (mut server, content) = server(test_config(false));
    let client = server.connect(1);

    assert_eq!(
        server
            .server
            .send_cell_update(&client.key, CellPos::new(0, 0, 0), content.synthetic[0]),
        Err(FacadeServerError::JoinPending { key: client.key })
    );
}

#[test]
fn without_bundle_everyone_joins_incapable() {
    let (mut server, _) = server(ServerConfig::default());
    let client = server.connect(1);

    assert!(client.drain().is_empty());
    assert_eq!(server.joined(&client.key), Some(false));
}
