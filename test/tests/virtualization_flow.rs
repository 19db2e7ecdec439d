/// Tests for native world packets passing through a connection's
/// virtualization layer.

use facade_shared::{
    CellPos, CellUpdatePacket, ClientboundPacket, CustomChannel, LocalPos, NativeCell,
    SectionPos, SectionUpdatePacket,
};
use facade_test::{
    assert_no_virtual_packets, helpers::test_server::test_config, TestContent, TestServer,
};

fn server() -> (TestServer, TestContent) {
    let (content, registry) = TestContent::build(2);
    (TestServer::new(test_config(false), registry), content)
}

#[test]
fn builtin_cell_update_reaches_everyone_unchanged() {
    let (mut server, content) = server();
    let capable = server.join_capable(1);
    let incapable = server.join_incapable(2);
    let packet = ClientboundPacket::CellUpdate {
        pos: CellPos::new(4, 70, -9),
        state: content.stone,
    };

    for client in [&capable, &incapable] {
        server
            .server
            .send_world_packet(&client.key, packet.clone())
            .unwrap();
        assert_eq!(client.drain(), vec![packet.clone()]);
    }
}

#[test]
fn synthetic_cell_update_is_masked_for_incapable_peer() {
    let (mut server, content) = server();
    let client = server.join_incapable(1);
    let pos = CellPos::new(4, 70, -9);

    server
        .server
        .send_world_packet(
            &client.key,
            ClientboundPacket::CellUpdate {
                pos,
                state: content.synthetic[1],
            },
        )
        .unwrap();

    let packets = client.drain();
    assert_eq!(
        packets,
        vec![ClientboundPacket::CellUpdate {
            pos,
            state: content.stone,
        }]
    );
    assert_no_virtual_packets!(packets);
}

#[test]
fn synthetic_cell_update_is_followed_by_virtual_update_for_capable_peer() {
    let (mut server, content) = server();
    let client = server.join_capable(1);
    let pos = CellPos::new(-1, 0, 1);
    let state = content.synthetic[2];

    server
        .server
        .send_world_packet(&client.key, ClientboundPacket::CellUpdate { pos, state })
        .unwrap();

    let packets = client.drain();
    assert_eq!(packets.len(), 2);
    assert_eq!(
        packets[0],
        ClientboundPacket::CellUpdate {
            pos,
            state: content.stone,
        }
    );
    let payload = packets[1].as_custom_payload().expect("virtual update");
    assert!(payload.is_on(CustomChannel::CellUpdate));
    assert_eq!(
        CellUpdatePacket::from_payload(payload).unwrap(),
        CellUpdatePacket {
            pos,
            raw_id: server.server.registry().raw_id(state),
        }
    );
}

#[test]
fn mixed_section_update_splits_into_native_and_virtual() {
    let (mut server, content) = server();
    let client = server.join_capable(1);
    let section = SectionPos::new(0, 3, 0);
    let cells = vec![
        NativeCell {
            local: LocalPos::new(0, 0, 0),
            state: content.air,
        },
        NativeCell {
            local: LocalPos::new(1, 2, 3),
            state: content.synthetic[0],
        },
        NativeCell {
            local: LocalPos::new(5, 5, 5),
            state: content.synthetic[3],
        },
    ];

    server
        .server
        .send_world_packet(
            &client.key,
            ClientboundPacket::SectionCellsUpdate { section, cells },
        )
        .unwrap();

    let packets = client.drain();
    assert_eq!(packets.len(), 2);

    let ClientboundPacket::SectionCellsUpdate { cells: visual, .. } = &packets[0] else {
        panic!("native section update expected, got {:?}", packets[0]);
    };
    let visual_states: Vec<_> = visual.iter().map(|cell| cell.state).collect();
    assert_eq!(visual_states, vec![content.air, content.stone, content.stone]);

    let update = SectionUpdatePacket::from_payload(packets[1].as_custom_payload().unwrap())
        .unwrap();
    assert_eq!(update.section, section);
    let registry = server.server.registry();
    let virtual_cells: Vec<_> = update
        .cells
        .iter()
        .map(|cell| (cell.local(), cell.raw_id()))
        .collect();
    assert_eq!(
        virtual_cells,
        vec![
            (LocalPos::new(1, 2, 3), registry.raw_id(content.synthetic[0])),
            (LocalPos::new(5, 5, 5), registry.raw_id(content.synthetic[3])),
        ]
    );
}

#[test]
fn builtin_section_update_is_forwarded_verbatim() {
    let (mut server, content) = server();
    let client = server.join_capable(1);
    let packet = ClientboundPacket::SectionCellsUpdate {
        section: SectionPos::new(1, 1, 1),
        cells: vec![NativeCell {
            local: LocalPos::new(2, 2, 2),
            state: content.barrier,
        }],
    };

    server
        .server
        .send_world_packet(&client.key, packet.clone())
        .unwrap();
    assert_eq!(client.drain(), vec![packet]);
}

#[test]
fn unrelated_packets_are_untouched() {
    let (mut server, _) = server();
    let client = server.join_incapable(1);
    let packet = ClientboundPacket::KeepAlive { parameter: 99 };

    server
        .server
        .send_world_packet(&client.key, packet.clone())
        .unwrap();
    assert_eq!(client.drain(), vec![packet]);
}
